//! Deferred closures handed to the thread that owns a window.
//!
//! Any thread may hold a [`Dispatcher`]. The owning thread holds the single
//! [`DispatchQueue`] and drains it whenever its [`Wake`] notification arrives;
//! on Windows the notification is a posted thread message picked up by the
//! message loop.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

/// A closure run on the owning thread against its target.
pub type Task<T> = Box<dyn FnOnce(&T) + Send>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("dispatch queue closed")]
    Closed,
}

/// Notifies the consumer that work is waiting.
pub trait Wake: Send + Sync {
    fn wake(&self);
}

impl<F> Wake for F
where
    F: Fn() + Send + Sync,
{
    fn wake(&self) {
        self()
    }
}

/// Producer end. Cheap to clone and safe to send to other threads.
pub struct Dispatcher<T> {
    tx: Sender<Task<T>>,
    waker: Arc<dyn Wake>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            waker: self.waker.clone(),
        }
    }
}

impl<T> fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl<T> Dispatcher<T> {
    /// Queues `f` and wakes the consumer.
    ///
    /// Fails only once the queue has been dropped.
    pub fn dispatch(&self, f: impl FnOnce(&T) + Send + 'static) -> Result<(), DispatchError> {
        self.tx
            .send(Box::new(f))
            .map_err(|_| DispatchError::Closed)?;
        self.waker.wake();
        Ok(())
    }
}

/// Consumer end, owned by the thread the tasks must run on.
pub struct DispatchQueue<T> {
    rx: Receiver<Task<T>>,
}

impl<T> fmt::Debug for DispatchQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchQueue").finish_non_exhaustive()
    }
}

impl<T> DispatchQueue<T> {
    /// Runs every task queued before this call, in order, and returns how
    /// many ran. Tasks queued while draining wait for the next wake.
    pub fn drain(&self, target: &T) -> usize {
        let tasks: Vec<Task<T>> = self.rx.try_iter().collect();
        let count = tasks.len();
        for task in tasks {
            task(target);
        }
        count
    }
}

/// Creates a connected dispatcher/queue pair.
pub fn channel<T>(waker: impl Wake + 'static) -> (Dispatcher<T>, DispatchQueue<T>) {
    let (tx, rx) = mpsc::channel();
    (
        Dispatcher {
            tx,
            waker: Arc::new(waker),
        },
        DispatchQueue { rx },
    )
}
