//! Named native callables invokable from page script.
//!
//! A binding declares its parameter decoders and result encoder when it is
//! registered: the parameter tuple type drives positional decoding through
//! [`Params`], and the closure's return type drives encoding through
//! [`IntoReply`]. The table itself only ever sees type-erased handlers.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

mod params;
mod reply;

pub use error::CallError;
pub use params::Params;
pub use reply::{IntoReply, Json};

pub mod error {
    use super::Arity;
    use thiserror::Error;

    /// Reasons a call is rejected back to the page.
    ///
    /// The `Display` text is what the page-side promise is rejected with.
    #[derive(Debug, Error)]
    pub enum CallError {
        #[error("function arguments mismatch")]
        ArgumentsMismatch { expected: Arity, got: usize },

        #[error("invalid argument {index}: {source}")]
        Decode {
            index: usize,
            source: serde_json::Error,
        },

        #[error("{0}")]
        Encode(#[source] serde_json::Error),

        /// Error value returned by the bound callable itself.
        #[error("{0}")]
        Failed(String),

        #[error("unknown method: {0}")]
        UnknownMethod(String),
    }
}

/// Parameter count a binding accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arity {
    /// Number of positional parameters before the rest parameter, if any.
    pub fixed: usize,
    pub variadic: bool,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        if self.variadic {
            count >= self.fixed
        } else {
            count == self.fixed
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variadic {
            write!(f, "at least {}", self.fixed)
        } else {
            write!(f, "exactly {}", self.fixed)
        }
    }
}

type Handler = dyn Fn(&[Value]) -> Result<Value, CallError> + Send + Sync;

/// A type-erased bound callable together with its arity.
#[derive(Clone)]
pub struct Binding {
    arity: Arity,
    handler: Arc<Handler>,
}

impl Binding {
    /// Wraps a callable taking a fixed parameter tuple.
    ///
    /// ```
    /// use edgeview_core::Binding;
    ///
    /// let add = Binding::new(|(a, b): (i64, i64)| a + b);
    /// assert_eq!(add.arity().fixed, 2);
    /// ```
    pub fn new<P, R, F>(f: F) -> Self
    where
        P: Params,
        R: IntoReply,
        F: Fn(P) -> R + Send + Sync + 'static,
    {
        Self {
            arity: Arity {
                fixed: P::ARITY,
                variadic: false,
            },
            handler: Arc::new(move |params: &[Value]| f(P::decode(params)?).into_reply()),
        }
    }

    /// Wraps a callable taking a fixed parameter tuple plus a trailing rest
    /// parameter. Params past the fixed ones decode into `T`.
    pub fn variadic<P, T, R, F>(f: F) -> Self
    where
        P: Params,
        T: DeserializeOwned,
        R: IntoReply,
        F: Fn(P, Vec<T>) -> R + Send + Sync + 'static,
    {
        Self {
            arity: Arity {
                fixed: P::ARITY,
                variadic: true,
            },
            handler: Arc::new(move |params: &[Value]| {
                let (fixed, rest) = params.split_at(P::ARITY);
                let fixed = P::decode(fixed)?;
                let rest = rest
                    .iter()
                    .enumerate()
                    .map(|(offset, value)| {
                        T::deserialize(value).map_err(|source| CallError::Decode {
                            index: P::ARITY + offset,
                            source,
                        })
                    })
                    .collect::<Result<Vec<T>, _>>()?;
                f(fixed, rest).into_reply()
            }),
        }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Checks arity, decodes every param, then invokes.
    ///
    /// The callable is never reached if any of the checks fail.
    pub fn call(&self, params: &[Value]) -> Result<Value, CallError> {
        if !self.arity.accepts(params.len()) {
            return Err(CallError::ArgumentsMismatch {
                expected: self.arity,
                got: params.len(),
            });
        }
        (self.handler)(params)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Per-window table of bound names.
///
/// Reads happen on every incoming call, writes only when a name is bound.
#[derive(Default)]
pub struct Bindings {
    table: RwLock<HashMap<String, Binding>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to a fixed-arity callable. Returns `true` if an earlier
    /// binding with the same name was replaced.
    pub fn bind<P, R, F>(&self, name: impl Into<String>, f: F) -> bool
    where
        P: Params,
        R: IntoReply,
        F: Fn(P) -> R + Send + Sync + 'static,
    {
        self.insert(name, Binding::new(f))
    }

    /// Binds `name` to a callable with a trailing rest parameter.
    pub fn bind_variadic<P, T, R, F>(&self, name: impl Into<String>, f: F) -> bool
    where
        P: Params,
        T: DeserializeOwned,
        R: IntoReply,
        F: Fn(P, Vec<T>) -> R + Send + Sync + 'static,
    {
        self.insert(name, Binding::variadic(f))
    }

    pub fn insert(&self, name: impl Into<String>, binding: Binding) -> bool {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.insert(name.into(), binding).is_some()
    }

    /// Returns a handle to the binding. The table lock is released before the
    /// caller invokes it.
    pub fn get(&self, name: &str) -> Option<Binding> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
