//! Custom window messages (WM_APP + N).

use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_APP};

/// Posted to the UI thread after a closure is queued; the message loop
/// drains the dispatch queue when it sees this.
pub const DISPATCH: u32 = WM_APP + 1;

/// Wakes the message loop running on `thread_id`.
pub fn post_dispatch(thread_id: u32) {
    if let Err(err) = unsafe { PostThreadMessageW(thread_id, DISPATCH, WPARAM(0), LPARAM(0)) } {
        tracing::warn!(thread_id, error = %err, "failed to wake UI thread");
    }
}
