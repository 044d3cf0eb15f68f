//! Single instance enforcement using a named mutex.

use crate::error::{Error, Result};
use windows::Win32::{
    Foundation::{CloseHandle, ERROR_ALREADY_EXISTS, GetLastError, HANDLE},
    System::Threading::{CreateMutexW, ReleaseMutex},
};
use windows::core::HSTRING;

/// Guard that releases the mutex when dropped.
pub struct SingleInstanceGuard(HANDLE);

impl Drop for SingleInstanceGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = ReleaseMutex(self.0);
            let _ = CloseHandle(self.0);
        }
    }
}

/// Takes the named mutex `name` (for example `Local\MyApp`).
///
/// Returns [`Error::AlreadyRunning`] if another process holds it.
pub fn acquire(name: &str) -> Result<SingleInstanceGuard> {
    let handle = unsafe { CreateMutexW(None, true, &HSTRING::from(name)) }?;

    if unsafe { GetLastError() } == ERROR_ALREADY_EXISTS {
        let _ = unsafe { CloseHandle(handle) };
        return Err(Error::AlreadyRunning);
    }

    Ok(SingleInstanceGuard(handle))
}
