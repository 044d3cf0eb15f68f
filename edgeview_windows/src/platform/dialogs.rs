//! Modal message boxes.

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    IDOK, MB_ICONERROR, MB_ICONINFORMATION, MB_ICONWARNING, MB_OK, MB_OKCANCEL, MessageBoxW,
};
use windows::core::HSTRING;

/// Asks an OK/Cancel question. Returns `true` on OK.
pub fn confirm(caption: &str, text: &str) -> bool {
    let result = unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(text),
            &HSTRING::from(caption),
            MB_OKCANCEL | MB_ICONINFORMATION,
        )
    };
    result == IDOK
}

pub fn error(caption: &str, text: &str) {
    let _ = unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(text),
            &HSTRING::from(caption),
            MB_OK | MB_ICONERROR,
        )
    };
}

pub fn warning(owner: Option<HWND>, caption: &str, text: &str) {
    let _ = unsafe {
        MessageBoxW(
            owner,
            &HSTRING::from(text),
            &HSTRING::from(caption),
            MB_OK | MB_ICONWARNING,
        )
    };
}
