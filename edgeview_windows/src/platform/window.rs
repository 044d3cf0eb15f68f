//! Window creation and message handling.

use crate::error::Result;
use crate::platform::wm;
use crate::webview::WindowContext;
use edgeview_core::registry::WindowRegistry;
use edgeview_core::types::WindowOptions;
use edgeview_core::types::geometry::{Size, centered_origin};
use std::sync::LazyLock;
use tracing::{debug, warn};
use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
        Graphics::Gdi::UpdateWindow,
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Input::KeyboardAndMouse::SetFocus,
            WindowsAndMessaging::{
                AdjustWindowRect, CW_USEDEFAULT, CreateWindowExW, DefWindowProcW, DestroyWindow,
                DispatchMessageW, GA_ROOT, GWL_STYLE, GetAncestor, GetClientRect, GetMessageW,
                GetSystemMetrics, GetWindowLongPtrW, HICON, IDC_ARROW, IDI_APPLICATION,
                IMAGE_ICON, IsDialogMessageW, LR_DEFAULTSIZE, LR_SHARED, LoadCursorW, LoadIconW,
                LoadImageW, MINMAXINFO, MSG, PostQuitMessage, RegisterClassExW, SM_CXSCREEN,
                SM_CYSCREEN, SW_SHOW, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE,
                SWP_NOZORDER, SetWindowLongPtrW, SetWindowPos, SetWindowTextW, ShowWindow,
                TranslateMessage, WA_INACTIVE, WINDOW_EX_STYLE, WINDOW_STYLE,
                WM_ACTIVATE, WM_CLOSE, WM_DESTROY, WM_GETMINMAXINFO, WM_MOVE, WM_MOVING,
                WM_NCLBUTTONDOWN, WM_SIZE, WNDCLASSEXW, WS_MAXIMIZEBOX, WS_OVERLAPPEDWINDOW,
                WS_THICKFRAME,
            },
        },
    },
    core::{HSTRING, PCWSTR},
};
use windows_strings::w;

/// Contexts of live windows, keyed by handle, for the window procedure.
pub(crate) static CONTEXTS: LazyLock<WindowRegistry<WindowContext>> =
    LazyLock::new(WindowRegistry::new);

const CLASS_NAME: PCWSTR = w!("edgeview");

pub(crate) fn handle_key(hwnd: HWND) -> isize {
    hwnd.0 as isize
}

/// Creates the top-level window described by `options`. The window is not
/// shown yet.
pub(crate) fn create(options: &WindowOptions) -> Result<HWND> {
    unsafe {
        let instance: HINSTANCE = GetModuleHandleW(None)?.into();
        let icon = load_icon(instance, options.icon_id);

        let class = WNDCLASSEXW {
            cbSize: size_of::<WNDCLASSEXW>() as u32,
            lpfnWndProc: Some(wndproc),
            hInstance: instance,
            hIcon: icon,
            hIconSm: icon,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };
        // Zero once the class is already registered by an earlier window.
        RegisterClassExW(&class);

        let size = options.size();
        let (x, y) = if options.center {
            let screen = Size::new(GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN));
            centered_origin(screen, size)
        } else {
            (CW_USEDEFAULT, CW_USEDEFAULT)
        };

        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            CLASS_NAME,
            &HSTRING::from(options.title.as_str()),
            WS_OVERLAPPEDWINDOW,
            x,
            y,
            size.width,
            size.height,
            None,
            None,
            Some(instance),
            None,
        )?;
        debug!(hwnd = ?hwnd.0, width = size.width, height = size.height, "window created");
        Ok(hwnd)
    }
}

fn load_icon(instance: HINSTANCE, icon_id: u16) -> HICON {
    let fallback = || unsafe { LoadIconW(None, IDI_APPLICATION) }.unwrap_or_default();
    if icon_id == 0 {
        return fallback();
    }
    // MAKEINTRESOURCE
    let resource = PCWSTR(icon_id as usize as *const u16);
    match unsafe {
        LoadImageW(
            Some(instance),
            resource,
            IMAGE_ICON,
            0,
            0,
            LR_DEFAULTSIZE | LR_SHARED,
        )
    } {
        Ok(handle) => HICON(handle.0),
        Err(err) => {
            warn!(icon_id, error = %err, "icon resource not found");
            fallback()
        }
    }
}

pub(crate) fn show(hwnd: HWND) {
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
        let _ = SetFocus(Some(hwnd));
    }
}

pub(crate) fn client_rect(hwnd: HWND) -> RECT {
    let mut rect = RECT::default();
    let _ = unsafe { GetClientRect(hwnd, &mut rect) };
    rect
}

pub(crate) fn set_title(hwnd: HWND, title: &str) -> Result<()> {
    unsafe { SetWindowTextW(hwnd, &HSTRING::from(title))? };
    Ok(())
}

/// Adds or removes the thick frame and maximize box.
pub(crate) fn set_resizable(hwnd: HWND, resizable: bool) {
    let frame = (WS_THICKFRAME | WS_MAXIMIZEBOX).0 as isize;
    unsafe {
        let style = GetWindowLongPtrW(hwnd, GWL_STYLE);
        let style = if resizable {
            style | frame
        } else {
            style & !frame
        };
        SetWindowLongPtrW(hwnd, GWL_STYLE, style);
    }
}

/// Resizes the window so its client area is `size`, keeping its position.
pub(crate) fn set_client_size(hwnd: HWND, size: Size) -> Result<()> {
    unsafe {
        let style = WINDOW_STYLE(GetWindowLongPtrW(hwnd, GWL_STYLE) as u32);
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: size.width,
            bottom: size.height,
        };
        AdjustWindowRect(&mut rect, style, false)?;
        SetWindowPos(
            hwnd,
            None,
            0,
            0,
            rect.right - rect.left,
            rect.bottom - rect.top,
            SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOMOVE | SWP_FRAMECHANGED,
        )?;
    }
    Ok(())
}

pub(crate) fn destroy(hwnd: HWND) {
    if let Err(err) = unsafe { DestroyWindow(hwnd) } {
        warn!(hwnd = ?hwnd.0, error = %err, "DestroyWindow failed");
    }
}

pub(crate) fn post_quit() {
    unsafe { PostQuitMessage(0) };
}

/// Pumps messages until `WM_QUIT`. `on_dispatch` runs for every
/// [`wm::DISPATCH`] wake.
pub(crate) fn run_loop(mut on_dispatch: impl FnMut()) {
    let mut msg = MSG::default();
    unsafe {
        // -1 on error, 0 on WM_QUIT
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            if msg.message == wm::DISPATCH {
                on_dispatch();
                continue;
            }

            let root = GetAncestor(msg.hwnd, GA_ROOT);
            if IsDialogMessageW(root, &msg).as_bool() {
                continue;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    // Messages sent before the browser is embedded get default handling.
    let Some(context) = CONTEXTS.get(handle_key(hwnd)) else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };

    unsafe {
        match msg {
            WM_MOVE | WM_MOVING => context.notify_moved(),
            WM_NCLBUTTONDOWN => {
                let _ = SetFocus(Some(hwnd));
                return DefWindowProcW(hwnd, msg, wparam, lparam);
            }
            WM_SIZE => context.fit_browser(),
            WM_ACTIVATE => {
                if (wparam.0 & 0xFFFF) as u32 != WA_INACTIVE {
                    context.on_activate();
                }
            }
            WM_CLOSE => destroy(hwnd),
            WM_DESTROY => {
                CONTEXTS.remove(handle_key(hwnd));
                debug!(hwnd = ?hwnd.0, "window destroyed");
                post_quit();
            }
            WM_GETMINMAXINFO => {
                let info = lparam.0 as *mut MINMAXINFO;
                if let Some(info) = info.as_mut() {
                    let constraints = context.constraints();
                    if let Some(max) = constraints.max_track() {
                        let max = POINT {
                            x: max.width,
                            y: max.height,
                        };
                        info.ptMaxSize = max;
                        info.ptMaxTrackSize = max;
                    }
                    if let Some(min) = constraints.min_track() {
                        info.ptMinTrackSize = POINT {
                            x: min.width,
                            y: min.height,
                        };
                    }
                }
            }
            _ => return DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
    LRESULT(0)
}
