//! WebView2 embedding.

use super::bridge::{Bridge, pwstr_to_string};
use super::browser::Browser;
use crate::error::{Error, Result};
use crate::loader;
use edgeview_core::script;
use std::ffi::c_void;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc;
use tracing::{debug, info};
use webview2_com::Microsoft::Web::WebView2::Win32::{
    COREWEBVIEW2_PERMISSION_KIND, COREWEBVIEW2_PERMISSION_KIND_CLIPBOARD_READ,
    COREWEBVIEW2_PERMISSION_STATE_ALLOW, ICoreWebView2, ICoreWebView2PermissionRequestedEventArgs,
    ICoreWebView2WebMessageReceivedEventArgs,
};
use webview2_com::{
    CreateCoreWebView2ControllerCompletedHandler, CreateCoreWebView2EnvironmentCompletedHandler,
    PermissionRequestedEventHandler, WebMessageReceivedEventHandler,
};
use windows::Win32::Foundation::{E_POINTER, E_UNEXPECTED, HWND};
use windows::Win32::System::Com::CoTaskMemFree;
use windows::core::{HSTRING, PWSTR};

/// Embeds a browser in `hwnd`, pumping messages until both the environment
/// and the controller are ready. Page messages go to `bridge`.
pub(crate) fn embed(hwnd: HWND, data_path: Option<&Path>, bridge: Arc<Bridge>) -> Result<Browser> {
    let loader = loader::loader()?;
    let data_folder = data_path.map(HSTRING::from);
    if let Some(path) = data_path {
        debug!(path = %path.display(), "using browser data folder");
    }

    let (tx, rx) = mpsc::channel();
    CreateCoreWebView2EnvironmentCompletedHandler::wait_for_async_operation(
        Box::new(move |handler| {
            unsafe { loader.create_environment(None, data_folder.as_ref(), &handler)? };
            Ok(())
        }),
        Box::new(move |error_code, environment| {
            error_code?;
            let environment = environment.ok_or_else(|| windows::core::Error::from(E_POINTER))?;
            tx.send(environment)
                .map_err(|_| windows::core::Error::from(E_UNEXPECTED))
        }),
    )?;
    let environment = rx
        .try_recv()
        .map_err(|_| Error::WebView2(webview2_com::Error::TaskCanceled))?;

    let (tx, rx) = mpsc::channel();
    CreateCoreWebView2ControllerCompletedHandler::wait_for_async_operation(
        Box::new(move |handler| {
            unsafe { environment.CreateCoreWebView2Controller(hwnd, &handler)? };
            Ok(())
        }),
        Box::new(move |error_code, controller| {
            error_code?;
            let controller = controller.ok_or_else(|| windows::core::Error::from(E_POINTER))?;
            tx.send(controller)
                .map_err(|_| windows::core::Error::from(E_UNEXPECTED))
        }),
    )?;
    let controller = rx
        .try_recv()
        .map_err(|_| Error::WebView2(webview2_com::Error::TaskCanceled))?;

    let webview = unsafe { controller.CoreWebView2()? };
    setup_webview(&webview, bridge)?;
    unsafe { controller.SetIsVisible(true)? };
    info!(hwnd = ?hwnd.0, "browser embedded");

    Ok(Browser::new(controller, webview))
}

fn setup_webview(webview: &ICoreWebView2, bridge: Arc<Bridge>) -> Result<()> {
    unsafe {
        webview.AddScriptToExecuteOnDocumentCreated(
            &HSTRING::from(script::EXTERNAL_INVOKE_SHIM),
            None,
        )?;

        let mut token = 0i64;
        webview.add_WebMessageReceived(
            &WebMessageReceivedEventHandler::create(Box::new(
                move |_webview_opt, args: Option<ICoreWebView2WebMessageReceivedEventArgs>| {
                    let Some(args) = args else { return Ok(()) };
                    let mut message = PWSTR::null();
                    if args.TryGetWebMessageAsString(&mut message).is_err() || message.is_null() {
                        return Ok(());
                    }

                    let text = pwstr_to_string(message);
                    CoTaskMemFree(Some(message.as_ptr() as *const c_void));
                    bridge.handle_message(&text);
                    Ok(())
                },
            )),
            &mut token,
        )?;

        // Pages may read the clipboard without a prompt.
        webview.add_PermissionRequested(
            &PermissionRequestedEventHandler::create(Box::new(
                |_webview_opt, args: Option<ICoreWebView2PermissionRequestedEventArgs>| {
                    let Some(args) = args else { return Ok(()) };
                    let mut kind = COREWEBVIEW2_PERMISSION_KIND::default();
                    args.PermissionKind(&mut kind)?;
                    if kind == COREWEBVIEW2_PERMISSION_KIND_CLIPBOARD_READ {
                        args.SetState(COREWEBVIEW2_PERMISSION_STATE_ALLOW)?;
                    }
                    Ok(())
                },
            )),
            &mut token,
        )?;
    }
    Ok(())
}
