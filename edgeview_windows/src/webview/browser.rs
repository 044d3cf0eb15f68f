//! The embedded browser: a WebView2 controller and its core webview.

use webview2_com::Microsoft::Web::WebView2::Win32::{
    COREWEBVIEW2_MOVE_FOCUS_REASON_PROGRAMMATIC, ICoreWebView2, ICoreWebView2Controller,
};
use windows::Win32::Foundation::RECT;
use windows::core::{HSTRING, Result};

pub(crate) struct Browser {
    controller: ICoreWebView2Controller,
    webview: ICoreWebView2,
}

impl Browser {
    pub(crate) fn new(controller: ICoreWebView2Controller, webview: ICoreWebView2) -> Self {
        Self {
            controller,
            webview,
        }
    }

    /// Sets the bounds of the browser within its parent window.
    pub(crate) fn set_bounds(&self, rect: RECT) {
        unsafe {
            let _ = self.controller.SetBounds(rect);
        }
    }

    pub(crate) fn focus(&self) {
        unsafe {
            let _ = self
                .controller
                .MoveFocus(COREWEBVIEW2_MOVE_FOCUS_REASON_PROGRAMMATIC);
        }
    }

    /// Keeps popups such as dropdowns anchored when the parent moves.
    pub(crate) fn notify_parent_moved(&self) {
        unsafe {
            let _ = self.controller.NotifyParentWindowPositionChanged();
        }
    }

    pub(crate) fn navigate(&self, url: &str) -> Result<()> {
        unsafe { self.webview.Navigate(&HSTRING::from(url)) }
    }

    pub(crate) fn navigate_to_string(&self, html: &str) -> Result<()> {
        unsafe { self.webview.NavigateToString(&HSTRING::from(html)) }
    }

    /// Registers `script` to run before page scripts on every navigation.
    pub(crate) fn add_init_script(&self, script: &str) -> Result<()> {
        unsafe {
            self.webview
                .AddScriptToExecuteOnDocumentCreated(&HSTRING::from(script), None)
        }
    }

    /// Runs `script` in the current document. The result is discarded.
    pub(crate) fn execute_script(&self, script: &str) -> Result<()> {
        unsafe { self.webview.ExecuteScript(&HSTRING::from(script), None) }
    }

    /// Context menus and devtools are only available in debug mode.
    pub(crate) fn configure(&self, debug: bool) -> Result<()> {
        unsafe {
            let settings = self.webview.Settings()?;
            settings.SetAreDefaultContextMenusEnabled(debug)?;
            settings.SetAreDevToolsEnabled(debug)?;
        }
        Ok(())
    }
}
