//! Errors surfaced by the Windows shell.

use crate::installer::InstallError;
use crate::loader::LoaderError;
use edgeview_core::dispatch::DispatchError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("windows: {0}")]
    Windows(#[from] windows::core::Error),

    /// Failure inside webview2-com's completion plumbing.
    #[error("webview2: {0:?}")]
    WebView2(webview2_com::Error),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("WebView2 runtime install failed: {0}")]
    Install(#[from] InstallError),

    /// The browser settings could not be read or applied during setup.
    #[error("failed to configure browser settings: {0}")]
    Settings(#[source] windows::core::Error),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("another instance is already running")]
    AlreadyRunning,
}

impl From<webview2_com::Error> for Error {
    fn from(err: webview2_com::Error) -> Self {
        match err {
            webview2_com::Error::WindowsError(err) => Error::Windows(err),
            other => Error::WebView2(other),
        }
    }
}
