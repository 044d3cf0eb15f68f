//! Win32 window hosting a WebView2 browser, with a JSON RPC bridge between
//! page script and bound Rust callables.

#![cfg(windows)]

pub mod error;
pub mod installer;
pub mod loader;
pub mod platform;
pub mod webview;

pub use edgeview_core::binding::{Binding, IntoReply, Json, Params};
pub use edgeview_core::dispatch::Dispatcher;
pub use edgeview_core::rpc::UnknownMethodPolicy;
pub use edgeview_core::types::{
    RuntimeOptions, Size, SizeHint, WebViewOptions, WindowOptions,
};
pub use error::{Error, Result};
pub use webview::WebView;
