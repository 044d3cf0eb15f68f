use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Controls the WebView2 runtime check performed before a window is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeOptions {
    /// Offer to install the runtime when it is missing.
    pub auto_install: bool,
    pub prompt_title: String,
    pub prompt_text: String,
    pub error_title: String,
    pub failure_text: String,
    /// Bootstrapper already on disk. When unset, the image registered by the
    /// application is written to a temporary file instead.
    pub bootstrapper_path: Option<PathBuf>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            auto_install: true,
            prompt_title: "WebView2 Runtime Required".to_string(),
            prompt_text: "This application needs the Microsoft Edge WebView2 Runtime.\n\
                          Click OK to install it now."
                .to_string(),
            error_title: "WebView2 Runtime Installation Failed".to_string(),
            failure_text: "The WebView2 Runtime could not be installed. Check that the \
                           network is reachable and that no security software blocks the \
                           installer, then start the application again."
                .to_string(),
            bootstrapper_path: None,
        }
    }
}
