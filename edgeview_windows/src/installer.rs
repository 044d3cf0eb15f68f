//! WebView2 runtime detection and bootstrap install.

use crate::platform::dialogs;
use edgeview_core::runtime::{
    self, BOOTSTRAPPER_ARGS, BOOTSTRAPPER_FILE_NAME, Bootstrapper, VERSION_VALUE,
};
use edgeview_core::types::RuntimeOptions;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::System::Registry::{
    HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ, RegGetValueW,
};
use windows::core::HSTRING;

pub use edgeview_core::runtime::InstallError;

static EMBEDDED_BOOTSTRAPPER: OnceLock<&'static [u8]> = OnceLock::new();

/// Registers the bootstrapper image staged when no `bootstrapper_path` is
/// configured. It takes precedence over a `MicrosoftEdgeWebview2Setup.exe`
/// next to the executable. Only the first registration is kept.
pub fn set_embedded_bootstrapper(image: &'static [u8]) -> bool {
    EMBEDDED_BOOTSTRAPPER.set(image).is_ok()
}

/// Installed runtime version, checking the machine-wide install before the
/// per-user one.
pub fn installed_version() -> Option<String> {
    let key = HSTRING::from(runtime::current_client_key_path());
    [HKEY_LOCAL_MACHINE, HKEY_CURRENT_USER]
        .into_iter()
        .filter_map(|root| read_version(root, &key))
        .find(|version| runtime::is_installed(Some(version.as_str())))
}

fn read_version(root: HKEY, key: &HSTRING) -> Option<String> {
    let value = HSTRING::from(VERSION_VALUE);
    let mut size = 0u32;
    let status = unsafe {
        RegGetValueW(
            root,
            key,
            &value,
            RRF_RT_REG_SZ,
            None,
            None,
            Some(&mut size as *mut u32),
        )
    };
    if status != ERROR_SUCCESS || size == 0 {
        return None;
    }

    let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
    let status = unsafe {
        RegGetValueW(
            root,
            key,
            &value,
            RRF_RT_REG_SZ,
            None,
            Some(buffer.as_mut_ptr().cast()),
            Some(&mut size as *mut u32),
        )
    };
    if status != ERROR_SUCCESS {
        return None;
    }
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    Some(String::from_utf16_lossy(&buffer[..len]))
}

/// Makes sure the runtime is present, offering to install it when it is not.
///
/// Declining the prompt is not an error here; creating the browser fails
/// later instead. Install failures are shown to the user before returning.
pub fn ensure_runtime(options: &RuntimeOptions) -> Result<(), InstallError> {
    if let Some(version) = installed_version() {
        debug!(version = %version, "WebView2 runtime found");
        return Ok(());
    }

    if !dialogs::confirm(&options.prompt_title, &options.prompt_text) {
        warn!("WebView2 runtime install declined");
        return Ok(());
    }

    info!("installing WebView2 runtime");
    match install(options) {
        Ok(()) => {
            info!("WebView2 runtime installed");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "WebView2 runtime install failed");
            dialogs::error(
                &options.error_title,
                &format!("{}\n\n{err}", options.failure_text),
            );
            Err(err)
        }
    }
}

fn install(options: &RuntimeOptions) -> Result<(), InstallError> {
    let bundled = bundled_bootstrapper();
    let scratch = runtime::scratch_dir(&std::env::temp_dir());
    Bootstrapper::select(
        options.bootstrapper_path.as_deref(),
        EMBEDDED_BOOTSTRAPPER.get().copied(),
        bundled.as_deref(),
        &scratch,
    )?
    .run(&BOOTSTRAPPER_ARGS)
}

/// A bootstrapper shipped next to the executable, if any.
fn bundled_bootstrapper() -> Option<PathBuf> {
    let path = std::env::current_exe()
        .ok()?
        .with_file_name(BOOTSTRAPPER_FILE_NAME);
    path.is_file().then_some(path)
}
