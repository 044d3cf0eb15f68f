//! Access to the WebView2Loader entry points.
//!
//! The loader DLL is looked up on the system search path first. When that
//! fails, the image registered with [`set_embedded_image`] is written to a
//! per-process scratch directory and loaded from there. Each module is
//! resolved at most once per process.

use edgeview_core::runtime::{self, LOADER_FILE_NAME, StagedFile};
use std::cmp::Ordering;
use std::ffi::c_void;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};
use webview2_com::Microsoft::Web::WebView2::Win32::ICoreWebView2CreateCoreWebView2EnvironmentCompletedHandler;
use windows::Win32::Foundation::HMODULE;
use windows::Win32::System::Com::CoTaskMemFree;
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
use windows::core::{HRESULT, HSTRING, Interface, PCSTR, PCWSTR, PWSTR, s};

type CreateEnvironmentWithOptionsFn =
    unsafe extern "system" fn(PCWSTR, PCWSTR, *mut c_void, *mut c_void) -> HRESULT;
type CompareBrowserVersionsFn = unsafe extern "system" fn(PCWSTR, PCWSTR, *mut i32) -> HRESULT;
type GetAvailableBrowserVersionStringFn = unsafe extern "system" fn(PCWSTR, *mut PWSTR) -> HRESULT;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("unable to load WebView2Loader.dll from disk: {native} -- or from embedded image: {embedded}")]
    Unavailable { native: String, embedded: String },

    #[error(transparent)]
    Windows(#[from] windows::core::Error),
}

static EMBEDDED_IMAGE: OnceLock<&'static [u8]> = OnceLock::new();
static SYSTEM: OnceLock<Result<Loader, String>> = OnceLock::new();
static SIDELOADED: OnceLock<Result<Loader, String>> = OnceLock::new();

/// Registers a copy of `WebView2Loader.dll` to fall back on when the system
/// has none. Only the first registration is kept; returns whether this one was.
pub fn set_embedded_image(image: &'static [u8]) -> bool {
    EMBEDDED_IMAGE.set(image).is_ok()
}

/// Resolved loader entry points.
pub struct Loader {
    module: HMODULE,
    create_environment: CreateEnvironmentWithOptionsFn,
    compare_versions: CompareBrowserVersionsFn,
    available_version: GetAvailableBrowserVersionStringFn,
}

// The module handle is never freed and the entry points are plain functions.
unsafe impl Send for Loader {}
unsafe impl Sync for Loader {}

impl Loader {
    fn load(path: &HSTRING) -> Result<Self, String> {
        unsafe {
            let module = LoadLibraryW(path).map_err(|e| e.to_string())?;
            Ok(Self {
                module,
                create_environment: std::mem::transmute::<
                    unsafe extern "system" fn() -> isize,
                    CreateEnvironmentWithOptionsFn,
                >(proc_address(
                    module,
                    s!("CreateCoreWebView2EnvironmentWithOptions"),
                )?),
                compare_versions: std::mem::transmute::<
                    unsafe extern "system" fn() -> isize,
                    CompareBrowserVersionsFn,
                >(proc_address(module, s!("CompareBrowserVersions"))?),
                available_version: std::mem::transmute::<
                    unsafe extern "system" fn() -> isize,
                    GetAvailableBrowserVersionStringFn,
                >(proc_address(
                    module,
                    s!("GetAvailableCoreWebView2BrowserVersionString"),
                )?),
            })
        }
    }

    pub fn module(&self) -> HMODULE {
        self.module
    }

    /// Starts environment creation; `handler` is invoked when it completes.
    ///
    /// # Safety
    ///
    /// Must be called on a thread with COM initialized as single-threaded
    /// apartment, and the thread must pump messages until the handler runs.
    pub unsafe fn create_environment(
        &self,
        browser_folder: Option<&HSTRING>,
        data_folder: Option<&HSTRING>,
        handler: &ICoreWebView2CreateCoreWebView2EnvironmentCompletedHandler,
    ) -> windows::core::Result<()> {
        unsafe {
            (self.create_environment)(
                optional_pcwstr(browser_folder),
                optional_pcwstr(data_folder),
                std::ptr::null_mut(),
                handler.as_raw(),
            )
            .ok()
        }
    }
}

unsafe fn proc_address(
    module: HMODULE,
    name: PCSTR,
) -> Result<unsafe extern "system" fn() -> isize, String> {
    unsafe { GetProcAddress(module, name) }.ok_or_else(|| {
        format!(
            "missing export {}",
            unsafe { name.to_string() }.unwrap_or_default()
        )
    })
}

fn optional_pcwstr(value: Option<&HSTRING>) -> PCWSTR {
    value.map_or(PCWSTR::null(), |v| PCWSTR(v.as_ptr()))
}

fn load_system() -> Result<Loader, String> {
    Loader::load(&HSTRING::from(LOADER_FILE_NAME))
}

fn load_embedded() -> Result<Loader, String> {
    let image = EMBEDDED_IMAGE
        .get()
        .ok_or_else(|| "no embedded image registered".to_string())?;
    let dir = runtime::scratch_dir(&std::env::temp_dir());
    let path = StagedFile::stage(&dir, LOADER_FILE_NAME, image)
        .map_err(|e| e.to_string())?
        .keep();
    info!(path = %path.display(), "side-loading embedded WebView2Loader");
    Loader::load(&HSTRING::from(path.as_path()))
}

/// Returns the process-wide loader, resolving it on first use.
pub fn loader() -> Result<&'static Loader, LoaderError> {
    let native = match SYSTEM.get_or_init(load_system) {
        Ok(loader) => return Ok(loader),
        Err(err) => err,
    };
    debug!(error = %native, "system WebView2Loader unavailable");

    match SIDELOADED.get_or_init(load_embedded) {
        Ok(loader) => Ok(loader),
        Err(embedded) => Err(LoaderError::Unavailable {
            native: native.clone(),
            embedded: embedded.clone(),
        }),
    }
}

/// Compares two runtime version strings.
pub fn compare_browser_versions(a: &str, b: &str) -> Result<Ordering, LoaderError> {
    let loader = loader()?;
    let (a, b) = (HSTRING::from(a), HSTRING::from(b));
    let mut result = 0i32;
    unsafe {
        (loader.compare_versions)(PCWSTR(a.as_ptr()), PCWSTR(b.as_ptr()), &mut result).ok()?;
    }
    Ok(result.cmp(&0))
}

/// Version of the runtime the loader would pick, or an empty string when
/// none is installed.
pub fn available_browser_version(browser_folder: Option<&Path>) -> Result<String, LoaderError> {
    let loader = loader()?;
    let folder = browser_folder.map(HSTRING::from);
    let mut version = PWSTR::null();
    unsafe {
        (loader.available_version)(optional_pcwstr(folder.as_ref()), &mut version).ok()?;
    }
    if version.is_null() {
        return Ok(String::new());
    }
    let text = unsafe { version.to_string() }.unwrap_or_default();
    unsafe { CoTaskMemFree(Some(version.as_ptr() as *const c_void)) };
    Ok(text)
}
