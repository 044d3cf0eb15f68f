//! The public window type and the per-window state its procedure reads.

mod bridge;
mod browser;
mod init;

use self::bridge::Bridge;
use self::browser::Browser;
use crate::error::{Error, Result};
use crate::installer;
use crate::platform::{dialogs, window, wm};
use edgeview_core::binding::{IntoReply, Params};
use edgeview_core::dispatch::{self, DispatchQueue, Dispatcher};
use edgeview_core::script;
use edgeview_core::types::geometry::{Size, SizeConstraints, SizeHint};
use edgeview_core::types::WebViewOptions;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};
use windows::Win32::Foundation::HWND;
use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx};
use windows::Win32::System::Threading::GetCurrentThreadId;

/// State shared between a [`WebView`] and its window procedure.
pub(crate) struct WindowContext {
    hwnd: HWND,
    autofocus: bool,
    browser: Browser,
    bridge: Arc<Bridge>,
    constraints: Mutex<SizeConstraints>,
}

// COM objects and the window handle are only touched on the UI thread.
unsafe impl Send for WindowContext {}
unsafe impl Sync for WindowContext {}

impl WindowContext {
    /// Stretches the browser over the whole client area.
    pub(crate) fn fit_browser(&self) {
        self.browser.set_bounds(window::client_rect(self.hwnd));
    }

    pub(crate) fn notify_moved(&self) {
        self.browser.notify_parent_moved();
    }

    pub(crate) fn on_activate(&self) {
        if self.autofocus {
            self.browser.focus();
        }
    }

    pub(crate) fn constraints(&self) -> MutexGuard<'_, SizeConstraints> {
        self.constraints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A top-level window hosting a WebView2 browser.
///
/// Must be created, used and dropped on one thread, which also calls
/// [`run`](Self::run). Other threads reach it through a [`Dispatcher`].
///
/// ```compile_fail
/// fn assert_send<T: Send>() {}
/// assert_send::<edgeview_windows::WebView>();
/// ```
///
/// Dropping it destroys the window if it is still open.
pub struct WebView {
    context: Arc<WindowContext>,
    queue: DispatchQueue<WebView>,
    // The browser's COM objects belong to the creating apartment.
    _not_send: PhantomData<*const ()>,
}

impl WebView {
    /// Creates the window and embeds the browser in it.
    ///
    /// Installs the WebView2 runtime first when it is missing and
    /// `options.runtime.auto_install` is set.
    pub fn new(options: WebViewOptions) -> Result<Self> {
        if options.runtime.auto_install {
            installer::ensure_runtime(&options.runtime)?;
        }
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok()? };

        let thread_id = unsafe { GetCurrentThreadId() };
        let (dispatcher, queue) = dispatch::channel(move || wm::post_dispatch(thread_id));
        let bridge = Arc::new(Bridge::new(options.unknown_method, dispatcher));

        let hwnd = window::create(&options.window)?;
        window::show(hwnd);

        let data_path = options.resolved_data_path();
        let browser = match init::embed(hwnd, data_path.as_deref(), bridge.clone()) {
            Ok(browser) => browser,
            Err(err) => {
                window::destroy(hwnd);
                return Err(err);
            }
        };
        if let Err(err) = browser.configure(options.debug) {
            window::destroy(hwnd);
            return Err(Error::Settings(err));
        }

        let context = Arc::new(WindowContext {
            hwnd,
            autofocus: options.autofocus,
            browser,
            bridge,
            constraints: Mutex::new(SizeConstraints::default()),
        });
        window::CONTEXTS.insert(window::handle_key(hwnd), context.clone());
        context.fit_browser();

        let view = Self {
            context,
            queue,
            _not_send: PhantomData,
        };
        if let Some(min) = options.window.min_size {
            view.set_size(min.width, min.height, SizeHint::Min)?;
        }
        if let Some(max) = options.window.max_size {
            view.set_size(max.width, max.height, SizeHint::Max)?;
        }
        info!(hwnd = ?hwnd.0, debug = options.debug, "webview ready");
        Ok(view)
    }

    pub fn hwnd(&self) -> HWND {
        self.context.hwnd
    }

    /// Runs the message loop until the window is destroyed or
    /// [`terminate`](Self::terminate) is called, draining dispatched closures
    /// as they arrive.
    pub fn run(&self) {
        window::run_loop(|| {
            self.queue.drain(self);
        });
    }

    /// Asks the message loop to exit.
    pub fn terminate(&self) {
        window::post_quit();
    }

    /// Exits the message loop and destroys the window.
    pub fn destroy(&self) {
        self.terminate();
        window::destroy(self.hwnd());
    }

    pub fn navigate(&self, url: &str) -> Result<()> {
        Ok(self.context.browser.navigate(url)?)
    }

    /// Replaces the document with `html`.
    pub fn set_html(&self, html: &str) -> Result<()> {
        Ok(self.context.browser.navigate_to_string(html)?)
    }

    /// Registers `js` to run at the start of every document, before page
    /// scripts.
    pub fn init(&self, js: &str) -> Result<()> {
        Ok(self.context.browser.add_init_script(js)?)
    }

    /// Evaluates `js` in the current document without waiting for a result.
    pub fn eval(&self, js: &str) -> Result<()> {
        Ok(self.context.browser.execute_script(js)?)
    }

    pub fn set_title(&self, title: &str) -> Result<()> {
        window::set_title(self.hwnd(), title)
    }

    /// Resizes the client area or records a size limit, depending on `hint`.
    ///
    /// `Min` and `Max` only take effect once both dimensions are positive.
    pub fn set_size(&self, width: i32, height: i32, hint: SizeHint) -> Result<()> {
        let hwnd = self.hwnd();
        window::set_resizable(hwnd, hint.is_resizable());

        let size = Size::new(width, height);
        let resize = self.context.constraints().apply(hint, size);
        if resize {
            window::set_client_size(hwnd, size)?;
            self.context.fit_browser();
        }
        Ok(())
    }

    /// Runs `f` on the UI thread from the message loop.
    pub fn dispatch(&self, f: impl FnOnce(&WebView) + Send + 'static) -> Result<()> {
        Ok(self.context.bridge.dispatcher().dispatch(f)?)
    }

    /// A handle other threads can use to reach this window.
    pub fn dispatcher(&self) -> Dispatcher<WebView> {
        self.context.bridge.dispatcher().clone()
    }

    /// Exposes `f` to page script as `window.<name>(...)`, returning a
    /// promise.
    ///
    /// The proxy is installed for documents loaded after this call. Binding
    /// the same name again replaces the callable.
    pub fn bind<P, R, F>(&self, name: &str, f: F) -> Result<()>
    where
        P: Params,
        R: IntoReply,
        F: Fn(P) -> R + Send + Sync + 'static,
    {
        self.context.bridge.bindings().bind(name, f);
        self.init(&script::bootstrap(name))
    }

    /// Like [`bind`](Self::bind) for callables taking a trailing rest
    /// parameter.
    pub fn bind_variadic<P, T, R, F>(&self, name: &str, f: F) -> Result<()>
    where
        P: Params,
        T: DeserializeOwned,
        R: IntoReply,
        F: Fn(P, Vec<T>) -> R + Send + Sync + 'static,
    {
        self.context.bridge.bindings().bind_variadic(name, f);
        self.init(&script::bootstrap(name))
    }

    /// Shows a modal warning owned by this window.
    pub fn message_box(&self, caption: &str, text: &str) {
        dialogs::warning(Some(self.hwnd()), caption, text);
    }
}

impl Drop for WebView {
    fn drop(&mut self) {
        let hwnd = self.hwnd();
        // Still registered means WM_DESTROY has not run. With the entry gone
        // the window procedure treats the destroy as foreign and posts no quit.
        if window::CONTEXTS.remove(window::handle_key(hwnd)).is_some() {
            debug!(hwnd = ?hwnd.0, "destroying window on drop");
            window::destroy(hwnd);
        }
    }
}
