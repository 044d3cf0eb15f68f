//! Demo host: a window whose page calls back into Rust.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(windows)]
fn main() -> std::process::ExitCode {
    demo::run()
}

#[cfg(not(windows))]
fn main() -> std::process::ExitCode {
    eprintln!("edgeview-demo only runs on Windows");
    std::process::ExitCode::FAILURE
}

#[cfg(windows)]
mod demo {
    use edgeview_core::types::config::{CONFIG_FILE_NAME, WebViewOptions};
    #[cfg(feature = "embedded-runtime")]
    use edgeview_windows::{installer, loader};
    use edgeview_windows::platform::{dialogs, single_instance};
    use edgeview_windows::{Error, Result, WebView};
    use serde_json::{Value, json};
    use std::path::Path;
    use std::process::ExitCode;
    use std::thread;
    use std::time::Duration;
    use tracing::{error, info, warn};
    use tracing_subscriber::EnvFilter;

    const INSTANCE_MUTEX: &str = r"Local\EdgeviewDemo";

    const PAGE: &str = r#"<!doctype html>
<html>
<body style="font-family: sans-serif">
  <h1>edgeview</h1>
  <p id="sum"></p>
  <p id="greeting"></p>
  <p id="ticks"></p>
  <script>
    add(2, 3).then(v => sum.textContent = "add(2, 3) = " + v);
    total(1, 2, 3, 4).then(v => sum.textContent += ", total(1, 2, 3, 4) = " + v);
    greet("").catch(e => greeting.textContent = "greet failed: " + e);
    greet("world").then(v => greeting.textContent = v.message);
  </script>
</body>
</html>"#;

    pub fn run() -> ExitCode {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_env("EDGEVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(true)
            .init();

        let _guard = match single_instance::acquire(INSTANCE_MUTEX) {
            Ok(guard) => guard,
            Err(Error::AlreadyRunning) => {
                info!("another instance is running");
                return ExitCode::SUCCESS;
            }
            Err(err) => {
                error!(error = %err, "failed to take the instance lock");
                return ExitCode::FAILURE;
            }
        };

        register_runtime_images();
        let options = load_options();
        match start(options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!(error = %err, "edgeview demo failed");
                if matches!(err, Error::Settings(_)) {
                    dialogs::error("edgeview", &err.to_string());
                }
                ExitCode::FAILURE
            }
        }
    }

    /// Gives the installer and loader something to fall back on when the
    /// machine has no runtime. Without the feature, a bootstrapper or loader
    /// DLL placed next to the executable is picked up instead.
    #[cfg(feature = "embedded-runtime")]
    fn register_runtime_images() {
        installer::set_embedded_bootstrapper(include_bytes!(env!("EDGEVIEW_BOOTSTRAPPER")));
        loader::set_embedded_image(include_bytes!(env!("EDGEVIEW_LOADER_DLL")));
        info!("registered embedded WebView2 runtime images");
    }

    #[cfg(not(feature = "embedded-runtime"))]
    fn register_runtime_images() {}

    fn load_options() -> WebViewOptions {
        let path = WebViewOptions::path(Path::new("."));
        let options = match WebViewOptions::load(&path) {
            Ok(options) => options,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring config file");
                WebViewOptions::default()
            }
        };
        for problem in options.validate() {
            warn!(file = CONFIG_FILE_NAME, "{problem}");
        }
        options.with_defaults_for_invalid()
    }

    fn start(options: WebViewOptions) -> Result<()> {
        let view = WebView::new(options)?;

        view.bind("add", |(a, b): (i64, i64)| a + b)?;
        view.bind_variadic("total", |(): (), values: Vec<f64>| {
            values.iter().sum::<f64>()
        })?;
        view.bind("greet", |(name,): (String,)| {
            if name.is_empty() {
                return Err("name is empty");
            }
            Ok(json!({ "message": format!("Hello, {name}!") }))
        })?;

        let dispatcher = view.dispatcher();
        thread::spawn(move || {
            for tick in 1u32.. {
                thread::sleep(Duration::from_secs(1));
                let script = format!(
                    "document.getElementById('ticks').textContent = {};",
                    Value::from(format!("{tick} s"))
                );
                let queued = dispatcher.dispatch(move |view: &WebView| {
                    if let Err(err) = view.eval(&script) {
                        warn!(tick, error = %err, "failed to update ticker");
                    }
                });
                if queued.is_err() {
                    break;
                }
            }
        });

        view.set_html(PAGE)?;
        view.run();
        Ok(())
    }
}
