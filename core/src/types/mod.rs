pub mod config;
pub mod geometry;

pub use config::{ConfigError, RuntimeOptions, WebViewOptions, WindowOptions};
pub use geometry::{Size, SizeConstraints, SizeHint};
