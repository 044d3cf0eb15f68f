//! Win32 platform abstractions.

pub mod dialogs;
pub mod single_instance;
pub(crate) mod window;
pub mod wm;
