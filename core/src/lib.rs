//! Platform-independent half of edgeview.
//!
//! Everything here can be exercised without a window: the RPC wire model and
//! dispatcher, the binding table, the script snippets injected into the page,
//! the deferred-closure queue, the window-context registry and the option
//! records the Windows shell is configured with.

pub mod binding;
pub mod dispatch;
pub mod registry;
pub mod rpc;
pub mod runtime;
pub mod script;
pub mod types;

pub use binding::{Binding, Bindings, CallError, IntoReply, Json, Params};
pub use dispatch::{DispatchError, DispatchQueue, Dispatcher, Wake};
pub use registry::WindowRegistry;
pub use rpc::{RpcError, RpcRequest, Settlement, UnknownMethodPolicy};
