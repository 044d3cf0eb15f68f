//! Routes page messages to bound callables and hands settlements back to the
//! UI thread.

use super::WebView;
use edgeview_core::binding::Bindings;
use edgeview_core::dispatch::Dispatcher;
use edgeview_core::rpc::{self, Settlement, UnknownMethodPolicy};
use tracing::{debug, warn};
use windows::core::PWSTR;

pub(crate) struct Bridge {
    bindings: Bindings,
    policy: UnknownMethodPolicy,
    dispatcher: Dispatcher<WebView>,
}

impl Bridge {
    pub(crate) fn new(policy: UnknownMethodPolicy, dispatcher: Dispatcher<WebView>) -> Self {
        Self {
            bindings: Bindings::new(),
            policy,
            dispatcher,
        }
    }

    pub(crate) fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher<WebView> {
        &self.dispatcher
    }

    /// Handles one string posted by the page.
    ///
    /// Malformed messages and unknown methods are logged and dropped. The
    /// settlement script is not evaluated inline; it is queued so it runs
    /// from the message loop after this event handler returns.
    pub(crate) fn handle_message(&self, text: &str) {
        match rpc::handle_message(&self.bindings, self.policy, text) {
            Ok(Some(settlement)) => self.settle(settlement),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "dropping page message"),
        }
    }

    fn settle(&self, settlement: Settlement) {
        let id = settlement.id();
        debug!(id, resolved = settlement.is_resolve(), "settling call");
        let script = settlement.script();
        let queued = self.dispatcher.dispatch(move |view: &WebView| {
            if let Err(err) = view.eval(&script) {
                warn!(id, error = %err, "failed to settle call");
            }
        });
        if let Err(err) = queued {
            warn!(id, error = %err, "window gone before call settled");
        }
    }
}

pub(crate) fn pwstr_to_string(pwstr: PWSTR) -> String {
    if pwstr.is_null() {
        return String::new();
    }
    unsafe { pwstr.to_string().unwrap_or_default() }
}
