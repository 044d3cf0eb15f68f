//! Page-to-native call handling.
//!
//! Incoming messages are `{"id": <int>, "method": <string>, "params": [...]}`.
//! Replies are not messages: each handled call yields a [`Settlement`] whose
//! script resolves or rejects the page-side promise parked under `id`.

use crate::binding::{Bindings, CallError};
use crate::script;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid RPC message: {0}")]
    InvalidMessage(#[from] serde_json::Error),
}

/// One call posted by the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: i64,
    pub method: String,
    /// Missing or `null` params count as an empty list.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RpcRequest {
    pub fn parse(text: &str) -> Result<Self, RpcError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// What happens to a call whose method name has no binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownMethodPolicy {
    /// Drop the call. The page-side promise stays pending.
    #[default]
    Ignore,
    /// Reject the page-side promise with `unknown method: <name>`.
    Reject,
}

/// Outcome of a handled call, addressed to its promise slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Settlement {
    Resolve { id: i64, value: Value },
    Reject { id: i64, reason: String },
}

impl Settlement {
    pub fn id(&self) -> i64 {
        match self {
            Settlement::Resolve { id, .. } | Settlement::Reject { id, .. } => *id,
        }
    }

    pub fn is_resolve(&self) -> bool {
        matches!(self, Settlement::Resolve { .. })
    }

    /// Script that settles the promise in the page.
    pub fn script(&self) -> String {
        match self {
            Settlement::Resolve { id, value } => script::resolve(*id, value),
            Settlement::Reject { id, reason } => script::reject(*id, reason),
        }
    }

    fn from_result(id: i64, result: Result<Value, CallError>) -> Self {
        match result {
            Ok(value) => Settlement::Resolve { id, value },
            Err(err) => Settlement::Reject {
                id,
                reason: err.to_string(),
            },
        }
    }
}

/// Runs one request against the binding table.
///
/// Returns `None` only for an unbound method under
/// [`UnknownMethodPolicy::Ignore`].
pub fn call(
    bindings: &Bindings,
    policy: UnknownMethodPolicy,
    request: &RpcRequest,
) -> Option<Settlement> {
    let Some(binding) = bindings.get(&request.method) else {
        return match policy {
            UnknownMethodPolicy::Ignore => {
                warn!(
                    id = request.id,
                    method = %request.method,
                    "no binding for method, call dropped"
                );
                None
            }
            UnknownMethodPolicy::Reject => Some(Settlement::from_result(
                request.id,
                Err(CallError::UnknownMethod(request.method.clone())),
            )),
        };
    };

    let result = binding.call(&request.params);
    if let Err(err) = &result {
        debug!(id = request.id, method = %request.method, error = %err, "call rejected");
    }
    Some(Settlement::from_result(request.id, result))
}

/// Parses a raw page message and runs it.
///
/// A message that does not parse has no id to answer, so it surfaces as an
/// error for the caller to log.
pub fn handle_message(
    bindings: &Bindings,
    policy: UnknownMethodPolicy,
    text: &str,
) -> Result<Option<Settlement>, RpcError> {
    let request = RpcRequest::parse(text)?;
    Ok(call(bindings, policy, &request))
}

#[cfg(test)]
mod tests;
