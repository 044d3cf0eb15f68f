//! Script snippets evaluated in the page.

use serde_json::Value;

/// Global table holding the pending promise slots, keyed by call id.
pub const RPC_TABLE: &str = "window._rpc";

/// Gives the page a `window.external.invoke(string)` entry point that
/// forwards to the WebView2 message channel. Installed once per embed.
pub const EXTERNAL_INVOKE_SHIM: &str =
    "window.external = { invoke: function (s) { window.chrome.webview.postMessage(s); } };";

/// Script that defines the page-side proxy for a bound name.
///
/// Calling `window[name](...)` allocates the next sequence id, parks the
/// promise callbacks in the RPC table under it and posts
/// `{id, method, params}` to the native side.
pub fn bootstrap(name: &str) -> String {
    format!(
        r#"(function() {{
  var name = {name};
  var RPC = window._rpc = (window._rpc || {{nextSeq: 1}});
  window[name] = function() {{
    var seq = RPC.nextSeq++;
    var promise = new Promise(function(resolve, reject) {{
      RPC[seq] = {{
        resolve: resolve,
        reject: reject,
      }};
    }});
    window.external.invoke(JSON.stringify({{
      id: seq,
      method: name,
      params: Array.prototype.slice.call(arguments),
    }}));
    return promise;
  }};
}})()"#,
        name = js_string(name)
    )
}

/// Resolves the promise parked under `id` with `value` and clears the slot.
pub fn resolve(id: i64, value: &Value) -> String {
    format!("{RPC_TABLE}[{id}].resolve({value}); {RPC_TABLE}[{id}] = undefined")
}

/// Rejects the promise parked under `id` with `reason` and clears the slot.
pub fn reject(id: i64, reason: &str) -> String {
    format!(
        "{RPC_TABLE}[{id}].reject({}); {RPC_TABLE}[{id}] = undefined",
        js_string(reason)
    )
}

/// Quotes `s` as a JSON string literal, which is also a valid JS literal.
pub fn js_string(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_embeds_json_value() {
        assert_eq!(
            resolve(7, &json!({"ok": true})),
            r#"window._rpc[7].resolve({"ok":true}); window._rpc[7] = undefined"#
        );
        assert_eq!(
            resolve(1, &Value::Null),
            "window._rpc[1].resolve(null); window._rpc[1] = undefined"
        );
    }

    #[test]
    fn reject_quotes_reason() {
        assert_eq!(
            reject(3, "bad \"input\"\n"),
            r#"window._rpc[3].reject("bad \"input\"\n"); window._rpc[3] = undefined"#
        );
    }

    #[test]
    fn bootstrap_quotes_name() {
        let script = bootstrap("say\"hi");
        assert!(script.contains(r#"var name = "say\"hi";"#));
        assert!(script.contains("window._rpc = (window._rpc || {nextSeq: 1})"));
        assert!(script.contains("window.external.invoke(JSON.stringify({"));
        assert!(script.trim_end().ends_with("})()"));
    }
}
