use log::{debug, error, info};
use serde_json::Value;

/// Observer for the RPC wrapper and the demo transaction flow.
///
/// Keeping this behind a trait lets the wrapper and the flow run in tests
/// without capturing console output.
pub trait Diagnostics: Send + Sync {
    /// Called for every outbound RPC before it is routed.
    fn rpc_request(&self, method: &str, patched: bool);

    /// Raw `result` payload the fallback node returned for a patched call.
    fn rpc_fallback_result(&self, method: &str, result: &Value);

    fn flow_step(&self, step: &str);

    fn flow_failure(&self, step: &str, message: &str);
}

/// Routes diagnostics to the `log` facade.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn rpc_request(&self, method: &str, patched: bool) {
        if patched {
            debug!("rpc {method} routed to fallback node");
        } else {
            debug!("rpc {method} forwarded to wallet provider");
        }
    }

    fn rpc_fallback_result(&self, method: &str, result: &Value) {
        debug!("fallback node answered {method}: {result}");
    }

    fn flow_step(&self, step: &str) {
        info!("{step}");
    }

    fn flow_failure(&self, step: &str, message: &str) {
        error!("{step}: {message}");
    }
}

/// Discards everything.
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn rpc_request(&self, _method: &str, _patched: bool) {}
    fn rpc_fallback_result(&self, _method: &str, _result: &Value) {}
    fn flow_step(&self, _step: &str) {}
    fn flow_failure(&self, _step: &str, _message: &str) {}
}
