//! Sampling parameter injection into `/messages` request bodies.

use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::config::SamplingOverrides;
use crate::observability::logging::truncate_for_log;

/// One applied override, kept for logging only.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamChange {
    pub field: &'static str,
    /// Caller-supplied value, `None` if the key was absent.
    pub previous: Option<Value>,
    pub applied: Value,
}

impl std::fmt::Display for ParamChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.previous {
            Some(previous) => write!(f, "{}: {} -> {}", self.field, previous, self.applied),
            None => write!(f, "{}: (absent) -> {}", self.field, self.applied),
        }
    }
}

/// Outbound body plus the changes that produced it.
#[derive(Debug, Clone)]
pub struct RewriteResult {
    pub body: Bytes,
    pub changes: Vec<ParamChange>,
}

impl RewriteResult {
    fn unchanged(body: Bytes) -> Self {
        Self {
            body,
            changes: Vec::new(),
        }
    }

    /// True when the body was re-encoded.
    pub fn is_modified(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Force the configured sampling parameters onto a request body.
///
/// Bodies that are empty, not JSON, or not a JSON object are returned as-is so
/// the upstream can reject them with its own error. The original bytes are
/// also returned when every override already matched, so number formatting
/// never drifts on untouched requests.
pub fn rewrite_body(body: Bytes, overrides: &SamplingOverrides, is_target: bool) -> RewriteResult {
    if !is_target || body.is_empty() {
        return RewriteResult::unchanged(body);
    }

    let mut object = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            tracing::debug!("Request body is not a JSON object, forwarding unchanged");
            return RewriteResult::unchanged(body);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Request body is not valid JSON, forwarding unchanged");
            return RewriteResult::unchanged(body);
        }
    };

    log_request_params(&object);

    let mut changes = Vec::new();
    for (field, applied) in overrides.json_values() {
        let previous = object.insert(field.to_string(), applied.clone());
        if !same_value(previous.as_ref(), &applied) {
            changes.push(ParamChange {
                field,
                previous,
                applied,
            });
        }
    }

    if changes.is_empty() {
        return RewriteResult::unchanged(body);
    }

    match serde_json::to_vec(&Value::Object(object)) {
        Ok(encoded) => RewriteResult {
            body: Bytes::from(encoded),
            changes,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to re-encode request body, forwarding unchanged");
            RewriteResult::unchanged(body)
        }
    }
}

/// Numbers compare by value so that `1` and `1.0` count as equal.
fn same_value(previous: Option<&Value>, applied: &Value) -> bool {
    match (previous, applied) {
        (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(a), b) => a == b,
        (None, _) => false,
    }
}

fn log_request_params(object: &Map<String, Value>) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    tracing::debug!(keys = object.len(), "Request parameters");
    for (key, value) in object {
        tracing::debug!(param = %key, value = %truncate_for_log(&value.to_string()), "  parameter");
    }
}
