//! # Invocation Logging
//!
//! Wraps a Lambda handler so that its input event, its result, and any
//! failure are logged as structured records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layer::Embedded;

/// Per-invocation metadata handed to a handler by the Lambda runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    pub function_name: String,
    pub function_version: String,
    pub aws_request_id: String,
}

/// Run `handler` on `event`, logging the invocation and its outcome.
///
/// On success a `lambda result` record carries the serialized result. On
/// failure an `execution error` record carries the error, the event, and
/// the invocation metadata; the error is returned unchanged.
pub fn log_invocation<T, E, F>(event: &Value, ctx: &InvocationContext, handler: F) -> Result<T, E>
where
    F: FnOnce(&Value, &InvocationContext) -> Result<T, E>,
    T: Serialize,
    E: fmt::Display,
{
    let invocation = Embedded::new().with("invocation", event.clone());
    tracing::info!(embedded = %invocation, "lambda invocation");

    match handler(event, ctx) {
        Ok(result) => {
            let rendered = serde_json::to_value(&result)
                .unwrap_or_else(|err| Value::String(format!("<unserializable result: {err}>")));
            let fields = Embedded::new().with("result", rendered);
            tracing::info!(embedded = %fields, "lambda result");
            Ok(result)
        }
        Err(err) => {
            let fields = invocation
                .with("function_name", ctx.function_name.as_str())
                .with("function_version", ctx.function_version.as_str())
                .with("aws_request_id", ctx.aws_request_id.as_str());
            tracing::error!(exception = %err, embedded = %fields, "execution error");
            Err(err)
        }
    }
}
