//! # Service Context
//!
//! Describes where the process is running. Every rendered log line carries
//! these fields so records from many functions can be told apart once they
//! reach a shared sink.

use serde::Serialize;
use serde_json::{Map, Value};

/// Deployment identity attached to every log record.
///
/// Outside a Lambda runtime the fields fall back to local defaults
/// (`dev`, `0`, the machine's host name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceContext {
    pub function_name: String,
    pub function_version: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl ServiceContext {
    /// Read the context from the process environment, using the system
    /// host name when `AWS_REGION` is unset.
    pub fn from_env() -> Self {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            || hostname::get().ok().and_then(|h| h.into_string().ok()),
        )
    }

    /// Build the context from an arbitrary variable lookup and host name
    /// source. The host name is only consulted when `AWS_REGION` is unset.
    ///
    /// Empty values for `SERVICE`, `STACK` and `STAGE` count as unset.
    pub fn from_lookup<F, H>(lookup: F, host_name: H) -> Self
    where
        F: Fn(&str) -> Option<String>,
        H: FnOnce() -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            function_name: lookup("AWS_LAMBDA_FUNCTION_NAME").unwrap_or_else(|| "dev".into()),
            function_version: lookup("AWS_LAMBDA_FUNCTION_VERSION")
                .unwrap_or_else(|| "0".into()),
            region: lookup("AWS_REGION")
                .or_else(|| host_name().filter(|host| !host.is_empty()))
                .unwrap_or_else(|| "localhost".into()),
            service: non_empty("SERVICE"),
            stack: non_empty("STACK"),
            stage: non_empty("STAGE"),
        }
    }

    /// Add the context fields to `record`, keeping any key it already has.
    pub fn write_into(&self, record: &mut Map<String, Value>) {
        if let Ok(Value::Object(fields)) = serde_json::to_value(self) {
            for (key, value) in fields {
                record.entry(key).or_insert(value);
            }
        }
    }
}

impl Default for ServiceContext {
    fn default() -> Self {
        Self::from_lookup(|_| None, || None)
    }
}
