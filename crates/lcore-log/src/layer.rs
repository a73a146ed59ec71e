//! # JSON Event Layer
//!
//! A `tracing_subscriber` layer that writes each event as a single JSON
//! object per line. The event message lands under `event`; the remaining
//! fields keep their JSON kind. `level`, the [`ServiceContext`] fields and a
//! UTC `ts` are appended to every record.
//!
//! Field names in `tracing` are static. Records with runtime-chosen keys or
//! nested JSON values pass them through an [`Embedded`] field, which the
//! layer flattens into the top level of the record.

use std::fmt;
use std::io::Write;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

use crate::context::ServiceContext;

/// Name of the field whose JSON object is merged into the record.
pub const EMBEDDED_FIELD: &str = "embedded";

/// Errors raised while installing the logging pipeline.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A global subscriber was installed before [`init`] ran.
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// A JSON object carried through a `tracing` field.
///
/// Record it with the `%` sigil under [`EMBEDDED_FIELD`]:
///
/// ```ignore
/// let extra = Embedded::new().with("invocation", event.clone());
/// tracing::info!(embedded = %extra, "lambda invocation");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Embedded(pub Map<String, Value>);

impl Embedded {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl From<Map<String, Value>> for Embedded {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl fmt::Display for Embedded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Renders events as JSON lines into `W`.
pub struct JsonEventLayer<W> {
    context: ServiceContext,
    make_writer: W,
}

impl<W> JsonEventLayer<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    pub fn new(context: ServiceContext, make_writer: W) -> Self {
        Self {
            context,
            make_writer,
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Assemble the record for one event.
    pub fn render(&self, level: &Level, fields: Map<String, Value>) -> Map<String, Value> {
        let mut record = Map::new();
        if let Some(event) = fields.get("event") {
            record.insert("event".into(), event.clone());
        }
        for (key, value) in fields {
            record.entry(key).or_insert(value);
        }
        record.insert("level".into(), Value::from(level.to_string().to_ascii_lowercase()));
        self.context.write_into(&mut record);
        record.insert(
            "ts".into(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        record
    }
}

impl<S, W> Layer<S> for JsonEventLayer<W>
where
    S: Subscriber,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);
        let record = self.render(event.metadata().level(), visitor.fields);

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        let mut writer = self.make_writer.make_writer_for(event.metadata());
        // Nowhere to report a failed log write.
        let _ = writeln!(writer, "{line}");
    }
}

/// Collects event fields into a JSON map.
#[derive(Default)]
struct JsonVisitor {
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => {
                self.fields.insert("event".into(), value);
            }
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }

    fn embed(&mut self, field: &Field, text: String) {
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(extra)) => self.fields.extend(extra),
            _ => self.insert(field, Value::String(text)),
        }
    }
}

impl Visit for JsonVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = Number::from_f64(value).map_or(Value::Null, Value::Number);
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == EMBEDDED_FIELD {
            self.embed(field, text);
        } else {
            self.insert(field, Value::String(text));
        }
    }
}

/// Install the JSON layer on stdout as the global subscriber.
///
/// Verbosity comes from `RUST_LOG`, defaulting to `info`.
pub fn init(context: ServiceContext) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(JsonEventLayer::new(context, std::io::stdout))
        .try_init()?;
    Ok(())
}
