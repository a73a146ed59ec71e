//! # lcore-log: Structured Logging for Handlers
//!
//! JSON-lines logging on top of `tracing`.
//!
//! - [`JsonEventLayer`] renders every event as one JSON object, stamped with
//!   the level, a UTC timestamp, and the [`ServiceContext`].
//! - [`log_invocation`] logs a handler's input event and its result or error.
//! - [`LogDuration`] logs how long a block of work took.
//!
//! Binaries call [`init`] once at startup. Libraries only emit events.

pub mod context;
pub mod duration;
pub mod invocation;
pub mod layer;

pub use context::ServiceContext;
pub use duration::{DurationGuard, LogDuration};
pub use invocation::{log_invocation, InvocationContext};
pub use layer::{init, Embedded, JsonEventLayer, LogError, EMBEDDED_FIELD};
