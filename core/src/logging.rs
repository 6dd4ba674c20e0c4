//! Logging sink used by the network façade.
//!
//! The façade only ever emits `info` and `error` lines. `TracingSink`
//! forwards them to `tracing`; tests swap in a recording sink.

use std::fmt;

use serde_json::Value;

/// Severity of a façade log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => f.write_str("info"),
            Level::Error => f.write_str("error"),
        }
    }
}

/// Receives façade log lines. `details` carries structured context such as
/// request and response bodies.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str, details: Option<&Value>);
}

/// Default sink: emits through `tracing` under the `netfactory` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str, details: Option<&Value>) {
        let details = details.map(Value::to_string).unwrap_or_default();
        match level {
            Level::Info => tracing::info!(target: "netfactory", details = %details, "{message}"),
            Level::Error => tracing::error!(target: "netfactory", details = %details, "{message}"),
        }
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: Level, _message: &str, _details: Option<&Value>) {}
}
