//! Injectable diagnostic sink.

use std::fmt;
use std::sync::Arc;

/// Receives human-readable diagnostic lines from a machine.
///
/// The sink is purely observational. The default sink drops everything;
/// structured `tracing` events are emitted regardless of the sink.
#[derive(Clone, Default)]
pub struct Logger {
    sink: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl Logger {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            sink: Some(Arc::new(sink)),
        }
    }

    /// A logger that discards every line.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_silent(&self) -> bool {
        self.sink.is_none()
    }

    pub(crate) fn emit(&self, line: &str) {
        if let Some(sink) = &self.sink {
            sink(line);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("silent", &self.is_silent())
            .finish()
    }
}
