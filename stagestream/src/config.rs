//! Configuration for stream pipelines.

use serde::{Deserialize, Serialize};

/// Settings fixed for one pipeline instance at source construction.
///
/// Every downstream stage inherits the configuration of its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Prefix for stage worker thread names.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
    /// Stack size for stage worker threads, in bytes.
    #[serde(default)]
    pub stack_size: Option<usize>,
    /// Whether every forwarded element is logged at trace level.
    #[serde(default)]
    pub trace_elements: bool,
}

fn default_thread_name_prefix() -> String {
    "stagestream".to_string()
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: default_thread_name_prefix(),
            stack_size: None,
            trace_elements: false,
        }
    }
}

impl StreamConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the worker thread name prefix.
    #[must_use]
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Sets the worker thread stack size.
    #[must_use]
    pub const fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Enables or disables per-element trace logging.
    #[must_use]
    pub const fn with_trace_elements(mut self, enabled: bool) -> Self {
        self.trace_elements = enabled;
        self
    }

    /// Builds the thread name for a stage.
    #[must_use]
    pub fn thread_name(&self, stage_index: usize, kind: &str) -> String {
        format!("{}-{}-{}", self.thread_name_prefix, stage_index, kind)
    }
}
