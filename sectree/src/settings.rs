use serde::Deserialize;

const DEFAULT_ROW_HEIGHT: f32 = 44.0;
const DEFAULT_HEADER_HEIGHT: f32 = 28.0;
const DEFAULT_WORKER_NAME: &str = "sectree-worker";

/// Options for a [`crate::TreeEngine`].
///
/// Heights are layout hints handed through to the display layer; the engine
/// never interprets them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Height of a row cell.
    pub row_height: f32,
    /// Height of a section header.
    pub header_height: f32,
    /// Name of the worker thread.
    pub worker_name: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            header_height: DEFAULT_HEADER_HEIGHT,
            worker_name: DEFAULT_WORKER_NAME.to_string(),
        }
    }
}

impl EngineSettings {
    pub fn with_row_height(mut self, height: f32) -> Self {
        self.row_height = height;
        self
    }

    pub fn with_header_height(mut self, height: f32) -> Self {
        self.header_height = height;
        self
    }

    pub fn with_worker_name(mut self, name: &str) -> Self {
        self.worker_name = name.to_string();
        self
    }
}
