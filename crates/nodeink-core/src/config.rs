//! Editor session configuration.

use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};

/// Settings for a new editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Name given to the graph.
    pub graph_name: String,
    /// Whether the graph is directed.
    pub directed: bool,
    /// Tool selected when the session starts.
    pub initial_tool: ToolKind,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            graph_name: String::new(),
            directed: false,
            initial_tool: ToolKind::Select,
        }
    }
}
