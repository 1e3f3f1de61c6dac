//! Gesture scripts replayed through an editor session.
//!
//! A script is JSON lines, one command per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! {"op": "key", "key": "N"}
//! {"op": "pointer", "kind": "click", "position": {"x": 50.0, "y": 50.0}}
//! {"op": "node", "name": "a", "position": {"x": 0.0, "y": 0.0}}
//! ```

use crate::config::{AppError, AppResult};
use crate::shortcuts::ShortcutRegistry;
use kurbo::Point;
use nodeink_core::{DomainEvent, Editor, Graph, LayoutOp, PointerEvent, ToolKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptCommand {
    /// Select a tool by name.
    Tool { tool: ToolKind },
    /// Press a shortcut key.
    Key { key: String },
    /// Feed a pointer gesture to the active tool.
    Pointer(PointerEvent),
    /// Create a named node directly.
    Node {
        name: String,
        #[serde(default)]
        position: Option<Point>,
    },
    /// Create an edge directly.
    Edge { src: String, dst: String },
    /// Run a nested bar operation.
    Layout { operation: LayoutOp },
    /// Empty the graph.
    Reset,
}

/// Parse a script. Blank lines and lines starting with `#` are skipped.
pub fn parse_script(text: &str) -> AppResult<Vec<ScriptCommand>> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = serde_json::from_str(line).map_err(|source| AppError::Script {
            line: index + 1,
            source,
        })?;
        commands.push(command);
    }
    Ok(commands)
}

/// Outcome of a replay.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Commands executed.
    pub commands: usize,
    /// Commands that were rejected.
    pub failures: usize,
    /// Domain events produced, in delivery order.
    pub events: Vec<DomainEvent>,
}

/// Run commands against the editor.
///
/// A rejected command is logged and counted; replay continues with the next.
pub fn replay(editor: &mut Editor, commands: &[ScriptCommand]) -> ReplayReport {
    let mut report = ReplayReport::default();
    for command in commands {
        report.commands += 1;
        if let Err(reason) = run_command(editor, command, &mut report.events) {
            log::warn!("Command {} rejected: {}", report.commands, reason);
            report.failures += 1;
        }
    }
    report
}

fn run_command(
    editor: &mut Editor,
    command: &ScriptCommand,
    events: &mut Vec<DomainEvent>,
) -> Result<(), String> {
    match command {
        ScriptCommand::Tool { tool } => editor.activate_tool(*tool).map_err(|e| e.to_string()),
        ScriptCommand::Key { key } => {
            let tool = ShortcutRegistry::resolve(key).ok_or_else(|| format!("No shortcut for key {key}"))?;
            editor.activate_tool(tool).map_err(|e| e.to_string())
        }
        ScriptCommand::Pointer(event) => {
            for event in editor.pointer(event.clone()) {
                log::info!("{:?}", event);
                events.push(event);
            }
            Ok(())
        }
        ScriptCommand::Node { name, position } => {
            let node = editor
                .graph_mut()
                .create_node(Some(name))
                .map_err(|e| e.to_string())?;
            if let Some(pos) = position {
                node.set_pos(pos.x, pos.y);
            }
            Ok(())
        }
        ScriptCommand::Edge { src, dst } => editor
            .graph_mut()
            .create_edge(src.as_str(), dst.as_str())
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ScriptCommand::Layout { operation } => editor
            .run_nested_operation(*operation)
            .map_err(|e| e.to_string()),
        ScriptCommand::Reset => {
            editor.reset();
            Ok(())
        }
    }
}

/// JSON summary of a graph, with nodes and edges in name order.
pub fn graph_summary(graph: &Graph) -> Value {
    let mut nodes: Vec<_> = graph.nodes().collect();
    nodes.sort_by(|a, b| a.name().cmp(b.name()));
    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_by_key(|edge| edge.key());

    json!({
        "name": graph.name(),
        "directed": graph.is_directed(),
        "nodes": nodes.iter().map(|node| {
            let pos = node.pos();
            json!({
                "name": node.name(),
                "label": node.label(),
                "pos": [pos.x, pos.y],
            })
        }).collect::<Vec<_>>(),
        "edges": edges.iter().map(|edge| {
            json!({
                "key": edge.key().as_str(),
                "src": edge.src(),
                "dst": edge.dst(),
            })
        }).collect::<Vec<_>>(),
    })
}
