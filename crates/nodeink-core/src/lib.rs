//! NodeInk Core Library
//!
//! Platform-agnostic core of the NodeInk graph editor: the attributed graph
//! store, selection, tools and event dispatch.

pub mod config;
pub mod editor;
pub mod events;
pub mod graph;
pub mod selection;
pub mod toolbar;
pub mod tools;

pub use config::EditorConfig;
pub use editor::Editor;
pub use events::{MAX_CASCADE, Channel, DomainEvent, Event, EventDispatcher, EventHandler, HandlerContext, PointerEvent, PointerKind};
pub use graph::{Edge, EdgeKey, Entity, EntityRef, Graph, GraphError, GraphResult, Node};
pub use selection::{Permissions, Selection};
pub use toolbar::{LayoutOp, NestedBar, NestedBars, ToolError, Toolbar};
pub use tools::{Tool, ToolContext, ToolKind};
