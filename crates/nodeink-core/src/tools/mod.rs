//! Tool system for the editor.
//!
//! A tool is a mutually exclusive interaction mode. Activating one sets the
//! selection permissions and registers the tool's event handlers;
//! deactivating it unregisters them again.

mod handlers;

pub use handlers::{
    CreateEdgeHandler, CreateNodeHandler, DragEdgeDrawing, DragHandler, EdgeDrawing,
    RemoveHandler,
};

use crate::events::{Channel, EventDispatcher, EventHandler};
use crate::selection::{Permissions, Selection};
use crate::toolbar::{LAYOUT_BAR, NestedBars};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    AddNode,
    AddEdge,
    Remove,
}

impl ToolKind {
    /// All tools in toolbar order.
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Select,
        ToolKind::AddNode,
        ToolKind::AddEdge,
        ToolKind::Remove,
    ];

    /// Human readable name.
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::AddNode => "Add node",
            ToolKind::AddEdge => "Add edge",
            ToolKind::Remove => "Remove",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a tool may touch while it is being activated or deactivated.
pub struct ToolContext<'a> {
    dispatcher: &'a mut EventDispatcher,
    pub selection: &'a mut Selection,
    pub nested_bars: &'a mut NestedBars,
    /// Channels the tool currently owns.
    owned: &'a mut Vec<Channel>,
}

impl<'a> ToolContext<'a> {
    pub(crate) fn new(
        dispatcher: &'a mut EventDispatcher,
        selection: &'a mut Selection,
        nested_bars: &'a mut NestedBars,
        owned: &'a mut Vec<Channel>,
    ) -> Self {
        Self {
            dispatcher,
            selection,
            nested_bars,
            owned,
        }
    }

    /// Register a handler on behalf of the tool.
    pub fn register(&mut self, channel: Channel, handler: Box<dyn EventHandler>) {
        self.dispatcher.add_handler(channel, handler);
        if !self.owned.contains(&channel) {
            self.owned.push(channel);
        }
    }

    /// Unregister a handler the tool registered earlier.
    pub fn unregister(&mut self, channel: Channel) {
        if self.owned.contains(&channel) {
            self.dispatcher.remove_handler(channel);
            self.owned.retain(|c| *c != channel);
        } else {
            log::warn!("Tool tried to unregister {:?}, which it does not own", channel);
        }
    }

    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.selection.set_permissions(permissions);
    }
}

/// An interaction mode that can be placed on a toolbar.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Called when the tool's control becomes selected.
    fn activate(&mut self, ctx: &mut ToolContext<'_>);

    /// Called when another control is selected.
    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {}
}

/// Select and drag nodes and edges.
#[derive(Debug, Default)]
pub struct SelectTool;

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.register(Channel::Drag, Box::new(DragHandler::new()));
        ctx.set_permissions(Permissions::ALL);
        ctx.nested_bars.show(LAYOUT_BAR);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.unregister(Channel::Drag);
        ctx.nested_bars.hide();
    }
}

/// Shared activation for tools that do not work on the selection.
fn clear_selection(ctx: &mut ToolContext<'_>) {
    ctx.set_permissions(Permissions::NONE);
    ctx.selection.deselect_all();
}

/// Add a node wherever the canvas is clicked.
#[derive(Debug, Default)]
pub struct AddNodeTool;

impl Tool for AddNodeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::AddNode
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        clear_selection(ctx);
        ctx.register(Channel::Create, Box::new(CreateNodeHandler));
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.unregister(Channel::Create);
    }
}

/// Factory for the edge drawing interaction used by [`AddEdgeTool`].
pub type EdgeDrawingFactory = Box<dyn Fn() -> Box<dyn EdgeDrawing>>;

/// Add edges between existing nodes.
pub struct AddEdgeTool {
    make_drawing: EdgeDrawingFactory,
}

impl Default for AddEdgeTool {
    fn default() -> Self {
        Self::new(Box::new(|| Box::new(DragEdgeDrawing::new()) as Box<dyn EdgeDrawing>))
    }
}

impl AddEdgeTool {
    /// Use a custom edge drawing interaction. A fresh one is made on every
    /// activation.
    pub fn new(make_drawing: EdgeDrawingFactory) -> Self {
        Self { make_drawing }
    }
}

impl Tool for AddEdgeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::AddEdge
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        clear_selection(ctx);
        let drawing = (self.make_drawing)();
        ctx.register(Channel::Create, Box::new(CreateEdgeHandler::new(drawing)));
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.unregister(Channel::Create);
    }
}

/// Remove the clicked node or edge.
#[derive(Debug, Default)]
pub struct RemoveTool;

impl Tool for RemoveTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Remove
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        clear_selection(ctx);
        ctx.register(Channel::Remove, Box::new(RemoveHandler));
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.unregister(Channel::Remove);
    }
}

/// The built-in tools in toolbar order.
pub fn builtin_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(SelectTool),
        Box::new(AddNodeTool),
        Box::new(AddEdgeTool::default()),
        Box::new(RemoveTool),
    ]
}
