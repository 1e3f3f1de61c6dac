//! Editor session: the graph plus the tool state that edits it.

use crate::config::EditorConfig;
use crate::events::{Channel, DomainEvent, EventDispatcher, EventHandler, HandlerContext, PointerEvent};
use crate::graph::{EntityRef, Graph};
use crate::selection::Selection;
use crate::toolbar::{LayoutOp, NestedBars, ToolError, Toolbar, layout_bar};
use crate::tools::{Tool, ToolKind, builtin_tools};
use kurbo::Point;
use uuid::Uuid;

/// One user's editing session over one in-memory graph.
#[derive(Debug)]
pub struct Editor {
    /// Unique session identifier.
    id: String,
    graph: Graph,
    selection: Selection,
    dispatcher: EventDispatcher,
    toolbar: Toolbar,
    nested_bars: NestedBars,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create a session with the built-in tools.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_tools(config, builtin_tools())
    }

    /// Create a session with a custom set of tools.
    ///
    /// The configured initial tool is activated right away. If the toolbar
    /// has no such tool the session starts with no tool selected.
    pub fn with_tools(config: EditorConfig, tools: Vec<Box<dyn Tool>>) -> Self {
        let mut nested_bars = NestedBars::new();
        nested_bars.add(layout_bar());

        let mut editor = Self {
            id: Uuid::new_v4().to_string(),
            graph: Graph::with_name(config.graph_name, config.directed),
            selection: Selection::new(),
            dispatcher: EventDispatcher::new(),
            toolbar: Toolbar::new(tools),
            nested_bars,
        };
        log::info!("Editor session {} started", editor.id);
        if let Err(e) = editor.activate_tool(config.initial_tool) {
            log::warn!("Could not activate initial tool: {}", e);
        }
        editor
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Direct access to the graph, bypassing tools and events.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn nested_bars(&self) -> &NestedBars {
        &self.nested_bars
    }

    /// The tool currently selected.
    pub fn active_tool(&self) -> Option<ToolKind> {
        self.toolbar.selected()
    }

    /// Switch to another tool.
    pub fn activate_tool(&mut self, kind: ToolKind) -> Result<(), ToolError> {
        self.toolbar.select(
            kind,
            &mut self.dispatcher,
            &mut self.selection,
            &mut self.nested_bars,
        )
    }

    /// Register a handler on a channel, replacing the previous one.
    ///
    /// Meant for the domain channels; gesture channels belong to the tools.
    pub fn subscribe(&mut self, channel: Channel, handler: Box<dyn EventHandler>) {
        if Channel::GESTURES.contains(&channel) {
            log::warn!("Subscribing to tool channel {:?}", channel);
        }
        self.dispatcher.add_handler(channel, handler);
    }

    pub fn unsubscribe(&mut self, channel: Channel) {
        self.dispatcher.remove_handler(channel);
    }

    pub fn has_handler(&self, channel: Channel) -> bool {
        self.dispatcher.has_handler(channel)
    }

    /// Feed a pointer gesture to the active tool.
    ///
    /// Returns the domain events the gesture produced, after they have been
    /// delivered to subscribers.
    pub fn pointer(&mut self, event: PointerEvent) -> Vec<DomainEvent> {
        let mut ctx = HandlerContext::new(&mut self.graph, &mut self.selection);
        self.dispatcher.dispatch_pointer(event, &mut ctx)
    }

    /// Shorthand for a click gesture.
    pub fn click(&mut self, position: Point, target: Option<EntityRef>) -> Vec<DomainEvent> {
        self.pointer(PointerEvent::click(position, target))
    }

    /// Fire a domain event to its subscriber.
    pub fn fire(&mut self, event: DomainEvent) -> Vec<DomainEvent> {
        let mut ctx = HandlerContext::new(&mut self.graph, &mut self.selection);
        self.dispatcher.dispatch_domain(event, &mut ctx)
    }

    /// Replace the graph with an empty one and clear the selection.
    pub fn reset(&mut self) {
        log::info!("Resetting graph of session {}", self.id);
        self.graph.reset();
        self.selection.deselect_all();
    }

    /// Run an operation from the nested bar currently shown.
    pub fn run_nested_operation(&mut self, op: LayoutOp) -> Result<(), ToolError> {
        let available = self
            .nested_bars
            .active()
            .is_some_and(|bar| bar.operations().contains(&op));
        if !available {
            return Err(ToolError::OperationUnavailable(op));
        }
        op.apply(&mut self.graph, &self.selection);
        Ok(())
    }
}
