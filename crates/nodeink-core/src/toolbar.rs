//! Toolbar registry and nested bars.
//!
//! The toolbar keeps exactly one control selected and drives the tool
//! transitions: the outgoing tool is deactivated and stripped of any handler
//! it left behind before the incoming tool is activated.

use crate::events::{Channel, EventDispatcher};
use crate::graph::Graph;
use crate::selection::Selection;
use crate::tools::{Tool, ToolContext, ToolKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Name of the nested bar shown by the select tool.
pub const LAYOUT_BAR: &str = "layout";

/// Toolbar errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("No control for tool: {0}")]
    UnknownTool(ToolKind),
    #[error("Operation not available: {0:?}")]
    OperationUnavailable(LayoutOp),
}

/// Operations offered by the layout nested bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutOp {
    AlignLeft,
}

impl LayoutOp {
    /// Apply the operation to the selection.
    ///
    /// Layout is not implemented; operations leave the graph unchanged.
    pub fn apply(&self, _graph: &mut Graph, selection: &Selection) {
        log::debug!("{:?} requested for {} entities, not implemented", self, selection.len());
    }
}

/// A secondary control panel shown only while its owning tool is active.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedBar {
    name: String,
    operations: Vec<LayoutOp>,
    visible: bool,
}

impl NestedBar {
    pub fn new(name: impl Into<String>, operations: Vec<LayoutOp>) -> Self {
        Self {
            name: name.into(),
            operations,
            visible: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operations(&self) -> &[LayoutOp] {
        &self.operations
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The layout bar with its alignment operations.
pub fn layout_bar() -> NestedBar {
    NestedBar::new(LAYOUT_BAR, vec![LayoutOp::AlignLeft])
}

/// Registered nested bars; at most one is shown at a time.
#[derive(Debug, Clone, Default)]
pub struct NestedBars {
    bars: HashMap<String, NestedBar>,
    active: Option<String>,
}

impl NestedBars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bar. It starts hidden.
    pub fn add(&mut self, mut bar: NestedBar) {
        bar.visible = false;
        if self.active.as_deref() == Some(bar.name()) {
            self.active = None;
        }
        self.bars.insert(bar.name.clone(), bar);
    }

    /// Show a registered bar, hiding the current one.
    ///
    /// Returns false if no bar has that name; nothing is shown then.
    pub fn show(&mut self, name: &str) -> bool {
        self.hide();
        match self.bars.get_mut(name) {
            Some(bar) => {
                bar.visible = true;
                self.active = Some(name.to_string());
                true
            }
            None => {
                log::warn!("Unknown nested bar: {}", name);
                false
            }
        }
    }

    /// Hide the bar currently shown, if any.
    pub fn hide(&mut self) {
        if let Some(name) = self.active.take() {
            if let Some(bar) = self.bars.get_mut(&name) {
                bar.visible = false;
            }
        }
    }

    /// The bar currently shown.
    pub fn active(&self) -> Option<&NestedBar> {
        self.active.as_ref().and_then(|name| self.bars.get(name))
    }

    pub fn get(&self, name: &str) -> Option<&NestedBar> {
        self.bars.get(name)
    }
}

struct Control {
    tool: Box<dyn Tool>,
    /// Channels the tool registered and has not unregistered yet.
    owned: Vec<Channel>,
}

/// A set of mutually exclusive tool controls.
pub struct Toolbar {
    controls: Vec<Control>,
    selected: Option<usize>,
}

impl fmt::Debug for Toolbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolbar")
            .field("tools", &self.kinds().collect::<Vec<_>>())
            .field("selected", &self.selected())
            .finish()
    }
}

impl Toolbar {
    /// Create a toolbar with the given tools. Nothing is selected yet.
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        let mut toolbar = Self {
            controls: Vec::new(),
            selected: None,
        };
        for tool in tools {
            toolbar.add_tool(tool);
        }
        toolbar
    }

    /// Add a control. A tool of the same kind that is not selected is replaced.
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        let kind = tool.kind();
        match self.index_of(kind) {
            Some(index) if Some(index) == self.selected => {
                log::warn!("Not replacing the active tool {}", kind);
            }
            Some(index) => {
                self.controls[index] = Control {
                    tool,
                    owned: Vec::new(),
                };
            }
            None => self.controls.push(Control {
                tool,
                owned: Vec::new(),
            }),
        }
    }

    /// Tools in toolbar order.
    pub fn kinds(&self) -> impl Iterator<Item = ToolKind> + '_ {
        self.controls.iter().map(|c| c.tool.kind())
    }

    /// The selected tool.
    pub fn selected(&self) -> Option<ToolKind> {
        self.selected.map(|index| self.controls[index].tool.kind())
    }

    /// Channels the given tool currently holds handlers on.
    pub fn owned_channels(&self, kind: ToolKind) -> &[Channel] {
        match self.index_of(kind) {
            Some(index) => &self.controls[index].owned,
            None => &[],
        }
    }

    fn index_of(&self, kind: ToolKind) -> Option<usize> {
        self.controls.iter().position(|c| c.tool.kind() == kind)
    }

    /// Make `kind` the selected tool.
    ///
    /// Selecting the tool that is already selected restarts it.
    pub fn select(
        &mut self,
        kind: ToolKind,
        dispatcher: &mut EventDispatcher,
        selection: &mut Selection,
        nested_bars: &mut NestedBars,
    ) -> Result<(), ToolError> {
        let index = self.index_of(kind).ok_or(ToolError::UnknownTool(kind))?;
        self.deselect(dispatcher, selection, nested_bars);

        log::debug!("Activating tool {}", kind);
        self.selected = Some(index);
        let control = &mut self.controls[index];
        let mut ctx = ToolContext::new(dispatcher, selection, nested_bars, &mut control.owned);
        control.tool.activate(&mut ctx);
        Ok(())
    }

    /// Deactivate the selected tool, leaving no tool selected.
    pub fn deselect(
        &mut self,
        dispatcher: &mut EventDispatcher,
        selection: &mut Selection,
        nested_bars: &mut NestedBars,
    ) {
        let Some(index) = self.selected.take() else {
            return;
        };
        let control = &mut self.controls[index];
        let kind = control.tool.kind();
        log::debug!("Deactivating tool {}", kind);
        {
            let mut ctx = ToolContext::new(dispatcher, selection, nested_bars, &mut control.owned);
            control.tool.deactivate(&mut ctx);
        }
        for channel in control.owned.drain(..) {
            log::warn!("Tool {} left a handler on {:?}; removing it", kind, channel);
            dispatcher.remove_handler(channel);
        }
        nested_bars.hide();
        selection.revoke_permissions();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Permissions;
    use crate::tools::builtin_tools;

    struct Session {
        toolbar: Toolbar,
        dispatcher: EventDispatcher,
        selection: Selection,
        nested_bars: NestedBars,
    }

    impl Session {
        fn new() -> Self {
            let mut nested_bars = NestedBars::new();
            nested_bars.add(layout_bar());
            Self {
                toolbar: Toolbar::new(builtin_tools()),
                dispatcher: EventDispatcher::new(),
                selection: Selection::new(),
                nested_bars,
            }
        }

        fn select(&mut self, kind: ToolKind) -> Result<(), ToolError> {
            self.toolbar.select(
                kind,
                &mut self.dispatcher,
                &mut self.selection,
                &mut self.nested_bars,
            )
        }

        fn channels(&self) -> Vec<Channel> {
            let mut channels: Vec<Channel> = self.dispatcher.channels().collect();
            channels.sort_by_key(|c| format!("{:?}", c));
            channels
        }
    }

    /// Registers a handler and "forgets" to remove it on deactivation.
    struct LeakyTool;

    impl Tool for LeakyTool {
        fn kind(&self) -> ToolKind {
            ToolKind::Remove
        }

        fn activate(&mut self, ctx: &mut ToolContext<'_>) {
            ctx.register(Channel::Remove, Box::new(crate::tools::RemoveHandler));
            ctx.set_permissions(Permissions::ALL);
        }
    }

    #[test]
    fn test_transitions_balance_handlers() {
        let mut s = Session::new();
        s.select(ToolKind::Select).unwrap();
        assert_eq!(s.channels(), vec![Channel::Drag]);
        assert!(s.nested_bars.get(LAYOUT_BAR).unwrap().is_visible());

        s.select(ToolKind::AddNode).unwrap();
        assert_eq!(s.channels(), vec![Channel::Create]);
        assert!(!s.nested_bars.get(LAYOUT_BAR).unwrap().is_visible());

        s.select(ToolKind::Remove).unwrap();
        assert_eq!(s.channels(), vec![Channel::Remove]);
        assert_eq!(s.selection.permissions(), Permissions::NONE);
        assert_eq!(s.toolbar.selected(), Some(ToolKind::Remove));
        assert!(s.toolbar.owned_channels(ToolKind::Select).is_empty());
        assert_eq!(s.toolbar.owned_channels(ToolKind::Remove), &[Channel::Remove]);
    }

    #[test]
    fn test_reselect_restarts_tool() {
        let mut s = Session::new();
        s.select(ToolKind::AddEdge).unwrap();
        s.select(ToolKind::AddEdge).unwrap();
        assert_eq!(s.channels(), vec![Channel::Create]);
        assert_eq!(s.toolbar.selected(), Some(ToolKind::AddEdge));
    }

    #[test]
    fn test_leftover_handlers_are_removed() {
        let mut s = Session::new();
        s.toolbar.add_tool(Box::new(LeakyTool));
        s.select(ToolKind::Remove).unwrap();
        assert_eq!(s.selection.permissions(), Permissions::ALL);

        s.select(ToolKind::AddNode).unwrap();
        assert_eq!(s.channels(), vec![Channel::Create]);
        assert_eq!(s.selection.permissions(), Permissions::NONE);
    }

    #[test]
    fn test_unknown_tool() {
        let mut s = Session {
            toolbar: Toolbar::new(Vec::new()),
            ..Session::new()
        };
        assert_eq!(s.select(ToolKind::Select), Err(ToolError::UnknownTool(ToolKind::Select)));
        assert_eq!(s.toolbar.selected(), None);
    }

    #[test]
    fn test_nested_bars() {
        let mut bars = NestedBars::new();
        bars.add(layout_bar());
        bars.add(NestedBar::new("other", Vec::new()));

        assert!(bars.show(LAYOUT_BAR));
        assert!(bars.show("other"));
        assert!(!bars.get(LAYOUT_BAR).unwrap().is_visible());
        assert_eq!(bars.active().map(NestedBar::name), Some("other"));

        assert!(!bars.show("missing"));
        assert!(bars.active().is_none());
        assert!(!bars.get("other").unwrap().is_visible());
    }

    #[test]
    fn test_align_left_is_a_stub() {
        let mut graph = Graph::new();
        graph.create_node(Some("a")).unwrap().set_pos(5.0, 5.0);
        let selection = Selection::new();
        LayoutOp::AlignLeft.apply(&mut graph, &selection);
        assert_eq!(graph.node("a").unwrap().pos(), kurbo::Point::new(5.0, 5.0));
    }
}
