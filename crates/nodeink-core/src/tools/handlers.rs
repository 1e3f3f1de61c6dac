//! Event handlers installed by the built-in tools.

use crate::events::{DomainEvent, Event, EventHandler, HandlerContext, PointerEvent, PointerKind};
use crate::graph::{Entity, EntityRef, Graph};
use kurbo::Point;

/// Selects entities on click and drags selected nodes.
#[derive(Debug, Default)]
pub struct DragHandler {
    /// Pointer position at the last applied move, while a drag is active.
    last: Option<Point>,
}

impl DragHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    fn start(&mut self, pointer: &PointerEvent, ctx: &mut HandlerContext<'_>) {
        self.last = None;
        let Some(target @ EntityRef::Node(_)) = &pointer.target else {
            return;
        };
        if !ctx.selection.can_drag() {
            return;
        }
        if !ctx.selection.is_selected(target) && !ctx.selection.select(target.clone()) {
            return;
        }
        self.last = Some(pointer.position);
    }

    fn move_to(&mut self, position: Point, ctx: &mut HandlerContext<'_>) {
        let Some(last) = self.last else {
            return;
        };
        let delta = position - last;
        self.last = Some(position);
        if delta.x == 0.0 && delta.y == 0.0 {
            return;
        }

        let names: Vec<String> = ctx.selection.selected_nodes().map(str::to_string).collect();
        for name in names {
            let moved = match ctx.graph.node_mut(&name) {
                Some(node) => {
                    let pos = node.pos() + delta;
                    node.set_pos(pos.x, pos.y);
                    true
                }
                None => false,
            };
            if moved {
                ctx.emit(DomainEvent::Changed(EntityRef::Node(name)));
            }
        }
    }
}

impl EventHandler for DragHandler {
    fn handle(&mut self, event: &Event, ctx: &mut HandlerContext<'_>) {
        let Event::Pointer(pointer) = event else {
            return;
        };
        match pointer.kind {
            PointerKind::Click => match &pointer.target {
                Some(target) => {
                    ctx.selection.select(target.clone());
                }
                None => ctx.selection.deselect_all(),
            },
            PointerKind::DragStart => self.start(pointer, ctx),
            PointerKind::DragMove => self.move_to(pointer.position, ctx),
            PointerKind::DragEnd => {
                self.move_to(pointer.position, ctx);
                self.last = None;
            }
        }
    }
}

/// Creates a node wherever the canvas is clicked.
#[derive(Debug, Default)]
pub struct CreateNodeHandler;

impl EventHandler for CreateNodeHandler {
    fn handle(&mut self, event: &Event, ctx: &mut HandlerContext<'_>) {
        let Event::Pointer(PointerEvent {
            kind: PointerKind::Click,
            position,
            ..
        }) = event
        else {
            return;
        };
        match ctx.graph.create_node(None) {
            Ok(node) => {
                node.set_pos(position.x, position.y);
                let created = EntityRef::Node(node.name().to_string());
                log::debug!("Created {:?} at {:?}", created, position);
                ctx.emit(DomainEvent::Created(created));
            }
            Err(e) => log::warn!("Failed to create node: {}", e),
        }
    }
}

/// Interaction that turns pointer gestures into a pair of edge endpoints.
pub trait EdgeDrawing {
    /// Feed a gesture. Returns `(src, dst)` node names once an edge is drawn.
    fn pointer(&mut self, event: &PointerEvent, graph: &Graph) -> Option<(String, String)>;
}

/// Draws an edge by dragging from one node to another.
#[derive(Debug, Default)]
pub struct DragEdgeDrawing {
    src: Option<String>,
}

impl DragEdgeDrawing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node the edge currently being drawn starts from.
    pub fn pending_src(&self) -> Option<&str> {
        self.src.as_deref()
    }
}

impl EdgeDrawing for DragEdgeDrawing {
    fn pointer(&mut self, event: &PointerEvent, graph: &Graph) -> Option<(String, String)> {
        match (event.kind, &event.target) {
            (PointerKind::DragStart, Some(EntityRef::Node(name))) if graph.node(name).is_some() => {
                self.src = Some(name.clone());
                None
            }
            (PointerKind::DragStart, _) => {
                self.src = None;
                None
            }
            (PointerKind::DragEnd, Some(EntityRef::Node(dst))) => {
                let src = self.src.take()?;
                Some((src, dst.clone()))
            }
            (PointerKind::DragEnd, _) => {
                self.src = None;
                None
            }
            _ => None,
        }
    }
}

/// Creates edges from the endpoints an [`EdgeDrawing`] produces.
pub struct CreateEdgeHandler {
    drawing: Box<dyn EdgeDrawing>,
}

impl CreateEdgeHandler {
    pub fn new(drawing: Box<dyn EdgeDrawing>) -> Self {
        Self { drawing }
    }
}

impl EventHandler for CreateEdgeHandler {
    fn handle(&mut self, event: &Event, ctx: &mut HandlerContext<'_>) {
        let Event::Pointer(pointer) = event else {
            return;
        };
        let Some((src, dst)) = self.drawing.pointer(pointer, &*ctx.graph) else {
            return;
        };
        match ctx.graph.create_edge(&src, &dst) {
            Ok(edge) => {
                let created = EntityRef::Edge(edge.key());
                ctx.emit(DomainEvent::Created(created));
            }
            Err(e) => log::warn!("Failed to create edge {} -> {}: {}", src, dst, e),
        }
    }
}

/// Removes the clicked node or edge.
#[derive(Debug, Default)]
pub struct RemoveHandler;

impl EventHandler for RemoveHandler {
    fn handle(&mut self, event: &Event, ctx: &mut HandlerContext<'_>) {
        let Event::Pointer(PointerEvent {
            kind: PointerKind::Click,
            target: Some(target),
            ..
        }) = event
        else {
            return;
        };
        let removed = match target {
            EntityRef::Node(name) => ctx.graph.remove_node(name).map(Entity::Node),
            EntityRef::Edge(key) => ctx.graph.remove_edge(key).map(Entity::Edge),
        };
        match removed {
            Some(entity) => {
                log::debug!("Removed {:?}", entity.to_ref());
                ctx.selection.deselect(target);
                ctx.emit(DomainEvent::Removed(entity));
            }
            None => log::debug!("Nothing to remove at {:?}", target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{Permissions, Selection};

    fn setup() -> (Graph, Selection) {
        let mut graph = Graph::new();
        graph.create_node(Some("a")).unwrap().set_pos(0.0, 0.0);
        graph.create_node(Some("b")).unwrap().set_pos(100.0, 0.0);
        let mut selection = Selection::new();
        selection.set_permissions(Permissions::ALL);
        (graph, selection)
    }

    fn run(handler: &mut dyn EventHandler, graph: &mut Graph, selection: &mut Selection, event: PointerEvent) -> Vec<DomainEvent> {
        let mut ctx = HandlerContext::new(graph, selection);
        handler.handle(&Event::Pointer(event), &mut ctx);
        ctx.take_events()
    }

    #[test]
    fn test_drag_moves_selected_nodes() {
        let (mut graph, mut selection) = setup();
        selection.select(EntityRef::node("b"));
        let mut drag = DragHandler::new();

        run(&mut drag, &mut graph, &mut selection, PointerEvent::drag_start(Point::new(0.0, 0.0), Some(EntityRef::node("a"))));
        assert!(drag.is_dragging());
        assert!(selection.is_selected(&EntityRef::node("a")));

        let events = run(&mut drag, &mut graph, &mut selection, PointerEvent::drag_move(Point::new(5.0, 5.0)));
        assert_eq!(events.len(), 2);
        run(&mut drag, &mut graph, &mut selection, PointerEvent::drag_end(Point::new(10.0, 20.0), None));
        assert!(!drag.is_dragging());

        assert_eq!(graph.node("a").unwrap().pos(), Point::new(10.0, 20.0));
        assert_eq!(graph.node("b").unwrap().pos(), Point::new(110.0, 20.0));
    }

    #[test]
    fn test_drag_requires_permission() {
        let (mut graph, mut selection) = setup();
        selection.set_permissions(Permissions {
            allow_drag: false,
            ..Permissions::ALL
        });
        let mut drag = DragHandler::new();
        run(&mut drag, &mut graph, &mut selection, PointerEvent::drag_start(Point::ZERO, Some(EntityRef::node("a"))));
        assert!(!drag.is_dragging());
        let events = run(&mut drag, &mut graph, &mut selection, PointerEvent::drag_move(Point::new(5.0, 5.0)));
        assert!(events.is_empty());
        assert_eq!(graph.node("a").unwrap().pos(), Point::ZERO);
    }

    #[test]
    fn test_click_selects_and_clears() {
        let (mut graph, mut selection) = setup();
        let mut drag = DragHandler::new();
        run(&mut drag, &mut graph, &mut selection, PointerEvent::click(Point::ZERO, Some(EntityRef::node("a"))));
        run(&mut drag, &mut graph, &mut selection, PointerEvent::click(Point::ZERO, Some(EntityRef::node("b"))));
        assert_eq!(selection.len(), 2);
        run(&mut drag, &mut graph, &mut selection, PointerEvent::click(Point::ZERO, None));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_create_node_at_click() {
        let mut graph = Graph::new();
        let mut selection = Selection::new();
        let events = run(&mut CreateNodeHandler, &mut graph, &mut selection, PointerEvent::click(Point::new(50.0, 60.0), None));
        assert_eq!(graph.node_count(), 1);
        let node = graph.nodes().next().unwrap();
        assert_eq!(node.pos(), Point::new(50.0, 60.0));
        assert_eq!(events, vec![DomainEvent::Created(EntityRef::node(node.name()))]);

        // Drags are ignored.
        run(&mut CreateNodeHandler, &mut graph, &mut selection, PointerEvent::drag_start(Point::ZERO, None));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_drag_edge_drawing() {
        let (graph, _) = setup();
        let mut drawing = DragEdgeDrawing::new();
        assert_eq!(drawing.pointer(&PointerEvent::drag_start(Point::ZERO, Some(EntityRef::node("a"))), &graph), None);
        assert_eq!(drawing.pending_src(), Some("a"));
        assert_eq!(drawing.pointer(&PointerEvent::drag_move(Point::new(3.0, 3.0)), &graph), None);
        assert_eq!(
            drawing.pointer(&PointerEvent::drag_end(Point::ZERO, Some(EntityRef::node("b"))), &graph),
            Some(("a".to_string(), "b".to_string()))
        );
        assert_eq!(drawing.pending_src(), None);

        // Dropping on empty canvas abandons the edge.
        drawing.pointer(&PointerEvent::drag_start(Point::ZERO, Some(EntityRef::node("a"))), &graph);
        assert_eq!(drawing.pointer(&PointerEvent::drag_end(Point::ZERO, None), &graph), None);
        assert_eq!(drawing.pending_src(), None);
    }

    #[test]
    fn test_create_edge_handler() {
        let (mut graph, mut selection) = setup();
        let mut handler = CreateEdgeHandler::new(Box::new(DragEdgeDrawing::new()));
        run(&mut handler, &mut graph, &mut selection, PointerEvent::drag_start(Point::ZERO, Some(EntityRef::node("a"))));
        let events = run(&mut handler, &mut graph, &mut selection, PointerEvent::drag_end(Point::ZERO, Some(EntityRef::node("b"))));
        assert_eq!(events, vec![DomainEvent::Created(EntityRef::edge("a", "b"))]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_create_edge_unresolved_fires_nothing() {
        struct Fixed;
        impl EdgeDrawing for Fixed {
            fn pointer(&mut self, _event: &PointerEvent, _graph: &Graph) -> Option<(String, String)> {
                Some(("a".to_string(), "ghost".to_string()))
            }
        }
        let (mut graph, mut selection) = setup();
        let mut handler = CreateEdgeHandler::new(Box::new(Fixed));
        let events = run(&mut handler, &mut graph, &mut selection, PointerEvent::drag_end(Point::ZERO, None));
        assert!(events.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_node_and_edge() {
        let (mut graph, mut selection) = setup();
        graph.create_edge("a", "b").unwrap();
        selection.select(EntityRef::node("a"));

        let events = run(&mut RemoveHandler, &mut graph, &mut selection, PointerEvent::click(Point::ZERO, Some(EntityRef::node("a"))));
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], DomainEvent::Removed(Entity::Node(n)) if n.name() == "a"));
        assert!(graph.node("a").is_none());
        assert!(graph.node("b").is_some());
        assert!(selection.is_empty());

        let events = run(&mut RemoveHandler, &mut graph, &mut selection, PointerEvent::click(Point::ZERO, Some(EntityRef::edge("a", "b"))));
        assert!(matches!(&events[0], DomainEvent::Removed(Entity::Edge(e)) if e.src() == "a"));
        assert_eq!(graph.edge_count(), 0);

        let events = run(&mut RemoveHandler, &mut graph, &mut selection, PointerEvent::click(Point::ZERO, None));
        assert!(events.is_empty());
    }
}
