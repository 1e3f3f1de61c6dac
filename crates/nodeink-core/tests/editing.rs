use kurbo::Point;
use nodeink_core::{
    Channel, DomainEvent, EdgeKey, Editor, EditorConfig, Entity, EntityRef, Event, Graph,
    GraphError, HandlerContext, PointerEvent, Permissions, ToolKind,
};
use std::cell::RefCell;
use std::rc::Rc;

fn record(editor: &mut Editor, channel: Channel) -> Rc<RefCell<Vec<DomainEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    editor.subscribe(
        channel,
        Box::new(move |event: &Event, _ctx: &mut HandlerContext<'_>| {
            if let Event::Domain(domain) = event {
                sink.borrow_mut().push(domain.clone());
            }
        }),
    );
    seen
}

fn gesture_channels(editor: &Editor) -> Vec<Channel> {
    Channel::GESTURES
        .into_iter()
        .filter(|c| editor.has_handler(*c))
        .collect()
}

#[test]
fn tool_switches_leave_only_the_active_tools_handlers() {
    let mut editor = Editor::default();
    assert_eq!(gesture_channels(&editor), vec![Channel::Drag]);
    assert_eq!(editor.selection().permissions(), Permissions::ALL);

    editor.activate_tool(ToolKind::AddNode).unwrap();
    assert_eq!(gesture_channels(&editor), vec![Channel::Create]);
    assert_eq!(editor.selection().permissions(), Permissions::NONE);

    editor.activate_tool(ToolKind::Remove).unwrap();
    assert_eq!(gesture_channels(&editor), vec![Channel::Remove]);
    assert!(editor.selection().is_empty());

    editor.activate_tool(ToolKind::Select).unwrap();
    assert_eq!(gesture_channels(&editor), vec![Channel::Drag]);
}

#[test]
fn add_node_click_creates_exactly_one_node() {
    let mut editor = Editor::new(EditorConfig {
        initial_tool: ToolKind::AddNode,
        ..EditorConfig::default()
    });
    let created = record(&mut editor, Channel::Created);

    editor.click(Point::new(50.0, 50.0), None);

    assert_eq!(editor.graph().node_count(), 1);
    let node = editor.graph().nodes().next().unwrap();
    assert_eq!(node.pos(), Point::new(50.0, 50.0));
    assert_eq!(created.borrow().len(), 1);
    assert_eq!(created.borrow()[0], DomainEvent::Created(EntityRef::node(node.name())));
}

#[test]
fn repeated_clicks_get_distinct_names() {
    let mut editor = Editor::new(EditorConfig {
        initial_tool: ToolKind::AddNode,
        ..EditorConfig::default()
    });
    for i in 0..5 {
        editor.click(Point::new(i as f64, 0.0), None);
    }
    assert_eq!(editor.graph().node_count(), 5);
}

#[test]
fn remove_click_removes_only_the_target() {
    let mut editor = Editor::default();
    editor.graph_mut().create_node(Some("a")).unwrap();
    editor.graph_mut().create_node(Some("b")).unwrap();
    let removed = record(&mut editor, Channel::Removed);

    editor.activate_tool(ToolKind::Remove).unwrap();
    editor.click(Point::ZERO, Some(EntityRef::node("a")));

    assert!(editor.graph().node("a").is_none());
    assert!(editor.graph().node("b").is_some());
    let removed = removed.borrow();
    assert_eq!(removed.len(), 1);
    match &removed[0] {
        DomainEvent::Removed(Entity::Node(node)) => assert_eq!(node.name(), "a"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn drag_edge_between_nodes() {
    let mut editor = Editor::default();
    editor.graph_mut().create_node(Some("a")).unwrap();
    editor.graph_mut().create_node(Some("b")).unwrap();
    editor.activate_tool(ToolKind::AddEdge).unwrap();

    editor.pointer(PointerEvent::drag_start(Point::ZERO, Some(EntityRef::node("a"))));
    editor.pointer(PointerEvent::drag_move(Point::new(5.0, 5.0)));
    let events = editor.pointer(PointerEvent::drag_end(
        Point::new(10.0, 10.0),
        Some(EntityRef::node("b")),
    ));

    let key = EdgeKey::new("a", "b");
    assert_eq!(events, vec![DomainEvent::Created(EntityRef::Edge(key.clone()))]);
    let edge = editor.graph().edge(&key).unwrap();
    assert_eq!((edge.src(), edge.dst()), ("a", "b"));
}

#[test]
fn drag_moves_selected_nodes() {
    let mut editor = Editor::default();
    editor.graph_mut().create_node(Some("a")).unwrap().set_pos(0.0, 0.0);
    editor.graph_mut().create_node(Some("b")).unwrap().set_pos(10.0, 0.0);
    let changed = record(&mut editor, Channel::Changed);

    editor.click(Point::ZERO, Some(EntityRef::node("a")));
    editor.click(Point::new(10.0, 0.0), Some(EntityRef::node("b")));
    editor.pointer(PointerEvent::drag_start(Point::ZERO, Some(EntityRef::node("a"))));
    editor.pointer(PointerEvent::drag_end(Point::new(3.0, 4.0), None));

    assert_eq!(editor.graph().node("a").unwrap().pos(), Point::new(3.0, 4.0));
    assert_eq!(editor.graph().node("b").unwrap().pos(), Point::new(13.0, 4.0));
    assert_eq!(changed.borrow().len(), 2);
}

#[test]
fn edges_are_found_by_key() {
    let mut graph = Graph::new();
    graph.create_node(Some("a")).unwrap();
    graph.create_node(Some("bb")).unwrap();
    graph.create_edge("a", "bb").unwrap();

    let key = EdgeKey::new("a", "bb");
    assert_eq!(key.as_str(), "1:2-a-bb");
    assert!(graph.edge(&key).is_some());
    assert!(graph.edge(&EdgeKey::new("bb", "a")).is_none());
}

#[test]
fn node_removal_leaves_edges_behind() {
    let mut graph = Graph::new();
    graph.create_node(Some("a")).unwrap();
    graph.create_node(Some("b")).unwrap();
    graph.create_edge("a", "b").unwrap();

    graph.remove_node("a").unwrap();
    let key = EdgeKey::new("a", "b");
    let edge = graph.edge(&key).unwrap();
    let (src, dst) = graph.edge_endpoints(edge);
    assert!(src.is_none());
    assert_eq!(dst.map(|n| n.name()), Some("b"));
}

#[test]
fn duplicate_and_unresolved_names_are_errors() {
    let mut graph = Graph::new();
    graph.create_node(Some("a")).unwrap();
    assert_eq!(
        graph.create_node(Some("a")).unwrap_err(),
        GraphError::DuplicateName("a".to_string())
    );
    assert_eq!(
        graph.create_edge("a", "missing").unwrap_err(),
        GraphError::UnresolvedEndpoint("missing".to_string())
    );
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
}
