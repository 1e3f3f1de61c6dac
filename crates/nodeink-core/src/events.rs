//! Event channels and synchronous dispatch.
//!
//! Pointer gestures are delivered on the gesture channels ([`Channel::Drag`],
//! [`Channel::Create`], [`Channel::Remove`]) to whatever handlers the active
//! tool registered there. Handlers mutate the graph through a
//! [`HandlerContext`] and queue [`DomainEvent`]s, which are delivered on the
//! domain channels before dispatch returns.

use crate::graph::{Entity, EntityRef, Graph};
use crate::selection::Selection;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Upper bound on domain events delivered by one dispatch.
pub const MAX_CASCADE: usize = 1024;

/// Named event channels. Each holds at most one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Dragging entities around.
    Drag,
    /// Creating nodes or edges.
    Create,
    /// Removing nodes or edges.
    Remove,
    /// Something was added to the graph.
    Created,
    /// Something was removed from the graph.
    Removed,
    /// An existing entity's attributes changed.
    Changed,
}

impl Channel {
    /// Channels that receive pointer gestures.
    pub const GESTURES: [Channel; 3] = [Channel::Drag, Channel::Create, Channel::Remove];
}

/// Kind of pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Click,
    DragStart,
    DragMove,
    DragEnd,
}

/// A pointer gesture in canvas-relative coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    /// Entity under the pointer, if any.
    #[serde(default)]
    pub target: Option<EntityRef>,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Point, target: Option<EntityRef>) -> Self {
        Self {
            kind,
            position,
            target,
        }
    }

    pub fn click(position: Point, target: Option<EntityRef>) -> Self {
        Self::new(PointerKind::Click, position, target)
    }

    pub fn drag_start(position: Point, target: Option<EntityRef>) -> Self {
        Self::new(PointerKind::DragStart, position, target)
    }

    pub fn drag_move(position: Point) -> Self {
        Self::new(PointerKind::DragMove, position, None)
    }

    pub fn drag_end(position: Point, target: Option<EntityRef>) -> Self {
        Self::new(PointerKind::DragEnd, position, target)
    }
}

/// Notification fired after a successful graph mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    Created(EntityRef),
    /// Carries the removed entity, which is no longer in the graph.
    Removed(Entity),
    Changed(EntityRef),
}

impl DomainEvent {
    /// The channel this event is delivered on.
    pub fn channel(&self) -> Channel {
        match self {
            DomainEvent::Created(_) => Channel::Created,
            DomainEvent::Removed(_) => Channel::Removed,
            DomainEvent::Changed(_) => Channel::Changed,
        }
    }
}

/// Payload delivered to handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Pointer(PointerEvent),
    Domain(DomainEvent),
}

/// Mutable state a handler may touch while it runs.
pub struct HandlerContext<'a> {
    pub graph: &'a mut Graph,
    pub selection: &'a mut Selection,
    pending: Vec<DomainEvent>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(graph: &'a mut Graph, selection: &'a mut Selection) -> Self {
        Self {
            graph,
            selection,
            pending: Vec::new(),
        }
    }

    /// Queue a domain event for delivery once the current handler returns.
    ///
    /// Subscribers may emit too, but a single dispatch delivers at most
    /// [`MAX_CASCADE`] events.
    pub fn emit(&mut self, event: DomainEvent) {
        self.pending.push(event);
    }

    /// Take the queued domain events without delivering them.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Receives events fired on a channel.
pub trait EventHandler {
    fn handle(&mut self, event: &Event, ctx: &mut HandlerContext<'_>);
}

impl<F> EventHandler for F
where
    F: FnMut(&Event, &mut HandlerContext<'_>),
{
    fn handle(&mut self, event: &Event, ctx: &mut HandlerContext<'_>) {
        self(event, ctx)
    }
}

/// Maps channels to their handler.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<Channel, Box<dyn EventHandler>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("channels", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing and returning any previous one.
    pub fn add_handler(
        &mut self,
        channel: Channel,
        handler: Box<dyn EventHandler>,
    ) -> Option<Box<dyn EventHandler>> {
        let previous = self.handlers.insert(channel, handler);
        if previous.is_some() {
            log::debug!("Replaced handler on {:?}", channel);
        }
        previous
    }

    /// Unregister the handler on a channel.
    pub fn remove_handler(&mut self, channel: Channel) -> Option<Box<dyn EventHandler>> {
        self.handlers.remove(&channel)
    }

    pub fn has_handler(&self, channel: Channel) -> bool {
        self.handlers.contains_key(&channel)
    }

    /// Channels that currently have a handler.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.handlers.keys().copied()
    }

    /// Invoke the handler on `channel` inline. Returns false if there is none.
    pub fn fire(&mut self, channel: Channel, event: &Event, ctx: &mut HandlerContext<'_>) -> bool {
        match self.handlers.get_mut(&channel) {
            Some(handler) => {
                handler.handle(event, ctx);
                true
            }
            None => false,
        }
    }

    /// Deliver a pointer gesture to every gesture channel, then deliver the
    /// domain events it produced (and any those produce in turn).
    ///
    /// Returns the domain events in delivery order.
    pub fn dispatch_pointer(
        &mut self,
        event: PointerEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Vec<DomainEvent> {
        log::trace!("Dispatching {:?}", event);
        let event = Event::Pointer(event);
        for channel in Channel::GESTURES {
            self.fire(channel, &event, ctx);
        }
        self.drain(ctx)
    }

    /// Fire a domain event directly, then drain whatever it triggers.
    pub fn dispatch_domain(
        &mut self,
        event: DomainEvent,
        ctx: &mut HandlerContext<'_>,
    ) -> Vec<DomainEvent> {
        ctx.emit(event);
        self.drain(ctx)
    }

    fn drain(&mut self, ctx: &mut HandlerContext<'_>) -> Vec<DomainEvent> {
        let mut delivered = Vec::new();
        let mut queue: VecDeque<DomainEvent> = ctx.take_events().into();
        while let Some(domain) = queue.pop_front() {
            if delivered.len() >= MAX_CASCADE {
                log::warn!(
                    "Domain event cascade exceeded {} events; dropping {} queued",
                    MAX_CASCADE,
                    queue.len() + 1
                );
                break;
            }
            let channel = domain.channel();
            let event = Event::Domain(domain);
            self.fire(channel, &event, ctx);
            queue.extend(ctx.take_events());
            if let Event::Domain(domain) = event {
                delivered.push(domain);
            }
        }
        delivered
    }
}
