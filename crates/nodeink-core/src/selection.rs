//! Selection model and the permissions that constrain it.

use crate::graph::{EntityRef, Graph};
use serde::{Deserialize, Serialize};

/// What the selection currently accepts. Set by the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    pub allow_nodes: bool,
    pub allow_edges: bool,
    pub allow_multiple: bool,
    pub allow_drag: bool,
}

impl Permissions {
    /// Everything allowed.
    pub const ALL: Self = Self {
        allow_nodes: true,
        allow_edges: true,
        allow_multiple: true,
        allow_drag: true,
    };

    /// Nothing allowed.
    pub const NONE: Self = Self {
        allow_nodes: false,
        allow_edges: false,
        allow_multiple: false,
        allow_drag: false,
    };

    /// Check whether the entity kind may be selected at all.
    pub fn accepts(&self, entity: &EntityRef) -> bool {
        match entity {
            EntityRef::Node(_) => self.allow_nodes,
            EntityRef::Edge(_) => self.allow_edges,
        }
    }
}

/// Currently selected nodes and edges.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected entities in selection order.
    selected: Vec<EntityRef>,
    permissions: Permissions,
}

impl Selection {
    /// Create an empty selection that accepts nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Replace the permissions.
    ///
    /// Entries the new permissions would reject are dropped, and the
    /// selection is cut to one entry when multiple selection is disallowed.
    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
        self.selected.retain(|entity| permissions.accepts(entity));
        if !permissions.allow_multiple {
            self.selected.truncate(1);
        }
    }

    /// Revoke all permissions without touching the current entries.
    ///
    /// Used between tools; the next [`Selection::set_permissions`] prunes.
    pub fn revoke_permissions(&mut self) {
        self.permissions = Permissions::NONE;
    }

    /// Select an entity.
    ///
    /// Returns false if the permissions reject it. Unless multiple selection
    /// is allowed, the previous selection is replaced.
    pub fn select(&mut self, entity: EntityRef) -> bool {
        if !self.permissions.accepts(&entity) {
            log::debug!("Selection rejected {:?}", entity);
            return false;
        }
        if !self.permissions.allow_multiple {
            self.selected.clear();
        }
        if !self.selected.contains(&entity) {
            self.selected.push(entity);
        }
        true
    }

    /// Remove one entity from the selection.
    pub fn deselect(&mut self, entity: &EntityRef) {
        self.selected.retain(|e| e != entity);
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, entity: &EntityRef) -> bool {
        self.selected.contains(entity)
    }

    pub fn selected(&self) -> &[EntityRef] {
        &self.selected
    }

    /// Names of the selected nodes.
    pub fn selected_nodes(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().filter_map(|entity| match entity {
            EntityRef::Node(name) => Some(name.as_str()),
            EntityRef::Edge(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether selected nodes may be dragged.
    pub fn can_drag(&self) -> bool {
        self.permissions.allow_drag
    }

    /// Drop entries whose entity is no longer in the graph.
    pub fn retain_existing(&mut self, graph: &Graph) {
        self.selected.retain(|entity| graph.contains(entity));
    }
}
