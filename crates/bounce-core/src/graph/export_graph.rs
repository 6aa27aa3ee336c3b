//! Export graph — ownership, edge primitives, selection, and notifications.
//!
//! [`ExportGraph`] owns every node of the four levels. Nodes live in a slot
//! arena addressed by generational [`NodeId`]s; freed slots go on a free list
//! and are handed out again under the next generation. Each level keeps an
//! ordered list of the IDs it holds. Parent/child lists are plain `NodeId` relations into that same
//! storage, never ownership.
//!
//! Structural operations ([`split`](ExportGraph::split),
//! [`remove`](ExportGraph::remove), [`materialize`](ExportGraph::materialize))
//! live in sibling modules as further `impl` blocks.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use super::node::{ExportSchema, Level, NodeData, NodeId, Payload};

/// Errors that can occur during graph operations.
///
/// Every variant signals caller misuse or a broken structure, never a
/// recoverable runtime condition. An operation that returns an error leaves the
/// graph exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The handle does not refer to a live node (never existed, or removed).
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// An edge operation named a sibling that is not a child of the parent.
    #[error("{node} is not a child of {parent}")]
    NotAChild {
        /// The parent whose child list was searched.
        parent: NodeId,
        /// The node that was expected among the children.
        node: NodeId,
    },
    /// Edges may only join a level to the level directly below it.
    #[error("cannot connect a {parent} node to a {child} node")]
    LevelMismatch {
        /// Level of the would-be parent.
        parent: Level,
        /// Level of the would-be child.
        child: Level,
    },
    /// Split positions must be finite.
    #[error("split position {0} is not a finite number")]
    InvalidPosition(f32),
    /// [`ExportGraph::check_invariants`] found a structural violation.
    #[error("graph invariant broken: {0}")]
    BrokenInvariant(String),
}

/// Notifications fired by an [`ExportGraph`] to its subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    /// Topology changed (split, remove, purge, edge edit, reset).
    Changed,
    /// A node's selection flag flipped.
    SelectionChanged {
        /// The node whose flag changed.
        node: NodeId,
        /// The new value.
        selected: bool,
    },
}

/// The four nodes of one root-to-leaf chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    /// Root node.
    pub timespan: NodeId,
    /// Channel routing node.
    pub channel_config: NodeId,
    /// Format node.
    pub format: NodeId,
    /// Leaf node.
    pub filename: NodeId,
}

type Observer = Box<dyn FnMut(&GraphEvent)>;

/// One arena entry. `generation` counts how often the slot has been freed.
struct Slot<S: ExportSchema> {
    generation: u32,
    node: Option<NodeData<S>>,
}

/// Four-level expansion graph of export choices.
///
/// # Usage
///
/// 1. Create a graph with [`new()`](Self::new)
/// 2. Seed it: [`create_empty_config()`](Self::create_empty_config), optionally
///    [`add_path()`](Self::add_path) for more independent chains
/// 3. Specialise: [`split()`](Self::split) any node,
///    [`remove()`](Self::remove) unwanted ones
/// 4. Expand: [`materialize()`](Self::materialize) into export jobs
///
/// The graph is single-owner and synchronous. Observers registered with
/// [`subscribe()`](Self::subscribe) receive events by reference and have no
/// access to the graph, so they cannot mutate it mid-operation.
pub struct ExportGraph<S: ExportSchema> {
    nodes: Vec<Slot<S>>,
    free_slots: Vec<u32>,
    pub(super) levels: [Vec<NodeId>; 4],
    observers: Vec<Observer>,
}

impl<S: ExportSchema> fmt::Debug for ExportGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportGraph")
            .field("timespan", &self.levels[0].len())
            .field("channel_config", &self.levels[1].len())
            .field("format", &self.levels[2].len())
            .field("filename", &self.levels[3].len())
            .field("slots", &self.nodes.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<S: ExportSchema> Default for ExportGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ExportSchema> ExportGraph<S> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free_slots: Vec::new(),
            levels: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            observers: Vec::new(),
        }
    }

    // --- Seeding ---

    /// Resets the graph to the minimal one-path configuration.
    ///
    /// Any existing nodes are dropped; their handles become stale. The freed
    /// slots are reused for the new chain under a new generation.
    pub fn create_empty_config(
        &mut self,
        timespan: Vec<S::TimeRange>,
        channel_config: S::ChannelConfig,
        format: S::Format,
        filename: S::Filename,
    ) -> ConfigPath {
        self.clear_nodes();
        let path = self.push_path(timespan, channel_config, format, filename);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_reset: empty config rooted at {}", path.timespan);
        self.notify(GraphEvent::Changed);
        path
    }

    /// Appends another independent root-to-leaf chain after the existing nodes.
    pub fn add_path(
        &mut self,
        timespan: Vec<S::TimeRange>,
        channel_config: S::ChannelConfig,
        format: S::Format,
        filename: S::Filename,
    ) -> ConfigPath {
        let path = self.push_path(timespan, channel_config, format, filename);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: path rooted at {}", path.timespan);
        self.notify(GraphEvent::Changed);
        path
    }

    /// Drops every node. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.clear_nodes();
        self.notify(GraphEvent::Changed);
    }

    // --- Queries ---

    /// Total number of live nodes across all levels.
    pub fn node_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Total number of parent → child edges.
    pub fn edge_count(&self) -> usize {
        self.live_nodes().map(|n| n.children.len()).sum()
    }

    /// True if the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// The nodes of one level, in level order.
    pub fn nodes(&self, level: Level) -> &[NodeId] {
        &self.levels[level.index()]
    }

    /// Returns true if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Level of a node.
    pub fn level_of(&self, id: NodeId) -> Result<Level, GraphError> {
        Ok(self.node(id)?.level())
    }

    /// Ordered position of a node among the nodes of its level.
    pub fn position(&self, id: NodeId) -> Result<usize, GraphError> {
        let level = self.level_of(id)?;
        self.levels[level.index()]
            .iter()
            .position(|&n| n == id)
            .ok_or_else(|| GraphError::BrokenInvariant(format!("{id} missing from {level} list")))
    }

    /// Parents of a node, in the order the edges were added.
    pub fn parents(&self, id: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(&self.node(id)?.parents)
    }

    /// Children of a node, in child order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(&self.node(id)?.children)
    }

    /// The payload carried by a node.
    pub fn payload(&self, id: NodeId) -> Result<&Payload<S>, GraphError> {
        Ok(&self.node(id)?.payload)
    }

    /// Replaces a node's payload.
    ///
    /// The level cannot change: a replacement payload of a different variant
    /// is rejected with [`GraphError::LevelMismatch`].
    pub fn set_payload(&mut self, id: NodeId, payload: Payload<S>) -> Result<(), GraphError> {
        let node = self.node_mut(id)?;
        if node.level() != payload.level() {
            return Err(GraphError::LevelMismatch {
                parent: node.level(),
                child: payload.level(),
            });
        }
        node.payload = payload;
        Ok(())
    }

    /// True if `ancestor` reaches `node` by following child edges.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> Result<bool, GraphError> {
        self.node(node)?;
        let start = &self.node(ancestor)?.children;
        Ok(self.reaches(start, node, |n| &n.children))
    }

    /// True if `descendant` reaches `node` by following parent edges.
    pub fn is_descendant_of(&self, descendant: NodeId, node: NodeId) -> Result<bool, GraphError> {
        self.node(node)?;
        let start = &self.node(descendant)?.parents;
        Ok(self.reaches(start, node, |n| &n.parents))
    }

    // --- Edge primitives ---

    /// Adds the edge `parent → child`.
    ///
    /// With `left_sibling`, the child is placed right after that sibling in the
    /// parent's child order; otherwise it is appended. Returns `Ok(false)` if
    /// the edge already existed.
    ///
    /// Edge edits do not purge: removing edges by hand can orphan nodes until
    /// [`purge_graph()`](Self::purge_graph) runs.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        left_sibling: Option<NodeId>,
    ) -> Result<bool, GraphError> {
        self.check_edge_levels(parent, child)?;
        let added = self.link(parent, child, left_sibling)?;
        if added {
            #[cfg(feature = "tracing")]
            tracing::debug!("graph_connect: {parent} → {child}");
            self.notify(GraphEvent::Changed);
        }
        Ok(added)
    }

    /// Adds the edge `parent → node`, appending to the parent's children.
    pub fn add_parent(&mut self, node: NodeId, parent: NodeId) -> Result<bool, GraphError> {
        self.add_child(parent, node, None)
    }

    /// Removes the edge `parent → child` from both sides.
    ///
    /// Returns `Ok(false)` if there was no such edge.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, GraphError> {
        self.node(parent)?;
        self.node(child)?;
        let removed = self.unlink(parent, child);
        if removed {
            #[cfg(feature = "tracing")]
            tracing::debug!("graph_disconnect: {parent} → {child}");
            self.notify(GraphEvent::Changed);
        }
        Ok(removed)
    }

    /// Removes the edge `parent → node` from both sides.
    pub fn remove_parent(&mut self, node: NodeId, parent: NodeId) -> Result<bool, GraphError> {
        self.remove_child(parent, node)
    }

    // --- Selection ---

    /// Sets a node's selection flag.
    ///
    /// Fires [`GraphEvent::SelectionChanged`] and returns `Ok(true)` only when
    /// the flag actually changes.
    pub fn select(&mut self, id: NodeId, selected: bool) -> Result<bool, GraphError> {
        let node = self.node_mut(id)?;
        if node.selected == selected {
            return Ok(false);
        }
        node.selected = selected;
        self.notify(GraphEvent::SelectionChanged { node: id, selected });
        Ok(true)
    }

    /// Returns a node's selection flag.
    pub fn is_selected(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.node(id)?.selected)
    }

    /// Selected nodes of one level, in level order.
    pub fn selected(&self, level: Level) -> Vec<NodeId> {
        self.levels[level.index()]
            .iter()
            .copied()
            .filter(|&id| self.slot(id).is_some_and(|n| n.selected))
            .collect()
    }

    /// Deselects every node. Returns how many flags changed.
    pub fn clear_selection(&mut self) -> usize {
        let selected: Vec<NodeId> = Level::ALL
            .iter()
            .flat_map(|&level| self.selected(level))
            .collect();
        for &id in &selected {
            if let Some(node) = self.slot_mut(id) {
                node.selected = false;
            }
            self.notify(GraphEvent::SelectionChanged {
                node: id,
                selected: false,
            });
        }
        selected.len()
    }

    // --- Notifications ---

    /// Registers an observer for graph events.
    pub fn subscribe(&mut self, observer: impl FnMut(&GraphEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub(super) fn notify(&mut self, event: GraphEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    // --- Audit ---

    /// Verifies the structural invariants: level lists match the arena, edges
    /// join adjacent levels, edges are symmetric and unique, roots have
    /// children and every other node has a parent.
    pub fn check_invariants(&self) -> Result<(), GraphError> {
        let broken = |msg: String| Err(GraphError::BrokenInvariant(msg));

        let mut listed = HashSet::new();
        for level in Level::ALL {
            for &id in &self.levels[level.index()] {
                let Some(node) = self.slot(id) else {
                    return broken(format!("{level} list holds dead node {id}"));
                };
                if node.level() != level {
                    return broken(format!(
                        "{id} is a {} node in the {level} list",
                        node.level()
                    ));
                }
                if !listed.insert(id) {
                    return broken(format!("{id} listed twice"));
                }
            }
        }
        let live = self.live_nodes().count();
        if live != listed.len() {
            return broken(format!("{live} live nodes but {} listed", listed.len()));
        }
        for &slot in &self.free_slots {
            match self.nodes.get(slot as usize) {
                Some(entry) if entry.node.is_none() => {}
                _ => return broken(format!("free slot {slot} is not empty")),
            }
        }
        if live + self.free_slots.len() != self.nodes.len() {
            return broken(format!(
                "{} slots but {live} live and {} free",
                self.nodes.len(),
                self.free_slots.len()
            ));
        }

        for level in Level::ALL {
            for &id in &self.levels[level.index()] {
                let Some(node) = self.slot(id) else { continue };
                if let Err(msg) = self.check_links(id, node) {
                    return broken(msg);
                }
                if level.is_root() && node.children.is_empty() {
                    return broken(format!("root {id} has no children"));
                }
                if !level.is_root() && node.parents.is_empty() {
                    return broken(format!("{level} node {id} has no parents"));
                }
            }
        }
        Ok(())
    }

    fn check_links(&self, id: NodeId, node: &NodeData<S>) -> Result<(), String> {
        let level = node.level();
        for (list, other_level, downward) in [
            (&node.children, level.child(), true),
            (&node.parents, level.parent(), false),
        ] {
            let label = if downward { "child" } else { "parent" };
            let mut seen = HashSet::new();
            for &other in list {
                if !seen.insert(other) {
                    return Err(format!("{id} lists {label} {other} twice"));
                }
                let Some(other_node) = self.slot(other) else {
                    return Err(format!("{id} has dead {label} {other}"));
                };
                if Some(other_node.level()) != other_level {
                    return Err(format!(
                        "{id} ({level}) has {label} {other} on {}",
                        other_node.level()
                    ));
                }
                let back = if downward {
                    &other_node.parents
                } else {
                    &other_node.children
                };
                if !back.contains(&id) {
                    return Err(format!("{label} edge {id} ↔ {other} is one-sided"));
                }
            }
        }
        Ok(())
    }

    // --- Internal helpers ---

    pub(super) fn slot(&self, id: NodeId) -> Option<&NodeData<S>> {
        self.nodes
            .get(id.slot as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_ref())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut NodeData<S>> {
        self.nodes
            .get_mut(id.slot as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_mut())
    }

    fn live_nodes(&self) -> impl Iterator<Item = &NodeData<S>> {
        self.nodes.iter().filter_map(|entry| entry.node.as_ref())
    }

    pub(super) fn node(&self, id: NodeId) -> Result<&NodeData<S>, GraphError> {
        self.slot(id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(super) fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData<S>, GraphError> {
        self.slot_mut(id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Allocates a node in the arena, reusing a free slot when there is one.
    /// The caller places it in its level list.
    pub(super) fn add_node(&mut self, payload: Payload<S>) -> NodeId {
        let node = Some(NodeData::new(payload));
        while let Some(slot) = self.free_slots.pop() {
            if let Some(entry) = self.nodes.get_mut(slot as usize) {
                entry.node = node;
                return NodeId::new(slot, entry.generation);
            }
        }
        let slot = self.nodes.len() as u32;
        self.nodes.push(Slot {
            generation: 0,
            node,
        });
        NodeId::new(slot, 0)
    }

    /// Empties a slot and puts it on the free list under the next generation.
    fn release(&mut self, slot: u32) {
        let Some(entry) = self.nodes.get_mut(slot as usize) else {
            return;
        };
        if entry.node.take().is_some() {
            entry.generation = entry.generation.wrapping_add(1);
            self.free_slots.push(slot);
        }
    }

    /// Inserts `id` into its level list right after `after`, or at the end.
    pub(super) fn insert_into_level(&mut self, id: NodeId, after: Option<NodeId>) {
        let Some(level) = self.slot(id).map(NodeData::level) else {
            return;
        };
        let list = &mut self.levels[level.index()];
        match after.and_then(|a| list.iter().position(|&n| n == a)) {
            Some(pos) => list.insert(pos + 1, id),
            None => list.push(id),
        }
    }

    /// Adds `parent → child` on both sides without level checks.
    pub(super) fn link(
        &mut self,
        parent: NodeId,
        child: NodeId,
        left_sibling: Option<NodeId>,
    ) -> Result<bool, GraphError> {
        self.node(child)?;
        let parent_node = self.node_mut(parent)?;
        let at = match left_sibling {
            Some(sibling) => parent_node
                .children
                .iter()
                .position(|&c| c == sibling)
                .map(|i| i + 1)
                .ok_or(GraphError::NotAChild {
                    parent,
                    node: sibling,
                })?,
            None => parent_node.children.len(),
        };
        if parent_node.children.contains(&child) {
            return Ok(false);
        }
        parent_node.children.insert(at, child);
        let child_node = self.node_mut(child)?;
        if !child_node.parents.contains(&parent) {
            child_node.parents.push(parent);
        }
        Ok(true)
    }

    /// Removes `parent → child` from both sides. Returns true if either side
    /// held the edge.
    pub(super) fn unlink(&mut self, parent: NodeId, child: NodeId) -> bool {
        let mut removed = false;
        if let Some(node) = self.slot_mut(parent) {
            let before = node.children.len();
            node.children.retain(|&c| c != child);
            removed |= node.children.len() != before;
        }
        if let Some(node) = self.slot_mut(child) {
            let before = node.parents.len();
            node.parents.retain(|&p| p != parent);
            removed |= node.parents.len() != before;
        }
        removed
    }

    /// Severs every edge touching `id`, drops it from its level list, and frees
    /// its slot.
    pub(super) fn destroy(&mut self, id: NodeId) {
        let Some(node) = self.slot_mut(id) else {
            return;
        };
        let level = node.level();
        let children = core::mem::take(&mut node.children);
        let parents = core::mem::take(&mut node.parents);
        for child in children {
            self.unlink(id, child);
        }
        for parent in parents {
            self.unlink(parent, id);
        }
        self.levels[level.index()].retain(|&n| n != id);
        self.release(id.slot);
    }

    fn clear_nodes(&mut self) {
        for entry in &mut self.nodes {
            if entry.node.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
            }
        }
        // Lowest slot on top, so a fresh chain fills the arena front to back.
        self.free_slots = (0..self.nodes.len() as u32).rev().collect();
        for list in &mut self.levels {
            list.clear();
        }
    }

    fn push_path(
        &mut self,
        timespan: Vec<S::TimeRange>,
        channel_config: S::ChannelConfig,
        format: S::Format,
        filename: S::Filename,
    ) -> ConfigPath {
        let path = ConfigPath {
            timespan: self.add_node(Payload::Timespan(timespan)),
            channel_config: self.add_node(Payload::ChannelConfig(channel_config)),
            format: self.add_node(Payload::Format(format)),
            filename: self.add_node(Payload::Filename(filename)),
        };
        let chain = [path.timespan, path.channel_config, path.format, path.filename];
        for &id in &chain {
            self.insert_into_level(id, None);
        }
        for pair in chain.windows(2) {
            let parent = pair[0];
            let child = pair[1];
            if let Some(node) = self.slot_mut(parent) {
                node.children.push(child);
            }
            if let Some(node) = self.slot_mut(child) {
                node.parents.push(parent);
            }
        }
        path
    }

    fn check_edge_levels(&self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        let parent_level = self.level_of(parent)?;
        let child_level = self.level_of(child)?;
        if parent_level.child() != Some(child_level) {
            return Err(GraphError::LevelMismatch {
                parent: parent_level,
                child: child_level,
            });
        }
        Ok(())
    }

    /// DFS over `next` edges starting from `start`: is `target` reachable?
    fn reaches(
        &self,
        start: &[NodeId],
        target: NodeId,
        next: impl Fn(&NodeData<S>) -> &Vec<NodeId>,
    ) -> bool {
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeId> = start.to_vec();

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.slot(current) {
                stack.extend(next(node).iter().copied());
            }
        }
        false
    }
}
