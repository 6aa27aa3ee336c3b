//! Node splitting — duplicate a node and hand part of its usage to the copy.
//!
//! [`ExportGraph::split`] dispatches on the node's [`Level`]:
//!
//! | Level | Parents | Children |
//! |---|---|---|
//! | Timespan | none (root) | whole sub-tree duplicated |
//! | ChannelConfig | copy joins the single parent | shared if exactly one, else duplicated |
//! | Format | partitioned by `position` | shared if exactly one, else duplicated |
//! | Filename | partitioned by `position` | none (leaf) |
//!
//! # Parent partitioning
//!
//! For a node with `N > 1` parents, the first [`split_index(N, position)`](split_index)
//! parents keep pointing at the original; the rest are rewired to the copy,
//! which each of them lists right after the original in its child order.
//!
//! # Sub-tree duplication
//!
//! Descendants may be shared on purpose (two formats writing through one
//! filename pattern). Duplication keeps that topology one level down instead
//! of deep-copying blindly:
//!
//! - if every child has the same single grandchild, the copies reuse it;
//! - otherwise each *common-child range* (a maximal run of adjacent children
//!   whose only child is the same node) gets one fresh copy of that grandchild,
//!   shared by every copy in the run.

use super::export_graph::{ExportGraph, GraphError, GraphEvent};
use super::node::{ExportSchema, Level, NodeId};

/// Number of parents that stay with the original node when a node with
/// `parent_count` parents is split at `position`.
///
/// `round(parent_count * position)` clamped to `[1, parent_count - 1]`, so both
/// sides keep at least one parent. Counts below 2 are returned unchanged: no
/// partition happens.
pub fn split_index(parent_count: usize, position: f32) -> usize {
    if parent_count < 2 {
        return parent_count;
    }
    let max = (parent_count - 1) as f32;
    let raw = (parent_count as f32 * position).round();
    // f32::max/min discard NaN, so a NaN position lands on 1.
    raw.max(1.0).min(max) as usize
}

impl<S: ExportSchema> ExportGraph<S> {
    /// Splits `node` and returns the new node.
    ///
    /// `position` in `[0, 1]` chooses how many parents stay with the original
    /// (see [`split_index`]); it is ignored at the Timespan level and whenever
    /// the node has fewer than two parents. The copy is placed right after
    /// `node` in its level.
    pub fn split(&mut self, node: NodeId, position: f32) -> Result<NodeId, GraphError> {
        if !position.is_finite() {
            return Err(GraphError::InvalidPosition(position));
        }
        let level = self.level_of(node)?;
        let new_node = match level {
            Level::Timespan => self.split_timespan(node)?,
            Level::ChannelConfig | Level::Format => self.split_branch(node, position)?,
            Level::Filename => self.split_leaf(node, position)?,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_split: {level} {node} → {new_node} at {position:.3}");
        self.notify(GraphEvent::Changed);
        Ok(new_node)
    }

    fn split_timespan(&mut self, node: NodeId) -> Result<NodeId, GraphError> {
        let new_node = self.duplicate_node(node, Some(node))?;
        self.duplicate_children(node, new_node)?;
        Ok(new_node)
    }

    fn split_branch(&mut self, node: NodeId, position: f32) -> Result<NodeId, GraphError> {
        let new_node = self.duplicate_node(node, Some(node))?;
        self.attach_split_off(node, new_node, position)?;

        let children = self.node(node)?.children.clone();
        if let [only] = children.as_slice() {
            self.link(new_node, *only, None)?;
        } else {
            self.duplicate_children(node, new_node)?;
        }
        Ok(new_node)
    }

    fn split_leaf(&mut self, node: NodeId, position: f32) -> Result<NodeId, GraphError> {
        let new_node = self.duplicate_node(node, Some(node))?;
        self.attach_split_off(node, new_node, position)?;
        Ok(new_node)
    }

    /// Gives `new_node` its parents: the single parent of `old_node`, or the
    /// tail of its parents when there are several.
    fn attach_split_off(
        &mut self,
        old_node: NodeId,
        new_node: NodeId,
        position: f32,
    ) -> Result<(), GraphError> {
        let parents = self.node(old_node)?.parents.clone();
        match parents.as_slice() {
            [] => Ok(()),
            [parent] => self.link(*parent, new_node, Some(old_node)).map(|_| ()),
            _ => self.split_node_at_position(old_node, new_node, &parents, position),
        }
    }

    fn split_node_at_position(
        &mut self,
        old_node: NodeId,
        new_node: NodeId,
        parents: &[NodeId],
        position: f32,
    ) -> Result<(), GraphError> {
        let keep = split_index(parents.len(), position);
        for &parent in &parents[keep..] {
            self.link(parent, new_node, Some(old_node))?;
            self.unlink(parent, old_node);
        }
        Ok(())
    }

    /// Copies every child of `source` under `target`, sharing or duplicating
    /// grandchildren per the common-child rules.
    fn duplicate_children(&mut self, source: NodeId, target: NodeId) -> Result<(), GraphError> {
        let children = self.node(source)?.children.clone();
        let mut anchor = self.last_in_level(&children);

        if let Some(shared) = self.common_grandchild(&children) {
            for &child in &children {
                let copy = self.duplicate_node(child, anchor)?;
                anchor = Some(copy);
                self.link(target, copy, None)?;
                self.link(copy, shared, None)?;
            }
            return Ok(());
        }

        let mut begin = 0;
        while begin < children.len() {
            let end = self.end_of_common_child_range(&children, begin);
            let mut shared_copy = None;
            for &child in &children[begin..=end] {
                let copy = self.duplicate_node(child, anchor)?;
                anchor = Some(copy);
                self.link(target, copy, None)?;
                match shared_copy {
                    Some(grandchild) => {
                        self.link(copy, grandchild, None)?;
                    }
                    None => {
                        self.duplicate_children(child, copy)?;
                        if end > begin {
                            shared_copy = self.node(copy)?.children.first().copied();
                        }
                    }
                }
            }
            begin = end + 1;
        }
        Ok(())
    }

    /// Last index of the common-child range that starts at `begin`.
    ///
    /// A child with other than exactly one child of its own forms a range of
    /// length one.
    pub(crate) fn end_of_common_child_range(&self, children: &[NodeId], begin: usize) -> usize {
        let Some(shared) = children.get(begin).and_then(|&c| self.only_child(c)) else {
            return begin;
        };
        let mut end = begin;
        while end + 1 < children.len() && self.only_child(children[end + 1]) == Some(shared) {
            end += 1;
        }
        end
    }

    /// The grandchild every one of `children` points at, if they all have
    /// exactly that one child.
    fn common_grandchild(&self, children: &[NodeId]) -> Option<NodeId> {
        let first = self.only_child(*children.first()?)?;
        children
            .iter()
            .all(|&c| self.only_child(c) == Some(first))
            .then_some(first)
    }

    fn only_child(&self, id: NodeId) -> Option<NodeId> {
        match self.slot(id)?.children.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// The member of `ids` that comes last in its level list.
    fn last_in_level(&self, ids: &[NodeId]) -> Option<NodeId> {
        ids.iter()
            .filter_map(|&id| self.position(id).ok().map(|pos| (pos, id)))
            .max()
            .map(|(_, id)| id)
    }

    /// Allocates an edge-less copy of `source` and places it after `after` in
    /// the level list.
    fn duplicate_node(
        &mut self,
        source: NodeId,
        after: Option<NodeId>,
    ) -> Result<NodeId, GraphError> {
        let payload = self.node(source)?.payload.clone();
        let copy = self.add_node(payload);
        self.insert_into_level(copy, after);
        Ok(copy)
    }
}
