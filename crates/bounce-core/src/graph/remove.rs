//! Node removal and garbage collection.
//!
//! A Timespan node with no children and any other node with no parents can
//! never contribute a job; [`ExportGraph::purge_graph`] drops them. The sweep
//! runs in level order, so a purged root orphans its channel configs before the
//! ChannelConfig sweep sees them, and so on down to the filenames. Purging a
//! non-root never creates garbage above it: an orphan has no parents to lose a
//! child.

use super::export_graph::{ExportGraph, GraphError, GraphEvent};
use super::node::{ExportSchema, Level, NodeId};

impl<S: ExportSchema> ExportGraph<S> {
    /// Removes `node`, severing all its edges, then purges whatever became
    /// unreachable. Returns the number of nodes purged besides `node`.
    ///
    /// Handles to the removed and purged nodes are stale afterwards.
    pub fn remove(&mut self, node: NodeId) -> Result<usize, GraphError> {
        self.node(node)?;
        self.destroy(node);
        let purged = self.purge_nodes();
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_remove: {node}, purged {purged}");
        self.notify(GraphEvent::Changed);
        Ok(purged)
    }

    /// Drops every childless root and every parentless non-root node.
    /// Returns how many nodes were dropped. An empty graph stays empty.
    pub fn purge_graph(&mut self) -> usize {
        let purged = self.purge_nodes();
        self.notify(GraphEvent::Changed);
        purged
    }

    fn purge_nodes(&mut self) -> usize {
        let mut purged = 0;
        for level in Level::ALL {
            let dead: Vec<NodeId> = self.levels[level.index()]
                .iter()
                .copied()
                .filter(|&id| self.is_garbage(id))
                .collect();
            for id in dead {
                #[cfg(feature = "tracing")]
                tracing::debug!("graph_purge: {level} {id}");
                self.destroy(id);
                purged += 1;
            }
        }
        purged
    }

    fn is_garbage(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|node| {
            if node.level().is_root() {
                node.children.is_empty()
            } else {
                node.parents.is_empty()
            }
        })
    }
}
