//! Read-only topology snapshot for front ends.

use super::export_graph::ExportGraph;
use super::node::{ExportSchema, Level, NodeId};

/// One node as seen by a viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Node identifier.
    pub id: NodeId,
    /// Level the node lives on.
    pub level: Level,
    /// Position among the nodes of its level.
    pub position: usize,
    /// Parent IDs in edge order.
    pub parents: Vec<NodeId>,
    /// Child IDs in child order.
    pub children: Vec<NodeId>,
    /// Selection flag.
    pub selected: bool,
}

/// Topology of an [`ExportGraph`] at one point in time, without payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    /// All nodes, grouped by level (root first) and in level order.
    pub entries: Vec<SnapshotEntry>,
}

impl GraphSnapshot {
    /// Entries of one level, in level order.
    pub fn level(&self, level: Level) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.iter().filter(move |e| e.level == level)
    }

    /// Looks up one node.
    pub fn get(&self, id: NodeId) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

impl<S: ExportSchema> ExportGraph<S> {
    /// Captures the current topology.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut entries = Vec::with_capacity(self.node_count());
        for level in Level::ALL {
            for (position, &id) in self.nodes(level).iter().enumerate() {
                let Some(node) = self.slot(id) else { continue };
                entries.push(SnapshotEntry {
                    id,
                    level,
                    position,
                    parents: node.parents.clone(),
                    children: node.children.clone(),
                    selected: node.selected,
                });
            }
        }
        GraphSnapshot { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Labels;

    impl ExportSchema for Labels {
        type TimeRange = u32;
        type ChannelConfig = ();
        type Format = ();
        type Filename = ();
    }

    #[test]
    fn test_snapshot_mirrors_graph() {
        let mut graph = ExportGraph::<Labels>::new();
        let path = graph.create_empty_config(vec![1], (), (), ());
        let second = graph.split(path.format, 0.5).unwrap();
        graph.select(second, true).unwrap();

        let snapshot = graph.snapshot();
        assert_eq!(snapshot.entries.len(), 5);
        let formats: Vec<_> = snapshot.level(Level::Format).map(|e| e.id).collect();
        assert_eq!(formats, vec![path.format, second]);

        let entry = snapshot.get(second).unwrap();
        assert_eq!(entry.position, 1);
        assert!(entry.selected);
        assert_eq!(entry.parents, vec![path.channel_config]);
        assert_eq!(entry.children, vec![path.filename]);
    }
}
