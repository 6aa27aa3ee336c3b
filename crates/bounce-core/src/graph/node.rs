//! Graph node types for the export expansion graph.
//!
//! Each node has a [`NodeId`] and a [`Payload`] whose variant fixes the node's
//! [`Level`]. The `NodeData` struct bundles the payload with internal
//! bookkeeping (ordered parent/child lists, selection state).

use core::fmt;

/// Handle to a node in the export graph.
///
/// A handle is an arena slot plus the generation that slot had when the node
/// was created. Freed slots are reused with a bumped generation, so a handle
/// kept across a removal resolves to "not found" instead of silently pointing
/// at a different node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Returns the arena slot this handle points into.
    #[inline]
    pub fn index(self) -> u32 {
        self.slot
    }

    /// Returns how many times the slot had been freed when this node was created.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "NodeId({})", self.slot)
        } else {
            write!(f, "NodeId({}v{})", self.slot, self.generation)
        }
    }
}

/// One of the four ranks of the expansion graph.
///
/// Edges only ever run from a node at one level to a node at the next level
/// down. Timespan nodes are roots, Filename nodes are leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// Sets of concrete time ranges to render.
    Timespan,
    /// Channel routing for the rendered audio.
    ChannelConfig,
    /// Output format / codec settings.
    Format,
    /// Filename pattern for the written file.
    Filename,
}

impl Level {
    /// All levels, root first.
    pub const ALL: [Level; 4] = [
        Level::Timespan,
        Level::ChannelConfig,
        Level::Format,
        Level::Filename,
    ];

    /// Zero-based rank (Timespan = 0, Filename = 3).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Level::Timespan => 0,
            Level::ChannelConfig => 1,
            Level::Format => 2,
            Level::Filename => 3,
        }
    }

    /// The level above this one, or `None` for Timespan.
    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Timespan => None,
            Level::ChannelConfig => Some(Level::Timespan),
            Level::Format => Some(Level::ChannelConfig),
            Level::Filename => Some(Level::Format),
        }
    }

    /// The level below this one, or `None` for Filename.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::Timespan => Some(Level::ChannelConfig),
            Level::ChannelConfig => Some(Level::Format),
            Level::Format => Some(Level::Filename),
            Level::Filename => None,
        }
    }

    /// True for Timespan, the only level without parents.
    #[inline]
    pub fn is_root(self) -> bool {
        self == Level::Timespan
    }

    /// True for Filename, the only level without children.
    #[inline]
    pub fn is_leaf(self) -> bool {
        self == Level::Filename
    }

    /// Lowercase name used in logs and config files.
    pub fn name(self) -> &'static str {
        match self {
            Level::Timespan => "timespan",
            Level::ChannelConfig => "channel_config",
            Level::Format => "format",
            Level::Filename => "filename",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload types carried by an export graph.
///
/// The graph never inspects these values; it only clones them when a split
/// duplicates a node and hands out references when materializing jobs.
pub trait ExportSchema {
    /// One concrete time range. A Timespan node carries a list of these.
    type TimeRange: Clone;
    /// Channel routing value.
    type ChannelConfig: Clone;
    /// Output format value.
    type Format: Clone;
    /// Filename pattern value.
    type Filename: Clone;
}

/// Level-specific payload of a node.
pub enum Payload<S: ExportSchema> {
    /// A set of concrete time ranges (root level).
    Timespan(Vec<S::TimeRange>),
    /// A channel routing value.
    ChannelConfig(S::ChannelConfig),
    /// An output format value.
    Format(S::Format),
    /// A filename pattern value (leaf level).
    Filename(S::Filename),
}

impl<S: ExportSchema> Payload<S> {
    /// The level a node carrying this payload lives on.
    pub fn level(&self) -> Level {
        match self {
            Payload::Timespan(_) => Level::Timespan,
            Payload::ChannelConfig(_) => Level::ChannelConfig,
            Payload::Format(_) => Level::Format,
            Payload::Filename(_) => Level::Filename,
        }
    }

    /// The time ranges of a Timespan payload.
    pub fn as_timespan(&self) -> Option<&[S::TimeRange]> {
        match self {
            Payload::Timespan(ranges) => Some(ranges),
            _ => None,
        }
    }

    /// The value of a ChannelConfig payload.
    pub fn as_channel_config(&self) -> Option<&S::ChannelConfig> {
        match self {
            Payload::ChannelConfig(c) => Some(c),
            _ => None,
        }
    }

    /// The value of a Format payload.
    pub fn as_format(&self) -> Option<&S::Format> {
        match self {
            Payload::Format(f) => Some(f),
            _ => None,
        }
    }

    /// The value of a Filename payload.
    pub fn as_filename(&self) -> Option<&S::Filename> {
        match self {
            Payload::Filename(n) => Some(n),
            _ => None,
        }
    }
}

// Manual impl: a derive would demand `S: Clone` instead of the associated types.
impl<S: ExportSchema> Clone for Payload<S> {
    fn clone(&self) -> Self {
        match self {
            Payload::Timespan(ranges) => Payload::Timespan(ranges.clone()),
            Payload::ChannelConfig(c) => Payload::ChannelConfig(c.clone()),
            Payload::Format(f) => Payload::Format(f.clone()),
            Payload::Filename(n) => Payload::Filename(n.clone()),
        }
    }
}

impl<S: ExportSchema> fmt::Debug for Payload<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Timespan(ranges) => write!(f, "Timespan({} ranges)", ranges.len()),
            Payload::ChannelConfig(_) => f.write_str("ChannelConfig(..)"),
            Payload::Format(_) => f.write_str("Format(..)"),
            Payload::Filename(_) => f.write_str("Filename(..)"),
        }
    }
}

/// Internal bookkeeping for a node in the graph.
pub(crate) struct NodeData<S: ExportSchema> {
    pub payload: Payload<S>,
    /// Nodes one level up, in the order the edges were added.
    pub parents: Vec<NodeId>,
    /// Nodes one level down, in child order.
    pub children: Vec<NodeId>,
    pub selected: bool,
}

impl<S: ExportSchema> NodeData<S> {
    pub fn new(payload: Payload<S>) -> Self {
        Self {
            payload,
            parents: Vec::new(),
            children: Vec::new(),
            selected: false,
        }
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.payload.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_chain_is_consistent() {
        for level in Level::ALL {
            if let Some(child) = level.child() {
                assert_eq!(child.parent(), Some(level));
                assert_eq!(child.index(), level.index() + 1);
            }
        }
        assert!(Level::Timespan.is_root());
        assert!(Level::Filename.is_leaf());
        assert_eq!(Level::Timespan.parent(), None);
        assert_eq!(Level::Filename.child(), None);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::ChannelConfig.to_string(), "channel_config");
        assert_eq!(NodeId::new(7, 0).to_string(), "NodeId(7)");
        assert_eq!(NodeId::new(7, 2).to_string(), "NodeId(7v2)");
    }
}
