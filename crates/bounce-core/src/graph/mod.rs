//! Export-configuration expansion graph.
//!
//! A user describes many export jobs at once by building a small four-level
//! tree of reusable choices and then *splitting* nodes to specialise part of
//! their usage while sharing the rest:
//!
//! ```text
//! Timespan ──► ChannelConfig ──► Format ──► Filename
//! ```
//!
//! Every root-to-leaf path, crossed with each time range of its root,
//! [materializes](ExportGraph::materialize) into one [`ExportJob`].
//!
//! # Architecture
//!
//! - [`ExportGraph`] owns all nodes in a slot arena. Each [`Level`] keeps an
//!   ordered list of its [`NodeId`]s; that order is meaningful (a split-off
//!   node sits right after its source).
//! - Parent/child lists are `NodeId` relations, never ownership. Freed slots
//!   are reused under a new generation, so a handle held across
//!   [`remove()`](ExportGraph::remove) fails with [`GraphError::NodeNotFound`]
//!   instead of aliasing another node.
//! - Payloads are opaque: an [`ExportSchema`] names the four payload types and
//!   the graph only clones them.
//!
//! # Invariants
//!
//! After every [`split()`](ExportGraph::split) and
//! [`remove()`](ExportGraph::remove):
//!
//! 1. every root has a child and every other node has a parent;
//! 2. no edge is stored twice;
//! 3. `a` lists `b` as a child exactly when `b` lists `a` as a parent.
//!
//! [`check_invariants()`](ExportGraph::check_invariants) audits them.
//!
//! # Example
//!
//! ```rust
//! use bounce_core::graph::{ExportGraph, ExportSchema};
//!
//! struct Demo;
//!
//! impl ExportSchema for Demo {
//!     type TimeRange = (u64, u64);
//!     type ChannelConfig = &'static str;
//!     type Format = &'static str;
//!     type Filename = &'static str;
//! }
//!
//! let mut graph = ExportGraph::<Demo>::new();
//! let path = graph.create_empty_config(vec![(0, 48_000)], "stereo", "wav", "{session}");
//! assert_eq!(graph.materialize().len(), 1);
//!
//! let flac = graph.split(path.format, 0.5)?;
//! assert_eq!(graph.materialize().len(), 2);
//!
//! graph.remove(flac)?;
//! assert_eq!(graph.materialize().len(), 1);
//! # Ok::<(), bounce_core::graph::GraphError>(())
//! ```

mod export_graph;
mod materialize;
pub mod node;
mod remove;
mod snapshot;
mod split;

pub use export_graph::{ConfigPath, ExportGraph, GraphError, GraphEvent};
pub use materialize::{ExportJob, JobSink};
pub use node::{ExportSchema, Level, NodeId, Payload};
pub use snapshot::{GraphSnapshot, SnapshotEntry};
pub use split::split_index;
