//! Bounce Core - the export expansion graph
//!
//! This crate turns a small, user-edited graph of export choices into the full
//! list of concrete export jobs. One job is one time range, rendered through one
//! channel routing, encoded in one format, and written under one filename
//! pattern.
//!
//! # Core Abstractions
//!
//! - [`ExportGraph`] - Four-level graph: Timespan → ChannelConfig → Format → Filename
//! - [`ExportSchema`] - Names the payload types the graph carries (opaque to it)
//! - [`NodeId`] / [`Level`] - Node handles and ranks
//! - [`ExportJob`] / [`JobSink`] - Materialized jobs and their consumer
//!
//! # Operations
//!
//! - [`ExportGraph::split`] - Duplicate a node, moving part of its parents to the copy
//! - [`ExportGraph::remove`] - Drop a node and garbage-collect what it orphaned
//! - [`ExportGraph::materialize`] - Expand every path into jobs
//!
//! # Feature Flags
//!
//! - `tracing` - Emit `debug`-level events for every structural mutation.
//!
//! Rendering, encoding, and persistence live outside this crate; see
//! `bounce-config` for concrete payload types and TOML profiles.

pub mod graph;

pub use graph::{
    ConfigPath, ExportGraph, ExportJob, ExportSchema, GraphError, GraphEvent, GraphSnapshot,
    JobSink, Level, NodeId, Payload, SnapshotEntry, split_index,
};
