// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # graph-loader
//!
//! Loads JSON network dumps into linked [`graph_ir`] graphs.
//!
//! A dump is one JSON description plus one weight file per parameter
//! tensor. Loading runs in strictly ordered, fail-fast phases:
//!
//! - [`NetworkDecl`] — the parsed description (tolerant JSON).
//! - [`scan_layers`] — one node per layer, dispatched through a
//!   [`HandlerRegistry`] of per-kind [`LayerHandler`]s; placeholders
//!   and weight-file requests come out of this phase.
//! - [`TensorRegistry`] — reads every queued file through a
//!   [`weight_store::WeightSource`] in queue order, aborting the batch
//!   on the first failure, then merges the records into the graph.
//! - [`resolve_links`] — assigns each output name its tensor id
//!   (first match wins).
//! - [`NetworkLoader`] — the orchestrator; the only way to obtain a
//!   `Graph<Linked>` from a dump.
//!
//! # Example
//! ```no_run
//! use graph_loader::NetworkLoader;
//! use std::path::Path;
//! use weight_store::SafetensorsSource;
//!
//! let graph = NetworkLoader::new()
//!     .load(Path::new("./dumps/mnist/net.json"), &SafetensorsSource::new())
//!     .unwrap();
//! for node in graph.nodes() {
//!     println!("{}", node.summary());
//! }
//! ```

mod declaration;
mod error;
mod layer;
mod loader;
mod registry;
mod resolver;

pub use declaration::{LayerDecl, NetworkDecl};
pub use error::LoadError;
pub use layer::{
    scan_layers, HandlerRegistry, InputHandler, LayerHandler, LayerKind, LinearHandler,
    PassthroughHandler, ScanOutput,
};
pub use loader::NetworkLoader;
pub use registry::{TensorRegistry, WeightRequest};
pub use resolver::resolve_links;
