// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Load orchestration: from description file to linked graph.
//!
//! The pipeline is strictly sequential and fail-fast:
//! 1. Parse the JSON description.
//! 2. Scan layers into nodes, placeholders, and a weight-file queue.
//! 3. Batch-load every queued file through the [`WeightSource`].
//! 4. Merge the loaded records into the tensor list.
//! 5. Bind the declared interface names to node ids.
//! 6. Resolve every output name to a tensor id.
//! 7. Seal the graph; only then does the caller get a [`Graph<Linked>`].
//!
//! Any error anywhere voids the whole load. The partially built
//! `Graph<Building>` is dropped inside this module, so a caller can
//! never hold a half-loaded graph.

use crate::{resolve_links, scan_layers, HandlerRegistry, LoadError, NetworkDecl, TensorRegistry};
use graph_ir::{Building, Graph, Linked, NodeId};
use std::collections::HashMap;
use std::path::Path;
use weight_store::WeightSource;

/// Loads network dumps into linked graphs.
///
/// # Example
/// ```no_run
/// use graph_loader::NetworkLoader;
/// use std::path::Path;
/// use weight_store::SafetensorsSource;
///
/// let loader = NetworkLoader::new();
/// let graph = loader
///     .load(Path::new("./dumps/mnist/net.json"), &SafetensorsSource::new())
///     .unwrap();
/// println!("{}", graph.summary());
/// ```
#[derive(Debug, Default)]
pub struct NetworkLoader {
    handlers: HandlerRegistry,
}

impl NetworkLoader {
    /// Creates a loader with the built-in layer handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader with a custom handler registry.
    pub fn with_handlers(handlers: HandlerRegistry) -> Self {
        Self { handlers }
    }

    /// Loads the description at `path` and every weight file it
    /// references, resolving relative paths against the description's
    /// directory.
    pub fn load(
        &self,
        path: &Path,
        source: &dyn WeightSource,
    ) -> Result<Graph<Linked>, LoadError> {
        let decl = NetworkDecl::from_file(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        tracing::info!(
            "loading network '{}' ({} layers)",
            path.display(),
            decl.layers.len(),
        );
        self.from_declaration(&decl, base_dir, source)
    }

    /// Runs the full pipeline on an already parsed description.
    ///
    /// Split out so tests and benchmarks can drive the loader without a
    /// description file on disk.
    pub fn from_declaration(
        &self,
        decl: &NetworkDecl,
        base_dir: &Path,
        source: &dyn WeightSource,
    ) -> Result<Graph<Linked>, LoadError> {
        let mut graph = Graph::new();

        // 1. Scan layers into nodes and the weight queue.
        let scan = scan_layers(decl, &mut graph, &self.handlers)?;

        // 2-3. Batch-load the queue and merge the records.
        let registry = TensorRegistry::load(&scan.requests, base_dir, source)?;
        registry.merge_into(&mut graph);

        // 4. Bind the declared interface to node ids.
        bind_endpoints(decl, &scan.node_ids, &mut graph)?;

        // 5. Link every output.
        resolve_links(&mut graph)?;

        // 6. Seal. After this no mutation is reachable.
        let linked = graph.finish()?;
        tracing::info!("{}", linked.summary());
        Ok(linked)
    }
}

/// Appends the declared inputs and outputs to the graph's endpoint list.
///
/// Both directions land in the one combined list, inputs first, in
/// declaration order — the format carries them that way and consumers
/// of the dump rely on it. Output entries are nested one level; only
/// the first element of each entry is honoured, and an empty entry is
/// skipped with a warning. A name that never matched a layer is an
/// error, not a silent default.
fn bind_endpoints(
    decl: &NetworkDecl,
    node_ids: &HashMap<String, NodeId>,
    graph: &mut Graph<Building>,
) -> Result<(), LoadError> {
    let lookup = |name: &str| -> Result<NodeId, LoadError> {
        node_ids
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::UnknownEndpoint {
                name: name.to_string(),
            })
    };

    for name in &decl.inputs {
        let id = lookup(name)?;
        graph.push_endpoint(name, id);
    }
    for entry in &decl.outputs {
        let Some(name) = entry.first() else {
            tracing::warn!("declared outputs contain an empty entry, skipping");
            continue;
        };
        let id = lookup(name)?;
        graph.push_endpoint(name, id);
    }
    Ok(())
}
