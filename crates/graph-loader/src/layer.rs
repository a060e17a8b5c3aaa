// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layer dispatch: turning declarations into nodes.
//!
//! Each layer kind has its own [`LayerHandler`], registered in a
//! [`HandlerRegistry`] keyed by [`LayerKind`]. The scan loop owns the
//! parts every kind shares (node creation, output-name bookkeeping,
//! `output_tensor` queueing) and delegates the type-specific work to
//! the handler. Declarations with a type nothing recognises fall back
//! to the passthrough handler: the node is kept, it just never gains
//! resolved edges.

use crate::{LayerDecl, LoadError, NetworkDecl, WeightRequest};
use graph_ir::{Building, Graph, Node, NodeId, Shape, Tensor, TensorRef};
use std::collections::HashMap;

// ── Layer kinds ────────────────────────────────────────────────────

/// The closed set of layer kinds the loader distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// An input declaration with a statically known shape.
    Input,
    /// An affine transform with kernel and bias weight files.
    Linear,
    /// Anything else: kept in the graph, never resolved.
    Passthrough,
}

impl LayerKind {
    /// Maps a declaration's type string onto a kind.
    ///
    /// The match is exact and case-sensitive, as written by the
    /// exporter; every unknown string is a passthrough.
    pub fn classify(type_str: &str) -> Self {
        match type_str {
            "input" => LayerKind::Input,
            "LinearFunction" => LayerKind::Linear,
            _ => LayerKind::Passthrough,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Input => "input",
            LayerKind::Linear => "linear",
            LayerKind::Passthrough => "passthrough",
        }
    }
}

// ── Handlers ───────────────────────────────────────────────────────

/// Parses one layer kind's type-specific fields.
///
/// A handler receives the declaration, the node the scan loop built
/// from the shared fields, the in-progress graph (for placeholder
/// tensors), and the batch-load queue. It must not push the node; the
/// scan loop does that after dispatch so node ids stay positional.
pub trait LayerHandler: Send + Sync {
    fn parse(
        &self,
        decl: &LayerDecl,
        node: &mut Node,
        graph: &mut Graph<Building>,
        queue: &mut Vec<WeightRequest>,
    ) -> Result<(), LoadError>;
}

/// Handler for `input` layers.
///
/// An input layer must declare exactly one output and a shape. Its
/// placeholder tensor is pushed immediately and the output reference
/// is linked on the spot; the shape is static, so there is nothing to
/// defer. An `input_tensor` file, when present, is queued under the
/// same output name and fills the placeholder during the batch load.
#[derive(Debug, Default)]
pub struct InputHandler;

impl LayerHandler for InputHandler {
    fn parse(
        &self,
        decl: &LayerDecl,
        node: &mut Node,
        graph: &mut Graph<Building>,
        queue: &mut Vec<WeightRequest>,
    ) -> Result<(), LoadError> {
        if node.outputs.len() != 1 {
            return Err(LoadError::LayerStructure {
                layer: decl.name.clone(),
                detail: format!(
                    "an input layer needs exactly one output, found {}",
                    node.outputs.len()
                ),
            });
        }
        let dims = decl.shape.clone().ok_or_else(|| LoadError::LayerStructure {
            layer: decl.name.clone(),
            detail: "an input layer needs a declared shape".into(),
        })?;

        let output_name = node.outputs[0].name.clone();
        let tid = graph.push_tensor(Tensor::placeholder(&output_name, Shape::new(dims)));
        node.outputs[0].tensor = Some(tid);
        tracing::debug!("input layer '{}': placeholder {tid} for '{output_name}'", decl.name);

        if let Some(file) = &decl.input_tensor {
            queue.push(WeightRequest::new(&output_name, file));
        }
        Ok(())
    }
}

/// Handler for `LinearFunction` layers.
///
/// The `source` field becomes a pending input reference. It stays
/// pending for the life of the graph: the link pass only resolves
/// outputs, and no later phase revisits it. Kernel and bias files each
/// get a placeholder tensor named after the file string, so their ids
/// exist before the batch loader runs; the data arrives later.
#[derive(Debug, Default)]
pub struct LinearHandler;

impl LayerHandler for LinearHandler {
    fn parse(
        &self,
        decl: &LayerDecl,
        node: &mut Node,
        graph: &mut Graph<Building>,
        queue: &mut Vec<WeightRequest>,
    ) -> Result<(), LoadError> {
        if let Some(source) = &decl.source {
            node.inputs.push(TensorRef::pending(source));
        }
        for file in [&decl.kernel_weights_file, &decl.bias_weights_file]
            .into_iter()
            .flatten()
        {
            let tid = graph.push_tensor(Tensor::placeholder(file, Shape::scalar()));
            node.inputs.push(TensorRef::resolved(file, tid));
            queue.push(WeightRequest::new(file, file));
            tracing::debug!("linear layer '{}': queued weight file '{file}' as {tid}", decl.name);
        }
        Ok(())
    }
}

/// Handler for declarations nothing else recognises.
///
/// The node is retained so the viewer still shows the layer, but no
/// tensors or references are created for it.
#[derive(Debug, Default)]
pub struct PassthroughHandler;

impl LayerHandler for PassthroughHandler {
    fn parse(
        &self,
        _decl: &LayerDecl,
        _node: &mut Node,
        _graph: &mut Graph<Building>,
        _queue: &mut Vec<WeightRequest>,
    ) -> Result<(), LoadError> {
        Ok(())
    }
}

// ── Registry ───────────────────────────────────────────────────────

/// Maps layer kinds to their handlers.
///
/// New kinds can be registered without touching the scan loop; a kind
/// with no handler falls back to passthrough.
pub struct HandlerRegistry {
    handlers: HashMap<LayerKind, Box<dyn LayerHandler>>,
    passthrough: PassthroughHandler,
}

impl HandlerRegistry {
    /// Creates a registry with no handlers; every kind is passthrough.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            passthrough: PassthroughHandler,
        }
    }

    /// Registers a handler for a kind, replacing any previous one.
    pub fn register(&mut self, kind: LayerKind, handler: Box<dyn LayerHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// Returns the handler for a kind, or the passthrough fallback.
    pub fn handler(&self, kind: LayerKind) -> &dyn LayerHandler {
        match self.handlers.get(&kind) {
            Some(handler) => handler.as_ref(),
            None => &self.passthrough,
        }
    }
}

impl Default for HandlerRegistry {
    /// Creates a registry with the built-in handlers.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(LayerKind::Input, Box::new(InputHandler));
        registry.register(LayerKind::Linear, Box::new(LinearHandler));
        registry
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ── Scan loop ──────────────────────────────────────────────────────

/// What the layer scan hands to the later phases.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Layer name → node id, for endpoint binding. When a name appears
    /// twice the later layer wins.
    pub node_ids: HashMap<String, NodeId>,
    /// Weight files queued for the batch load, in queue order.
    pub requests: Vec<WeightRequest>,
}

/// Scans every layer declaration into the graph.
///
/// For each declaration, in order: build a node carrying the shared
/// fields (name, rank, pending output references), queue the
/// `output_tensor` file under the sole output name, dispatch the
/// kind-specific handler, and push the node so its id equals its
/// position. The name→id map and the queue are returned explicitly;
/// nothing about the scan lives in ambient state.
pub fn scan_layers(
    decl: &NetworkDecl,
    graph: &mut Graph<Building>,
    registry: &HandlerRegistry,
) -> Result<ScanOutput, LoadError> {
    let mut out = ScanOutput::default();

    for layer in &decl.layers {
        let kind = LayerKind::classify(&layer.layer_type);
        if kind == LayerKind::Passthrough {
            tracing::warn!(
                "layer '{}': unrecognised type '{}', keeping without edges",
                layer.name,
                layer.layer_type,
            );
        }

        let mut node = Node::new(&layer.name, layer.rank);
        for output_name in &layer.output_names {
            node.outputs.push(TensorRef::pending(output_name));
        }

        // A pre-computed result file is only meaningful when the layer
        // declares a single output; otherwise there is no name to queue
        // it under and the field is ignored.
        if let Some(file) = &layer.output_tensor {
            if layer.output_names.len() == 1 {
                out.requests.push(WeightRequest::new(&layer.output_names[0], file));
            } else {
                tracing::warn!(
                    "layer '{}': ignoring output_tensor '{file}' ({} outputs declared)",
                    layer.name,
                    layer.output_names.len(),
                );
            }
        }

        registry
            .handler(kind)
            .parse(layer, &mut node, graph, &mut out.requests)?;

        let id = graph.push_node(node);
        if let Some(previous) = out.node_ids.insert(layer.name.clone(), id) {
            tracing::warn!(
                "layer name '{}' declared twice; {previous} is shadowed by {id}",
                layer.name,
            );
        }
    }

    tracing::info!(
        "layer scan: {} nodes, {} tensors, {} weight files queued",
        graph.num_nodes(),
        graph.num_tensors(),
        out.requests.len(),
    );
    Ok(out)
}
