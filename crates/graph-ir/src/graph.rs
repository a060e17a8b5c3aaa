// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Network graph: nodes, tensors, and the endpoint list.
//!
//! # Type-State Pattern
//!
//! The graph transitions through states enforced at compile time:
//!
//! ```text
//! Graph<Building>   — nodes and tensors appended, references pending.
//!       │  .finish()
//!       ▼
//! Graph<Linked>     — every output reference checked, read-only.
//! ```
//!
//! This prevents a viewer from ever receiving a graph whose output
//! references dangle. The transition consumes the old state and returns
//! the new one, so there is zero runtime cost — the marker types are
//! `PhantomData` (ZST).

use crate::{GraphError, Node, NodeId, Tensor, TensorId};
use std::collections::HashMap;
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: graph is under construction and may still be mutated.
#[derive(Debug, Clone)]
pub struct Building;

/// Marker: graph has been linked and is ready for display.
#[derive(Debug, Clone)]
pub struct Linked;

/// Sealed trait for graph states.
pub trait GraphState: fmt::Debug + Clone {}
impl GraphState for Building {}
impl GraphState for Linked {}

// ── Endpoint ───────────────────────────────────────────────────────

/// A node the network exposes to the outside world.
///
/// The description lists inputs and outputs in one combined interface
/// block, and the graph keeps them that way: an endpoint does not say
/// which direction it faces, only which node carries it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Endpoint {
    /// Layer name from the description.
    pub name: String,
    /// The node that is the interface point.
    pub node: NodeId,
}

// ── Graph ──────────────────────────────────────────────────────────

/// The complete network as parallel lists of nodes and tensors.
///
/// Node and tensor ids are list positions; edges are [`crate::TensorRef`]s
/// stored on the nodes. The generic parameter `S` encodes the linking
/// state at compile time.
#[derive(Debug, Clone)]
pub struct Graph<S: GraphState = Building> {
    nodes: Vec<Node>,
    tensors: Vec<Tensor>,
    endpoints: Vec<Endpoint>,
    /// Name → id of the *first* tensor pushed under that name. Later
    /// duplicates keep their own ids but are invisible to name lookup.
    tensor_index: HashMap<String, TensorId>,
    /// State marker (zero-sized, compile-time only).
    _state: std::marker::PhantomData<S>,
}

// ── Building state ─────────────────────────────────────────────────

impl Graph<Building> {
    /// Creates an empty graph in the `Building` state.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            tensors: Vec::new(),
            endpoints: Vec::new(),
            tensor_index: HashMap::new(),
            _state: std::marker::PhantomData,
        }
    }

    /// Appends a node and returns its id.
    ///
    /// The node's `id` field is overwritten with its list position;
    /// whatever it held before is discarded.
    pub fn push_node(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.id = id;
        self.nodes.push(node);
        id
    }

    /// Appends a tensor and returns its id.
    ///
    /// The first tensor pushed under a given name claims that name in
    /// the lookup index. Pushing a second tensor with the same name
    /// still appends it, but [`tensor_id`](Graph::tensor_id) keeps
    /// answering with the first.
    pub fn push_tensor(&mut self, tensor: Tensor) -> TensorId {
        let id = TensorId(self.tensors.len());
        self.tensor_index.entry(tensor.name.clone()).or_insert(id);
        self.tensors.push(tensor);
        id
    }

    /// Returns a mutable reference to a tensor.
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this graph.
    pub fn tensor_mut(&mut self, id: TensorId) -> &mut Tensor {
        &mut self.tensors[id.index()]
    }

    /// Links one output reference of a node to a tensor.
    ///
    /// # Panics
    /// Panics if `node` was not handed out by this graph or `slot` is
    /// not an output position of that node.
    pub fn set_output_link(&mut self, node: NodeId, slot: usize, tensor: TensorId) {
        self.nodes[node.index()].outputs[slot].tensor = Some(tensor);
    }

    /// Records a node as part of the network's external interface.
    pub fn push_endpoint(&mut self, name: impl Into<String>, node: NodeId) {
        self.endpoints.push(Endpoint {
            name: name.into(),
            node,
        });
    }

    /// Checks every link and transitions to the `Linked` state.
    ///
    /// # Checks
    /// - Every node output reference carries a tensor id.
    /// - Every linked tensor id is inside the tensor list.
    /// - Every endpoint names a node inside the node list.
    ///
    /// Input references are exempt: only producing nodes record ids,
    /// so inputs legitimately stay pending.
    pub fn finish(self) -> Result<Graph<Linked>, GraphError> {
        for (pos, node) in self.nodes.iter().enumerate() {
            debug_assert_eq!(node.id.index(), pos, "node id drifted from its position");
            for output in &node.outputs {
                match output.tensor {
                    None => {
                        return Err(GraphError::UnresolvedOutput {
                            node: node.id,
                            output: output.name.clone(),
                        });
                    }
                    Some(id) if id.index() >= self.tensors.len() => {
                        return Err(GraphError::TensorIdOutOfRange {
                            node: node.id,
                            output: output.name.clone(),
                            id,
                            len: self.tensors.len(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for endpoint in &self.endpoints {
            if endpoint.node.index() >= self.nodes.len() {
                return Err(GraphError::EndpointOutOfRange {
                    name: endpoint.name.clone(),
                    id: endpoint.node,
                    len: self.nodes.len(),
                });
            }
        }

        Ok(Graph {
            nodes: self.nodes,
            tensors: self.tensors,
            endpoints: self.endpoints,
            tensor_index: self.tensor_index,
            _state: std::marker::PhantomData,
        })
    }
}

impl Default for Graph<Building> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Linked state ───────────────────────────────────────────────────

impl Graph<Linked> {
    /// Returns the number of tensors still waiting for data.
    pub fn num_placeholders(&self) -> usize {
        self.tensors.iter().filter(|t| t.is_placeholder()).count()
    }

    /// Returns the total bytes of weight data attached to tensors.
    pub fn total_weight_bytes(&self) -> usize {
        self.tensors.iter().map(Tensor::size_bytes).sum()
    }

    /// Returns a summary string describing the network.
    pub fn summary(&self) -> String {
        let weight_kib = self.total_weight_bytes() as f64 / 1024.0;
        format!(
            "Graph: {} nodes, {} tensors ({} placeholders), {} endpoints, {:.1} KiB weight data",
            self.nodes.len(),
            self.tensors.len(),
            self.num_placeholders(),
            self.endpoints.len(),
            weight_kib,
        )
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<S: GraphState> Graph<S> {
    /// Returns the nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the tensors in insertion order.
    pub fn tensors(&self) -> &[Tensor] {
        &self.tensors
    }

    /// Returns the external interface records in insertion order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Returns a reference to a node, or `None` if out of bounds.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns a reference to a tensor, or `None` if out of bounds.
    pub fn tensor(&self, id: TensorId) -> Option<&Tensor> {
        self.tensors.get(id.index())
    }

    /// Looks a tensor up by name.
    ///
    /// When several tensors share a name this answers with the first
    /// one pushed, matching the order a linear scan would find.
    pub fn tensor_id(&self, name: &str) -> Option<TensorId> {
        self.tensor_index.get(name).copied()
    }

    /// Returns the total number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the total number of tensors.
    pub fn num_tensors(&self) -> usize {
        self.tensors.len()
    }
}

impl<S: GraphState> fmt::Display for Graph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Graph ({} nodes, {} tensors, {} endpoints):",
            self.nodes.len(),
            self.tensors.len(),
            self.endpoints.len(),
        )?;
        for node in &self.nodes {
            writeln!(f, "  {}", node.summary())?;
        }
        for tensor in &self.tensors {
            writeln!(f, "  {}", tensor.summary())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Shape, TensorRef};

    /// Helper: one node producing one placeholder tensor, fully linked.
    fn make_linked_pair(graph: &mut Graph<Building>, name: &str, depth: i32) -> (NodeId, TensorId) {
        let tid = graph.push_tensor(Tensor::placeholder(name, Shape::vector(4)));
        let mut node = Node::new(name, depth);
        node.outputs.push(TensorRef::resolved(name, tid));
        let nid = graph.push_node(node);
        (nid, tid)
    }

    #[test]
    fn test_push_assigns_positions() {
        let mut graph = Graph::new();
        let (n0, t0) = make_linked_pair(&mut graph, "a", 0);
        let (n1, t1) = make_linked_pair(&mut graph, "b", 1);
        assert_eq!(n0, NodeId(0));
        assert_eq!(n1, NodeId(1));
        assert_eq!(t0, TensorId(0));
        assert_eq!(t1, TensorId(1));
        assert_eq!(graph.node(n1).unwrap().name, "b");
    }

    #[test]
    fn test_first_name_wins() {
        let mut graph = Graph::new();
        let first = graph.push_tensor(Tensor::placeholder("w", Shape::vector(2)));
        let second = graph.push_tensor(Tensor::placeholder("w", Shape::vector(3)));
        assert_ne!(first, second);
        assert_eq!(graph.tensor_id("w"), Some(first));
    }

    #[test]
    fn test_finish_ok() {
        let mut graph = Graph::new();
        let (nid, _) = make_linked_pair(&mut graph, "x", 0);
        graph.push_endpoint("x", nid);
        let linked = graph.finish().unwrap();
        assert_eq!(linked.num_nodes(), 1);
        assert_eq!(linked.endpoints().len(), 1);
        assert_eq!(linked.num_placeholders(), 1);
    }

    #[test]
    fn test_finish_rejects_pending_output() {
        let mut graph = Graph::new();
        let mut node = Node::new("fc1", 1);
        node.outputs.push(TensorRef::pending("y"));
        graph.push_node(node);
        match graph.finish() {
            Err(GraphError::UnresolvedOutput { node, output }) => {
                assert_eq!(node, NodeId(0));
                assert_eq!(output, "y");
            }
            other => panic!("expected UnresolvedOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_finish_rejects_out_of_range_link() {
        let mut graph = Graph::new();
        let mut node = Node::new("fc1", 1);
        node.outputs.push(TensorRef::resolved("y", TensorId(9)));
        graph.push_node(node);
        assert!(matches!(
            graph.finish(),
            Err(GraphError::TensorIdOutOfRange { .. })
        ));
    }

    #[test]
    fn test_finish_rejects_bad_endpoint() {
        let mut graph = Graph::new();
        graph.push_endpoint("ghost", NodeId(3));
        assert!(matches!(
            graph.finish(),
            Err(GraphError::EndpointOutOfRange { .. })
        ));
    }

    #[test]
    fn test_pending_inputs_are_allowed() {
        let mut graph = Graph::new();
        let tid = graph.push_tensor(Tensor::placeholder("y", Shape::vector(4)));
        let mut node = Node::new("fc1", 1);
        node.inputs.push(TensorRef::pending("x"));
        node.outputs.push(TensorRef::resolved("y", tid));
        graph.push_node(node);
        let linked = graph.finish().unwrap();
        assert!(!linked.nodes()[0].inputs[0].is_resolved());
    }

    #[test]
    fn test_set_output_link() {
        let mut graph = Graph::new();
        let tid = graph.push_tensor(Tensor::placeholder("y", Shape::vector(4)));
        let mut node = Node::new("fc1", 1);
        node.outputs.push(TensorRef::pending("y"));
        let nid = graph.push_node(node);
        graph.set_output_link(nid, 0, tid);
        assert!(graph.finish().is_ok());
    }

    #[test]
    fn test_summary_and_display() {
        let mut graph = Graph::new();
        let (nid, tid) = make_linked_pair(&mut graph, "x", 0);
        graph.push_endpoint("x", nid);
        {
            let t = graph.tensor_mut(tid);
            t.data = Some(vec![0u8; 16]);
        }
        let linked = graph.finish().unwrap();
        let s = linked.summary();
        assert!(s.contains("1 nodes"));
        assert!(s.contains("0 placeholders"));
        let display = format!("{linked}");
        assert!(display.contains("node#0"));
        assert!(display.contains("loaded"));
    }
}
