// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The link pass: naming every node output a tensor id.
//!
//! Runs once, after scanning and merging, when the tensor list holds
//! everything it ever will. Each output name is looked up in the
//! graph's tensor index; when several tensors share a name, the first
//! one pushed wins. That first-match policy is the contract viewers
//! rely on, not an accident of scan order.
//!
//! Inputs are out of scope here. A linear layer's `source` reference
//! is recorded at scan time and then left alone, so it stays pending
//! in the finished graph; only its kernel and bias inputs ever carry
//! ids. Extending this pass to inputs would change what viewers see
//! and is deliberately not done.

use crate::LoadError;
use graph_ir::{Building, Graph};

/// Assigns a tensor id to every node output reference.
///
/// Fails with [`LoadError::TensorResolution`] naming the node and the
/// output the moment a name has no tensor; later nodes are not
/// examined.
pub fn resolve_links(graph: &mut Graph<Building>) -> Result<(), LoadError> {
    let mut linked = 0usize;

    for node_pos in 0..graph.num_nodes() {
        let node = &graph.nodes()[node_pos];
        let node_id = node.id;
        let node_name = node.name.clone();
        let slots: Vec<String> = node.outputs.iter().map(|o| o.name.clone()).collect();

        for (slot, output_name) in slots.iter().enumerate() {
            let tid = graph
                .tensor_id(output_name)
                .ok_or_else(|| LoadError::TensorResolution {
                    node: node_name.clone(),
                    output: output_name.clone(),
                })?;
            graph.set_output_link(node_id, slot, tid);
            linked += 1;
            tracing::debug!("link: {node_id} '{node_name}' output '{output_name}' → {tid}");
        }
    }

    tracing::info!("link pass: {linked} outputs resolved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_ir::{Node, Shape, Tensor, TensorId, TensorRef};

    #[test]
    fn test_resolves_outputs_by_name() {
        let mut graph = Graph::new();
        let tid = graph.push_tensor(Tensor::placeholder("y", Shape::vector(4)));
        let mut node = Node::new("fc1", 1);
        node.outputs.push(TensorRef::pending("y"));
        graph.push_node(node);

        resolve_links(&mut graph).unwrap();
        assert_eq!(graph.nodes()[0].outputs[0].tensor, Some(tid));
    }

    #[test]
    fn test_first_match_wins() {
        let mut graph = Graph::new();
        let first = graph.push_tensor(Tensor::placeholder("y", Shape::vector(2)));
        graph.push_tensor(Tensor::placeholder("y", Shape::vector(3)));
        let mut node = Node::new("fc1", 1);
        node.outputs.push(TensorRef::pending("y"));
        graph.push_node(node);

        resolve_links(&mut graph).unwrap();
        assert_eq!(graph.nodes()[0].outputs[0].tensor, Some(first));
    }

    #[test]
    fn test_already_linked_outputs_relink_consistently() {
        // An input layer links its output at scan time; re-resolving it
        // lands on the same tensor because that placeholder was the
        // first pushed under the name.
        let mut graph = Graph::new();
        let tid = graph.push_tensor(Tensor::placeholder("x", Shape::vector(4)));
        let mut node = Node::new("x", 0);
        node.outputs.push(TensorRef::resolved("x", tid));
        graph.push_node(node);

        resolve_links(&mut graph).unwrap();
        assert_eq!(graph.nodes()[0].outputs[0].tensor, Some(tid));
    }

    #[test]
    fn test_missing_tensor_names_the_node() {
        let mut graph = Graph::new();
        let mut node = Node::new("fc9", 3);
        node.outputs.push(TensorRef::pending("ghost"));
        graph.push_node(node);

        match resolve_links(&mut graph) {
            Err(LoadError::TensorResolution { node, output }) => {
                assert_eq!(node, "fc9");
                assert_eq!(output, "ghost");
            }
            other => panic!("expected TensorResolution, got {other:?}"),
        }
    }

    #[test]
    fn test_inputs_left_untouched() {
        let mut graph = Graph::new();
        graph.push_tensor(Tensor::placeholder("x", Shape::vector(4)));
        graph.push_tensor(Tensor::placeholder("y", Shape::vector(4)));
        let mut node = Node::new("fc1", 1);
        node.inputs.push(TensorRef::pending("x"));
        node.outputs.push(TensorRef::pending("y"));
        graph.push_node(node);

        resolve_links(&mut graph).unwrap();
        let node = &graph.nodes()[0];
        // A tensor named "x" exists, but input refs are never revisited.
        assert_eq!(node.inputs[0].tensor, None);
        assert_eq!(node.outputs[0].tensor, Some(TensorId(1)));
    }

    #[test]
    fn test_fail_fast_stops_at_first_miss() {
        let mut graph = Graph::new();
        graph.push_tensor(Tensor::placeholder("b", Shape::vector(1)));
        let mut bad = Node::new("bad", 0);
        bad.outputs.push(TensorRef::pending("a"));
        graph.push_node(bad);
        let mut good = Node::new("good", 1);
        good.outputs.push(TensorRef::pending("b"));
        graph.push_node(good);

        assert!(resolve_links(&mut graph).is_err());
        // The later node was never linked.
        assert!(!graph.nodes()[1].outputs[0].is_resolved());
    }
}
