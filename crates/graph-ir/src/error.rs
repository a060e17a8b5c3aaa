// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for graph construction.

use crate::{NodeId, TensorId};

/// Errors that can occur when sealing a graph.
///
/// These come out of [`crate::Graph::finish`]; a `Graph<Linked>` is
/// guaranteed to be free of all of them.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A node output was never linked to a tensor.
    #[error("{node}: output '{output}' was never linked to a tensor")]
    UnresolvedOutput { node: NodeId, output: String },

    /// A tensor reference points past the end of the tensor list.
    #[error("{node}: output '{output}' links to {id} but the graph has {len} tensors")]
    TensorIdOutOfRange {
        node: NodeId,
        output: String,
        id: TensorId,
        len: usize,
    },

    /// An endpoint record names a node outside the node list.
    #[error("endpoint '{name}' points to {id} but the graph has {len} nodes")]
    EndpointOutOfRange {
        name: String,
        id: NodeId,
        len: usize,
    },
}
