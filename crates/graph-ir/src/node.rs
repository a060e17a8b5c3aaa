// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Graph nodes and the identifiers that link them to tensors.

use std::fmt;

// ── Identifiers ────────────────────────────────────────────────────

/// Index of a node in its graph's node list.
///
/// Node ids are assigned on insertion and equal the node's position,
/// so viewers can use them directly as list offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Returns the underlying list index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Index of a tensor in its graph's tensor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TensorId(pub usize);

impl TensorId {
    /// Returns the underlying list index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tensor#{}", self.0)
    }
}

// ── Tensor references ──────────────────────────────────────────────

/// A node's edge to a tensor, by name first and by id once linked.
///
/// The network description names tensors before they exist, so a
/// reference starts out *pending*: it holds only the name. The link
/// pass fills in the id for every output reference; input references
/// stay pending, since only the producing node records the id.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TensorRef {
    /// Name the description used for this tensor.
    pub name: String,
    /// Position in the graph's tensor list, once known.
    pub tensor: Option<TensorId>,
}

impl TensorRef {
    /// Creates a reference that has not been linked yet.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tensor: None,
        }
    }

    /// Creates a reference that is already linked to a tensor.
    pub fn resolved(name: impl Into<String>, tensor: TensorId) -> Self {
        Self {
            name: name.into(),
            tensor: Some(tensor),
        }
    }

    /// Returns `true` if the reference has been linked.
    pub fn is_resolved(&self) -> bool {
        self.tensor.is_some()
    }
}

// ── Node ───────────────────────────────────────────────────────────

/// One parsed layer of the network.
///
/// A node keeps the description's name and depth verbatim; its `id` is
/// assigned by the graph on insertion.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Position of this node in the graph's node list.
    pub id: NodeId,
    /// Layer name from the description (e.g., `"fc1"`).
    pub name: String,
    /// Vertical placement hint for drawing, straight from the dump.
    pub depth: i32,
    /// Tensors this layer consumes.
    pub inputs: Vec<TensorRef>,
    /// Tensors this layer produces.
    pub outputs: Vec<TensorRef>,
}

impl Node {
    /// Creates a node with no edges. The graph overwrites `id` when the
    /// node is pushed.
    pub fn new(name: impl Into<String>, depth: i32) -> Self {
        Self {
            id: NodeId(0),
            name: name.into(),
            depth,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Returns a one-line description for listings and logs.
    pub fn summary(&self) -> String {
        format!(
            "{} '{}' depth {} ({} in, {} out)",
            self.id,
            self.name,
            self.depth,
            self.inputs.len(),
            self.outputs.len(),
        )
    }
}
