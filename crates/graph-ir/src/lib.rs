// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # graph-ir
//!
//! The in-memory representation of a loaded feed-forward network:
//! the data model that `graph-loader` builds and that viewers consume.
//!
//! - [`Shape`] — ordered dimension sizes of a tensor.
//! - [`DType`] — the element type of loaded weight data.
//! - [`Tensor`] — a named, shaped buffer; placeholders carry no data.
//! - [`Node`] — one parsed layer, with named tensor references.
//! - [`Graph`] — the whole network, with a **type-state pattern**
//!   (`Building` → `Linked`).
//!
//! # Type-State Lifecycle
//!
//! ```text
//! Graph<Building>   — mutable: nodes and tensors are appended,
//!       │             references hold names, ids fill in over time.
//!       │  .finish()
//!       ▼
//! Graph<Linked>     — immutable: every output reference points at a
//!                     real tensor; viewers get read-only access.
//! ```
//!
//! A `Graph<Linked>` can only come out of a successful `finish()`, so
//! a consumer can never observe a half-resolved graph. The markers are
//! zero-sized; the transition is free at runtime.
//!
//! # Example
//! ```
//! use graph_ir::{Graph, Node, Shape, Tensor, TensorRef};
//!
//! let mut graph = Graph::new();
//! let tid = graph.push_tensor(Tensor::placeholder("x", Shape::vector(4)));
//! let mut node = Node::new("x", 0);
//! node.outputs.push(TensorRef::resolved("x", tid));
//! graph.push_node(node);
//!
//! let linked = graph.finish().unwrap();
//! assert_eq!(linked.num_nodes(), 1);
//! assert_eq!(linked.num_tensors(), 1);
//! ```

mod dtype;
mod error;
mod graph;
mod node;
mod shape;
mod tensor;

pub use dtype::DType;
pub use error::GraphError;
pub use graph::{Building, Endpoint, Graph, GraphState, Linked};
pub use node::{Node, NodeId, TensorId, TensorRef};
pub use shape::Shape;
pub use tensor::Tensor;
