// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the loading pipeline.

use std::path::PathBuf;

/// Errors that can occur while loading a network dump.
///
/// Every phase of the pipeline fails fast: the first error aborts the
/// whole load, and the caller never receives a graph. The variants name
/// the offending file, layer, or tensor so the diagnostic alone is
/// enough to find the problem in the dump.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The network description file could not be read.
    #[error("cannot read network description '{path}': {source}")]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The network description is not valid JSON.
    #[error("cannot parse network description '{path}': {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A layer declaration is structurally unusable (e.g., an `input`
    /// layer without exactly one output).
    #[error("layer '{layer}': {detail}")]
    LayerStructure { layer: String, detail: String },

    /// Two batch-load entries resolved to the same tensor name.
    #[error("duplicate tensor name '{name}' while loading '{file}'")]
    DuplicateTensorName { name: String, file: String },

    /// A weight file could not be read or decoded.
    #[error(transparent)]
    WeightFile(#[from] weight_store::WeightError),

    /// A node output names a tensor that does not exist anywhere in the
    /// graph after all loading.
    #[error("node '{node}': output '{output}' has no matching tensor")]
    TensorResolution { node: String, output: String },

    /// A declared graph input or output names a layer that was never
    /// parsed.
    #[error("declared interface name '{name}' matches no layer")]
    UnknownEndpoint { name: String },

    /// The assembled graph failed its final link check.
    #[error(transparent)]
    Graph(#[from] graph_ir::GraphError),
}
