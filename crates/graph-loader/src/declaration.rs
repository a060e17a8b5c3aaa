// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON network description parsing.
//!
//! A dump's description file names the network's interface layers and
//! lists every layer with its type-specific fields.
//!
//! # Format
//! ```json
//! {
//!   "inputs": ["x"],
//!   "outputs": [["y"]],
//!   "layers": [
//!     {
//!       "type": "input",
//!       "name": "x",
//!       "output_names": ["x"],
//!       "rank": 0,
//!       "shape": [784]
//!     },
//!     {
//!       "type": "LinearFunction",
//!       "name": "fc1",
//!       "output_names": ["fc1"],
//!       "rank": 1,
//!       "source": "x",
//!       "kernel_weights_file": "fc1_W.safetensors",
//!       "bias_weights_file": "fc1_b.safetensors"
//!     }
//!   ]
//! }
//! ```
//!
//! Parsing is deliberately tolerant: unknown fields are ignored,
//! missing lists default to empty, and a missing `type` yields a
//! passthrough layer. Structural problems only become errors in the
//! phases that need the missing piece.

use crate::LoadError;
use std::path::Path;

/// Top-level network description, deserialized from the dump's JSON file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NetworkDecl {
    /// Names of the layers the network reads its input from.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Names of the layers the network exposes as results. Each entry
    /// is nested one level; only the first element is honoured.
    #[serde(default)]
    pub outputs: Vec<Vec<String>>,
    /// Layer declarations, in display order.
    #[serde(default)]
    pub layers: Vec<LayerDecl>,
}

/// A single layer entry in the description.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LayerDecl {
    /// Layer type string (e.g., `"input"`, `"LinearFunction"`). Any
    /// other value is tolerated and produces an inert node.
    #[serde(rename = "type", default)]
    pub layer_type: String,
    /// Unique logical name of the layer.
    #[serde(default)]
    pub name: String,
    /// Names of the tensors this layer produces. Only a single output
    /// is fully supported.
    #[serde(default)]
    pub output_names: Vec<String>,
    /// Vertical placement hint for drawing.
    #[serde(default)]
    pub rank: i32,
    /// Optional file supplying a pre-computed result for the layer's
    /// sole output.
    #[serde(default)]
    pub output_tensor: Option<String>,

    // `input` layers only.
    /// Declared tensor shape. Required for `input` layers.
    #[serde(default)]
    pub shape: Option<Vec<usize>>,
    /// Optional file with concrete input data, treated exactly like
    /// `output_tensor`.
    #[serde(default)]
    pub input_tensor: Option<String>,

    // `LinearFunction` layers only.
    /// Name of the layer this one reads from.
    #[serde(default)]
    pub source: Option<String>,
    /// File holding the kernel weight matrix.
    #[serde(default)]
    pub kernel_weights_file: Option<String>,
    /// File holding the bias vector.
    #[serde(default)]
    pub bias_weights_file: Option<String>,
}

impl NetworkDecl {
    /// Loads a description from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::DocumentOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| LoadError::DocumentParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parses a description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_declaration() {
        let json = r#"{
            "inputs": ["x"],
            "outputs": [["y"]],
            "layers": [
                {
                    "type": "input", "name": "x",
                    "output_names": ["x"], "rank": 0, "shape": [784]
                },
                {
                    "type": "LinearFunction", "name": "y",
                    "output_names": ["y"], "rank": 1,
                    "source": "x",
                    "kernel_weights_file": "W.safetensors",
                    "bias_weights_file": "b.safetensors"
                }
            ]
        }"#;
        let decl = NetworkDecl::from_json(json).unwrap();
        assert_eq!(decl.inputs, vec!["x"]);
        assert_eq!(decl.outputs, vec![vec!["y".to_string()]]);
        assert_eq!(decl.layers.len(), 2);
        assert_eq!(decl.layers[0].layer_type, "input");
        assert_eq!(decl.layers[0].shape, Some(vec![784]));
        assert_eq!(decl.layers[1].source.as_deref(), Some("x"));
    }

    #[test]
    fn test_missing_fields_default() {
        let decl = NetworkDecl::from_json(r#"{ "layers": [{ "name": "mystery" }] }"#).unwrap();
        assert!(decl.inputs.is_empty());
        assert!(decl.outputs.is_empty());
        let layer = &decl.layers[0];
        assert_eq!(layer.layer_type, "");
        assert_eq!(layer.rank, 0);
        assert!(layer.output_names.is_empty());
        assert!(layer.shape.is_none());
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let json = r#"{
            "layers": [{
                "type": "Softmax", "name": "s",
                "output_names": ["s"], "rank": 2,
                "temperature": 0.5
            }],
            "exporter_version": "3.1"
        }"#;
        let decl = NetworkDecl::from_json(json).unwrap();
        assert_eq!(decl.layers[0].layer_type, "Softmax");
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(NetworkDecl::from_json("{ not json").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let path = std::env::temp_dir().join("graph_loader_decl_missing/net.json");
        match NetworkDecl::from_file(&path) {
            Err(LoadError::DocumentOpen { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected DocumentOpen, got {other:?}"),
        }
    }

    #[test]
    fn test_from_file_garbage() {
        let dir = std::env::temp_dir().join("graph_loader_decl_garbage");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("net.json");
        std::fs::write(&path, "]]]").unwrap();
        assert!(matches!(
            NetworkDecl::from_file(&path),
            Err(LoadError::DocumentParse { .. })
        ));
    }
}
