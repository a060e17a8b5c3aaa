// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Named tensors: the data nodes of a network graph.

use crate::{DType, Shape};

/// A named, shaped buffer attached to the graph.
///
/// Tensors exist in two flavours. A *placeholder* was declared by the
/// network description but has no data yet (`data` is `None`); it keeps
/// only its name and the shape the description promised. A *loaded*
/// tensor carries the raw bytes read from a weight file. Loading may
/// fill a placeholder in place, at which point the shape recorded in
/// the file replaces the declared one.
///
/// # Memory Layout
/// Data is stored in row-major (C) order as a flat little-endian byte
/// buffer. Decoded access is provided via [`f32_values`](Tensor::f32_values).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Tensor {
    /// Unique name within the graph (e.g., `"fc1.kernel"`).
    pub name: String,
    /// Dimension sizes, declared or read from a weight file.
    pub shape: Shape,
    /// Element type of `data`.
    pub dtype: DType,
    /// Raw bytes, or `None` for a placeholder.
    pub data: Option<Vec<u8>>,
}

impl Tensor {
    /// Creates a placeholder tensor with no data.
    ///
    /// # Examples
    /// ```
    /// use graph_ir::{Shape, Tensor};
    /// let t = Tensor::placeholder("x", Shape::vector(4));
    /// assert!(t.is_placeholder());
    /// ```
    pub fn placeholder(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype: DType::F32,
            data: None,
        }
    }

    /// Creates a tensor that owns loaded weight data.
    pub fn with_data(name: impl Into<String>, shape: Shape, dtype: DType, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype,
            data: Some(data),
        }
    }

    /// Returns `true` if no data has been attached yet.
    pub fn is_placeholder(&self) -> bool {
        self.data.is_none()
    }

    /// Returns the total number of elements the shape describes.
    pub fn num_elements(&self) -> usize {
        self.shape.num_elements()
    }

    /// Returns the memory footprint of the attached data in bytes.
    ///
    /// Placeholders occupy no data memory, so this returns 0 for them
    /// regardless of the declared shape.
    pub fn size_bytes(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Decodes the buffer as little-endian `f32` values.
    ///
    /// Returns `None` for placeholders and for non-`F32` tensors. Any
    /// trailing bytes that do not form a full element are dropped.
    pub fn f32_values(&self) -> Option<Vec<f32>> {
        if self.dtype != DType::F32 {
            return None;
        }
        let data = self.data.as_deref()?;
        Some(
            data.chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect(),
        )
    }

    /// Returns a one-line description for listings and logs.
    pub fn summary(&self) -> String {
        let state = if self.is_placeholder() {
            "placeholder"
        } else {
            "loaded"
        };
        format!(
            "{} {} {} ({})",
            self.name,
            self.shape,
            self.dtype.as_str(),
            state,
        )
    }
}
