// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The tensor record a weight file yields.

use graph_ir::{DType, Shape, Tensor};

/// One tensor as read from a weight file.
///
/// The `name` is whatever the file called the tensor internally; the
/// graph does not trust it. When a record is merged into a graph, the
/// name the description queued the file under wins, while the record's
/// shape, dtype, and data are authoritative.
#[derive(Debug, Clone)]
pub struct WeightRecord {
    /// Name stored inside the file.
    pub name: String,
    /// Shape stored inside the file.
    pub shape: Shape,
    /// Element type stored inside the file.
    pub dtype: DType,
    /// Raw little-endian payload.
    pub data: Vec<u8>,
}

impl WeightRecord {
    /// Returns the payload size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Converts the record into a graph tensor under the given name.
    ///
    /// The file-internal name is dropped here; `name` is the one the
    /// description used to queue this file.
    pub fn into_tensor(self, name: impl Into<String>) -> Tensor {
        Tensor::with_data(name, self.shape, self.dtype, self.data)
    }
}
