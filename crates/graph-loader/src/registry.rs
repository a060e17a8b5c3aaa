// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The tensor registry: fail-fast batch loading of queued weight files.
//!
//! The scan phase queues `(tensor name, file)` requests; this phase
//! reads them in queue order through a [`WeightSource`], enforcing name
//! uniqueness as it goes. The first failure of any kind aborts the
//! batch — requests after it are never attempted. Only a fully
//! successful batch is merged into the graph.

use crate::LoadError;
use graph_ir::{Building, Graph};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use weight_store::{WeightRecord, WeightSource};

/// One queued weight file: which tensor it fills and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightRequest {
    /// Name the tensor is registered under in the graph.
    pub tensor_name: String,
    /// File path as written in the description (possibly relative).
    pub file: String,
}

impl WeightRequest {
    /// Creates a request.
    pub fn new(tensor_name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            tensor_name: tensor_name.into(),
            file: file.into(),
        }
    }
}

/// The records of one successful batch load, keyed by tensor name.
///
/// A registry only ever exists in a complete state: [`TensorRegistry::load`]
/// either reads every queued file or returns the first error. The map
/// is ordered by name, so the merge appends new tensors in a
/// deterministic order.
#[derive(Debug, Default)]
pub struct TensorRegistry {
    records: BTreeMap<String, WeightRecord>,
}

impl TensorRegistry {
    /// Reads every queued weight file, in queue order, fail-fast.
    ///
    /// Each file path is resolved against `base_dir` (the directory of
    /// the description file) unless already absolute. The uniqueness
    /// check runs after the fetch: a duplicate name is only reported
    /// for a file that was actually readable.
    pub fn load(
        requests: &[WeightRequest],
        base_dir: &Path,
        source: &dyn WeightSource,
    ) -> Result<Self, LoadError> {
        let mut records = BTreeMap::new();

        for request in requests {
            let path = resolve_path(&request.file, base_dir);
            tracing::debug!(
                "batch load: '{}' ← '{}'",
                request.tensor_name,
                path.display(),
            );
            let record = source.load(&path)?;

            if records.contains_key(&request.tensor_name) {
                return Err(LoadError::DuplicateTensorName {
                    name: request.tensor_name.clone(),
                    file: request.file.clone(),
                });
            }
            records.insert(request.tensor_name.clone(), record);
        }

        tracing::info!("batch load: {} weight files read", records.len());
        Ok(Self { records })
    }

    /// Returns the number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Folds every record into the graph.
    ///
    /// A record whose name already has a tensor (the first one pushed
    /// under that name) fills it in place; the file's shape and dtype
    /// replace the declared ones. A record with a fresh name is
    /// appended under its registry key. Nothing is removed or
    /// reordered, so every id handed out earlier stays valid.
    pub fn merge_into(self, graph: &mut Graph<Building>) {
        for (name, record) in self.records {
            match graph.tensor_id(&name) {
                Some(tid) => {
                    tracing::debug!("merge: filling {tid} '{name}' ({} bytes)", record.size_bytes());
                    let tensor = graph.tensor_mut(tid);
                    tensor.shape = record.shape;
                    tensor.dtype = record.dtype;
                    tensor.data = Some(record.data);
                }
                None => {
                    tracing::debug!("merge: appending '{name}' ({} bytes)", record.size_bytes());
                    graph.push_tensor(record.into_tensor(name));
                }
            }
        }
    }
}

/// Joins a declared file path onto the description's directory.
///
/// Absolute paths pass through untouched; relative ones get exactly
/// one separator from `Path::join`.
fn resolve_path(file: &str, base_dir: &Path) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
