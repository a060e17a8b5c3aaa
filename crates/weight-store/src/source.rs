// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Weight sources: where tensor records come from.
//!
//! [`SafetensorsSource`] is the production implementation; it reads
//! one-tensor safetensors files via mmap. [`MemorySource`] serves
//! records from a table so loader behaviour can be exercised without
//! touching the filesystem.

use crate::{WeightError, WeightRecord};
use graph_ir::{DType, Shape};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ── Trait ──────────────────────────────────────────────────────────

/// Reads one tensor record per path.
///
/// The loader resolves every queued path against this trait, so the
/// same load pipeline runs against files on disk or fixtures in
/// memory. Implementations must not cache failures: the loader stops
/// at the first error and reports it as-is.
pub trait WeightSource: Send + Sync {
    /// Reads the record stored at `path`.
    fn load(&self, path: &Path) -> Result<WeightRecord, WeightError>;
}

// ── Safetensors files ──────────────────────────────────────────────

/// File-backed source for single-tensor safetensors files.
///
/// Each call opens and memory-maps one file, checks that it holds
/// exactly one tensor record, and copies the payload out. Nothing is
/// kept between calls.
#[derive(Debug, Clone, Default)]
pub struct SafetensorsSource;

impl SafetensorsSource {
    /// Creates a new file-backed source.
    pub fn new() -> Self {
        Self
    }
}

impl WeightSource for SafetensorsSource {
    fn load(&self, path: &Path) -> Result<WeightRecord, WeightError> {
        let file = std::fs::File::open(path).map_err(|e| WeightError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| WeightError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        let st = safetensors::SafeTensors::deserialize(&mmap).map_err(|e| {
            WeightError::Malformed {
                path: path.to_path_buf(),
                detail: format!("safetensors parse error: {e}"),
            }
        })?;

        let mut entries = st.tensors();
        if entries.len() != 1 {
            return Err(WeightError::Malformed {
                path: path.to_path_buf(),
                detail: format!(
                    "expected exactly one tensor record, found {}",
                    entries.len()
                ),
            });
        }
        let (name, view) = entries.remove(0);

        let dtype = convert_dtype(view.dtype(), path)?;
        let record = WeightRecord {
            name,
            shape: Shape::from(view.shape()),
            dtype,
            data: view.data().to_vec(),
        };
        tracing::debug!(
            "weight store: read '{}' ({} bytes)",
            path.display(),
            record.size_bytes(),
        );
        Ok(record)
    }
}

/// Maps a safetensors element type onto the graph's [`DType`].
fn convert_dtype(dtype: safetensors::Dtype, path: &Path) -> Result<DType, WeightError> {
    match dtype {
        safetensors::Dtype::F32 => Ok(DType::F32),
        safetensors::Dtype::F16 => Ok(DType::F16),
        safetensors::Dtype::BF16 => Ok(DType::BF16),
        safetensors::Dtype::I8 => Ok(DType::I8),
        other => Err(WeightError::Malformed {
            path: path.to_path_buf(),
            detail: format!("unsupported element type {other:?}"),
        }),
    }
}

// ── In-memory fixtures ─────────────────────────────────────────────

/// Serves records from a path → record table.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: HashMap<PathBuf, WeightRecord>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record under a path, replacing any previous one.
    pub fn insert(&mut self, path: impl Into<PathBuf>, record: WeightRecord) {
        self.records.insert(path.into(), record);
    }

    /// Returns the number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl WeightSource for MemorySource {
    fn load(&self, path: &Path) -> Result<WeightRecord, WeightError> {
        self.records
            .get(path)
            .cloned()
            .ok_or_else(|| WeightError::Unreadable {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no record registered for path",
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Helper: writes a safetensors file under a fresh temp directory.
    fn write_fixture(
        dir: &str,
        file: &str,
        entries: &[(&str, safetensors::Dtype, Vec<usize>, Vec<u8>)],
    ) -> PathBuf {
        let dir = std::env::temp_dir().join(dir);
        std::fs::create_dir_all(&dir).unwrap();
        let views: Vec<(&str, safetensors::tensor::TensorView)> = entries
            .iter()
            .map(|(name, dtype, shape, data)| {
                (
                    *name,
                    safetensors::tensor::TensorView::new(*dtype, shape.clone(), data).unwrap(),
                )
            })
            .collect();
        let bytes = safetensors::serialize(views, &None).unwrap();
        let path = dir.join(file);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_load_single_tensor() {
        let path = write_fixture(
            "weight_store_test_single",
            "k.safetensors",
            &[(
                "weights_0",
                safetensors::Dtype::F32,
                vec![2, 2],
                f32_bytes(&[1.0, 2.0, 3.0, 4.0]),
            )],
        );

        let record = SafetensorsSource::new().load(&path).unwrap();
        assert_eq!(record.name, "weights_0");
        assert_eq!(record.shape, Shape::matrix(2, 2));
        assert_eq!(record.dtype, DType::F32);
        assert_eq!(record.size_bytes(), 16);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("weight_store_test_missing/nope.safetensors");
        let err = SafetensorsSource::new().load(&path).unwrap_err();
        assert!(matches!(err, WeightError::Unreadable { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn test_load_rejects_two_tensors() {
        let path = write_fixture(
            "weight_store_test_two",
            "pair.safetensors",
            &[
                ("a", safetensors::Dtype::F32, vec![2], f32_bytes(&[1.0, 2.0])),
                ("b", safetensors::Dtype::F32, vec![2], f32_bytes(&[3.0, 4.0])),
            ],
        );

        let err = SafetensorsSource::new().load(&path).unwrap_err();
        match err {
            WeightError::Malformed { detail, .. } => {
                assert!(detail.contains("exactly one"), "detail: {detail}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_unsupported_dtype() {
        let path = write_fixture(
            "weight_store_test_dtype",
            "f64.safetensors",
            &[(
                "w",
                safetensors::Dtype::F64,
                vec![1],
                vec![0u8; 8],
            )],
        );

        let err = SafetensorsSource::new().load(&path).unwrap_err();
        match err {
            WeightError::Malformed { detail, .. } => {
                assert!(detail.contains("unsupported"), "detail: {detail}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = std::env::temp_dir().join("weight_store_test_garbage");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("junk.safetensors");
        std::fs::write(&path, b"definitely not a tensor file").unwrap();

        let err = SafetensorsSource::new().load(&path).unwrap_err();
        assert!(matches!(err, WeightError::Malformed { .. }));
    }

    #[test]
    fn test_memory_source_roundtrip() {
        let mut source = MemorySource::new();
        assert!(source.is_empty());
        source.insert(
            "weights/k.bin",
            WeightRecord {
                name: "k".into(),
                shape: Shape::vector(3),
                dtype: DType::F32,
                data: f32_bytes(&[1.0, 2.0, 3.0]),
            },
        );
        assert_eq!(source.len(), 1);

        let record = source.load(Path::new("weights/k.bin")).unwrap();
        assert_eq!(record.shape, Shape::vector(3));

        let err = source.load(Path::new("weights/missing.bin")).unwrap_err();
        assert!(matches!(err, WeightError::Unreadable { .. }));
    }
}
