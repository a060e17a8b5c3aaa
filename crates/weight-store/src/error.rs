// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for weight file access.

use std::path::PathBuf;

/// Errors that can occur while reading a weight file.
#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    /// The file could not be opened or mapped.
    #[error("cannot read weight file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file opened but its contents are not a usable tensor record.
    #[error("weight file '{path}' is malformed: {detail}")]
    Malformed { path: PathBuf, detail: String },
}

impl WeightError {
    /// Returns the path of the file the error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            WeightError::Unreadable { path, .. } => path,
            WeightError::Malformed { path, .. } => path,
        }
    }
}
