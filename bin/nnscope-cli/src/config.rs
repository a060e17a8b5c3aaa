// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Display configuration loaded from TOML files.
//!
//! # TOML Format
//! ```toml
//! preview_values = 8
//! show_placeholders = true
//! max_name_width = 28
//! ```

use anyhow::Context;
use std::path::Path;

/// Configuration for the `inspect` command's output.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InspectorConfig {
    /// How many leading f32 values to preview per loaded tensor
    /// (0 disables previews).
    #[serde(default = "default_preview_values")]
    pub preview_values: usize,
    /// Whether data-less placeholder tensors appear in the tensor table.
    #[serde(default = "default_true")]
    pub show_placeholders: bool,
    /// Column width node and tensor names are truncated to.
    #[serde(default = "default_max_name_width")]
    pub max_name_width: usize,
}

fn default_preview_values() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_max_name_width() -> usize {
    28
}

impl InspectorConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("TOML parse error")
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("TOML serialise error")
    }
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            preview_values: default_preview_values(),
            show_placeholders: true,
            max_name_width: default_max_name_width(),
        }
    }
}
