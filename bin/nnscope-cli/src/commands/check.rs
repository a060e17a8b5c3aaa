// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `nnscope check` command: load a dump and report one OK/error line.
//!
//! Exits non-zero on any load failure, so the command can gate a dump
//! in scripts and CI.

use std::path::PathBuf;
use weight_store::SafetensorsSource;

pub fn execute(graph_path: PathBuf) -> anyhow::Result<()> {
    match graph_loader::NetworkLoader::new().load(&graph_path, &SafetensorsSource::new()) {
        Ok(graph) => {
            println!("OK: {} — {}", graph_path.display(), graph.summary());
            Ok(())
        }
        Err(e) => anyhow::bail!("FAIL: {} — {e}", graph_path.display()),
    }
}
