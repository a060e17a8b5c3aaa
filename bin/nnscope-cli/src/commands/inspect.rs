// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `nnscope inspect` command: display a dump's full graph.
//!
//! Loads the description plus every referenced weight file and prints
//! the node table, the tensor table, the endpoint list, and optional
//! previews of loaded f32 data — the textual equivalent of what a
//! node-editor viewer would render.

use crate::commands::truncate;
use crate::config::InspectorConfig;
use graph_ir::TensorRef;
use std::path::PathBuf;
use weight_store::SafetensorsSource;

pub fn execute(graph_path: PathBuf, config: &InspectorConfig) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              nnscope · Graph Inspector              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let graph = graph_loader::NetworkLoader::new()
        .load(&graph_path, &SafetensorsSource::new())
        .map_err(|e| anyhow::anyhow!("failed to load '{}': {e}", graph_path.display()))?;

    // ── Summary ────────────────────────────────────────────────
    println!("  {}", graph.summary());
    println!();

    // ── Nodes ──────────────────────────────────────────────────
    let w = config.max_name_width;
    println!(
        "  {:<4} {:<w$} {:>6}  {:<20} {:<20}",
        "Id", "Name", "Depth", "Inputs", "Outputs",
    );
    println!("  {}", "-".repeat(54 + w));
    for node in graph.nodes() {
        println!(
            "  {:<4} {:<w$} {:>6}  {:<20} {:<20}",
            node.id.index(),
            truncate(&node.name, w),
            node.depth,
            format_refs(&node.inputs),
            format_refs(&node.outputs),
        );
    }
    println!();

    // ── Tensors ────────────────────────────────────────────────
    println!(
        "  {:<4} {:<w$} {:<14} {:<6} {:>12}",
        "Id", "Name", "Shape", "Type", "Data",
    );
    println!("  {}", "-".repeat(40 + w));
    for (id, tensor) in graph.tensors().iter().enumerate() {
        if tensor.is_placeholder() && !config.show_placeholders {
            continue;
        }
        let data = if tensor.is_placeholder() {
            "-".to_string()
        } else {
            format!("{:.1} KiB", tensor.size_bytes() as f64 / 1024.0)
        };
        println!(
            "  {:<4} {:<w$} {:<14} {:<6} {:>12}",
            id,
            truncate(&tensor.name, w),
            format!("{}", tensor.shape),
            tensor.dtype.as_str(),
            data,
        );
    }
    println!();

    // ── Endpoints ──────────────────────────────────────────────
    println!("  Endpoints (declared inputs and outputs, one combined list):");
    for endpoint in graph.endpoints() {
        println!("   {} → {}", endpoint.name, endpoint.node);
    }
    println!();

    // ── Previews ───────────────────────────────────────────────
    if config.preview_values > 0 {
        for tensor in graph.tensors() {
            let Some(values) = tensor.f32_values() else {
                continue;
            };
            let shown: Vec<String> = values
                .iter()
                .take(config.preview_values)
                .map(|v| format!("{v:.4}"))
                .collect();
            let suffix = if values.len() > config.preview_values {
                ", ..."
            } else {
                ""
            };
            println!(
                "  {} = [{}{suffix}]",
                truncate(&tensor.name, w),
                shown.join(", "),
            );
        }
        println!();
    }

    Ok(())
}

/// Renders a reference list as `name#id` pairs, `~` for pending.
fn format_refs(refs: &[TensorRef]) -> String {
    if refs.is_empty() {
        return "-".to_string();
    }
    refs.iter()
        .map(|r| match r.tensor {
            Some(id) => format!("{}#{}", r.name, id.index()),
            None => format!("{}#~", r.name),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
