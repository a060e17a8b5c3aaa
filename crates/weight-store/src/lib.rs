// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # weight-store
//!
//! Access to the weight files a network dump refers to.
//!
//! A dump stores its parameters outside the JSON description, one
//! tensor per file next to it on disk. This crate turns a file path
//! into a [`WeightRecord`], behind the [`WeightSource`] trait:
//!
//! - [`SafetensorsSource`] — the production path: memory-maps a
//!   single-tensor safetensors file and copies the payload out.
//! - [`MemorySource`] — a path → record table for tests that must not
//!   touch the filesystem.
//!
//! The loader in `graph-loader` drives a `WeightSource` through its
//! load queue; everything here is per-file and stateless across calls.

mod error;
mod record;
mod source;

pub use error::WeightError;
pub use record::WeightRecord;
pub use source::{MemorySource, SafetensorsSource, WeightSource};
