// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # bcm-observability
//!
//! Logging setup shared by the BCM crates and the experiment binary, with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: Combined log file per run with retention cleanup

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "bcm-config",
    "bcm-plasticity",
    "bcm-metrics",
    "bcm-experiment",
];
