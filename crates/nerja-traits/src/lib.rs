#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/nerja/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type definitions for the Nerja portfolio simulator.
//!
//! This crate provides the foundational pieces shared by the rest of the
//! workspace: the long-format trade table wrapper, date and symbol aliases,
//! and the error taxonomy.

/// The version of the nerja-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod types;

// Re-exports
pub use error::{NerjaError, Result};
pub use types::{Date, Symbol, TradePanel};
