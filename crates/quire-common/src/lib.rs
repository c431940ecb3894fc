//! Common utilities for the Quire box-tree builder.
//!
//! This crate provides shared infrastructure used by all components:
//! - **Warning System** - deduplicated, colored diagnostics for soft
//!   invariant violations and unsupported input

pub mod warning;
