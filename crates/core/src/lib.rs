//! Parceldeck Core - Order lifecycle types and classification engine.
//!
//! This crate provides the types and pure logic shared across Parceldeck
//! components:
//! - `dashboard` - Web dashboard serving the operator-facing JSON API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. Classification is recomputed in full from the latest
//! raw scanner snapshot on every load; nothing here persists state.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and enums for orders, categories, buckets
//! - [`engine`] - Snapshot reconciliation, classification, and view selection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod engine;
pub mod types;

pub use engine::*;
pub use types::*;
