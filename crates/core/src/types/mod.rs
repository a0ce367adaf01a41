//! Core types for Parceldeck.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod order;

pub use category::{Bucket, NominalCategory, Urgency};
pub use email::{Email, EmailError};
pub use order::{Order, OrderNumber, RawOrder};
