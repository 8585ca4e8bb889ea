//! Core types for Dandeline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod slug;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::minor_to_decimal;
pub use slug::{slugify, with_suffix};
pub use status::*;
