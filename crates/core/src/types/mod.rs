//! Core types for Storelane.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod feature;
pub mod id;
pub mod money;
pub mod slug;
pub mod status;

pub use feature::features;
pub use id::*;
pub use money::Money;
pub use slug::{Slug, SlugError};
pub use status::*;
