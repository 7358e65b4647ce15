//! Core types for Newsstand.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod kind;

pub use email::{Email, EmailError};
pub use id::*;
pub use kind::{AccessTier, ContentKind};
