//! Core types for the BigEar backend.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod rating;

pub use email::{Email, EmailError};
pub use id::*;
pub use rating::{Rating, RatingError};
