//! BigEar Core - Shared types library.
//!
//! This crate provides the common types used by the BigEar components,
//! primarily the `server` JSON API backend (auth, catalog, reviews).
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and ratings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
