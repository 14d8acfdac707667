//! Domain types shared across all Bookmarkd services.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod id;
pub mod pagination;
pub mod rating;
