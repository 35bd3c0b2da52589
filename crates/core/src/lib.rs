//! Catalog Core - Pure domain logic for the catalog backend.
//!
//! This crate holds everything the server can exercise without touching the
//! network:
//! - `matcher` - the product-image filename grammar
//! - `cache` - a generic TTL cache with lazy expiry eviction
//! - `categorize` - the legacy single-level photo categorizer
//! - `types` - shared result types (`ImageMatch`, `PhotoCategories`, ...)
//!
//! # Architecture
//!
//! The core crate contains no I/O and no HTTP clients. Remote traversal and
//! endpoint wiring live in `catalog-server`; this crate is what their tests
//! lean on.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod categorize;
pub mod matcher;
pub mod types;

pub use cache::TtlCache;
pub use categorize::categorize;
pub use matcher::variant_for;
pub use types::*;
