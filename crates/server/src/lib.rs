//! Catalog server library.
//!
//! Exposes the server as a library so the router can be exercised in tests
//! without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod graph;
pub mod images;
pub mod routes;
pub mod sheet;
pub mod state;
