//! Newsstand gateway library.
//!
//! This crate provides the gateway functionality as a library, allowing
//! it to be tested and embedded. The binary in `main.rs` wires the
//! router to a listener; everything else lives here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod fallback;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod upstream;

pub use state::AppState;
