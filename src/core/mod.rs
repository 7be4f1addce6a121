//! Core library components.
//!
//! Everything the CLI drives lives here: the descriptor store, value
//! resolution, the local cache, the freshness gate, and remote sync.

pub mod cache;
pub mod config;
pub mod constants;
pub mod domain;
pub mod engine;
pub mod freshness;
pub mod fs;
pub mod prompt;
pub mod provider;
pub mod remote;
pub mod resolve;
pub mod store;
pub mod sync;
pub mod validation;
