//! GeoScope Core - Domain models, ports, and configuration
//!
//! This crate contains the core domain types and the port definitions
//! (dictionary model, classifier, tokenizer) shared by the GeoScope crates.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod models;
pub mod ports;
pub mod processing;

pub use dictionary::InMemoryDictionary;
pub use error::{GeoscopeError, Result};
