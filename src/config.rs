//! Configuration loader and schema types.
//!
//! This module exposes the settings schema that tunes the scanner, the
//! Genius client, the library cache and playlist output, plus helpers to
//! load it from disk and the environment.

mod load;
mod schema;

pub use schema::*;
