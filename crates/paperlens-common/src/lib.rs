//! paperlens-common — Shared error types used across all Paperlens crates.

pub mod error;

pub use error::{PaperlensError, Result};
