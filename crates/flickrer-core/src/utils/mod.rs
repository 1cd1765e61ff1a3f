//! Flickrer utilities
//!
//! Error types shared by every layer.

pub mod error;

pub use error::*;
