//! devsite/crates/ds-core/src/lib.rs
//!
//! The central domain types and port definitions for devsite.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
