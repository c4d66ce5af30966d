//! Domain-specific type wrappers.

pub mod id;

pub use id::*;
