//! Collection traversal
//!
//! This module provides the callback-driven traversal of the fixed
//! three-level collection hierarchy (collection -> band -> album -> song):
//!
//! - `CollectionVisitor`: the lifecycle callback contract, every method
//!   optional via a default no-op body
//! - `CollectionWalker`: drives one full depth-first traversal, honoring
//!   skip signals and the ignore-marker rule

mod visitor;
mod walker;

// Re-export public types
pub use visitor::{CollectionVisitor, Flow};
pub use walker::{CollectionWalker, IGNORE_MARKER};
