//! Albumyear - add release years to album directory names, inferred from song tags

pub mod error;
pub mod metadata;
pub mod walk;
pub mod years;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, Result};
pub use metadata::{LoftyDateSource, MetadataError, TagDateSource};
pub use walk::{CollectionVisitor, CollectionWalker, Flow, IGNORE_MARKER};
pub use years::{YearGuesser, YearGuesserConfig};
