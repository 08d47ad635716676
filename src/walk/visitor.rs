//! Visitor contract for collection traversal

use std::path::Path;

use crate::error::Result;

/// Whether the walker should descend into a subtree or skip it entirely.
///
/// Returned by [`CollectionVisitor::begin_band`] and
/// [`CollectionVisitor::begin_album`]. `Skip` suppresses every callback for
/// that subtree, including the matching `end_*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Descend,
    Skip,
}

/// Lifecycle callbacks invoked by [`CollectionWalker::iterate`].
///
/// Every method has a default no-op body, so implementors only provide the
/// callbacks they care about. The walker guarantees strict nesting:
///
/// - `begin_collection` / `end_collection` fire exactly once, around
///   everything else
/// - `begin_band` / `end_band` bracket each band directory; loose songs and
///   albums of that band are visited in between
/// - `begin_album` / `end_album` bracket each album directory;
///   `visit_album_song` fires once per song file in between
/// - `visit_loose_song` fires for song files directly under a band, never
///   between a `begin_album` / `end_album` pair
///
/// An `Err` returned from any callback is not caught by the walker: it
/// propagates out of `iterate` and aborts the remainder of the traversal.
///
/// [`CollectionWalker::iterate`]: super::CollectionWalker::iterate
pub trait CollectionVisitor {
    fn begin_collection(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn end_collection(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Returning `Ok(Flow::Skip)` skips the band: no loose songs, no albums,
    /// no `end_band`.
    fn begin_band(&mut self, _path: &Path) -> Result<Flow> {
        Ok(Flow::Descend)
    }

    fn end_band(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Returning `Ok(Flow::Skip)` skips the album: no `visit_album_song`, no
    /// `end_album`.
    fn begin_album(&mut self, _path: &Path) -> Result<Flow> {
        Ok(Flow::Descend)
    }

    fn end_album(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn visit_album_song(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn visit_loose_song(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
