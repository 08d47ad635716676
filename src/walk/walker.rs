//! CollectionWalker - drives one traversal of the three-level hierarchy

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use super::visitor::{CollectionVisitor, Flow};
use crate::error::Result;

/// Entries whose name starts with this character are excluded from
/// traversal at every level.
pub const IGNORE_MARKER: char = '[';

/// Walker over a collection rooted at a single directory.
///
/// The hierarchy shape is fixed: top-level directories are bands, their
/// child directories are albums, and files are songs (loose songs directly
/// under a band, album songs inside an album). Entries that break the shape
/// are logged and skipped; they never abort the traversal.
pub struct CollectionWalker {
    root: PathBuf,
}

impl CollectionWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Perform one full, synchronous, depth-first traversal, dispatching
    /// lifecycle callbacks on `visitor`.
    ///
    /// Children are visited in the order the directory provider returns
    /// them; no sorting is applied. A failure to list the collection root
    /// propagates, as does any `Err` returned by a visitor callback.
    pub fn iterate<V: CollectionVisitor>(&self, visitor: &mut V) -> Result<()> {
        visitor.begin_collection(&self.root)?;
        for entry in list_entries(&self.root)? {
            let path = entry.path();
            if path.is_dir() {
                self.walk_band(&path, visitor)?;
            } else {
                error!("Illegal top-level entry found: {}", path.display());
            }
        }
        visitor.end_collection(&self.root)?;
        Ok(())
    }

    fn walk_band<V: CollectionVisitor>(&self, band: &Path, visitor: &mut V) -> Result<()> {
        if visitor.begin_band(band)? == Flow::Skip {
            return Ok(());
        }
        for entry in list_entries(band)? {
            let path = entry.path();
            if path.is_dir() {
                self.walk_album(&path, visitor)?;
            } else {
                visitor.visit_loose_song(&path)?;
            }
        }
        visitor.end_band(band)
    }

    fn walk_album<V: CollectionVisitor>(&self, album: &Path, visitor: &mut V) -> Result<()> {
        if visitor.begin_album(album)? == Flow::Skip {
            return Ok(());
        }
        for entry in list_entries(album)? {
            let path = entry.path();
            if path.is_file() {
                visitor.visit_album_song(&path)?;
            } else {
                error!("Illegal non-file entry found in album: {}", path.display());
            }
        }
        visitor.end_album(album)
    }
}

/// List the children of `dir` in directory-provider order, applying the
/// ignore-marker rule.
fn list_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("Cannot read an entry of {}: {}", dir.display(), err);
                continue;
            }
        };
        if entry.file_name().to_string_lossy().starts_with(IGNORE_MARKER) {
            continue;
        }
        entries.push(entry);
    }
    Ok(entries)
}
