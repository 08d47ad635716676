//! Test utilities for building temporary collection trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};

use lofty::TagExt;
use tempfile::TempDir;

/// A temporary collection directory for testing.
///
/// Paths are given relative to the collection root with `/` separators, e.g.
/// `"Band/Album/song.mp3"`. The tree is cleaned up when dropped.
pub struct CollectionDir {
    dir: TempDir,
}

impl CollectionDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Path of the collection root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a directory (and any missing parents) under the root.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Create a file under the root, creating parent directories as needed.
    pub fn add_file(&self, path: &str, contents: &[u8]) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, contents).expect("Failed to write file");
        full_path
    }

    /// Create a minimal WAV file carrying a single date tag.
    pub fn add_song_with_date(&self, path: &str, date: &str) -> PathBuf {
        let full_path = self.add_file(path, &minimal_wav());
        write_date_tag(&full_path, date);
        full_path
    }
}

impl Default for CollectionDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes of the smallest WAV file lofty will read: a RIFF header, a PCM
/// "fmt " chunk, and a 4-byte data chunk.
pub fn minimal_wav() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(48);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&44100u32.to_le_bytes());
    bytes.extend_from_slice(&88200u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&4u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 4]);
    bytes
}

/// Stamp an ID3v2 date tag onto an existing audio file.
pub fn write_date_tag(path: &Path, date: &str) {
    let mut tag = lofty::Tag::new(lofty::TagType::Id3v2);
    tag.insert_text(lofty::ItemKey::RecordingDate, date.to_string());
    tag.save_to_path(path).expect("Failed to write date tag");
}
