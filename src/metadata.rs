//! Audio tag reading via lofty

use std::path::Path;

use lofty::TaggedFileExt;
use thiserror::Error;
use tracing::debug;

/// Tag reading error types
///
/// Exactly two conditions are recoverable for year inference:
/// [`MetadataError::UnsupportedFormat`] and [`MetadataError::IllegalValue`].
/// Everything else propagates and aborts the run.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The file is not an audio format lofty recognizes
    #[error("unsupported file format")]
    UnsupportedFormat,

    /// The file was recognized but its tag data could not be parsed
    #[error("illegal value in tag data: {0}")]
    IllegalValue(String),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Source of date strings for a song file.
///
/// The year inference only ever looks at the date field of a song's tags,
/// so this is the whole seam to the tag-reading library.
pub trait TagDateSource {
    /// Date strings found in the file's tags, in tag item order.
    fn date_strings(&self, path: &Path) -> Result<Vec<String>, MetadataError>;
}

impl<F> TagDateSource for F
where
    F: Fn(&Path) -> Result<Vec<String>, MetadataError>,
{
    fn date_strings(&self, path: &Path) -> Result<Vec<String>, MetadataError> {
        self(path)
    }
}

/// Date source backed by the lofty library
pub struct LoftyDateSource;

impl LoftyDateSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoftyDateSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TagDateSource for LoftyDateSource {
    fn date_strings(&self, path: &Path) -> Result<Vec<String>, MetadataError> {
        let tagged_file = lofty::read_from_path(path).map_err(classify)?;

        let mut dates = Vec::new();
        for tag in tagged_file.tags() {
            for item in tag.items() {
                match item.key() {
                    lofty::ItemKey::RecordingDate | lofty::ItemKey::Year => {
                        if let Some(text) = item.value().text() {
                            dates.push(text.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        if dates.is_empty() {
            // lofty's `Tag` has no `Debug` impl; dump its type and items instead.
            let tags: Vec<_> = tagged_file
                .tags()
                .iter()
                .map(|tag| (tag.tag_type(), tag.items().collect::<Vec<_>>()))
                .collect();
            debug!("Tags for {}: {:?}", path.display(), tags);
        }

        Ok(dates)
    }
}

/// Split lofty failures into the two recoverable conditions and the rest.
fn classify(err: lofty::error::LoftyError) -> MetadataError {
    use lofty::error::ErrorKind;

    if matches!(err.kind(), ErrorKind::UnknownFormat) {
        MetadataError::UnsupportedFormat
    } else if matches!(err.kind(), ErrorKind::Io(_)) {
        MetadataError::Lofty(err)
    } else {
        MetadataError::IllegalValue(err.to_string())
    }
}
