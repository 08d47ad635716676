//! Year inference over album directories
//!
//! Collects candidate years from the tag dates of an album's songs and, when
//! exactly one candidate remains at album end, renames the album directory
//! to `"<year> - <original name>"`. Albums whose directory name already
//! carries a year are skipped entirely.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::metadata::{LoftyDateSource, MetadataError, TagDateSource};
use crate::walk::{CollectionVisitor, Flow};

/// Album directory names that already carry a year: "1994 - Foo", "1994b - Foo".
static NAMED_ALBUM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}[a-z]? - \S+").expect("NAMED_ALBUM_PATTERN regex is invalid")
});

/// A date string qualifies as a year only if the whole string is a 4-digit
/// 19xx or 20xx. Anything longer ("1994-01-01", "circa 1994") is rejected.
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:19|20)\d\d$").expect("YEAR_PATTERN regex is invalid"));

/// Configuration for year inference behavior.
#[derive(Debug, Clone, Default)]
pub struct YearGuesserConfig {
    /// Report inferences without renaming anything
    pub dry_run: bool,
    /// Color the inference messages on stdout
    pub use_color: bool,
}

/// Visitor that infers album years from song tags and renames album
/// directories.
///
/// All accumulated state is scoped to the album currently being visited:
/// the candidate set is cleared on every non-skipped `begin_album` and again
/// after every `end_album`.
pub struct YearGuesser<S = LoftyDateSource> {
    source: S,
    config: YearGuesserConfig,
    candidates: BTreeSet<String>,
    stdout: StandardStream,
}

impl YearGuesser {
    pub fn new(config: YearGuesserConfig) -> Self {
        Self::with_source(LoftyDateSource::new(), config)
    }
}

impl<S: TagDateSource> YearGuesser<S> {
    /// Build a guesser over a caller-supplied date source.
    pub fn with_source(source: S, config: YearGuesserConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self {
            source,
            config,
            candidates: BTreeSet::new(),
            stdout: StandardStream::stdout(choice),
        }
    }

    fn rename_album(&self, year: &str, album: &Path) -> Result<()> {
        let Some(name) = album.file_name() else {
            // Album paths always come from directory entries and have a
            // leaf name.
            return Ok(());
        };
        let new_name = format!("{} - {}", year, name.to_string_lossy());
        let new_path = album.with_file_name(new_name);
        fs::rename(album, &new_path).map_err(|source| Error::Rename {
            from: album.to_path_buf(),
            to: new_path,
            source,
        })
    }

    fn report_inferred(&mut self, year: &str, album: &Path) -> io::Result<()> {
        write!(self.stdout, "Inferred year ")?;
        self.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(self.stdout, "{}", year)?;
        self.stdout.reset()?;
        write!(self.stdout, " for album at {}", album.display())?;
        if self.config.dry_run {
            write!(self.stdout, " (dry run, not renaming)")?;
        }
        writeln!(self.stdout)
    }

    fn report_unresolved(&mut self, album: &Path) -> io::Result<()> {
        write!(self.stdout, "Cannot infer year for album at {}", album.display())?;
        if !self.candidates.is_empty() {
            let years: Vec<&str> = self.candidates.iter().map(String::as_str).collect();
            write!(self.stdout, " Candidates are [{}]", years.join(", "))?;
        }
        writeln!(self.stdout)
    }
}

impl<S: TagDateSource> CollectionVisitor for YearGuesser<S> {
    fn begin_album(&mut self, album: &Path) -> Result<Flow> {
        let already_named = album
            .file_name()
            .map(|s| s.to_string_lossy())
            .is_some_and(|name| NAMED_ALBUM_PATTERN.is_match(&name));
        if already_named {
            debug!("Album at {} is already named with a year", album.display());
            return Ok(Flow::Skip);
        }
        self.candidates.clear();
        Ok(Flow::Descend)
    }

    fn visit_album_song(&mut self, song: &Path) -> Result<()> {
        let dates = match self.source.date_strings(song) {
            Ok(dates) => dates,
            Err(MetadataError::UnsupportedFormat) => {
                info!("Unsupported file format at {}", song.display());
                return Ok(());
            }
            Err(MetadataError::IllegalValue(reason)) => {
                info!("Illegal value in metadata for {}: {}", song.display(), reason);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        if dates.is_empty() {
            info!("No dates found for song at {}", song.display());
        }
        for date in &dates {
            if let Some(year) = normalize_date(date) {
                self.candidates.insert(year.to_string());
            }
        }
        Ok(())
    }

    fn end_album(&mut self, album: &Path) -> Result<()> {
        if self.candidates.len() == 1 {
            if let Some(year) = self.candidates.pop_first() {
                self.report_inferred(&year, album)?;
                if !self.config.dry_run {
                    self.rename_album(&year, album)?;
                }
            }
        } else {
            self.report_unresolved(album)?;
        }
        self.candidates.clear();
        Ok(())
    }
}

/// Apply the date normalization rule: the string must be, in its entirety, a
/// 4-digit 19xx/20xx year. Anything else is logged and contributes nothing.
fn normalize_date(raw: &str) -> Option<&str> {
    if YEAR_PATTERN.is_match(raw) {
        Some(raw)
    } else {
        error!("Unrecognized date string {:?}", raw);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    use crate::test_utils::CollectionDir;
    use crate::walk::CollectionWalker;

    fn config() -> YearGuesserConfig {
        YearGuesserConfig {
            dry_run: false,
            use_color: false,
        }
    }

    /// Date source reporting the same dates for every song.
    fn fixed_dates(dates: Vec<String>) -> impl Fn(&Path) -> Result<Vec<String>, MetadataError> {
        move |_| Ok(dates.clone())
    }

    /// Date source keyed by song file name.
    fn dates_by_song(
        map: HashMap<String, Vec<String>>,
    ) -> impl Fn(&Path) -> Result<Vec<String>, MetadataError> {
        move |path| {
            let leaf = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            Ok(map.get(&leaf).cloned().unwrap_or_default())
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_date_accepts_only_bare_years() {
        assert_eq!(normalize_date("1994"), Some("1994"));
        assert_eq!(normalize_date("2020"), Some("2020"));
        assert_eq!(normalize_date("circa 1994"), None);
        assert_eq!(normalize_date("1994-01-01"), None);
        assert_eq!(normalize_date("994"), None);
        assert_eq!(normalize_date("3020"), None);
        assert_eq!(normalize_date(""), None);
    }

    #[test]
    fn already_named_albums_are_skipped() {
        let mut guesser = YearGuesser::with_source(fixed_dates(vec![]), config());
        let skip = |g: &mut YearGuesser<_>, name: &str| {
            g.begin_album(&PathBuf::from("/c/band").join(name)).unwrap()
        };
        assert_eq!(skip(&mut guesser, "2001 - Foo"), Flow::Skip);
        assert_eq!(skip(&mut guesser, "1994b - Bar"), Flow::Skip);
        assert_eq!(skip(&mut guesser, "Foo"), Flow::Descend);
        assert_eq!(skip(&mut guesser, "1994 - "), Flow::Descend);
        assert_eq!(skip(&mut guesser, "1994-Foo"), Flow::Descend);
    }

    #[test]
    fn single_candidate_renames_the_album() {
        let dir = CollectionDir::new();
        let album = dir.add_dir("Vulfpeck/Fresh Air");

        let mut guesser =
            YearGuesser::with_source(fixed_dates(strings(&["1994"])), config());
        assert_eq!(guesser.begin_album(&album).unwrap(), Flow::Descend);
        guesser.visit_album_song(&album.join("a.mp3")).unwrap();
        guesser.visit_album_song(&album.join("b.mp3")).unwrap();
        guesser.end_album(&album).unwrap();

        assert!(!album.exists());
        assert!(album.with_file_name("1994 - Fresh Air").exists());
    }

    #[test]
    fn ambiguous_candidates_leave_the_album_alone() {
        let dir = CollectionDir::new();
        let album = dir.add_dir("Band/Album");

        let map = HashMap::from([
            ("a.mp3".to_string(), strings(&["1990"])),
            ("b.mp3".to_string(), strings(&["1995"])),
        ]);
        let mut guesser = YearGuesser::with_source(dates_by_song(map), config());
        guesser.begin_album(&album).unwrap();
        guesser.visit_album_song(&album.join("a.mp3")).unwrap();
        guesser.visit_album_song(&album.join("b.mp3")).unwrap();
        guesser.end_album(&album).unwrap();

        assert!(album.exists());
        assert!(guesser.candidates.is_empty(), "state must reset after end_album");
    }

    #[test]
    fn no_candidates_leave_the_album_alone() {
        let dir = CollectionDir::new();
        let album = dir.add_dir("Band/Album");

        let mut guesser = YearGuesser::with_source(fixed_dates(vec![]), config());
        guesser.begin_album(&album).unwrap();
        guesser.visit_album_song(&album.join("a.mp3")).unwrap();
        guesser.end_album(&album).unwrap();

        assert!(album.exists());
    }

    #[test]
    fn rejected_date_shapes_contribute_no_candidates() {
        let dir = CollectionDir::new();
        let album = dir.add_dir("Band/Album");

        let mut guesser = YearGuesser::with_source(
            fixed_dates(strings(&["circa 1994", "1994-01-01", "1994"])),
            config(),
        );
        guesser.begin_album(&album).unwrap();
        guesser.visit_album_song(&album.join("a.mp3")).unwrap();
        guesser.end_album(&album).unwrap();

        // Only the bare "1994" qualified, so the album was renamed.
        assert!(!album.exists());
        assert!(album.with_file_name("1994 - Album").exists());
    }

    #[test]
    fn dry_run_reports_but_does_not_rename() {
        let dir = CollectionDir::new();
        let album = dir.add_dir("Band/Album");

        let mut guesser = YearGuesser::with_source(
            fixed_dates(strings(&["1994"])),
            YearGuesserConfig {
                dry_run: true,
                use_color: false,
            },
        );
        guesser.begin_album(&album).unwrap();
        guesser.visit_album_song(&album.join("a.mp3")).unwrap();
        guesser.end_album(&album).unwrap();

        assert!(album.exists());
        assert!(!album.with_file_name("1994 - Album").exists());
    }

    #[test]
    fn unsupported_and_illegal_metadata_are_not_errors() {
        let dir = CollectionDir::new();
        let album = dir.add_dir("Band/Album");

        let source = |path: &Path| -> std::result::Result<Vec<String>, MetadataError> {
            if path.ends_with("weird.xyz") {
                Err(MetadataError::UnsupportedFormat)
            } else {
                Err(MetadataError::IllegalValue("bad frame".to_string()))
            }
        };
        let mut guesser = YearGuesser::with_source(source, config());
        guesser.begin_album(&album).unwrap();
        guesser.visit_album_song(&album.join("weird.xyz")).unwrap();
        guesser.visit_album_song(&album.join("mangled.mp3")).unwrap();
        guesser.end_album(&album).unwrap();

        assert!(album.exists());
    }

    #[test]
    fn unexpected_metadata_failures_propagate() {
        let source = |_: &Path| -> std::result::Result<Vec<String>, MetadataError> {
            Err(MetadataError::Io(std::io::Error::other("disk gone")))
        };
        let mut guesser = YearGuesser::with_source(source, config());
        guesser.begin_album(Path::new("/c/band/album")).unwrap();
        let result = guesser.visit_album_song(Path::new("/c/band/album/a.mp3"));
        assert!(result.is_err());
    }

    #[test]
    fn candidates_do_not_leak_across_albums() {
        let dir = CollectionDir::new();
        let first = dir.add_dir("Band/First");
        let second = dir.add_dir("Band/Second");

        let map = HashMap::from([
            ("a.mp3".to_string(), strings(&["1990"])),
            ("b.mp3".to_string(), strings(&["1994"])),
        ]);
        let mut guesser = YearGuesser::with_source(dates_by_song(map), config());

        guesser.begin_album(&first).unwrap();
        guesser.visit_album_song(&first.join("a.mp3")).unwrap();
        // A fresh begin_album drops whatever the previous album collected.
        guesser.begin_album(&second).unwrap();
        guesser.visit_album_song(&second.join("b.mp3")).unwrap();
        guesser.end_album(&second).unwrap();

        assert!(second.with_file_name("1994 - Second").exists());
    }

    #[test]
    fn full_traversal_renames_only_unnamed_albums() {
        let dir = CollectionDir::new();
        dir.add_file("Band/Unnamed/a.mp3", b"x");
        dir.add_file("Band/Unnamed/b.mp3", b"x");
        dir.add_file("Band/1987 - Named/c.mp3", b"x");

        let map = HashMap::from([
            ("a.mp3".to_string(), strings(&["1994"])),
            ("b.mp3".to_string(), strings(&["1994"])),
            ("c.mp3".to_string(), strings(&["2001"])),
        ]);
        let mut guesser = YearGuesser::with_source(dates_by_song(map), config());
        CollectionWalker::new(dir.path()).iterate(&mut guesser).unwrap();

        assert!(dir.path().join("Band/1994 - Unnamed").exists());
        assert!(!dir.path().join("Band/Unnamed").exists());
        assert!(dir.path().join("Band/1987 - Named").exists());
    }
}
