//! CLI entry point for albumyear

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use albumyear::{CollectionWalker, YearGuesser, YearGuesserConfig};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            // Respect FORCE_COLOR environment variable
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            // Respect TERM=dumb
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            // Check if stdout is a TTY
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "albumyear")]
#[command(about = "Add release years to album directory names, inferred from song tags")]
#[command(
    long_about = "Walks a collection -> band -> album -> song directory tree, collects \
candidate years from the tag dates of each album's songs, and renames album directories \
to \"<year> - <name>\" when exactly one candidate year is found.\n\n\
This really does rename directories. Consider a filesystem snapshot (or --dry-run) \
before running it on your collection."
)]
#[command(version)]
struct Args {
    /// Collection root to walk
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Report inferred years without renaming anything
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

/// Install the log subscriber on stderr. `RUST_LOG` wins when no -v flag is
/// given.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let root = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(&args.path)
    };

    if !root.is_dir() {
        eprintln!(
            "albumyear: cannot access '{}': not a directory",
            args.path.display()
        );
        process::exit(1);
    }

    let config = YearGuesserConfig {
        dry_run: args.dry_run,
        use_color: should_use_color(args.color),
    };
    let mut guesser = YearGuesser::new(config);

    if let Err(e) = CollectionWalker::new(root).iterate(&mut guesser) {
        eprintln!("albumyear: {}", e);
        process::exit(1);
    }
}
