// orthophon-cli: shared utilities for the command-line tools.

use std::path::{Path, PathBuf};
use std::process;

use orthophon_ortho::{OrthoPhonology, languages, parse_language_toml};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable naming a language definition file.
pub const LANGUAGE_ENV: &str = "ORTHOPHON_LANGUAGE";

/// Built-in language used when nothing else is selected.
pub const DEFAULT_LANGUAGE: &str = "gothic";

/// Language selection flags shared by every tool.
#[derive(Debug, Clone, clap::Args)]
pub struct LanguageArgs {
    /// Built-in language name.
    #[arg(short, long)]
    pub language: Option<String>,

    /// Language definition file (TOML). Takes precedence over --language.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Where a language definition comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSource {
    File(PathBuf),
    Builtin(String),
}

/// Pick the language source.
///
/// Search order:
/// 1. `--config PATH`
/// 2. `--language NAME`
/// 3. `ORTHOPHON_LANGUAGE` (a definition file path)
/// 4. the default built-in language
pub fn language_source(args: &LanguageArgs, env_path: Option<String>) -> LanguageSource {
    if let Some(path) = &args.config {
        return LanguageSource::File(path.clone());
    }
    if let Some(name) = &args.language {
        return LanguageSource::Builtin(name.clone());
    }
    match env_path.filter(|p| !p.is_empty()) {
        Some(path) => LanguageSource::File(PathBuf::from(path)),
        None => LanguageSource::Builtin(DEFAULT_LANGUAGE.to_string()),
    }
}

/// Load the language selected by `args` and the environment.
pub fn load_language(args: &LanguageArgs) -> Result<OrthoPhonology, String> {
    let source = language_source(args, std::env::var(LANGUAGE_ENV).ok());
    debug!(?source, "loading language");
    match source {
        LanguageSource::File(path) => load_file(&path),
        LanguageSource::Builtin(name) => languages::by_name(&name).ok_or_else(|| {
            format!(
                "unknown language {name:?} (built-in: {})",
                languages::NAMES.join(", ")
            )
        }),
    }
}

fn load_file(path: &Path) -> Result<OrthoPhonology, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    parse_language_toml(&text).map_err(|e| format!("invalid language file {}: {e}", path.display()))
}

/// Install a stderr subscriber. `RUST_LOG` wins over `verbosity`.
pub fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}
