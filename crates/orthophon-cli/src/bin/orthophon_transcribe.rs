// orthophon-transcribe: Transcribe orthographic text into IPA.
//
// Transcribes the words given on the command line, or stdin line by line
// when no words are given. The first failing word aborts with exit code 1.
//
// Usage:
//   orthophon-transcribe [--language NAME | --config PATH] [OPTIONS] [WORD...]

use std::io::{self, BufRead, Write};

use clap::Parser;
use orthophon_cli::{LanguageArgs, fatal, init_tracing, load_language};
use orthophon_ortho::UnknownGraphemePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "orthophon-transcribe",
    about = "Transcribe orthographic text into IPA"
)]
struct Args {
    #[command(flatten)]
    language: LanguageArgs,

    /// Separator rendered between syllables.
    #[arg(long)]
    syllable_separator: Option<String>,

    /// Keep characters outside the alphabet instead of failing.
    #[arg(long)]
    passthrough: bool,

    /// Words to transcribe; reads stdin when empty.
    words: Vec<String>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.language.verbose);

    let mut lang = load_language(&args.language).unwrap_or_else(|e| fatal(&e));
    if let Some(separator) = args.syllable_separator {
        lang.options_mut().syllable_separator = Some(separator);
    }
    if args.passthrough {
        lang.options_mut().unknown_graphemes = UnknownGraphemePolicy::Passthrough;
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if !args.words.is_empty() {
        let text = args.words.join(" ");
        let ipa = lang.transcribe(&text).unwrap_or_else(|e| fatal(&e.to_string()));
        let _ = writeln!(out, "{ipa}");
        return;
    }

    for line in io::stdin().lock().lines() {
        let line = line.unwrap_or_else(|e| fatal(&format!("failed to read stdin: {e}")));
        let ipa = lang.transcribe(&line).unwrap_or_else(|e| fatal(&e.to_string()));
        let _ = writeln!(out, "{ipa}");
    }
}
