// orthophon-tokenize: Show the segments of each word.
//
// Prints one line per segment with its source grapheme, symbol and feature
// bundle, or a JSON array per word with --json. With --rules the segments are
// shown after the language's rules have run.
//
// Usage:
//   orthophon-tokenize [--language NAME | --config PATH] [--json] [--rules] [WORD...]

use std::io::{self, Read, Write};

use clap::Parser;
use orthophon_cli::{LanguageArgs, fatal, init_tracing, load_language};
use orthophon_core::{Boundary, Segment};
use orthophon_ortho::OrthoPhonology;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "orthophon-tokenize", about = "Show the phoneme segments of words")]
struct Args {
    #[command(flatten)]
    language: LanguageArgs,

    /// Print one JSON array per word.
    #[arg(long)]
    json: bool,

    /// Apply the language's rules before printing.
    #[arg(long)]
    rules: bool,

    /// Words to tokenize; reads stdin when empty.
    words: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum SegmentView {
    Phone {
        grapheme: Option<String>,
        symbol: Option<String>,
        features: Vec<String>,
    },
    Boundary {
        boundary: &'static str,
    },
    Literal {
        text: String,
    },
}

impl SegmentView {
    fn new(lang: &OrthoPhonology, segment: &Segment) -> Self {
        match segment {
            Segment::Phone(phone) => SegmentView::Phone {
                grapheme: phone.grapheme().map(String::from),
                symbol: lang.render(std::slice::from_ref(segment)).ok(),
                features: phone.features().iter().map(|v| v.to_string()).collect(),
            },
            Segment::Boundary(Boundary::Word) => SegmentView::Boundary { boundary: "word" },
            Segment::Boundary(Boundary::Syllable) => SegmentView::Boundary {
                boundary: "syllable",
            },
            Segment::Literal(text) => SegmentView::Literal { text: text.clone() },
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.language.verbose);
    let lang = load_language(&args.language).unwrap_or_else(|e| fatal(&e));

    let text = if args.words.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {e}")));
        input
    } else {
        args.words.join(" ")
    };

    let words = if args.rules {
        lang.analyze(&text)
    } else {
        lang.tokenize_text(&text)
    };
    let words = words.unwrap_or_else(|e| fatal(&e.to_string()));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for word in &words {
        let views: Vec<SegmentView> = word.iter().map(|s| SegmentView::new(&lang, s)).collect();
        if args.json {
            let json = serde_json::to_string(&views)
                .unwrap_or_else(|e| fatal(&format!("failed to encode JSON: {e}")));
            let _ = writeln!(out, "{json}");
            continue;
        }
        for (segment, view) in word.iter().zip(&views) {
            match (segment, view) {
                (Segment::Phone(phone), SegmentView::Phone { grapheme, symbol, .. }) => {
                    let _ = writeln!(
                        out,
                        "{:6} {:6} {}",
                        grapheme.as_deref().unwrap_or("-"),
                        symbol.as_deref().unwrap_or("?"),
                        phone.features()
                    );
                }
                _ => {
                    let _ = writeln!(out, "{segment}");
                }
            }
        }
        let _ = writeln!(out);
    }
}
