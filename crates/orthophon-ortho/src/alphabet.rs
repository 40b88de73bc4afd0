// Grapheme table with greedy longest-match lookup.
//
// Keys may span several characters (digraphs such as Gothic `ai`, `th`).
// Lookup tries the longest key length first, so a digraph always wins over
// its first letter.

use hashbrown::HashMap;
use orthophon_core::Phoneme;

/// Mapping from graphemes to the phoneme sequence each one spells.
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    entries: HashMap<String, Vec<Phoneme>>,
    /// Longest key, in characters.
    max_chars: usize,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `grapheme`.
    ///
    /// Every phoneme is annotated with `grapheme` as its source. Returns
    /// `false` (and leaves the table untouched) for an empty grapheme or an
    /// empty phoneme sequence.
    pub fn insert(&mut self, grapheme: impl Into<String>, phonemes: Vec<Phoneme>) -> bool {
        let grapheme = grapheme.into();
        if grapheme.is_empty() || phonemes.is_empty() {
            return false;
        }
        let annotated = phonemes
            .into_iter()
            .map(|p| p.with_grapheme(grapheme.as_str()))
            .collect();
        self.max_chars = self.max_chars.max(grapheme.chars().count());
        self.entries.insert(grapheme, annotated);
        true
    }

    pub fn get(&self, grapheme: &str) -> Option<&[Phoneme]> {
        self.entries.get(grapheme).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Graphemes in unspecified order.
    pub fn graphemes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Longest grapheme that is a prefix of `text`.
    ///
    /// Returns the matched prefix and its phonemes, or `None` when not even
    /// the first character is in the table.
    pub fn longest_match<'t>(&self, text: &'t str) -> Option<(&'t str, &[Phoneme])> {
        // byte offsets of the first `max_chars` character ends
        let ends: Vec<usize> = text
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .take(self.max_chars)
            .collect();

        ends.iter().rev().find_map(|&end| {
            let prefix = &text[..end];
            self.get(prefix).map(|phonemes| (prefix, phonemes))
        })
    }
}
