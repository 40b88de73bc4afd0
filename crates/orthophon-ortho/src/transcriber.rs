// OrthoPhonology: orthographic text in, phonetic transcription out.
//
// Pipeline per word: longest-match tokenization against the alphabet
// (optionally split into syllables by an external syllabifier), the ordered
// rule list, then symbol resolution against the inventory. Any failure aborts
// the whole call; there is no partial output.

use orthophon_core::{Boundary, Phoneme, Segment};
use orthophon_rules::{Rule, apply_rules};
use serde::Deserialize;
use tracing::{debug, debug_span};

use crate::TranscribeError;
use crate::alphabet::Alphabet;
use crate::inventory::Inventory;

/// What to do with a character no alphabet entry covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownGraphemePolicy {
    /// Fail with [`TranscribeError::UnknownGrapheme`].
    #[default]
    Fail,
    /// Keep the character as a [`Segment::Literal`] that no rule matches.
    /// Boundary sides (`W`, `S`) look past literals; segmental sides do not.
    Passthrough,
}

/// What to do with a phoneme whose bundle has no inventory symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPhonemePolicy {
    /// Build a symbol from the nearest inventory phoneme plus diacritics.
    #[default]
    Derive,
    /// Fail with [`TranscribeError::UnresolvedPhoneme`].
    Fail,
}

/// Transcription options. Deserializes from a language's `[options]` table;
/// omitted keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscribeOptions {
    /// Lowercase each word before tokenizing.
    pub lowercase: bool,
    pub unknown_graphemes: UnknownGraphemePolicy,
    pub unresolved_phonemes: UnresolvedPhonemePolicy,
    /// Rendered for syllable boundaries; `None` renders nothing.
    pub syllable_separator: Option<String>,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            unknown_graphemes: UnknownGraphemePolicy::default(),
            unresolved_phonemes: UnresolvedPhonemePolicy::default(),
            syllable_separator: None,
        }
    }
}

/// External syllabification collaborator.
///
/// Returns the syllables of `word` in order. The concatenation is expected to
/// spell the word; each syllable is tokenized on its own.
pub trait Syllabifier {
    fn syllabify(&self, word: &str) -> Vec<String>;
}

impl<F> Syllabifier for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn syllabify(&self, word: &str) -> Vec<String> {
        self(word)
    }
}

/// A language: inventory, alphabet and ordered rules.
///
/// Shareable read-only across threads. Reconfiguration either takes
/// `&mut self` ([`OrthoPhonology::set_rules`]) or builds a new value
/// ([`OrthoPhonology::with_rules`]).
#[derive(Debug, Clone)]
pub struct OrthoPhonology {
    name: String,
    inventory: Inventory,
    alphabet: Alphabet,
    rules: Vec<Rule>,
    options: TranscribeOptions,
}

impl OrthoPhonology {
    pub fn new(name: impl Into<String>, inventory: Inventory, alphabet: Alphabet) -> Self {
        Self {
            name: name.into(),
            inventory,
            alphabet,
            rules: Vec::new(),
            options: TranscribeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TranscribeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn options(&self) -> &TranscribeOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TranscribeOptions {
        &mut self.options
    }

    /// Replace the rule list in place.
    pub fn set_rules(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
    }

    /// A copy of this language with a different rule list.
    pub fn with_rules(&self, rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            ..self.clone()
        }
    }

    /// Tokenize one word by greedy longest match.
    ///
    /// The result holds phones and, under
    /// [`UnknownGraphemePolicy::Passthrough`], literals. No rules are applied.
    pub fn tokenize(&self, word: &str) -> Result<Vec<Segment>, TranscribeError> {
        let mut segments = Vec::with_capacity(word.len());
        self.tokenize_into(word, word, 0, &mut segments)?;
        Ok(segments)
    }

    /// Tokenize pre-split syllables, separated by syllable boundaries.
    pub fn tokenize_syllables(&self, syllables: &[&str]) -> Result<Vec<Segment>, TranscribeError> {
        let word: String = syllables.concat();
        let mut segments = Vec::with_capacity(word.len() + syllables.len());
        let mut offset = 0;
        for syllable in syllables.iter().filter(|s| !s.is_empty()) {
            if !segments.is_empty() {
                segments.push(Segment::Boundary(Boundary::Syllable));
            }
            self.tokenize_into(syllable, &word, offset, &mut segments)?;
            offset += syllable.chars().count();
        }
        Ok(segments)
    }

    fn tokenize_into(
        &self,
        text: &str,
        word: &str,
        offset: usize,
        out: &mut Vec<Segment>,
    ) -> Result<(), TranscribeError> {
        let mut rest = text;
        let mut position = offset;
        while let Some(first) = rest.chars().next() {
            match self.alphabet.longest_match(rest) {
                Some((grapheme, phonemes)) => {
                    out.extend(phonemes.iter().cloned().map(Segment::Phone));
                    position += grapheme.chars().count();
                    rest = &rest[grapheme.len()..];
                }
                None => {
                    if self.options.unknown_graphemes == UnknownGraphemePolicy::Fail {
                        return Err(TranscribeError::UnknownGrapheme {
                            word: word.to_string(),
                            position,
                            grapheme: first.to_string(),
                        });
                    }
                    out.push(Segment::Literal(first.to_string()));
                    position += 1;
                    rest = &rest[first.len_utf8()..];
                }
            }
        }
        Ok(())
    }

    /// Tokenize every whitespace-separated word of `text` without applying
    /// rules. Words are lowercased first when the options ask for it.
    pub fn tokenize_text(&self, text: &str) -> Result<Vec<Vec<Segment>>, TranscribeError> {
        self.words(text).map(|word| self.tokenize(&word)).collect()
    }

    /// Tokenize and rewrite every whitespace-separated word of `text`.
    pub fn analyze(&self, text: &str) -> Result<Vec<Vec<Segment>>, TranscribeError> {
        let words = self.tokenize_text(text)?;
        Ok(words.into_iter().map(|word| self.rewrite(word)).collect())
    }

    /// [`OrthoPhonology::analyze`] with syllable boundaries from `syllabifier`.
    pub fn analyze_with(
        &self,
        text: &str,
        syllabifier: &dyn Syllabifier,
    ) -> Result<Vec<Vec<Segment>>, TranscribeError> {
        self.words(text)
            .map(|word| -> Result<_, TranscribeError> {
                let syllables = syllabifier.syllabify(&word);
                let syllables: Vec<&str> = syllables.iter().map(String::as_str).collect();
                Ok(self.rewrite(self.tokenize_syllables(&syllables)?))
            })
            .collect()
    }

    /// Transcribe `text`; words are joined by a single space.
    pub fn transcribe(&self, text: &str) -> Result<String, TranscribeError> {
        let _span = debug_span!("transcribe", language = %self.name).entered();
        let words = self.analyze(text)?;
        self.render_words(&words)
    }

    /// [`OrthoPhonology::transcribe`] with syllable boundaries from
    /// `syllabifier`.
    pub fn transcribe_with(
        &self,
        text: &str,
        syllabifier: &dyn Syllabifier,
    ) -> Result<String, TranscribeError> {
        let _span = debug_span!("transcribe_with", language = %self.name).entered();
        let words = self.analyze_with(text, syllabifier)?;
        self.render_words(&words)
    }

    /// Render one analyzed word.
    pub fn render(&self, segments: &[Segment]) -> Result<String, TranscribeError> {
        let mut out = String::new();
        for segment in segments {
            match segment {
                Segment::Phone(phone) => match self.inventory.symbol_for(phone) {
                    Some(symbol) => out.push_str(symbol),
                    None => out.push_str(&self.unresolved(phone)?),
                },
                Segment::Boundary(Boundary::Syllable) => {
                    if let Some(separator) = &self.options.syllable_separator {
                        out.push_str(separator);
                    }
                }
                Segment::Boundary(Boundary::Word) => out.push(' '),
                Segment::Literal(text) => out.push_str(text),
            }
        }
        Ok(out)
    }

    fn unresolved(&self, phone: &Phoneme) -> Result<String, TranscribeError> {
        let derived = match self.options.unresolved_phonemes {
            UnresolvedPhonemePolicy::Derive => self.inventory.derive_symbol(phone),
            UnresolvedPhonemePolicy::Fail => None,
        };
        derived.ok_or_else(|| TranscribeError::UnresolvedPhoneme {
            features: phone.features().to_string(),
        })
    }

    fn render_words(&self, words: &[Vec<Segment>]) -> Result<String, TranscribeError> {
        let rendered = words
            .iter()
            .map(|word| self.render(word))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(words = rendered.len());
        Ok(rendered.join(" "))
    }

    fn rewrite(&self, segments: Vec<Segment>) -> Vec<Segment> {
        apply_rules(&self.rules, segments)
    }

    fn words(&self, text: &str) -> impl Iterator<Item = String> {
        let lowercase = self.options.lowercase;
        text.split_whitespace().map(move |word| {
            if lowercase {
                word.to_lowercase()
            } else {
                word.to_string()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orthophon_core::{
        Backness, Consonantal, Feature, FeatureValue, Features, Height, Length, Manner, Place,
        Voiced,
    };
    use orthophon_rules::{Action, EnvMatcher, environment};

    fn language() -> OrthoPhonology {
        let mut inventory = Inventory::new();
        let vowel = |height: Height, backness: Backness| {
            Features::from_values([
                FeatureValue::from(Consonantal::Neg),
                Voiced::Pos.into(),
                height.into(),
                backness.into(),
                Length::Short.into(),
            ])
        };
        let consonant = |voiced: Voiced, manner: Manner, place: Place| {
            Features::from_values([
                FeatureValue::from(Consonantal::Pos),
                voiced.into(),
                manner.into(),
                place.into(),
            ])
        };
        inventory.insert("a", vowel(Height::Open, Backness::Central));
        inventory.insert("i", vowel(Height::Close, Backness::Front));
        inventory.insert("s", consonant(Voiced::Neg, Manner::Fricative, Place::Alveolar));
        inventory.insert("z", consonant(Voiced::Pos, Manner::Fricative, Place::Alveolar));
        inventory.insert("t", consonant(Voiced::Neg, Manner::Stop, Place::Dental));

        let mut alphabet = Alphabet::new();
        for symbol in ["a", "i", "s", "t"] {
            let phoneme = inventory.by_symbol(symbol).cloned().into_iter().collect();
            alphabet.insert(symbol, phoneme);
        }
        let ts = ["t", "s"]
            .iter()
            .filter_map(|s| inventory.by_symbol(s).cloned())
            .collect();
        alphabet.insert("ts", ts);

        let voicing = Rule::new(
            "voicing",
            inventory.by_symbol("s").cloned().unwrap_or_default(),
            FeatureValue::from(Voiced::Pos),
        )
        .unwrap()
        .with_environment(environment(
            EnvMatcher::matching(Voiced::Pos),
            EnvMatcher::matching(Voiced::Pos),
        ));

        let mut language = OrthoPhonology::new("toy", inventory, alphabet);
        language.set_rules(vec![voicing]);
        language
    }

    #[test]
    fn language_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OrthoPhonology>();
        assert_send_sync::<TranscribeError>();
    }

    #[test]
    fn tokenize_longest_match() {
        let lang = language();
        let segments = lang.tokenize("atsa").unwrap();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1].as_phone().and_then(|p| p.grapheme()), Some("ts"));
    }

    #[test]
    fn unknown_grapheme_fails_with_position() {
        let lang = language();
        let err = lang.tokenize("ax").unwrap_err();
        assert_eq!(
            err,
            TranscribeError::UnknownGrapheme {
                word: "ax".into(),
                position: 1,
                grapheme: "x".into(),
            }
        );
        assert!(lang.transcribe("asa ax").is_err());
    }

    #[test]
    fn tokenize_text_skips_rules() {
        let lang = language();
        let words = lang.tokenize_text("ASA  sa").unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(lang.render(&words[0]).unwrap(), "asa");
        assert_eq!(lang.render(&lang.analyze("ASA").unwrap()[0]).unwrap(), "aza");
    }

    #[test]
    fn passthrough_keeps_literals() {
        let mut lang = language();
        lang.options_mut().unknown_graphemes = UnknownGraphemePolicy::Passthrough;
        assert_eq!(lang.transcribe("a1sa").unwrap(), "a1sa");
        assert_eq!(lang.transcribe("asa1").unwrap(), "aza1");
    }

    #[test]
    fn transcribe_applies_rules_per_word() {
        let lang = language();
        assert_eq!(lang.transcribe("asa  sat").unwrap(), "aza sat");
        assert_eq!(lang.transcribe("ASI").unwrap(), "azi");
        assert_eq!(lang.transcribe("").unwrap(), "");
    }

    #[test]
    fn lowercase_can_be_disabled() {
        let lang = language().with_options(TranscribeOptions {
            lowercase: false,
            ..TranscribeOptions::default()
        });
        assert!(matches!(
            lang.transcribe("A"),
            Err(TranscribeError::UnknownGrapheme { .. })
        ));
    }

    #[test]
    fn with_rules_leaves_original_untouched() {
        let lang = language();
        let bare = lang.with_rules(Vec::new());
        assert_eq!(bare.transcribe("asa").unwrap(), "asa");
        assert_eq!(lang.transcribe("asa").unwrap(), "aza");
        assert_eq!(lang.rules().len(), 1);
    }

    #[test]
    fn syllabifier_inserts_boundaries() {
        let lang = language().with_options(TranscribeOptions {
            syllable_separator: Some(".".into()),
            ..TranscribeOptions::default()
        });
        let split = |word: &str| -> Vec<String> {
            let (head, tail) = word.split_at(1);
            vec![head.to_string(), tail.to_string()]
        };
        // voicing sees through the syllable break
        assert_eq!(lang.transcribe_with("asa", &split).unwrap(), "a.za");
        let analyzed = lang.analyze_with("asa", &split).unwrap();
        assert!(analyzed[0][1].is_boundary(Boundary::Syllable));
    }

    #[test]
    fn syllable_boundaries_are_silent_without_separator() {
        let lang = language();
        let segments = lang.tokenize_syllables(&["a", "sa"]).unwrap();
        assert_eq!(segments.len(), 4);
        assert_eq!(lang.render(&segments).unwrap(), "asa");
    }

    #[test]
    fn syllable_error_reports_word_position() {
        let lang = language();
        let err = lang.tokenize_syllables(&["as", "ax"]).unwrap_err();
        assert!(matches!(err, TranscribeError::UnknownGrapheme { position: 3, .. }));
    }

    #[test]
    fn unresolved_policy() {
        let lang = language();
        let lengthen = Rule::new("lengthen", Consonantal::Neg, Action::raise(Feature::Length)).unwrap();
        let long = lang.with_rules([lengthen]);
        assert_eq!(long.transcribe("ta").unwrap(), "taː");

        let strict = long.with_options(TranscribeOptions {
            unresolved_phonemes: UnresolvedPhonemePolicy::Fail,
            ..TranscribeOptions::default()
        });
        assert!(matches!(
            strict.transcribe("ta"),
            Err(TranscribeError::UnresolvedPhoneme { .. })
        ));
    }
}
