// Sound inventory: the concrete phonemes of a language, with their symbols.
//
// The inventory is used for lookup, not enforcement. Rules may produce
// bundles that are not listed here; such phonemes get a symbol derived from
// the closest listed phoneme plus IPA diacritics.

use hashbrown::HashMap;
use orthophon_core::{
    Aspirated, Consonantal, Feature, FeatureValue, Features, Geminate, Phoneme, Roundedness,
    Voiced,
};
use tracing::trace;

const VOICED_MARK: &str = "\u{032C}";
const VOICELESS_MARK: &str = "\u{0325}";
const ASPIRATION_MARK: &str = "ʰ";
const LABIALIZATION_MARK: &str = "ʷ";
const LENGTH_MARK: &str = "ː";

/// Ordered set of symbol-bearing phonemes, indexed by symbol and by bundle.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    phonemes: Vec<Phoneme>,
    by_symbol: HashMap<String, usize>,
    by_features: HashMap<Features, usize>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a phoneme under `symbol`.
    ///
    /// Returns `false` if the symbol is already taken. When two symbols share a
    /// bundle, bundle lookup returns the first one added.
    pub fn insert(&mut self, symbol: impl Into<String>, features: impl Into<Features>) -> bool {
        let symbol = symbol.into();
        if self.by_symbol.contains_key(&symbol) {
            return false;
        }
        let phoneme = Phoneme::from_features(features).with_symbol(symbol.as_str());
        let index = self.phonemes.len();
        self.by_features.entry(*phoneme.features()).or_insert(index);
        self.by_symbol.insert(symbol, index);
        self.phonemes.push(phoneme);
        true
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Phoneme> {
        self.by_symbol.get(symbol).map(|&i| &self.phonemes[i])
    }

    pub fn by_features(&self, features: &Features) -> Option<&Phoneme> {
        self.by_features.get(features).map(|&i| &self.phonemes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phoneme> {
        self.phonemes.iter()
    }

    pub fn len(&self) -> usize {
        self.phonemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }

    /// The phoneme's own symbol, else the symbol of the listed phoneme with
    /// the same bundle.
    pub fn symbol_for<'a>(&'a self, phoneme: &'a Phoneme) -> Option<&'a str> {
        phoneme
            .symbol()
            .or_else(|| self.by_features(phoneme.features()).and_then(Phoneme::symbol))
    }

    /// Build a symbol for an unlisted bundle.
    ///
    /// Picks the listed phoneme that differs from `target` in the fewest
    /// features, considering only bases whose differences can all be written
    /// as diacritics (voicing, aspiration, labialization, length and
    /// gemination, each only in the direction that adds the mark). Ties go to
    /// the earlier entry.
    pub fn derive_symbol(&self, target: &Phoneme) -> Option<String> {
        let mut best: Option<(&str, Marks)> = None;
        for base in &self.phonemes {
            let Some(symbol) = base.symbol() else {
                continue;
            };
            let Some(marks) = Marks::between(base.features(), target.features()) else {
                continue;
            };
            if best
                .as_ref()
                .is_none_or(|(_, current)| marks.changed < current.changed)
            {
                best = Some((symbol, marks));
            }
        }
        let (symbol, marks) = best?;
        let derived = marks.render(symbol);
        trace!(base = symbol, derived = %derived, "derived symbol");
        Some(derived)
    }
}

/// Diacritics turning a base bundle into a target bundle.
#[derive(Debug, Default)]
struct Marks {
    voicing: Option<&'static str>,
    aspirated: bool,
    labialized: bool,
    length: usize,
    changed: usize,
}

impl Marks {
    fn between(base: &Features, target: &Features) -> Option<Marks> {
        let mut marks = Marks::default();
        let consonant = target.contains(Consonantal::Pos.into());

        for feature in base.differing(target) {
            // the base says something the target leaves open
            let want = target.get(feature)?;
            let have = base.get(feature);
            match feature {
                Feature::Voiced if want == FeatureValue::from(Voiced::Pos) => {
                    marks.voicing = Some(VOICED_MARK);
                }
                Feature::Voiced => marks.voicing = Some(VOICELESS_MARK),
                Feature::Aspirated if want == FeatureValue::from(Aspirated::Pos) => {
                    marks.aspirated = true;
                }
                Feature::Roundedness
                    if consonant && want == FeatureValue::from(Roundedness::Pos) =>
                {
                    marks.labialized = true;
                }
                Feature::Geminate if want == FeatureValue::from(Geminate::Pos) => {
                    marks.length += 1;
                }
                Feature::Length => {
                    let from = have.map_or(0, FeatureValue::ordinal);
                    if want.ordinal() <= from {
                        return None;
                    }
                    marks.length += want.ordinal() - from;
                }
                _ => return None,
            }
            marks.changed += 1;
        }
        Some(marks)
    }

    fn render(&self, base: &str) -> String {
        let mut out = String::from(base);
        if let Some(mark) = self.voicing {
            out.push_str(mark);
        }
        if self.aspirated {
            out.push_str(ASPIRATION_MARK);
        }
        if self.labialized {
            out.push_str(LABIALIZATION_MARK);
        }
        for _ in 0..self.length {
            out.push_str(LENGTH_MARK);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orthophon_core::{Backness, Height, Length, Manner, Place};

    fn stop(voiced: Voiced, place: Place) -> Features {
        Features::from_values([
            FeatureValue::from(Consonantal::Pos),
            voiced.into(),
            Manner::Stop.into(),
            place.into(),
        ])
    }

    fn vowel(length: Length) -> Features {
        Features::from_values([
            FeatureValue::from(Consonantal::Neg),
            Voiced::Pos.into(),
            Height::Open.into(),
            Backness::Central.into(),
            length.into(),
        ])
    }

    fn inventory() -> Inventory {
        let mut inv = Inventory::new();
        assert!(inv.insert("t", stop(Voiced::Neg, Place::Dental)));
        assert!(inv.insert("k", stop(Voiced::Neg, Place::Velar)));
        assert!(inv.insert("g", stop(Voiced::Pos, Place::Velar)));
        assert!(inv.insert("a", vowel(Length::Short)));
        assert!(inv.insert("aː", vowel(Length::Long)));
        inv
    }

    #[test]
    fn duplicate_symbol_is_refused() {
        let mut inv = inventory();
        assert!(!inv.insert("t", stop(Voiced::Pos, Place::Dental)));
        assert_eq!(inv.len(), 5);
    }

    #[test]
    fn lookup_by_symbol_and_bundle() {
        let inv = inventory();
        let g = inv.by_symbol("g").unwrap();
        assert_eq!(g.symbol(), Some("g"));
        let bare = Phoneme::from_features(stop(Voiced::Pos, Place::Velar));
        assert_eq!(inv.symbol_for(&bare), Some("g"));
    }

    #[test]
    fn own_symbol_wins() {
        let inv = inventory();
        let p = Phoneme::from_features(stop(Voiced::Pos, Place::Velar)).with_symbol("ɡ");
        assert_eq!(inv.symbol_for(&p), Some("ɡ"));
    }

    #[test]
    fn derive_voicing() {
        let inv = inventory();
        let d = Phoneme::from_features(stop(Voiced::Pos, Place::Dental));
        assert_eq!(inv.symbol_for(&d), None);
        assert_eq!(inv.derive_symbol(&d).as_deref(), Some("t\u{032C}"));
    }

    #[test]
    fn derive_aspiration() {
        let inv = inventory();
        let kh = Phoneme::from_features(stop(Voiced::Neg, Place::Velar)).with(Aspirated::Pos);
        assert_eq!(inv.derive_symbol(&kh).as_deref(), Some("kʰ"));
    }

    #[test]
    fn derive_labialized_consonant() {
        let inv = inventory();
        let kw = Phoneme::from_features(stop(Voiced::Neg, Place::Velar)).with(Roundedness::Pos);
        assert_eq!(inv.derive_symbol(&kw).as_deref(), Some("kʷ"));
    }

    #[test]
    fn derive_overlong() {
        let inv = inventory();
        let overlong = Phoneme::from_features(vowel(Length::Overlong));
        assert_eq!(inv.derive_symbol(&overlong).as_deref(), Some("aːː"));
    }

    #[test]
    fn rounded_vowel_is_not_derivable() {
        let inv = inventory();
        let rounded = Phoneme::from_features(vowel(Length::Short)).with(Roundedness::Pos);
        assert_eq!(inv.derive_symbol(&rounded), None);
    }

    #[test]
    fn shortening_is_not_derivable() {
        let mut inv = Inventory::new();
        inv.insert("aː", vowel(Length::Long));
        let short = Phoneme::from_features(vowel(Length::Short));
        assert_eq!(inv.derive_symbol(&short), None);
    }
}
