// Phonemes as bundles of feature values, and the bundle algebra.
//
// A bundle holds at most one value per feature. Features that are absent are
// unspecified: they never equal a concrete value and are skipped by subset
// tests, so a sparse bundle reads as "don't care" on everything it omits.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::FeatureError;
use crate::feature::{Feature, FeatureValue};
use crate::matcher::{Disjunction, Matcher};

// ---------------------------------------------------------------------------
// Features (bundle)
// ---------------------------------------------------------------------------

/// A feature bundle: a partial map from [`Feature`] to one of its values.
///
/// Stored as one optional ordinal per catalog slot, so copies are cheap and
/// equality/hashing are structural.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Features {
    slots: [Option<u8>; Feature::COUNT],
}

impl Features {
    /// An empty bundle (everything unspecified).
    pub const fn new() -> Self {
        Self {
            slots: [None; Feature::COUNT],
        }
    }

    /// Build a bundle from values applied left to right; later values win.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = FeatureValue>,
    {
        let mut bundle = Self::new();
        for value in values {
            bundle.set(value);
        }
        bundle
    }

    /// The value specified for `feature`, or `None` if unspecified.
    #[inline]
    pub fn get(&self, feature: Feature) -> Option<FeatureValue> {
        self.slots[feature.index()].map(|ordinal| FeatureValue::from_parts(feature, ordinal))
    }

    /// Specify `value`, replacing any previous value of the same feature.
    #[inline]
    pub fn set(&mut self, value: FeatureValue) {
        self.slots[value.feature().index()] = Some(value.ordinal() as u8);
    }

    /// Make `feature` unspecified, returning its previous value.
    pub fn remove(&mut self, feature: Feature) -> Option<FeatureValue> {
        let previous = self.get(feature);
        self.slots[feature.index()] = None;
        previous
    }

    pub fn contains(&self, value: FeatureValue) -> bool {
        self.get(value.feature()) == Some(value)
    }

    /// Number of specified features.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Specified values in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = FeatureValue> + '_ {
        Feature::ALL.iter().filter_map(|&f| self.get(f))
    }

    /// True iff every value specified here is also specified in `other`.
    pub fn is_subset_of(&self, other: &Features) -> bool {
        self.slots
            .iter()
            .zip(other.slots.iter())
            .all(|(mine, theirs)| mine.is_none() || mine == theirs)
    }

    /// This bundle overwritten by every value `other` specifies.
    pub fn merged_with(&self, other: &Features) -> Features {
        let mut merged = *self;
        for (slot, theirs) in merged.slots.iter_mut().zip(other.slots.iter()) {
            if theirs.is_some() {
                *slot = *theirs;
            }
        }
        merged
    }

    /// Features whose specification differs between the two bundles
    /// (including specified on one side only).
    pub fn differing(&self, other: &Features) -> impl Iterator<Item = Feature> + '_ {
        let other = *other;
        Feature::ALL
            .iter()
            .copied()
            .filter(move |&f| self.get(f) != other.get(f))
    }
}

impl From<FeatureValue> for Features {
    fn from(value: FeatureValue) -> Self {
        Features::from_values([value])
    }
}

impl From<Vec<FeatureValue>> for Features {
    fn from(values: Vec<FeatureValue>) -> Self {
        Features::from_values(values)
    }
}

impl From<&[FeatureValue]> for Features {
    fn from(values: &[FeatureValue]) -> Self {
        Features::from_values(values.iter().copied())
    }
}

impl From<&Phoneme> for Features {
    fn from(phoneme: &Phoneme) -> Self {
        phoneme.features
    }
}

impl From<Phoneme> for Features {
    fn from(phoneme: Phoneme) -> Self {
        phoneme.features
    }
}

impl FromIterator<FeatureValue> for Features {
    fn from_iter<T: IntoIterator<Item = FeatureValue>>(iter: T) -> Self {
        Features::from_values(iter)
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

// ---------------------------------------------------------------------------
// Phoneme
// ---------------------------------------------------------------------------

/// A sound unit: a feature bundle plus optional surface and source strings.
///
/// Equality and hashing look at the bundle only; `symbol` (IPA) and `grapheme`
/// (orthographic source) are annotations.
#[derive(Debug, Clone, Default)]
pub struct Phoneme {
    features: Features,
    symbol: Option<String>,
    grapheme: Option<String>,
}

impl Phoneme {
    /// A phoneme with nothing specified.
    pub fn new() -> Self {
        Self::default()
    }

    /// A phoneme with the given bundle and no annotations.
    pub fn from_features(features: impl Into<Features>) -> Self {
        Self {
            features: features.into(),
            symbol: None,
            grapheme: None,
        }
    }

    /// Add (or replace) one feature value.
    pub fn with(mut self, value: impl Into<FeatureValue>) -> Self {
        self.features.set(value.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_grapheme(mut self, grapheme: impl Into<String>) -> Self {
        self.grapheme = Some(grapheme.into());
        self
    }

    #[inline]
    pub fn features(&self) -> &Features {
        &self.features
    }

    /// The value of `feature`, or `None` when unspecified.
    #[inline]
    pub fn get(&self, feature: Feature) -> Option<FeatureValue> {
        self.features.get(feature)
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn grapheme(&self) -> Option<&str> {
        self.grapheme.as_deref()
    }

    /// `self <= other`: every value of this phoneme is present in `other`.
    ///
    /// Bare feature values are lifted to single-feature phonemes. When either
    /// side is a disjunction the test holds if it holds for any member.
    pub fn is_subset_of(&self, other: impl Into<Matcher>) -> bool {
        let other = other.into();
        other
            .members()
            .iter()
            .any(|member| self.features.is_subset_of(member.features()))
    }

    /// `self >= other`, the mirror of [`Phoneme::is_subset_of`].
    pub fn is_superset_of(&self, other: impl Into<Matcher>) -> bool {
        let other = other.into();
        other
            .members()
            .iter()
            .any(|member| member.features().is_subset_of(&self.features))
    }

    /// A new phoneme whose bundle is this one overwritten by `delta`.
    ///
    /// `delta` may be a phoneme, a single value, or a list of values applied
    /// left to right. The grapheme is kept; the symbol survives only if the
    /// bundle is unchanged, since it would otherwise describe a different sound.
    pub fn merged_with(&self, delta: impl Into<Features>) -> Phoneme {
        let features = self.features.merged_with(&delta.into());
        let symbol = if features == self.features {
            self.symbol.clone()
        } else {
            None
        };
        Phoneme {
            features,
            symbol,
            grapheme: self.grapheme.clone(),
        }
    }

    /// Step the value of `feature` one ordinal up (e.g. short to long).
    ///
    /// An unspecified feature stays unspecified.
    pub fn raised(&self, feature: Feature) -> Phoneme {
        match self.features.get(feature) {
            Some(value) => self.merged_with(value.raised()),
            None => self.clone(),
        }
    }

    /// Compare sonority on the first sonority-bearing feature both phonemes
    /// specify.
    pub fn sonority_cmp(&self, other: &Phoneme) -> Result<Ordering, FeatureError> {
        for feature in Feature::sonority_features() {
            if let (Some(mine), Some(theirs)) = (self.get(feature), other.get(feature)) {
                return mine.compare(theirs);
            }
        }
        Err(FeatureError::IncomparableSonority {
            left: self.to_string(),
            right: other.to_string(),
        })
    }

    /// Start a disjunction: this phoneme or `other`.
    pub fn or_else(&self, other: impl Into<Matcher>) -> Disjunction {
        Disjunction::from(self.clone()).or_else(other)
    }
}

impl PartialEq for Phoneme {
    fn eq(&self, other: &Self) -> bool {
        self.features == other.features
    }
}

impl Eq for Phoneme {}

impl Hash for Phoneme {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.features.hash(state);
    }
}

impl From<FeatureValue> for Phoneme {
    fn from(value: FeatureValue) -> Self {
        Phoneme::from_features(value)
    }
}

impl From<Features> for Phoneme {
    fn from(features: Features) -> Self {
        Phoneme::from_features(features)
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "/{symbol}/"),
            None => write!(f, "{}", self.features),
        }
    }
}
