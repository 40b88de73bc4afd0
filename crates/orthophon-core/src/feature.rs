// Feature catalog: the closed set of phonological features and their values.
//
// Every feature is a small enum whose declaration order is its ordinal order.
// `FeatureValue` erases the per-feature type into a (feature, ordinal) pair so
// that bundles, rules and configuration treat all features uniformly. Identity
// (same feature, same value) is plain equality; ordering is only available
// through `FeatureValue::compare`, which refuses to compare across features.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::FeatureError;
use crate::matcher::Matcher;
use crate::phoneme::Features;

macro_rules! feature_catalog {
    (
        $(
            $(#[doc = $doc:literal])*
            $feature:ident ($label:literal, sonority: $sonority:literal) {
                $( $variant:ident = $value:literal ),+ $(,)?
            }
        )+
    ) => {
        /// A phonological feature: one named dimension of description.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Feature {
            $( $(#[doc = $doc])* $feature, )+
        }

        impl Feature {
            /// Every feature, in catalog order.
            pub const ALL: &'static [Feature] = &[ $( Feature::$feature ),+ ];

            /// Number of features in the catalog.
            pub const COUNT: usize = Feature::ALL.len();

            /// Name used in the textual `Feature.value` form.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Feature::$feature => $label ),+
                }
            }

            /// Value names in ordinal order.
            pub const fn value_names(self) -> &'static [&'static str] {
                match self {
                    $( Feature::$feature => &[ $( $value ),+ ] ),+
                }
            }

            /// Whether the values of this feature rank sound strength.
            pub const fn is_sonority_bearing(self) -> bool {
                match self {
                    $( Feature::$feature => $sonority ),+
                }
            }
        }

        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub enum $feature {
                $( $variant ),+
            }

            impl $feature {
                /// All values in ordinal order.
                pub const ALL: &'static [$feature] = &[ $( $feature::$variant ),+ ];
            }

            impl From<$feature> for FeatureValue {
                fn from(value: $feature) -> Self {
                    FeatureValue {
                        feature: Feature::$feature,
                        ordinal: value as u8,
                    }
                }
            }

            impl From<$feature> for Features {
                fn from(value: $feature) -> Self {
                    Features::from(FeatureValue::from(value))
                }
            }

            impl From<$feature> for Matcher {
                fn from(value: $feature) -> Self {
                    Matcher::from(FeatureValue::from(value))
                }
            }
        )+
    };
}

feature_catalog! {
    /// Consonant (`pos`) or vowel (`neg`).
    Consonantal ("Consonantal", sonority: false) {
        Neg = "neg",
        Pos = "pos",
    }
    /// Vocal fold vibration.
    Voiced ("Voiced", sonority: false) {
        Neg = "neg",
        Pos = "pos",
    }
    Aspirated ("Aspirated", sonority: false) {
        Neg = "neg",
        Pos = "pos",
    }
    Geminate ("Geminate", sonority: false) {
        Neg = "neg",
        Pos = "pos",
    }
    /// Lip rounding; for consonants this is labialization.
    Roundedness ("Roundedness", sonority: false) {
        Neg = "neg",
        Pos = "pos",
    }
    Length ("Length", sonority: false) {
        Short = "short",
        Long = "long",
        Overlong = "overlong",
    }
    /// Vowel height, ordered from least to most sonorous.
    Height ("Height", sonority: true) {
        Close = "close",
        NearClose = "near_close",
        CloseMid = "close_mid",
        Mid = "mid",
        OpenMid = "open_mid",
        NearOpen = "near_open",
        Open = "open",
    }
    Backness ("Backness", sonority: false) {
        Front = "front",
        Central = "central",
        Back = "back",
    }
    /// Manner of articulation, ordered from least to most sonorous.
    Manner ("Manner", sonority: true) {
        Stop = "stop",
        Affricate = "affricate",
        Fricative = "fricative",
        Nasal = "nasal",
        Lateral = "lateral",
        Trill = "trill",
        Approximant = "approximant",
    }
    /// Place of articulation, front to back.
    Place ("Place", sonority: false) {
        Bilabial = "bilabial",
        Labiodental = "labiodental",
        Dental = "dental",
        Alveolar = "alveolar",
        Postalveolar = "postalveolar",
        Retroflex = "retroflex",
        Palatal = "palatal",
        Velar = "velar",
        Uvular = "uvular",
        Glottal = "glottal",
    }
}

impl Feature {
    /// The value at `index` in this feature's ordinal order.
    pub fn value_at(self, index: usize) -> Option<FeatureValue> {
        if index < self.value_names().len() {
            Some(FeatureValue {
                feature: self,
                ordinal: index as u8,
            })
        } else {
            None
        }
    }

    /// All values of this feature in ordinal order.
    pub fn values(self) -> impl Iterator<Item = FeatureValue> {
        (0..self.value_names().len()).filter_map(move |i| self.value_at(i))
    }

    /// Sonority-bearing features in catalog (priority) order.
    pub fn sonority_features() -> impl Iterator<Item = Feature> {
        Feature::ALL
            .iter()
            .copied()
            .filter(|f| f.is_sonority_bearing())
    }

    /// Features that only describe vowels.
    pub const fn is_vowel_only(self) -> bool {
        matches!(self, Feature::Height | Feature::Backness)
    }

    /// Features that only describe consonants.
    pub const fn is_consonant_only(self) -> bool {
        matches!(self, Feature::Manner | Feature::Place | Feature::Aspirated)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| FeatureError::UnknownFeature(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FeatureValue
// ---------------------------------------------------------------------------

/// One concrete setting of a feature: an immutable (feature, ordinal) pair.
///
/// Used standalone in rules and environments it stands for the single-feature
/// phoneme that specifies only this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureValue {
    feature: Feature,
    ordinal: u8,
}

impl FeatureValue {
    #[inline]
    pub fn feature(self) -> Feature {
        self.feature
    }

    #[inline]
    pub fn ordinal(self) -> usize {
        self.ordinal as usize
    }

    /// The value name, e.g. `"pos"` for `Voiced.pos`.
    pub fn name(self) -> &'static str {
        self.feature.value_names()[self.ordinal as usize]
    }

    /// Compare two values of the same feature by declaration order.
    ///
    /// Fails with [`FeatureError::IncomparableFeature`] when the values belong
    /// to different features.
    pub fn compare(self, other: FeatureValue) -> Result<Ordering, FeatureError> {
        if self.feature != other.feature {
            return Err(FeatureError::IncomparableFeature {
                left: self,
                right: other,
            });
        }
        Ok(self.ordinal.cmp(&other.ordinal))
    }

    /// The next value up in ordinal order, saturating at the last value.
    pub fn raised(self) -> FeatureValue {
        let last = self.feature.value_names().len() - 1;
        FeatureValue {
            feature: self.feature,
            ordinal: (self.ordinal as usize + 1).min(last) as u8,
        }
    }

    /// Rebuild a value from a feature and a stored ordinal.
    pub(crate) fn from_parts(feature: Feature, ordinal: u8) -> Self {
        Self { feature, ordinal }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.feature.name(), self.name())
    }
}

impl FromStr for FeatureValue {
    type Err = FeatureError;

    /// Parse the textual form `Feature.value`, e.g. `Manner.fricative`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (feature, value) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| FeatureError::MalformedFeatureValue(s.to_string()))?;
        let feature: Feature = feature.parse()?;
        feature
            .value_names()
            .iter()
            .position(|name| *name == value)
            .and_then(|i| feature.value_at(i))
            .ok_or_else(|| FeatureError::UnknownValue {
                feature,
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Catalog tests --

    #[test]
    fn catalog_is_complete() {
        assert_eq!(Feature::COUNT, 10);
        assert_eq!(Feature::ALL[0], Feature::Consonantal);
        assert_eq!(Feature::ALL[Feature::COUNT - 1], Feature::Place);
    }

    #[test]
    fn value_at_follows_declaration_order() {
        assert_eq!(Feature::Height.value_at(0), Some(Height::Close.into()));
        assert_eq!(Feature::Height.value_at(6), Some(Height::Open.into()));
        assert_eq!(Feature::Height.value_at(7), None);
        assert_eq!(Feature::Length.values().count(), 3);
    }

    #[test]
    fn sonority_features_are_manner_and_height() {
        let son: Vec<Feature> = Feature::sonority_features().collect();
        assert_eq!(son, vec![Feature::Height, Feature::Manner]);
    }

    // -- Comparison tests --

    #[test]
    fn compare_same_feature() {
        let stop = FeatureValue::from(Manner::Stop);
        let nasal = FeatureValue::from(Manner::Nasal);
        assert_eq!(stop.compare(nasal), Ok(Ordering::Less));
        assert_eq!(nasal.compare(stop), Ok(Ordering::Greater));
        assert_eq!(nasal.compare(nasal), Ok(Ordering::Equal));
    }

    #[test]
    fn compare_across_features_fails() {
        let err = FeatureValue::from(Manner::Stop)
            .compare(Voiced::Pos.into())
            .unwrap_err();
        assert!(matches!(err, FeatureError::IncomparableFeature { .. }));
    }

    #[test]
    fn raised_saturates() {
        let short = FeatureValue::from(Length::Short);
        assert_eq!(short.raised(), Length::Long.into());
        assert_eq!(short.raised().raised(), Length::Overlong.into());
        assert_eq!(short.raised().raised().raised(), Length::Overlong.into());
    }

    // -- Text form tests --

    #[test]
    fn display_and_parse() {
        let v = FeatureValue::from(Place::Postalveolar);
        assert_eq!(v.to_string(), "Place.postalveolar");
        assert_eq!("Place.postalveolar".parse::<FeatureValue>(), Ok(v));
        assert_eq!(" Voiced.neg ".parse::<FeatureValue>(), Ok(Voiced::Neg.into()));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "Voiced".parse::<FeatureValue>(),
            Err(FeatureError::MalformedFeatureValue(_))
        ));
        assert!(matches!(
            "Tone.high".parse::<FeatureValue>(),
            Err(FeatureError::UnknownFeature(_))
        ));
        assert!(matches!(
            "Voiced.maybe".parse::<FeatureValue>(),
            Err(FeatureError::UnknownValue {
                feature: Feature::Voiced,
                ..
            })
        ));
    }

    #[test]
    fn identity_ignores_order() {
        assert_eq!(FeatureValue::from(Voiced::Pos), FeatureValue::from(Voiced::Pos));
        assert_ne!(
            FeatureValue::from(Voiced::Pos),
            FeatureValue::from(Aspirated::Pos)
        );
    }
}
