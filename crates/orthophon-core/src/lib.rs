//! Phonological feature algebra.
//!
//! This crate holds the value types shared by the rule engine and the
//! transcriber: a closed catalog of phonological features, phonemes as
//! bundles of feature values, disjunctions, and the subset / merge / sonority
//! operations over them.
//!
//! # Architecture
//!
//! - [`feature`] -- Feature catalog and `FeatureValue`
//! - [`phoneme`] -- Feature bundles and phonemes (subset, merge, sonority)
//! - [`matcher`] -- Disjunctions and the `Matcher` normalization step
//! - [`segment`] -- Sequence elements: phones, boundaries, literals

pub mod feature;
pub mod matcher;
pub mod phoneme;
pub mod segment;

pub use feature::{
    Aspirated, Backness, Consonantal, Feature, FeatureValue, Geminate, Height, Length, Manner,
    Place, Roundedness, Voiced,
};
pub use matcher::{Disjunction, Matcher, disjunction};
pub use phoneme::{Features, Phoneme};
pub use segment::{Boundary, Segment};

/// Error type for feature comparison and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("cannot compare {left} with {right}: values of different features")]
    IncomparableFeature {
        left: FeatureValue,
        right: FeatureValue,
    },
    #[error("no shared sonority feature between {left} and {right}")]
    IncomparableSonority { left: String, right: String },
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
    #[error("unknown value {value:?} for feature {feature}")]
    UnknownValue { feature: Feature, value: String },
    #[error("malformed feature value {0:?}: expected `Feature.value`")]
    MalformedFeatureValue(String),
}
