// Matchers: the normalized operand of every matching operation.
//
// Rules, environments and subset tests accept a phoneme, a bare feature value,
// a per-feature enum value, or a disjunction. All of these funnel through
// `Matcher::from`, which lifts bare values into single-feature phonemes once,
// so the matching code only ever sees phonemes and flat lists of phonemes.

use std::fmt;
use std::slice;

use crate::feature::FeatureValue;
use crate::phoneme::{Features, Phoneme};

// ---------------------------------------------------------------------------
// Disjunction
// ---------------------------------------------------------------------------

/// An ordered "matches any of" list.
///
/// Always flat: extending with another disjunction appends its members.
/// A disjunction is only ever matched against, never merged into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disjunction {
    members: Vec<Phoneme>,
}

impl Disjunction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[Phoneme] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Append `other`; a disjunction contributes its members, not itself.
    pub fn or_else(mut self, other: impl Into<Matcher>) -> Disjunction {
        match other.into() {
            Matcher::Phoneme(p) => self.members.push(p),
            Matcher::Disjunction(d) => self.members.extend(d.members),
        }
        self
    }
}

impl From<Phoneme> for Disjunction {
    fn from(phoneme: Phoneme) -> Self {
        Self {
            members: vec![phoneme],
        }
    }
}

impl<M: Into<Matcher>> FromIterator<M> for Disjunction {
    fn from_iter<T: IntoIterator<Item = M>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Disjunction::new(), |acc, item| acc.or_else(item))
    }
}

/// Build a flat disjunction from any mix of matchable items.
pub fn disjunction<I, M>(items: I) -> Disjunction
where
    I: IntoIterator<Item = M>,
    M: Into<Matcher>,
{
    items.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// A single phoneme or a disjunction of phonemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Phoneme(Phoneme),
    Disjunction(Disjunction),
}

impl Matcher {
    /// The alternatives this matcher stands for (one for a plain phoneme).
    pub fn members(&self) -> &[Phoneme] {
        match self {
            Matcher::Phoneme(p) => slice::from_ref(p),
            Matcher::Disjunction(d) => d.members(),
        }
    }

    /// `self <= other` with OR semantics on whichever side is a disjunction:
    /// true iff some member of `self` is a subset of some member of `other`.
    ///
    /// With disjunctions involved this is not a partial order:
    /// `(a | b) <= c` holds as soon as `a <= c`, whatever `b` is.
    pub fn is_subset_of(&self, other: &Matcher) -> bool {
        self.members().iter().any(|mine| {
            other
                .members()
                .iter()
                .any(|theirs| mine.features().is_subset_of(theirs.features()))
        })
    }

    /// `self >= other`, i.e. `other <= self`.
    pub fn is_superset_of(&self, other: &Matcher) -> bool {
        other.is_subset_of(self)
    }

    /// Whether this matcher accepts `target` (`self <= target`).
    pub fn matches(&self, target: &Phoneme) -> bool {
        self.members()
            .iter()
            .any(|member| member.features().is_subset_of(target.features()))
    }

    /// Extend into a flat disjunction.
    pub fn or_else(self, other: impl Into<Matcher>) -> Disjunction {
        let base = match self {
            Matcher::Phoneme(p) => Disjunction::from(p),
            Matcher::Disjunction(d) => d,
        };
        base.or_else(other)
    }
}

impl From<Phoneme> for Matcher {
    fn from(phoneme: Phoneme) -> Self {
        Matcher::Phoneme(phoneme)
    }
}

impl From<&Phoneme> for Matcher {
    fn from(phoneme: &Phoneme) -> Self {
        Matcher::Phoneme(phoneme.clone())
    }
}

impl From<FeatureValue> for Matcher {
    fn from(value: FeatureValue) -> Self {
        Matcher::Phoneme(Phoneme::from(value))
    }
}

impl From<Features> for Matcher {
    fn from(features: Features) -> Self {
        Matcher::Phoneme(Phoneme::from(features))
    }
}

impl From<Disjunction> for Matcher {
    fn from(disjunction: Disjunction) -> Self {
        Matcher::Disjunction(disjunction)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, member) in self.members().iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{member}")?;
        }
        Ok(())
    }
}
