// Environments: the (previous, next) context a rule requires.
//
// An environment is a pair of side matchers. Each side either accepts
// anything, requires a word or syllable edge, or requires a neighbouring
// phone that a `Matcher` accepts. The current segment is never inspected.

use std::fmt;

use orthophon_core::{Boundary, Disjunction, FeatureValue, Features, Matcher, Phoneme, Segment};

/// Matcher for one side of an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvMatcher {
    /// `ANY`: a phone, a boundary or the sequence edge.
    Any,
    /// `W`: a word boundary or the sequence edge.
    WordBoundary,
    /// `S`: a syllable boundary. Word edges count as syllable edges too.
    SyllableBoundary,
    /// A neighbouring phone accepted by the matcher (`matcher <= neighbour`).
    Match(Matcher),
}

/// `ANY` side matcher.
pub const ANY: EnvMatcher = EnvMatcher::Any;
/// `W` side matcher.
pub const W: EnvMatcher = EnvMatcher::WordBoundary;
/// `S` side matcher.
pub const S: EnvMatcher = EnvMatcher::SyllableBoundary;

impl EnvMatcher {
    /// Side matcher requiring a neighbouring phone accepted by `matcher`.
    pub fn matching(matcher: impl Into<Matcher>) -> Self {
        EnvMatcher::Match(matcher.into())
    }

    /// Whether `neighbour` satisfies this side. `None` is the sequence edge.
    pub fn accepts(&self, neighbour: Option<&Segment>) -> bool {
        match self {
            EnvMatcher::Any => true,
            EnvMatcher::WordBoundary => {
                neighbour.is_none_or(|s| s.is_boundary(Boundary::Word))
            }
            EnvMatcher::SyllableBoundary => {
                neighbour.is_none_or(|s| matches!(s, Segment::Boundary(_)))
            }
            EnvMatcher::Match(matcher) => neighbour
                .and_then(Segment::as_phone)
                .is_some_and(|phone| matcher.matches(phone)),
        }
    }

    /// Segments this side looks past when finding its neighbour.
    ///
    /// Only `S` looks at syllable breaks. Boundary sides also look past
    /// literals, so passthrough text does not hide a word edge.
    fn skips(&self, segment: &Segment) -> bool {
        match segment {
            Segment::Boundary(Boundary::Syllable) => {
                !matches!(self, EnvMatcher::SyllableBoundary)
            }
            Segment::Literal(_) => {
                matches!(self, EnvMatcher::WordBoundary | EnvMatcher::SyllableBoundary)
            }
            _ => false,
        }
    }
}

impl fmt::Display for EnvMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvMatcher::Any => f.write_str("ANY"),
            EnvMatcher::WordBoundary => f.write_str("W"),
            EnvMatcher::SyllableBoundary => f.write_str("S"),
            EnvMatcher::Match(matcher) => write!(f, "{matcher}"),
        }
    }
}

impl From<Matcher> for EnvMatcher {
    fn from(matcher: Matcher) -> Self {
        EnvMatcher::Match(matcher)
    }
}

impl From<Phoneme> for EnvMatcher {
    fn from(phoneme: Phoneme) -> Self {
        EnvMatcher::Match(phoneme.into())
    }
}

impl From<FeatureValue> for EnvMatcher {
    fn from(value: FeatureValue) -> Self {
        EnvMatcher::Match(value.into())
    }
}

impl From<Features> for EnvMatcher {
    fn from(features: Features) -> Self {
        EnvMatcher::Match(features.into())
    }
}

impl From<Disjunction> for EnvMatcher {
    fn from(disjunction: Disjunction) -> Self {
        EnvMatcher::Match(disjunction.into())
    }
}

/// Immutable left/right context predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    left: EnvMatcher,
    right: EnvMatcher,
}

/// Build an environment from its left and right side matchers.
pub fn environment(left: impl Into<EnvMatcher>, right: impl Into<EnvMatcher>) -> Environment {
    Environment::new(left, right)
}

impl Environment {
    pub fn new(left: impl Into<EnvMatcher>, right: impl Into<EnvMatcher>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn left(&self) -> &EnvMatcher {
        &self.left
    }

    pub fn right(&self) -> &EnvMatcher {
        &self.right
    }

    /// Test the triple directly. `current` is informational only.
    pub fn test(
        &self,
        previous: Option<&Segment>,
        _current: &Segment,
        next: Option<&Segment>,
    ) -> bool {
        self.left.accepts(previous) && self.right.accepts(next)
    }

    /// Test the environment of `sequence[position]`.
    ///
    /// Neighbours are looked up in the sequence. Syllable breaks are skipped
    /// for every side matcher except `S`; `W` and `S` also skip literals.
    pub fn test_at(&self, sequence: &[Segment], position: usize) -> bool {
        let before = &sequence[..position.min(sequence.len())];
        let after = sequence.get(position + 1..).unwrap_or(&[]);

        let previous = before.iter().rev().find(|s| !self.left.skips(s));
        let next = after.iter().find(|s| !self.right.skips(s));
        self.left.accepts(previous) && self.right.accepts(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orthophon_core::{Consonantal, Voiced};

    fn vowel() -> Phoneme {
        Phoneme::new().with(Consonantal::Neg).with(Voiced::Pos).with_symbol("a")
    }

    fn voiceless() -> Phoneme {
        Phoneme::new().with(Consonantal::Pos).with(Voiced::Neg).with_symbol("s")
    }

    fn voiced() -> EnvMatcher {
        EnvMatcher::matching(Voiced::Pos)
    }

    #[test]
    fn any_accepts_everything() {
        assert!(ANY.accepts(None));
        assert!(ANY.accepts(Some(&Segment::from(Boundary::Syllable))));
        assert!(ANY.accepts(Some(&Segment::from(vowel()))));
    }

    #[test]
    fn word_boundary_accepts_edges_only() {
        assert!(W.accepts(None));
        assert!(W.accepts(Some(&Segment::from(Boundary::Word))));
        assert!(!W.accepts(Some(&Segment::from(Boundary::Syllable))));
        assert!(!W.accepts(Some(&Segment::from(vowel()))));
    }

    #[test]
    fn syllable_boundary_accepts_breaks_and_edges() {
        assert!(S.accepts(Some(&Segment::from(Boundary::Syllable))));
        assert!(S.accepts(Some(&Segment::from(Boundary::Word))));
        assert!(S.accepts(None));
        assert!(!S.accepts(Some(&Segment::from(vowel()))));
    }

    #[test]
    fn match_needs_a_phone() {
        let m = voiced();
        assert!(m.accepts(Some(&Segment::from(vowel()))));
        assert!(!m.accepts(Some(&Segment::from(voiceless()))));
        assert!(!m.accepts(None));
        assert!(!m.accepts(Some(&Segment::Literal("1".into()))));
    }

    #[test]
    fn test_triple() {
        let env = environment(voiced(), voiced());
        let current = Segment::from(voiceless());
        let a = Segment::from(vowel());
        assert!(env.test(Some(&a), &current, Some(&a)));
        assert!(!env.test(Some(&a), &current, None));
        assert!(!env.test(Some(&current), &current, Some(&a)));
    }

    #[test]
    fn test_at_uses_sequence_edges() {
        let s: Vec<Segment> = vec![vowel().into(), voiceless().into()];
        let word_final = environment(ANY, W);
        assert!(word_final.test_at(&s, 1));
        assert!(!word_final.test_at(&s, 0));
        let word_initial = environment(W, ANY);
        assert!(word_initial.test_at(&s, 0));
    }

    #[test]
    fn test_at_sees_through_syllable_breaks() {
        let s: Vec<Segment> = vec![
            vowel().into(),
            Boundary::Syllable.into(),
            voiceless().into(),
            vowel().into(),
        ];
        let between_voiced = environment(voiced(), voiced());
        assert!(between_voiced.test_at(&s, 2));

        let after_break = environment(S, ANY);
        assert!(after_break.test_at(&s, 2));
        assert!(!after_break.test_at(&s, 3));
    }

    #[test]
    fn boundary_sides_see_through_literals() {
        let s: Vec<Segment> = vec![
            Segment::Literal("(".into()),
            vowel().into(),
            voiceless().into(),
            Segment::Literal("!".into()),
        ];
        assert!(environment(ANY, W).test_at(&s, 2));
        assert!(environment(W, ANY).test_at(&s, 1));
        assert!(environment(ANY, S).test_at(&s, 2));

        // a literal still blocks segmental context
        let s: Vec<Segment> = vec![voiceless().into(), Segment::Literal("1".into()), vowel().into()];
        assert!(!environment(ANY, voiced()).test_at(&s, 0));
        assert!(!environment(ANY, W).test_at(&s, 0));
    }
}
