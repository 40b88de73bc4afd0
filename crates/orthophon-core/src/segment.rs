// Segments: the elements of a phoneme sequence.
//
// Besides phones, a sequence carries boundary markers (word edges, syllable
// breaks supplied by a syllabifier) and literals for input that was passed
// through without analysis. Boundaries are explicit elements; running off the
// end of a sequence is a separate condition that callers treat as a word edge.

use std::fmt;

use crate::phoneme::Phoneme;

/// Kind of boundary marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Word edge (`W`).
    Word,
    /// Syllable break (`S`).
    Syllable,
}

/// One element of a phoneme sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Phone(Phoneme),
    Boundary(Boundary),
    /// Unanalyzed input kept verbatim; no rule or segmental matcher accepts it.
    Literal(String),
}

impl Segment {
    /// The phone carried by this segment, if any.
    pub fn as_phone(&self) -> Option<&Phoneme> {
        match self {
            Segment::Phone(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_boundary(&self, kind: Boundary) -> bool {
        matches!(self, Segment::Boundary(b) if *b == kind)
    }
}

impl From<Phoneme> for Segment {
    fn from(phoneme: Phoneme) -> Self {
        Segment::Phone(phoneme)
    }
}

impl From<Boundary> for Segment {
    fn from(boundary: Boundary) -> Self {
        Segment::Boundary(boundary)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Phone(p) => write!(f, "{p}"),
            Segment::Boundary(Boundary::Word) => f.write_str("#"),
            Segment::Boundary(Boundary::Syllable) => f.write_str("."),
            Segment::Literal(text) => write!(f, "<{text}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Voiced;

    #[test]
    fn as_phone_only_for_phones() {
        let phone = Segment::from(Phoneme::new().with(Voiced::Pos));
        assert!(phone.as_phone().is_some());
        assert!(Segment::from(Boundary::Word).as_phone().is_none());
        assert!(Segment::Literal("?".into()).as_phone().is_none());
    }

    #[test]
    fn boundary_kinds_are_distinct() {
        let syllable = Segment::from(Boundary::Syllable);
        assert!(syllable.is_boundary(Boundary::Syllable));
        assert!(!syllable.is_boundary(Boundary::Word));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Segment::from(Boundary::Word).to_string(), "#");
        assert_eq!(Segment::from(Boundary::Syllable).to_string(), ".");
        assert_eq!(Segment::Literal("1".into()).to_string(), "<1>");
        let p = Phoneme::new().with(Voiced::Pos).with_symbol("b");
        assert_eq!(Segment::from(p).to_string(), "/b/");
    }
}
