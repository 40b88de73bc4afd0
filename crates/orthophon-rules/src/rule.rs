// Phonological rules: condition, action, optional environment.
//
// A rule is validated once when it is built and is immutable afterwards.
// Attaching an environment produces a new rule, so a bare rule can serve as
// a template for several context-specific variants.

use std::fmt;

use orthophon_core::{Consonantal, Feature, FeatureValue, Matcher, Phoneme, Segment};

use crate::RuleError;
use crate::environment::Environment;

/// What a rule does to a target phone whose condition and environment hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Merge these values onto the target, left to right.
    Delta(Vec<FeatureValue>),
    /// Substitute these phonemes for the target. Zero phonemes deletes it,
    /// more than one lengthens the sequence.
    Replace(Vec<Phoneme>),
    /// Step the target's value of this feature one ordinal up.
    Raise(Feature),
}

impl Action {
    pub fn delta<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FeatureValue>,
    {
        Action::Delta(values.into_iter().map(Into::into).collect())
    }

    pub fn replace(phonemes: impl IntoIterator<Item = Phoneme>) -> Self {
        Action::Replace(phonemes.into_iter().collect())
    }

    pub fn raise(feature: Feature) -> Self {
        Action::Raise(feature)
    }

    /// Features this action writes onto the target, if it writes any.
    fn assigned_features(&self) -> Vec<Feature> {
        match self {
            Action::Delta(values) => values.iter().map(|v| v.feature()).collect(),
            Action::Raise(feature) => vec![*feature],
            Action::Replace(_) => Vec::new(),
        }
    }
}

impl From<FeatureValue> for Action {
    fn from(value: FeatureValue) -> Self {
        Action::Delta(vec![value])
    }
}

impl From<Vec<FeatureValue>> for Action {
    fn from(values: Vec<FeatureValue>) -> Self {
        Action::Delta(values)
    }
}

impl From<Phoneme> for Action {
    fn from(phoneme: Phoneme) -> Self {
        Action::Replace(vec![phoneme])
    }
}

impl From<Vec<Phoneme>> for Action {
    fn from(phonemes: Vec<Phoneme>) -> Self {
        Action::Replace(phonemes)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Delta(values) => {
                let names: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", names.join(", "))
            }
            Action::Replace(phonemes) if phonemes.is_empty() => f.write_str("∅"),
            Action::Replace(phonemes) => {
                let names: Vec<String> = phonemes.iter().map(ToString::to_string).collect();
                f.write_str(&names.join(" "))
            }
            Action::Raise(feature) => write!(f, "{feature}+1"),
        }
    }
}

/// Result of applying a rule at one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Condition or environment failed; the original segment passes through.
    Keep,
    /// The target was rewritten in place.
    Phone(Phoneme),
    /// The target was replaced by zero or more phonemes.
    Splice(Vec<Phoneme>),
}

/// An immutable conditional rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    condition: Matcher,
    action: Action,
    environment: Option<Environment>,
}

/// Build an unnamed rule; its name is derived from condition and action.
pub fn rule(condition: impl Into<Matcher>, action: impl Into<Action>) -> Result<Rule, RuleError> {
    let condition = condition.into();
    let action = action.into();
    let name = format!("{condition} -> {action}");
    Rule::new(name, condition, action)
}

/// Attach `env` to a copy of `rule`.
pub fn with_environment(rule: &Rule, env: Environment) -> Rule {
    rule.with_environment(env)
}

impl Rule {
    /// Build and validate a rule.
    ///
    /// Fails with [`RuleError::MalformedRule`] when the action cannot apply to
    /// what the condition selects, so bad configurations are rejected at load
    /// time rather than in the middle of a transcription.
    pub fn new(
        name: impl Into<String>,
        condition: impl Into<Matcher>,
        action: impl Into<Action>,
    ) -> Result<Self, RuleError> {
        let rule = Self {
            name: name.into(),
            condition: condition.into(),
            action: action.into(),
            environment: None,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// A copy of this rule conditioned on `env`.
    pub fn with_environment(&self, env: Environment) -> Rule {
        Rule {
            environment: Some(env),
            ..self.clone()
        }
    }

    /// A copy of this rule under another name.
    pub fn named(&self, name: impl Into<String>) -> Rule {
        Rule {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &Matcher {
        &self.condition
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    /// `condition <= target`. Boundaries and literals never qualify.
    pub fn check_condition(&self, target: &Segment) -> bool {
        target
            .as_phone()
            .is_some_and(|phone| self.condition.matches(phone))
    }

    /// True when no environment is attached or it holds at `position`.
    pub fn check_environment(&self, sequence: &[Segment], position: usize) -> bool {
        self.environment
            .as_ref()
            .is_none_or(|env| env.test_at(sequence, position))
    }

    /// Apply the rule to `sequence[position]`.
    pub fn apply(&self, sequence: &[Segment], position: usize) -> Rewrite {
        let Some(target) = sequence.get(position) else {
            return Rewrite::Keep;
        };
        if !self.check_condition(target) || !self.check_environment(sequence, position) {
            return Rewrite::Keep;
        }
        let Some(phone) = target.as_phone() else {
            return Rewrite::Keep;
        };

        match &self.action {
            Action::Delta(values) => Rewrite::Phone(phone.merged_with(values.as_slice())),
            Action::Raise(feature) => Rewrite::Phone(phone.raised(*feature)),
            Action::Replace(phonemes) => Rewrite::Splice(
                phonemes
                    .iter()
                    .map(|p| match (p.grapheme(), phone.grapheme()) {
                        (None, Some(source)) => p.clone().with_grapheme(source),
                        _ => p.clone(),
                    })
                    .collect(),
            ),
        }
    }

    fn validate(&self) -> Result<(), RuleError> {
        let malformed = |reason: String| RuleError::MalformedRule {
            rule: self.name.clone(),
            reason,
        };

        let members = self.condition.members();
        if members.is_empty() {
            return Err(malformed("condition is an empty disjunction".into()));
        }

        if let Action::Delta(values) = &self.action {
            if values.is_empty() {
                return Err(malformed("action assigns no feature".into()));
            }
            for (i, value) in values.iter().enumerate() {
                if values[..i].iter().any(|v| v.feature() == value.feature()) {
                    return Err(malformed(format!(
                        "action assigns {} more than once",
                        value.feature()
                    )));
                }
            }
        }

        let assigned = self.action.assigned_features();
        let selects = |value: Consonantal, only: fn(Feature) -> bool| {
            let value = FeatureValue::from(value);
            members.iter().all(|m| {
                let features = m.features();
                features.contains(value)
                    || Feature::ALL
                        .iter()
                        .any(|&f| only(f) && features.get(f).is_some())
            })
        };

        if selects(Consonantal::Pos, Feature::is_consonant_only) {
            if let Some(f) = assigned.iter().find(|f| f.is_vowel_only()) {
                return Err(malformed(format!(
                    "condition selects consonants only but action assigns vowel feature {f}"
                )));
            }
        }
        if selects(Consonantal::Neg, Feature::is_vowel_only) {
            if let Some(f) = assigned.iter().find(|f| f.is_consonant_only()) {
                return Err(malformed(format!(
                    "condition selects vowels only but action assigns consonant feature {f}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.name, self.condition, self.action)?;
        if let Some(env) = &self.environment {
            write!(f, " / {} _ {}", env.left(), env.right())?;
        }
        Ok(())
    }
}
