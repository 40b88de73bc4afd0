// TOML language definitions.
//
// A definition is deserialized with serde, validated eagerly and compiled
// into an `OrthoPhonology`. Every symbol, feature value and rule is checked at
// load time so a bad definition never reaches transcription.
//
// Matcher terms, used by `when`, `left`, `right` and `then.phonemes`:
//   ANY | W | S            environments only
//   Feature.value          a single value
//   Feature.value+...      a conjunction (one bundle)
//   <symbol>               an inventory phoneme
// A list of terms is a disjunction.

use std::collections::BTreeMap;
use std::str::FromStr;

use orthophon_core::{
    Disjunction, Feature, FeatureError, FeatureValue, Features, Matcher, Phoneme,
};
use orthophon_rules::{ANY, Action, EnvMatcher, Environment, Rule, RuleError, S, W};
use serde::Deserialize;
use tracing::{debug, debug_span};

use crate::alphabet::Alphabet;
use crate::inventory::Inventory;
use crate::transcriber::{OrthoPhonology, TranscribeOptions};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("unknown symbol {symbol:?} in {context}")]
    UnknownSymbol { symbol: String, context: String },
    #[error("duplicate inventory symbol {0:?}")]
    DuplicateSymbol(String),
    #[error("alphabet entry {0:?} maps to no phonemes")]
    EmptyAlphabetEntry(String),
    #[error("boundary {term} used outside an environment in rule {rule}")]
    BoundaryOutsideEnvironment { rule: String, term: String },
    #[error("feature {feature} given more than once in {context}")]
    RepeatedFeature { feature: Feature, context: String },
    #[error("invalid environment in rule {rule}: {reason}")]
    InvalidEnvironment { rule: String, reason: String },
    #[error("invalid action in rule {rule}: {reason}")]
    InvalidAction { rule: String, reason: String },
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Rule(#[from] RuleError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LanguageConfig {
    name: String,
    #[serde(default)]
    options: TranscribeOptions,
    #[serde(default)]
    inventory: Vec<InventoryEntry>,
    #[serde(default)]
    alphabet: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    rules: Vec<RuleConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InventoryEntry {
    symbol: String,
    features: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleConfig {
    name: String,
    when: Terms,
    then: ActionConfig,
    left: Option<Terms>,
    right: Option<Terms>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ActionConfig {
    features: Option<Vec<String>>,
    phonemes: Option<Vec<String>>,
    raise: Option<String>,
}

/// One term or a list of terms (a disjunction).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Terms {
    One(String),
    Many(Vec<String>),
}

impl Terms {
    fn as_slice(&self) -> &[String] {
        match self {
            Terms::One(term) => std::slice::from_ref(term),
            Terms::Many(terms) => terms,
        }
    }
}

enum Term {
    Boundary(EnvMatcher),
    Phone(Phoneme),
}

/// Parse and compile a TOML language definition.
pub fn parse_language_toml(toml_str: &str) -> Result<OrthoPhonology, ConfigError> {
    let config: LanguageConfig =
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let _span = debug_span!("parse_language_toml", name = %config.name).entered();

    let inventory = build_inventory(&config.inventory)?;
    let alphabet = build_alphabet(&config.alphabet, &inventory)?;
    let rules = config
        .rules
        .iter()
        .map(|rule| build_rule(rule, &inventory))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        inventory = inventory.len(),
        graphemes = alphabet.len(),
        rules = rules.len(),
        "language compiled"
    );
    let mut language =
        OrthoPhonology::new(config.name, inventory, alphabet).with_options(config.options);
    language.set_rules(rules);
    Ok(language)
}

impl FromStr for OrthoPhonology {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_language_toml(s)
    }
}

fn build_inventory(entries: &[InventoryEntry]) -> Result<Inventory, ConfigError> {
    let mut inventory = Inventory::new();
    for entry in entries {
        let context = format!("inventory entry {:?}", entry.symbol);
        let features = bundle(entry.features.iter().map(String::as_str), &context)?;
        if !inventory.insert(entry.symbol.as_str(), features) {
            return Err(ConfigError::DuplicateSymbol(entry.symbol.clone()));
        }
    }
    Ok(inventory)
}

fn build_alphabet(
    entries: &BTreeMap<String, Vec<String>>,
    inventory: &Inventory,
) -> Result<Alphabet, ConfigError> {
    let mut alphabet = Alphabet::new();
    for (grapheme, symbols) in entries {
        let phonemes = symbols
            .iter()
            .map(|symbol| {
                inventory
                    .by_symbol(symbol)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownSymbol {
                        symbol: symbol.clone(),
                        context: format!("alphabet entry {grapheme:?}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if !alphabet.insert(grapheme.as_str(), phonemes) {
            return Err(ConfigError::EmptyAlphabetEntry(grapheme.clone()));
        }
    }
    Ok(alphabet)
}

fn build_rule(config: &RuleConfig, inventory: &Inventory) -> Result<Rule, ConfigError> {
    let name = config.name.as_str();
    let condition = phone_terms(config.when.as_slice(), inventory, name)?
        .into_iter()
        .collect::<Disjunction>();
    let condition = match condition.members() {
        [single] => Matcher::from(single.clone()),
        _ => Matcher::from(condition),
    };
    let action = build_action(&config.then, inventory, name)?;
    let rule = Rule::new(name, condition, action)?;

    if config.left.is_none() && config.right.is_none() {
        return Ok(rule);
    }
    let left = env_side(config.left.as_ref(), inventory, name)?;
    let right = env_side(config.right.as_ref(), inventory, name)?;
    Ok(rule.with_environment(Environment::new(left, right)))
}

fn build_action(
    config: &ActionConfig,
    inventory: &Inventory,
    rule: &str,
) -> Result<Action, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidAction {
        rule: rule.to_string(),
        reason: reason.to_string(),
    };
    match (&config.features, &config.phonemes, &config.raise) {
        (Some(values), None, None) => {
            let values = values
                .iter()
                .map(|value| value.parse::<FeatureValue>())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Action::Delta(values))
        }
        (None, Some(terms), None) => Ok(Action::Replace(phone_terms(terms, inventory, rule)?)),
        (None, None, Some(feature)) => Ok(Action::Raise(feature.trim().parse::<Feature>()?)),
        (None, None, None) => Err(invalid("expected one of `features`, `phonemes` or `raise`")),
        _ => Err(invalid("`features`, `phonemes` and `raise` are mutually exclusive")),
    }
}

fn env_side(
    terms: Option<&Terms>,
    inventory: &Inventory,
    rule: &str,
) -> Result<EnvMatcher, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvironment {
        rule: rule.to_string(),
        reason,
    };
    let Some(terms) = terms else {
        return Ok(ANY);
    };
    let terms = terms.as_slice();
    if terms.is_empty() {
        return Err(invalid("empty term list".to_string()));
    }

    let mut phones = Vec::with_capacity(terms.len());
    for term in terms {
        match parse_term(term, inventory, rule)? {
            Term::Boundary(boundary) if terms.len() == 1 => return Ok(boundary),
            Term::Boundary(_) => {
                return Err(invalid(format!("{term} cannot be part of a disjunction")));
            }
            Term::Phone(phone) => phones.push(phone),
        }
    }
    Ok(match phones.len() {
        1 => EnvMatcher::from(phones.remove(0)),
        _ => EnvMatcher::from(phones.into_iter().collect::<Disjunction>()),
    })
}

/// Parse terms that must all denote phonemes.
fn phone_terms(
    terms: &[String],
    inventory: &Inventory,
    rule: &str,
) -> Result<Vec<Phoneme>, ConfigError> {
    terms
        .iter()
        .map(|term| match parse_term(term, inventory, rule)? {
            Term::Phone(phone) => Ok(phone),
            Term::Boundary(_) => Err(ConfigError::BoundaryOutsideEnvironment {
                rule: rule.to_string(),
                term: term.clone(),
            }),
        })
        .collect()
}

fn parse_term(term: &str, inventory: &Inventory, rule: &str) -> Result<Term, ConfigError> {
    let term = term.trim();
    match term {
        "ANY" => return Ok(Term::Boundary(ANY)),
        "W" => return Ok(Term::Boundary(W)),
        "S" => return Ok(Term::Boundary(S)),
        _ => {}
    }
    if let Some(phoneme) = inventory.by_symbol(term) {
        return Ok(Term::Phone(phoneme.clone()));
    }
    if term.contains('.') {
        let features = bundle(term.split('+'), &format!("term {term:?} of rule {rule}"))?;
        return Ok(Term::Phone(Phoneme::from_features(features)));
    }
    Err(ConfigError::UnknownSymbol {
        symbol: term.to_string(),
        context: format!("rule {rule}"),
    })
}

/// Parse a conjunction of feature values. Each feature may appear once.
fn bundle<'a>(
    values: impl IntoIterator<Item = &'a str>,
    context: &str,
) -> Result<Features, ConfigError> {
    let mut features = Features::new();
    for value in values {
        let value: FeatureValue = value.parse()?;
        if features.get(value.feature()).is_some() {
            return Err(ConfigError::RepeatedFeature {
                feature: value.feature(),
                context: context.to_string(),
            });
        }
        features.set(value);
    }
    Ok(features)
}
