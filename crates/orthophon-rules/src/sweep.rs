// Rule application over whole sequences.
//
// Each rule makes exactly one left-to-right sweep. Every position is judged
// against the sequence as it was when the sweep started, so a rule never sees
// (and never re-triggers on) its own output within the sweep. Rules run in
// order and each one consumes the previous rule's output.

use orthophon_core::Segment;
use tracing::{debug, debug_span, trace};

use crate::rule::{Rewrite, Rule};

/// Apply `rule` once across `sequence`, returning the rewritten sequence.
///
/// Splices may make the output longer or shorter than the input.
pub fn apply_rule(rule: &Rule, sequence: &[Segment]) -> Vec<Segment> {
    let _span = debug_span!("apply_rule", rule = rule.name()).entered();
    let mut output = Vec::with_capacity(sequence.len());
    let mut rewritten = 0usize;

    for (position, segment) in sequence.iter().enumerate() {
        match rule.apply(sequence, position) {
            Rewrite::Keep => output.push(segment.clone()),
            Rewrite::Phone(phone) => {
                trace!(position, from = %segment, to = %phone, "rewrite");
                rewritten += 1;
                output.push(Segment::Phone(phone));
            }
            Rewrite::Splice(phones) => {
                trace!(position, from = %segment, count = phones.len(), "splice");
                rewritten += 1;
                output.extend(phones.into_iter().map(Segment::Phone));
            }
        }
    }

    debug!(rewritten, len = output.len());
    output
}

/// Apply `rules` in order; the output of each rule is the input of the next.
pub fn apply_rules<'a, I>(rules: I, sequence: Vec<Segment>) -> Vec<Segment>
where
    I: IntoIterator<Item = &'a Rule>,
{
    rules
        .into_iter()
        .fold(sequence, |current, rule| apply_rule(rule, &current))
}
