//! Tiered Proxy Selection
//!
//! Preference order: BusinessReady > reachable (BusinessReady ∪ BasicOnly) > none.
//! Within a tier the fastest response wins; missing times sort last and ties
//! resolve to the earliest candidate index.

use crate::core::network::types::{EvaluationOutcome, EvaluationState, Selection, SelectionTier};
use std::cmp::Ordering;

/// Pick the best candidate from a full evaluation result set
///
/// Never returns a `BasicFailed` outcome; when every candidate failed the
/// basic probe the result is [`Selection::NoCandidate`].
pub fn select(outcomes: &[EvaluationOutcome]) -> Selection {
    let business = fastest(
        outcomes
            .iter()
            .filter(|o| o.state == EvaluationState::BusinessReady),
    );
    if let Some(outcome) = business {
        return Selection::Winner {
            outcome: outcome.clone(),
            tier: SelectionTier::Business,
        };
    }

    let reachable = fastest(outcomes.iter().filter(|o| o.state.is_reachable()));
    match reachable {
        Some(outcome) => Selection::Winner {
            outcome: outcome.clone(),
            tier: SelectionTier::Reachable,
        },
        None => Selection::NoCandidate,
    }
}

fn fastest<'a, I>(outcomes: I) -> Option<&'a EvaluationOutcome>
where
    I: Iterator<Item = &'a EvaluationOutcome>,
{
    outcomes.min_by(|a, b| compare_response_time(a, b).then(a.index.cmp(&b.index)))
}

/// Order by response time, treating a missing time as slower than any value
fn compare_response_time(a: &EvaluationOutcome, b: &EvaluationOutcome) -> Ordering {
    match (a.response_time, b.response_time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
