//! Randomized tier: draw uniform permutations until one is admissible.
//!
//! Without exclusions roughly `1/e` of all permutations are derangements,
//! so a valid one usually turns up within a handful of draws. Dense
//! exclusions shrink that fraction quickly; the attempt cap bounds the
//! search and the engine falls back to augmenting paths.

use giftmatch_types::MatchingError;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::{Budget, EligibilityGraph};

/// An admissible permutation and the draw that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledPermutation {
    /// Giver index → recipient index.
    pub permutation: Vec<usize>,
    /// 1-based number of the successful draw.
    pub attempts: u32,
}

/// Draw up to `max_attempts` Fisher–Yates shuffles and return the first
/// that the graph admits, or `None` when the attempts run out.
///
/// # Errors
/// Returns [`MatchingError::ComputationTimeout`] if `budget` runs out.
pub fn sample_permutation<R: Rng + ?Sized>(
    graph: &EligibilityGraph,
    max_attempts: u32,
    rng: &mut R,
    budget: &mut Budget,
) -> Result<Option<SampledPermutation>, MatchingError> {
    let mut permutation: Vec<usize> = (0..graph.len()).collect();
    for attempt in 1..=max_attempts {
        budget.tick()?;
        permutation.shuffle(rng);
        if graph.admits(&permutation) {
            return Ok(Some(SampledPermutation {
                permutation,
                attempts: attempt,
            }));
        }
    }
    Ok(None)
}
