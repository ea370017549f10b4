//! Bipartite matching over the eligibility graph.
//!
//! Givers form the left side, recipients the right side, and the graph's
//! eligible edges connect them. A perfect matching is exactly a valid
//! assignment: every giver gets one recipient, every recipient one giver,
//! and no edge is a fixed point or an exclusion.
//!
//! - [`maximum_matching`]: Hopcroft–Karp, `O(E·√V)`, deterministic. Used to
//!   prove (or disprove) feasibility.
//! - [`randomized_perfect_matching`]: Kuhn's augmenting paths over shuffled
//!   giver order and shuffled adjacency. Used as the construction fallback.

use std::collections::VecDeque;

use giftmatch_types::MatchingError;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::{Budget, EligibilityGraph};

const UNMATCHED: usize = usize::MAX;
const UNREACHED: usize = usize::MAX;

/// A (possibly partial) giver → recipient matching by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    recipient_of: Vec<usize>,
    size: usize,
}

impl Matching {
    /// Number of matched givers.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether every giver is matched.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.size == self.recipient_of.len()
    }

    #[must_use]
    pub fn recipient_of(&self, giver: usize) -> Option<usize> {
        self.recipient_of
            .get(giver)
            .copied()
            .filter(|&r| r != UNMATCHED)
    }

    /// The matching as a permutation, if it is perfect.
    #[must_use]
    pub fn into_permutation(self) -> Option<Vec<usize>> {
        self.is_perfect().then_some(self.recipient_of)
    }
}

// ---------------------------------------------------------------------------
// Hopcroft–Karp
// ---------------------------------------------------------------------------

/// Maximum matching of the eligibility graph.
///
/// # Errors
/// Returns [`MatchingError::ComputationTimeout`] if `budget` runs out.
pub fn maximum_matching(
    graph: &EligibilityGraph,
    budget: &mut Budget,
) -> Result<Matching, MatchingError> {
    let n = graph.len();
    HopcroftKarp {
        graph,
        budget,
        pair_giver: vec![UNMATCHED; n],
        pair_recipient: vec![UNMATCHED; n],
        layer: vec![UNREACHED; n],
    }
    .run()
}

struct HopcroftKarp<'g, 'b> {
    graph: &'g EligibilityGraph,
    budget: &'b mut Budget,
    pair_giver: Vec<usize>,
    pair_recipient: Vec<usize>,
    /// BFS distance of each giver from the free givers in the current phase.
    layer: Vec<usize>,
}

impl HopcroftKarp<'_, '_> {
    fn run(mut self) -> Result<Matching, MatchingError> {
        let mut size = 0;
        while self.build_layers()? {
            for giver in 0..self.graph.len() {
                if self.pair_giver[giver] == UNMATCHED && self.augment(giver)? {
                    size += 1;
                }
            }
        }
        Ok(Matching {
            recipient_of: self.pair_giver,
            size,
        })
    }

    /// Layer the givers by alternating-path distance from the free givers.
    /// Returns whether any free recipient is reachable.
    fn build_layers(&mut self) -> Result<bool, MatchingError> {
        let mut queue = VecDeque::new();
        for giver in 0..self.graph.len() {
            if self.pair_giver[giver] == UNMATCHED {
                self.layer[giver] = 0;
                queue.push_back(giver);
            } else {
                self.layer[giver] = UNREACHED;
            }
        }

        let mut reachable_free = false;
        while let Some(giver) = queue.pop_front() {
            self.budget.tick()?;
            for &recipient in self.graph.recipients(giver) {
                let next = self.pair_recipient[recipient];
                if next == UNMATCHED {
                    reachable_free = true;
                } else if self.layer[next] == UNREACHED {
                    self.layer[next] = self.layer[giver] + 1;
                    queue.push_back(next);
                }
            }
        }
        Ok(reachable_free)
    }

    /// Depth-first search along the layers for an augmenting path.
    fn augment(&mut self, giver: usize) -> Result<bool, MatchingError> {
        self.budget.tick()?;
        let graph = self.graph;
        for &recipient in graph.recipients(giver) {
            let next = self.pair_recipient[recipient];
            let extends = next == UNMATCHED
                || (self.layer[next] == self.layer[giver] + 1 && self.augment(next)?);
            if extends {
                self.pair_giver[giver] = recipient;
                self.pair_recipient[recipient] = giver;
                return Ok(true);
            }
        }
        // Dead end for the rest of this phase.
        self.layer[giver] = UNREACHED;
        Ok(false)
    }
}

// ---------------------------------------------------------------------------
// Randomized Kuhn
// ---------------------------------------------------------------------------

/// Maximum matching built by Kuhn's algorithm over a random giver order and
/// randomly ordered adjacency lists.
///
/// On a graph with a perfect matching the result is always perfect; the
/// randomization only decides *which* perfect matching comes out.
///
/// # Errors
/// Returns [`MatchingError::ComputationTimeout`] if `budget` runs out.
pub fn randomized_perfect_matching<R: Rng + ?Sized>(
    graph: &EligibilityGraph,
    rng: &mut R,
    budget: &mut Budget,
) -> Result<Matching, MatchingError> {
    let n = graph.len();
    let adjacency: Vec<Vec<usize>> = (0..n)
        .map(|giver| {
            let mut recipients = graph.recipients(giver).to_vec();
            recipients.shuffle(rng);
            recipients
        })
        .collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut kuhn = Kuhn {
        adjacency: &adjacency,
        budget,
        pair_giver: vec![UNMATCHED; n],
        pair_recipient: vec![UNMATCHED; n],
        visited: vec![false; n],
    };

    let mut size = 0;
    for giver in order {
        kuhn.visited.fill(false);
        if kuhn.augment(giver)? {
            size += 1;
        }
    }

    Ok(Matching {
        recipient_of: kuhn.pair_giver,
        size,
    })
}

struct Kuhn<'a, 'b> {
    adjacency: &'a [Vec<usize>],
    budget: &'b mut Budget,
    pair_giver: Vec<usize>,
    pair_recipient: Vec<usize>,
    /// Recipients already tried in the current search.
    visited: Vec<bool>,
}

impl Kuhn<'_, '_> {
    fn augment(&mut self, giver: usize) -> Result<bool, MatchingError> {
        self.budget.tick()?;
        let adjacency = self.adjacency;
        for &recipient in &adjacency[giver] {
            if self.visited[recipient] {
                continue;
            }
            self.visited[recipient] = true;
            let holder = self.pair_recipient[recipient];
            if holder == UNMATCHED || self.augment(holder)? {
                self.pair_giver[giver] = recipient;
                self.pair_recipient[recipient] = giver;
                return Ok(true);
            }
        }
        Ok(false)
    }
}
