//! The eligibility graph: who may give to whom.
//!
//! Participants are indexed `0..n` in ascending id order. Giver `g` may
//! give to recipient `r` iff `g != r` and the pair is not excluded. The
//! same structure serves as the bipartite graph (giver copies on the left,
//! recipient copies on the right) and as the permutation check.

use std::collections::BTreeSet;

use giftmatch_types::{Assignment, ExclusionSet, ParticipantId, Strategy};

/// Dense giver × recipient eligibility matrix plus adjacency lists.
#[derive(Debug, Clone)]
pub struct EligibilityGraph {
    /// Index → participant id, ascending.
    ids: Vec<ParticipantId>,
    /// Row-major `n × n`: `allowed[g * n + r]`.
    allowed: Vec<bool>,
    /// Eligible recipients per giver, ascending.
    adjacency: Vec<Vec<usize>>,
    /// Exclusions applied to the matrix.
    applied_exclusions: usize,
    /// Exclusions naming someone outside the participant set.
    ignored_exclusions: usize,
}

impl EligibilityGraph {
    /// Build the graph for `participants`, applying every exclusion whose
    /// members are both participants. Other exclusions are skipped.
    #[must_use]
    pub fn build(participants: &BTreeSet<ParticipantId>, exclusions: &ExclusionSet) -> Self {
        let ids: Vec<ParticipantId> = participants.iter().copied().collect();
        let n = ids.len();

        let mut allowed = vec![true; n * n];
        for i in 0..n {
            allowed[i * n + i] = false;
        }

        let mut applied_exclusions = 0;
        let mut ignored_exclusions = 0;
        for pair in exclusions {
            match (
                ids.binary_search(&pair.low()),
                ids.binary_search(&pair.high()),
            ) {
                (Ok(a), Ok(b)) => {
                    allowed[a * n + b] = false;
                    allowed[b * n + a] = false;
                    applied_exclusions += 1;
                }
                _ => {
                    tracing::debug!(
                        pair = %pair,
                        "Exclusion ignored: member is not an accepted participant"
                    );
                    ignored_exclusions += 1;
                }
            }
        }

        let adjacency = (0..n)
            .map(|g| (0..n).filter(|&r| allowed[g * n + r]).collect())
            .collect();

        Self {
            ids,
            allowed,
            adjacency,
            applied_exclusions,
            ignored_exclusions,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, id: ParticipantId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    #[must_use]
    pub fn allows(&self, giver: usize, recipient: usize) -> bool {
        self.allowed[giver * self.ids.len() + recipient]
    }

    /// Eligible recipients of `giver`, ascending.
    #[must_use]
    pub fn recipients(&self, giver: usize) -> &[usize] {
        &self.adjacency[giver]
    }

    /// Number of directed giver → recipient edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn applied_exclusions(&self) -> usize {
        self.applied_exclusions
    }

    #[must_use]
    pub fn ignored_exclusions(&self) -> usize {
        self.ignored_exclusions
    }

    /// Whether `permutation` (giver index → recipient index) uses only
    /// eligible edges. Fixed points are never eligible, so a passing
    /// permutation is a valid derangement.
    #[must_use]
    pub fn admits(&self, permutation: &[usize]) -> bool {
        permutation.len() == self.ids.len()
            && permutation
                .iter()
                .enumerate()
                .all(|(giver, &recipient)| self.allows(giver, recipient))
    }

    /// Translate an index permutation back into participant ids.
    #[must_use]
    pub fn to_assignment(&self, permutation: &[usize], strategy: Strategy) -> Assignment {
        let pairs = permutation
            .iter()
            .enumerate()
            .map(|(giver, &recipient)| (self.ids[giver], self.ids[recipient]))
            .collect();
        Assignment::new(pairs, strategy)
    }
}
