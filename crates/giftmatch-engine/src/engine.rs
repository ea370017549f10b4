//! The matching engine: validation, feasibility, then two-tier construction.
//!
//! ```text
//! assign(accepted ids, exclusions, rng) -> Assignment | MatchingError
//! ```
//!
//! ## Algorithm
//!
//! 1. Reject fewer than two participants (`InsufficientParticipants`) or
//!    more than `MAX_PARTICIPANTS` (`TooManyParticipants`)
//! 2. Build the eligibility graph, ignoring exclusions that name outsiders;
//!    the build counts against the time budget
//! 3. Hopcroft–Karp maximum matching; not perfect → `InfeasibleConstraints`
//! 4. Draw up to `max_random_attempts` uniform permutations, keep the first
//!    admissible one
//! 5. Otherwise take a randomized-Kuhn perfect matching, which step 3
//!    guarantees exists
//!
//! The result is a valid assignment, not a uniform sample over all valid
//! assignments: when exclusions are dense enough that step 5 runs, some
//! assignments come out more often than others.
//!
//! Every step charges the same [`Budget`]; running out surfaces as
//! `ComputationTimeout` and nothing is returned.

use std::collections::BTreeSet;

use giftmatch_types::{
    Assignment, EngineConfig, ExclusionSet, MatchingError, Participant, ParticipantId, Strategy,
    accepted_ids, constants,
};
use rand::Rng;

use crate::{Budget, EligibilityGraph, bipartite, sampler};

/// Stateless assignment engine. Holds only configuration, so one instance
/// can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    config: EngineConfig,
}

impl MatchingEngine {
    /// Engine with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run only the validation and feasibility steps.
    ///
    /// Lets an owner learn that an exchange cannot start before anyone
    /// presses "start".
    ///
    /// # Errors
    /// `InsufficientParticipants`, `InfeasibleConstraints`, or
    /// `ComputationTimeout`.
    pub fn check_feasibility(
        &self,
        participants: &BTreeSet<ParticipantId>,
        exclusions: &ExclusionSet,
    ) -> Result<(), MatchingError> {
        ensure_size(participants)?;
        let mut budget = Budget::start(self.config.timeout());
        let graph = EligibilityGraph::build(participants, exclusions);
        budget.check()?;
        prove_feasible(&graph, &mut budget)
    }

    /// Draw an assignment for `participants`.
    ///
    /// # Errors
    /// - [`MatchingError::InsufficientParticipants`] for fewer than two ids
    /// - [`MatchingError::InfeasibleConstraints`] when no valid assignment exists
    /// - [`MatchingError::ComputationTimeout`] when the time budget runs out
    pub fn assign<R: Rng + ?Sized>(
        &self,
        participants: &BTreeSet<ParticipantId>,
        exclusions: &ExclusionSet,
        rng: &mut R,
    ) -> Result<Assignment, MatchingError> {
        ensure_size(participants)?;
        let mut budget = Budget::start(self.config.timeout());

        let graph = EligibilityGraph::build(participants, exclusions);
        budget.check()?;
        tracing::debug!(
            participants = graph.len(),
            edges = graph.edge_count(),
            exclusions = graph.applied_exclusions(),
            ignored_exclusions = graph.ignored_exclusions(),
            "Eligibility graph built"
        );

        prove_feasible(&graph, &mut budget)?;

        let assignment = match sampler::sample_permutation(
            &graph,
            self.config.max_random_attempts,
            rng,
            &mut budget,
        )? {
            Some(sample) => graph.to_assignment(
                &sample.permutation,
                Strategy::Randomized {
                    attempts: sample.attempts,
                },
            ),
            None => {
                tracing::warn!(
                    participants = graph.len(),
                    attempts = self.config.max_random_attempts,
                    "Random draws exhausted, using augmenting-path fallback"
                );
                let matching = bipartite::randomized_perfect_matching(&graph, rng, &mut budget)?;
                let participants = graph.len();
                let matched = matching.size();
                // Feasibility was proven above, so this cannot be partial.
                let permutation = matching.into_permutation().ok_or(
                    MatchingError::InfeasibleConstraints {
                        participants,
                        matched,
                    },
                )?;
                graph.to_assignment(&permutation, Strategy::Fallback)
            }
        };

        debug_assert_eq!(
            crate::verify_assignment(&assignment, participants, exclusions),
            Ok(())
        );

        tracing::info!(
            participants = assignment.len(),
            strategy = %assignment.strategy,
            steps = budget.steps(),
            elapsed_us = u64::try_from(budget.elapsed().as_micros()).unwrap_or(u64::MAX),
            digest = assignment.digest_hex(),
            "Assignment drawn"
        );

        Ok(assignment)
    }

    /// Like [`Self::assign`], but takes full participant records and keeps
    /// only the accepted ones.
    ///
    /// # Errors
    /// Same as [`Self::assign`].
    pub fn assign_participants<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        exclusions: &ExclusionSet,
        rng: &mut R,
    ) -> Result<Assignment, MatchingError> {
        self.assign(&accepted_ids(participants), exclusions, rng)
    }
}

/// Draw an assignment with the default configuration.
///
/// # Errors
/// Same as [`MatchingEngine::assign`].
pub fn assign<R: Rng + ?Sized>(
    participants: &BTreeSet<ParticipantId>,
    exclusions: &ExclusionSet,
    rng: &mut R,
) -> Result<Assignment, MatchingError> {
    MatchingEngine::new().assign(participants, exclusions, rng)
}

fn ensure_size(participants: &BTreeSet<ParticipantId>) -> Result<(), MatchingError> {
    if participants.len() < constants::MIN_PARTICIPANTS {
        return Err(MatchingError::InsufficientParticipants {
            accepted: participants.len(),
            required: constants::MIN_PARTICIPANTS,
        });
    }
    if participants.len() > constants::MAX_PARTICIPANTS {
        return Err(MatchingError::TooManyParticipants {
            accepted: participants.len(),
            limit: constants::MAX_PARTICIPANTS,
        });
    }
    Ok(())
}

fn prove_feasible(graph: &EligibilityGraph, budget: &mut Budget) -> Result<(), MatchingError> {
    let matching = bipartite::maximum_matching(graph, budget)?;
    if !matching.is_perfect() {
        tracing::warn!(
            participants = graph.len(),
            matched = matching.size(),
            exclusions = graph.applied_exclusions(),
            "No valid assignment exists"
        );
        return Err(MatchingError::InfeasibleConstraints {
            participants: graph.len(),
            matched: matching.size(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use giftmatch_types::{ParticipantStatus, dummy_ids};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::verify_assignment;

    fn pid(n: u64) -> ParticipantId {
        ParticipantId(n)
    }

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn empty_and_singleton_are_insufficient() {
        let engine = MatchingEngine::new();
        for n in 0..2 {
            let err = engine
                .assign(&dummy_ids(n), &ExclusionSet::new(), &mut rng(0))
                .unwrap_err();
            assert_eq!(
                err,
                MatchingError::InsufficientParticipants {
                    accepted: usize::try_from(n).unwrap(),
                    required: 2,
                }
            );
        }
    }

    #[test]
    fn two_participants_swap() {
        let a = assign(&dummy_ids(2), &ExclusionSet::new(), &mut rng(1)).unwrap();
        assert_eq!(a.recipient_of(pid(1)), Some(pid(2)));
        assert_eq!(a.recipient_of(pid(2)), Some(pid(1)));
    }

    #[test]
    fn two_participants_excluded_is_infeasible() {
        let err = assign(&dummy_ids(2), &ExclusionSet::from_raw(&[(1, 2)]), &mut rng(1))
            .unwrap_err();
        assert_eq!(
            err,
            MatchingError::InfeasibleConstraints {
                participants: 2,
                matched: 0,
            }
        );
    }

    #[test]
    fn three_participants_reach_both_cycles() {
        let ids = dummy_ids(3);
        let mut r = rng(5);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let a = assign(&ids, &ExclusionSet::new(), &mut r).unwrap();
            seen.insert(a.recipient_of(pid(1)));
        }
        assert_eq!(seen.len(), 2, "both 3-cycles should appear");
    }

    #[test]
    fn declined_and_invited_are_left_out() {
        let people = vec![
            Participant::dummy_accepted(1),
            Participant::dummy_accepted(2),
            Participant::dummy_accepted(3),
            Participant::dummy_with_status(4, ParticipantStatus::Declined),
            Participant::dummy_with_status(5, ParticipantStatus::Invited),
        ];
        let a = MatchingEngine::new()
            .assign_participants(&people, &ExclusionSet::new(), &mut rng(2))
            .unwrap();
        assert_eq!(a.participants(), dummy_ids(3));
    }

    #[test]
    fn exclusions_on_outsiders_are_ignored() {
        // 99 is not accepted, so both pairs are dropped.
        let exclusions = ExclusionSet::from_raw(&[(1, 99), (2, 99)]);
        let a = assign(&dummy_ids(2), &exclusions, &mut rng(3)).unwrap();
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn zero_attempts_goes_straight_to_fallback() {
        let engine = MatchingEngine::with_config(EngineConfig {
            max_random_attempts: 0,
            ..EngineConfig::default()
        });
        let ids = dummy_ids(6);
        let a = engine.assign(&ids, &ExclusionSet::new(), &mut rng(4)).unwrap();
        assert_eq!(a.strategy, Strategy::Fallback);
        assert_eq!(verify_assignment(&a, &ids, &ExclusionSet::new()), Ok(()));
    }

    #[test]
    fn zero_timeout_reports_timeout() {
        let engine = MatchingEngine::with_config(EngineConfig {
            timeout_ms: 0,
            ..EngineConfig::default()
        });
        let err = engine
            .assign(&dummy_ids(5), &ExclusionSet::new(), &mut rng(5))
            .unwrap_err();
        assert!(matches!(err, MatchingError::ComputationTimeout { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn insufficient_is_checked_before_timeout() {
        let engine = MatchingEngine::with_config(EngineConfig {
            timeout_ms: 0,
            ..EngineConfig::default()
        });
        let err = engine
            .assign(&dummy_ids(1), &ExclusionSet::new(), &mut rng(6))
            .unwrap_err();
        assert!(matches!(err, MatchingError::InsufficientParticipants { .. }));
    }

    #[test]
    fn oversized_set_is_rejected_before_building() {
        let engine = MatchingEngine::new();
        let too_many = u64::try_from(constants::MAX_PARTICIPANTS).unwrap() + 1;
        let ids = dummy_ids(too_many);
        let expected = MatchingError::TooManyParticipants {
            accepted: constants::MAX_PARTICIPANTS + 1,
            limit: constants::MAX_PARTICIPANTS,
        };
        let err = engine
            .assign(&ids, &ExclusionSet::new(), &mut rng(7))
            .unwrap_err();
        assert_eq!(err, expected);
        assert!(!err.is_retryable());
        assert_eq!(
            engine.check_feasibility(&ids, &ExclusionSet::new()),
            Err(expected)
        );
    }

    #[test]
    fn graph_build_counts_against_budget() {
        let engine = MatchingEngine::with_config(EngineConfig {
            timeout_ms: 0,
            ..EngineConfig::default()
        });
        let err = engine
            .check_feasibility(&dummy_ids(3), &ExclusionSet::new())
            .unwrap_err();
        assert!(matches!(err, MatchingError::ComputationTimeout { .. }));
    }

    #[test]
    fn check_feasibility_matches_assign() {
        let engine = MatchingEngine::new();
        let ids = dummy_ids(3);
        assert_eq!(engine.check_feasibility(&ids, &ExclusionSet::new()), Ok(()));
        let err = engine
            .check_feasibility(&ids, &ExclusionSet::from_raw(&[(1, 2)]))
            .unwrap_err();
        assert_eq!(
            err,
            MatchingError::InfeasibleConstraints {
                participants: 3,
                matched: 2,
            }
        );
    }

    #[test]
    fn same_seed_same_assignment() {
        let ids = dummy_ids(20);
        let exclusions = ExclusionSet::from_raw(&[(1, 2), (3, 4), (5, 6)]);
        let a = assign(&ids, &exclusions, &mut rng(42)).unwrap();
        let b = assign(&ids, &exclusions, &mut rng(42)).unwrap();
        assert_eq!(a, b);
    }
}
