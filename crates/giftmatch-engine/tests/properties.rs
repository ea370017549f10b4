//! Integration test: assignment properties over many seeded inputs.
//!
//! Every successful draw must be a bijection on the accepted set with no
//! self-assignment and no excluded pair. Feasibility must agree with a
//! brute-force enumeration on small inputs.

use std::collections::{BTreeSet, HashMap, HashSet};

use giftmatch_engine::{MatchingEngine, assign, verify_assignment};
use giftmatch_types::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// HELPERS
// ============================================================================

fn pid(n: u64) -> ParticipantId {
    ParticipantId(n)
}

/// Random exclusion set over ids `1..=n`, each pair excluded with
/// probability `density`.
fn random_exclusions(rng: &mut ChaCha8Rng, n: u64, density: f64) -> ExclusionSet {
    let mut set = ExclusionSet::new();
    for a in 1..=n {
        for b in (a + 1)..=n {
            if rng.gen_bool(density) {
                set.insert(pid(a), pid(b)).unwrap();
            }
        }
    }
    set
}

/// Count valid assignments by trying every permutation.
fn brute_force_count(ids: &BTreeSet<ParticipantId>, exclusions: &ExclusionSet) -> usize {
    fn walk(
        ids: &[ParticipantId],
        exclusions: &ExclusionSet,
        giver: usize,
        used: &mut Vec<bool>,
    ) -> usize {
        if giver == ids.len() {
            return 1;
        }
        let mut total = 0;
        for r in 0..ids.len() {
            if used[r] || r == giver || exclusions.contains(ids[giver], ids[r]) {
                continue;
            }
            used[r] = true;
            total += walk(ids, exclusions, giver + 1, used);
            used[r] = false;
        }
        total
    }
    let ids: Vec<_> = ids.iter().copied().collect();
    let mut used = vec![false; ids.len()];
    walk(&ids, exclusions, 0, &mut used)
}

/// Exclude every pair except neighbours on the path `1 - 2 - ... - n`.
fn path_only(n: u64) -> ExclusionSet {
    let mut set = ExclusionSet::new();
    for a in 1..=n {
        for b in (a + 2)..=n {
            set.insert(pid(a), pid(b)).unwrap();
        }
    }
    set
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn every_success_is_a_valid_assignment() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut successes = 0;
    for round in 0..300 {
        let n = rng.gen_range(2..=16);
        let density = [0.0, 0.1, 0.3, 0.5, 0.7][round % 5];
        let ids = dummy_ids(n);
        let exclusions = random_exclusions(&mut rng, n, density);

        match assign(&ids, &exclusions, &mut rng) {
            Ok(assignment) => {
                successes += 1;
                verify_assignment(&assignment, &ids, &exclusions)
                    .unwrap_or_else(|v| panic!("round {round}: {v}"));

                // Bijection, spelled out.
                let givers: BTreeSet<_> = assignment.iter().map(|(g, _)| g).collect();
                let recipients: BTreeSet<_> = assignment.iter().map(|(_, r)| r).collect();
                assert_eq!(givers, ids);
                assert_eq!(recipients, ids);
                for (g, r) in assignment.iter() {
                    assert_ne!(g, r);
                    assert!(!exclusions.contains(g, r));
                }
            }
            Err(MatchingError::InfeasibleConstraints { participants, matched }) => {
                assert_eq!(participants, ids.len());
                assert!(matched < participants);
            }
            Err(other) => panic!("round {round}: unexpected {other}"),
        }
    }
    assert!(successes > 100, "most random inputs are feasible, got {successes}");
}

#[test]
fn feasibility_agrees_with_brute_force() {
    let engine = MatchingEngine::new();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    for _ in 0..400 {
        let n = rng.gen_range(2..=6);
        let density = rng.gen_range(0.0..0.9);
        let ids = dummy_ids(n);
        let exclusions = random_exclusions(&mut rng, n, density);

        let expected = brute_force_count(&ids, &exclusions) > 0;
        let feasible = engine.check_feasibility(&ids, &exclusions).is_ok();
        assert_eq!(feasible, expected, "n={n} exclusions={exclusions:?}");

        let drawn = engine.assign(&ids, &exclusions, &mut rng);
        assert_eq!(drawn.is_ok(), expected);
    }
}

#[test]
fn dense_exclusions_with_unique_solution_use_fallback() {
    // Only neighbours on a path may be paired, and a path has no cycles, so
    // the one valid assignment swaps 1<->2, 3<->4, ..., 11<->12. A random
    // draw hits it with probability 1/12!.
    let ids = dummy_ids(12);
    let exclusions = path_only(12);
    assert_eq!(brute_force_count(&dummy_ids(6), &path_only(6)), 1);

    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let assignment = assign(&ids, &exclusions, &mut rng).unwrap();

    assert_eq!(assignment.strategy, Strategy::Fallback);
    for k in (1..=12).step_by(2) {
        assert_eq!(assignment.recipient_of(pid(k)), Some(pid(k + 1)));
        assert_eq!(assignment.recipient_of(pid(k + 1)), Some(pid(k)));
    }
}

#[test]
fn odd_path_is_infeasible() {
    let err = assign(&dummy_ids(7), &path_only(7), &mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
    assert_eq!(
        err,
        MatchingError::InfeasibleConstraints {
            participants: 7,
            matched: 6,
        }
    );
}

#[test]
fn ring_of_five_yields_both_rotations() {
    // Only ring neighbours may be paired. An odd ring has no perfect
    // pairing into swaps, so the valid assignments are the two rotations.
    let mut exclusions = path_only(5);
    exclusions.remove(pid(1), pid(5));
    let ids = dummy_ids(5);
    assert_eq!(brute_force_count(&ids, &exclusions), 2);

    let mut rng = ChaCha8Rng::seed_from_u64(55);
    let mut seen = HashSet::new();
    for _ in 0..100 {
        let a = assign(&ids, &exclusions, &mut rng).unwrap();
        seen.insert(a.digest());
    }
    assert_eq!(seen.len(), 2);
}

#[test]
fn three_cycles_are_not_biased_to_one() {
    let ids = dummy_ids(3);
    let mut rng = ChaCha8Rng::seed_from_u64(303);
    let mut counts: HashMap<Option<ParticipantId>, usize> = HashMap::new();
    for _ in 0..600 {
        let a = assign(&ids, &ExclusionSet::new(), &mut rng).unwrap();
        *counts.entry(a.recipient_of(pid(1))).or_default() += 1;
    }
    assert_eq!(counts.len(), 2);
    for (_, count) in counts {
        assert!(count > 200, "expected roughly even split, got {count}/600");
    }
}

#[test]
fn reinvocation_gives_independent_valid_results() {
    let ids = dummy_ids(30);
    let exclusions = ExclusionSet::from_raw(&[(1, 2), (3, 4), (5, 6), (7, 8)]);
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let first = assign(&ids, &exclusions, &mut rng).unwrap();
    let second = assign(&ids, &exclusions, &mut rng).unwrap();

    verify_assignment(&first, &ids, &exclusions).unwrap();
    verify_assignment(&second, &ids, &exclusions).unwrap();
    // 30 participants: two independent draws colliding is vanishingly rare.
    assert_ne!(first.digest(), second.digest());
}

#[test]
fn declined_exclusion_members_do_not_block() {
    // 3 declined; the exclusions involving 3 must not matter.
    let people = vec![
        Participant::dummy_accepted(1),
        Participant::dummy_accepted(2),
        Participant::dummy_with_status(3, ParticipantStatus::Declined),
    ];
    let exclusions = ExclusionSet::from_raw(&[(1, 3), (2, 3)]);
    let a = MatchingEngine::new()
        .assign_participants(&people, &exclusions, &mut ChaCha8Rng::seed_from_u64(4))
        .unwrap();
    assert_eq!(a.recipient_of(pid(1)), Some(pid(2)));
}

#[test]
fn low_hundreds_complete_quickly() {
    let mut rng = ChaCha8Rng::seed_from_u64(300);
    let ids = dummy_ids(300);
    let exclusions = random_exclusions(&mut rng, 300, 0.2);
    // Unoptimized builds on a busy runner need headroom over the default.
    let engine = MatchingEngine::with_config(EngineConfig {
        timeout_ms: constants::MAX_TIMEOUT_MS,
        ..EngineConfig::default()
    });
    let started = std::time::Instant::now();
    let a = engine.assign(&ids, &exclusions, &mut rng).unwrap();
    verify_assignment(&a, &ids, &exclusions).unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(30));
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = MatchingEngine::new();
    let ids = dummy_ids(40);
    let exclusions = ExclusionSet::from_raw(&[(1, 2), (2, 3), (10, 20)]);

    std::thread::scope(|scope| {
        for seed in 0..4u64 {
            let (engine, ids, exclusions) = (&engine, &ids, &exclusions);
            scope.spawn(move || {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                for _ in 0..25 {
                    let a = engine.assign(ids, exclusions, &mut rng).unwrap();
                    verify_assignment(&a, ids, exclusions).unwrap();
                }
            });
        }
    });
}
