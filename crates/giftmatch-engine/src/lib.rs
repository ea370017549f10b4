//! # giftmatch-engine
//!
//! **Pure assignment engine for gift exchanges.**
//!
//! Given the accepted participants of one exchange and the pairs that must
//! never be matched, the engine produces a complete giver → recipient
//! mapping or a typed [`MatchingError`]. It has:
//!
//! - **Zero side effects**: no I/O, no state between calls
//! - **Caller-supplied randomness**: every call takes its own `Rng`, so
//!   seeded runs are reproducible
//! - **Proven feasibility first**: a Hopcroft–Karp perfect-matching check
//!   rejects impossible inputs before any random search
//! - **Guaranteed termination**: a bounded randomized tier, then an
//!   augmenting-path fallback that always succeeds on feasible input
//!
//! ```text
//! assign(accepted ids, exclusions, rng) -> Assignment | MatchingError
//! ```
//!
//! [`MatchingError`]: giftmatch_types::MatchingError

pub mod bipartite;
pub mod budget;
pub mod engine;
pub mod graph;
pub mod sampler;
pub mod verify;

pub use bipartite::{Matching, maximum_matching, randomized_perfect_matching};
pub use budget::Budget;
pub use engine::{MatchingEngine, assign};
pub use graph::EligibilityGraph;
pub use sampler::{SampledPermutation, sample_permutation};
pub use verify::{AssignmentViolation, verify_assignment};
