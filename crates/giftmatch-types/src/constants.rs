//! System-wide constants for the giftmatch assignment engine.

/// Fewest accepted participants an exchange can be started with.
pub const MIN_PARTICIPANTS: usize = 2;

/// Most accepted participants a single draw accepts. The eligibility
/// graph is dense, so memory grows with the square of this.
pub const MAX_PARTICIPANTS: usize = 2_000;

/// Default number of uniformly random permutations drawn before the
/// engine switches to the augmenting-path fallback.
pub const DEFAULT_MAX_RANDOM_ATTEMPTS: u32 = 5_000;

/// Default wall-clock budget for a single `assign` call, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;

/// Upper bound accepted by [`crate::EngineConfig::validate`] for the
/// random attempt budget.
pub const MAX_RANDOM_ATTEMPTS_LIMIT: u32 = 1_000_000;

/// Upper bound accepted by [`crate::EngineConfig::validate`] for the
/// time budget (one minute).
pub const MAX_TIMEOUT_MS: u64 = 60_000;

/// The engine consults the clock once every this many work steps.
pub const BUDGET_CHECK_INTERVAL: u64 = 64;

/// Domain separator for [`crate::Assignment::digest`].
pub const ASSIGNMENT_DIGEST_DOMAIN: &[u8] = b"giftmatch:assignment:v1:";
