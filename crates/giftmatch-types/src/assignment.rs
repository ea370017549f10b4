//! The engine's output: who gives to whom.
//!
//! An [`Assignment`] is a permutation of the accepted participants with no
//! fixed point and no excluded edge. It does not persist itself; the caller
//! writes every recipient reference in one transaction.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ParticipantId, constants};

/// Which construction tier produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// A uniformly drawn permutation validated on the given attempt (1-based).
    Randomized { attempts: u32 },
    /// Augmenting-path construction with randomized vertex and edge order.
    Fallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Randomized { attempts } => write!(f, "RANDOMIZED(attempts={attempts})"),
            Self::Fallback => write!(f, "FALLBACK"),
        }
    }
}

/// A complete giver → recipient mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Giver → recipient, ordered by giver.
    pairs: BTreeMap<ParticipantId, ParticipantId>,
    /// How the mapping was constructed.
    pub strategy: Strategy,
}

impl Assignment {
    /// Wrap a mapping. No validation happens here; see the engine's
    /// `verify_assignment` for that.
    #[must_use]
    pub fn new(pairs: BTreeMap<ParticipantId, ParticipantId>, strategy: Strategy) -> Self {
        Self { pairs, strategy }
    }

    #[must_use]
    pub fn recipient_of(&self, giver: ParticipantId) -> Option<ParticipantId> {
        self.pairs.get(&giver).copied()
    }

    /// Reverse lookup. Linear in the number of participants.
    #[must_use]
    pub fn giver_of(&self, recipient: ParticipantId) -> Option<ParticipantId> {
        self.pairs
            .iter()
            .find(|&(_, r)| *r == recipient)
            .map(|(g, _)| *g)
    }

    /// `(giver, recipient)` pairs ordered by giver.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, ParticipantId)> + '_ {
        self.pairs.iter().map(|(g, r)| (*g, *r))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every participant that appears as a giver.
    #[must_use]
    pub fn participants(&self) -> BTreeSet<ParticipantId> {
        self.pairs.keys().copied().collect()
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<ParticipantId, ParticipantId> {
        &self.pairs
    }

    /// SHA-256 over the ordered pairs.
    ///
    /// `SHA-256(domain_sep || num_pairs || for each pair: giver || recipient)`
    ///
    /// The strategy is not part of the digest: two runs that happen to
    /// produce the same mapping hash identically.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::ASSIGNMENT_DIGEST_DOMAIN);
        hasher.update((self.pairs.len() as u64).to_le_bytes());
        for (giver, recipient) in &self.pairs {
            hasher.update(giver.0.to_le_bytes());
            hasher.update(recipient.0.to_le_bytes());
        }
        hasher.finalize().into()
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }

    /// Recompute the digest and compare with `expected`.
    #[must_use]
    pub fn verify_digest(&self, expected: &[u8; 32]) -> bool {
        self.digest() == *expected
    }
}
