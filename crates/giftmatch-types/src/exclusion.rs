//! Exclusion model: pairs of participants that must never give to each other.
//!
//! Exclusions are unordered. Excluding `(a, b)` forbids both `a → b` and
//! `b → a`, so every pair is stored normalized with the smaller id first.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{GiftmatchError, ParticipantId, Result};

/// An unordered pair of distinct participants.
///
/// On the wire a pair is a two-element array (`[3, 7]`). Deserializing
/// `[4, 4]` fails the same way [`ExclusionPair::new`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(
    try_from = "(ParticipantId, ParticipantId)",
    into = "(ParticipantId, ParticipantId)"
)]
pub struct ExclusionPair {
    low: ParticipantId,
    high: ParticipantId,
}

impl ExclusionPair {
    /// Build a normalized pair.
    ///
    /// # Errors
    /// Returns [`GiftmatchError::SelfExclusion`] if `a == b`.
    pub fn new(a: ParticipantId, b: ParticipantId) -> Result<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Ok(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => Err(GiftmatchError::SelfExclusion(a)),
        }
    }

    #[must_use]
    pub fn low(&self) -> ParticipantId {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> ParticipantId {
        self.high
    }

    /// Whether `id` is one of the two members.
    #[must_use]
    pub fn involves(&self, id: ParticipantId) -> bool {
        self.low == id || self.high == id
    }

    /// Whether both members are in `ids`.
    #[must_use]
    pub fn within(&self, ids: &BTreeSet<ParticipantId>) -> bool {
        ids.contains(&self.low) && ids.contains(&self.high)
    }
}

impl TryFrom<(ParticipantId, ParticipantId)> for ExclusionPair {
    type Error = GiftmatchError;

    fn try_from((a, b): (ParticipantId, ParticipantId)) -> Result<Self> {
        Self::new(a, b)
    }
}

impl From<ExclusionPair> for (ParticipantId, ParticipantId) {
    fn from(pair: ExclusionPair) -> Self {
        (pair.low, pair.high)
    }
}

impl std::fmt::Display for ExclusionPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<->{}", self.low, self.high)
    }
}

/// The set of exclusions configured for one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet {
    pairs: BTreeSet<ExclusionPair>,
}

impl ExclusionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude `a` and `b` from each other. Returns `false` if the pair was
    /// already present.
    ///
    /// # Errors
    /// Returns [`GiftmatchError::SelfExclusion`] if `a == b`.
    pub fn insert(&mut self, a: ParticipantId, b: ParticipantId) -> Result<bool> {
        let pair = ExclusionPair::new(a, b)?;
        Ok(self.pairs.insert(pair))
    }

    /// Remove the exclusion between `a` and `b`, in either order.
    pub fn remove(&mut self, a: ParticipantId, b: ParticipantId) -> bool {
        ExclusionPair::new(a, b).is_ok_and(|pair| self.pairs.remove(&pair))
    }

    /// Whether `a` and `b` are excluded from each other. Order-insensitive.
    #[must_use]
    pub fn contains(&self, a: ParticipantId, b: ParticipantId) -> bool {
        ExclusionPair::new(a, b).is_ok_and(|pair| self.pairs.contains(&pair))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExclusionPair> {
        self.pairs.iter()
    }

    /// Keep only the pairs whose members are both in `ids`.
    #[must_use]
    pub fn restricted_to(&self, ids: &BTreeSet<ParticipantId>) -> Self {
        self.pairs.iter().filter(|p| p.within(ids)).copied().collect()
    }

    /// Drop every pair that mentions `id`. Returns how many were removed.
    pub fn remove_participant(&mut self, id: ParticipantId) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|p| !p.involves(id));
        before - self.pairs.len()
    }
}

impl FromIterator<ExclusionPair> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = ExclusionPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ExclusionSet {
    type Item = &'a ExclusionPair;
    type IntoIter = std::collections::btree_set::Iter<'a, ExclusionPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Test helper: build a set from raw id pairs.
#[cfg(any(test, feature = "test-helpers"))]
impl ExclusionSet {
    pub fn from_raw(pairs: &[(u64, u64)]) -> Self {
        pairs
            .iter()
            .map(|&(a, b)| {
                ExclusionPair::new(ParticipantId(a), ParticipantId(b))
                    .expect("test exclusion pairs must be distinct")
            })
            .collect()
    }
}
