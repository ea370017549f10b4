//! Participant model.
//!
//! Status transitions (invited → accepted / declined) belong to the
//! invitation flow upstream. This crate only records the status it is
//! handed; the engine reads it to decide who is eligible.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// Where a participant stands in the invitation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Invited,
    Accepted,
    Declined,
}

impl std::fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invited => write!(f, "INVITED"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Declined => write!(f, "DECLINED"),
        }
    }
}

/// A member of one gift exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Display name, used only in notices.
    #[serde(default)]
    pub name: String,
    pub status: ParticipantStatus,
    /// Who this participant gives to, once an assignment has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ParticipantId>,
}

impl Participant {
    #[must_use]
    pub fn new(id: ParticipantId, name: impl Into<String>, status: ParticipantStatus) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            recipient: None,
        }
    }

    /// Only accepted participants take part in the draw.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.status == ParticipantStatus::Accepted
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Participant {
    pub fn dummy_accepted(id: u64) -> Self {
        Self::new(ParticipantId(id), format!("participant-{id}"), ParticipantStatus::Accepted)
    }

    pub fn dummy_with_status(id: u64, status: ParticipantStatus) -> Self {
        Self::new(ParticipantId(id), format!("participant-{id}"), status)
    }
}

/// Collect the ids of every eligible participant, ordered and deduplicated.
#[must_use]
pub fn accepted_ids<'a, I>(participants: I) -> std::collections::BTreeSet<ParticipantId>
where
    I: IntoIterator<Item = &'a Participant>,
{
    participants
        .into_iter()
        .filter(|p| p.is_eligible())
        .map(|p| p.id)
        .collect()
}

/// Test helper: ids `1..=n` as an accepted set.
#[cfg(any(test, feature = "test-helpers"))]
pub fn dummy_ids(n: u64) -> std::collections::BTreeSet<ParticipantId> {
    (1..=n).map(ParticipantId).collect()
}
