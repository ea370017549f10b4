//! Notification seam.
//!
//! Delivery (email, push, ...) lives outside this workspace. The exchange
//! hands one [`AssignmentNotice`] per giver to a [`NotificationDispatcher`],
//! and only after the whole assignment has been persisted.

use giftmatch_types::{ExchangeId, ParticipantId, Result};
use serde::{Deserialize, Serialize};

/// "You are giving a gift to ..." for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentNotice {
    pub exchange_id: ExchangeId,
    pub giver: ParticipantId,
    pub giver_name: String,
    pub recipient: ParticipantId,
    pub recipient_name: String,
}

/// Receives finalized assignment notices.
pub trait NotificationDispatcher {
    /// Hand over one notice.
    ///
    /// # Errors
    /// Implementations report failures as
    /// [`giftmatch_types::GiftmatchError::DispatchFailed`].
    fn dispatch(&mut self, notice: AssignmentNotice) -> Result<()>;
}

/// In-memory dispatcher that keeps every notice it is given.
#[derive(Debug, Default)]
pub struct Outbox {
    notices: Vec<AssignmentNotice>,
}

impl Outbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notices(&self) -> &[AssignmentNotice] {
        &self.notices
    }

    /// Take every queued notice, leaving the outbox empty.
    pub fn drain(&mut self) -> Vec<AssignmentNotice> {
        std::mem::take(&mut self.notices)
    }
}

impl NotificationDispatcher for Outbox {
    fn dispatch(&mut self, notice: AssignmentNotice) -> Result<()> {
        tracing::debug!(
            exchange = %notice.exchange_id,
            giver = %notice.giver,
            "Notice queued"
        );
        self.notices.push(notice);
        Ok(())
    }
}
