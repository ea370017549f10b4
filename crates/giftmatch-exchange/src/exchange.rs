//! Exchange lifecycle controller.
//!
//! **DRAFT → INVITING → ACTIVE | FAILED_TO_START**
//!
//! The controller is the engine's only caller. It decides when a draw is
//! allowed, verifies the result, and persists it through the registry in
//! one step. Overwriting a live assignment takes an explicit
//! [`Exchange::reassign`]; [`Exchange::start`] refuses once ACTIVE.

use chrono::{DateTime, Utc};
use giftmatch_engine::{MatchingEngine, verify_assignment};
use giftmatch_types::{
    Assignment, ExchangeId, ExchangeStatus, ExclusionSet, GiftmatchError, MatchingError,
    Participant, ParticipantId, Result,
};
use rand::Rng;

use crate::{AssignmentNotice, NotificationDispatcher, ParticipantRegistry};

/// One gift exchange and everything the engine needs to run it.
#[derive(Debug)]
pub struct Exchange {
    id: ExchangeId,
    name: String,
    status: ExchangeStatus,
    registry: ParticipantRegistry,
    exclusions: ExclusionSet,
    /// The assignment currently persisted in the registry.
    assignment: Option<Assignment>,
    /// Digest of `assignment`, checked again before notices go out.
    assignment_digest: Option<[u8; 32]>,
    started_at: Option<DateTime<Utc>>,
    /// Why the last start attempt failed, for display to the owner.
    last_error: Option<MatchingError>,
}

impl Exchange {
    /// Create a new exchange in DRAFT.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ExchangeId::new(),
            name: name.into(),
            status: ExchangeStatus::Draft,
            registry: ParticipantRegistry::new(),
            exclusions: ExclusionSet::new(),
            assignment: None,
            assignment_digest: None,
            started_at: None,
            last_error: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> ExchangeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn status(&self) -> ExchangeStatus {
        self.status
    }

    #[must_use]
    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    #[must_use]
    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    #[must_use]
    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&MatchingError> {
        self.last_error.as_ref()
    }

    // =================================================================
    // Setup
    // =================================================================

    /// DRAFT → INVITING.
    pub fn open_invitations(&mut self) -> Result<()> {
        if self.status != ExchangeStatus::Draft {
            return Err(self.wrong_status("open invitations"));
        }
        self.status = ExchangeStatus::Inviting;
        tracing::info!(exchange = %self.id, "Invitations opened");
        Ok(())
    }

    /// Register a new participant.
    pub fn add_participant(&mut self, participant: Participant) -> Result<()> {
        self.ensure_editable("add participants")?;
        self.registry.register(participant)
    }

    /// Record the latest state of a participant from the invitation flow.
    pub fn update_participant(&mut self, participant: Participant) -> Result<()> {
        self.ensure_editable("update participants")?;
        if !self.registry.contains(participant.id) {
            return Err(GiftmatchError::ParticipantNotFound(participant.id));
        }
        self.registry.upsert(participant);
        Ok(())
    }

    /// Remove a participant along with every exclusion naming them.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant> {
        self.ensure_editable("remove participants")?;
        let removed = self.registry.remove(id)?;
        let dropped = self.exclusions.remove_participant(id);
        tracing::debug!(participant = %id, exclusions = dropped, "Participant removed");
        Ok(removed)
    }

    /// Forbid `a` and `b` from being paired. Both must be registered.
    pub fn add_exclusion(&mut self, a: ParticipantId, b: ParticipantId) -> Result<bool> {
        self.ensure_editable("add exclusions")?;
        for id in [a, b] {
            if !self.registry.contains(id) {
                return Err(GiftmatchError::ParticipantNotFound(id));
            }
        }
        self.exclusions.insert(a, b)
    }

    pub fn remove_exclusion(&mut self, a: ParticipantId, b: ParticipantId) -> Result<bool> {
        self.ensure_editable("remove exclusions")?;
        Ok(self.exclusions.remove(a, b))
    }

    // =================================================================
    // Drawing
    // =================================================================

    /// Ask the engine whether the current data can be started, without
    /// drawing.
    pub fn check_feasibility(&self, engine: &MatchingEngine) -> Result<()> {
        engine
            .check_feasibility(&self.registry.accepted_ids(), &self.exclusions)
            .map_err(Into::into)
    }

    /// INVITING | FAILED_TO_START → ACTIVE | FAILED_TO_START.
    ///
    /// # Errors
    /// - `WrongExchangeStatus` unless INVITING or FAILED_TO_START
    /// - any [`MatchingError`]; the exchange becomes FAILED_TO_START and
    ///   nothing is persisted
    pub fn start<R: Rng + ?Sized>(&mut self, engine: &MatchingEngine, rng: &mut R) -> Result<()> {
        if !self.status.can_start() {
            return Err(self.wrong_status("start"));
        }

        match self.draw_and_persist(engine, rng) {
            Ok(()) => {
                self.status = ExchangeStatus::Active;
                self.started_at = Some(Utc::now());
                self.last_error = None;
                tracing::info!(
                    exchange = %self.id,
                    participants = self.registry.accepted_ids().len(),
                    "Exchange started"
                );
                Ok(())
            }
            Err(err) => {
                self.status = ExchangeStatus::FailedToStart;
                if let GiftmatchError::Matching(matching) = &err {
                    self.last_error = Some(matching.clone());
                }
                tracing::warn!(
                    exchange = %self.id,
                    error = %err,
                    retryable = err.is_retryable(),
                    "Exchange failed to start"
                );
                Err(err)
            }
        }
    }

    /// Draw a fresh assignment for an ACTIVE exchange, overwriting the
    /// current one.
    ///
    /// # Errors
    /// - `WrongExchangeStatus` unless ACTIVE
    /// - any [`MatchingError`]; the previous assignment stays in place
    pub fn reassign<R: Rng + ?Sized>(
        &mut self,
        engine: &MatchingEngine,
        rng: &mut R,
    ) -> Result<()> {
        if self.status != ExchangeStatus::Active {
            return Err(self.wrong_status("reassign"));
        }
        self.draw_and_persist(engine, rng)?;
        tracing::info!(exchange = %self.id, "Assignment redrawn");
        Ok(())
    }

    fn draw_and_persist<R: Rng + ?Sized>(
        &mut self,
        engine: &MatchingEngine,
        rng: &mut R,
    ) -> Result<()> {
        let accepted = self.registry.accepted_ids();
        let assignment = engine.assign(&accepted, &self.exclusions, rng)?;
        verify_assignment(&assignment, &accepted, &self.exclusions).map_err(|v| {
            GiftmatchError::InvalidAssignment {
                reason: v.to_string(),
            }
        })?;
        self.registry.apply_assignment(&assignment)?;
        self.assignment_digest = Some(assignment.digest());
        self.assignment = Some(assignment);
        Ok(())
    }

    // =================================================================
    // Notification
    // =================================================================

    /// Send one notice per giver. ACTIVE only.
    ///
    /// The persisted references are re-read from the registry and checked
    /// against the stored digest first, so a dispatcher never sees a
    /// mapping that differs from the one drawn. Returns the number of
    /// notices sent.
    pub fn notify<D: NotificationDispatcher + ?Sized>(&self, dispatcher: &mut D) -> Result<usize> {
        if self.status != ExchangeStatus::Active {
            return Err(self.wrong_status("send notices"));
        }
        let (Some(assignment), Some(expected)) = (&self.assignment, &self.assignment_digest) else {
            return Err(GiftmatchError::Internal(
                "active exchange has no assignment".into(),
            ));
        };

        let persisted = Assignment::new(self.registry.persisted_mapping(), assignment.strategy);
        if !persisted.verify_digest(expected) {
            return Err(GiftmatchError::InvalidAssignment {
                reason: "persisted references do not match the drawn assignment".into(),
            });
        }

        let notices = persisted
            .iter()
            .map(|(giver, recipient)| self.notice(giver, recipient))
            .collect::<Result<Vec<_>>>()?;
        let count = notices.len();
        for notice in notices {
            dispatcher.dispatch(notice)?;
        }
        tracing::info!(exchange = %self.id, notices = count, "Assignment notices dispatched");
        Ok(count)
    }

    fn notice(&self, giver: ParticipantId, recipient: ParticipantId) -> Result<AssignmentNotice> {
        let name_of = |id| {
            self.registry
                .get(id)
                .map(|p| p.name.clone())
                .ok_or(GiftmatchError::ParticipantNotFound(id))
        };
        Ok(AssignmentNotice {
            exchange_id: self.id,
            giver,
            giver_name: name_of(giver)?,
            recipient,
            recipient_name: name_of(recipient)?,
        })
    }

    // =================================================================
    // Helpers
    // =================================================================

    fn ensure_editable(&self, action: &'static str) -> Result<()> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(self.wrong_status(action))
        }
    }

    fn wrong_status(&self, action: &'static str) -> GiftmatchError {
        GiftmatchError::WrongExchangeStatus {
            action,
            actual: self.status,
        }
    }
}
