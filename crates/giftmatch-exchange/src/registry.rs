//! Participant registry for one exchange.
//!
//! Stores participants as handed over by the invitation flow and the
//! recipient reference each one ends up with. Writing an assignment is
//! all-or-nothing: every check runs against a staged copy, and the copy
//! replaces the live map only when all of them pass.

use std::collections::{BTreeMap, BTreeSet};

use giftmatch_types::{
    Assignment, GiftmatchError, Participant, ParticipantId, Result, accepted_ids,
};

#[derive(Debug, Clone, Default)]
pub struct ParticipantRegistry {
    participants: BTreeMap<ParticipantId, Participant>,
}

impl ParticipantRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant that is not registered yet.
    ///
    /// # Errors
    /// Returns [`GiftmatchError::DuplicateParticipant`] if the id is taken.
    pub fn register(&mut self, participant: Participant) -> Result<()> {
        if self.participants.contains_key(&participant.id) {
            return Err(GiftmatchError::DuplicateParticipant(participant.id));
        }
        self.participants.insert(participant.id, participant);
        Ok(())
    }

    /// Insert or replace a participant record, returning the previous one.
    pub fn upsert(&mut self, participant: Participant) -> Option<Participant> {
        self.participants.insert(participant.id, participant)
    }

    /// Remove a participant.
    ///
    /// # Errors
    /// Returns [`GiftmatchError::ParticipantNotFound`] if not registered.
    pub fn remove(&mut self, id: ParticipantId) -> Result<Participant> {
        self.participants
            .remove(&id)
            .ok_or(GiftmatchError::ParticipantNotFound(id))
    }

    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.participants.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Ids of every accepted participant: the engine's input set.
    #[must_use]
    pub fn accepted_ids(&self) -> BTreeSet<ParticipantId> {
        accepted_ids(self.participants.values())
    }

    #[must_use]
    pub fn recipient_of(&self, giver: ParticipantId) -> Option<ParticipantId> {
        self.participants.get(&giver).and_then(|p| p.recipient)
    }

    /// The persisted giver → recipient references.
    #[must_use]
    pub fn persisted_mapping(&self) -> BTreeMap<ParticipantId, ParticipantId> {
        self.participants
            .values()
            .filter_map(|p| p.recipient.map(|r| (p.id, r)))
            .collect()
    }

    /// Write every recipient reference from `assignment` in one step.
    ///
    /// The assignment must cover exactly the accepted participants. Any
    /// previous references (including those of participants who have since
    /// declined) are cleared in the same step.
    ///
    /// # Errors
    /// - [`GiftmatchError::ParticipantNotFound`] if a giver or recipient is
    ///   not registered
    /// - [`GiftmatchError::InvalidAssignment`] if it names a participant who
    ///   is not accepted, or leaves an accepted participant out
    ///
    /// On error the registry is unchanged.
    pub fn apply_assignment(&mut self, assignment: &Assignment) -> Result<()> {
        let accepted = self.accepted_ids();
        let mut staged = self.participants.clone();
        for participant in staged.values_mut() {
            participant.recipient = None;
        }

        for (giver, recipient) in assignment.iter() {
            for id in [giver, recipient] {
                match staged.get(&id) {
                    None => return Err(GiftmatchError::ParticipantNotFound(id)),
                    Some(p) if !p.is_eligible() => {
                        return Err(GiftmatchError::InvalidAssignment {
                            reason: format!("{id} is {} and cannot take part", p.status),
                        });
                    }
                    Some(_) => {}
                }
            }
            if let Some(p) = staged.get_mut(&giver) {
                p.recipient = Some(recipient);
            }
        }

        if let Some(missing) = accepted
            .iter()
            .find(|id| assignment.recipient_of(**id).is_none())
        {
            return Err(GiftmatchError::InvalidAssignment {
                reason: format!("{missing} was left without a recipient"),
            });
        }

        self.participants = staged;
        tracing::debug!(pairs = assignment.len(), "Assignment persisted to registry");
        Ok(())
    }

    /// Drop every recipient reference.
    pub fn clear_assignment(&mut self) {
        for participant in self.participants.values_mut() {
            participant.recipient = None;
        }
    }
}
