//! Independent check of an assignment against its inputs.
//!
//! Callers run this before persisting an assignment they did not just
//! receive from the engine (e.g. one loaded back from storage).

use std::collections::{BTreeSet, HashMap};

use giftmatch_types::{Assignment, ExclusionSet, ParticipantId};
use thiserror::Error;

/// The first rule an assignment breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentViolation {
    #[error("{0} has no recipient")]
    MissingGiver(ParticipantId),

    #[error("{0} is not an accepted participant")]
    UnknownParticipant(ParticipantId),

    #[error("{0} is assigned to themselves")]
    SelfAssignment(ParticipantId),

    #[error("{recipient} receives from both {first} and {second}")]
    DuplicateRecipient {
        recipient: ParticipantId,
        first: ParticipantId,
        second: ParticipantId,
    },

    #[error("{giver} -> {recipient} is an excluded pair")]
    ExcludedPair {
        giver: ParticipantId,
        recipient: ParticipantId,
    },
}

/// Check that `assignment` is a bijection on `participants` with no fixed
/// point and no pair from `exclusions`.
///
/// # Errors
/// Returns the first [`AssignmentViolation`] found, scanning givers in
/// ascending order.
pub fn verify_assignment(
    assignment: &Assignment,
    participants: &BTreeSet<ParticipantId>,
    exclusions: &ExclusionSet,
) -> Result<(), AssignmentViolation> {
    if let Some(missing) = participants
        .iter()
        .find(|p| assignment.recipient_of(**p).is_none())
    {
        return Err(AssignmentViolation::MissingGiver(*missing));
    }

    let mut giver_of: HashMap<ParticipantId, ParticipantId> =
        HashMap::with_capacity(assignment.len());
    for (giver, recipient) in assignment.iter() {
        if !participants.contains(&giver) {
            return Err(AssignmentViolation::UnknownParticipant(giver));
        }
        if !participants.contains(&recipient) {
            return Err(AssignmentViolation::UnknownParticipant(recipient));
        }
        if giver == recipient {
            return Err(AssignmentViolation::SelfAssignment(giver));
        }
        if exclusions.contains(giver, recipient) {
            return Err(AssignmentViolation::ExcludedPair { giver, recipient });
        }
        if let Some(first) = giver_of.insert(recipient, giver) {
            return Err(AssignmentViolation::DuplicateRecipient {
                recipient,
                first,
                second: giver,
            });
        }
    }
    Ok(())
}
