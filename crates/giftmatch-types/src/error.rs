//! Error types for the giftmatch assignment engine.
//!
//! All errors use the `GM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Participant errors
//! - 2xx: Exclusion errors
//! - 3xx: Matching errors ([`MatchingError`])
//! - 4xx: Exchange lifecycle errors
//! - 5xx: Notification dispatch errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{ExchangeStatus, ParticipantId};

/// Failures of a single `assign` call.
///
/// The engine either returns a complete assignment or one of these; it
/// never hands back a partial mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    /// Fewer accepted participants than a draw needs.
    #[error(
        "GM_ERR_300: Insufficient participants: {accepted} accepted, at least {required} required"
    )]
    InsufficientParticipants { accepted: usize, required: usize },

    /// No exclusion-respecting assignment exists for this input.
    #[error(
        "GM_ERR_301: No valid arrangement possible: only {matched} of {participants} participants \
         can be given a recipient; remove some exclusions or add participants"
    )]
    InfeasibleConstraints { participants: usize, matched: usize },

    /// The time budget ran out before an assignment was found.
    #[error("GM_ERR_302: Assignment computation timed out after {elapsed_ms}ms (limit {limit_ms}ms)")]
    ComputationTimeout { elapsed_ms: u64, limit_ms: u64 },

    /// More accepted participants than one draw supports.
    #[error("GM_ERR_303: Too many participants: {accepted} accepted, at most {limit} supported")]
    TooManyParticipants { accepted: usize, limit: usize },
}

impl MatchingError {
    /// Whether retrying the same input may succeed.
    ///
    /// Only timeouts are transient; the other kinds recur until the
    /// participant or exclusion data changes.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ComputationTimeout { .. })
    }

    /// Numeric code shared with the `GM_ERR_` message prefix.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::InsufficientParticipants { .. } => 300,
            Self::InfeasibleConstraints { .. } => 301,
            Self::ComputationTimeout { .. } => 302,
            Self::TooManyParticipants { .. } => 303,
        }
    }
}

/// Central error enum for all giftmatch operations.
#[derive(Debug, Error)]
pub enum GiftmatchError {
    // =================================================================
    // Participant Errors (1xx)
    // =================================================================
    /// The participant is not registered in this exchange.
    #[error("GM_ERR_100: Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// A participant with this id is already registered.
    #[error("GM_ERR_101: Participant already registered: {0}")]
    DuplicateParticipant(ParticipantId),

    // =================================================================
    // Exclusion Errors (2xx)
    // =================================================================
    /// An exclusion pair named the same participant twice.
    #[error("GM_ERR_200: A participant cannot be excluded from themselves: {0}")]
    SelfExclusion(ParticipantId),

    // =================================================================
    // Matching Errors (3xx)
    // =================================================================
    #[error(transparent)]
    Matching(#[from] MatchingError),

    // =================================================================
    // Exchange Lifecycle Errors (4xx)
    // =================================================================
    /// An operation was attempted in the wrong exchange status.
    #[error("GM_ERR_400: Cannot {action} while exchange is {actual}")]
    WrongExchangeStatus {
        action: &'static str,
        actual: ExchangeStatus,
    },

    /// An assignment failed verification before it was persisted.
    #[error("GM_ERR_401: Invalid assignment: {reason}")]
    InvalidAssignment { reason: String },

    // =================================================================
    // Dispatch Errors (5xx)
    // =================================================================
    /// A notice could not be handed to the dispatcher.
    #[error("GM_ERR_500: Dispatch to {participant} failed: {reason}")]
    DispatchFailed {
        participant: ParticipantId,
        reason: String,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("GM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("GM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, out-of-range values, etc.).
    #[error("GM_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("GM_ERR_903: I/O error: {0}")]
    Io(String),
}

impl GiftmatchError {
    /// Whether retrying the same operation unchanged may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Matching(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, GiftmatchError>;

// Conversion from std::io::Error
impl From<std::io::Error> for GiftmatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GiftmatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = GiftmatchError::ParticipantNotFound(ParticipantId(7));
        let msg = format!("{err}");
        assert!(msg.starts_with("GM_ERR_100"), "Got: {msg}");
        assert!(msg.contains("p:7"));
    }

    #[test]
    fn infeasible_message_is_actionable() {
        let err = MatchingError::InfeasibleConstraints {
            participants: 4,
            matched: 3,
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("GM_ERR_301"));
        assert!(msg.contains("remove some exclusions or add participants"));
        assert_eq!(err.code(), 301);
    }

    #[test]
    fn matching_error_passes_through_transparently() {
        let err: GiftmatchError = MatchingError::InsufficientParticipants {
            accepted: 1,
            required: 2,
        }
        .into();
        let msg = format!("{err}");
        assert!(msg.starts_with("GM_ERR_300"), "Got: {msg}");
    }

    #[test]
    fn only_timeout_is_retryable() {
        assert!(
            MatchingError::ComputationTimeout {
                elapsed_ms: 10,
                limit_ms: 5
            }
            .is_retryable()
        );
        assert!(
            !MatchingError::InsufficientParticipants {
                accepted: 0,
                required: 2
            }
            .is_retryable()
        );
        assert!(
            !MatchingError::InfeasibleConstraints {
                participants: 2,
                matched: 0
            }
            .is_retryable()
        );
        assert!(
            !MatchingError::TooManyParticipants {
                accepted: 5_000,
                limit: 2_000
            }
            .is_retryable()
        );
        assert!(!GiftmatchError::Internal("x".into()).is_retryable());
    }

    #[test]
    fn wrong_status_display() {
        let err = GiftmatchError::WrongExchangeStatus {
            action: "start",
            actual: ExchangeStatus::Draft,
        };
        let msg = format!("{err}");
        assert!(msg.contains("GM_ERR_400"));
        assert!(msg.contains("DRAFT"));
    }

    #[test]
    fn all_errors_have_gm_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(GiftmatchError::SelfExclusion(ParticipantId(1))),
            Box::new(GiftmatchError::DuplicateParticipant(ParticipantId(1))),
            Box::new(GiftmatchError::Internal("test".into())),
            Box::new(GiftmatchError::InvalidAssignment {
                reason: "x".into(),
            }),
            Box::new(MatchingError::ComputationTimeout {
                elapsed_ms: 1,
                limit_ms: 1,
            }),
            Box::new(MatchingError::TooManyParticipants {
                accepted: 3,
                limit: 2,
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("GM_ERR_"),
                "Error missing GM_ERR_ prefix: {msg}"
            );
        }
    }
}
