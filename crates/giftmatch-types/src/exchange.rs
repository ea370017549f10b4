//! Exchange lifecycle status.
//!
//! **DRAFT → INVITING → ACTIVE | FAILED_TO_START**
//!
//! The engine runs on the transition out of INVITING. A failed start can be
//! retried once the owner has fixed the participant or exclusion data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an exchange stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    /// Being set up by the owner; nobody invited yet.
    Draft,
    /// Invitations are out; participants accept or decline.
    Inviting,
    /// An assignment has been drawn and persisted.
    Active,
    /// The last start attempt failed; nothing was persisted.
    FailedToStart,
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::Inviting => write!(f, "INVITING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::FailedToStart => write!(f, "FAILED_TO_START"),
        }
    }
}

impl ExchangeStatus {
    /// Whether the engine may be invoked to start the exchange.
    #[must_use]
    pub fn can_start(self) -> bool {
        matches!(self, Self::Inviting | Self::FailedToStart)
    }

    /// Whether participant and exclusion data may still be edited.
    #[must_use]
    pub fn is_editable(self) -> bool {
        !matches!(self, Self::Active)
    }
}
