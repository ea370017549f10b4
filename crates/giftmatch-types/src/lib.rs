//! # giftmatch-types
//!
//! Shared types, errors, and configuration for the **giftmatch** assignment
//! engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ParticipantId`], [`ExchangeId`]
//! - **Participant model**: [`Participant`], [`ParticipantStatus`]
//! - **Exclusion model**: [`ExclusionPair`], [`ExclusionSet`]
//! - **Assignment model**: [`Assignment`], [`Strategy`]
//! - **Exchange lifecycle**: [`ExchangeStatus`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`GiftmatchError`] and [`MatchingError`] with `GM_ERR_` prefix codes
//! - **Constants**: engine limits and defaults

pub mod assignment;
pub mod config;
pub mod constants;
pub mod error;
pub mod exchange;
pub mod exclusion;
pub mod ids;
pub mod participant;

// Re-export all primary types at crate root for ergonomic imports:
//   use giftmatch_types::{Assignment, ExclusionSet, ParticipantId, ...};

pub use assignment::*;
pub use config::*;
pub use error::*;
pub use exchange::*;
pub use exclusion::*;
pub use ids::*;
pub use participant::*;

// Constants are accessed via `giftmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).
