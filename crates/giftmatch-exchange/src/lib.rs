//! # giftmatch-exchange
//!
//! **Caller side of the engine**: the pieces that feed it and consume its
//! output, kept in memory.
//!
//! ## Architecture
//!
//! 1. **ParticipantRegistry**: participants of one exchange and their
//!    persisted recipient references
//! 2. **Exchange**: lifecycle controller; owns the registry and exclusions,
//!    invokes the engine on start and persists the result atomically
//! 3. **NotificationDispatcher**: seam to whatever tells each participant
//!    who they give to; [`Outbox`] collects notices in memory
//!
//! ## Start Flow
//!
//! ```text
//! Exchange.start() → MatchingEngine.assign() → verify_assignment()
//!     → ParticipantRegistry.apply_assignment() → ACTIVE
//!     → Exchange.notify() → NotificationDispatcher
//! ```
//!
//! A failed draw writes nothing: the registry either holds a complete
//! assignment or none at all.

pub mod dispatch;
pub mod exchange;
pub mod registry;

pub use dispatch::{AssignmentNotice, NotificationDispatcher, Outbox};
pub use exchange::Exchange;
pub use registry::ParticipantRegistry;
