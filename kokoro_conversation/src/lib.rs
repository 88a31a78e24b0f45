#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Conversation state for the kokoro chat client.
//!
//! This crate owns the observable state of the application: the
//! conversation store with its append/replace-in-place upsert semantics,
//! the disk snapshots it persists to, and the [`TurnManager`] that drives
//! one streamed exchange end to end.
//!
//! # Key invariants
//! - A message id is unique within its conversation's sequence.
//! - At most one in-flight assistant message exists per active correlation
//!   id; the manager's guard flags enforce one streaming turn at a time.
//! - Fragments are committed to the store strictly in arrival order.

mod conversation;
mod locale;
mod manager;
mod storage;
mod store;
mod triggers;

pub use conversation::Conversation;
pub use locale::Locale;
pub use manager::{TurnError, TurnManager, TurnOutcome};
pub use storage::{AuthState, LocalStorage};
pub use store::ConversationStore;
pub use triggers::mentions_counselling_topic;
