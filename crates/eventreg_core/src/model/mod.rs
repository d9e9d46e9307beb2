//! In-memory entity model for event registration.
//!
//! # Responsibility
//! - Define participants, events and the registration link between them.
//! - Own the `RegistrationManager` aggregate that holds all three collections.
//!
//! # Invariants
//! - Names are the identity of participants and events (exact, case-sensitive).
//! - Collections keep insertion order.
//! - Input rules (blank names, user-facing messages) live in the service layer;
//!   this module only guards structural invariants.

pub mod event;
pub mod manager;
pub mod participant;
pub mod registration;

use chrono::NaiveTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural invariant violations raised by the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    DuplicateParticipant(String),
    DuplicateEvent(String),
    DuplicateRegistration { participant: String, event: String },
    UnknownParticipant(String),
    UnknownEvent(String),
    InvalidEventWindow {
        event: String,
        start: NaiveTime,
        end: NaiveTime,
    },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateParticipant(name) => write!(f, "duplicate participant `{name}`"),
            Self::DuplicateEvent(name) => write!(f, "duplicate event `{name}`"),
            Self::DuplicateRegistration { participant, event } => {
                write!(f, "duplicate registration `{participant}` -> `{event}`")
            }
            Self::UnknownParticipant(name) => write!(f, "unknown participant `{name}`"),
            Self::UnknownEvent(name) => write!(f, "unknown event `{name}`"),
            Self::InvalidEventWindow { event, start, end } => write!(
                f,
                "event `{event}` ends ({end}) before it starts ({start})"
            ),
        }
    }
}

impl Error for ModelError {}
