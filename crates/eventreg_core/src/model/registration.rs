//! Registration link entity.

use super::event::Event;
use super::participant::Participant;
use serde::{Deserialize, Serialize};

/// Enrolment of exactly one participant in exactly one event.
///
/// Holds value copies of both ends; links are resolved by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub participant: Participant,
    pub event: Event,
}

impl Registration {
    pub fn new(participant: Participant, event: Event) -> Self {
        Self { participant, event }
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Returns the `(participant, event)` name pair that identifies this link.
    pub fn key(&self) -> (&str, &str) {
        (self.participant.name(), self.event.name())
    }
}
