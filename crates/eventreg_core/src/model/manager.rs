//! Registration aggregate.
//!
//! # Responsibility
//! - Hold participants, events and registrations in insertion order.
//! - Keep name indexes so uniqueness and existence checks do not scan.
//!
//! # Invariants
//! - No two participants share a name; no two events share a name.
//! - At most one registration exists per `(participant, event)` name pair.
//! - Every registration refers to a participant and an event held here, and
//!   carries the aggregate's own copies of both.
//! - Indexes are derived state and are rebuilt on deserialization.

use super::event::Event;
use super::participant::Participant;
use super::registration::Registration;
use super::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Root of the participant/event/registration object graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ManagerSnapshot", try_from = "ManagerSnapshot")]
pub struct RegistrationManager {
    participants: Vec<Participant>,
    events: Vec<Event>,
    registrations: Vec<Registration>,
    participant_index: HashMap<String, usize>,
    event_index: HashMap<String, usize>,
    registration_keys: HashSet<(String, String)>,
}

/// Plain ordered view of the aggregate, used for serde and storage decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSnapshot {
    pub participants: Vec<Participant>,
    pub events: Vec<Event>,
    pub registrations: Vec<Registration>,
}

impl RegistrationManager {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a participant.
    ///
    /// # Errors
    /// - `DuplicateParticipant` when the name is already taken.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), ModelError> {
        if self.participant_index.contains_key(participant.name()) {
            return Err(ModelError::DuplicateParticipant(participant.name));
        }
        self.participant_index
            .insert(participant.name.clone(), self.participants.len());
        self.participants.push(participant);
        Ok(())
    }

    /// Appends an event.
    ///
    /// # Errors
    /// - `InvalidEventWindow` when the event starts after it ends.
    /// - `DuplicateEvent` when the name is already taken.
    pub fn add_event(&mut self, event: Event) -> Result<(), ModelError> {
        event.validate()?;
        if self.event_index.contains_key(event.name()) {
            return Err(ModelError::DuplicateEvent(event.name));
        }
        self.event_index.insert(event.name.clone(), self.events.len());
        self.events.push(event);
        Ok(())
    }

    /// Appends a registration, re-pointing both ends at the aggregate's copies.
    ///
    /// Returns the stored registration.
    ///
    /// # Errors
    /// - `UnknownParticipant` / `UnknownEvent` when either end is missing.
    /// - `DuplicateRegistration` when the pair is already linked.
    pub fn add_registration(
        &mut self,
        registration: Registration,
    ) -> Result<Registration, ModelError> {
        let (participant_name, event_name) = registration.key();
        let participant = self
            .find_participant(participant_name)
            .ok_or_else(|| ModelError::UnknownParticipant(participant_name.to_string()))?
            .clone();
        let event = self
            .find_event(event_name)
            .ok_or_else(|| ModelError::UnknownEvent(event_name.to_string()))?
            .clone();

        let key = (participant.name.clone(), event.name.clone());
        if self.registration_keys.contains(&key) {
            return Err(ModelError::DuplicateRegistration {
                participant: key.0,
                event: key.1,
            });
        }
        self.registration_keys.insert(key);
        let stored = Registration::new(participant, event);
        self.registrations.push(stored.clone());
        Ok(stored)
    }

    pub fn participant(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn registration(&self, index: usize) -> Option<&Registration> {
        self.registrations.get(index)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Exact, case-sensitive name lookup.
    pub fn find_participant(&self, name: &str) -> Option<&Participant> {
        self.participant_index
            .get(name)
            .and_then(|index| self.participants.get(*index))
    }

    /// Exact, case-sensitive name lookup.
    pub fn find_event(&self, name: &str) -> Option<&Event> {
        self.event_index
            .get(name)
            .and_then(|index| self.events.get(*index))
    }

    pub fn has_participant(&self, name: &str) -> bool {
        self.participant_index.contains_key(name)
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.event_index.contains_key(name)
    }

    pub fn has_registration(&self, participant_name: &str, event_name: &str) -> bool {
        self.registration_keys
            .contains(&(participant_name.to_string(), event_name.to_string()))
    }

    /// Registrations of one participant, in registration order.
    pub fn registrations_for<'a, 'b>(
        &'a self,
        participant_name: &'b str,
    ) -> impl Iterator<Item = &'a Registration> + 'b
    where
        'a: 'b,
    {
        self.registrations
            .iter()
            .filter(move |registration| registration.participant.name == participant_name)
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty() && self.events.is_empty() && self.registrations.is_empty()
    }

    /// Drops every participant, event and registration.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl TryFrom<ManagerSnapshot> for RegistrationManager {
    type Error = ModelError;

    fn try_from(snapshot: ManagerSnapshot) -> Result<Self, Self::Error> {
        let mut manager = Self::new();
        for participant in snapshot.participants {
            manager.add_participant(participant)?;
        }
        for event in snapshot.events {
            manager.add_event(event)?;
        }
        for registration in snapshot.registrations {
            manager.add_registration(registration)?;
        }
        Ok(manager)
    }
}

impl From<RegistrationManager> for ManagerSnapshot {
    fn from(manager: RegistrationManager) -> Self {
        Self {
            participants: manager.participants,
            events: manager.events,
            registrations: manager.registrations,
        }
    }
}
