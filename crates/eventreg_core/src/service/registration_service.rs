//! Registration use-case service.
//!
//! # Responsibility
//! - Create participants and events, and register participants for events.
//! - Answer list and exact-name lookup queries over the aggregate.
//!
//! # Invariants
//! - Every check runs before mutation; a rejected call neither changes the
//!   aggregate nor reaches the store.
//! - Every accepted mutation is followed by a full `save` of the aggregate.
//! - Rejection messages are fixed strings; composite messages always carry
//!   every clause, whichever input actually failed.
//! - Names are trimmed only to detect blanks. Uniqueness and lookups compare
//!   the raw, case-sensitive string.
//! - A failed save is returned as-is. The in-memory mutation is not rolled
//!   back and nothing is retried.

use crate::model::event::Event;
use crate::model::manager::RegistrationManager;
use crate::model::participant::Participant;
use crate::model::registration::Registration;
use crate::model::ModelError;
use crate::repo::{RegistrationStore, StoreError};
use chrono::{NaiveDate, NaiveTime};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PARTICIPANT_NAME_EMPTY: &str = "Participant name cannot be empty!";
const PARTICIPANT_NAME_TAKEN: &str = "Participant name already exists";
const EVENT_FIELDS_MISSING: &str = "Event name cannot be empty! Event date cannot be empty! Event start time cannot be empty! Event end time cannot be empty!";
const EVENT_NAME_EMPTY: &str = "Event name cannot be empty!";
const EVENT_WINDOW_REVERSED: &str = "Event end time cannot be before event start time!";
const EVENT_NAME_TAKEN: &str = "Event name already exists";
const REGISTRATION_SELECTION_MISSING: &str =
    "Participant needs to be selected for registration! Event needs to be selected for registration!";
const REGISTRATION_TARGET_MISSING: &str = "Participant does not exist! Event does not exist!";
const PARTICIPANT_NOT_FOUND: &str = "Participant was not found";
const EVENT_NOT_FOUND: &str = "Event was not found";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by [`RegistrationService`].
#[derive(Debug)]
pub enum ServiceError {
    /// Caller input was rejected; carries the user-facing message.
    InvalidInput(String),
    /// Aggregate refused a mutation the service had already validated.
    Model(ModelError),
    /// Persistence failure.
    Store(StoreError),
}

impl ServiceError {
    /// Returns the rejection message for `InvalidInput`, `None` otherwise.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::InvalidInput(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::Model(err) => write!(f, "inconsistent registration state: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(_) => None,
            Self::Model(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Validating facade over one registration aggregate and its store.
pub struct RegistrationService<S: RegistrationStore> {
    manager: RegistrationManager,
    store: S,
}

impl<S: RegistrationStore> RegistrationService<S> {
    /// Wraps an existing aggregate. Nothing is saved until the first mutation.
    pub fn new(manager: RegistrationManager, store: S) -> Self {
        Self { manager, store }
    }

    /// Restores the aggregate from `store`.
    pub fn open(store: S) -> ServiceResult<Self> {
        let manager = store.load()?;
        Ok(Self { manager, store })
    }

    pub fn manager(&self) -> &RegistrationManager {
        &self.manager
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (RegistrationManager, S) {
        (self.manager, self.store)
    }

    /// Creates a participant with a unique, non-blank name.
    pub fn create_participant(&mut self, name: &str) -> ServiceResult<Participant> {
        const OP: &str = "participant_create";

        if is_blank(name) {
            return Err(reject(OP, "participant_name_blank", PARTICIPANT_NAME_EMPTY));
        }
        if self.manager.has_participant(name) {
            return Err(reject(OP, "participant_name_taken", PARTICIPANT_NAME_TAKEN));
        }

        let participant = Participant::new(name);
        self.manager.add_participant(participant.clone())?;
        self.persist(OP)?;
        Ok(participant)
    }

    /// Creates an event. All four inputs are required.
    pub fn create_event(
        &mut self,
        name: Option<&str>,
        date: Option<NaiveDate>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> ServiceResult<Event> {
        const OP: &str = "event_create";

        let (Some(name), Some(date), Some(start_time), Some(end_time)) =
            (name, date, start_time, end_time)
        else {
            return Err(reject(OP, "event_fields_missing", EVENT_FIELDS_MISSING));
        };
        if is_blank(name) {
            return Err(reject(OP, "event_name_blank", EVENT_NAME_EMPTY));
        }
        if start_time > end_time {
            return Err(reject(OP, "event_window_reversed", EVENT_WINDOW_REVERSED));
        }
        if self.manager.has_event(name) {
            return Err(reject(OP, "event_name_taken", EVENT_NAME_TAKEN));
        }

        let event = Event::new(name, date, start_time, end_time);
        self.manager.add_event(event.clone())?;
        self.persist(OP)?;
        Ok(event)
    }

    /// Registers an existing participant for an existing event, once.
    pub fn register(
        &mut self,
        participant: Option<&Participant>,
        event: Option<&Event>,
    ) -> ServiceResult<Registration> {
        const OP: &str = "registration_create";

        let (Some(participant), Some(event)) = (participant, event) else {
            return Err(reject(
                OP,
                "registration_selection_missing",
                REGISTRATION_SELECTION_MISSING,
            ));
        };
        if !self.manager.has_participant(participant.name())
            || !self.manager.has_event(event.name())
        {
            return Err(reject(
                OP,
                "registration_target_missing",
                REGISTRATION_TARGET_MISSING,
            ));
        }
        if self
            .get_events_for_participant(participant)
            .iter()
            .any(|registered| registered.name == event.name)
        {
            let message = format!(
                "Participant {} has already registered for {}",
                participant.name(),
                event.name()
            );
            return Err(reject(OP, "registration_duplicate", &message));
        }

        let registration = self
            .manager
            .add_registration(Registration::new(participant.clone(), event.clone()))?;
        self.persist(OP)?;
        Ok(registration)
    }

    /// All participants in creation order.
    pub fn find_all_participants(&self) -> &[Participant] {
        self.manager.participants()
    }

    /// All events in creation order.
    pub fn find_all_events(&self) -> &[Event] {
        self.manager.events()
    }

    /// Events the participant is registered for, in registration order.
    pub fn get_events_for_participant(&self, participant: &Participant) -> Vec<&Event> {
        self.manager
            .registrations_for(participant.name())
            .map(Registration::event)
            .collect()
    }

    /// Exact-name participant lookup.
    pub fn find_participant(&self, name: &str) -> ServiceResult<&Participant> {
        self.manager
            .find_participant(name)
            .ok_or_else(|| ServiceError::InvalidInput(PARTICIPANT_NOT_FOUND.to_string()))
    }

    /// Exact-name event lookup.
    pub fn find_event(&self, name: &str) -> ServiceResult<&Event> {
        self.manager
            .find_event(name)
            .ok_or_else(|| ServiceError::InvalidInput(EVENT_NOT_FOUND.to_string()))
    }

    /// Clears the aggregate and removes its stored image.
    pub fn reset(&mut self) -> ServiceResult<()> {
        self.manager.clear();
        self.store.reset()?;
        info!("event=registry_reset module=service status=ok");
        Ok(())
    }

    fn persist(&mut self, op: &'static str) -> ServiceResult<()> {
        if let Err(err) = self.store.save(&self.manager) {
            error!("event={op} module=service status=error error_code=save_failed error={err}");
            return Err(err.into());
        }
        info!(
            "event={op} module=service status=ok participants={} events={} registrations={}",
            self.manager.participants().len(),
            self.manager.events().len(),
            self.manager.registrations().len()
        );
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn reject(op: &'static str, reason: &'static str, message: &str) -> ServiceError {
    warn!("event={op} module=service status=rejected reason={reason}");
    ServiceError::InvalidInput(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::{RegistrationService, ServiceError};
    use crate::model::event::Event;
    use crate::model::manager::RegistrationManager;
    use crate::model::participant::Participant;
    use crate::repo::memory_store::InMemoryRegistrationStore;
    use crate::repo::{RegistrationStore, StoreError, StoreResult};
    use chrono::{NaiveDate, NaiveTime};

    struct BrokenStore;

    impl RegistrationStore for BrokenStore {
        fn save(&mut self, _manager: &RegistrationManager) -> StoreResult<()> {
            Err(StoreError::InvalidData("disk unavailable".to_string()))
        }

        fn load(&self) -> StoreResult<RegistrationManager> {
            Ok(RegistrationManager::new())
        }

        fn reset(&mut self) -> StoreResult<()> {
            Ok(())
        }
    }

    fn service() -> RegistrationService<InMemoryRegistrationStore> {
        RegistrationService::new(RegistrationManager::new(), InMemoryRegistrationStore::new())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 10, 16).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn events_for_participant_outlive_the_lookup_argument() {
        let mut service = service();
        let participant = service.create_participant("Oscar").unwrap();
        let event = service
            .create_event(Some("Soccer Game"), Some(date()), Some(time(9, 0)), Some(time(10, 30)))
            .unwrap();
        service.register(Some(&participant), Some(&event)).unwrap();

        let events = service.get_events_for_participant(&Participant::new("Oscar"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Soccer Game");
        assert!(service
            .get_events_for_participant(&Participant::new("Mia"))
            .is_empty());
    }

    #[test]
    fn accepted_mutations_save_once_each() {
        let mut service = service();
        let participant = service.create_participant("Oscar").unwrap();
        let event = service
            .create_event(Some("Soccer Game"), Some(date()), Some(time(9, 0)), Some(time(10, 30)))
            .unwrap();
        service.register(Some(&participant), Some(&event)).unwrap();

        assert_eq!(service.store().save_count(), 3);
        assert_eq!(service.store().load().unwrap(), *service.manager());
    }

    #[test]
    fn rejected_calls_never_reach_the_store() {
        let mut service = service();
        service.create_participant("   ").unwrap_err();
        service
            .create_event(None, Some(date()), Some(time(9, 0)), Some(time(10, 0)))
            .unwrap_err();
        service
            .create_event(Some("Late"), Some(date()), Some(time(11, 0)), Some(time(10, 0)))
            .unwrap_err();
        service.register(None, None).unwrap_err();
        service
            .register(Some(&Participant::new("ghost")), None)
            .unwrap_err();

        assert_eq!(service.store().save_count(), 0);
        assert!(!service.store().has_image());
        assert!(service.manager().is_empty());
    }

    #[test]
    fn blank_name_wins_over_window_check() {
        let mut service = service();
        let err = service
            .create_event(Some(" "), Some(date()), Some(time(11, 0)), Some(time(10, 0)))
            .unwrap_err();
        assert_eq!(err.message(), Some("Event name cannot be empty!"));
    }

    #[test]
    fn reversed_window_wins_over_duplicate_name() {
        let mut service = service();
        service
            .create_event(Some("Soccer Game"), Some(date()), Some(time(9, 0)), Some(time(10, 0)))
            .unwrap();
        let err = service
            .create_event(Some("Soccer Game"), Some(date()), Some(time(11, 0)), Some(time(10, 0)))
            .unwrap_err();
        assert_eq!(
            err.message(),
            Some("Event end time cannot be before event start time!")
        );
    }

    #[test]
    fn equal_start_and_end_is_accepted() {
        let mut service = service();
        let event = service
            .create_event(Some("Instant"), Some(date()), Some(time(9, 0)), Some(time(9, 0)))
            .unwrap();
        assert_eq!(event.start_time, event.end_time);
    }

    #[test]
    fn uniqueness_is_case_sensitive_and_untrimmed() {
        let mut service = service();
        service.create_participant("Oscar").unwrap();
        service.create_participant("oscar").unwrap();
        service.create_participant(" Oscar").unwrap();
        assert_eq!(service.find_all_participants().len(), 3);
        assert!(service.find_participant("OSCAR").is_err());
    }

    #[test]
    fn save_failure_is_returned_without_rollback() {
        let mut service = RegistrationService::new(RegistrationManager::new(), BrokenStore);
        let err = service.create_participant("Oscar").unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(err.message(), None);
        assert_eq!(service.manager().participants().len(), 1);
    }

    #[test]
    fn reset_clears_memory_and_stored_image() {
        let mut service = service();
        service.create_participant("Oscar").unwrap();
        assert!(service.store().has_image());

        service.reset().unwrap();
        assert!(service.manager().is_empty());
        assert!(!service.store().has_image());
        assert!(service.store().load().unwrap().is_empty());
    }

    #[test]
    fn open_restores_saved_aggregate() {
        let mut service = service();
        service.create_participant("Oscar").unwrap();
        let (_, store) = service.into_parts();

        let reopened = RegistrationService::open(store).unwrap();
        assert_eq!(reopened.find_participant("Oscar").unwrap().name, "Oscar");
    }

    #[test]
    fn registration_uses_stored_event_details() {
        let mut service = service();
        let participant = service.create_participant("Oscar").unwrap();
        service
            .create_event(Some("Soccer Game"), Some(date()), Some(time(9, 0)), Some(time(10, 30)))
            .unwrap();

        let stale = Event::new("Soccer Game", date(), time(8, 0), time(8, 30));
        let registration = service.register(Some(&participant), Some(&stale)).unwrap();
        assert_eq!(registration.event.start_time, time(9, 0));
    }
}
