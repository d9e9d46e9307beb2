//! SQLite implementation of the registration store.
//!
//! # Responsibility
//! - Persist the whole aggregate into `participants`, `events` and
//!   `registrations` tables.
//! - Rebuild a validated aggregate from those tables.
//!
//! # Invariants
//! - Every save rewrites all three tables inside one IMMEDIATE transaction.
//! - `position` columns mirror aggregate insertion order.
//! - Read paths reject undecodable rows instead of skipping them.

use super::{RegistrationStore, StoreError, StoreResult};
use crate::model::event::Event;
use crate::model::manager::{ManagerSnapshot, RegistrationManager};
use crate::model::participant::Participant;
use crate::model::registration::Registration;
use chrono::{NaiveDate, NaiveTime};
use log::{error, info};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::time::Instant;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Store bound to a migrated connection (see `db::open_db`).
pub struct SqliteRegistrationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRegistrationStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn write_snapshot(&self, manager: &RegistrationManager) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        clear_tables(&tx)?;

        {
            let mut stmt =
                tx.prepare("INSERT INTO participants (name, position) VALUES (?1, ?2);")?;
            for (index, participant) in manager.participants().iter().enumerate() {
                stmt.execute(params![participant.name.as_str(), index as i64])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO events (name, position, event_date, start_time, end_time)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for (index, event) in manager.events().iter().enumerate() {
                stmt.execute(params![
                    event.name.as_str(),
                    index as i64,
                    event.date.format(DATE_FORMAT).to_string(),
                    event.start_time.format(TIME_FORMAT).to_string(),
                    event.end_time.format(TIME_FORMAT).to_string(),
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO registrations (position, participant_name, event_name)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (index, registration) in manager.registrations().iter().enumerate() {
                let (participant_name, event_name) = registration.key();
                stmt.execute(params![index as i64, participant_name, event_name])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn read_snapshot(&self) -> StoreResult<ManagerSnapshot> {
        let mut participants = Vec::new();
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM participants ORDER BY position ASC;")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            participants.push(Participant::new(row.get::<_, String>("name")?));
        }

        let mut events = Vec::new();
        let mut stmt = self.conn.prepare(
            "SELECT name, event_date, start_time, end_time
             FROM events
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }

        let mut registrations = Vec::new();
        let mut stmt = self.conn.prepare(
            "SELECT
                r.participant_name AS participant_name,
                e.name AS name,
                e.event_date AS event_date,
                e.start_time AS start_time,
                e.end_time AS end_time
             FROM registrations r
             INNER JOIN events e ON e.name = r.event_name
             ORDER BY r.position ASC;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let participant = Participant::new(row.get::<_, String>("participant_name")?);
            registrations.push(Registration::new(participant, parse_event_row(row)?));
        }

        Ok(ManagerSnapshot {
            participants,
            events,
            registrations,
        })
    }
}

impl RegistrationStore for SqliteRegistrationStore<'_> {
    fn save(&mut self, manager: &RegistrationManager) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_snapshot(manager) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok participants={} events={} registrations={} duration_ms={}",
                    manager.participants().len(),
                    manager.events().len(),
                    manager.registrations().len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn load(&self) -> StoreResult<RegistrationManager> {
        let started_at = Instant::now();
        let result = self
            .read_snapshot()
            .and_then(|snapshot| RegistrationManager::try_from(snapshot).map_err(StoreError::from));

        match &result {
            Ok(manager) => info!(
                "event=store_load module=store status=ok participants={} events={} registrations={} duration_ms={}",
                manager.participants().len(),
                manager.events().len(),
                manager.registrations().len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_load module=store status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn reset(&mut self) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        clear_tables(&tx)?;
        tx.commit()?;
        info!("event=store_reset module=store status=ok");
        Ok(())
    }
}

fn clear_tables(tx: &Transaction<'_>) -> StoreResult<()> {
    tx.execute_batch(
        "DELETE FROM registrations;
         DELETE FROM events;
         DELETE FROM participants;",
    )?;
    Ok(())
}

fn parse_event_row(row: &Row<'_>) -> StoreResult<Event> {
    let name: String = row.get("name")?;
    let date_text: String = row.get("event_date")?;
    let start_text: String = row.get("start_time")?;
    let end_text: String = row.get("end_time")?;

    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        StoreError::InvalidData(format!("invalid date `{date_text}` in events.event_date"))
    })?;
    let start_time = parse_time(&start_text, "start_time")?;
    let end_time = parse_time(&end_text, "end_time")?;

    Ok(Event::new(name, date, start_time, end_time))
}

fn parse_time(value: &str, column: &str) -> StoreResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| StoreError::InvalidData(format!("invalid time `{value}` in events.{column}")))
}
