//! Event entity.
//!
//! # Invariants
//! - `start_time <= end_time`; equal times are a valid zero-length event.

use super::ModelError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A dated, time-boxed event. Identified by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Event {
    /// Creates an event without checking the time window.
    ///
    /// The aggregate calls [`Event::validate`] when the event is added.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            start_time,
            end_time,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks the structural time-window invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.start_time > self.end_time {
            return Err(ModelError::InvalidEventWindow {
                event: self.name.clone(),
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }
}
