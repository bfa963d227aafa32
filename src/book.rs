//! The counter list and every operation that changes it.
//!
//! A [`CounterBook`] is a plain owned value: the service keeps one behind a
//! mutex in its state and persists it after each applied change. Operations
//! that destroy data take a [`Confirmation`] so the caller decides how the
//! user is asked and the book only sees the answer.

use crate::breakdown::Breakdown;
use crate::errors::CounterError;
use crate::models::{
    format_instant, parse_anchor, CounterBreakdown, CounterDraft, CounterRecord, Direction, ResetPeriod,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed { Self::Confirmed } else { Self::Declined }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Replace,
    Merge,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterBook {
    counters: Vec<CounterRecord>,
}

impl CounterBook {
    pub fn new(counters: Vec<CounterRecord>) -> Self {
        Self { counters }
    }

    pub fn counters(&self) -> &[CounterRecord] {
        &self.counters
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CounterRecord> {
        self.counters.iter().find(|counter| counter.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut CounterRecord, CounterError> {
        self.counters
            .iter_mut()
            .find(|counter| counter.id == id)
            .ok_or_else(|| CounterError::NotFound(id.to_string()))
    }

    pub fn create(&mut self, draft: CounterDraft, now: NaiveDateTime) -> Result<CounterRecord, CounterError> {
        let draft = validate_draft(draft, now)?;
        let record = CounterRecord {
            id: new_id(),
            name: draft.name,
            original_start_date: draft.anchor.clone(),
            anchor: draft.anchor,
            direction: draft.direction,
            created_at: format_instant(now),
            reset_history: Vec::new(),
        };
        info!(id = %record.id, name = %record.name, "counter created");
        self.counters.push(record.clone());
        Ok(record)
    }

    /// Replaces name, anchor and direction. History and ids are untouched.
    pub fn edit(&mut self, id: &str, draft: CounterDraft, now: NaiveDateTime) -> Result<CounterRecord, CounterError> {
        let draft = validate_draft(draft, now)?;
        let record = self.get_mut(id)?;
        record.name = draft.name;
        record.anchor = draft.anchor;
        record.direction = draft.direction;
        info!(id, "counter edited");
        Ok(record.clone())
    }

    /// Closes the running period into the history and restarts the anchor
    /// at `now`.
    ///
    /// For a reverse counter the new target is `now` itself, so the countdown
    /// reads zero from then on until it is edited to a new target. Its history
    /// entry has a zero duration when the old target was still in the future.
    pub fn reset(
        &mut self,
        id: &str,
        now: NaiveDateTime,
        confirmation: Confirmation,
    ) -> Result<Outcome<CounterRecord>, CounterError> {
        let record = self.get_mut(id)?;
        if confirmation == Confirmation::Declined {
            return Ok(Outcome::Cancelled);
        }

        let duration_ms = match record.anchor_instant() {
            Ok(anchor) => (now - anchor).num_milliseconds().max(0),
            Err(_) => 0,
        };
        let reset_at = format_instant(now);
        if record.original_start_date.is_empty() {
            record.original_start_date = record.anchor.clone();
        }
        record.reset_history.push(ResetPeriod {
            start_date: record.anchor.clone(),
            end_date: reset_at.clone(),
            duration_ms,
            reset_at: reset_at.clone(),
        });
        record.anchor = reset_at;

        info!(id, duration_ms, resets = record.reset_history.len(), "counter reset");
        Ok(Outcome::Applied(record.clone()))
    }

    pub fn delete(&mut self, id: &str, confirmation: Confirmation) -> Result<Outcome<CounterRecord>, CounterError> {
        let index = self
            .counters
            .iter()
            .position(|counter| counter.id == id)
            .ok_or_else(|| CounterError::NotFound(id.to_string()))?;
        if confirmation == Confirmation::Declined {
            return Ok(Outcome::Cancelled);
        }

        let removed = self.counters.remove(index);
        info!(id, "counter deleted");
        Ok(Outcome::Applied(removed))
    }

    /// Drops every counter. Applied value is how many were removed.
    pub fn reset_all(&mut self, confirmation: Confirmation) -> Outcome<usize> {
        if confirmation == Confirmation::Declined {
            return Outcome::Cancelled;
        }
        let removed = self.counters.len();
        self.counters.clear();
        info!(removed, "all counters removed");
        Outcome::Applied(removed)
    }

    pub fn export_json(&self) -> Result<String, CounterError> {
        Ok(serde_json::to_string_pretty(&self.counters)?)
    }

    /// Loads records from an exported document. The payload must be a JSON
    /// array; merged records get fresh ids so they never collide with the
    /// ones already in the book. Applied value is how many were imported.
    pub fn import_json(
        &mut self,
        payload: &str,
        mode: ImportMode,
        now: NaiveDateTime,
        confirmation: Confirmation,
    ) -> Result<Outcome<usize>, CounterError> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        if !value.is_array() {
            return Err(CounterError::InvalidImport(
                "expected a JSON array of counters".to_string(),
            ));
        }
        let mut imported: Vec<CounterRecord> = serde_json::from_value(value)?;
        if confirmation == Confirmation::Declined {
            return Ok(Outcome::Cancelled);
        }

        for record in &mut imported {
            record.migrate(now);
            if mode == ImportMode::Merge || record.id.is_empty() {
                record.id = new_id();
            }
        }

        let count = imported.len();
        match mode {
            ImportMode::Replace => self.counters = imported,
            ImportMode::Merge => self.counters.extend(imported),
        }
        info!(count, ?mode, total = self.counters.len(), "counters imported");
        Ok(Outcome::Applied(count))
    }

    pub fn breakdowns(&self, now: NaiveDateTime) -> Vec<CounterBreakdown> {
        self.counters
            .iter()
            .map(|counter| CounterBreakdown {
                id: counter.id.clone(),
                direction: counter.direction,
                breakdown: counter.breakdown_at(now),
            })
            .collect()
    }

    pub fn breakdown(&self, id: &str, now: NaiveDateTime) -> Result<Breakdown, CounterError> {
        self.get(id)
            .map(|counter| counter.breakdown_at(now))
            .ok_or_else(|| CounterError::NotFound(id.to_string()))
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn validate_draft(draft: CounterDraft, now: NaiveDateTime) -> Result<CounterDraft, CounterError> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(CounterError::Validation("name must not be empty".to_string()));
    }

    let anchor = draft.anchor.trim().to_string();
    if anchor.is_empty() {
        return Err(CounterError::Validation("start date is required".to_string()));
    }
    let instant = parse_anchor(&anchor)
        .map_err(|_| CounterError::Validation(format!("start date '{anchor}' is not a valid date and time")))?;

    if draft.direction == Direction::Reverse && instant <= now {
        return Err(CounterError::Validation(
            "countdown target must be in the future".to_string(),
        ));
    }

    Ok(CounterDraft {
        name,
        anchor,
        direction: draft.direction,
    })
}
