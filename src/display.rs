//! Display-side state for live counters.
//!
//! The ticker hands every sink a full [`Breakdown`] per counter per tick;
//! working out which digits changed is the sink's job. [`DisplayBoard`]
//! keeps one small state machine per unit so a front end can animate only
//! the units that moved.

use crate::breakdown::Breakdown;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const UNIT_LABELS: [&str; 6] = ["years", "months", "days", "hours", "minutes", "seconds"];

/// Receives computed breakdowns from the ticker.
pub trait DisplaySink: Send + Sync {
    fn publish(&self, id: &str, breakdown: Breakdown);

    /// Forget every counter not in `ids`.
    fn retain(&self, ids: &HashSet<String>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum UnitDisplay {
    Stable { value: u32 },
    Transitioning { from: u32, to: u32 },
}

impl UnitDisplay {
    pub fn value(&self) -> u32 {
        match *self {
            Self::Stable { value } => value,
            Self::Transitioning { to, .. } => to,
        }
    }

    /// A pending transition finishes before the next value is considered.
    pub fn advance(self, next: u32) -> Self {
        let current = self.value();
        if current == next {
            Self::Stable { value: next }
        } else {
            Self::Transitioning { from: current, to: next }
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Transitioning { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterDisplay {
    pub units: [UnitDisplay; 6],
}

impl CounterDisplay {
    fn new(breakdown: Breakdown) -> Self {
        Self {
            units: breakdown.units().map(|value| UnitDisplay::Stable { value }),
        }
    }

    fn update(&mut self, breakdown: Breakdown) {
        for (unit, next) in self.units.iter_mut().zip(breakdown.units()) {
            *unit = unit.advance(next);
        }
    }

    /// Labels of units that changed on the last update.
    pub fn changed_units(&self) -> Vec<&'static str> {
        self.units
            .iter()
            .zip(UNIT_LABELS)
            .filter(|(unit, _)| unit.is_transitioning())
            .map(|(_, label)| label)
            .collect()
    }

    pub fn breakdown(&self) -> Breakdown {
        let [years, months, days, hours, minutes, seconds] = self.units.map(|unit| unit.value());
        Breakdown {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisplayBoard {
    counters: Arc<Mutex<HashMap<String, CounterDisplay>>>,
}

impl DisplayBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<CounterDisplay> {
        self.lock().get(id).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, CounterDisplay> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CounterDisplay>> {
        self.counters.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DisplaySink for DisplayBoard {
    fn publish(&self, id: &str, breakdown: Breakdown) {
        let mut counters = self.lock();
        match counters.get_mut(id) {
            Some(display) => display.update(breakdown),
            None => {
                counters.insert(id.to_string(), CounterDisplay::new(breakdown));
            }
        }
    }

    fn retain(&self, ids: &HashSet<String>) {
        self.lock().retain(|id, _| ids.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(seconds: u32) -> Breakdown {
        Breakdown {
            seconds,
            ..Breakdown::ZERO
        }
    }

    #[test]
    fn unit_state_machine() {
        let unit = UnitDisplay::Stable { value: 4 };
        assert_eq!(unit.advance(4), UnitDisplay::Stable { value: 4 });

        let moving = unit.advance(5);
        assert_eq!(moving, UnitDisplay::Transitioning { from: 4, to: 5 });
        assert_eq!(moving.value(), 5);

        assert_eq!(moving.advance(5), UnitDisplay::Stable { value: 5 });
        assert_eq!(moving.advance(6), UnitDisplay::Transitioning { from: 5, to: 6 });
    }

    #[test]
    fn first_publish_is_stable() {
        let board = DisplayBoard::new();
        board.publish("a", secs(7));
        let display = board.get("a").unwrap();
        assert!(display.changed_units().is_empty());
        assert_eq!(display.breakdown(), secs(7));
    }

    #[test]
    fn only_changed_units_transition() {
        let board = DisplayBoard::new();
        board.publish(
            "a",
            Breakdown {
                minutes: 1,
                seconds: 59,
                ..Breakdown::ZERO
            },
        );
        board.publish(
            "a",
            Breakdown {
                minutes: 2,
                seconds: 0,
                ..Breakdown::ZERO
            },
        );

        let display = board.get("a").unwrap();
        assert_eq!(display.changed_units(), vec!["minutes", "seconds"]);

        board.publish(
            "a",
            Breakdown {
                minutes: 2,
                seconds: 0,
                ..Breakdown::ZERO
            },
        );
        assert!(board.get("a").unwrap().changed_units().is_empty());
    }

    #[test]
    fn retain_drops_removed_counters() {
        let board = DisplayBoard::new();
        board.publish("a", secs(1));
        board.publish("b", secs(1));

        let keep: HashSet<String> = ["b".to_string()].into_iter().collect();
        board.retain(&keep);
        assert!(board.get("a").is_none());
        assert!(board.get("b").is_some());
        assert_eq!(board.snapshot().len(), 1);
    }
}
