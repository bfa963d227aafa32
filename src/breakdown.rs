use crate::models::{parse_anchor, Direction};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::warn;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Upper bound on month borrows. One step is enough in practice; a year of
/// steps plus slack keeps a bad input from spinning.
const MAX_BORROWS: u32 = 14;

/// Six-unit calendar breakdown of a span. Field order makes the derived
/// ordering compare spans from the largest unit down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Breakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Breakdown {
    pub const ZERO: Breakdown = Breakdown {
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Splits a sub-month remainder into days, hours, minutes and seconds.
    /// Negative input counts as zero.
    pub fn from_remainder_ms(ms: i64) -> Self {
        Self::from_remainder_secs(ms.max(0) / 1000)
    }

    fn from_remainder_secs(total: i64) -> Self {
        let total = total.max(0);
        let days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;
        let hours = rest / SECONDS_PER_HOUR;
        let rest = rest % SECONDS_PER_HOUR;
        let minutes = rest / SECONDS_PER_MINUTE;
        let seconds = rest % SECONDS_PER_MINUTE;

        Self {
            years: 0,
            months: 0,
            days: u32::try_from(days).unwrap_or(u32::MAX),
            hours: hours as u32,
            minutes: minutes as u32,
            seconds: seconds as u32,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Values in display order: years, months, days, hours, minutes, seconds.
    pub fn units(&self) -> [u32; 6] {
        [
            self.years,
            self.months,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        ]
    }
}

/// Calendar-correct span between `anchor` and `now`.
///
/// Forward counters measure from the anchor up to now; reverse counters
/// measure from now up to the anchor. Spans that would be negative come back
/// as [`Breakdown::ZERO`]. Years and months follow the calendar (Jan 15 to
/// Feb 15 is one month whatever the month length); the rest of the span is a
/// fixed-radix split of whole seconds.
pub fn compute_breakdown(anchor: NaiveDateTime, now: NaiveDateTime, direction: Direction) -> Breakdown {
    let (start, end) = match direction {
        Direction::Forward => (anchor, now),
        Direction::Reverse => (now, anchor),
    };
    calendar_span(start, end).unwrap_or(Breakdown::ZERO)
}

/// [`compute_breakdown`] for a stored anchor string. An anchor that does not
/// parse breaks down to zero.
pub fn compute_breakdown_str(anchor: &str, now: NaiveDateTime, direction: Direction) -> Breakdown {
    match parse_anchor(anchor) {
        Ok(anchor) => compute_breakdown(anchor, now, direction),
        Err(err) => {
            warn!("{err}");
            Breakdown::ZERO
        }
    }
}

fn calendar_span(start: NaiveDateTime, end: NaiveDateTime) -> Option<Breakdown> {
    if end <= start {
        return Some(Breakdown::ZERO);
    }

    let mut years = end.year() - start.year();
    let mut months = end.month0() as i32 - start.month0() as i32;
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let mut borrows = 0;
    let anchor = loop {
        let (candidate, clamped) = month_anniversary(start, years, months)?;
        let reached = if clamped { candidate < end } else { candidate <= end };
        if reached {
            break candidate;
        }

        borrows += 1;
        if borrows > MAX_BORROWS {
            return None;
        }
        months -= 1;
        if months < 0 {
            years -= 1;
            months = 11;
        }
    };

    let mut breakdown = remainder_span(anchor, end);
    breakdown.years = years as u32;
    breakdown.months = months as u32;
    Some(breakdown)
}

/// The point `years` and `months` after `start`, with the day clamped to the
/// target month's length. The flag is set when the day had to move.
fn month_anniversary(start: NaiveDateTime, years: i32, months: i32) -> Option<(NaiveDateTime, bool)> {
    let total = start.month0() as i32 + months;
    let year = start.year() + years + total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;

    let last = last_day_of_month(year, month)?;
    let day = start.day().min(last);
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some((date.and_time(start.time()), day != start.day()))
}

fn remainder_span(from: NaiveDateTime, to: NaiveDateTime) -> Breakdown {
    let diff: TimeDelta = to - from;
    Breakdown::from_remainder_secs(diff.num_seconds())
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_of_next.pred_opt().map(|date| date.day())
}
