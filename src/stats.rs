use crate::book::CounterBook;
use crate::models::{format_instant, CounterRecord, Direction};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub start_date: String,
    pub end_date: String,
    pub duration_ms: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterStats {
    pub id: String,
    pub name: String,
    pub direction: Direction,
    pub reset_count: usize,
    pub current_duration_ms: i64,
    pub max_duration_ms: i64,
    pub max_duration_period: PeriodSummary,
    pub avg_duration_ms: i64,
    pub current_label: String,
    pub max_label: String,
    pub avg_label: String,
    pub created_at: String,
    pub original_start_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_counters: usize,
    pub total_resets: usize,
    pub counters: Vec<CounterStats>,
}

/// Per-counter period statistics, longest-running counters first.
pub fn build_stats_at(now: NaiveDateTime, book: &CounterBook) -> StatsResponse {
    let mut counters: Vec<CounterStats> = book
        .counters()
        .iter()
        .map(|counter| counter_stats(counter, now))
        .collect();
    counters.sort_by(|a, b| b.max_duration_ms.cmp(&a.max_duration_ms));

    StatsResponse {
        total_counters: counters.len(),
        total_resets: counters.iter().map(|counter| counter.reset_count).sum(),
        counters,
    }
}

fn counter_stats(counter: &CounterRecord, now: NaiveDateTime) -> CounterStats {
    let current = counter.current_period_ms(now);
    let mut longest = PeriodSummary {
        start_date: counter.anchor.clone(),
        end_date: format_instant(now),
        duration_ms: current,
    };
    let mut total = current;

    for period in &counter.reset_history {
        total = total.saturating_add(period.duration_ms);
        if period.duration_ms > longest.duration_ms {
            longest = PeriodSummary {
                start_date: period.start_date.clone(),
                end_date: period.end_date.clone(),
                duration_ms: period.duration_ms,
            };
        }
    }
    let average = total / (counter.reset_history.len() as i64 + 1);

    let original_start_date = if counter.original_start_date.is_empty() {
        counter.anchor.clone()
    } else {
        counter.original_start_date.clone()
    };
    let created_at = if counter.created_at.is_empty() {
        original_start_date.clone()
    } else {
        counter.created_at.clone()
    };

    CounterStats {
        id: counter.id.clone(),
        name: counter.name.clone(),
        direction: counter.direction,
        reset_count: counter.reset_history.len(),
        current_duration_ms: current,
        max_duration_ms: longest.duration_ms,
        current_label: format_duration(current),
        max_label: format_duration(longest.duration_ms),
        max_duration_period: longest,
        avg_duration_ms: average,
        avg_label: format_duration(average),
        created_at,
        original_start_date,
    }
}

/// Short human rendering showing the two largest non-zero units. Months
/// and years here are 30 and 360 days; use the breakdown engine for
/// calendar-exact spans.
pub fn format_duration(ms: i64) -> String {
    if ms < 0 {
        return "0s".to_string();
    }

    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = months / 12;

    if years > 0 {
        format!("{years}y {}mo", months % 12)
    } else if months > 0 {
        format!("{months}mo {}d", days % 30)
    } else if days > 0 {
        format!("{days}d {}h {}m", hours % 24, minutes % 60)
    } else if hours > 0 {
        format!("{hours}h {}m {}s", minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{minutes}m {}s", seconds % 60)
    } else {
        format!("{seconds}s")
    }
}
