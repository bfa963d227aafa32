use crate::book::CounterBook;
use crate::display::DisplaySink;
use crate::state::AppState;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// Evaluates every counter at `now` and feeds the sink. Returns how many
/// counters were published.
pub fn tick_once(book: &CounterBook, now: NaiveDateTime, sink: &dyn DisplaySink) -> usize {
    let ids: HashSet<String> = book.counters().iter().map(|counter| counter.id.clone()).collect();
    sink.retain(&ids);

    for counter in book.counters() {
        sink.publish(&counter.id, counter.breakdown_at(now));
    }
    book.len()
}

/// Drives [`tick_once`] on a fixed cadence for as long as the runtime lives.
/// Ticks with no counters do nothing; ticks missed while the host was busy
/// are skipped rather than replayed.
pub fn spawn_ticker(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval(every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            let book = state.book.lock().await;
            if book.is_empty() {
                state.display.retain(&HashSet::new());
                continue;
            }
            let published = tick_once(&book, state.clock.now(), &state.display);
            debug!(published, "tick");
        }
    })
}
