use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use since_counters::breakdown::last_day_of_month;
use since_counters::{compute_breakdown, Breakdown, Direction};

prop_compose! {
    fn instant()(
        year in 1996i32..2040,
        month in 1u32..=12,
        day in 1u32..=31,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
        millis in 0u32..1000,
    ) -> NaiveDateTime {
        let day = day.min(last_day_of_month(year, month).unwrap());
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_milli_opt(hour, minute, second, millis)
            .unwrap()
    }
}

/// Anchors on the days that need clamping somewhere in the year.
prop_compose! {
    fn month_end_instant()(
        year in 1996i32..2030,
        month in 1u32..=12,
        back in 0u32..4,
        hour in 0u32..24,
    ) -> NaiveDateTime {
        let last = last_day_of_month(year, month).unwrap();
        NaiveDate::from_ymd_opt(year, month, last - back.min(last - 28))
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }
}

fn in_range(b: &Breakdown) -> bool {
    b.months < 12 && b.days <= 31 && b.hours < 24 && b.minutes < 60 && b.seconds < 60
}

proptest! {
    #[test]
    fn same_instant_is_zero(at in instant()) {
        prop_assert!(compute_breakdown(at, at, Direction::Forward).is_zero());
        prop_assert!(compute_breakdown(at, at, Direction::Reverse).is_zero());
    }

    #[test]
    fn future_anchor_forward_is_zero(now in instant(), ahead_ms in 1i64..400_000_000_000) {
        let anchor = now + TimeDelta::milliseconds(ahead_ms);
        prop_assert!(compute_breakdown(anchor, now, Direction::Forward).is_zero());
    }

    #[test]
    fn passed_target_reverse_is_zero(now in instant(), behind_ms in 0i64..400_000_000_000) {
        let target = now - TimeDelta::milliseconds(behind_ms);
        prop_assert!(compute_breakdown(target, now, Direction::Reverse).is_zero());
    }

    #[test]
    fn units_stay_in_range(anchor in instant(), now in instant()) {
        let b = compute_breakdown(anchor, now, Direction::Forward);
        prop_assert!(in_range(&b), "{b:?}");
    }

    #[test]
    fn month_ends_stay_in_range(anchor in month_end_instant(), span_hours in 0i64..200_000) {
        let now = anchor + TimeDelta::hours(span_hours);
        let b = compute_breakdown(anchor, now, Direction::Forward);
        prop_assert!(in_range(&b), "{anchor} -> {now}: {b:?}");
    }

    #[test]
    fn monotonic_in_now(anchor in instant(), first_ms in 0i64..300_000_000_000, step_ms in 1i64..5_000_000_000) {
        let earlier = anchor + TimeDelta::milliseconds(first_ms);
        let later = earlier + TimeDelta::milliseconds(step_ms);
        let a = compute_breakdown(anchor, earlier, Direction::Forward);
        let b = compute_breakdown(anchor, later, Direction::Forward);
        prop_assert!(a <= b, "{a:?} then {b:?}");
    }

    #[test]
    fn monotonic_across_month_ends(anchor in month_end_instant(), start_hours in 0i64..100_000) {
        let mut previous = Breakdown::ZERO;
        let mut now = anchor + TimeDelta::hours(start_hours);
        for _ in 0..96 {
            let next = compute_breakdown(anchor, now, Direction::Forward);
            prop_assert!(previous <= next, "{previous:?} then {next:?} at {now}");
            previous = next;
            now += TimeDelta::minutes(30);
        }
    }

    #[test]
    fn reverse_mirrors_forward(a in instant(), b in instant()) {
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        prop_assert_eq!(
            compute_breakdown(late, early, Direction::Reverse),
            compute_breakdown(early, late, Direction::Forward)
        );
    }

    #[test]
    fn short_spans_are_plain_seconds(anchor in instant(), secs in 0i64..86_400) {
        let now = anchor + TimeDelta::seconds(secs);
        let b = compute_breakdown(anchor, now, Direction::Forward);
        let total = i64::from(b.days) * 86_400
            + i64::from(b.hours) * 3_600
            + i64::from(b.minutes) * 60
            + i64::from(b.seconds);
        prop_assert_eq!(total, secs);
    }

    #[test]
    fn remainder_decomposition_round_trips(secs in 0i64..2_700_000) {
        let b = Breakdown::from_remainder_ms(secs * 1000 + 999);
        let total = i64::from(b.days) * 86_400
            + i64::from(b.hours) * 3_600
            + i64::from(b.minutes) * 60
            + i64::from(b.seconds);
        prop_assert_eq!(total, secs);
    }
}

#[test]
fn every_day_of_a_leap_cycle_from_month_ends() {
    let anchors = [
        "2019-01-31T12:00:00",
        "2019-08-31T00:00:00",
        "2020-02-29T06:30:00",
        "2020-01-30T23:59:59",
        "2019-03-31T00:00:00",
    ];
    for anchor in anchors {
        let anchor = NaiveDateTime::parse_from_str(anchor, "%Y-%m-%dT%H:%M:%S").unwrap();
        let mut previous = Breakdown::ZERO;
        let mut now = anchor;
        for _ in 0..(4 * 366) {
            let b = compute_breakdown(anchor, now, Direction::Forward);
            assert!(in_range(&b), "{anchor} -> {now}: {b:?}");
            assert!(previous <= b, "{anchor} -> {now}: {previous:?} then {b:?}");
            previous = b;
            now += TimeDelta::days(1);
        }
    }
}

#[test]
fn documented_calendar_cases() {
    let at = |value: &str| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").unwrap();

    let b = compute_breakdown(at("2023-01-31T00:00:00"), at("2023-03-31T00:00:00"), Direction::Forward);
    assert_eq!((b.years, b.months, b.days), (0, 2, 0));

    let b = compute_breakdown(at("2020-02-29T00:00:00"), at("2021-02-28T00:00:00"), Direction::Forward);
    assert_eq!((b.years, b.months, b.days), (0, 11, 30));

    let now = at("2024-07-01T10:00:00");
    let b = compute_breakdown(now + TimeDelta::milliseconds(5000), now, Direction::Reverse);
    assert_eq!(b, Breakdown { seconds: 5, ..Breakdown::ZERO });
}
