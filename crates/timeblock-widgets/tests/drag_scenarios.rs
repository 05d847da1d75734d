//! End-to-end drag scenarios through the store.

use std::cell::RefCell;
use std::fmt;
use std::io::Write as _;
use std::rc::Rc;
use std::time::Duration;

use timeblock_core::{Instant, Normalizer, PointerEvent, Scale, TrackerConfig};
use timeblock_model::{
    Employee, HOUR_MS, Id, Period, PeriodType, PeriodUpdate, StoreChange, TimelineStore,
};
use timeblock_widgets::{
    BlockOutcome, EdgeOutcome, Handle, MoveDrag, MoveOutcome, RosterSource, ShrinkExtend, Span,
    Target, Timeline, TimelineConfig, TimelineError,
};

const HOUR: f64 = HOUR_MS as f64;
const DAY: f64 = 24.0 * HOUR;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Serves a fixed roster regardless of the day.
struct StaticRoster(Vec<Employee>);

impl RosterSource for StaticRoster {
    type Error = serde_json::Error;

    fn roster_json(&mut self, _day_start: i64) -> Result<String, Self::Error> {
        serde_json::to_string(&self.0)
    }
}

#[derive(Debug)]
struct Offline;

impl fmt::Display for Offline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("backend offline")
    }
}

impl std::error::Error for Offline {}

struct OfflineRoster;

impl RosterSource for OfflineRoster {
    type Error = Offline;

    fn roster_json(&mut self, _day_start: i64) -> Result<String, Self::Error> {
        Err(Offline)
    }
}

fn recorder(store: &TimelineStore) -> (Rc<RefCell<Vec<StoreChange>>>, timeblock_model::Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = store.subscribe(move |change| sink.borrow_mut().push(change.clone()));
    (seen, sub)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn revert_on_invalid_drop() {
    // Edge at 10h, dragged 20h right against a validator capped at 24h.
    let mut edge = ShrinkExtend::new(
        Normalizer::new(0.0, 2.0 * DAY, Some(900_000.0)).unwrap(),
        TrackerConfig::default(),
    )
    .with_validator(|v| v <= DAY);
    let scale = Scale::new(1.0 / HOUR);
    let mut committed = 10.0 * HOUR;
    let now = Instant::now();
    let mut sink = |v: f64| committed = v;

    edge.handle(&PointerEvent::start(0.0), now, 10.0 * HOUR, scale, &mut sink);
    let out = edge.handle(&PointerEvent::end(20.0), now, 10.0 * HOUR, scale, &mut sink);

    assert_eq!(out, EdgeOutcome::Reverted { candidate: 30.0 * HOUR });
    assert_eq!(committed, 10.0 * HOUR);
    assert_eq!(edge.value(committed), 10.0 * HOUR);
}

#[test]
fn composite_move_is_one_notification() {
    let store = TimelineStore::new(vec![Employee::new(1_u64, "A").with_period(Period::new(
        1_u64,
        PeriodType::Booked,
        5,
        10,
    ))]);
    let (seen, _sub) = recorder(&store);
    let mut drag = MoveDrag::new(Normalizer::bounded(0.0, 100.0).unwrap(), TrackerConfig::default());
    let now = Instant::now();
    let span = Span::new(5.0, 10.0);
    let mut sink = |diff: f64| {
        let d = diff as i64;
        store
            .update_period(PeriodUpdate::new(1_u64).from(5 + d).to(10 + d))
            .unwrap();
    };

    drag.handle(&PointerEvent::start(0.0), now, span, Scale::new(1.0), &mut sink);
    let out = drag.handle(&PointerEvent::end(3.0), now, span, Scale::new(1.0), &mut sink);

    assert_eq!(out, MoveOutcome::Committed { diff: 3.0 });
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    let StoreChange::PeriodUpdated { period, .. } = &seen[0] else {
        panic!("expected a period update");
    };
    assert_eq!((period.from, period.to), (8, 13));
}

#[test]
fn step_rounding_of_move_delta() {
    let drag = MoveDrag::new(
        Normalizer::new(0.0, DAY, Some(900_000.0)).unwrap(),
        TrackerConfig::default(),
    );
    let span = Span::new(9.0 * HOUR, 10.0 * HOUR);
    assert_eq!(drag.normalize_diff(1_000_000.0, span), 900_000.0);
}

#[test]
fn wide_drag_clamps_to_day_end() {
    let store = TimelineStore::new(vec![Employee::new(1_u64, "A").with_period(Period::new(
        7_u64,
        PeriodType::Booked,
        8 * HOUR_MS,
        15 * HOUR_MS,
    ))]);
    let mut timeline = Timeline::with_store(
        TimelineConfig::default(),
        StaticRoster(store.employees()),
        store.clone(),
    )
    .unwrap();
    timeline.set_day_start(0).unwrap();
    timeline.resize(1200.0);

    let target = Target::new(7_u64, Handle::To);
    let t0 = Instant::now();
    timeline.dispatch(&target, &PointerEvent::start(100.0), t0);
    let out = timeline.dispatch(&target, &PointerEvent::end(600.0), t0 + Duration::from_millis(80));

    assert_eq!(out, BlockOutcome::Edge(EdgeOutcome::Committed { value: DAY }));
    assert_eq!(store.period(&Id::Num(7)).unwrap().to, 24 * HOUR_MS);
}

#[test]
fn throttled_moves_are_dropped_until_interval() {
    let mut edge = ShrinkExtend::new(Normalizer::identity(), TrackerConfig {
        throttle_interval: Duration::from_millis(50),
        ..TrackerConfig::default()
    });
    let scale = Scale::new(1.0);
    let t0 = Instant::now();
    let mut sink = |_: f64| {};

    edge.handle(&PointerEvent::start(0.0), t0, 0.0, scale, &mut sink);
    let first = edge.handle(&PointerEvent::drag(10.0), t0 + Duration::from_millis(1), 0.0, scale, &mut sink);
    let second = edge.handle(&PointerEvent::drag(20.0), t0 + Duration::from_millis(30), 0.0, scale, &mut sink);
    let third = edge.handle(&PointerEvent::drag(30.0), t0 + Duration::from_millis(51), 0.0, scale, &mut sink);

    assert_eq!(first, EdgeOutcome::Previewed { value: 10.0 });
    assert!(matches!(second, EdgeOutcome::Ignored { .. }));
    assert_eq!(third, EdgeOutcome::Previewed { value: 30.0 });
}

#[test]
fn source_failure_is_reported() {
    let mut timeline = Timeline::new(TimelineConfig::default(), OfflineRoster).unwrap();
    let err = timeline.set_day_start(0).unwrap_err();
    assert!(matches!(err, TimelineError::Source(_)));
    assert!(err.to_string().contains("backend offline"));
    assert!(timeline.store().is_empty());
}

#[test]
fn config_file_drives_timeline() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "step_ms = 3600000\nthrottle_interval_ms = 0").unwrap();
    let config = TimelineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.step_ms, 3_600_000);

    let roster = vec![Employee::new(1_u64, "A").with_period(Period::new(
        2_u64,
        PeriodType::Available,
        HOUR_MS,
        3 * HOUR_MS,
    ))];
    let mut timeline = Timeline::new(config, StaticRoster(roster)).unwrap();
    timeline.set_day_start(0).unwrap();
    timeline.resize(2400.0); // 100px per hour

    let target = Target::new(2_u64, Handle::Move);
    let t0 = Instant::now();
    timeline.dispatch(&target, &PointerEvent::start(0.0), t0);
    // 140px = 1.4h, rounded to the 1h grid.
    timeline.dispatch(&target, &PointerEvent::end(140.0), t0);
    let period = timeline.store().period(&Id::Num(2)).unwrap();
    assert_eq!((period.from, period.to), (2 * HOUR_MS, 4 * HOUR_MS));
}

#[test]
fn json_config_file_is_detected() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"min_period_ms": 1800000}}"#).unwrap();
    let config = TimelineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.min_period_ms, 1_800_000);
}
