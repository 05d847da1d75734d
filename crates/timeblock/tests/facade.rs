//! Facade surface: prelude usage and error conversions.

use std::error::Error as _;

use timeblock::prelude::*;
use timeblock::{BlockOutcome, EdgeOutcome, PeriodUpdate, StoreError};

fn load_sample() -> Result<Timeline<MockBackend>> {
    let config = TimelineConfig::from_toml_str("[mock]\nsample = true")?;
    let backend = config.mock_backend()?;
    let mut timeline = Timeline::new(config, backend)?;
    timeline.set_day_start(0)?;
    timeline.resize(1200.0);
    Ok(timeline)
}

#[test]
fn prelude_drives_a_drag() {
    let mut timeline = load_sample().unwrap();
    let target = Target::new(1_u64, Handle::From);
    let now = Instant::now();
    timeline.dispatch(&target, &PointerEvent::start(0.0), now);
    // -50px = -1h
    let out = timeline.dispatch(&target, &PointerEvent::end(-50.0), now);
    assert_eq!(
        out,
        BlockOutcome::Edge(EdgeOutcome::Committed {
            value: 9.0 * 3_600_000.0
        })
    );
    assert_eq!(timeline.rows()[0].hours_label, "10 hours 00 minutes");
}

#[test]
fn errors_convert_and_chain() {
    let err: Error = TimelineConfig::from_toml_str("step_ms = 0").unwrap_err().into();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.source().is_some());

    let store = TimelineStore::default();
    let err: Error = store
        .update_period(PeriodUpdate::new(1_u64).from(0))
        .unwrap_err()
        .into();
    assert!(matches!(err, Error::Store(StoreError::UnknownPeriod { .. })));
    assert_eq!(err.to_string(), "unknown period 1");
}
