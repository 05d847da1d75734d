#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use timeblock_core::{Instant, PointerEvent, PointerEventKind, Scale};
use timeblock_model::{DAY_MS, Employee, HOUR_MS, Id, Period, PeriodType, TimelineStore};
use timeblock_widgets::{BlockSettings, Handle, TimeBlock, TimelineConfig};

#[derive(Debug, Arbitrary)]
enum Grip {
    From,
    To,
    Move,
}

#[derive(Debug, Arbitrary)]
struct Step {
    grip: Grip,
    kind: u8,
    x: i16,
    dt_ms: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    width: u16,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    let store = TimelineStore::new(vec![Employee::new(1_u64, "A").with_period(
        Period::new(2_u64, PeriodType::Booked, 10 * HOUR_MS, 19 * HOUR_MS)
            .with_break(14 * HOUR_MS, 15 * HOUR_MS),
    )]);
    let Ok(settings) = BlockSettings::from_config(&TimelineConfig::default()) else {
        return;
    };
    let window = timeblock_model::DayWindow::new(0, DAY_MS);
    let mut block = TimeBlock::new(store.clone(), window, Id::Num(1), Id::Num(2), &settings);
    let scale = Scale::from_width(f64::from(input.width), DAY_MS as f64);
    let mut now = Instant::now();

    for step in input.steps.iter().take(256) {
        now += Duration::from_millis(u64::from(step.dt_ms));
        let (kind, x) = match step.kind % 4 {
            0 => (PointerEventKind::DragStart, f64::from(step.x)),
            1 => (PointerEventKind::Drag, f64::from(step.x)),
            2 => (PointerEventKind::DragEnd, f64::from(step.x)),
            _ => (PointerEventKind::DragEnd, f64::NAN),
        };
        let handle = match step.grip {
            Grip::From => Handle::From,
            Grip::To => Handle::To,
            Grip::Move => Handle::Move,
        };
        block.handle(handle, &PointerEvent::new(kind, x), now, scale);

        // Post-conditions that must always hold:
        let period = store.period(&Id::Num(2)).expect("period vanished");
        assert!(period.validate().is_ok(), "invalid period committed: {period:?}");
        assert!(period.from >= 0 && period.to <= DAY_MS, "period left the day: {period:?}");
        if !block.is_dragging() {
            let shown = block.displayed().expect("period vanished");
            assert_eq!(shown.from, period.from as f64);
            assert_eq!(shown.to, period.to as f64);
        }
    }
});
