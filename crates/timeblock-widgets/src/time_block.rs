#![forbid(unsafe_code)]

//! One period on the timeline: three drag handles plus rendering state.
//!
//! A [`TimeBlock`] owns a [`ShrinkExtend`] for each edge and a [`MoveDrag`]
//! for the body. It never stores the period itself: the committed record is
//! read from the [`TimelineStore`] on every event and every render, and drops
//! are written back through store-backed sinks.
//!
//! # Invariants
//!
//! 1. Displayed edges are `preview + shift`; with no drag active they equal
//!    the committed edges exactly.
//! 2. Only one handle of a block drags at a time. A start on another handle
//!    while one is active is ignored.
//! 3. Edge drops keep `from <= to - min_period` and keep any break inside
//!    the period; moves carry the break along.
//! 4. Non-editable periods ignore all pointer input and expose no handles.

use timeblock_core::{Instant, Normalizer, PointerEvent, PointerEventKind, Scale, TrackerConfig};
use timeblock_model::{DayWindow, Id, Period, PeriodType, TimelineStore, format_clock};
use tracing::debug;

use crate::commit::{Edge, StoreEdgeSink, StoreShiftSink};
use crate::config::{ConfigError, TimelineConfig};
use crate::move_drag::{MoveDrag, MoveOutcome, Span};
use crate::shrink_extend::{EdgeOutcome, IgnoreReason, ShrinkExtend};

/// Fill colour of a break.
pub const BREAK_COLOR: &str = "rgba(199,199,199,0.64)";

/// Fill colour for a period type.
#[must_use]
pub const fn period_color(kind: PeriodType) -> &'static str {
    match kind {
        PeriodType::Booked => "#82C972",
        PeriodType::Available => "#9370db",
        PeriodType::Unavailable => "#e0e0e0",
        PeriodType::Unpublished | PeriodType::BookedOnOtherSchedule => "#000",
    }
}

/// Drag handle of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Left edge.
    From,
    /// Right edge.
    To,
    /// Block body.
    Move,
}

/// Per-block drag settings shared by every block of a timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSettings {
    pub normalizer: Normalizer,
    pub tracker: TrackerConfig,
    pub min_period_ms: f64,
}

impl BlockSettings {
    pub fn from_config(config: &TimelineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            normalizer: config.normalizer()?,
            tracker: config.tracker_config(),
            min_period_ms: config.min_period_ms as f64,
        })
    }
}

/// Horizontal placement in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockGeometry {
    pub left_px: f64,
    pub width_px: f64,
}

impl BlockGeometry {
    /// Geometry of `[from, to)` under `scale`, rounded to whole pixels.
    #[must_use]
    pub fn of(from: f64, to: f64, scale: Scale) -> Self {
        Self {
            left_px: scale.to_pixels(from).round(),
            width_px: scale.to_pixels(to - from).round(),
        }
    }
}

/// Everything a presentation layer needs to draw one block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRender {
    pub period_id: Id,
    pub kind: PeriodType,
    pub color: &'static str,
    /// Displayed start, relative to the day start.
    pub from: f64,
    /// Displayed end, relative to the day start.
    pub to: f64,
    pub geometry: BlockGeometry,
    /// Relative to the block's left edge. Hidden while dragging.
    pub break_geometry: Option<BlockGeometry>,
    /// `H:MM` label on the left handle while it is being dragged.
    pub from_hint: Option<String>,
    /// `H:MM` label on the right handle while it is being dragged.
    pub to_hint: Option<String>,
    /// Whether handles are shown at all.
    pub editable: bool,
    pub dragging: bool,
}

impl BlockRender {
    /// Rendering of a period with no drag in progress.
    #[must_use]
    pub fn idle(period: &Period, window: DayWindow, scale: Scale) -> Self {
        let span = Span::new(window.to_offset(period.from), window.to_offset(period.to));
        build_render(period, window, scale, span, DragFlags::default())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DragFlags {
    from: bool,
    to: bool,
    moving: bool,
}

impl DragFlags {
    const fn any(self) -> bool {
        self.from || self.to || self.moving
    }
}

fn build_render(
    period: &Period,
    window: DayWindow,
    scale: Scale,
    shown: Span,
    flags: DragFlags,
) -> BlockRender {
    let dragging = flags.any();
    let break_geometry = period.break_period.filter(|_| !dragging).map(|brk| {
        let start = window.to_offset(brk.from) - shown.from;
        let end = window.to_offset(brk.to) - shown.from;
        BlockGeometry::of(start, end, scale)
    });
    BlockRender {
        period_id: period.id.clone(),
        kind: period.kind,
        color: period_color(period.kind),
        from: shown.from,
        to: shown.to,
        geometry: BlockGeometry::of(shown.from, shown.to, scale),
        break_geometry,
        from_hint: (flags.from || flags.moving).then(|| format_clock(shown.from)),
        to_hint: (flags.to || flags.moving).then(|| format_clock(shown.to)),
        editable: period.editable,
        dragging,
    }
}

/// Result of routing one event to a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockOutcome {
    Edge(EdgeOutcome),
    Move(MoveOutcome),
    Ignored(IgnoreReason),
}

// ---------------------------------------------------------------------------
// TimeBlock
// ---------------------------------------------------------------------------

/// Drag state for one period.
#[derive(Debug)]
pub struct TimeBlock {
    store: TimelineStore,
    window: DayWindow,
    employee_id: Id,
    period_id: Id,
    from_edge: ShrinkExtend,
    to_edge: ShrinkExtend,
    mover: MoveDrag,
}

impl TimeBlock {
    /// Block for `period_id`, owned by `employee_id`, on the day `window`.
    #[must_use]
    pub fn new(
        store: TimelineStore,
        window: DayWindow,
        employee_id: Id,
        period_id: Id,
        settings: &BlockSettings,
    ) -> Self {
        let min_period = settings.min_period_ms;

        let from_edge = {
            let store = store.clone();
            let id = period_id.clone();
            ShrinkExtend::new(settings.normalizer, settings.tracker).with_validator(move |c| {
                store.period(&id).is_some_and(|p| {
                    c <= window.to_offset(p.to) - min_period
                        && p.break_period
                            .is_none_or(|brk| c <= window.to_offset(brk.from))
                })
            })
        };
        let to_edge = {
            let store = store.clone();
            let id = period_id.clone();
            ShrinkExtend::new(settings.normalizer, settings.tracker).with_validator(move |c| {
                store.period(&id).is_some_and(|p| {
                    c >= window.to_offset(p.from) + min_period
                        && p.break_period.is_none_or(|brk| c >= window.to_offset(brk.to))
                })
            })
        };

        Self {
            store,
            window,
            employee_id,
            period_id,
            from_edge,
            to_edge,
            mover: MoveDrag::new(settings.normalizer, settings.tracker),
        }
    }

    #[inline]
    #[must_use]
    pub fn period_id(&self) -> &Id {
        &self.period_id
    }

    #[inline]
    #[must_use]
    pub fn employee_id(&self) -> &Id {
        &self.employee_id
    }

    /// Whether any handle is mid-gesture.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.from_edge.is_dragging() || self.to_edge.is_dragging() || self.mover.is_dragging()
    }

    /// Committed edges relative to the day start.
    #[must_use]
    pub fn committed(&self) -> Option<Span> {
        self.store.period(&self.period_id).map(|p| {
            Span::new(self.window.to_offset(p.from), self.window.to_offset(p.to))
        })
    }

    /// Edges as currently displayed: preview plus move shift.
    #[must_use]
    pub fn displayed(&self) -> Option<Span> {
        self.committed().map(|c| self.shown(c))
    }

    fn shown(&self, committed: Span) -> Span {
        let shift = self.mover.shift();
        Span::new(
            self.from_edge.value(committed.from) + shift,
            self.to_edge.value(committed.to) + shift,
        )
    }

    fn flags(&self) -> DragFlags {
        DragFlags {
            from: self.from_edge.is_dragging(),
            to: self.to_edge.is_dragging(),
            moving: self.mover.is_dragging(),
        }
    }

    fn is_dragging_with(&self, handle: Handle) -> bool {
        match handle {
            Handle::From => self.from_edge.is_dragging(),
            Handle::To => self.to_edge.is_dragging(),
            Handle::Move => self.mover.is_dragging(),
        }
    }

    /// Drop any gesture in progress without committing.
    pub fn reset(&mut self) {
        self.from_edge.reset();
        self.to_edge.reset();
        self.mover.reset();
    }

    /// Route one pointer event to `handle`.
    pub fn handle(
        &mut self,
        handle: Handle,
        event: &PointerEvent,
        now: Instant,
        scale: Scale,
    ) -> BlockOutcome {
        let Some(period) = self.store.period(&self.period_id) else {
            return BlockOutcome::Ignored(IgnoreReason::UnknownTarget);
        };
        if !period.editable {
            return BlockOutcome::Ignored(IgnoreReason::ReadOnly);
        }
        if event.kind == PointerEventKind::DragStart
            && self.is_dragging()
            && !self.is_dragging_with(handle)
        {
            debug!(period = %self.period_id, ?handle, "start ignored, block busy");
            return BlockOutcome::Ignored(IgnoreReason::Busy);
        }

        let span = Span::new(
            self.window.to_offset(period.from),
            self.window.to_offset(period.to),
        );
        match handle {
            Handle::From | Handle::To => {
                let edge = if handle == Handle::From {
                    Edge::From
                } else {
                    Edge::To
                };
                let mut sink = StoreEdgeSink {
                    store: &self.store,
                    window: self.window,
                    employee_id: &self.employee_id,
                    period_id: &self.period_id,
                    edge,
                };
                let outcome = match edge {
                    Edge::From => self.from_edge.handle(event, now, span.from, scale, &mut sink),
                    Edge::To => self.to_edge.handle(event, now, span.to, scale, &mut sink),
                };
                BlockOutcome::Edge(outcome)
            }
            Handle::Move => {
                let mut sink = StoreShiftSink {
                    store: &self.store,
                    employee_id: &self.employee_id,
                    period_id: &self.period_id,
                };
                BlockOutcome::Move(self.mover.handle(event, now, span, scale, &mut sink))
            }
        }
    }

    /// Current rendering, or `None` when the period no longer exists.
    #[must_use]
    pub fn render(&self, scale: Scale) -> Option<BlockRender> {
        let period = self.store.period(&self.period_id)?;
        let committed = Span::new(
            self.window.to_offset(period.from),
            self.window.to_offset(period.to),
        );
        Some(build_render(
            &period,
            self.window,
            scale,
            self.shown(committed),
            self.flags(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeblock_model::{Employee, HOUR_MS};

    const HOUR: f64 = HOUR_MS as f64;
    const DAY_START: i64 = 1_700_000_000_000;

    fn settings() -> BlockSettings {
        BlockSettings::from_config(&TimelineConfig::default()).unwrap()
    }

    fn store_with(period: Period) -> TimelineStore {
        TimelineStore::new(vec![Employee::new(1_u64, "A").with_period(period)])
    }

    fn shift(from_h: i64, to_h: i64) -> Period {
        Period::new(
            9_u64,
            PeriodType::Booked,
            DAY_START + from_h * HOUR_MS,
            DAY_START + to_h * HOUR_MS,
        )
    }

    fn block(store: &TimelineStore) -> TimeBlock {
        TimeBlock::new(
            store.clone(),
            DayWindow::new(DAY_START, 24 * HOUR_MS),
            Id::Num(1),
            Id::Num(9),
            &settings(),
        )
    }

    fn scale_1200() -> Scale {
        Scale::from_width(1200.0, 24.0 * HOUR)
    }

    #[test]
    fn colors_follow_type() {
        assert_eq!(period_color(PeriodType::Booked), "#82C972");
        assert_eq!(period_color(PeriodType::Available), "#9370db");
        assert_eq!(period_color(PeriodType::Unavailable), "#e0e0e0");
        assert_eq!(period_color(PeriodType::Unpublished), "#000");
    }

    #[test]
    fn idle_render_geometry() {
        let store = store_with(shift(10, 19).with_break(
            DAY_START + 14 * HOUR_MS,
            DAY_START + 15 * HOUR_MS,
        ));
        let render = block(&store).render(scale_1200()).unwrap();
        assert_eq!(render.geometry, BlockGeometry { left_px: 500.0, width_px: 450.0 });
        assert_eq!(
            render.break_geometry,
            Some(BlockGeometry { left_px: 200.0, width_px: 50.0 })
        );
        assert!(render.from_hint.is_none() && render.to_hint.is_none());
        assert!(!render.dragging);
    }

    #[test]
    fn to_edge_clamps_to_day_end() {
        let store = store_with(shift(10, 15));
        let mut block = block(&store);
        let t0 = Instant::now();
        block.handle(Handle::To, &PointerEvent::start(0.0), t0, scale_1200());
        let out = block.handle(Handle::To, &PointerEvent::end(500.0), t0, scale_1200());
        assert_eq!(out, BlockOutcome::Edge(EdgeOutcome::Committed { value: 24.0 * HOUR }));
        assert_eq!(store.period(&Id::Num(9)).unwrap().to, DAY_START + 24 * HOUR_MS);
    }

    #[test]
    fn from_edge_cannot_cross_break() {
        let store = store_with(shift(10, 19).with_break(
            DAY_START + 14 * HOUR_MS,
            DAY_START + 15 * HOUR_MS,
        ));
        let mut block = block(&store);
        let t0 = Instant::now();
        // 250px = 5h, from would land at 15:00, past the break start.
        block.handle(Handle::From, &PointerEvent::start(0.0), t0, scale_1200());
        let out = block.handle(Handle::From, &PointerEvent::end(250.0), t0, scale_1200());
        assert!(matches!(out, BlockOutcome::Edge(EdgeOutcome::Reverted { .. })));
        assert_eq!(store.version(), 0);
        assert_eq!(block.displayed().unwrap().from, 10.0 * HOUR);
    }

    #[test]
    fn move_shows_hints_and_hides_break() {
        let store = store_with(shift(10, 19).with_break(
            DAY_START + 14 * HOUR_MS,
            DAY_START + 15 * HOUR_MS,
        ));
        let mut block = block(&store);
        let t0 = Instant::now();
        block.handle(Handle::Move, &PointerEvent::start(0.0), t0, scale_1200());
        block.handle(Handle::Move, &PointerEvent::drag(50.0), t0, scale_1200());
        let render = block.render(scale_1200()).unwrap();
        assert!(render.dragging);
        assert!(render.break_geometry.is_none());
        assert_eq!(render.from_hint.as_deref(), Some("11:00"));
        assert_eq!(render.to_hint.as_deref(), Some("20:00"));

        block.handle(Handle::Move, &PointerEvent::end(50.0), t0, scale_1200());
        let period = store.period(&Id::Num(9)).unwrap();
        assert_eq!(period.from, DAY_START + 11 * HOUR_MS);
        assert_eq!(
            period.break_period.map(|b| b.from),
            Some(DAY_START + 15 * HOUR_MS)
        );
        assert!(!block.is_dragging());
    }

    #[test]
    fn read_only_period_ignores_input() {
        let store = store_with(shift(10, 12).with_editable(false));
        let mut block = block(&store);
        let out = block.handle(Handle::Move, &PointerEvent::start(0.0), Instant::now(), scale_1200());
        assert_eq!(out, BlockOutcome::Ignored(IgnoreReason::ReadOnly));
        assert!(!block.render(scale_1200()).unwrap().editable);
    }

    #[test]
    fn second_handle_is_busy() {
        let store = store_with(shift(10, 12));
        let mut block = block(&store);
        let t0 = Instant::now();
        block.handle(Handle::From, &PointerEvent::start(0.0), t0, scale_1200());
        let out = block.handle(Handle::To, &PointerEvent::start(0.0), t0, scale_1200());
        assert_eq!(out, BlockOutcome::Ignored(IgnoreReason::Busy));
    }

    #[test]
    fn min_period_guards_edges() {
        let store = store_with(shift(10, 12));
        let settings = BlockSettings {
            min_period_ms: HOUR,
            ..settings()
        };
        let mut block = TimeBlock::new(
            store.clone(),
            DayWindow::new(DAY_START, 24 * HOUR_MS),
            Id::Num(1),
            Id::Num(9),
            &settings,
        );
        let t0 = Instant::now();
        // 75px = 1.5h: to would land at 10:30, leaving 30 minutes.
        block.handle(Handle::To, &PointerEvent::start(0.0), t0, scale_1200());
        let out = block.handle(Handle::To, &PointerEvent::end(-75.0), t0, scale_1200());
        assert!(matches!(out, BlockOutcome::Edge(EdgeOutcome::Reverted { .. })));
    }

    #[test]
    fn non_finite_release_ends_gesture() {
        let store = store_with(shift(10, 19).with_break(
            DAY_START + 14 * HOUR_MS,
            DAY_START + 15 * HOUR_MS,
        ));
        let mut block = block(&store);
        let t0 = Instant::now();
        block.handle(Handle::From, &PointerEvent::start(0.0), t0, scale_1200());
        block.handle(Handle::From, &PointerEvent::drag(50.0), t0, scale_1200());
        let out = block.handle(Handle::From, &PointerEvent::end(f64::NAN), t0, scale_1200());
        assert_eq!(out, BlockOutcome::Edge(EdgeOutcome::Cancelled));
        assert!(!block.is_dragging());
        assert_eq!(store.version(), 0);

        let render = block.render(scale_1200()).unwrap();
        assert!(!render.dragging);
        assert!(render.break_geometry.is_some());
        assert_eq!(block.displayed(), block.committed());

        let next = block.handle(Handle::To, &PointerEvent::start(0.0), t0, scale_1200());
        assert!(matches!(next, BlockOutcome::Edge(EdgeOutcome::Started { .. })));
    }
}
