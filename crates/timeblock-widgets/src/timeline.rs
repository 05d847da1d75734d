#![forbid(unsafe_code)]

//! Employee timeline: one row per employee, one block per period.
//!
//! [`Timeline`] ties the pieces together. It holds the store handle, the
//! displayed day, and the current pixel scale, routes pointer events to the
//! right [`TimeBlock`], and renders rows.
//!
//! Blocks are created lazily on the first event addressed to a period and
//! discarded when the roster is replaced, which also abandons any gesture in
//! progress (the committed value is left unchanged).

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;
use timeblock_core::{Instant, PointerEvent, Scale};
use timeblock_model::{
    DayWindow, Id, StoreChange, StoreError, Subscription, TimelineStore, day, parse_roster,
};
use tracing::{debug, info};

use crate::config::{ConfigError, TimelineConfig};
use crate::shrink_extend::IgnoreReason;
use crate::time_block::{BlockOutcome, BlockRender, BlockSettings, Handle, TimeBlock};

// ---------------------------------------------------------------------------
// Roster source
// ---------------------------------------------------------------------------

/// Anything that can serve the roster JSON for a day.
pub trait RosterSource {
    type Error: std::error::Error + 'static;

    /// JSON array of employees for the day starting at `day_start` (epoch ms).
    fn roster_json(&mut self, day_start: i64) -> Result<String, Self::Error>;
}

#[cfg(feature = "mock")]
impl RosterSource for timeblock_model::MockBackend {
    type Error = timeblock_model::MockError;

    fn roster_json(&mut self, day_start: i64) -> Result<String, Self::Error> {
        timeblock_model::MockBackend::roster_json(self, day_start)
    }
}

/// Errors from timeline operations.
#[derive(Debug)]
pub enum TimelineError {
    /// Block settings could not be derived from the configuration.
    Config(ConfigError),
    /// The roster source failed.
    Source(Box<dyn std::error::Error>),
    /// The roster was malformed.
    Store(StoreError),
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "timeline config: {e}"),
            Self::Source(e) => write!(f, "roster source: {e}"),
            Self::Store(e) => write!(f, "roster: {e}"),
        }
    }
}

impl std::error::Error for TimelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Source(e) => Some(e.as_ref()),
            Self::Store(e) => Some(e),
        }
    }
}

impl From<ConfigError> for TimelineError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<StoreError> for TimelineError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Pointer event addressed to one handle of one period.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub period_id: Id,
    pub handle: Handle,
}

impl Target {
    #[must_use]
    pub fn new(period_id: impl Into<Id>, handle: Handle) -> Self {
        Self {
            period_id: period_id.into(),
            handle,
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub employee_id: Id,
    pub name: String,
    /// Booked time as `"{h} hours {mm} minutes"`.
    pub hours_label: String,
    pub blocks: Vec<BlockRender>,
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// The whole timeline for one day.
pub struct Timeline<S> {
    config: TimelineConfig,
    settings: BlockSettings,
    source: S,
    store: TimelineStore,
    window: DayWindow,
    width_px: f64,
    scale: Scale,
    blocks: HashMap<Id, TimeBlock>,
    reloaded: Rc<Cell<bool>>,
    _subscription: Subscription,
}

impl<S> fmt::Debug for Timeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("window", &self.window)
            .field("width_px", &self.width_px)
            .field("scale", &self.scale)
            .field("store", &self.store)
            .field("active_blocks", &self.blocks.len())
            .finish_non_exhaustive()
    }
}

impl<S: RosterSource> Timeline<S> {
    /// Empty, unmeasured timeline. Call [`Timeline::set_day`] to load data
    /// and [`Timeline::resize`] once the container width is known.
    pub fn new(config: TimelineConfig, source: S) -> Result<Self, TimelineError> {
        Self::with_store(config, source, TimelineStore::default())
    }

    /// Timeline over an existing store.
    pub fn with_store(
        config: TimelineConfig,
        source: S,
        store: TimelineStore,
    ) -> Result<Self, TimelineError> {
        let settings = BlockSettings::from_config(&config)?;
        let reloaded = Rc::new(Cell::new(false));
        let flag = Rc::clone(&reloaded);
        let subscription = store.subscribe(move |change| {
            if matches!(change, StoreChange::Reloaded { .. }) {
                flag.set(true);
            }
        });
        let window = DayWindow::new(0, config.day_length_ms as i64);
        Ok(Self {
            config,
            settings,
            source,
            store,
            window,
            width_px: 0.0,
            scale: Scale::UNMEASURED,
            blocks: HashMap::new(),
            reloaded,
            _subscription: subscription,
        })
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &TimelineStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub const fn window(&self) -> DayWindow {
        self.window
    }

    #[inline]
    #[must_use]
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TimelineConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Container width changed; recompute the scale.
    pub fn resize(&mut self, width_px: f64) {
        self.width_px = width_px;
        self.scale = Scale::from_width(width_px, self.config.day_length());
        debug!(width_px, ppu = self.scale.pixels_per_unit(), "timeline resized");
    }

    /// Show `date`: fetch its roster and replace the store contents.
    pub fn set_day(&mut self, date: NaiveDate) -> Result<(), TimelineError> {
        let window = DayWindow::new(day::day_start(date), self.config.day_length_ms as i64);
        self.load(window)?;
        info!(%date, employees = self.store.len(), "day loaded");
        Ok(())
    }

    /// Show the day starting at `day_start` (epoch ms).
    pub fn set_day_start(&mut self, day_start: i64) -> Result<(), TimelineError> {
        self.load(DayWindow::new(day_start, self.config.day_length_ms as i64))
    }

    fn load(&mut self, window: DayWindow) -> Result<(), TimelineError> {
        let json = self
            .source
            .roster_json(window.start())
            .map_err(|e| TimelineError::Source(Box::new(e)))?;
        let employees = parse_roster(&json)?;
        self.window = window;
        self.store.replace_employees(employees);
        self.sync_blocks();
        Ok(())
    }

    fn sync_blocks(&mut self) {
        if self.reloaded.replace(false) && !self.blocks.is_empty() {
            debug!(dropped = self.blocks.len(), "roster replaced, blocks discarded");
            self.blocks.clear();
        }
    }

    /// Whether any block is mid-gesture. Blocks abandoned by a roster
    /// reload do not count.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        !self.reloaded.get() && self.blocks.values().any(TimeBlock::is_dragging)
    }

    /// Route a pointer event to `target`.
    pub fn dispatch(&mut self, target: &Target, event: &PointerEvent, now: Instant) -> BlockOutcome {
        self.sync_blocks();
        if !self.blocks.contains_key(&target.period_id) {
            let owner = self.store.with_employees(|employees| {
                employees
                    .iter()
                    .find(|e| e.period(&target.period_id).is_some())
                    .map(|e| e.id.clone())
            });
            let Some(employee_id) = owner else {
                return BlockOutcome::Ignored(IgnoreReason::UnknownTarget);
            };
            let block = TimeBlock::new(
                self.store.clone(),
                self.window,
                employee_id,
                target.period_id.clone(),
                &self.settings,
            );
            self.blocks.insert(target.period_id.clone(), block);
        }
        match self.blocks.get_mut(&target.period_id) {
            Some(block) => block.handle(target.handle, event, now, self.scale),
            None => BlockOutcome::Ignored(IgnoreReason::UnknownTarget),
        }
    }

    /// Abort every gesture in progress.
    pub fn reset(&mut self) {
        for block in self.blocks.values_mut() {
            block.reset();
        }
    }

    /// Rendering of one period.
    #[must_use]
    pub fn render_period(&self, period_id: &Id) -> Option<BlockRender> {
        if let Some(block) = self.live_block(period_id) {
            return block.render(self.scale);
        }
        self.store
            .period(period_id)
            .map(|p| BlockRender::idle(&p, self.window, self.scale))
    }

    /// Every row, in roster order.
    #[must_use]
    pub fn rows(&self) -> Vec<RowView> {
        self.store.with_employees(|employees| {
            employees
                .iter()
                .map(|employee| RowView {
                    employee_id: employee.id.clone(),
                    name: employee.name.clone(),
                    hours_label: employee.total_hours_label(),
                    blocks: employee
                        .periods
                        .iter()
                        .map(|p| match self.live_block(&p.id) {
                            Some(block) => block
                                .render(self.scale)
                                .unwrap_or_else(|| BlockRender::idle(p, self.window, self.scale)),
                            None => BlockRender::idle(p, self.window, self.scale),
                        })
                        .collect(),
                })
                .collect()
        })
    }

    fn live_block(&self, period_id: &Id) -> Option<&TimeBlock> {
        if self.reloaded.get() {
            return None;
        }
        self.blocks.get(period_id)
    }
}
