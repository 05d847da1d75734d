#![forbid(unsafe_code)]

//! Commit sinks: where a finished drag writes its value.
//!
//! Controllers never own committed state. On a valid drop they hand the
//! candidate to a sink; everything else (preview, revert) stays local.
//!
//! - [`CommitSink`] receives one edge value (`from` or `to`).
//! - [`ShiftSink`] receives one translation applied to the whole period.
//!
//! Both are implemented for `FnMut(f64)` closures, and for store-backed sinks
//! that turn the value into a [`PeriodUpdate`].
//!
//! # Invariants
//!
//! 1. A sink is called at most once per gesture, and only after validation.
//! 2. A shift is written as a single update, so observers never see one edge
//!    moved without the other.

use timeblock_model::{DayWindow, Id, PeriodUpdate, TimelineStore};
use tracing::warn;

/// Receives the committed value of a single-edge drag.
pub trait CommitSink {
    fn commit(&mut self, value: f64);
}

impl<F: FnMut(f64)> CommitSink for F {
    #[inline]
    fn commit(&mut self, value: f64) {
        self(value);
    }
}

/// Receives the committed translation of a whole-period move.
pub trait ShiftSink {
    fn commit_shift(&mut self, diff: f64);
}

impl<F: FnMut(f64)> ShiftSink for F {
    #[inline]
    fn commit_shift(&mut self, diff: f64) {
        self(diff);
    }
}

/// Which edge of a period a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    From,
    To,
}

// ---------------------------------------------------------------------------
// Store-backed sinks
// ---------------------------------------------------------------------------

/// Writes an edge value (an offset within `window`) into the store.
#[derive(Debug)]
pub struct StoreEdgeSink<'a> {
    pub store: &'a TimelineStore,
    pub window: DayWindow,
    pub employee_id: &'a Id,
    pub period_id: &'a Id,
    pub edge: Edge,
}

impl CommitSink for StoreEdgeSink<'_> {
    fn commit(&mut self, value: f64) {
        let timestamp = self.window.to_timestamp(value);
        let update = PeriodUpdate::new(self.period_id.clone()).employee(self.employee_id.clone());
        let update = match self.edge {
            Edge::From => update.from(timestamp),
            Edge::To => update.to(timestamp),
        };
        if let Err(err) = self.store.update_period(update) {
            warn!(period = %self.period_id, edge = ?self.edge, %err, "store rejected edge commit");
        }
    }
}

/// Translates a period, break included, by a diff in milliseconds.
#[derive(Debug)]
pub struct StoreShiftSink<'a> {
    pub store: &'a TimelineStore,
    pub employee_id: &'a Id,
    pub period_id: &'a Id,
}

impl ShiftSink for StoreShiftSink<'_> {
    fn commit_shift(&mut self, diff: f64) {
        let Some(period) = self.store.period(self.period_id) else {
            warn!(period = %self.period_id, "shift commit for missing period");
            return;
        };
        let diff = diff.round() as i64;
        let mut update = PeriodUpdate::new(self.period_id.clone())
            .employee(self.employee_id.clone())
            .from(period.from + diff)
            .to(period.to + diff);
        if let Some(brk) = period.break_period {
            update = update.break_period(brk.shifted(diff));
        }
        if let Err(err) = self.store.update_period(update) {
            warn!(period = %self.period_id, diff, %err, "store rejected shift commit");
        }
    }
}
