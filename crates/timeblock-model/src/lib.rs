#![forbid(unsafe_code)]

//! Data model for Timeblock: periods, employees, and the shared store.
//!
//! # Role in Timeblock
//! `timeblock-model` owns the committed state. Drag controllers never write
//! periods directly; they hand a finished value to a commit sink, which turns
//! it into a [`PeriodUpdate`] applied by [`TimelineStore`].
//!
//! # Primary responsibilities
//! - **Period / Employee**: serde model matching the roster JSON wire format.
//! - **TimelineStore**: single source of truth with versioning and
//!   subscriptions.
//! - **MockBackend** (feature `mock`): fixed sample and seeded random rosters.
//! - **day**: calendar date to epoch-millisecond conversions.

pub mod day;
pub mod employee;
#[cfg(feature = "mock")]
pub mod mock;
pub mod period;
pub mod store;

pub use day::{DAY_MS, DayWindow, HOUR_MS, MINUTE_MS, QUARTER_HOUR_MS, format_clock};
pub use employee::Employee;
#[cfg(feature = "mock")]
pub use mock::{MockBackend, MockError, sample_roster};
pub use period::{BreakPeriod, Id, Period, PeriodError, PeriodType};
pub use store::{PeriodUpdate, StoreChange, StoreError, Subscription, TimelineStore, parse_roster};
