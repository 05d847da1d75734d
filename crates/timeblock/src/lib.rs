#![forbid(unsafe_code)]

//! Timeblock public facade crate.
//!
//! Re-exports the drag engine, the data model, and the timeline widgets, and
//! offers a prelude plus a top-level [`Error`] for applications.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use timeblock_core::{
    DragImagePolicy, DropEffect, Instant, Movement, MovementHandler, MovementNoopReason,
    MovementTracker, NormalizeError, Normalizer, PointerEvent, PointerEventKind, Scale,
    TrackerConfig,
};

// --- Model re-exports ------------------------------------------------------

#[cfg(feature = "mock")]
pub use timeblock_model::{MockBackend, MockError};
pub use timeblock_model::{
    BreakPeriod, DayWindow, Employee, Id, Period, PeriodError, PeriodType, PeriodUpdate,
    StoreChange, StoreError, Subscription, TimelineStore,
};

// --- Widget re-exports -----------------------------------------------------

pub use timeblock_widgets::{
    BlockGeometry, BlockOutcome, BlockRender, CommitSink, ConfigError, EdgeOutcome, Handle,
    IgnoreReason, MoveDrag, MoveOutcome, RosterSource, RowView, ShiftSink, ShrinkExtend, Span,
    Target, TimeBlock, Timeline, TimelineConfig, TimelineError,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Timeblock applications.
#[derive(Debug)]
pub enum Error {
    Normalize(NormalizeError),
    Period(PeriodError),
    Store(StoreError),
    Config(ConfigError),
    Timeline(TimelineError),
    #[cfg(feature = "mock")]
    Mock(MockError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalize(err) => write!(f, "{err}"),
            Self::Period(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Timeline(err) => write!(f, "{err}"),
            #[cfg(feature = "mock")]
            Self::Mock(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Normalize(err) => Some(err),
            Self::Period(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Timeline(err) => Some(err),
            #[cfg(feature = "mock")]
            Self::Mock(err) => Some(err),
        }
    }
}

impl From<NormalizeError> for Error {
    fn from(err: NormalizeError) -> Self {
        Self::Normalize(err)
    }
}

impl From<PeriodError> for Error {
    fn from(err: PeriodError) -> Self {
        Self::Period(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<TimelineError> for Error {
    fn from(err: TimelineError) -> Self {
        Self::Timeline(err)
    }
}

#[cfg(feature = "mock")]
impl From<MockError> for Error {
    fn from(err: MockError) -> Self {
        Self::Mock(err)
    }
}

/// Standard result type for Timeblock APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    #[cfg(feature = "mock")]
    pub use crate::MockBackend;
    pub use crate::{
        Employee, Error, Handle, Id, Instant, Period, PeriodType, PointerEvent, Result, Scale,
        Target, Timeline, TimelineConfig, TimelineStore,
    };
    pub use crate::{core, model, widgets};
}

pub use timeblock_core as core;
pub use timeblock_model as model;
pub use timeblock_widgets as widgets;
