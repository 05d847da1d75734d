#![forbid(unsafe_code)]

//! Drag controllers and the employee timeline.
//!
//! # Role in Timeblock
//! `timeblock-widgets` composes the input layer from `timeblock-core` with
//! the committed state in `timeblock-model`. Controllers keep uncommitted
//! previews locally and write to the store only on a valid drop.
//!
//! # Primary responsibilities
//! - **ShrinkExtend**: one edge, preview while dragging, validate and commit
//!   on drop.
//! - **MoveDrag**: both edges by one shared diff, committed atomically.
//! - **TimeBlock**: the three handles of one period plus rendering state.
//! - **Timeline**: event routing, scale, day switching, rows.
//! - **TimelineConfig**: TOML/JSON configuration.

pub mod commit;
pub mod config;
pub mod move_drag;
pub mod shrink_extend;
pub mod time_block;
pub mod timeline;

pub use commit::{CommitSink, Edge, ShiftSink, StoreEdgeSink, StoreShiftSink};
pub use config::{ConfigError, EmployeeRange, MockConfig, TimelineConfig};
pub use move_drag::{MoveDrag, MoveOutcome, Span};
pub use shrink_extend::{EdgeOutcome, EdgeState, IgnoreReason, ShrinkExtend, Validator};
pub use time_block::{
    BREAK_COLOR, BlockGeometry, BlockOutcome, BlockRender, BlockSettings, Handle, TimeBlock,
    period_color,
};
pub use timeline::{RosterSource, RowView, Target, Timeline, TimelineError};
