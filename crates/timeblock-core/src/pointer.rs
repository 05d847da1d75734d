#![forbid(unsafe_code)]

//! Canonical pointer-drag input types.
//!
//! The presentation layer translates its native drag events (HTML5
//! `dragstart`/`drag`/`dragend`, a desktop toolkit's mouse grab, a test
//! script) into [`PointerEvent`] values. Only the horizontal coordinate
//! matters to a timeline, so events carry a single `x` in container pixels.
//!
//! # Design Notes
//!
//! - Coordinates are `f64` so sub-pixel input from high-DPI surfaces survives.
//! - Events are plain data (`Copy`) and compare with `PartialEq` for tests.

/// Phase of a pointer-drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// The pointer was pressed on a draggable element and the drag began.
    DragStart,
    /// The pointer moved while the drag is held.
    Drag,
    /// The pointer was released; the gesture is over.
    DragEnd,
}

/// One pointer-drag input sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Gesture phase.
    pub kind: PointerEventKind,
    /// Horizontal pointer position in pixels.
    pub x: f64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[inline]
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64) -> Self {
        Self { kind, x }
    }

    /// Gesture start at `x`.
    #[inline]
    #[must_use]
    pub const fn start(x: f64) -> Self {
        Self::new(PointerEventKind::DragStart, x)
    }

    /// Pointer move to `x`.
    #[inline]
    #[must_use]
    pub const fn drag(x: f64) -> Self {
        Self::new(PointerEventKind::Drag, x)
    }

    /// Gesture end at `x`.
    #[inline]
    #[must_use]
    pub const fn end(x: f64) -> Self {
        Self::new(PointerEventKind::DragEnd, x)
    }
}

/// Drag feedback the presentation layer applies when a gesture starts.
///
/// The dragged block is its own visual feedback, so the platform's
/// ghost image has to be replaced by a transparent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragImagePolicy {
    /// Replace the platform drag preview with a transparent image.
    pub suppress_ghost_image: bool,
    /// Drop effect to advertise while the gesture is active.
    pub effect: DropEffect,
}

impl DragImagePolicy {
    /// A 1x1 transparent GIF, suitable as a `setDragImage` source.
    pub const TRANSPARENT_PIXEL_GIF: &'static str =
        "data:image/gif;base64,R0lGODlhAQABAAAAACH5BAEKAAEALAAAAAABAAEAAAICTAEAOw==";
}

impl Default for DragImagePolicy {
    fn default() -> Self {
        Self {
            suppress_ghost_image: true,
            effect: DropEffect::Move,
        }
    }
}

/// Advertised drop effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    Move,
    Copy,
    None,
}

impl DropEffect {
    /// Name of the effect as used by HTML `effectAllowed`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Copy => "copy",
            Self::None => "none",
        }
    }
}
