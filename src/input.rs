//! Input model: mouse buttons, wheel deltas, and the drag state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! It has only two states because the crop rectangle can only be moved; size
//! changes come from the wheel, which is valid in either state.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Unknown codes are treated as secondary.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            _ => Self::Secondary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels. Ignored by the crop engine.
    pub dx: f64,
    /// Vertical scroll amount in pixels (negative = up = zoom in).
    pub dy: f64,
}

/// Direction of a wheel tick, as far as zoom is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

impl WheelDelta {
    /// `None` for purely horizontal scrolling.
    #[must_use]
    pub fn direction(self) -> Option<WheelDirection> {
        if self.dy < 0.0 {
            Some(WheelDirection::Up)
        } else if self.dy > 0.0 {
            Some(WheelDirection::Down)
        } else {
            None
        }
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; pointer moves only update the hover cursor.
    #[default]
    Idle,
    /// The user is moving the crop rectangle.
    Dragging {
        /// Pointer minus rectangle top-left at grab time, in canvas pixels.
        /// Keeps the rectangle anchored to the grab point instead of snapping
        /// its corner to the pointer.
        grab_offset: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
