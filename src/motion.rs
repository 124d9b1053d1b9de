//! Joystick deflection to cursor motion
//!
//! Each axis is compared against a fixed ladder of deadzone thresholds. Every
//! threshold the deflection exceeds adds one pixel of travel for this tick, so
//! the speed curve is a step function that is fine near center and fast near
//! the edge of the stick's range.

use tracing::{debug, warn};

use crate::input_simulator::Pointer;
use crate::joystick::JoystickSample;

/// Raw axis reading of a centered stick
pub const AXIS_CENTER: i32 = 32767;

/// Upper bound of the absolute injection coordinate space
pub const ABSOLUTE_MAX: i64 = 65535;

/// Deadzone thresholds, ascending. Densest near full deflection.
pub static DEADZONE_THRESHOLDS: [i32; 19] = [
    10000, 12000, 14000, 16000, 18000, //
    20000, 21000, 22000, 23000, 24000, 25000, 26000, 27000, 28000, 29000, //
    30000, 30500, 31000, 31500,
];

/// Cursor position in primary display pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle; `right` and `bottom` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Point in the resolution independent `[0, 65535]` space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsolutePoint {
    pub x: u16,
    pub y: u16,
}

/// Signed pixel step for one axis reading.
///
/// Equals the number of thresholds strictly exceeded by `|raw - 32767|`,
/// carrying the sign of the deflection.
pub fn axis_step(raw: u16) -> i32 {
    let diff = i32::from(raw) - AXIS_CENTER;
    DEADZONE_THRESHOLDS
        .iter()
        .map(|&threshold| i32::from(diff > threshold) - i32::from(diff < -threshold))
        .sum()
}

/// Rescale a pixel position on `screen` into absolute injection coordinates.
///
/// Returns `None` for a degenerate screen.
pub fn to_absolute(pos: CursorPosition, screen: Rect) -> Option<AbsolutePoint> {
    let width = i64::from(screen.width());
    let height = i64::from(screen.height());
    if width <= 0 || height <= 0 {
        return None;
    }

    let scale = |offset: i32, extent: i64| -> u16 {
        (i64::from(offset) * ABSOLUTE_MAX / extent).clamp(0, ABSOLUTE_MAX) as u16
    };

    Some(AbsolutePoint {
        x: scale(pos.x - screen.left, width),
        y: scale(pos.y - screen.top, height),
    })
}

/// Applies one tick of stick motion to the live cursor
#[derive(Debug, Default)]
pub struct MotionEngine;

impl MotionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Move the cursor for one sample.
    ///
    /// The position is re-read from the system every call and the screen size
    /// is re-queried, so skipped ticks or resolution changes never make the
    /// engine drift from the real pointer. Returns the position the cursor
    /// ends at, or `None` when the cursor could not be read.
    pub fn apply<P: Pointer>(
        &self,
        sample: &JoystickSample,
        pointer: &mut P,
    ) -> Option<CursorPosition> {
        let mut pos = pointer.cursor_position()?;

        let dx = axis_step(sample.raw_x);
        let dy = axis_step(sample.raw_y);
        if dx == 0 && dy == 0 {
            return Some(pos);
        }

        pos.x += dx;
        pos.y += dy;

        let Some(screen) = pointer.screen_rect() else {
            warn!("Screen size unavailable, dropping cursor move");
            return Some(pos);
        };
        let Some(target) = to_absolute(pos, screen) else {
            warn!("Degenerate screen {:?}, dropping cursor move", screen);
            return Some(pos);
        };

        debug!("Cursor step ({}, {}) -> {:?}", dx, dy, pos);
        if let Err(e) = pointer.move_absolute(target) {
            warn!("Failed to move cursor: {}", e);
        }

        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(diff: i32) -> u16 {
        (AXIS_CENTER + diff) as u16
    }

    #[test]
    fn test_thresholds_ascending() {
        assert_eq!(DEADZONE_THRESHOLDS.len(), 19);
        assert!(DEADZONE_THRESHOLDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_center_is_still() {
        assert_eq!(axis_step(32767), 0);
    }

    #[test]
    fn test_deadzone() {
        for diff in [-9999, -5000, -1, 1, 5000, 9999, 10000, -10000] {
            assert_eq!(axis_step(raw(diff)), 0, "diff {}", diff);
        }
    }

    #[test]
    fn test_step_counts_exceeded_thresholds() {
        assert_eq!(axis_step(raw(10001)), 1);
        assert_eq!(axis_step(raw(-10001)), -1);
        assert_eq!(axis_step(raw(19999)), 5);
        assert_eq!(axis_step(raw(25000)), 10);
        assert_eq!(axis_step(raw(25001)), 11);
        assert_eq!(axis_step(raw(30000)), 15);
        assert_eq!(axis_step(raw(31501)), 19);
    }

    #[test]
    fn test_full_deflection() {
        assert_eq!(axis_step(u16::MAX), 19);
        assert_eq!(axis_step(0), -19);
    }

    #[test]
    fn test_step_monotonic_and_bounded() {
        let mut last = 0;
        for value in (AXIS_CENTER as u32)..=u32::from(u16::MAX) {
            let step = axis_step(value as u16);
            assert!(step >= last);
            assert!((0..=19).contains(&step));
            last = step;
        }

        let mut last = 0;
        for value in (0..=AXIS_CENTER as u32).rev() {
            let step = axis_step(value as u16);
            assert!(step <= last);
            assert!((-19..=0).contains(&step));
            last = step;
        }
    }

    #[test]
    fn test_to_absolute() {
        let screen = Rect::new(0, 0, 1920, 1080);
        assert_eq!(
            to_absolute(CursorPosition::new(0, 0), screen),
            Some(AbsolutePoint { x: 0, y: 0 })
        );
        assert_eq!(
            to_absolute(CursorPosition::new(960, 540), screen),
            Some(AbsolutePoint { x: 32767, y: 32767 })
        );
        assert_eq!(
            to_absolute(CursorPosition::new(1920, 1080), screen),
            Some(AbsolutePoint { x: 65535, y: 65535 })
        );
    }

    #[test]
    fn test_to_absolute_clamps() {
        let screen = Rect::new(0, 0, 800, 600);
        assert_eq!(
            to_absolute(CursorPosition::new(-3, 700), screen),
            Some(AbsolutePoint { x: 0, y: 65535 })
        );
    }

    #[test]
    fn test_to_absolute_degenerate_screen() {
        assert_eq!(to_absolute(CursorPosition::new(1, 1), Rect::default()), None);
    }
}
