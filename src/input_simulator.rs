//! Input simulation using XTest
//!
//! Sends synthetic pointer motion and button events through the X server.
//! Requires the XTEST extension, which every stock Xorg and XWayland ships.

use std::rc::Rc;

use tracing::info;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    ConnectionExt, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT, MOTION_NOTIFY_EVENT,
};
use x11rb::protocol::xtest::ConnectionExt as _;
use x11rb::CURRENT_TIME;

use crate::buttons::MouseButton;
use crate::motion::{AbsolutePoint, CursorPosition, Rect, ABSOLUTE_MAX};
use crate::x11::X11Connection;
use crate::JoyCursorError;

/// Trait for pointer query and injection implementations
pub trait Pointer {
    /// Live system cursor position
    fn cursor_position(&self) -> Option<CursorPosition>;

    /// Bounds of the primary display
    fn screen_rect(&self) -> Option<Rect>;

    /// Move the cursor to an absolute `[0, 65535]` position
    fn move_absolute(&mut self, target: AbsolutePoint) -> Result<(), JoyCursorError>;

    fn press(&mut self, button: MouseButton) -> Result<(), JoyCursorError>;

    fn release(&mut self, button: MouseButton) -> Result<(), JoyCursorError>;
}

/// Convert an absolute coordinate back to a pixel offset.
///
/// Uses ceiling division so that a pixel scaled with
/// [`to_absolute`](crate::motion::to_absolute) comes back unchanged.
pub fn absolute_to_pixel(value: u16, extent: i32) -> i32 {
    if extent <= 0 {
        return 0;
    }
    let extent = i64::from(extent);
    ((i64::from(value) * extent + ABSOLUTE_MAX - 1) / ABSOLUTE_MAX) as i32
}

/// X button number for a mouse button
fn x_button(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Right => 3,
    }
}

/// XTest-backed pointer
pub struct X11Pointer {
    x11: Rc<X11Connection>,
}

impl X11Pointer {
    /// Create a new X11Pointer, checking that XTest is available
    pub fn new(x11: Rc<X11Connection>) -> Result<Self, JoyCursorError> {
        let version = x11
            .conn
            .xtest_get_version(2, 2)
            .map_err(|e| JoyCursorError::Display(format!("XTest unavailable: {}", e)))?
            .reply()
            .map_err(|e| JoyCursorError::Display(format!("XTest unavailable: {}", e)))?;

        info!(
            "XTest {}.{} ready for input simulation",
            version.major_version, version.minor_version
        );
        Ok(Self { x11 })
    }

    fn fake_input(&self, event_type: u8, detail: u8, x: i16, y: i16) -> Result<(), JoyCursorError> {
        let conn = &self.x11.conn;
        conn.xtest_fake_input(event_type, detail, CURRENT_TIME, self.x11.root, x, y, 0)
            .map_err(|e| JoyCursorError::SendEvent(e.to_string()))?;
        conn.flush()
            .map_err(|e| JoyCursorError::SendEvent(e.to_string()))?;
        Ok(())
    }
}

impl Pointer for X11Pointer {
    fn cursor_position(&self) -> Option<CursorPosition> {
        let reply = self
            .x11
            .conn
            .query_pointer(self.x11.root)
            .ok()?
            .reply()
            .ok()?;
        Some(CursorPosition::new(reply.root_x.into(), reply.root_y.into()))
    }

    fn screen_rect(&self) -> Option<Rect> {
        let geometry = self
            .x11
            .conn
            .get_geometry(self.x11.root)
            .ok()?
            .reply()
            .ok()?;
        Some(Rect::new(
            geometry.x.into(),
            geometry.y.into(),
            i32::from(geometry.x) + i32::from(geometry.width),
            i32::from(geometry.y) + i32::from(geometry.height),
        ))
    }

    fn move_absolute(&mut self, target: AbsolutePoint) -> Result<(), JoyCursorError> {
        let screen = self
            .screen_rect()
            .ok_or_else(|| JoyCursorError::SendEvent("Screen size unavailable".to_string()))?;

        let x = screen.left + absolute_to_pixel(target.x, screen.width());
        let y = screen.top + absolute_to_pixel(target.y, screen.height());
        let clamp = |v: i32| v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;

        self.fake_input(MOTION_NOTIFY_EVENT, 0, clamp(x), clamp(y))
    }

    fn press(&mut self, button: MouseButton) -> Result<(), JoyCursorError> {
        self.fake_input(BUTTON_PRESS_EVENT, x_button(button), 0, 0)
    }

    fn release(&mut self, button: MouseButton) -> Result<(), JoyCursorError> {
        self.fake_input(BUTTON_RELEASE_EVENT, x_button(button), 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::to_absolute;

    #[test]
    fn test_absolute_round_trip() {
        for (width, height) in [(1920, 1080), (2560, 1440), (1366, 768), (800, 600)] {
            let screen = Rect::new(0, 0, width, height);
            for x in (0..=width).step_by(7) {
                let y = x * height / width;
                let abs = to_absolute(CursorPosition::new(x, y), screen).unwrap();
                assert_eq!(absolute_to_pixel(abs.x, width), x);
                assert_eq!(absolute_to_pixel(abs.y, height), y);
            }
        }
    }

    #[test]
    fn test_absolute_edges() {
        assert_eq!(absolute_to_pixel(0, 1920), 0);
        assert_eq!(absolute_to_pixel(65535, 1920), 1920);
        assert_eq!(absolute_to_pixel(100, 0), 0);
    }

    #[test]
    fn test_x_buttons() {
        assert_eq!(x_button(MouseButton::Left), 1);
        assert_eq!(x_button(MouseButton::Right), 3);
    }
}
