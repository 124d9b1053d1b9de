//! Control supervisor
//!
//! Owns the enabled flag and the per-process control state, and implements
//! the two tick callbacks the host drives.

use tracing::{debug, info, warn};

use crate::buttons::{ButtonEdgeTracker, ButtonLatch};
use crate::focus_detector::{classify, DesktopAnchors, ForegroundVerdict, WindowSystem};
use crate::input_simulator::Pointer;
use crate::joystick::Joystick;
use crate::motion::{to_absolute, CursorPosition, MotionEngine, Rect};

pub struct ControlSupervisor {
    enabled: bool,
    anchors: DesktopAnchors,
    motion: MotionEngine,
    buttons: ButtonEdgeTracker,
}

impl ControlSupervisor {
    /// Start with control enabled
    pub fn new(anchors: DesktopAnchors) -> Self {
        Self {
            enabled: true,
            anchors,
            motion: MotionEngine::new(),
            buttons: ButtonEdgeTracker::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn anchors(&self) -> &DesktopAnchors {
        &self.anchors
    }

    pub fn button_latch(&self) -> ButtonLatch {
        self.buttons.latch()
    }

    /// Joystick tick: sample, move, click.
    ///
    /// Does nothing at all while control is disabled, not even a poll.
    pub fn joystick_tick<J, P>(&mut self, joystick: &mut J, pointer: &mut P)
    where
        J: Joystick,
        P: Pointer,
    {
        if !self.enabled {
            return;
        }

        let Some(sample) = joystick.sample() else {
            return;
        };

        let pos = match self.motion.apply(&sample, pointer) {
            Some(pos) => pos,
            None => {
                debug!("Cursor position unavailable, skipping motion");
                CursorPosition::default()
            }
        };

        self.buttons.process(sample.buttons, pos, pointer);
    }

    /// Game-check tick: classify the foreground window and re-assert the
    /// enabled flag from the verdict.
    pub fn game_check_tick<W, P>(&mut self, windows: &W, pointer: &mut P) -> ForegroundVerdict
    where
        W: WindowSystem,
        P: Pointer,
    {
        let verdict = classify(windows, &self.anchors);

        match verdict {
            ForegroundVerdict::FullscreenGame => {
                if let Some(desktop) = windows.desktop_rect() {
                    park_cursor(desktop, pointer);
                }
                self.set_enabled(false);
            }
            ForegroundVerdict::Desktop | ForegroundVerdict::Ordinary => self.set_enabled(true),
        }

        verdict
    }

    /// Release any button still held down
    pub fn shutdown<P: Pointer>(&mut self, pointer: &mut P) {
        self.buttons.release_all(pointer);
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            if enabled {
                info!("Fullscreen game left, joystick control resumed");
            } else {
                info!("Fullscreen game detected, joystick control paused");
            }
        }
        self.enabled = enabled;
    }
}

/// Move the cursor to the desktop's bottom-right corner
fn park_cursor<P: Pointer>(desktop: Rect, pointer: &mut P) {
    let corner = CursorPosition::new(desktop.right, desktop.bottom);
    let Some(target) = to_absolute(corner, desktop) else {
        return;
    };
    if let Err(e) = pointer.move_absolute(target) {
        warn!("Failed to park cursor: {}", e);
    }
}
