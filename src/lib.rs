//! JoyCursor - use a gamepad as a mouse
//!
//! This library provides components for:
//! - Joystick sampling (left stick + buttons)
//! - Cursor motion with a quantized acceleration curve
//! - Edge-triggered left/right clicks
//! - Foreground window classification (pause while a fullscreen game runs)

pub mod buttons;
pub mod config;
pub mod focus_detector;
pub mod host;
pub mod input_simulator;
pub mod joystick;
pub mod motion;
pub mod supervisor;
pub mod x11;

pub use buttons::{ButtonEdgeTracker, ButtonLatch, MouseButton};
pub use config::Config;
pub use focus_detector::{classify, DesktopAnchors, ForegroundVerdict, WindowSystem};
pub use input_simulator::Pointer;
pub use joystick::{Joystick, JoystickSample};
pub use motion::{AbsolutePoint, CursorPosition, MotionEngine, Rect};
pub use supervisor::ControlSupervisor;

use thiserror::Error;

/// Main error type for JoyCursor
#[derive(Error, Debug)]
pub enum JoyCursorError {
    #[error("Failed to access X11 display: {0}")]
    Display(String),

    #[error("Failed to open gamepad subsystem: {0}")]
    Gamepad(String),

    #[error("Failed to send input event: {0}")]
    SendEvent(String),

    #[error("Failed to detect window focus: {0}")]
    FocusDetection(String),

    #[error("Failed to install signal handler: {0}")]
    Signal(String),
}
