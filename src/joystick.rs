//! Joystick sampling via gilrs

use gilrs::{Axis, Button, GamepadId, Gilrs};
use tracing::{debug, info};

use crate::JoyCursorError;

/// Button 1 bit in [`JoystickSample::buttons`] (left click)
pub const JOY_BUTTON1: u32 = 1 << 0;

/// Button 2 bit in [`JoystickSample::buttons`] (right click)
pub const JOY_BUTTON2: u32 = 1 << 1;

/// Bit order of the button mask. Index `n` is bit `n`.
const BUTTON_ORDER: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::Mode,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// One poll of the joystick: raw axes in `[0, 65535]` and a button mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickSample {
    pub raw_x: u16,
    pub raw_y: u16,
    pub buttons: u32,
}

impl JoystickSample {
    /// Stick at rest, nothing pressed
    pub fn centered() -> Self {
        Self {
            raw_x: 32767,
            raw_y: 32767,
            buttons: 0,
        }
    }

    pub fn is_pressed(&self, mask: u32) -> bool {
        self.buttons & mask != 0
    }
}

/// Trait for joystick implementations
pub trait Joystick {
    /// Read the current state. `None` if the device is absent or the read failed.
    fn sample(&mut self) -> Option<JoystickSample>;
}

/// Convert a normalized gilrs axis value into the raw unsigned range.
///
/// `-1.0` maps to 0, `0.0` to 32767 and `1.0` to 65535.
pub fn axis_to_raw(value: f32) -> u16 {
    let value = if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    ((value + 1.0) * 32767.5) as u16
}

/// Gamepad at a fixed gilrs index
pub struct GilrsJoystick {
    gilrs: Gilrs,
    device_index: usize,
    connected: bool,
}

impl GilrsJoystick {
    /// Open the gamepad subsystem
    pub fn new(device_index: usize) -> Result<Self, JoyCursorError> {
        let gilrs = Gilrs::new().map_err(|e| JoyCursorError::Gamepad(e.to_string()))?;

        for (id, gamepad) in gilrs.gamepads() {
            info!("Found gamepad {}: {}", usize::from(id), gamepad.name());
        }

        Ok(Self {
            gilrs,
            device_index,
            connected: false,
        })
    }

    fn device_id(&self) -> Option<GamepadId> {
        self.gilrs
            .gamepads()
            .map(|(id, _)| id)
            .find(|&id| usize::from(id) == self.device_index)
    }

    fn note_connection(&mut self, connected: bool) {
        if connected != self.connected {
            if connected {
                info!("Gamepad {} connected", self.device_index);
            } else {
                info!("Gamepad {} not available", self.device_index);
            }
            self.connected = connected;
        }
    }
}

impl Joystick for GilrsJoystick {
    fn sample(&mut self) -> Option<JoystickSample> {
        // Drain pending events so the cached gamepad state is current
        while self.gilrs.next_event().is_some() {}

        let Some(id) = self.device_id() else {
            self.note_connection(false);
            return None;
        };
        let gamepad = self.gilrs.gamepad(id);
        let connected = gamepad.is_connected();

        let sample = connected.then(|| {
            let buttons = BUTTON_ORDER
                .iter()
                .enumerate()
                .filter(|&(_, &button)| gamepad.is_pressed(button))
                .fold(0u32, |mask, (bit, _)| mask | (1 << bit));

            JoystickSample {
                raw_x: axis_to_raw(gamepad.value(Axis::LeftStickX)),
                // gilrs reports up as positive, raw joysticks report down as positive
                raw_y: axis_to_raw(-gamepad.value(Axis::LeftStickY)),
                buttons,
            }
        });

        self.note_connection(connected);
        if let Some(sample) = &sample {
            debug!("Joystick sample {:?}", sample);
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_to_raw() {
        assert_eq!(axis_to_raw(-1.0), 0);
        assert_eq!(axis_to_raw(0.0), 32767);
        assert_eq!(axis_to_raw(1.0), 65535);
    }

    #[test]
    fn test_axis_to_raw_out_of_range() {
        assert_eq!(axis_to_raw(3.0), 65535);
        assert_eq!(axis_to_raw(-3.0), 0);
        assert_eq!(axis_to_raw(f32::NAN), 32767);
    }

    #[test]
    fn test_button_bits() {
        let sample = JoystickSample {
            buttons: JOY_BUTTON2,
            ..JoystickSample::centered()
        };
        assert!(!sample.is_pressed(JOY_BUTTON1));
        assert!(sample.is_pressed(JOY_BUTTON2));
        assert_eq!(BUTTON_ORDER[0], Button::South);
        assert_eq!(BUTTON_ORDER[1], Button::East);
    }
}
