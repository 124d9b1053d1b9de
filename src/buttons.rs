//! Button edge tracking
//!
//! Button 1 drives the left mouse button and button 2 the right one. A click
//! event is only injected when the joystick bit differs from the latch.

use tracing::{debug, warn};

use crate::input_simulator::Pointer;
use crate::joystick::{JOY_BUTTON1, JOY_BUTTON2};
use crate::motion::CursorPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Down,
    Up,
}

/// A button state change to inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: MouseButton,
    pub transition: Transition,
}

/// Last known state of each mouse button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLatch {
    pub left_down: bool,
    pub right_down: bool,
}

impl ButtonLatch {
    /// Compare a button mask against the latch, flip the latch on change and
    /// return the transitions, left before right.
    pub fn update(&mut self, buttons: u32) -> Vec<ButtonEvent> {
        let mut events = Vec::with_capacity(2);

        for (button, mask, latched) in [
            (MouseButton::Left, JOY_BUTTON1, &mut self.left_down),
            (MouseButton::Right, JOY_BUTTON2, &mut self.right_down),
        ] {
            let pressed = buttons & mask != 0;
            if pressed != *latched {
                *latched = pressed;
                events.push(ButtonEvent {
                    button,
                    transition: if pressed {
                        Transition::Down
                    } else {
                        Transition::Up
                    },
                });
            }
        }

        events
    }

    /// Release every latched button, returning the `Up` transitions
    pub fn release_all(&mut self) -> Vec<ButtonEvent> {
        self.update(0)
    }
}

/// Turns button masks into injected clicks
#[derive(Debug, Default)]
pub struct ButtonEdgeTracker {
    latch: ButtonLatch,
}

impl ButtonEdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latch(&self) -> ButtonLatch {
        self.latch
    }

    /// Process one button mask, injecting presses and releases on change
    pub fn process<P: Pointer>(&mut self, buttons: u32, pos: CursorPosition, pointer: &mut P) {
        let events = self.latch.update(buttons);
        inject(&events, pos, pointer);
    }

    /// Release anything still held, used on shutdown
    pub fn release_all<P: Pointer>(&mut self, pointer: &mut P) {
        let events = self.latch.release_all();
        let pos = pointer.cursor_position().unwrap_or_default();
        inject(&events, pos, pointer);
    }
}

fn inject<P: Pointer>(events: &[ButtonEvent], pos: CursorPosition, pointer: &mut P) {
    for event in events {
        debug!(
            "{:?} button {:?} at {:?}",
            event.button, event.transition, pos
        );
        let result = match event.transition {
            Transition::Down => pointer.press(event.button),
            Transition::Up => pointer.release(event.button),
        };
        if let Err(e) = result {
            warn!(
                "Failed to inject {:?} {:?}: {}",
                event.button, event.transition, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(button: MouseButton) -> ButtonEvent {
        ButtonEvent {
            button,
            transition: Transition::Down,
        }
    }

    fn up(button: MouseButton) -> ButtonEvent {
        ButtonEvent {
            button,
            transition: Transition::Up,
        }
    }

    #[test]
    fn test_starts_up() {
        let latch = ButtonLatch::default();
        assert!(!latch.left_down);
        assert!(!latch.right_down);
    }

    #[test]
    fn test_held_button_emits_once() {
        let mut latch = ButtonLatch::default();
        assert_eq!(latch.update(JOY_BUTTON1), vec![down(MouseButton::Left)]);
        for _ in 0..10 {
            assert!(latch.update(JOY_BUTTON1).is_empty());
        }
        assert_eq!(latch.update(0), vec![up(MouseButton::Left)]);
        assert!(latch.update(0).is_empty());
    }

    #[test]
    fn test_buttons_independent() {
        let mut latch = ButtonLatch::default();
        assert_eq!(
            latch.update(JOY_BUTTON1 | JOY_BUTTON2),
            vec![down(MouseButton::Left), down(MouseButton::Right)]
        );
        assert_eq!(latch.update(JOY_BUTTON1), vec![up(MouseButton::Right)]);
        assert_eq!(
            latch.update(JOY_BUTTON2),
            vec![up(MouseButton::Left), down(MouseButton::Right)]
        );
    }

    #[test]
    fn test_other_bits_ignored() {
        let mut latch = ButtonLatch::default();
        assert!(latch.update(0b1111_0000).is_empty());
    }

    #[test]
    fn test_release_all() {
        let mut latch = ButtonLatch::default();
        latch.update(JOY_BUTTON2);
        assert_eq!(latch.release_all(), vec![up(MouseButton::Right)]);
        assert_eq!(latch, ButtonLatch::default());
    }
}
