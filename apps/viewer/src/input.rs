//! Input mapping
//!
//! Turns keyboard, mouse and focus events into a [`MotionIntent`] and
//! publishes it into the shared [`IntentSlot`] after every event.

use voxel_renderer::{IntentSlot, MotionIntent};

/// Turn rate for A/D
pub const KEY_TURN: f32 = 2.3;
/// Forward value while backing up
pub const REVERSE: f32 = -0.5;
/// Mouse deltas at or below this many pixels are ignored
pub const MOUSE_DEAD_ZONE: f32 = 5.0;
/// Pixels of mouse movement per unit of turn/look
pub const MOUSE_DIVISOR: f32 = 10.0;

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    S,
    A,
    D,
    R,
    F,
}

impl Key {
    /// Map a typed character (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Key::W),
            's' => Some(Key::S),
            'a' => Some(Key::A),
            'd' => Some(Key::D),
            'r' => Some(Key::R),
            'f' => Some(Key::F),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Raw input event from the windowing layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    /// Relative pointer movement in pixels
    MouseMove { dx: f32, dy: f32 },
    PointerLock(bool),
    FocusLost,
}

/// Current intent as built up from events
#[derive(Debug, Clone, Default)]
pub struct InputState {
    intent: MotionIntent,
    pointer_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => match key {
                Key::W => self.intent.forward = 1.0,
                Key::S => self.intent.forward = REVERSE,
                Key::A => self.intent.turn = -KEY_TURN,
                Key::D => self.intent.turn = KEY_TURN,
                Key::R => self.intent.lift = 1.0,
                Key::F => self.intent.lift = -1.0,
            },
            InputEvent::KeyUp(key) => match key {
                Key::W | Key::S => self.intent.forward = 0.0,
                Key::A | Key::D => self.intent.turn = 0.0,
                Key::R | Key::F => self.intent.lift = 0.0,
            },
            InputEvent::MouseDown(button) if self.pointer_locked => match button {
                MouseButton::Left => self.intent.forward = 1.0,
                MouseButton::Right => self.intent.forward = REVERSE,
                MouseButton::Middle => {}
            },
            InputEvent::MouseDown(_) => {}
            InputEvent::MouseUp(MouseButton::Left | MouseButton::Right) => self.intent.forward = 0.0,
            InputEvent::MouseUp(MouseButton::Middle) => {}
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.intent.turn = mouse_axis(dx);
                    self.intent.look = mouse_axis(dy);
                }
            }
            InputEvent::PointerLock(locked) => {
                self.pointer_locked = locked;
                if !locked {
                    self.release();
                }
            }
            InputEvent::FocusLost => self.release(),
        }
    }

    /// Apply one event and publish the result
    pub fn handle(&mut self, event: InputEvent, slot: &IntentSlot) {
        self.apply(event);
        slot.publish(self.intent);
    }

    pub fn intent(&self) -> MotionIntent {
        self.intent
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Held keys never see their key-up once focus is gone
    fn release(&mut self) {
        log::debug!("Input released");
        self.intent = MotionIntent::IDLE;
    }
}

fn mouse_axis(delta: f32) -> f32 {
    if delta.abs() > MOUSE_DEAD_ZONE {
        delta / MOUSE_DIVISOR
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut input = InputState::new();
        input.apply(InputEvent::KeyDown(Key::W));
        input.apply(InputEvent::KeyDown(Key::A));
        input.apply(InputEvent::KeyDown(Key::R));
        assert_eq!(input.intent(), MotionIntent::new(1.0, -2.3, 0.0, 1.0));

        input.apply(InputEvent::KeyDown(Key::S));
        input.apply(InputEvent::KeyDown(Key::D));
        input.apply(InputEvent::KeyDown(Key::F));
        assert_eq!(input.intent(), MotionIntent::new(-0.5, 2.3, 0.0, -1.0));

        // Releasing either key of a pair clears the axis
        input.apply(InputEvent::KeyUp(Key::W));
        input.apply(InputEvent::KeyUp(Key::A));
        input.apply(InputEvent::KeyUp(Key::R));
        assert!(input.intent().is_idle());
    }

    #[test]
    fn test_key_from_char() {
        assert_eq!(Key::from_char('W'), Some(Key::W));
        assert_eq!(Key::from_char('f'), Some(Key::F));
        assert_eq!(Key::from_char('x'), None);
    }

    #[test]
    fn test_mouse_needs_pointer_lock() {
        let mut input = InputState::new();
        input.apply(InputEvent::MouseMove { dx: 40.0, dy: -30.0 });
        input.apply(InputEvent::MouseDown(MouseButton::Left));
        assert!(input.intent().is_idle());

        input.apply(InputEvent::PointerLock(true));
        input.apply(InputEvent::MouseMove { dx: 40.0, dy: -30.0 });
        input.apply(InputEvent::MouseDown(MouseButton::Right));
        assert_eq!(input.intent(), MotionIntent::new(-0.5, 4.0, -3.0, 0.0));

        input.apply(InputEvent::MouseUp(MouseButton::Right));
        assert_eq!(input.intent().forward, 0.0);
    }

    #[test]
    fn test_mouse_dead_zone() {
        let mut input = InputState::new();
        input.apply(InputEvent::PointerLock(true));
        input.apply(InputEvent::MouseMove { dx: 20.0, dy: 20.0 });
        input.apply(InputEvent::MouseMove { dx: 5.0, dy: -4.0 });
        assert_eq!(input.intent().turn, 0.0);
        assert_eq!(input.intent().look, 0.0);
        input.apply(InputEvent::MouseMove { dx: -6.0, dy: 0.0 });
        assert!((input.intent().turn + 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_focus_loss_resets() {
        let slot = IntentSlot::new();
        let mut input = InputState::new();
        input.handle(InputEvent::PointerLock(true), &slot);
        input.handle(InputEvent::KeyDown(Key::W), &slot);
        input.handle(InputEvent::KeyDown(Key::R), &slot);
        input.handle(InputEvent::MouseMove { dx: 0.0, dy: 50.0 }, &slot);
        assert_eq!(slot.snapshot(), MotionIntent::new(1.0, 0.0, 5.0, 1.0));

        input.handle(InputEvent::FocusLost, &slot);
        assert!(slot.snapshot().is_idle());

        input.handle(InputEvent::KeyDown(Key::D), &slot);
        input.handle(InputEvent::PointerLock(false), &slot);
        assert!(!input.is_pointer_locked());
        assert!(slot.snapshot().is_idle());
    }
}
