//! Motion intent
//!
//! Input producers publish the latest intent into an [`IntentSlot`]; the
//! render loop takes one snapshot at the start of every frame. Intent is a
//! continuous signal, so there is no queue: the last write wins.

use spin::Mutex;

/// Continuous motion signals for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionIntent {
    /// Forward/backward, in [-1, 1]
    pub forward: f32,
    /// Signed heading change
    pub turn: f32,
    /// Signed look up/down
    pub look: f32,
    /// Vertical lift, usually -1, 0 or 1
    pub lift: f32,
}

impl MotionIntent {
    pub const IDLE: MotionIntent = MotionIntent { forward: 0.0, turn: 0.0, look: 0.0, lift: 0.0 };

    pub const fn new(forward: f32, turn: f32, look: f32, lift: f32) -> Self {
        Self { forward, turn, look, lift }
    }

    /// Clamp `forward` and `lift` to [-1, 1]; NaN becomes 0
    pub fn clamped(self) -> Self {
        fn axis(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
        }
        fn signal(v: f32) -> f32 {
            if v.is_finite() { v } else { 0.0 }
        }
        Self {
            forward: axis(self.forward),
            turn: signal(self.turn),
            look: signal(self.look),
            lift: axis(self.lift),
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Latest-value intent mailbox shared between input and render loop
pub struct IntentSlot {
    latest: Mutex<MotionIntent>,
}

impl IntentSlot {
    pub const fn new() -> Self {
        Self { latest: Mutex::new(MotionIntent::IDLE) }
    }

    /// Replace the current intent
    pub fn publish(&self, intent: MotionIntent) {
        *self.latest.lock() = intent;
    }

    /// Modify the current intent in place
    pub fn update<F: FnOnce(&mut MotionIntent)>(&self, f: F) {
        let mut latest = self.latest.lock();
        f(&mut *latest);
    }

    /// Copy of the current intent, sanitized
    pub fn snapshot(&self) -> MotionIntent {
        self.latest.lock().clamped()
    }

    /// Back to idle (focus lost, pointer released)
    pub fn reset(&self) {
        self.publish(MotionIntent::IDLE);
    }
}

impl Default for IntentSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writer_wins() {
        let slot = IntentSlot::new();
        slot.publish(MotionIntent::new(1.0, 0.0, 0.0, 0.0));
        slot.publish(MotionIntent::new(-0.5, 2.3, 0.0, 1.0));
        assert_eq!(slot.snapshot(), MotionIntent::new(-0.5, 2.3, 0.0, 1.0));

        slot.update(|i| i.turn = 0.0);
        assert_eq!(slot.snapshot().turn, 0.0);

        slot.reset();
        assert!(slot.snapshot().is_idle());
    }

    #[test]
    fn test_snapshot_is_sanitized() {
        let slot = IntentSlot::new();
        slot.publish(MotionIntent::new(3.0, f32::INFINITY, f32::NAN, -7.0));
        let snap = slot.snapshot();
        assert_eq!(snap, MotionIntent::new(1.0, 0.0, 0.0, -1.0));
    }
}
