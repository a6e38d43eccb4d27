//! Key-transition resolution for the movement keys.
//!
//! Presses and releases arrive as discrete events between ticks. The
//! rule: a press always wins its axis immediately; a release falls
//! back to the opposite direction if that key is still held, else the
//! axis stops. Holding both keys of an axis therefore never cancels
//! out; the most recent press is in charge.

use crate::motion::{Drive, Lift, MotionIntent, Strafe, Turn};

/// The eight logical movement keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionKey {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    TurnLeft,
    TurnRight,
}

/// Down/up state of every movement key. Only consulted on release, to
/// decide whether the opposite key takes over the axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    turn_left: bool,
    turn_right: bool,
}

impl MotionKeys {
    /// Record a key press and steer the intent. The freshly pressed
    /// direction takes its axis unconditionally.
    pub fn press(&mut self, key: MotionKey, intent: &mut MotionIntent) {
        match key {
            MotionKey::MoveForward => {
                self.forward = true;
                intent.surge = Drive::Forward;
            }
            MotionKey::MoveBackward => {
                self.backward = true;
                intent.surge = Drive::Backward;
            }
            MotionKey::MoveLeft => {
                self.left = true;
                intent.sway = Strafe::Left;
            }
            MotionKey::MoveRight => {
                self.right = true;
                intent.sway = Strafe::Right;
            }
            MotionKey::MoveUp => {
                self.up = true;
                intent.heave = Lift::Up;
            }
            MotionKey::MoveDown => {
                self.down = true;
                intent.heave = Lift::Down;
            }
            MotionKey::TurnLeft => {
                self.turn_left = true;
                intent.yaw = Turn::Anticlockwise;
            }
            MotionKey::TurnRight => {
                self.turn_right = true;
                intent.yaw = Turn::Clockwise;
            }
        }
    }

    /// Record a key release and steer the intent. The axis falls back
    /// to the opposite direction if that key is still held.
    pub fn release(&mut self, key: MotionKey, intent: &mut MotionIntent) {
        match key {
            MotionKey::MoveForward => {
                self.forward = false;
                intent.surge = if self.backward {
                    Drive::Backward
                } else {
                    Drive::None
                };
            }
            MotionKey::MoveBackward => {
                self.backward = false;
                intent.surge = if self.forward {
                    Drive::Forward
                } else {
                    Drive::None
                };
            }
            MotionKey::MoveLeft => {
                self.left = false;
                intent.sway = if self.right {
                    Strafe::Right
                } else {
                    Strafe::None
                };
            }
            MotionKey::MoveRight => {
                self.right = false;
                intent.sway = if self.left {
                    Strafe::Left
                } else {
                    Strafe::None
                };
            }
            MotionKey::MoveUp => {
                self.up = false;
                intent.heave = if self.down { Lift::Down } else { Lift::None };
            }
            MotionKey::MoveDown => {
                self.down = false;
                intent.heave = if self.up { Lift::Up } else { Lift::None };
            }
            MotionKey::TurnLeft => {
                self.turn_left = false;
                intent.yaw = if self.turn_right {
                    Turn::Clockwise
                } else {
                    Turn::None
                };
            }
            MotionKey::TurnRight => {
                self.turn_right = false;
                intent.yaw = if self.turn_left {
                    Turn::Anticlockwise
                } else {
                    Turn::None
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_press_wins_the_axis() {
        let mut keys = MotionKeys::default();
        let mut intent = MotionIntent::default();
        keys.press(MotionKey::MoveForward, &mut intent);
        keys.press(MotionKey::MoveBackward, &mut intent);
        assert_eq!(intent.surge, Drive::Backward);
    }

    #[test]
    fn release_falls_back_to_held_opposite() {
        // Forward held, backward pressed last, backward released: the
        // still-held forward key takes over rather than stopping.
        let mut keys = MotionKeys::default();
        let mut intent = MotionIntent::default();
        keys.press(MotionKey::MoveForward, &mut intent);
        keys.press(MotionKey::MoveBackward, &mut intent);
        keys.release(MotionKey::MoveBackward, &mut intent);
        assert_eq!(intent.surge, Drive::Forward);
    }

    #[test]
    fn release_without_opposite_stops_the_axis() {
        let mut keys = MotionKeys::default();
        let mut intent = MotionIntent::default();
        keys.press(MotionKey::TurnLeft, &mut intent);
        keys.release(MotionKey::TurnLeft, &mut intent);
        assert_eq!(intent.yaw, Turn::None);
    }

    #[test]
    fn axes_are_independent() {
        let mut keys = MotionKeys::default();
        let mut intent = MotionIntent::default();
        keys.press(MotionKey::MoveUp, &mut intent);
        keys.press(MotionKey::TurnRight, &mut intent);
        keys.press(MotionKey::MoveLeft, &mut intent);
        assert_eq!(intent.heave, Lift::Up);
        assert_eq!(intent.yaw, Turn::Clockwise);
        assert_eq!(intent.sway, Strafe::Left);
        assert_eq!(intent.surge, Drive::None);

        keys.release(MotionKey::MoveUp, &mut intent);
        assert_eq!(intent.heave, Lift::None);
        assert_eq!(intent.yaw, Turn::Clockwise);
    }

    #[test]
    fn turn_release_resolution_mirrors_movement_keys() {
        let mut keys = MotionKeys::default();
        let mut intent = MotionIntent::default();
        keys.press(MotionKey::TurnRight, &mut intent);
        keys.press(MotionKey::TurnLeft, &mut intent);
        assert_eq!(intent.yaw, Turn::Anticlockwise);
        keys.release(MotionKey::TurnLeft, &mut intent);
        assert_eq!(intent.yaw, Turn::Clockwise);
    }
}
