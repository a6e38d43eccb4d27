//! Discrete motion intents on the four control axes.
//!
//! Each axis is a closed three-way choice rather than a raw signed
//! integer; conversion to a scalar happens through an explicit lookup
//! at the point of use.

/// Yaw axis: rotation about the vertical. Positive is anticlockwise
/// seen from above.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Turn {
    Clockwise,
    #[default]
    None,
    Anticlockwise,
}

impl Turn {
    #[inline]
    pub fn is_none(self) -> bool {
        self == Turn::None
    }

    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            Turn::Clockwise => -1.0,
            Turn::None => 0.0,
            Turn::Anticlockwise => 1.0,
        }
    }
}

/// Surge axis: movement along the heading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Drive {
    Backward,
    #[default]
    None,
    Forward,
}

impl Drive {
    #[inline]
    pub fn is_none(self) -> bool {
        self == Drive::None
    }

    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            Drive::Backward => -1.0,
            Drive::None => 0.0,
            Drive::Forward => 1.0,
        }
    }
}

/// Sway axis: strafing across the heading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strafe {
    Left,
    #[default]
    None,
    Right,
}

impl Strafe {
    #[inline]
    pub fn is_none(self) -> bool {
        self == Strafe::None
    }

    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            Strafe::Left => -1.0,
            Strafe::None => 0.0,
            Strafe::Right => 1.0,
        }
    }
}

/// Heave axis: vertical movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lift {
    Down,
    #[default]
    None,
    Up,
}

impl Lift {
    #[inline]
    pub fn is_none(self) -> bool {
        self == Lift::None
    }

    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            Lift::Down => -1.0,
            Lift::None => 0.0,
            Lift::Up => 1.0,
        }
    }
}

/// How the controlled body should currently be moving, based solely on
/// keyboard input. Updated on key transitions, consumed once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionIntent {
    pub yaw: Turn,
    pub surge: Drive,
    pub sway: Strafe,
    pub heave: Lift,
}

impl MotionIntent {
    pub fn is_idle(&self) -> bool {
        self.yaw.is_none() && self.surge.is_none() && self.sway.is_none() && self.heave.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_intent_is_idle() {
        assert!(MotionIntent::default().is_idle());
    }

    #[test]
    fn factors_match_sign_conventions() {
        assert_eq!(Turn::Anticlockwise.factor(), 1.0);
        assert_eq!(Turn::Clockwise.factor(), -1.0);
        assert_eq!(Drive::Forward.factor(), 1.0);
        assert_eq!(Drive::Backward.factor(), -1.0);
        assert_eq!(Strafe::Right.factor(), 1.0);
        assert_eq!(Strafe::Left.factor(), -1.0);
        assert_eq!(Lift::Up.factor(), 1.0);
        assert_eq!(Lift::Down.factor(), -1.0);
    }
}
