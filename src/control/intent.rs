// Normalized two-axis intent and its decoding from remote and local inputs

use crate::messages::{JoystickCommand, NunchuckSample};

/// Which control source produced an intent pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    Local,
    None,
}

/// Directional intent with `x` (right positive) and `y` (forward positive) in {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentPair {
    pub x: i8,
    pub y: i8,
    pub origin: Origin,
}

impl IntentPair {
    pub fn new(x: i8, y: i8, origin: Origin) -> Self {
        Self { x, y, origin }
    }

    pub fn remote(x: i8, y: i8) -> Self {
        Self::new(x, y, Origin::Remote)
    }

    pub fn local(x: i8, y: i8) -> Self {
        Self::new(x, y, Origin::Local)
    }

    /// Zero intent produced when neither source reported
    pub fn none() -> Self {
        Self::new(0, 0, Origin::None)
    }

    /// Decode a remote joystick message
    ///
    /// Returns `None` when either axis is missing; the caller leaves the
    /// previous intent untouched in that case.
    /// The vertical axis is inverted: pushing the stick up reports a negative value.
    pub fn from_remote(cmd: &JoystickCommand, deadband: i32) -> Option<Self> {
        let (raw_x, raw_y) = (cmd.left_x_mapped?, cmd.left_y_mapped?);

        let x = if raw_x < -deadband {
            -1
        } else if raw_x > deadband {
            1
        } else {
            0
        };
        let y = if raw_y < -deadband {
            1
        } else if raw_y > deadband {
            -1
        } else {
            0
        };

        Some(Self::remote(x, y))
    }

    /// Decode raw local joystick axes
    pub fn from_nunchuck(sample: &NunchuckSample) -> Self {
        Self::local(reduce_axis(sample.joy_x), reduce_axis(sample.joy_y))
    }
}

/// Reduce a 0-255 axis sample onto -1..=1 with a truncating linear map
///
/// 0..=127 -> -1, 128..=254 -> 0, 255 -> 1
pub fn reduce_axis(raw: u8) -> i8 {
    (raw as i32 * 2 / 255 - 1) as i8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 0, 0)]
    #[case(10, -10, 0, 0)]
    #[case(11, 0, 1, 0)]
    #[case(-11, 0, -1, 0)]
    #[case(0, -11, 0, 1)]
    #[case(0, 11, 0, -1)]
    #[case(100, -100, 1, 1)]
    #[case(-100, 100, -1, -1)]
    fn test_remote_decoding(#[case] raw_x: i32, #[case] raw_y: i32, #[case] x: i8, #[case] y: i8) {
        let pair = IntentPair::from_remote(&JoystickCommand::new(raw_x, raw_y), 10).unwrap();
        assert_eq!((pair.x, pair.y), (x, y));
        assert_eq!(pair.origin, Origin::Remote);
    }

    #[test]
    fn test_remote_missing_axis_is_rejected() {
        let cmd = JoystickCommand {
            left_x_mapped: Some(50),
            left_y_mapped: None,
        };
        assert_eq!(IntentPair::from_remote(&cmd, 10), None);
        assert_eq!(IntentPair::from_remote(&JoystickCommand::default(), 10), None);
    }

    #[test]
    fn test_remote_custom_deadband() {
        let pair = IntentPair::from_remote(&JoystickCommand::new(25, 0), 30).unwrap();
        assert_eq!(pair.x, 0);
    }

    #[rstest]
    #[case(0, -1)]
    #[case(127, -1)]
    #[case(128, 0)]
    #[case(254, 0)]
    #[case(255, 1)]
    fn test_reduce_axis(#[case] raw: u8, #[case] expected: i8) {
        assert_eq!(reduce_axis(raw), expected);
    }

    #[test]
    fn test_nunchuck_decoding() {
        let pair = IntentPair::from_nunchuck(&NunchuckSample { joy_x: 0, joy_y: 255 });
        assert_eq!(pair, IntentPair::local(-1, 1));
    }
}
