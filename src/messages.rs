// Define message types exchanged with the external collaborators

use serde::{Deserialize, Serialize};

// Remote joystick message (teleop -> runtime)
// Fields are optional so a message missing an axis can be detected and dropped
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JoystickCommand {
    pub left_x_mapped: Option<i32>,
    pub left_y_mapped: Option<i32>,
}

impl JoystickCommand {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            left_x_mapped: Some(x),
            left_y_mapped: Some(y),
        }
    }
}

// Raw local joystick axes (nunchuck bridge -> runtime), 0-255 each
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NunchuckSample {
    pub joy_x: u8,
    pub joy_y: u8,
}

// Forward range measurement (ranging bridge -> runtime)
// `valid = false` means the sensor failed or was out of range; `millimeters` is then meaningless
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RangeSample {
    pub millimeters: u32,
    pub valid: bool,
}

/// Wheel side of the differential drive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Rotation sign applied to a wheel drive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Spin {
    Cw,
    Ccw,
    Stop,
}

/// Command for a single wheel drive: duty percentage in [0, 100] and spin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WheelCommand {
    pub side: Side,
    pub duty: u8,
    pub spin: Spin,
}

impl WheelCommand {
    pub fn new(side: Side, duty: u8, spin: Spin) -> Self {
        Self {
            side,
            duty: duty.min(100),
            spin,
        }
    }

    pub fn stop(side: Side) -> Self {
        Self::new(side, 0, Spin::Stop)
    }
}

// Actuation output from runtime -> wheel drives
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WheelActuation {
    pub left: WheelCommand,
    pub right: WheelCommand,
}

impl Default for WheelActuation {
    fn default() -> Self {
        Self {
            left: WheelCommand::stop(Side::Left),
            right: WheelCommand::stop(Side::Right),
        }
    }
}

// One-off start-up configuration sent to the wheel drives
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ActuatorConfig {
    pub pwm_frequency_hz: u32,
}

// Readiness report from a wheel drive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ActuatorStatus {
    pub side: Side,
    pub product_id: u8,
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    Idle,
    RangeUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joystick_command_missing_axis() {
        let cmd: JoystickCommand = serde_json::from_str(r#"{"left_x_mapped": 42}"#).unwrap();
        assert_eq!(cmd.left_x_mapped, Some(42));
        assert_eq!(cmd.left_y_mapped, None);
    }

    #[test]
    fn test_joystick_command_ignores_extra_fields() {
        let cmd: JoystickCommand = serde_json::from_str(
            r#"{"left_x_mapped": -20, "left_y_mapped": 5, "right_x_mapped": 3}"#,
        )
        .unwrap();
        assert_eq!(cmd, JoystickCommand::new(-20, 5));
    }

    #[test]
    fn test_wheel_command_clamps_duty() {
        let cmd = WheelCommand::new(Side::Left, 180, Spin::Cw);
        assert_eq!(cmd.duty, 100);
    }

    #[test]
    fn test_wheel_actuation_json_shape() {
        let json = serde_json::to_value(WheelActuation::default()).unwrap();
        assert_eq!(json["left"]["side"], "left");
        assert_eq!(json["left"]["duty"], 0);
        assert_eq!(json["right"]["spin"], "stop");
    }

    #[test]
    fn test_health_serializes_snake_case() {
        let json = serde_json::to_string(&RuntimeHealth::RangeUnavailable).unwrap();
        assert_eq!(json, "\"range_unavailable\"");
    }
}
