// Loop cadence, topics, actuator start-up policy and drive thresholds
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// Runtime loop frequency (~50ms per cycle)
pub const LOOP_HZ: u64 = 20;

// Highest loop frequency with a non-zero millisecond period
pub const MAX_LOOP_HZ: u64 = 1000;

// Zenoh topics
pub const TOPIC_CMD_JOYSTICK: &str = "duplo/cmd/joystick"; // remote control
pub const TOPIC_SENSOR_NUNCHUCK: &str = "duplo/sensor/nunchuck"; // local control
pub const TOPIC_SENSOR_RANGE: &str = "duplo/sensor/range"; // forward range
pub const TOPIC_RT_WHEELS: &str = "duplo/rt/wheels"; // actuation
pub const TOPIC_RT_CONFIG: &str = "duplo/rt/config"; // actuator start-up config
pub const TOPIC_ACTUATOR_STATUS: &str = "duplo/state/actuator"; // actuator readiness
pub const TOPIC_DIRECTION: &str = "duplo/state/direction"; // direction label
pub const TOPIC_HEALTH: &str = "duplo/state/health"; // health status

// Product id reported by a ready motor shield
pub const MOTOR_SHIELD_PRODUCT_ID: u8 = 0x02;

// PWM frequency applied to both wheel drives at start-up
pub const PWM_FREQUENCY_HZ: u32 = 1000;

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What the speed planner does when the range sensor has no usable reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeFailurePolicy {
    /// Treat as too close: ceiling 0
    #[default]
    Stop,
    /// Allow movement at the minimum duty only
    Creep,
}

/// Thresholds for the speed planner and the differential drive mapper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub max_duty: u8,
    pub minimum_duty: u8,
    pub safe_distance_mm: u32,
    pub deadzone_mm: u32,
    /// Duty for rotation in place, not bounded by the range ceiling
    pub max_rotation_duty: u8,
    pub range_failure: RangeFailurePolicy,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            max_duty: 50,
            minimum_duty: 16,
            safe_distance_mm: 300,
            deadzone_mm: 60,
            max_rotation_duty: 50,
            range_failure: RangeFailurePolicy::Stop,
        }
    }
}

impl DriveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deadzone_mm >= self.safe_distance_mm {
            return Err(ConfigError::Invalid(format!(
                "deadzone_mm ({}) must be below safe_distance_mm ({})",
                self.deadzone_mm, self.safe_distance_mm
            )));
        }
        if self.max_duty > 100 || self.max_rotation_duty > 100 {
            return Err(ConfigError::Invalid(
                "duty values must be percentages in [0, 100]".to_string(),
            ));
        }
        if self.minimum_duty > self.max_duty {
            return Err(ConfigError::Invalid(format!(
                "minimum_duty ({}) exceeds max_duty ({})",
                self.minimum_duty, self.max_duty
            )));
        }
        Ok(())
    }
}

/// Decoding of raw control inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Remote stick magnitude that must be exceeded to register an intent
    pub remote_deadband: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { remote_deadband: 10 }
    }
}

/// Complete runtime configuration, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub loop_hz: u64,
    pub pwm_frequency_hz: u32,
    /// Readiness probes per wheel drive before start-up is abandoned
    pub ready_attempts: u32,
    pub ready_interval_ms: u64,
    pub range_timeout_ms: u64,
    pub local_timeout_ms: u64,
    pub drive: DriveConfig,
    pub input: InputConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            loop_hz: LOOP_HZ,
            pwm_frequency_hz: PWM_FREQUENCY_HZ,
            ready_attempts: 50,
            ready_interval_ms: 100,
            range_timeout_ms: 250,
            local_timeout_ms: 250,
            drive: DriveConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load a JSON config file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loop_hz == 0 || self.loop_hz > MAX_LOOP_HZ {
            return Err(ConfigError::Invalid(format!(
                "loop_hz ({}) must be in 1..={}",
                self.loop_hz, MAX_LOOP_HZ
            )));
        }
        if self.ready_attempts == 0 {
            return Err(ConfigError::Invalid(
                "ready_attempts must be positive".to_string(),
            ));
        }
        if self.input.remote_deadband < 0 {
            return Err(ConfigError::Invalid(
                "remote_deadband must not be negative".to_string(),
            ));
        }
        self.drive.validate()
    }

    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(1000 / self.loop_hz)
    }

    pub fn ready_interval(&self) -> Duration {
        Duration::from_millis(self.ready_interval_ms)
    }

    pub fn range_timeout(&self) -> Duration {
        Duration::from_millis(self.range_timeout_ms)
    }

    pub fn local_timeout(&self) -> Duration {
        Duration::from_millis(self.local_timeout_ms)
    }
}
