// Speed planner: forward range -> duty ceiling
//
// Three zones: full duty beyond the safe distance, a linear ramp between the
// deadzone and the safe distance, and a full stop inside the deadzone.

use crate::config::{DriveConfig, RangeFailurePolicy};
use crate::messages::RangeSample;

/// Range reading for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeReading {
    Millimeters(u32),
    /// Sensor failed, was out of range, or reported nothing recently
    Unavailable,
}

impl RangeReading {
    pub fn is_valid(&self) -> bool {
        matches!(self, RangeReading::Millimeters(_))
    }
}

impl From<RangeSample> for RangeReading {
    fn from(sample: RangeSample) -> Self {
        if sample.valid {
            RangeReading::Millimeters(sample.millimeters)
        } else {
            RangeReading::Unavailable
        }
    }
}

/// Maximum permitted duty for the cycle, in [0, max_duty]
pub fn plan_duty(config: &DriveConfig, range: RangeReading) -> u8 {
    let distance = match range {
        RangeReading::Millimeters(mm) => mm,
        RangeReading::Unavailable => {
            return match config.range_failure {
                RangeFailurePolicy::Stop => 0,
                RangeFailurePolicy::Creep => config.minimum_duty.min(config.max_duty),
            };
        }
    };

    if distance > config.safe_distance_mm {
        config.max_duty
    } else if distance >= config.deadzone_mm {
        ramp(config, distance)
    } else {
        0
    }
}

/// Linear interpolation of [deadzone, safe] onto [minimum_duty, max_duty], rounded to nearest
fn ramp(config: &DriveConfig, distance: u32) -> u8 {
    let span = config.safe_distance_mm.saturating_sub(config.deadzone_mm) as u64;
    if span == 0 {
        return config.max_duty;
    }

    let low = config.minimum_duty as u64;
    let high = config.max_duty.max(config.minimum_duty) as u64;
    let offset = (distance - config.deadzone_mm) as u64;

    // round(offset * (high - low) / span) in integer arithmetic
    let scaled = (2 * offset * (high - low) + span) / (2 * span);
    (low + scaled).min(high) as u8
}
