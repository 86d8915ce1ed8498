// Control core: arbitration, classification, and per-cycle decision
//
// One cycle runs in a fixed order: range reading (sampled by the caller),
// arbitration, classification, speed planning, wheel mapping.

pub mod arbiter;
pub mod direction;
pub mod intent;

pub use arbiter::{select, RemoteMailbox};
pub use direction::{classify, MovementClass};
pub use intent::{reduce_axis, IntentPair, Origin};

use crate::config::DriveConfig;
use crate::messages::WheelActuation;
use crate::motor::{map_to_wheels, plan_duty, RangeReading};

/// Everything decided in one control cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleDecision {
    pub intent: IntentPair,
    pub class: MovementClass,
    pub ceiling: u8,
    pub actuation: WheelActuation,
}

impl CycleDecision {
    /// Direction label to publish, only while moving
    pub fn label(&self) -> Option<&'static str> {
        match self.class {
            MovementClass::Stop => None,
            class => Some(class.label()),
        }
    }
}

/// Compute one cycle's wheel commands from that cycle's inputs only
pub fn decide(
    config: &DriveConfig,
    range: RangeReading,
    remote: Option<IntentPair>,
    local: Option<IntentPair>,
) -> CycleDecision {
    let intent = select(remote, local);
    let class = classify(&intent);
    let ceiling = plan_duty(config, range);
    let actuation = map_to_wheels(class, ceiling, config);

    CycleDecision {
        intent,
        class,
        ceiling,
        actuation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Spin;

    #[test]
    fn test_decide_forward_far() {
        let config = DriveConfig::default();
        let decision = decide(
            &config,
            RangeReading::Millimeters(500),
            Some(IntentPair::remote(0, 1)),
            None,
        );

        assert_eq!(decision.class, MovementClass::North);
        assert_eq!(decision.ceiling, 50);
        assert_eq!(decision.actuation.left.duty, 50);
        assert_eq!(decision.actuation.right.spin, Spin::Cw);
        assert_eq!(decision.label(), Some("NORTH"));
    }

    #[test]
    fn test_decide_without_input_stops() {
        let config = DriveConfig::default();
        let decision = decide(&config, RangeReading::Millimeters(500), None, None);

        assert_eq!(decision.intent.origin, Origin::None);
        assert_eq!(decision.class, MovementClass::Stop);
        assert_eq!(decision.actuation, WheelActuation::default());
        assert_eq!(decision.label(), None);
    }

    #[test]
    fn test_decide_forward_without_range_stops_wheels() {
        let config = DriveConfig::default();
        let decision = decide(
            &config,
            RangeReading::Unavailable,
            Some(IntentPair::remote(0, 1)),
            None,
        );

        assert_eq!(decision.class, MovementClass::North);
        assert_eq!(decision.ceiling, 0);
        assert_eq!(decision.actuation.left.duty, 0);
        assert_eq!(decision.actuation.right.duty, 0);
    }

    #[test]
    fn test_decide_is_repeatable() {
        let config = DriveConfig::default();
        for x in -1..=1 {
            for y in -1..=1 {
                let run = || {
                    decide(
                        &config,
                        RangeReading::Millimeters(150),
                        None,
                        Some(IntentPair::local(x, y)),
                    )
                };
                assert_eq!(run(), run());
            }
        }
    }
}
