// Motor control for the two-wheel differential drive base
//
// Provides:
// - Range-based speed planning (distance -> duty ceiling)
// - Differential drive kinematics (movement class -> wheel commands)
// - Wheel drive actuator interface and start-up handshake

mod driver;
pub mod kinematics;
pub mod planner;

pub use driver::{initialize, wait_until_ready, Actuator, ActuatorError, ZenohActuator};
pub use kinematics::map_to_wheels;
pub use planner::{plan_duty, RangeReading};
