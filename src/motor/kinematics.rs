// Differential drive kinematics for the two-wheel base
// Converts a movement class and duty ceiling into left/right wheel commands.

use crate::config::DriveConfig;
use crate::control::MovementClass;
use crate::messages::{Side, Spin, WheelActuation, WheelCommand};

/// Map a movement class to per-wheel commands
///
/// # Arguments
/// * `class` - Movement class for this cycle
/// * `ceiling` - Duty ceiling from the speed planner
/// * `config` - Supplies `max_rotation_duty`
///
/// Straight and diagonal moves are bounded by `ceiling`; the inner wheel of a
/// diagonal runs at half of it. Rotation in place runs at `max_rotation_duty`
/// regardless of range.
pub fn map_to_wheels(class: MovementClass, ceiling: u8, config: &DriveConfig) -> WheelActuation {
    let full = ceiling;
    let turn = ceiling / 2;
    let rotation = config.max_rotation_duty;

    let ((left_duty, left_spin), (right_duty, right_spin)) = match class {
        MovementClass::North => ((full, Spin::Cw), (full, Spin::Cw)),
        MovementClass::South => ((full, Spin::Ccw), (full, Spin::Ccw)),
        MovementClass::East => ((rotation, Spin::Cw), (rotation, Spin::Ccw)),
        MovementClass::West => ((rotation, Spin::Ccw), (rotation, Spin::Cw)),
        MovementClass::NorthEast => ((full, Spin::Cw), (turn, Spin::Cw)),
        MovementClass::SouthEast => ((full, Spin::Ccw), (turn, Spin::Ccw)),
        MovementClass::SouthWest => ((turn, Spin::Ccw), (full, Spin::Ccw)),
        MovementClass::NorthWest => ((turn, Spin::Cw), (full, Spin::Cw)),
        MovementClass::Stop => ((0, Spin::Stop), (0, Spin::Stop)),
    };

    WheelActuation {
        left: WheelCommand::new(Side::Left, left_duty, left_spin),
        right: WheelCommand::new(Side::Right, right_duty, right_spin),
    }
}
