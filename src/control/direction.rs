// Direction classification: intent pair -> one of eight compass moves or stop

use std::fmt;

use super::intent::IntentPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementClass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Stop,
}

impl MovementClass {
    pub const ALL: [MovementClass; 9] = [
        MovementClass::North,
        MovementClass::NorthEast,
        MovementClass::East,
        MovementClass::SouthEast,
        MovementClass::South,
        MovementClass::SouthWest,
        MovementClass::West,
        MovementClass::NorthWest,
        MovementClass::Stop,
    ];

    /// Human-readable label published as telemetry
    pub fn label(self) -> &'static str {
        match self {
            MovementClass::North => "NORTH",
            MovementClass::NorthEast => "NORTH EAST",
            MovementClass::East => "EAST",
            MovementClass::SouthEast => "SOUTH EAST",
            MovementClass::South => "SOUTH",
            MovementClass::SouthWest => "SOUTH WEST",
            MovementClass::West => "WEST",
            MovementClass::NorthWest => "NORTH WEST",
            MovementClass::Stop => "STOP",
        }
    }

    /// Rotation in place (opposite wheel spins)
    pub fn is_rotation(self) -> bool {
        matches!(self, MovementClass::East | MovementClass::West)
    }
}

impl fmt::Display for MovementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an intent pair; anything outside {-1, 0, 1}² stops the robot
pub fn classify(pair: &IntentPair) -> MovementClass {
    match (pair.x, pair.y) {
        (0, 1) => MovementClass::North,
        (1, 1) => MovementClass::NorthEast,
        (1, 0) => MovementClass::East,
        (1, -1) => MovementClass::SouthEast,
        (0, -1) => MovementClass::South,
        (-1, -1) => MovementClass::SouthWest,
        (-1, 0) => MovementClass::West,
        (-1, 1) => MovementClass::NorthWest,
        _ => MovementClass::Stop,
    }
}
