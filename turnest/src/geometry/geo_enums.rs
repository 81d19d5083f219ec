use serde::{Deserialize, Serialize};

/// The four discrete rotations a part can be placed at.
///
/// Turret-punch nesting never rotates freely: parts are placed at quarter
/// turns only, and the legal subset is derived from the part's
/// [`NestingConstraints`](crate::entities::NestingConstraints).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    pub fn radians(self) -> f32 {
        (self.degrees() as f32).to_radians()
    }

    /// True for the two rotations that swap a footprint's width and height.
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::R0
    }
}
