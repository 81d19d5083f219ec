use crate::entities::NestingConstraints;
use crate::geometry::Rotation;

/// A quantity of one part scheduled for a nesting run.
///
/// Created and edited before the run; consumed once per run to produce
/// [`PackerItem`](crate::prep::PackerItem)s and immutable for its duration.
#[derive(Clone, Debug)]
pub struct ScheduledPart {
    pub part_id: usize,
    pub quantity: usize,
    /// Overrides the part's own nesting constraints when set.
    pub constraints: Option<NestingConstraints>,
    /// Rotation to try first during placement, when set.
    pub preferred_rotation: Option<Rotation>,
}

impl ScheduledPart {
    pub fn new(part_id: usize, quantity: usize) -> Self {
        ScheduledPart {
            part_id,
            quantity,
            constraints: None,
            preferred_rotation: None,
        }
    }
}
