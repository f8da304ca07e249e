/// Rover pose plus per-level collection progress.
///
/// `collected` is an ordered pointer into the level's objective list:
/// 0 = none collected, k = the first k objectives collected. It only
/// ever advances by one, and only when the rover moves onto the cell of
/// objective k. It resets to 0 together with the pose.

use crate::domain::grid::{Cell, Heading};

#[derive(Clone, Debug)]
pub struct RoverState {
    pub position: Cell,
    pub heading: Heading,
    pub collected: usize,
}

impl RoverState {
    pub fn new(position: Cell, heading: Heading) -> Self {
        RoverState { position, heading, collected: 0 }
    }

    /// Full reset: pose back to the given start, collection progress wiped.
    /// Used on level load, on launch, and after a crash.
    pub fn reset_to(&mut self, position: Cell, heading: Heading) {
        self.position = position;
        self.heading = heading;
        self.collected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_wipes_pose_and_progress() {
        let mut rover = RoverState::new(Cell::new(0, 0), Heading::Right);
        rover.position = Cell::new(4, 2);
        rover.heading = Heading::Down;
        rover.collected = 2;

        rover.reset_to(Cell::new(0, 0), Heading::Right);
        assert_eq!(rover.position, Cell::new(0, 0));
        assert_eq!(rover.heading, Heading::Right);
        assert_eq!(rover.collected, 0);
    }
}
