/// Outcomes and events emitted by the simulation.
/// The presentation layer consumes these for rendering and status text.

use crate::domain::grid::{Cell, Heading};

/// Why a forward move failed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CrashReason {
    OutOfBounds,
    Obstacle,
}

/// Result of applying a single command to the rover.
///
/// A successful move is a composite: the new position, at most one
/// ordered-objective pickup (by objective index), and whether the goal
/// was reached on this step. All three derive from the one updated cell.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    Turned(Heading),
    LightActivated,
    Crashed(CrashReason),
    Moved {
        position: Cell,
        collected: Option<usize>,
        goal_reached: bool,
    },
}

/// Events emitted by the playback controller during a run.
#[derive(Clone, Debug)]
pub enum RunEvent {
    /// A command was applied; `index` is its slot in the launched sequence.
    Step { index: usize, outcome: StepOutcome },
    ObjectiveCollected { id: String, cell: Cell },
    Crashed { reason: CrashReason },
    Completed,
    Exhausted,
}
