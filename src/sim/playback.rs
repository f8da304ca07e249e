/// Tick-driven playback of a command sequence.
///
/// The game loop calls `tick()` once per simulation tick; the controller
/// counts down pacing delays and applies at most one command per call,
/// so the presentation layer renders every intermediate state.
///
/// State machine:
///   Idle --launch--> Running --> { Crashed, Completed, Exhausted }
///   Crashed holds for a recovery delay, then returns to Idle.
///   Completed / Exhausted persist until the next launch or level load.
///
/// A crash performs a FULL reset: pose and collection progress back to
/// the level's initial values. Exhaustion does not reset; the rover
/// stays wherever the sequence left it.

use crate::config::PacingConfig;
use crate::domain::command::Command;
use crate::domain::rover::RoverState;

use super::engine;
use super::event::{RunEvent, StepOutcome};
use super::level::Level;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunState {
    Idle,
    Running,
    Crashed,
    Completed,
    Exhausted,
}

pub struct PlaybackController {
    state: RunState,
    sequence: Vec<Command>,
    cursor: usize,
    delay: u32,
    pacing: PacingConfig,
}

impl PlaybackController {
    pub fn new(pacing: PacingConfig) -> Self {
        PlaybackController {
            state: RunState::Idle,
            sequence: vec![],
            cursor: 0,
            delay: 0,
            pacing,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Slot index of the command most recently applied, for highlighting.
    pub fn current_step(&self) -> Option<usize> {
        if self.state == RunState::Running {
            self.cursor.checked_sub(1)
        } else {
            None
        }
    }

    /// Begin a run. Rejected (returns false, no state change) for an
    /// empty sequence, while a run is in flight, or during crash
    /// recovery. The rover is reset to the level start and the pre-run
    /// settle delay is armed so the reset renders before the first step.
    pub fn launch(&mut self, sequence: &[Command], rover: &mut RoverState, level: &Level) -> bool {
        if sequence.is_empty() {
            return false;
        }
        if matches!(self.state, RunState::Running | RunState::Crashed) {
            return false;
        }
        rover.reset_to(level.start, level.heading);
        self.sequence = sequence.to_vec();
        self.cursor = 0;
        self.delay = self.pacing.pre_run_ticks;
        self.state = RunState::Running;
        true
    }

    /// Abandon the queued commands and any in-flight delay, reset the
    /// rover to the level's initial state, and return to Idle.
    pub fn cancel(&mut self, rover: &mut RoverState, level: &Level) {
        self.reset();
        rover.reset_to(level.start, level.heading);
    }

    /// Drop back to Idle without touching the rover. Used on level load,
    /// where the caller resets the rover against the new level.
    pub fn reset(&mut self) {
        self.sequence.clear();
        self.cursor = 0;
        self.delay = 0;
        self.state = RunState::Idle;
    }

    /// Advance one tick. Applies at most one command.
    pub fn tick(&mut self, rover: &mut RoverState, level: &Level) -> Vec<RunEvent> {
        match self.state {
            RunState::Running => self.advance(rover, level),
            RunState::Crashed => {
                if self.delay > 0 {
                    self.delay -= 1;
                }
                if self.delay == 0 {
                    self.state = RunState::Idle;
                }
                vec![]
            }
            _ => vec![],
        }
    }

    fn advance(&mut self, rover: &mut RoverState, level: &Level) -> Vec<RunEvent> {
        if self.delay > 0 {
            self.delay -= 1;
            return vec![];
        }

        let index = self.cursor;
        let command = match self.sequence.get(index) {
            Some(&c) => c,
            // Unreachable through launch() (empty sequences are rejected
            // and terminal outcomes stop the run), kept as a safe landing.
            None => {
                self.state = RunState::Exhausted;
                return vec![RunEvent::Exhausted];
            }
        };
        self.cursor += 1;

        let outcome = engine::apply_command(rover, level, command);
        let mut events = vec![RunEvent::Step { index, outcome: outcome.clone() }];

        match outcome {
            StepOutcome::Crashed(reason) => {
                rover.reset_to(level.start, level.heading);
                self.state = RunState::Crashed;
                self.delay = self.pacing.crash_recover_ticks;
                events.push(RunEvent::Crashed { reason });
            }
            StepOutcome::Moved { collected, goal_reached, .. } => {
                if let Some(idx) = collected {
                    let objective = &level.objectives[idx];
                    events.push(RunEvent::ObjectiveCollected {
                        id: objective.id.clone(),
                        cell: objective.cell(),
                    });
                }
                if goal_reached {
                    // Run ends here; queued commands are never applied.
                    self.state = RunState::Completed;
                    events.push(RunEvent::Completed);
                } else {
                    self.arm_next_or_exhaust(&mut events);
                }
            }
            StepOutcome::Turned(_) | StepOutcome::LightActivated => {
                self.arm_next_or_exhaust(&mut events);
            }
        }

        events
    }

    fn arm_next_or_exhaust(&mut self, events: &mut Vec<RunEvent>) {
        if self.cursor >= self.sequence.len() {
            self.state = RunState::Exhausted;
            events.push(RunEvent::Exhausted);
        } else {
            self.delay = self.pacing.step_ticks;
        }
    }
}
