/// The command interpreter: applies one command to the rover.
///
/// Processing order for a forward move:
///   1. Bounds check on the candidate cell
///   2. Obstacle check
///   3. Commit the new position
///   4. Ordered-objective pickup (at most one per move)
///   5. Goal check
///
/// Pickup is checked before the goal so an objective sharing the goal
/// cell is never skipped, and both checks run only against the single
/// freshly committed cell. A failed move leaves the rover untouched;
/// the playback controller owns the reset that follows a crash.

use crate::domain::command::Command;
use crate::domain::grid::Cell;
use crate::domain::rover::RoverState;

use super::event::{CrashReason, StepOutcome};
use super::level::Level;

pub fn apply_command(rover: &mut RoverState, level: &Level, command: Command) -> StepOutcome {
    match command {
        Command::TurnRight => {
            rover.heading = rover.heading.turned_right();
            StepOutcome::Turned(rover.heading)
        }
        Command::TurnLeft => {
            rover.heading = rover.heading.turned_left();
            StepOutcome::Turned(rover.heading)
        }
        Command::ActivateLight => StepOutcome::LightActivated,
        Command::MoveForward => move_forward(rover, level),
    }
}

fn move_forward(rover: &mut RoverState, level: &Level) -> StepOutcome {
    let (dx, dy) = rover.heading.delta();
    let nx = rover.position.x as i32 + dx;
    let ny = rover.position.y as i32 + dy;
    let size = level.grid_size as i32;

    if nx < 0 || nx >= size || ny < 0 || ny >= size {
        return StepOutcome::Crashed(CrashReason::OutOfBounds);
    }
    let target = Cell::new(nx as usize, ny as usize);
    if level.is_obstacle(target) {
        return StepOutcome::Crashed(CrashReason::Obstacle);
    }

    rover.position = target;

    // Only the next objective in sequence can be collected, and the
    // pointer advances by exactly one even if later objectives share
    // this cell.
    let mut collected = None;
    if rover.collected < level.objectives.len()
        && level.objectives[rover.collected].cell() == target
    {
        collected = Some(rover.collected);
        rover.collected += 1;
    }

    let goal_reached = rover.collected == level.objectives.len() && target == level.goal;

    StepOutcome::Moved { position: target, collected, goal_reached }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Heading;
    use crate::sim::level::Objective;

    /// 6×6 collection mission: two ordered samples, then the far corner.
    fn survey_level() -> Level {
        Level {
            id: 90,
            name: "Survey".into(),
            grid_size: 6,
            start: Cell::new(0, 0),
            heading: Heading::Right,
            obstacles: vec![Cell::new(1, 2), Cell::new(3, 1), Cell::new(2, 4)],
            objectives: vec![
                Objective { id: "S1".into(), x: 2, y: 3 },
                Objective { id: "S2".into(), x: 4, y: 1 },
            ],
            goal: Cell::new(5, 5),
            max_steps: 18,
            victory: String::new(),
        }
    }

    fn rover_at(level: &Level) -> RoverState {
        RoverState::new(level.start, level.heading)
    }

    /// Drive the rover through a command list, returning the outcomes.
    fn run(rover: &mut RoverState, level: &Level, commands: &[Command]) -> Vec<StepOutcome> {
        commands
            .iter()
            .map(|&c| apply_command(rover, level, c))
            .collect()
    }

    #[test]
    fn four_right_turns_restore_heading() {
        let level = survey_level();
        for heading in [Heading::Up, Heading::Right, Heading::Down, Heading::Left] {
            let mut rover = RoverState::new(level.start, heading);
            run(&mut rover, &level, &[Command::TurnRight; 4]);
            assert_eq!(rover.heading, heading);
            run(&mut rover, &level, &[Command::TurnLeft; 4]);
            assert_eq!(rover.heading, heading);
        }
    }

    #[test]
    fn turning_never_moves() {
        let level = survey_level();
        let mut rover = rover_at(&level);
        let outcome = apply_command(&mut rover, &level, Command::TurnLeft);
        assert_eq!(outcome, StepOutcome::Turned(Heading::Up));
        assert_eq!(rover.position, level.start);
    }

    #[test]
    fn light_is_a_pure_no_op() {
        let level = survey_level();
        let mut rover = rover_at(&level);
        rover.collected = 1;
        let before = rover.clone();
        let outcome = apply_command(&mut rover, &level, Command::ActivateLight);
        assert_eq!(outcome, StepOutcome::LightActivated);
        assert_eq!(rover.position, before.position);
        assert_eq!(rover.heading, before.heading);
        assert_eq!(rover.collected, before.collected);
    }

    #[test]
    fn first_move_from_start_lands_beside_it() {
        let level = survey_level();
        let mut rover = rover_at(&level);
        let outcome = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                position: Cell::new(1, 0),
                collected: None,
                goal_reached: false,
            }
        );
    }

    #[test]
    fn every_move_is_one_step_or_a_crash() {
        // Sweep all headings from a few cells; a move either advances the
        // rover exactly one cardinal step or leaves it in place crashed.
        let level = survey_level();
        for x in 0..level.grid_size {
            for y in 0..level.grid_size {
                let from = Cell::new(x, y);
                if level.is_obstacle(from) {
                    continue;
                }
                for heading in [Heading::Up, Heading::Right, Heading::Down, Heading::Left] {
                    let mut rover = RoverState::new(from, heading);
                    match apply_command(&mut rover, &level, Command::MoveForward) {
                        StepOutcome::Crashed(_) => assert_eq!(rover.position, from),
                        StepOutcome::Moved { position, .. } => {
                            let dist = (position.x as i32 - from.x as i32).abs()
                                + (position.y as i32 - from.y as i32).abs();
                            assert_eq!(dist, 1);
                            assert_eq!(rover.position, position);
                        }
                        other => panic!("unexpected outcome {other:?}"),
                    }
                }
            }
        }
    }

    #[test]
    fn boundary_crash_on_every_edge() {
        let level = survey_level();
        let last = level.grid_size - 1;
        let cases = [
            (Cell::new(0, 0), Heading::Left),
            (Cell::new(0, 0), Heading::Up),
            (Cell::new(last, last), Heading::Right),
            (Cell::new(last, last), Heading::Down),
        ];
        for (start, heading) in cases {
            let mut rover = RoverState::new(start, heading);
            let outcome = apply_command(&mut rover, &level, Command::MoveForward);
            assert_eq!(outcome, StepOutcome::Crashed(CrashReason::OutOfBounds));
            assert_eq!(rover.position, start);
            assert_eq!(rover.heading, heading);
        }
    }

    #[test]
    fn obstacle_crash_leaves_rover_in_place() {
        let level = survey_level();
        // (1,2) is a rock; approach it from (0,2)
        let mut rover = RoverState::new(Cell::new(0, 2), Heading::Right);
        let outcome = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(outcome, StepOutcome::Crashed(CrashReason::Obstacle));
        assert_eq!(rover.position, Cell::new(0, 2));
    }

    #[test]
    fn out_of_order_objective_is_not_collected() {
        let level = survey_level();
        // Walk onto S2's cell (4,1) before S1 has been collected.
        let mut rover = RoverState::new(Cell::new(4, 0), Heading::Down);
        let outcome = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                position: Cell::new(4, 1),
                collected: None,
                goal_reached: false,
            }
        );
        assert_eq!(rover.collected, 0);
    }

    #[test]
    fn goal_visit_before_objectives_does_not_complete() {
        let level = survey_level();
        let mut rover = RoverState::new(Cell::new(5, 4), Heading::Down);
        let outcome = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                position: Cell::new(5, 5),
                collected: None,
                goal_reached: false,
            }
        );
    }

    #[test]
    fn ordered_collection_then_goal() {
        let level = survey_level();
        let mut rover = RoverState::new(Cell::new(2, 2), Heading::Down);

        // Onto S1 at (2,3)
        let first = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            first,
            StepOutcome::Moved {
                position: Cell::new(2, 3),
                collected: Some(0),
                goal_reached: false,
            }
        );

        // Onto S2 at (4,1): up to row 1, then right.
        rover.position = Cell::new(4, 0);
        rover.heading = Heading::Down;
        let second = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            second,
            StepOutcome::Moved {
                position: Cell::new(4, 1),
                collected: Some(1),
                goal_reached: false,
            }
        );

        // Goal now counts.
        rover.position = Cell::new(5, 4);
        rover.heading = Heading::Down;
        let last = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            last,
            StepOutcome::Moved {
                position: Cell::new(5, 5),
                collected: None,
                goal_reached: true,
            }
        );
    }

    #[test]
    fn final_objective_on_goal_cell_collects_and_completes() {
        let mut level = survey_level();
        level.objectives = vec![Objective { id: "S1".into(), x: 5, y: 5 }];
        let mut rover = RoverState::new(Cell::new(5, 4), Heading::Down);
        let outcome = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                position: Cell::new(5, 5),
                collected: Some(0),
                goal_reached: true,
            }
        );
    }

    #[test]
    fn stacked_objectives_collect_one_per_visit() {
        let mut level = survey_level();
        level.objectives = vec![
            Objective { id: "A".into(), x: 1, y: 0 },
            Objective { id: "B".into(), x: 1, y: 0 },
        ];
        let mut rover = rover_at(&level);

        let first = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            first,
            StepOutcome::Moved {
                position: Cell::new(1, 0),
                collected: Some(0),
                goal_reached: false,
            }
        );
        assert_eq!(rover.collected, 1);

        // Step off and back on: the second stacked objective collects now.
        rover.position = Cell::new(0, 0);
        let second = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            second,
            StepOutcome::Moved {
                position: Cell::new(1, 0),
                collected: Some(1),
                goal_reached: false,
            }
        );
        assert_eq!(rover.collected, 2);
    }

    #[test]
    fn plain_navigation_completes_on_goal() {
        // No objectives: the collection gate degrades to a no-op.
        let mut level = survey_level();
        level.objectives.clear();
        let mut rover = RoverState::new(Cell::new(5, 4), Heading::Down);
        let outcome = apply_command(&mut rover, &level, Command::MoveForward);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                position: Cell::new(5, 5),
                collected: None,
                goal_reached: true,
            }
        );
    }
}
