/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::command::Command;
use sim::event::{CrashReason, RunEvent, StepOutcome};
use sim::level;
use sim::session::Session;
use ui::app::{App, Phase};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// How long the rover cell glows after a light command (ticks).
const LIGHT_FLASH_TICKS: u32 = 10;

fn main() {
    let config = GameConfig::load();
    let catalog = level::load_catalog(&config.levels_dir);
    let session = Session::new(catalog, config.pacing.clone());
    let mut app = App::new(session, config.pacing.tick_rate_ms);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut app, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("A.U.R.O.R.A. signing off. Mission clock: {}", app.elapsed_display());
}

fn game_loop(
    app: &mut App,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.pacing.tick_rate_ms);

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(app, &kb) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            app.anim_tick = app.anim_tick.wrapping_add(1);
            app.tick_message();
            if app.light_ticks > 0 {
                app.light_ticks -= 1;
            }

            // Mission clock runs across level transitions, stopping only
            // once the final victory screen is up (or back at the title).
            if matches!(app.phase, Phase::Playing | Phase::LevelComplete) {
                app.elapsed_ticks += 1;
            }

            if app.phase == Phase::Playing {
                let events = app.session.tick();
                process_run_events(app, &events);
            }

            last_tick = Instant::now();
        }

        renderer.render(app)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// React to playback events: status text, the light flash, and the
/// victory transitions.
fn process_run_events(app: &mut App, events: &[RunEvent]) {
    for event in events {
        match event {
            RunEvent::Step { outcome: StepOutcome::LightActivated, .. } => {
                app.light_ticks = LIGHT_FLASH_TICKS;
                app.set_message("Beacon activated.", 20);
            }
            RunEvent::Step { .. } => {}
            RunEvent::ObjectiveCollected { id, .. } => {
                app.set_message(&format!("Sample {id} secured!"), 40);
            }
            RunEvent::Crashed { reason } => {
                let text = match reason {
                    CrashReason::OutOfBounds => "The rover left the map! Position reset.",
                    CrashReason::Obstacle => "The rover hit a rock! Position reset.",
                };
                app.set_message(text, 60);
                app.set_status("Adjust the sequence and launch again.");
            }
            RunEvent::Completed => {
                let level = app.session.level();
                app.victory_text = if level.victory.is_empty() {
                    String::from("Destination reached!")
                } else {
                    level.victory.clone()
                };
                app.phase = if app.session.is_final_level() {
                    Phase::GameComplete
                } else {
                    Phase::LevelComplete
                };
            }
            RunEvent::Exhausted => {
                app.set_message("Sequence complete, destination not reached.", 60);
                app.set_status("Extend or rework the sequence, then relaunch.");
            }
        }
    }
}

// ── Key Constants ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_ADD: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down];
const KEYS_REMOVE: &[KeyCode] = &[KeyCode::Backspace, KeyCode::Delete];
const KEYS_CLEAR: &[KeyCode] = &[KeyCode::Char('c'), KeyCode::Char('C')];
const KEYS_SELECT: &[KeyCode] = &[KeyCode::Char('l'), KeyCode::Char('L')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Phase-dependent input. Returns true to quit the program.
fn handle_meta(app: &mut App, kb: &InputState) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM);
    let esc = kb.any_pressed(&[KeyCode::Esc]);

    match app.phase {
        // ── Title Screen ──
        Phase::Title => {
            if confirm {
                app.elapsed_ticks = 0;
                let _ = app.start_level(0);
            } else if kb.any_pressed(KEYS_SELECT) {
                app.select_cursor = app.session.current_index();
                app.phase = Phase::LevelSelect;
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return true;
            }
        }

        // ── Mission Select ──
        Phase::LevelSelect => {
            let total = app.session.catalog().len();
            if kb.any_pressed(KEYS_UP) {
                app.select_cursor = app.select_cursor.saturating_sub(1);
            } else if kb.any_pressed(KEYS_DOWN) {
                if app.select_cursor + 1 < total {
                    app.select_cursor += 1;
                }
            } else if confirm {
                app.elapsed_ticks = 0;
                let _ = app.start_level(app.select_cursor);
            } else if esc {
                app.phase = Phase::Title;
            }
        }

        // ── Playing ──
        Phase::Playing => {
            if app.session.playback.is_running() {
                // Mid-run the only controls are the aborts.
                if esc || kb.any_pressed(KEYS_CLEAR) {
                    app.clear_sequence();
                }
                return false;
            }

            if kb.any_pressed(KEYS_LEFT) {
                app.palette_cursor = (app.palette_cursor + Command::PALETTE.len() - 1)
                    % Command::PALETTE.len();
            } else if kb.any_pressed(KEYS_RIGHT) {
                app.palette_cursor = (app.palette_cursor + 1) % Command::PALETTE.len();
            } else if kb.any_pressed(KEYS_ADD) {
                app.push_selected_command();
            } else if kb.any_pressed(KEYS_REMOVE) {
                app.pop_command();
            } else if kb.any_pressed(KEYS_CLEAR) {
                app.clear_sequence();
            } else if confirm {
                app.launch();
            } else if esc {
                app.phase = Phase::Title;
            }

            // Direct palette shortcuts 1-4.
            for (i, &command) in Command::PALETTE.iter().enumerate() {
                let digit = char::from_digit(i as u32 + 1, 10).unwrap_or('0');
                if kb.any_pressed(&[KeyCode::Char(digit)]) {
                    app.palette_cursor = i;
                    app.push_command(command);
                }
            }
        }

        // ── Level Complete ──
        Phase::LevelComplete => {
            if confirm {
                let next = app.session.current_index() + 1;
                if !app.start_level(next) {
                    app.phase = Phase::GameComplete;
                }
            } else if esc {
                app.phase = Phase::Title;
            }
        }

        // ── Game Complete ──
        Phase::GameComplete => {
            if confirm {
                app.elapsed_ticks = 0;
                let _ = app.start_level(0);
            } else if esc {
                app.phase = Phase::Title;
            }
        }
    }

    false
}
