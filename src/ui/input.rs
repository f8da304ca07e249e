/// Keyboard input tracker.
///
/// The sequencer is entirely edge-triggered (pick, add, launch), so this
/// is a per-frame drain of crossterm key events with no held-key state.
/// Repeat events count as presses so cursor movement auto-repeats.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

pub struct InputState {
    pressed: Vec<KeyCode>,
    ctrl_c: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            pressed: Vec::with_capacity(8),
            ctrl_c: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame, before
    /// phase handling.
    pub fn drain_events(&mut self) {
        self.pressed.clear();
        self.ctrl_c = false;

        while let Ok(true) = event::poll(Duration::from_millis(0)) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        self.ctrl_c = true;
                    }
                    self.pressed.push(key.code);
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    }

    pub fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        self.pressed.iter().any(|k| keys.contains(k))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }
}
