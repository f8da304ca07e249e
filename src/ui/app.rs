/// Presentation-side application state: screen phases, the sequence
/// editor, the mission stopwatch, and transient status messaging.
///
/// Simulation semantics live entirely in `sim`; everything here is what
/// a front-end needs to drive it and draw it.

use crate::domain::command::Command;
use crate::sim::session::Session;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    LevelSelect,
    Playing,
    LevelComplete,
    GameComplete,
}

pub struct App {
    pub session: Session,
    pub phase: Phase,

    // ── Sequence editor ──
    pub sequence: Vec<Command>,
    pub palette_cursor: usize,

    // ── Level select ──
    pub select_cursor: usize,

    // ── Status / messaging ──
    pub status: String,
    pub message: String,
    pub message_timer: u32,
    pub victory_text: String,

    // ── Mission stopwatch ──
    pub elapsed_ticks: u64,
    pub tick_rate_ms: u64,

    // ── Cosmetics ──
    pub light_ticks: u32,
    pub anim_tick: u32,
}

impl App {
    pub fn new(session: Session, tick_rate_ms: u64) -> Self {
        App {
            session,
            phase: Phase::Title,
            sequence: vec![],
            palette_cursor: 0,
            select_cursor: 0,
            status: String::from("Build a command sequence, then launch it."),
            message: String::new(),
            message_timer: 0,
            victory_text: String::new(),
            elapsed_ticks: 0,
            tick_rate_ms,
            light_ticks: 0,
            anim_tick: 0,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Tick the transient message timer (runs in every phase).
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }

    /// Stopwatch as MM:SS.
    pub fn elapsed_display(&self) -> String {
        let total_secs = self.elapsed_ticks * self.tick_rate_ms / 1000;
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }

    /// Enter a level: reset the editor, keep the stopwatch running.
    /// Returns false when the index is past the catalog end.
    pub fn start_level(&mut self, index: usize) -> bool {
        if !self.session.load_level(index) {
            return false;
        }
        self.sequence.clear();
        self.palette_cursor = 0;
        self.phase = Phase::Playing;
        let name = self.session.level().name.clone();
        self.set_message(&name, 60);
        self.set_status("Pick commands with ←/→, SPACE to add, ENTER to launch.");
        true
    }

    /// Append the palette-selected command. No-ops while a run is in
    /// flight or when every slot is filled.
    pub fn push_selected_command(&mut self) {
        self.push_command(Command::PALETTE[self.palette_cursor]);
    }

    pub fn push_command(&mut self, command: Command) {
        if self.session.playback.is_running() {
            return;
        }
        if self.sequence.len() >= self.session.level().max_steps {
            self.set_message("Sequence slots are full!", 40);
            return;
        }
        self.sequence.push(command);
        self.set_status("Sequence updated. ENTER to launch.");
    }

    /// Remove the most recently added command.
    pub fn pop_command(&mut self) {
        if self.session.playback.is_running() {
            return;
        }
        if self.sequence.pop().is_some() {
            self.set_status("Removed last command.");
        }
    }

    /// Clear the editor. Mid-run this doubles as an abort: the run is
    /// cancelled and the rover snaps back to the start.
    pub fn clear_sequence(&mut self) {
        if self.session.playback.is_running() {
            self.session.cancel();
            self.set_message("Run aborted.", 40);
        }
        self.sequence.clear();
        self.set_status("Sequence cleared. Build a new one.");
    }

    pub fn launch(&mut self) {
        if self.sequence.is_empty() {
            self.set_message("Add at least one command first.", 40);
            return;
        }
        let sequence = self.sequence.clone();
        if self.session.launch(&sequence) {
            self.set_status("Executing sequence...");
        } else {
            self.set_message("Hold on, the rover is still resetting.", 30);
        }
    }
}
