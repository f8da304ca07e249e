/// Session: the one engine instance the presentation layer drives.
///
/// Owns the level catalog, the rover, and the playback controller, and
/// splits their borrows so playback can mutate the rover against the
/// immutable current level. Everything the UI needs goes through here:
/// `load_level`, `launch`, `cancel`, and the per-tick `tick`.

use crate::config::PacingConfig;
use crate::domain::command::Command;
use crate::domain::rover::RoverState;

use super::event::RunEvent;
use super::level::Level;
use super::playback::PlaybackController;

pub struct Session {
    catalog: Vec<Level>,
    current: usize,
    pub rover: RoverState,
    pub playback: PlaybackController,
}

impl Session {
    /// Build a session on a non-empty catalog (the loader guarantees the
    /// embedded fallback) and park the rover on the first level's start.
    pub fn new(catalog: Vec<Level>, pacing: PacingConfig) -> Self {
        assert!(!catalog.is_empty(), "level catalog must not be empty");
        let rover = RoverState::new(catalog[0].start, catalog[0].heading);
        Session {
            catalog,
            current: 0,
            rover,
            playback: PlaybackController::new(pacing),
        }
    }

    pub fn level(&self) -> &Level {
        &self.catalog[self.current]
    }

    pub fn catalog(&self) -> &[Level] {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_final_level(&self) -> bool {
        self.current + 1 == self.catalog.len()
    }

    /// Select a level by catalog position, resetting the rover and any
    /// run in flight. Returns false (no state change) when out of range.
    pub fn load_level(&mut self, index: usize) -> bool {
        if index >= self.catalog.len() {
            return false;
        }
        self.current = index;
        self.playback.reset();
        let level = &self.catalog[index];
        self.rover.reset_to(level.start, level.heading);
        true
    }

    pub fn launch(&mut self, sequence: &[Command]) -> bool {
        let Session { catalog, current, rover, playback } = self;
        playback.launch(sequence, rover, &catalog[*current])
    }

    pub fn cancel(&mut self) {
        let Session { catalog, current, rover, playback } = self;
        playback.cancel(rover, &catalog[*current]);
    }

    pub fn tick(&mut self) -> Vec<RunEvent> {
        let Session { catalog, current, rover, playback } = self;
        playback.tick(rover, &catalog[*current])
    }
}
