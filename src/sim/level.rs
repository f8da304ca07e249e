/// Level catalog: built-in missions plus an optional override directory.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.toml` files, sorted by filename)
///   2. Built-in embedded missions
///
/// ## Level file format (`.toml`):
///   ```toml
///   id = 4
///   name = "Sample Return"
///   grid_size = 6
///   max_steps = 18
///   start = { x = 0, y = 0 }
///   heading = "right"
///   goal = { x = 5, y = 5 }
///   victory = "Both samples secured."
///   obstacles = [ { x = 1, y = 2 }, { x = 3, y = 1 } ]
///   objectives = [ { id = "S1", x = 2, y = 3 }, { id = "S2", x = 4, y = 1 } ]
///   ```
///
/// `obstacles`, `objectives`, and `victory` may be omitted. A level with
/// no objectives is a plain navigation mission; with objectives, they
/// must be visited in list order before the goal counts.

use std::path::Path;

use serde::Deserialize;

use crate::domain::grid::{Cell, Heading};

/// An ordered collection target. `id` is the display identifier carried
/// by collection events.
#[derive(Clone, Debug, Deserialize)]
pub struct Objective {
    pub id: String,
    pub x: usize,
    pub y: usize,
}

impl Objective {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

/// What occupies a cell, as far as the board display is concerned.
/// Derived from level data; the renderer overlays the rover on top.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellKind {
    Empty,
    Obstacle,
    Objective(usize),
    Goal,
}

/// Immutable level definition. Catalog position is the load index; `id`
/// is the display number shown in the header.
#[derive(Clone, Debug, Deserialize)]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub grid_size: usize,
    pub start: Cell,
    pub heading: Heading,
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    pub goal: Cell,
    pub max_steps: usize,
    #[serde(default)]
    pub victory: String,
}

impl Level {
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x < self.grid_size && cell.y < self.grid_size
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// Board content at (x, y). Obstacles win over objectives, and an
    /// objective sharing the goal cell is shown as the objective; the
    /// goal marker takes over once it is collected.
    pub fn cell_kind(&self, x: usize, y: usize) -> CellKind {
        let cell = Cell::new(x, y);
        if self.is_obstacle(cell) {
            return CellKind::Obstacle;
        }
        if let Some(idx) = self.objectives.iter().position(|o| o.cell() == cell) {
            return CellKind::Objective(idx);
        }
        if cell == self.goal {
            return CellKind::Goal;
        }
        CellKind::Empty
    }

    /// Check the structural invariants: everything in bounds, obstacles
    /// disjoint from start, goal, and objectives. Objectives may share
    /// the goal cell.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size == 0 {
            return Err(format!("level {}: grid_size must be positive", self.id));
        }
        if self.max_steps == 0 {
            return Err(format!("level {}: max_steps must be positive", self.id));
        }
        if !self.in_bounds(self.start) {
            return Err(format!("level {}: start is outside the grid", self.id));
        }
        if !self.in_bounds(self.goal) {
            return Err(format!("level {}: goal is outside the grid", self.id));
        }
        if self.is_obstacle(self.start) {
            return Err(format!("level {}: start sits on an obstacle", self.id));
        }
        if self.is_obstacle(self.goal) {
            return Err(format!("level {}: goal sits on an obstacle", self.id));
        }
        for obstacle in &self.obstacles {
            if !self.in_bounds(*obstacle) {
                return Err(format!("level {}: obstacle outside the grid", self.id));
            }
        }
        for objective in &self.objectives {
            if !self.in_bounds(objective.cell()) {
                return Err(format!(
                    "level {}: objective {} is outside the grid",
                    self.id, objective.id
                ));
            }
            if self.is_obstacle(objective.cell()) {
                return Err(format!(
                    "level {}: objective {} sits on an obstacle",
                    self.id, objective.id
                ));
            }
        }
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Catalog loading
// ══════════════════════════════════════════════════════════════

/// Load the level catalog. The override directory wins when it yields at
/// least one valid level; otherwise the embedded missions are used.
pub fn load_catalog(levels_dir: &Path) -> Vec<Level> {
    if levels_dir.is_dir() {
        let levels = load_from_directory(levels_dir);
        if !levels.is_empty() {
            return levels;
        }
    }
    embedded_levels()
}

/// Parse and validate one level from TOML text.
pub fn parse_level_str(content: &str) -> Result<Level, String> {
    let level: Level = toml::from_str(content).map_err(|e| e.to_string())?;
    level.validate()?;
    Ok(level)
}

/// Individual `.toml` files, sorted by filename. Invalid files are
/// skipped with a warning (this runs before the terminal UI starts).
fn load_from_directory(dir: &Path) -> Vec<Level> {
    let mut named: Vec<(String, Level)> = vec![];

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return vec![],
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().map_or(false, |e| e == "toml") {
            continue;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
                continue;
            }
        };
        match parse_level_str(&content) {
            Ok(level) => {
                let filename = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                named.push((filename, level));
            }
            Err(e) => eprintln!("Warning: skipping {}: {e}", path.display()),
        }
    }

    named.sort_by(|a, b| a.0.cmp(&b.0));
    named.into_iter().map(|(_, level)| level).collect()
}

// ══════════════════════════════════════════════════════════════
// Embedded missions
// ══════════════════════════════════════════════════════════════

fn embedded_levels() -> Vec<Level> {
    vec![
        mission(
            1,
            "Advanced Navigation",
            7,
            (0, 3),
            Heading::Right,
            &[
                (1, 1), (1, 2), (1, 4), (1, 5),
                (3, 0), (3, 1), (3, 2), (3, 4), (3, 5), (3, 6),
                (5, 1), (5, 2), (5, 4), (5, 5),
            ],
            &[],
            (6, 3),
            20,
            "Basic calibration complete! The next map demands more precision.",
        ),
        mission(
            2,
            "Calibration Route",
            6,
            (0, 0),
            Heading::Right,
            &[(2, 1), (2, 2), (2, 3), (3, 3)],
            &[],
            (5, 5),
            15,
            "Impressive navigation! The obstacles are behind you. The labyrinth awaits...",
        ),
        mission(
            3,
            "Labyrinth Challenge",
            8,
            (0, 0),
            Heading::Right,
            &[
                (1, 1), (2, 1), (3, 1), (4, 1), (5, 1),
                (1, 3), (2, 3), (3, 3), (4, 3),
                (6, 2), (6, 3), (6, 4), (6, 5),
                (2, 5), (3, 5), (4, 5),
                (1, 6), (4, 7),
            ],
            &[],
            (7, 7),
            30,
            "Labyrinth conquered! Calibration logs uploaded to mission control.",
        ),
        mission(
            4,
            "Sample Return",
            6,
            (0, 0),
            Heading::Right,
            &[(1, 2), (3, 1), (2, 4)],
            &[("S1", 2, 3), ("S2", 4, 1)],
            (5, 5),
            18,
            "Both samples secured and delivered. The full survey is next.",
        ),
        mission(
            5,
            "Full Survey",
            7,
            (0, 0),
            Heading::Right,
            &[(2, 0), (2, 1), (5, 2), (4, 4), (1, 5)],
            &[("S1", 3, 3), ("S2", 6, 0), ("S3", 0, 6)],
            (6, 6),
            45,
            "MISSION COMPLETE! You are officially a master navigator!",
        ),
    ]
}

fn mission(
    id: u32,
    name: &str,
    grid_size: usize,
    start: (usize, usize),
    heading: Heading,
    obstacles: &[(usize, usize)],
    objectives: &[(&str, usize, usize)],
    goal: (usize, usize),
    max_steps: usize,
    victory: &str,
) -> Level {
    Level {
        id,
        name: name.to_string(),
        grid_size,
        start: Cell::new(start.0, start.1),
        heading,
        obstacles: obstacles.iter().map(|&(x, y)| Cell::new(x, y)).collect(),
        objectives: objectives
            .iter()
            .map(|&(oid, x, y)| Objective { id: oid.to_string(), x, y })
            .collect(),
        goal: Cell::new(goal.0, goal.1),
        max_steps,
        victory: victory.to_string(),
    }
}
