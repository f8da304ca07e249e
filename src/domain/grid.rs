/// Grid geometry: cells and headings.
///
/// Coordinates use a top-left origin: x grows rightward, y grows downward,
/// so `Up` decrements y. Valid coordinates for a level of size N are
/// integers in [0, N) on both axes.

use serde::Deserialize;

/// A single grid cell, addressed by column (x) and row (y).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Cell { x, y }
    }
}

/// Rover facing direction, cyclic under quarter turns.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    /// Heading after a clockwise quarter turn.
    pub fn turned_right(self) -> Heading {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }

    /// Heading after a counter-clockwise quarter turn.
    pub fn turned_left(self) -> Heading {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
        }
    }

    /// Unit step for one forward move. Signed so callers can bounds-check
    /// the candidate cell before committing to unsigned coordinates.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
        }
    }

    /// Single-width glyph for the rover marker.
    pub fn glyph(self) -> char {
        match self {
            Heading::Up => '^',
            Heading::Right => '>',
            Heading::Down => 'v',
            Heading::Left => '<',
        }
    }
}
