/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Every glyph used here is single terminal column wide, which keeps the
/// buffer a plain char grid.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::domain::command::Command;
use crate::sim::level::CellKind;
use crate::sim::playback::RunState;

use super::app::{App, Phase};

// ── Palette ──

/// Explicit dark background for every cell, so inter-row gap pixels on
/// VTE-based terminals match the cell color exactly.
const BASE_BG: Color = Color::Rgb { r: 26, g: 16, b: 12 };
const DIM: Color = Color::Rgb { r: 120, g: 95, b: 80 };
const DUST: Color = Color::Rgb { r: 70, g: 50, b: 40 };
const ROVER: Color = Color::Rgb { r: 120, g: 230, b: 120 };
const ROCK: Color = Color::Rgb { r: 170, g: 90, b: 60 };
const SAMPLE: Color = Color::Cyan;
const TARGET: Color = Color::Yellow;
const FLASH_BG: Color = Color::Rgb { r: 130, g: 110, b: 20 };
const EXEC_BG: Color = Color::Rgb { r: 90, g: 40, b: 30 };

fn command_color(command: Command) -> Color {
    match command {
        Command::MoveForward => Color::Green,
        Command::TurnRight => Color::Blue,
        Command::TurnLeft => Color::Yellow,
        Command::ActivateLight => Color::Rgb { r: 240, g: 150, b: 40 },
    }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };

const LEFT_MARGIN: usize = 2;
const SLOTS_PER_ROW: usize = 10;

pub struct Renderer {
    out: BufWriter<Stdout>,
    front: Vec<Cell>,
    back: Vec<Cell>,
    width: usize,
    height: usize,
    force_full: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            out: BufWriter::new(io::stdout()),
            front: vec![],
            back: vec![],
            width: 0,
            height: 0,
            force_full: true,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, ResetColor, Clear(ClearType::All), Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn render(&mut self, app: &App) -> io::Result<()> {
        let (tw, th) = terminal::size()?;
        let (tw, th) = (tw as usize, th as usize);
        if tw == 0 || th == 0 {
            return Ok(());
        }
        if tw != self.width || th != self.height {
            self.width = tw;
            self.height = th;
            self.front = vec![BLANK; tw * th];
            self.back = vec![BLANK; tw * th];
            self.force_full = true;
            queue!(self.out, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        self.front.fill(BLANK);

        if self.width < 44 || self.height < 18 {
            self.put_str(0, 0, "Terminal too small (need 44x18)", Color::White, BASE_BG);
        } else {
            match app.phase {
                Phase::Title => self.draw_title(app),
                Phase::LevelSelect => self.draw_level_select(app),
                Phase::Playing => self.draw_playing(app),
                Phase::LevelComplete => self.draw_level_complete(app),
                Phase::GameComplete => self.draw_game_complete(app),
            }
        }

        self.flush_diff()
    }

    // ── Buffer primitives ──

    fn put(&mut self, x: usize, y: usize, ch: char, fg: Color, bg: Color) {
        if x < self.width && y < self.height {
            self.front[y * self.width + x] = Cell { ch, fg, bg };
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i, y, ch, fg, bg);
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    // ── Screens ──

    fn draw_title(&mut self, app: &App) {
        let mid = self.height / 2;
        self.put_centered(mid.saturating_sub(6), "A . U . R . O . R . A .", TARGET, BASE_BG);
        self.put_centered(mid.saturating_sub(4), "SEQUENCE CALIBRATION CONSOLE", Color::White, BASE_BG);
        self.put_centered(
            mid.saturating_sub(2),
            &format!("{} missions loaded", app.session.catalog().len()),
            DIM,
            BASE_BG,
        );

        // Slow blink gated on the animation tick.
        if app.anim_tick % 20 < 14 {
            self.put_centered(mid + 1, "[ENTER] Begin calibration", ROVER, BASE_BG);
        }
        self.put_centered(mid + 3, "[L] Select mission    [Q] Quit", DIM, BASE_BG);

        if !app.message.is_empty() {
            self.put_centered(self.height - 2, &app.message, TARGET, BASE_BG);
        }
    }

    fn draw_level_select(&mut self, app: &App) {
        self.put_str(LEFT_MARGIN, 1, "SELECT MISSION", Color::White, BASE_BG);
        for (i, level) in app.session.catalog().iter().enumerate() {
            let y = 3 + i;
            let selected = i == app.select_cursor;
            let (fg, marker) = if selected { (TARGET, '>') } else { (DIM, ' ') };
            let line = format!(
                "{} {}. {}  ({}x{}, {} slots{})",
                marker,
                level.id,
                level.name,
                level.grid_size,
                level.grid_size,
                level.max_steps,
                if level.objectives.is_empty() {
                    String::new()
                } else {
                    format!(", {} samples", level.objectives.len())
                },
            );
            self.put_str(LEFT_MARGIN, y, &line, fg, BASE_BG);
        }
        self.put_str(
            LEFT_MARGIN,
            4 + app.session.catalog().len(),
            "[ENTER] Start    [ESC] Back",
            DIM,
            BASE_BG,
        );
    }

    fn draw_playing(&mut self, app: &App) {
        let level = app.session.level();
        let rover = &app.session.rover;

        // ── Header ──
        let header = format!("LEVEL {}  {}", level.id, level.name);
        self.put_str(LEFT_MARGIN, 0, &header, Color::White, BASE_BG);
        let clock = format!("[{}]", app.elapsed_display());
        let clock_x = self.width.saturating_sub(clock.len() + LEFT_MARGIN);
        self.put_str(clock_x, 0, &clock, DIM, BASE_BG);

        let mut progress = format!("Steps: {}/{}", app.sequence.len(), level.max_steps);
        if !level.objectives.is_empty() {
            progress.push_str(&format!(
                "   Samples: {}/{}",
                rover.collected,
                level.objectives.len()
            ));
        }
        self.put_str(LEFT_MARGIN, 1, &progress, DIM, BASE_BG);

        // ── Board ──
        let board_top = 3;
        for y in 0..level.grid_size {
            for x in 0..level.grid_size {
                let px = LEFT_MARGIN + x * 2;
                let py = board_top + y;

                let (text, fg, bg): (String, Color, Color) =
                    if rover.position.x == x && rover.position.y == y {
                        let bg = if app.light_ticks > 0 { FLASH_BG } else { BASE_BG };
                        (format!("{} ", rover.heading.glyph()), ROVER, bg)
                    } else {
                        match level.cell_kind(x, y) {
                            CellKind::Obstacle => ("# ".into(), ROCK, BASE_BG),
                            CellKind::Objective(idx) if idx < rover.collected => {
                                ("· ".into(), DUST, BASE_BG)
                            }
                            CellKind::Objective(idx) => {
                                let id: String = level.objectives[idx].id.chars().take(2).collect();
                                (format!("{id:<2}"), SAMPLE, BASE_BG)
                            }
                            CellKind::Goal => ("X ".into(), TARGET, BASE_BG),
                            CellKind::Empty => ("· ".into(), DUST, BASE_BG),
                        }
                    };
                for (i, ch) in text.chars().enumerate() {
                    self.put(px + i, py, ch, fg, bg);
                }
            }
        }

        // ── Command palette ──
        let palette_y = board_top + level.grid_size + 1;
        self.put_str(LEFT_MARGIN, palette_y, "Commands:", DIM, BASE_BG);
        let mut x = LEFT_MARGIN + 10;
        for (i, &command) in Command::PALETTE.iter().enumerate() {
            let selected = i == app.palette_cursor;
            let text = format!("[{} {}]", command.glyph(), command.label());
            let fg = command_color(command);
            let bg = if selected { EXEC_BG } else { BASE_BG };
            self.put_str(x, palette_y, &text, fg, bg);
            x += text.chars().count() + 1;
        }

        // ── Sequence slots ──
        let slots_y = palette_y + 2;
        self.put_str(LEFT_MARGIN, slots_y, "Sequence:", DIM, BASE_BG);
        let executing = app.session.playback.current_step();
        for slot in 0..level.max_steps {
            let row = slot / SLOTS_PER_ROW;
            let col = slot % SLOTS_PER_ROW;
            let px = LEFT_MARGIN + 10 + col * 5;
            let py = slots_y + row;

            let num = format!("{:02}", slot + 1);
            let is_exec = executing == Some(slot);
            let bg = if is_exec { EXEC_BG } else { BASE_BG };
            self.put_str(px, py, &num, if is_exec { Color::White } else { DUST }, bg);
            match app.sequence.get(slot) {
                Some(&command) => {
                    self.put(px + 2, py, command.glyph(), command_color(command), bg)
                }
                None => self.put(px + 2, py, '·', DUST, bg),
            }
        }

        // ── Status / message / help ──
        let status_y = slots_y + (level.max_steps + SLOTS_PER_ROW - 1) / SLOTS_PER_ROW + 1;
        let run_note = match app.session.playback.state() {
            RunState::Running => "RUNNING",
            RunState::Crashed => "CRASHED",
            RunState::Completed => "COMPLETE",
            RunState::Exhausted => "EXHAUSTED",
            RunState::Idle => "READY",
        };
        self.put_str(LEFT_MARGIN, status_y, &format!("[{run_note}] "), DIM, BASE_BG);
        self.put_str(LEFT_MARGIN + 12, status_y, &app.status, Color::White, BASE_BG);
        if !app.message.is_empty() {
            self.put_str(LEFT_MARGIN, status_y + 1, &app.message, TARGET, BASE_BG);
        }
        self.put_str(
            LEFT_MARGIN,
            status_y + 3,
            "SPACE/1-4 add  BACKSPACE remove  ENTER launch  C clear/abort  ESC title",
            DUST,
            BASE_BG,
        );
    }

    fn draw_level_complete(&mut self, app: &App) {
        let mid = self.height / 2;
        self.put_centered(mid.saturating_sub(3), "CALIBRATION SUCCESSFUL", ROVER, BASE_BG);
        for (i, line) in wrap(&app.victory_text, self.width.saturating_sub(8)).iter().enumerate() {
            self.put_centered(mid.saturating_sub(1) + i, line, Color::White, BASE_BG);
        }
        self.put_centered(mid + 3, "[ENTER] Next mission    [ESC] Title", DIM, BASE_BG);
    }

    fn draw_game_complete(&mut self, app: &App) {
        let mid = self.height / 2;
        self.put_centered(mid.saturating_sub(4), "M I S S I O N   C O M P L E T E", TARGET, BASE_BG);
        for (i, line) in wrap(&app.victory_text, self.width.saturating_sub(8)).iter().enumerate() {
            self.put_centered(mid.saturating_sub(2) + i, line, Color::White, BASE_BG);
        }
        let time = format!("Total time: {}", app.elapsed_display());
        self.put_centered(mid + 2, &time, ROVER, BASE_BG);
        self.put_centered(mid + 4, "[ENTER] Play again    [ESC] Title", DIM, BASE_BG);
    }

    // ── Diff flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg: Option<Color> = None;
        let mut last_bg: Option<Color> = None;

        for idx in 0..self.front.len() {
            let cell = self.front[idx];
            if !self.force_full && cell == self.back[idx] {
                continue;
            }
            let x = (idx % self.width) as u16;
            let y = (idx / self.width) as u16;
            queue!(self.out, MoveTo(x, y))?;
            if last_fg != Some(cell.fg) {
                queue!(self.out, SetForegroundColor(cell.fg))?;
                last_fg = Some(cell.fg);
            }
            if last_bg != Some(cell.bg) {
                queue!(self.out, SetBackgroundColor(cell.bg))?;
                last_bg = Some(cell.bg);
            }
            queue!(self.out, Print(cell.ch))?;
        }

        self.out.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        self.force_full = false;
        Ok(())
    }
}

/// Greedy word wrap for the victory banners.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(16);
    let mut lines = vec![];
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
