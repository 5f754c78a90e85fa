use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Colors, SetColors},
};
use log::info;

use crate::constants::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::types::Vector2D;
use crate::world::World;

const BACKGROUND: Color = Color::Black;
const WHITE: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const RED: Color = Color::Rgb { r: 255, g: 0, b: 0 };
const BLUE: Color = Color::Rgb { r: 0, g: 100, b: 255 };
const YELLOW: Color = Color::Rgb { r: 255, g: 255, b: 0 };

const SHIP_CHAR: char = 'A';
const FLAME_CHAR: char = '^';
const ASTEROID_CHAR: char = '@';
const CONTROLS_HINT: &str = "Arrows/WASD: move  Esc/q: quit";

// --- ScreenBuffer for headless rendering ---
pub struct ScreenBuffer {
    buffer: Vec<Vec<char>>,
    width: u16,
    height: u16,
    cursor_x: u16,
    cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.cursor_y < self.height && self.cursor_x < self.width {
                self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
            }
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn row_text(&self, y: u16) -> String {
        self.buffer.get(y as usize).map(|row| row.iter().collect()).unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for y in 0..self.height {
            info!("{}", self.row_text(y));
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget: the real terminal or a ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn queue_move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, MoveTo(x, y)),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(x, y);
                Ok(())
            }
        }
    }

    pub fn set_color(&mut self, color: Color) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, SetColors(Colors::new(color, BACKGROUND))),
            OutputTarget::ScreenBuffer(_) => Ok(()), // Colour is lost in headless output
        }
    }

    /// Logs headless frames, no-op on a real terminal.
    pub fn log_frame(&self) {
        if let OutputTarget::ScreenBuffer(sb) = self {
            sb.print_to_log();
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub ch: char,
    pub color: Color,
}

impl GridCell {
    const BLANK: GridCell = GridCell { ch: ' ', color: WHITE };
}

// --- GameGrid: the 800x600 world projected onto character cells ---
pub struct GameGrid {
    cells: Vec<Vec<GridCell>>,
    width: u16,
    height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            cells: vec![vec![GridCell::BLANK; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width != width || self.height != height {
            *self = GameGrid::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(GridCell::BLANK);
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<GridCell> {
        self.cells.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    pub fn set_char(&mut self, x: u16, y: u16, ch: char, color: Color) {
        if y < self.height && x < self.width {
            self.cells[y as usize][x as usize] = GridCell { ch, color };
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, s: &str, color: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set_char(x.saturating_add(i as u16), y, ch, color);
        }
    }

    pub fn put_centered(&mut self, y: u16, s: &str, color: Color) {
        let x = self.width.saturating_sub(s.chars().count() as u16) / 2;
        self.put_str(x, y, s, color);
    }

    fn cell_size(&self) -> (f64, f64) {
        (WORLD_WIDTH / f64::from(self.width.max(1)), WORLD_HEIGHT / f64::from(self.height.max(1)))
    }

    /// The cell covering world point `p`, if it is on screen.
    pub fn world_to_cell(&self, p: Vector2D) -> Option<(u16, u16)> {
        if p.x < 0.0 || p.y < 0.0 || p.x >= WORLD_WIDTH || p.y >= WORLD_HEIGHT {
            return None;
        }
        let (cell_w, cell_h) = self.cell_size();
        let col = ((p.x / cell_w) as u16).min(self.width.saturating_sub(1));
        let row = ((p.y / cell_h) as u16).min(self.height.saturating_sub(1));
        Some((col, row))
    }

    pub fn cell_center(&self, col: u16, row: u16) -> Vector2D {
        let (cell_w, cell_h) = self.cell_size();
        Vector2D::new((f64::from(col) + 0.5) * cell_w, (f64::from(row) + 0.5) * cell_h)
    }

    /// Fills cells whose centre is inside the polygon. A polygon smaller than a
    /// cell still marks the cell under its centroid.
    pub fn fill_polygon(&mut self, points: &[Vector2D], ch: char, color: Color) {
        if points.is_empty() || self.width == 0 || self.height == 0 {
            return;
        }
        let (cell_w, cell_h) = self.cell_size();
        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        let last_col = f64::from(self.width - 1);
        let last_row = f64::from(self.height - 1);
        let col_start = (min_x / cell_w).floor().clamp(0.0, last_col) as u16;
        let col_end = (max_x / cell_w).floor().clamp(0.0, last_col) as u16;
        let row_start = (min_y / cell_h).floor().clamp(0.0, last_row) as u16;
        let row_end = (max_y / cell_h).floor().clamp(0.0, last_row) as u16;

        let mut filled = false;
        for row in row_start..=row_end {
            for col in col_start..=col_end {
                if polygon_contains(points, self.cell_center(col, row)) {
                    self.set_char(col, row, ch, color);
                    filled = true;
                }
            }
        }

        if !filled {
            let count = points.len() as f64;
            let sum = points.iter().fold(Vector2D::new(0.0, 0.0), |acc, p| acc.add(*p));
            if let Some((col, row)) = self.world_to_cell(sum.scale(1.0 / count)) {
                self.set_char(col, row, ch, color);
            }
        }
    }

    pub fn render(&self, out: &mut OutputTarget) -> io::Result<()> {
        let mut current: Option<Color> = None;
        let mut run = String::with_capacity(self.width as usize);
        for (y, row) in self.cells.iter().enumerate() {
            out.queue_move_to(0, y as u16)?;
            for cell in row {
                if current != Some(cell.color) {
                    if !run.is_empty() {
                        out.write_all(run.as_bytes())?;
                        run.clear();
                    }
                    out.set_color(cell.color)?;
                    current = Some(cell.color);
                }
                run.push(cell.ch);
            }
            out.write_all(run.as_bytes())?;
            run.clear();
        }
        Ok(())
    }
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(points: &[Vector2D], p: Vector2D) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn star_char(radius: u8) -> char {
    match radius {
        0 | 1 => '.',
        2 => '+',
        _ => '*',
    }
}

/// Full redraw: background, stars, ship, flame, asteroids, then HUD on top.
pub fn draw_world(grid: &mut GameGrid, world: &World) {
    grid.clear();

    for star in world.stars() {
        if let Some((col, row)) = grid.world_to_cell(star.position) {
            grid.set_char(col, row, star_char(star.radius), WHITE);
        }
    }

    let player = world.player();
    grid.fill_polygon(&player.ship_outline(), SHIP_CHAR, BLUE);
    grid.fill_polygon(&player.flame_outline(), FLAME_CHAR, YELLOW);

    for asteroid in world.asteroids() {
        grid.fill_polygon(&asteroid.outline(), ASTEROID_CHAR, RED);
    }

    grid.put_str(0, 0, &format!("Score: {}", world.score()), WHITE);
    if grid.height() > 2 {
        grid.put_str(0, grid.height() - 1, CONTROLS_HINT, WHITE);
    }
}

pub fn draw_game_over(grid: &mut GameGrid, score: u32) {
    grid.clear();
    let mid = grid.height() / 2;
    grid.put_centered(mid.saturating_sub(3), "GAME OVER", RED);
    grid.put_centered(mid.saturating_sub(1), &format!("Final Score: {}", score), WHITE);
    grid.put_centered(mid + 1, "Press SPACE to play again", WHITE);
    grid.put_centered(mid + 3, "Press ESC to quit", WHITE);
}
