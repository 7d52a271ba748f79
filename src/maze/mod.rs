// MazeRace: Maze Data Model
// Grid, cells, positions and the generation configuration shared by the
// generator, pathfinding and race modules.

pub mod difficulty;
pub mod generator;
pub mod pathfinding;

pub use difficulty::DifficultyTable;
pub use generator::{GeneratedMaze, MazeGenerator};
pub use pathfinding::{shortest_path_length, PathEnumerator, PathError, PathSearchConfig};

use serde::{Deserialize, Serialize};

/// A single cell of the maze grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Path,
    Start,
    Exit,
}

impl Cell {
    /// Whether an agent may stand on this cell
    pub fn is_walkable(&self) -> bool {
        !matches!(self, Cell::Wall)
    }

    /// Single-character map glyph used by the textual renderer
    pub fn glyph(&self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Path => '.',
            Cell::Start => 'S',
            Cell::Exit => 'E',
        }
    }

    fn from_glyph(c: char) -> Option<Cell> {
        match c {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Path),
            'S' => Some(Cell::Start),
            'E' => Some(Cell::Exit),
            _ => None,
        }
    }
}

/// A 0-based (column, row) coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position shifted by an arbitrary delta
    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// The adjacent position one cell away in `direction`
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// One of the four cardinal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in the fixed scan order used throughout the engine
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit delta as (dx, dy); y grows downward
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Canonical lowercase name, the vocabulary oracles answer in
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parse the canonical name back into a direction (case-insensitive)
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim().to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Difficulty presets controlling maze complexity and analysis budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Errors raised while building or loading a maze
#[derive(Debug, thiserror::Error)]
pub enum MazeError {
    #[error("invalid maze config: {width}x{height} (both dimensions must be >= 3)")]
    InvalidConfig { width: u32, height: u32 },

    #[error("malformed grid: {0}")]
    MalformedGrid(String),
}

/// Size and difficulty of a maze to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeConfig {
    pub width: u32,
    pub height: u32,
    pub difficulty: Difficulty,
}

impl MazeConfig {
    pub fn new(width: u32, height: u32, difficulty: Difficulty) -> Self {
        Self {
            width,
            height,
            difficulty,
        }
    }

    /// Reject configs the generator cannot honor. The generator assumes the
    /// start at (1,1) and the exit at (width-2, height-2), both strictly
    /// inside the border wall ring.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.width < 3 || self.height < 3 {
            return Err(MazeError::InvalidConfig {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Rectangular cell grid, immutable once generation completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid of uniform cells; only the generator and tests build grids
    pub(crate) fn filled(width: u32, height: u32, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; (width * height) as usize],
        }
    }

    /// Parse a grid from its rendered form: one row per line, glyphs as
    /// produced by [`Cell::glyph`]. Intended for hand-authored fixtures.
    pub fn from_ascii(art: &str) -> Result<Grid, MazeError> {
        let rows: Vec<&str> = art
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(MazeError::MalformedGrid("empty input".to_string()));
        }
        let width = rows[0].chars().count();
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(MazeError::MalformedGrid(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for c in row.chars() {
                let cell = Cell::from_glyph(c).ok_or_else(|| {
                    MazeError::MalformedGrid(format!("unknown glyph '{}' in row {}", c, y))
                })?;
                cells.push(cell);
            }
        }
        Ok(Grid {
            width: width as u32,
            height: rows.len() as u32,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y as u32 * self.width + pos.x as u32) as usize)
        } else {
            None
        }
    }

    /// The cell at `pos`, or `None` when out of bounds
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// In bounds and not a wall
    pub fn is_walkable(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(c) if c.is_walkable())
    }

    /// Number of cells equal to `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// First cell equal to `cell` in raster order
    pub fn find(&self, cell: Cell) -> Option<Position> {
        self.cells.iter().position(|&c| c == cell).map(|i| {
            Position::new((i as u32 % self.width) as i32, (i as u32 / self.width) as i32)
        })
    }

    /// Every walkable position in raster order
    pub fn walkable_positions(&self) -> Vec<Position> {
        let mut out = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = Position::new(x, y);
                if self.is_walkable(pos) {
                    out.push(pos);
                }
            }
        }
        out
    }

    /// Textual rendering, one row per line
    pub fn render(&self) -> String {
        self.render_with_agents(&[])
    }

    /// Textual rendering with agent glyphs overlaid on their positions.
    /// Later entries win when two agents share a cell.
    pub fn render_with_agents(&self, agents: &[(char, Position)]) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = Position::new(x, y);
                let overlay = agents
                    .iter()
                    .rev()
                    .find(|(_, p)| *p == pos)
                    .map(|(glyph, _)| *glyph);
                match overlay {
                    Some(glyph) => out.push(glyph),
                    None => match self.cell(pos) {
                        Some(cell) => out.push(cell.glyph()),
                        None => {}
                    },
                }
            }
            if y + 1 < self.height as i32 {
                out.push('\n');
            }
        }
        out
    }
}
