//! Fixed-size cell storage with timed reactivation.

use xorx_core::{Position, Tile, MAP_COLUMNS, MAP_ROWS, VIEW_COLUMNS, VIEW_ROWS};

/// Local 8-bit tick counter. All arithmetic wraps modulo 256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tick(u8);

impl Tick {
    /// Tick at which every screen starts.
    pub const ZERO: Tick = Tick(0);

    /// Creates a tick from its raw value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Raw counter value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Tick that lies `delay` ticks after this one.
    #[must_use]
    pub const fn after(self, delay: u8) -> Self {
        Self(self.0.wrapping_add(delay))
    }

    /// Tick of the following step.
    #[must_use]
    pub const fn next(self) -> Self {
        self.after(1)
    }
}

/// One grid unit: what occupies it and when it next acts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Content of the cell.
    pub tile: Tile,
    /// Local tick at which the cell becomes active. Meaningless for empty cells.
    pub due: Tick,
}

impl Cell {
    /// Open floor.
    pub const EMPTY: Cell = Cell {
        tile: Tile::Empty,
        due: Tick::ZERO,
    };

    /// Cell synthesised for every read outside the grid.
    pub const BOUNDARY: Cell = Cell {
        tile: Tile::SolidWall,
        due: Tick::ZERO,
    };

    /// Creates a cell that becomes active at `due`.
    #[must_use]
    pub const fn new(tile: Tile, due: Tick) -> Self {
        Self { tile, due }
    }

    /// Ticks left until the cell becomes active, counted from `now`.
    #[must_use]
    pub const fn remaining(&self, now: Tick) -> u8 {
        self.due.0.wrapping_sub(now.0)
    }

    /// Rebases the due tick so that a screen resuming at tick zero sees the same
    /// countdown that `resume` would have seen.
    pub fn hibernate(&mut self, resume: Tick) {
        self.due = Tick(self.remaining(resume));
    }
}

/// Row-major storage for every cell of the world.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn new() -> Self {
        let capacity = usize::try_from(MAP_COLUMNS * MAP_ROWS).unwrap_or(0);
        Self {
            cells: vec![Cell::EMPTY; capacity],
        }
    }

    pub(crate) fn get(&self, position: Position) -> Cell {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Cell::BOUNDARY)
    }

    pub(crate) fn set(&mut self, position: Position, cell: Cell) {
        if let Some(index) = self.index(position) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = cell;
            }
        }
    }

    pub(crate) fn clear(&mut self, position: Position) {
        self.set(position, Cell::EMPTY);
    }

    /// Hibernates every cell of the screen anchored at `origin`.
    pub(crate) fn hibernate_screen(&mut self, origin: Position, resume: Tick) {
        for y in origin.y..origin.y + VIEW_ROWS {
            for x in origin.x..origin.x + VIEW_COLUMNS {
                self.hibernate(Position::new(x, y), resume);
            }
        }
    }

    pub(crate) fn hibernate(&mut self, position: Position, resume: Tick) {
        if let Some(index) = self.index(position) {
            if let Some(cell) = self.cells.get_mut(index) {
                cell.hibernate(resume);
            }
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !position.in_bounds() {
            return None;
        }
        let row = usize::try_from(position.y).ok()?;
        let column = usize::try_from(position.x).ok()?;
        let width = usize::try_from(MAP_COLUMNS).ok()?;
        Some(row * width + column)
    }
}
