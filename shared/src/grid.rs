use crate::grid::CellState::{Alive, Dead};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn toggled(self) -> Self {
        match self {
            Alive => Dead,
            Dead => Alive,
        }
    }

    pub fn is_alive(self) -> bool {
        self == Alive
    }
}

/// Fixed-size toroidal grid, stored row-major in two equally sized buffers.
///
/// `cells` is the current generation. `scratch` receives the next generation
/// during [`Grid::advance`] and is swapped in afterwards, so stepping never
/// reads a partially updated neighborhood and never reallocates.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
    scratch: Vec<CellState>,
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Grid {
            rows,
            cols,
            cells: vec![Dead; rows * cols],
            scratch: vec![Dead; rows * cols],
        }
    }

    /// Build a grid where exactly the listed cells are alive. Out-of-range cells are skipped.
    pub fn from_alive(rows: usize, cols: usize, alive: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut grid = Grid::new(rows, cols);
        for (row, col) in alive {
            grid.set(row, col, Alive);
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        self.index(row, col).map(|index| self.cells[index])
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(CellState::is_alive)
    }

    pub fn set(&mut self, row: usize, col: usize, state: CellState) {
        if let Some(index) = self.index(row, col) {
            self.cells[index] = state;
        }
    }

    /// Flip a single cell. Returns `false` if the position is outside the grid.
    pub fn toggle(&mut self, row: usize, col: usize) -> bool {
        match self.index(row, col) {
            Some(index) => {
                self.cells[index] = self.cells[index].toggled();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Dead);
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Iterate over every cell as `(row, col, state)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (index / self.cols, index % self.cols, *cell))
    }

    /// Positions of all live cells in row-major order.
    pub fn alive_cells(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|(_, _, cell)| cell.is_alive())
            .map(|(row, col, _)| (row, col))
            .collect()
    }

    /// Advance the grid by one step (Game of Life logic)
    pub fn advance(&mut self) -> bool {
        let mut changed = false;

        for row in 0..self.rows {
            for col in 0..self.cols {
                let index = row * self.cols + col;
                let alive_neighbors = self.alive_neighbors(row, col);
                let current = self.cells[index];

                let next = match (current, alive_neighbors) {
                    (Alive, 2..=3) => Alive, // Survives
                    (Dead, 3) => Alive,      // Becomes alive
                    _ => Dead,               // Dies or remains dead
                };

                changed |= next != current;
                self.scratch[index] = next;
            }
        }

        std::mem::swap(&mut self.cells, &mut self.scratch);
        changed
    }

    /// The generation after this one, leaving `self` untouched.
    pub fn next_generation(&self) -> Grid {
        let mut next = self.clone();
        next.advance();
        next
    }

    /// Count the number of alive neighbors for a cell, wrapping at the edges
    pub fn alive_neighbors(&self, row: usize, col: usize) -> usize {
        let mut count = 0;

        for dr in [-1isize, 0, 1] {
            for dc in [-1isize, 0, 1] {
                if dr == 0 && dc == 0 {
                    // Skip the current cell
                    continue;
                }

                let neighbor_row = (row as isize + dr).rem_euclid(self.rows as isize) as usize;
                let neighbor_col = (col as isize + dc).rem_euclid(self.cols as isize) as usize;

                if self.cells[neighbor_row * self.cols + neighbor_col] == Alive {
                    count += 1;
                }
            }
        }

        count
    }
}
