use std::fmt;

/// Square grid of tile values, stored row-major. 0 marks an empty cell;
/// the move and spawn logic only ever writes powers of two >= 2, so the
/// grid itself does no value validation beyond bounds checks.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// An empty `size` x `size` grid.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "grid size must be at least 2");
        Grid {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from explicit rows. Panics if the rows are not square.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Self {
        let size = rows.len();
        let mut grid = Grid::new(size);
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(row.len(), size, "row {row_idx} is not {size} cells wide");
            grid.cells[row_idx * size..(row_idx + 1) * size].copy_from_slice(row);
        }
        grid
    }

    /// Rebuild a grid from a row-major cell dump, e.g. a persisted record.
    /// Returns `None` when the cell count does not match `size` x `size`.
    pub fn from_cells(size: usize, cells: Vec<u32>) -> Option<Self> {
        if size < 2 || cells.len() != size * size {
            return None;
        }
        Some(Grid { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major view of all cells.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        assert!(row < self.size && col < self.size, "cell ({row}, {col}) out of bounds");
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        assert!(row < self.size && col < self.size, "cell ({row}, {col}) out of bounds");
        self.cells[row * self.size + col] = value;
    }

    pub fn row(&self, row: usize) -> &[u32] {
        assert!(row < self.size, "row {row} out of bounds");
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    pub fn column(&self, col: usize) -> Vec<u32> {
        assert!(col < self.size, "column {col} out of bounds");
        (0..self.size).map(|row| self.get(row, col)).collect()
    }

    /// Coordinates of every empty cell, in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    /// Count the number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// The highest tile value on the grid (0 when empty).
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// True if any cell holds exactly `value`.
    pub fn contains(&self, value: u32) -> bool {
        self.cells.iter().any(|&v| v == value)
    }

    /// True when no empty cell remains and no pair of orthogonally
    /// adjacent cells holds equal values, i.e. no move can change the grid.
    pub fn is_game_over(&self) -> bool {
        if self.cells.iter().any(|&v| v == 0) {
            return false;
        }
        for row in 0..self.size {
            for col in 0..self.size {
                let value = self.get(row, col);
                if col + 1 < self.size && self.get(row, col + 1) == value {
                    return false;
                }
                if row + 1 < self.size && self.get(row + 1, col) == value {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({}x{}, {:?})", self.size, self.size, self.cells)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divider = "-".repeat(self.size * 8);
        writeln!(f)?;
        for row in 0..self.size {
            if row > 0 {
                writeln!(f, "{divider}")?;
            }
            let cells: Vec<String> = self.row(row).iter().map(|&v| format_cell(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_cell(value: u32) -> String {
    if value == 0 {
        " ".repeat(7)
    } else {
        format!("{value:^7}")
    }
}
