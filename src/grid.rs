use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const ALIVE: char = 'O';
const DEAD: char = '.';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid grid dimension: {size}")]
    InvalidDimension { size: usize },

    #[error("({x}, {y}) is outside of a {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },

    #[error("Invalid cell '{got}' at line {line}, expected 'O' or '.'")]
    InvalidCell { got: char, line: usize },
}

/// A square matrix of cells, fixed in size for its whole lifetime.
///
/// Cells are stored row-major: `(x, y)` lives at `y * size + x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a `size x size` grid with every cell dead.
    pub fn new(size: usize) -> Result<Self, GridError> {
        let capacity = match size.checked_mul(size) {
            Some(n) if n > 0 => n,
            _ => return Err(GridError::InvalidDimension { size }),
        };

        Ok(Self {
            size,
            cells: vec![false; capacity],
        })
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells, `size²`
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool, GridError> {
        let i = self.index(x, y)?;

        Ok(self.cells[i])
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.cells[i] = alive;

        Ok(())
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Coordinates of every live cell, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(|(i, _)| self.xy_to(i))
    }

    /// Like `get`, but takes signed coordinates and reports anything off the grid as dead.
    pub(crate) fn is_alive(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }

        let (x, y) = (x as usize, y as usize);
        if x >= self.size || y >= self.size {
            return false;
        }

        self.cells[self.xy_from(x, y)]
    }

    /// Flat access for callers that already hold a valid index
    pub(crate) fn cell_at(&self, i: usize) -> bool {
        self.cells[i]
    }

    pub(crate) fn set_at(&mut self, i: usize, alive: bool) {
        self.cells[i] = alive;
    }

    pub(crate) fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.size, n / self.size)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.size || y >= self.size {
            return Err(GridError::OutOfBounds {
                x,
                y,
                size: self.size,
            });
        }

        Ok(self.xy_from(x, y))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for &c in row {
                let c = if c { ALIVE } else { DEAD };
                write!(f, "{c}")?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parse the `Display` form back into a grid. Blank lines are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let size = rows.len();
        let mut grid = Grid::new(size)?;

        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != size {
                return Err(GridError::InvalidDimension { size: width });
            }

            for (x, c) in row.chars().enumerate() {
                let alive = match c {
                    ALIVE => true,
                    DEAD => false,
                    got => return Err(GridError::InvalidCell { got, line: y + 1 }),
                };

                grid.set(x, y, alive)?;
            }
        }

        Ok(grid)
    }
}
