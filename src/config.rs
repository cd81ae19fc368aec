use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Canvas size {canvas_size} is not a positive multiple of cell size {cell_size}")]
    InvalidDimension { canvas_size: usize, cell_size: usize },

    #[error("Ticks per second must be positive")]
    InvalidTps,

    #[error("Too many initial cells: {count} requested, but the map only holds {capacity}")]
    TooManyInitialCells { count: usize, capacity: usize },
}

/// Everything a game needs to start. There are no defaults: picking them is up to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Generations per second
    pub tps: u32,

    /// Side length of a cell, in pixels
    pub cell_size: usize,

    /// Side length of the (square) display surface, in pixels
    pub canvas_size: usize,

    /// Number of cells alive at generation 0
    pub init_cell_nbr: usize,
}

impl Config {
    /// Number of cells along each side of the map, `canvas_size / cell_size`.
    ///
    /// The division has to be exact; a canvas that doesn't fit a whole number of cells is rejected
    /// rather than truncated.
    pub fn map_size(&self) -> Result<usize, ConfigError> {
        let invalid = ConfigError::InvalidDimension {
            canvas_size: self.canvas_size,
            cell_size: self.cell_size,
        };

        if self.cell_size == 0 || self.canvas_size % self.cell_size != 0 {
            return Err(invalid);
        }

        match self.canvas_size / self.cell_size {
            0 => Err(invalid),
            n => Ok(n),
        }
    }

    /// Time between two generations, `1s / tps`.
    pub fn interval(&self) -> Result<Duration, ConfigError> {
        if self.tps == 0 {
            return Err(ConfigError::InvalidTps);
        }

        Ok(Duration::from_secs(1) / self.tps)
    }

    /// Check every option up front, returning the map size and the tick interval.
    pub fn validate(&self) -> Result<(usize, Duration), ConfigError> {
        let interval = self.interval()?;
        let map_size = self.map_size()?;

        let Some(capacity) = map_size.checked_mul(map_size) else {
            return Err(ConfigError::InvalidDimension {
                canvas_size: self.canvas_size,
                cell_size: self.cell_size,
            });
        };

        if self.init_cell_nbr > capacity {
            return Err(ConfigError::TooManyInitialCells {
                count: self.init_cell_nbr,
                capacity,
            });
        }

        Ok((map_size, interval))
    }
}
