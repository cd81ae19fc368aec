use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::config::ConfigError;
use crate::grid::Grid;
use crate::render;
use crate::render::Surface;
use crate::scheduler::Ticker;
use crate::simulation::Simulation;
use crate::simulation::SimulationError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Grid is {got}x{got}, but the map is {expected}x{expected}")]
    GridSizeMismatch { expected: usize, got: usize },
}

/// A simulation together with how it should be shown and paced.
pub struct Game {
    config: Config,
    interval: Duration,
    sim: Simulation,
}

impl Game {
    /// Validate `config` and seed a fresh world.
    pub fn new<R: Rng + ?Sized>(config: Config, rng: &mut R) -> Result<Self, GameError> {
        let (map_size, interval) = config.validate()?;
        let sim = Simulation::new(map_size, config.init_cell_nbr, rng)?;

        info!(
            map_size = sim.map_size(),
            live = sim.initial_live_count(),
            tps = config.tps,
            "seeded world"
        );

        Ok(Self {
            config,
            interval,
            sim,
        })
    }

    /// Start from a known pattern. The grid has to match the map size `config` describes.
    pub fn with_grid(config: Config, grid: Grid) -> Result<Self, GameError> {
        let interval = config.interval()?;
        let map_size = config.map_size()?;

        if grid.size() != map_size {
            return Err(GameError::GridSizeMismatch {
                expected: map_size,
                got: grid.size(),
            });
        }

        Ok(Self {
            config,
            interval,
            sim: Simulation::from_grid(grid),
        })
    }

    pub fn generation(&self) -> u64 {
        self.sim.generation()
    }

    pub fn grid(&self) -> &Grid {
        self.sim.grid()
    }

    /// Draw the current generation
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        render::render(surface, self.sim.grid(), self.sim.generation(), self.config.cell_size)
    }

    /// Step to the next generation, then draw it
    pub fn advance<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        self.sim.tick();
        self.render(surface)
    }

    /// Draw generation 0, then hand the game and its surface over to a [`Ticker`] that advances
    /// it `tps` times a second. Both are dropped once the ticker is cancelled.
    pub fn start<S>(self, mut surface: S) -> Result<Ticker<S::Error>, S::Error>
    where
        S: Surface + Send + 'static,
        S::Error: Send + 'static,
    {
        self.render(&mut surface)?;

        info!(interval = ?self.interval, "starting game loop");

        let mut game = self;
        Ok(Ticker::schedule(game.interval, move || game.advance(&mut surface)))
    }
}
