use rand::Rng;
use rand::seq::index;
use thiserror::Error;
use tracing::debug;

use crate::grid::Grid;
use crate::grid::GridError;
use crate::rule_set::B3S23;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Too many initial cells: {count} requested, but the grid only holds {capacity}")]
    TooManyInitialCells { count: usize, capacity: usize },

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

/// Relative offsets of the Moore neighborhood
const NEIGHBORHOOD: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Bring exactly `count` distinct, uniformly chosen cells to life.
///
/// Cells that were already alive are left alone, so this is meant to be called on a dead grid.
pub fn seed<R: Rng + ?Sized>(
    grid: &mut Grid,
    count: usize,
    rng: &mut R,
) -> Result<(), SimulationError> {
    let capacity = grid.capacity();

    if count > capacity {
        return Err(SimulationError::TooManyInitialCells { count, capacity });
    }

    for i in index::sample(rng, capacity, count) {
        grid.set_at(i, true);
    }

    Ok(())
}

/// Number of live cells around `(x, y)`, in `[0, 8]`. The grid has hard edges: anything past them
/// counts as dead.
pub fn count_live_neighbors(grid: &Grid, x: usize, y: usize) -> Result<u8, GridError> {
    // bounds check on the center
    grid.get(x, y)?;

    Ok(live_neighbors(grid, x, y))
}

fn live_neighbors(grid: &Grid, x: usize, y: usize) -> u8 {
    let (x, y) = (x as isize, y as isize);

    NEIGHBORHOOD
        .iter()
        .filter(|&&(dx, dy)| grid.is_alive(x + dx, y + dy))
        .count() as u8
}

/// Compute the next generation of `grid`.
///
/// Every cell of the result depends only on `grid`, which is left untouched.
pub fn step(grid: &Grid) -> Grid {
    let mut next = grid.clone();

    for i in 0..grid.capacity() {
        let (x, y) = grid.xy_to(i);
        let n = live_neighbors(grid, x, y);

        next.set_at(i, B3S23.next(grid.cell_at(i), n));
    }

    next
}

/// The running state of a game: the current generation and how many steps led to it.
#[derive(Clone, Debug)]
pub struct Simulation {
    grid: Grid,
    generation: u64,
    initial_live_count: usize,
}

impl Simulation {
    /// A `map_size x map_size` world with `initial_live_count` random live cells.
    pub fn new<R: Rng + ?Sized>(
        map_size: usize,
        initial_live_count: usize,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        let mut grid = Grid::new(map_size)?;
        seed(&mut grid, initial_live_count, rng)?;

        Ok(Self {
            grid,
            generation: 0,
            initial_live_count,
        })
    }

    /// Start from a known pattern instead of a random seed.
    pub fn from_grid(grid: Grid) -> Self {
        let initial_live_count = grid.live_count();

        Self {
            grid,
            generation: 0,
            initial_live_count,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn map_size(&self) -> usize {
        self.grid.size()
    }

    pub fn initial_live_count(&self) -> usize {
        self.initial_live_count
    }

    /// Advance by one generation.
    ///
    /// The next grid is computed in full before it replaces the current one.
    pub fn tick(&mut self) {
        let next = step(&self.grid);

        self.grid = next;
        self.generation += 1;

        debug!(
            generation = self.generation,
            live = self.grid.live_count(),
            "advanced"
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x11fe)
    }

    #[test]
    fn seed_nothing() {
        let mut grid = Grid::new(5).unwrap();
        seed(&mut grid, 0, &mut rng()).unwrap();

        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn seed_everything() {
        let mut grid = Grid::new(5).unwrap();
        seed(&mut grid, 25, &mut rng()).unwrap();

        assert_eq!(grid.live_count(), 25);
    }

    #[test]
    fn seed_exact_count() {
        let mut rng = rng();

        for count in [1, 7, 50, 99] {
            let mut grid = Grid::new(10).unwrap();
            seed(&mut grid, count, &mut rng).unwrap();

            assert_eq!(grid.live_count(), count);
        }
    }

    #[test]
    fn seed_too_many() {
        let mut grid = Grid::new(5).unwrap();
        let err = seed(&mut grid, 26, &mut rng()).unwrap_err();

        assert_eq!(
            err,
            SimulationError::TooManyInitialCells {
                count: 26,
                capacity: 25
            }
        );
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn corner_has_three_neighbors_at_most() {
        let grid: Grid = "OOO\nOOO\nOOO".parse().unwrap();

        assert_eq!(count_live_neighbors(&grid, 0, 0), Ok(3));
        assert_eq!(count_live_neighbors(&grid, 2, 2), Ok(3));
        assert_eq!(count_live_neighbors(&grid, 1, 0), Ok(5));
        assert_eq!(count_live_neighbors(&grid, 1, 1), Ok(8));
    }

    #[test]
    fn center_does_not_count_itself() {
        let grid: Grid = "...\n.O.\n...".parse().unwrap();

        assert_eq!(count_live_neighbors(&grid, 1, 1), Ok(0));
        assert_eq!(count_live_neighbors(&grid, 0, 0), Ok(1));
    }

    #[test]
    fn neighbors_out_of_bounds() {
        let grid = Grid::new(3).unwrap();

        assert_eq!(
            count_live_neighbors(&grid, 3, 1),
            Err(GridError::OutOfBounds { x: 3, y: 1, size: 3 })
        );
    }

    #[test]
    fn lone_cell_dies() {
        let grid: Grid = "...\n.O.\n...".parse().unwrap();

        assert_eq!(step(&grid).live_count(), 0);
    }

    #[test]
    fn birth_on_three() {
        let grid: Grid = "O.O\n...\n.O.".parse().unwrap();
        let next = step(&grid);

        assert!(next.get(1, 1).unwrap());
        assert_eq!(next.live_count(), 1);
    }

    #[test]
    fn overcrowded_cell_dies() {
        let grid: Grid = "O.O\n.O.\nO.O".parse().unwrap();
        let next = step(&grid);

        assert!(!next.get(1, 1).unwrap());
    }

    #[test]
    fn new_simulation() {
        let sim = Simulation::new(8, 20, &mut rng()).unwrap();

        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.map_size(), 8);
        assert_eq!(sim.initial_live_count(), 20);
        assert_eq!(sim.grid().live_count(), 20);
    }

    #[test]
    fn new_simulation_errors() {
        assert_eq!(
            Simulation::new(0, 0, &mut rng()).unwrap_err(),
            SimulationError::Grid(GridError::InvalidDimension { size: 0 })
        );
        assert_eq!(
            Simulation::new(2, 5, &mut rng()).unwrap_err(),
            SimulationError::TooManyInitialCells {
                count: 5,
                capacity: 4
            }
        );
    }

    #[test]
    fn tick_counts_generations() {
        let mut sim = Simulation::new(6, 12, &mut rng()).unwrap();

        for n in 1..=5 {
            let expected = step(sim.grid());
            sim.tick();

            assert_eq!(sim.generation(), n);
            assert_eq!(sim.grid(), &expected);
        }
    }
}
