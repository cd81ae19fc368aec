pub mod camera;
pub mod config;
pub mod game;
pub mod grid;
pub mod io;
pub mod render;
pub mod rule_set;
pub mod scheduler;
pub mod simulation;

pub use config::Config;
pub use game::Game;
pub use grid::Grid;
pub use simulation::Simulation;
