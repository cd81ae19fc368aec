use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::terminal;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use life::Config;
use life::Game;
use life::io::TermSurface;
use life::io::is_exit;

const TPS: u32 = 10;

/// Side of a cell, in braille dots
const CELL_SIZE: usize = 2;

/// 7500 live cells on a 180x180 map
const DENSITY: (usize, usize) = (7500, 180 * 180);

/// How long to wait on input before checking that the game loop is still alive
const POLL: Duration = Duration::from_millis(50);

/// Fit the largest square map the terminal can show, leaving the last row free.
fn terminal_config(cols: u16, rows: u16) -> Config {
    let w = cols as usize * 2;
    let h = (rows as usize).saturating_sub(1) * 4;
    let canvas_size = w.min(h) / CELL_SIZE * CELL_SIZE;

    let map_size = canvas_size / CELL_SIZE;
    let (live, total) = DENSITY;

    Config {
        tps: TPS,
        cell_size: CELL_SIZE,
        canvas_size,
        init_cell_nbr: map_size * map_size * live / total,
    }
}

/// Block until the user quits or the game loop stops on its own
fn wait_for_exit<E: Send + 'static>(ticker: &life::scheduler::Ticker<E>) -> anyhow::Result<()> {
    loop {
        if ticker.is_finished() {
            return Ok(());
        }

        if event::poll(POLL)? && is_exit(&event::read()?) {
            return Ok(());
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let (cols, rows) = terminal::size().context("Failed to read terminal size")?;
    let config = terminal_config(cols, rows);
    let game = Game::new(config, &mut StdRng::from_entropy()).context("Failed to set up game")?;

    let surface = TermSurface::new(io::stdout(), config.canvas_size, config.canvas_size);

    terminal::enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(
        io::stdout(),
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All),
        cursor::Hide
    )?;

    let res = game
        .start(surface)
        .context("Failed to draw first generation")
        .and_then(|mut ticker| {
            let waited = wait_for_exit(&ticker);
            let stopped = ticker.cancel().context("Game loop failed");

            waited.and(stopped)
        });

    if let Err(err) = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen) {
        error!(?err, "failed to leave alternate screen");
    }
    if let Err(err) = terminal::disable_raw_mode() {
        error!(?err, "failed to disable raw mode");
    }

    info!("bye");

    res
}
