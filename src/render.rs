use crate::grid::Grid;

/// Where the generation counter is drawn, in pixels
pub const COUNTER_POS: (usize, usize) = (5, 10);

/// Anything a game can be drawn on. All coordinates are in pixels.
pub trait Surface {
    type Error;

    /// Erase everything drawn so far
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Fill the `size x size` square whose top left corner is `(x, y)`
    fn draw_cell(&mut self, x: usize, y: usize, size: usize) -> Result<(), Self::Error>;

    fn draw_text(&mut self, text: &str, x: usize, y: usize) -> Result<(), Self::Error>;

    /// Make the current frame visible. Surfaces that draw immediately have nothing to do here.
    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Draw one full frame: clear, generation counter, then every live cell.
pub fn render<S>(
    surface: &mut S,
    grid: &Grid,
    generation: u64,
    cell_size: usize,
) -> Result<(), S::Error>
where
    S: Surface + ?Sized,
{
    surface.clear()?;

    let (tx, ty) = COUNTER_POS;
    surface.draw_text(&generation.to_string(), tx, ty)?;

    for (x, y) in grid.live_cells() {
        surface.draw_cell(x * cell_size, y * cell_size, cell_size)?;
    }

    surface.present()
}
