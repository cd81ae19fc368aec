use std::io;
use std::io::Write;

use crossterm::cursor;
use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::queue;
use crossterm::style;

use crate::camera::Camera;
use crate::render::Surface;

/// A [`Camera`] shown on a terminal. One braille dot is one pixel.
pub struct TermSurface<W: Write> {
    cam: Camera,
    out: W,
}

impl<W: Write> TermSurface<W> {
    /// A `w x h` pixel surface writing to `out`
    pub fn new(out: W, w: usize, h: usize) -> Self {
        Self {
            cam: Camera::new(w, h),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TermSurface<W> {
    type Error = io::Error;

    fn clear(&mut self) -> io::Result<()> {
        self.cam.reset();
        Ok(())
    }

    fn draw_cell(&mut self, x: usize, y: usize, size: usize) -> io::Result<()> {
        self.cam.draw_square(x, y, size);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: usize, y: usize) -> io::Result<()> {
        self.cam.draw_text(text, x, y);
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let frame = self.cam.render();

        for (row, line) in frame.lines().enumerate() {
            let row = u16::try_from(row).map_err(io::Error::other)?;
            queue!(self.out, cursor::MoveTo(0, row), style::Print(line))?;
        }

        self.out.flush()
    }
}

/// Whether the event asks us to quit: `q` or Ctrl-C.
pub fn is_exit(event: &CrossTermEvent) -> bool {
    matches!(
        event,
        CrossTermEvent::Key(KeyEvent {
            code: KeyCode::Char('q'),
            kind: KeyEventKind::Press,
            ..
        }) | CrossTermEvent::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            ..
        })
    )
}
