use std::convert::Infallible;

use crate::render::Surface;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// A monochrome framebuffer drawn with braille characters. Each character packs a 2x4 block of
/// pixels.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Text drawn over the braille, one slot per character of the framebuffer
    text: Vec<Option<char>>,

    /// Width of the framebuffer, in pixels
    w: usize,

    /// Height of the framebuffer, in pixels
    h: usize,
}

impl Camera {
    pub fn new(w: usize, h: usize) -> Self {
        let cb = vec![false; w * h];

        // Let `w` and `h` refer to width and height of the cell buffer. Then `bw = ceil(w / 2)`
        // and `bh = ceil(h / 4)` are the width and height of braille characters of our framebuffer
        // (that is, not accounting for the trailing newlines expected at the end of each line).
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));
        let cp = vec![BRAILLE_EMPTY; bw * bh];
        let text = vec![None; bw * bh];

        // Each braille character is 3 bytes, and newlines one byte. Since we need `bh` newlines,
        // this gives us a framebuffer of length `3 * (bw * bh) + bh`.
        let fb = String::with_capacity(3 * (bw * bh) + bh);

        Self {
            cb,
            fb,
            cp,
            text,
            w,
            h,
        }
    }

    /// Turns on a single pixel of the framebuffer. Pixels outside of it are dropped.
    pub fn draw_pixel(&mut self, x: usize, y: usize) {
        if x >= self.w || y >= self.h {
            return;
        }

        let i = self.xy_from(x, y);
        self.cb[i] = true;
    }

    /// Turns on a square grid of pixels in the framebuffer, clipped to its edges
    pub fn draw_square(&mut self, x: usize, y: usize, s: usize) {
        let x_end = x.saturating_add(s).min(self.w);
        let y_end = y.saturating_add(s).min(self.h);

        for y in y..y_end {
            for x in x..x_end {
                let i = self.xy_from(x, y);
                self.cb[i] = true;
            }
        }
    }

    /// Writes `s` over the character holding pixel `(x, y)` and the ones to its right. Whatever
    /// doesn't fit on the line is cut off.
    pub fn draw_text(&mut self, s: &str, x: usize, y: usize) {
        let bw = self.w.div_ceil(2);
        let (col, row) = (x / 2, y / 4);

        if col >= bw || row >= self.h.div_ceil(4) {
            return;
        }

        let line = &mut self.text[row * bw..(row + 1) * bw];
        for (slot, c) in line[col..].iter_mut().zip(s.chars()) {
            *slot = Some(c);
        }
    }

    /// Reset the cell buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
        self.text.fill(None);
    }

    /// Fundamentally, we have a framebuffer of every pixel on our screen, and we ask ourselves "Is
    /// this pixel on or off?".
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = self.xy_to(n);
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        self.fb.clear();

        for (i, (&c, &t)) in self.cp.iter().zip(&self.text).enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            // every codepoint in U+2800..=U+28FF is a braille character
            let c = t.or_else(|| char::from_u32(c)).unwrap_or(' ');
            self.fb.push(c);
        }
        self.fb.push('\n');

        &self.fb
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

impl Surface for Camera {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.reset();
        Ok(())
    }

    fn draw_cell(&mut self, x: usize, y: usize, size: usize) -> Result<(), Self::Error> {
        self.draw_square(x, y, size);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: usize, y: usize) -> Result<(), Self::Error> {
        Camera::draw_text(self, text, x, y);
        Ok(())
    }
}
