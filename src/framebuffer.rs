/// standard CHIP-8 resolution
pub const CHIP8_DISPLAY_WIDTH: usize = 64;
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

/// Monochrome pixel grid the interpreter draws into. Size is fixed at
/// construction; every write is an XOR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    wrap: bool,
    pixels: Vec<bool>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, wrap: bool) -> Self {
        FrameBuffer {
            width,
            height,
            wrap,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|px| *px = false);
    }

    /// out of range coordinates read as unlit
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// coordinates of every lit pixel, row by row
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, lit)| **lit)
            .map(move |(idx, _)| (idx % w, idx / w))
    }

    /// XOR an 8-pixel-wide sprite in at (x, y). The origin is taken modulo the
    /// screen size; rows and columns running off the right or bottom edge
    /// wrap when wrapping is on and are clipped otherwise.
    ///
    /// Returns true when any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let x0 = x as usize % self.width;
        let y0 = y as usize % self.height;
        let mut collision = false;

        for (dy, row) in rows.iter().enumerate() {
            let py = match self.place(y0 + dy, self.height) {
                Some(py) => py,
                None => break,
            };
            for dx in 0..8 {
                if row & (0x80 >> dx) == 0 {
                    continue;
                }
                let px = match self.place(x0 + dx, self.width) {
                    Some(px) => px,
                    None => break,
                };
                let idx = py * self.width + px;
                collision |= self.pixels[idx];
                self.pixels[idx] ^= true;
            }
        }
        collision
    }

    fn place(&self, coord: usize, limit: usize) -> Option<usize> {
        match (coord < limit, self.wrap) {
            (true, _) => Some(coord),
            (false, true) => Some(coord % limit),
            (false, false) => None,
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new(CHIP8_DISPLAY_WIDTH, CHIP8_DISPLAY_HEIGHT, false)
    }
}
