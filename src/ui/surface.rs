//! Render surface: the only drawing primitives the scene needs.
//!
//! `clear` and `fill_rect` with an RGBA colour. Rectangles are clipped to
//! the surface; partially transparent colours blend source-over.

/// 8-bit RGBA colour.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    /// Opaque colour from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Rgba {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 255,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    /// `self` drawn over `dst`. The result is opaque when `dst` is.
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => self,
            0 => dst,
            a => {
                let a = a as u32;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
                Rgba {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (a + dst.a as u32 * inv / 255).min(255) as u8,
                }
            }
        }
    }
}

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba);
}

/// In-memory RGBA raster.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize]
        } else {
            Rgba::TRANSPARENT
        }
    }

    /// Average colour of a `w` × `h` block at (x, y), clipped to the buffer.
    /// Transparent pixels count as `backdrop`.
    pub fn average(&self, x: u32, y: u32, w: u32, h: u32, backdrop: Rgba) -> Rgba {
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
        for py in y..y1 {
            for px in x..x1 {
                let c = self.get(px, py).over(backdrop);
                r += c.r as u32;
                g += c.g as u32;
                b += c.b as u32;
                n += 1;
            }
        }
        if n == 0 {
            return backdrop;
        }
        Rgba { r: (r / n) as u8, g: (g / n) as u8, b: (b / n) as u8, a: 255 }
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize;
        for py in y0 as usize..y1 as usize {
            let row = &mut self.pixels[py * stride + x0 as usize..py * stride + x1 as usize];
            if color.a == 255 {
                row.fill(color);
            } else {
                for px in row {
                    *px = color.over(*px);
                }
            }
        }
    }
}
