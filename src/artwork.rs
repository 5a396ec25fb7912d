//! Decoded artwork thumbnails for terminal rendering.

use image::imageops::FilterType;

pub const THUMB_W: u32 = 48;
pub const THUMB_H: u32 = 48;

/// Compact RGB thumbnail stored in the in-memory cache.
#[derive(Debug, Clone)]
pub struct SpriteThumb {
    pub w: u32,
    pub h: u32,
    /// RGB pixels in row-major order (len = w*h*3)
    pub pixels: Vec<u8>,
}

impl SpriteThumb {
    /// Decode an encoded image (PNG, ...) and shrink it to the canonical
    /// thumbnail size. Transparent pixels are flattened onto `background`.
    pub fn decode(bytes: &[u8], background: (u8, u8, u8)) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?;
        let small = image::imageops::resize(&img.to_rgba8(), THUMB_W, THUMB_H, FilterType::Lanczos3);
        let mut pixels = Vec::with_capacity((THUMB_W * THUMB_H * 3) as usize);
        for p in small.pixels() {
            let a = p[3] as u16;
            for (c, bg) in [(p[0], background.0), (p[1], background.1), (p[2], background.2)] {
                pixels.push(((c as u16 * a + bg as u16 * (255 - a)) / 255) as u8);
            }
        }
        Ok(Self {
            w: THUMB_W,
            h: THUMB_H,
            pixels,
        })
    }

    /// Pixel rows sized `w` x `h`. Equal sizes read the thumbnail directly,
    /// anything else is resampled from it in memory.
    pub fn rows(&self, w: u32, h: u32) -> Vec<Vec<(u8, u8, u8)>> {
        if self.w == w && self.h == h {
            return self
                .pixels
                .chunks_exact((w * 3) as usize)
                .map(|row| row.chunks_exact(3).map(|p| (p[0], p[1], p[2])).collect())
                .collect();
        }

        let mut buf = image::RgbImage::new(self.w, self.h);
        for (i, px) in self.pixels.chunks_exact(3).enumerate() {
            let x = i as u32 % self.w;
            let y = i as u32 / self.w;
            buf.put_pixel(x, y, image::Rgb([px[0], px[1], px[2]]));
        }
        let resized = image::imageops::resize(&buf, w.max(1), h.max(1), FilterType::Triangle);
        resized
            .rows()
            .map(|row| row.map(|p| (p[0], p[1], p[2])).collect())
            .collect()
    }
}
