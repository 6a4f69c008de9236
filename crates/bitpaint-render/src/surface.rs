#![forbid(unsafe_code)]

//! Pixel surface storage.
//!
//! A [`Surface`] is a row-major grid of [`Rgba`] pixels: `index = y * width + x`.
//! It is the software stand-in for a canvas, used by headless hosts and by
//! tests that need to look at what was painted.
//!
//! # Invariants
//!
//! 1. `pixels.len() == width * height`
//! 2. Width and height never change after creation
//! 3. Drawing outside the surface is clipped, never a panic

use bitpaint_core::geometry::{PixelRect, SurfaceSize};

use crate::color::Rgba;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// An RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// Create a transparent surface. Zero dimensions are allowed and yield
    /// an empty surface.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; len],
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub const fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set one pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Paint every pixel.
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Paint `rect`, clipped to the surface.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        let x0 = rect.x.min(self.width);
        let x1 = rect.right().min(self.width);
        let y0 = rect.y.min(self.height);
        let y1 = rect.bottom().min(self.height);
        if x0 >= x1 {
            return;
        }
        let stride = self.width as usize;
        for y in y0..y1 {
            let start = y as usize * stride;
            self.pixels[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }

    /// One-pixel horizontal line starting at `(x, y)`.
    pub fn hline(&mut self, x: u32, y: u32, len: u32, color: Rgba) {
        self.fill_rect(PixelRect::new(x, y, len, 1), color);
    }

    /// One-pixel vertical line starting at `(x, y)`.
    pub fn vline(&mut self, x: u32, y: u32, len: u32, color: Rgba) {
        self.fill_rect(PixelRect::new(x, y, 1, len), color);
    }

    /// FNV-1a 64 over the dimensions and every pixel word.
    ///
    /// Two surfaces with equal checksums are, for test purposes, the same
    /// frame.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let mut hash = FNV_OFFSET_BASIS;
        hash = fnv1a64_bytes(hash, &self.width.to_le_bytes());
        hash = fnv1a64_bytes(hash, &self.height.to_le_bytes());
        for pixel in &self.pixels {
            hash = fnv1a64_bytes(hash, &pixel.0.to_le_bytes());
        }
        hash
    }
}

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
