//! Fixed-size monochrome frame buffer.

use crate::consts::dash_consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use std::convert::Infallible;

/// One bit per pixel, rows packed MSB first with each row padded to a whole
/// byte (the PBM P4 layout).
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("lit", &self.lit_pixels())
            .finish()
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl PixelBuffer {
    /// A buffer filled with the background color (off).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![0; (Self::stride_for(width) * height) as usize],
        }
    }

    fn stride_for(width: u32) -> u32 {
        width.div_ceil(8)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per packed row.
    pub fn stride(&self) -> u32 {
        Self::stride_for(self.width)
    }

    /// Packed rows, top to bottom.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: BinaryColor) {
        let byte = if color.is_on() { 0xFF } else { 0x00 };
        self.bits.iter_mut().for_each(|b| *b = byte);
    }

    /// `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        let (index, mask) = self.locate(x, y)?;
        Some(BinaryColor::from(self.bits[index] & mask != 0))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        if let Some((index, mask)) = self.locate(x, y) {
            if color.is_on() {
                self.bits[index] |= mask;
            } else {
                self.bits[index] &= !mask;
            }
        }
    }

    /// Number of pixels that are on.
    pub fn lit_pixels(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y) == Some(BinaryColor::On))
            .count()
    }

    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y * self.stride() + x / 8) as usize;
        Some((index, 0x80 >> (x % 8)))
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::Point;

    #[test]
    fn test_new_buffer_is_dark() {
        let buffer = PixelBuffer::default();
        assert_eq!(buffer.width(), DISPLAY_WIDTH);
        assert_eq!(buffer.height(), DISPLAY_HEIGHT);
        assert_eq!(buffer.as_bytes().len(), (128 / 8) * 64);
        assert_eq!(buffer.lit_pixels(), 0);
    }

    #[test]
    fn test_set_and_read_pixel() {
        let mut buffer = PixelBuffer::new(10, 3);
        assert_eq!(buffer.stride(), 2);
        buffer.set_pixel(9, 2, BinaryColor::On);
        assert_eq!(buffer.pixel(9, 2), Some(BinaryColor::On));
        assert_eq!(buffer.pixel(8, 2), Some(BinaryColor::Off));
        assert_eq!(buffer.as_bytes()[5], 0x40);
        buffer.set_pixel(9, 2, BinaryColor::Off);
        assert_eq!(buffer.lit_pixels(), 0);
    }

    #[test]
    // Pixels outside the panel are dropped, not wrapped.
    fn test_out_of_bounds_is_clipped() {
        let mut buffer = PixelBuffer::new(8, 8);
        buffer
            .draw_iter([
                Pixel(Point::new(-1, 0), BinaryColor::On),
                Pixel(Point::new(8, 0), BinaryColor::On),
                Pixel(Point::new(0, 8), BinaryColor::On),
            ])
            .unwrap();
        assert_eq!(buffer.lit_pixels(), 0);
        assert_eq!(buffer.pixel(8, 0), None);
    }

    #[test]
    fn test_fill() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.fill(BinaryColor::On);
        assert_eq!(buffer.lit_pixels(), 16);
        buffer.clear(BinaryColor::Off).unwrap();
        assert_eq!(buffer.lit_pixels(), 0);
    }
}
