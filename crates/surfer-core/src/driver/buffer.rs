use image::{DynamicImage, GrayImage, imageops};

use super::errors::DriverError;

/// Luma values at or above this are white.
const WHITE_THRESHOLD: u8 = 128;

/// Monochrome frame in panel layout.
///
/// One bit per pixel, rows padded to whole bytes, most significant bit first.
/// A set bit is white, matching the controller convention where `0xFF` clears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Bytes needed for one row, rounding up when width is not divisible by 8.
    pub const fn row_bytes(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    /// An all-white frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0xFF; Self::row_bytes(width) * height as usize],
        }
    }

    /// Threshold an image into a frame of exactly `width`x`height`.
    ///
    /// An image with swapped dimensions is rotated a quarter turn
    /// counter-clockwise. Any other size is rejected; nothing is scaled.
    pub fn from_image(image: &DynamicImage, width: u32, height: u32) -> Result<Self, DriverError> {
        let luma = image.to_luma8();
        let luma = match luma.dimensions() {
            (w, h) if w == width && h == height => luma,
            (w, h) if w == height && h == width => imageops::rotate270(&luma),
            (w, h) => {
                return Err(DriverError::DimensionMismatch {
                    width,
                    height,
                    actual_width: w,
                    actual_height: h,
                });
            }
        };

        let mut frame = Self::blank(width, height);
        for (x, y, pixel) in luma.enumerate_pixels() {
            if pixel.0[0] < WHITE_THRESHOLD {
                frame.set_black(x, y);
            }
        }
        Ok(frame)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_white(&self, x: u32, y: u32) -> bool {
        let (index, mask) = self.locate(x, y);
        self.data[index] & mask != 0
    }

    /// Render back to grayscale, black or white only.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            image::Luma([if self.is_white(x, y) { 255 } else { 0 }])
        })
    }

    fn set_black(&mut self, x: u32, y: u32) {
        let (index, mask) = self.locate(x, y);
        self.data[index] &= !mask;
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        let index = y as usize * Self::row_bytes(self.width) + x as usize / 8;
        (index, 0x80 >> (x % 8))
    }
}
