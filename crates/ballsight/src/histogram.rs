//! Per-channel pixel counts over a box of the segmented frame.
//!
//! The segmented frame is an 8-bit image whose pixel values are color-class
//! channel ids. The histogram buffer is sized from the color map once and
//! reused across candidates within a frame.

use image::GrayImage;

/// Reusable channel-count accumulator.
#[derive(Debug, Clone)]
pub struct ColorHistogram {
    counts: Vec<u32>,
}

impl ColorHistogram {
    /// Create a histogram with one bin per color channel.
    pub fn new(channel_count: usize) -> Self {
        Self {
            counts: vec![0; channel_count],
        }
    }

    /// Zero all bins.
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Accumulate pixels of `segmented` inside the inclusive box
    /// `[x1, x2] x [y1, y2]`, clamped to the image bounds.
    ///
    /// Returns the number of pixels sampled. Pixel values outside the bin
    /// range are counted toward the total but land in no bin.
    pub fn add_box(&mut self, segmented: &GrayImage, x1: i32, y1: i32, x2: i32, y2: i32) -> u32 {
        let (w, h) = segmented.dimensions();
        if w == 0 || h == 0 {
            return 0;
        }
        let x1 = x1.clamp(0, w as i32 - 1) as u32;
        let x2 = x2.clamp(0, w as i32 - 1) as u32;
        let y1 = y1.clamp(0, h as i32 - 1) as u32;
        let y2 = y2.clamp(0, h as i32 - 1) as u32;
        if x2 < x1 || y2 < y1 {
            return 0;
        }

        let mut sampled = 0u32;
        for y in y1..=y2 {
            for x in x1..=x2 {
                let v = segmented.get_pixel(x, y)[0] as usize;
                if let Some(bin) = self.counts.get_mut(v) {
                    *bin += 1;
                }
                sampled += 1;
            }
        }
        sampled
    }

    /// Count accumulated in one channel bin.
    pub fn channel(&self, id: u8) -> u32 {
        self.counts.get(id as usize).copied().unwrap_or(0)
    }
}
