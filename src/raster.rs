//! A decoded image as a flat per-band pixel buffer, the input edge weighers
//! read gradients from.

use image::{DynamicImage, GenericImageView};

use crate::error::ScissorsError;

/// A decoded raster image, stored as one `u8` band per channel
/// (1 band for grayscale, 3 for RGB). Pixel `(0, 0)` is the top-left
/// corner, row-major, matching `image`'s own convention.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    bands: Vec<Vec<u8>>,
}

impl Raster {
    #[must_use]
    pub fn from_dynamic_image(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let rgb = image.to_rgb8();
        let n = (width * height) as usize;
        let mut bands = vec![vec![0u8; n]; 3];
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let i = (x + width * y) as usize;
            bands[0][i] = pixel[0];
            bands[1][i] = pixel[1];
            bands[2][i] = pixel[2];
        }
        Self {
            width,
            height,
            bands,
        }
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ScissorsError> {
        let image = image::open(path).map_err(ScissorsError::DecodeError)?;
        Ok(Self::from_dynamic_image(&image))
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Intensity of `band` at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32, band: usize) -> u8 {
        debug_assert!(x < self.width && y < self.height, "raster index out of bounds");
        self.bands[band][(x + self.width * y) as usize]
    }

    /// The `(r, g, b)` color at `(x, y)`: the first three bands if present,
    /// otherwise the single band repeated across all three channels.
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        if self.band_count() >= 3 {
            [self.get(x, y, 0), self.get(x, y, 1), self.get(x, y, 2)]
        } else {
            let v = self.get(x, y, 0);
            [v, v, v]
        }
    }

    /// A single-band raster built by averaging all bands of `self` with
    /// equal weight, rounding to the nearest integer.
    #[must_use]
    pub fn to_grayscale(&self) -> Self {
        if self.band_count() == 1 {
            return self.clone();
        }
        let n = (self.width * self.height) as usize;
        let mut gray = vec![0u8; n];
        let band_count = self.band_count() as u32;
        for i in 0..n {
            let sum: u32 = self.bands.iter().map(|b| b[i] as u32).sum();
            gray[i] = ((sum + band_count / 2) / band_count) as u8;
        }
        Self {
            width: self.width,
            height: self.height,
            bands: vec![gray],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rgb_raster(width: u32, height: u32, pixels: &[[u8; 3]]) -> Raster {
        let mut bands = vec![vec![0u8; (width * height) as usize]; 3];
        for (i, p) in pixels.iter().enumerate() {
            bands[0][i] = p[0];
            bands[1][i] = p[1];
            bands[2][i] = p[2];
        }
        Raster {
            width,
            height,
            bands,
        }
    }

    #[test]
    fn get_reads_the_right_band_and_pixel() {
        let r = rgb_raster(2, 1, &[[10, 20, 30], [40, 50, 60]]);
        assert_eq!(r.get(0, 0, 0), 10);
        assert_eq!(r.get(1, 0, 1), 50);
        assert_eq!(r.get(1, 0, 2), 60);
    }

    #[test]
    fn to_grayscale_averages_bands() {
        let r = rgb_raster(1, 1, &[[10, 20, 30]]);
        let gray = r.to_grayscale();
        assert_eq!(gray.band_count(), 1);
        assert_eq!(gray.get(0, 0, 0), 20);
    }

    #[test]
    fn rgb_repeats_the_single_band_of_a_grayscale_raster() {
        let gray = rgb_raster(1, 1, &[[10, 20, 30]]).to_grayscale();
        assert_eq!(gray.rgb(0, 0), [20, 20, 20]);
    }
}
