// THEORY:
// The `polarity` module is the "dark theme inverter". OCR engines are tuned for dark
// text on a light background, so any candidate block rendered light-on-dark has to be
// flipped before recognition.
//
// The decision is region-local and purely statistical: compute each pixel's brightness
// (channel sum), take the mean over the block, and count the pixels that are strictly
// darker than that mean. A block whose majority of pixels is below average is mostly
// background-dark with sparse bright glyphs, so it is inverted.
//
// "Strictly darker" means darker by more than the pipeline's color tolerance. A
// perfectly uniform block therefore has no pixel below its own mean and is never
// flipped, whatever the floating-point rounding of the mean.

use crate::core_modules::pixel::pixel::{Brightness, Distance};
use crate::core_modules::raster::raster::Raster;

/// Which way round a region's text and background are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Dark text on a light background. Ready for recognition as is.
    DarkOnLight,
    /// Light text on a dark background. Must be inverted before recognition.
    LightOnDark,
}

/// Classifies a region by comparing each pixel to the region's mean brightness.
/// A pixel counts as below the mean only when it is darker by more than `tolerance`.
pub fn classify_polarity(region: &Raster, tolerance: Distance) -> Polarity {
    let n = region.pixel_count();
    if n == 0 {
        return Polarity::DarkOnLight;
    }
    let avg: Brightness = region.mean_brightness();
    let below = region
        .brightness_values()
        .filter(|b| *b < avg - tolerance)
        .count();
    if below * 2 > n {
        Polarity::LightOnDark
    } else {
        Polarity::DarkOnLight
    }
}

/// Returns the region unchanged when it is already dark-on-light, its negative otherwise,
/// together with the polarity it was found in.
pub fn normalize_polarity(region: Raster, tolerance: Distance) -> (Raster, Polarity) {
    let polarity = classify_polarity(&region, tolerance);
    let region = match polarity {
        Polarity::DarkOnLight => region,
        Polarity::LightOnDark => region.inverted(),
    };
    (region, polarity)
}
