// THEORY (Pixel Color):
// The `pixel` module is the smallest unit of the segmentation engine. A `Color` is a
// "dumb" value: the normalized channel samples found at one point of a `Raster`,
// either a single gray value or an RGB triple. It knows nothing about neighbors.
//
// Two colors are "the same" when their Euclidean distance in channel space is within
// a tolerance (1e-6 by default). Every ray cast by the projector is a sequence of
// these comparisons against the seed color, so `Color` is `Copy` and stack-only:
// no allocation happens on the hot path.
//
// Brightness here is the plain channel sum, which is what the polarity normalizer
// compares against the regional mean.

pub mod pixel {
    pub type Channel = f32;
    pub type Brightness = f64;
    pub type Distance = f64;

    /// The largest number of channels a raster may carry (RGB).
    pub const MAX_CHANNELS: usize = 3;

    /// Default tolerance for approximate color equality.
    pub const DEFAULT_TOLERANCE: Distance = 1e-6;

    /// The channel values at a single point, normalized to `[0, 1]`.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Color {
        channels: [Channel; MAX_CHANNELS],
        len: usize,
    }

    impl Color {
        /// Builds a color from one (gray) or three (RGB) channel samples.
        /// Extra samples beyond `MAX_CHANNELS` are ignored.
        pub fn from_slice(samples: &[Channel]) -> Self {
            let len = samples.len().min(MAX_CHANNELS);
            let mut channels = [0.0; MAX_CHANNELS];
            channels[..len].copy_from_slice(&samples[..len]);
            Self { channels, len }
        }

        pub fn gray(value: Channel) -> Self {
            Self::from_slice(&[value])
        }

        pub fn rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            Self::from_slice(&[red, green, blue])
        }

        pub fn channels(&self) -> &[Channel] {
            &self.channels[..self.len]
        }

        /// Euclidean distance in channel space.
        /// Colors with a different channel count are compared over the shared prefix.
        pub fn distance(&self, other: &Color) -> Distance {
            self.channels()
                .iter()
                .zip(other.channels())
                .map(|(a, b)| {
                    let d = *a as Distance - *b as Distance;
                    d * d
                })
                .sum::<Distance>()
                .sqrt()
        }

        /// Approximate equality: `‖self − other‖ ≤ tolerance`.
        #[inline]
        pub fn matches(&self, other: &Color, tolerance: Distance) -> bool {
            self.distance(other) <= tolerance
        }

        /// Scalar brightness: sum across channels, or the raw value when gray.
        pub fn brightness(&self) -> Brightness {
            self.channels().iter().map(|c| *c as Brightness).sum()
        }
    }
}
