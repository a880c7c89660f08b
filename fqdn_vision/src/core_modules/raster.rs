// THEORY:
// The `Raster` module represents a decoded screenshot. It is the bridge between the
// `image` crate's many pixel formats and the segmentation engine, which only ever
// sees one shape of data.
//
// Key architectural principles:
// 1.  **One Canonical Layout**: Samples are stored row-major as `f32` in `[0, 1]`,
//     with either 1 channel (grayscale) or 3 channels (RGB). Alpha is dropped. Having
//     one layout keeps the ray projector a tight indexed loop.
// 2.  **Immutable Input**: The engine never mutates a raster it was given. Operations
//     that change pixels (`inverted`, `sub_image`) return a new raster.
// 3.  **Data Container**: Like `Color`, a `Raster` knows how to summarize itself
//     (brightness statistics) and how to convert back to an `image::DynamicImage` for
//     the recognizer, but it has no opinion about what its pixels mean.

pub mod raster {
    use crate::core_modules::pixel::pixel::{Brightness, Channel, Color};
    use crate::core_modules::smart_block::{Block, Point};
    use crate::error::{VisionError, VisionResult};
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

    /// An owned, row-major image with normalized samples.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Raster {
        height: usize,
        width: usize,
        channels: usize,
        data: Vec<Channel>,
    }

    impl Raster {
        /// Wraps a sample buffer. `channels` must be 1 or 3 and `data` must hold
        /// exactly `height * width * channels` samples.
        pub fn new(
            height: usize,
            width: usize,
            channels: usize,
            data: Vec<Channel>,
        ) -> VisionResult<Self> {
            if channels != 1 && channels != 3 {
                return Err(VisionError::raster_shape(format!(
                    "expected 1 or 3 channels, got {channels}"
                )));
            }
            let expected = height * width * channels;
            if data.len() != expected {
                return Err(VisionError::raster_shape(format!(
                    "{height}x{width}x{channels} raster needs {expected} samples, got {}",
                    data.len()
                )));
            }
            Ok(Self {
                height,
                width,
                channels,
                data,
            })
        }

        /// A raster of uniform color.
        pub fn filled(height: usize, width: usize, color: Color) -> Self {
            let channels = color.channels().len();
            let mut data = Vec::with_capacity(height * width * channels);
            for _ in 0..height * width {
                data.extend_from_slice(color.channels());
            }
            Self {
                height,
                width,
                channels,
                data,
            }
        }

        /// Converts any decoded image. Grayscale formats keep one channel, everything
        /// else becomes RGB.
        pub fn from_dynamic(image: &DynamicImage) -> Self {
            let height = image.height() as usize;
            let width = image.width() as usize;
            if image.color().has_color() {
                Self {
                    height,
                    width,
                    channels: 3,
                    data: image.to_rgb32f().into_raw(),
                }
            } else {
                Self {
                    height,
                    width,
                    channels: 1,
                    data: image.to_luma32f().into_raw(),
                }
            }
        }

        pub fn height(&self) -> usize {
            self.height
        }

        pub fn width(&self) -> usize {
            self.width
        }

        pub fn channels(&self) -> usize {
            self.channels
        }

        pub fn is_empty(&self) -> bool {
            self.height == 0 || self.width == 0
        }

        pub fn pixel_count(&self) -> usize {
            self.height * self.width
        }

        #[inline]
        fn offset(&self, point: Point) -> usize {
            (point.row * self.width + point.col) * self.channels
        }

        /// The color at `point`. The point must lie inside the raster.
        #[inline]
        pub fn color_at(&self, point: Point) -> Color {
            let start = self.offset(point);
            Color::from_slice(&self.data[start..start + self.channels])
        }

        /// Paints the (inclusive) block with `color`, clipped to the raster.
        /// Used to compose synthetic screenshots.
        pub fn fill_block(&mut self, block: &Block, color: Color) {
            if self.is_empty() || color.channels().len() != self.channels {
                return;
            }
            let i_max = block.i_max.min(self.height - 1);
            let j_max = block.j_max.min(self.width - 1);
            for row in block.i_min..=i_max {
                for col in block.j_min..=j_max {
                    let start = self.offset(Point::new(row, col));
                    self.data[start..start + self.channels].copy_from_slice(color.channels());
                }
            }
        }

        /// Copies out the pixels covered by `block` (inclusive bounds, clipped to the
        /// raster).
        pub fn sub_image(&self, block: &Block) -> Raster {
            if self.is_empty() || block.i_min >= self.height || block.j_min >= self.width {
                return Raster {
                    height: 0,
                    width: 0,
                    channels: self.channels,
                    data: Vec::new(),
                };
            }
            let i_max = block.i_max.min(self.height - 1);
            let j_max = block.j_max.min(self.width - 1);
            let height = i_max - block.i_min + 1;
            let width = j_max - block.j_min + 1;
            let mut data = Vec::with_capacity(height * width * self.channels);
            for row in block.i_min..=i_max {
                let start = self.offset(Point::new(row, block.j_min));
                let end = self.offset(Point::new(row, j_max)) + self.channels;
                data.extend_from_slice(&self.data[start..end]);
            }
            Raster {
                height,
                width,
                channels: self.channels,
                data,
            }
        }

        /// The photometric negative (`1 − value` on every sample).
        pub fn inverted(&self) -> Raster {
            Raster {
                height: self.height,
                width: self.width,
                channels: self.channels,
                data: self.data.iter().map(|v| 1.0 - v).collect(),
            }
        }

        /// Per-pixel brightness (channel sum), row-major.
        pub fn brightness_values(&self) -> impl Iterator<Item = Brightness> + '_ {
            self.data
                .chunks_exact(self.channels)
                .map(|px| Color::from_slice(px).brightness())
        }

        /// Mean brightness over the whole raster, `0.0` when empty.
        pub fn mean_brightness(&self) -> Brightness {
            let n = self.pixel_count();
            if n == 0 {
                return 0.0;
            }
            self.brightness_values().sum::<Brightness>() / n as Brightness
        }

        /// Re-quantizes to 8 bits per channel for encoders and external tools.
        pub fn to_dynamic_image(&self) -> DynamicImage {
            let quantize = |v: Channel| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            let width = self.width as u32;
            let height = self.height as u32;
            if self.channels == 1 {
                DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
                    let c = self.color_at(Point::new(y as usize, x as usize));
                    Luma([quantize(c.channels()[0])])
                }))
            } else {
                DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
                    let c = self.color_at(Point::new(y as usize, x as usize));
                    let ch = c.channels();
                    Rgb([quantize(ch[0]), quantize(ch[1]), quantize(ch[2])])
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::raster::*;
    use crate::core_modules::pixel::pixel::Color;
    use crate::core_modules::smart_block::{Block, Point};
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn rejects_mismatched_buffers() {
        assert!(Raster::new(2, 2, 3, vec![0.0; 11]).is_err());
        assert!(Raster::new(2, 2, 4, vec![0.0; 16]).is_err());
        assert!(Raster::new(2, 2, 1, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn decodes_rgba_as_normalized_rgb() {
        let mut img = RgbaImage::new(4, 2);
        img.put_pixel(3, 1, Rgba([255, 0, 51, 10]));
        let raster = Raster::from_dynamic(&DynamicImage::ImageRgba8(img));
        assert_eq!((raster.height(), raster.width(), raster.channels()), (2, 4, 3));
        let c = raster.color_at(Point::new(1, 3));
        assert!((c.channels()[0] - 1.0).abs() < 1e-6);
        assert!((c.channels()[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn decodes_grayscale_as_single_channel() {
        let img = GrayImage::from_pixel(3, 3, Luma([255]));
        let raster = Raster::from_dynamic(&DynamicImage::ImageLuma8(img));
        assert_eq!(raster.channels(), 1);
        assert!((raster.mean_brightness() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sub_image_is_inclusive_and_clipped() {
        let mut raster = Raster::filled(10, 10, Color::gray(0.0));
        raster.fill_block(&Block::new(2, 4, 5, 8), Color::gray(1.0));

        let sub = raster.sub_image(&Block::new(2, 4, 5, 8));
        assert_eq!((sub.height(), sub.width()), (3, 4));
        assert!(sub.brightness_values().all(|b| (b - 1.0).abs() < 1e-9));

        let clipped = raster.sub_image(&Block::new(8, 50, 8, 50));
        assert_eq!((clipped.height(), clipped.width()), (2, 2));
    }

    #[test]
    fn quantizes_back_to_eight_bits() {
        let raster = Raster::filled(2, 3, Color::rgb(1.0, 0.5, 0.0));
        let rgb = raster.to_dynamic_image().to_rgb8();
        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(rgb.get_pixel(2, 1).0, [255, 128, 0]);
    }
}
