// THEORY:
// The `recognizer` module is the seam between the segmentation engine and text
// recognition. The engine never reads text itself; it hands a polarity-normalized
// sub-image to a `Recognizer` and gets back whatever text was legible (possibly empty).
//
// `TesseractCli` is the production implementation. It encodes the sub-image as PNG,
// pipes it into the `tesseract` executable (`stdin stdout`) and reads the recognized
// text from its standard output. Page segmentation mode 7 treats the image as a single
// line of text, which is what an address bar is.

use crate::core_modules::raster::raster::Raster;
use crate::error::{VisionError, VisionResult};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};
use tracing::trace;

/// Anything that can read text out of a sub-image.
///
/// Implementations must be callable from several threads at once: the parallel
/// pipeline shares one recognizer across its workers.
pub trait Recognizer: Send + Sync {
    /// Returns the recognized text, or an empty string when nothing is legible.
    fn recognize(&self, raster: &Raster) -> VisionResult<String>;
}

/// Settings for the external OCR executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Path or name of the tesseract executable.
    pub binary: String,
    /// Tesseract page segmentation mode (7 = single text line).
    pub page_seg_mode: u8,
    /// Tesseract language code.
    pub language: String,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            page_seg_mode: 7,
            language: "eng".to_string(),
        }
    }
}

/// Runs the `tesseract` command-line tool once per sub-image.
#[derive(Debug, Clone, Default)]
pub struct TesseractCli {
    config: RecognizerConfig,
}

impl TesseractCli {
    pub fn new(config: RecognizerConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the executable (input and output are the standard streams).
    pub fn arguments(&self) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "--psm".to_string(),
            self.config.page_seg_mode.to_string(),
            "-l".to_string(),
            self.config.language.clone(),
        ]
    }
}

/// Encodes a raster as PNG bytes.
pub fn encode_png(raster: &Raster) -> VisionResult<Vec<u8>> {
    let mut bytes = Vec::new();
    raster
        .to_dynamic_image()
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

impl Recognizer for TesseractCli {
    fn recognize(&self, raster: &Raster) -> VisionResult<String> {
        if raster.is_empty() {
            return Ok(String::new());
        }
        let png = encode_png(raster)?;

        let mut child = Command::new(&self.config.binary)
            .args(self.arguments())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                let message = format!("could not start `{}`", self.config.binary);
                VisionError::recognition_with_source(message, e)
            })?;

        // The child is always reaped, even when it stops reading its input early.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&png),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| VisionError::recognition_with_source("recognizer did not finish", e))?;

        if !output.status.success() {
            return Err(VisionError::recognition(format!(
                "`{}` exited with {}: {}",
                self.config.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written.map_err(|e| {
            VisionError::recognition_with_source("could not write image to recognizer", e)
        })?;

        let text = String::from_utf8(output.stdout)
            .map_err(|_| VisionError::recognition("recognizer produced non-UTF-8 output"))?;
        trace!(text = text.trim(), "recognized");
        Ok(text)
    }
}
