// THEORY:
// The `pipeline` module is the top-level API of the engine. It wires the segmentation
// layer to the recognition capability and defines the search protocol for the
// address bar.
//
// Stages, per screenshot:
// 1.  **Segmentation**: The `GridSegmenter` produces candidate blocks in scan order.
// 2.  **Size Filter**: Blocks no taller and no wider than the configured minimum
//     (10 px on each axis by default) cannot hold readable text and are skipped.
// 3.  **Polarity**: Each surviving block is sliced out and normalized to dark text on a
//     light background.
// 4.  **Recognition & Matching**: The slice goes to the `Recognizer`, and its text
//     through the URL matcher. The first match ends the search; no later candidate is
//     recognized.
//
// Running out of candidates is reported as "no address bar", never as an error. A
// failing recognizer is an error: it is surfaced to the caller rather than retried.

use crate::core_modules::block_extractor::DEFAULT_EXTRACTION_ROUNDS;
use crate::core_modules::grid_segmenter::{DEFAULT_COL_STEP, DEFAULT_ROW_STEP, GridSegmenter};
use crate::core_modules::pixel::pixel::{DEFAULT_TOLERANCE, Distance};
use crate::core_modules::polarity::{Polarity, normalize_polarity};
use crate::core_modules::raster::raster::Raster;
use crate::core_modules::recognizer::{Recognizer, RecognizerConfig};
use crate::core_modules::url_matcher::extract_url;
use crate::error::{VisionError, VisionResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, trace};

// Re-export key data structures for the public API.
pub use crate::core_modules::smart_block::{Block, Point};

const DEFAULT_MIN_BLOCK_SIZE: usize = 10;

/// Configuration for the locator, allowing for tunable behavior.
///
/// The defaults reproduce the constants the engine was tuned with on typical desktop
/// screenshots. They are resolution dependent; no automatic scaling is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Vertical distance between grid seeds.
    pub row_step: usize,
    /// Horizontal distance between grid seeds.
    pub col_step: usize,
    /// Boundary-chasing rounds per block.
    pub extraction_rounds: usize,
    /// A candidate's row span must exceed this to be recognized.
    pub min_block_height: usize,
    /// A candidate's column span must exceed this to be recognized.
    pub min_block_width: usize,
    /// Tolerance for approximate color equality, also the margin a pixel must fall
    /// below the mean brightness by to count as dark.
    pub color_tolerance: Distance,
    pub recognizer: RecognizerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            row_step: DEFAULT_ROW_STEP,
            col_step: DEFAULT_COL_STEP,
            extraction_rounds: DEFAULT_EXTRACTION_ROUNDS,
            min_block_height: DEFAULT_MIN_BLOCK_SIZE,
            min_block_width: DEFAULT_MIN_BLOCK_SIZE,
            color_tolerance: DEFAULT_TOLERANCE,
            recognizer: RecognizerConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> VisionResult<Self> {
        let config: Self = toml::from_str(text).map_err(|source| VisionError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> VisionResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| VisionError::file_io(path, e))?;
        Self::from_toml_str(&text, path)
    }

    pub fn validate(&self) -> VisionResult<()> {
        self.segmenter().map(|_| ())
    }

    pub fn segmenter(&self) -> VisionResult<GridSegmenter> {
        GridSegmenter::new(
            self.row_step,
            self.col_step,
            self.extraction_rounds,
            self.color_tolerance,
        )
    }
}

/// The address bar that was found, and how.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// The matched FQDN, scheme included.
    pub url: String,
    /// The candidate block the URL was read from.
    pub block: Block,
    /// The polarity the block was classified with before recognition.
    pub polarity: Polarity,
    /// How many candidates were sent to the recognizer, this one included.
    pub candidates_recognized: usize,
}

/// The output of the locator for a single screenshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    NoAddressBar,
    AddressBar(Detection),
}

/// Finds the address-bar FQDN in a browser screenshot.
pub struct AddressBarLocator<R: Recognizer> {
    segmenter: GridSegmenter,
    config: PipelineConfig,
    recognizer: R,
}

impl<R: Recognizer> AddressBarLocator<R> {
    pub fn new(config: PipelineConfig, recognizer: R) -> VisionResult<Self> {
        let segmenter = config.segmenter()?;
        Ok(Self {
            segmenter,
            config,
            recognizer,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The candidate blocks for `raster`, in the order they will be tried.
    pub fn candidates(&self, raster: &Raster) -> Vec<Block> {
        self.segmenter.segment(raster)
    }

    /// Whether a block is large enough to plausibly hold readable text.
    pub fn qualifies(&self, block: &Block) -> bool {
        block.height() > self.config.min_block_height && block.width() > self.config.min_block_width
    }

    /// The matched FQDN, or `None` when no candidate yields one.
    pub fn locate(&self, raster: &Raster) -> VisionResult<Option<String>> {
        Ok(match self.generate_report(raster)? {
            Report::AddressBar(detection) => Some(detection.url),
            Report::NoAddressBar => None,
        })
    }

    pub fn generate_report(&self, raster: &Raster) -> VisionResult<Report> {
        let blocks = self.candidates(raster);
        let mut recognized = 0usize;

        for block in blocks {
            if !self.qualifies(&block) {
                trace!(?block, "candidate too small");
                continue;
            }

            let (slice, polarity) =
                normalize_polarity(raster.sub_image(&block), self.config.color_tolerance);

            let text = self.recognizer.recognize(&slice)?;
            recognized += 1;
            debug!(?block, ?polarity, text = text.trim(), "candidate recognized");

            if let Some(url) = extract_url(&text) {
                info!(%url, ?block, candidates = recognized, "address bar found");
                return Ok(Report::AddressBar(Detection {
                    url,
                    block,
                    polarity,
                    candidates_recognized: recognized,
                }));
            }
        }

        debug!(candidates = recognized, "no address bar found");
        Ok(Report::NoAddressBar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Color;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays canned OCR output, one entry per call.
    struct ScriptedRecognizer {
        responses: Mutex<VecDeque<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedRecognizer {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Recognizer for ScriptedRecognizer {
        fn recognize(&self, _image: &Raster) -> VisionResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    /// Reads `text` out of any slice that looks like a light bar: at least 30 rows tall
    /// with a bright mean. Everything else is illegible.
    struct LightBarReader {
        text: &'static str,
    }

    impl Recognizer for LightBarReader {
        fn recognize(&self, image: &Raster) -> VisionResult<String> {
            let mean = image.mean_brightness() / image.channels() as f64;
            if image.height() >= 30 && mean > 0.5 {
                Ok(self.text.to_string())
            } else {
                Ok(String::new())
            }
        }
    }

    struct FailingRecognizer;

    impl Recognizer for FailingRecognizer {
        fn recognize(&self, _image: &Raster) -> VisionResult<String> {
            Err(VisionError::recognition("engine offline"))
        }
    }

    /// Three full-width bars of 30 rows each.
    fn three_bars() -> Raster {
        let mut raster = Raster::filled(90, 400, Color::rgb(0.2, 0.2, 0.2));
        raster.fill_block(&Block::new(30, 59, 0, 399), Color::rgb(0.7, 0.7, 0.7));
        raster
    }

    /// A black 400x800 canvas with a 50x800 bar of `bar` color at rows 100..150, and
    /// glyph strokes of `ink` color inside it.
    fn browser_screenshot(bar: Color, ink: Color) -> Raster {
        let mut raster = Raster::filled(400, 800, Color::rgb(0.0, 0.0, 0.0));
        raster.fill_block(&Block::new(100, 149, 0, 799), bar);
        for k in 0..30 {
            let col = 40 + k * 20;
            raster.fill_block(&Block::new(115, 134, col, col + 3), ink);
        }
        raster
    }

    #[test]
    fn returns_the_first_matching_candidate_and_stops() {
        let recognizer = ScriptedRecognizer::new(&[
            "New Tab",
            "https://second.example.net/path",
            "https://third.example.org",
        ]);
        let locator = AddressBarLocator::new(PipelineConfig::default(), recognizer).unwrap();

        let report = locator.generate_report(&three_bars()).unwrap();
        match report {
            Report::AddressBar(detection) => {
                assert_eq!(detection.url, "https://second.example.net");
                assert_eq!(detection.block, Block::new(30, 59, 0, 399));
                assert_eq!(detection.candidates_recognized, 2);
            }
            Report::NoAddressBar => panic!("expected a detection"),
        }
        assert_eq!(locator.recognizer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn exhausted_candidates_are_absence_not_error() {
        let recognizer = ScriptedRecognizer::new(&["", "Bookmarks", "ftp://example.com"]);
        let locator = AddressBarLocator::new(PipelineConfig::default(), recognizer).unwrap();
        assert_eq!(locator.locate(&three_bars()).unwrap(), None);
        assert_eq!(locator.recognizer.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn small_blocks_are_never_recognized() {
        // Alternating 8-row stripes: every block is too short.
        let mut raster = Raster::filled(64, 300, Color::gray(0.0));
        for k in (0..8).step_by(2) {
            raster.fill_block(&Block::new(k * 8, k * 8 + 7, 0, 299), Color::gray(1.0));
        }
        let recognizer = ScriptedRecognizer::new(&["https://never.example.com"]);
        let locator = AddressBarLocator::new(PipelineConfig::default(), recognizer).unwrap();
        assert!(locator.candidates(&raster).iter().all(|b| !locator.qualifies(b)));
        assert_eq!(locator.locate(&raster).unwrap(), None);
        assert_eq!(locator.recognizer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn degenerate_image_is_absence() {
        let locator = AddressBarLocator::new(PipelineConfig::default(), FailingRecognizer).unwrap();
        let raster = Raster::new(0, 0, 3, Vec::new()).unwrap();
        assert_eq!(locator.locate(&raster).unwrap(), None);
    }

    #[test]
    fn recognizer_failure_is_propagated() {
        let locator = AddressBarLocator::new(PipelineConfig::default(), FailingRecognizer).unwrap();
        assert!(matches!(locator.locate(&three_bars()), Err(VisionError::Recognition { .. })));
    }

    #[test]
    fn finds_the_light_theme_address_bar() {
        let screenshot = browser_screenshot(Color::rgb(0.8, 0.8, 0.8), Color::rgb(0.1, 0.1, 0.1));
        let locator = AddressBarLocator::new(
            PipelineConfig::default(),
            LightBarReader { text: "https://mail.example.org/inbox" },
        )
        .unwrap();

        match locator.generate_report(&screenshot).unwrap() {
            Report::AddressBar(detection) => {
                assert_eq!(detection.url, "https://mail.example.org");
                assert_eq!(detection.block, Block::new(100, 149, 0, 799));
                assert_eq!(detection.polarity, Polarity::DarkOnLight);
            }
            Report::NoAddressBar => panic!("expected a detection"),
        }
    }

    #[test]
    fn finds_the_dark_theme_address_bar_after_inversion() {
        let screenshot =
            browser_screenshot(Color::rgb(0.15, 0.15, 0.15), Color::rgb(0.95, 0.95, 0.95));
        let locator = AddressBarLocator::new(
            PipelineConfig::default(),
            LightBarReader { text: "https://mail.example.org/inbox" },
        )
        .unwrap();

        match locator.generate_report(&screenshot).unwrap() {
            Report::AddressBar(detection) => {
                assert_eq!(detection.url, "https://mail.example.org");
                assert_eq!(detection.polarity, Polarity::LightOnDark);
            }
            Report::NoAddressBar => panic!("expected a detection"),
        }
    }

    #[test]
    fn config_defaults_and_overrides_from_toml() {
        let config = PipelineConfig::from_toml_str(
            "col_step = 50\n[recognizer]\nlanguage = \"deu\"\n",
            Path::new("inline.toml"),
        )
        .unwrap();
        assert_eq!(config.col_step, 50);
        assert_eq!(config.row_step, 10);
        assert_eq!(config.min_block_width, 10);
        assert_eq!(config.recognizer.language, "deu");
        assert_eq!(config.recognizer.page_seg_mode, 7);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml_str("row_step = 0", Path::new("bad.toml")),
            Err(VisionError::Configuration { .. })
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("row_step = \"ten\"", Path::new("bad.toml")),
            Err(VisionError::ConfigParse { .. })
        ));
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fqdn_vision.toml");
        std::fs::write(&path, "min_block_height = 20\n").unwrap();
        let config = PipelineConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.min_block_height, 20);
        assert!(matches!(
            PipelineConfig::from_toml_file(dir.path().join("missing.toml")),
            Err(VisionError::FileIO { .. })
        ));
    }
}
