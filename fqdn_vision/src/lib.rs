// THEORY:
// This file is the main entry point for the `fqdn_vision` library crate. It exposes
// the `AddressBarLocator` and its configuration as the high-level interface: give it
// a decoded browser screenshot, get back the FQDN shown in the address bar, if any.
//
// The segmentation engine itself (`core_modules`) is public for callers that want the
// candidate blocks directly, but most consumers only need `pipeline` and, for batches
// of screenshots, `parallel_pipeline`.

pub mod core_modules;
pub mod error;
pub mod logging;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::raster::raster::Raster;
pub use core_modules::recognizer::{Recognizer, RecognizerConfig, TesseractCli};
pub use error::{VisionError, VisionResult};
pub use pipeline::{AddressBarLocator, PipelineConfig, Report};
