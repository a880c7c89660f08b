use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the ambient layers of the engine (configuration, raster
/// construction, image codecs and the recognition capability).
///
/// A screenshot without a recognizable address bar is *not* an error: the
/// locator reports that as `Ok(None)`.
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to parse configuration file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("File I/O error: {path}")]
    FileIO {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid raster shape: {message}")]
    RasterShape { message: String },

    #[error("Image codec error")]
    Image(#[from] image::ImageError),

    #[error("Recognition failed: {message}")]
    Recognition {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },
}

impl VisionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn raster_shape(message: impl Into<String>) -> Self {
        Self::RasterShape {
            message: message.into(),
        }
    }

    pub fn recognition(message: impl Into<String>) -> Self {
        Self::Recognition {
            message: message.into(),
            source: None,
        }
    }

    pub fn recognition_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Recognition {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileIO {
            path: path.into(),
            source,
        }
    }
}

pub type VisionResult<T> = Result<T, VisionError>;
