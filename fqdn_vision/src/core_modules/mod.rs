pub mod block_extractor;
pub mod grid_segmenter;
pub mod pixel;
pub mod polarity;
pub mod raster;
pub mod ray_projector;
pub mod recognizer;
pub mod smart_block;
pub mod url_matcher;
