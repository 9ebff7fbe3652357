//! Generates LaTeX source for the supplementary material of an image-comparison
//! experiment: one page per image, crop overlays and thumbnails, and hyperlinks
//! between the images of a comparison and between comparisons.

pub mod config;
pub mod error;
pub mod imaging;
pub mod supplementary;
pub mod tex;

pub use config::Document;
pub use error::{ConfigError, GenerateError, ImagingError};
pub use supplementary::{GenerateOptions, Supplementary, generate};
