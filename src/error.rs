//! Error types shared by configuration loading, imaging and generation.

use std::path::PathBuf;

use crate::config::CropRect;

/// Errors raised while reading or validating the JSON configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("links_color must look like \"R,G,B\" with components in 0-255, got {0:?}")]
    LinksColor(String),

    #[error("comparison {index} has no inputs")]
    NoInputs { index: usize },

    #[error("comparison {index} has {labels} labels for {inputs} inputs")]
    LabelCount {
        index: usize,
        labels: usize,
        inputs: usize,
    },

    #[error("comparison {index}: {field} must be a positive number, got {value}")]
    NonPositive {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("comparison {index}: crop {crop} {rect} is empty or inverted")]
    DegenerateCrop {
        index: usize,
        crop: usize,
        rect: CropRect,
    },

    #[error(
        "comparison {index}: inputs {first} and {second} share the stem {stem:?}, crops clash"
    )]
    CropNameClash {
        index: usize,
        first: usize,
        second: usize,
        stem: String,
    },
}

/// Errors from the image service.
#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("failed to open image {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save image {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("crop {rect} does not fit the {width}x{height} image {}", .path.display())]
    CropOutOfBounds {
        path: PathBuf,
        rect: CropRect,
        width: u32,
        height: u32,
    },
}

/// Errors that abort document generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Imaging(#[from] ImagingError),

    #[error(
        "comparison {index}: crop {crop} {rect} exceeds the {width}x{height} image {}",
        .path.display()
    )]
    CropOutOfBounds {
        index: usize,
        crop: usize,
        rect: CropRect,
        width: u32,
        height: u32,
        path: PathBuf,
    },
}
