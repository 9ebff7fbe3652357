//! Image access for the layout generator.
//!
//! The generator only needs two things from images: their pixel size and cropped
//! copies written to disk. Both go through [`ImageService`] so the layout logic can
//! be exercised without decoding real files. [`FsImageService`] is the production
//! implementation on top of the `image` crate.

pub mod crops;
pub mod fs_service;
pub mod preview;

use std::path::{Path, PathBuf};

use crate::config::CropRect;
use crate::error::ImagingError;

pub use crops::{CropPlan, crop_path, crops_dir, ensure_crops, plan_crops};
pub use fs_service::FsImageService;
pub use preview::write_overlay_preview;

/// A crop still to be written: which rectangle, and where to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropJob {
    pub rect: CropRect,
    pub dest: PathBuf,
}

/// Source of image metadata and cropped copies.
pub trait ImageService {
    /// Pixel `(width, height)` of the image at `path`.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ImagingError>;

    /// Writes every job's rectangle of `source` to the job's destination as PNG.
    fn crop(&self, source: &Path, jobs: &[CropJob]) -> Result<(), ImagingError>;
}

/// File name without directory and extension, lossily converted to UTF-8.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
