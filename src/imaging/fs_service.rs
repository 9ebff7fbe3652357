use std::fs;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat};

use super::{CropJob, ImageService};
use crate::error::ImagingError;

/// [`ImageService`] backed by image files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageService;

pub(crate) fn open_image(path: &Path) -> Result<DynamicImage, ImagingError> {
    image::open(path).map_err(|source| ImagingError::Open {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn create_parent_dir(path: &Path) -> Result<(), ImagingError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ImagingError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

pub(crate) fn save_png(img: &DynamicImage, dest: &Path) -> Result<(), ImagingError> {
    create_parent_dir(dest)?;
    img.save_with_format(dest, ImageFormat::Png)
        .map_err(|source| ImagingError::Save {
            path: dest.to_path_buf(),
            source,
        })
}

impl ImageService for FsImageService {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32), ImagingError> {
        image::image_dimensions(path).map_err(|source| ImagingError::Open {
            path: path.to_path_buf(),
            source,
        })
    }

    fn crop(&self, source: &Path, jobs: &[CropJob]) -> Result<(), ImagingError> {
        if jobs.is_empty() {
            return Ok(());
        }

        // Decode once, crop many.
        let img = open_image(source)?;
        let (width, height) = img.dimensions();

        for job in jobs {
            let rect = job.rect;
            // crop_imm clamps silently; a clamped crop would not match the overlay.
            if !rect.fits_within(width, height) {
                return Err(ImagingError::CropOutOfBounds {
                    path: source.to_path_buf(),
                    rect,
                    width,
                    height,
                });
            }
            let cropped = img.crop_imm(rect.left, rect.top, rect.width(), rect.height());
            save_png(&cropped, &job.dest)?;
        }
        Ok(())
    }
}
