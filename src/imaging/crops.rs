use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CropJob, ImageService, file_stem};
use crate::config::CropRect;
use crate::error::ImagingError;

const CROPS_DIR: &str = "crops";

/// Where the crops of a comparison live: `crops/` beside its first input.
pub fn crops_dir(first_input: &Path) -> PathBuf {
    first_input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CROPS_DIR)
}

/// Deterministic path of crop `index` of `input`, always PNG.
pub fn crop_path(dir: &Path, input: &Path, index: usize) -> PathBuf {
    dir.join(format!("{}_crop_{index}.png", file_stem(input)))
}

/// Crop files of one comparison plus the jobs needed to produce the missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropPlan {
    /// `paths[i][k]` is crop `k` of input `i`.
    pub paths: Vec<Vec<PathBuf>>,
    /// Jobs per input, in input order; inputs with nothing to do are left out.
    pub jobs: Vec<(PathBuf, Vec<CropJob>)>,
}

impl CropPlan {
    pub fn pending(&self) -> usize {
        self.jobs.iter().map(|(_, jobs)| jobs.len()).sum()
    }
}

/// Works out crop paths for every input and which of them must be (re)generated.
///
/// Existing crop files are kept unless `force` is set.
pub fn plan_crops(inputs: &[PathBuf], crops: &[CropRect], force: bool) -> CropPlan {
    let Some(first) = inputs.first() else {
        return CropPlan::default();
    };
    let dir = crops_dir(first);

    let mut plan = CropPlan::default();
    for input in inputs {
        let mut paths = Vec::with_capacity(crops.len());
        let mut jobs = Vec::new();
        for (index, rect) in crops.iter().enumerate() {
            let dest = crop_path(&dir, input, index);
            if force || !dest.is_file() {
                jobs.push(CropJob {
                    rect: *rect,
                    dest: dest.clone(),
                });
            } else {
                debug!("reusing existing crop {}", dest.display());
            }
            paths.push(dest);
        }
        if !jobs.is_empty() {
            plan.jobs.push((input.clone(), jobs));
        }
        plan.paths.push(paths);
    }
    plan
}

/// Makes sure every crop file of a comparison exists and returns their paths.
pub fn ensure_crops(
    images: &dyn ImageService,
    inputs: &[PathBuf],
    crops: &[CropRect],
    force: bool,
) -> Result<Vec<Vec<PathBuf>>, ImagingError> {
    let plan = plan_crops(inputs, crops, force);
    if plan.pending() > 0 {
        debug!(
            "writing {} crop(s) for {} input(s)",
            plan.pending(),
            plan.jobs.len()
        );
    }
    for (source, jobs) in &plan.jobs {
        images.crop(source, jobs)?;
    }
    Ok(plan.paths)
}
