//! Figure pages of a single comparison.

use std::path::{Path, PathBuf};

use super::GenerateOptions;
use super::navigation::{
    ComparisonPosition, comparison_anchor, figure_anchor, hypertarget, navigation_block,
};
use crate::config::{Comparison, CropRect, validate_comparison};
use crate::error::GenerateError;
use crate::imaging::{ImageService, ensure_crops};
use crate::tex::{TexFragments, tex_number, tex_path};

const COMPARISON_MARKER: &str = "%%%%%%%%%%%%% New Comparison %%%%%%%%%%%%%";
const CROP_OUTLINE_STYLE: &str = "blue, ultra thick, rounded corners";
const BORDER_STYLE: &str = "black,thin";

/// Overlay box of `rect` in tikz coordinates for an image `height` pixels tall.
///
/// Pixel rows count down from the top, tikz y counts up from the bottom, so the
/// box spans `(left, height - bottom)` to `(right, height - top)`.
pub fn overlay_box(rect: CropRect, height: u32) -> ((u32, u32), (u32, u32)) {
    (
        (rect.left, height.saturating_sub(rect.bottom)),
        (rect.right, height.saturating_sub(rect.top)),
    )
}

/// Image size and crop files shared by every image of a cropped comparison.
struct CropLayout {
    width: u32,
    height: u32,
    crop_paths: Vec<Vec<PathBuf>>,
}

impl CropLayout {
    /// Sizes the comparison from its first input and makes sure all crops exist.
    fn prepare(
        comparison: &Comparison,
        index: usize,
        images: &dyn ImageService,
        options: &GenerateOptions,
    ) -> Result<Self, GenerateError> {
        let first = &comparison.inputs[0];
        let (width, height) = images.dimensions(first)?;

        if let Some((crop, rect)) = comparison
            .crops
            .iter()
            .enumerate()
            .find(|(_, rect)| !rect.fits_within(width, height))
        {
            return Err(GenerateError::CropOutOfBounds {
                index,
                crop,
                rect: *rect,
                width,
                height,
                path: first.clone(),
            });
        }

        let crop_paths = ensure_crops(
            images,
            &comparison.inputs,
            &comparison.crops,
            options.force_crops,
        )?;
        Ok(Self {
            width,
            height,
            crop_paths,
        })
    }

    fn emit(
        &self,
        tex: &mut TexFragments,
        comparison: &Comparison,
        input: &Path,
        image_index: usize,
    ) {
        tex.line(format!(
            "\\sbox\\mybox{{\\includegraphics[width={}\\textwidth]{{{}}}}}",
            tex_number(comparison.fig_width_relative),
            tex_path(input)
        ));
        tex.line(format!(
            "\\begin{{tikzpicture}}[x=\\wd\\mybox/{}, y=\\ht\\mybox/{}]",
            self.width, self.height
        ));
        tex.line("\\node[anchor=south west,inner sep=0pt] at (0,0) {\\usebox\\mybox};");
        for rect in &comparison.crops {
            let ((left, bottom), (right, top)) = overlay_box(*rect, self.height);
            tex.line(format!(
                "\\draw[{CROP_OUTLINE_STYLE}] ({left},{bottom}) rectangle ({right},{top});"
            ));
        }
        tex.line(format!(
            "\\draw[{BORDER_STYLE}] (0,0) rectangle + ({},{});",
            self.width, self.height
        ));
        tex.line("\\end{tikzpicture}\\\\");
        tex.line("\\vspace{1mm}");
        for crop in &self.crop_paths[image_index] {
            tex.line(format!(
                "\\frame{{\\includegraphics[height={}in]{{{}}}}}\\hfil",
                tex_number(comparison.crops_height_in),
                tex_path(crop)
            ));
        }
    }
}

/// Renders every image of `comparison` on its own page.
///
/// `next_figure_id` is the anchor number the first image receives; the returned
/// counter is the one the following comparison starts from. The comparison is
/// validated first, so labels always pair up with inputs.
pub fn render_comparison(
    comparison: &Comparison,
    position: ComparisonPosition,
    next_figure_id: usize,
    images: &dyn ImageService,
    options: &GenerateOptions,
) -> Result<(TexFragments, usize), GenerateError> {
    validate_comparison(position.index, comparison)?;

    let navigation = navigation_block(&comparison.labels, position, next_figure_id);
    let crops = if comparison.has_crops() {
        Some(CropLayout::prepare(comparison, position.index, images, options)?)
    } else {
        None
    };

    let mut tex = TexFragments::new();
    let mut figure_id = next_figure_id;
    for (image_index, (input, label)) in comparison
        .inputs
        .iter()
        .zip(&comparison.labels)
        .enumerate()
    {
        tex.line("\\clearpage");
        if image_index == 0 {
            tex.line(COMPARISON_MARKER);
            tex.line(hypertarget(&comparison_anchor(position.index)));
        }

        tex.line("\\begin{figure*}[h!]");
        tex.line("\\centering");
        match &crops {
            Some(layout) => layout.emit(&mut tex, comparison, input, image_index),
            None => {
                tex.line(format!(
                    "\\frame{{\\includegraphics[width={}\\textwidth]{{{}}}}}",
                    tex_number(comparison.fig_width_relative),
                    tex_path(input)
                ));
            }
        }
        tex.push(format!("\\caption{{{}}}", comparison.caption));
        tex.line(hypertarget(&figure_anchor(figure_id)));
        figure_id += 1;
        tex.line("\\end{figure*}");

        tex.line("\\begin{center}");
        tex.line(format!("\\huge{{{label}}}"));
        tex.line("\\end{center}");
        tex.append(navigation.clone());
        tex.blank();
        tex.line("\\clearpage");
        tex.blank();
    }

    Ok((tex, figure_id))
}
