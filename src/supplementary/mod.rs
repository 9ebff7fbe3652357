//! Layout generator: turns a [`Document`] into the supplementary LaTeX source.
//!
//! The document is a preamble, one block per comparison and a closing line. The
//! only state carried between comparisons is the figure counter, which is passed
//! into [`render_comparison`] and handed back so anchors stay unique across the
//! whole document.

pub mod authors;
pub mod comparison;
pub mod navigation;
pub mod preamble;

use tracing::info;

use crate::config::Document;
use crate::error::GenerateError;
use crate::imaging::ImageService;
use crate::tex::TexFragments;

pub use authors::{AuthorMismatch, author_block, check_institutions};
pub use comparison::{overlay_box, render_comparison};
pub use navigation::{ComparisonPosition, navigation_block};
pub use preamble::{closure, preamble};

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Regenerate crop files even when they already exist.
    pub force_crops: bool,
}

/// Result of a generation pass.
#[derive(Debug, Clone)]
pub struct Supplementary {
    pub tex: TexFragments,
    /// Figure anchors handed out, `fig:0` to `fig:{figures - 1}`.
    pub figures: usize,
    pub comparisons: usize,
    pub authors_included: bool,
}

/// Generates the full document.
pub fn generate(
    document: &Document,
    images: &dyn ImageService,
    options: &GenerateOptions,
) -> Result<Supplementary, GenerateError> {
    document.validate()?;

    let (mut tex, authors_included) = preamble(document);

    let count = document.comparisons.len();
    let mut next_figure_id = 0;
    for (index, comparison) in document.comparisons.iter().enumerate() {
        let position = ComparisonPosition::new(index, count);
        let (markup, next) =
            render_comparison(comparison, position, next_figure_id, images, options)?;
        info!(
            "Comparison {}/{}: {} image(s), {} crop(s)",
            index + 1,
            count,
            comparison.inputs.len(),
            comparison.crops.len()
        );
        tex.append(markup);
        next_figure_id = next;
    }

    tex.append(closure());

    Ok(Supplementary {
        tex,
        figures: next_figure_id,
        comparisons: count,
        authors_included,
    })
}
