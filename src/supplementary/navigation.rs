//! Hyperlink anchors and the per-comparison navigation block.

use crate::tex::TexFragments;

const PREVIOUS_TEXT: &str = "$\\leftarrow$ Previous Comparison";
const NEXT_TEXT: &str = "Next Comparison $\\rightarrow$";

/// Where a comparison sits in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPosition {
    pub index: usize,
    pub is_last: bool,
}

impl ComparisonPosition {
    pub fn new(index: usize, count: usize) -> Self {
        Self {
            index,
            is_last: index + 1 >= count,
        }
    }

    pub fn previous(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    pub fn next(&self) -> Option<usize> {
        (!self.is_last).then_some(self.index + 1)
    }
}

pub fn figure_anchor(id: usize) -> String {
    format!("fig:{id}")
}

pub fn comparison_anchor(index: usize) -> String {
    format!("comparison:{index}")
}

pub fn hypertarget(anchor: &str) -> String {
    format!("\\hypertarget{{{anchor}}}{{}}")
}

/// Link to `anchor`, or the same text in white when there is nowhere to go so the
/// layout does not shift.
fn link_or_inert(anchor: Option<String>, text: &str) -> String {
    match anchor {
        Some(anchor) => format!("\\hyperlink{{{anchor}}}{{{text}}}"),
        None => format!("\\textcolor{{white}}{{{text}}}"),
    }
}

/// Label links to every image of the comparison, then previous/next links.
///
/// Label `i` points at figure `first_figure + i`, the anchor the `i`-th image
/// receives when the comparison is rendered.
pub fn navigation_block(
    labels: &[String],
    position: ComparisonPosition,
    first_figure: usize,
) -> TexFragments {
    let mut tex = TexFragments::new();
    tex.line("\\noindent\\newline\\vspace{3mm}");
    for (offset, label) in labels.iter().enumerate() {
        tex.line(format!(
            "\\hyperlink{{{}}}{{\\Large{{{label}}}}}\\newline\\vspace{{3mm}}",
            figure_anchor(first_figure + offset)
        ));
    }
    tex.line("\\\\");
    tex.line("\\begin{center}");
    tex.push(link_or_inert(
        position.previous().map(comparison_anchor),
        PREVIOUS_TEXT,
    ));
    tex.line("\\qquad");
    tex.line(link_or_inert(position.next().map(comparison_anchor), NEXT_TEXT));
    tex.line("\\end{center}");
    tex
}
