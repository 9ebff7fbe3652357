use tracing::{info, warn};

use super::authors::author_block;
use crate::config::Document;
use crate::tex::{TexFragments, command};

const BANNER: &str = "% AUTO-GENERATED CODE, DO NOT MODIFY!!";
const DOCUMENT_CLASS: &str = "\\documentclass[10pt,letterpaper]{article}";

/// Widens the text block by 1.75in in both directions.
const PAGE_GEOMETRY: [&str; 5] = [
    "\\addtolength{\\oddsidemargin}{-.875in}",
    "\\addtolength{\\evensidemargin}{-.875in}",
    "\\addtolength{\\textwidth}{1.75in}",
    "\\addtolength{\\topmargin}{-.875in}",
    "\\addtolength{\\textheight}{1.75in}",
];

/// Document header up to and including the instructions paragraph.
///
/// Returns the fragments and whether an author block made it in.
pub fn preamble(document: &Document) -> (TexFragments, bool) {
    let mut tex = TexFragments::new();
    tex.line(BANNER);
    tex.line(DOCUMENT_CLASS);
    for package in document.packages() {
        tex.line(command("usepackage", package));
    }
    tex.blank();

    for adjustment in PAGE_GEOMETRY {
        tex.line(adjustment);
    }
    tex.blank();

    tex.line("\\newsavebox\\mybox");
    tex.blank();
    tex.line(format!(
        "\\definecolor{{links_color}}{{RGB}}{{{}}}",
        document.links_color
    ));
    tex.line("\\hypersetup{colorlinks=true, linkcolor=links_color}");
    tex.blank();
    tex.line(format!(
        "\\title{{{}\\\\ ---Supplementary Material---}}",
        document.title
    ));
    tex.blank();
    tex.line("\\date{\\vspace{-5ex}}");
    tex.blank();
    tex.line("\\begin{document}");
    tex.blank();

    let authors = authors_for(document);
    let authors_included = !authors.is_empty();
    tex.append(authors);

    tex.line("\\maketitle");
    tex.blank();
    tex.line("\\vspace{10mm}");
    tex.push("\\noindent ");
    tex.line(&document.instructions);
    tex.blank();
    (tex, authors_included)
}

fn authors_for(document: &Document) -> TexFragments {
    if document.anonymous {
        info!("Omitting authors for anonymity, set 'anonymous' to 'false' if needed.");
        return TexFragments::new();
    }

    info!("Adding author information, set 'anonymous' to 'true' to leave it out.");
    match author_block(&document.authors, &document.institutions) {
        Ok(block) => {
            if block.is_empty() {
                info!("No authors listed, the title page will have none.");
            }
            block
        }
        Err(mismatch) => {
            warn!("Leaving out the author block: {mismatch}");
            TexFragments::new()
        }
    }
}

/// Closing sequence of the document.
pub fn closure() -> TexFragments {
    let mut tex = TexFragments::new();
    tex.line("\\end{document}");
    tex
}
