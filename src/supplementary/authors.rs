//! Author line and institution legend.

use crate::config::Author;
use crate::tex::TexFragments;

/// Why the author block had to be left out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorMismatch {
    #[error("author {author:?} references institution 0, institution indices start at 1")]
    ZeroIndex { author: String },

    #[error("author {author:?} references institution {id}, but only {count} are listed")]
    OutOfRange {
        author: String,
        id: usize,
        count: usize,
    },

    #[error(
        "{count} institution(s) listed but authors reference at most {max}, is one missing?"
    )]
    CountMismatch { count: usize, max: usize },
}

/// Every institution index must resolve, and every institution must be referenced
/// up to the last one.
pub fn check_institutions(
    authors: &[Author],
    institutions: &[String],
) -> Result<(), AuthorMismatch> {
    let count = institutions.len();
    let mut max = 0;
    for author in authors {
        for &id in &author.institution_ids {
            if id == 0 {
                return Err(AuthorMismatch::ZeroIndex {
                    author: author.name.clone(),
                });
            }
            if id > count {
                return Err(AuthorMismatch::OutOfRange {
                    author: author.name.clone(),
                    id,
                    count,
                });
            }
            max = max.max(id);
        }
    }
    if max != count {
        return Err(AuthorMismatch::CountMismatch { count, max });
    }
    Ok(())
}

/// `\author{..}` with superscript affiliations and the institution legend.
///
/// Returns empty fragments when there are no authors at all.
pub fn author_block(
    authors: &[Author],
    institutions: &[String],
) -> Result<TexFragments, AuthorMismatch> {
    let mut tex = TexFragments::new();
    if authors.is_empty() && institutions.is_empty() {
        return Ok(tex);
    }
    check_institutions(authors, institutions)?;

    let names: Vec<String> = authors.iter().map(author_with_affiliations).collect();
    tex.push("\\author{");
    tex.push(names.join(", "));
    tex.line("\\\\");

    let legend: Vec<String> = institutions
        .iter()
        .enumerate()
        .map(|(i, institution)| format!("$^{}${institution}", i + 1))
        .collect();
    tex.push("\\small{");
    tex.push(legend.join("\\hspace{1.5em} "));
    tex.push("}");
    tex.line("}");
    tex.blank();
    Ok(tex)
}

fn author_with_affiliations(author: &Author) -> String {
    if author.institution_ids.is_empty() {
        return author.name.clone();
    }
    let ids: Vec<String> = author.institution_ids.iter().map(usize::to_string).collect();
    format!("{}$^{{{}}}$", author.name, ids.join(", "))
}
