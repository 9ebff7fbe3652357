//! Ordered LaTeX fragments and small formatting helpers.

use std::path::Path;

/// Markup built as an ordered list of fragments, serialized only at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TexFragments {
    fragments: Vec<String>,
}

impl TexFragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` as-is.
    pub fn push(&mut self, text: impl Into<String>) -> &mut Self {
        self.fragments.push(text.into());
        self
    }

    /// Appends `text` followed by a newline.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        let mut owned = String::with_capacity(text.len() + 1);
        owned.push_str(text);
        owned.push('\n');
        self.fragments.push(owned);
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.push("\n")
    }

    /// Moves every fragment of `other` to the end of `self`.
    pub fn append(&mut self, other: TexFragments) -> &mut Self {
        self.fragments.extend(other.fragments);
        self
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for TexFragments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for fragment in &self.fragments {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

/// Path as LaTeX wants it: forward slashes only.
pub fn tex_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Shortest decimal form of a length factor (`0.8`, `1`, `1.25`).
pub fn tex_number(value: f64) -> String {
    value.to_string()
}

/// `\name{arg}`
pub fn command(name: &str, arg: &str) -> String {
    format!("\\{name}{{{arg}}}")
}
