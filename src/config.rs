//! JSON configuration of a supplementary document.
//!
//! The configuration is deserialized with `serde_json` into [`Document`] and then
//! checked by [`Document::validate`], so that everything downstream can assume
//! labels line up with inputs and crop rectangles are well formed.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::Rgb;
use serde::Deserialize;

use crate::error::ConfigError;

/// Packages every generated document needs, emitted before the user's own.
pub const STANDARD_PACKAGES: [&str; 6] =
    ["amsmath", "color", "epsfig", "hyperref", "tikz", "float"];

/// The whole supplementary document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    pub links_color: LinksColor,
    pub anonymous: bool,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub institutions: Vec<String>,
    pub comparisons: Vec<Comparison>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub name: String,
    /// 1-based positions in [`Document::institutions`].
    #[serde(rename = "institution_id", default)]
    pub institution_ids: Vec<usize>,
}

/// One labeled group of images rendered with shared navigation.
#[derive(Debug, Clone, Deserialize)]
pub struct Comparison {
    pub caption: String,
    pub inputs: Vec<PathBuf>,
    pub labels: Vec<String>,
    pub fig_width_relative: f64,
    pub crops_height_in: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub crops: Vec<CropRect>,
}

impl Comparison {
    pub fn has_crops(&self) -> bool {
        !self.crops.is_empty()
    }
}

/// Pixel rectangle in source image coordinates, origin top-left.
///
/// Written in JSON as `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "[u32; 4]")]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_degenerate(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// True when the rectangle lies inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }
}

impl From<[u32; 4]> for CropRect {
    fn from([left, top, right, bottom]: [u32; 4]) -> Self {
        Self::new(left, top, right, bottom)
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Hyperlink color, written in JSON as `"R,G,B"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct LinksColor(pub Rgb<u8>);

impl FromStr for LinksColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ConfigError::LinksColor(s.to_string());
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = *parts.as_slice() else {
            return Err(bad());
        };
        let channel = |v: &str| v.parse::<u8>().map_err(|_| bad());
        Ok(Self(Rgb([channel(r)?, channel(g)?, channel(b)?])))
    }
}

impl TryFrom<String> for LinksColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LinksColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb([r, g, b]) = self.0;
        write!(f, "{r},{g},{b}")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CropRect>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<CropRect>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    /// Reads, parses and validates a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        json.parse()
    }

    /// Standard packages followed by the requested ones, without repeats.
    pub fn packages(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(STANDARD_PACKAGES.len() + self.packages.len());
        for package in STANDARD_PACKAGES
            .iter()
            .copied()
            .chain(self.packages.iter().map(String::as_str))
        {
            if !out.contains(&package) {
                out.push(package);
            }
        }
        out
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, comparison) in self.comparisons.iter().enumerate() {
            validate_comparison(index, comparison)?;
        }
        Ok(())
    }
}

impl FromStr for Document {
    type Err = ConfigError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        let document: Document = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }
}

pub(crate) fn validate_comparison(
    index: usize,
    comparison: &Comparison,
) -> Result<(), ConfigError> {
    if comparison.inputs.is_empty() {
        return Err(ConfigError::NoInputs { index });
    }
    if comparison.labels.len() != comparison.inputs.len() {
        return Err(ConfigError::LabelCount {
            index,
            labels: comparison.labels.len(),
            inputs: comparison.inputs.len(),
        });
    }

    for (field, value) in [
        ("fig_width_relative", comparison.fig_width_relative),
        ("crops_height_in", comparison.crops_height_in),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::NonPositive {
                index,
                field,
                value,
            });
        }
    }

    if !comparison.has_crops() {
        return Ok(());
    }

    if let Some((crop, rect)) = comparison
        .crops
        .iter()
        .enumerate()
        .find(|(_, rect)| rect.is_degenerate())
    {
        return Err(ConfigError::DegenerateCrop {
            index,
            crop,
            rect: *rect,
        });
    }

    // Crop files are named after the input stem, so stems must be unique.
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (position, input) in comparison.inputs.iter().enumerate() {
        let stem = crate::imaging::file_stem(input);
        if let Some(&first) = seen.get(&stem) {
            return Err(ConfigError::CropNameClash {
                index,
                first,
                second: position,
                stem,
            });
        }
        seen.insert(stem, position);
    }

    Ok(())
}
