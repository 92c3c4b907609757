// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Pie chart geometry for language distributions.
//!
//! The builder works in two steps. [`bucket_languages`] keeps the head of the
//! distribution according to a single [`ChartPolicy`] and folds the tail into
//! an "Other" entry. [`build_geometry`] then walks the kept entries once and
//! assigns each one an angular span rounded to two decimals. The last slice
//! always ends at exactly 360 degrees, so rounding drift never leaves a gap or
//! an overlap in the rendered circle.
//!
//! Angles are measured clockwise from twelve o'clock, the same convention as
//! a CSS `conic-gradient`.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::model::LanguageEntry;

/// Label of the synthetic bucket collecting the tail of the distribution.
pub const OTHER_LABEL: &str = "Other";
/// Number of languages kept by [`ChartPolicy::default`].
pub const DEFAULT_TOP_LANGUAGES: usize = 5;
/// Minimum share in percent used by [`ChartPolicy::min_share`].
pub const DEFAULT_MIN_SHARE_PERCENT: f64 = 2.0;
/// Full turn in degrees.
pub const FULL_CIRCLE: f64 = 360.0;

const VIVID_COLORS: &[&str] = &[
    "#954EA3", "#2AFB3D", "#7B00F1", "#A771DA", "#8A5470", "#0518FA", "#FF5733", "#33FF57",
    "#3357FF", "#FF33FF", "#33FFFF", "#FFFF33",
];

const CLASSIC_COLORS: &[&str] = &[
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#AF19FF", "#FF197D", "#19FFFF", "#FF9919",
    "#82CA9D",
];

/// Rule deciding which languages get their own slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ChartPolicy {
    /// Keep the `limit` largest languages.
    TopN {
        /// Number of languages kept, at least one.
        limit: usize
    },
    /// Keep every language whose share of the total is at least `percent`.
    MinShare {
        /// Threshold in percent, within `(0, 100]`.
        percent: f64
    }
}

impl ChartPolicy {
    /// Top-N policy with the given limit.
    pub fn top_n(limit: usize) -> Self {
        Self::TopN {
            limit
        }
    }

    /// Share threshold policy using [`DEFAULT_MIN_SHARE_PERCENT`].
    pub fn min_share() -> Self {
        Self::MinShare {
            percent: DEFAULT_MIN_SHARE_PERCENT
        }
    }
}

impl Default for ChartPolicy {
    fn default() -> Self {
        Self::top_n(DEFAULT_TOP_LANGUAGES)
    }
}

/// Fixed color palettes. Slice colors cycle through the palette by index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Saturated twelve-color palette used by the chart image.
    #[default]
    Vivid,
    /// Nine-color palette used by the interactive page chart.
    Classic
}

impl Palette {
    /// Colors of the palette, never empty.
    pub fn colors(self) -> &'static [&'static str] {
        match self {
            Self::Vivid => VIVID_COLORS,
            Self::Classic => CLASSIC_COLORS
        }
    }

    /// Color for the slice at `index`, cycling when the palette is shorter
    /// than the slice list.
    pub fn color(self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

/// One slice of the pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    /// Language name or [`OTHER_LABEL`].
    pub language:    String,
    /// Bytes represented by the slice.
    pub bytes:       u64,
    /// Position of the slice in the palette.
    pub color_index: usize,
    /// Resolved palette color.
    pub color:       &'static str,
    /// Start angle in degrees.
    pub start_angle: f64,
    /// End angle in degrees.
    pub end_angle:   f64,
    /// Share of the total in percent, rounded to two decimals.
    pub share:       f64
}

impl ChartSlice {
    /// Angular span of the slice in degrees.
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// SVG path outlining the slice on a circle of radius `radius` centered
    /// at (`cx`, `cy`).
    ///
    /// Returns `None` for a slice covering the whole circle (draw a circle
    /// instead) or for an empty slice.
    pub fn arc_path(&self, cx: f64, cy: f64, radius: f64) -> Option<String> {
        let span = self.span();
        if span <= 0.0 || span >= FULL_CIRCLE {
            return None;
        }

        let (x0, y0) = point_on_circle(cx, cy, radius, self.start_angle);
        let (x1, y1) = point_on_circle(cx, cy, radius, self.end_angle);
        let large_arc = u8::from(span > 180.0);

        let mut path = String::with_capacity(96);
        let _ = write!(
            path,
            "M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z"
        );
        Some(path)
    }
}

/// Result of the geometry step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "slices", rename_all = "snake_case")]
pub enum ChartGeometry {
    /// Total bytes were zero; renderers show a "no data" message.
    Empty,
    /// Slices partitioning the full circle.
    Slices(Vec<ChartSlice>)
}

impl ChartGeometry {
    /// Returns the slices, empty for [`ChartGeometry::Empty`].
    pub fn slices(&self) -> &[ChartSlice] {
        match self {
            Self::Empty => &[],
            Self::Slices(slices) => slices
        }
    }

    /// Returns `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Keeps the head of the distribution and folds the rest into "Other".
///
/// The "Other" entry is appended only when the folded bytes are greater than
/// zero. A language literally named "Other" is merged into that bucket, and a
/// top-N limit below one is treated as one.
///
/// # Example
///
/// ```
/// use ghstat::{ChartPolicy, LanguageEntry, bucket_languages};
///
/// let entries = vec![
///     LanguageEntry::new("Rust", 90),
///     LanguageEntry::new("Shell", 6),
///     LanguageEntry::new("Nix", 4),
/// ];
/// let bucketed = bucket_languages(&entries, ChartPolicy::top_n(1));
/// assert_eq!(bucketed[1], LanguageEntry::new("Other", 10));
/// ```
pub fn bucket_languages(entries: &[LanguageEntry], policy: ChartPolicy) -> Vec<LanguageEntry> {
    let (named, literal_other): (Vec<&LanguageEntry>, Vec<&LanguageEntry>) = entries
        .iter()
        .partition(|entry| entry.language != OTHER_LABEL);

    let (kept, remainder): (Vec<&LanguageEntry>, Vec<&LanguageEntry>) = match policy {
        ChartPolicy::TopN {
            limit
        } => {
            let split = limit.max(1).min(named.len());
            (named[..split].to_vec(), named[split..].to_vec())
        }
        ChartPolicy::MinShare {
            percent
        } => {
            let total = total_bytes(entries);
            if total == 0 {
                return entries.to_vec();
            }
            named
                .into_iter()
                .partition(|entry| share_percent(entry.bytes, total) >= percent)
        }
    };

    let other = remainder
        .iter()
        .chain(literal_other.iter())
        .fold(0u64, |sum, entry| sum.saturating_add(entry.bytes));

    let mut bucketed: Vec<LanguageEntry> = kept.into_iter().cloned().collect();
    if other > 0 {
        bucketed.push(LanguageEntry::new(OTHER_LABEL, other));
    }
    bucketed
}

/// Computes slice angles for an ordered, already bucketed entry list.
///
/// Each span is `bytes / total * 360` rounded to two decimals, accumulated in
/// order. The final slice is closed at exactly 360 degrees.
pub fn build_geometry(entries: &[LanguageEntry], palette: Palette) -> ChartGeometry {
    let total = total_bytes(entries);
    if total == 0 {
        return ChartGeometry::Empty;
    }

    let last = entries.len() - 1;
    let mut running = 0.0_f64;
    let mut slices = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let span = round2(entry.bytes as f64 * FULL_CIRCLE / total as f64);
        let start_angle = running;
        let end_angle = if index == last {
            FULL_CIRCLE
        } else {
            (start_angle + span).min(FULL_CIRCLE)
        };
        running = end_angle;

        slices.push(ChartSlice {
            language: entry.language.clone(),
            bytes: entry.bytes,
            color_index: index,
            color: palette.color(index),
            start_angle,
            end_angle,
            share: round2(share_percent(entry.bytes, total))
        });
    }

    ChartGeometry::Slices(slices)
}

/// Buckets `entries` with `policy` and computes the resulting geometry.
pub fn chart_geometry(
    entries: &[LanguageEntry],
    policy: ChartPolicy,
    palette: Palette
) -> ChartGeometry {
    build_geometry(&bucket_languages(entries, policy), palette)
}

/// Builds the CSS `conic-gradient` equivalent of the geometry.
///
/// Returns `None` for empty geometry.
pub fn conic_gradient(geometry: &ChartGeometry) -> Option<String> {
    let slices = geometry.slices();
    if slices.is_empty() {
        return None;
    }

    let mut gradient = String::from("conic-gradient(");
    for (index, slice) in slices.iter().enumerate() {
        if index > 0 {
            gradient.push_str(", ");
        }
        let _ = write!(gradient, "{} {:.2}deg", slice.color, slice.end_angle);
    }
    gradient.push(')');
    Some(gradient)
}

fn total_bytes(entries: &[LanguageEntry]) -> u64 {
    entries
        .iter()
        .fold(0u64, |sum, entry| sum.saturating_add(entry.bytes))
}

fn share_percent(bytes: u64, total: u64) -> f64 {
    bytes as f64 * 100.0 / total as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn point_on_circle(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (cx + radius * radians.sin(), cy - radius * radians.cos())
}
