// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! SVG renderers for the stat card and the language chart.
//!
//! Both images are built as plain strings so they can be served or written
//! without a rendering backend. Every piece of text that originates from
//! GitHub or from the render plan is XML-escaped before it is embedded.

use std::{borrow::Cow, fmt::Write as _};

use crate::{
    chart::{ChartGeometry, FULL_CIRCLE},
    config::Artifact,
    error::ErrorResult,
    model::StatsSummary
};

const FONT_FAMILY: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif";

const CARD_WIDTH: u32 = 320;
const CARD_HEIGHT: u32 = 240;
const CARD_PADDING: u32 = 24;
const ICON_SIZE: u32 = 18;
const ROW_GAP: u32 = 12;
const CARD_BACKGROUND: &str = "#ffffff";
const CARD_BORDER: &str = "#e2e8f0";
const CARD_TEXT_PRIMARY: &str = "#1a202c";
const CARD_TEXT_SECONDARY: &str = "#718096";

const CHART_WIDTH: u32 = 420;
const CHART_HEIGHT: u32 = 300;
const CHART_BACKGROUND: &str = "#1a202c";
const CHART_BORDER: &str = "#4a5568";
const CHART_TEXT_PRIMARY: &str = "#ffffff";
const CHART_TEXT_SECONDARY: &str = "#a0aec0";
const PIE_CENTER_X: f64 = 110.0;
const PIE_CENTER_Y: f64 = 170.0;
const PIE_RADIUS: f64 = 75.0;
const LEGEND_X: u32 = 220;
const LEGEND_TOP: u32 = 100;
const LEGEND_ROW_HEIGHT: u32 = 22;
/// Legend rows that fit below the title.
const MAX_LEGEND_ROWS: usize = 8;

/// Message drawn on the chart when the user has no language data.
pub const NO_LANGUAGE_DATA: &str = "No language data available for this user.";

const ICON_USER: &str = r#"<path d="M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/>"#;
const ICON_USER_CHECK: &str = r#"<path d="m16 11 2 2 4-4"/><path d="M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2"/><circle cx="9" cy="7" r="4"/>"#;
const ICON_USER_PLUS: &str = r#"<path d="M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2"/><circle cx="9" cy="7" r="4"/><line x1="19" x2="19" y1="8" y2="14"/><line x1="22" x2="16" y1="11" y2="11"/>"#;
const ICON_GIT_BRANCH: &str = r#"<line x1="6" x2="6" y1="3" y2="15"/><path d="M18 6c0 2-2 3-3 3H6"/><circle cx="18" cy="6" r="3"/><circle cx="6" cy="18" r="3"/><path d="M18 9a9 9 0 0 1-9 9"/>"#;
const ICON_STAR: &str = r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#;

/// Canvas size in pixels of an artifact.
pub fn canvas_size(artifact: Artifact) -> (u32, u32) {
    match artifact {
        Artifact::Card => (CARD_WIDTH, CARD_HEIGHT),
        Artifact::Chart => (CHART_WIDTH, CHART_HEIGHT)
    }
}

/// Renders the 320x240 stat card.
///
/// # Example
///
/// ```
/// use ghstat::{StatsSummary, render_stat_card};
///
/// let summary = StatsSummary {
///     username:     "octocat".to_owned(),
///     followers:    20,
///     following:    1,
///     public_repos: 8,
///     stars:        42
/// };
/// let svg = render_stat_card(&summary);
/// assert!(svg.contains("GitHub Stats for octocat"));
/// ```
pub fn render_stat_card(summary: &StatsSummary) -> String {
    let username = escape_xml(&summary.username);
    let title = format!("GitHub Stats for {username}");
    let mut buffer = open_card(&title);

    let rows: [(&str, Cow<'_, str>, &str); 5] = [
        ("UserName", username.clone(), ICON_USER),
        ("Followers", Cow::Owned(summary.followers.to_string()), ICON_USER_CHECK),
        ("Following", Cow::Owned(summary.following.to_string()), ICON_USER_PLUS),
        ("Public Repos", Cow::Owned(summary.public_repos.to_string()), ICON_GIT_BRANCH),
        ("Stars", Cow::Owned(summary.stars.to_string()), ICON_STAR)
    ];

    let first_row = CARD_PADDING + 16 + 24 + ROW_GAP;
    for (index, (label, value, icon)) in rows.iter().enumerate() {
        let y = first_row + index as u32 * (ICON_SIZE + ROW_GAP);
        let _ = writeln!(
            buffer,
            "  <g>\n    <svg x=\"{CARD_PADDING}\" y=\"{}\" width=\"{ICON_SIZE}\" height=\"{ICON_SIZE}\" viewBox=\"0 0 24 24\" fill=\"none\" stroke=\"{CARD_TEXT_SECONDARY}\" stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\">{icon}</svg>",
            y - ICON_SIZE / 2,
        );
        let _ = writeln!(
            buffer,
            "    <text x=\"{}\" y=\"{y}\" dominant-baseline=\"middle\" font-size=\"14\" fill=\"{CARD_TEXT_SECONDARY}\">{label}</text>",
            CARD_PADDING + ICON_SIZE + 8,
        );
        let _ = writeln!(
            buffer,
            "    <text x=\"{}\" y=\"{y}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-size=\"14\" font-weight=\"500\" fill=\"{CARD_TEXT_PRIMARY}\">{value}</text>\n  </g>",
            CARD_WIDTH - CARD_PADDING,
        );
    }

    buffer.push_str("</svg>\n");
    buffer
}

/// Renders the 420x300 language chart for `login`.
///
/// Slices are drawn as SVG arc paths; a single slice covering the whole
/// circle is drawn as a circle. At most eight legend rows are listed.
pub fn render_language_chart(login: &str, geometry: &ChartGeometry) -> String {
    let mut buffer = open_chart(&format!("Language Distribution for {}", escape_xml(login)));

    if geometry.is_empty() {
        let _ = writeln!(
            buffer,
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"18\" fill=\"{CHART_TEXT_SECONDARY}\">{NO_LANGUAGE_DATA}</text>",
            CHART_WIDTH / 2,
            CHART_HEIGHT / 2 + 10,
        );
        buffer.push_str("</svg>\n");
        return buffer;
    }

    buffer.push_str("  <g>\n");
    for slice in geometry.slices() {
        let language = escape_xml(&slice.language);
        if slice.span() >= FULL_CIRCLE {
            let _ = writeln!(
                buffer,
                "    <circle cx=\"{PIE_CENTER_X:.2}\" cy=\"{PIE_CENTER_Y:.2}\" r=\"{PIE_RADIUS:.2}\" fill=\"{}\"><title>{language}</title></circle>",
                slice.color,
            );
        } else if let Some(path) = slice.arc_path(PIE_CENTER_X, PIE_CENTER_Y, PIE_RADIUS) {
            let _ = writeln!(
                buffer,
                "    <path d=\"{path}\" fill=\"{}\"><title>{language}</title></path>",
                slice.color,
            );
        }
    }
    buffer.push_str("  </g>\n");

    for (row, slice) in geometry.slices().iter().take(MAX_LEGEND_ROWS).enumerate() {
        let y = LEGEND_TOP + row as u32 * LEGEND_ROW_HEIGHT;
        let _ = writeln!(
            buffer,
            "  <circle cx=\"{}\" cy=\"{}\" r=\"5\" fill=\"{}\"/>",
            LEGEND_X + 5,
            y,
            slice.color,
        );
        let _ = writeln!(
            buffer,
            "  <text x=\"{}\" y=\"{y}\" dominant-baseline=\"middle\" font-size=\"14\" fill=\"{CHART_TEXT_PRIMARY}\">{}: {:.2}%</text>",
            LEGEND_X + 18,
            escape_xml(&slice.language),
            slice.share,
        );
    }

    buffer.push_str("</svg>\n");
    buffer
}

/// Renders an error in place of the requested artifact, on the same canvas.
pub fn render_error_card(artifact: Artifact, error: &ErrorResult) -> String {
    let (width, height) = canvas_size(artifact);
    let message = escape_xml(&error.message);
    let (mut buffer, color) = match artifact {
        Artifact::Card => (open_card("GitHub Stats unavailable"), CARD_TEXT_SECONDARY),
        Artifact::Chart => (
            open_chart("Language Distribution unavailable"),
            CHART_TEXT_SECONDARY
        )
    };

    let _ = writeln!(
        buffer,
        "  <foreignObject x=\"{CARD_PADDING}\" y=\"{}\" width=\"{}\" height=\"{}\"><div xmlns=\"http://www.w3.org/1999/xhtml\" style=\"font-size:14px;color:{color};text-align:center;word-wrap:break-word\">{message}</div></foreignObject>",
        height / 2 - 20,
        width - 2 * CARD_PADDING,
        height / 2,
    );
    let _ = writeln!(buffer, "  <desc>{message}</desc>");
    buffer.push_str("</svg>\n");
    buffer
}

fn open_card(title: &str) -> String {
    let mut buffer = String::with_capacity(2048);
    let _ = writeln!(
        buffer,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"{title}\" width=\"{CARD_WIDTH}\" height=\"{CARD_HEIGHT}\" viewBox=\"0 0 {CARD_WIDTH} {CARD_HEIGHT}\" fill=\"none\" font-family=\"{FONT_FAMILY}\">",
    );
    let _ = writeln!(
        buffer,
        "  <rect x=\"0.5\" y=\"0.5\" rx=\"8\" width=\"{}\" height=\"{}\" fill=\"{CARD_BACKGROUND}\" stroke=\"{CARD_BORDER}\" stroke-width=\"1\"/>",
        CARD_WIDTH - 1,
        CARD_HEIGHT - 1,
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"20\" font-weight=\"700\" fill=\"{CARD_TEXT_PRIMARY}\">{title}</text>",
        CARD_WIDTH / 2,
        CARD_PADDING + 12,
    );
    buffer
}

fn open_chart(title: &str) -> String {
    let mut buffer = String::with_capacity(4096);
    let _ = writeln!(
        buffer,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"{title}\" width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\" font-family=\"{FONT_FAMILY}\">",
    );
    let _ = writeln!(
        buffer,
        "  <rect x=\"0.5\" y=\"0.5\" rx=\"8\" width=\"{}\" height=\"{}\" fill=\"{CHART_BACKGROUND}\" stroke=\"{CHART_BORDER}\" stroke-width=\"1\"/>",
        CHART_WIDTH - 1,
        CHART_HEIGHT - 1,
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"{}\" y=\"44\" text-anchor=\"middle\" font-size=\"20\" font-weight=\"700\" fill=\"{CHART_TEXT_PRIMARY}\">{title}</text>",
        CHART_WIDTH / 2,
    );
    buffer
}

/// Escapes the five XML special characters.
pub(crate) fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len() + 8);
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chart::{ChartPolicy, Palette, chart_geometry},
        model::LanguageEntry
    };

    fn summary() -> StatsSummary {
        StatsSummary {
            username:     "octocat".to_owned(),
            followers:    20,
            following:    1,
            public_repos: 8,
            stars:        17
        }
    }

    #[test]
    fn stat_card_lists_every_row_in_order() {
        let svg = render_stat_card(&summary());

        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("width=\"320\" height=\"240\""));

        let labels = ["UserName", "Followers", "Following", "Public Repos", "Stars"];
        let positions: Vec<usize> = labels
            .iter()
            .map(|label| svg.find(&format!(">{label}<")).expect("label should be present"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(svg.contains(">17</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn stat_card_escapes_username() {
        let mut summary = summary();
        summary.username = "<script>&".to_owned();

        let svg = render_stat_card(&summary);
        assert!(svg.contains("GitHub Stats for &lt;script&gt;&amp;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn chart_draws_one_path_per_slice_and_legend() {
        let entries = vec![
            LanguageEntry::new("Rust", 60),
            LanguageEntry::new("Go", 30),
            LanguageEntry::new("C", 10),
        ];
        let geometry = chart_geometry(&entries, ChartPolicy::default(), Palette::Vivid);

        let svg = render_language_chart("octocat", &geometry);
        assert!(svg.contains("Language Distribution for octocat"));
        assert_eq!(svg.matches("<path d=\"M ").count(), 3);
        assert!(svg.contains("Rust: 60.00%"));
        assert!(svg.contains("C: 10.00%"));
        assert!(svg.contains("#954EA3"));
    }

    #[test]
    fn single_language_chart_is_a_full_circle() {
        let geometry =
            chart_geometry(&[LanguageEntry::new("Rust", 5)], ChartPolicy::default(), Palette::Vivid);

        let svg = render_language_chart("octocat", &geometry);
        assert!(svg.contains("<circle cx=\"110.00\" cy=\"170.00\" r=\"75.00\""));
        assert!(!svg.contains("<path d=\"M "));
        assert!(svg.contains("Rust: 100.00%"));
    }

    #[test]
    fn empty_chart_shows_placeholder_text() {
        let svg = render_language_chart("octocat", &ChartGeometry::Empty);
        assert!(svg.contains(NO_LANGUAGE_DATA));
        assert!(svg.contains("#1a202c"));
    }

    #[test]
    fn legend_is_capped() {
        let entries: Vec<LanguageEntry> = (0..12)
            .map(|index| LanguageEntry::new(format!("Lang{index}"), 100 - index))
            .collect();
        let geometry = chart_geometry(&entries, ChartPolicy::top_n(12), Palette::Vivid);

        let svg = render_language_chart("octocat", &geometry);
        assert_eq!(svg.matches("<path d=\"M ").count(), 12);
        assert_eq!(svg.matches(" r=\"5\"").count(), MAX_LEGEND_ROWS);
    }

    #[test]
    fn error_card_uses_artifact_canvas() {
        let error = ErrorResult::new("GitHub user 'ghost' was not found");

        let card = render_error_card(Artifact::Card, &error);
        assert!(card.contains("width=\"320\" height=\"240\""));
        assert!(card.contains("GitHub user &apos;ghost&apos; was not found"));

        let chart = render_error_card(Artifact::Chart, &error);
        assert!(chart.contains("width=\"420\" height=\"300\""));
        assert!(chart.contains("#1a202c"));
    }

    #[test]
    fn escape_xml_handles_all_special_characters() {
        assert_eq!(escape_xml("&<>\"'normal"), "&amp;&lt;&gt;&quot;&apos;normal");
    }

    #[test]
    fn escape_xml_borrows_plain_text() {
        assert!(matches!(escape_xml("plain"), Cow::Borrowed("plain")));
    }
}
