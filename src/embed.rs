// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! README embedding for rendered artifacts.
//!
//! Produces an HTML table with one row per target that references the
//! published card and chart images, and can splice that table into a README
//! between two marker comments.

use std::{fmt::Write as _, fs, path::Path};

use tracing::{debug, info};

use crate::{
    card::escape_xml,
    config::Artifact,
    error::{self, Error},
    normalizer::{RenderPlan, RenderTarget},
};

/// Marker opening the generated README section.
pub const EMBED_START_MARKER: &str = "<!-- ghstat:start -->";
/// Marker closing the generated README section.
pub const EMBED_END_MARKER: &str = "<!-- ghstat:end -->";

/// Builds the README table for `plan` with images served from `base_url`.
///
/// # Errors
///
/// Returns [`Error::Validation`] when `base_url` is not an `http(s)` URL.
///
/// # Example
///
/// ```
/// use ghstat::{embed_snippet, parse_plan};
///
/// let plan = parse_plan("targets:\n  - user: octocat\n",).unwrap();
/// let html = embed_snippet(&plan, "https://example.com/stats/",).unwrap();
/// assert!(html.contains("https://example.com/stats/octocat-card.svg"));
/// ```
pub fn embed_snippet(plan: &RenderPlan, base_url: &str,) -> Result<String, Error,>
{
    let base = normalize_base_url(base_url,)?;

    let mut table = String::from(
        "<table>\n  <thead>\n    <tr><th>Account</th><th>Stats</th><th>Languages</th></tr>\n  </thead>\n  <tbody>",
    );

    for target in &plan.targets {
        let _ = write!(
            table,
            "\n    <tr>\n      <td><a href=\"https://github.com/{login}\"><code>{name}</code></a></td>\n      <td>{card}</td>\n      <td>{chart}</td>\n    </tr>",
            login = escape_xml(&target.login),
            name = escape_xml(&target.display_name),
            card = image_cell(target, Artifact::Card, base,),
            chart = image_cell(target, Artifact::Chart, base,),
        );
    }

    table.push_str("\n  </tbody>\n</table>",);
    Ok(table,)
}

/// Replaces the section between [`EMBED_START_MARKER`] and
/// [`EMBED_END_MARKER`] in the README at `readme_path`.
///
/// The file is only rewritten when the content changes. Returns `true` when
/// it was rewritten.
///
/// # Errors
///
/// Returns [`Error::Io`] when the README cannot be read,
/// [`Error::AssetIo`] when it cannot be written and [`Error::Validation`]
/// when the markers are missing or out of order.
pub fn update_readme(readme_path: &Path, plan: &RenderPlan, base_url: &str,) -> Result<bool, Error,>
{
    info!("Reading README from {}", readme_path.display());
    let content =
        fs::read_to_string(readme_path,).map_err(|source| error::io_error(readme_path, source,),)?;

    let snippet = embed_snippet(plan, base_url,)?;
    let updated = replace_section(&content, &snippet,)?;

    if updated == content {
        info!("No changes to README");
        return Ok(false,);
    }

    fs::write(readme_path, updated,)
        .map_err(|source| error::asset_io_error(readme_path, source,),)?;
    info!("README updated with {} targets", plan.targets.len());
    Ok(true,)
}

fn replace_section(content: &str, snippet: &str,) -> Result<String, Error,>
{
    let start = content.find(EMBED_START_MARKER,).ok_or_else(|| {
        Error::validation(format!("start marker not found: {EMBED_START_MARKER}"),)
    },)?;

    let search_from = start + EMBED_START_MARKER.len();
    let end = content[search_from..]
        .find(EMBED_END_MARKER,)
        .ok_or_else(|| Error::validation(format!("end marker not found: {EMBED_END_MARKER}"),),)?
        + search_from;

    debug!("Replacing README section at bytes {}..{}", search_from, end);
    let mut result = String::with_capacity(content.len() + snippet.len(),);
    result.push_str(&content[..search_from],);
    result.push('\n',);
    result.push_str(snippet,);
    result.push('\n',);
    result.push_str(&content[end..],);
    Ok(result,)
}

fn image_cell(target: &RenderTarget, artifact: Artifact, base: &str,) -> String
{
    if !target.wants(artifact,) {
        return "&mdash;".to_owned();
    }

    let alt = match artifact {
        Artifact::Card => "GitHub stats",
        Artifact::Chart => "Language distribution",
    };
    let url = format!("{base}/{}", artifact.file_name(&target.slug,));
    format!(
        "<img alt=\"{} {alt}\" src=\"{}\" />",
        escape_xml(&target.display_name),
        escape_xml(&url),
    )
}

fn normalize_base_url(base_url: &str,) -> Result<&str, Error,>
{
    let trimmed = base_url.trim().trim_end_matches('/',);
    let has_scheme = trimmed.starts_with("https://",) || trimmed.starts_with("http://",);
    let has_host = trimmed.split_once("://",).is_some_and(|(_, rest,)| !rest.is_empty(),);

    if !has_scheme || !has_host {
        return Err(Error::validation(format!(
            "base URL must be an http(s) URL, got '{base_url}'"
        ),),);
    }
    Ok(trimmed,)
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;
    use crate::normalizer::parse_plan;

    fn plan() -> RenderPlan
    {
        parse_plan(
            "targets:\n  - user: octocat\n    display_name: Octo & Co\n  - user: hubot\n    artifacts: [chart]\n",
        )
        .expect("valid plan",)
    }

    #[test]
    fn snippet_has_one_row_per_target()
    {
        let html = embed_snippet(&plan(), "https://cdn.example.com/stats/",).expect("snippet",);

        assert_eq!(html.matches("<tr>\n      <td>",).count(), 2);
        assert!(html.contains("src=\"https://cdn.example.com/stats/octocat-card.svg\""));
        assert!(html.contains("src=\"https://cdn.example.com/stats/octocat-chart.svg\""));
        assert!(html.contains("src=\"https://cdn.example.com/stats/hubot-chart.svg\""));
        assert!(!html.contains("hubot-card.svg"));
        assert!(html.contains("&mdash;"));
    }

    #[test]
    fn snippet_escapes_display_names()
    {
        let html = embed_snippet(&plan(), "https://cdn.example.com",).expect("snippet",);
        assert!(html.contains("<code>Octo &amp; Co</code>"));
    }

    #[test]
    fn base_url_must_be_http()
    {
        assert!(embed_snippet(&plan(), "ftp://example.com",).is_err());
        assert!(embed_snippet(&plan(), "https://",).is_err());
        assert!(embed_snippet(&plan(), "",).is_err());
    }

    #[test]
    fn update_readme_replaces_marked_section()
    {
        let directory = tempdir().expect("temp dir",);
        let readme = directory.path().join("README.md",);
        fs::write(
            &readme,
            format!("# Stats\n\n{EMBED_START_MARKER}\nold\n{EMBED_END_MARKER}\n\nFooter\n"),
        )
        .expect("write readme",);

        let changed = update_readme(&readme, &plan(), "https://cdn.example.com",).expect("update",);
        assert!(changed);

        let content = fs::read_to_string(&readme,).expect("read readme",);
        assert!(!content.contains("\nold\n"));
        assert!(content.contains("octocat-card.svg"));
        assert!(content.starts_with("# Stats"));
        assert!(content.trim_end().ends_with("Footer"));

        let unchanged =
            update_readme(&readme, &plan(), "https://cdn.example.com",).expect("second update",);
        assert!(!unchanged);
    }

    #[test]
    fn missing_markers_are_reported()
    {
        let error = replace_section("# No markers", "table",).expect_err("expected failure",);
        assert!(error.to_string().contains("start marker not found"));

        let error = replace_section(EMBED_START_MARKER, "table",).expect_err("expected failure",);
        assert!(error.to_string().contains("end marker not found"));
    }
}
