// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Asset writer for rendered reports.
//!
//! Each target produces its requested SVG artifacts plus a JSON manifest
//! describing the report behind them. A failed report section still yields
//! an SVG (an error card on the same canvas), so embedded images never break.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf}
};

use serde::Serialize;
use tracing::debug;

use crate::{
    card::{render_error_card, render_language_chart, render_stat_card},
    config::Artifact,
    error::{self, Error},
    model::StatsSummary,
    normalizer::RenderTarget,
    report::{LanguageReport, Report, Section}
};

/// One SVG written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFile {
    /// Artifact kind.
    pub kind:          Artifact,
    /// Location of the SVG.
    pub path:          PathBuf,
    /// `Cache-Control` value for servers publishing the file.
    pub cache_control: &'static str,
    /// `true` when the SVG is an error card.
    pub failed:        bool
}

/// Files produced for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAssets {
    /// SVG artifacts in rendering order.
    pub artifacts:     Vec<ArtifactFile>,
    /// Location of the JSON manifest.
    pub manifest_path: PathBuf
}

impl RenderedAssets {
    /// Returns `true` when any artifact is an error card.
    pub fn has_failures(&self) -> bool {
        self.artifacts.iter().any(|artifact| artifact.failed)
    }
}

/// Renders `artifact` for `report`, falling back to an error card.
///
/// The second element is `true` when an error card was rendered.
pub fn render_artifact(report: &Report, artifact: Artifact) -> (String, bool) {
    match artifact {
        Artifact::Card => match &report.stats {
            Section::Ready {
                data
            } => (render_stat_card(data), false),
            Section::Failed {
                error
            } => (render_error_card(artifact, error), true)
        },
        Artifact::Chart => match &report.languages {
            Section::Ready {
                data
            } => (render_language_chart(&report.login, &data.geometry), false),
            Section::Failed {
                error
            } => (render_error_card(artifact, error), true)
        }
    }
}

/// Writes the artifacts requested by `target` and the manifest into
/// `output_dir`, creating the directory when needed.
///
/// # Errors
///
/// Returns [`Error::AssetIo`](Error::AssetIo) when directories or files
/// cannot be created and [`Error::Serialize`](Error::Serialize) if the
/// manifest cannot be encoded.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use ghstat::{
///     ClientConfig, GithubSource, RenderTarget, fetch_report, write_assets
/// };
///
/// # async fn example() -> Result<(), ghstat::Error> {
/// let source = GithubSource::new(&ClientConfig::default())?;
/// let target = RenderTarget::for_login("octocat")?;
/// let report = fetch_report(&source, &target.login, target.policy, target.palette).await;
/// let assets = write_assets(&target, &report, Path::new("public/stats"))?;
/// println!("{}", assets.manifest_path.display());
/// # Ok(())
/// # }
/// ```
pub fn write_assets(
    target: &RenderTarget,
    report: &Report,
    output_dir: &Path
) -> Result<RenderedAssets, Error> {
    fs::create_dir_all(output_dir).map_err(|source| error::asset_io_error(output_dir, source))?;

    let mut artifacts = Vec::with_capacity(target.artifacts.len());
    for &kind in &target.artifacts {
        let path = output_dir.join(kind.file_name(&target.slug));
        let (contents, failed) = render_artifact(report, kind);
        write_file(&path, contents.as_bytes())?;
        debug!("Wrote {} ({} bytes)", path.display(), contents.len());

        artifacts.push(ArtifactFile {
            kind,
            path,
            cache_control: kind.cache_control(),
            failed
        });
    }

    let manifest_path = output_dir.join(format!("{}.json", target.slug));
    write_manifest(&manifest_path, target, report, &artifacts)?;

    Ok(RenderedAssets {
        artifacts,
        manifest_path
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let file = File::create(path).map_err(|source| error::asset_io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .map_err(|source| error::asset_io_error(path, source))?;
    writer
        .flush()
        .map_err(|source| error::asset_io_error(path, source))
}

fn write_manifest(
    path: &Path,
    target: &RenderTarget,
    report: &Report,
    artifacts: &[ArtifactFile]
) -> Result<(), Error> {
    let manifest = AssetManifest {
        slug: &target.slug,
        login: &target.login,
        display_name: &target.display_name,
        artifacts: artifacts
            .iter()
            .map(|artifact| ManifestArtifact {
                kind:          artifact.kind,
                path:          path_to_string(&artifact.path),
                cache_control: artifact.cache_control,
                status:        if artifact.failed { "failed" } else { "ready" }
            })
            .collect(),
        stats: &report.stats,
        languages: &report.languages
    };

    let mut contents = serde_json::to_vec_pretty(&manifest)?;
    contents.push(b'\n');
    write_file(path, &contents)
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[derive(Serialize)]
struct AssetManifest<'a> {
    slug:         &'a str,
    login:        &'a str,
    display_name: &'a str,
    artifacts:    Vec<ManifestArtifact>,
    stats:        &'a Section<StatsSummary>,
    languages:    &'a Section<LanguageReport>
}

#[derive(Serialize)]
struct ManifestArtifact {
    kind:          Artifact,
    path:          String,
    cache_control: &'static str,
    status:        &'static str
}
