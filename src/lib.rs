// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! GitHub profile statistics and language charts.
//!
//! The library aggregates a user's public profile counters and star total,
//! folds per-repository language byte counts into a distribution, and turns
//! that distribution into pie chart geometry. Renderers produce embeddable
//! SVG stat cards and charts, and a YAML render plan drives batch output for
//! several users at once.
//!
//! Aggregation never talks to GitHub directly: it goes through the
//! [`RepositorySource`] trait, implemented by [`GithubSource`] on top of
//! octocrab.

mod assets;
mod card;
mod chart;
mod config;
mod embed;
mod error;
mod github;
mod languages;
mod login;
mod model;
mod normalizer;
mod report;
mod slug;
mod source;
mod stats;

pub use assets::{ArtifactFile, RenderedAssets, render_artifact, write_assets};
pub use card::{
    NO_LANGUAGE_DATA, canvas_size, render_error_card, render_language_chart, render_stat_card,
};
pub use chart::{
    ChartGeometry, ChartPolicy, ChartSlice, DEFAULT_MIN_SHARE_PERCENT, DEFAULT_TOP_LANGUAGES,
    OTHER_LABEL, Palette, bucket_languages, build_geometry, chart_geometry, conic_gradient,
};
pub use config::{
    Artifact, CARD_CACHE_CONTROL, CHART_CACHE_CONTROL, ChartOptions, PolicyKind, RenderConfig,
    TargetEntry,
};
pub use embed::{EMBED_END_MARKER, EMBED_START_MARKER, embed_snippet, update_readme};
pub use error::{Error, ErrorResult, asset_io_error, io_error};
pub use github::{ClientConfig, GithubSource};
pub use languages::{DEFAULT_MAX_PAGES, LanguageTotals, aggregate_languages, collect_languages};
pub use login::validate_login;
pub use model::{
    LanguageEntry, LanguageSize, Repository, RepositoryPage, StatsSummary, UserProfile,
};
pub use normalizer::{RenderPlan, RenderTarget, load_plan, parse_plan};
pub use report::{LanguageReport, Report, Section, fetch_languages, fetch_report};
pub use slug::{DEFAULT_MAX_SLUG_LEN, SlugStrategy};
pub use source::RepositorySource;
pub use stats::{fetch_stats, summarize_stats};
