// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Report assembly for a single login.
//!
//! A report has two independent halves, the stats summary and the language
//! chart. Each half either carries data or the error that prevented it, so a
//! failing GraphQL query still leaves the stat card renderable.

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    chart::{ChartGeometry, ChartPolicy, Palette, chart_geometry},
    error::{Error, ErrorResult},
    languages::{DEFAULT_MAX_PAGES, collect_languages},
    model::{LanguageEntry, StatsSummary},
    source::RepositorySource,
    stats::fetch_stats,
};

/// Outcome of one half of a report.
#[derive(Debug, Clone, PartialEq, Serialize,)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T,>
{
    /// Data was fetched and aggregated.
    Ready
    {
        /// Aggregated payload.
        data: T,
    },
    /// The fetch failed; renderers show the message instead of data.
    Failed
    {
        /// Error descriptor shown to the viewer.
        error: ErrorResult,
    },
}

impl<T,> Section<T,>
{
    /// Converts an aggregation result into a section.
    pub fn from_result(result: Result<T, Error,>,) -> Self
    {
        match result {
            Ok(data,) => Self::Ready {
                data,
            },
            Err(error,) => Self::Failed {
                error: ErrorResult::from(error,),
            },
        }
    }

    /// Returns the payload when the section is ready.
    pub fn data(&self,) -> Option<&T,>
    {
        match self {
            Self::Ready {
                data,
            } => Some(data,),
            Self::Failed {
                ..
            } => None,
        }
    }

    /// Returns the error when the section failed.
    pub fn error(&self,) -> Option<&ErrorResult,>
    {
        match self {
            Self::Ready {
                ..
            } => None,
            Self::Failed {
                error,
            } => Some(error,),
        }
    }
}

/// Language half of a report.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct LanguageReport
{
    /// Full distribution, descending by bytes.
    pub entries:  Vec<LanguageEntry,>,
    /// Bucketing policy applied to build the geometry.
    pub policy:   ChartPolicy,
    /// Pie geometry derived from the bucketed entries.
    pub geometry: ChartGeometry,
}

/// Stats and language chart for one login.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct Report
{
    /// Login as requested.
    pub login:     String,
    /// Profile counters and star total.
    pub stats:     Section<StatsSummary,>,
    /// Language distribution and chart geometry.
    pub languages: Section<LanguageReport,>,
}

/// Fetches every language page of `login` and aggregates the distribution.
///
/// # Errors
///
/// See [`collect_languages`].
pub async fn fetch_languages<S,>(source: &S, login: &str,) -> Result<Vec<LanguageEntry,>, Error,>
where
    S: RepositorySource + ?Sized,
{
    collect_languages(source, login, DEFAULT_MAX_PAGES,).await
}

/// Builds both halves of a report concurrently.
///
/// Failures are recorded per section and never abort the other half.
pub async fn fetch_report<S,>(
    source: &S,
    login: &str,
    policy: ChartPolicy,
    palette: Palette,
) -> Report
where
    S: RepositorySource + ?Sized,
{
    let (stats, languages,) = tokio::join!(fetch_stats(source, login), fetch_languages(source, login));

    if let Err(error,) = &stats {
        log_failure("Stats", login, error,);
    }
    if let Err(error,) = &languages {
        log_failure("Languages", login, error,);
    }

    let languages = languages.map(|entries| {
        let geometry = chart_geometry(&entries, policy, palette,);
        LanguageReport {
            entries,
            policy,
            geometry,
        }
    },);

    let report = Report {
        login:     login.trim().to_owned(),
        stats:     Section::from_result(stats,),
        languages: Section::from_result(languages,),
    };
    info!(
        "Report for {}: stats {}, languages {}",
        report.login,
        section_status(&report.stats),
        section_status(&report.languages)
    );
    report
}

fn log_failure(section: &str, login: &str, error: &Error,)
{
    if error.is_upstream() {
        warn!("{} for {} unavailable from GitHub: {}", section, login, error);
    } else {
        info!("{} for {} rejected before any request: {}", section, login, error);
    }
}

fn section_status<T,>(section: &Section<T,>,) -> &'static str
{
    match section {
        Section::Ready {
            ..
        } => "ready",
        Section::Failed {
            ..
        } => "failed",
    }
}

#[cfg(test)]
mod tests
{
    use serde_json::Value;

    use super::*;
    use crate::{
        model::{LanguageSize, Repository, UserProfile},
        source::testing::FakeSource,
    };

    fn octocat() -> UserProfile
    {
        UserProfile {
            login:        "octocat".to_owned(),
            followers:    12,
            following:    3,
            public_repos: 2,
        }
    }

    fn repository(stars: u64, languages: &[(&str, u64,)],) -> Repository
    {
        Repository {
            stars:     Some(stars,),
            is_fork:   false,
            languages: languages.iter().map(|(n, b,)| LanguageSize::new(*n, *b,),).collect(),
        }
    }

    #[tokio::test]
    async fn report_contains_both_sections()
    {
        let source = FakeSource::new()
            .with_profile(octocat(),)
            .with_repositories(vec![repository(4, &[],), repository(6, &[],)],)
            .with_pages(vec![vec![repository(0, &[("Rust", 300,), ("C", 100,),],)]],);

        let report = fetch_report(&source, "octocat", ChartPolicy::default(), Palette::Vivid,).await;

        let stats = report.stats.data().expect("stats should be ready",);
        assert_eq!(stats.stars, 10);
        assert_eq!(stats.followers, 12);

        let languages = report.languages.data().expect("languages should be ready",);
        assert_eq!(languages.entries.len(), 2);
        let slices = languages.geometry.slices();
        assert_eq!(slices[0].language, "Rust");
        assert!((slices[0].share - 75.0).abs() < 1e-9);
        assert!((slices[1].end_angle - 360.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn language_failure_keeps_stats()
    {
        let source = FakeSource::new()
            .with_profile(octocat(),)
            .with_repositories(vec![repository(1, &[],)],)
            .with_pages(vec![vec![]],)
            .failing_at(0, "Something went wrong while executing your query.",);

        let report = fetch_report(&source, "octocat", ChartPolicy::default(), Palette::Vivid,).await;

        assert!(report.stats.data().is_some());
        let error = report.languages.error().expect("languages should fail",);
        assert_eq!(
            error.message,
            "GitHub API error: Something went wrong while executing your query."
        );
    }

    #[tokio::test]
    async fn unknown_user_fails_both_sections()
    {
        let source = FakeSource::new();

        let report = fetch_report(&source, "ghost", ChartPolicy::default(), Palette::Vivid,).await;

        assert!(report.stats.error().is_some());
        assert!(report.languages.error().is_some());
    }

    #[tokio::test]
    async fn empty_distribution_is_ready_with_empty_geometry()
    {
        let source = FakeSource::new().with_profile(octocat(),);

        let report =
            fetch_report(&source, "octocat", ChartPolicy::min_share(), Palette::Classic,).await;

        let languages = report.languages.data().expect("empty listing is not an error",);
        assert!(languages.entries.is_empty());
        assert!(languages.geometry.is_empty());
    }

    #[test]
    fn sections_serialize_with_status_tag()
    {
        let ready: Section<u64,> = Section::from_result(Ok(3,),);
        let failed: Section<u64,> = Section::from_result(Err(Error::not_found("ghost",),),);

        let ready = serde_json::to_value(&ready,).expect("serializable",);
        let failed = serde_json::to_value(&failed,).expect("serializable",);

        assert_eq!(ready["status"], "ready");
        assert_eq!(ready["data"], 3);
        assert_eq!(failed["status"], "failed");
        assert_eq!(failed["error"]["message"], Value::from("GitHub user 'ghost' was not found"));
    }
}
