// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Transformation logic that converts raw plan entries into normalized render
//! targets.
//!
//! Every target gets a validated login, a unique slug, a resolved chart policy
//! and palette, and the list of artifacts to write. Slugs double as artifact
//! file name stems, so collisions are rejected.

use std::{collections::HashSet, fs, path::Path};

use serde::Serialize;
use tracing::debug;

use crate::{
    chart::{ChartPolicy, Palette},
    config::{Artifact, RenderConfig, TargetEntry},
    error::{self, Error},
    login::validate_login,
};

/// Normalized description of one user to render.
#[derive(Debug, Serialize, Clone, PartialEq,)]
pub struct RenderTarget
{
    /// Artifact file name stem.
    pub slug:         String,
    /// Validated GitHub login.
    pub login:        String,
    /// Name shown in the README snippet.
    pub display_name: String,
    /// Bucketing policy of the language chart.
    pub policy:       ChartPolicy,
    /// Slice palette of the language chart.
    pub palette:      Palette,
    /// Artifacts to write, without duplicates.
    pub artifacts:    Vec<Artifact,>,
}

impl RenderTarget
{
    /// Builds a target for `login` with every option at its default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the login is malformed.
    ///
    /// # Example
    ///
    /// ```
    /// use ghstat::{Artifact, ChartPolicy, RenderTarget};
    ///
    /// let target = RenderTarget::for_login("Octocat",).unwrap();
    /// assert_eq!(target.slug, "octocat");
    /// assert_eq!(target.policy, ChartPolicy::top_n(5));
    /// assert_eq!(target.artifacts, vec![Artifact::Card, Artifact::Chart]);
    /// ```
    pub fn for_login(login: &str,) -> Result<Self, Error,>
    {
        normalize_entry(&TargetEntry::new(login,),)
    }

    /// Returns `true` when the target requests `artifact`.
    pub fn wants(&self, artifact: Artifact,) -> bool
    {
        self.artifacts.contains(&artifact,)
    }
}

/// Normalized plan.
#[derive(Debug, Serialize, Clone, PartialEq,)]
pub struct RenderPlan
{
    /// Targets in document order.
    pub targets: Vec<RenderTarget,>,
}

/// Loads a render plan from the YAML file at `path`.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or the plan violates invariants during normalization.
pub fn load_plan(path: &Path,) -> Result<RenderPlan, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_plan(&contents,)
}

/// Parses a render plan from a YAML document string.
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) when the YAML cannot be decoded
/// and [`Error::Validation`](Error::Validation) when the plan is empty or an
/// entry is invalid.
///
/// # Example
///
/// ```
/// use ghstat::parse_plan;
///
/// let plan = parse_plan("targets:\n  - user: octocat\n",).unwrap();
/// assert_eq!(plan.targets[0].login, "octocat");
/// ```
pub fn parse_plan(contents: &str,) -> Result<RenderPlan, Error,>
{
    let config: RenderConfig = serde_yaml::from_str(contents,)?;
    if config.targets.is_empty() {
        return Err(Error::validation("configuration must include at least one target",),);
    }

    normalize_plan(&config.targets,)
}

fn normalize_plan(entries: &[TargetEntry],) -> Result<RenderPlan, Error,>
{
    let mut normalized = Vec::with_capacity(entries.len(),);
    let mut seen_slugs = HashSet::with_capacity(entries.len(),);

    for entry in entries {
        let target = normalize_entry(entry,)?;

        if !seen_slugs.insert(target.slug.clone(),) {
            return Err(Error::validation(format!("duplicate slug '{}'", target.slug),),);
        }

        debug!("Normalized target {} as {}", target.login, target.slug);
        normalized.push(target,);
    }

    Ok(RenderPlan {
        targets: normalized,
    },)
}

fn normalize_entry(entry: &TargetEntry,) -> Result<RenderTarget, Error,>
{
    let login = validate_login(&entry.user,)?.to_owned();

    let slug = entry.resolved_slug().ok_or_else(|| {
        Error::validation(format!("unable to derive slug for target '{login}'"),)
    },)?;

    let options = entry.chart.unwrap_or_default();
    let policy = options.policy()?;

    Ok(RenderTarget {
        slug,
        display_name: entry.resolved_display_name(),
        policy,
        palette: options.palette(),
        artifacts: entry.resolved_artifacts(),
        login,
    },)
}

#[cfg(test)]
mod tests
{
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn parse_plan_applies_defaults()
    {
        let plan = parse_plan("targets:\n  - user: Octocat\n",).expect("valid plan",);
        let target = &plan.targets[0];

        assert_eq!(target.login, "Octocat");
        assert_eq!(target.slug, "octocat");
        assert_eq!(target.display_name, "Octocat");
        assert_eq!(target.policy, ChartPolicy::top_n(5));
        assert_eq!(target.palette, Palette::Vivid);
        assert!(target.wants(Artifact::Card,));
        assert!(target.wants(Artifact::Chart,));
    }

    #[test]
    fn parse_plan_reads_chart_options()
    {
        let yaml = r#"
targets:
  - user: octocat
    slug: Cat Stats
    display_name: The Octocat
    chart:
      policy: min_share
      percent: 5
      palette: classic
    artifacts: [chart]
"#;
        let plan = parse_plan(yaml,).expect("valid plan",);
        let target = &plan.targets[0];

        assert_eq!(target.slug, "cat-stats");
        assert_eq!(target.display_name, "The Octocat");
        assert_eq!(target.policy, ChartPolicy::MinShare {
            percent: 5.0
        });
        assert_eq!(target.palette, Palette::Classic);
        assert!(!target.wants(Artifact::Card,));
    }

    #[test]
    fn empty_plan_is_rejected()
    {
        let error = parse_plan("targets: []\n",).expect_err("expected validation error",);
        assert_eq!(
            error.to_string(),
            "invalid configuration: configuration must include at least one target"
        );
    }

    #[test]
    fn duplicate_slugs_are_rejected()
    {
        let yaml = "targets:\n  - user: octocat\n  - user: OctoCat\n";
        let error = parse_plan(yaml,).expect_err("expected duplicate slug",);
        assert!(error.to_string().contains("duplicate slug 'octocat'"));
    }

    #[test]
    fn invalid_login_is_rejected()
    {
        let error =
            parse_plan("targets:\n  - user: -octocat\n",).expect_err("expected invalid login",);
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn invalid_percent_is_rejected()
    {
        let yaml = "targets:\n  - user: octocat\n    chart:\n      policy: min_share\n      percent: 150\n";
        let error = parse_plan(yaml,).expect_err("expected invalid percent",);
        assert!(error.to_string().contains("chart.percent"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error()
    {
        let error = parse_plan("targets: [",).expect_err("expected parse error",);
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn load_plan_reads_file()
    {
        let mut file = NamedTempFile::new().expect("temp file",);
        writeln!(file, "targets:\n  - user: hubot").expect("write plan",);

        let plan = load_plan(file.path(),).expect("plan should load",);
        assert_eq!(plan.targets.len(), 1);
    }

    #[test]
    fn load_plan_reports_missing_file()
    {
        let directory = tempfile::tempdir().expect("temp dir",);
        let path = directory.path().join("missing.yaml",);

        let error = load_plan(&path,).expect_err("expected io error",);
        assert!(matches!(error, Error::Io { .. }));
    }

    #[test]
    fn for_login_rejects_empty_login()
    {
        assert!(RenderTarget::for_login("  ",).is_err());
    }
}
