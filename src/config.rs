// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Render plan document types.
//!
//! The types mirror the YAML documents consumed by `ghstat plan`,
//! `ghstat render` and `ghstat embed`. Optional values stay optional here;
//! [`crate::normalizer`] resolves defaults and enforces invariants.

use serde::{Deserialize, Serialize};

use crate::{
    chart::{ChartPolicy, DEFAULT_MIN_SHARE_PERCENT, DEFAULT_TOP_LANGUAGES, Palette},
    error::Error,
    slug::SlugStrategy,
};

/// Cache policy attached to stat cards. Cards are immutable once published.
pub const CARD_CACHE_CONTROL: &str =
    "public, immutable, no-transform, s-maxage=31536000, max-age=31536000";
/// Cache policy attached to language charts.
pub const CHART_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

/// Root document listing every user to render.
///
/// # Examples
///
/// ```
/// use ghstat::RenderConfig;
///
/// let yaml = r#"
/// targets:
///   - user: octocat
///     chart:
///       policy: min_share
///       percent: 2.5
/// "#;
/// let config: RenderConfig = serde_yaml::from_str(yaml,).expect("valid configuration",);
/// assert_eq!(config.targets[0].user, "octocat");
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, Default,)]
pub struct RenderConfig
{
    /// Users to render.
    #[serde(default)]
    pub targets: Vec<TargetEntry,>,
}

/// Raw entry for one user before normalization.
#[derive(Debug, Deserialize, Serialize, Clone,)]
pub struct TargetEntry
{
    /// GitHub login.
    #[serde(alias = "login", alias = "owner")]
    pub user: String,

    /// Optional slug override used for artifact file names.
    #[serde(default)]
    pub slug: Option<String,>,

    /// Optional display name used in the README snippet.
    #[serde(default, alias = "displayName", alias = "display-name")]
    pub display_name: Option<String,>,

    /// Optional chart customization.
    #[serde(default)]
    pub chart: Option<ChartOptions,>,

    /// Artifacts to produce; both when omitted.
    #[serde(default)]
    pub artifacts: Option<Vec<Artifact,>,>,
}

impl TargetEntry
{
    /// Creates an entry for `user` with every option left to its default.
    pub fn new(user: impl Into<String,>,) -> Self
    {
        Self {
            user:         user.into(),
            slug:         None,
            display_name: None,
            chart:        None,
            artifacts:    None,
        }
    }

    /// Returns the slug used for this target's artifacts.
    ///
    /// A custom override is normalized through [`SlugStrategy`]; otherwise
    /// the slug is derived from the login.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghstat::TargetEntry;
    ///
    /// let entry = TargetEntry::new("Octo-Cat",);
    /// assert_eq!(entry.resolved_slug().as_deref(), Some("octo-cat"));
    /// ```
    pub fn resolved_slug(&self,) -> Option<String,>
    {
        let source = self.slug.as_deref().unwrap_or(self.user.as_str(),);
        SlugStrategy::builder(source,).build()
    }

    /// Returns the trimmed display name, falling back to the login.
    pub fn resolved_display_name(&self,) -> String
    {
        self.display_name
            .as_deref()
            .map(str::trim,)
            .filter(|name| !name.is_empty(),)
            .unwrap_or_else(|| self.user.trim(),)
            .to_owned()
    }

    /// Returns the requested artifacts without duplicates, in document
    /// order. Defaults to [`Artifact::ALL`].
    pub fn resolved_artifacts(&self,) -> Vec<Artifact,>
    {
        match self.artifacts.as_deref() {
            None | Some([],) => Artifact::ALL.to_vec(),
            Some(requested,) => {
                let mut unique = Vec::with_capacity(requested.len(),);
                for artifact in requested {
                    if !unique.contains(artifact,) {
                        unique.push(*artifact,);
                    }
                }
                unique
            }
        }
    }
}

/// Chart customization entry.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq,)]
#[serde(deny_unknown_fields)]
pub struct ChartOptions
{
    /// Bucketing rule; `top_n` when omitted.
    #[serde(default)]
    pub policy: Option<PolicyKind,>,

    /// Languages kept by `top_n`, at least one.
    #[serde(default, deserialize_with = "deserialize_optional_limit")]
    pub limit: Option<usize,>,

    /// Share threshold in percent used by `min_share`.
    #[serde(default)]
    pub percent: Option<f64,>,

    /// Slice palette.
    #[serde(default)]
    pub palette: Option<Palette,>,
}

impl ChartOptions
{
    /// Resolves the options into a [`ChartPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `limit` is zero or `percent` is not
    /// within `(0, 100]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghstat::{ChartOptions, ChartPolicy, PolicyKind};
    ///
    /// let options = ChartOptions {
    ///     policy: Some(PolicyKind::TopN,), limit: Some(3,), ..ChartOptions::default()
    /// };
    /// assert_eq!(options.policy().unwrap(), ChartPolicy::top_n(3));
    /// ```
    pub fn policy(&self,) -> Result<ChartPolicy, Error,>
    {
        match self.policy.unwrap_or_default() {
            PolicyKind::TopN => {
                let limit = self.limit.unwrap_or(DEFAULT_TOP_LANGUAGES,);
                if limit == 0 {
                    return Err(Error::validation("chart.limit must be at least 1",),);
                }
                Ok(ChartPolicy::top_n(limit,),)
            }
            PolicyKind::MinShare => {
                let percent = self.percent.unwrap_or(DEFAULT_MIN_SHARE_PERCENT,);
                if !(percent > 0.0 && percent <= 100.0) {
                    return Err(Error::validation(format!(
                        "chart.percent must be within (0, 100], got {percent}"
                    ),),);
                }
                Ok(ChartPolicy::MinShare {
                    percent,
                },)
            }
        }
    }

    /// Palette to draw slices with.
    pub fn palette(&self,) -> Palette
    {
        self.palette.unwrap_or_default()
    }
}

/// Bucketing rule names accepted in YAML documents.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, Hash,)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind
{
    /// Keep the largest languages.
    #[default]
    TopN,
    /// Keep languages above a share threshold.
    MinShare,
}

/// Rendered image kinds.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash,)]
#[serde(rename_all = "snake_case")]
pub enum Artifact
{
    /// 320x240 stat card.
    Card,
    /// 420x300 language chart.
    Chart,
}

impl Artifact
{
    /// Every artifact, in rendering order.
    pub const ALL: [Self; 2] = [Self::Card, Self::Chart];

    /// File name of the artifact for `slug`.
    pub fn file_name(self, slug: &str,) -> String
    {
        match self {
            Self::Card => format!("{slug}-card.svg"),
            Self::Chart => format!("{slug}-chart.svg"),
        }
    }

    /// `Cache-Control` value downstream servers should attach.
    pub fn cache_control(self,) -> &'static str
    {
        match self {
            Self::Card => CARD_CACHE_CONTROL,
            Self::Chart => CHART_CACHE_CONTROL,
        }
    }
}

fn deserialize_optional_limit<'de, D,>(deserializer: D,) -> Result<Option<usize,>, D::Error,>
where
    D: serde::Deserializer<'de,>,
{
    let value: Option<usize,> = Option::deserialize(deserializer,)?;
    if value == Some(0,) {
        return Err(serde::de::Error::custom("chart.limit must be at least 1",),);
    }
    Ok(value,)
}

#[cfg(test)]
mod tests
{
    use super::{Artifact, ChartOptions, PolicyKind, RenderConfig, TargetEntry};
    use crate::chart::{ChartPolicy, Palette};

    #[test]
    fn resolved_slug_prefers_custom_value()
    {
        let mut entry = TargetEntry::new("octocat",);
        entry.slug = Some("  Custom Slug  ".to_owned(),);

        assert_eq!(entry.resolved_slug().as_deref(), Some("custom-slug"));
    }

    #[test]
    fn resolved_slug_returns_none_when_unable_to_derive()
    {
        let mut entry = TargetEntry::new("octocat",);
        entry.slug = Some("***".to_owned(),);

        assert!(entry.resolved_slug().is_none());
    }

    #[test]
    fn resolved_display_name_falls_back_to_login()
    {
        let mut entry = TargetEntry::new(" octocat ",);
        assert_eq!(entry.resolved_display_name(), "octocat");

        entry.display_name = Some("  The Octocat  ".to_owned(),);
        assert_eq!(entry.resolved_display_name(), "The Octocat");

        entry.display_name = Some("   ".to_owned(),);
        assert_eq!(entry.resolved_display_name(), "octocat");
    }

    #[test]
    fn resolved_artifacts_deduplicates_and_defaults()
    {
        let mut entry = TargetEntry::new("octocat",);
        assert_eq!(entry.resolved_artifacts(), vec![Artifact::Card, Artifact::Chart]);

        entry.artifacts = Some(vec![Artifact::Chart, Artifact::Chart],);
        assert_eq!(entry.resolved_artifacts(), vec![Artifact::Chart]);

        entry.artifacts = Some(Vec::new(),);
        assert_eq!(entry.resolved_artifacts(), Artifact::ALL.to_vec());
    }

    #[test]
    fn default_options_resolve_to_top_five()
    {
        let options = ChartOptions::default();
        assert_eq!(options.policy().expect("defaults are valid",), ChartPolicy::top_n(5));
        assert_eq!(options.palette(), Palette::Vivid);
    }

    #[test]
    fn min_share_uses_default_threshold()
    {
        let options = ChartOptions {
            policy: Some(PolicyKind::MinShare,), ..ChartOptions::default()
        };
        assert_eq!(options.policy().expect("defaults are valid",), ChartPolicy::min_share());
    }

    #[test]
    fn percent_outside_range_is_rejected()
    {
        for percent in [0.0, -1.0, 100.5, f64::NAN] {
            let options = ChartOptions {
                policy: Some(PolicyKind::MinShare,),
                percent: Some(percent,),
                ..ChartOptions::default()
            };
            assert!(options.policy().is_err(), "{percent} should be rejected");
        }
    }

    #[test]
    fn zero_limit_is_rejected_during_deserialization()
    {
        let yaml = "targets:\n  - user: octocat\n    chart:\n      limit: 0\n";
        let error = serde_yaml::from_str::<RenderConfig,>(yaml,).expect_err("expected failure",);
        assert!(error.to_string().contains("chart.limit must be at least 1"));
    }

    #[test]
    fn unknown_chart_fields_are_rejected()
    {
        let yaml = "targets:\n  - user: octocat\n    chart:\n      colour: red\n";
        assert!(serde_yaml::from_str::<RenderConfig,>(yaml,).is_err());
    }

    #[test]
    fn login_aliases_are_accepted()
    {
        let yaml = "targets:\n  - login: octocat\n  - owner: hubot\n    artifacts: [chart]\n";
        let config: RenderConfig = serde_yaml::from_str(yaml,).expect("valid configuration",);

        assert_eq!(config.targets[0].user, "octocat");
        assert_eq!(config.targets[1].user, "hubot");
        assert_eq!(config.targets[1].artifacts.as_deref(), Some(&[Artifact::Chart][..]));
    }

    #[test]
    fn artifact_file_names_and_cache_policies()
    {
        assert_eq!(Artifact::Card.file_name("octocat",), "octocat-card.svg");
        assert_eq!(Artifact::Chart.file_name("octocat",), "octocat-chart.svg");
        assert!(Artifact::Card.cache_control().contains("immutable"));
        assert_eq!(Artifact::Chart.cache_control(), "s-maxage=3600, stale-while-revalidate");
    }
}
