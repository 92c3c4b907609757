// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Profile statistics aggregation.
//!
//! Combines a profile record with the user's repository list into the flat
//! summary rendered on the stat card.

use tracing::{debug, info};

use crate::{
    error::Error,
    login::validate_login,
    model::{Repository, StatsSummary, UserProfile},
    source::RepositorySource,
};

/// Builds a [`StatsSummary`] from an already fetched profile and repository
/// list.
///
/// Stars are summed over every repository, forks included, with a missing
/// count treated as zero.
///
/// # Example
///
/// ```
/// use ghstat::{Repository, UserProfile, summarize_stats};
///
/// let profile = UserProfile {
///     login:        "octocat".to_owned(),
///     followers:    10,
///     following:    2,
///     public_repos: 3,
/// };
/// let repositories = vec![
///     Repository { stars: Some(5,), ..Repository::default() },
///     Repository { stars: None, ..Repository::default() },
/// ];
/// let summary = summarize_stats(&profile, &repositories,);
/// assert_eq!(summary.stars, 5);
/// ```
pub fn summarize_stats(profile: &UserProfile, repositories: &[Repository],) -> StatsSummary
{
    let stars = repositories
        .iter()
        .fold(0u64, |total, repository| total.saturating_add(repository.stars.unwrap_or(0,),),);

    StatsSummary {
        username: profile.login.clone(),
        followers: profile.followers,
        following: profile.following,
        public_repos: profile.public_repos,
        stars,
    }
}

/// Fetches the profile and the repository list concurrently and summarizes
/// them.
///
/// A failed profile fetch short-circuits: the pending repository fetch is
/// dropped and no aggregation is attempted.
///
/// # Errors
///
/// Returns [`Error::Validation`] for malformed logins and propagates the
/// upstream error of whichever fetch fails first.
pub async fn fetch_stats<S,>(source: &S, login: &str,) -> Result<StatsSummary, Error,>
where
    S: RepositorySource + ?Sized,
{
    let login = validate_login(login,)?;
    debug!("Fetching profile and repositories for {}", login);

    let (profile, repositories,) =
        tokio::try_join!(source.profile(login), source.repositories(login))?;

    let summary = summarize_stats(&profile, &repositories,);
    info!(
        "Summarized {} repositories for {} ({} stars)",
        repositories.len(),
        summary.username,
        summary.stars
    );

    Ok(summary,)
}
