// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Value types exchanged between the GitHub data source, the aggregators and
//! the renderers.
//!
//! Upstream records keep GitHub's optionality (`null` star counts, unnamed
//! languages) so the aggregators decide how missing values are treated.

use serde::{Deserialize, Serialize};

/// Public profile counters of a GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Canonical login as reported by GitHub.
    pub login:        String,
    /// Number of followers.
    #[serde(default)]
    pub followers:    u64,
    /// Number of accounts the user follows.
    #[serde(default)]
    pub following:    u64,
    /// Number of public repositories.
    #[serde(default)]
    pub public_repos: u64
}

/// Bytes attributed to one language inside a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSize {
    /// Language name, absent when GitHub returned a null node.
    pub name:  Option<String>,
    /// Byte count, absent when GitHub returned a null size.
    pub bytes: Option<u64>
}

impl LanguageSize {
    /// Convenience constructor for a fully populated record.
    pub fn new(name: impl Into<String>, bytes: u64) -> Self {
        Self {
            name:  Some(name.into()),
            bytes: Some(bytes)
        }
    }
}

/// Repository record as seen by the aggregators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Star count; `None` is treated as zero.
    pub stars:     Option<u64>,
    /// Whether the repository is a fork.
    #[serde(default)]
    pub is_fork:   bool,
    /// Language byte distribution, empty when the fetch strategy omits it.
    #[serde(default)]
    pub languages: Vec<LanguageSize>
}

/// One page of repositories returned by a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPage {
    /// Repositories contained in the page.
    pub repositories: Vec<Repository>,
    /// Continuation token for the next page; `None` on the last page.
    pub next_cursor:  Option<String>
}

/// Flat statistics shown on the stat card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Login of the account.
    pub username:     String,
    /// Number of followers.
    pub followers:    u64,
    /// Number of accounts followed.
    pub following:    u64,
    /// Number of public repositories.
    pub public_repos: u64,
    /// Sum of stars over every fetched repository.
    pub stars:        u64
}

/// Aggregated byte count of one language across all repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Language name, unique within a distribution.
    pub language: String,
    /// Total bytes, always greater than zero.
    pub bytes:    u64
}

impl LanguageEntry {
    /// Creates an entry from a name and a byte count.
    pub fn new(language: impl Into<String>, bytes: u64) -> Self {
        Self {
            language: language.into(),
            bytes
        }
    }
}
