// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! GitHub data source backed by octocrab.
//!
//! Profiles and star counts come from the REST API, language distributions
//! from a single paginated GraphQL query returning up to 100 repositories
//! with their languages per round trip.

use std::fmt;

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{
    error::Error,
    model::{LanguageSize, Repository, RepositoryPage, UserProfile},
    source::RepositorySource,
};

/// Repositories requested per REST or GraphQL page.
const PAGE_SIZE: u8 = 100;
/// Safety bound for REST repository pagination.
const MAX_REST_PAGES: u32 = 100;

const LANGUAGES_QUERY: &str = r"
query($login: String!, $cursor: String) {
  user(login: $login) {
    repositories(first: 100, after: $cursor, ownerAffiliations: OWNER, privacy: PUBLIC) {
      nodes {
        stargazerCount
        isFork
        languages(first: 100, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node { name }
          }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
";

/// Connection settings for the GitHub client.
///
/// The token is passed in explicitly; nothing is read from the process
/// environment here.
#[derive(Debug, Clone, Default,)]
pub struct ClientConfig
{
    /// Optional personal access token. Requests are anonymous without it.
    pub token:    Option<String,>,
    /// Optional API base URI, e.g. a GitHub Enterprise endpoint.
    pub base_uri: Option<String,>,
}

/// [`RepositorySource`] implementation talking to GitHub.
#[derive(Clone,)]
pub struct GithubSource
{
    client: Octocrab,
}

impl fmt::Debug for GithubSource
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.debug_struct("GithubSource",).finish_non_exhaustive()
    }
}

impl GithubSource
{
    /// Builds an octocrab client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the base URI is malformed and
    /// [`Error::Unknown`] when the client cannot be constructed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ghstat::{ClientConfig, GithubSource};
    ///
    /// # fn example() -> Result<(), ghstat::Error> {
    /// let source = GithubSource::new(&ClientConfig::default(),)?;
    /// # let _ = source;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &ClientConfig,) -> Result<Self, Error,>
    {
        let mut builder = Octocrab::builder();

        if let Some(token,) = config.token.as_deref().map(str::trim,).filter(|t| !t.is_empty(),) {
            builder = builder.personal_token(token,);
        }

        if let Some(base_uri,) = config.base_uri.as_deref() {
            builder = builder.base_uri(base_uri,).map_err(|e| {
                Error::validation(format!("invalid GitHub API base '{base_uri}': {e}"),)
            },)?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::unknown(format!("failed to initialize GitHub client: {e}"),),)?;

        Ok(Self {
            client,
        },)
    }
}

#[async_trait]
impl RepositorySource for GithubSource
{
    async fn profile(&self, login: &str,) -> Result<UserProfile, Error,>
    {
        debug!("GET /users/{}", login);
        self.client
            .get::<UserProfile, _, _,>(format!("/users/{login}"), None::<&(),>,)
            .await
            .map_err(|e| upstream_error(login, e,),)
    }

    async fn repositories(&self, login: &str,) -> Result<Vec<Repository,>, Error,>
    {
        let mut repositories = Vec::new();

        for page in 1..=MAX_REST_PAGES {
            debug!("GET /users/{}/repos page {}", login, page);
            let batch: Vec<RestRepository,> = self
                .client
                .get(format!("/users/{login}/repos"), Some(&PageParams {
                    per_page: PAGE_SIZE,
                    page,
                },),)
                .await
                .map_err(|e| upstream_error(login, e,),)?;

            let last = is_last_rest_page(batch.len(),);
            repositories.extend(batch.into_iter().map(RestRepository::into_repository,),);

            if last {
                return Ok(repositories,);
            }
        }

        Err(Error::shape(format!("repository listing for '{login}' exceeded {MAX_REST_PAGES} pages"),),)
    }

    async fn language_page(
        &self,
        login: &str,
        cursor: Option<&str,>,
    ) -> Result<RepositoryPage, Error,>
    {
        debug!("GraphQL languages page for {} after {:?}", login, cursor);
        let payload = json!({
            "query": LANGUAGES_QUERY,
            "variables": { "login": login, "cursor": cursor },
        });

        let response: GraphqlResponse =
            self.client.graphql(&payload,).await.map_err(|e| upstream_error(login, e,),)?;

        response.into_page(login,)
    }
}

/// A short page is the last one; a full page may be followed by more.
fn is_last_rest_page(received: usize,) -> bool
{
    received < usize::from(PAGE_SIZE,)
}

/// Maps octocrab failures onto the upstream error taxonomy.
fn upstream_error(login: &str, error: octocrab::Error,) -> Error
{
    match error {
        octocrab::Error::GitHub {
            source, ..
        } => github_status_error(login, source.status_code.as_u16(), source.message,),
        octocrab::Error::Serde {
            source, ..
        } => Error::shape(source.to_string(),),
        octocrab::Error::Json {
            source, ..
        } => Error::shape(source.to_string(),),
        other => Error::unknown(other.to_string(),),
    }
}

/// Classifies an error body returned by GitHub with its HTTP status.
fn github_status_error(login: &str, status: u16, message: String,) -> Error
{
    if status == 404 || message == "Not Found" {
        Error::not_found(login,)
    } else {
        Error::api(message,)
    }
}

#[derive(Debug, Serialize,)]
struct PageParams
{
    per_page: u8,
    page:     u32,
}

#[derive(Debug, Deserialize,)]
struct RestRepository
{
    #[serde(default)]
    stargazers_count: Option<u64,>,
    #[serde(default)]
    fork:             bool,
}

impl RestRepository
{
    fn into_repository(self,) -> Repository
    {
        Repository {
            stars:     self.stargazers_count,
            is_fork:   self.fork,
            languages: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize,)]
struct GraphqlResponse
{
    data:   Option<GraphqlData,>,
    #[serde(default)]
    errors: Vec<GraphqlError,>,
}

#[derive(Debug, Deserialize,)]
struct GraphqlError
{
    #[serde(rename = "type", default)]
    kind:    Option<String,>,
    message: String,
}

#[derive(Debug, Deserialize,)]
struct GraphqlData
{
    user: Option<GraphqlUser,>,
}

#[derive(Debug, Deserialize,)]
struct GraphqlUser
{
    repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize,)]
struct RepositoryConnection
{
    #[serde(default)]
    nodes:     Vec<Option<RepositoryNode,>,>,
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
}

#[derive(Debug, Deserialize,)]
struct PageInfo
{
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor:    Option<String,>,
}

#[derive(Debug, Deserialize,)]
struct RepositoryNode
{
    #[serde(rename = "stargazerCount")]
    stargazer_count: Option<u64,>,
    #[serde(rename = "isFork", default)]
    is_fork:         bool,
    languages:       Option<LanguageConnection,>,
}

#[derive(Debug, Deserialize,)]
struct LanguageConnection
{
    #[serde(default)]
    edges: Vec<Option<LanguageEdge,>,>,
}

#[derive(Debug, Deserialize,)]
struct LanguageEdge
{
    size: Option<u64,>,
    node: Option<LanguageNode,>,
}

#[derive(Debug, Deserialize,)]
struct LanguageNode
{
    name: Option<String,>,
}

impl GraphqlResponse
{
    fn into_page(self, login: &str,) -> Result<RepositoryPage, Error,>
    {
        if !self.errors.is_empty() {
            if self.errors.iter().any(|e| e.kind.as_deref() == Some("NOT_FOUND",),) {
                return Err(Error::not_found(login,),);
            }
            let message =
                self.errors.into_iter().map(|e| e.message,).collect::<Vec<_,>>().join("; ",);
            return Err(Error::api(message,),);
        }

        let data = self.data.ok_or_else(|| Error::shape("GraphQL response without data",),)?;
        let user = data.user.ok_or_else(|| Error::not_found(login,),)?;
        let connection = user.repositories;

        let next_cursor = match (connection.page_info.has_next_page, connection.page_info.end_cursor,) {
            (true, Some(cursor,),) => Some(cursor,),
            (true, None,) => {
                return Err(Error::shape("pageInfo reports a next page without endCursor",),);
            }
            (false, _,) => None,
        };

        let repositories = connection
            .nodes
            .into_iter()
            .flatten()
            .map(|node| Repository {
                stars:     node.stargazer_count,
                is_fork:   node.is_fork,
                languages: node
                    .languages
                    .map(|languages| {
                        languages
                            .edges
                            .into_iter()
                            .flatten()
                            .map(|edge| LanguageSize {
                                name:  edge.node.and_then(|n| n.name,),
                                bytes: edge.size,
                            },)
                            .collect()
                    },)
                    .unwrap_or_default(),
            },)
            .collect();

        Ok(RepositoryPage {
            repositories,
            next_cursor,
        },)
    }
}
