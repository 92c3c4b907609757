// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Data-source capability consumed by the aggregators.
//!
//! The aggregators never talk to GitHub directly. They depend on
//! [`RepositorySource`], which the [`crate::GithubSource`] adapter implements
//! on top of octocrab and which tests replace with an in-memory fake.

use async_trait::async_trait;

use crate::{
    error::Error,
    model::{Repository, RepositoryPage, UserProfile},
};

/// Upstream operations needed to build a report for one login.
#[async_trait]
pub trait RepositorySource: Send + Sync
{
    /// Fetches the public profile of `login`.
    async fn profile(&self, login: &str,) -> Result<UserProfile, Error,>;

    /// Fetches every public repository owned by `login`, star counts
    /// included. Language data may be omitted.
    async fn repositories(&self, login: &str,) -> Result<Vec<Repository,>, Error,>;

    /// Fetches one page of repositories with their language byte
    /// distribution. `cursor` is `None` for the first page and the previous
    /// page's [`RepositoryPage::next_cursor`] afterwards.
    async fn language_page(
        &self,
        login: &str,
        cursor: Option<&str,>,
    ) -> Result<RepositoryPage, Error,>;
}

#[cfg(test)]
pub(crate) mod testing
{
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// In-memory source serving a single user.
    ///
    /// Language pages are served in order; page `n` is requested with cursor
    /// `"page-n"`.
    #[derive(Debug, Default)]
    pub(crate) struct FakeSource
    {
        profile:      Option<UserProfile,>,
        repositories: Vec<Repository,>,
        pages:        Vec<Vec<Repository,>,>,
        failing_page: Option<(usize, String,),>,
        cursor_loop:  bool,
        calls:        AtomicUsize,
    }

    impl FakeSource
    {
        pub(crate) fn new() -> Self
        {
            Self::default()
        }

        pub(crate) fn with_profile(mut self, profile: UserProfile,) -> Self
        {
            self.profile = Some(profile,);
            self
        }

        pub(crate) fn with_repositories(mut self, repositories: Vec<Repository,>,) -> Self
        {
            self.repositories = repositories;
            self
        }

        pub(crate) fn with_pages(mut self, pages: Vec<Vec<Repository,>,>,) -> Self
        {
            self.pages = pages;
            self
        }

        pub(crate) fn failing_at(mut self, page: usize, message: &str,) -> Self
        {
            self.failing_page = Some((page, message.to_owned(),),);
            self
        }

        /// Makes every page point back to the first page's cursor.
        pub(crate) fn with_cursor_loop(mut self,) -> Self
        {
            self.cursor_loop = true;
            self
        }

        pub(crate) fn calls(&self,) -> usize
        {
            self.calls.load(Ordering::SeqCst,)
        }

        fn ensure_user(&self, login: &str,) -> Result<&UserProfile, Error,>
        {
            self.profile
                .as_ref()
                .filter(|profile| profile.login.eq_ignore_ascii_case(login,),)
                .ok_or_else(|| Error::not_found(login,),)
        }
    }

    #[async_trait]
    impl RepositorySource for FakeSource
    {
        async fn profile(&self, login: &str,) -> Result<UserProfile, Error,>
        {
            self.calls.fetch_add(1, Ordering::SeqCst,);
            self.ensure_user(login,).cloned()
        }

        async fn repositories(&self, login: &str,) -> Result<Vec<Repository,>, Error,>
        {
            self.calls.fetch_add(1, Ordering::SeqCst,);
            self.ensure_user(login,)?;
            Ok(self.repositories.clone(),)
        }

        async fn language_page(
            &self,
            login: &str,
            cursor: Option<&str,>,
        ) -> Result<RepositoryPage, Error,>
        {
            self.calls.fetch_add(1, Ordering::SeqCst,);
            self.ensure_user(login,)?;

            let index = match cursor {
                None => 0,
                Some(value,) => value
                    .strip_prefix("page-",)
                    .and_then(|number| number.parse::<usize,>().ok(),)
                    .ok_or_else(|| Error::shape(format!("unknown cursor '{value}'"),),)?,
            };

            if let Some((failing, message,),) = &self.failing_page
                && *failing == index
            {
                return Err(Error::api(message.clone(),),);
            }

            let repositories = self.pages.get(index,).cloned().unwrap_or_default();
            let next_cursor = if self.cursor_loop {
                Some("page-1".to_owned(),)
            } else if index + 1 < self.pages.len() {
                Some(format!("page-{}", index + 1),)
            } else {
                None
            };

            Ok(RepositoryPage {
                repositories,
                next_cursor,
            },)
        }
    }
}
