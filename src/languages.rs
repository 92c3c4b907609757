// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Language distribution aggregation.
//!
//! Per-repository language byte maps are folded into a single distribution
//! ordered by byte count. Forked repositories are skipped so the chart
//! reflects code the user owns. Ties keep the order in which languages were
//! first seen.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::{
    error::Error,
    login::validate_login,
    model::{LanguageEntry, Repository, RepositoryPage},
    source::RepositorySource,
};

/// Upper bound on language pages fetched for one user.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Running totals of bytes per language.
#[derive(Debug, Clone, Default,)]
pub struct LanguageTotals
{
    order:  Vec<(String, u64,),>,
    lookup: HashMap<String, usize,>,
}

impl LanguageTotals
{
    /// Creates empty totals.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Adds the language bytes of a non-fork repository.
    pub fn absorb_repository(&mut self, repository: &Repository,)
    {
        if repository.is_fork {
            return;
        }

        for size in &repository.languages {
            let (Some(name,), Some(bytes,),) = (size.name.as_deref(), size.bytes,) else {
                continue;
            };
            if bytes == 0 || name.is_empty() {
                continue;
            }
            self.add(name, bytes,);
        }
    }

    /// Adds every repository of a page.
    pub fn absorb_page(&mut self, page: &RepositoryPage,)
    {
        for repository in &page.repositories {
            self.absorb_repository(repository,);
        }
    }

    fn add(&mut self, name: &str, bytes: u64,)
    {
        match self.lookup.get(name,) {
            Some(&index,) => {
                let slot = &mut self.order[index].1;
                *slot = slot.saturating_add(bytes,);
            }
            None => {
                self.lookup.insert(name.to_owned(), self.order.len(),);
                self.order.push((name.to_owned(), bytes,),);
            }
        }
    }

    /// Returns `true` when no bytes were recorded.
    pub fn is_empty(&self,) -> bool
    {
        self.order.is_empty()
    }

    /// Consumes the totals and returns entries sorted by descending bytes.
    ///
    /// The sort is stable, so equal byte counts keep first-seen order.
    pub fn into_entries(self,) -> Vec<LanguageEntry,>
    {
        let mut entries: Vec<LanguageEntry,> = self
            .order
            .into_iter()
            .map(|(language, bytes,)| LanguageEntry {
                language,
                bytes,
            },)
            .collect();
        entries.sort_by(|a, b| b.bytes.cmp(&a.bytes,),);
        entries
    }
}

/// Aggregates already fetched pages into an ordered distribution.
///
/// # Example
///
/// ```
/// use ghstat::{LanguageSize, Repository, RepositoryPage, aggregate_languages};
///
/// let page = RepositoryPage {
///     repositories: vec![Repository {
///         stars:     None,
///         is_fork:   false,
///         languages: vec![LanguageSize::new("Rust", 40,), LanguageSize::new("Shell", 2,)],
///     }],
///     next_cursor:  None,
/// };
/// let entries = aggregate_languages([&page],);
/// assert_eq!(entries[0].language, "Rust");
/// ```
pub fn aggregate_languages<'a, I,>(pages: I,) -> Vec<LanguageEntry,>
where
    I: IntoIterator<Item = &'a RepositoryPage,>,
{
    let mut totals = LanguageTotals::new();
    for page in pages {
        totals.absorb_page(page,);
    }
    totals.into_entries()
}

/// Walks every language page of `login` and aggregates the distribution.
///
/// Pages are requested one after another because each cursor comes from the
/// previous response. Nothing is returned when any page fails.
///
/// # Errors
///
/// Propagates upstream errors, returns [`Error::Shape`] when the cursor does
/// not advance or more than `max_pages` pages are reported, and
/// [`Error::Validation`] for malformed logins.
pub async fn collect_languages<S,>(
    source: &S,
    login: &str,
    max_pages: usize,
) -> Result<Vec<LanguageEntry,>, Error,>
where
    S: RepositorySource + ?Sized,
{
    let login = validate_login(login,)?;
    let mut totals = LanguageTotals::new();
    let mut cursor: Option<String,> = None;
    let mut fetched = 0usize;

    loop {
        if fetched >= max_pages {
            warn!("Stopping language pagination for {} after {} pages", login, fetched);
            return Err(Error::shape(format!(
                "repository listing for '{login}' exceeded {max_pages} pages"
            ),),);
        }

        let page = source.language_page(login, cursor.as_deref(),).await?;
        fetched += 1;
        debug!(
            "Language page {} for {}: {} repositories",
            fetched,
            login,
            page.repositories.len()
        );
        totals.absorb_page(&page,);

        match page.next_cursor {
            Some(next,) if cursor.as_deref() == Some(next.as_str(),) => {
                return Err(Error::shape(format!(
                    "pagination cursor for '{login}' did not advance"
                ),),);
            }
            Some(next,) => cursor = Some(next,),
            None => break,
        }
    }

    if totals.is_empty() {
        info!("No language data recorded for {}", login);
    }
    let entries = totals.into_entries();
    info!("Aggregated {} languages across {} pages for {}", entries.len(), fetched, login);
    Ok(entries,)
}
