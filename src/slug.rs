// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Slug derivation for artifact file names.
//!
//! Slugs contain only lowercase ASCII alphanumerics separated by single
//! hyphens and never start or end with a hyphen, so they are safe as file
//! name stems and URL path segments.

/// Default upper bound on slug length in bytes.
pub const DEFAULT_MAX_SLUG_LEN: usize = 64;

/// Builder for artifact slugs.
#[derive(Debug, Clone, Copy,)]
pub struct SlugStrategy<'input,>
{
    source:  &'input str,
    max_len: usize,
}

impl<'input,> SlugStrategy<'input,>
{
    /// Creates a builder over `source` with [`DEFAULT_MAX_SLUG_LEN`].
    pub fn builder(source: &'input str,) -> Self
    {
        Self {
            source,
            max_len: DEFAULT_MAX_SLUG_LEN,
        }
    }

    /// Caps the slug at `max_len` bytes. Zero disables the cap.
    pub fn max_len(mut self, max_len: usize,) -> Self
    {
        self.max_len = max_len;
        self
    }

    /// Builds the slug, or `None` when nothing slug-worthy remains.
    ///
    /// Any run of characters outside `[A-Za-z0-9]` collapses into one
    /// hyphen. Truncation never leaves a trailing hyphen.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghstat::SlugStrategy;
    ///
    /// let slug = SlugStrategy::builder(" The Octocat / stats ",).build();
    /// assert_eq!(slug.as_deref(), Some("the-octocat-stats"));
    ///
    /// let short = SlugStrategy::builder("octocat-stats",).max_len(8,).build();
    /// assert_eq!(short.as_deref(), Some("octocat"));
    /// ```
    pub fn build(self,) -> Option<String,>
    {
        let trimmed = self.source.trim();
        let mut slug = String::with_capacity(trimmed.len(),);
        let mut pending_hyphen = false;

        for candidate in trimmed.chars() {
            if candidate.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-',);
                }
                pending_hyphen = false;
                slug.push(candidate.to_ascii_lowercase(),);
            } else {
                pending_hyphen = true;
            }
        }

        if self.max_len > 0 && slug.len() > self.max_len {
            slug.truncate(self.max_len,);
            while slug.ends_with('-',) {
                slug.pop();
            }
        }

        if slug.is_empty() { None } else { Some(slug,) }
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{DEFAULT_MAX_SLUG_LEN, SlugStrategy};

    proptest! {
        #[test]
        fn slug_is_file_name_safe(input in "\\PC{0,96}") {
            if let Some(slug) = SlugStrategy::builder(&input).build() {
                prop_assert!(slug.chars().all(|ch| matches!(ch, 'a'..='z' | '0'..='9' | '-')));
                prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
                prop_assert!(!slug.contains("--"));
                prop_assert!(slug.len() <= DEFAULT_MAX_SLUG_LEN);
            }
        }

        #[test]
        fn valid_logins_always_produce_a_slug(login in "[A-Za-z0-9][A-Za-z0-9-]{0,38}") {
            prop_assert!(SlugStrategy::builder(&login).build().is_some());
        }
    }

    #[test]
    fn collapses_separator_runs()
    {
        let slug = SlugStrategy::builder("octo__cat..stats",).build();
        assert_eq!(slug.as_deref(), Some("octo-cat-stats"));
    }

    #[test]
    fn returns_none_without_alphanumerics()
    {
        assert!(SlugStrategy::builder("   ",).build().is_none());
        assert!(SlugStrategy::builder("***",).build().is_none());
    }

    #[test]
    fn drops_non_ascii_characters()
    {
        let slug = SlugStrategy::builder("Café Octo",).build();
        assert_eq!(slug.as_deref(), Some("caf-octo"));
    }

    #[test]
    fn truncation_removes_trailing_hyphen()
    {
        let slug = SlugStrategy::builder("abc def",).max_len(4,).build();
        assert_eq!(slug.as_deref(), Some("abc"));
    }

    #[test]
    fn zero_max_len_disables_cap()
    {
        let source = "a".repeat(DEFAULT_MAX_SLUG_LEN * 2,);
        let slug = SlugStrategy::builder(&source,).max_len(0,).build();
        assert_eq!(slug.map(|value| value.len()), Some(DEFAULT_MAX_SLUG_LEN * 2));
    }
}
