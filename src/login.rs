// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! GitHub login validation.
//!
//! Logins are interpolated into REST routes and GraphQL variables, so they are
//! checked against GitHub's account naming rules before any request is made.

use regex::Regex;

use crate::error::Error;

const LOGIN_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9-]{0,38}$";

/// Validates a GitHub login and returns it without surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the login is empty, longer than 39
/// characters, starts with a hyphen or contains characters other than ASCII
/// alphanumerics and hyphens.
///
/// # Example
///
/// ```
/// use ghstat::validate_login;
///
/// assert_eq!(validate_login(" octocat ",).unwrap(), "octocat");
/// assert!(validate_login("-octocat",).is_err());
/// ```
pub fn validate_login(login: &str,) -> Result<&str, Error,>
{
    let trimmed = login.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("login cannot be empty",),);
    }

    let pattern = Regex::new(LOGIN_PATTERN,)
        .map_err(|e| Error::validation(format!("invalid login pattern: {e}"),),)?;

    if !pattern.is_match(trimmed,) {
        return Err(Error::validation(format!("'{trimmed}' is not a valid GitHub login"),),);
    }

    Ok(trimmed,)
}
