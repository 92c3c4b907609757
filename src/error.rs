#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the ghstat crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Upstream failures are split into four variants ([`Error::NotFound`],
//! [`Error::Api`], [`Error::Shape`], [`Error::Unknown`]). None of them is
//! fatal: each one is scoped to a single report and is handed to the
//! renderers as an [`ErrorResult`] so the message is displayed in place of
//! data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Unified error type returned by the aggregation core, the GitHub adapter,
/// the render plan loader and the CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The requested GitHub account does not exist.
    #[error("GitHub user '{login}' was not found")]
    NotFound {
        /// Login that could not be resolved.
        login: String
    },
    /// GitHub answered with a structured error (rate limit, bad credentials,
    /// GraphQL `errors` array).
    #[error("GitHub API error: {message}")]
    Api {
        /// Message reported by GitHub.
        message: String
    },
    /// GitHub answered with a payload that does not match the expected shape.
    #[error("unexpected GitHub response: {message}")]
    Shape {
        /// Description of the mismatch.
        message: String
    },
    /// Any other failure while talking to GitHub.
    #[error("GitHub request failed: {message}")]
    Unknown {
        /// Human readable description of the failure.
        message: String
    },
    /// Wraps I/O errors that occur while reading render plans.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when user input or configuration violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing JSON output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing rendered artifacts.
    #[error("failed to write artifact at {path:?}: {source}")]
    AssetIo {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs an upstream API error.
    pub fn api<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Api {
            message: message.into()
        }
    }

    /// Constructs an upstream shape error.
    pub fn shape<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Shape {
            message: message.into()
        }
    }

    /// Constructs an error for failures that fit no other category.
    pub fn unknown<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Unknown {
            message: message.into()
        }
    }

    /// Constructs a not-found error for the provided login.
    pub fn not_found<L>(login: L) -> Self
    where
        L: Into<String>
    {
        Self::NotFound {
            login: login.into()
        }
    }

    /// Returns `true` when the error originated from the GitHub data source.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Api { .. } | Self::Shape { .. } | Self::Unknown { .. }
        )
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Serializable error descriptor handed to renderers in place of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    /// Human readable message shown to the viewer.
    pub message: String
}

impl ErrorResult {
    /// Creates an error descriptor from any message.
    pub fn new<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self {
            message: message.into()
        }
    }
}

impl From<&Error> for ErrorResult {
    fn from(error: &Error) -> Self {
        Self::new(error.to_display_string())
    }
}

impl From<Error> for ErrorResult {
    fn from(error: Error) -> Self {
        Self::from(&error)
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::AssetIo`] variant capturing the failing path and
/// source.
pub fn asset_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::AssetIo {
        path: path.to_path_buf(),
        source
    }
}
