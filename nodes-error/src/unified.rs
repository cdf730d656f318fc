// Copyright 2023 The Nodes Filter Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Unified error system for the nodes filter crates
//!
//! All fallible operations of the workspace return [`NodesResult`]. Filter
//! compilation failures keep their own type, [`FilterError`], so the
//! configuration layer can tell a rejected filter apart from an unreadable
//! configuration source.

use thiserror::Error;

pub use crate::filter_error::FilterError;

/// Main error type for all nodes filter operations
///
/// # Examples
///
/// ```rust
/// use nodes_error::NodesError;
/// use nodes_error::NodesResult;
///
/// fn check_limit(limit: i64) -> NodesResult<u64> {
///     if limit < 0 {
///         return Err(NodesError::illegal_argument("limit must not be negative"));
///     }
///     Ok(limit as u64)
/// }
/// # check_limit(500).unwrap();
/// ```
#[derive(Debug, Error)]
pub enum NodesError {
    // ============================================================================
    // Filter Errors
    // ============================================================================
    /// Filter definition rejected at compile time
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A named filter of the configuration was rejected
    #[error("Filter '{key}' rejected: {source}")]
    FilterRejected {
        key: &'static str,
        #[source]
        source: FilterError,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Configuration parsing failed
    #[error("Configuration parse error for '{key}': {reason}")]
    ConfigParseFailed { key: &'static str, reason: String },

    /// Invalid configuration value
    #[error("Invalid configuration for '{key}': value='{value}', reason={reason}")]
    ConfigInvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    // ============================================================================
    // System Errors
    // ============================================================================
    /// Illegal argument
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl NodesError {
    /// Create an error for a named filter that failed to compile
    #[inline]
    pub fn filter_rejected(key: &'static str, source: FilterError) -> Self {
        Self::FilterRejected { key, source }
    }

    /// Create an invalid configuration value error
    #[inline]
    pub fn config_invalid_value(key: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalidValue {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an illegal argument error
    #[inline]
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::IllegalArgument(message.into())
    }

    /// Returns the underlying filter error, if any.
    pub fn as_filter_error(&self) -> Option<&FilterError> {
        match self {
            Self::Filter(e) | Self::FilterRejected { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "with_config")]
impl From<config::ConfigError> for NodesError {
    fn from(e: config::ConfigError) -> Self {
        Self::ConfigParseFailed {
            key: "unknown",
            reason: e.to_string(),
        }
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// Result type alias for nodes filter operations
pub type NodesResult<T> = std::result::Result<T, NodesError>;
