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

use std::fmt;

use cheetah_string::CheetahString;
use nodes_error::FilterError;
use tracing::debug;

use crate::expression::filter_expression::FilterExpression;
use crate::expression::resource_metadata::ResourceMetadata;
use crate::expression::ResourceFilter;
use crate::parser;
use crate::parser::ParseOptions;

/// Immutable pair of a definition string and the tree compiled from it.
///
/// A configuration change never edits a compiled filter, it compiles a new one.
/// Compiled filters are `Send + Sync` and are shared across threads through `Arc`.
///
/// # Examples
///
/// ```
/// use nodes_filter::{CompiledFilter, ParseOptions, ResourceMetadata};
///
/// let filter = CompiledFilter::compile("Name(-'^rep:(repo)?[Pp]olicy$')", &ParseOptions::default()).unwrap();
///
/// assert!(!filter.matches(&ResourceMetadata::new("/content/rep:policy")));
/// assert!(filter.matches(&ResourceMetadata::new("/content/page")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    source: CheetahString,
    root: FilterExpression,
}

impl CompiledFilter {
    /// Compiles a definition string.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Parse`] for malformed definitions and
    /// [`FilterError::Compile`] for invalid pattern texts.
    pub fn compile(source: &str, options: &ParseOptions) -> Result<Self, FilterError> {
        let root = parser::parse(source, options)?;
        debug!(
            "Compiled filter '{}' ({} predicates, depth {})",
            source,
            root.leaf_count(),
            root.depth()
        );
        Ok(CompiledFilter {
            source: CheetahString::from_slice(source),
            root,
        })
    }

    /// The filter used when no definition is configured; accepts every resource.
    pub fn accept_all() -> Self {
        CompiledFilter {
            source: CheetahString::from_static_str(""),
            root: FilterExpression::AcceptAll,
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    #[inline]
    pub fn root(&self) -> &FilterExpression {
        &self.root
    }

    #[inline]
    pub fn is_accept_all(&self) -> bool {
        self.root.is_accept_all()
    }

    #[inline]
    pub fn matches(&self, metadata: &ResourceMetadata) -> bool {
        self.root.matches(metadata)
    }
}

impl Default for CompiledFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl ResourceFilter for CompiledFilter {
    #[inline]
    fn matches(&self, metadata: &ResourceMetadata) -> bool {
        self.root.matches(metadata)
    }
}

/// Canonical rendering of the compiled tree.
impl fmt::Display for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}
