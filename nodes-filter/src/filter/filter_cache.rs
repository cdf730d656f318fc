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

//! Memoizing cache of compiled filters
//!
//! Filters are looked up by their definition string, so callers that receive the same
//! definition again (per request, per listing) skip parsing and pattern compilation.
//!
//! # Examples
//!
//! ```rust
//! use nodes_filter::{FilterCache, ResourceMetadata};
//!
//! let cache = FilterCache::new();
//! let filter = cache.get("MixinType(+'^mix:referenceable$')").unwrap();
//! let again = cache.get("MixinType(+'^mix:referenceable$')").unwrap();
//!
//! assert!(std::sync::Arc::ptr_eq(&filter, &again));
//! assert_eq!(cache.len(), 1);
//! ```

use std::sync::Arc;

use cheetah_string::CheetahString;
use dashmap::DashMap;
use nodes_error::FilterError;
use tracing::warn;

use crate::filter::compiled_filter::CompiledFilter;
use crate::parser::ParseOptions;

/// Cache of compiled filters keyed by definition string.
///
/// The cache belongs to the component that owns the configuration and lives as long
/// as one configuration generation; it is handed to evaluators by reference.
///
/// # Thread Safety
///
/// Lookups and insertions go through a `DashMap` and may run concurrently. Two threads
/// missing on the same source both compile it, the first insertion wins and both get
/// the same `Arc`.
#[derive(Debug, Default)]
pub struct FilterCache {
    options: ParseOptions,
    compiled: DashMap<CheetahString, Arc<CompiledFilter>>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache compiling every definition with `options`.
    pub fn with_options(options: ParseOptions) -> Self {
        FilterCache {
            options,
            compiled: DashMap::new(),
        }
    }

    /// Returns the compiled filter for `source`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the parse or compile error of the first compilation. Failing
    /// definitions are not cached, a later call compiles them again.
    ///
    /// # Performance
    ///
    /// A hit is a shard read lock plus an `Arc` reference count increment.
    pub fn get(&self, source: &str) -> Result<Arc<CompiledFilter>, FilterError> {
        if let Some(entry) = self.compiled.get(source) {
            return Ok(Arc::clone(&*entry));
        }
        let filter = Arc::new(CompiledFilter::compile(source, &self.options)?);
        let entry = self
            .compiled
            .entry(CheetahString::from_slice(source))
            .or_insert(filter);
        Ok(Arc::clone(&*entry))
    }

    /// Recompiles `source` and replaces the cached entry.
    ///
    /// On failure the previously cached filter, if any, stays in place and the error is
    /// returned to the caller.
    pub fn reload(&self, source: &str) -> Result<Arc<CompiledFilter>, FilterError> {
        match CompiledFilter::compile(source, &self.options) {
            Ok(filter) => {
                let filter = Arc::new(filter);
                self.compiled
                    .insert(CheetahString::from_slice(source), Arc::clone(&filter));
                Ok(filter)
            }
            Err(e) => {
                warn!("Rejected filter '{}', keeping cached entry: {}", source, e);
                Err(e)
            }
        }
    }

    /// Removes the entry for `source`, returning it if it was cached.
    pub fn invalidate(&self, source: &str) -> Option<Arc<CompiledFilter>> {
        self.compiled.remove(source).map(|(_, filter)| filter)
    }

    pub fn clear(&self) {
        self.compiled.clear();
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}
