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
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use nodes_error::FilterError;
use parking_lot::RwLock;
use tracing::info;
use tracing::warn;

use crate::expression::resource_metadata::ResourceMetadata;
use crate::expression::ResourceFilter;
use crate::filter::compiled_filter::CompiledFilter;
use crate::parser::ParseOptions;

/// Holder of the compiled filter published for one configuration key.
///
/// Readers take a snapshot with [`load`](Self::load) and evaluate it without holding
/// any lock. A reload builds the replacement completely before swapping the pointer
/// under a short write lock, so an evaluation in flight sees either the old or the new
/// tree, never a partially built one.
///
/// # Examples
///
/// ```
/// use nodes_filter::{FilterSlot, ResourceMetadata};
///
/// let slot = FilterSlot::new("node.default.filter", Default::default());
/// let bin = ResourceMetadata::new("/bin/cat");
/// assert!(slot.load().matches(&bin));
///
/// slot.reload("Path(-'^/bin(/.*)?$')").unwrap();
/// assert!(!slot.load().matches(&bin));
///
/// // A broken definition is rejected and the previous filter stays published.
/// assert!(slot.reload("Path(-'^/bin(/.*)?$'").is_err());
/// assert!(!slot.load().matches(&bin));
/// ```
pub struct FilterSlot {
    key: &'static str,
    current: RwLock<Arc<CompiledFilter>>,
    generation: AtomicU64,
}

impl FilterSlot {
    pub fn new(key: &'static str, filter: CompiledFilter) -> Self {
        FilterSlot {
            key,
            current: RwLock::new(Arc::new(filter)),
            generation: AtomicU64::new(0),
        }
    }

    /// Compiles the initial filter of the slot.
    pub fn activate(key: &'static str, source: &str, options: &ParseOptions) -> Result<Self, FilterError> {
        Ok(Self::new(key, CompiledFilter::compile(source, options)?))
    }

    /// Returns the currently published filter.
    #[inline]
    pub fn load(&self) -> Arc<CompiledFilter> {
        Arc::clone(&self.current.read())
    }

    /// Recompiles with default options and publishes the result.
    pub fn reload(&self, source: &str) -> Result<Arc<CompiledFilter>, FilterError> {
        self.reload_with(source, &ParseOptions::default())
    }

    /// Recompiles `source` and atomically publishes the result.
    ///
    /// # Errors
    ///
    /// On a parse or compile error nothing is published, the previous filter keeps
    /// serving and the error is returned for the configuration layer to report.
    pub fn reload_with(&self, source: &str, options: &ParseOptions) -> Result<Arc<CompiledFilter>, FilterError> {
        match CompiledFilter::compile(source, options) {
            Ok(filter) => {
                let filter = Arc::new(filter);
                self.publish(Arc::clone(&filter));
                info!("Reloaded filter {}: '{}'", self.key, filter.source());
                Ok(filter)
            }
            Err(e) => {
                warn!(
                    "Rejected filter {} '{}', keeping '{}': {}",
                    self.key,
                    source,
                    self.load().source(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Publishes an already compiled filter.
    pub fn publish(&self, filter: Arc<CompiledFilter>) {
        *self.current.write() = filter;
        self.generation.fetch_add(1, Ordering::Release);
    }

    #[inline]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Number of successful publications since activation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl ResourceFilter for FilterSlot {
    #[inline]
    fn matches(&self, metadata: &ResourceMetadata) -> bool {
        self.load().matches(metadata)
    }
}

impl fmt::Debug for FilterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSlot")
            .field("key", &self.key)
            .field("source", &self.load().source())
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_load() {
        let slot = FilterSlot::activate("tree.intermediate.filter", "Folder()", &ParseOptions::default()).unwrap();
        assert_eq!(slot.key(), "tree.intermediate.filter");
        assert_eq!(slot.generation(), 0);
        assert!(slot.matches(&ResourceMetadata::new("/a").with_folder(true)));
        assert!(!slot.matches(&ResourceMetadata::new("/a")));
    }

    #[test]
    fn test_activate_rejects_invalid_definition() {
        assert!(FilterSlot::activate("k", "or{}", &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_reload_swaps_and_keeps_snapshots() {
        let slot = FilterSlot::new("k", CompiledFilter::accept_all());
        let before = slot.load();

        let after = slot.reload("Name(+'^a$')").unwrap();
        assert!(Arc::ptr_eq(&after, &slot.load()));
        assert_eq!(slot.generation(), 1);

        // A snapshot taken before the reload still evaluates the old tree.
        assert!(before.matches(&ResourceMetadata::new("/b")));
        assert!(!slot.load().matches(&ResourceMetadata::new("/b")));
    }

    #[test]
    fn test_failed_reload_keeps_previous_filter() {
        let slot = FilterSlot::activate("k", "Name(+'^a$')", &ParseOptions::default()).unwrap();
        let previous = slot.load();

        assert!(slot.reload("Name(+'^(a$')").unwrap_err().is_compile_error());
        assert!(slot.reload("Bogus(+'a')").unwrap_err().is_parse_error());

        assert!(Arc::ptr_eq(&previous, &slot.load()));
        assert_eq!(slot.generation(), 0);
    }

    #[test]
    fn test_debug_shows_source() {
        let slot = FilterSlot::activate("k", "Folder()", &ParseOptions::default()).unwrap();
        let debug = format!("{slot:?}");
        assert!(debug.contains("Folder()"));
    }
}
