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

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use nodes_error::NodesError;
use nodes_error::NodesResult;
use tracing::info;

use crate::config::FilterConfig;
use crate::config::DEFAULT_NODE_FILTER_KEY;
use crate::config::ORDERABLE_NODES_FILTER_KEY;
use crate::config::PAGE_NODE_FILTER_KEY;
use crate::config::REFERENCEABLE_NODES_FILTER_KEY;
use crate::config::TREE_INTERMEDIATE_FILTER_KEY;
use crate::evaluator;
use crate::expression::resource_metadata::ResourceMetadata;
use crate::filter::compiled_filter::CompiledFilter;
use crate::filter::filter_slot::FilterSlot;

/// The named filters of the node browser, one slot per configuration key.
///
/// Owned by the component that loads the configuration and handed to request
/// handlers by reference (usually inside an `Arc`).
#[derive(Debug)]
pub struct NodeFilters {
    page: FilterSlot,
    default: FilterSlot,
    tree_intermediate: FilterSlot,
    referenceable: FilterSlot,
    orderable: FilterSlot,
    query_result_limit: AtomicUsize,
}

impl NodeFilters {
    /// Compiles every named filter of `config`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration value or on the first definition that does not
    /// compile, reported as [`NodesError::FilterRejected`] with the configuration key.
    pub fn activate(config: &FilterConfig) -> NodesResult<Self> {
        config.validate()?;
        let options = config.parse_options();
        let slot = |key: &'static str, source: &str| {
            FilterSlot::activate(key, source, &options).map_err(|e| NodesError::filter_rejected(key, e))
        };
        let filters = NodeFilters {
            page: slot(PAGE_NODE_FILTER_KEY, &config.page_node_filter)?,
            default: slot(DEFAULT_NODE_FILTER_KEY, &config.default_node_filter)?,
            tree_intermediate: slot(TREE_INTERMEDIATE_FILTER_KEY, &config.tree_intermediate_filter)?,
            referenceable: slot(REFERENCEABLE_NODES_FILTER_KEY, &config.referenceable_nodes_filter)?,
            orderable: slot(ORDERABLE_NODES_FILTER_KEY, &config.orderable_nodes_filter)?,
            query_result_limit: AtomicUsize::new(config.query_result_limit),
        };
        info!("Activated node filters, query result limit {}", config.query_result_limit);
        Ok(filters)
    }

    /// Applies a changed configuration.
    ///
    /// Every definition that compiles is published; every one that does not is reported
    /// and its slot keeps serving the previous filter. An invalid configuration value
    /// rejects the whole change.
    pub fn reload(&self, config: &FilterConfig) -> Result<(), Vec<NodesError>> {
        config.validate().map_err(|e| vec![e])?;
        let options = config.parse_options();
        let rejected: Vec<NodesError> = self
            .slots()
            .into_iter()
            .zip(config.filters())
            .filter_map(|(slot, (key, source))| {
                slot.reload_with(source, &options)
                    .err()
                    .map(|e| NodesError::filter_rejected(key, e))
            })
            .collect();
        self.query_result_limit
            .store(config.query_result_limit, Ordering::Release);
        if rejected.is_empty() {
            Ok(())
        } else {
            Err(rejected)
        }
    }

    pub fn page_node_filter(&self) -> Arc<CompiledFilter> {
        self.page.load()
    }

    pub fn default_node_filter(&self) -> Arc<CompiledFilter> {
        self.default.load()
    }

    pub fn tree_intermediate_filter(&self) -> Arc<CompiledFilter> {
        self.tree_intermediate.load()
    }

    pub fn referenceable_nodes_filter(&self) -> Arc<CompiledFilter> {
        self.referenceable.load()
    }

    pub fn orderable_nodes_filter(&self) -> Arc<CompiledFilter> {
        self.orderable.load()
    }

    pub fn query_result_limit(&self) -> usize {
        self.query_result_limit.load(Ordering::Acquire)
    }

    /// Looks up a slot by its configuration key.
    pub fn slot(&self, key: &str) -> Option<&FilterSlot> {
        self.slots().into_iter().find(|slot| slot.key() == key)
    }

    /// Visible resources of a listing: those passing the default node filter, capped at
    /// the query result limit.
    pub fn select_visible<I>(&self, items: I) -> Vec<ResourceMetadata>
    where
        I: IntoIterator<Item = ResourceMetadata>,
    {
        let filter = self.default.load();
        evaluator::select(&*filter, items, self.query_result_limit()).collect()
    }

    /// Slots in the order of [`FilterConfig::filters`].
    fn slots(&self) -> [&FilterSlot; 5] {
        [
            &self.page,
            &self.default,
            &self.tree_intermediate,
            &self.referenceable,
            &self.orderable,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_defaults() {
        let filters = NodeFilters::activate(&FilterConfig::default()).unwrap();
        assert_eq!(filters.query_result_limit(), 500);
        assert!(!filters.default_node_filter().is_accept_all());
        assert_eq!(
            filters.slot(TREE_INTERMEDIATE_FILTER_KEY).map(FilterSlot::key),
            Some(TREE_INTERMEDIATE_FILTER_KEY)
        );
        assert!(filters.slot("unknown.filter").is_none());
    }

    #[test]
    fn test_activate_reports_key() {
        let config = FilterConfig {
            orderable_nodes_filter: "or{Type(node:orderable),}".to_string(),
            ..FilterConfig::default()
        };
        match NodeFilters::activate(&config) {
            Err(NodesError::FilterRejected { key, source }) => {
                assert_eq!(key, ORDERABLE_NODES_FILTER_KEY);
                assert!(source.is_parse_error());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reload_is_fail_safe_per_slot() {
        let filters = NodeFilters::activate(&FilterConfig::default()).unwrap();
        let previous_default = filters.default_node_filter();

        let config = FilterConfig {
            page_node_filter: String::new(),
            default_node_filter: "Path(-'^/(bin$')".to_string(),
            query_result_limit: 10,
            ..FilterConfig::default()
        };
        let rejected = filters.reload(&config).unwrap_err();

        assert_eq!(rejected.len(), 1);
        assert!(matches!(
            &rejected[0],
            NodesError::FilterRejected { key: DEFAULT_NODE_FILTER_KEY, .. }
        ));
        assert!(Arc::ptr_eq(&previous_default, &filters.default_node_filter()));
        assert!(filters.page_node_filter().is_accept_all());
        assert_eq!(filters.query_result_limit(), 10);
    }

    #[test]
    fn test_reload_rejects_invalid_limit() {
        let filters = NodeFilters::activate(&FilterConfig::default()).unwrap();
        let config = FilterConfig {
            query_result_limit: 0,
            tree_intermediate_filter: "Folder()".to_string(),
            ..FilterConfig::default()
        };
        assert!(filters.reload(&config).is_err());
        assert_eq!(filters.query_result_limit(), 500);
        assert_eq!(filters.tree_intermediate_filter().source(), FilterConfig::default().tree_intermediate_filter);
    }

    #[test]
    fn test_select_visible_caps_results() {
        let config = FilterConfig {
            query_result_limit: 2,
            ..FilterConfig::default()
        };
        let filters = NodeFilters::activate(&config).unwrap();
        let items = vec![
            ResourceMetadata::new("/bin/ls"),
            ResourceMetadata::new("/content/a"),
            ResourceMetadata::new("/content/a/rep:policy"),
            ResourceMetadata::new("/content/b"),
            ResourceMetadata::new("/content/c"),
        ];
        let visible = filters.select_visible(items);
        let paths: Vec<&str> = visible.iter().map(ResourceMetadata::path).collect();
        assert_eq!(paths, vec!["/content/a", "/content/b"]);
    }
}
