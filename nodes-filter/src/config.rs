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

//! Filter configuration of the node browser.
//!
//! Each named filter is a definition string; an empty string configures no filter and
//! accepts every resource.

use std::path::Path;

use nodes_common::ParseConfigFile;
use nodes_error::NodesError;
use nodes_error::NodesResult;
use serde::Deserialize;
use serde::Serialize;

use crate::parser::type_resolution::TypeResolution;
use crate::parser::ParseOptions;
use crate::pattern::PatternOptions;

pub const PAGE_NODE_FILTER_KEY: &str = "node.page.filter";
pub const DEFAULT_NODE_FILTER_KEY: &str = "node.default.filter";
pub const TREE_INTERMEDIATE_FILTER_KEY: &str = "tree.intermediate.filter";
pub const REFERENCEABLE_NODES_FILTER_KEY: &str = "node.referenceable.filter";
pub const ORDERABLE_NODES_FILTER_KEY: &str = "node.orderable.filter";
pub const QUERY_RESULT_LIMIT_KEY: &str = "query.result.limit";

/// Default value functions for Serde deserialization
mod defaults {
    pub fn page_node_filter() -> String {
        "or{ResourceType(+'^[a-z]+:.*([Ss]ite|[Pp]age)$'),and{PrimaryType(+'^nt:file$'),MimeType(+'^text/html$')}}"
            .to_string()
    }

    pub fn default_node_filter() -> String {
        "and{Name(-'^rep:(repo)?[Pp]olicy$'),Path(-'^/bin(/.*)?$,^/services(/.*)?$,^/servlet(/.*)?$,^/(jcr:)?system(/.*)?$')}"
            .to_string()
    }

    pub fn tree_intermediate_filter() -> String {
        "or{Folder(),PrimaryType(+'^dam:Asset(Content)?$')}".to_string()
    }

    pub fn referenceable_nodes_filter() -> String {
        "Type(mix:referenceable)".to_string()
    }

    pub fn orderable_nodes_filter() -> String {
        "or{Type(node:orderable),PrimaryType(+'^.*([Oo]rdered|[Pp]age).*$,^sling:(Mapping)$,^nt:(unstructured|frozenNode)$,^rep:(ACL|Members|system)$')}"
            .to_string()
    }

    pub fn query_result_limit() -> usize {
        500
    }
}

/// Definitions of the named node filters plus the options used to compile them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Scope of content pages.
    #[serde(default = "defaults::page_node_filter")]
    pub page_node_filter: String,

    /// Hides system nodes from navigation.
    #[serde(default = "defaults::default_node_filter")]
    pub default_node_filter: String,

    /// Intermediate (folder like) nodes of the tree view.
    #[serde(default = "defaults::tree_intermediate_filter")]
    pub tree_intermediate_filter: String,

    /// Reference target nodes.
    #[serde(default = "defaults::referenceable_nodes_filter")]
    pub referenceable_nodes_filter: String,

    /// Nodes with a significant child order, which must not be sorted in the tree.
    #[serde(default = "defaults::orderable_nodes_filter")]
    pub orderable_nodes_filter: String,

    /// Maximum node count of query results.
    #[serde(default = "defaults::query_result_limit")]
    pub query_result_limit: usize,

    #[serde(default)]
    pub pattern: PatternOptions,

    #[serde(default)]
    pub type_rules: TypeResolution,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            page_node_filter: defaults::page_node_filter(),
            default_node_filter: defaults::default_node_filter(),
            tree_intermediate_filter: defaults::tree_intermediate_filter(),
            referenceable_nodes_filter: defaults::referenceable_nodes_filter(),
            orderable_nodes_filter: defaults::orderable_nodes_filter(),
            query_result_limit: defaults::query_result_limit(),
            pattern: PatternOptions::default(),
            type_rules: TypeResolution::default(),
        }
    }
}

impl FilterConfig {
    /// Reads the configuration from a file, see [`nodes_common::utils::parse_config_file`].
    pub fn load(config_file: impl AsRef<Path>) -> NodesResult<Self> {
        let config: FilterConfig = ParseConfigFile::parse_config_file(config_file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NodesResult<()> {
        if self.query_result_limit == 0 {
            return Err(NodesError::config_invalid_value(
                QUERY_RESULT_LIMIT_KEY,
                self.query_result_limit.to_string(),
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            pattern: self.pattern,
            type_resolution: self.type_rules.clone(),
            ..ParseOptions::default()
        }
    }

    /// The named definitions as `(key, source)` pairs.
    pub fn filters(&self) -> [(&'static str, &str); 5] {
        [
            (PAGE_NODE_FILTER_KEY, self.page_node_filter.as_str()),
            (DEFAULT_NODE_FILTER_KEY, self.default_node_filter.as_str()),
            (TREE_INTERMEDIATE_FILTER_KEY, self.tree_intermediate_filter.as_str()),
            (REFERENCEABLE_NODES_FILTER_KEY, self.referenceable_nodes_filter.as_str()),
            (ORDERABLE_NODES_FILTER_KEY, self.orderable_nodes_filter.as_str()),
        ]
    }
}
