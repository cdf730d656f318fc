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

pub mod filter_expression;
pub mod resource_metadata;

use std::sync::Arc;

use crate::expression::resource_metadata::ResourceMetadata;

/// Anything that yields a boolean verdict for a resource.
///
/// Implemented by [`FilterExpression`](filter_expression::FilterExpression), the compiled
/// filter wrapping it, and the reloadable slot publishing compiled filters.
pub trait ResourceFilter: Send + Sync {
    /// Evaluates the filter against a metadata snapshot.
    ///
    /// # Guarantees
    ///
    /// - **Non-panicking**: evaluation never fails once a filter is compiled
    /// - **Deterministic**: the same metadata always yields the same verdict
    fn matches(&self, metadata: &ResourceMetadata) -> bool;
}

impl<F: ResourceFilter + ?Sized> ResourceFilter for Arc<F> {
    #[inline]
    fn matches(&self, metadata: &ResourceMetadata) -> bool {
        (**self).matches(metadata)
    }
}

impl<F: ResourceFilter + ?Sized> ResourceFilter for &F {
    #[inline]
    fn matches(&self, metadata: &ResourceMetadata) -> bool {
        (**self).matches(metadata)
    }
}
