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

//! Evaluation entry points.
//!
//! Evaluation is a pure walk over an immutable tree: no I/O, no locking, no failure.

use std::borrow::Borrow;

use crate::expression::resource_metadata::ResourceMetadata;
use crate::expression::ResourceFilter;
use crate::filter::compiled_filter::CompiledFilter;

/// Evaluates a compiled filter against one resource.
#[inline]
pub fn evaluate(filter: &CompiledFilter, metadata: &ResourceMetadata) -> bool {
    filter.matches(metadata)
}

/// Lazily yields the items accepted by `filter`, at most `limit` of them.
///
/// Iteration over `items` stops as soon as the limit is reached, so a capped listing
/// of a large tree evaluates only as many nodes as it needs.
pub fn select<'a, F, I>(filter: &'a F, items: I, limit: usize) -> impl Iterator<Item = I::Item> + 'a
where
    F: ResourceFilter + ?Sized,
    I: IntoIterator,
    I: 'a,
    I::IntoIter: 'a,
    I::Item: Borrow<ResourceMetadata>,
{
    items
        .into_iter()
        .filter(move |item| filter.matches(item.borrow()))
        .take(limit)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::parser::ParseOptions;

    #[test]
    fn test_evaluate() {
        let filter = CompiledFilter::compile("Name(+'^foo$')", &ParseOptions::default()).unwrap();
        assert!(evaluate(&filter, &ResourceMetadata::new("/a/foo")));
        assert!(!evaluate(&filter, &ResourceMetadata::new("/a/bar")));
    }

    #[test]
    fn test_select_by_reference() {
        let filter = CompiledFilter::compile("Folder()", &ParseOptions::default()).unwrap();
        let items = [
            ResourceMetadata::new("/a").with_folder(true),
            ResourceMetadata::new("/b"),
            ResourceMetadata::new("/c").with_folder(true),
        ];
        let selected: Vec<&ResourceMetadata> = select(&filter, &items, 10).collect();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[1].path(), "/c");
    }

    #[test]
    fn test_select_stops_at_limit() {
        let filter = CompiledFilter::accept_all();
        let visited = Cell::new(0);
        let items = (0..100).map(|i| {
            visited.set(visited.get() + 1);
            ResourceMetadata::new(format!("/n{i}"))
        });
        assert_eq!(select(&filter, items, 3).count(), 3);
        assert_eq!(visited.get(), 3);
    }
}
