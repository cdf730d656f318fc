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

//! Compiled filters and their lifecycle
//!
//! A definition string is compiled once per configuration generation and then shared
//! read-only by every evaluating thread.
//!
//! # Components
//!
//! 1. **[`CompiledFilter`]**: immutable pair of definition string and filter tree
//! 2. **[`FilterCache`]**: memoizes compiled filters per definition string
//! 3. **[`FilterSlot`]**: publishes the filter of one configuration key and swaps it
//!    atomically on reload, keeping the previous filter when a reload fails
//! 4. **[`NodeFilters`]**: the named filters of the node browser
//!
//! # Thread Safety
//!
//! - Compiled filters are immutable and `Send + Sync`
//! - The cache uses `DashMap` for concurrent lookups
//! - Slots hold their filter behind a `parking_lot::RwLock<Arc<_>>`; the write lock
//!   only covers the pointer swap

pub mod compiled_filter;
pub mod filter_cache;
pub mod filter_slot;
pub mod node_filters;

pub use compiled_filter::CompiledFilter;
pub use filter_cache::FilterCache;
pub use filter_slot::FilterSlot;
pub use node_filters::NodeFilters;
