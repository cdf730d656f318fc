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

//! Resource Filter Expression Language
//!
//! Compiles filter definition strings such as
//! `and{Name(-'^rep:(repo)?[Pp]olicy$'),Path(-'^/bin(/.*)?$')}` into immutable predicate
//! trees and evaluates them against [`ResourceMetadata`] snapshots of repository nodes.
//!
//! # Usage
//!
//! ```rust
//! use nodes_filter::{compile, evaluate, ResourceMetadata};
//!
//! let filter = compile("or{Folder(),PrimaryType(+'^dam:Asset(Content)?$')}").unwrap();
//!
//! let folder = ResourceMetadata::new("/content/dam").with_primary_type("nt:unstructured").with_folder(true);
//! let asset = ResourceMetadata::new("/content/dam/a.png").with_primary_type("dam:Asset");
//! let file = ResourceMetadata::new("/content/a.txt").with_primary_type("nt:file");
//!
//! assert!(evaluate(&filter, &folder));
//! assert!(evaluate(&filter, &asset));
//! assert!(!evaluate(&filter, &file));
//! ```
//!
//! An empty definition compiles to a filter accepting everything:
//!
//! ```rust
//! use nodes_filter::{compile, compile_optional, ResourceMetadata};
//!
//! assert!(compile("").unwrap().matches(&ResourceMetadata::new("/bin")));
//! assert!(compile_optional(None).unwrap().is_accept_all());
//! ```

pub mod config;
pub mod constant;
pub mod evaluator;
pub mod expression;
pub mod filter;
pub mod parser;
pub mod pattern;

pub use config::FilterConfig;
pub use constant::predicate_kind::PredicateKind;
pub use constant::sign::Sign;
pub use evaluator::evaluate;
pub use evaluator::select;
pub use expression::filter_expression::FilterExpression;
pub use expression::resource_metadata::ResourceMetadata;
pub use expression::ResourceFilter;
pub use filter::CompiledFilter;
pub use filter::FilterCache;
pub use filter::FilterSlot;
pub use filter::NodeFilters;
pub use nodes_error::FilterError;
pub use parser::type_resolution::TypeResolution;
pub use parser::type_resolution::TypeRule;
pub use parser::type_resolution::TypeTarget;
pub use parser::ParseOptions;
pub use pattern::Pattern;
pub use pattern::PatternOptions;

/// Compiles a definition string with default [`ParseOptions`].
pub fn compile(source: &str) -> Result<CompiledFilter, FilterError> {
    CompiledFilter::compile(source, &ParseOptions::default())
}

/// Compiles a definition that may be absent; `None` accepts everything.
pub fn compile_optional(source: Option<&str>) -> Result<CompiledFilter, FilterError> {
    match source {
        Some(source) => compile(source),
        None => Ok(CompiledFilter::accept_all()),
    }
}

/// Compiles a definition string with explicit options.
pub fn compile_with(source: &str, options: &ParseOptions) -> Result<CompiledFilter, FilterError> {
    CompiledFilter::compile(source, options)
}
