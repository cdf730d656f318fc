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

//! # Nodes Filter Error Handling
//!
//! Error types shared by the nodes filter crates.
//!
//! - [`FilterError`]: raised while compiling a filter definition string
//! - [`NodesError`]: unified error for configuration loading and activation
//!
//! ```rust
//! use nodes_error::FilterError;
//! use nodes_error::NodesError;
//!
//! let err: NodesError = FilterError::parse(3, "'('", "end of input").into();
//! assert!(err.as_filter_error().is_some());
//! ```

pub mod filter_error;
pub mod unified;

pub use filter_error::FilterError;
pub use unified::NodesError;
pub use unified::NodesResult;
