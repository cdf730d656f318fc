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

//! Compiled regular expressions of leaf predicates.
//!
//! Matching is an unanchored search: a pattern only matches the whole subject if its
//! text carries `^...$` itself, as every shipped filter definition does. Patterns are
//! case-sensitive unless [`PatternOptions::case_insensitive`] is set or the pattern
//! embeds `(?i)`. The same options apply to every predicate kind.

use std::fmt;

use cheetah_string::CheetahString;
use regex::Regex;
use regex::RegexBuilder;
use serde::Deserialize;
use serde::Serialize;

mod defaults {
    pub fn size_limit() -> usize {
        1 << 20
    }
}

/// Options applied uniformly when compiling the patterns of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternOptions {
    #[serde(default)]
    pub case_insensitive: bool,

    /// Upper bound in bytes for a compiled pattern program.
    #[serde(default = "defaults::size_limit")]
    pub size_limit: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        PatternOptions {
            case_insensitive: false,
            size_limit: defaults::size_limit(),
        }
    }
}

/// A compiled regular expression together with its source text.
#[derive(Clone)]
pub struct Pattern {
    source: CheetahString,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` as a regular expression.
    ///
    /// # Errors
    ///
    /// Returns the `regex` crate error when the text is not a valid expression or the
    /// compiled program exceeds [`PatternOptions::size_limit`].
    pub fn new(source: &str, options: &PatternOptions) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(options.case_insensitive)
            .size_limit(options.size_limit)
            .build()?;
        Ok(Pattern {
            source: CheetahString::from_slice(source),
            regex,
        })
    }

    /// Builds a pattern matching exactly `literal`.
    ///
    /// Quotes and commas are escaped as well, so the source text can be written back into
    /// a quoted pattern group.
    pub fn literal(literal: &str, options: &PatternOptions) -> Result<Self, regex::Error> {
        let escaped = regex::escape(literal).replace('\'', "\\'").replace(',', "\\,");
        Self::new(&format!("^{escaped}$"), options)
    }

    #[inline]
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.source.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
