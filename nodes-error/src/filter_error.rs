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

/// Error types for filter compilation.
///
/// Both variants are raised while a filter definition is compiled. Evaluating an
/// already compiled filter never fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The definition string is not well formed.
    #[error("Filter parse error at position {position}: expected {expected}, found {found}")]
    Parse {
        position: usize,
        expected: String,
        found: String,
    },

    /// A pattern of a leaf predicate is not a valid regular expression.
    #[error("Invalid pattern '{pattern}' in {predicate}(): {diagnostic}")]
    Compile {
        predicate: String,
        pattern: String,
        diagnostic: String,
    },
}

impl FilterError {
    pub fn parse(position: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        FilterError::Parse {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn compile(predicate: impl Into<String>, pattern: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        FilterError::Compile {
            predicate: predicate.into(),
            pattern: pattern.into(),
            diagnostic: diagnostic.into(),
        }
    }

    #[inline]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, FilterError::Parse { .. })
    }

    #[inline]
    pub fn is_compile_error(&self) -> bool {
        matches!(self, FilterError::Compile { .. })
    }

    /// Byte offset into the definition string, for parse errors only.
    pub fn position(&self) -> Option<usize> {
        match self {
            FilterError::Parse { position, .. } => Some(*position),
            FilterError::Compile { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error() {
        let err = FilterError::parse(4, "'{'", "'('");
        assert_eq!(
            err.to_string(),
            "Filter parse error at position 4: expected '{', found '('"
        );
        assert!(err.is_parse_error());
        assert_eq!(err.position(), Some(4));

        let err = FilterError::compile("Name", "^(foo$", "unclosed group");
        assert_eq!(
            err.to_string(),
            "Invalid pattern '^(foo$' in Name(): unclosed group"
        );
        assert!(err.is_compile_error());
        assert_eq!(err.position(), None);
    }
}
