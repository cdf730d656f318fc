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

/// Whether a pattern match includes or excludes a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    /// Passes if any pattern matches. Written as `+`, also the default when omitted.
    #[default]
    Include,
    /// Passes if no pattern matches. Written as `-`.
    Exclude,
}

impl Sign {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Sign::Include),
            '-' => Some(Sign::Exclude),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Sign::Include => '+',
            Sign::Exclude => '-',
        }
    }

    /// Turns the combined match result of a leaf into its verdict.
    #[inline]
    pub fn apply(self, any_match: bool) -> bool {
        match self {
            Sign::Include => any_match,
            Sign::Exclude => !any_match,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
