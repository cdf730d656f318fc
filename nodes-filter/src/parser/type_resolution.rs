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

use cheetah_string::CheetahString;
use serde::Deserialize;
use serde::Serialize;

use crate::constant::predicate_kind::PredicateKind;

/// Concrete predicate a `Type(literal)` resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTarget {
    PrimaryType,
    MixinType,
    /// Matches the primary type or any mixin type.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRule {
    pub prefix: String,
    pub target: TypeTarget,
}

impl TypeRule {
    pub fn new(prefix: impl Into<String>, target: TypeTarget) -> Self {
        TypeRule {
            prefix: prefix.into(),
            target,
        }
    }
}

/// Namespace prefix rules resolving `Type(literal)` at parse time.
///
/// Rules are checked in order and the first prefix the literal starts with wins.
/// Literals no rule claims resolve to [`PredicateKind::GenericType`]. The default
/// rule set maps `mix:` to [`PredicateKind::MixinType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeResolution {
    rules: Vec<TypeRule>,
}

impl Default for TypeResolution {
    fn default() -> Self {
        TypeResolution {
            rules: vec![TypeRule::new("mix:", TypeTarget::MixinType)],
        }
    }
}

impl TypeResolution {
    pub fn new(rules: Vec<TypeRule>) -> Self {
        TypeResolution { rules }
    }

    /// No rules: every literal resolves to a generic type check.
    pub fn generic_only() -> Self {
        TypeResolution { rules: Vec::new() }
    }

    pub fn with_rule(mut self, prefix: impl Into<String>, target: TypeTarget) -> Self {
        self.rules.push(TypeRule::new(prefix, target));
        self
    }

    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }

    pub fn resolve(&self, literal: &str) -> PredicateKind {
        let target = self
            .rules
            .iter()
            .find(|rule| literal.starts_with(rule.prefix.as_str()))
            .map_or(TypeTarget::Generic, |rule| rule.target);
        match target {
            TypeTarget::PrimaryType => PredicateKind::PrimaryType,
            TypeTarget::MixinType => PredicateKind::MixinType,
            TypeTarget::Generic => PredicateKind::GenericType(CheetahString::from_slice(literal)),
        }
    }
}
