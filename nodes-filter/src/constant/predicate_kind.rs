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

use cheetah_string::CheetahString;

/// The metadata field(s) a regex driven leaf predicate inspects.
///
/// `Folder()` is structural and has no kind, it is a node of its own in the filter tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    Name,
    Path,
    PrimaryType,
    ResourceType,
    MimeType,
    MixinType,
    /// A `Type(tag)` literal no type rule claimed; matches the primary type or any mixin type.
    GenericType(CheetahString),
}

impl PredicateKind {
    /// Name used for the predicate in filter definitions.
    pub fn name(&self) -> &'static str {
        match self {
            PredicateKind::Name => "Name",
            PredicateKind::Path => "Path",
            PredicateKind::PrimaryType => "PrimaryType",
            PredicateKind::ResourceType => "ResourceType",
            PredicateKind::MimeType => "MimeType",
            PredicateKind::MixinType => "MixinType",
            PredicateKind::GenericType(_) => "Type",
        }
    }

    /// Looks up a regex driven predicate by its name.
    ///
    /// `Type` and `Folder` are not resolvable here: the kind of `Type` depends on the
    /// literal it carries and `Folder` takes no patterns.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Name" => Some(PredicateKind::Name),
            "Path" => Some(PredicateKind::Path),
            "PrimaryType" => Some(PredicateKind::PrimaryType),
            "ResourceType" => Some(PredicateKind::ResourceType),
            "MimeType" => Some(PredicateKind::MimeType),
            "MixinType" => Some(PredicateKind::MixinType),
            _ => None,
        }
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// All predicate names accepted by the parser, for diagnostics.
pub const PREDICATE_NAMES: &str = "Name, Path, PrimaryType, ResourceType, MimeType, MixinType, Type or Folder";
