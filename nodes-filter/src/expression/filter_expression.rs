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
use std::fmt::Write;

use crate::constant::predicate_kind::PredicateKind;
use crate::constant::sign::Sign;
use crate::expression::resource_metadata::ResourceMetadata;
use crate::expression::ResourceFilter;
use crate::pattern::Pattern;

/// Node of a compiled filter tree.
///
/// Trees are built by the parser and never change afterwards. The parser upholds the
/// invariants the evaluator relies on:
///
/// - `And` and `Or` have at least one child
/// - every `Leaf` carries at least one pattern
/// - `AcceptAll` only appears as the root of an empty definition
///
/// # Example
///
/// ```
/// use nodes_filter::{compile, ResourceMetadata};
///
/// let filter = compile("or{Folder(),PrimaryType(+'^dam:Asset(Content)?$')}").unwrap();
/// let asset = ResourceMetadata::new("/content/dam/a.png").with_primary_type("dam:Asset");
///
/// assert!(filter.root().matches(&asset));
/// assert_eq!(filter.root().to_string(), "or{Folder(),PrimaryType(+'^dam:Asset(Content)?$')}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpression {
    /// Result of an empty or absent definition; accepts everything.
    AcceptAll,
    /// True iff every child is true, evaluated left to right.
    And(Vec<FilterExpression>),
    /// True iff any child is true, evaluated left to right.
    Or(Vec<FilterExpression>),
    /// Regex driven predicate over one metadata field.
    Leaf {
        kind: PredicateKind,
        sign: Sign,
        patterns: Vec<Pattern>,
    },
    /// Structural predicate testing the folder flag of the metadata.
    Folder,
}

impl FilterExpression {
    /// Evaluates this node against `metadata`.
    ///
    /// Combinators short-circuit: `And` stops at the first false child and `Or` at the
    /// first true child, so large subtrees are skipped when the verdict is already known.
    pub fn matches(&self, metadata: &ResourceMetadata) -> bool {
        match self {
            FilterExpression::AcceptAll => true,
            FilterExpression::And(children) => children.iter().all(|child| child.matches(metadata)),
            FilterExpression::Or(children) => children.iter().any(|child| child.matches(metadata)),
            FilterExpression::Leaf { kind, sign, patterns } => sign.apply(any_match(kind, patterns, metadata)),
            FilterExpression::Folder => metadata.is_folder(),
        }
    }

    #[inline]
    pub fn is_accept_all(&self) -> bool {
        matches!(self, FilterExpression::AcceptAll)
    }

    /// Nesting depth of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            FilterExpression::And(children) | FilterExpression::Or(children) => {
                1 + children.iter().map(FilterExpression::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }

    /// Number of leaf predicates, `Folder` included.
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterExpression::AcceptAll => 0,
            FilterExpression::And(children) | FilterExpression::Or(children) => {
                children.iter().map(FilterExpression::leaf_count).sum()
            }
            FilterExpression::Leaf { .. } | FilterExpression::Folder => 1,
        }
    }
}

/// Tests every pattern of a leaf against the subject(s) selected by `kind`.
fn any_match(kind: &PredicateKind, patterns: &[Pattern], metadata: &ResourceMetadata) -> bool {
    let hit = |subject: &str| patterns.iter().any(|pattern| pattern.is_match(subject));
    match kind {
        PredicateKind::Name => hit(metadata.name()),
        PredicateKind::Path => hit(metadata.path()),
        PredicateKind::PrimaryType => hit(metadata.primary_type()),
        PredicateKind::ResourceType => metadata.resource_type().is_some_and(hit),
        PredicateKind::MimeType => metadata.mime_type().is_some_and(hit),
        PredicateKind::MixinType => metadata.mixin_types().any(hit),
        PredicateKind::GenericType(_) => hit(metadata.primary_type()) || metadata.mixin_types().any(hit),
    }
}

impl ResourceFilter for FilterExpression {
    #[inline]
    fn matches(&self, metadata: &ResourceMetadata) -> bool {
        FilterExpression::matches(self, metadata)
    }
}

/// Renders the canonical definition syntax, which parses back into an equal tree.
impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::AcceptAll => Ok(()),
            FilterExpression::And(children) => write_combinator(f, "and", children),
            FilterExpression::Or(children) => write_combinator(f, "or", children),
            FilterExpression::Leaf {
                kind: PredicateKind::GenericType(tag),
                sign,
                ..
            } => {
                write!(f, "Type({sign}'")?;
                write_escaped_literal(f, tag.as_str())?;
                f.write_str("')")
            }
            FilterExpression::Leaf { kind, sign, patterns } => {
                write!(f, "{}({sign}'", kind.name())?;
                for (index, pattern) in patterns.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(pattern.as_str())?;
                }
                f.write_str("')")
            }
            FilterExpression::Folder => f.write_str("Folder()"),
        }
    }
}

/// Writes a `Type` literal so that it reads back as one literal of a quoted group.
fn write_escaped_literal(f: &mut fmt::Formatter<'_>, literal: &str) -> fmt::Result {
    for c in literal.chars() {
        if matches!(c, '\\' | '\'' | ',') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    Ok(())
}

fn write_combinator(f: &mut fmt::Formatter<'_>, name: &str, children: &[FilterExpression]) -> fmt::Result {
    write!(f, "{name}{{")?;
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            f.write_str(",")?;
        }
        write!(f, "{child}")?;
    }
    f.write_str("}")
}
