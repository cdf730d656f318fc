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

//! Parser for filter definition strings.
//!
//! ```text
//! filter      := combinator | leaf | ε
//! combinator  := ("and" | "or") "{" filter ("," filter)* "}"
//! leaf        := predicate "(" [sign] group ("," group)* ")" | "Folder" "(" ")"
//! group       := "'" pattern ("," pattern)* "'"
//! sign        := "+" | "-"
//! ```
//!
//! Parsing runs in two passes. The first checks the syntax and collects the raw
//! pattern texts, the second compiles the patterns. A malformed definition therefore
//! always reports its [`FilterError::Parse`] even when it also carries an invalid
//! pattern.

pub mod type_resolution;

use std::borrow::Cow;

use nodes_error::FilterError;
use serde::Deserialize;
use serde::Serialize;

use crate::constant::predicate_kind::PredicateKind;
use crate::constant::predicate_kind::PREDICATE_NAMES;
use crate::constant::sign::Sign;
use crate::expression::filter_expression::FilterExpression;
use crate::parser::type_resolution::TypeResolution;
use crate::pattern::Pattern;
use crate::pattern::PatternOptions;

mod defaults {
    pub fn max_depth() -> usize {
        64
    }
}

/// Options for turning a definition string into a filter tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub pattern: PatternOptions,

    #[serde(default)]
    pub type_resolution: TypeResolution,

    /// Maximum nesting of `and{}` / `or{}` combinators.
    #[serde(default = "defaults::max_depth")]
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            pattern: PatternOptions::default(),
            type_resolution: TypeResolution::default(),
            max_depth: defaults::max_depth(),
        }
    }
}

/// Parses `source` into a filter tree; blank input yields [`FilterExpression::AcceptAll`].
///
/// # Errors
///
/// - [`FilterError::Parse`] for malformed syntax, unknown predicates, empty combinators
///   and empty pattern lists
/// - [`FilterError::Compile`] for pattern texts the regex engine rejects
pub fn parse(source: &str, options: &ParseOptions) -> Result<FilterExpression, FilterError> {
    match Parser::new(source, options.max_depth).parse_root()? {
        Some(syntax) => lower(syntax, options),
        None => Ok(FilterExpression::AcceptAll),
    }
}

/// Filter tree with raw, not yet compiled, pattern texts.
#[derive(Debug, PartialEq)]
enum Syntax<'a> {
    And(Vec<Syntax<'a>>),
    Or(Vec<Syntax<'a>>),
    Predicate {
        kind: PredicateKind,
        sign: Sign,
        patterns: Vec<&'a str>,
    },
    Type {
        sign: Sign,
        literals: Vec<&'a str>,
    },
    Folder,
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, max_depth: usize) -> Self {
        Parser {
            source,
            pos: 0,
            max_depth,
        }
    }

    fn parse_root(mut self) -> Result<Option<Syntax<'a>>, FilterError> {
        self.skip_whitespace();
        if self.peek().is_none() {
            return Ok(None);
        }
        let syntax = self.parse_expression(0)?;
        self.skip_whitespace();
        if self.peek().is_some() {
            return Err(self.error("end of input"));
        }
        Ok(Some(syntax))
    }

    fn parse_expression(&mut self, depth: usize) -> Result<Syntax<'a>, FilterError> {
        self.skip_whitespace();
        let start = self.pos;
        let name = self.identifier();
        match name {
            "" => Err(self.error("filter expression")),
            "and" => Ok(Syntax::And(self.parse_children(start, depth + 1)?)),
            "or" => Ok(Syntax::Or(self.parse_children(start, depth + 1)?)),
            "Type" => {
                self.expect('(')?;
                let sign = self.parse_sign();
                let literals = self.parse_arguments("Type", true)?;
                Ok(Syntax::Type { sign, literals })
            }
            "Folder" => {
                self.expect('(')?;
                self.skip_whitespace();
                if self.peek() != Some(')') {
                    return Err(self.error("')', Folder() takes no arguments"));
                }
                self.pos += 1;
                Ok(Syntax::Folder)
            }
            _ => match PredicateKind::from_name(name) {
                Some(kind) => {
                    self.expect('(')?;
                    let sign = self.parse_sign();
                    let patterns = self.parse_arguments(kind.name(), false)?;
                    Ok(Syntax::Predicate { kind, sign, patterns })
                }
                None => Err(FilterError::parse(
                    start,
                    format!("'and', 'or' or a predicate ({PREDICATE_NAMES})"),
                    format!("'{name}'"),
                )),
            },
        }
    }

    fn parse_children(&mut self, start: usize, depth: usize) -> Result<Vec<Syntax<'a>>, FilterError> {
        if depth > self.max_depth {
            return Err(FilterError::parse(
                start,
                format!("at most {} nested combinators", self.max_depth),
                "deeper nesting",
            ));
        }
        self.expect('{')?;
        self.skip_whitespace();
        if self.peek() == Some('}') {
            return Err(self.error("at least one filter expression"));
        }
        let mut children = Vec::new();
        loop {
            children.push(self.parse_expression(depth)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(children);
                }
                _ => return Err(self.error("',' or '}'")),
            }
        }
    }

    fn parse_sign(&mut self) -> Sign {
        self.skip_whitespace();
        match self.peek().and_then(Sign::from_symbol) {
            Some(sign) => {
                self.pos += 1;
                sign
            }
            None => Sign::Include,
        }
    }

    /// Parses the comma separated groups up to and including the closing parenthesis.
    fn parse_arguments(&mut self, predicate: &str, allow_bare: bool) -> Result<Vec<&'a str>, FilterError> {
        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('\'') => {
                    let group_start = self.pos;
                    for item in split_patterns(self.quoted()?) {
                        let item = item.trim();
                        if item.is_empty() {
                            return Err(FilterError::parse(
                                group_start,
                                format!("non-empty pattern list for {predicate}()"),
                                "empty pattern",
                            ));
                        }
                        values.push(item);
                    }
                }
                Some(c) if allow_bare && is_bare(c) => values.push(self.bare_literal()),
                _ if values.is_empty() => {
                    return Err(self.error(format!("quoted pattern list for {predicate}()")));
                }
                _ => return Err(self.error("quoted pattern")),
            }
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(')') => {
                    self.pos += 1;
                    return Ok(values);
                }
                _ => return Err(self.error("',' or ')'")),
            }
        }
    }

    /// Reads a single quoted group; a backslash escapes the next character.
    fn quoted(&mut self) -> Result<&'a str, FilterError> {
        let start = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        let mut escaped = false;
        while let Some(c) = self.bump() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '\'' => return Ok(&self.source[content_start..self.pos - 1]),
                _ => {}
            }
        }
        Err(FilterError::parse(start, "closing quote", "end of input"))
    }

    fn bare_literal(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_bare) {
            self.bump();
        }
        &self.source[start..self.pos]
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        &self.source[start..self.pos]
    }

    fn expect(&mut self, expected: char) -> Result<(), FilterError> {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("'{expected}'")))
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, expected: impl Into<String>) -> FilterError {
        let found = match self.peek() {
            Some(c) => format!("'{c}'"),
            None => "end of input".to_string(),
        };
        FilterError::parse(self.pos, expected, found)
    }
}

fn is_bare(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | '(' | ')' | '{' | '}' | '\'')
}

/// Splits a quoted group at commas outside of groups, repetitions, classes and escapes,
/// so `'^a{1,3}$,^b$'` yields two patterns.
///
/// Classes nest (`[[a]b,c]`) and a `]` right after `[` or `[^` is a literal member,
/// as in the `regex` crate syntax.
fn split_patterns(group: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut nesting = 0usize;
    let mut class_depth = 0usize;
    // Byte offset at which a `]` is still a literal of the class just opened.
    let mut literal_bracket = None;
    let mut escaped = false;
    for (index, c) in group.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => {
                class_depth += 1;
                literal_bracket = Some(index + 1);
            }
            '^' if class_depth > 0 && literal_bracket == Some(index) && group[..index].ends_with('[') => {
                literal_bracket = Some(index + 1);
            }
            ']' if class_depth > 0 && literal_bracket != Some(index) => class_depth -= 1,
            _ if class_depth > 0 => {}
            '(' | '{' => nesting += 1,
            ')' | '}' => nesting = nesting.saturating_sub(1),
            ',' if nesting == 0 => {
                parts.push(&group[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&group[start..]);
    parts
}

/// Resolves backslash escapes of a `Type` literal; `a\'b` names the type `a'b`.
fn unescape_literal(literal: &str) -> Cow<'_, str> {
    if !literal.contains('\\') {
        return Cow::Borrowed(literal);
    }
    let mut unescaped = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => unescaped.extend(chars.next()),
            _ => unescaped.push(c),
        }
    }
    Cow::Owned(unescaped)
}

fn lower(syntax: Syntax<'_>, options: &ParseOptions) -> Result<FilterExpression, FilterError> {
    match syntax {
        Syntax::And(children) => Ok(FilterExpression::And(lower_all(children, options)?)),
        Syntax::Or(children) => Ok(FilterExpression::Or(lower_all(children, options)?)),
        Syntax::Folder => Ok(FilterExpression::Folder),
        Syntax::Predicate { kind, sign, patterns } => {
            let patterns = patterns
                .into_iter()
                .map(|text| {
                    Pattern::new(text, &options.pattern)
                        .map_err(|e| FilterError::compile(kind.name(), text, e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FilterExpression::Leaf { kind, sign, patterns })
        }
        Syntax::Type { sign, literals } => {
            let mut leaves = literals
                .into_iter()
                .map(|literal| -> Result<FilterExpression, FilterError> {
                    let literal = unescape_literal(literal);
                    let pattern = Pattern::literal(&literal, &options.pattern)
                        .map_err(|e| FilterError::compile("Type", &*literal, e.to_string()))?;
                    Ok(FilterExpression::Leaf {
                        kind: options.type_resolution.resolve(&literal),
                        sign,
                        patterns: vec![pattern],
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            // Several literals keep the meaning of one leaf: any of them (+) or none of them (-).
            Ok(match (leaves.len(), sign) {
                (1, _) => leaves.remove(0),
                (_, Sign::Include) => FilterExpression::Or(leaves),
                (_, Sign::Exclude) => FilterExpression::And(leaves),
            })
        }
    }
}

fn lower_all(children: Vec<Syntax<'_>>, options: &ParseOptions) -> Result<Vec<FilterExpression>, FilterError> {
    children.into_iter().map(|child| lower(child, options)).collect()
}
