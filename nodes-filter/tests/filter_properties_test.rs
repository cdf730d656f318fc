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

//! Behavior of compiled filters against resource metadata

use nodes_filter::compile;
use nodes_filter::compile_optional;
use nodes_filter::compile_with;
use nodes_filter::evaluate;
use nodes_filter::FilterError;
use nodes_filter::ParseOptions;
use nodes_filter::PatternOptions;
use nodes_filter::ResourceMetadata;
use nodes_filter::TypeResolution;
use nodes_filter::TypeTarget;

fn samples() -> Vec<ResourceMetadata> {
    vec![
        ResourceMetadata::new("/"),
        ResourceMetadata::new("/content/x").with_primary_type("nt:unstructured"),
        ResourceMetadata::new("/bin/x").with_primary_type("nt:file").with_mime_type("text/html"),
        ResourceMetadata::new("/content/rep:policy").with_primary_type("rep:ACL"),
        ResourceMetadata::new("/content/dam")
            .with_primary_type("sling:Folder")
            .with_folder(true)
            .with_mixin_type("mix:referenceable"),
    ]
}

#[test]
fn test_evaluation_is_deterministic() {
    let filter = compile("and{Name(-'^rep:(repo)?[Pp]olicy$'),or{Folder(),Path(+'^/content(/.*)?$')}}").unwrap();
    for metadata in samples() {
        let first = evaluate(&filter, &metadata);
        for _ in 0..10 {
            assert_eq!(evaluate(&filter, &metadata), first);
        }
    }
}

#[test]
fn test_empty_definition_accepts_everything() {
    for filter in [compile("").unwrap(), compile("   ").unwrap(), compile_optional(None).unwrap()] {
        assert!(filter.is_accept_all());
        assert!(samples().iter().all(|metadata| evaluate(&filter, metadata)));
    }
}

#[test]
fn test_empty_combinators_are_parse_errors() {
    assert!(matches!(compile("and{}"), Err(FilterError::Parse { .. })));
    assert!(matches!(compile("or{}"), Err(FilterError::Parse { .. })));
}

#[test]
fn test_sign_semantics() {
    let foo = ResourceMetadata::new("/a/b").with_name("foo");
    assert!(evaluate(&compile("Name(+'^foo$')").unwrap(), &foo));
    assert!(!evaluate(&compile("Name(-'^foo$')").unwrap(), &foo));
}

#[test]
fn test_nested_combinator() {
    let filter = compile("or{Folder(),PrimaryType(+'^dam:Asset(Content)?$')}").unwrap();

    let folder = ResourceMetadata::new("/a").with_folder(true).with_primary_type("nt:unstructured");
    let asset = ResourceMetadata::new("/b").with_primary_type("dam:Asset");
    let file = ResourceMetadata::new("/c").with_primary_type("nt:file");

    assert!(evaluate(&filter, &folder));
    assert!(evaluate(&filter, &asset));
    assert!(!evaluate(&filter, &file));
}

#[test]
fn test_security_boundary() {
    let filter = compile("and{Name(-'^rep:(repo)?[Pp]olicy$'),Path(-'^/bin(/.*)?$,^/system(/.*)?$')}").unwrap();

    assert!(!evaluate(&filter, &ResourceMetadata::new("/content/rep:policy").with_name("rep:policy")));
    assert!(!evaluate(&filter, &ResourceMetadata::new("/bin/x").with_name("content")));
    assert!(evaluate(&filter, &ResourceMetadata::new("/content/x").with_name("content")));
    assert!(!evaluate(&filter, &ResourceMetadata::new("/system")));
    assert!(evaluate(&filter, &ResourceMetadata::new("/binary")));
}

#[test]
fn test_unknown_predicate() {
    let err = compile("Bogus(+'x')").unwrap_err();
    assert!(err.is_parse_error());
    assert_eq!(err.position(), Some(0));
}

#[test]
fn test_invalid_regex_names_predicate_and_pattern() {
    let err = compile("and{Folder(),ResourceType(+'^app/(page$')}").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("ResourceType"));
    assert!(message.contains("^app/(page$"));
}

#[test]
fn test_mime_and_resource_type() {
    let page_filter =
        compile("or{ResourceType(+'^[a-z]+:.*[Pp]age$'),and{PrimaryType(+'^nt:file$'),MimeType(+'^text/html$')}}")
            .unwrap();

    let page = ResourceMetadata::new("/content/home").with_resource_type("cq:Page");
    let html = ResourceMetadata::new("/content/index.html")
        .with_primary_type("nt:file")
        .with_mime_type("text/html");
    let css = ResourceMetadata::new("/content/site.css")
        .with_primary_type("nt:file")
        .with_mime_type("text/css");

    assert!(evaluate(&page_filter, &page));
    assert!(evaluate(&page_filter, &html));
    assert!(!evaluate(&page_filter, &css));
}

#[test]
fn test_type_literals_follow_configured_rules() {
    let referenceable = ResourceMetadata::new("/a").with_mixin_type("mix:referenceable");
    let typed = ResourceMetadata::new("/b").with_primary_type("mix:referenceable");

    // Default rules resolve `mix:` to a mixin type check.
    let filter = compile("Type(mix:referenceable)").unwrap();
    assert!(evaluate(&filter, &referenceable));
    assert!(!evaluate(&filter, &typed));

    // Without rules the literal checks primary and mixin types alike.
    let options = ParseOptions {
        type_resolution: TypeResolution::generic_only(),
        ..ParseOptions::default()
    };
    let filter = compile_with("Type(mix:referenceable)", &options).unwrap();
    assert!(evaluate(&filter, &referenceable));
    assert!(evaluate(&filter, &typed));

    let options = ParseOptions {
        type_resolution: TypeResolution::generic_only().with_rule("mix:", TypeTarget::PrimaryType),
        ..ParseOptions::default()
    };
    let filter = compile_with("Type(-mix:referenceable)", &options).unwrap();
    assert!(evaluate(&filter, &referenceable));
    assert!(!evaluate(&filter, &typed));
}

#[test]
fn test_case_sensitivity_is_uniform() {
    let metadata = ResourceMetadata::new("/Content/Page")
        .with_primary_type("NT:FILE")
        .with_mixin_type("MIX:TITLE");
    let source = "and{Path(+'^/content/'),PrimaryType(+'^nt:file$'),MixinType(+'^mix:title$')}";

    assert!(!evaluate(&compile(source).unwrap(), &metadata));

    let options = ParseOptions {
        pattern: PatternOptions {
            case_insensitive: true,
            ..PatternOptions::default()
        },
        ..ParseOptions::default()
    };
    assert!(evaluate(&compile_with(source, &options).unwrap(), &metadata));
}

#[test]
fn test_escaped_quote_is_a_literal_quote() {
    let filter = compile(r"Name(+'^it\'s$')").unwrap();

    assert!(evaluate(&filter, &ResourceMetadata::new("/content/it's")));
    assert!(!evaluate(&filter, &ResourceMetadata::new("/content/its")));
    assert_eq!(filter.to_string(), r"Name(+'^it\'s$')");
}

#[test]
fn test_brackets_inside_classes_do_not_split_patterns() {
    let filter = compile("Name(+'^[],]$')").unwrap();

    assert!(evaluate(&filter, &ResourceMetadata::new("/a/,")));
    assert!(evaluate(&filter, &ResourceMetadata::new("/a/]")));
    assert!(!evaluate(&filter, &ResourceMetadata::new("/a/b")));
}

#[test]
fn test_quoted_type_literal_names_the_unescaped_type() {
    let filter = compile(r"Type('it\'s', 'a\,b')").unwrap();

    assert!(evaluate(&filter, &ResourceMetadata::new("/x").with_primary_type("it's")));
    assert!(evaluate(&filter, &ResourceMetadata::new("/y").with_mixin_type("a,b")));
    assert!(!evaluate(&filter, &ResourceMetadata::new("/z").with_primary_type(r"it\'s")));

    let reparsed = compile(&filter.to_string()).unwrap();
    assert_eq!(reparsed.root(), filter.root());
}

#[test]
fn test_canonical_rendering_parses_back() {
    let sources = [
        "or{ResourceType(+'^[a-z]+:.*([Ss]ite|[Pp]age)$'),and{PrimaryType(+'^nt:file$'),MimeType(+'^text/html$')}}",
        "and{Name(-'^rep:(repo)?[Pp]olicy$'),Path(-'^/bin(/.*)?$,^/services(/.*)?$,^/servlet(/.*)?$,^/(jcr:)?system(/.*)?$')}",
        "or{Type(node:orderable),PrimaryType(+'^.*([Oo]rdered|[Pp]age).*$,^sling:(Mapping)$')}",
        "Path(+'^/a{1,3}$')",
        r"Name(+'^it\'s$')",
        "Name(+'^[],]$,^[^],]+$')",
        r"Type('a\'b,c', mix:x)",
        "",
    ];
    for source in sources {
        let filter = compile(source).unwrap();
        let rendered = filter.to_string();
        let reparsed = compile(&rendered).unwrap();
        assert_eq!(reparsed.root(), filter.root(), "{source} rendered as {rendered}");
    }
}
