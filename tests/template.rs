use trie_router::rules::RuleParam;
use trie_router::template::{lex, parse, Ast, AstNodeKind, LexingError, NodeId, TokenKind};

fn ast(template: &str) -> Ast {
    parse(lex(template).unwrap()).unwrap()
}

fn kinds(ast: &Ast, id: NodeId) -> Vec<AstNodeKind> {
    ast.node(id)
        .children()
        .iter()
        .map(|&c| ast.node(c).kind())
        .collect()
}

#[test]
fn variable_name_length_limit() {
    let name = "a".repeat(32);
    let tokens = lex(&format!("/:{}", name)).unwrap();
    assert!(tokens.tokens()[1].is(TokenKind::Variable, Some(&*name)));

    let name = "a".repeat(33);
    match lex(&format!("/:{}", name)) {
        Err(LexingError::VariableNameTooLong { name: n, max }) => {
            assert_eq!(n.len(), 33);
            assert_eq!(max, 32);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn literal_template_round_trip() {
    for template in ["/users/all", "/api/1.0/status", "/a-b/c_d/e.json", "/"] {
        let ast = ast(template);
        let path = ast.path().unwrap();
        assert!(ast.host().is_none());

        let mut rebuilt = String::new();
        for &id in ast.node(path).children() {
            let node = ast.node(id);
            assert!(matches!(
                node.kind(),
                AstNodeKind::Text | AstNodeKind::SegmentDelimiter
            ));
            rebuilt.push_str(node.text().unwrap());
        }
        assert_eq!(rebuilt.trim_start_matches('/'), template.trim_start_matches('/'));
    }
}

#[test]
fn optional_parts_nest() {
    let ast = ast("/posts[/:page(int)[/:size]]");
    let path = ast.path().unwrap();
    assert_eq!(
        kinds(&ast, path),
        [
            AstNodeKind::SegmentDelimiter,
            AstNodeKind::Text,
            AstNodeKind::OptionalRoutePart
        ]
    );

    let outer = ast.child_of_kind(path, AstNodeKind::OptionalRoutePart).unwrap();
    assert_eq!(
        kinds(&ast, outer),
        [
            AstNodeKind::SegmentDelimiter,
            AstNodeKind::Variable,
            AstNodeKind::OptionalRoutePart
        ]
    );
    let inner = ast.child_of_kind(outer, AstNodeKind::OptionalRoutePart).unwrap();
    assert_eq!(ast.node(inner).parent(), Some(outer));
    assert_eq!(ast.node(outer).parent(), Some(path));
}

#[test]
fn variable_constraints_and_parameters() {
    let ast = ast("/:id(int, between(1, 2.5), in('a', \"b c\"))");
    let path = ast.path().unwrap();
    let variable = ast.child_of_kind(path, AstNodeKind::Variable).unwrap();
    assert_eq!(ast.node(variable).text(), Some("id"));

    let constraints: Vec<_> = ast
        .node(variable)
        .children()
        .iter()
        .map(|&c| ast.node(c))
        .collect();
    assert_eq!(constraints.len(), 3);
    assert_eq!(constraints[0].text(), Some("int"));
    assert!(constraints[0].children().is_empty());

    let params = |i: usize| {
        let id = constraints[i].children()[0];
        assert_eq!(ast.node(id).kind(), AstNodeKind::VariableConstraintParameters);
        ast.node(id).parameters().unwrap().to_vec()
    };
    assert_eq!(params(1), vec![RuleParam::Int(1), RuleParam::Float(2.5)]);
    assert_eq!(
        params(2),
        vec![RuleParam::Str("a".into()), RuleParam::Str("b c".into())]
    );
}

#[test]
fn host_is_split_from_path() {
    let ast = ast("[api.]example.com/users");
    let host = ast.host().unwrap();
    assert_eq!(
        kinds(&ast, host),
        [
            AstNodeKind::OptionalRoutePart,
            AstNodeKind::Text,
            AstNodeKind::SegmentDelimiter,
            AstNodeKind::Text
        ]
    );
    let path = ast.path().unwrap();
    assert_eq!(
        kinds(&ast, path),
        [AstNodeKind::SegmentDelimiter, AstNodeKind::Text]
    );
}

#[test]
fn host_only_template_has_empty_path() {
    let ast = ast("example.com");
    assert!(ast.host().is_some());
    let path = ast.path().unwrap();
    assert!(ast.node(path).children().is_empty());
}

#[test]
fn periods_and_stray_brackets_are_text_in_paths() {
    let ast = ast("/a.b/c]");
    let path = ast.path().unwrap();
    let texts: Vec<&str> = ast
        .descendants(path)
        .into_iter()
        .filter(|&id| ast.node(id).kind() == AstNodeKind::Text)
        .filter_map(|id| ast.node(id).text())
        .collect();
    assert_eq!(texts, ["a", ".", "b", "c", "]"]);
}

#[test]
fn grammar_violations() {
    let cases = [
        "/users[/:id",
        "/users[:id]",
        "/:a:b",
        "[api]example.com/",
        "example.com]/",
        "/:id(int",
        "/:id(between(1, 2)",
        "/:id(,)",
    ];
    for template in cases {
        let tokens = lex(template).unwrap();
        assert!(parse(tokens).is_err(), "{} should not parse", template);
    }
}

#[test]
fn unexpected_token_names_what_was_found() {
    let err = parse(lex("/:a:b").unwrap()).unwrap_err();
    assert!(err.found().is(TokenKind::Variable, Some("b")));
    assert!(err.to_string().contains("consecutive variables"));
}
