// tests/parser_tests.rs

use pql::ast::{Position, RawArgument, RawCall, RawValue, Token, TokenKind};
use pql::lexer::lex;
use pql::parser::{parse_call, Parser, MAX_DEPTH};
use pql::SyntaxError;

fn parse(input: &str) -> RawCall {
    let tokens = lex(input).unwrap();
    parse_call(&tokens).unwrap()
}

fn parse_err(input: &str) -> SyntaxError {
    let tokens = lex(input).unwrap();
    parse_call(&tokens).unwrap_err()
}

fn values(call: &RawCall) -> Vec<&RawValue> {
    call.arguments.iter().map(|a| &a.value).collect()
}

// ============================================================================
// Calls and Arguments
// ============================================================================

#[test]
fn test_simple_call() {
    let call = parse("get(10)");
    assert_eq!(call.operation, "get");
    assert_eq!(call.arguments.len(), 1);
    assert_eq!(call.arguments[0].name, None);
    assert_eq!(call.arguments[0].value, RawValue::Number(10));
}

#[test]
fn test_empty_call() {
    let call = parse("all()");
    assert_eq!(call.operation, "all");
    assert!(call.arguments.is_empty());
}

#[test]
fn test_bare_identifier_value() {
    let call = parse("get(10, general)");
    assert_eq!(
        values(&call),
        vec![&RawValue::Number(10), &RawValue::Identifier("general".into())]
    );
}

#[test]
fn test_quoted_value() {
    let call = parse(r#"get(10, frame="brand names")"#);
    assert_eq!(call.arguments[1].value, RawValue::Quoted("brand names".into()));
}

#[test]
fn test_keyword_arguments() {
    let call = parse("get(id=10, frame=brands)");
    assert_eq!(call.arguments[0].name.as_deref(), Some("id"));
    assert_eq!(call.arguments[0].value, RawValue::Number(10));
    assert_eq!(call.arguments[1].name.as_deref(), Some("frame"));
    assert_eq!(call.arguments[1].value, RawValue::Identifier("brands".into()));
}

#[test]
fn test_mixed_arguments_keep_source_order() {
    let call = parse("op(a=1, 2, b=x, y)");
    let names: Vec<_> = call.arguments.iter().map(|a| a.name.as_deref()).collect();
    assert_eq!(names, vec![Some("a"), None, Some("b"), None]);
}

#[test]
fn test_keyword_value_may_be_a_call() {
    let call = parse("top-n(source=get(10), n=5)");
    match &call.arguments[0] {
        RawArgument {
            name: Some(name),
            value: RawValue::Call(inner),
            ..
        } => {
            assert_eq!(name, "source");
            assert_eq!(inner.operation, "get");
        }
        other => panic!("Expected keyword call argument, got {:?}", other),
    }
}

#[test]
fn test_argument_positions() {
    let call = parse("get(10, frame=x)");
    assert_eq!(call.position.offset, 0);
    assert_eq!(call.arguments[0].position.offset, 4);
    assert_eq!(call.arguments[1].position.offset, 8);
}

// ============================================================================
// Nesting and Lists
// ============================================================================

#[test]
fn test_nested_calls() {
    let call = parse("union(get(10,general), get(11,brand), get(12))");
    assert_eq!(call.arguments.len(), 3);
    let inner: Vec<_> = call
        .arguments
        .iter()
        .map(|a| match &a.value {
            RawValue::Call(c) => c.arguments.len(),
            other => panic!("Expected call, got {:?}", other),
        })
        .collect();
    assert_eq!(inner, vec![2, 2, 1]);
}

#[test]
fn test_deep_nesting() {
    let depth = 64;
    let input = format!("{}get(1){}", "union(".repeat(depth), ")".repeat(depth));
    let mut call = parse(&input);
    for _ in 0..depth {
        assert_eq!(call.operation, "union");
        call = match call.arguments.remove(0).value {
            RawValue::Call(c) => c,
            other => panic!("Expected call, got {:?}", other),
        };
    }
    assert_eq!(call.operation, "get");
}

#[test]
fn test_nesting_at_limit() {
    let depth = MAX_DEPTH - 1;
    let input = format!("{}get(1){}", "union(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse(&input).operation, "union");
}

#[test]
fn test_nesting_past_limit() {
    let depth = MAX_DEPTH + 1;
    let input = format!("{}get(1){}", "union(".repeat(depth), ")".repeat(depth));
    let err = parse_err(&input);
    assert_eq!(err.expected, format!("nesting depth <= {}", MAX_DEPTH));
    assert_eq!(err.found, "'('");
    assert_eq!(err.position.offset, MAX_DEPTH * "union(".len() + "union".len());

    // Unclosed input is rejected the same way before running out of tokens
    let err = parse_err(&"union(".repeat(10_000));
    assert_eq!(err.expected, format!("nesting depth <= {}", MAX_DEPTH));
}

#[test]
fn test_custom_nesting_limit_counts_lists() {
    let tokens = lex("op([[1]])").unwrap();
    let err = Parser::new(&tokens).with_max_depth(2).parse().unwrap_err();
    assert_eq!(err.expected, "nesting depth <= 2");
    assert_eq!(err.found, "'['");

    assert!(Parser::new(&tokens).with_max_depth(3).parse().is_ok());
}

#[test]
fn test_number_list() {
    let call = parse("top-n(get(10, general), [1,2,3], 50)");
    assert_eq!(
        call.arguments[1].value,
        RawValue::List(vec![RawValue::Number(1), RawValue::Number(2), RawValue::Number(3)])
    );
}

#[test]
fn test_list_of_calls() {
    let call = parse("plugin(get(99), [get(10), get(11)])");
    match &call.arguments[1].value {
        RawValue::List(items) => {
            assert_eq!(items.len(), 2);
            assert!(items.iter().all(|v| matches!(v, RawValue::Call(_))));
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_empty_and_nested_lists() {
    let call = parse("op([], [[1], []])");
    assert_eq!(call.arguments[0].value, RawValue::List(vec![]));
    assert_eq!(
        call.arguments[1].value,
        RawValue::List(vec![
            RawValue::List(vec![RawValue::Number(1)]),
            RawValue::List(vec![]),
        ])
    );
}

// ============================================================================
// Syntax Errors
// ============================================================================

#[test]
fn test_missing_close_paren() {
    let err = parse_err("get(10");
    assert_eq!(err.expected, "',' or ')'");
    assert_eq!(err.found, "end of input");
}

#[test]
fn test_missing_open_paren() {
    let err = parse_err("get 10");
    assert_eq!(err.expected, "'('");
    assert_eq!(err.found, "number '10'");
    assert_eq!(err.position.offset, 4);
}

#[test]
fn test_empty_argument_between_commas() {
    let err = parse_err("get(10,,general)");
    assert_eq!(err.expected, "value");
    assert_eq!(err.found, "','");
    assert_eq!(err.position.offset, 7);
}

#[test]
fn test_trailing_comma() {
    let err = parse_err("get(10,)");
    assert_eq!(err.expected, "value");
    assert_eq!(err.found, "')'");
}

#[test]
fn test_trailing_tokens() {
    let err = parse_err("get(10) get(11)");
    assert_eq!(err.expected, "end of input");
    assert_eq!(err.found, "identifier 'get'");
}

#[test]
fn test_top_level_must_be_call() {
    assert_eq!(parse_err("10").expected, "operation name");
    assert_eq!(parse_err("").expected, "operation name");
    assert_eq!(parse_err("[get(1)]").expected, "operation name");
}

#[test]
fn test_unclosed_list() {
    let err = parse_err("top-n([1, 2, 5)");
    assert_eq!(err.expected, "',' or ']'");
    assert_eq!(err.found, "')'");
}

#[test]
fn test_keyword_inside_list_rejected() {
    let err = parse_err("op([a=1])");
    assert_eq!(err.expected, "',' or ']'");
    assert_eq!(err.found, "'='");
}

#[test]
fn test_dangling_keyword() {
    let err = parse_err("get(id=)");
    assert_eq!(err.expected, "value");
}

#[test]
fn test_error_message() {
    let err = parse_err("get(10");
    assert_eq!(
        err.to_string(),
        "expected ',' or ')', found end of input at line 1, column 7"
    );
}

#[test]
fn test_parser_without_eof_token() {
    // Token slices that stop short of Eof behave as if it were there
    let mut tokens = lex("all()").unwrap();
    tokens.pop();
    let call = Parser::new(&tokens).parse().unwrap();
    assert_eq!(call.operation, "all");
}

#[test]
fn test_hand_built_number_tokens_are_checked() {
    let at = Position::start();
    let call = |number: &str| {
        vec![
            Token::new(TokenKind::Identifier, "get", at),
            Token::new(TokenKind::LParen, "(", at),
            Token::new(TokenKind::Number, number, at),
            Token::new(TokenKind::RParen, ")", at),
            Token::new(TokenKind::Eof, "", at),
        ]
    };

    let tokens = call("42");
    assert_eq!(values(&parse_call(&tokens).unwrap()), vec![&RawValue::Number(42)]);

    for bad in ["18446744073709551616", "12ab", ""] {
        let tokens = call(bad);
        let err = parse_call(&tokens).unwrap_err();
        assert_eq!(err.expected, "unsigned 64-bit number", "for {:?}", bad);
        assert_eq!(err.found, format!("number '{}'", bad));
    }
}
