// tests/lexer_tests.rs

use pql::ast::{Position, TokenKind};
use pql::lexer::{lex, Lexer};

fn kinds(input: &str) -> Vec<TokenKind> {
    lex(input).unwrap().into_iter().map(|t| t.kind).collect()
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        (",", TokenKind::Comma),
        ("=", TokenKind::Equals),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, expected, "Failed for input: {}", input);
        assert_eq!(token.text, input);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn test_empty_input_is_just_eof() {
    let tokens = lex("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);

    assert_eq!(kinds("   \n\t "), vec![TokenKind::Eof]);
}

// ============================================================================
// Identifiers and Numbers
// ============================================================================

#[test]
fn test_identifiers() {
    for input in ["get", "top-n", "profile_id", "_private", "Frame2", "a-b-c"] {
        let tokens = lex(input).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier, "Failed for input: {}", input);
        assert_eq!(tokens[0].text, input);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }
}

#[test]
fn test_identifiers_are_case_sensitive() {
    let tokens = lex("Get get").unwrap();
    assert_eq!(tokens[0].text, "Get");
    assert_eq!(tokens[1].text, "get");
}

#[test]
fn test_numbers() {
    let tokens = lex("0 10 18446744073709551615").unwrap();
    let numbers: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Number)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(numbers, vec!["0", "10", "18446744073709551615"]);
}

#[test]
fn test_number_then_identifier_split() {
    assert_eq!(
        kinds("10abc"),
        vec![TokenKind::Number, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn test_number_out_of_range() {
    let err = lex("get(18446744073709551616)").unwrap_err();
    assert_eq!(err.position, Position::new(4, 1, 5));
    assert!(err.reason.contains("out of range"));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_quoted_strings() {
    let tokens = lex(r#""brand names" 'it\'s' "tab\there""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "brand names");
    assert_eq!(tokens[1].text, "it's");
    assert_eq!(tokens[2].text, "tab\there");
}

#[test]
fn test_unterminated_string() {
    let err = lex(r#"get(1, "general)"#).unwrap_err();
    assert_eq!(err.position.offset, 7);
    assert_eq!(err.reason, "unterminated string");
}

#[test]
fn test_invalid_escape() {
    let err = lex(r#""a\qb""#).unwrap_err();
    assert_eq!(err.position.offset, 2);
    assert!(err.reason.contains("invalid escape"));
}

// ============================================================================
// Whole Queries
// ============================================================================

#[test]
fn test_full_query() {
    use TokenKind::*;
    assert_eq!(
        kinds("top-n(get(10, frame=general), [1,2], 50)"),
        vec![
            Identifier, LParen, Identifier, LParen, Number, Comma, Identifier, Equals,
            Identifier, RParen, Comma, LBracket, Number, Comma, Number, RBracket, Comma,
            Number, RParen, Eof,
        ]
    );
}

#[test]
fn test_positions() {
    let tokens = lex("get( 10 )").unwrap();
    let offsets: Vec<_> = tokens.iter().map(|t| t.position.offset).collect();
    assert_eq!(offsets, vec![0, 3, 5, 8, 9]);
    assert_eq!(tokens[2].position.column, 6);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_illegal_characters() {
    for (input, offset) in [("get(10)!", 7), ("-get()", 0), ("get(1.5)", 5), ("a;b", 1)] {
        let err = lex(input).unwrap_err();
        assert_eq!(err.position.offset, offset, "Failed for input: {}", input);
        assert!(err.reason.starts_with("unexpected character"));
    }
}

#[test]
fn test_lexing_is_stateless() {
    assert_eq!(lex("get(10)").unwrap(), lex("get(10)").unwrap());
}
