//! Integration tests for character reference resolution.

use wombat_html::{HTMLTokenizer, Token, TokenizerOptions};

fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::from_str(input, TokenizerOptions::default()).collect()
}

fn text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Characters { data, .. } | Token::SpaceCharacters { data, .. } => {
                Some(data.as_str())
            }
            _ => None,
        })
        .collect()
}

fn error_codes(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::ParseError { code, .. } => Some(code.to_string()),
            _ => None,
        })
        .collect()
}

fn first_attribute_value(tokens: &[Token]) -> String {
    tokens
        .iter()
        .find_map(|t| match t {
            Token::StartTag { attributes, .. } => {
                attributes.first().map(|a| a.value.clone())
            }
            _ => None,
        })
        .expect("expected a start tag with an attribute")
}

#[test]
fn test_named_entity() {
    let tokens = tokenize("&amp;");
    assert!(error_codes(&tokens).is_empty());
    assert_eq!(text(&tokens), "&");
}

#[test]
fn test_named_entity_longest_match_wins() {
    // `&notin;` must resolve as one entity, not `&not` plus "in;".
    assert_eq!(text(&tokenize("&notin;")), "\u{2209}");
    assert_eq!(text(&tokenize("&not;")), "\u{00AC}");
}

#[test]
fn test_named_entity_without_semicolon() {
    let tokens = tokenize("&notin");
    assert_eq!(error_codes(&tokens), vec!["named-entity-without-semicolon"]);
    // The longest match is the legacy `not`; the rest is ordinary text.
    assert_eq!(text(&tokens), "\u{00AC}in");
}

#[test]
fn test_named_entity_with_trailing_text() {
    let tokens = tokenize("&not;x");
    assert!(error_codes(&tokens).is_empty());
    assert_eq!(text(&tokens), "\u{00AC}x");
}

#[test]
fn test_unknown_named_entity() {
    let tokens = tokenize("&xz;");
    assert_eq!(error_codes(&tokens), vec!["expected-named-entity"]);
    assert_eq!(text(&tokens), "&xz;");
}

#[test]
fn test_ampersand_with_no_entity_start() {
    let tokens = tokenize("&~");
    assert_eq!(error_codes(&tokens), vec!["expected-named-entity"]);
    assert_eq!(text(&tokens), "&~");
}

#[test]
fn test_bare_ampersand_before_whitespace_and_eof() {
    assert!(error_codes(&tokenize("& x")).is_empty());
    assert_eq!(text(&tokenize("& x")), "& x");
    assert_eq!(text(&tokenize("a&")), "a&");
    assert_eq!(text(&tokenize("&&amp;")), "&&");
}

#[test]
fn test_numeric_decimal() {
    let tokens = tokenize("&#65;");
    assert!(error_codes(&tokens).is_empty());
    assert_eq!(text(&tokens), "A");
}

#[test]
fn test_numeric_hex_both_cases() {
    assert_eq!(text(&tokenize("&#x41;")), "A");
    assert_eq!(text(&tokenize("&#X6a;")), "j");
}

#[test]
fn test_numeric_without_semicolon() {
    let tokens = tokenize("&#65 ");
    assert_eq!(error_codes(&tokens), vec!["numeric-entity-without-semicolon"]);
    assert_eq!(text(&tokens), "A ");
}

#[test]
fn test_numeric_with_no_digits() {
    let tokens = tokenize("&#xg");
    assert_eq!(error_codes(&tokens), vec!["expected-numeric-entity"]);
    assert_eq!(text(&tokens), "&#xg");
}

#[test]
fn test_numeric_windows_1252_replacement() {
    // 0x80 is not EURO SIGN in Unicode, but the reference decodes through
    // the Windows-1252 repertoire.
    let tokens = tokenize("&#128;");
    assert_eq!(
        error_codes(&tokens),
        vec!["illegal-codepoint-for-numeric-entity"]
    );
    assert_eq!(text(&tokens), "\u{20AC}");
}

#[test]
fn test_numeric_surrogate_and_out_of_range() {
    let tokens = tokenize("&#xD800;");
    assert_eq!(
        error_codes(&tokens),
        vec!["illegal-codepoint-for-numeric-entity"]
    );
    assert_eq!(text(&tokens), "\u{FFFD}");

    let tokens = tokenize("&#1114112;");
    assert_eq!(
        error_codes(&tokens),
        vec!["illegal-codepoint-for-numeric-entity"]
    );
    assert_eq!(text(&tokens), "\u{FFFD}");
}

#[test]
fn test_numeric_disallowed_control_still_resolves() {
    let tokens = tokenize("&#2;");
    assert_eq!(
        error_codes(&tokens),
        vec!["illegal-codepoint-for-numeric-entity"]
    );
    assert_eq!(text(&tokens), "\u{0002}");
}

#[test]
fn test_whitespace_entity_is_space_characters() {
    let tokens = tokenize("&#x20;");
    assert!(matches!(&tokens[0], Token::SpaceCharacters { data, .. } if data == " "));
}

#[test]
fn test_entity_in_double_quoted_attribute() {
    let tokens = tokenize("<a href=\"a&amp;b\">");
    assert!(error_codes(&tokens).is_empty());
    assert_eq!(first_attribute_value(&tokens), "a&b");
}

#[test]
fn test_entity_with_allowed_quote_stays_literal() {
    // The attribute's own quote right after `&` means the `&` was literal.
    let tokens = tokenize("<a href=\"&\">");
    assert!(error_codes(&tokens).is_empty());
    assert_eq!(first_attribute_value(&tokens), "&");
}

#[test]
fn test_legacy_entity_in_attribute_before_equals_stays_literal() {
    // Historical compatibility: a semicolon-less match followed by a letter,
    // digit, or `=` must not resolve inside an attribute.
    let tokens = tokenize("<a href=\"x?y&lt=1\">");
    assert_eq!(error_codes(&tokens), vec!["named-entity-without-semicolon"]);
    assert_eq!(first_attribute_value(&tokens), "x?y&lt=1");

    let tokens = tokenize("<a href=\"&notin=x\">");
    assert_eq!(error_codes(&tokens), vec!["named-entity-without-semicolon"]);
    assert_eq!(first_attribute_value(&tokens), "&notin=x");
}

#[test]
fn test_semicolon_entity_in_attribute_always_resolves() {
    let tokens = tokenize("<a href=\"x?y&lt;=1\">");
    assert!(error_codes(&tokens).is_empty());
    assert_eq!(first_attribute_value(&tokens), "x?y<=1");
}

#[test]
fn test_legacy_entity_in_attribute_at_value_end_resolves() {
    let tokens = tokenize("<a href=\"&amp\">");
    assert_eq!(error_codes(&tokens), vec!["named-entity-without-semicolon"]);
    assert_eq!(first_attribute_value(&tokens), "&");
}

#[test]
fn test_entity_in_unquoted_attribute() {
    let tokens = tokenize("<a href=a&amp;b>");
    assert!(error_codes(&tokens).is_empty());
    assert_eq!(first_attribute_value(&tokens), "a&b");
}

#[test]
fn test_unquoted_attribute_entity_allows_right_bracket() {
    // `>` is the allowed character in unquoted values: `&` right before it
    // stays literal and the tag still closes.
    let tokens = tokenize("<a href=a&>");
    assert!(error_codes(&tokens).is_empty());
    assert_eq!(first_attribute_value(&tokens), "a&");
}

#[test]
fn test_multi_character_replacement() {
    assert_eq!(text(&tokenize("&fjlig;")), "fj");
}

#[test]
fn test_entity_at_eof() {
    let tokens = tokenize("&amp");
    assert_eq!(error_codes(&tokens), vec!["named-entity-without-semicolon"]);
    assert_eq!(text(&tokens), "&");
}
