//! Integration tests for the HTML tokenizer.

use wombat_html::{Attribute, HTMLTokenizer, Token, TokenizerOptions, TokenizerState};

/// Helper to tokenize a string with default options.
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::from_str(input, TokenizerOptions::default()).collect()
}

/// Helper: the non-error tokens.
fn content(tokens: &[Token]) -> Vec<&Token> {
    tokens.iter().filter(|t| !t.is_parse_error()).collect()
}

/// Helper: the parse-error identifiers, in order.
fn error_codes(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::ParseError { code, .. } => Some(code.to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_start_end_tag_with_text() {
    let tokens = tokenize("<p>Hi</p>");
    assert_eq!(tokens.len(), 3);
    assert!(matches!(&tokens[0], Token::StartTag { name, attributes, self_closing, .. }
        if name == "p" && attributes.is_empty() && !self_closing));
    assert!(matches!(&tokens[1], Token::Characters { data, .. } if data == "Hi"));
    assert!(matches!(&tokens[2], Token::EndTag { name, .. } if name == "p"));
}

#[test]
fn test_plain_text_is_one_chunk() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Characters { data, .. } if data == "Hello"));
}

#[test]
fn test_leading_whitespace_is_space_characters() {
    let tokens = tokenize("  \n\tx y");
    assert!(matches!(&tokens[0], Token::SpaceCharacters { data, .. } if data == "  \n\t"));
    // Interior whitespace rides along inside a plain character run; only
    // runs that start with whitespace become SpaceCharacters tokens.
    assert!(matches!(&tokens[1], Token::Characters { data, .. } if data == "x y"));
    assert_eq!(tokens.len(), 2);
}

#[test]
fn test_characters_are_chunked_not_fused() {
    // Adjacent character tokens are not fused across state iterations: the
    // entity contributes its own token.
    let tokens = tokenize("a &amp; b");
    assert!(matches!(&tokens[0], Token::Characters { data, .. } if data == "a "));
    assert!(matches!(&tokens[1], Token::Characters { data, .. } if data == "&"));
    assert!(matches!(&tokens[2], Token::SpaceCharacters { data, .. } if data == " "));
    assert!(matches!(&tokens[3], Token::Characters { data, .. } if data == "b"));
    assert!(error_codes(&tokens).is_empty());
}

#[test]
fn test_tag_names_fold_to_lowercase_by_default() {
    let tokens = tokenize("<DIV></DIV>");
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "div"));
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "div"));
}

#[test]
fn test_tag_name_folding_can_be_disabled() {
    let opts = TokenizerOptions {
        lowercase_element_name: false,
        lowercase_attr_name: false,
        ..TokenizerOptions::default()
    };
    let tokens: Vec<Token> = HTMLTokenizer::from_str("<DIV ID=x>", opts).collect();
    assert!(matches!(&tokens[0], Token::StartTag { name, attributes, .. }
        if name == "DIV" && attributes[0].name == "ID"));
}

#[test]
fn test_attributes_double_single_and_unquoted() {
    let tokens = tokenize(r#"<a one="1" two='2' three=3>"#);
    match &tokens[0] {
        Token::StartTag { name, attributes, .. } => {
            assert_eq!(name, "a");
            assert_eq!(
                attributes,
                &vec![
                    Attribute::new("one".into(), "1".into()),
                    Attribute::new("two".into(), "2".into()),
                    Attribute::new("three".into(), "3".into()),
                ]
            );
        }
        other => panic!("Expected StartTag, got {other}"),
    }
    assert!(error_codes(&tokens).is_empty());
}

#[test]
fn test_attribute_without_value() {
    let tokens = tokenize("<input disabled>");
    assert!(matches!(&tokens[0], Token::StartTag { attributes, .. }
        if attributes.len() == 1 && attributes[0].name == "disabled" && attributes[0].value.is_empty()));
}

#[test]
fn test_duplicate_attribute_reported_but_kept() {
    let tokens = tokenize("<a x=1 x=2>");
    assert_eq!(error_codes(&tokens), vec!["duplicate-attribute"]);
    // Both occurrences stay on the token, in source order; downstream
    // consumers keep the first.
    match content(&tokens)[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 2);
            assert_eq!(attributes[0].value, "1");
            assert_eq!(attributes[1].value, "2");
        }
        other => panic!("Expected StartTag, got {other}"),
    }
}

#[test]
fn test_duplicate_attribute_respects_name_folding() {
    let tokens = tokenize("<a ID=1 id=2>");
    assert_eq!(error_codes(&tokens), vec!["duplicate-attribute"]);
}

#[test]
fn test_unquoted_attribute_value_bad_characters() {
    let tokens = tokenize("<a b=c\"d>");
    assert_eq!(
        error_codes(&tokens),
        vec!["unexpected-character-in-unquoted-attribute-value"]
    );
    assert!(matches!(content(&tokens)[0], Token::StartTag { attributes, .. }
        if attributes[0].value == "c\"d"));
}

#[test]
fn test_equals_before_unquoted_value() {
    let tokens = tokenize("<a b==>");
    assert_eq!(error_codes(&tokens), vec!["equals-in-unquoted-attribute-value"]);
    assert!(matches!(content(&tokens)[0], Token::StartTag { attributes, .. }
        if attributes[0].value == "="));
}

#[test]
fn test_character_after_quoted_attribute_value() {
    let tokens = tokenize("<a b='c'd=e>");
    assert_eq!(
        error_codes(&tokens),
        vec!["unexpected-character-after-attribute-value"]
    );
    assert!(matches!(content(&tokens)[0], Token::StartTag { attributes, .. }
        if attributes.len() == 2 && attributes[1].name == "d"));
}

#[test]
fn test_self_closing_void_element_keeps_flag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::StartTag { name, self_closing, .. }
        if name == "br" && *self_closing));
}

#[test]
fn test_self_closing_non_void_emits_synthetic_end_tag() {
    let tokens = tokenize("<x/>");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::StartTag { name, self_closing, .. }
        if name == "x" && !self_closing));
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "x"));
}

#[test]
fn test_synthetic_end_tag_can_be_disabled() {
    let opts = TokenizerOptions {
        emit_synthetic_end_for_self_closing: false,
        ..TokenizerOptions::default()
    };
    let tokens: Vec<Token> = HTMLTokenizer::from_str("<x/>", opts).collect();
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::StartTag { self_closing, .. } if *self_closing));
}

#[test]
fn test_end_tag_with_attributes_is_reported() {
    let tokens = tokenize("</a b='c'>");
    assert_eq!(error_codes(&tokens), vec!["attributes-in-end-tag"]);
    assert!(matches!(content(&tokens)[0], Token::EndTag { name, attributes, .. }
        if name == "a" && attributes.len() == 1));
}

#[test]
fn test_self_closing_end_tag_is_reported() {
    let tokens = tokenize("</a/>");
    assert_eq!(error_codes(&tokens), vec!["this-closing-flag-on-end-tag"]);
    assert!(matches!(content(&tokens)[0], Token::EndTag { name, .. } if name == "a"));
}

#[test]
fn test_empty_tag_is_text() {
    let tokens = tokenize("<>");
    assert_eq!(
        error_codes(&tokens),
        vec!["expected-tag-name-but-got-right-bracket"]
    );
    assert!(matches!(content(&tokens)[0], Token::Characters { data, .. } if data == "<>"));
}

#[test]
fn test_empty_end_tag_vanishes() {
    let tokens = tokenize("a</>b");
    assert_eq!(
        error_codes(&tokens),
        vec!["expected-closing-tag-but-got-right-bracket"]
    );
    let content = content(&tokens);
    assert!(matches!(content[0], Token::Characters { data, .. } if data == "a"));
    assert!(matches!(content[1], Token::Characters { data, .. } if data == "b"));
}

#[test]
fn test_lone_less_than_is_text() {
    let tokens = tokenize("a < b");
    assert_eq!(error_codes(&tokens), vec!["expected-tag-name"]);
    let content = content(&tokens);
    assert!(matches!(content[0], Token::Characters { data, .. } if data == "a "));
    assert!(matches!(content[1], Token::Characters { data, .. } if data == "<"));
    assert!(matches!(content[2], Token::SpaceCharacters { data, .. } if data == " "));
    assert!(matches!(content[3], Token::Characters { data, .. } if data == "b"));
}

#[test]
fn test_bogus_end_tag_becomes_comment() {
    let tokens = tokenize("</ x>");
    assert_eq!(error_codes(&tokens), vec!["expected-closing-tag-but-got-char"]);
    assert!(matches!(content(&tokens)[0], Token::Comment { data, .. } if data == " x"));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Comment { data, .. } if data == " hello "));
}

#[test]
fn test_empty_comment_variants() {
    let tokens = tokenize("<!---->");
    assert!(matches!(&tokens[0], Token::Comment { data, .. } if data.is_empty()));

    let tokens = tokenize("<!-->");
    assert_eq!(error_codes(&tokens), vec!["incorrect-comment"]);
    assert!(matches!(content(&tokens)[0], Token::Comment { data, .. } if data.is_empty()));
}

#[test]
fn test_comment_bang_close() {
    let tokens = tokenize("<!--a--!>");
    assert_eq!(
        error_codes(&tokens),
        vec!["unexpected-bang-after-double-dash-in-comment"]
    );
    assert!(matches!(content(&tokens)[0], Token::Comment { data, .. } if data == "a"));
}

#[test]
fn test_dashes_inside_comment() {
    let tokens = tokenize("<!--a-- >");
    // "-- " does not close a comment; this one runs to EOF.
    assert_eq!(
        error_codes(&tokens),
        vec!["unexpected-char-in-comment", "eof-in-comment"]
    );
    assert!(matches!(content(&tokens)[0], Token::Comment { data, .. } if data == "a-- >"));
}

#[test]
fn test_unterminated_comment_at_eof() {
    let tokens = tokenize("<!--a");
    assert_eq!(error_codes(&tokens), vec!["eof-in-comment"]);
    assert!(matches!(content(&tokens)[0], Token::Comment { data, .. } if data == "a"));
}

#[test]
fn test_bang_without_dashes_or_doctype() {
    let tokens = tokenize("<!foo>");
    assert_eq!(error_codes(&tokens), vec!["expected-dashes-or-doctype"]);
    assert!(matches!(content(&tokens)[0], Token::Comment { data, .. } if data == "foo"));
}

#[test]
fn test_doctype_html() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Doctype {
        name: Some(name),
        public_id: None,
        system_id: None,
        correct: true,
        ..
    } if name == "html"));
}

#[test]
fn test_doctype_name_is_case_folded() {
    let tokens = tokenize("<!doctype HTML>");
    assert!(matches!(&tokens[0], Token::Doctype { name: Some(name), correct: true, .. }
        if name == "html"));
}

#[test]
fn test_doctype_public_and_system() {
    let tokens =
        tokenize("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">");
    assert!(error_codes(&tokens).is_empty());
    assert!(matches!(&tokens[0], Token::Doctype {
        name: Some(name),
        public_id: Some(public_id),
        system_id: Some(system_id),
        correct: true,
        ..
    } if name == "html"
        && public_id == "-//W3C//DTD HTML 4.01//EN"
        && system_id == "http://www.w3.org/TR/html4/strict.dtd"));
}

#[test]
fn test_doctype_system_only() {
    let tokens = tokenize("<!DOCTYPE html SYSTEM 'about:legacy-compat'>");
    assert!(matches!(&tokens[0], Token::Doctype {
        public_id: None,
        system_id: Some(system_id),
        correct: true,
        ..
    } if system_id == "about:legacy-compat"));
}

#[test]
fn test_doctype_missing_space_clears_correct() {
    let tokens = tokenize("<!DOCTYPEhtml>");
    assert_eq!(error_codes(&tokens), vec!["need-space-after-doctype"]);
    assert!(matches!(content(&tokens)[0], Token::Doctype { name: Some(name), correct: false, .. }
        if name == "html"));
}

#[test]
fn test_bogus_doctype() {
    let tokens = tokenize("<!DOCTYPE html garbage>");
    assert_eq!(
        error_codes(&tokens),
        vec!["expected-space-or-right-bracket-in-doctype"]
    );
    assert!(matches!(content(&tokens)[0], Token::Doctype { name: Some(name), correct: false, .. }
        if name == "html"));
}

#[test]
fn test_doctype_at_eof() {
    let tokens = tokenize("<!DOCTYPE");
    assert_eq!(error_codes(&tokens), vec!["expected-doctype-name-but-got-eof"]);
    assert!(matches!(content(&tokens)[0], Token::Doctype { name: None, correct: false, .. }));
}

#[test]
fn test_nul_in_data_is_literal_with_error() {
    let tokens = tokenize("a\0b");
    assert_eq!(error_codes(&tokens), vec!["invalid-codepoint"]);
    let content = content(&tokens);
    assert!(matches!(content[0], Token::Characters { data, .. } if data == "a"));
    assert!(matches!(content[1], Token::Characters { data, .. } if data == "\0"));
    assert!(matches!(content[2], Token::Characters { data, .. } if data == "b"));
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Characters { data, .. } if data == "a\nb\nc"));
}

#[test]
fn test_eof_in_tag_name_discards_token() {
    let tokens = tokenize("<div");
    assert_eq!(error_codes(&tokens), vec!["eof-in-tag-name"]);
    assert!(content(&tokens).is_empty());
}

#[test]
fn test_eof_in_attribute_value_discards_token() {
    let tokens = tokenize("<a b=\"c");
    assert_eq!(error_codes(&tokens), vec!["eof-in-attribute-value-double-quote"]);
    assert!(content(&tokens).is_empty());
}

#[test]
fn test_rcdata_appropriate_end_tag() {
    let mut tokenizer =
        HTMLTokenizer::from_str("<title>a&amp;<b</title>", TokenizerOptions::default());
    let first = tokenizer.next().expect("start tag");
    assert!(matches!(&first, Token::StartTag { name, .. } if name == "title"));
    // The tree construction stage switches the content model after <title>.
    tokenizer.set_state(TokenizerState::Rcdata);
    let rest: Vec<Token> = tokenizer.collect();
    assert!(matches!(&rest[0], Token::Characters { data, .. } if data == "a"));
    assert!(matches!(&rest[1], Token::Characters { data, .. } if data == "&"));
    assert!(matches!(&rest[2], Token::Characters { data, .. } if data == "<"));
    assert!(matches!(&rest[3], Token::Characters { data, .. } if data == "b"));
    assert!(matches!(rest.last().unwrap(), Token::EndTag { name, .. } if name == "title"));
}

#[test]
fn test_rcdata_inappropriate_end_tag_is_text() {
    let mut tokenizer =
        HTMLTokenizer::from_str("<title>x</span>", TokenizerOptions::default());
    let _ = tokenizer.next();
    tokenizer.set_state(TokenizerState::Rcdata);
    let rest: Vec<Token> = tokenizer.collect();
    // "</span>" is not the appropriate end tag, so it stays character data.
    let text: String = rest
        .iter()
        .filter_map(|t| match t {
            Token::Characters { data, .. } => Some(data.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "x</span>");
}

#[test]
fn test_rawtext_ignores_entities() {
    let mut tokenizer =
        HTMLTokenizer::from_str("<style>a&amp;</style>", TokenizerOptions::default());
    let _ = tokenizer.next();
    tokenizer.set_state(TokenizerState::Rawtext);
    let rest: Vec<Token> = tokenizer.collect();
    assert!(matches!(&rest[0], Token::Characters { data, .. } if data == "a&amp;"));
    assert!(matches!(&rest[1], Token::EndTag { name, .. } if name == "style"));
}

#[test]
fn test_plaintext_never_ends() {
    let mut tokenizer =
        HTMLTokenizer::from_str("<plaintext>a</plaintext>b", TokenizerOptions::default());
    let _ = tokenizer.next();
    tokenizer.set_state(TokenizerState::Plaintext);
    let rest: Vec<Token> = tokenizer.collect();
    assert_eq!(rest.len(), 1);
    assert!(matches!(&rest[0], Token::Characters { data, .. } if data == "a</plaintext>b"));
}

#[test]
fn test_script_data_escaped_comment() {
    let mut tokenizer = HTMLTokenizer::from_str(
        "<script>a<!--b--></script>",
        TokenizerOptions::default(),
    );
    let _ = tokenizer.next();
    tokenizer.set_state(TokenizerState::ScriptData);
    let rest: Vec<Token> = tokenizer.collect();
    let text: String = rest
        .iter()
        .filter_map(|t| match t {
            Token::Characters { data, .. } | Token::SpaceCharacters { data, .. } => {
                Some(data.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(text, "a<!--b-->");
    assert!(matches!(rest.last().unwrap(), Token::EndTag { name, .. } if name == "script"));
    assert!(error_codes(&rest).is_empty());
}

#[test]
fn test_script_data_double_escaped() {
    let mut tokenizer = HTMLTokenizer::from_str(
        "<script>a<!--<script>b</script>c-->d</script>",
        TokenizerOptions::default(),
    );
    let _ = tokenizer.next();
    tokenizer.set_state(TokenizerState::ScriptData);
    let rest: Vec<Token> = tokenizer.collect();
    let text: String = rest
        .iter()
        .filter_map(|t| match t {
            Token::Characters { data, .. } | Token::SpaceCharacters { data, .. } => {
                Some(data.as_str())
            }
            _ => None,
        })
        .collect();
    // The inner </script> only closes the double-escaped section; the outer
    // one ends the element.
    assert_eq!(text, "a<!--<script>b</script>c-->d");
    assert_eq!(
        rest.iter()
            .filter(|t| matches!(t, Token::EndTag { .. }))
            .count(),
        1
    );
}

#[test]
fn test_cdata_requires_foreign_context() {
    // Without the gate open, <![CDATA[ is a bogus comment.
    let tokens = tokenize("<![CDATA[x]]>");
    assert_eq!(error_codes(&tokens), vec!["expected-dashes-or-doctype"]);
    assert!(matches!(content(&tokens)[0], Token::Comment { data, .. } if data == "[CDATA[x]]"));
}

#[test]
fn test_cdata_in_foreign_context() {
    let mut tokenizer = HTMLTokenizer::from_str(
        "<svg><![CDATA[x<y]]></svg>",
        TokenizerOptions::default(),
    );
    let first = tokenizer.next().expect("svg start tag");
    assert!(matches!(&first, Token::StartTag { name, .. } if name == "svg"));
    // The tree construction stage reports a foreign-namespace insertion
    // point, which opens the CDATA gate.
    tokenizer.set_cdata_allowed(true);
    let rest: Vec<Token> = tokenizer.collect();
    assert!(matches!(&rest[0], Token::Characters { data, .. } if data == "x<y"));
    assert!(matches!(&rest[1], Token::EndTag { name, .. } if name == "svg"));
}

#[test]
fn test_cdata_bracket_runs() {
    let mut tokenizer =
        HTMLTokenizer::from_str("<![CDATA[a]]]>", TokenizerOptions::default());
    tokenizer.set_cdata_allowed(true);
    let tokens: Vec<Token> = tokenizer.collect();
    // "]]]>" ends the section after a literal "]".
    assert!(matches!(&tokens[0], Token::Characters { data, .. } if data == "a]"));
}

#[test]
fn test_processing_instruction() {
    let tokens = tokenize("<?php echo 1; ?>");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::ProcessingInstruction { target, data, correct: true, .. }
        if target == "php" && data == "echo 1; "));
}

#[test]
fn test_processing_instruction_without_data() {
    let tokens = tokenize("<?init?>");
    assert!(matches!(&tokens[0], Token::ProcessingInstruction { target, data, correct: true, .. }
        if target == "init" && data.is_empty()));
}

#[test]
fn test_unterminated_processing_instruction() {
    let tokens = tokenize("<?target data");
    assert_eq!(
        error_codes(&tokens),
        vec!["expected-processing-instruction-end"]
    );
    assert!(matches!(content(&tokens)[0], Token::ProcessingInstruction { target, data, correct: false, .. }
        if target == "target" && data == "data"));
}

#[test]
fn test_processing_instructions_can_be_disabled() {
    let opts = TokenizerOptions {
        process_instructions: false,
        ..TokenizerOptions::default()
    };
    let tokens: Vec<Token> = HTMLTokenizer::from_str("<?php?>", opts).collect();
    assert_eq!(error_codes(&tokens), vec!["expected-tag-name"]);
    assert!(matches!(content(&tokens)[0], Token::Comment { data, .. } if data == "?php?"));
}

#[test]
fn test_determinism() {
    let input = "<!DOCTYPE html><p class=a>x &notin; y</p><!--c--><?pi d?>";
    let first = tokenize(input);
    let second = tokenize(input);
    assert_eq!(first, second);
}

#[test]
fn test_iterator_is_finished_after_none() {
    let mut tokenizer = HTMLTokenizer::from_str("x", TokenizerOptions::default());
    assert!(tokenizer.next().is_some());
    assert!(tokenizer.next().is_none());
    assert!(tokenizer.next().is_none());
}
