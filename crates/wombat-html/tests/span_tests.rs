//! Span generation: monotonicity, coverage, and the parse-error rules.

use wombat_html::{HTMLTokenizer, Token, TokenizerOptions};

fn span_options() -> TokenizerOptions {
    TokenizerOptions {
        generate_spans: true,
        ..TokenizerOptions::default()
    }
}

fn tokenize_with_spans(input: &str) -> (HTMLTokenizer, Vec<Token>) {
    let mut tokenizer = HTMLTokenizer::from_str(input, span_options());
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next() {
        tokens.push(token);
    }
    (tokenizer, tokens)
}

/// Concatenating the source text of the content tokens reproduces the
/// (normalized) input.
fn assert_covers(input: &str, tokenizer: &HTMLTokenizer, tokens: &[Token]) {
    let mut covered = String::new();
    for token in tokens.iter().filter(|t| !t.is_parse_error()) {
        let span = token.span().expect("span generation was enabled");
        covered.push_str(tokenizer.source_text(span));
    }
    assert_eq!(covered, input);
}

#[test]
fn test_spans_tile_a_simple_document() {
    let input = "<p>Hi</p>";
    let (tokenizer, tokens) = tokenize_with_spans(input);
    let spans: Vec<(usize, usize)> = tokens
        .iter()
        .map(|t| {
            let s = t.span().expect("span");
            (s.start, s.end)
        })
        .collect();
    assert_eq!(spans, vec![(0, 3), (3, 5), (5, 9)]);
    assert_covers(input, &tokenizer, &tokens);
}

#[test]
fn test_end_equals_next_start() {
    let input = "<!DOCTYPE html><a href=x>text<!--c--></a>";
    let (tokenizer, tokens) = tokenize_with_spans(input);
    let content: Vec<&Token> = tokens.iter().filter(|t| !t.is_parse_error()).collect();
    for pair in content.windows(2) {
        let first = pair[0].span().expect("span");
        let second = pair[1].span().expect("span");
        assert_eq!(first.end, second.start);
    }
    assert_covers(input, &tokenizer, &tokens);
}

#[test]
fn test_entity_spans_cover_their_source() {
    let input = "a &amp; b";
    let (tokenizer, tokens) = tokenize_with_spans(input);
    // The resolved entity's token covers the full "&amp;" source run.
    let entity = tokens
        .iter()
        .find(|t| matches!(t, Token::Characters { data, .. } if data == "&"))
        .expect("entity token");
    let span = entity.span().expect("span");
    assert_eq!(tokenizer.source_text(span), "&amp;");
    assert_covers(input, &tokenizer, &tokens);
}

#[test]
fn test_parse_errors_are_zero_width_and_do_not_advance() {
    let input = "<>";
    let (tokenizer, tokens) = tokenize_with_spans(input);
    let error = &tokens[0];
    assert!(error.is_parse_error());
    let error_span = error.span().expect("span");
    assert_eq!(error_span.start, error_span.end);
    // The content token still starts at the previous content offset.
    let text = &tokens[1];
    let text_span = text.span().expect("span");
    assert_eq!((text_span.start, text_span.end), (0, 2));
    assert_covers(input, &tokenizer, &tokens);
}

#[test]
fn test_synthetic_end_tag_has_zero_width_span() {
    let input = "<x/>y";
    let (tokenizer, tokens) = tokenize_with_spans(input);
    assert!(matches!(&tokens[0], Token::StartTag { .. }));
    let end_span = tokens[1].span().expect("span");
    assert!(matches!(&tokens[1], Token::EndTag { .. }));
    assert_eq!((end_span.start, end_span.end), (4, 4));
    let text_span = tokens[2].span().expect("span");
    assert_eq!((text_span.start, text_span.end), (4, 5));
    assert_covers(input, &tokenizer, &tokens);
}

#[test]
fn test_span_monotonicity_on_messy_input() {
    let input = "<a b=c\"d>&notin x<!--a--!>z<?pi?>";
    let (tokenizer, tokens) = tokenize_with_spans(input);
    let mut previous_end = 0;
    for token in tokens.iter().filter(|t| !t.is_parse_error()) {
        let span = token.span().expect("span");
        assert!(span.start >= previous_end);
        assert!(span.end >= span.start);
        previous_end = span.end;
    }
    assert_covers(input, &tokenizer, &tokens);
}

#[test]
fn test_spans_carry_the_file_label() {
    let opts = TokenizerOptions {
        generate_spans: true,
        file: Some("index.html".into()),
        ..TokenizerOptions::default()
    };
    let tokens: Vec<Token> = HTMLTokenizer::from_str("<p>", opts).collect();
    let span = tokens[0].span().expect("span");
    assert_eq!(span.file.as_deref(), Some("index.html"));
}

#[test]
fn test_no_spans_by_default() {
    let tokens: Vec<Token> =
        HTMLTokenizer::from_str("<p>x</p>", TokenizerOptions::default()).collect();
    assert!(tokens.iter().all(|t| t.span().is_none()));
}
