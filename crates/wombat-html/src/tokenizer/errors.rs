//! The tokenizer's parse-error vocabulary.
//!
//! Parse errors are data, not control flow: every anomaly the tokenizer
//! detects becomes a [`Token::ParseError`](super::token::Token) in the output
//! stream, carrying one of these codes. The `Display` form of each code is
//! its stable string identifier; downstream tooling and tests match on that
//! string, so the spellings here (including the historical ones) must never
//! change.

use serde::{Serialize, Serializer};
use strum_macros::Display;

/// Stable identifiers for everything the tokenizer can complain about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParseErrorCode {
    /// A scalar the current content model cannot represent, including NUL
    /// and bytes the decoder had to replace.
    #[strum(serialize = "invalid-codepoint")]
    InvalidCodepoint,
    #[strum(serialize = "expected-tag-name")]
    ExpectedTagName,
    #[strum(serialize = "expected-tag-name-but-got-right-bracket")]
    ExpectedTagNameButGotRightBracket,
    #[strum(serialize = "eof-in-tag-name")]
    EofInTagName,
    #[strum(serialize = "expected-closing-tag-but-got-char")]
    ExpectedClosingTagButGotChar,
    #[strum(serialize = "expected-closing-tag-but-got-eof")]
    ExpectedClosingTagButGotEof,
    #[strum(serialize = "expected-closing-tag-but-got-right-bracket")]
    ExpectedClosingTagButGotRightBracket,
    #[strum(serialize = "attributes-in-end-tag")]
    AttributesInEndTag,
    /// Historical spelling, kept verbatim: consumers match the string.
    #[strum(serialize = "this-closing-flag-on-end-tag")]
    SelfClosingFlagOnEndTag,
    #[strum(serialize = "invalid-character-in-attribute-name")]
    InvalidCharacterInAttributeName,
    #[strum(serialize = "eof-in-attribute-name")]
    EofInAttributeName,
    #[strum(serialize = "duplicate-attribute")]
    DuplicateAttribute,
    #[strum(serialize = "expected-attribute-name-but-got-eof")]
    ExpectedAttributeNameButGotEof,
    #[strum(serialize = "expected-attribute-value-but-got-right-bracket")]
    ExpectedAttributeValueButGotRightBracket,
    #[strum(serialize = "expected-attribute-value-but-got-eof")]
    ExpectedAttributeValueButGotEof,
    #[strum(serialize = "equals-in-unquoted-attribute-value")]
    EqualsInUnquotedAttributeValue,
    #[strum(serialize = "unexpected-character-in-unquoted-attribute-value")]
    UnexpectedCharacterInUnquotedAttributeValue,
    #[strum(serialize = "eof-in-attribute-value-double-quote")]
    EofInAttributeValueDoubleQuote,
    #[strum(serialize = "eof-in-attribute-value-single-quote")]
    EofInAttributeValueSingleQuote,
    #[strum(serialize = "eof-in-attribute-value-no-quotes")]
    EofInAttributeValueNoQuotes,
    #[strum(serialize = "unexpected-EOF-after-attribute-value")]
    UnexpectedEofAfterAttributeValue,
    #[strum(serialize = "unexpected-character-after-attribute-value")]
    UnexpectedCharacterAfterAttributeValue,
    #[strum(serialize = "unexpected-EOF-after-solidus-in-tag")]
    UnexpectedEofAfterSolidusInTag,
    /// Historical spelling, kept verbatim.
    #[strum(serialize = "unexpected-character-after-soldius-in-tag")]
    UnexpectedCharacterAfterSolidusInTag,
    #[strum(serialize = "incorrect-comment")]
    IncorrectComment,
    #[strum(serialize = "eof-in-comment")]
    EofInComment,
    #[strum(serialize = "eof-in-comment-end-dash")]
    EofInCommentEndDash,
    #[strum(serialize = "eof-in-comment-double-dash")]
    EofInCommentDoubleDash,
    #[strum(serialize = "eof-in-comment-end-bang-state")]
    EofInCommentEndBangState,
    #[strum(serialize = "unexpected-bang-after-double-dash-in-comment")]
    UnexpectedBangAfterDoubleDashInComment,
    #[strum(serialize = "unexpected-dash-after-double-dash-in-comment")]
    UnexpectedDashAfterDoubleDashInComment,
    #[strum(serialize = "unexpected-char-in-comment")]
    UnexpectedCharInComment,
    #[strum(serialize = "need-space-after-doctype")]
    NeedSpaceAfterDoctype,
    #[strum(serialize = "expected-doctype-name-but-got-eof")]
    ExpectedDoctypeNameButGotEof,
    #[strum(serialize = "expected-doctype-name-but-got-right-bracket")]
    ExpectedDoctypeNameButGotRightBracket,
    #[strum(serialize = "eof-in-doctype-name")]
    EofInDoctypeName,
    #[strum(serialize = "expected-space-or-right-bracket-in-doctype")]
    ExpectedSpaceOrRightBracketInDoctype,
    #[strum(serialize = "eof-in-doctype")]
    EofInDoctype,
    #[strum(serialize = "unexpected-char-in-doctype")]
    UnexpectedCharInDoctype,
    #[strum(serialize = "unexpected-end-of-doctype")]
    UnexpectedEndOfDoctype,
    #[strum(serialize = "illegal-codepoint-for-numeric-entity")]
    IllegalCodepointForNumericEntity,
    #[strum(serialize = "numeric-entity-without-semicolon")]
    NumericEntityWithoutSemicolon,
    #[strum(serialize = "expected-numeric-entity")]
    ExpectedNumericEntity,
    #[strum(serialize = "named-entity-without-semicolon")]
    NamedEntityWithoutSemicolon,
    #[strum(serialize = "expected-named-entity")]
    ExpectedNamedEntity,
    #[strum(serialize = "expected-dashes-or-doctype")]
    ExpectedDashesOrDoctype,
    #[strum(serialize = "eof-in-script-in-script")]
    EofInScriptInScript,
    #[strum(serialize = "expected-processing-instruction-target")]
    ExpectedProcessingInstructionTarget,
    #[strum(serialize = "expected-processing-instruction-end")]
    ExpectedProcessingInstructionEnd,
}

impl Serialize for ParseErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Optional payload attached to a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorDetail {
    /// The offending scalar, for "but got" style errors.
    Char(char),
    /// The numeric value of an illegal character reference.
    CodePoint(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_stable_identifier() {
        assert_eq!(ParseErrorCode::InvalidCodepoint.to_string(), "invalid-codepoint");
        assert_eq!(
            ParseErrorCode::IllegalCodepointForNumericEntity.to_string(),
            "illegal-codepoint-for-numeric-entity"
        );
    }

    #[test]
    fn test_historical_spellings_are_preserved() {
        assert_eq!(
            ParseErrorCode::SelfClosingFlagOnEndTag.to_string(),
            "this-closing-flag-on-end-tag"
        );
        assert_eq!(
            ParseErrorCode::UnexpectedCharacterAfterSolidusInTag.to_string(),
            "unexpected-character-after-soldius-in-tag"
        );
        assert_eq!(
            ParseErrorCode::UnexpectedEofAfterAttributeValue.to_string(),
            "unexpected-EOF-after-attribute-value"
        );
    }
}
