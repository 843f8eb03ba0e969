//! Helper methods for the HTML tokenizer.
//!
//! This module contains the machinery the states lean on:
//! - Token emission and the span bookkeeping that rides along with it
//! - Parse-error reporting (errors are tokens, queued in source order)
//! - Markup-declaration lookahead ("if the next few characters are...")
//! - The appropriate-end-tag check and temporary-buffer helpers
//! - Attribute bookkeeping (name folding, duplicate detection)

use super::codepoints::ascii_upper_to_lower;
use super::core::{HTMLTokenizer, QueuedToken, TokenizerState};
use super::errors::{ErrorDetail, ParseErrorCode};
use super::token::{SourceSpan, Token};

/// An element that never has content or an end tag.
///
/// Self-closing syntax on anything outside this list gets a synthetic end
/// tag (when the option is on) instead of a dangling self-closing flag.
#[must_use]
pub(super) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "command"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Token Emission
// =============================================================================

impl HTMLTokenizer {
    /// Move a finished token onto the queue, attaching a span if span
    /// generation is on.
    ///
    /// A content token's span runs from the end of the previous content token
    /// (`last_offset`) to the cursor; parse errors get a zero-width span at
    /// the cursor and do not advance `last_offset`. Concatenating the span
    /// slices of the content tokens therefore reproduces the input.
    pub(super) fn enqueue_token(&mut self, mut token: Token) {
        let position = self.stream.position();
        if self.opts.generate_spans {
            let start = if token.is_parse_error() {
                position
            } else {
                self.last_offset
            };
            token.set_span(SourceSpan {
                file: self.opts.file.clone(),
                start,
                end: position,
            });
        }
        if !token.is_parse_error() {
            self.last_offset = position;
        }
        self.token_queue.push_back(QueuedToken { token, position });
    }

    /// Emit a run of character data.
    pub(super) fn emit_characters(&mut self, data: &str) {
        self.enqueue_token(Token::Characters {
            data: data.to_owned(),
            span: None,
        });
    }

    /// Emit a run of whitespace-only character data.
    pub(super) fn emit_space_characters(&mut self, data: &str) {
        self.enqueue_token(Token::SpaceCharacters {
            data: data.to_owned(),
            span: None,
        });
    }

    /// Report a parse error. Errors are ordinary tokens; they interleave
    /// with content in the order the offending source was read.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode, detail: Option<ErrorDetail>) {
        self.enqueue_token(Token::ParseError {
            code,
            detail,
            span: None,
        });
    }

    /// Report a parse error inside a doctype. Any error along a doctype's
    /// path clears its correctness flag.
    pub(super) fn doctype_error(&mut self, code: ParseErrorCode, detail: Option<ErrorDetail>) {
        self.parse_error(code, detail);
        if let Some(Token::Doctype { correct, .. }) = self.current_token.as_mut() {
            *correct = false;
        }
    }

    /// "Emit the current token."
    ///
    /// End tags are checked here for the two things they must not carry:
    /// attributes and a self-closing flag. Both are reported but the token is
    /// still emitted as written. Start tags record their folded name for the
    /// appropriate-end-tag check. Emission always returns the machine to the
    /// data state; the tree construction stage overrides that between
    /// advances when it needs RCDATA, RAWTEXT, script data, or plaintext.
    pub(super) fn emit_current_token(&mut self) {
        let Some(mut token) = self.current_token.take() else {
            return;
        };
        let mut end_tag_errors: (bool, bool) = (false, false);
        match &mut token {
            Token::StartTag { name, .. } => {
                if self.opts.lowercase_element_name {
                    *name = ascii_upper_to_lower(name);
                }
                self.last_start_tag_name = Some(ascii_upper_to_lower(name));
            }
            Token::EndTag {
                name,
                attributes,
                self_closing,
                ..
            } => {
                if self.opts.lowercase_element_name {
                    *name = ascii_upper_to_lower(name);
                }
                end_tag_errors = (!attributes.is_empty(), *self_closing);
            }
            _ => {}
        }
        let (has_attributes, has_self_closing) = end_tag_errors;
        if has_attributes {
            self.parse_error(ParseErrorCode::AttributesInEndTag, None);
        }
        if has_self_closing {
            self.parse_error(ParseErrorCode::SelfClosingFlagOnEndTag, None);
        }
        self.enqueue_token(token);
        self.state = TokenizerState::Data;
    }

    /// Finish the tag sitting in `current_token` after the `/>` of a
    /// self-closing start tag.
    ///
    /// For a non-void start tag (with the option on) this emits the start
    /// tag unflagged and follows it with a synthetic end tag of the same
    /// name; the synthetic tag carries a zero-width span. Everything else
    /// keeps the flag and emits one token.
    pub(super) fn finish_self_closing_tag(&mut self) {
        let Some(token) = self.current_token.as_ref() else {
            return;
        };
        let folded = ascii_upper_to_lower(token.tag_name());
        let synthesize = self.opts.emit_synthetic_end_for_self_closing
            && matches!(token, Token::StartTag { .. })
            && !is_void_element(&folded);
        if synthesize {
            let name = if self.opts.lowercase_element_name {
                folded
            } else {
                token.tag_name().to_owned()
            };
            self.emit_current_token();
            self.enqueue_token(Token::EndTag {
                name,
                attributes: Vec::new(),
                self_closing: false,
                span: None,
            });
        } else {
            if let Some(token) = self.current_token.as_mut() {
                token.set_self_closing();
            }
            self.emit_current_token();
        }
    }
}

// =============================================================================
// Lookahead
// =============================================================================

impl HTMLTokenizer {
    /// "If the next few characters are..."
    ///
    /// Consume `word` from the stream if it is next. On a mismatch every
    /// consumed scalar is pushed back, leaving the stream untouched.
    pub(super) fn consume_if_match(&mut self, word: &str, case_insensitive: bool) -> bool {
        let mut consumed: Vec<char> = Vec::new();
        for expected in word.chars() {
            match self.stream.consume() {
                Some(c)
                    if c == expected
                        || (case_insensitive && c.eq_ignore_ascii_case(&expected)) =>
                {
                    consumed.push(c);
                }
                other => {
                    self.stream.unget(other);
                    for c in consumed.into_iter().rev() {
                        self.stream.unget(Some(c));
                    }
                    return false;
                }
            }
        }
        true
    }
}

// =============================================================================
// End Tags in RCDATA / RAWTEXT / Script Data
// =============================================================================

impl HTMLTokenizer {
    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted from
    /// this tokenizer, if any."
    ///
    /// The candidate name lives in the temporary buffer; comparison is
    /// ASCII case-insensitive on both sides.
    #[must_use]
    pub(super) fn is_appropriate_end_tag(&self) -> bool {
        self.last_start_tag_name
            .as_deref()
            .is_some_and(|last| last.eq_ignore_ascii_case(&self.temporary_buffer))
    }

    /// Turn the temporary buffer into the current end tag token.
    pub(super) fn begin_end_tag_from_temporary_buffer(&mut self) {
        let mut token = Token::new_end_tag();
        for c in self.temporary_buffer.chars() {
            token.append_to_tag_name(c);
        }
        self.current_token = Some(token);
    }

    /// The "anything else" exit of the raw-content end tag name states:
    /// what looked like an end tag was not one, so `</` and the buffered
    /// name are plain characters. The caller ungets the offending scalar
    /// first.
    pub(super) fn emit_partial_end_tag(&mut self, return_state: TokenizerState) {
        let data = format!("</{}", self.temporary_buffer);
        self.emit_characters(&data);
        self.state = return_state;
    }
}

// =============================================================================
// Attributes
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token" whose name begins
    /// with the given scalar.
    pub(super) fn start_attribute(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.start_new_attribute();
            token.append_to_current_attribute_name(c);
        }
    }

    /// Leaving the attribute name state: fold the finished name (if
    /// configured) and compare it against the earlier attributes. The first
    /// collision is a `duplicate-attribute` parse error; the attribute stays
    /// on the token in source order so consumers can dedupe first-wins.
    pub(super) fn finish_attribute_name(&mut self) {
        if self.opts.lowercase_attr_name
            && let Some(
                Token::StartTag { attributes, .. } | Token::EndTag { attributes, .. },
            ) = self.current_token.as_mut()
            && let Some(attr) = attributes.last_mut()
        {
            attr.name = ascii_upper_to_lower(&attr.name);
        }
        if self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate)
        {
            self.parse_error(ParseErrorCode::DuplicateAttribute, None);
        }
    }
}
