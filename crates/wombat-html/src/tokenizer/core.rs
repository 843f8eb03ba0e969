//! The HTML tokenizer state machine.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! A pull-based, sixty-plus-state deterministic machine. Each state is a
//! `handle_*_state` method that consumes scalars from the input stream,
//! mutates the current token and temporary buffer, and queues finished
//! tokens. A state returns `false` only when it observed end of input in a
//! position from which no further token can be produced; the iterator facade
//! keeps stepping the current state until the queue has something to yield
//! or the machine reports `false`.
//!
//! Two fields are written by the tree construction stage between advances:
//! the active state (RCDATA for `<title>`/`<textarea>`, RAWTEXT for
//! `<style>` and friends, script data for `<script>`, plaintext for
//! `<plaintext>`) and the CDATA gate, which is open only while the current
//! insertion point sits in a foreign (SVG/MathML) namespace.

use std::collections::VecDeque;

use strum_macros::Display;

use crate::stream::{Encoding, FileInfo, InputStream, StreamError};

use super::codepoints::{is_letter, is_whitespace, WHITESPACE};
use super::errors::{ErrorDetail, ParseErrorCode};
use super::token::{SourceSpan, Token};

/// Scalars that end a plain character run in the data and RCDATA states.
/// A run that STARTS with whitespace becomes a `SpaceCharacters` token
/// instead; a plain run carries interior whitespace along.
const DATA_RUN_STOPS: &[char] = &['&', '<', '\0'];

/// Same, minus `&`: RAWTEXT and script data have no character references.
const RAW_RUN_STOPS: &[char] = &['<', '\0'];

/// Plaintext only breaks runs on NUL.
const PLAINTEXT_RUN_STOPS: &[char] = &['\0'];

/// Script-data escaped runs break on the escape machinery's scalars.
const ESCAPED_RUN_STOPS: &[char] = &['<', '-', '\0'];

const ATTR_NAME_RUN_STOPS: &[char] =
    &['=', '>', '/', '"', '\'', '<', '\0', '\t', '\n', '\x0C', '\r', ' '];

const ATTR_VALUE_DQ_STOPS: &[char] = &['"', '&', '\0'];
const ATTR_VALUE_SQ_STOPS: &[char] = &['\'', '&', '\0'];
const ATTR_VALUE_UNQUOTED_STOPS: &[char] = &[
    '&', '>', '"', '\'', '=', '<', '`', '\0', '\t', '\n', '\x0C', '\r', ' ',
];

const COMMENT_RUN_STOPS: &[char] = &['-', '\0'];
const PI_DATA_RUN_STOPS: &[char] = &['?', '\0'];

/// Configuration for the tokenizer.
#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    /// Fold start and end tag names to ASCII lowercase at emission.
    pub lowercase_element_name: bool,
    /// Fold attribute names to ASCII lowercase when the name completes.
    pub lowercase_attr_name: bool,
    /// Attach a `SourceSpan` to every emitted token.
    pub generate_spans: bool,
    /// Explicit input encoding; wins over the `<meta>` preview.
    pub encoding: Option<Encoding>,
    /// Allow a one-shot encoding override from a `<meta charset>` found in
    /// the first kilobyte of a byte input.
    pub parse_meta: bool,
    /// `<x/>` on a non-void element emits `<x>` followed by a synthetic
    /// `</x>` instead of a self-closing flag the tree stage would ignore.
    pub emit_synthetic_end_for_self_closing: bool,
    /// Recognize `<?target data?>` processing instructions. Off means strict
    /// HTML5: `<?` is a parse error recovered as a bogus comment.
    pub process_instructions: bool,
    /// File name recorded on generated spans.
    pub file: Option<String>,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            lowercase_element_name: true,
            lowercase_attr_name: true,
            generate_spans: false,
            encoding: None,
            parse_meta: false,
            emit_synthetic_end_for_self_closing: true,
            process_instructions: true,
            file: None,
        }
    }
}

/// The tokenizer state set.
///
/// The five content-model states (data, RCDATA, RAWTEXT, script data,
/// plaintext) are the only ones the tree construction stage may set from
/// outside, and only between advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    Data,
    /// Resolving a character reference that started in the data state.
    EntityData,
    Rcdata,
    /// Resolving a character reference that started in RCDATA.
    CharacterReferenceInRcdata,
    Rawtext,
    ScriptData,
    /// Plaintext never ends; everything to EOF is character data.
    Plaintext,
    TagOpen,
    CloseTagOpen,
    TagName,
    RcdataLessThanSign,
    RcdataEndTagOpen,
    RcdataEndTagName,
    RawtextLessThanSign,
    RawtextEndTagOpen,
    RawtextEndTagName,
    ScriptDataLessThanSign,
    ScriptDataEndTagOpen,
    ScriptDataEndTagName,
    ScriptDataEscapeStart,
    ScriptDataEscapeStartDash,
    ScriptDataEscaped,
    ScriptDataEscapedDash,
    ScriptDataEscapedDashDash,
    ScriptDataEscapedLessThanSign,
    ScriptDataEscapedEndTagOpen,
    ScriptDataEscapedEndTagName,
    ScriptDataDoubleEscapeStart,
    ScriptDataDoubleEscaped,
    ScriptDataDoubleEscapedDash,
    ScriptDataDoubleEscapedDashDash,
    ScriptDataDoubleEscapedLessThanSign,
    ScriptDataDoubleEscapeEnd,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValue,
    SelfClosingStartTag,
    BogusComment,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentEndDash,
    CommentEnd,
    CommentEndBang,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
    AfterDoctypePublicKeyword,
    BeforeDoctypePublicIdentifier,
    DoctypePublicIdentifierDoubleQuoted,
    DoctypePublicIdentifierSingleQuoted,
    AfterDoctypePublicIdentifier,
    BetweenDoctypePublicAndSystemIdentifiers,
    AfterDoctypeSystemKeyword,
    BeforeDoctypeSystemIdentifier,
    DoctypeSystemIdentifierDoubleQuoted,
    DoctypeSystemIdentifierSingleQuoted,
    AfterDoctypeSystemIdentifier,
    BogusDoctype,
    CdataSection,
    ProcessingInstruction,
    ProcessingInstructionTarget,
    AfterProcessingInstructionTarget,
    ProcessingInstructionData,
    ProcessingInstructionEnd,
}

/// A finished token plus the cursor position at which it was queued, used
/// to merge stream decode errors into the output in source order.
pub(super) struct QueuedToken {
    pub(super) token: Token,
    pub(super) position: usize,
}

/// The tokenizer. Iterate it to pull tokens; it runs only inside `next`.
pub struct HTMLTokenizer {
    pub(super) stream: InputStream,
    pub(super) opts: TokenizerOptions,
    pub(super) state: TokenizerState,
    pub(super) current_token: Option<Token>,
    pub(super) temporary_buffer: String,
    pub(super) token_queue: VecDeque<QueuedToken>,
    pub(super) last_start_tag_name: Option<String>,
    /// End offset of the last content token; the next one starts here.
    pub(super) last_offset: usize,
    /// Set by the tree construction stage: true while the current insertion
    /// point is in a foreign namespace, which is the only place `<![CDATA[`
    /// is markup rather than a bogus comment.
    pub(super) cdata_allowed: bool,
    finished: bool,
}

impl HTMLTokenizer {
    /// Create a tokenizer over a prepared input stream.
    #[must_use]
    pub fn new(mut stream: InputStream, opts: TokenizerOptions) -> Self {
        stream.set_file_name(opts.file.clone());
        HTMLTokenizer {
            stream,
            opts,
            state: TokenizerState::Data,
            current_token: None,
            temporary_buffer: String::new(),
            token_queue: VecDeque::new(),
            last_start_tag_name: None,
            last_offset: 0,
            cdata_allowed: false,
            finished: false,
        }
    }

    /// Tokenize already-decoded text.
    #[must_use]
    pub fn from_str(input: &str, opts: TokenizerOptions) -> Self {
        Self::new(InputStream::from_str(input), opts)
    }

    /// Tokenize raw bytes, resolving the encoding per the options.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], opts: TokenizerOptions) -> Self {
        let stream = InputStream::from_bytes(bytes, opts.encoding, opts.parse_meta);
        Self::new(stream, opts)
    }

    /// Set the content-model state. The tree construction stage calls this
    /// right after the start tags of RCDATA/RAWTEXT/script/plaintext
    /// elements, between advances.
    pub fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// The state the machine will run next.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Open or close the CDATA gate. The tree construction stage keeps this
    /// in sync with whether the current open element is in a foreign
    /// namespace.
    pub fn set_cdata_allowed(&mut self, allowed: bool) {
        self.cdata_allowed = allowed;
    }

    /// The input stream's line table and decoded text, for span rendering.
    #[must_use]
    pub const fn file_info(&self) -> &FileInfo {
        self.stream.file_info()
    }

    /// The text a span covers.
    #[must_use]
    pub fn source_text(&self, span: &SourceSpan) -> &str {
        self.stream.file_info().slice(span)
    }

    /// Run the current state once. `false` means end of input was observed
    /// where no further token can be produced.
    fn step(&mut self) -> bool {
        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::EntityData => self.handle_entity_data_state(),
            TokenizerState::Rcdata => self.handle_rcdata_state(),
            TokenizerState::CharacterReferenceInRcdata => {
                self.handle_character_reference_in_rcdata_state()
            }
            TokenizerState::Rawtext => self.handle_rawtext_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::Plaintext => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::CloseTagOpen => self.handle_close_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RcdataLessThanSign => self.handle_rcdata_less_than_sign_state(),
            TokenizerState::RcdataEndTagOpen => self.handle_rcdata_end_tag_open_state(),
            TokenizerState::RcdataEndTagName => self.handle_rcdata_end_tag_name_state(),
            TokenizerState::RawtextLessThanSign => self.handle_rawtext_less_than_sign_state(),
            TokenizerState::RawtextEndTagOpen => self.handle_rawtext_end_tag_open_state(),
            TokenizerState::RawtextEndTagName => self.handle_rawtext_end_tag_name_state(),
            TokenizerState::ScriptDataLessThanSign => {
                self.handle_script_data_less_than_sign_state()
            }
            TokenizerState::ScriptDataEndTagOpen => self.handle_script_data_end_tag_open_state(),
            TokenizerState::ScriptDataEndTagName => self.handle_script_data_end_tag_name_state(),
            TokenizerState::ScriptDataEscapeStart => self.handle_script_data_escape_start_state(),
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_dash_state()
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(),
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state()
            }
            TokenizerState::ScriptDataEscapedLessThanSign => {
                self.handle_script_data_escaped_less_than_sign_state()
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => {
                self.handle_script_data_escaped_end_tag_open_state()
            }
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_script_data_escaped_end_tag_name_state()
            }
            TokenizerState::ScriptDataDoubleEscapeStart => {
                self.handle_script_data_double_escape_start_state()
            }
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state()
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state()
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state()
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state()
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => {
                self.handle_script_data_double_escape_end_state()
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_double_quoted_state()
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_single_quoted_state()
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValue => self.handle_after_attribute_value_state(),
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::Doctype => self.handle_doctype_state(),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDoctypePublicKeyword => {
                self.handle_after_doctype_public_keyword_state()
            }
            TokenizerState::BeforeDoctypePublicIdentifier => {
                self.handle_before_doctype_public_identifier_state()
            }
            TokenizerState::DoctypePublicIdentifierDoubleQuoted => {
                self.handle_doctype_public_identifier_state('"')
            }
            TokenizerState::DoctypePublicIdentifierSingleQuoted => {
                self.handle_doctype_public_identifier_state('\'')
            }
            TokenizerState::AfterDoctypePublicIdentifier => {
                self.handle_after_doctype_public_identifier_state()
            }
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state()
            }
            TokenizerState::AfterDoctypeSystemKeyword => {
                self.handle_after_doctype_system_keyword_state()
            }
            TokenizerState::BeforeDoctypeSystemIdentifier => {
                self.handle_before_doctype_system_identifier_state()
            }
            TokenizerState::DoctypeSystemIdentifierDoubleQuoted => {
                self.handle_doctype_system_identifier_state('"')
            }
            TokenizerState::DoctypeSystemIdentifierSingleQuoted => {
                self.handle_doctype_system_identifier_state('\'')
            }
            TokenizerState::AfterDoctypeSystemIdentifier => {
                self.handle_after_doctype_system_identifier_state()
            }
            TokenizerState::BogusDoctype => self.handle_bogus_doctype_state(),
            TokenizerState::CdataSection => self.handle_cdata_section_state(),
            TokenizerState::ProcessingInstruction => self.handle_processing_instruction_state(),
            TokenizerState::ProcessingInstructionTarget => {
                self.handle_processing_instruction_target_state()
            }
            TokenizerState::AfterProcessingInstructionTarget => {
                self.handle_after_processing_instruction_target_state()
            }
            TokenizerState::ProcessingInstructionData => {
                self.handle_processing_instruction_data_state()
            }
            TokenizerState::ProcessingInstructionEnd => {
                self.handle_processing_instruction_end_state()
            }
        }
    }

    fn stream_error_token(&mut self, error: StreamError) -> Token {
        let span = self.opts.generate_spans.then(|| SourceSpan {
            file: self.opts.file.clone(),
            start: error.position,
            end: error.position,
        });
        Token::ParseError {
            code: error.code,
            detail: error.detail,
            span,
        }
    }

    // =========================================================================
    // Text States
    // =========================================================================

    /// The data state: plain character data between markup.
    fn handle_data_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('&') => self.state = TokenizerState::EntityData,
            Some('<') => self.state = TokenizerState::TagOpen,
            Some('\0') => {
                // NUL is a parse error here but passes through literally;
                // the replacement-character treatment is for the raw states.
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\0");
            }
            None => return false,
            Some(c) if is_whitespace(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(WHITESPACE, true));
                self.emit_space_characters(&run);
            }
            Some(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(DATA_RUN_STOPS, false));
                self.emit_characters(&run);
            }
        }
        true
    }

    /// A character reference in the data state.
    fn handle_entity_data_state(&mut self) -> bool {
        self.consume_entity(None, false);
        self.state = TokenizerState::Data;
        true
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self) -> bool {
        match self.stream.consume() {
            // "U+0026 AMPERSAND (&) - Switch to the character reference state."
            Some('&') => self.state = TokenizerState::CharacterReferenceInRcdata,
            // "U+003C LESS-THAN SIGN (<) - Switch to the RCDATA less-than sign state."
            Some('<') => self.state = TokenizerState::RcdataLessThanSign,
            // "U+0000 NULL - This is a parse error. Emit a U+FFFD REPLACEMENT
            // CHARACTER character token."
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
            }
            None => return false,
            Some(c) if is_whitespace(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(WHITESPACE, true));
                self.emit_space_characters(&run);
            }
            Some(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(DATA_RUN_STOPS, false));
                self.emit_characters(&run);
            }
        }
        true
    }

    /// A character reference in RCDATA.
    fn handle_character_reference_in_rcdata_state(&mut self) -> bool {
        self.consume_entity(None, false);
        self.state = TokenizerState::Rcdata;
        true
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_rawtext_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('<') => self.state = TokenizerState::RawtextLessThanSign,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
            }
            None => return false,
            Some(c) if is_whitespace(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(WHITESPACE, true));
                self.emit_space_characters(&run);
            }
            Some(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(RAW_RUN_STOPS, false));
                self.emit_characters(&run);
            }
        }
        true
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    fn handle_script_data_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('<') => self.state = TokenizerState::ScriptDataLessThanSign,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
            }
            None => return false,
            Some(c) if is_whitespace(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(WHITESPACE, true));
                self.emit_space_characters(&run);
            }
            Some(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(RAW_RUN_STOPS, false));
                self.emit_characters(&run);
            }
        }
        true
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    ///
    /// Never leaves this state except at EOF.
    fn handle_plaintext_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
            }
            None => return false,
            Some(c) if is_whitespace(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(WHITESPACE, true));
                self.emit_space_characters(&run);
            }
            Some(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(PLAINTEXT_RUN_STOPS, false));
                self.emit_characters(&run);
            }
        }
        true
    }

    // =========================================================================
    // Tag States
    // =========================================================================

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) -> bool {
        match self.stream.consume() {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration
            // open state."
            Some('!') => self.state = TokenizerState::MarkupDeclarationOpen,
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.state = TokenizerState::CloseTagOpen,
            // "ASCII alpha - Create a new start tag token."
            Some(c) if is_letter(c) => {
                let mut token = Token::new_start_tag();
                token.append_to_tag_name(c);
                self.current_token = Some(token);
                self.state = TokenizerState::TagName;
            }
            Some('>') => {
                // "<>" is text, not markup.
                self.parse_error(ParseErrorCode::ExpectedTagNameButGotRightBracket, None);
                self.emit_characters("<>");
                self.state = TokenizerState::Data;
            }
            Some('?') if self.opts.process_instructions => {
                self.current_token = Some(Token::new_processing_instruction());
                self.state = TokenizerState::ProcessingInstruction;
            }
            Some(c @ '?') => {
                self.parse_error(ParseErrorCode::ExpectedTagName, Some(ErrorDetail::Char(c)));
                self.stream.unget(Some(c));
                self.state = TokenizerState::BogusComment;
            }
            None => {
                self.parse_error(ParseErrorCode::ExpectedTagName, None);
                self.emit_characters("<");
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                self.parse_error(ParseErrorCode::ExpectedTagName, Some(ErrorDetail::Char(c)));
                self.stream.unget(Some(c));
                self.emit_characters("<");
                self.state = TokenizerState::Data;
            }
        }
        true
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_close_tag_open_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_letter(c) => {
                let mut token = Token::new_end_tag();
                token.append_to_tag_name(c);
                self.current_token = Some(token);
                self.state = TokenizerState::TagName;
            }
            Some('>') => {
                // "</>" vanishes entirely.
                self.parse_error(ParseErrorCode::ExpectedClosingTagButGotRightBracket, None);
                self.state = TokenizerState::Data;
            }
            None => {
                self.parse_error(ParseErrorCode::ExpectedClosingTagButGotEof, None);
                self.emit_characters("</");
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                self.parse_error(
                    ParseErrorCode::ExpectedClosingTagButGotChar,
                    Some(ErrorDetail::Char(c)),
                );
                self.stream.unget(Some(c));
                self.state = TokenizerState::BogusComment;
            }
        }
        true
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => self.state = TokenizerState::BeforeAttributeName,
            Some('>') => self.emit_current_token(),
            Some('/') => self.state = TokenizerState::SelfClosingStartTag,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name('\u{FFFD}');
                }
            }
            None => {
                self.parse_error(ParseErrorCode::EofInTagName, None);
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_tag_name(c);
                }
            }
        }
        true
    }

    // =========================================================================
    // RCDATA / RAWTEXT End Tag States
    // =========================================================================

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    fn handle_rcdata_less_than_sign_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('/') => {
                self.temporary_buffer.clear();
                self.state = TokenizerState::RcdataEndTagOpen;
            }
            other => {
                self.stream.unget(other);
                self.emit_characters("<");
                self.state = TokenizerState::Rcdata;
            }
        }
        true
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    fn handle_rcdata_end_tag_open_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_letter(c) => {
                self.temporary_buffer.push(c);
                self.state = TokenizerState::RcdataEndTagName;
            }
            other => {
                self.stream.unget(other);
                self.emit_characters("</");
                self.state = TokenizerState::Rcdata;
            }
        }
        true
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// The buffered name only becomes an end tag token if it is the
    /// appropriate end tag; otherwise everything was character data.
    fn handle_rcdata_end_tag_name_state(&mut self) -> bool {
        self.handle_raw_end_tag_name(TokenizerState::Rcdata)
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_rawtext_less_than_sign_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('/') => {
                self.temporary_buffer.clear();
                self.state = TokenizerState::RawtextEndTagOpen;
            }
            other => {
                self.stream.unget(other);
                self.emit_characters("<");
                self.state = TokenizerState::Rawtext;
            }
        }
        true
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    fn handle_rawtext_end_tag_open_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_letter(c) => {
                self.temporary_buffer.push(c);
                self.state = TokenizerState::RawtextEndTagName;
            }
            other => {
                self.stream.unget(other);
                self.emit_characters("</");
                self.state = TokenizerState::Rawtext;
            }
        }
        true
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    fn handle_rawtext_end_tag_name_state(&mut self) -> bool {
        self.handle_raw_end_tag_name(TokenizerState::Rawtext)
    }

    /// Shared body of the RCDATA / RAWTEXT / script-data end tag name
    /// states; they differ only in where "anything else" falls back to.
    fn handle_raw_end_tag_name(&mut self, return_state: TokenizerState) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) && self.is_appropriate_end_tag() => {
                self.begin_end_tag_from_temporary_buffer();
                self.state = TokenizerState::BeforeAttributeName;
            }
            Some('/') if self.is_appropriate_end_tag() => {
                self.begin_end_tag_from_temporary_buffer();
                self.state = TokenizerState::SelfClosingStartTag;
            }
            Some('>') if self.is_appropriate_end_tag() => {
                self.begin_end_tag_from_temporary_buffer();
                self.emit_current_token();
            }
            Some(c) if is_letter(c) => self.temporary_buffer.push(c),
            other => {
                self.stream.unget(other);
                self.emit_partial_end_tag(return_state);
            }
        }
        true
    }

    // =========================================================================
    // Script Data Escape States
    // =========================================================================

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    fn handle_script_data_less_than_sign_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('/') => {
                self.temporary_buffer.clear();
                self.state = TokenizerState::ScriptDataEndTagOpen;
            }
            Some('!') => {
                self.emit_characters("<!");
                self.state = TokenizerState::ScriptDataEscapeStart;
            }
            other => {
                self.stream.unget(other);
                self.emit_characters("<");
                self.state = TokenizerState::ScriptData;
            }
        }
        true
    }

    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    fn handle_script_data_end_tag_open_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_letter(c) => {
                self.temporary_buffer.push(c);
                self.state = TokenizerState::ScriptDataEndTagName;
            }
            other => {
                self.stream.unget(other);
                self.emit_characters("</");
                self.state = TokenizerState::ScriptData;
            }
        }
        true
    }

    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    fn handle_script_data_end_tag_name_state(&mut self) -> bool {
        self.handle_raw_end_tag_name(TokenizerState::ScriptData)
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    fn handle_script_data_escape_start_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => {
                self.emit_characters("-");
                self.state = TokenizerState::ScriptDataEscapeStartDash;
            }
            other => {
                self.stream.unget(other);
                self.state = TokenizerState::ScriptData;
            }
        }
        true
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    fn handle_script_data_escape_start_dash_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => {
                self.emit_characters("-");
                self.state = TokenizerState::ScriptDataEscapedDashDash;
            }
            other => {
                self.stream.unget(other);
                self.state = TokenizerState::ScriptData;
            }
        }
        true
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    fn handle_script_data_escaped_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => {
                self.emit_characters("-");
                self.state = TokenizerState::ScriptDataEscapedDash;
            }
            Some('<') => self.state = TokenizerState::ScriptDataEscapedLessThanSign,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
            }
            None => self.state = TokenizerState::Data,
            Some(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(ESCAPED_RUN_STOPS, false));
                self.emit_characters(&run);
            }
        }
        true
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    fn handle_script_data_escaped_dash_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => {
                self.emit_characters("-");
                self.state = TokenizerState::ScriptDataEscapedDashDash;
            }
            Some('<') => self.state = TokenizerState::ScriptDataEscapedLessThanSign,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
                self.state = TokenizerState::ScriptDataEscaped;
            }
            None => self.state = TokenizerState::Data,
            Some(c) => {
                self.emit_characters(&c.to_string());
                self.state = TokenizerState::ScriptDataEscaped;
            }
        }
        true
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    fn handle_script_data_escaped_dash_dash_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => self.emit_characters("-"),
            Some('<') => self.state = TokenizerState::ScriptDataEscapedLessThanSign,
            Some('>') => {
                self.emit_characters(">");
                self.state = TokenizerState::ScriptData;
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
                self.state = TokenizerState::ScriptDataEscaped;
            }
            None => self.state = TokenizerState::Data,
            Some(c) => {
                self.emit_characters(&c.to_string());
                self.state = TokenizerState::ScriptDataEscaped;
            }
        }
        true
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    fn handle_script_data_escaped_less_than_sign_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('/') => {
                self.temporary_buffer.clear();
                self.state = TokenizerState::ScriptDataEscapedEndTagOpen;
            }
            Some(c) if is_letter(c) => {
                self.temporary_buffer.clear();
                self.temporary_buffer.push(c);
                let mut data = String::from('<');
                data.push(c);
                self.emit_characters(&data);
                self.state = TokenizerState::ScriptDataDoubleEscapeStart;
            }
            other => {
                self.stream.unget(other);
                self.emit_characters("<");
                self.state = TokenizerState::ScriptDataEscaped;
            }
        }
        true
    }

    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    fn handle_script_data_escaped_end_tag_open_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_letter(c) => {
                self.temporary_buffer.push(c);
                self.state = TokenizerState::ScriptDataEscapedEndTagName;
            }
            other => {
                self.stream.unget(other);
                self.emit_characters("</");
                self.state = TokenizerState::ScriptDataEscaped;
            }
        }
        true
    }

    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    fn handle_script_data_escaped_end_tag_name_state(&mut self) -> bool {
        self.handle_raw_end_tag_name(TokenizerState::ScriptDataEscaped)
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    ///
    /// The temporary buffer decides: a literal `script` means the escaped
    /// markup opened a nested script context.
    fn handle_script_data_double_escape_start_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) || c == '/' || c == '>' => {
                self.state = if self.temporary_buffer.eq_ignore_ascii_case("script") {
                    TokenizerState::ScriptDataDoubleEscaped
                } else {
                    TokenizerState::ScriptDataEscaped
                };
                self.emit_characters(&c.to_string());
            }
            Some(c) if is_letter(c) => {
                self.temporary_buffer.push(c);
                self.emit_characters(&c.to_string());
            }
            other => {
                self.stream.unget(other);
                self.state = TokenizerState::ScriptDataEscaped;
            }
        }
        true
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    fn handle_script_data_double_escaped_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => {
                self.emit_characters("-");
                self.state = TokenizerState::ScriptDataDoubleEscapedDash;
            }
            Some('<') => {
                self.emit_characters("<");
                self.state = TokenizerState::ScriptDataDoubleEscapedLessThanSign;
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
            }
            None => {
                self.parse_error(ParseErrorCode::EofInScriptInScript, None);
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                let mut run = String::from(c);
                run.push_str(&self.stream.chars_until(ESCAPED_RUN_STOPS, false));
                self.emit_characters(&run);
            }
        }
        true
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    ///
    /// A second dash moves to the dash-dash state, never back here.
    fn handle_script_data_double_escaped_dash_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => {
                self.emit_characters("-");
                self.state = TokenizerState::ScriptDataDoubleEscapedDashDash;
            }
            Some('<') => {
                self.emit_characters("<");
                self.state = TokenizerState::ScriptDataDoubleEscapedLessThanSign;
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
                self.state = TokenizerState::ScriptDataDoubleEscaped;
            }
            None => {
                self.parse_error(ParseErrorCode::EofInScriptInScript, None);
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                self.emit_characters(&c.to_string());
                self.state = TokenizerState::ScriptDataDoubleEscaped;
            }
        }
        true
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    fn handle_script_data_double_escaped_dash_dash_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => self.emit_characters("-"),
            Some('<') => {
                self.emit_characters("<");
                self.state = TokenizerState::ScriptDataDoubleEscapedLessThanSign;
            }
            Some('>') => {
                self.emit_characters(">");
                self.state = TokenizerState::ScriptData;
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.emit_characters("\u{FFFD}");
                self.state = TokenizerState::ScriptDataDoubleEscaped;
            }
            None => {
                self.parse_error(ParseErrorCode::EofInScriptInScript, None);
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                self.emit_characters(&c.to_string());
                self.state = TokenizerState::ScriptDataDoubleEscaped;
            }
        }
        true
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    fn handle_script_data_double_escaped_less_than_sign_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('/') => {
                self.emit_characters("/");
                self.temporary_buffer.clear();
                self.state = TokenizerState::ScriptDataDoubleEscapeEnd;
            }
            other => {
                self.stream.unget(other);
                self.state = TokenizerState::ScriptDataDoubleEscaped;
            }
        }
        true
    }

    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    fn handle_script_data_double_escape_end_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) || c == '/' || c == '>' => {
                self.state = if self.temporary_buffer.eq_ignore_ascii_case("script") {
                    TokenizerState::ScriptDataEscaped
                } else {
                    TokenizerState::ScriptDataDoubleEscaped
                };
                self.emit_characters(&c.to_string());
            }
            Some(c) if is_letter(c) => {
                self.temporary_buffer.push(c);
                self.emit_characters(&c.to_string());
            }
            other => {
                self.stream.unget(other);
                self.state = TokenizerState::ScriptDataDoubleEscaped;
            }
        }
        true
    }

    // =========================================================================
    // Attribute States
    // =========================================================================

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('>') => self.emit_current_token(),
            Some('/') => self.state = TokenizerState::SelfClosingStartTag,
            Some(c @ ('\'' | '"' | '=' | '<')) => {
                self.parse_error(
                    ParseErrorCode::InvalidCharacterInAttributeName,
                    Some(ErrorDetail::Char(c)),
                );
                self.start_attribute(c);
                self.state = TokenizerState::AttributeName;
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.start_attribute('\u{FFFD}');
                self.state = TokenizerState::AttributeName;
            }
            None => {
                self.parse_error(ParseErrorCode::ExpectedAttributeNameButGotEof, None);
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                self.start_attribute(c);
                self.state = TokenizerState::AttributeName;
            }
        }
        true
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// Leaving this state folds the finished name and runs the duplicate
    /// check; duplicates are reported once and left in place.
    fn handle_attribute_name_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('=') => {
                self.finish_attribute_name();
                self.state = TokenizerState::BeforeAttributeValue;
            }
            Some(c) if is_whitespace(c) => {
                self.finish_attribute_name();
                self.state = TokenizerState::AfterAttributeName;
            }
            Some('>') => {
                self.finish_attribute_name();
                self.emit_current_token();
            }
            Some('/') => {
                self.finish_attribute_name();
                self.state = TokenizerState::SelfClosingStartTag;
            }
            Some(c @ ('"' | '\'' | '<')) => {
                self.parse_error(
                    ParseErrorCode::InvalidCharacterInAttributeName,
                    Some(ErrorDetail::Char(c)),
                );
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_name(c);
                }
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_name('\u{FFFD}');
                }
            }
            None => {
                self.parse_error(ParseErrorCode::EofInAttributeName, None);
                self.finish_attribute_name();
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_name(c);
                }
                let run = self.stream.chars_until(ATTR_NAME_RUN_STOPS, false);
                if let Some(token) = self.current_token.as_mut() {
                    for c in run.chars() {
                        token.append_to_current_attribute_name(c);
                    }
                }
            }
        }
        true
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('=') => self.state = TokenizerState::BeforeAttributeValue,
            Some('>') => self.emit_current_token(),
            Some('/') => self.state = TokenizerState::SelfClosingStartTag,
            Some(c @ ('"' | '\'' | '<')) => {
                self.parse_error(
                    ParseErrorCode::InvalidCharacterInAttributeName,
                    Some(ErrorDetail::Char(c)),
                );
                self.start_attribute(c);
                self.state = TokenizerState::AttributeName;
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.start_attribute('\u{FFFD}');
                self.state = TokenizerState::AttributeName;
            }
            None => {
                self.parse_error(ParseErrorCode::ExpectedAttributeNameButGotEof, None);
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                self.start_attribute(c);
                self.state = TokenizerState::AttributeName;
            }
        }
        true
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    ///
    /// `&` goes back to the stream so the unquoted state resolves the
    /// reference with `>` as its allowed character.
    fn handle_before_attribute_value_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('"') => self.state = TokenizerState::AttributeValueDoubleQuoted,
            Some('\'') => self.state = TokenizerState::AttributeValueSingleQuoted,
            Some('&') => {
                self.stream.unget(Some('&'));
                self.state = TokenizerState::AttributeValueUnquoted;
            }
            Some('>') => {
                self.parse_error(ParseErrorCode::ExpectedAttributeValueButGotRightBracket, None);
                self.emit_current_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value('\u{FFFD}');
                }
                self.state = TokenizerState::AttributeValueUnquoted;
            }
            Some(c @ ('=' | '<')) => {
                self.parse_error(
                    ParseErrorCode::EqualsInUnquotedAttributeValue,
                    Some(ErrorDetail::Char(c)),
                );
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(c);
                }
                self.state = TokenizerState::AttributeValueUnquoted;
            }
            None => {
                self.parse_error(ParseErrorCode::ExpectedAttributeValueButGotEof, None);
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(c);
                }
                self.state = TokenizerState::AttributeValueUnquoted;
            }
        }
        true
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    fn handle_attribute_value_double_quoted_state(&mut self) -> bool {
        self.handle_attribute_value_quoted('"', ATTR_VALUE_DQ_STOPS)
    }

    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_single_quoted_state(&mut self) -> bool {
        self.handle_attribute_value_quoted('\'', ATTR_VALUE_SQ_STOPS)
    }

    fn handle_attribute_value_quoted(&mut self, quote: char, stops: &[char]) -> bool {
        match self.stream.consume() {
            Some(c) if c == quote => self.state = TokenizerState::AfterAttributeValue,
            Some('&') => self.process_entity_in_attribute(quote),
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value('\u{FFFD}');
                }
            }
            None => {
                let code = if quote == '"' {
                    ParseErrorCode::EofInAttributeValueDoubleQuote
                } else {
                    ParseErrorCode::EofInAttributeValueSingleQuote
                };
                self.parse_error(code, None);
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                let run = self.stream.chars_until(stops, false);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(c);
                    token.append_str_to_current_attribute_value(&run);
                }
            }
        }
        true
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => self.state = TokenizerState::BeforeAttributeName,
            Some('&') => self.process_entity_in_attribute('>'),
            Some('>') => self.emit_current_token(),
            Some(c @ ('"' | '\'' | '=' | '<' | '`')) => {
                self.parse_error(
                    ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue,
                    Some(ErrorDetail::Char(c)),
                );
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(c);
                }
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value('\u{FFFD}');
                }
            }
            None => {
                self.parse_error(ParseErrorCode::EofInAttributeValueNoQuotes, None);
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                let run = self.stream.chars_until(ATTR_VALUE_UNQUOTED_STOPS, false);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_current_attribute_value(c);
                    token.append_str_to_current_attribute_value(&run);
                }
            }
        }
        true
    }

    /// After the closing quote of an attribute value. Only whitespace, `/`,
    /// or `>` may follow.
    fn handle_after_attribute_value_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => self.state = TokenizerState::BeforeAttributeName,
            Some('>') => self.emit_current_token(),
            Some('/') => self.state = TokenizerState::SelfClosingStartTag,
            None => {
                self.parse_error(ParseErrorCode::UnexpectedEofAfterAttributeValue, None);
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                self.parse_error(
                    ParseErrorCode::UnexpectedCharacterAfterAttributeValue,
                    Some(ErrorDetail::Char(c)),
                );
                self.stream.unget(Some(c));
                self.state = TokenizerState::BeforeAttributeName;
            }
        }
        true
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// `<x/>` on a non-void element becomes `<x></x>` when the synthetic-end
    /// option is on; see `finish_self_closing_tag`.
    fn handle_self_closing_start_tag_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('>') => self.finish_self_closing_tag(),
            None => {
                self.parse_error(ParseErrorCode::UnexpectedEofAfterSolidusInTag, None);
                self.current_token = None;
                self.state = TokenizerState::Data;
            }
            Some(c) => {
                self.parse_error(
                    ParseErrorCode::UnexpectedCharacterAfterSolidusInTag,
                    Some(ErrorDetail::Char(c)),
                );
                self.stream.unget(Some(c));
                self.state = TokenizerState::BeforeAttributeName;
            }
        }
        true
    }

    // =========================================================================
    // Markup Declarations, Comments, CDATA
    // =========================================================================

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    ///
    /// Everything up to the next `>` (or EOF) becomes one comment token.
    fn handle_bogus_comment_state(&mut self) -> bool {
        let data = self
            .stream
            .chars_until(&['>'], false)
            .replace('\0', "\u{FFFD}");
        let _ = self.stream.consume();
        self.enqueue_token(Token::Comment { data, span: None });
        self.state = TokenizerState::Data;
        true
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Up to seven scalars of lookahead decide between `--`, `DOCTYPE`, and
    /// `[CDATA[`; the CDATA branch exists only while the tree construction
    /// stage reports a foreign insertion point. A mismatch pushes everything
    /// back and falls into the bogus comment state.
    fn handle_markup_declaration_open_state(&mut self) -> bool {
        if self.consume_if_match("--", false) {
            self.current_token = Some(Token::new_comment());
            self.state = TokenizerState::CommentStart;
        } else if self.consume_if_match("doctype", true) {
            self.current_token = Some(Token::new_doctype());
            self.state = TokenizerState::Doctype;
        } else if self.cdata_allowed && self.consume_if_match("[CDATA[", false) {
            self.state = TokenizerState::CdataSection;
        } else {
            self.parse_error(ParseErrorCode::ExpectedDashesOrDoctype, None);
            self.state = TokenizerState::BogusComment;
        }
        true
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => self.state = TokenizerState::CommentStartDash,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.append_to_comment("\u{FFFD}");
                self.state = TokenizerState::Comment;
            }
            Some('>') => {
                // "<!-->" closes immediately.
                self.parse_error(ParseErrorCode::IncorrectComment, None);
                self.emit_current_token();
            }
            None => {
                self.parse_error(ParseErrorCode::EofInComment, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.append_to_comment(&c.to_string());
                self.state = TokenizerState::Comment;
            }
        }
        true
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => self.state = TokenizerState::CommentEnd,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.append_to_comment("-\u{FFFD}");
                self.state = TokenizerState::Comment;
            }
            Some('>') => {
                self.parse_error(ParseErrorCode::IncorrectComment, None);
                self.emit_current_token();
            }
            None => {
                self.parse_error(ParseErrorCode::EofInComment, None);
                self.emit_current_token();
            }
            Some(c) => {
                let mut data = String::from('-');
                data.push(c);
                self.append_to_comment(&data);
                self.state = TokenizerState::Comment;
            }
        }
        true
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => self.state = TokenizerState::CommentEndDash,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.append_to_comment("\u{FFFD}");
            }
            None => {
                self.parse_error(ParseErrorCode::EofInComment, None);
                self.emit_current_token();
            }
            Some(c) => {
                let mut data = String::from(c);
                data.push_str(&self.stream.chars_until(COMMENT_RUN_STOPS, false));
                self.append_to_comment(&data);
            }
        }
        true
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('-') => self.state = TokenizerState::CommentEnd,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.append_to_comment("-\u{FFFD}");
                self.state = TokenizerState::Comment;
            }
            None => {
                self.parse_error(ParseErrorCode::EofInCommentEndDash, None);
                self.emit_current_token();
            }
            Some(c) => {
                let mut data = String::from('-');
                data.push(c);
                self.append_to_comment(&data);
                self.state = TokenizerState::Comment;
            }
        }
        true
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self) -> bool {
        match self.stream.consume() {
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit
            // the current comment token."
            Some('>') => self.emit_current_token(),
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.append_to_comment("--\u{FFFD}");
                self.state = TokenizerState::Comment;
            }
            Some('!') => {
                self.parse_error(ParseErrorCode::UnexpectedBangAfterDoubleDashInComment, None);
                self.state = TokenizerState::CommentEndBang;
            }
            Some('-') => {
                self.parse_error(ParseErrorCode::UnexpectedDashAfterDoubleDashInComment, None);
                self.append_to_comment("-");
            }
            None => {
                self.parse_error(ParseErrorCode::EofInCommentDoubleDash, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.parse_error(
                    ParseErrorCode::UnexpectedCharInComment,
                    Some(ErrorDetail::Char(c)),
                );
                let mut data = String::from("--");
                data.push(c);
                self.append_to_comment(&data);
                self.state = TokenizerState::Comment;
            }
        }
        true
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('>') => self.emit_current_token(),
            Some('-') => {
                self.append_to_comment("--!");
                self.state = TokenizerState::CommentEndDash;
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                self.append_to_comment("--!\u{FFFD}");
                self.state = TokenizerState::Comment;
            }
            None => {
                self.parse_error(ParseErrorCode::EofInCommentEndBangState, None);
                self.emit_current_token();
            }
            Some(c) => {
                let mut data = String::from("--!");
                data.push(c);
                self.append_to_comment(&data);
                self.state = TokenizerState::Comment;
            }
        }
        true
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// Runs to `]]>` (or EOF) and emits the accumulated text as one
    /// `Characters` token, whitespace-only or not.
    fn handle_cdata_section_state(&mut self) -> bool {
        let mut data = String::new();
        loop {
            data.push_str(&self.stream.chars_until(&[']', '\0'], false));
            match self.stream.consume() {
                None => break,
                Some('\0') => {
                    self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                    data.push('\u{FFFD}');
                }
                Some(c) => {
                    data.push(c);
                    if data.ends_with("]]>") {
                        data.truncate(data.len() - 3);
                        break;
                    }
                }
            }
        }
        if !data.is_empty() {
            self.emit_characters(&data);
        }
        self.state = TokenizerState::Data;
        true
    }

    // =========================================================================
    // Doctype States
    // =========================================================================

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => self.state = TokenizerState::BeforeDoctypeName,
            None => {
                self.doctype_error(ParseErrorCode::ExpectedDoctypeNameButGotEof, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.doctype_error(ParseErrorCode::NeedSpaceAfterDoctype, None);
                self.stream.unget(Some(c));
                self.state = TokenizerState::BeforeDoctypeName;
            }
        }
        true
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('>') => {
                self.doctype_error(ParseErrorCode::ExpectedDoctypeNameButGotRightBracket, None);
                self.emit_current_token();
            }
            Some('\0') => {
                self.doctype_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_name('\u{FFFD}');
                }
                self.state = TokenizerState::DoctypeName;
            }
            None => {
                self.doctype_error(ParseErrorCode::ExpectedDoctypeNameButGotEof, None);
                self.emit_current_token();
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_name(c.to_ascii_lowercase());
                }
                self.state = TokenizerState::DoctypeName;
            }
        }
        true
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => self.state = TokenizerState::AfterDoctypeName,
            Some('>') => self.emit_current_token(),
            Some('\0') => {
                self.doctype_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_name('\u{FFFD}');
                }
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctypeName, None);
                self.emit_current_token();
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_name(c.to_ascii_lowercase());
                }
            }
        }
        true
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    ///
    /// Recognizes the `PUBLIC` and `SYSTEM` keywords case-insensitively as
    /// six-scalar exact matches; anything else is a bogus doctype.
    fn handle_after_doctype_name_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('>') => self.emit_current_token(),
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                if (c == 'p' || c == 'P') && self.consume_if_match("ublic", true) {
                    self.state = TokenizerState::AfterDoctypePublicKeyword;
                } else if (c == 's' || c == 'S') && self.consume_if_match("ystem", true) {
                    self.state = TokenizerState::AfterDoctypeSystemKeyword;
                } else {
                    self.doctype_error(
                        ParseErrorCode::ExpectedSpaceOrRightBracketInDoctype,
                        Some(ErrorDetail::Char(c)),
                    );
                    self.state = TokenizerState::BogusDoctype;
                }
            }
        }
        true
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    fn handle_after_doctype_public_keyword_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                self.state = TokenizerState::BeforeDoctypePublicIdentifier;
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.doctype_error(
                    ParseErrorCode::UnexpectedCharInDoctype,
                    Some(ErrorDetail::Char(c)),
                );
                self.stream.unget(Some(c));
                self.state = TokenizerState::BeforeDoctypePublicIdentifier;
            }
        }
        true
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    fn handle_before_doctype_public_identifier_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('"') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.start_doctype_public_id();
                }
                self.state = TokenizerState::DoctypePublicIdentifierDoubleQuoted;
            }
            Some('\'') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.start_doctype_public_id();
                }
                self.state = TokenizerState::DoctypePublicIdentifierSingleQuoted;
            }
            Some('>') => {
                self.doctype_error(ParseErrorCode::UnexpectedEndOfDoctype, None);
                self.emit_current_token();
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.doctype_error(
                    ParseErrorCode::UnexpectedCharInDoctype,
                    Some(ErrorDetail::Char(c)),
                );
                self.state = TokenizerState::BogusDoctype;
            }
        }
        true
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// and its single-quoted twin.
    fn handle_doctype_public_identifier_state(&mut self, quote: char) -> bool {
        match self.stream.consume() {
            Some(c) if c == quote => self.state = TokenizerState::AfterDoctypePublicIdentifier,
            Some('\0') => {
                self.doctype_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_public_id('\u{FFFD}');
                }
            }
            Some('>') => {
                self.doctype_error(ParseErrorCode::UnexpectedEndOfDoctype, None);
                self.emit_current_token();
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_public_id(c);
                }
            }
        }
        true
    }

    /// [§ 13.2.5.60 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    fn handle_after_doctype_public_identifier_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                self.state = TokenizerState::BetweenDoctypePublicAndSystemIdentifiers;
            }
            Some('>') => self.emit_current_token(),
            Some(c @ ('"' | '\'')) => {
                self.doctype_error(
                    ParseErrorCode::UnexpectedCharInDoctype,
                    Some(ErrorDetail::Char(c)),
                );
                if let Some(token) = self.current_token.as_mut() {
                    token.start_doctype_system_id();
                }
                self.state = if c == '"' {
                    TokenizerState::DoctypeSystemIdentifierDoubleQuoted
                } else {
                    TokenizerState::DoctypeSystemIdentifierSingleQuoted
                };
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.doctype_error(
                    ParseErrorCode::UnexpectedCharInDoctype,
                    Some(ErrorDetail::Char(c)),
                );
                self.state = TokenizerState::BogusDoctype;
            }
        }
        true
    }

    /// [§ 13.2.5.61 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    fn handle_between_doctype_public_and_system_identifiers_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('>') => self.emit_current_token(),
            Some(c @ ('"' | '\'')) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.start_doctype_system_id();
                }
                self.state = if c == '"' {
                    TokenizerState::DoctypeSystemIdentifierDoubleQuoted
                } else {
                    TokenizerState::DoctypeSystemIdentifierSingleQuoted
                };
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.doctype_error(
                    ParseErrorCode::UnexpectedCharInDoctype,
                    Some(ErrorDetail::Char(c)),
                );
                self.state = TokenizerState::BogusDoctype;
            }
        }
        true
    }

    /// [§ 13.2.5.62 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    fn handle_after_doctype_system_keyword_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                self.state = TokenizerState::BeforeDoctypeSystemIdentifier;
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.doctype_error(
                    ParseErrorCode::UnexpectedCharInDoctype,
                    Some(ErrorDetail::Char(c)),
                );
                self.stream.unget(Some(c));
                self.state = TokenizerState::BeforeDoctypeSystemIdentifier;
            }
        }
        true
    }

    /// [§ 13.2.5.63 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    fn handle_before_doctype_system_identifier_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('"') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.start_doctype_system_id();
                }
                self.state = TokenizerState::DoctypeSystemIdentifierDoubleQuoted;
            }
            Some('\'') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.start_doctype_system_id();
                }
                self.state = TokenizerState::DoctypeSystemIdentifierSingleQuoted;
            }
            Some('>') => {
                self.doctype_error(ParseErrorCode::UnexpectedEndOfDoctype, None);
                self.emit_current_token();
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.doctype_error(
                    ParseErrorCode::UnexpectedCharInDoctype,
                    Some(ErrorDetail::Char(c)),
                );
                self.state = TokenizerState::BogusDoctype;
            }
        }
        true
    }

    /// [§ 13.2.5.64 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// and its single-quoted twin.
    fn handle_doctype_system_identifier_state(&mut self, quote: char) -> bool {
        match self.stream.consume() {
            Some(c) if c == quote => self.state = TokenizerState::AfterDoctypeSystemIdentifier,
            Some('\0') => {
                self.doctype_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_system_id('\u{FFFD}');
                }
            }
            Some('>') => {
                self.doctype_error(ParseErrorCode::UnexpectedEndOfDoctype, None);
                self.emit_current_token();
            }
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_doctype_system_id(c);
                }
            }
        }
        true
    }

    /// [§ 13.2.5.66 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    fn handle_after_doctype_system_identifier_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('>') => self.emit_current_token(),
            None => {
                self.doctype_error(ParseErrorCode::EofInDoctype, None);
                self.emit_current_token();
            }
            Some(c) => {
                self.doctype_error(
                    ParseErrorCode::UnexpectedCharInDoctype,
                    Some(ErrorDetail::Char(c)),
                );
                self.state = TokenizerState::BogusDoctype;
            }
        }
        true
    }

    /// [§ 13.2.5.67 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    ///
    /// Skips to the closing `>` (or EOF) and emits whatever accumulated;
    /// the correctness flag is already off.
    fn handle_bogus_doctype_state(&mut self) -> bool {
        let _ = self.stream.chars_until(&['>'], false);
        let _ = self.stream.consume();
        self.emit_current_token();
        true
    }

    // =========================================================================
    // Processing Instructions
    // =========================================================================

    /// After `<?`, skipping whitespace before the target. This surface is a
    /// superset of HTML5, gated by `TokenizerOptions::process_instructions`.
    fn handle_processing_instruction_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('?') => self.state = TokenizerState::ProcessingInstructionEnd,
            None => {
                self.parse_error(ParseErrorCode::ExpectedProcessingInstructionTarget, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.mark_incorrect();
                }
                self.emit_current_token();
            }
            Some(c) => {
                self.stream.unget(Some(c));
                self.state = TokenizerState::ProcessingInstructionTarget;
            }
        }
        true
    }

    /// Accumulating the instruction's target.
    fn handle_processing_instruction_target_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                self.state = TokenizerState::AfterProcessingInstructionTarget;
            }
            Some('?') => self.state = TokenizerState::ProcessingInstructionEnd,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_pi_target('\u{FFFD}');
                }
            }
            None => {
                self.parse_error(ParseErrorCode::ExpectedProcessingInstructionEnd, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.mark_incorrect();
                }
                self.emit_current_token();
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_pi_target(c);
                }
            }
        }
        true
    }

    /// Whitespace between target and data is not part of either.
    fn handle_after_processing_instruction_target_state(&mut self) -> bool {
        match self.stream.consume() {
            Some(c) if is_whitespace(c) => {
                let _ = self.stream.chars_until(WHITESPACE, true);
            }
            Some('?') => self.state = TokenizerState::ProcessingInstructionEnd,
            None => {
                self.parse_error(ParseErrorCode::ExpectedProcessingInstructionEnd, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.mark_incorrect();
                }
                self.emit_current_token();
            }
            Some(c) => {
                self.stream.unget(Some(c));
                self.state = TokenizerState::ProcessingInstructionData;
            }
        }
        true
    }

    /// Accumulating the instruction's data, up to `?>`.
    fn handle_processing_instruction_data_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('?') => self.state = TokenizerState::ProcessingInstructionEnd,
            Some('\0') => {
                self.parse_error(ParseErrorCode::InvalidCodepoint, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_pi_data("\u{FFFD}");
                }
            }
            None => {
                self.parse_error(ParseErrorCode::ExpectedProcessingInstructionEnd, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.mark_incorrect();
                }
                self.emit_current_token();
            }
            Some(c) => {
                let mut data = String::from(c);
                data.push_str(&self.stream.chars_until(PI_DATA_RUN_STOPS, false));
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_pi_data(&data);
                }
            }
        }
        true
    }

    /// Saw a `?`; a `>` closes the instruction, anything else was data.
    fn handle_processing_instruction_end_state(&mut self) -> bool {
        match self.stream.consume() {
            Some('>') => self.emit_current_token(),
            Some('?') => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_pi_data("?");
                }
            }
            None => {
                self.parse_error(ParseErrorCode::ExpectedProcessingInstructionEnd, None);
                if let Some(token) = self.current_token.as_mut() {
                    token.mark_incorrect();
                }
                self.emit_current_token();
            }
            Some(c) => {
                if let Some(token) = self.current_token.as_mut() {
                    token.append_to_pi_data("?");
                }
                self.stream.unget(Some(c));
                self.state = TokenizerState::ProcessingInstructionData;
            }
        }
        true
    }

    fn append_to_comment(&mut self, data: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(data);
        }
    }
}

/// The iterator facade: each `next` runs the machine until something is
/// ready to yield.
///
/// Stream decode errors are merged in by position so they surface exactly
/// where the offending source was read, between whatever tokens surround
/// that point.
impl Iterator for HTMLTokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(error_pos) = self.stream.peek_error_position() {
                // Strictly before the queued token's end offset: an error at
                // the boundary belongs to the scalar AFTER that token.
                let due = match self.token_queue.front() {
                    Some(queued) => error_pos < queued.position,
                    None => error_pos <= self.stream.position(),
                };
                if due && let Some(error) = self.stream.pop_error() {
                    let token = self.stream_error_token(error);
                    return Some(token);
                }
            }
            if let Some(queued) = self.token_queue.pop_front() {
                return Some(queued.token);
            }
            if self.finished {
                return None;
            }
            if !self.step() {
                self.finished = true;
            }
        }
    }
}
