//! Token types produced by the tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! The output of tokenization is a series of zero or more tokens: start tag,
//! end tag, character, space-character, comment, doctype, processing
//! instruction, and parse error. Whitespace-only runs are split out as
//! `SpaceCharacters` so tree construction can decide their fate without
//! re-scanning, and parse errors travel in-band with the content tokens.

use core::fmt;

use serde::Serialize;

use super::errors::{ErrorDetail, ParseErrorCode};

/// An attribute on a start or end tag token.
///
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// The source extent a token covers, in byte offsets into the decoded,
/// newline-normalized text. `end` is exclusive.
///
/// Spans are only attached when `generate_spans` is set; apart from parse
/// errors (which get a zero-width span and do not advance the cursor), the
/// `end` of one token is the `start` of the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub file: Option<String>,
    pub start: usize,
    pub end: usize,
}

/// A single lexical unit emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Token {
    /// A start tag with its ordered attribute list.
    ///
    /// Duplicate attribute names are reported as `duplicate-attribute` parse
    /// errors but every occurrence stays on the token, in source order, so a
    /// consumer can dedupe on first-wins.
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
        span: Option<SourceSpan>,
    },

    /// An end tag. Attributes and a self-closing flag are parse errors here
    /// but the token is still emitted with whatever was written on it.
    EndTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
        span: Option<SourceSpan>,
    },

    /// A run of character data containing at least one non-whitespace scalar.
    Characters {
        data: String,
        span: Option<SourceSpan>,
    },

    /// A run of character data that is entirely whitespace.
    SpaceCharacters {
        data: String,
        span: Option<SourceSpan>,
    },

    /// A comment. `data` excludes the `<!--` and `-->` delimiters.
    Comment {
        data: String,
        span: Option<SourceSpan>,
    },

    /// A doctype. `correct` is true only if no parse error occurred anywhere
    /// along the doctype's path through the state machine.
    Doctype {
        name: Option<String>,
        public_id: Option<String>,
        system_id: Option<String>,
        correct: bool,
        span: Option<SourceSpan>,
    },

    /// A processing instruction `<?target data?>`. Unterminated instructions
    /// are emitted with `correct` unset.
    ProcessingInstruction {
        target: String,
        data: String,
        correct: bool,
        span: Option<SourceSpan>,
    },

    /// A parse error, interleaved with content tokens in source order.
    ParseError {
        code: ParseErrorCode,
        detail: Option<ErrorDetail>,
        span: Option<SourceSpan>,
    },
}

impl Token {
    /// "When a start tag token is created, its self-closing flag must be
    /// unset and its attributes list must be empty."
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            attributes: Vec::new(),
            self_closing: false,
            span: None,
        }
    }

    /// Create a new end tag token with an empty name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            attributes: Vec::new(),
            self_closing: false,
            span: None,
        }
    }

    /// Create a new comment token with empty data.
    #[must_use]
    pub const fn new_comment() -> Self {
        Self::Comment {
            data: String::new(),
            span: None,
        }
    }

    /// "When a DOCTYPE token is created, its name, public identifier, and
    /// system identifier must be marked as missing", and it starts out
    /// correct until an error on its path says otherwise.
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            name: None,
            public_id: None,
            system_id: None,
            correct: true,
            span: None,
        }
    }

    /// Create a new processing instruction token.
    #[must_use]
    pub const fn new_processing_instruction() -> Self {
        Self::ProcessingInstruction {
            target: String::new(),
            data: String::new(),
            correct: true,
            span: None,
        }
    }

    /// Returns true if this is a parse error token.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }

    /// The span attached to this token, if span generation was enabled.
    #[must_use]
    pub const fn span(&self) -> Option<&SourceSpan> {
        match self {
            Self::StartTag { span, .. }
            | Self::EndTag { span, .. }
            | Self::Characters { span, .. }
            | Self::SpaceCharacters { span, .. }
            | Self::Comment { span, .. }
            | Self::Doctype { span, .. }
            | Self::ProcessingInstruction { span, .. }
            | Self::ParseError { span, .. } => span.as_ref(),
        }
    }

    pub(crate) fn set_span(&mut self, new_span: SourceSpan) {
        match self {
            Self::StartTag { span, .. }
            | Self::EndTag { span, .. }
            | Self::Characters { span, .. }
            | Self::SpaceCharacters { span, .. }
            | Self::Comment { span, .. }
            | Self::Doctype { span, .. }
            | Self::ProcessingInstruction { span, .. }
            | Self::ParseError { span, .. } => *span = Some(new_span),
        }
    }

    // Mutation helpers for use during tokenization. These panic if called on
    // the wrong token variant, which indicates a bug in the state machine.

    /// Append a scalar to the current tag token's tag name.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_tag_name(&mut self, c: char) {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => name.push(c),
            _ => panic!("append_to_tag_name called on non-tag token"),
        }
    }

    /// The tag name accumulated so far.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => name,
            _ => panic!("tag_name called on non-tag token"),
        }
    }

    /// "Set the self-closing flag of the current tag token."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn set_self_closing(&mut self) {
        match self {
            Self::StartTag { self_closing, .. } | Self::EndTag { self_closing, .. } => {
                *self_closing = true;
            }
            _ => panic!("set_self_closing called on non-tag token"),
        }
    }

    /// "Start a new attribute in the current tag token."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn start_new_attribute(&mut self) {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                attributes.push(Attribute::new(String::new(), String::new()));
            }
            _ => panic!("start_new_attribute called on non-tag token"),
        }
    }

    /// Append a scalar to the current (last) attribute's name.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_current_attribute_name(&mut self, c: char) {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                if let Some(attr) = attributes.last_mut() {
                    attr.name.push(c);
                }
            }
            _ => panic!("append_to_current_attribute_name called on non-tag token"),
        }
    }

    /// Append a scalar to the current attribute's value.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_current_attribute_value(&mut self, c: char) {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                if let Some(attr) = attributes.last_mut() {
                    attr.value.push(c);
                }
            }
            _ => panic!("append_to_current_attribute_value called on non-tag token"),
        }
    }

    /// Append a string to the current attribute's value. Entity resolution
    /// produces multi-scalar replacements, hence the string form.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_str_to_current_attribute_value(&mut self, s: &str) {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                if let Some(attr) = attributes.last_mut() {
                    attr.value.push_str(s);
                }
            }
            _ => panic!("append_str_to_current_attribute_value called on non-tag token"),
        }
    }

    /// True if the current (last) attribute's name already appeared earlier
    /// on this tag. The duplicate is reported but never removed; consumers
    /// keep the first occurrence.
    #[must_use]
    pub fn current_attribute_name_is_duplicate(&self) -> bool {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                attributes.last().is_some_and(|current| {
                    attributes[..attributes.len() - 1]
                        .iter()
                        .any(|attr| attr.name == current.name)
                })
            }
            _ => false,
        }
    }

    /// Append a string to the comment token's data.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-comment token, indicating a tokenizer bug.
    pub fn append_to_comment(&mut self, s: &str) {
        match self {
            Self::Comment { data, .. } => data.push_str(s),
            _ => panic!("append_to_comment called on non-comment token"),
        }
    }

    /// Append a scalar to the doctype token's name, creating it if missing.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-doctype token, indicating a tokenizer bug.
    pub fn append_to_doctype_name(&mut self, c: char) {
        match self {
            Self::Doctype { name, .. } => match name {
                Some(n) => n.push(c),
                None => *name = Some(String::from(c)),
            },
            _ => panic!("append_to_doctype_name called on non-doctype token"),
        }
    }

    /// Set the doctype's public identifier to the empty string, ready for
    /// accumulation.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-doctype token, indicating a tokenizer bug.
    pub fn start_doctype_public_id(&mut self) {
        match self {
            Self::Doctype { public_id, .. } => *public_id = Some(String::new()),
            _ => panic!("start_doctype_public_id called on non-doctype token"),
        }
    }

    /// Append a scalar to the doctype's public identifier.
    ///
    /// # Panics
    ///
    /// Panics if the identifier was never started, indicating a tokenizer bug.
    pub fn append_to_doctype_public_id(&mut self, c: char) {
        match self {
            Self::Doctype {
                public_id: Some(id),
                ..
            } => id.push(c),
            _ => panic!("append_to_doctype_public_id called before start_doctype_public_id"),
        }
    }

    /// Set the doctype's system identifier to the empty string.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-doctype token, indicating a tokenizer bug.
    pub fn start_doctype_system_id(&mut self) {
        match self {
            Self::Doctype { system_id, .. } => *system_id = Some(String::new()),
            _ => panic!("start_doctype_system_id called on non-doctype token"),
        }
    }

    /// Append a scalar to the doctype's system identifier.
    ///
    /// # Panics
    ///
    /// Panics if the identifier was never started, indicating a tokenizer bug.
    pub fn append_to_doctype_system_id(&mut self, c: char) {
        match self {
            Self::Doctype {
                system_id: Some(id),
                ..
            } => id.push(c),
            _ => panic!("append_to_doctype_system_id called before start_doctype_system_id"),
        }
    }

    /// Clear the correctness flag on a doctype or processing instruction.
    ///
    /// # Panics
    ///
    /// Panics if called on a token without a correctness flag.
    pub fn mark_incorrect(&mut self) {
        match self {
            Self::Doctype { correct, .. } | Self::ProcessingInstruction { correct, .. } => {
                *correct = false;
            }
            _ => panic!("mark_incorrect called on a token without a correctness flag"),
        }
    }

    /// Append a scalar to the processing instruction's target.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-PI token, indicating a tokenizer bug.
    pub fn append_to_pi_target(&mut self, c: char) {
        match self {
            Self::ProcessingInstruction { target, .. } => target.push(c),
            _ => panic!("append_to_pi_target called on non-PI token"),
        }
    }

    /// Append a string to the processing instruction's data.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-PI token, indicating a tokenizer bug.
    pub fn append_to_pi_data(&mut self, s: &str) {
        match self {
            Self::ProcessingInstruction { data, .. } => data.push_str(s),
            _ => panic!("append_to_pi_data called on non-PI token"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag {
                name,
                attributes,
                self_closing,
                ..
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name, .. } => write!(f, "</{name}>"),
            Self::Characters { data, .. } => write!(f, "Characters({data})"),
            Self::SpaceCharacters { data, .. } => {
                write!(f, "SpaceCharacters({})", data.escape_debug())
            }
            Self::Comment { data, .. } => write!(f, "<!--{data}-->"),
            Self::Doctype {
                name,
                public_id,
                system_id,
                correct,
                ..
            } => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = name {
                    write!(f, " {n}")?;
                }
                if let Some(p) = public_id {
                    write!(f, " PUBLIC \"{p}\"")?;
                }
                if let Some(s) = system_id {
                    write!(f, " SYSTEM \"{s}\"")?;
                }
                if !correct {
                    write!(f, " (incorrect)")?;
                }
                Ok(())
            }
            Self::ProcessingInstruction { target, data, .. } => {
                write!(f, "<?{target} {data}?>")
            }
            Self::ParseError { code, .. } => write!(f, "ParseError({code})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_attribute_detection() {
        let mut tag = Token::new_start_tag();
        tag.start_new_attribute();
        tag.append_to_current_attribute_name('i');
        tag.append_to_current_attribute_name('d');
        assert!(!tag.current_attribute_name_is_duplicate());
        tag.start_new_attribute();
        tag.append_to_current_attribute_name('i');
        tag.append_to_current_attribute_name('d');
        assert!(tag.current_attribute_name_is_duplicate());
    }

    #[test]
    fn test_doctype_starts_correct_with_missing_identifiers() {
        let token = Token::new_doctype();
        assert!(matches!(
            token,
            Token::Doctype {
                name: None,
                public_id: None,
                system_id: None,
                correct: true,
                span: None,
            }
        ));
    }

    #[test]
    fn test_display_forms() {
        let mut tag = Token::new_start_tag();
        tag.append_to_tag_name('b');
        tag.append_to_tag_name('r');
        assert_eq!(tag.to_string(), "<br>");

        let mut comment = Token::new_comment();
        comment.append_to_comment("hi");
        assert_eq!(comment.to_string(), "<!--hi-->");
    }
}
