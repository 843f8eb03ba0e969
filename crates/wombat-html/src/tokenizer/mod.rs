//! HTML tokenizer module.
//!
//! Implements the tokenization stage of the WHATWG HTML parsing algorithm
//! ([§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)),
//! plus the processing-instruction and synthetic-end-tag extensions
//! described in the crate docs.

/// Character reference resolution.
pub mod character_reference;
/// Code point classifiers and numeric reference tables.
pub mod codepoints;
/// The tokenizer state machine and iterator facade.
pub mod core;
/// Parse-error codes and payloads.
pub mod errors;
/// Helper methods for emission, lookahead, and attribute bookkeeping.
pub mod helpers;
/// Named character reference lookup table.
pub mod named_character_references;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{HTMLTokenizer, TokenizerOptions, TokenizerState};
pub use self::errors::{ErrorDetail, ParseErrorCode};
pub use self::token::{Attribute, SourceSpan, Token};
