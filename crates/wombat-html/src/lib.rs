//! Streaming HTML5 tokenizer for the Wombat browser engine.
//!
//! # Scope
//!
//! This crate implements the tokenization stage of the
//! [WHATWG HTML parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
//! a pull-based state machine that turns a byte or text input into a
//! sequence of tokens (start tag, end tag, character, space-character,
//! comment, doctype, processing instruction, parse error).
//!
//! - **Input stream** with byte decoding (UTF-8, Windows-1252), an optional
//!   one-shot `<meta charset>` preview, newline normalization, LIFO unget,
//!   and line/column accounting
//! - **Character references**, named (longest match, legacy semicolon-less
//!   forms) and numeric (with the Windows-1252 replacement table)
//! - **Parse errors as tokens**, interleaved with content in source order
//! - **Source spans**, optional, with the guarantee that the content
//!   tokens' spans tile the input exactly
//!
//! Tree construction, DOM building, and serialization live elsewhere; the
//! tree stage drives this crate through the iterator and feeds back the
//! content-model state and the CDATA gate between advances.
//!
//! # Example
//!
//! ```
//! use wombat_html::{HTMLTokenizer, Token, TokenizerOptions};
//!
//! let tokens: Vec<Token> =
//!     HTMLTokenizer::from_str("<p>Hi</p>", TokenizerOptions::default()).collect();
//! assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "p"));
//! assert!(matches!(&tokens[1], Token::Characters { data, .. } if data == "Hi"));
//! assert!(matches!(&tokens[2], Token::EndTag { name, .. } if name == "p"));
//! ```

/// The decoding input stream feeding the tokenizer.
pub mod stream;
/// The tokenizer state machine, tokens, and error vocabulary.
pub mod tokenizer;

pub use stream::{Encoding, FileInfo, InputStream, StreamError, UnknownEncodingLabel};
pub use tokenizer::{
    Attribute, ErrorDetail, HTMLTokenizer, ParseErrorCode, SourceSpan, Token,
    TokenizerOptions, TokenizerState,
};
