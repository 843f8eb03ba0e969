//! The tokenizer's input stream.
//!
//! Decodes bytes into a restartable stream of Unicode scalar values with
//! single-scalar lookahead, LIFO unget, run consumption (`chars_until`), and
//! line/column accounting. Decoding problems never abort: each bad sequence
//! becomes U+FFFD in the text plus a positioned entry in the stream's error
//! side-channel, which the tokenizer surfaces as `ParseError` tokens in
//! source order.
//!
//! Newlines are normalized while decoding: CRLF and a lone CR both become
//! LF, so every position the tokenizer sees is relative to the normalized
//! text.

use std::collections::VecDeque;

use thiserror::Error;

use crate::tokenizer::codepoints::replacement_character;
use crate::tokenizer::errors::{ErrorDetail, ParseErrorCode};
use crate::tokenizer::token::SourceSpan;

/// How far into the byte stream the `<meta charset>` preview looks.
const META_PRESCAN_BYTES: usize = 1024;

/// The encodings the stream can decode.
///
/// Windows-1252 doubles as the decoder for every Latin-1 family label, the
/// way browsers treat them. Nothing else is supported; the numeric character
/// reference replacement table already carries the 1252 repertoire this
/// needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Windows1252,
}

/// An encoding label the stream does not know how to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown encoding label '{0}'")]
pub struct UnknownEncodingLabel(pub String);

impl Encoding {
    /// Resolve a label the way consumers spell them, case-insensitively.
    pub fn for_label(label: &str) -> Result<Self, UnknownEncodingLabel> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "unicode-1-1-utf-8" => Ok(Self::Utf8),
            "windows-1252" | "cp1252" | "x-cp1252" | "iso-8859-1" | "iso8859-1"
            | "latin1" | "l1" | "ascii" | "us-ascii" => Ok(Self::Windows1252),
            _ => Err(UnknownEncodingLabel(label.to_owned())),
        }
    }

    /// The canonical name of this encoding.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Windows1252 => "windows-1252",
        }
    }
}

/// A decoding error waiting to be surfaced as a `ParseError` token.
///
/// `position` is the byte offset of the replacement scalar in the decoded,
/// normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamError {
    pub code: ParseErrorCode,
    pub detail: Option<ErrorDetail>,
    pub position: usize,
}

/// Decoded text plus the bookkeeping needed to render spans: the optional
/// file name and a table of line-start offsets.
#[derive(Debug)]
pub struct FileInfo {
    name: Option<String>,
    text: String,
    line_starts: Vec<usize>,
}

impl FileInfo {
    fn new(text: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            name: None,
            text,
            line_starts,
        }
    }

    /// The file name spans are labeled with, if one was configured.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The full decoded, newline-normalized text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text a span covers, or the empty string for an out-of-range span.
    #[must_use]
    pub fn slice(&self, span: &SourceSpan) -> &str {
        self.text.get(span.start..span.end).unwrap_or("")
    }

    /// Resolve a byte offset to a 1-based (line, column) pair. The column
    /// counts scalars, not bytes.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self
            .text
            .get(line_start..offset)
            .map_or(1, |prefix| prefix.chars().count() + 1);
        (line, column)
    }
}

/// An append-only sequence of scalar values with a read cursor.
///
/// The cursor can be pushed back one scalar at a time (`unget`); ungot
/// scalars are always the ones most recently consumed, so the stream keeps
/// positions exact by rewinding the cursor instead of keeping a side stack.
#[derive(Debug)]
pub struct InputStream {
    info: FileInfo,
    pos: usize,
    encoding: Encoding,
    errors: VecDeque<StreamError>,
}

impl InputStream {
    /// Build a stream over already-decoded text. Newlines are normalized;
    /// nothing else is touched.
    #[must_use]
    pub fn from_str(text: &str) -> Self {
        let mut normalized = String::with_capacity(text.len());
        let mut prev_cr = false;
        push_normalized(text, &mut normalized, &mut prev_cr);
        Self {
            info: FileInfo::new(normalized),
            pos: 0,
            encoding: Encoding::Utf8,
            errors: VecDeque::new(),
        }
    }

    /// Decode a byte stream.
    ///
    /// The encoding is chosen once, before any scalar is served: a UTF-8 BOM
    /// wins, then the explicitly declared encoding, then (when `parse_meta`)
    /// a `<meta charset>` found in the first kilobyte, then UTF-8. The choice
    /// is irrevocable.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], declared: Option<Encoding>, parse_meta: bool) -> Self {
        let (bytes, bom) = match bytes.strip_prefix(b"\xEF\xBB\xBF") {
            Some(rest) => (rest, true),
            None => (bytes, false),
        };
        let encoding = if bom {
            Encoding::Utf8
        } else {
            declared
                .or_else(|| if parse_meta { meta_charset(bytes) } else { None })
                .unwrap_or(Encoding::Utf8)
        };

        let mut errors = VecDeque::new();
        let text = match encoding {
            Encoding::Utf8 => decode_utf8(bytes, &mut errors),
            Encoding::Windows1252 => decode_windows1252(bytes),
        };
        Self {
            info: FileInfo::new(text),
            pos: 0,
            encoding,
            errors,
        }
    }

    /// The encoding the stream settled on.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Consume and return the next scalar, or `None` at end of input.
    pub fn consume(&mut self) -> Option<char> {
        let c = self.info.text[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Look at the next scalar without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.info.text[self.pos..].chars().next()
    }

    /// Push one scalar back onto the stream; the next `consume` returns it
    /// again. Ungetting `None` (a previously consumed end of input) is a
    /// no-op. Pushes are LIFO and must match what was consumed.
    pub fn unget(&mut self, c: Option<char>) {
        if let Some(c) = c {
            debug_assert!(
                self.info.text[..self.pos].ends_with(c),
                "unget of a scalar that was not the last one consumed"
            );
            self.pos -= c.len_utf8();
        }
    }

    /// Consume and return the run of scalars up to (but not including) the
    /// first one found in `stops`, or up to end of input.
    ///
    /// With `invert` the condition flips: the run consists of scalars that
    /// ARE in `stops`, ending at the first one that is not.
    pub fn chars_until(&mut self, stops: &[char], invert: bool) -> String {
        let rest = &self.info.text[self.pos..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| stops.contains(&c) != invert)
            .map_or(rest.len(), |(i, _)| i);
        let run = rest[..len].to_owned();
        self.pos += len;
        run
    }

    /// The cursor's byte offset into the normalized text.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The 1-based line number of the cursor.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.info.line_col(self.pos).0
    }

    /// Line table and decoded text, for span rendering.
    #[must_use]
    pub const fn file_info(&self) -> &FileInfo {
        &self.info
    }

    pub(crate) fn set_file_name(&mut self, name: Option<String>) {
        self.info.name = name;
    }

    /// Position of the oldest unreported decode error, if any.
    #[must_use]
    pub fn peek_error_position(&self) -> Option<usize> {
        self.errors.front().map(|e| e.position)
    }

    /// Take the oldest unreported decode error.
    pub fn pop_error(&mut self) -> Option<StreamError> {
        self.errors.pop_front()
    }
}

/// Append `chunk` to `out`, normalizing CRLF and lone CR to LF. `prev_cr`
/// carries the pending-CR flag across chunk boundaries.
fn push_normalized(chunk: &str, out: &mut String, prev_cr: &mut bool) {
    for c in chunk.chars() {
        match c {
            '\r' => {
                out.push('\n');
                *prev_cr = true;
            }
            '\n' => {
                if !*prev_cr {
                    out.push('\n');
                }
                *prev_cr = false;
            }
            _ => {
                out.push(c);
                *prev_cr = false;
            }
        }
    }
}

fn decode_utf8(bytes: &[u8], errors: &mut VecDeque<StreamError>) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut prev_cr = false;
    let mut rest = bytes;
    loop {
        match core::str::from_utf8(rest) {
            Ok(chunk) => {
                push_normalized(chunk, &mut out, &mut prev_cr);
                break;
            }
            Err(err) => {
                let (valid, bad) = rest.split_at(err.valid_up_to());
                push_normalized(
                    core::str::from_utf8(valid).unwrap_or_default(),
                    &mut out,
                    &mut prev_cr,
                );
                errors.push_back(StreamError {
                    code: ParseErrorCode::InvalidCodepoint,
                    detail: None,
                    position: out.len(),
                });
                out.push('\u{FFFD}');
                prev_cr = false;
                rest = &bad[err.error_len().unwrap_or(bad.len())..];
            }
        }
    }
    out
}

fn decode_windows1252(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut prev_cr = false;
    let mut buf = [0u8; 4];
    for &b in bytes {
        // 0x80..0x9F is the only range where 1252 and Latin-1 disagree; the
        // numeric-reference replacement table is exactly that mapping.
        let c = match b {
            0x80..=0x9F => replacement_character(u32::from(b)).unwrap_or(char::from(b)),
            _ => char::from(b),
        };
        push_normalized(c.encode_utf8(&mut buf), &mut out, &mut prev_cr);
    }
    out
}

/// Look for a `<meta charset=...>` (or the `http-equiv` content-type form)
/// in the first kilobyte of the byte stream. The scan is deliberately
/// shallow: it does not tokenize, it looks for `charset` inside each
/// `<meta ...>` run and reads the label after the `=`.
fn meta_charset(bytes: &[u8]) -> Option<Encoding> {
    let window = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let lower = window.to_ascii_lowercase();
    let mut i = 0;
    while let Some(found) = find(&lower[i..], b"<meta") {
        let start = i + found + b"<meta".len();
        let end = lower[start..]
            .iter()
            .position(|&b| b == b'>')
            .map_or(lower.len(), |p| start + p);
        if let Some(label) = charset_in_meta(&lower[start..end])
            && let Ok(encoding) = Encoding::for_label(&label)
        {
            return Some(encoding);
        }
        i = end;
    }
    None
}

fn charset_in_meta(tag: &[u8]) -> Option<String> {
    let pos = find(tag, b"charset")?;
    let mut rest = tag[pos + b"charset".len()..].trim_ascii_start();
    rest = rest.strip_prefix(b"=")?;
    rest = rest.trim_ascii_start();
    let value = match *rest.first()? {
        quote @ (b'"' | b'\'') => rest[1..].split(|&b| b == quote).next()?,
        _ => rest
            .split(|&b| b.is_ascii_whitespace() || b == b';' || b == b'/')
            .next()?,
    };
    Some(String::from_utf8_lossy(value).into_owned())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
