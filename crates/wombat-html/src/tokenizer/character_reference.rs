//! Character reference resolution.
//!
//! Invoked stand-alone from the entity-data states and from the attribute
//! value states (`process_entity_in_attribute`). The resolver consumes either
//! a numeric reference (`&#...;` / `&#x...;`) or the longest matching named
//! entity, reports any parse errors, and either appends the replacement to
//! the attribute being built or emits it as a character token.

use super::codepoints::{
    is_digit, is_disallowed_scalar, is_hex_digit, is_letter_or_digit, is_whitespace,
    replacement_character, ASCII_DIGITS, ASCII_HEX_DIGITS,
};
use super::core::HTMLTokenizer;
use super::errors::{ErrorDetail, ParseErrorCode};
use super::named_character_references::{entities_starting_with, lookup_entity};

impl HTMLTokenizer {
    /// Resolve one character reference; the `&` has already been consumed.
    ///
    /// `allowed_char` is the quote delimiting the attribute value (or `>`
    /// for unquoted values): seeing it next means the `&` was literal.
    /// With `from_attribute` the result is appended to the current
    /// attribute's value; otherwise it is emitted as a `SpaceCharacters`
    /// token if entirely whitespace and a `Characters` token otherwise.
    pub(super) fn consume_entity(&mut self, allowed_char: Option<char>, from_attribute: bool) {
        let next = self.stream.consume();
        let output = match next {
            None => String::from("&"),
            Some(c)
                if is_whitespace(c) || c == '<' || c == '&' || Some(c) == allowed_char =>
            {
                self.stream.unget(Some(c));
                String::from("&")
            }
            Some('#') => self.consume_numeric_entity(),
            Some(c) => self.consume_named_entity(c, from_attribute),
        };

        if from_attribute {
            if let Some(token) = self.current_token.as_mut() {
                token.append_str_to_current_attribute_value(&output);
            }
        } else if !output.is_empty() {
            if output.chars().all(is_whitespace) {
                self.emit_space_characters(&output);
            } else {
                self.emit_characters(&output);
            }
        }
    }

    /// An `&` seen inside an attribute value.
    pub(super) fn process_entity_in_attribute(&mut self, allowed_char: char) {
        self.consume_entity(Some(allowed_char), true);
    }

    /// A numeric reference; the `&#` has been consumed.
    fn consume_numeric_entity(&mut self) -> String {
        let mut radix_prefix = String::new();
        let mut next = self.stream.consume();
        if let Some(x @ ('x' | 'X')) = next {
            radix_prefix.push(x);
            next = self.stream.consume();
        }
        let hex = !radix_prefix.is_empty();
        let digit_set: &[char] = if hex { ASCII_HEX_DIGITS } else { ASCII_DIGITS };
        let is_valid_digit: fn(char) -> bool = if hex { is_hex_digit } else { is_digit };

        // No digit after the prefix: the whole thing was literal text.
        if !next.is_some_and(is_valid_digit) {
            self.parse_error(ParseErrorCode::ExpectedNumericEntity, None);
            self.stream.unget(next);
            return format!("&#{radix_prefix}");
        }

        self.stream.unget(next);
        let digits = self.stream.chars_until(digit_set, true);
        // Overflow can only mean "far beyond the last scalar value".
        let value = u32::from_str_radix(&digits, if hex { 16 } else { 10 })
            .unwrap_or(u32::MAX);

        let replacement = if let Some(c) = replacement_character(value) {
            self.parse_error(
                ParseErrorCode::IllegalCodepointForNumericEntity,
                Some(ErrorDetail::CodePoint(value)),
            );
            c
        } else if (0xD800..=0xDFFF).contains(&value) || value > 0x0010_FFFF {
            self.parse_error(
                ParseErrorCode::IllegalCodepointForNumericEntity,
                Some(ErrorDetail::CodePoint(value)),
            );
            '\u{FFFD}'
        } else {
            if is_disallowed_scalar(value) {
                self.parse_error(
                    ParseErrorCode::IllegalCodepointForNumericEntity,
                    Some(ErrorDetail::CodePoint(value)),
                );
            }
            // The reference still resolves, disallowed or not.
            char::from_u32(value).unwrap_or('\u{FFFD}')
        };

        let terminator = self.stream.consume();
        if terminator != Some(';') {
            self.parse_error(ParseErrorCode::NumericEntityWithoutSemicolon, None);
            self.stream.unget(terminator);
        }
        replacement.to_string()
    }

    /// A named reference; `first` is the scalar after the `&`.
    ///
    /// Grows a candidate string while the first-character bucket still has
    /// names extending it, then resolves the LONGEST prefix that names an
    /// entity (`&notin;` wins over `&not`). The scalar that emptied the
    /// bucket goes back to the stream.
    fn consume_named_entity(&mut self, first: char, from_attribute: bool) -> String {
        let mut candidate = String::from(first);
        let mut names: Vec<&'static str> = entities_starting_with(first).to_vec();
        let mut ended_at_eof = false;
        while !names.is_empty() {
            match self.stream.consume() {
                None => {
                    ended_at_eof = true;
                    break;
                }
                Some(c) => {
                    candidate.push(c);
                    names.retain(|name| name.starts_with(candidate.as_str()));
                }
            }
        }
        if !ended_at_eof {
            self.stream.unget(candidate.pop());
        }

        let matched = (1..=candidate.len())
            .rev()
            .filter(|&len| candidate.is_char_boundary(len))
            .find_map(|len| lookup_entity(&candidate[..len]).map(|value| (len, value)));

        let Some((match_len, value)) = matched else {
            self.parse_error(ParseErrorCode::ExpectedNamedEntity, None);
            return format!("&{candidate}");
        };

        let name = &candidate[..match_len];
        if !name.ends_with(';') {
            self.parse_error(ParseErrorCode::NamedEntityWithoutSemicolon, None);
            // Historical compatibility: `&notin=` in an attribute must stay
            // literal rather than resolving to a NOT SIGN followed by `in=`.
            if from_attribute {
                let following = candidate[match_len..]
                    .chars()
                    .next()
                    .or_else(|| self.stream.peek());
                if following.is_some_and(|c| is_letter_or_digit(c) || c == '=') {
                    return format!("&{candidate}");
                }
            }
        }
        format!("{value}{}", &candidate[match_len..])
    }
}
