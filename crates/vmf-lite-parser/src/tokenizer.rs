// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property line tokenizer using nom combinators
//!
//! Turns one `"key" "value"` line into a [`Property`] whose value kind is
//! inferred from the text, first match wins:
//!
//! 1. `(...)` - 3 numbers make a vector, 9 numbers make a plane
//! 2. `[...]` - 2 numbers make a 2D vector, 3 a vector, 5 a texture axis
//!    (`[x y z shift] scale`)
//! 3. `-?digits.digits` - float
//! 4. `-?digits` - 32-bit integer
//! 5. anything else - string
//!
//! Numbers that fail to parse become `0` and leave a [`Diagnostic`] behind
//! instead of failing the document. Lists of the wrong length are errors.

use log::warn;
use nom::{
    bytes::complete::take_till,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, opt, recognize},
    sequence::{delimited, separated_pair},
    IResult, Parser,
};
use std::borrow::Cow;
use vmf_lite_model::{
    Diagnostic, ParseError, Plane, Property, Result, TypedValue, UvAxis, Vec2, Vec3, Vec4,
};

/// Key and value text of a property line, quotes removed
#[derive(Clone, Debug, PartialEq)]
pub struct RawProperty<'a> {
    pub key: Cow<'a, str>,
    pub value: Cow<'a, str>,
    /// Text left after the closing quote of the value, if any
    pub trailing: Option<&'a str>,
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Parse a quoted string ("text", no escapes)
fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c: char| c == '"'), char('"')).parse(input)
}

/// Parse `"key" "value"`
fn quoted_pair(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(quoted, multispace0, quoted).parse(input)
}

/// Recognize a number with a fractional part
fn float_literal(input: &str) -> IResult<&str, &str> {
    recognize((opt(char('-')), digit1, char('.'), digit1)).parse(input)
}

/// Recognize a whole number
fn integer_literal(input: &str) -> IResult<&str, &str> {
    recognize((opt(char('-')), digit1)).parse(input)
}

fn is_float(text: &str) -> bool {
    all_consuming(float_literal).parse(text).is_ok()
}

fn is_integer(text: &str) -> bool {
    all_consuming(integer_literal).parse(text).is_ok()
}

// ============================================================================
// Line Splitting
// ============================================================================

/// Split a line into key and value
///
/// Quoted pairs are taken as-is, which keeps empty values (`"key" ""`).
/// Values cannot contain quotes; anything after the value's closing quote is
/// returned in `trailing`. Otherwise quote characters are stripped and the
/// text is split at the first whitespace. Returns `None` when there are fewer
/// than two tokens, which is the case for class names and braces.
pub fn split_property(line: &str) -> Option<RawProperty<'_>> {
    let line = line.trim();

    if let Ok((rest, (key, value))) = quoted_pair(line) {
        let rest = rest.trim();
        return Some(RawProperty {
            key: Cow::Borrowed(key),
            value: Cow::Borrowed(value),
            trailing: (!rest.is_empty()).then_some(rest),
        });
    }

    let stripped: String = line.chars().filter(|&c| c != '"').collect();
    let (key, value) = stripped.trim().split_once(char::is_whitespace)?;
    if key.is_empty() {
        return None;
    }
    Some(RawProperty {
        key: Cow::Owned(key.to_string()),
        value: Cow::Owned(value.to_string()),
        trailing: None,
    })
}

// ============================================================================
// Type Inference
// ============================================================================

/// Where a value came from, for diagnostics
struct ValueContext<'a> {
    key: &'a str,
    line: usize,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl ValueContext<'_> {
    fn recover(&mut self, literal: &str, message: &str) {
        warn!(
            "line {}: could not parse '{}' in '{}', {}",
            self.line, literal, self.key, message
        );
        self.diagnostics.push(Diagnostic {
            line: self.line,
            key: self.key.to_string(),
            literal: literal.to_string(),
            message: message.to_string(),
        });
    }

    fn float(&mut self, token: &str) -> f64 {
        match lexical_core::parse::<f64>(token.as_bytes()) {
            Ok(v) => v,
            Err(_) => {
                self.recover(token, "defaulting to 0");
                0.0
            }
        }
    }

    fn integer(&mut self, token: &str) -> i32 {
        match lexical_core::parse::<i32>(token.as_bytes()) {
            Ok(v) => v,
            Err(_) => {
                self.recover(token, "out of 32-bit range, defaulting to 0");
                0
            }
        }
    }

    fn vec3(&mut self, tokens: &[&str]) -> Vec3 {
        Vec3::new(
            self.float(tokens[0]),
            self.float(tokens[1]),
            self.float(tokens[2]),
        )
    }

    fn arity_error(&self, expected: &str, found: usize) -> ParseError {
        ParseError::invalid_value(
            self.line,
            self.key,
            format!("expected {} components, found {}", expected, found),
        )
    }
}

/// Numeric tokens of a bracketed or parenthesized list
fn list_tokens(text: &str, open: char, close: char) -> Vec<&str> {
    text.split(|c: char| c == open || c == close || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Infer the typed value of a property
///
/// # Arguments
/// * `raw` - Value text with quotes removed
/// * `key` - Property key (for diagnostics)
/// * `line` - 1-based line number (for diagnostics)
/// * `diagnostics` - Receives one entry per recovered number
pub fn infer_value(
    raw: &str,
    key: &str,
    line: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<TypedValue> {
    let mut ctx = ValueContext {
        key,
        line,
        diagnostics,
    };
    let text = raw.trim();

    if text.starts_with('(') {
        let tokens = list_tokens(text, '(', ')');
        return match tokens.len() {
            3 => Ok(TypedValue::Vector3(ctx.vec3(&tokens))),
            9 => Ok(TypedValue::Plane(Plane::new(
                ctx.vec3(&tokens[0..3]),
                ctx.vec3(&tokens[3..6]),
                ctx.vec3(&tokens[6..9]),
            ))),
            n => Err(ctx.arity_error("3 or 9", n)),
        };
    }

    if text.starts_with('[') {
        let tokens = list_tokens(text, '[', ']');
        return match tokens.len() {
            2 => Ok(TypedValue::Vector2(Vec2::new(
                ctx.float(tokens[0]),
                ctx.float(tokens[1]),
            ))),
            3 => Ok(TypedValue::Vector3(ctx.vec3(&tokens))),
            5 => {
                let axis = Vec4::new(
                    ctx.float(tokens[0]),
                    ctx.float(tokens[1]),
                    ctx.float(tokens[2]),
                    ctx.float(tokens[3]),
                );
                Ok(TypedValue::Uv(UvAxis::new(axis, ctx.float(tokens[4]))))
            }
            n => Err(ctx.arity_error("2, 3 or 5", n)),
        };
    }

    if is_float(text) {
        return Ok(TypedValue::Float(ctx.float(text)));
    }

    if is_integer(text) {
        return Ok(TypedValue::Integer(ctx.integer(text)));
    }

    Ok(TypedValue::String(raw.to_string()))
}

/// Parse a complete property line
///
/// Returns `Ok(None)` if the line is not a property (a class name or a brace).
pub fn parse_property(
    line: &str,
    line_number: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<Property>> {
    let Some(raw) = split_property(line) else {
        return Ok(None);
    };
    if let Some(trailing) = raw.trailing {
        warn!(
            "line {}: text after value of '{}' ignored: {}",
            line_number, raw.key, trailing
        );
        diagnostics.push(Diagnostic {
            line: line_number,
            key: raw.key.to_string(),
            literal: trailing.to_string(),
            message: "text after closing quote ignored".to_string(),
        });
    }
    let value = infer_value(&raw.value, &raw.key, line_number, diagnostics)?;
    Ok(Some(Property {
        key: raw.key.into_owned(),
        value,
    }))
}
