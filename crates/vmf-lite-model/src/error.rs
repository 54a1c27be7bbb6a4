// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for VMF parsing operations

use thiserror::Error;

/// Result type alias for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while reading a VMF document
///
/// Recoverable value problems (a numeric literal that does not parse) are not
/// errors; they are recorded as [`crate::Diagnostic`]s on the document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended while a class was still open
    #[error("Unexpected end of input in class '{class}' (opened at line {line})")]
    UnexpectedEof { class: String, line: usize },

    /// A bracketed or parenthesized value had an unsupported shape
    #[error("Invalid value for '{key}' at line {line}: {message}")]
    InvalidValue {
        line: usize,
        key: String,
        message: String,
    },

    /// Hidden-class collapsing needs a `world` class
    #[error("Document has no 'world' class")]
    MissingWorld,

    /// Hidden-class collapsing needs exactly one `world` class
    #[error("Document has {0} 'world' classes, expected exactly one")]
    MultipleWorlds(usize),

    /// Debug serialization failed
    #[error("JSON error: {0}")]
    Json(String),
}

impl ParseError {
    /// Create an end-of-input error for a class opened at `line`
    pub fn eof(class: impl Into<String>, line: usize) -> Self {
        ParseError::UnexpectedEof {
            class: class.into(),
            line,
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(line: usize, key: impl Into<String>, msg: impl Into<String>) -> Self {
        ParseError::InvalidValue {
            line,
            key: key.into(),
            message: msg.into(),
        }
    }

    /// Whether this error came from the I/O layer rather than the content
    pub fn is_io(&self) -> bool {
        matches!(self, ParseError::Io(_))
    }
}
