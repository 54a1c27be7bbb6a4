// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for solid reconstruction

use thiserror::Error;

/// Geometry processing result type
pub type Result<T> = std::result::Result<T, Error>;

/// Solid reconstruction errors
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// A class of the wrong name was handed to a conversion
    #[error("Expected '{expected}' class, found '{found}'")]
    UnexpectedClass { expected: String, found: String },

    /// A required nested class is absent
    #[error("'{parent}' has no '{class}' class")]
    MissingClass { parent: String, class: String },

    /// A required property is absent
    #[error("'{class}' is missing property '{key}'")]
    MissingProperty { class: String, key: String },

    /// A property holds a value of an unusable kind
    #[error("'{class}' property '{key}' is {actual}, expected {expected}")]
    TypeMismatch {
        class: String,
        key: String,
        expected: String,
        actual: String,
    },

    /// Vertex extraction was cancelled by the caller
    #[error("Vertex extraction cancelled")]
    Cancelled,
}

impl Error {
    /// Create an unexpected class error
    pub fn unexpected_class(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::UnexpectedClass {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a missing class error
    pub fn missing_class(parent: impl Into<String>, class: impl Into<String>) -> Self {
        Error::MissingClass {
            parent: parent.into(),
            class: class.into(),
        }
    }

    /// Create a missing property error
    pub fn missing_property(class: impl Into<String>, key: impl Into<String>) -> Self {
        Error::MissingProperty {
            class: class.into(),
            key: key.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        class: impl Into<String>,
        key: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            class: class.into(),
            key: key.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
