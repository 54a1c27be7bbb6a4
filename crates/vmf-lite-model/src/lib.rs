// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! VMF-Lite Model - Value types, class tree and query traits
//!
//! This crate provides the core abstractions for working with Valve Map Format
//! (VMF) documents. A VMF file is a brace-delimited tree of named classes, each
//! holding quoted key/value properties and nested classes. The crate defines the
//! typed representation of that tree without committing to a parser backend.
//!
//! # Architecture
//!
//! - [`TypedValue`] - Closed set of property value kinds (string, integer,
//!   float, vectors, planes, texture axes)
//! - [`GenericClass`] / [`Document`] - Owned class tree produced by a parser
//! - [`ClassQuery`] - Read-only search over a class tree
//! - [`VmfParser`] - Entry point implemented by parser backends
//!
//! # Example
//!
//! ```ignore
//! use vmf_lite_model::{ClassQuery, VmfParser};
//!
//! let parser: Box<dyn VmfParser> = get_parser();
//! let document = parser.parse(vmf_content)?;
//!
//! for solid in document.find_classes("solid", true) {
//!     println!("solid {:?}", solid.property("id"));
//! }
//! ```

pub mod class;
pub mod error;
pub mod query;
pub mod traits;
pub mod types;

// Re-export all public types
pub use class::*;
pub use error::*;
pub use query::*;
pub use traits::*;
pub use types::*;
