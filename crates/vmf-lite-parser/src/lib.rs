// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! VMF-Lite Parser - Line-oriented VMF parser
//!
//! This crate reads Valve Map Format text into the class tree defined in
//! `vmf-lite-model`. It implements the [`VmfParser`] trait.
//!
//! # Features
//!
//! - **Fast line scanning** using `memchr`
//! - **Typed properties** - vectors, planes and texture axes are recognized
//!   from their text using `nom` combinators and `lexical-core`
//! - **Lenient numbers** - a bad numeric literal becomes `0` and is reported as
//!   a diagnostic instead of aborting the document
//! - **Hidden-class collapsing** for geometry processing
//!
//! # Example
//!
//! ```ignore
//! use vmf_lite_parser::TextParser;
//! use vmf_lite_model::{ClassQuery, VmfParser};
//!
//! let parser = TextParser::new().with_collapse_hidden(true);
//! let document = parser.parse(vmf_content)?;
//!
//! let solids = document.find_classes("solid", true);
//! println!("Found {} solids", solids.len());
//! ```

mod collapse;
mod printer;
mod reader;
mod scanner;
mod tokenizer;

pub use collapse::collapse_hidden;
pub use printer::{print_document, PrettyPrinter};
pub use reader::ClassReader;
pub use scanner::{LineSource, ReadLines, StrLines};
pub use tokenizer::{infer_value, parse_property, split_property, RawProperty};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use vmf_lite_model::{Document, ParseError, Result, VmfParser};

/// Main VMF parser implementing `VmfParser` trait
#[derive(Clone, Copy, Debug, Default)]
pub struct TextParser {
    /// Whether to replace `hidden` classes by their children after reading
    pub collapse_hidden: bool,
}

impl TextParser {
    /// Create a parser that keeps `hidden` classes
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to collapse `hidden` classes
    pub fn with_collapse_hidden(mut self, enabled: bool) -> Self {
        self.collapse_hidden = enabled;
        self
    }

    fn read<S: LineSource>(&self, source: S) -> Result<Document> {
        let document = ClassReader::new(source).read_document()?;
        if self.collapse_hidden {
            collapse_hidden(document)
        } else {
            Ok(document)
        }
    }

    /// Open and parse a VMF file
    ///
    /// A missing or unreadable file is reported as [`ParseError::Io`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Document> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        self.parse_reader(&mut reader)
    }
}

impl VmfParser for TextParser {
    fn parse(&self, content: &str) -> Result<Document> {
        self.read(StrLines::new(content))
    }

    fn parse_reader(&self, reader: &mut dyn BufRead) -> Result<Document> {
        self.read(ReadLines::new(reader))
    }
}

/// Quick parse function for simple use cases
pub fn parse(content: &str) -> Result<Document> {
    TextParser::new().parse(content)
}

/// Parse from any buffered reader
pub fn parse_reader(reader: &mut dyn BufRead) -> Result<Document> {
    TextParser::new().parse_reader(reader)
}

/// Parse a file from disk
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    TextParser::new().parse_file(path)
}

/// Render a document as pretty JSON (for debugging and diffing)
pub fn to_json(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|e| ParseError::Json(e.to_string()))
}
