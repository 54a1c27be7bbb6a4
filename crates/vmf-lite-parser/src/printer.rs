// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pretty-printer rendering a class tree back to VMF text
//!
//! Output follows the input layout (class name, braces, quoted pairs,
//! indentation by depth). Values are rendered in their source notation, but
//! numeric formatting may differ from the original file.
//!
//! A three-component vector read from `[x y z]` is printed as `(x y z)`; the
//! value is not tagged with its bracket kind. Both forms read back as the same
//! [`TypedValue::Vector3`](vmf_lite_model::TypedValue::Vector3), so only a
//! textual diff sees the change.

use std::fmt::{self, Write};
use vmf_lite_model::{Document, GenericClass};

/// Renders documents and classes as VMF text
#[derive(Clone, Debug)]
pub struct PrettyPrinter {
    indent: String,
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

impl PrettyPrinter {
    /// Printer indenting with one tab per level
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the string written once per nesting level
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Render a whole document
    pub fn document(&self, document: &Document) -> String {
        let mut out = String::new();
        for class in &document.classes {
            // Writing into a String cannot fail
            let _ = self.write_class(&mut out, class, 0);
        }
        out
    }

    /// Render one class and its subtree
    pub fn class(&self, class: &GenericClass) -> String {
        let mut out = String::new();
        let _ = self.write_class(&mut out, class, 0);
        out
    }

    /// Write a class at the given depth
    pub fn write_class<W: Write>(
        &self,
        out: &mut W,
        class: &GenericClass,
        depth: usize,
    ) -> fmt::Result {
        let pad = self.indent.repeat(depth);
        let inner = self.indent.repeat(depth + 1);

        writeln!(out, "{}{}", pad, class.name)?;
        writeln!(out, "{}{{", pad)?;
        for property in &class.properties {
            writeln!(out, "{}\"{}\" \"{}\"", inner, property.key, property.value)?;
        }
        for child in &class.children {
            self.write_class(out, child, depth + 1)?;
        }
        writeln!(out, "{}}}", pad)
    }
}

/// Render a document with the default printer
pub fn print_document(document: &Document) -> String {
    PrettyPrinter::new().document(document)
}
