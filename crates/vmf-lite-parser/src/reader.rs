// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recursive descent class reader
//!
//! Each call to [`ClassReader::read_class`] handles one nesting level:
//!
//! 1. the class name line (unless the caller already consumed it)
//! 2. the opening brace line, discarded without validation
//! 3. body lines until a lone `}`: property lines are parsed, any other line
//!    that is not a brace starts a nested class
//!
//! Blank lines are skipped wherever they appear.

use crate::scanner::LineSource;
use crate::tokenizer::parse_property;
use log::{debug, trace, warn};
use vmf_lite_model::{Diagnostic, Document, GenericClass, ParseError, Result};

/// Reads a whole document from a line source
pub struct ClassReader<S> {
    source: S,
    diagnostics: Vec<Diagnostic>,
}

impl<S: LineSource> ClassReader<S> {
    /// Create a reader over the given lines
    pub fn new(source: S) -> Self {
        Self {
            source,
            diagnostics: Vec::new(),
        }
    }

    /// Read top-level classes until the input is exhausted
    pub fn read_document(mut self) -> Result<Document> {
        let mut classes = Vec::new();

        while let Some(class) = self.read_class()? {
            classes.push(class);
        }

        self.diagnostics.extend(self.source.take_diagnostics());
        self.diagnostics.sort_by_key(|d| d.line);

        debug!(
            "read {} top-level classes ({} diagnostics)",
            classes.len(),
            self.diagnostics.len()
        );

        Ok(Document {
            classes,
            diagnostics: self.diagnostics,
        })
    }

    /// Read the next class, taking its name from the input
    ///
    /// Returns `Ok(None)` when only blank lines remain.
    pub fn read_class(&mut self) -> Result<Option<GenericClass>> {
        let (opened_at, name) = match self.next_non_blank()? {
            Some((number, line)) => (number, line.trim().to_string()),
            None => return Ok(None),
        };
        self.read_named_class(name, opened_at).map(Some)
    }

    /// Read the brace and body of a class whose name is already known
    fn read_named_class(&mut self, name: String, opened_at: usize) -> Result<GenericClass> {
        trace!("class '{}' at line {}", name, opened_at);

        match self.next_non_blank()? {
            Some((_, line)) if line.trim() == "{" => {}
            Some((number, line)) => warn!(
                "line {}: expected '{{' after '{}', found '{}'",
                number,
                name,
                line.trim()
            ),
            None => return Err(ParseError::eof(name, opened_at)),
        }

        let mut class = GenericClass::new(name);

        loop {
            let (line_number, line) = match self.source.next_line()? {
                Some((number, line)) => (number, line.trim()),
                None => return Err(ParseError::eof(class.name, opened_at)),
            };

            if line == "}" {
                break;
            }
            if line.is_empty() || line == "{" {
                continue;
            }

            match parse_property(line, line_number, &mut self.diagnostics)? {
                Some(property) => class.properties.push(property),
                None => {
                    let child_name = line.to_string();
                    let child = self.read_named_class(child_name, line_number)?;
                    class.children.push(child);
                }
            }
        }

        Ok(class)
    }

    fn next_non_blank(&mut self) -> Result<Option<(usize, &str)>> {
        loop {
            let blank = match self.source.next_line()? {
                Some((_, line)) => line.trim().is_empty(),
                None => return Ok(None),
            };
            if !blank {
                return Ok(Some((
                    self.source.line_number(),
                    self.source.current_line(),
                )));
            }
        }
    }
}
