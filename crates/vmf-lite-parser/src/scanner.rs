// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line sources for the class reader
//!
//! The reader consumes VMF text strictly one line at a time. Lines are handed
//! out without their terminator (`\n` or `\r\n`) and with a 1-based line
//! counter for error reporting.
//!
//! Bytes that are not valid UTF-8 are replaced with U+FFFD rather than failing
//! the read, and each affected line is reported as a [`Diagnostic`].

use log::warn;
use memchr::memchr;
use std::borrow::Cow;
use std::io::BufRead;
use vmf_lite_model::{Diagnostic, Result};

const BOM: char = '\u{feff}';

/// Sequential source of text lines
pub trait LineSource {
    /// Next line without its terminator, with its 1-based line number, or
    /// `None` at end of input
    fn next_line(&mut self) -> Result<Option<(usize, &str)>>;

    /// The line most recently returned (empty before the first call)
    fn current_line(&self) -> &str;

    /// 1-based number of the line most recently returned
    fn line_number(&self) -> usize;

    /// Hand over decoding problems found so far
    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Line scanner over in-memory text
///
/// Uses memchr for SIMD-accelerated newline search.
pub struct StrLines<'a> {
    content: &'a str,
    current: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> StrLines<'a> {
    /// Create a new scanner for the given content
    pub fn new(content: &'a str) -> Self {
        let content = content.strip_prefix(BOM).unwrap_or(content);
        Self {
            content,
            current: "",
            pos: 0,
            line: 0,
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.content.len().saturating_sub(self.pos)
    }
}

impl LineSource for StrLines<'_> {
    fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        if self.pos >= self.content.len() {
            return Ok(None);
        }

        let bytes = &self.content.as_bytes()[self.pos..];
        let end = match memchr(b'\n', bytes) {
            Some(offset) => self.pos + offset,
            None => self.content.len(),
        };

        let line = &self.content[self.pos..end];
        self.current = line.strip_suffix('\r').unwrap_or(line);
        self.pos = end + 1;
        self.line += 1;

        Ok(Some((self.line, self.current)))
    }

    fn current_line(&self) -> &str {
        self.current
    }

    fn line_number(&self) -> usize {
        self.line
    }
}

/// Line source over any buffered reader
pub struct ReadLines<R> {
    reader: R,
    bytes: Vec<u8>,
    buf: String,
    line: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<R: BufRead> ReadLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bytes: Vec::new(),
            buf: String::new(),
            line: 0,
            diagnostics: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for ReadLines<R> {
    fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.bytes.clear();
        if self.reader.read_until(b'\n', &mut self.bytes)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        self.buf.clear();
        match String::from_utf8_lossy(&self.bytes) {
            Cow::Borrowed(text) => self.buf.push_str(text),
            Cow::Owned(text) => {
                warn!("line {}: invalid UTF-8 replaced", self.line);
                self.diagnostics.push(Diagnostic {
                    line: self.line,
                    key: String::new(),
                    literal: text.trim_end().to_string(),
                    message: "invalid UTF-8 replaced with U+FFFD".to_string(),
                });
                self.buf = text;
            }
        }

        Ok(Some((self.line, self.current_line())))
    }

    fn current_line(&self) -> &str {
        let mut line = self.buf.as_str();
        if self.line == 1 {
            line = line.strip_prefix(BOM).unwrap_or(line);
        }
        line = line.strip_suffix('\n').unwrap_or(line);
        line.strip_suffix('\r').unwrap_or(line)
    }

    fn line_number(&self) -> usize {
        self.line
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(source: &mut dyn LineSource) -> Vec<(usize, String)> {
        let mut lines = Vec::new();
        while let Some((number, line)) = source.next_line().unwrap() {
            lines.push((number, line.to_string()));
        }
        lines
    }

    #[test]
    fn test_str_lines_handles_crlf_and_missing_final_newline() {
        let mut source = StrLines::new("world\r\n{\n}");
        assert_eq!(
            collect(&mut source),
            vec![
                (1, "world".to_string()),
                (2, "{".to_string()),
                (3, "}".to_string())
            ]
        );
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_str_lines_trailing_newline_is_not_a_line() {
        let mut source = StrLines::new("a\nb\n");
        assert_eq!(collect(&mut source).len(), 2);
    }

    #[test]
    fn test_str_lines_strips_bom() {
        let mut source = StrLines::new("\u{feff}versioninfo\n");
        assert_eq!(source.next_line().unwrap(), Some((1, "versioninfo")));
        assert_eq!(source.current_line(), "versioninfo");
    }

    #[test]
    fn test_read_lines_matches_str_lines() {
        let text = "\u{feff}world\r\n{\n\t\"id\" \"1\"\n}\n";
        let mut from_reader = ReadLines::new(Cursor::new(text));
        let mut from_str = StrLines::new(text);
        assert_eq!(collect(&mut from_reader), collect(&mut from_str));
    }

    #[test]
    fn test_read_lines_invalid_utf8() {
        let bytes: &[u8] = b"world\n{\n\t\"comments\" \"caf\xE9\"\n}\n";
        let mut source = ReadLines::new(bytes);
        let lines = collect(&mut source);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], (3, "\t\"comments\" \"caf\u{fffd}\"".to_string()));

        let diagnostics = source.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
        assert!(source.take_diagnostics().is_empty());
    }
}
