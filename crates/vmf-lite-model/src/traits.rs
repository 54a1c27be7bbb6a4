// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits for VMF parsing

use crate::{Document, Result};
use std::io::BufRead;

/// Main parsing interface - entry point for parsing VMF content
///
/// Implementations turn VMF text into an owned [`Document`]. Each call owns
/// its tree exclusively; nothing is shared between documents.
///
/// # Example
///
/// ```ignore
/// use vmf_lite_model::{ClassQuery, VmfParser};
///
/// let parser: Box<dyn VmfParser> = get_parser();
/// let document = parser.parse(vmf_content)?;
/// println!("{} solids", document.find_classes("solid", true).len());
/// ```
pub trait VmfParser: Send + Sync {
    /// Parse VMF content held in memory
    ///
    /// # Arguments
    /// * `content` - The VMF file content as a string
    ///
    /// # Returns
    /// The parsed document, or a `ParseError` on malformed input
    fn parse(&self, content: &str) -> Result<Document>;

    /// Parse VMF content from a buffered reader, line by line
    ///
    /// # Arguments
    /// * `reader` - Source of the VMF text
    ///
    /// # Returns
    /// The parsed document, or a `ParseError` on I/O failure or malformed input
    fn parse_reader(&self, reader: &mut dyn BufRead) -> Result<Document>;
}
