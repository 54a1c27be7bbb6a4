// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic class tree
//!
//! A VMF document is a list of named classes. Each class holds an ordered list
//! of key/value properties (keys may repeat) and an ordered list of nested
//! classes. The tree is owned by value: every class owns its children.

use crate::{ClassQuery, PropertyFilter, TypedValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `"key" "value"` pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: TypedValue,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Named class with properties and nested classes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericClass {
    /// Class name as written in the file (`world`, `solid`, `side`, ...)
    pub name: String,
    /// Properties in file order
    pub properties: Vec<Property>,
    /// Nested classes in file order
    pub children: Vec<GenericClass>,
}

impl GenericClass {
    /// Create an empty class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: append a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.properties.push(Property::new(key, value));
        self
    }

    /// Builder: append a nested class
    pub fn with_child(mut self, child: GenericClass) -> Self {
        self.children.push(child);
        self
    }

    /// First value stored under `key`
    pub fn property(&self, key: &str) -> Option<&TypedValue> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    /// All properties stored under `key`, in file order
    pub fn find_property(&self, key: &str) -> Vec<&Property> {
        self.properties.iter().filter(|p| p.key == key).collect()
    }

    /// First direct child named `name`
    pub fn child(&self, name: &str) -> Option<&GenericClass> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Check if this class is named `name`
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

impl fmt::Display for GenericClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} properties, {} children)",
            self.name,
            self.properties.len(),
            self.children.len()
        )
    }
}

/// A value that failed to parse and was replaced by a default
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line number of the property
    pub line: usize,
    /// Property key
    pub key: String,
    /// The literal that could not be parsed
    pub literal: String,
    /// What was substituted and why
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: '{}' = '{}': {}",
            self.line, self.key, self.literal, self.message
        )
    }
}

/// Parsed VMF document: the ordered top-level classes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level classes in file order
    pub classes: Vec<GenericClass>,
    /// Value recoveries made while parsing
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Create a document from top-level classes
    pub fn new(classes: Vec<GenericClass>) -> Self {
        Self {
            classes,
            diagnostics: Vec::new(),
        }
    }

    /// Number of top-level classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the document has no classes
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over top-level classes
    pub fn iter(&self) -> std::slice::Iter<'_, GenericClass> {
        self.classes.iter()
    }

    /// Top-level classes whose subtree contains a matching property
    pub fn classes_with_property(&self, filter: PropertyFilter<'_>) -> Vec<&GenericClass> {
        self.classes
            .iter()
            .filter(|c| c.has_property(filter, true))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a GenericClass;
    type IntoIter = std::slice::Iter<'a, GenericClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.iter()
    }
}
