// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only search over a class tree

use crate::{Document, GenericClass, Property, TypedValue};

/// What a property search matches on
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyFilter<'a> {
    /// Any property with this key
    Key(&'a str),
    /// Any property whose typed value equals this one
    Value(&'a TypedValue),
    /// A property with this key and value
    KeyValue(&'a str, &'a TypedValue),
}

impl PropertyFilter<'_> {
    /// Check a single property against the filter
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            PropertyFilter::Key(key) => property.key == *key,
            PropertyFilter::Value(value) => property.value == **value,
            PropertyFilter::KeyValue(key, value) => {
                property.key == *key && property.value == **value
            }
        }
    }
}

/// Class and property search
///
/// Implemented by [`GenericClass`] (searching its nested classes) and
/// [`Document`] (searching the top-level classes). All searches are depth-first
/// in file order and never mutate the tree.
///
/// # Example
///
/// ```ignore
/// use vmf_lite_model::{ClassQuery, PropertyFilter};
///
/// let world = &document.find_classes("world", false)[0];
/// let brushes = world.find_classes("solid", true);
/// let has_detail = document.has_property(PropertyFilter::Key("classname"), true);
/// ```
pub trait ClassQuery {
    /// Classes directly below this node
    fn child_classes(&self) -> &[GenericClass];

    /// Properties held by this node itself
    fn own_properties(&self) -> &[Property];

    /// All classes named `name`
    ///
    /// With `recursive` the whole subtree is searched depth-first; otherwise
    /// only direct children are considered. Results are in encounter order.
    fn find_classes(&self, name: &str, recursive: bool) -> Vec<&GenericClass> {
        let mut matches = Vec::new();
        collect_classes(self.child_classes(), name, recursive, &mut matches);
        matches
    }

    /// Check whether a class named `name` exists below this node
    fn has_class(&self, name: &str, recursive: bool) -> bool {
        self.child_classes()
            .iter()
            .any(|c| c.name == name || (recursive && c.has_class(name, true)))
    }

    /// Check whether a matching property exists on this node or, with
    /// `recursive`, anywhere below it
    fn has_property(&self, filter: PropertyFilter<'_>, recursive: bool) -> bool {
        if self.own_properties().iter().any(|p| filter.matches(p)) {
            return true;
        }
        recursive
            && self
                .child_classes()
                .iter()
                .any(|c| c.has_property(filter, true))
    }
}

fn collect_classes<'a>(
    classes: &'a [GenericClass],
    name: &str,
    recursive: bool,
    out: &mut Vec<&'a GenericClass>,
) {
    for class in classes {
        if class.name == name {
            out.push(class);
        }
        if recursive {
            collect_classes(&class.children, name, true, out);
        }
    }
}

impl ClassQuery for GenericClass {
    fn child_classes(&self) -> &[GenericClass] {
        &self.children
    }

    fn own_properties(&self) -> &[Property] {
        &self.properties
    }
}

impl ClassQuery for Document {
    fn child_classes(&self) -> &[GenericClass] {
        &self.classes
    }

    fn own_properties(&self) -> &[Property] {
        &[]
    }

    /// A document has no properties of its own; the top-level classes are
    /// always searched and `recursive` controls whether their subtrees are too.
    fn has_property(&self, filter: PropertyFilter<'_>, recursive: bool) -> bool {
        self.classes.iter().any(|c| c.has_property(filter, recursive))
    }
}
