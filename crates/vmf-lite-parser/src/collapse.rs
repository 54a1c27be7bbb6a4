// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hidden-class collapsing
//!
//! The editor wraps geometry hidden from its view in `hidden` classes. For
//! geometry processing they are transparent: collapsing replaces every
//! `hidden` class with its own children, spliced in at the position the
//! `hidden` class occupied. Nested `hidden` classes are flattened as well.

use log::debug;
use vmf_lite_model::{Document, GenericClass, ParseError, Result};

const HIDDEN: &str = "hidden";
const WORLD: &str = "world";

/// Collapse all `hidden` classes in the document
///
/// Requires exactly one top-level `world` class. Every other class keeps its
/// relative order; spliced children take the place of their `hidden` parent.
pub fn collapse_hidden(document: Document) -> Result<Document> {
    let worlds = document.classes.iter().filter(|c| c.name == WORLD).count();
    match worlds {
        0 => return Err(ParseError::MissingWorld),
        1 => {}
        n => return Err(ParseError::MultipleWorlds(n)),
    }

    let Document {
        classes,
        diagnostics,
    } = document;

    let mut collapsed = 0;
    let classes = splice_hidden(classes, &mut collapsed);
    debug!("collapsed {} hidden classes", collapsed);

    Ok(Document {
        classes,
        diagnostics,
    })
}

/// Build a new class list with `hidden` classes replaced by their children,
/// recursing into every class
fn splice_hidden(classes: Vec<GenericClass>, collapsed: &mut usize) -> Vec<GenericClass> {
    let mut out = Vec::with_capacity(classes.len());

    for mut class in classes {
        let children = std::mem::take(&mut class.children);
        let children = splice_hidden(children, collapsed);

        if class.name == HIDDEN {
            *collapsed += 1;
            out.extend(children);
        } else {
            class.children = children;
            out.push(class);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmf_lite_model::ClassQuery;

    fn solid(id: i32) -> GenericClass {
        GenericClass::new("solid").with_property("id", id)
    }

    fn names_and_ids(class: &GenericClass) -> Vec<(String, Option<i32>)> {
        class
            .children
            .iter()
            .map(|c| {
                (
                    c.name.clone(),
                    c.property("id").and_then(|v| v.as_integer()),
                )
            })
            .collect()
    }

    #[test]
    fn test_collapse_splices_in_place() {
        let world = GenericClass::new("world")
            .with_child(solid(1))
            .with_child(GenericClass::new("hidden").with_child(solid(2)))
            .with_child(solid(3));
        let doc = collapse_hidden(Document::new(vec![world])).unwrap();

        assert_eq!(
            names_and_ids(&doc.classes[0]),
            vec![
                ("solid".to_string(), Some(1)),
                ("solid".to_string(), Some(2)),
                ("solid".to_string(), Some(3)),
            ]
        );
        assert!(!doc.has_class("hidden", true));
    }

    #[test]
    fn test_collapse_flattens_nested_and_entity_hidden() {
        let world = GenericClass::new("world").with_child(
            GenericClass::new("hidden")
                .with_child(GenericClass::new("hidden").with_child(solid(4)))
                .with_child(solid(5)),
        );
        let entity = GenericClass::new("entity")
            .with_child(GenericClass::new("hidden").with_child(solid(6)));
        let top_hidden = GenericClass::new("hidden").with_child(GenericClass::new("entity"));
        let doc = collapse_hidden(Document::new(vec![world, entity, top_hidden])).unwrap();

        assert_eq!(
            names_and_ids(&doc.classes[0]),
            vec![
                ("solid".to_string(), Some(4)),
                ("solid".to_string(), Some(5)),
            ]
        );
        assert_eq!(doc.classes[1].children[0].name, "solid");
        assert_eq!(doc.classes[2].name, "entity");
        assert!(!doc.has_class("hidden", true));
    }

    #[test]
    fn test_collapse_requires_world() {
        let doc = Document::new(vec![GenericClass::new("entity")]);
        assert!(matches!(
            collapse_hidden(doc),
            Err(ParseError::MissingWorld)
        ));

        let doc = Document::new(vec![GenericClass::new("world"), GenericClass::new("world")]);
        assert!(matches!(
            collapse_hidden(doc),
            Err(ParseError::MultipleWorlds(2))
        ));
    }

    #[test]
    fn test_collapse_without_hidden_is_identity() {
        let doc = Document::new(vec![GenericClass::new("world").with_child(solid(1))]);
        let collapsed = collapse_hidden(doc.clone()).unwrap();
        assert_eq!(collapsed, doc);
    }
}
