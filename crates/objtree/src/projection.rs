// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping between composite trees and documents.
//!
//! A composite maps to an element with one child element per field:
//!
//! - scalar: the value's text form as text content;
//! - array: one `<val>` child per entry;
//! - composite: a nested element, recursively;
//! - composite array: one `<val>` child per element, holding its fields.
//!
//! Fields whose names are not valid XML tags (see [`is_element_name`]) are
//! left out of the document with a warning.
//!
//! Reading only fills fields the composite already has. Elements with no
//! matching field are ignored and fields with no matching element keep
//! their value. Composite arrays are the exception: they are rebuilt to the
//! number of entries in the document.

use crate::composite::CompositeNode;
use crate::composite_array::CompositeArrayNode;
use crate::config::{XmlOptions, ENTRY_TAG};
use crate::document::{is_element_name, parse_xml, DocumentError, Element};
use crate::error::Result;
use crate::node::Node;
use std::fs;
use std::path::Path;

/// Build a document whose root element carries the composite's name.
pub fn write_document(node: &CompositeNode<'_>) -> Element {
    let mut root = Element::new(node.name());
    write_fields(node, &mut root);
    root
}

/// Write every field of `node` as a child of `element`, reusing children
/// that already carry a field's name.
pub fn write_fields(node: &CompositeNode<'_>, element: &mut Element) {
    for (name, field) in node.iter() {
        if !is_element_name(name) {
            log::warn!("[objtree] '{}': field '{}' has no XML form, skipped", node.name(), name);
            continue;
        }
        match field {
            Node::Composite(composite) => add_to_element(composite, element),
            Node::CompositeArray(array) => write_composite_array(array, element.child_or_append(name)),
            Node::Array(leaf) => {
                let child = element.child_or_append(name);
                child.clear();
                for text in leaf.to_text_array() {
                    child.append_child(Element::with_text(ENTRY_TAG, text));
                }
            }
            Node::Scalar(leaf) => {
                let child = element.child_or_append(name);
                child.clear();
                child.set_text(leaf.to_text());
            }
        }
    }
}

fn write_composite_array(array: &CompositeArrayNode, element: &mut Element) {
    element.clear();
    for item in array {
        write_fields(item, element.append_child(Element::new(ENTRY_TAG)));
    }
}

/// Place `node` under `parent` as a child named after it. An existing child
/// of that name is updated field by field.
pub fn add_to_element(node: &CompositeNode<'_>, parent: &mut Element) {
    write_fields(node, parent.child_or_append(node.name()));
}

/// Fill `node`'s fields from `element`, the composite's own element.
pub fn read_document(node: &mut CompositeNode<'_>, element: &Element) {
    for (name, field) in node.children.iter_mut() {
        let Some(child) = element.child(name) else {
            log::debug!("[objtree] '{}': no <{}> element, keeping value", element.name(), name);
            continue;
        };
        match field {
            Node::Composite(composite) => read_document(composite, child),
            Node::CompositeArray(array) => read_composite_array(array, child),
            Node::Array(leaf) => {
                let texts: Vec<&str> = child
                    .children_named(ENTRY_TAG)
                    .map(|entry| entry.text().unwrap_or(""))
                    .collect();
                leaf.from_text_array(texts.as_slice());
            }
            Node::Scalar(leaf) => leaf.from_text(child.text().unwrap_or("")),
        }
    }
}

fn read_composite_array(array: &mut CompositeArrayNode, element: &Element) {
    let entries: Vec<&Element> = element.children_named(ENTRY_TAG).collect();
    array.clear();
    array.resize(entries.len());
    for (item, entry) in array.iter_mut().zip(entries) {
        read_document(item, entry);
    }
}

/// Read `node` from the child of `parent` named after it. `false`, with
/// nothing read, when there is no such child.
pub fn read_from_element(node: &mut CompositeNode<'_>, parent: &Element) -> bool {
    match parent.child(node.name()) {
        Some(element) => {
            read_document(node, element);
            true
        }
        None => false,
    }
}

pub fn to_xml_string(node: &CompositeNode<'_>, options: &XmlOptions) -> String {
    write_document(node).to_xml(options)
}

/// Parse `text` and read it into `node`. `Ok(false)`, with nothing read,
/// when the root element is not named after `node`.
pub fn read_xml_str(node: &mut CompositeNode<'_>, text: &str) -> Result<bool> {
    let root = parse_xml(text)?;
    if let Err(err) = root.expect_name(node.name()) {
        log::warn!("[objtree] {}", err);
        return Ok(false);
    }
    read_document(node, &root);
    Ok(true)
}

/// Fails without writing when the composite's name is not a valid tag.
pub fn save_xml_file<P: AsRef<Path>>(node: &CompositeNode<'_>, path: P, options: &XmlOptions) -> Result<()> {
    if !is_element_name(node.name()) {
        return Err(DocumentError::InvalidName(node.name().to_string()).into());
    }
    fs::write(path, to_xml_string(node, options))?;
    Ok(())
}

/// See [`read_xml_str`].
pub fn load_xml_file<P: AsRef<Path>>(node: &mut CompositeNode<'_>, path: P) -> Result<bool> {
    let text = fs::read_to_string(path)?;
    read_xml_str(node, &text)
}
