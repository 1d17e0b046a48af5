// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic hierarchical text tree and its XML form.
//!
//! An [`Element`] has a tag name, optional text content and ordered child
//! elements. Attributes, comments and processing instructions are not
//! modelled; parsing drops them.

use crate::config::XmlOptions;
use std::fmt;

/// Errors raised while turning text into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The text is not well-formed XML.
    Parse(String),
    /// The root element does not carry the expected name.
    MissingRoot { expected: String, found: String },
    /// The name cannot be written as an XML tag.
    InvalidName(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Parse(reason) => write!(f, "failed to parse XML: {}", reason),
            DocumentError::MissingRoot { expected, found } => {
                write!(f, "expected root element <{}>, found <{}>", expected, found)
            }
            DocumentError::InvalidName(name) => {
                write!(f, "'{}' is not a valid XML element name", name)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Whether `name` can be written as a tag and parsed back unchanged.
///
/// ASCII letter or `_` first, then letters, digits, `_`, `-` or `.`.
/// Colons are refused since they would read back as namespace prefixes.
pub fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.set_text(text);
        element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    pub fn children_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Element> + 's {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn append_child(&mut self, child: Element) -> &mut Element {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// First child named `name`, appended empty if there is none.
    pub fn child_or_append(&mut self, name: &str) -> &mut Element {
        match self.children.iter().position(|child| child.name == name) {
            Some(index) => &mut self.children[index],
            None => self.append_child(Element::new(name)),
        }
    }

    /// `Ok` if this element is named `expected`.
    pub fn expect_name(&self, expected: &str) -> Result<(), DocumentError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(DocumentError::MissingRoot {
                expected: expected.to_owned(),
                found: self.name.clone(),
            })
        }
    }

    /// Drop text and children, keeping the name.
    pub fn clear(&mut self) {
        self.text = None;
        self.children.clear();
    }

    /// Serialize as an XML document, declaration included.
    pub fn to_xml(&self, options: &XmlOptions) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        if options.indent {
            out.push('\n');
        }
        self.write_xml(&mut out, 0, options);
        out
    }

    fn write_xml(&self, out: &mut String, depth: usize, options: &XmlOptions) {
        let indent = if options.indent {
            " ".repeat(depth * options.indent_width)
        } else {
            String::new()
        };
        let newline = if options.indent { "\n" } else { "" };
        let text = self.text.as_deref().unwrap_or("");

        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        if text.is_empty() && self.children.is_empty() {
            out.push_str("/>");
            out.push_str(newline);
            return;
        }
        out.push('>');
        push_text(out, text, options);
        if !self.children.is_empty() {
            out.push_str(newline);
            for child in &self.children {
                child.write_xml(out, depth + 1, options);
            }
            out.push_str(&indent);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
        out.push_str(newline);
    }
}

fn push_text(out: &mut String, text: &str, options: &XmlOptions) {
    if !options.escape_entities {
        out.push_str(text);
        return;
    }
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
}

/// Parse XML text into its root element.
///
/// Text of an element is the concatenation of its text nodes. Whitespace-only
/// text next to child elements is layout and is dropped.
pub fn parse_xml(text: &str) -> Result<Element, DocumentError> {
    let doc = roxmltree::Document::parse(text).map_err(|e| DocumentError::Parse(e.to_string()))?;
    Ok(convert(doc.root_element()))
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    let mut text: Option<String> = None;
    for child in node.children() {
        if child.is_element() {
            element.children.push(convert(child));
        } else if let Some(chunk) = child.text().filter(|_| child.is_text()) {
            text.get_or_insert_with(String::new).push_str(chunk);
        }
    }
    element.text = text.filter(|t| element.children.is_empty() || !t.trim().is_empty());
    element
}
