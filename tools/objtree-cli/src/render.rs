// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plain-text tree view of a decoded record.

use objtree::{CompositeNode, Node};
use std::fmt::Write;

pub fn render_tree(node: &CompositeNode<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} field(s))", node.name(), node.len());
    render_fields(node, 1, &mut out);
    out
}

fn render_fields(node: &CompositeNode<'_>, depth: usize, out: &mut String) {
    for (_, field) in node.iter() {
        render_node(field, depth, out);
    }
}

fn render_node(node: &Node<'_>, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    let descriptor = node.descriptor();
    match node {
        Node::Scalar(leaf) => {
            let _ = writeln!(out, "{}{} = {}", pad, descriptor, leaf.to_text());
        }
        Node::Array(leaf) => {
            let _ = writeln!(out, "{}{} = [{}]", pad, descriptor, leaf.to_text_array().join(", "));
        }
        Node::Composite(composite) => {
            let _ = writeln!(out, "{}{}", pad, descriptor);
            render_fields(composite, depth + 1, out);
        }
        Node::CompositeArray(array) => {
            let _ = writeln!(out, "{}{} ({} element(s))", pad, descriptor, array.len());
            for (index, element) in array.iter().enumerate() {
                let _ = writeln!(out, "{}  [{}]", pad, index);
                render_fields(element, depth + 2, out);
            }
        }
    }
}
