// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema reconciliation.
//!
//! Reshaping a composite to match an incoming shape is split from copying
//! values into it:
//!
//! - [`prune_missing`] drops local fields the source does not have;
//! - [`reconcile_shape`] grafts a missing field or retypes a field whose
//!   kind or array flag differs, then hands back the shape-correct field;
//! - the caller copies the value (`Node::assign` or `Node::read`).
//!
//! `CompositeNode::assign` runs all three steps. Binary reads skip the
//! prune step so fields missing from an older record survive the load.

use crate::composite::CompositeNode;
use crate::descriptor::TypeDescriptor;
use crate::node::Node;
use std::collections::btree_map::{BTreeMap, Entry};

/// What [`reconcile_shape`] did to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeChange {
    /// Existing field already had the incoming shape.
    Kept,
    /// Field was missing and a default-valued one was inserted.
    Grafted,
    /// Field had another kind and was replaced by a default-valued one.
    Retyped,
}

/// Remove every field of `children` that `source` does not carry.
/// Returns the number of fields removed.
pub fn prune_missing(children: &mut BTreeMap<String, Node<'_>>, source: &CompositeNode<'_>) -> usize {
    let before = children.len();
    children.retain(|name, _| {
        let keep = source.contains(name);
        if !keep {
            log::debug!("[objtree] prune '{}'", name);
        }
        keep
    });
    before - children.len()
}

/// Make the field named `incoming.name` match `incoming`'s kind and array
/// flag, and return it.
pub fn reconcile_shape<'n, 'a>(
    children: &'n mut BTreeMap<String, Node<'a>>,
    incoming: &TypeDescriptor,
) -> (&'n mut Node<'a>, ShapeChange) {
    match children.entry(incoming.name.clone()) {
        Entry::Vacant(slot) => {
            log::debug!("[objtree] graft '{}'", incoming);
            (slot.insert(Node::from_descriptor(incoming)), ShapeChange::Grafted)
        }
        Entry::Occupied(slot) => {
            let field = slot.into_mut();
            if field.same_kind(incoming) {
                return (field, ShapeChange::Kept);
            }
            log::debug!("[objtree] retype '{}' -> '{}'", field.descriptor(), incoming);
            *field = Node::from_descriptor(incoming);
            (field, ShapeChange::Retyped)
        }
    }
}

impl<'a> CompositeNode<'a> {
    /// Structural assignment: afterwards `self` has exactly `source`'s
    /// fields, with `source`'s values and `id`. The name is kept.
    ///
    /// Fields of the right shape are updated in place, so a bound field
    /// keeps writing through to its variable. A bound field that is pruned
    /// or retyped is released, never dropped.
    pub fn assign(&mut self, source: &CompositeNode<'_>) {
        prune_missing(&mut self.children, source);
        for incoming in source.children.values() {
            let (field, _) = reconcile_shape(&mut self.children, incoming.descriptor());
            field.assign(incoming);
        }
        self.set_id(source.id());
    }

    /// Drop the fields `source` lacks, without touching the others.
    pub fn prune_to(&mut self, source: &CompositeNode<'_>) -> usize {
        prune_missing(&mut self.children, source)
    }

    /// Graft or retype one field to match `incoming`, keeping its value if
    /// the shape already matches.
    pub fn reconcile_field(&mut self, incoming: &TypeDescriptor) -> ShapeChange {
        reconcile_shape(&mut self.children, incoming).1
    }
}
