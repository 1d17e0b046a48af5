// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composite nodes: named records of uniquely named fields.
//!
//! # Binary form
//!
//! ```text
//! [i32 field count]
//! for each field: [TypeDescriptor][field payload]
//! ```
//!
//! Field order on the wire is not significant; reading matches fields by
//! name and reshapes the local tree with [`reconcile_shape`] before decoding
//! each payload. Fields absent from the stream are left untouched.
//!
//! [`reconcile_shape`]: crate::reconcile::reconcile_shape

use crate::composite_array::CompositeArrayNode;
use crate::cursor::{CodecResult, Cursor, CursorMut};
use crate::descriptor::TypeDescriptor;
use crate::leaf::{Bindable, Leaf};
use crate::node::Node;
use crate::reconcile::reconcile_shape;
use crate::slot::Ownership;
use std::collections::BTreeMap;

/// A named record. Field names are unique; lookups are by name.
#[derive(Debug)]
pub struct CompositeNode<'a> {
    descriptor: TypeDescriptor,
    pub(crate) children: BTreeMap<String, Node<'a>>,
    id: i64,
}

impl<'a> CompositeNode<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            descriptor: TypeDescriptor::composite(name),
            children: BTreeMap::new(),
            id: 0,
        }
    }

    /// Empty composite named after `descriptor`; kind and array flag are
    /// forced to a single composite.
    pub fn from_descriptor(descriptor: &TypeDescriptor) -> Self {
        let mut node = Self::new(descriptor.name.clone());
        node.descriptor.designation = descriptor.designation.clone();
        node
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.set_designation(designation);
        self
    }

    pub fn set_designation(&mut self, designation: impl Into<String>) {
        self.descriptor.designation = designation.into();
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Opaque identifier, copied by `assign` and never interpreted.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Add an owned, default-valued field shaped like `shape` (kind, array
    /// flag and designation). `false` if `name` is taken.
    pub fn add_field(&mut self, name: impl Into<String>, shape: &TypeDescriptor) -> bool {
        let descriptor = TypeDescriptor {
            name: name.into(),
            ..shape.clone()
        };
        self.attach_child(Node::from_descriptor(&descriptor))
    }

    /// Like [`add_field`](Self::add_field) with the kind given by its short
    /// name (`"int"`, `"double"`, `"comp"`...). `false` for an unknown name.
    pub fn add_field_named(&mut self, name: impl Into<String>, type_name: &str, is_array: bool) -> bool {
        let name = name.into();
        match Node::from_type_name(&name, type_name, is_array) {
            Some(node) => self.attach_child(node),
            None => {
                log::debug!(
                    "[objtree] '{}': unknown type '{}' for field '{}'",
                    self.name(),
                    type_name,
                    name
                );
                false
            }
        }
    }

    /// Add an owned field holding `value`.
    pub fn add_value<V: Bindable>(&mut self, name: impl Into<String>, value: V) -> bool {
        self.attach_child(V::into_node(Leaf::with_value(name, value)))
    }

    /// Add a field aliasing an application variable. Reads and assignments
    /// write straight into `target`; the tree never drops it.
    pub fn bind_field<V: Bindable>(&mut self, name: impl Into<String>, target: &'a mut V) -> bool {
        self.attach_child(V::into_node(Leaf::bound(name, target)))
    }

    /// Insert a prebuilt node under its own name. `false` if the name is taken.
    pub fn attach_child(&mut self, node: Node<'a>) -> bool {
        if self.children.contains_key(node.name()) {
            log::debug!(
                "[objtree] '{}': field '{}' already exists",
                self.name(),
                node.name()
            );
            return false;
        }
        self.children.insert(node.name().to_owned(), node);
        true
    }

    pub fn field(&self, name: &str) -> Option<&Node<'a>> {
        self.children.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Node<'a>> {
        self.children.get_mut(name)
    }

    /// Remove a field. An owned field is dropped; a bound field only
    /// releases its borrow.
    pub fn remove_field(&mut self, name: &str) -> bool {
        self.children.remove(name).is_some()
    }

    pub fn take_field(&mut self, name: &str) -> Option<Node<'a>> {
        self.children.remove(name)
    }

    /// Snapshot of the current fields, ordered by name.
    pub fn fields(&self) -> Vec<&Node<'a>> {
        self.children.values().collect()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node<'a>)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn ownership(&self, name: &str) -> Option<Ownership> {
        self.field(name).map(Node::ownership)
    }

    /// Typed read access; `None` if absent or of another kind.
    pub fn get<V: Bindable>(&self, name: &str) -> Option<&V> {
        self.field(name).and_then(V::peek).map(Leaf::value)
    }

    pub fn get_mut<V: Bindable>(&mut self, name: &str) -> Option<&mut V> {
        self.field_mut(name).and_then(V::peek_mut).map(Leaf::value_mut)
    }

    pub fn get_array<T>(&self, name: &str) -> Option<&[T]>
    where
        Vec<T>: Bindable,
    {
        self.get::<Vec<T>>(name).map(Vec::as_slice)
    }

    /// Typed write; a no-op returning `false` on a missing field or a kind
    /// mismatch.
    pub fn set<V: Bindable>(&mut self, name: &str, value: V) -> bool {
        match self.get_mut::<V>(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn composite(&self, name: &str) -> Option<&CompositeNode<'a>> {
        self.field(name).and_then(Node::as_composite)
    }

    pub fn composite_mut(&mut self, name: &str) -> Option<&mut CompositeNode<'a>> {
        self.field_mut(name).and_then(Node::as_composite_mut)
    }

    pub fn composite_array(&self, name: &str) -> Option<&CompositeArrayNode> {
        self.field(name).and_then(Node::as_composite_array)
    }

    pub fn composite_array_mut(&mut self, name: &str) -> Option<&mut CompositeArrayNode> {
        self.field_mut(name).and_then(Node::as_composite_array_mut)
    }

    pub fn required_space(&self) -> usize {
        4 + self
            .children
            .values()
            .map(|node| node.descriptor().required_space() + node.required_space())
            .sum::<usize>()
    }

    pub fn write(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
        cursor.write_count(self.children.len())?;
        for node in self.children.values() {
            node.descriptor().write(cursor)?;
            node.write(cursor)?;
        }
        Ok(())
    }

    /// Decode a record, grafting and retyping fields to match the stream.
    ///
    /// On error every field decoded so far keeps its new value.
    /// Nesting beyond [`MAX_DEPTH`](crate::cursor::MAX_DEPTH) is rejected.
    pub fn read(&mut self, cursor: &mut Cursor<'_>) -> CodecResult<()> {
        cursor.enter()?;
        let result = self.read_fields(cursor);
        cursor.leave();
        result
    }

    fn read_fields(&mut self, cursor: &mut Cursor<'_>) -> CodecResult<()> {
        let count = cursor.read_count(TypeDescriptor::MIN_ENCODED_LEN)?;
        log::debug!("[objtree] reading '{}': {} field(s)", self.name(), count);
        for _ in 0..count {
            let incoming = TypeDescriptor::read(cursor)?;
            let (field, _) = reconcile_shape(&mut self.children, &incoming);
            field.read(cursor)?;
        }
        Ok(())
    }

    /// Encode into a buffer of exactly `required_space()` bytes.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut buffer = vec![0u8; self.required_space()];
        self.write(&mut CursorMut::new(&mut buffer))?;
        Ok(buffer)
    }

    /// Decode from `bytes`, returning the number of bytes consumed.
    pub fn read_bytes(&mut self, bytes: &[u8]) -> CodecResult<usize> {
        let mut cursor = Cursor::new(bytes);
        if let Err(err) = self.read(&mut cursor) {
            log::warn!("[objtree] partial read of '{}': {}", self.name(), err);
            return Err(err);
        }
        Ok(cursor.offset())
    }

    /// Fully owned deep copy, detached from any bound variables.
    pub fn snapshot(&self) -> CompositeNode<'static> {
        CompositeNode {
            descriptor: self.descriptor.clone(),
            children: self
                .children
                .iter()
                .map(|(name, node)| (name.clone(), node.snapshot()))
                .collect(),
            id: self.id,
        }
    }
}

impl<'a> PartialEq for CompositeNode<'a> {
    /// Same descriptor and pairwise equal fields; `id` is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor && self.children == other.children
    }
}
