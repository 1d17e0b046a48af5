// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The node sum type: every field of a composite is one of these.

use crate::composite::CompositeNode;
use crate::composite_array::CompositeArrayNode;
use crate::cursor::{CodecResult, Cursor, CursorMut};
use crate::descriptor::{Kind, TypeDescriptor};
use crate::leaf::{ArrayLeaf, Leaf, ScalarLeaf};
use crate::slot::Ownership;

/// Owned default scalar or array leaf of one variant.
macro_rules! leaf_node {
    ($descriptor:expr, $variant:ident) => {
        if $descriptor.is_array {
            Node::Array(ArrayLeaf::$variant(Leaf::described($descriptor)))
        } else {
            Node::Scalar(ScalarLeaf::$variant(Leaf::described($descriptor)))
        }
    };
}

/// One node of an object tree.
///
/// `'a` is the lifetime of application variables bound into the tree;
/// fully owned trees are `Node<'static>`.
#[derive(Debug, PartialEq)]
pub enum Node<'a> {
    Scalar(ScalarLeaf<'a>),
    Array(ArrayLeaf<'a>),
    Composite(CompositeNode<'a>),
    CompositeArray(CompositeArrayNode),
}

impl<'a> Node<'a> {
    /// Default-valued owned node of the descriptor's shape.
    pub fn from_descriptor(descriptor: &TypeDescriptor) -> Node<'static> {
        match descriptor.kind {
            Kind::Composite if descriptor.is_array => {
                Node::CompositeArray(CompositeArrayNode::from_descriptor(descriptor))
            }
            Kind::Composite => Node::Composite(CompositeNode::from_descriptor(descriptor)),
            Kind::Bool => leaf_node!(descriptor, Bool),
            Kind::Char => leaf_node!(descriptor, Char),
            Kind::Int32 => leaf_node!(descriptor, Int32),
            Kind::UInt32 => leaf_node!(descriptor, UInt32),
            Kind::Int64 => leaf_node!(descriptor, Int64),
            Kind::Float32 => leaf_node!(descriptor, Float32),
            Kind::Float64 => leaf_node!(descriptor, Float64),
            Kind::String => leaf_node!(descriptor, String),
        }
    }

    /// Default-valued node from a short type name; `None` if unrecognized.
    pub fn from_type_name(name: &str, type_name: &str, is_array: bool) -> Option<Node<'static>> {
        TypeDescriptor::from_type_name(name, type_name, is_array)
            .map(|descriptor| Node::from_descriptor(&descriptor))
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        match self {
            Node::Scalar(leaf) => leaf.descriptor(),
            Node::Array(leaf) => leaf.descriptor(),
            Node::Composite(node) => node.descriptor(),
            Node::CompositeArray(node) => node.descriptor(),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor().name
    }

    pub fn kind(&self) -> Kind {
        self.descriptor().kind
    }

    pub fn same_kind(&self, descriptor: &TypeDescriptor) -> bool {
        self.descriptor().same_kind(descriptor)
    }

    pub fn set_designation(&mut self, designation: impl Into<String>) {
        match self {
            Node::Scalar(leaf) => leaf.set_designation(designation),
            Node::Array(leaf) => leaf.set_designation(designation),
            Node::Composite(node) => node.set_designation(designation),
            Node::CompositeArray(node) => node.set_designation(designation),
        }
    }

    /// Composites are always owned by their parent.
    pub fn ownership(&self) -> Ownership {
        match self {
            Node::Scalar(leaf) => leaf.ownership(),
            Node::Array(leaf) => leaf.ownership(),
            Node::Composite(_) | Node::CompositeArray(_) => Ownership::Owned,
        }
    }

    pub fn required_space(&self) -> usize {
        match self {
            Node::Scalar(leaf) => leaf.required_space(),
            Node::Array(leaf) => leaf.required_space(),
            Node::Composite(node) => node.required_space(),
            Node::CompositeArray(node) => node.required_space(),
        }
    }

    pub fn write(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
        match self {
            Node::Scalar(leaf) => leaf.write(cursor),
            Node::Array(leaf) => leaf.write(cursor),
            Node::Composite(node) => node.write(cursor),
            Node::CompositeArray(node) => node.write(cursor),
        }
    }

    pub fn read(&mut self, cursor: &mut Cursor<'_>) -> CodecResult<()> {
        match self {
            Node::Scalar(leaf) => leaf.read(cursor),
            Node::Array(leaf) => leaf.read(cursor),
            Node::Composite(node) => node.read(cursor),
            Node::CompositeArray(node) => node.read(cursor),
        }
    }

    /// Copy `source`'s value into this node. Returns `false` without
    /// touching anything when the two nodes are of different kinds.
    pub fn assign(&mut self, source: &Node<'_>) -> bool {
        match (self, source) {
            (Node::Scalar(dest), Node::Scalar(src)) => dest.assign(src),
            (Node::Array(dest), Node::Array(src)) => dest.assign(src),
            (Node::Composite(dest), Node::Composite(src)) => {
                dest.assign(src);
                true
            }
            (Node::CompositeArray(dest), Node::CompositeArray(src)) => {
                dest.assign(src);
                true
            }
            _ => false,
        }
    }

    /// Fully owned deep copy.
    pub fn snapshot(&self) -> Node<'static> {
        match self {
            Node::Scalar(leaf) => Node::Scalar(leaf.snapshot()),
            Node::Array(leaf) => Node::Array(leaf.snapshot()),
            Node::Composite(node) => Node::Composite(node.snapshot()),
            Node::CompositeArray(node) => Node::CompositeArray(node.snapshot()),
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarLeaf<'a>> {
        match self {
            Node::Scalar(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut ScalarLeaf<'a>> {
        match self {
            Node::Scalar(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayLeaf<'a>> {
        match self {
            Node::Array(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayLeaf<'a>> {
        match self {
            Node::Array(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeNode<'a>> {
        match self {
            Node::Composite(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut CompositeNode<'a>> {
        match self {
            Node::Composite(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_composite_array(&self) -> Option<&CompositeArrayNode> {
        match self {
            Node::CompositeArray(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_composite_array_mut(&mut self) -> Option<&mut CompositeArrayNode> {
        match self {
            Node::CompositeArray(node) => Some(node),
            _ => None,
        }
    }
}

impl<'a> From<CompositeNode<'a>> for Node<'a> {
    fn from(node: CompositeNode<'a>) -> Self {
        Node::Composite(node)
    }
}

impl<'a> From<CompositeArrayNode> for Node<'a> {
    fn from(node: CompositeArrayNode) -> Self {
        Node::CompositeArray(node)
    }
}
