// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Homogeneous arrays of composites.
//!
//! Every element is an owned composite named after the array and built from
//! one declared shape. On the wire the elements carry no descriptor of their
//! own:
//!
//! ```text
//! [i32 element count][element payload]...
//! ```

use crate::composite::CompositeNode;
use crate::cursor::{CodecResult, Cursor, CursorMut};
use crate::descriptor::TypeDescriptor;
use std::fmt;

/// Declared shape of a composite array element.
pub trait CompositeShape {
    /// Add the element's default fields to a freshly created composite.
    fn populate(element: &mut CompositeNode<'static>);
}

/// Shape with no predeclared fields. Elements take whatever fields are
/// assigned or decoded into them.
pub struct Untyped;

impl CompositeShape for Untyped {
    fn populate(_element: &mut CompositeNode<'static>) {}
}

pub struct CompositeArrayNode {
    descriptor: TypeDescriptor,
    elements: Vec<CompositeNode<'static>>,
    populate: fn(&mut CompositeNode<'static>),
}

impl CompositeArrayNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_shape::<Untyped>(name)
    }

    pub fn with_shape<S: CompositeShape>(name: impl Into<String>) -> Self {
        Self {
            descriptor: TypeDescriptor::composite_array(name),
            elements: Vec::new(),
            populate: S::populate,
        }
    }

    /// Untyped array named after `descriptor`.
    pub fn from_descriptor(descriptor: &TypeDescriptor) -> Self {
        let mut node = Self::new(descriptor.name.clone());
        node.descriptor.designation = descriptor.designation.clone();
        node
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn set_designation(&mut self, designation: impl Into<String>) {
        self.descriptor.designation = designation.into();
    }

    /// Non-array composite descriptor shared by every element.
    pub fn element_descriptor(&self) -> TypeDescriptor {
        self.descriptor.element()
    }

    /// Default element of the declared shape, not yet appended.
    pub fn new_element(&self) -> CompositeNode<'static> {
        let mut element = CompositeNode::from_descriptor(&self.element_descriptor());
        (self.populate)(&mut element);
        element
    }

    /// Append default elements until there are at least `len`. Never shrinks.
    pub fn resize(&mut self, len: usize) {
        while self.elements.len() < len {
            let element = self.new_element();
            self.elements.push(element);
        }
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Append a deep copy of `value`.
    pub fn add(&mut self, value: &CompositeNode<'_>) {
        let mut element = self.new_element();
        element.assign(value);
        self.elements.push(element);
    }

    pub fn remove_at(&mut self, index: usize) -> bool {
        if index < self.elements.len() {
            self.elements.remove(index);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CompositeNode<'static>> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CompositeNode<'static>> {
        self.elements.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompositeNode<'static>> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, CompositeNode<'static>> {
        self.elements.iter_mut()
    }

    /// Replace the contents with deep copies of `source`'s elements.
    pub fn assign(&mut self, source: &CompositeArrayNode) {
        self.clear();
        self.resize(source.len());
        for (element, incoming) in self.elements.iter_mut().zip(&source.elements) {
            element.assign(incoming);
        }
    }

    pub fn required_space(&self) -> usize {
        4 + self
            .elements
            .iter()
            .map(CompositeNode::required_space)
            .sum::<usize>()
    }

    pub fn write(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
        cursor.write_count(self.elements.len())?;
        for element in &self.elements {
            element.write(cursor)?;
        }
        Ok(())
    }

    /// Rebuild the array from the stream. Elements start from the declared
    /// shape and reconcile against their own encoded fields.
    pub fn read(&mut self, cursor: &mut Cursor<'_>) -> CodecResult<()> {
        self.clear();
        let count = cursor.read_count(4)?;
        self.resize(count);
        for element in &mut self.elements {
            element.read(cursor)?;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> CompositeArrayNode {
        CompositeArrayNode {
            descriptor: self.descriptor.clone(),
            elements: self.elements.iter().map(CompositeNode::snapshot).collect(),
            populate: self.populate,
        }
    }
}

impl fmt::Debug for CompositeArrayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeArrayNode")
            .field("descriptor", &self.descriptor)
            .field("elements", &self.elements)
            .finish()
    }
}

impl PartialEq for CompositeArrayNode {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor && self.elements == other.elements
    }
}

impl<'s> IntoIterator for &'s CompositeArrayNode {
    type Item = &'s CompositeNode<'static>;
    type IntoIter = std::slice::Iter<'s, CompositeNode<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Kind;

    struct Point;

    impl CompositeShape for Point {
        fn populate(element: &mut CompositeNode<'static>) {
            element.add_value("x", 0.0f64);
            element.add_value("y", 0.0f64);
        }
    }

    fn point(x: f64, y: f64) -> CompositeNode<'static> {
        let mut p = CompositeNode::new("p");
        p.add_value("x", x);
        p.add_value("y", y);
        p
    }

    #[test]
    fn test_resize_never_shrinks() {
        let mut points = CompositeArrayNode::with_shape::<Point>("points");
        points.resize(3);
        assert_eq!(points.len(), 3);
        points.resize(1);
        assert_eq!(points.len(), 3);
        let first = points.get(0).unwrap();
        assert_eq!(first.name(), "points");
        assert_eq!(first.descriptor().kind, Kind::Composite);
        assert!(!first.descriptor().is_array);
        assert_eq!(first.get::<f64>("y"), Some(&0.0));
    }

    #[test]
    fn test_add_deep_copies() {
        let mut points = CompositeArrayNode::with_shape::<Point>("points");
        let mut value = point(1.0, 2.0);
        points.add(&value);
        value.set("x", 50.0f64);
        assert_eq!(points.get(0).unwrap().get::<f64>("x"), Some(&1.0));
    }

    #[test]
    fn test_remove_at() {
        let mut points = CompositeArrayNode::with_shape::<Point>("points");
        points.add(&point(1.0, 0.0));
        points.add(&point(2.0, 0.0));
        assert!(points.remove_at(0));
        assert!(!points.remove_at(5));
        assert_eq!(points.len(), 1);
        assert_eq!(points.get(0).unwrap().get::<f64>("x"), Some(&2.0));
    }

    #[test]
    fn test_assign_replaces_contents() {
        let mut source = CompositeArrayNode::with_shape::<Point>("points");
        source.add(&point(1.0, 1.0));
        source.add(&point(2.0, 2.0));
        let mut dest = CompositeArrayNode::new("points");
        dest.resize(5);
        dest.assign(&source);
        assert_eq!(dest, source);
    }

    #[test]
    fn test_binary_roundtrip_untyped() {
        let mut source = CompositeArrayNode::with_shape::<Point>("points");
        source.add(&point(3.0, 4.0));
        let mut buffer = vec![0u8; source.required_space()];
        source.write(&mut CursorMut::new(&mut buffer)).unwrap();

        let mut dest = CompositeArrayNode::new("points");
        dest.add(&point(9.0, 9.0));
        dest.add(&point(9.0, 9.0));
        dest.read(&mut Cursor::new(&buffer)).unwrap();
        assert_eq!(dest.len(), 1);
        assert_eq!(dest.get(0).unwrap().get::<f64>("y"), Some(&4.0));
    }
}
