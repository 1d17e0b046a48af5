// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Leaf nodes: scalars and homogeneous arrays of scalars.
//!
//! `Leaf<'a, V>` is the generic building block. `ScalarLeaf` and
//! `ArrayLeaf` close it over the eight scalar kinds so a tree can hold any
//! of them without downcasting.

use crate::cursor::{CodecResult, Cursor, CursorMut};
use crate::descriptor::{Kind, TypeDescriptor};
use crate::node::Node;
use crate::scalar::Scalar;
use crate::slot::{Ownership, Slot};
use std::fmt;

/// A value type that can be added to, or bound into, a composite.
///
/// Implemented for every scalar kind and for `Vec` of every scalar kind.
pub trait Bindable: Clone + Default + PartialEq + fmt::Debug + 'static {
    const KIND: Kind;
    const IS_ARRAY: bool;

    fn payload_len(&self) -> usize;

    fn write_payload(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()>;

    fn read_payload(cursor: &mut Cursor<'_>) -> CodecResult<Self>;

    /// Wrap a leaf into the matching node variant.
    fn into_node(leaf: Leaf<'_, Self>) -> Node<'_>;

    fn peek<'n, 'a>(node: &'n Node<'a>) -> Option<&'n Leaf<'a, Self>>;

    fn peek_mut<'n, 'a>(node: &'n mut Node<'a>) -> Option<&'n mut Leaf<'a, Self>>;
}

fn array_len<T: Scalar>(values: &[T]) -> usize {
    4 + values.iter().map(Scalar::encoded_len).sum::<usize>()
}

fn write_array<T: Scalar>(values: &[T], cursor: &mut CursorMut<'_>) -> CodecResult<()> {
    cursor.write_count(values.len())?;
    for value in values {
        value.encode(cursor)?;
    }
    Ok(())
}

fn read_array<T: Scalar>(cursor: &mut Cursor<'_>) -> CodecResult<Vec<T>> {
    let count = cursor.read_count(T::KIND.min_encoded_len())?;
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(T::decode(cursor)?);
    }
    Ok(values)
}

macro_rules! impl_bindable {
    ($type:ty, $variant:ident) => {
        impl Bindable for $type {
            const KIND: Kind = <$type as Scalar>::KIND;
            const IS_ARRAY: bool = false;

            fn payload_len(&self) -> usize {
                self.encoded_len()
            }

            fn write_payload(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
                self.encode(cursor)
            }

            fn read_payload(cursor: &mut Cursor<'_>) -> CodecResult<Self> {
                <$type as Scalar>::decode(cursor)
            }

            fn into_node(leaf: Leaf<'_, Self>) -> Node<'_> {
                Node::Scalar(ScalarLeaf::$variant(leaf))
            }

            fn peek<'n, 'a>(node: &'n Node<'a>) -> Option<&'n Leaf<'a, Self>> {
                match node {
                    Node::Scalar(ScalarLeaf::$variant(leaf)) => Some(leaf),
                    _ => None,
                }
            }

            fn peek_mut<'n, 'a>(node: &'n mut Node<'a>) -> Option<&'n mut Leaf<'a, Self>> {
                match node {
                    Node::Scalar(ScalarLeaf::$variant(leaf)) => Some(leaf),
                    _ => None,
                }
            }
        }

        impl Bindable for Vec<$type> {
            const KIND: Kind = <$type as Scalar>::KIND;
            const IS_ARRAY: bool = true;

            fn payload_len(&self) -> usize {
                array_len(self)
            }

            fn write_payload(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
                write_array(self, cursor)
            }

            fn read_payload(cursor: &mut Cursor<'_>) -> CodecResult<Self> {
                read_array(cursor)
            }

            fn into_node(leaf: Leaf<'_, Self>) -> Node<'_> {
                Node::Array(ArrayLeaf::$variant(leaf))
            }

            fn peek<'n, 'a>(node: &'n Node<'a>) -> Option<&'n Leaf<'a, Self>> {
                match node {
                    Node::Array(ArrayLeaf::$variant(leaf)) => Some(leaf),
                    _ => None,
                }
            }

            fn peek_mut<'n, 'a>(node: &'n mut Node<'a>) -> Option<&'n mut Leaf<'a, Self>> {
                match node {
                    Node::Array(ArrayLeaf::$variant(leaf)) => Some(leaf),
                    _ => None,
                }
            }
        }
    };
}

impl_bindable!(bool, Bool);
impl_bindable!(i8, Char);
impl_bindable!(i32, Int32);
impl_bindable!(u32, UInt32);
impl_bindable!(i64, Int64);
impl_bindable!(f32, Float32);
impl_bindable!(f64, Float64);
impl_bindable!(String, String);

/// A named scalar or array value, owned or bound to application storage.
#[derive(Debug)]
pub struct Leaf<'a, V> {
    descriptor: TypeDescriptor,
    target: Slot<'a, V>,
}

impl<'a, V> Leaf<'a, V> {
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn set_designation(&mut self, designation: impl Into<String>) {
        self.descriptor.designation = designation.into();
    }

    pub fn ownership(&self) -> Ownership {
        self.target.ownership()
    }

    pub fn value(&self) -> &V {
        &self.target
    }

    /// Mutable access; for a bound leaf this is the application's variable.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.target
    }

    pub fn set(&mut self, value: V) {
        *self.target = value;
    }
}

impl<'a, V: Bindable> Leaf<'a, V> {
    fn descriptor_for(name: String) -> TypeDescriptor {
        TypeDescriptor::new(name, V::KIND, V::IS_ARRAY)
    }

    /// Owned leaf holding the default value.
    pub fn owned(name: impl Into<String>) -> Self {
        Self::with_value(name, V::default())
    }

    pub fn with_value(name: impl Into<String>, value: V) -> Self {
        Self {
            descriptor: Self::descriptor_for(name.into()),
            target: Slot::Owned(value),
        }
    }

    /// Leaf aliasing `target`. Reads through this leaf update the variable.
    pub fn bound(name: impl Into<String>, target: &'a mut V) -> Self {
        Self {
            descriptor: Self::descriptor_for(name.into()),
            target: Slot::Borrowed(target),
        }
    }

    /// Owned default leaf taking name and designation from `descriptor`.
    /// Kind and array flag always come from `V`.
    pub(crate) fn described(descriptor: &TypeDescriptor) -> Self {
        let mut leaf = Self::owned(descriptor.name.clone());
        leaf.descriptor.designation = descriptor.designation.clone();
        leaf
    }

    pub fn required_space(&self) -> usize {
        self.value().payload_len()
    }

    pub fn write(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
        self.value().write_payload(cursor)
    }

    /// On error the previous value is kept.
    pub fn read(&mut self, cursor: &mut Cursor<'_>) -> CodecResult<()> {
        let value = V::read_payload(cursor)?;
        self.set(value);
        Ok(())
    }

    pub fn assign(&mut self, source: &Leaf<'_, V>) {
        self.value_mut().clone_from(source.value());
    }

    /// Owned deep copy.
    pub fn snapshot(&self) -> Leaf<'static, V> {
        Leaf {
            descriptor: self.descriptor.clone(),
            target: Slot::Owned(self.value().clone()),
        }
    }
}

impl<'a, T: Scalar> Leaf<'a, T> {
    pub fn to_text(&self) -> String {
        self.value().to_text()
    }

    pub fn from_text(&mut self, text: &str) {
        self.set(T::from_text(text));
    }
}

impl<'a, T: Scalar> Leaf<'a, Vec<T>> {
    pub fn to_text_array(&self) -> Vec<String> {
        self.value().iter().map(Scalar::to_text).collect()
    }

    /// Replaces the whole array, one element per string.
    pub fn from_text_array<S: AsRef<str>>(&mut self, texts: &[S]) {
        self.set(texts.iter().map(|text| T::from_text(text.as_ref())).collect());
    }
}

impl<'a, V: PartialEq> PartialEq for Leaf<'a, V> {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor && *self.target == *other.target
    }
}

/// Dispatch `$body` over every variant of a leaf sum type.
macro_rules! match_leaf {
    ($value:expr, $leaf:ident => $body:expr) => {
        match $value {
            Self::Bool($leaf) => $body,
            Self::Char($leaf) => $body,
            Self::Int32($leaf) => $body,
            Self::UInt32($leaf) => $body,
            Self::Int64($leaf) => $body,
            Self::Float32($leaf) => $body,
            Self::Float64($leaf) => $body,
            Self::String($leaf) => $body,
        }
    };
}

/// Same-variant structural copy; `false` (and no change) on a kind mismatch.
macro_rules! assign_same_variant {
    ($dest:expr, $source:expr, $ty:ident) => {
        match ($dest, $source) {
            ($ty::Bool(d), $ty::Bool(s)) => d.assign(s),
            ($ty::Char(d), $ty::Char(s)) => d.assign(s),
            ($ty::Int32(d), $ty::Int32(s)) => d.assign(s),
            ($ty::UInt32(d), $ty::UInt32(s)) => d.assign(s),
            ($ty::Int64(d), $ty::Int64(s)) => d.assign(s),
            ($ty::Float32(d), $ty::Float32(s)) => d.assign(s),
            ($ty::Float64(d), $ty::Float64(s)) => d.assign(s),
            ($ty::String(d), $ty::String(s)) => d.assign(s),
            _ => return false,
        }
    };
}

/// A scalar leaf of any kind.
#[derive(Debug, PartialEq)]
pub enum ScalarLeaf<'a> {
    Bool(Leaf<'a, bool>),
    Char(Leaf<'a, i8>),
    Int32(Leaf<'a, i32>),
    UInt32(Leaf<'a, u32>),
    Int64(Leaf<'a, i64>),
    Float32(Leaf<'a, f32>),
    Float64(Leaf<'a, f64>),
    String(Leaf<'a, String>),
}

impl<'a> ScalarLeaf<'a> {
    /// Default-valued owned leaf for a non-array scalar descriptor.
    pub fn owned(descriptor: &TypeDescriptor) -> Option<ScalarLeaf<'static>> {
        if descriptor.is_array {
            return None;
        }
        let leaf = match descriptor.kind {
            Kind::Bool => ScalarLeaf::Bool(Leaf::described(descriptor)),
            Kind::Char => ScalarLeaf::Char(Leaf::described(descriptor)),
            Kind::Int32 => ScalarLeaf::Int32(Leaf::described(descriptor)),
            Kind::UInt32 => ScalarLeaf::UInt32(Leaf::described(descriptor)),
            Kind::Int64 => ScalarLeaf::Int64(Leaf::described(descriptor)),
            Kind::Float32 => ScalarLeaf::Float32(Leaf::described(descriptor)),
            Kind::Float64 => ScalarLeaf::Float64(Leaf::described(descriptor)),
            Kind::String => ScalarLeaf::String(Leaf::described(descriptor)),
            Kind::Composite => return None,
        };
        Some(leaf)
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        match_leaf!(self, leaf => leaf.descriptor())
    }

    pub fn set_designation(&mut self, designation: impl Into<String>) {
        match_leaf!(self, leaf => leaf.set_designation(designation))
    }

    pub fn ownership(&self) -> Ownership {
        match_leaf!(self, leaf => leaf.ownership())
    }

    pub fn required_space(&self) -> usize {
        match_leaf!(self, leaf => leaf.required_space())
    }

    pub fn write(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
        match_leaf!(self, leaf => leaf.write(cursor))
    }

    pub fn read(&mut self, cursor: &mut Cursor<'_>) -> CodecResult<()> {
        match_leaf!(self, leaf => leaf.read(cursor))
    }

    pub fn assign(&mut self, source: &ScalarLeaf<'_>) -> bool {
        assign_same_variant!(self, source, ScalarLeaf);
        true
    }

    pub fn snapshot(&self) -> ScalarLeaf<'static> {
        match self {
            ScalarLeaf::Bool(leaf) => ScalarLeaf::Bool(leaf.snapshot()),
            ScalarLeaf::Char(leaf) => ScalarLeaf::Char(leaf.snapshot()),
            ScalarLeaf::Int32(leaf) => ScalarLeaf::Int32(leaf.snapshot()),
            ScalarLeaf::UInt32(leaf) => ScalarLeaf::UInt32(leaf.snapshot()),
            ScalarLeaf::Int64(leaf) => ScalarLeaf::Int64(leaf.snapshot()),
            ScalarLeaf::Float32(leaf) => ScalarLeaf::Float32(leaf.snapshot()),
            ScalarLeaf::Float64(leaf) => ScalarLeaf::Float64(leaf.snapshot()),
            ScalarLeaf::String(leaf) => ScalarLeaf::String(leaf.snapshot()),
        }
    }

    pub fn to_text(&self) -> String {
        match_leaf!(self, leaf => leaf.to_text())
    }

    /// Never fails; unparseable text yields the zero value.
    pub fn from_text(&mut self, text: &str) {
        match_leaf!(self, leaf => leaf.from_text(text))
    }
}

/// An array leaf of any scalar kind.
#[derive(Debug, PartialEq)]
pub enum ArrayLeaf<'a> {
    Bool(Leaf<'a, Vec<bool>>),
    Char(Leaf<'a, Vec<i8>>),
    Int32(Leaf<'a, Vec<i32>>),
    UInt32(Leaf<'a, Vec<u32>>),
    Int64(Leaf<'a, Vec<i64>>),
    Float32(Leaf<'a, Vec<f32>>),
    Float64(Leaf<'a, Vec<f64>>),
    String(Leaf<'a, Vec<String>>),
}

impl<'a> ArrayLeaf<'a> {
    /// Empty owned array for an array descriptor of a scalar kind.
    pub fn owned(descriptor: &TypeDescriptor) -> Option<ArrayLeaf<'static>> {
        if !descriptor.is_array {
            return None;
        }
        let leaf = match descriptor.kind {
            Kind::Bool => ArrayLeaf::Bool(Leaf::described(descriptor)),
            Kind::Char => ArrayLeaf::Char(Leaf::described(descriptor)),
            Kind::Int32 => ArrayLeaf::Int32(Leaf::described(descriptor)),
            Kind::UInt32 => ArrayLeaf::UInt32(Leaf::described(descriptor)),
            Kind::Int64 => ArrayLeaf::Int64(Leaf::described(descriptor)),
            Kind::Float32 => ArrayLeaf::Float32(Leaf::described(descriptor)),
            Kind::Float64 => ArrayLeaf::Float64(Leaf::described(descriptor)),
            Kind::String => ArrayLeaf::String(Leaf::described(descriptor)),
            Kind::Composite => return None,
        };
        Some(leaf)
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        match_leaf!(self, leaf => leaf.descriptor())
    }

    pub fn set_designation(&mut self, designation: impl Into<String>) {
        match_leaf!(self, leaf => leaf.set_designation(designation))
    }

    pub fn ownership(&self) -> Ownership {
        match_leaf!(self, leaf => leaf.ownership())
    }

    pub fn len(&self) -> usize {
        match_leaf!(self, leaf => leaf.value().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn required_space(&self) -> usize {
        match_leaf!(self, leaf => leaf.required_space())
    }

    pub fn write(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
        match_leaf!(self, leaf => leaf.write(cursor))
    }

    pub fn read(&mut self, cursor: &mut Cursor<'_>) -> CodecResult<()> {
        match_leaf!(self, leaf => leaf.read(cursor))
    }

    pub fn assign(&mut self, source: &ArrayLeaf<'_>) -> bool {
        assign_same_variant!(self, source, ArrayLeaf);
        true
    }

    pub fn snapshot(&self) -> ArrayLeaf<'static> {
        match self {
            ArrayLeaf::Bool(leaf) => ArrayLeaf::Bool(leaf.snapshot()),
            ArrayLeaf::Char(leaf) => ArrayLeaf::Char(leaf.snapshot()),
            ArrayLeaf::Int32(leaf) => ArrayLeaf::Int32(leaf.snapshot()),
            ArrayLeaf::UInt32(leaf) => ArrayLeaf::UInt32(leaf.snapshot()),
            ArrayLeaf::Int64(leaf) => ArrayLeaf::Int64(leaf.snapshot()),
            ArrayLeaf::Float32(leaf) => ArrayLeaf::Float32(leaf.snapshot()),
            ArrayLeaf::Float64(leaf) => ArrayLeaf::Float64(leaf.snapshot()),
            ArrayLeaf::String(leaf) => ArrayLeaf::String(leaf.snapshot()),
        }
    }

    pub fn to_text_array(&self) -> Vec<String> {
        match_leaf!(self, leaf => leaf.to_text_array())
    }

    pub fn from_text_array<S: AsRef<str>>(&mut self, texts: &[S]) {
        match_leaf!(self, leaf => leaf.from_text_array(texts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_leaf_descriptor_matches_type() {
        let leaf = Leaf::<Vec<u32>>::owned("samples");
        assert_eq!(leaf.descriptor().kind, Kind::UInt32);
        assert!(leaf.descriptor().is_array);
        assert_eq!(leaf.ownership(), Ownership::Owned);
        assert!(leaf.value().is_empty());
    }

    #[test]
    fn test_described_leaf_ignores_foreign_kind() {
        let foreign = TypeDescriptor::array("count", Kind::String).with_designation("n");
        let leaf = Leaf::<i64>::described(&foreign);
        assert_eq!(leaf.descriptor().kind, Kind::Int64);
        assert!(!leaf.descriptor().is_array);
        assert_eq!(leaf.descriptor().designation, "n");
    }

    #[test]
    fn test_bound_leaf_reads_into_variable() {
        let mut payload = vec![0u8; 8];
        42i64.encode(&mut CursorMut::new(&mut payload)).unwrap();

        let mut counter = 0i64;
        {
            let mut leaf = Leaf::bound("counter", &mut counter);
            assert_eq!(leaf.ownership(), Ownership::Referenced);
            leaf.read(&mut Cursor::new(&payload)).unwrap();
        }
        assert_eq!(counter, 42);
    }

    #[test]
    fn test_failed_read_keeps_value() {
        let mut leaf = Leaf::with_value("x", 9i32);
        assert!(leaf.read(&mut Cursor::new(&[1, 2])).is_err());
        assert_eq!(*leaf.value(), 9);
    }

    #[test]
    fn test_array_payload_layout() {
        let leaf = Leaf::with_value("tags", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(leaf.required_space(), 4 + 2 + 2);
        let mut buffer = vec![0u8; leaf.required_space()];
        leaf.write(&mut CursorMut::new(&mut buffer)).unwrap();
        assert_eq!(buffer, [2, 0, 0, 0, b'a', 0, b'b', 0]);

        let mut restored = Leaf::<Vec<String>>::owned("tags");
        restored.read(&mut Cursor::new(&buffer)).unwrap();
        assert_eq!(restored, leaf);
    }

    #[test]
    fn test_array_rejects_oversized_count() {
        let mut buffer = 3i32.to_le_bytes().to_vec();
        buffer.extend_from_slice(&1.0f64.to_le_bytes());
        let mut leaf = Leaf::<Vec<f64>>::owned("rates");
        assert!(leaf.read(&mut Cursor::new(&buffer)).is_err());
        assert!(leaf.value().is_empty());
    }

    #[test]
    fn test_scalar_leaf_assign_mismatch_is_noop() {
        let mut dest = ScalarLeaf::Int32(Leaf::with_value("x", 1));
        let source = ScalarLeaf::String(Leaf::with_value("x", "one".to_string()));
        assert!(!dest.assign(&source));
        assert_eq!(dest.to_text(), "1");

        let source = ScalarLeaf::Int32(Leaf::with_value("x", 5));
        assert!(dest.assign(&source));
        assert_eq!(dest.to_text(), "5");
    }

    #[test]
    fn test_assign_keeps_destination_binding() {
        let mut target = vec![1.0f32];
        let source = ArrayLeaf::Float32(Leaf::with_value("v", vec![2.0, 3.0]));
        {
            let mut dest = ArrayLeaf::Float32(Leaf::bound("v", &mut target));
            assert!(dest.assign(&source));
            assert_eq!(dest.ownership(), Ownership::Referenced);
        }
        assert_eq!(target, vec![2.0, 3.0]);
    }

    #[test]
    fn test_text_array_conversion() {
        let mut leaf = ArrayLeaf::owned(&TypeDescriptor::array("v", Kind::Int32)).unwrap();
        leaf.from_text_array(["1", "x", "-3"].as_slice());
        assert_eq!(leaf.len(), 3);
        assert_eq!(leaf.to_text_array(), vec!["1", "0", "-3"]);
    }

    #[test]
    fn test_owned_rejects_wrong_shape() {
        assert!(ScalarLeaf::owned(&TypeDescriptor::composite("c")).is_none());
        assert!(ScalarLeaf::owned(&TypeDescriptor::array("a", Kind::Bool)).is_none());
        assert!(ArrayLeaf::owned(&TypeDescriptor::scalar("s", Kind::Bool)).is_none());
    }

    #[test]
    fn test_snapshot_detaches_from_variable() {
        let mut name = "probe".to_string();
        let copy = {
            let leaf = ScalarLeaf::String(Leaf::bound("name", &mut name));
            leaf.snapshot()
        };
        name.push_str("-2");
        assert_eq!(copy.ownership(), Ownership::Owned);
        assert_eq!(copy.to_text(), "probe");
    }
}
