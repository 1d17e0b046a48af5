// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the self-describing tag written ahead of every
//! composite field in a record buffer.

use crate::cursor::{cstr_len, CodecError, CodecResult, Cursor, CursorMut};
use std::fmt;

/// Closed set of value kinds. The discriminant is the on-wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    Bool = 0,
    Char = 1,
    Int32 = 2,
    UInt32 = 3,
    Int64 = 4,
    Float32 = 5,
    Float64 = 6,
    String = 7,
    Composite = 8,
}

impl Kind {
    /// Every kind, in tag order.
    pub const ALL: [Kind; 9] = [
        Kind::Bool,
        Kind::Char,
        Kind::Int32,
        Kind::UInt32,
        Kind::Int64,
        Kind::Float32,
        Kind::Float64,
        Kind::String,
        Kind::Composite,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Resolve a short type name (`"int"`, `"double"`, `"comp"`, ...).
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Kind::Bool),
            "char" => Some(Kind::Char),
            "int" => Some(Kind::Int32),
            "uint" => Some(Kind::UInt32),
            "int64" => Some(Kind::Int64),
            "float" => Some(Kind::Float32),
            "double" => Some(Kind::Float64),
            "string" => Some(Kind::String),
            "comp" => Some(Kind::Composite),
            _ => None,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Char => "char",
            Kind::Int32 => "int",
            Kind::UInt32 => "uint",
            Kind::Int64 => "int64",
            Kind::Float32 => "float",
            Kind::Float64 => "double",
            Kind::String => "string",
            Kind::Composite => "comp",
        }
    }

    /// Encoded width of one value (None for strings and composites).
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Kind::Bool | Kind::Char => Some(1),
            Kind::Int32 | Kind::UInt32 | Kind::Float32 => Some(4),
            Kind::Int64 | Kind::Float64 => Some(8),
            Kind::String | Kind::Composite => None,
        }
    }

    /// Smallest possible encoding of one value of this kind.
    pub fn min_encoded_len(self) -> usize {
        match self {
            Kind::String => 1,
            Kind::Composite => 4,
            other => other.fixed_size().unwrap_or(1),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Name, designation, kind and array flag of one node.
///
/// Equality compares name, kind and array flag; the designation is a free
/// classification label and is ignored.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Field name within the parent composite.
    pub name: String,
    /// Optional classification, e.g. `"date"`. Empty when unset.
    pub designation: String,
    pub kind: Kind,
    pub is_array: bool,
}

impl TypeDescriptor {
    /// Smallest possible encoding: two empty strings plus kind and flag bytes.
    pub const MIN_ENCODED_LEN: usize = 4;

    pub fn new(name: impl Into<String>, kind: Kind, is_array: bool) -> Self {
        Self {
            name: name.into(),
            designation: String::new(),
            kind,
            is_array,
        }
    }

    pub fn scalar(name: impl Into<String>, kind: Kind) -> Self {
        Self::new(name, kind, false)
    }

    pub fn array(name: impl Into<String>, kind: Kind) -> Self {
        Self::new(name, kind, true)
    }

    pub fn composite(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Composite, false)
    }

    pub fn composite_array(name: impl Into<String>) -> Self {
        Self::new(name, Kind::Composite, true)
    }

    /// Build from a short type name; `None` if the name is not recognized.
    pub fn from_type_name(name: impl Into<String>, type_name: &str, is_array: bool) -> Option<Self> {
        Kind::from_type_name(type_name).map(|kind| Self::new(name, kind, is_array))
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = designation.into();
        self
    }

    /// Same kind and array-ness; names and designations are not compared.
    pub fn same_kind(&self, other: &TypeDescriptor) -> bool {
        self.kind == other.kind && self.is_array == other.is_array
    }

    /// Descriptor of one element of an array node (same name, not an array).
    pub fn element(&self) -> TypeDescriptor {
        TypeDescriptor {
            is_array: false,
            ..self.clone()
        }
    }

    pub fn required_space(&self) -> usize {
        cstr_len(&self.name) + cstr_len(&self.designation) + 2
    }

    pub fn write(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
        cursor.write_cstr(&self.name)?;
        cursor.write_cstr(&self.designation)?;
        cursor.write_u8(self.kind.tag())?;
        cursor.write_bool(self.is_array)
    }

    pub fn read(cursor: &mut Cursor<'_>) -> CodecResult<Self> {
        let name = cursor.read_cstr()?;
        let designation = cursor.read_cstr()?;
        let offset = cursor.offset();
        let tag = cursor.read_u8()?;
        let kind = Kind::from_tag(tag).ok_or(CodecError::UnknownKind { offset, tag })?;
        let is_array = cursor.read_bool()?;
        Ok(Self {
            name,
            designation,
            kind,
            is_array,
        })
    }

    /// Encode into a freshly allocated buffer of exactly `required_space()` bytes.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut buffer = vec![0u8; self.required_space()];
        self.write(&mut CursorMut::new(&mut buffer))?;
        Ok(buffer)
    }

    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Self::read(&mut Cursor::new(bytes))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.same_kind(other)
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind)?;
        if self.is_array {
            f.write_str("[]")?;
        }
        if !self.designation.is_empty() {
            write!(f, " <{}>", self.designation)?;
        }
        Ok(())
    }
}
