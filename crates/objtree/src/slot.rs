// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Storage behind a leaf: a value the tree owns, or an application
//! variable the tree only aliases.

use std::ops::{Deref, DerefMut};

/// Who is responsible for a field's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Allocated by the tree; dropped with its parent.
    Owned,
    /// Supplied by the application; the tree never drops it.
    Referenced,
}

/// Target of a leaf node.
#[derive(Debug)]
pub enum Slot<'a, T> {
    Owned(T),
    Borrowed(&'a mut T),
}

impl<'a, T> Slot<'a, T> {
    pub fn ownership(&self) -> Ownership {
        match self {
            Slot::Owned(_) => Ownership::Owned,
            Slot::Borrowed(_) => Ownership::Referenced,
        }
    }
}

impl<'a, T: Default> Default for Slot<'a, T> {
    fn default() -> Self {
        Slot::Owned(T::default())
    }
}

impl<'a, T> Deref for Slot<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Slot::Owned(value) => value,
            Slot::Borrowed(target) => target,
        }
    }
}

impl<'a, T> DerefMut for Slot<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        match self {
            Slot::Owned(value) => value,
            Slot::Borrowed(target) => target,
        }
    }
}
