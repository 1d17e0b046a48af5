// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for record buffers.
//!
//! All multi-byte values are little-endian. Strings are NUL-terminated and
//! element/field counts are `i32` prefixes.

use std::fmt;

/// Errors raised while encoding or decoding a record buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    WriteFailed { offset: usize, reason: String },
    ReadFailed { offset: usize, reason: String },
    UnknownKind { offset: usize, tag: u8 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {}: {}", offset, reason)
            }
            CodecError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            CodecError::UnknownKind { offset, tag } => {
                write!(f, "unknown kind tag {} at offset {}", tag, offset)
            }
        }
    }
}

impl std::error::Error for CodecError {}

pub type CodecResult<T> = core::result::Result<T, CodecError>;

/// Deepest composite nesting a read will follow before giving up.
pub const MAX_DEPTH: usize = 128;

/// Generate little-endian write methods for fixed-width values.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> CodecResult<()> {
            self.write_bytes(&value.to_le_bytes())
        }
    };
}

/// Generate little-endian read methods for fixed-width values.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> CodecResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Mutable cursor for writing into a pre-sized buffer (bounds-checked).
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    impl_write_le!(write_u8, u8);
    impl_write_le!(write_i8, i8);
    impl_write_le!(write_i32, i32);
    impl_write_le!(write_u32, u32);
    impl_write_le!(write_i64, i64);
    impl_write_le!(write_f32, f32);
    impl_write_le!(write_f64, f64);

    pub fn write_bool(&mut self, value: bool) -> CodecResult<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> CodecResult<()> {
        if data.len() > self.remaining() {
            return Err(CodecError::WriteFailed {
                offset: self.offset,
                reason: "buffer too small".into(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Writes `value` up to its first NUL byte, then the terminator.
    pub fn write_cstr(&mut self, value: &str) -> CodecResult<()> {
        self.write_bytes(cstr_bytes(value))?;
        self.write_u8(0)
    }

    /// Writes an `i32` element/field count.
    pub fn write_count(&mut self, count: usize) -> CodecResult<()> {
        let count = i32::try_from(count).map_err(|_| CodecError::WriteFailed {
            offset: self.offset,
            reason: format!("count {} does not fit an i32 prefix", count),
        })?;
        self.write_i32(count)
    }
}

/// Immutable cursor for reading (bounds-checked, zero-copy).
///
/// Also tracks how many composites are open so hostile nesting fails with
/// an error instead of exhausting the stack.
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            depth: 0,
        }
    }

    /// Current composite nesting level.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Open one composite level; fails past [`MAX_DEPTH`].
    pub fn enter(&mut self) -> CodecResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(CodecError::ReadFailed {
                offset: self.offset,
                reason: format!("nesting too deep (limit {})", MAX_DEPTH),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    impl_read_le!(read_u8, u8, 1);
    impl_read_le!(read_i8, i8, 1);
    impl_read_le!(read_i32, i32, 4);
    impl_read_le!(read_u32, u32, 4);
    impl_read_le!(read_i64, i64, 8);
    impl_read_le!(read_f32, f32, 4);
    impl_read_le!(read_f64, f64, 8);

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Reads a NUL-terminated string. Invalid UTF-8 is replaced lossily.
    pub fn read_cstr(&mut self) -> CodecResult<String> {
        let rest = &self.buffer[self.offset.min(self.buffer.len())..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| CodecError::ReadFailed {
                offset: self.offset,
                reason: "unterminated string".into(),
            })?;
        let bytes = self.read_bytes(len + 1)?;
        Ok(String::from_utf8_lossy(&bytes[..len]).into_owned())
    }

    /// Reads an `i32` count and checks it against the bytes left, given the
    /// smallest possible encoding of one counted item.
    pub fn read_count(&mut self, min_item_len: usize) -> CodecResult<usize> {
        let offset = self.offset;
        let raw = self.read_i32()?;
        let count = usize::try_from(raw).map_err(|_| CodecError::ReadFailed {
            offset,
            reason: format!("negative count {}", raw),
        })?;
        if count.saturating_mul(min_item_len) > self.remaining() {
            return Err(CodecError::ReadFailed {
                offset,
                reason: format!(
                    "count {} exceeds the {} byte(s) left",
                    count,
                    self.remaining()
                ),
            });
        }
        Ok(count)
    }
}

/// Bytes of `value` that make it onto the wire (everything before the first NUL).
pub(crate) fn cstr_bytes(value: &str) -> &[u8] {
    let bytes = value.as_bytes();
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Encoded size of a NUL-terminated string, terminator included.
pub(crate) fn cstr_len(value: &str) -> usize {
    cstr_bytes(value).len() + 1
}
