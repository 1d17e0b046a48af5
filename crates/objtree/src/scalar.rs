// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar value kinds: binary payload and canonical text form.
//!
//! Text conversion never fails. Unparseable numeric text decodes as the
//! longest valid numeric prefix, or zero when there is none.

use crate::cursor::{cstr_len, CodecResult, Cursor, CursorMut};
use crate::descriptor::Kind;
use std::fmt;

/// A value that can live in a scalar leaf.
pub trait Scalar: Clone + Default + PartialEq + fmt::Debug + 'static {
    const KIND: Kind;

    /// Bytes taken by `encode`.
    fn encoded_len(&self) -> usize;

    fn encode(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()>;

    fn decode(cursor: &mut Cursor<'_>) -> CodecResult<Self>;

    fn to_text(&self) -> String;

    fn from_text(text: &str) -> Self;
}

macro_rules! impl_fixed_scalar {
    ($type:ty, $kind:ident, $write:ident, $read:ident, |$value:ident| $to_text:expr, |$text:ident| $from_text:expr) => {
        impl Scalar for $type {
            const KIND: Kind = Kind::$kind;

            fn encoded_len(&self) -> usize {
                std::mem::size_of::<$type>()
            }

            fn encode(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
                cursor.$write(*self)
            }

            fn decode(cursor: &mut Cursor<'_>) -> CodecResult<Self> {
                cursor.$read()
            }

            fn to_text(&self) -> String {
                let $value = *self;
                $to_text
            }

            fn from_text($text: &str) -> Self {
                $from_text
            }
        }
    };
}

impl_fixed_scalar!(
    bool,
    Bool,
    write_bool,
    read_bool,
    |value| if value { "true".into() } else { "false".into() },
    |text| text.trim() == "true"
);
impl_fixed_scalar!(i8, Char, write_i8, read_i8, |value| value.to_string(), |text| {
    parse_int_prefix(text) as i8
});
impl_fixed_scalar!(i32, Int32, write_i32, read_i32, |value| value.to_string(), |text| {
    parse_int_prefix(text) as i32
});
impl_fixed_scalar!(u32, UInt32, write_u32, read_u32, |value| value.to_string(), |text| {
    parse_int_prefix(text) as u32
});
impl_fixed_scalar!(i64, Int64, write_i64, read_i64, |value| value.to_string(), |text| {
    parse_int_prefix(text)
});
impl_fixed_scalar!(
    f32,
    Float32,
    write_f32,
    read_f32,
    |value| format_scientific(f64::from(value)),
    |text| parse_float_prefix(text) as f32
);
impl_fixed_scalar!(
    f64,
    Float64,
    write_f64,
    read_f64,
    |value| format_scientific(value),
    |text| parse_float_prefix(text)
);

impl Scalar for String {
    const KIND: Kind = Kind::String;

    fn encoded_len(&self) -> usize {
        cstr_len(self)
    }

    fn encode(&self, cursor: &mut CursorMut<'_>) -> CodecResult<()> {
        cursor.write_cstr(self)
    }

    fn decode(cursor: &mut Cursor<'_>) -> CodecResult<Self> {
        cursor.read_cstr()
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> Self {
        text.to_owned()
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits.
/// Stops at the first non-digit; overflow wraps.
pub fn parse_int_prefix(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.wrapping_mul(10).wrapping_add(i64::from(digit - b'0'))
        });
    if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}

/// Leading-float parse: the longest prefix that reads as a number, else 0.
pub fn parse_float_prefix(text: &str) -> f64 {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value;
    }
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(trimmed.len());
    let candidate = &trimmed[..end];
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Six significant digits in scientific form with a signed, two-digit
/// exponent: `2.50000e+00`.
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let formatted = format!("{:.5e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}
