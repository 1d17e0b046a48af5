// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XML output options.
//!
//! Defaults can be overridden from the environment:
//!
//! - `OBJTREE_XML_INDENT`: indent nested elements (`1`/`true` or `0`/`false`, default: on)
//! - `OBJTREE_XML_INDENT_WIDTH`: spaces per nesting level (default: 2)
//! - `OBJTREE_XML_ESCAPE`: escape `& < > " '` in text (default: on)
//!
//! # Example
//!
//! ```bash
//! export OBJTREE_XML_INDENT=1
//! export OBJTREE_XML_INDENT_WIDTH=4
//! ```

use std::env;

/// Environment variable names
pub const ENV_XML_INDENT: &str = "OBJTREE_XML_INDENT";
pub const ENV_XML_INDENT_WIDTH: &str = "OBJTREE_XML_INDENT_WIDTH";
pub const ENV_XML_ESCAPE: &str = "OBJTREE_XML_ESCAPE";

/// Tag of the child elements holding array entries.
pub const ENTRY_TAG: &str = "val";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlOptions {
    /// One element per line, nested elements indented.
    pub indent: bool,
    pub indent_width: usize,
    /// Replace markup characters in text with entity references. Turning
    /// this off can produce documents that do not parse back.
    pub escape_entities: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: true,
            indent_width: 2,
            escape_entities: true,
        }
    }
}

impl XmlOptions {
    /// Single-line output.
    pub fn compact() -> Self {
        Self {
            indent: false,
            ..Self::default()
        }
    }

    /// Defaults overridden by `OBJTREE_XML_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(indent) = lookup(ENV_XML_INDENT).and_then(|v| parse_flag(ENV_XML_INDENT, &v)) {
            options.indent = indent;
        }
        if let Some(width) = lookup(ENV_XML_INDENT_WIDTH) {
            match width.trim().parse::<usize>() {
                Ok(width) => options.indent_width = width,
                Err(_) => log::warn!("[objtree] ignoring {}={:?}", ENV_XML_INDENT_WIDTH, width),
            }
        }
        if let Some(escape) = lookup(ENV_XML_ESCAPE).and_then(|v| parse_flag(ENV_XML_ESCAPE, &v)) {
            options.escape_entities = escape;
        }
        options
    }
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            log::warn!("[objtree] ignoring {}={:?}", key, value);
            None
        }
    }
}
