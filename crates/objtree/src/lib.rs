// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! objtree: self-describing object-graph serialization.
//!
//! Build a tree of named fields, some owned by the tree and some bound
//! straight to application variables, then:
//! - encode it to a flat little-endian record buffer and decode it back,
//!   reshaping the tree to whatever fields the record carries;
//! - project it to and from an XML document for hand-edited configuration.
//!
//! # Quick Start
//!
//! ```
//! use objtree::{CompositeNode, XmlOptions};
//!
//! let mut rate = 2.5f64;
//! let mut tags = vec!["a".to_string(), "b".to_string()];
//!
//! let mut cfg = CompositeNode::new("cfg");
//! cfg.bind_field("rate", &mut rate);
//! cfg.bind_field("tags", &mut tags);
//!
//! let bytes = cfg.to_bytes().unwrap();
//! let xml = objtree::to_xml_string(&cfg, &XmlOptions::default());
//! assert!(xml.contains("<val>a</val>"));
//!
//! let mut restored = CompositeNode::new("cfg");
//! restored.read_bytes(&bytes).unwrap();
//! assert_eq!(restored.get::<f64>("rate"), Some(&2.5));
//! assert_eq!(restored.get_array::<String>("tags").map(<[String]>::len), Some(2));
//! ```
//!
//! # Reconciliation
//!
//! | Path | Prune absent fields | Graft new fields | Retype changed fields |
//! |------|---------------------|------------------|-----------------------|
//! | `CompositeNode::assign` | yes | yes | yes |
//! | binary `read` | no | yes | yes |
//! | document read | no | no | no |

pub mod composite;
pub mod composite_array;
pub mod config;
pub mod cursor;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod leaf;
pub mod node;
pub mod projection;
pub mod reconcile;
pub mod scalar;
pub mod slot;

pub use composite::CompositeNode;
pub use composite_array::{CompositeArrayNode, CompositeShape, Untyped};
pub use config::{XmlOptions, ENTRY_TAG};
pub use cursor::{CodecError, CodecResult, Cursor, CursorMut, MAX_DEPTH};
pub use descriptor::{Kind, TypeDescriptor};
pub use document::{is_element_name, parse_xml, DocumentError, Element};
pub use error::{Error, Result};
pub use leaf::{ArrayLeaf, Bindable, Leaf, ScalarLeaf};
pub use node::Node;
pub use projection::{
    add_to_element, load_xml_file, read_document, read_from_element, read_xml_str, save_xml_file,
    to_xml_string, write_document, write_fields,
};
pub use reconcile::{prune_missing, reconcile_shape, ShapeChange};
pub use scalar::Scalar;
pub use slot::{Ownership, Slot};
