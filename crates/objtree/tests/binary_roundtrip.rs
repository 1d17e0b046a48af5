// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record buffer round trips through fresh default trees.

use objtree::{
    CodecError, CompositeArrayNode, CompositeNode, CompositeShape, Kind, Node, TypeDescriptor,
    MAX_DEPTH,
};

struct Sample;

impl CompositeShape for Sample {
    fn populate(element: &mut CompositeNode<'static>) {
        element.add_value("t", 0i64);
        element.add_value("value", 0.0f32);
    }
}

/// Default-valued tree covering every kind.
fn template() -> CompositeNode<'static> {
    let mut node = CompositeNode::new("record");
    node.add_value("flag", false);
    node.add_value("letter", 0i8);
    node.add_value("count", 0i32);
    node.add_value("mask", 0u32);
    node.add_value("stamp", 0i64);
    node.add_value("ratio", 0.0f32);
    node.add_value("rate", 0.0f64);
    node.add_value("label", String::new());
    node.add_value("flags", Vec::<bool>::new());
    node.add_value("counts", Vec::<i32>::new());
    node.add_value("rates", Vec::<f64>::new());
    node.add_value("labels", Vec::<String>::new());

    let mut limits = CompositeNode::new("limits").with_designation("range");
    limits.add_value("min", 0.0f64);
    limits.add_value("max", 0.0f64);
    node.attach_child(limits.into());
    node.attach_child(CompositeArrayNode::with_shape::<Sample>("samples").into());
    node
}

fn word(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(..12);
    (0..len).map(|_| rng.alphanumeric()).collect()
}

fn randomize(node: &mut CompositeNode<'static>, rng: &mut fastrand::Rng) {
    node.set_id(rng.i64(..));
    node.set("flag", rng.bool());
    node.set("letter", rng.i8(..));
    node.set("count", rng.i32(..));
    node.set("mask", rng.u32(..));
    node.set("stamp", rng.i64(..));
    node.set("ratio", rng.f32() * 1000.0 - 500.0);
    node.set("rate", rng.f64() * 1e6 - 5e5);
    node.set("label", word(rng));
    node.set("flags", (0..rng.usize(..8)).map(|_| rng.bool()).collect::<Vec<_>>());
    node.set("counts", (0..rng.usize(..8)).map(|_| rng.i32(..)).collect::<Vec<_>>());
    node.set("rates", (0..rng.usize(..8)).map(|_| rng.f64()).collect::<Vec<_>>());
    node.set("labels", (0..rng.usize(..8)).map(|_| word(rng)).collect::<Vec<_>>());

    let limits = node.composite_mut("limits").expect("limits");
    limits.set("min", -rng.f64());
    limits.set("max", rng.f64());

    let samples = node.composite_array_mut("samples").expect("samples");
    samples.clear();
    for _ in 0..rng.usize(..5) {
        let mut sample = samples.new_element();
        sample.set("t", rng.i64(..));
        sample.set("value", rng.f32());
        samples.add(&sample);
    }
}

#[test]
fn test_random_trees_roundtrip_exactly() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..50 {
        let mut source = template();
        randomize(&mut source, &mut rng);

        let bytes = source.to_bytes().expect("encode");
        assert_eq!(bytes.len(), source.required_space());

        let mut restored = template();
        let consumed = restored.read_bytes(&bytes).expect("decode");
        assert_eq!(consumed, bytes.len());
        assert_eq!(restored, source);
    }
}

#[test]
fn test_decode_into_empty_tree_grafts_everything() {
    let mut rng = fastrand::Rng::with_seed(11);
    let mut source = template();
    randomize(&mut source, &mut rng);
    let bytes = source.to_bytes().expect("encode");

    let mut restored = CompositeNode::new("record");
    restored.read_bytes(&bytes).expect("decode");
    assert_eq!(restored.field_names(), source.field_names());
    assert_eq!(restored.get::<String>("label"), source.get::<String>("label"));
    assert_eq!(
        restored.composite("limits").map(|l| l.descriptor().designation.as_str()),
        Some("range")
    );

    let samples = restored.composite_array("samples").expect("samples grafted");
    assert_eq!(samples.len(), source.composite_array("samples").map_or(0, |s| s.len()));
    for (got, want) in samples.iter().zip(source.composite_array("samples").expect("samples")) {
        assert_eq!(got.get::<i64>("t"), want.get::<i64>("t"));
    }
}

#[test]
fn test_cfg_scenario_binary() {
    let mut rate = 2.5f64;
    let mut tags = vec!["a".to_string(), "b".to_string()];
    let bytes = {
        let mut cfg = CompositeNode::new("cfg");
        assert!(cfg.bind_field("rate", &mut rate));
        assert!(cfg.bind_field("tags", &mut tags));
        cfg.to_bytes().expect("encode")
    };

    let mut decoded_rate = 0.0f64;
    let mut decoded_tags: Vec<String> = Vec::new();
    {
        let mut cfg = CompositeNode::new("cfg");
        cfg.bind_field("rate", &mut decoded_rate);
        cfg.bind_field("tags", &mut decoded_tags);
        cfg.read_bytes(&bytes).expect("decode");
    }
    assert_eq!(decoded_rate, 2.5);
    assert_eq!(decoded_tags, vec!["a", "b"]);
}

#[test]
fn test_stream_retypes_local_field() {
    let mut source = CompositeNode::new("cfg");
    source.add_value("mode", 3i32);
    let bytes = source.to_bytes().expect("encode");

    let mut mode = String::from("fast");
    {
        let mut target = CompositeNode::new("cfg");
        target.bind_field("mode", &mut mode);
        target.read_bytes(&bytes).expect("decode");
        assert_eq!(target.get::<i32>("mode"), Some(&3));
    }
    assert_eq!(mode, "fast");
}

#[test]
fn test_field_order_on_wire_is_irrelevant() {
    // Hand-built record: "b" before "a", the reverse of the in-memory order.
    let mut bytes = 2i32.to_le_bytes().to_vec();
    bytes.extend(TypeDescriptor::scalar("b", Kind::Int32).encode().expect("desc"));
    bytes.extend(20i32.to_le_bytes());
    bytes.extend(TypeDescriptor::scalar("a", Kind::Int32).encode().expect("desc"));
    bytes.extend(10i32.to_le_bytes());

    let mut node = CompositeNode::new("n");
    node.add_value("a", 0i32);
    node.add_value("b", 0i32);
    node.read_bytes(&bytes).expect("decode");
    assert_eq!(node.get::<i32>("a"), Some(&10));
    assert_eq!(node.get::<i32>("b"), Some(&20));
}

#[test]
fn test_unknown_kind_byte_is_reported() {
    let mut bytes = 1i32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[b'x', 0, 0, 200, 0]);
    let mut node = CompositeNode::new("n");
    let err = node.read_bytes(&bytes).expect_err("bad kind");
    assert!(matches!(err, objtree::CodecError::UnknownKind { tag: 200, .. }));
    assert!(node.is_empty());
}

#[test]
fn test_field_count_larger_than_buffer_is_rejected() {
    let bytes = 1_000_000i32.to_le_bytes();
    let mut node = CompositeNode::new("n");
    assert!(node.read_bytes(&bytes).is_err());
    assert!(node.is_empty());
}

/// `levels` composites nested inside the root, innermost one empty.
fn nested_record(levels: usize) -> Vec<u8> {
    let descriptor = TypeDescriptor::composite("").encode().expect("descriptor");
    let mut bytes = Vec::new();
    for _ in 0..levels {
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&descriptor);
    }
    bytes.extend_from_slice(&0i32.to_le_bytes());
    bytes
}

#[test]
fn test_deep_nesting_is_rejected() {
    let bytes = nested_record(5_000);
    let mut node = CompositeNode::new("n");
    match node.read_bytes(&bytes) {
        Err(CodecError::ReadFailed { reason, .. }) => {
            assert!(reason.contains("nesting too deep"), "{}", reason)
        }
        other => panic!("expected a depth error, got {:?}", other),
    }
}

#[test]
fn test_nesting_up_to_limit_decodes() {
    let bytes = nested_record(MAX_DEPTH - 1);
    let mut node = CompositeNode::new("n");
    assert_eq!(node.read_bytes(&bytes).expect("decode"), bytes.len());

    let mut node = CompositeNode::new("n");
    assert!(node.read_bytes(&nested_record(MAX_DEPTH)).is_err());
}

#[test]
fn test_every_truncation_fails_cleanly() {
    let mut rng = fastrand::Rng::with_seed(3);
    let mut source = template();
    randomize(&mut source, &mut rng);
    let bytes = source.to_bytes().expect("encode");
    for len in 0..bytes.len() {
        let mut restored = template();
        assert!(restored.read_bytes(&bytes[..len]).is_err(), "prefix of {} bytes", len);
    }
}

#[test]
fn test_nested_node_encoding_matches_payload() {
    let node = Node::from_descriptor(&TypeDescriptor::composite_array("runs"));
    let mut parent = CompositeNode::new("p");
    parent.attach_child(node);
    let bytes = parent.to_bytes().expect("encode");
    // count + descriptor("runs", "", kind, flag) + empty array count
    assert_eq!(bytes.len(), 4 + (5 + 1 + 2) + 4);
    assert_eq!(bytes[4 + 5 + 1], Kind::Composite.tag());
    assert_eq!(bytes[4 + 5 + 1 + 1], 1);
}
