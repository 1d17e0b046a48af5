// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Document projection and XML persistence.

use objtree::{
    load_xml_file, parse_xml, read_document, read_xml_str, save_xml_file, to_xml_string,
    write_document, CompositeArrayNode, CompositeNode, CompositeShape, Element, XmlOptions,
    ENTRY_TAG,
};
use tempfile::tempdir;

struct Step;

impl CompositeShape for Step {
    fn populate(element: &mut CompositeNode<'static>) {
        element.add_value("target", 0.0f64);
        element.add_value("hold", 0u32);
    }
}

fn default_profile() -> CompositeNode<'static> {
    let mut node = CompositeNode::new("profile");
    node.add_value("name", String::new());
    node.add_value("enabled", false);
    node.add_value("offset", 0i64);
    node.add_value("gain", 0.0f32);
    node.add_value("limits", Vec::<f64>::new());
    node.add_value("notes", Vec::<String>::new());
    let mut pid = CompositeNode::new("pid");
    pid.add_value("kp", 0.0f64);
    pid.add_value("ki", 0.0f64);
    node.attach_child(pid.into());
    node.attach_child(CompositeArrayNode::with_shape::<Step>("steps").into());
    node
}

fn step(target: f64, hold: u32) -> CompositeNode<'static> {
    let mut node = CompositeNode::new("step");
    node.add_value("target", target);
    node.add_value("hold", hold);
    node
}

fn sample_profile() -> CompositeNode<'static> {
    let mut node = default_profile();
    node.set("name", "ramp <fast> & \"hot\"".to_string());
    node.set("enabled", true);
    node.set("offset", -1_234_567_890_123i64);
    node.set("gain", 0.125f32);
    node.set("limits", vec![-40.0, 125.0]);
    node.set("notes", vec!["first".to_string(), String::new(), "  spaced  ".to_string()]);
    let pid = node.composite_mut("pid").expect("pid");
    pid.set("kp", 1.5f64);
    pid.set("ki", 0.03125f64);
    let steps = node.composite_array_mut("steps").expect("steps");
    steps.add(&step(100.0, 30));
    steps.add(&step(250.0, 60));
    node
}

#[test]
fn test_document_roundtrip_reproduces_values() {
    let source = sample_profile();
    for options in [XmlOptions::default(), XmlOptions::compact()] {
        let xml = to_xml_string(&source, &options);
        let mut restored = default_profile();
        assert!(read_xml_str(&mut restored, &xml).expect("parse"));
        assert_eq!(restored, source, "{}", xml);
    }
}

#[test]
fn test_floats_keep_six_significant_digits() {
    let mut source = CompositeNode::new("m");
    source.add_value("pi", std::f64::consts::PI);
    let doc = write_document(&source);
    assert_eq!(doc.child("pi").and_then(Element::text), Some("3.14159e+00"));

    let mut restored = CompositeNode::new("m");
    restored.add_value("pi", 0.0f64);
    read_document(&mut restored, &doc);
    assert_eq!(restored.get::<f64>("pi"), Some(&3.14159));
}

#[test]
fn test_idempotent_save() {
    let source = sample_profile();
    let first = to_xml_string(&source, &XmlOptions::default());
    let second = to_xml_string(&source, &XmlOptions::default());
    assert_eq!(first, second);

    let mut a = default_profile();
    let mut b = default_profile();
    read_xml_str(&mut a, &first).expect("first");
    read_xml_str(&mut b, &second).expect("second");
    assert_eq!(a, b);
}

#[test]
fn test_cfg_scenario_document() {
    let mut rate = 2.5f64;
    let mut tags = vec!["a".to_string(), "b".to_string()];
    let mut cfg = CompositeNode::new("cfg");
    cfg.bind_field("rate", &mut rate);
    cfg.bind_field("tags", &mut tags);

    let doc = write_document(&cfg);
    let tags_element = doc.child("tags").expect("tags element");
    assert_eq!(tags_element.children().len(), 2);
    let texts: Vec<_> = tags_element
        .children()
        .iter()
        .map(|entry| (entry.name(), entry.text()))
        .collect();
    assert_eq!(texts, vec![(ENTRY_TAG, Some("a")), (ENTRY_TAG, Some("b"))]);
}

#[test]
fn test_document_read_never_reshapes() {
    let xml = r#"<?xml version="1.0"?>
<profile>
  <enabled>true</enabled>
  <added>5</added>
</profile>"#;
    let mut node = default_profile();
    node.set("gain", 2.0f32);
    assert!(read_xml_str(&mut node, xml).expect("parse"));
    assert_eq!(node.get::<bool>("enabled"), Some(&true));
    assert_eq!(node.get::<f32>("gain"), Some(&2.0));
    assert!(!node.contains("added"));
    assert_eq!(node.len(), default_profile().len());
}

#[test]
fn test_hand_edited_values_are_lenient() {
    let xml = "<profile><offset> 42 apples</offset><gain>fast</gain><enabled>yes</enabled>\
               <limits><val>1.5</val><val>oops</val></limits></profile>";
    let mut node = default_profile();
    node.set("enabled", true);
    read_xml_str(&mut node, xml).expect("parse");
    assert_eq!(node.get::<i64>("offset"), Some(&42));
    assert_eq!(node.get::<f32>("gain"), Some(&0.0));
    assert_eq!(node.get::<bool>("enabled"), Some(&false));
    assert_eq!(node.get_array::<f64>("limits"), Some(&[1.5, 0.0][..]));
}

#[test]
fn test_bound_fields_load_from_document() {
    let xml = to_xml_string(&sample_profile(), &XmlOptions::default());
    let mut kp = 0.0f64;
    let mut notes: Vec<String> = Vec::new();
    {
        let mut pid = CompositeNode::new("pid");
        pid.bind_field("kp", &mut kp);
        let mut node = CompositeNode::new("profile");
        node.bind_field("notes", &mut notes);
        node.attach_child(pid.into());
        assert!(read_xml_str(&mut node, &xml).expect("parse"));
    }
    assert_eq!(kp, 1.5);
    assert_eq!(notes, vec!["first", "", "  spaced  "]);
}

#[test]
fn test_xml_file_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("profile.xml");
    let source = sample_profile();
    save_xml_file(&source, &path, &XmlOptions::default()).expect("save");

    let text = std::fs::read_to_string(&path).expect("read back");
    assert!(text.starts_with("<?xml"));
    assert!(parse_xml(&text).is_ok());

    let mut restored = default_profile();
    assert!(load_xml_file(&mut restored, &path).expect("load"));
    assert_eq!(restored, source);
}

#[test]
fn test_load_with_foreign_root_reads_nothing() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("other.xml");
    std::fs::write(&path, "<settings><enabled>true</enabled></settings>").expect("write");

    let mut node = default_profile();
    assert!(!load_xml_file(&mut node, &path).expect("load"));
    assert_eq!(node.get::<bool>("enabled"), Some(&false));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().expect("tempdir");
    let mut node = default_profile();
    let err = load_xml_file(&mut node, dir.path().join("absent.xml")).expect_err("missing");
    assert!(matches!(err, objtree::Error::Io(_)));
}

#[test]
fn test_save_refuses_root_without_xml_form() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.xml");
    let mut node = CompositeNode::new("sample rate");
    node.add_value("x", 1i32);

    let err = save_xml_file(&node, &path, &XmlOptions::default()).expect_err("invalid root");
    assert!(matches!(
        err,
        objtree::Error::Document(objtree::DocumentError::InvalidName(_))
    ));
    assert!(!path.exists());
}
