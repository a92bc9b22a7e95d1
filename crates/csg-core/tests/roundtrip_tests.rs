use csg_core::{csg_to_json, csg_to_json_pretty, json_to_csg, parse, parse_json, write};
use csg_core::{CsgError, WriteError};
use serde_json::Value;

/// Assert that parse → write → parse reproduces the same document.
fn assert_roundtrip(source: &str) {
    let document = parse(source).expect("parse failed");
    let written = write(&document).expect("write failed");
    let reparsed = parse(&written).expect("reparse failed");
    assert_eq!(
        document, reparsed,
        "Roundtrip failed:\n  source:  {source}\n  written: {written}"
    );
    assert_key_order(&document, &reparsed);
}

/// `Value` equality ignores object key order; check it separately.
fn assert_key_order(a: &Value, b: &Value) {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            assert_eq!(x.keys().collect::<Vec<_>>(), y.keys().collect::<Vec<_>>());
            for (k, v) in x {
                assert_key_order(v, &y[k]);
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            for (v, w) in x.iter().zip(y) {
                assert_key_order(v, w);
            }
        }
        _ => {}
    }
}

/// Canonical text is a fixed point of parse → write.
fn assert_canonical(text: &str) {
    let written = write(&parse(text).expect("parse failed")).expect("write failed");
    assert_eq!(written, text);
}

const SCENE: &str = r#"
# A bracket with a bolt hole.
difference() {
    union() {
        cube(size = [40, 10, 2], center = false);
        multmatrix([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 2], [0, 0, 0, 1]]) {
            cube(size = [10, 10, 20]);
        }
    }
    # bolt hole
    multmatrix([1,0,0,5, 0,1,0,5, 0,0,1,-1, 0,0,0,1]) {
        cylinder(h = 30, r = 2.5, center = false, $fn = 24);
    }
    group();
}
sphere(r = 0.75, name = "marker");
"#;

// ============================================================================
// CSG → tree → CSG
// ============================================================================

#[test]
fn roundtrip_leaf() {
    assert_roundtrip("cube(size = 10);");
}

#[test]
fn roundtrip_values() {
    assert_roundtrip(r#"cube(a = -1.5, b = true, c = " spaced , text ", d = [1, [2, []], "x"]);"#);
}

#[test]
fn roundtrip_duplicate_arguments() {
    assert_roundtrip(r#"cube(a = 1, b = 2, a = "z");"#);
}

#[test]
fn roundtrip_scene() {
    assert_roundtrip(SCENE);
}

#[test]
fn roundtrip_empty_group() {
    assert_roundtrip("group();");
}

#[test]
fn roundtrip_unicode_string() {
    assert_roundtrip("cube(label = \"caf\u{e9} \u{4f60}\u{597d}\");");
}

#[test]
fn canonical_scene_text() {
    let expected = "\
difference() {
  union() {
    cube(size = [40,10,2], center = false);
    multmatrix([[1,0,0,0],[0,1,0,0],[0,0,1,2],[0,0,0,1]]) {
      cube(size = [10,10,20]);
    }
  }
  multmatrix([1,0,0,5,0,1,0,5,0,0,1,-1,0,0,0,1]) {
    cylinder(h = 30, r = 2.5, center = false, $fn = 24);
  }
  group();
}
sphere(r = 0.75, name = \"marker\");
";
    assert_eq!(write(&parse(SCENE).unwrap()).unwrap(), expected);
    assert_canonical(expected);
}

#[test]
fn comments_do_not_survive_roundtrip() {
    let written = write(&parse("# note\ncube();").unwrap()).unwrap();
    assert_eq!(written, "cube();\n");
}

// ============================================================================
// CSG ⇄ CSGJS
// ============================================================================

#[test]
fn csg_to_json_compact() {
    let json = csg_to_json("union() { cube(size = 1); sphere(r = 2); }").unwrap();
    assert_eq!(
        json,
        r#"[{"type":"union","properties":{},"objects":[{"type":"cube","properties":{"size":1.0}},{"type":"sphere","properties":{"r":2.0}}]}]"#
    );
}

#[test]
fn csg_to_json_pretty_parses_back() {
    let pretty = csg_to_json_pretty(SCENE).unwrap();
    assert!(pretty.contains('\n'));
    let from_pretty: Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(from_pretty, parse(SCENE).unwrap());
}

#[test]
fn json_text_roundtrip() {
    let json = csg_to_json(SCENE).unwrap();
    let csg = json_to_csg(&json).unwrap();
    assert_eq!(csg_to_json(&csg).unwrap(), json);
}

#[test]
fn json_integers_are_accepted() {
    let csg = json_to_csg(r#"[{"type":"cube","properties":{"size":[1,2,3]}}]"#).unwrap();
    assert_eq!(csg, "cube(size = [1,2,3]);\n");
}

#[test]
fn json_to_csg_rejects_invalid_json() {
    assert!(matches!(
        json_to_csg("[{\"type\": "),
        Err(CsgError::JsonParse(_))
    ));
}

#[test]
fn json_to_csg_reports_structural_errors() {
    let err = json_to_csg(r#"[{"type":"union","properties":{},"objects":[]}]"#).unwrap_err();
    assert!(matches!(
        err,
        CsgError::Write(WriteError::TooFewChildren { .. })
    ));
}

#[test]
fn parse_json_checks_node_shape() {
    assert!(parse_json(r#"[{"type":"cube"}]"#).is_ok());
    assert!(parse_json(r#"{"type":"torus"}"#).is_ok());
    assert!(matches!(
        parse_json("[1, 2]"),
        Err(CsgError::Write(WriteError::Malformed { .. }))
    ));
    assert!(matches!(
        parse_json(r#"[{"properties":{}}]"#),
        Err(CsgError::Write(WriteError::Malformed { .. }))
    ));
    assert!(matches!(
        parse_json(r#"[{"type":"group","objects":[{"type":"cube"}, "x"]}]"#),
        Err(CsgError::Write(WriteError::Malformed { .. }))
    ));
    assert!(matches!(
        parse_json(r#"[{"type":"group","objects":3}]"#),
        Err(CsgError::Write(WriteError::InvalidObjects { .. }))
    ));
}
