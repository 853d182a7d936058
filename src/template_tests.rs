// ABOUTME: Unit tests for the template module.
// ABOUTME: Tests insertion order and rejection of duplicate members and wire names.

use crate::{Error, Field, Template};

#[test]
fn test_add_preserves_order() {
    let mut template = Template::new();
    template.add(Field::string("b", "bee")).unwrap();
    template.add(Field::number("a", "ay")).unwrap();
    template.add(Field::recursive("c", "sea")).unwrap();

    let wires: Vec<&str> = template.iter().map(Field::wire).collect();
    assert_eq!(wires, ["bee", "ay", "sea"]);
    assert_eq!(template.len(), 3);
    assert!(!template.is_empty());
}

#[test]
fn test_duplicate_member_rejected_regardless_of_kind_or_wire() {
    let mut template = Template::new();
    template.add(Field::string("name", "name")).unwrap();

    for dup in [
        Field::string("name", "other"),
        Field::number("name", "n2"),
        Field::recursive("name", "n3"),
    ] {
        let err = template.add(dup).unwrap_err();
        assert_eq!(err, Error::DuplicateField { member: "name".into() });
    }
    assert_eq!(template.len(), 1);
}

#[test]
fn test_duplicate_wire_name_rejected() {
    let mut template = Template::new();
    template.add(Field::string("first", "name")).unwrap();

    let err = template.add(Field::string("second", "name")).unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateWireName {
            member: "second".into(),
            wire: "name".into()
        }
    );
    assert_eq!(template.len(), 1);
}

#[test]
fn test_from_fields_stops_at_first_duplicate() {
    let err = Template::from_fields([
        Field::string("a", "a"),
        Field::number("a", "b"),
        Field::string("c", "a"),
    ])
    .unwrap_err();
    assert_eq!(err.error_type(), "duplicate_field");
}

#[test]
fn test_lookups() {
    let template = Template::new()
        .with(Field::string("name", "n"))
        .and_then(|t| t.with(Field::number("age", "a")))
        .unwrap();

    assert_eq!(template.get("age").map(Field::wire), Some("a"));
    assert!(template.get("n").is_none());
    assert!(template.contains_wire("n"));
    assert!(!template.contains_wire("name"));
}

#[test]
fn test_member_duplicate_reported_before_wire_duplicate() {
    let mut template = Template::new();
    template.add(Field::string("first", "one")).unwrap();
    template.add(Field::string("second", "two")).unwrap();

    let err = template.add(Field::number("second", "one")).unwrap_err();
    assert_eq!(err.error_type(), "duplicate_field");
}
