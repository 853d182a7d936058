// ABOUTME: Unit tests for the field module.
// ABOUTME: Tests the per-kind encode/decode contracts on single members.

use crate::record::{MemberMut, MemberRef};
use crate::{record, tree, Error, Field, Record, Value};
use std::any::Any;

record! {
    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        text: String,
        small: i8,
        wide: u64,
    }
}

fn slot<'a>(sample: &'a mut Sample, member: &str) -> MemberMut<'a> {
    Sample::shape().member(member).unwrap().write(sample).unwrap()
}

#[test]
fn test_string_encode() {
    let field = Field::string("text", "t");
    assert_eq!(field.encode(MemberRef::Str("Hello")).unwrap(), tree!("Hello"));

    let err = field.encode(MemberRef::Int(42)).unwrap_err();
    assert_eq!(
        err,
        Error::FieldDataIncorrectType {
            wire: "t".into(),
            expected: "string"
        }
    );
}

#[test]
fn test_string_decode() {
    let field = Field::string("text", "t");
    let mut sample = Sample::default();

    field.decode(slot(&mut sample, "text"), &tree!("Hello")).unwrap();
    assert_eq!(sample.text, "Hello");
}

#[test]
fn test_string_decode_wrong_value() {
    let field = Field::string("text", "t");
    let mut sample = Sample::default();

    let err = field.decode(slot(&mut sample, "text"), &tree!(42)).unwrap_err();
    assert_eq!(err.error_type(), "field_data_incorrect_type");
    assert_eq!(sample.text, "");
}

#[test]
fn test_string_decode_wrong_target_type() {
    let field = Field::string("text", "t");
    let mut sample = Sample::default();

    let err = field.decode(slot(&mut sample, "small"), &tree!("Hello")).unwrap_err();
    assert_eq!(err, Error::FieldIncorrectType { member: "text".into() });
}

#[test]
fn test_number_encode() {
    let field = Field::number("wide", "w");
    assert_eq!(field.encode(MemberRef::Int(-5)).unwrap(), Value::Int(-5));
    assert_eq!(
        field.encode(MemberRef::Int(i128::from(u64::MAX))).unwrap(),
        Value::UInt(u64::MAX)
    );
    assert_eq!(
        field.encode(MemberRef::Str("5")).unwrap_err().error_type(),
        "field_data_incorrect_type"
    );
}

#[test]
fn test_number_decode_and_overflow() {
    let field = Field::number("small", "s");
    let mut sample = Sample::default();

    field.decode(slot(&mut sample, "small"), &tree!((-128))).unwrap();
    assert_eq!(sample.small, -128);

    let err = field.decode(slot(&mut sample, "small"), &tree!(128)).unwrap_err();
    assert_eq!(
        err,
        Error::FieldDataOverflow {
            wire: "s".into(),
            value: "128".into(),
            width: "i8"
        }
    );
    // Overflow leaves the member untouched
    assert_eq!(sample.small, -128);
}

#[test]
fn test_number_decode_accepts_integral_floats_only() {
    let field = Field::number("wide", "w");
    let mut sample = Sample::default();

    field.decode(slot(&mut sample, "wide"), &Value::Float(12.0)).unwrap();
    assert_eq!(sample.wide, 12);

    let err = field.decode(slot(&mut sample, "wide"), &Value::Float(1.5)).unwrap_err();
    assert_eq!(err.error_type(), "field_data_incorrect_type");

    let err = field.decode(slot(&mut sample, "wide"), &Value::Float(1e30)).unwrap_err();
    assert_eq!(err.error_type(), "field_data_overflow");

    let err = field.decode(slot(&mut sample, "wide"), &tree!((-1))).unwrap_err();
    assert_eq!(err.error_type(), "field_data_overflow");

    let err = field.decode(slot(&mut sample, "wide"), &tree!("12")).unwrap_err();
    assert_eq!(err.error_type(), "field_data_incorrect_type");
}

#[test]
fn test_recursive_field_needs_a_bound_serializer() {
    let field = Field::recursive("text", "t");
    let other = Sample::default();
    let err = field.encode(MemberRef::Record(Some(&other as &dyn Any))).unwrap_err();
    assert_eq!(err.error_type(), "field_incorrect_type");

    assert_eq!(field.encode(MemberRef::Record(None)).unwrap(), Value::Null);
}

#[test]
fn test_expected_names() {
    assert_eq!(Field::string("a", "a").expected(), "string");
    assert_eq!(Field::number("a", "a").expected(), "integer");
    assert_eq!(Field::recursive("a", "a").expected(), "object");
}
