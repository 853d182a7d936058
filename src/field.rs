// ABOUTME: Fields: one member <-> wire key mapping each.
// ABOUTME: A closed set of kinds (string, number, nested record) with their encode/decode rules.

use crate::error::{Error, Result};
use crate::record::{MemberKind, MemberMut, MemberRef, RecordType};
use crate::serializer::Serializer;
use crate::value::Value;
use tracing::warn;

/// The conversion a field performs.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// String member <-> JSON string.
    String,
    /// Fixed-width integer member <-> JSON number.
    Number,
    /// Nested record member <-> JSON object, converted by a child serializer.
    Nested(Serializer),
    /// Nested record of the same type as the enclosing record, converted
    /// by the serializer the field ends up bound into.
    Recursive,
}

/// A single mapping between a record member and a wire key.
///
/// Fields are immutable once built; collect them into a
/// [`Template`](crate::Template) and bind it to a record type.
///
/// # Examples
///
/// ```rust
/// use fieldmap::Field;
///
/// let name = Field::string("name", "fullName");
/// assert_eq!(name.member(), "name");
/// assert_eq!(name.wire(), "fullName");
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    member: String,
    wire: String,
    kind: FieldKind,
}

/// Where a field is being run: the serializer that owns it and how deep
/// the current record is nested.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'s> {
    pub(crate) current: Option<&'s Serializer>,
    pub(crate) depth: usize,
}

impl Scope<'_> {
    fn detached() -> Self {
        Scope {
            current: None,
            depth: 0,
        }
    }
}

enum Number {
    Fits(i128),
    TooWide(String),
}

impl Field {
    fn new(member: impl Into<String>, wire: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            member: member.into(),
            wire: wire.into(),
            kind,
        }
    }

    /// Maps a `String` member.
    pub fn string(member: impl Into<String>, wire: impl Into<String>) -> Self {
        Self::new(member, wire, FieldKind::String)
    }

    /// Maps a fixed-width integer member.
    pub fn number(member: impl Into<String>, wire: impl Into<String>) -> Self {
        Self::new(member, wire, FieldKind::Number)
    }

    /// Maps a `Box<T>` or `Option<Box<T>>` member through `child`, which
    /// must be bound to `T`.
    pub fn nested(member: impl Into<String>, wire: impl Into<String>, child: &Serializer) -> Self {
        Self::new(member, wire, FieldKind::Nested(child.clone()))
    }

    /// Maps an `Option<Box<Self>>` member through the serializer this
    /// field's template is bound into (linked lists, trees).
    pub fn recursive(member: impl Into<String>, wire: impl Into<String>) -> Self {
        Self::new(member, wire, FieldKind::Recursive)
    }

    /// Name of the record member.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Key used in the tree.
    #[must_use]
    pub fn wire(&self) -> &str {
        &self.wire
    }

    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// What the field expects on the wire.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        match self.kind {
            FieldKind::String => "string",
            FieldKind::Number => "integer",
            FieldKind::Nested(_) | FieldKind::Recursive => "object",
        }
    }

    /// Checks this field against the member it targets on `record`.
    pub(crate) fn check_member(&self, kind: MemberKind, record: RecordType) -> Result<()> {
        let mismatch = || Error::MemberFieldTypeMismatch {
            member: self.member.clone(),
            record: record.type_name,
            expected: self.expected_member(),
            found: kind.describe(),
        };

        match (&self.kind, kind) {
            (FieldKind::String, MemberKind::String) | (FieldKind::Number, MemberKind::Integer(_)) => {
                Ok(())
            }
            (FieldKind::Nested(child), MemberKind::Record { record: target, .. }) => {
                if target != child.record_type() {
                    return Err(mismatch());
                }
                if child.reaches(record) {
                    return Err(Error::CyclicSchema {
                        member: self.member.clone(),
                        record: record.type_name,
                    });
                }
                Ok(())
            }
            (FieldKind::Recursive, MemberKind::Record { record: target, nilable }) => {
                if target != record {
                    return Err(mismatch());
                }
                if !nilable {
                    return Err(Error::CyclicSchema {
                        member: self.member.clone(),
                        record: record.type_name,
                    });
                }
                Ok(())
            }
            _ => Err(mismatch()),
        }
    }

    fn expected_member(&self) -> &'static str {
        match self.kind {
            FieldKind::String => "a string member",
            FieldKind::Number => "an integer member",
            FieldKind::Nested(_) => "a record member",
            FieldKind::Recursive => "an optional record member of the same type",
        }
    }

    /// Encodes one member value.
    ///
    /// Nested and recursive fields delegate to their serializer; a
    /// recursive field used outside a bound serializer fails with
    /// `FieldIncorrectType`.
    pub fn encode(&self, value: MemberRef<'_>) -> Result<Value> {
        self.encode_in(value, Scope::detached())
    }

    pub(crate) fn encode_in(&self, value: MemberRef<'_>, scope: Scope<'_>) -> Result<Value> {
        match (&self.kind, value) {
            (FieldKind::String, MemberRef::Str(s)) => Ok(Value::String(s.to_owned())),
            (FieldKind::Number, MemberRef::Int(n)) => Ok(integer_value(n)),
            (FieldKind::Nested(_) | FieldKind::Recursive, MemberRef::Record(None)) => Ok(Value::Null),
            (FieldKind::Nested(child), MemberRef::Record(Some(record))) => {
                child.encode_object(record, scope.depth + 1)
            }
            (FieldKind::Recursive, MemberRef::Record(Some(record))) => match scope.current {
                Some(current) => current.encode_object(record, scope.depth + 1),
                None => Err(self.incorrect_type()),
            },
            _ => Err(Error::FieldDataIncorrectType {
                wire: self.wire.clone(),
                expected: self.expected(),
            }),
        }
    }

    /// Decodes `value` into the member behind `slot`.
    ///
    /// A `null` for a nested record is a no-op: an existing record is left
    /// as it is and an absent one stays absent.
    pub fn decode(&self, slot: MemberMut<'_>, value: &Value) -> Result<()> {
        self.decode_in(slot, value, Scope::detached())
    }

    pub(crate) fn decode_in(&self, slot: MemberMut<'_>, value: &Value, scope: Scope<'_>) -> Result<()> {
        match &self.kind {
            FieldKind::String => {
                let Some(s) = value.as_str() else {
                    return Err(self.data_incorrect_type());
                };
                match slot {
                    MemberMut::Str(target) => {
                        s.clone_into(target);
                        Ok(())
                    }
                    _ => Err(self.incorrect_type()),
                }
            }
            FieldKind::Number => {
                let number = self.parse_number(value)?;
                let MemberMut::Int(target) = slot else {
                    return Err(self.incorrect_type());
                };
                let n = match number {
                    Number::Fits(n) => n,
                    Number::TooWide(repr) => return Err(self.overflow(repr, target.width().name())),
                };
                if target.store(n) {
                    Ok(())
                } else {
                    Err(self.overflow(n.to_string(), target.width().name()))
                }
            }
            FieldKind::Nested(_) | FieldKind::Recursive => {
                if value.is_null() {
                    return Ok(());
                }
                let Some(map) = value.as_object() else {
                    return Err(self.data_incorrect_type());
                };
                let MemberMut::Record(target) = slot else {
                    return Err(self.incorrect_type());
                };
                let child = match (&self.kind, scope.current) {
                    (FieldKind::Nested(child), _) => child,
                    (_, Some(current)) => current,
                    _ => return Err(self.incorrect_type()),
                };
                child.decode_object(map, target.get_or_allocate(), scope.depth + 1)
            }
        }
    }

    fn parse_number(&self, value: &Value) -> Result<Number> {
        if let Some(n) = value.as_i128() {
            return Ok(Number::Fits(n));
        }
        match value {
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(Number::TooWide(f.to_string())),
            _ => Err(self.data_incorrect_type()),
        }
    }

    fn data_incorrect_type(&self) -> Error {
        Error::FieldDataIncorrectType {
            wire: self.wire.clone(),
            expected: self.expected(),
        }
    }

    fn overflow(&self, value: String, width: &'static str) -> Error {
        Error::FieldDataOverflow {
            wire: self.wire.clone(),
            value,
            width,
        }
    }

    fn incorrect_type(&self) -> Error {
        warn!(member = %self.member, wire = %self.wire, "member kind diverged from bound shape");
        Error::FieldIncorrectType {
            member: self.member.clone(),
        }
    }
}

#[allow(clippy::cast_precision_loss)] // Unreachable for 64-bit members
fn integer_value(n: i128) -> Value {
    if let Ok(n) = i64::try_from(n) {
        Value::Int(n)
    } else if let Ok(n) = u64::try_from(n) {
        Value::UInt(n)
    } else {
        Value::Float(n as f64)
    }
}
