// ABOUTME: A template bound and validated against one record type.
// ABOUTME: Converts records to Value trees and decodes trees back into records in place.

use crate::codec::{JsonCodec, TreeCodec};
use crate::config::{SerializerConfig, UnknownKeyMode};
use crate::error::{Error, Result};
use crate::field::{FieldKind, Scope};
use crate::record::{MemberInfo, MemberRef, Record, RecordType};
use crate::template::Template;
use crate::value::{Map, Value};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A [`Template`] bound to one record type.
///
/// Binding resolves every field against the record's member table once
/// and caches the accessors; encode and decode never look members up
/// again. A serializer is immutable, cheap to clone, and can be used
/// from many threads at once.
///
/// # Examples
///
/// ```rust
/// use fieldmap::{record, tree, Field, Serializer, Template};
///
/// record! {
///     #[derive(Debug, Default, PartialEq)]
///     struct Person {
///         name: String,
///         age: i32,
///     }
/// }
///
/// let template = Template::from_fields([
///     Field::string("name", "name"),
///     Field::number("age", "age"),
/// ])?;
/// let serializer = Serializer::bind::<Person>(&template)?;
///
/// let ann = Person { name: "Ann".into(), age: 30 };
/// assert_eq!(serializer.encode(&ann)?, tree!({ "name": "Ann", "age": 30 }));
///
/// let mut target = ann;
/// serializer.decode(br#"{"name":"Bob"}"#, &mut target)?;
/// assert_eq!(target, Person { name: "Bob".into(), age: 30 });
/// # Ok::<(), fieldmap::Error>(())
/// ```
#[derive(Clone)]
pub struct Serializer {
    inner: Arc<Bound>,
}

struct Bound {
    record: RecordType,
    template: Template,
    // Parallel to `template`'s fields.
    members: Vec<MemberInfo>,
    config: SerializerConfig,
}

/// Something a decode can write into.
///
/// Implemented for `&mut R` and `Option<&mut R>`; `None` is rejected with
/// `NilPointer`. Shared references `&R` are accepted by the type system
/// but rejected with `NotAPointer`, since nothing can be written through
/// them. Both checks happen before any bytes are parsed.
pub trait DecodeTarget {
    /// The record to write into and its type name.
    fn resolve(&mut self) -> Result<(&mut dyn Any, &'static str)>;
}

impl<R: Any> DecodeTarget for &mut R {
    fn resolve(&mut self) -> Result<(&mut dyn Any, &'static str)> {
        let record: &mut dyn Any = &mut **self;
        Ok((record, std::any::type_name::<R>()))
    }
}

impl<R: Any> DecodeTarget for Option<&mut R> {
    fn resolve(&mut self) -> Result<(&mut dyn Any, &'static str)> {
        match self {
            Some(record) => {
                let record: &mut dyn Any = &mut **record;
                Ok((record, std::any::type_name::<R>()))
            }
            None => Err(Error::NilPointer),
        }
    }
}

impl<R: Any> DecodeTarget for &R {
    fn resolve(&mut self) -> Result<(&mut dyn Any, &'static str)> {
        Err(Error::NotAPointer)
    }
}

impl Serializer {
    /// Bind `template` to `R` with the default configuration.
    ///
    /// Fails with `MemberFieldNotFound`, `MemberFieldTypeMismatch` or
    /// `CyclicSchema` on the first field that does not fit; no serializer
    /// is produced in that case.
    pub fn bind<R: Record>(template: &Template) -> Result<Self> {
        Self::bind_with_config::<R>(template, SerializerConfig::default())
    }

    /// Bind `template` to `R` with a custom configuration.
    pub fn bind_with_config<R: Record>(template: &Template, config: SerializerConfig) -> Result<Self> {
        let shape = R::shape();
        let record = RecordType::of::<R>();

        let mut members = Vec::with_capacity(template.len());
        for field in template.iter() {
            let member = shape
                .member(field.member())
                .ok_or_else(|| Error::MemberFieldNotFound {
                    member: field.member().to_owned(),
                    record: record.type_name,
                })?;
            field.check_member(member.kind(), record)?;
            members.push(*member);
        }

        debug!(record = record.type_name, fields = members.len(), "bound serializer");

        Ok(Self {
            inner: Arc::new(Bound {
                record,
                template: template.clone(),
                members,
                config,
            }),
        })
    }

    /// The record type this serializer was bound to.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.inner.record
    }

    #[must_use]
    pub fn record_type_name(&self) -> &'static str {
        self.inner.record.type_name
    }

    #[must_use]
    pub fn template(&self) -> &Template {
        &self.inner.template
    }

    #[must_use]
    pub fn config(&self) -> &SerializerConfig {
        &self.inner.config
    }

    /// Whether this serializer or any nested child is bound to `record`.
    pub(crate) fn reaches(&self, record: RecordType) -> bool {
        self.inner.record == record
            || self.inner.template.iter().any(|field| match field.kind() {
                FieldKind::Nested(child) => child.reaches(record),
                _ => false,
            })
    }

    /// Encode `record` into an object tree keyed by wire names, in template order.
    ///
    /// Absent nil-able members encode as `null` without running their
    /// child serializer. The first field error aborts the whole encode.
    pub fn encode<R: Any>(&self, record: &R) -> Result<Value> {
        self.check_type(TypeId::of::<R>(), std::any::type_name::<R>())?;
        self.encode_object(record, 0)
    }

    /// Encode `record` and print it as compact JSON.
    pub fn to_vec<R: Any>(&self, record: &R) -> Result<Vec<u8>> {
        self.to_vec_with(&JsonCodec::default(), record)
    }

    /// Encode `record` and print it with `codec`.
    pub fn to_vec_with<C: TreeCodec + ?Sized, R: Any>(&self, codec: &C, record: &R) -> Result<Vec<u8>> {
        let tree = self.encode(record)?;
        codec.print(&tree)
    }

    pub(crate) fn encode_object(&self, record: &dyn Any, depth: usize) -> Result<Value> {
        self.check_depth(depth)?;
        self.check_type((*record).type_id(), "unknown")?;

        let scope = Scope {
            current: Some(self),
            depth,
        };
        let mut map = Map::with_capacity(self.inner.members.len());
        for (field, member) in self.inner.template.iter().zip(&self.inner.members) {
            let value = member.read(record).ok_or_else(|| Error::FieldIncorrectType {
                member: member.name().to_owned(),
            })?;
            if let MemberRef::Record(None) = value {
                trace!(wire = field.wire(), "nil member encoded as null");
                map.insert(field.wire().to_owned(), Value::Null);
                continue;
            }
            let encoded = field.encode_in(value, scope)?;
            map.insert(field.wire().to_owned(), encoded);
        }
        Ok(Value::Object(map))
    }

    /// Decode JSON `bytes` into `target` in place.
    ///
    /// Only keys present in the input are written; everything else in the
    /// target keeps its value. Decoding is not transactional: when a field
    /// fails, fields before it have already been written. Use
    /// [`decode_fresh`](Self::decode_fresh) when that matters.
    pub fn decode<T: DecodeTarget>(&self, bytes: &[u8], target: T) -> Result<()> {
        self.decode_with(&JsonCodec::default(), bytes, target)
    }

    /// Decode `bytes` parsed by `codec` into `target` in place.
    pub fn decode_with<C: TreeCodec + ?Sized, T: DecodeTarget>(
        &self,
        codec: &C,
        bytes: &[u8],
        mut target: T,
    ) -> Result<()> {
        let (record, type_name) = target.resolve()?;
        let tree = codec.parse(bytes)?;
        let map = object(&tree)?;
        self.check_type((*record).type_id(), type_name)?;
        self.decode_object(map, record, 0)
    }

    /// Decode an already-parsed tree into `record` in place.
    ///
    /// The tree must be an object; keys without a field are ignored
    /// unless the serializer was bound with `UnknownKeyMode::Error`.
    pub fn decode_value<R: Any>(&self, tree: &Value, record: &mut R) -> Result<()> {
        let map = object(tree)?;
        self.check_type(TypeId::of::<R>(), std::any::type_name::<R>())?;
        self.decode_object(map, record, 0)
    }

    /// Decode `tree` into a fresh `R::default()`, returning it only if every
    /// field succeeded.
    pub fn decode_fresh<R: Any + Default>(&self, tree: &Value) -> Result<R> {
        let mut record = R::default();
        self.decode_value(tree, &mut record)?;
        Ok(record)
    }

    pub(crate) fn decode_object(&self, map: &Map, record: &mut dyn Any, depth: usize) -> Result<()> {
        self.check_depth(depth)?;
        self.check_type((*record).type_id(), "unknown")?;

        for key in map.keys() {
            if !self.inner.template.contains_wire(key) {
                match self.inner.config.unknown_keys {
                    UnknownKeyMode::Ignore => trace!(wire = %key, "ignoring unknown key"),
                    UnknownKeyMode::Error => return Err(Error::UnknownField { wire: key.clone() }),
                }
            }
        }

        let scope = Scope {
            current: Some(self),
            depth,
        };
        for (field, member) in self.inner.template.iter().zip(&self.inner.members) {
            let Some(value) = map.get(field.wire()) else {
                continue;
            };
            let slot = member.write(record)?;
            field.decode_in(slot, value, scope)?;
        }
        Ok(())
    }

    fn check_type(&self, found: TypeId, found_name: &'static str) -> Result<()> {
        if found == self.inner.record.type_id {
            Ok(())
        } else {
            Err(Error::DifferentType {
                expected: self.inner.record.type_name,
                found: found_name,
            })
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.inner.config.max_depth {
            Err(Error::MaxDepthExceeded {
                limit: self.inner.config.max_depth,
            })
        } else {
            Ok(())
        }
    }
}

fn object(tree: &Value) -> Result<&Map> {
    tree.as_object().ok_or(Error::ArrayNotSupported {
        found: tree.kind_name(),
    })
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("record", &self.inner.record.type_name)
            .field("fields", &self.inner.template)
            .finish()
    }
}
