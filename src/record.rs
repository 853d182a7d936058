// ABOUTME: Record shape introspection: member tables with typed get/set access.
// ABOUTME: The record! macro generates the table at compile time for plain structs.

use crate::error::Error;
use std::any::{Any, TypeId};
use std::fmt;

/// Width of a fixed-size integer member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntWidth {
    /// Rust name of the integer type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            IntWidth::I8 => "i8",
            IntWidth::I16 => "i16",
            IntWidth::I32 => "i32",
            IntWidth::I64 => "i64",
            IntWidth::U8 => "u8",
            IntWidth::U16 => "u16",
            IntWidth::U32 => "u32",
            IntWidth::U64 => "u64",
        }
    }

    /// Smallest representable value.
    #[must_use]
    pub fn min(self) -> i128 {
        match self {
            IntWidth::I8 => i128::from(i8::MIN),
            IntWidth::I16 => i128::from(i16::MIN),
            IntWidth::I32 => i128::from(i32::MIN),
            IntWidth::I64 => i128::from(i64::MIN),
            IntWidth::U8 | IntWidth::U16 | IntWidth::U32 | IntWidth::U64 => 0,
        }
    }

    /// Largest representable value.
    #[must_use]
    pub fn max(self) -> i128 {
        match self {
            IntWidth::I8 => i128::from(i8::MAX),
            IntWidth::I16 => i128::from(i16::MAX),
            IntWidth::I32 => i128::from(i32::MAX),
            IntWidth::I64 => i128::from(i64::MAX),
            IntWidth::U8 => i128::from(u8::MAX),
            IntWidth::U16 => i128::from(u16::MAX),
            IntWidth::U32 => i128::from(u32::MAX),
            IntWidth::U64 => i128::from(u64::MAX),
        }
    }

    /// Whether `value` fits without truncation.
    #[must_use]
    pub fn contains(self, value: i128) -> bool {
        (self.min()..=self.max()).contains(&value)
    }
}

/// Identity of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordType {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl RecordType {
    /// The identity of `R`.
    #[must_use]
    pub fn of<R: Any>() -> Self {
        Self {
            type_id: TypeId::of::<R>(),
            type_name: std::any::type_name::<R>(),
        }
    }
}

/// What a member holds, as far as field templates are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// An owned string.
    String,
    /// A fixed-width integer.
    Integer(IntWidth),
    /// Another record, held through a pointer-like member.
    ///
    /// `nilable` members may be absent; they encode as `null` and are
    /// allocated on demand when decoding.
    Record { record: RecordType, nilable: bool },
    /// Anything fields cannot map (booleans, floats, ...). The name is for diagnostics.
    Other(&'static str),
}

impl MemberKind {
    /// Whether the member may be absent.
    #[must_use]
    pub fn is_nilable(&self) -> bool {
        matches!(self, MemberKind::Record { nilable: true, .. })
    }

    /// Human-readable description used in bind errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            MemberKind::String => "string".to_owned(),
            MemberKind::Integer(width) => format!("integer ({})", width.name()),
            MemberKind::Record { record, nilable: true } => {
                format!("optional record `{}`", record.type_name)
            }
            MemberKind::Record { record, nilable: false } => format!("record `{}`", record.type_name),
            MemberKind::Other(name) => (*name).to_owned(),
        }
    }
}

/// Read access to a member's current value.
pub enum MemberRef<'a> {
    Str(&'a str),
    Int(i128),
    /// `None` when a nil-able record member is absent.
    Record(Option<&'a dyn Any>),
    Other,
}

/// Write access to a member.
pub enum MemberMut<'a> {
    Str(&'a mut String),
    Int(&'a mut dyn IntSlot),
    Record(&'a mut dyn RecordSlot),
    Other,
}

/// An integer member that can be assigned from a wide value.
pub trait IntSlot {
    fn width(&self) -> IntWidth;

    /// Stores `value` if it fits; returns false and leaves the member untouched otherwise.
    fn store(&mut self, value: i128) -> bool;
}

/// A pointer-like member holding a nested record.
pub trait RecordSlot {
    /// The nested record, allocating a default instance first if absent.
    fn get_or_allocate(&mut self) -> &mut dyn Any;
}

/// A Rust type that can appear as a record member.
pub trait Member: 'static {
    fn kind() -> MemberKind;

    fn member_ref(&self) -> MemberRef<'_>;

    fn member_mut(&mut self) -> MemberMut<'_>;
}

impl Member for String {
    fn kind() -> MemberKind {
        MemberKind::String
    }

    fn member_ref(&self) -> MemberRef<'_> {
        MemberRef::Str(self)
    }

    fn member_mut(&mut self) -> MemberMut<'_> {
        MemberMut::Str(self)
    }
}

macro_rules! impl_int_member {
    ($($ty:ty => $width:ident),* $(,)?) => {
        $(
            impl IntSlot for $ty {
                fn width(&self) -> IntWidth {
                    IntWidth::$width
                }

                fn store(&mut self, value: i128) -> bool {
                    match <$ty>::try_from(value) {
                        Ok(v) => {
                            *self = v;
                            true
                        }
                        Err(_) => false,
                    }
                }
            }

            impl Member for $ty {
                fn kind() -> MemberKind {
                    MemberKind::Integer(IntWidth::$width)
                }

                fn member_ref(&self) -> MemberRef<'_> {
                    MemberRef::Int(i128::from(*self))
                }

                fn member_mut(&mut self) -> MemberMut<'_> {
                    MemberMut::Int(self)
                }
            }
        )*
    };
}

impl_int_member!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

macro_rules! impl_other_member {
    ($($ty:ty),*) => {
        $(
            impl Member for $ty {
                fn kind() -> MemberKind {
                    MemberKind::Other(stringify!($ty))
                }

                fn member_ref(&self) -> MemberRef<'_> {
                    MemberRef::Other
                }

                fn member_mut(&mut self) -> MemberMut<'_> {
                    MemberMut::Other
                }
            }
        )*
    };
}

impl_other_member!(bool, f32, f64);

impl<T: Record> RecordSlot for Box<T> {
    fn get_or_allocate(&mut self) -> &mut dyn Any {
        &mut **self
    }
}

impl<T: Record> Member for Box<T> {
    fn kind() -> MemberKind {
        MemberKind::Record {
            record: RecordType::of::<T>(),
            nilable: false,
        }
    }

    fn member_ref(&self) -> MemberRef<'_> {
        MemberRef::Record(Some(&**self))
    }

    fn member_mut(&mut self) -> MemberMut<'_> {
        MemberMut::Record(self)
    }
}

impl<T: Record + Default> RecordSlot for Option<Box<T>> {
    fn get_or_allocate(&mut self) -> &mut dyn Any {
        &mut **self.get_or_insert_with(Box::default)
    }
}

impl<T: Record + Default> Member for Option<Box<T>> {
    fn kind() -> MemberKind {
        MemberKind::Record {
            record: RecordType::of::<T>(),
            nilable: true,
        }
    }

    fn member_ref(&self) -> MemberRef<'_> {
        MemberRef::Record(self.as_deref().map(|r| r as &dyn Any))
    }

    fn member_mut(&mut self) -> MemberMut<'_> {
        MemberMut::Record(self)
    }
}

/// Reads a member out of a type-erased record; `None` if the record is of another type.
pub type Getter = for<'a> fn(&'a dyn Any) -> Option<MemberRef<'a>>;

/// Opens a member of a type-erased record for writing; `None` if the record is of another type.
pub type Setter = for<'a> fn(&'a mut dyn Any) -> Option<MemberMut<'a>>;

/// One entry in a record's member table.
#[derive(Clone, Copy)]
pub struct MemberInfo {
    name: &'static str,
    kind: MemberKind,
    get: Getter,
    get_mut: Option<Setter>,
}

impl MemberInfo {
    /// A readable and writable member.
    #[must_use]
    pub fn new(name: &'static str, kind: MemberKind, get: Getter, get_mut: Setter) -> Self {
        Self {
            name,
            kind,
            get,
            get_mut: Some(get_mut),
        }
    }

    /// A member that can be encoded but never decoded into.
    #[must_use]
    pub fn read_only(name: &'static str, kind: MemberKind, get: Getter) -> Self {
        Self {
            name,
            kind,
            get,
            get_mut: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[must_use]
    pub fn is_settable(&self) -> bool {
        self.get_mut.is_some()
    }

    /// Reads the member from `record`.
    pub fn read<'a>(&self, record: &'a dyn Any) -> Option<MemberRef<'a>> {
        (self.get)(record)
    }

    /// Opens the member of `record` for writing.
    ///
    /// Fails with `FieldUnsettable` for read-only members and
    /// `FieldIncorrectType` if `record` is not the type this entry belongs to.
    pub fn write<'a>(&self, record: &'a mut dyn Any) -> Result<MemberMut<'a>, Error> {
        let get_mut = self.get_mut.ok_or_else(|| Error::FieldUnsettable {
            member: self.name.to_owned(),
        })?;
        get_mut(record).ok_or_else(|| Error::FieldIncorrectType {
            member: self.name.to_owned(),
        })
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("settable", &self.is_settable())
            .finish()
    }
}

/// The member table of one record type.
#[derive(Debug, Clone)]
pub struct Shape {
    record: RecordType,
    members: Vec<MemberInfo>,
}

impl Shape {
    /// Start a member table for `R`.
    #[must_use]
    pub fn builder<R: Any>() -> ShapeBuilder {
        ShapeBuilder {
            shape: Shape {
                record: RecordType::of::<R>(),
                members: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.record
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.record.type_name
    }

    #[must_use]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// Look up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Builder returned by [`Shape::builder`].
#[derive(Debug)]
pub struct ShapeBuilder {
    shape: Shape,
}

impl ShapeBuilder {
    /// Append a member. Lookups by name return the first match.
    #[must_use]
    pub fn member(mut self, info: MemberInfo) -> Self {
        self.shape.members.push(info);
        self
    }

    #[must_use]
    pub fn build(self) -> Shape {
        self.shape
    }
}

/// A type whose members can be mapped by field templates.
///
/// Implement it with [`record!`](crate::record!) for plain structs, or by
/// hand with [`Shape::builder`] when some members need custom access
/// (read-only members, computed values).
pub trait Record: Any {
    /// The member table. Called once per bind.
    fn shape() -> Shape;
}

/// Declares a struct and generates its [`Record`] member table.
///
/// Every member type must implement [`Member`]: `String`, the fixed-width
/// integers, `Box<T>` / `Option<Box<T>>` for nested records, and `bool`,
/// `f32`, `f64` (listed but not mappable).
///
/// # Examples
///
/// ```rust
/// use fieldmap::{record, Record};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Person {
///         pub name: String,
///         pub age: i32,
///     }
/// }
///
/// let shape = Person::shape();
/// assert_eq!(shape.members().len(), 2);
/// assert!(shape.member("age").is_some());
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            fn shape() -> $crate::Shape {
                $crate::Shape::builder::<$name>()
                    $(
                        .member({
                            fn get(
                                record: &dyn ::std::any::Any,
                            ) -> ::std::option::Option<$crate::MemberRef<'_>> {
                                record
                                    .downcast_ref::<$name>()
                                    .map(|r| $crate::Member::member_ref(&r.$field))
                            }

                            fn get_mut(
                                record: &mut dyn ::std::any::Any,
                            ) -> ::std::option::Option<$crate::MemberMut<'_>> {
                                record
                                    .downcast_mut::<$name>()
                                    .map(|r| $crate::Member::member_mut(&mut r.$field))
                            }

                            $crate::MemberInfo::new(
                                stringify!($field),
                                <$fty as $crate::Member>::kind(),
                                get,
                                get_mut,
                            )
                        })
                    )*
                    .build()
            }
        }
    };
}
