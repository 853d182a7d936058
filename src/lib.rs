// ABOUTME: Declarative field templates that bind a wire schema to Rust record types.
// ABOUTME: Provides the Template -> Serializer pipeline and a record <-> Value tree converter.

//! # fieldmap
//!
//! Map Rust records onto JSON-like trees through explicit, named field
//! templates instead of type-driven derives.
//!
//! A [`Template`] lists [`Field`]s, each mapping one record member to one
//! wire key. Binding a template to a record type produces a
//! [`Serializer`]: every field is checked against the record's member
//! table once, up front, and the resolved accessors are cached. The
//! serializer then encodes records into [`Value`] trees and decodes trees
//! back into existing records, writing only the keys that are present.
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldmap::{record, Field, Template};
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Address {
//!         pub city: String,
//!     }
//! }
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Person {
//!         pub name: String,
//!         pub age: u8,
//!         pub address: Option<Box<Address>>,
//!     }
//! }
//!
//! let address = Template::from_fields([Field::string("city", "city")])?.bind::<Address>()?;
//! let person = Template::from_fields([
//!     Field::string("name", "name"),
//!     Field::number("age", "age"),
//!     Field::nested("address", "addr", &address),
//! ])?
//! .bind::<Person>()?;
//!
//! let ann = Person { name: "Ann".into(), age: 30, address: None };
//! assert_eq!(person.to_vec(&ann)?, br#"{"name":"Ann","age":30,"addr":null}"#);
//!
//! let mut target = ann;
//! person.decode(br#"{"addr":{"city":"Oslo"}}"#, &mut target)?;
//! assert_eq!(target.address.map(|a| a.city), Some("Oslo".to_string()));
//! # Ok::<(), fieldmap::Error>(())
//! ```
//!
//! ## Decoding rules
//!
//! - Keys missing from the input leave their members untouched.
//! - Keys no field maps are ignored (configurable, see [`SerializerConfig`]).
//! - `null` for a nested record never clears it.
//! - An object for an absent nested record allocates a default instance first.
//! - Integers are range-checked against the member's width.
//! - Decoding is not transactional; see [`Serializer::decode_fresh`].

pub mod codec;
pub mod config;
pub mod error;
pub mod field;
pub mod record;
pub mod serializer;
pub mod template;
pub mod value;

pub use codec::{JsonCodec, TreeCodec};
pub use config::{limits, SerializerConfig, UnknownKeyMode};
pub use error::{Error, Phase, Result};
pub use field::{Field, FieldKind};
pub use record::{
    Getter, IntSlot, IntWidth, Member, MemberInfo, MemberKind, MemberMut, MemberRef, Record,
    RecordSlot, RecordType, Setter, Shape, ShapeBuilder,
};
pub use serializer::{DecodeTarget, Serializer};
pub use template::Template;
pub use value::{Map, Value};

// The tree! and record! macros are exported at the crate root via #[macro_export]

#[cfg(test)]
mod field_tests;
#[cfg(test)]
mod template_tests;
