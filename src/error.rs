// ABOUTME: Error types for template construction, binding, encoding and decoding.
// ABOUTME: Each variant carries the member/wire/type names involved for diagnostics.

use thiserror::Error;

/// The result type for fieldmap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The stage of the pipeline an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Building a [`Template`](crate::Template).
    Schema,
    /// Binding a template to a record type.
    Bind,
    /// Validating the arguments of an encode/decode call.
    CallSite,
    /// Converting a single field.
    Field,
    /// Turning bytes into a tree or back.
    Codec,
}

/// Errors that can occur while building, binding or running a serializer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two fields in one template target the same member.
    #[error("duplicate field: member `{member}` is already mapped")]
    DuplicateField { member: String },

    /// Two fields in one template write the same wire key.
    #[error("duplicate wire name `{wire}` (member `{member}`)")]
    DuplicateWireName { member: String, wire: String },

    /// A template field names a member the record type does not have.
    #[error("member `{member}` not found on `{record}`")]
    MemberFieldNotFound { member: String, record: &'static str },

    /// A template field is not compatible with the kind of its member.
    #[error("field `{member}` expects {expected} but `{record}` declares it as {found}")]
    MemberFieldTypeMismatch {
        member: String,
        record: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A nested serializer leads back to the record type being bound.
    #[error("cyclic schema: field `{member}` recurses into `{record}`")]
    CyclicSchema { member: String, record: &'static str },

    /// The record passed in is not of the type the serializer was bound to.
    #[error("target is `{found}`, serializer is bound to `{expected}`")]
    DifferentType {
        expected: &'static str,
        found: &'static str,
    },

    /// The top-level tree is not an object.
    #[error("(de)serialization of non-object trees is not supported (got {found})")]
    ArrayNotSupported { found: &'static str },

    /// The decode target is not a mutable reference.
    #[error("decoding into a non-mutable target does not make sense")]
    NotAPointer,

    /// The decode target is an absent reference.
    #[error("decoding into a nil target does not make sense")]
    NilPointer,

    /// The tree value (or member value on encode) has the wrong kind for the field.
    #[error("field `{wire}`: data is of incorrect type, expected {expected}")]
    FieldDataIncorrectType { wire: String, expected: &'static str },

    /// The number does not fit the member's integer width.
    #[error("field `{wire}`: value {value} would overflow {width}")]
    FieldDataOverflow {
        wire: String,
        value: String,
        width: &'static str,
    },

    /// The member is read-only.
    #[error("field `{member}` is not settable")]
    FieldUnsettable { member: String },

    /// The member's runtime kind disagrees with the field variant.
    ///
    /// Binding rules this out; seeing it means a record shape lied about
    /// one of its members.
    #[error("field `{member}` is of wrong type")]
    FieldIncorrectType { member: String },

    /// The tree contains a key no field maps (only with `UnknownKeyMode::Error`).
    #[error("unknown field `{wire}`")]
    UnknownField { wire: String },

    /// Nested records go deeper than the configured limit.
    #[error("maximum nesting depth of {limit} exceeded")]
    MaxDepthExceeded { limit: usize },

    /// The codec could not parse the input bytes.
    #[error("parse error: {0}")]
    Parse(String),

    /// The codec could not print the tree.
    #[error("print error: {0}")]
    Print(String),
}

impl Error {
    /// Returns a stable snake_case name for the error kind.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::DuplicateField { .. } => "duplicate_field",
            Error::DuplicateWireName { .. } => "duplicate_wire_name",
            Error::MemberFieldNotFound { .. } => "member_field_not_found",
            Error::MemberFieldTypeMismatch { .. } => "member_field_type_mismatch",
            Error::CyclicSchema { .. } => "cyclic_schema",
            Error::DifferentType { .. } => "different_type",
            Error::ArrayNotSupported { .. } => "array_not_supported",
            Error::NotAPointer => "not_a_pointer",
            Error::NilPointer => "nil_pointer",
            Error::FieldDataIncorrectType { .. } => "field_data_incorrect_type",
            Error::FieldDataOverflow { .. } => "field_data_overflow",
            Error::FieldUnsettable { .. } => "field_unsettable",
            Error::FieldIncorrectType { .. } => "field_incorrect_type",
            Error::UnknownField { .. } => "unknown_field",
            Error::MaxDepthExceeded { .. } => "max_depth_exceeded",
            Error::Parse(_) => "parse_error",
            Error::Print(_) => "print_error",
        }
    }

    /// Returns the pipeline stage this error belongs to.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Error::DuplicateField { .. } | Error::DuplicateWireName { .. } => Phase::Schema,
            Error::MemberFieldNotFound { .. }
            | Error::MemberFieldTypeMismatch { .. }
            | Error::CyclicSchema { .. } => Phase::Bind,
            Error::DifferentType { .. }
            | Error::ArrayNotSupported { .. }
            | Error::NotAPointer
            | Error::NilPointer => Phase::CallSite,
            Error::FieldDataIncorrectType { .. }
            | Error::FieldDataOverflow { .. }
            | Error::FieldUnsettable { .. }
            | Error::FieldIncorrectType { .. }
            | Error::UnknownField { .. }
            | Error::MaxDepthExceeded { .. } => Phase::Field,
            Error::Parse(_) | Error::Print(_) => Phase::Codec,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
