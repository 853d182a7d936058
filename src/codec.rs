// ABOUTME: Byte-level codecs that turn a Value tree into bytes and back.
// ABOUTME: JsonCodec is the default, built on serde_json.

use crate::error::{Error, Result};
use crate::value::Value;

/// Converts between bytes and a [`Value`] tree.
///
/// Serializers never touch bytes themselves; the byte-level helpers on
/// [`Serializer`](crate::Serializer) take a codec and delegate to it.
pub trait TreeCodec {
    /// Parse a complete document into a tree.
    fn parse(&self, bytes: &[u8]) -> Result<Value>;

    /// Print a tree as a complete document.
    fn print(&self, value: &Value) -> Result<Vec<u8>>;
}

/// JSON text codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    /// Emit indented output instead of the compact form.
    pub pretty: bool,
}

impl JsonCodec {
    /// A codec producing compact JSON.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec producing indented JSON.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl TreeCodec for JsonCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn print(&self, value: &Value) -> Result<Vec<u8>> {
        let printed = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        printed.map_err(|e| Error::Print(e.to_string()))
    }
}

impl<C: TreeCodec + ?Sized> TreeCodec for &C {
    fn parse(&self, bytes: &[u8]) -> Result<Value> {
        (**self).parse(bytes)
    }

    fn print(&self, value: &Value) -> Result<Vec<u8>> {
        (**self).print(value)
    }
}
