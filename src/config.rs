// ABOUTME: Bind-time configuration for serializers.
// ABOUTME: Fixed when a template is bound; a bound serializer never changes it.

/// Default limits.
pub mod limits {
    /// Maximum nested-record depth followed during encode/decode.
    pub const MAX_DEPTH: usize = 128;
}

/// How to treat tree keys that no field maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeyMode {
    /// Skip them, so newer producers can add keys (default)
    #[default]
    Ignore,
    /// Fail the decode with `Error::UnknownField`
    Error,
}

/// Configuration options for a bound serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerConfig {
    /// How to handle unknown keys on decode (default: Ignore)
    pub unknown_keys: UnknownKeyMode,
    /// Maximum nested-record depth
    pub max_depth: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            unknown_keys: UnknownKeyMode::default(),
            max_depth: limits::MAX_DEPTH,
        }
    }
}

impl SerializerConfig {
    /// Reject unknown keys instead of skipping them.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.unknown_keys = UnknownKeyMode::Error;
        self
    }

    /// Set the maximum nested-record depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
