// ============================================================================
// JSON Backend Configuration
// ============================================================================

#[derive(Clone, Debug)]
pub struct JsonSerializerConfig {
    /// Emit indented JSON instead of a single line
    pub pretty: bool,
    /// Reject payloads larger than this many bytes, on both serialize and
    /// deserialize, so whatever this backend writes it can also read back
    pub max_input_bytes: usize,
}

impl Default for JsonSerializerConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            max_input_bytes: 1024 * 1024,
        }
    }
}

impl JsonSerializerConfig {
    /// Single-line output with a tight input limit, for hot queue paths
    pub fn compact() -> Self {
        Self {
            pretty: false,
            max_input_bytes: 64 * 1024,
        }
    }

    /// Indented output for logs and debugging
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}
