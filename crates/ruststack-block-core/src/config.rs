//! Block gateway configuration.
//!
//! Provides [`BlockConfig`] for configuring the engine capacity, metadata
//! overheads and the backing-buffer sizing policy. Values are loaded from
//! environment variables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Policy used to size a key's backing buffer on its first write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferSizing {
    /// The buffer takes the engine's remaining unallocated capacity.
    #[default]
    #[serde(rename = "remaining")]
    RemainingCapacity,
    /// The buffer is exactly as large as the capacity reserved for the key.
    Reserved,
}

impl BufferSizing {
    /// Returns the configuration name of this policy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemainingCapacity => "remaining",
            Self::Reserved => "reserved",
        }
    }
}

impl fmt::Display for BufferSizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sizing policy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown buffer sizing policy: {0} (expected \"remaining\" or \"reserved\")")]
pub struct ParseBufferSizingError(String);

impl FromStr for BufferSizing {
    type Err = ParseBufferSizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remaining" => Ok(Self::RemainingCapacity),
            "reserved" => Ok(Self::Reserved),
            other => Err(ParseBufferSizingError(other.to_owned())),
        }
    }
}

/// Block gateway configuration.
///
/// # Examples
///
/// ```
/// use ruststack_block_core::config::{BlockConfig, BufferSizing};
///
/// let config = BlockConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:8080");
/// assert_eq!(config.capacity, 1024 * 1024);
/// assert_eq!(config.buffer_sizing, BufferSizing::RemainingCapacity);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    /// Bind address for the gateway.
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub gateway_listen: String,

    /// Total engine capacity in bytes, passed to `connect` at startup.
    ///
    /// Backing buffers are allocated eagerly and, under
    /// [`BufferSizing::RemainingCapacity`], the first write of a key takes
    /// everything still unallocated. Keep this within the memory the process
    /// can actually obtain. A buffer the allocator refuses fails that write
    /// with `InsufficientCapacity` instead of aborting.
    #[builder(default = 1_048_576)]
    pub capacity: i64,

    /// Capacity allocated for each bucket metadata record.
    #[builder(default = 1024)]
    pub bucket_metadata_size: i64,

    /// Capacity allocated for each object metadata record.
    #[builder(default = 512)]
    pub object_metadata_size: i64,

    /// Read length used by `GetObject` when the request gives none.
    #[builder(default = 1024)]
    pub default_read_length: i64,

    /// Backing-buffer sizing policy.
    #[builder(default)]
    pub buffer_sizing: BufferSizing,

    /// Maximum accepted request body in bytes.
    #[builder(default = 16 * 1024 * 1024)]
    pub max_body_size: usize,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:8080"),
            capacity: 1_048_576,
            bucket_metadata_size: 1024,
            object_metadata_size: 512,
            default_read_length: 1024,
            buffer_sizing: BufferSizing::RemainingCapacity,
            max_body_size: 16 * 1024 * 1024,
            log_level: String::from("info"),
        }
    }
}

impl BlockConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults:
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8080` |
    /// | `BLOCK_CAPACITY` | `1048576` |
    /// | `BLOCK_BUCKET_METADATA_SIZE` | `1024` |
    /// | `BLOCK_OBJECT_METADATA_SIZE` | `512` |
    /// | `BLOCK_DEFAULT_READ_LENGTH` | `1024` |
    /// | `BLOCK_BUFFER_SIZING` | `remaining` |
    /// | `BLOCK_MAX_BODY_SIZE` | `16777216` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(n) = parse_env("BLOCK_CAPACITY") {
            config.capacity = n;
        }
        if let Some(n) = parse_env("BLOCK_BUCKET_METADATA_SIZE") {
            config.bucket_metadata_size = n;
        }
        if let Some(n) = parse_env("BLOCK_OBJECT_METADATA_SIZE") {
            config.object_metadata_size = n;
        }
        if let Some(n) = parse_env("BLOCK_DEFAULT_READ_LENGTH") {
            config.default_read_length = n;
        }
        if let Some(policy) = parse_env("BLOCK_BUFFER_SIZING") {
            config.buffer_sizing = policy;
        }
        if let Some(n) = parse_env("BLOCK_MAX_BODY_SIZE") {
            config.max_body_size = n;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

/// Read and parse an environment variable, logging values that fail to parse.
fn parse_env<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = std::env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(variable = name, value = %raw, error = %e, "ignoring invalid configuration value");
            None
        }
    }
}
