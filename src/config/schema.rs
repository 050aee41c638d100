//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Allow, deny and bypass lists.
    pub rules: RulesConfig,

    /// jsDelivr mirror toggle.
    pub mirror: MirrorConfig,

    /// Outbound request and streaming settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind.
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` as passed to the TCP listener.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 80,
        }
    }
}

/// Rule lists as written in configuration.
///
/// Each is a newline-separated list of `/`-delimited segment patterns,
/// e.g. `"octo/*\nsomeone/tool"`.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// If non-empty, only matching repositories are proxied.
    pub white_list: String,

    /// Matching repositories are refused.
    pub black_list: String,

    /// Matching repositories are redirected instead of proxied.
    pub pass_list: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct MirrorConfig {
    /// Redirect branch files to the `author/repo@ref` shorthand.
    pub jsdelivr: bool,
}

/// Outbound request configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Responses declaring a larger Content-Length are redirected, not streamed.
    pub size_limit: ByteSize,

    /// Bytes read per streamed chunk.
    pub chunk_size: usize,

    /// Disable upstream certificate verification.
    pub skip_tls_verify: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            size_limit: ByteSize(999 * ByteSize::GIB),
            chunk_size: 10 * 1024,
            skip_tls_verify: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Error parsing a size such as `512`, `64K`, `10M` or `2G`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid size {0:?}: expected an integer optionally suffixed with K, M or G")]
pub struct SizeParseError(pub String);

/// A byte count, written as a plain integer or with a binary unit suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub const KIB: u64 = 1024;
    pub const MIB: u64 = 1024 * 1024;
    pub const GIB: u64 = 1024 * 1024 * 1024;

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for ByteSize {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SizeParseError(s.to_string());
        let trimmed = s.trim();
        let (digits, unit) = match trimmed.char_indices().last() {
            Some((i, 'K')) => (&trimmed[..i], Self::KIB),
            Some((i, 'M')) => (&trimmed[..i], Self::MIB),
            Some((i, 'G')) => (&trimmed[..i], Self::GIB),
            _ => (trimmed, 1),
        };
        let n: u64 = digits.parse().map_err(|_| err())?;
        n.checked_mul(unit).map(ByteSize).ok_or_else(err)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n != 0 && n % Self::GIB == 0 {
            write!(f, "{}G", n / Self::GIB)
        } else if n != 0 && n % Self::MIB == 0 {
            write!(f, "{}M", n / Self::MIB)
        } else if n != 0 && n % Self::KIB == 0 {
            write!(f, "{}K", n / Self::KIB)
        } else {
            write!(f, "{}", n)
        }
    }
}

impl Serialize for ByteSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(ByteSize(n)),
            Raw::Str(s) => s.parse().map_err(de::Error::custom),
        }
    }
}
