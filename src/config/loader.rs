//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ByteSize, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable: {name}: {reason}")]
    Env { name: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables overriding the file.
pub mod env {
    pub const SERVER_HOST: &str = "SERVER_HOST";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const WHITE_LIST: &str = "WHITE_LIST";
    pub const BLACK_LIST: &str = "BLACK_LIST";
    pub const PASS_LIST: &str = "PASS_LIST";
    pub const JSDELIVR_MIRROR: &str = "JSDELIVR_MIRROR";
    /// Older spelling, still honoured.
    pub const JSDELIVER_MIRROR: &str = "JSDELIVER_MIRROR";
    pub const SIZE_LIMIT: &str = "SIZE_LIMIT";
    pub const SKIP_TLS_VERIFY: &str = "SKIP_TLS_VERIFY";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const DEBUG: &str = "DEBUG";
}

/// Load configuration from an optional TOML file, overlay the process
/// environment, and validate.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let config = match path {
        Some(path) => read_file(path)?,
        None => ProxyConfig::default(),
    };
    let config = apply_env(config, |name| std::env::var(name).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML file without validating it.
pub fn read_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Overlay environment variables looked up through `lookup`.
pub fn apply_env<F>(mut config: ProxyConfig, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(env::SERVER_HOST) {
        config.listener.host = v;
    }
    if let Some(v) = lookup(env::SERVER_PORT) {
        config.listener.port = v.trim().parse().map_err(|e| ConfigError::Env {
            name: env::SERVER_PORT,
            reason: format!("{e}"),
        })?;
    }
    if let Some(v) = lookup(env::WHITE_LIST) {
        config.rules.white_list = v;
    }
    if let Some(v) = lookup(env::BLACK_LIST) {
        config.rules.black_list = v;
    }
    if let Some(v) = lookup(env::PASS_LIST) {
        config.rules.pass_list = v;
    }
    if let Some(v) = lookup(env::JSDELIVR_MIRROR).or_else(|| lookup(env::JSDELIVER_MIRROR)) {
        config.mirror.jsdelivr = parse_flag(&v);
    }
    if let Some(v) = lookup(env::SIZE_LIMIT) {
        config.upstream.size_limit = v.parse::<ByteSize>().map_err(|e| ConfigError::Env {
            name: env::SIZE_LIMIT,
            reason: e.to_string(),
        })?;
    }
    if let Some(v) = lookup(env::SKIP_TLS_VERIFY) {
        config.upstream.skip_tls_verify = parse_flag(&v);
    }
    if let Some(v) = lookup(env::LOG_LEVEL) {
        config.observability.log_level = v;
    }
    if lookup(env::DEBUG).is_some_and(|v| parse_flag(&v)) {
        config.observability.log_level = "debug".to_string();
    }

    Ok(config)
}

/// Boolean-like environment value. Anything unrecognized is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(value, "1" | "true" | "True" | "TRUE")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_env(
            ProxyConfig::default(),
            lookup_from(&[
                ("SERVER_HOST", "0.0.0.0"),
                ("SERVER_PORT", "8080"),
                ("WHITE_LIST", "octo/*"),
                ("BLACK_LIST", "bad/*"),
                ("PASS_LIST", "fast/*"),
                ("JSDELIVR_MIRROR", "true"),
                ("SIZE_LIMIT", "100M"),
                ("SKIP_TLS_VERIFY", "1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.rules.white_list, "octo/*");
        assert_eq!(config.rules.black_list, "bad/*");
        assert_eq!(config.rules.pass_list, "fast/*");
        assert!(config.mirror.jsdelivr);
        assert_eq!(config.upstream.size_limit, ByteSize(100 * ByteSize::MIB));
        assert!(config.upstream.skip_tls_verify);
    }

    #[test]
    fn test_legacy_mirror_name() {
        let config =
            apply_env(ProxyConfig::default(), lookup_from(&[("JSDELIVER_MIRROR", "TRUE")])).unwrap();
        assert!(config.mirror.jsdelivr);
    }

    #[test]
    fn test_plain_integer_size_limit() {
        let config =
            apply_env(ProxyConfig::default(), lookup_from(&[("SIZE_LIMIT", "2048")])).unwrap();
        assert_eq!(config.upstream.size_limit, ByteSize(2048));
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = apply_env(ProxyConfig::default(), lookup_from(&[("SERVER_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "SERVER_PORT", .. }));
    }

    #[test]
    fn test_invalid_size_limit_is_an_error() {
        let err = apply_env(ProxyConfig::default(), lookup_from(&[("SIZE_LIMIT", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: "SIZE_LIMIT", .. }));
        assert!(err.to_string().contains("SIZE_LIMIT"));
    }

    #[test]
    fn test_debug_flag_forces_debug_level() {
        let config = apply_env(
            ProxyConfig::default(),
            lookup_from(&[("LOG_LEVEL", "warn"), ("DEBUG", "true")]),
        )
        .unwrap();
        assert_eq!(config.observability.log_level, "debug");

        let config = apply_env(ProxyConfig::default(), lookup_from(&[("DEBUG", "no")])).unwrap();
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_parse_flag() {
        for v in ["1", "true", "True", "TRUE"] {
            assert!(parse_flag(v), "{v}");
        }
        for v in ["0", "false", "yes", "tRUE", ""] {
            assert!(!parse_flag(v), "{v}");
        }
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[listener]\nhost = \"0.0.0.0\"\nport = 9000\n\n[upstream]\nsize_limit = \"1G\"\nchunk_size = 4096"
        )
        .unwrap();

        let config = read_file(file.path()).unwrap();
        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.upstream.size_limit, ByteSize(ByteSize::GIB));
        assert_eq!(config.upstream.chunk_size, 4096);
    }

    #[test]
    fn test_read_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\nsize_limit = \"huge\"").unwrap();
        assert!(matches!(read_file(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = read_file(Path::new("/nonexistent/gh-proxy.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError::ZeroChunkSize,
            ValidationError::EmptyHost,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: upstream.chunk_size must be greater than zero, listener.host must not be empty"
        );
    }
}
