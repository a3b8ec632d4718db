//! Configuration for the sync engine and its HTTP transport.

use std::fmt;

/// Default status feed endpoint.
const DEFAULT_ENDPOINT: &str = "http://api.pblweb.com/london-tube/v2/status.php";

/// Protocol marker sent as field 1 of every request.
const DEFAULT_PROTOCOL_VERSION: i32 = 1;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

/// Characters per status numeral in a response.
///
/// Older feeds used two characters per line; the current feed uses three.
/// Nothing on the wire says which one a server speaks, so it is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusWidth {
    Two,
    #[default]
    Three,
}

impl StatusWidth {
    /// Width in characters.
    pub fn chars(self) -> usize {
        match self {
            StatusWidth::Two => 2,
            StatusWidth::Three => 3,
        }
    }

    /// Parse a width given as `"2"` or `"3"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "2" => Some(StatusWidth::Two),
            "3" => Some(StatusWidth::Three),
            _ => None,
        }
    }
}

impl fmt::Display for StatusWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chars())
    }
}

/// Configuration for the sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// URL the status request is posted to
    pub endpoint: String,
    /// Protocol marker sent with each request
    pub protocol_version: i32,
    /// Width of each status field in responses
    pub status_width: StatusWidth,
    /// Request timeout in seconds (enforced by the HTTP transport)
    pub timeout_secs: u64,
}

impl SyncConfig {
    /// Create a config with the given endpoint and default protocol settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            status_width: StatusWidth::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the protocol marker.
    pub fn with_protocol_version(mut self, version: i32) -> Self {
        self.protocol_version = version;
        self
    }

    /// Set the status field width.
    pub fn with_status_width(mut self, width: StatusWidth) -> Self {
        self.status_width = width;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Read configuration from `TUBE_STATUS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("TUBE_STATUS_ENDPOINT") {
            Some(endpoint) => Self::new(endpoint),
            None => Self::default(),
        };

        if let Some(value) = lookup("TUBE_STATUS_PROTOCOL_VERSION") {
            config.protocol_version = value.trim().parse().map_err(|_| ConfigError {
                key: "TUBE_STATUS_PROTOCOL_VERSION",
                value: value.clone(),
                reason: "expected an integer",
            })?;
        }

        if let Some(value) = lookup("TUBE_STATUS_WIDTH") {
            config.status_width = StatusWidth::parse(&value).ok_or_else(|| ConfigError {
                key: "TUBE_STATUS_WIDTH",
                value: value.clone(),
                reason: "expected 2 or 3",
            })?;
        }

        if let Some(value) = lookup("TUBE_STATUS_TIMEOUT_SECS") {
            config.timeout_secs = value.trim().parse().map_err(|_| ConfigError {
                key: "TUBE_STATUS_TIMEOUT_SECS",
                value: value.clone(),
                reason: "expected a whole number of seconds",
            })?;
        }

        Ok(config)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn config_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.protocol_version, 1);
        assert_eq!(config.status_width, StatusWidth::Three);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builder() {
        let config = SyncConfig::new("http://localhost:8080/status")
            .with_protocol_version(2)
            .with_status_width(StatusWidth::Two)
            .with_timeout(5);

        assert_eq!(config.endpoint, "http://localhost:8080/status");
        assert_eq!(config.protocol_version, 2);
        assert_eq!(config.status_width.chars(), 2);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn from_lookup_empty_is_default() {
        assert_eq!(SyncConfig::from_lookup(lookup(&[])), Ok(SyncConfig::default()));
    }

    #[test]
    fn from_lookup_reads_every_key() {
        let config = SyncConfig::from_lookup(lookup(&[
            ("TUBE_STATUS_ENDPOINT", "http://example.test/s"),
            ("TUBE_STATUS_PROTOCOL_VERSION", "3"),
            ("TUBE_STATUS_WIDTH", "2"),
            ("TUBE_STATUS_TIMEOUT_SECS", "10"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            SyncConfig::new("http://example.test/s")
                .with_protocol_version(3)
                .with_status_width(StatusWidth::Two)
                .with_timeout(10)
        );
    }

    #[test]
    fn from_lookup_rejects_bad_width() {
        let err = SyncConfig::from_lookup(lookup(&[("TUBE_STATUS_WIDTH", "4")])).unwrap_err();
        assert_eq!(err.key, "TUBE_STATUS_WIDTH");
        assert_eq!(
            err.to_string(),
            "invalid value \"4\" for TUBE_STATUS_WIDTH: expected 2 or 3"
        );
    }

    #[test]
    fn from_lookup_rejects_bad_numbers() {
        assert!(SyncConfig::from_lookup(lookup(&[("TUBE_STATUS_PROTOCOL_VERSION", "v2")])).is_err());
        assert!(SyncConfig::from_lookup(lookup(&[("TUBE_STATUS_TIMEOUT_SECS", "-1")])).is_err());
    }

    #[test]
    fn width_parse_and_display() {
        assert_eq!(StatusWidth::parse(" 3 "), Some(StatusWidth::Three));
        assert_eq!(StatusWidth::parse("three"), None);
        assert_eq!(StatusWidth::Two.to_string(), "2");
    }
}
