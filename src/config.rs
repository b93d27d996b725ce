//! Configuration loading from the process environment.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const CHANNEL_ID: &str = "CHANNEL_ID";
pub const RSS_URL: &str = "RSS_URL";
pub const TOKEN: &str = "TOKEN";
pub const CHECK_INTERVAL: &str = "CHECK_INTERVAL";

/// Poll period used when `CHECK_INTERVAL` is not set.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("CHECK_INTERVAL must be a positive number of milliseconds, got {0:?}")]
    InvalidInterval(String),
}

/// Immutable settings, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub channel_id: String,
    pub feed_url: String,
    pub token: String,
    pub check_interval: Duration,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// Blank values count as missing.  Every missing required key is
    /// reported, not only the first.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let channel_id = get(CHANNEL_ID);
        let feed_url = get(RSS_URL);
        let token = get(TOKEN);

        let missing: Vec<&'static str> = [
            (CHANNEL_ID, channel_id.is_none()),
            (RSS_URL, feed_url.is_none()),
            (TOKEN, token.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (Some(channel_id), Some(feed_url), Some(token)) = (channel_id, feed_url, token) else {
            return Err(ConfigError::Missing(missing));
        };

        let check_interval = match get(CHECK_INTERVAL) {
            None => DEFAULT_CHECK_INTERVAL,
            Some(raw) => parse_interval(&raw)?,
        };

        Ok(Self {
            channel_id,
            feed_url,
            token,
            check_interval,
        })
    }
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidInterval(raw.to_string())),
    }
}

// The token never reaches the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("channel_id", &self.channel_id)
            .field("feed_url", &self.feed_url)
            .field("token", &"<redacted>")
            .field("check_interval", &self.check_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    const FULL: [(&str, &str); 3] = [
        (CHANNEL_ID, "123"),
        (RSS_URL, "https://example.com/feed.xml"),
        (TOKEN, "secret"),
    ];

    #[test]
    fn loads_required_values_with_default_interval() {
        let config = load(&FULL).unwrap();
        assert_eq!(config.channel_id, "123");
        assert_eq!(config.feed_url, "https://example.com/feed.xml");
        assert_eq!(config.token, "secret");
        assert_eq!(config.check_interval, Duration::from_millis(600_000));
    }

    #[test]
    fn reads_interval_in_milliseconds() {
        let mut vars = FULL.to_vec();
        vars.push((CHECK_INTERVAL, "30000"));
        assert_eq!(load(&vars).unwrap().check_interval, Duration::from_secs(30));
    }

    #[test]
    fn reports_exactly_the_missing_variables() {
        assert_eq!(
            load(&[(RSS_URL, "https://example.com/feed.xml")]),
            Err(ConfigError::Missing(vec![CHANNEL_ID, TOKEN]))
        );
        assert_eq!(
            load(&[(CHANNEL_ID, "1"), (RSS_URL, "u")]),
            Err(ConfigError::Missing(vec![TOKEN]))
        );
        assert_eq!(
            load(&[]),
            Err(ConfigError::Missing(vec![CHANNEL_ID, RSS_URL, TOKEN]))
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = load(&[(CHANNEL_ID, "  "), (RSS_URL, "u"), (TOKEN, "t")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![CHANNEL_ID]));
        assert_eq!(err.to_string(), "missing environment variables: CHANNEL_ID");
    }

    #[test]
    fn rejects_bad_intervals() {
        for raw in ["abc", "0", "-5", "1.5"] {
            let mut vars = FULL.to_vec();
            vars.push((CHECK_INTERVAL, raw));
            assert_eq!(
                load(&vars),
                Err(ConfigError::InvalidInterval(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", load(&FULL).unwrap());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
