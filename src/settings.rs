use config::Config;
use std::time::Duration;

use crate::Result;

pub const DEFAULT_DIAL_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_RESOLVE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;
/// Upper bound on the peers handed out in a single crawl answer.
pub const DEFAULT_CRAWL_RESPONSE_SIZE: usize = 10;

/// Knobs for the interaction layer, read from the `interactions` table of the
/// node's config.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionSettings {
    pub dial_timeout: Duration,
    pub resolve_timeout: Duration,
    pub read_timeout: Duration,
    pub crawl_response_size: usize,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        InteractionSettings {
            dial_timeout: Duration::from_millis(DEFAULT_DIAL_TIMEOUT_MS),
            resolve_timeout: Duration::from_millis(DEFAULT_RESOLVE_TIMEOUT_MS),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            crawl_response_size: DEFAULT_CRAWL_RESPONSE_SIZE,
        }
    }
}

impl InteractionSettings {
    /// Reads the settings, falling back to the defaults for every missing key.
    pub fn from_config(config_settings: &Config) -> Result<Self> {
        let millis = |key: &str, default: u64| -> Result<Duration> {
            match config_settings.get::<u64>(key) {
                Ok(value) => Ok(Duration::from_millis(value)),
                Err(config::ConfigError::NotFound(_)) => Ok(Duration::from_millis(default)),
                Err(err) => Err(err.into()),
            }
        };

        let crawl_response_size =
            match config_settings.get::<usize>("interactions.crawl_response_size") {
                Ok(size) => size,
                Err(config::ConfigError::NotFound(_)) => DEFAULT_CRAWL_RESPONSE_SIZE,
                Err(err) => return Err(err.into()),
            };

        Ok(InteractionSettings {
            dial_timeout: millis("interactions.dial_timeout_ms", DEFAULT_DIAL_TIMEOUT_MS)?,
            resolve_timeout: millis(
                "interactions.resolve_timeout_ms",
                DEFAULT_RESOLVE_TIMEOUT_MS,
            )?,
            read_timeout: millis("interactions.read_timeout_ms", DEFAULT_READ_TIMEOUT_MS)?,
            crawl_response_size,
        })
    }

    /// Loads a config file by name (extension optional) and reads the settings
    /// from it.
    pub fn load(config_name: &str) -> Result<Self> {
        let mut config_settings = Config::default();
        config_settings.merge(config::File::with_name(config_name))?;
        InteractionSettings::from_config(&config_settings)
    }
}
