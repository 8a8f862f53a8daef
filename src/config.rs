use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_NEO_FEED_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";
pub const DEFAULT_EONET_EVENTS_URL: &str = "https://eonet.gsfc.nasa.gov/api/v2.1/events";
/// NASA's shared, heavily rate-limited key. Real keys come from `NASA_API_KEY`.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

#[derive(Clone)]
pub struct Config {
    pub nasa_api_key: String,
    pub neo_feed_url: String,
    pub neo_feed_days: i64,
    pub eonet_events_url: String,
    pub eonet_status: String,
    pub eonet_limit: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let nasa_api_key = lookup("NASA_API_KEY").unwrap_or_else(|| {
            warn!("NASA_API_KEY not set, falling back to {DEMO_API_KEY}");
            DEMO_API_KEY.into()
        });

        Self {
            nasa_api_key,
            neo_feed_url: lookup("NEO_FEED_URL").unwrap_or_else(|| DEFAULT_NEO_FEED_URL.into()),
            neo_feed_days: parse_or("NEO_FEED_DAYS", lookup("NEO_FEED_DAYS"), 7),
            eonet_events_url: lookup("EONET_EVENTS_URL")
                .unwrap_or_else(|| DEFAULT_EONET_EVENTS_URL.into()),
            eonet_status: lookup("EONET_STATUS").unwrap_or_else(|| "open".into()),
            eonet_limit: parse_or("EONET_LIMIT", lookup("EONET_LIMIT"), 50),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// Keep the key out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("nasa_api_key", &"<redacted>")
            .field("neo_feed_url", &self.neo_feed_url)
            .field("neo_feed_days", &self.neo_feed_days)
            .field("eonet_events_url", &self.eonet_events_url)
            .field("eonet_status", &self.eonet_status)
            .field("eonet_limit", &self.eonet_limit)
            .finish()
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(%name, %value, "Unparsable value, using default {default}");
            default
        }),
        None => default,
    }
}
