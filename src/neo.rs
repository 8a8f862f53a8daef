use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    config::Config,
    error::FetchError,
    metrics::{FETCH_DURATION, NEO_FETCHES, NEO_FETCH_FAILURES},
    schema::Asteroid,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FeedRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `days` forward from `start`.
    pub fn starting(start: NaiveDate, days: i64) -> Self {
        Self { start, end: start + Duration::days(days) }
    }
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    near_earth_objects: BTreeMap<String, Vec<Asteroid>>,
}

pub struct NeoClient {
    client: Client,
    feed_url: String,
    api_key: String,
    default_days: i64,
}

impl NeoClient {
    pub fn new(cfg: &Config) -> Self {
        Self::with_client(Client::new(), cfg)
    }

    pub fn with_client(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            feed_url: cfg.neo_feed_url.clone(),
            api_key: cfg.nasa_api_key.clone(),
            default_days: cfg.neo_feed_days,
        }
    }

    pub fn default_range(&self) -> FeedRange {
        FeedRange::starting(Utc::now().date_naive(), self.default_days)
    }

    pub fn feed_url(&self, range: Option<FeedRange>) -> Result<Url, FetchError> {
        let range = range.unwrap_or_else(|| self.default_range());
        let start = range.start.format(DATE_FORMAT).to_string();
        let end = range.end.format(DATE_FORMAT).to_string();

        Url::parse_with_params(
            &self.feed_url,
            &[
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
                ("api_key", self.api_key.as_str()),
            ],
        )
        .map_err(|err| FetchError::InvalidUrl(err.to_string()))
    }

    /// One GET against the feed, flattened across all dates.
    pub async fn fetch_feed(&self, range: Option<FeedRange>) -> Result<Vec<Asteroid>, FetchError> {
        let _timer = FETCH_DURATION.with_label_values(&["neo"]).start_timer();
        NEO_FETCHES.inc();

        let result = self.request_feed(range).await;
        if let Err(err) = &result {
            NEO_FETCH_FAILURES.inc();
            error!(error = %err, "Asteroid feed request failed");
        }
        result
    }

    async fn request_feed(&self, range: Option<FeedRange>) -> Result<Vec<Asteroid>, FetchError> {
        let url = self.feed_url(range)?;

        let res = self.client.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }

        let asteroids = decode_feed(&body)?;
        info!(count = asteroids.len(), "Fetched asteroid feed");
        Ok(asteroids)
    }
}

/// Flattens the per-date lists, earliest date key first.
pub fn decode_feed(body: &str) -> Result<Vec<Asteroid>, FetchError> {
    let feed: FeedResponse = serde_json::from_str(body)?;
    Ok(feed.near_earth_objects.into_values().flatten().collect())
}
