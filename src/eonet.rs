use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::{
    config::Config,
    error::FetchError,
    metrics::{EONET_FETCHES, EONET_FETCH_FAILURES, FETCH_DURATION},
    schema::NaturalEvent,
};

const LOOKBACK_DAYS: i64 = 10;
const LOOKAHEAD_DAYS: i64 = 5;

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<NaturalEvent>,
}

pub struct EonetClient {
    client: Client,
    events_url: String,
    status: String,
    limit: u32,
}

impl EonetClient {
    pub fn new(cfg: &Config) -> Self {
        Self::with_client(Client::new(), cfg)
    }

    pub fn with_client(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            events_url: cfg.eonet_events_url.clone(),
            status: cfg.eonet_status.clone(),
            limit: cfg.eonet_limit,
        }
    }

    pub fn events_url(&self) -> Result<Url, FetchError> {
        let limit = self.limit.to_string();
        Url::parse_with_params(
            &self.events_url,
            &[("status", self.status.as_str()), ("limit", limit.as_str())],
        )
        .map_err(|err| FetchError::InvalidUrl(err.to_string()))
    }

    /// One GET, narrowed to the events active around `now`.
    pub async fn fetch_events(&self, now: DateTime<Utc>) -> Result<Vec<NaturalEvent>, FetchError> {
        let _timer = FETCH_DURATION.with_label_values(&["eonet"]).start_timer();
        EONET_FETCHES.inc();

        let result = self.request_events(now).await;
        if let Err(err) = &result {
            EONET_FETCH_FAILURES.inc();
            error!(error = %err, "Natural events request failed");
        }
        result
    }

    async fn request_events(&self, now: DateTime<Utc>) -> Result<Vec<NaturalEvent>, FetchError> {
        let url = self.events_url()?;

        let res = self.client.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }

        let all = decode_events(&body)?;
        let received = all.len();
        let recent = within_window(all, now);
        info!(received, kept = recent.len(), "Fetched natural events");
        Ok(recent)
    }
}

pub fn decode_events(body: &str) -> Result<Vec<NaturalEvent>, FetchError> {
    let parsed: EventsResponse = serde_json::from_str(body)?;
    Ok(parsed.events)
}

/// Keeps events whose first geometry falls in `[now - 10d, now + 5d]`.
/// Events with no geometry carry no date and are always kept.
pub fn within_window(events: Vec<NaturalEvent>, now: DateTime<Utc>) -> Vec<NaturalEvent> {
    let earliest = now - Duration::days(LOOKBACK_DAYS);
    let latest = now + Duration::days(LOOKAHEAD_DAYS);

    events
        .into_iter()
        .filter(|event| match event.first_geometry() {
            Some(geometry) => {
                let keep = geometry.date >= earliest && geometry.date <= latest;
                if !keep {
                    debug!(event_id = %event.id, date = %geometry.date, "Dropping event outside window");
                }
                keep
            }
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Coordinates, Geometry};
    use crate::test_server;
    use chrono::{SecondsFormat, TimeZone};
    use pretty_assertions::assert_eq;

    fn event(id: &str, dates: &[DateTime<Utc>]) -> NaturalEvent {
        NaturalEvent {
            id: id.into(),
            title: format!("Event {id}"),
            description: None,
            link: None,
            categories: vec![],
            sources: vec![],
            geometries: dates
                .iter()
                .map(|date| Geometry {
                    date: *date,
                    kind: Some("Point".into()),
                    coordinates: Coordinates::Point([10.0, 20.0]),
                })
                .collect(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn events_url_uses_status_and_limit() {
        let url = EonetClient::new(&Config::default()).events_url().unwrap();
        assert_eq!(url.query(), Some("status=open&limit=50"));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let now = now();
        let events = vec![
            event("too-old", &[now - Duration::days(10) - Duration::seconds(1)]),
            event("oldest", &[now - Duration::days(10)]),
            event("today", &[now]),
            event("latest", &[now + Duration::days(5)]),
            event("too-new", &[now + Duration::days(5) + Duration::seconds(1)]),
        ];

        let kept: Vec<String> = within_window(events, now).into_iter().map(|e| e.id).collect();
        assert_eq!(kept, vec!["oldest", "today", "latest"]);
    }

    #[test]
    fn only_first_geometry_counts() {
        let now = now();
        let events = vec![
            event("old-then-new", &[now - Duration::days(30), now]),
            event("new-then-old", &[now, now - Duration::days(30)]),
        ];

        let kept: Vec<String> = within_window(events, now).into_iter().map(|e| e.id).collect();
        assert_eq!(kept, vec!["new-then-old"]);
    }

    #[test]
    fn undated_events_are_kept() {
        let kept = within_window(vec![event("undated", &[])], now());
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn decodes_v2_payload() {
        let body = r#"{
            "title": "EONET Events",
            "events": [{
                "id": "EONET_6543",
                "title": "Wildfire - Example County",
                "description": "",
                "link": "https://eonet.gsfc.nasa.gov/api/v2.1/events/EONET_6543",
                "categories": [{"id": 8, "title": "Wildfires"}],
                "sources": [{"id": "InciWeb", "url": "https://inciweb.example/incident/1"}],
                "geometries": [{"date": "2024-05-14T00:00:00Z", "type": "Point", "coordinates": [-110.1, 33.4]}]
            }]
        }"#;

        let events = decode_events(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].categories[0].id, "8");
        assert_eq!(events[0].sources[0].id, "InciWeb");
        assert_eq!(events[0].first_geometry().unwrap().coordinates.lat_lon(), Some((33.4, -110.1)));
    }

    fn event_json(id: &str, date: DateTime<Utc>) -> String {
        format!(
            r#"{{"id": "{id}", "title": "Event {id}", "categories": [{{"id": 8, "title": "Wildfires"}}],
                "geometries": [{{"date": "{}", "type": "Point", "coordinates": [-110.1, 33.4]}}]}}"#,
            date.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    #[tokio::test]
    async fn served_events_are_windowed() {
        let now = Utc::now();
        let body = format!(
            r#"{{"events": [{}, {}, {}]}}"#,
            event_json("stale", now - Duration::days(30)),
            event_json("current", now - Duration::days(2)),
            event_json("forecast", now + Duration::days(20)),
        );
        let base = test_server::serve_once("200 OK", body).await;
        let events_url = format!("{base}/api/v2.1/events");
        let client = EonetClient::new(&Config::from_lookup(move |key| match key {
            "EONET_EVENTS_URL" => Some(events_url.clone()),
            _ => None,
        }));

        let kept: Vec<String> = client.fetch_events(now).await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(kept, vec!["current"]);
    }
}
