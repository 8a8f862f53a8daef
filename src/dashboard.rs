use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    eonet::EonetClient,
    error::FetchError,
    filter::{self, CategoryFilter},
    lifecycle::Mount,
    metrics::STALE_RESULTS_DROPPED,
    neo::{FeedRange, NeoClient},
    notify::{Notification, Notifier},
    schema::{Asteroid, NaturalEvent},
    stats::{AsteroidStats, EventStats},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

/// Asteroid view: one feed snapshot plus the name search over it.
pub struct AsteroidBoard {
    mount: Mount,
    state: LoadState,
    asteroids: Arc<[Asteroid]>,
    search: String,
    visible: Arc<[Asteroid]>,
}

impl AsteroidBoard {
    pub fn new() -> Self {
        Self {
            mount: Mount::new(),
            state: LoadState::Loading,
            asteroids: Arc::from(Vec::new()),
            search: String::new(),
            visible: Arc::from(Vec::new()),
        }
    }

    pub async fn load(&mut self, client: &NeoClient, range: Option<FeedRange>, notifier: &dyn Notifier) {
        let range = range.unwrap_or_else(|| client.default_range());
        let result = client.fetch_feed(Some(range)).await;
        self.apply(result, range, notifier);
    }

    pub fn apply(&mut self, result: Result<Vec<Asteroid>, FetchError>, range: FeedRange, notifier: &dyn Notifier) {
        if !self.mount.is_mounted() {
            STALE_RESULTS_DROPPED.inc();
            debug!("Asteroid view unmounted, discarding feed result");
            return;
        }

        match result {
            Ok(asteroids) => {
                let days = (range.end - range.start).num_days();
                notifier.notify(Notification::success(
                    "Asteroid Data Loaded",
                    format!("Found {} asteroids in the next {days} days", asteroids.len()),
                ));
                self.state = LoadState::Ready;
                self.replace_collection(asteroids);
            }
            Err(_) => {
                notifier.notify(Notification::failure("Failed to load asteroid data. Please try again."));
                self.state = LoadState::Failed;
                self.replace_collection(Vec::new());
            }
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.refilter();
    }

    fn replace_collection(&mut self, asteroids: Vec<Asteroid>) {
        self.asteroids = Arc::from(asteroids);
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = Arc::from(filter::by_name(&self.asteroids, &self.search));
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn asteroids(&self) -> Arc<[Asteroid]> {
        Arc::clone(&self.asteroids)
    }

    pub fn visible(&self) -> Arc<[Asteroid]> {
        Arc::clone(&self.visible)
    }

    /// Counts cover the whole feed, not just the search results.
    pub fn stats(&self) -> AsteroidStats {
        AsteroidStats::project(&self.asteroids)
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }
}

impl Default for AsteroidBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Natural events view: one windowed snapshot plus the category selection.
pub struct EventBoard {
    mount: Mount,
    state: LoadState,
    events: Arc<[NaturalEvent]>,
    category: CategoryFilter,
    visible: Arc<[NaturalEvent]>,
}

impl EventBoard {
    pub fn new() -> Self {
        Self {
            mount: Mount::new(),
            state: LoadState::Loading,
            events: Arc::from(Vec::new()),
            category: CategoryFilter::All,
            visible: Arc::from(Vec::new()),
        }
    }

    pub async fn load(&mut self, client: &EonetClient, now: DateTime<Utc>, notifier: &dyn Notifier) {
        let result = client.fetch_events(now).await;
        self.apply(result, notifier);
    }

    pub fn apply(&mut self, result: Result<Vec<NaturalEvent>, FetchError>, notifier: &dyn Notifier) {
        if !self.mount.is_mounted() {
            STALE_RESULTS_DROPPED.inc();
            debug!("Events view unmounted, discarding result");
            return;
        }

        match result {
            Ok(events) => {
                notifier.notify(Notification::success(
                    "Natural Events Loaded",
                    format!("Found {} active natural events", events.len()),
                ));
                self.state = LoadState::Ready;
                self.replace_collection(events);
            }
            Err(_) => {
                notifier.notify(Notification::failure(
                    "Failed to load natural events data. Please try again.",
                ));
                self.state = LoadState::Failed;
                self.replace_collection(Vec::new());
            }
        }
    }

    pub fn select_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.refilter();
    }

    fn replace_collection(&mut self, events: Vec<NaturalEvent>) {
        self.events = Arc::from(events);
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = Arc::from(filter::by_category(&self.events, &self.category));
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn events(&self) -> Arc<[NaturalEvent]> {
        Arc::clone(&self.events)
    }

    pub fn visible(&self) -> Arc<[NaturalEvent]> {
        Arc::clone(&self.visible)
    }

    pub fn stats(&self) -> EventStats {
        EventStats::project(&self.visible, &self.events)
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }
}

impl Default for EventBoard {
    fn default() -> Self {
        Self::new()
    }
}
