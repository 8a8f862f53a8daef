use std::fmt;

use serde::Serialize;

use crate::schema::{Asteroid, NaturalEvent};

/// Closest-approach distance under which an asteroid counts as close.
pub const CLOSE_APPROACH_KM: f64 = 1_000_000.0;

const HIGH_SEVERITY_WORDS: &[&str] = &["major", "severe", "extreme"];
const MEDIUM_SEVERITY_WORDS: &[&str] = &["moderate", "significant"];

pub fn count_where<T>(records: &[T], pred: impl Fn(&T) -> bool) -> usize {
    records.iter().filter(|r| pred(r)).count()
}

/// A missing first approach reads as distance zero; an unparsable one is never close.
pub fn is_close_approach(asteroid: &Asteroid) -> bool {
    match asteroid.first_approach() {
        Some(approach) => approach
            .miss_distance_km()
            .is_some_and(|km| km < CLOSE_APPROACH_KM),
        None => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DangerLevel {
    Low,
    Medium,
    High,
}

impl DangerLevel {
    pub fn of(asteroid: &Asteroid) -> Self {
        if asteroid.hazardous {
            DangerLevel::High
        } else if is_close_approach(asteroid) {
            DangerLevel::Medium
        } else {
            DangerLevel::Low
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DangerLevel::Low => "LOW",
            DangerLevel::Medium => "MEDIUM",
            DangerLevel::High => "HIGH",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn of(event: &NaturalEvent) -> Self {
        let text = format!("{} {}", event.title, event.description_text()).to_lowercase();
        if HIGH_SEVERITY_WORDS.iter().any(|w| text.contains(w)) {
            Severity::High
        } else if MEDIUM_SEVERITY_WORDS.iter().any(|w| text.contains(w)) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        })
    }
}

/// Coarse event family, read off the first category title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Wildfire,
    Volcano,
    Storm,
    Flood,
    Other,
}

impl EventKind {
    pub fn of(event: &NaturalEvent) -> Self {
        let category = event
            .primary_category()
            .map(|c| c.title.to_lowercase())
            .unwrap_or_default();

        if category.contains("wildfire") {
            EventKind::Wildfire
        } else if category.contains("volcano") {
            EventKind::Volcano
        } else if category.contains("storm") || category.contains("cyclone") {
            EventKind::Storm
        } else if category.contains("flood") {
            EventKind::Flood
        } else {
            EventKind::Other
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AsteroidStats {
    pub total: usize,
    pub hazardous: usize,
    pub within_1m_km: usize,
    pub this_week: usize,
}

impl AsteroidStats {
    pub fn project(asteroids: &[Asteroid]) -> Self {
        Self {
            total: asteroids.len(),
            hazardous: count_where(asteroids, |a| a.hazardous),
            within_1m_km: count_where(asteroids, is_close_approach),
            this_week: asteroids.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub active: usize,
    pub high_severity: usize,
    pub wildfires: usize,
    pub storms: usize,
}

impl EventStats {
    /// Active and severity counts follow the filter; category counts do not.
    pub fn project(filtered: &[NaturalEvent], all: &[NaturalEvent]) -> Self {
        Self {
            active: filtered.len(),
            high_severity: count_where(filtered, |e| Severity::of(e) == Severity::High),
            wildfires: count_where(all, |e| e.has_category_containing("wildfire")),
            storms: count_where(all, |e| e.has_category_containing("storm")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::fixtures::{asteroid, event};
    use pretty_assertions::assert_eq;

    #[test]
    fn hazardous_is_always_high() {
        for miss in [None, Some("10"), Some("999999"), Some("5000000000"), Some("n/a")] {
            assert_eq!(DangerLevel::of(&asteroid("x", true, miss)), DangerLevel::High);
        }
    }

    #[test]
    fn danger_by_distance() {
        assert_eq!(DangerLevel::of(&asteroid("a", false, Some("999999.9"))), DangerLevel::Medium);
        assert_eq!(DangerLevel::of(&asteroid("b", false, Some("1000000"))), DangerLevel::Low);
        assert_eq!(DangerLevel::of(&asteroid("c", false, Some("garbage"))), DangerLevel::Low);
        assert_eq!(DangerLevel::of(&asteroid("d", false, None)), DangerLevel::Medium);
    }

    #[test]
    fn extreme_description_is_high_severity() {
        let e = event("Wildfire - Ridge", Some("An extreme wildfire event"), &["Wildfires"]);
        assert_eq!(Severity::of(&e), Severity::High);

        let shouting = event("EXTREME Heat", None, &[]);
        assert_eq!(Severity::of(&shouting), Severity::High);
    }

    #[test]
    fn severity_tiers() {
        assert_eq!(Severity::of(&event("Major Flood", None, &[])), Severity::High);
        assert_eq!(Severity::of(&event("Flood", Some("Significant rainfall"), &[])), Severity::Medium);
        assert_eq!(Severity::of(&event("Moderate storm, severe gusts", None, &[])), Severity::High);
        assert_eq!(Severity::of(&event("Iceberg A68", None, &[])), Severity::Low);
    }

    #[test]
    fn event_kind_uses_first_category() {
        assert_eq!(EventKind::of(&event("a", None, &["Wildfires", "Floods"])), EventKind::Wildfire);
        assert_eq!(EventKind::of(&event("b", None, &["Tropical Cyclone"])), EventKind::Storm);
        assert_eq!(EventKind::of(&event("c", None, &["Sea and Lake Ice"])), EventKind::Other);
        assert_eq!(EventKind::of(&event("d", None, &[])), EventKind::Other);
    }

    #[test]
    fn asteroid_stats() {
        let asteroids = vec![
            asteroid("a", true, Some("2000000")),
            asteroid("b", false, Some("400000")),
            asteroid("c", false, Some("3000000")),
            asteroid("d", true, Some("100")),
        ];
        assert_eq!(
            AsteroidStats::project(&asteroids),
            AsteroidStats { total: 4, hazardous: 2, within_1m_km: 2, this_week: 4 }
        );
        assert_eq!(AsteroidStats::project(&[]), AsteroidStats::default());
    }

    #[test]
    fn event_stats_split_filtered_and_all() {
        let all = vec![
            event("Severe fire", None, &["Wildfires"]),
            event("Calm fire", None, &["Wildfires"]),
            event("Storm", Some("major winds"), &["Severe Storms"]),
            event("Flood", None, &["Floods"]),
        ];
        let filtered = crate::filter::by_category(&all, &"wildfires".parse().unwrap());

        assert_eq!(
            EventStats::project(&filtered, &all),
            EventStats { active: 2, high_severity: 1, wildfires: 2, storms: 1 }
        );
    }
}
