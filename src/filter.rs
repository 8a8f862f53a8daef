use std::fmt;
use std::str::FromStr;

use crate::schema::{Asteroid, NaturalEvent};

/// Category buttons offered on the events view, `(id, label)`.
pub const EVENT_CATEGORIES: &[(&str, &str)] = &[
    ("all", "All Events"),
    ("wildfires", "Wildfires"),
    ("volcanoes", "Volcanoes"),
    ("storms", "Storms"),
    ("floods", "Floods"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Tag(String),
}

impl CategoryFilter {
    pub fn matches(&self, event: &NaturalEvent) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Tag(id) => event.has_category_containing(id),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        if id.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Tag(id.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Tag(id) => f.write_str(id),
        }
    }
}

pub fn name_matches(asteroid: &Asteroid, text: &str) -> bool {
    asteroid.name.to_lowercase().contains(&text.to_lowercase())
}

pub fn by_name(asteroids: &[Asteroid], text: &str) -> Vec<Asteroid> {
    asteroids
        .iter()
        .filter(|asteroid| name_matches(asteroid, text))
        .cloned()
        .collect()
}

pub fn by_category(events: &[NaturalEvent], filter: &CategoryFilter) -> Vec<NaturalEvent> {
    events
        .iter()
        .filter(|event| filter.matches(event))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::schema::*;

    pub fn asteroid(name: &str, hazardous: bool, miss_km: Option<&str>) -> Asteroid {
        Asteroid {
            id: name.replace(' ', "-"),
            name: name.into(),
            nasa_jpl_url: format!("https://ssd.jpl.nasa.gov/?sstr={name}"),
            magnitude: 22.4,
            estimated_diameter: EstimatedDiameter {
                kilometers: DiameterRange { min: 0.05, max: 0.11 },
            },
            hazardous,
            close_approaches: miss_km
                .map(|km| {
                    vec![CloseApproach {
                        close_approach_date: "2024-05-02".into(),
                        relative_velocity: RelativeVelocity { kilometers_per_hour: "51234.5".into() },
                        miss_distance: MissDistance { kilometers: km.into(), astronomical: "0.0123".into() },
                    }]
                })
                .unwrap_or_default(),
        }
    }

    pub fn event(title: &str, description: Option<&str>, categories: &[&str]) -> NaturalEvent {
        NaturalEvent {
            id: title.to_lowercase().replace(' ', "_"),
            title: title.into(),
            description: description.map(str::to_string),
            link: None,
            categories: categories
                .iter()
                .enumerate()
                .map(|(i, t)| Category { id: i.to_string(), title: (*t).into() })
                .collect(),
            sources: vec![],
            geometries: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{asteroid, event};
    use super::*;
    use pretty_assertions::assert_eq;

    fn asteroids() -> Vec<Asteroid> {
        vec![
            asteroid("433 Eros (A898 PA)", false, Some("2000000")),
            asteroid("(2024 JK3)", true, Some("500000")),
            asteroid("99942 Apophis", true, None),
            asteroid("(2019 eR1)", false, Some("800000")),
        ]
    }

    #[test]
    fn empty_search_keeps_everything() {
        assert_eq!(by_name(&asteroids(), ""), asteroids());
    }

    #[test]
    fn search_partitions_by_case_insensitive_substring() {
        let all = asteroids();
        for text in ["er", "ER", "2024", "apophis", "zzz"] {
            let kept = by_name(&all, text);
            for a in &all {
                let contains = a.name.to_lowercase().contains(&text.to_lowercase());
                assert_eq!(kept.contains(a), contains, "{text} vs {}", a.name);
            }
        }
    }

    #[test]
    fn search_preserves_order() {
        let names: Vec<String> = by_name(&asteroids(), "(").into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["433 Eros (A898 PA)", "(2024 JK3)", "(2019 eR1)"]);
    }

    #[test]
    fn all_category_is_identity() {
        let events = vec![
            event("Fire A", None, &["Wildfires"]),
            event("Uncategorised", None, &[]),
            event("Storm B", None, &["Severe Storms"]),
        ];
        assert_eq!(by_category(&events, &CategoryFilter::All), events);
        assert_eq!(by_category(&events, &"ALL".parse().unwrap()), events);
    }

    #[test]
    fn tag_matches_any_category_title() {
        let events = vec![
            event("Fire A", None, &["Wildfires"]),
            event("Storm B", None, &["Severe Storms"]),
            event("Mixed", None, &["Floods", "Severe Storms"]),
            event("Volcano C", None, &["Volcanoes"]),
        ];

        let storms = by_category(&events, &"storms".parse().unwrap());
        let titles: Vec<&str> = storms.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Storm B", "Mixed"]);

        let upper = by_category(&events, &CategoryFilter::Tag("WILDFIRES".into()));
        assert_eq!(upper.len(), 1);
    }

    #[test]
    fn presets_start_with_all() {
        assert_eq!(EVENT_CATEGORIES[0].0, "all");
        assert_eq!(EVENT_CATEGORIES.len(), 5);
    }
}
