//! Plain-text cards for the terminal. Presentation only.

use std::fmt;

use colored::{ColoredString, Colorize};

use crate::{
    filter::EVENT_CATEGORIES,
    schema::{Asteroid, ChatMessage, NaturalEvent, Sender},
    stats::{AsteroidStats, DangerLevel, EventKind, EventStats, Severity},
};

/// `1234567.891` -> `1,234,568`
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn danger_badge(level: DangerLevel) -> ColoredString {
    let label = format!(" {level} ");
    match level {
        DangerLevel::High => label.on_red().white().bold(),
        DangerLevel::Medium => label.on_yellow().black(),
        DangerLevel::Low => label.on_green().black(),
    }
}

fn severity_badge(severity: Severity) -> ColoredString {
    let label = severity.to_string();
    match severity {
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.green(),
    }
}

fn kind_glyph(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Wildfire => "🔥",
        EventKind::Volcano => "🌋",
        EventKind::Storm => "🌀",
        EventKind::Flood => "🌊",
        EventKind::Other => "⚠",
    }
}

/// Multi-line asteroid card; `to_string()` or print it directly.
pub struct AsteroidCard<'a>(pub &'a Asteroid);

impl fmt::Display for AsteroidCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let asteroid = self.0;
        let diameter = &asteroid.estimated_diameter.kilometers;

        writeln!(f, "{} {}", asteroid.name.bold(), danger_badge(DangerLevel::of(asteroid)))?;
        writeln!(f, "  Diameter   {:.2} - {:.2} km", diameter.min, diameter.max)?;
        writeln!(f, "  Magnitude  {:.1} H", asteroid.magnitude)?;

        if let Some(approach) = asteroid.first_approach() {
            writeln!(f, "  Approach   {}", approach.close_approach_date)?;
            if let (Some(km), Some(au)) = (approach.miss_distance_km(), approach.miss_distance_au()) {
                writeln!(f, "  Miss       {} km ({au:.3} AU)", group_thousands(km))?;
            }
            if let Some(kmh) = approach.velocity_kmh() {
                writeln!(f, "  Velocity   {} km/h", group_thousands(kmh))?;
            }
        }

        writeln!(f, "  NASA JPL   {}", asteroid.nasa_jpl_url.underline())?;
        if asteroid.hazardous {
            writeln!(f, "  {}", "Potentially hazardous".red())?;
        }
        Ok(())
    }
}

pub struct EventCard<'a>(pub &'a NaturalEvent);

impl fmt::Display for EventCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event = self.0;
        let category = event
            .primary_category()
            .map(|c| c.title.as_str())
            .unwrap_or("Natural Event");
        let description = match event.description_text() {
            "" => "Natural event monitoring in progress...",
            text => text,
        };

        writeln!(
            f,
            "{} {} [{}]  Risk: {}",
            kind_glyph(EventKind::of(event)),
            event.title.bold(),
            category,
            severity_badge(Severity::of(event))
        )?;
        writeln!(f, "  {}", description.dimmed())?;

        if let Some(geometry) = event.first_geometry() {
            writeln!(f, "  Date       {}", geometry.date.format("%Y-%m-%d"))?;
            if let Some((lat, lon)) = geometry.coordinates.lat_lon() {
                writeln!(f, "  Location   {lat:.2}°, {lon:.2}°")?;
            }
        }

        if let Some(link) = &event.link {
            writeln!(f, "  Details    {}", link.underline())?;
        }
        if let Some(source) = event.sources.first() {
            writeln!(f, "  Source     {}", source.url.underline())?;
        }
        Ok(())
    }
}

pub fn asteroid_card(asteroid: &Asteroid) -> String {
    AsteroidCard(asteroid).to_string()
}

pub fn event_card(event: &NaturalEvent) -> String {
    EventCard(event).to_string()
}

pub fn asteroid_summary(stats: &AsteroidStats) -> String {
    format!(
        "Total Asteroids: {}  |  Potentially Hazardous: {}  |  Within 1M km: {}  |  This Week: {}",
        stats.total, stats.hazardous, stats.within_1m_km, stats.this_week
    )
}

pub fn event_summary(stats: &EventStats) -> String {
    format!(
        "Active Events: {}  |  High Severity: {}  |  Wildfires: {}  |  Storm Systems: {}",
        stats.active, stats.high_severity, stats.wildfires, stats.storms
    )
}

pub fn empty_asteroids(search: &str) -> String {
    if search.is_empty() {
        "No asteroid data available".into()
    } else {
        format!("No asteroids match \"{search}\"")
    }
}

pub fn empty_events(category: &str) -> String {
    if category == "all" {
        "No natural events detected in the monitoring period".into()
    } else {
        format!("No {category} events found")
    }
}

pub fn category_legend() -> String {
    EVENT_CATEGORIES
        .iter()
        .map(|(id, label)| format!("{id} ({label})"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn map_placeholder() -> &'static str {
    "Global Events Map: interactive map coming soon."
}

pub fn chat_line(message: &ChatMessage) -> String {
    let time = message.timestamp.format("%H:%M:%S");
    match message.sender {
        Sender::User => format!("[{time}] {} {}", "you>".cyan().bold(), message.content),
        Sender::Assistant => format!("[{time}] {} {}", "bot>".magenta().bold(), message.content),
    }
}
