use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ---- NeoWs feed ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: String,
    pub name: String,
    pub nasa_jpl_url: String,
    #[serde(rename = "absolute_magnitude_h")]
    pub magnitude: f64,
    pub estimated_diameter: EstimatedDiameter,
    #[serde(rename = "is_potentially_hazardous_asteroid")]
    pub hazardous: bool,
    #[serde(rename = "close_approach_data", default)]
    pub close_approaches: Vec<CloseApproach>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    pub kilometers: DiameterRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiameterRange {
    #[serde(rename = "estimated_diameter_min")]
    pub min: f64,
    #[serde(rename = "estimated_diameter_max")]
    pub max: f64,
}

/// Numbers arrive as strings from upstream and are kept that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseApproach {
    pub close_approach_date: String,
    pub relative_velocity: RelativeVelocity,
    pub miss_distance: MissDistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeVelocity {
    pub kilometers_per_hour: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissDistance {
    pub kilometers: String,
    pub astronomical: String,
}

impl CloseApproach {
    pub fn miss_distance_km(&self) -> Option<f64> {
        self.miss_distance.kilometers.trim().parse().ok()
    }

    pub fn miss_distance_au(&self) -> Option<f64> {
        self.miss_distance.astronomical.trim().parse().ok()
    }

    pub fn velocity_kmh(&self) -> Option<f64> {
        self.relative_velocity.kilometers_per_hour.trim().parse().ok()
    }
}

impl Asteroid {
    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approaches.first()
    }
}

// ---- EONET events ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub geometries: Vec<Geometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub date: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinates {
    /// `[longitude, latitude]`
    Point([f64; 2]),
    Shape(serde_json::Value),
}

impl Coordinates {
    /// `(latitude, longitude)` for point geometries.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match self {
            Coordinates::Point([lon, lat]) => Some((*lat, *lon)),
            Coordinates::Shape(_) => None,
        }
    }
}

impl NaturalEvent {
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn first_geometry(&self) -> Option<&Geometry> {
        self.geometries.first()
    }

    pub fn primary_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn has_category_containing(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.categories
            .iter()
            .any(|cat| cat.title.to_lowercase().contains(&needle))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

// ---- Chat ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
}
