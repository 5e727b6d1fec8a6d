//! Source documents and the denormalized display row

use serde::{Deserialize, Deserializer, Serialize};

use crate::date::LogDate;

/// Display text for a reference that has no lookup entry
pub const UNKNOWN: &str = "Unknown";

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A boat (one variant per id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub suffix: Option<String>,
}

impl Boat {
    /// `name (suffix)` when a non-empty suffix exists, otherwise `name`.
    /// `None` when the boat has no name.
    pub fn display_name(&self) -> Option<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        match self.suffix.as_deref().map(str::trim) {
            Some(suffix) if !suffix.is_empty() => Some(format!("{} ({})", name, suffix)),
            _ => Some(name.to_string()),
        }
    }
}

/// A club member or former guest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default, rename = "firstName", alias = "fn")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName", alias = "ln")]
    pub last_name: Option<String>,
}

impl Person {
    /// `first last`, trimmed. `None` when the person has neither name.
    pub fn display_name(&self) -> Option<String> {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        (!full.is_empty()).then(|| full.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Destination {
    /// Trimmed name, `None` when blank
    pub fn display_name(&self) -> Option<String> {
        let name = self.name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// One trip as stored in the logbooks document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogbookEntry {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default)]
    pub boat: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<String>,
    #[serde(default)]
    pub dist: Option<f64>,
    #[serde(default)]
    pub dest: Option<String>,
}

impl LogbookEntry {
    /// Distance in km; absent, negative or non-finite values count as 0
    pub fn distance_km(&self) -> f64 {
        match self.dist {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => 0.0,
        }
    }
}

/// Resolved display text of a referenced entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName {
    text: String,
    known: bool,
}

impl DisplayName {
    pub fn known(text: impl Into<String>) -> Self {
        Self { text: text.into(), known: true }
    }

    /// The "Unknown" placeholder for an unresolved reference
    pub fn unknown() -> Self {
        Self { text: UNKNOWN.to_string(), known: false }
    }

    pub fn from_lookup(text: Option<String>) -> Self {
        text.map(Self::known).unwrap_or_else(Self::unknown)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_known(&self) -> bool {
        self.known
    }

    /// The text, only if the reference resolved
    pub fn known_name(&self) -> Option<&str> {
        self.known.then_some(self.text.as_str())
    }
}

/// Immutable, display-ready logbook row built once at load time
#[derive(Debug, Clone, PartialEq)]
pub struct LogbookRow {
    pub year: i32,
    pub date: LogDate,
    pub boat: DisplayName,
    pub crew: Vec<DisplayName>,
    /// Crew display names joined with ", "
    pub crew_display: String,
    pub distance_km: f64,
    pub destination: DisplayName,
    /// Lowercased boat, crew and destination text for substring search
    search_fields: [String; 3],
}

impl LogbookRow {
    pub fn new(
        year: i32,
        date: LogDate,
        boat: DisplayName,
        crew: Vec<DisplayName>,
        distance_km: f64,
        destination: DisplayName,
    ) -> Self {
        let crew_display = crew
            .iter()
            .map(DisplayName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let search_fields = [
            boat.as_str().to_lowercase(),
            crew_display.to_lowercase(),
            destination.as_str().to_lowercase(),
        ];
        Self {
            year,
            date,
            boat,
            crew,
            crew_display,
            distance_km,
            destination,
            search_fields,
        }
    }

    /// Lowercased searchable fields: boat, crew, destination
    pub fn search_fields(&self) -> &[String; 3] {
        &self.search_fields
    }

    /// Names of crew members that resolved against the person table
    pub fn known_crew(&self) -> impl Iterator<Item = &str> {
        self.crew.iter().filter_map(DisplayName::known_name)
    }
}
