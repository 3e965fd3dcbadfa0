//! Revisioned content records as the mobile client sees them.
//!
//! Field names on the wire follow the client's data model (`exhibitID`,
//! `resourceID`, ...); the Rust field names match the SQLite columns so the
//! same structs can be loaded with `sqlx::FromRow` when the `sqlx` feature is on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every content type that carries a revision stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    ExhibitSection,
    Exhibit,
    ViewController,
    MediaResource,
    Event,
    Information,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::ExhibitSection,
        EntityKind::Exhibit,
        EntityKind::ViewController,
        EntityKind::MediaResource,
        EntityKind::Event,
        EntityKind::Information,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::ExhibitSection => "exhibit_section",
            EntityKind::Exhibit => "exhibit",
            EntityKind::ViewController => "view_controller",
            EntityKind::MediaResource => "media_resource",
            EntityKind::Event => "event",
            EntityKind::Information => "information",
        }
    }

    /// Class-style name used by older import sheets (`ExhibitSection`, `MediaResource`, ...).
    pub fn legacy_name(self) -> &'static str {
        match self {
            EntityKind::ExhibitSection => "ExhibitSection",
            EntityKind::Exhibit => "Exhibit",
            EntityKind::ViewController => "ViewController",
            EntityKind::MediaResource => "MediaResource",
            EntityKind::Event => "Event",
            EntityKind::Information => "Information",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntityKind(pub String);

impl fmt::Display for UnknownEntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown entity kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEntityKind {}

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.legacy_name() == s)
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ExhibitSection {
    #[serde(rename = "exhibitSectionID")]
    pub id: i64,
    /// `None` for the placeholder section every store starts with.
    pub name: Option<String>,
    pub revision: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Exhibit {
    #[serde(rename = "exhibitID")]
    pub id: i64,
    pub name: String,
    pub text: String,
    #[serde(rename = "exhibitSectionID")]
    pub exhibit_section_id: i64,
    #[serde(rename = "viewControllerID")]
    pub view_controller_id: i64,
    #[serde(rename = "resourceID")]
    pub resource_id: i64,
    pub revision: i64,
}

/// Presentation template the client uses to render an exhibit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ViewController {
    #[serde(rename = "viewControllerID")]
    pub id: i64,
    pub name: String,
    #[serde(rename = "segueID")]
    pub segue_id: String,
    pub revision: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MediaResource {
    #[serde(rename = "resourceID")]
    pub id: i64,
    /// Filename or URL understood by the media file server.
    pub url: String,
    pub revision: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Event {
    #[serde(rename = "eventID")]
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "resourceID")]
    pub resource_id: i64,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    pub revision: i64,
}

/// Venue information block (parking, opening hours, location).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Information {
    #[serde(rename = "informationID")]
    pub id: i64,
    pub information: String,
    pub parking: String,
    pub hours: String,
    pub location: String,
    pub revision: i64,
}

/// Any single record, tagged by kind. Returned by id lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    ExhibitSection(ExhibitSection),
    Exhibit(Exhibit),
    ViewController(ViewController),
    MediaResource(MediaResource),
    Event(Event),
    Information(Information),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_parses_snake_and_legacy_names() {
        assert_eq!(
            "media_resource".parse::<EntityKind>(),
            Ok(EntityKind::MediaResource)
        );
        assert_eq!(
            " ExhibitSection ".parse::<EntityKind>(),
            Ok(EntityKind::ExhibitSection)
        );
        assert_eq!(
            "Tombstone".parse::<EntityKind>(),
            Err(UnknownEntityKind("Tombstone".to_string()))
        );
    }

    #[test]
    fn exhibit_serializes_with_client_field_names() {
        let exhibit = Exhibit {
            id: 7,
            name: "Mammoth".to_string(),
            text: "Ice age".to_string(),
            exhibit_section_id: 1,
            view_controller_id: 2,
            resource_id: 3,
            revision: 9,
        };
        assert_eq!(
            serde_json::to_value(&exhibit).unwrap(),
            json!({
                "exhibitID": 7,
                "name": "Mammoth",
                "text": "Ice age",
                "exhibitSectionID": 1,
                "viewControllerID": 2,
                "resourceID": 3,
                "revision": 9
            })
        );
    }

    #[test]
    fn event_times_are_iso8601() {
        let start = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = Event {
            id: 1,
            name: "Night at the museum".to_string(),
            description: String::new(),
            resource_id: 1,
            start_time: start,
            end_time: start,
            revision: 1,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["startTime"], json!("2024-05-01T10:00:00Z"));
    }
}
