//! Create/patch payloads accepted by the mutation gateway.
//!
//! Payloads carry no revision: the stamp is assigned by the gateway when the
//! write is committed. Field names are snake_case on the wire; the client-style
//! camelCase spellings are accepted as aliases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use museion_schema::EntityKind;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use crate::error::MuseionError;

/// Id of the placeholder section/resource (and the first seeded template).
pub const PLACEHOLDER_ID: i64 = 1;

fn placeholder_id() -> i64 {
    PLACEHOLDER_ID
}

/// A single stamped write: persists one row with the given revision and returns its id.
///
/// Implementations must not commit; the caller owns the transaction that also
/// advanced the counter.
#[async_trait]
pub trait StampedWrite {
    fn kind(&self) -> EntityKind;

    async fn write(&self, conn: &mut SqliteConnection, revision: i64) -> Result<i64, MuseionError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitSectionCreate {
    /// `None` => let the store assign one.
    #[serde(default, alias = "exhibitSectionID")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitCreate {
    #[serde(default, alias = "exhibitID")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "placeholder_id", alias = "exhibitSectionID")]
    pub exhibit_section_id: i64,
    #[serde(default = "placeholder_id", alias = "viewControllerID")]
    pub view_controller_id: i64,
    #[serde(default = "placeholder_id", alias = "resourceID")]
    pub resource_id: i64,
}

impl ExhibitCreate {
    /// An exhibit attached to the placeholder section, template and resource.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            text: text.into(),
            exhibit_section_id: PLACEHOLDER_ID,
            view_controller_id: PLACEHOLDER_ID,
            resource_id: PLACEHOLDER_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewControllerCreate {
    #[serde(default, alias = "viewControllerID")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(alias = "segueID")]
    pub segue_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResourceCreate {
    #[serde(default, alias = "resourceID")]
    pub id: Option<i64>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCreate {
    #[serde(default, alias = "eventID")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "placeholder_id", alias = "resourceID")]
    pub resource_id: i64,
    #[serde(alias = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(alias = "endTime")]
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformationCreate {
    #[serde(default, alias = "informationID")]
    pub id: Option<i64>,
    #[serde(default)]
    pub information: String,
    #[serde(default)]
    pub parking: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum EntityCreate {
    ExhibitSection(ExhibitSectionCreate),
    Exhibit(ExhibitCreate),
    ViewController(ViewControllerCreate),
    MediaResource(MediaResourceCreate),
    Event(EventCreate),
    Information(InformationCreate),
}

impl EntityCreate {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityCreate::ExhibitSection(_) => EntityKind::ExhibitSection,
            EntityCreate::Exhibit(_) => EntityKind::Exhibit,
            EntityCreate::ViewController(_) => EntityKind::ViewController,
            EntityCreate::MediaResource(_) => EntityKind::MediaResource,
            EntityCreate::Event(_) => EntityKind::Event,
            EntityCreate::Information(_) => EntityKind::Information,
        }
    }

    /// Boundary checks that do not need the store. Reference existence is left
    /// to the store's foreign keys.
    pub fn validate(&self) -> Result<(), MuseionError> {
        let id = match self {
            EntityCreate::ExhibitSection(c) => c.id,
            EntityCreate::Exhibit(c) => {
                require_text("exhibit name", &c.name)?;
                c.id
            }
            EntityCreate::ViewController(c) => {
                require_text("view controller name", &c.name)?;
                require_text("segue id", &c.segue_id)?;
                c.id
            }
            EntityCreate::MediaResource(c) => {
                require_text("resource url", &c.url)?;
                c.id
            }
            EntityCreate::Event(c) => {
                require_text("event name", &c.name)?;
                if c.end_time < c.start_time {
                    return Err(MuseionError::Validation(
                        "event end time precedes its start time".to_string(),
                    ));
                }
                c.id
            }
            EntityCreate::Information(c) => c.id,
        };
        match id {
            Some(id) if id <= 0 => Err(MuseionError::Validation(format!(
                "explicit {} id must be positive, got {id}",
                self.kind()
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitSectionPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub text: Option<String>,
    #[serde(alias = "exhibitSectionID")]
    pub exhibit_section_id: Option<i64>,
    #[serde(alias = "viewControllerID")]
    pub view_controller_id: Option<i64>,
    #[serde(alias = "resourceID")]
    pub resource_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewControllerPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    #[serde(alias = "segueID")]
    pub segue_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResourcePatch {
    /// `None` => do not change; `Some(v)` => update
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "resourceID")]
    pub resource_id: Option<i64>,
    #[serde(alias = "startTime")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(alias = "endTime")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformationPatch {
    /// `None` => do not change; `Some(v)` => update
    pub information: Option<String>,
    pub parking: Option<String>,
    pub hours: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum EntityPatch {
    ExhibitSection { id: i64, patch: ExhibitSectionPatch },
    Exhibit { id: i64, patch: ExhibitPatch },
    ViewController { id: i64, patch: ViewControllerPatch },
    MediaResource { id: i64, patch: MediaResourcePatch },
    Event { id: i64, patch: EventPatch },
    Information { id: i64, patch: InformationPatch },
}

impl EntityPatch {
    pub fn id(&self) -> i64 {
        match self {
            EntityPatch::ExhibitSection { id, .. }
            | EntityPatch::Exhibit { id, .. }
            | EntityPatch::ViewController { id, .. }
            | EntityPatch::MediaResource { id, .. }
            | EntityPatch::Event { id, .. }
            | EntityPatch::Information { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityPatch::ExhibitSection { .. } => EntityKind::ExhibitSection,
            EntityPatch::Exhibit { .. } => EntityKind::Exhibit,
            EntityPatch::ViewController { .. } => EntityKind::ViewController,
            EntityPatch::MediaResource { .. } => EntityKind::MediaResource,
            EntityPatch::Event { .. } => EntityKind::Event,
            EntityPatch::Information { .. } => EntityKind::Information,
        }
    }

    pub fn validate(&self) -> Result<(), MuseionError> {
        match self {
            EntityPatch::Exhibit { patch, .. } => {
                require_some_text("exhibit name", patch.name.as_deref())
            }
            EntityPatch::ViewController { patch, .. } => {
                require_some_text("view controller name", patch.name.as_deref())?;
                require_some_text("segue id", patch.segue_id.as_deref())
            }
            EntityPatch::MediaResource { patch, .. } => {
                require_some_text("resource url", patch.url.as_deref())
            }
            EntityPatch::Event { patch, .. } => {
                require_some_text("event name", patch.name.as_deref())?;
                match (patch.start_time, patch.end_time) {
                    (Some(start), Some(end)) if end < start => Err(MuseionError::Validation(
                        "event end time precedes its start time".to_string(),
                    )),
                    _ => Ok(()),
                }
            }
            EntityPatch::ExhibitSection { .. } | EntityPatch::Information { .. } => Ok(()),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), MuseionError> {
    if value.trim().is_empty() {
        return Err(MuseionError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_some_text(field: &str, value: Option<&str>) -> Result<(), MuseionError> {
    value.map_or(Ok(()), |v| require_text(field, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exhibit_create_defaults_to_placeholders_and_accepts_client_names() {
        let create: EntityCreate = serde_json::from_value(json!({
            "type": "exhibit",
            "data": { "name": "Mammoth", "exhibitSectionID": 3 }
        }))
        .expect("exhibit payload deserializes");

        let EntityCreate::Exhibit(exhibit) = create else {
            panic!("expected an exhibit create");
        };
        assert_eq!(exhibit.id, None);
        assert_eq!(exhibit.text, "");
        assert_eq!(exhibit.exhibit_section_id, 3);
        assert_eq!(exhibit.view_controller_id, PLACEHOLDER_ID);
        assert_eq!(exhibit.resource_id, PLACEHOLDER_ID);
    }

    #[test]
    fn validate_rejects_blank_required_text() {
        let create = EntityCreate::MediaResource(MediaResourceCreate {
            id: None,
            url: "   ".to_string(),
        });
        assert!(matches!(
            create.validate(),
            Err(MuseionError::Validation(_))
        ));

        let patch = EntityPatch::ViewController {
            id: 1,
            patch: ViewControllerPatch {
                segue_id: Some(String::new()),
                ..Default::default()
            },
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_explicit_ids() {
        let create = EntityCreate::ExhibitSection(ExhibitSectionCreate {
            id: Some(0),
            name: None,
        });
        assert!(create.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_event_window() {
        let start = Utc::now();
        let create = EntityCreate::Event(EventCreate {
            id: None,
            name: "Lecture".to_string(),
            description: String::new(),
            resource_id: PLACEHOLDER_ID,
            start_time: start,
            end_time: start - chrono::Duration::hours(1),
        });
        assert!(create.validate().is_err());
    }
}
