use serde::{Deserialize, Serialize};

use crate::entity::{
    EntityKind, Event, Exhibit, ExhibitSection, Information, MediaResource, ViewController,
};

/// Everything stamped after the client's checkpoint, plus the checkpoint to store next.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncResponse {
    pub exhibits: Vec<Exhibit>,
    pub exhibit_sections: Vec<ExhibitSection>,
    pub resources: Vec<MediaResource>,
    pub events: Vec<Event>,
    pub information: Vec<Information>,
    pub revision: i64,
}

impl SyncResponse {
    /// Total number of records across all lists.
    pub fn len(&self) -> usize {
        self.exhibits.len()
            + self.exhibit_sections.len()
            + self.resources.len()
            + self.events.len()
            + self.information.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub view_controllers: Vec<ViewController>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionResponse {
    pub revision: i64,
}

/// Outcome of a single create or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReceipt {
    pub kind: EntityKind,
    pub id: i64,
    pub revision: i64,
}

/// Outcome of a bulk import: every row shares `revision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReceipt {
    pub revision: i64,
    pub count: usize,
}

/// One positional import row, e.g. `{"kind": "media_resource", "fields": ["", "mammoth.jpg"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl ImportRecord {
    pub fn new<K, I, S>(kind: K, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: kind.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}
