use chrono::{DateTime, NaiveDateTime, Utc};
use museion_schema::EntityKind;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::db::patch::{
    EntityCreate, EventCreate, ExhibitCreate, ExhibitSectionCreate, InformationCreate,
    MediaResourceCreate, ViewControllerCreate,
};

type Constructor = fn(&[String]) -> Result<EntityCreate, String>;

/// How one record kind is read from positional fields.
#[derive(Debug, Clone)]
pub struct ImportKind {
    pub kind: EntityKind,
    /// Records of lower rank are written first; rows only reference lower ranks.
    pub rank: u8,
    /// Positional column names, leading `id` included.
    pub columns: &'static [&'static str],
    build: Constructor,
}

impl ImportKind {
    /// Checks arity and converts `fields` into a typed create.
    pub fn build(&self, fields: &[String]) -> Result<EntityCreate, String> {
        if fields.len() != self.columns.len() {
            return Err(format!(
                "{} expects {} fields ({}), got {}",
                self.kind,
                self.columns.len(),
                self.columns.join(", "),
                fields.len()
            ));
        }
        (self.build)(fields)
    }
}

/// Immutable registry of importable kinds.
/// Maps both the snake_case kind names and the legacy class-style names to a
/// typed constructor, typically initialized once at startup (via `LazyLock`).
#[derive(Debug, Clone)]
pub struct ImportRegistry {
    name_to_index: HashMap<String, usize>,
    kinds: Vec<ImportKind>,
}

impl ImportRegistry {
    pub fn new(kinds: Vec<ImportKind>) -> Self {
        let mut name_to_index = HashMap::with_capacity(kinds.len() * 2);
        for (idx, k) in kinds.iter().enumerate() {
            name_to_index.insert(k.kind.as_str().to_string(), idx);
            name_to_index.insert(k.kind.legacy_name().to_string(), idx);
        }
        Self {
            name_to_index,
            kinds,
        }
    }

    /// The six content kinds with their dependency ranks:
    /// templates, resources and venue info first, then sections and events,
    /// then exhibits.
    pub fn standard() -> Self {
        Self::new(vec![
            ImportKind {
                kind: EntityKind::ViewController,
                rank: 0,
                columns: &["id", "name", "segue_id"],
                build: build_view_controller,
            },
            ImportKind {
                kind: EntityKind::MediaResource,
                rank: 0,
                columns: &["id", "url"],
                build: build_media_resource,
            },
            ImportKind {
                kind: EntityKind::Information,
                rank: 0,
                columns: &["id", "information", "parking", "hours", "location"],
                build: build_information,
            },
            ImportKind {
                kind: EntityKind::ExhibitSection,
                rank: 1,
                columns: &["id", "name"],
                build: build_exhibit_section,
            },
            ImportKind {
                kind: EntityKind::Event,
                rank: 1,
                columns: &[
                    "id",
                    "name",
                    "description",
                    "resource_id",
                    "start_time",
                    "end_time",
                ],
                build: build_event,
            },
            ImportKind {
                kind: EntityKind::Exhibit,
                rank: 2,
                columns: &[
                    "id",
                    "name",
                    "text",
                    "exhibit_section_id",
                    "view_controller_id",
                    "resource_id",
                ],
                build: build_exhibit,
            },
        ])
    }

    pub fn resolve(&self, name: &str) -> Option<&ImportKind> {
        self.name_to_index
            .get(name.trim())
            .and_then(|idx| self.kinds.get(*idx))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

pub static IMPORT_REGISTRY: LazyLock<ImportRegistry> = LazyLock::new(ImportRegistry::standard);

fn build_view_controller(f: &[String]) -> Result<EntityCreate, String> {
    Ok(EntityCreate::ViewController(ViewControllerCreate {
        id: optional_id("id", &f[0])?,
        name: f[1].clone(),
        segue_id: f[2].clone(),
    }))
}

fn build_media_resource(f: &[String]) -> Result<EntityCreate, String> {
    Ok(EntityCreate::MediaResource(MediaResourceCreate {
        id: optional_id("id", &f[0])?,
        url: f[1].trim().to_string(),
    }))
}

fn build_information(f: &[String]) -> Result<EntityCreate, String> {
    Ok(EntityCreate::Information(InformationCreate {
        id: optional_id("id", &f[0])?,
        information: f[1].clone(),
        parking: f[2].clone(),
        hours: f[3].clone(),
        location: f[4].clone(),
    }))
}

fn build_exhibit_section(f: &[String]) -> Result<EntityCreate, String> {
    let name = Some(f[1].clone()).filter(|n| !n.is_empty());
    Ok(EntityCreate::ExhibitSection(ExhibitSectionCreate {
        id: optional_id("id", &f[0])?,
        name,
    }))
}

fn build_event(f: &[String]) -> Result<EntityCreate, String> {
    Ok(EntityCreate::Event(EventCreate {
        id: optional_id("id", &f[0])?,
        name: f[1].clone(),
        description: f[2].clone(),
        resource_id: required_id("resource_id", &f[3])?,
        start_time: timestamp("start_time", &f[4])?,
        end_time: timestamp("end_time", &f[5])?,
    }))
}

fn build_exhibit(f: &[String]) -> Result<EntityCreate, String> {
    Ok(EntityCreate::Exhibit(ExhibitCreate {
        id: optional_id("id", &f[0])?,
        name: f[1].clone(),
        text: f[2].clone(),
        exhibit_section_id: required_id("exhibit_section_id", &f[3])?,
        view_controller_id: required_id("view_controller_id", &f[4])?,
        resource_id: required_id("resource_id", &f[5])?,
    }))
}

/// Empty means "let the store assign one".
fn optional_id(column: &str, raw: &str) -> Result<Option<i64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    required_id(column, raw).map(Some)
}

fn required_id(column: &str, raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("{column} is not an integer: {raw:?}"))
}

/// RFC 3339, or a naive `YYYY-MM-DD[ T]HH:MM[:SS]` taken as UTC.
fn timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("{column} is not a timestamp: {raw:?}"))
}
