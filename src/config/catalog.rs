use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A view-controller template seeded into the catalog at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TemplateSeed {
    pub name: String,
    pub segue_id: String,
}

impl TemplateSeed {
    pub fn new(name: impl Into<String>, segue_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            segue_id: segue_id.into(),
        }
    }
}

/// Catalog bootstrap configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Templates ensured to exist on every start, in order.
    /// TOML: `[[catalog.templates]]`. Default: the text template only.
    #[serde(default = "default_templates")]
    pub templates: Vec<TemplateSeed>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            templates: default_templates(),
        }
    }
}

impl CatalogConfig {
    /// Names and segue ids are unique columns; reject duplicates before they reach the store.
    pub fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::new();
        let mut segues = HashSet::new();
        for t in &self.templates {
            if t.name.trim().is_empty() || t.segue_id.trim().is_empty() {
                return Err("catalog.templates entries need a name and a segue_id".to_string());
            }
            if !names.insert(t.name.as_str()) {
                return Err(format!("duplicate catalog template name: {}", t.name));
            }
            if !segues.insert(t.segue_id.as_str()) {
                return Err(format!("duplicate catalog segue_id: {}", t.segue_id));
            }
        }
        Ok(())
    }
}

fn default_templates() -> Vec<TemplateSeed> {
    vec![TemplateSeed::new(
        "ExhibitTextViewController",
        "toExhibitTextViewController",
    )]
}
