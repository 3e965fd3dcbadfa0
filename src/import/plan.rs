use museion_schema::ImportRecord;

use super::registry::ImportRegistry;
use crate::db::patch::EntityCreate;
use crate::error::MuseionError;

/// A validated import batch, ordered so every row comes after the rows it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    creates: Vec<EntityCreate>,
}

impl ImportPlan {
    /// Resolves every record through `registry` and stably sorts by dependency rank.
    ///
    /// The first bad record fails the whole plan; nothing is written for it.
    pub fn build(
        registry: &ImportRegistry,
        records: &[ImportRecord],
    ) -> Result<Self, MuseionError> {
        if records.is_empty() {
            return Err(MuseionError::Validation("import batch is empty".to_string()));
        }

        let mut ranked = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let kind = registry.resolve(&record.kind).ok_or_else(|| {
                MuseionError::Validation(format!(
                    "record {index}: unknown entity kind {:?}",
                    record.kind
                ))
            })?;
            let create = kind
                .build(&record.fields)
                .map_err(|msg| MuseionError::Validation(format!("record {index}: {msg}")))?;
            create.validate().map_err(|e| match e {
                MuseionError::Validation(msg) => {
                    MuseionError::Validation(format!("record {index}: {msg}"))
                }
                other => other,
            })?;
            ranked.push((kind.rank, create));
        }

        ranked.sort_by_key(|(rank, _)| *rank);
        Ok(Self {
            creates: ranked.into_iter().map(|(_, create)| create).collect(),
        })
    }

    pub fn creates(&self) -> &[EntityCreate] {
        &self.creates
    }

    pub fn into_creates(self) -> Vec<EntityCreate> {
        self.creates
    }

    pub fn len(&self) -> usize {
        self.creates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creates.is_empty()
    }
}
