use crate::error::MuseionError;
use crate::import::{IMPORT_REGISTRY, ImportPlan};
use crate::server::router::MuseionState;
use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::State, http::StatusCode};
use museion_schema::{ImportReceipt, ImportRecord};
use tracing::info;

/// POST /admin/import
///
/// Body: a JSON array of `{"kind": "...", "fields": [...]}` records in any
/// order. The batch is sorted by reference dependency and committed under a
/// single revision, so a syncing client sees all of it or none of it.
pub async fn import_records(
    State(state): State<MuseionState>,
    payload: Result<Json<Vec<ImportRecord>>, JsonRejection>,
) -> Result<(StatusCode, Json<ImportReceipt>), MuseionError> {
    let Json(records) = payload.map_err(|_| {
        MuseionError::Validation(
            r#"request body must be a JSON array, e.g. [{"kind":"media_resource","fields":[...]}]"#
                .to_string(),
        )
    })?;

    let plan = ImportPlan::build(&IMPORT_REGISTRY, &records)?;
    info!(records = plan.len(), "Import batch planned");

    let receipt = state.db.import(plan.into_creates()).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
