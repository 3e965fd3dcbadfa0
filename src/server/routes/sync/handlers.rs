use super::extract::RevisionQuery;
use crate::error::MuseionError;
use crate::server::router::MuseionState;
use axum::{Json, extract::State};
use museion_schema::{CatalogResponse, RevisionResponse, SyncResponse};

/// GET /update?revision=R
///
/// Everything stamped after the client's checkpoint, plus the revision the
/// client should store as its next checkpoint.
pub async fn update_handler(
    State(state): State<MuseionState>,
    revision: RevisionQuery,
) -> Result<Json<SyncResponse>, MuseionError> {
    let delta = state.db.delta(revision.or_initial()).await?;
    Ok(Json(delta))
}

/// GET /viewcontrollers[?revision=R]
pub async fn catalog_handler(
    State(state): State<MuseionState>,
    RevisionQuery(since): RevisionQuery,
) -> Result<Json<CatalogResponse>, MuseionError> {
    let catalog = state.db.catalog(since).await?;
    Ok(Json(catalog))
}

/// GET /revision
pub async fn revision_handler(
    State(state): State<MuseionState>,
) -> Result<Json<RevisionResponse>, MuseionError> {
    let revision = state.db.current_revision().await?;
    Ok(Json(RevisionResponse { revision }))
}
