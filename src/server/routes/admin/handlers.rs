use crate::db::{EntityCreate, EntityPatch};
use crate::error::MuseionError;
use crate::server::router::MuseionState;
use axum::extract::rejection::JsonRejection;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use museion_schema::{Entity, EntityKind, MutationReceipt};

fn payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, MuseionError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| MuseionError::Validation(rejection.body_text()))
}

/// POST /admin/entities
///
/// Body: `{"type": "<kind>", "data": {...}}`. Responds 201 with the id and the
/// revision the new row was stamped with.
pub async fn create_entity(
    State(state): State<MuseionState>,
    body: Result<Json<EntityCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<MutationReceipt>), MuseionError> {
    let create = payload(body)?;
    create.validate()?;
    let receipt = state.db.create(create).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// PATCH /admin/entities
///
/// Body: `{"type": "<kind>", "data": {"id": 3, "patch": {...}}}`. Omitted patch
/// fields keep their value; the row is re-stamped either way.
pub async fn patch_entity(
    State(state): State<MuseionState>,
    body: Result<Json<EntityPatch>, JsonRejection>,
) -> Result<Json<MutationReceipt>, MuseionError> {
    let patch = payload(body)?;
    patch.validate()?;
    let receipt = state.db.patch(patch).await?;
    Ok(Json(receipt))
}

/// GET /admin/entities/{kind}/{id}
///
/// A missing id yields `null` rather than an error.
pub async fn get_entity(
    State(state): State<MuseionState>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<Option<Entity>>, MuseionError> {
    let kind: EntityKind = kind.parse()?;
    let entity = state.db.get(kind, id).await?;
    Ok(Json(entity))
}
