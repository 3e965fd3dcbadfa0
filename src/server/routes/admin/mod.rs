//! Key-guarded write endpoints. Everything here goes through the mutation gateway.

pub mod handlers;
pub mod import;

use crate::server::router::MuseionState;
use axum::{
    Router,
    routing::{get, post},
};
use handlers::{create_entity, get_entity, patch_entity};
use import::import_records;

pub fn router() -> Router<MuseionState> {
    Router::new()
        .route("/admin/entities", post(create_entity).patch(patch_entity))
        .route("/admin/entities/{kind}/{id}", get(get_entity))
        .route("/admin/import", post(import_records))
}
