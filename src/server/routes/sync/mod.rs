//! Public, read-only endpoints used by the mobile client.

pub mod extract;
pub mod handlers;

use crate::server::router::MuseionState;
use axum::{Router, routing::get};
use handlers::{catalog_handler, revision_handler, update_handler};

pub fn router() -> Router<MuseionState> {
    Router::new()
        .route("/update", get(update_handler))
        .route("/viewcontrollers", get(catalog_handler))
        .route("/revision", get(revision_handler))
}
