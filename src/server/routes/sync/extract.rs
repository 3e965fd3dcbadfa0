use crate::error::MuseionError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawRevisionQuery {
    revision: Option<String>,
}

/// The client's checkpoint from `?revision=`.
///
/// Absent means "never synced". Present values must be non-negative integers;
/// anything else is rejected here so the query engine only sees valid checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionQuery(pub Option<i64>);

impl RevisionQuery {
    pub fn or_initial(self) -> i64 {
        self.0.unwrap_or(0)
    }
}

impl<S> FromRequestParts<S> for RevisionQuery
where
    S: Send + Sync,
{
    type Rejection = MuseionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawRevisionQuery>::try_from_uri(&parts.uri)
            .map_err(|rejection| MuseionError::Validation(rejection.body_text()))?;

        let Some(raw) = raw.revision else {
            return Ok(RevisionQuery(None));
        };

        match raw.trim().parse::<i64>() {
            Ok(revision) if revision >= 0 => Ok(RevisionQuery(Some(revision))),
            _ => {
                debug!(revision = %raw, "Rejected revision query parameter");
                Err(MuseionError::Validation(
                    "Could not convert revision number to a non-negative integer".to_string(),
                ))
            }
        }
    }
}
