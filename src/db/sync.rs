//! Sync query engine: reconstructs everything stamped after a client checkpoint.

use museion_schema::{
    CatalogResponse, Event, Exhibit, ExhibitSection, Information, MediaResource, SyncResponse,
    ViewController,
};
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::revision;
use crate::db::stamped::{fetch_all, fetch_since};
use crate::error::MuseionError;

/// Reads the counter and every synced table inside one read transaction.
///
/// Under WAL the transaction sees a single snapshot, so the returned revision
/// and the returned rows always agree: a writer that has advanced the counter
/// but not committed is invisible to both.
pub async fn delta(pool: &SqlitePool, since: i64) -> Result<SyncResponse, MuseionError> {
    let mut tx = pool.begin().await?;

    let revision = revision::current(&mut tx).await?;
    let response = if since >= revision {
        SyncResponse {
            revision,
            ..Default::default()
        }
    } else {
        SyncResponse {
            exhibits: fetch_since::<Exhibit>(&mut tx, since).await?,
            exhibit_sections: fetch_since::<ExhibitSection>(&mut tx, since).await?,
            resources: fetch_since::<MediaResource>(&mut tx, since).await?,
            events: fetch_since::<Event>(&mut tx, since).await?,
            information: fetch_since::<Information>(&mut tx, since).await?,
            revision,
        }
    };

    tx.commit().await?;

    debug!(
        since,
        revision,
        exhibits = response.exhibits.len(),
        exhibit_sections = response.exhibit_sections.len(),
        resources = response.resources.len(),
        events = response.events.len(),
        information = response.information.len(),
        "delta computed"
    );
    Ok(response)
}

/// View-controller templates; all of them, or only those stamped after `since`.
pub async fn catalog(
    pool: &SqlitePool,
    since: Option<i64>,
) -> Result<CatalogResponse, MuseionError> {
    let mut conn = pool.acquire().await?;
    let view_controllers = match since {
        Some(since) => fetch_since::<ViewController>(&mut conn, since).await?,
        None => fetch_all::<ViewController>(&mut conn).await?,
    };
    Ok(CatalogResponse { view_controllers })
}
