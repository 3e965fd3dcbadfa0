//! Mutation gateway: the only write path for revisioned rows.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::db::patch::StampedWrite;
use crate::db::revision;
use crate::error::MuseionError;

/// Reserves one revision and writes every item stamped with it, atomically.
///
/// Items are written in slice order, so callers put referenced rows first.
/// On any failure the transaction is rolled back, taking the counter advance
/// with it together with the rows already staged.
pub async fn commit_stamped<W>(
    pool: &SqlitePool,
    writes: &[W],
) -> Result<(i64, Vec<i64>), MuseionError>
where
    W: StampedWrite + Sync,
{
    if writes.is_empty() {
        return Err(MuseionError::Validation(
            "a stamped batch needs at least one record".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    let revision = revision::advance(&mut tx).await?;

    let mut ids = Vec::with_capacity(writes.len());
    for (index, w) in writes.iter().enumerate() {
        match w.write(&mut tx, revision).await {
            Ok(id) => ids.push(id),
            Err(e) => {
                warn!(
                    kind = %w.kind(),
                    index,
                    revision,
                    error = %e,
                    "stamped write rejected; rolling back"
                );
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(
                        error = %rollback_err,
                        "explicit rollback failed; dropped transaction will roll back"
                    );
                }
                return Err(e);
            }
        }
    }

    tx.commit().await?;
    debug!(revision, rows = ids.len(), "stamped batch committed");
    Ok((revision, ids))
}
