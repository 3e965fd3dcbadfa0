//! Startup seeding: the counter row, the placeholder section/resource and the
//! configured view-controller templates.

use museion_schema::{ExhibitSection, MediaResource};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::config::TemplateSeed;
use crate::db::patch::{
    EntityCreate, ExhibitSectionCreate, MediaResourceCreate, PLACEHOLDER_ID, StampedWrite,
    ViewControllerCreate,
};
use crate::db::revision;
use crate::db::stamped::exists;
use crate::error::MuseionError;

/// Inserts whatever bootstrap rows are missing.
///
/// On a fresh store (counter at 0) the rows are stamped 0 so the first real
/// mutation is revision 1. On an established store the missing rows are
/// stamped with one fresh revision so clients pick them up like any batch.
/// Returns the stamp used, or `None` when nothing was missing.
pub async fn seed(
    pool: &SqlitePool,
    templates: &[TemplateSeed],
) -> Result<Option<i64>, MuseionError> {
    let mut tx = pool.begin().await?;
    revision::ensure(&mut tx).await?;

    let missing = missing_rows(&mut tx, templates).await?;
    if missing.is_empty() {
        tx.commit().await?;
        return Ok(None);
    }

    let stamp = match revision::current(&mut tx).await? {
        0 => 0,
        _ => revision::advance(&mut tx).await?,
    };
    for create in &missing {
        create.write(&mut tx, stamp).await?;
    }
    tx.commit().await?;

    info!(
        seeded = missing.len(),
        revision = stamp,
        "Bootstrap rows seeded"
    );
    Ok(Some(stamp))
}

async fn missing_rows(
    conn: &mut SqliteConnection,
    templates: &[TemplateSeed],
) -> Result<Vec<EntityCreate>, MuseionError> {
    let mut missing = Vec::new();

    if !exists::<ExhibitSection>(conn, PLACEHOLDER_ID).await? {
        missing.push(EntityCreate::ExhibitSection(ExhibitSectionCreate {
            id: Some(PLACEHOLDER_ID),
            name: None,
        }));
    }
    if !exists::<MediaResource>(conn, PLACEHOLDER_ID).await? {
        missing.push(EntityCreate::MediaResource(MediaResourceCreate {
            id: Some(PLACEHOLDER_ID),
            url: String::new(),
        }));
    }

    for template in templates {
        let known: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM view_controllers WHERE name = ? OR segue_id = ?)",
        )
        .bind(template.name.as_str())
        .bind(template.segue_id.as_str())
        .fetch_one(&mut *conn)
        .await?;
        if !known {
            missing.push(EntityCreate::ViewController(ViewControllerCreate {
                id: None,
                name: template.name.clone(),
                segue_id: template.segue_id.clone(),
            }));
        }
    }

    Ok(missing)
}
