//! EntityCreate / EntityPatch -> StampedWrite implementation.
//!
//! This sits in the `db` module because it contains SQL/table knowledge.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use museion_schema::EntityKind;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::db::patch::{EntityCreate, EntityPatch, StampedWrite};
use crate::error::MuseionError;

#[async_trait]
impl StampedWrite for EntityCreate {
    fn kind(&self) -> EntityKind {
        EntityCreate::kind(self)
    }

    async fn write(&self, conn: &mut SqliteConnection, revision: i64) -> Result<i64, MuseionError> {
        let id: i64 = match self {
            EntityCreate::ExhibitSection(c) => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO exhibit_sections (id, name, revision)
                    VALUES (?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(c.id)
                .bind(c.name.as_deref())
                .bind(revision)
                .fetch_one(&mut *conn)
                .await?
            }

            EntityCreate::Exhibit(c) => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO exhibits (
                        id, name, text, exhibit_section_id, view_controller_id, resource_id,
                        revision
                    )
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(c.id)
                .bind(c.name.as_str())
                .bind(c.text.as_str())
                .bind(c.exhibit_section_id)
                .bind(c.view_controller_id)
                .bind(c.resource_id)
                .bind(revision)
                .fetch_one(&mut *conn)
                .await?
            }

            EntityCreate::ViewController(c) => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO view_controllers (id, name, segue_id, revision)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(c.id)
                .bind(c.name.as_str())
                .bind(c.segue_id.as_str())
                .bind(revision)
                .fetch_one(&mut *conn)
                .await?
            }

            EntityCreate::MediaResource(c) => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO media_resources (id, url, revision)
                    VALUES (?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(c.id)
                .bind(c.url.as_str())
                .bind(revision)
                .fetch_one(&mut *conn)
                .await?
            }

            EntityCreate::Event(c) => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO events (
                        id, name, description, resource_id, start_time, end_time, revision
                    )
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(c.id)
                .bind(c.name.as_str())
                .bind(c.description.as_str())
                .bind(c.resource_id)
                .bind(c.start_time)
                .bind(c.end_time)
                .bind(revision)
                .fetch_one(&mut *conn)
                .await?
            }

            EntityCreate::Information(c) => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO information (id, information, parking, hours, location, revision)
                    VALUES (?, ?, ?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(c.id)
                .bind(c.information.as_str())
                .bind(c.parking.as_str())
                .bind(c.hours.as_str())
                .bind(c.location.as_str())
                .bind(revision)
                .fetch_one(&mut *conn)
                .await?
            }
        };

        debug!(
            kind = %self.kind(),
            id,
            revision,
            explicit_id = self.explicit_id().is_some(),
            "db insert staged"
        );
        Ok(id)
    }
}

impl EntityCreate {
    fn explicit_id(&self) -> Option<i64> {
        match self {
            EntityCreate::ExhibitSection(c) => c.id,
            EntityCreate::Exhibit(c) => c.id,
            EntityCreate::ViewController(c) => c.id,
            EntityCreate::MediaResource(c) => c.id,
            EntityCreate::Event(c) => c.id,
            EntityCreate::Information(c) => c.id,
        }
    }
}

#[async_trait]
impl StampedWrite for EntityPatch {
    fn kind(&self) -> EntityKind {
        EntityPatch::kind(self)
    }

    async fn write(&self, conn: &mut SqliteConnection, revision: i64) -> Result<i64, MuseionError> {
        let id = self.id();
        let affected = match self {
            EntityPatch::ExhibitSection { patch, .. } => {
                sqlx::query(
                    r#"
                    UPDATE exhibit_sections
                    SET
                        name = COALESCE(?, name),
                        revision = ?
                    WHERE id = ?
                    "#,
                )
                .bind(patch.name.as_deref())
                .bind(revision)
                .bind(id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
            }

            EntityPatch::Exhibit { patch, .. } => {
                sqlx::query(
                    r#"
                    UPDATE exhibits
                    SET
                        name = COALESCE(?, name),
                        text = COALESCE(?, text),
                        exhibit_section_id = COALESCE(?, exhibit_section_id),
                        view_controller_id = COALESCE(?, view_controller_id),
                        resource_id = COALESCE(?, resource_id),
                        revision = ?
                    WHERE id = ?
                    "#,
                )
                .bind(patch.name.as_deref())
                .bind(patch.text.as_deref())
                .bind(patch.exhibit_section_id)
                .bind(patch.view_controller_id)
                .bind(patch.resource_id)
                .bind(revision)
                .bind(id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
            }

            EntityPatch::ViewController { patch, .. } => {
                sqlx::query(
                    r#"
                    UPDATE view_controllers
                    SET
                        name = COALESCE(?, name),
                        segue_id = COALESCE(?, segue_id),
                        revision = ?
                    WHERE id = ?
                    "#,
                )
                .bind(patch.name.as_deref())
                .bind(patch.segue_id.as_deref())
                .bind(revision)
                .bind(id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
            }

            EntityPatch::MediaResource { patch, .. } => {
                sqlx::query(
                    r#"
                    UPDATE media_resources
                    SET
                        url = COALESCE(?, url),
                        revision = ?
                    WHERE id = ?
                    "#,
                )
                .bind(patch.url.as_deref())
                .bind(revision)
                .bind(id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
            }

            EntityPatch::Event { patch, .. } => {
                // Either bound may be patched alone, so the window is checked on the merged row.
                let window: Option<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
                    r#"
                    UPDATE events
                    SET
                        name = COALESCE(?, name),
                        description = COALESCE(?, description),
                        resource_id = COALESCE(?, resource_id),
                        start_time = COALESCE(?, start_time),
                        end_time = COALESCE(?, end_time),
                        revision = ?
                    WHERE id = ?
                    RETURNING start_time, end_time
                    "#,
                )
                .bind(patch.name.as_deref())
                .bind(patch.description.as_deref())
                .bind(patch.resource_id)
                .bind(patch.start_time)
                .bind(patch.end_time)
                .bind(revision)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

                match window {
                    Some((start, end)) if end < start => {
                        return Err(MuseionError::Validation(format!(
                            "event {id} would end ({end}) before it starts ({start})"
                        )));
                    }
                    Some(_) => 1,
                    None => 0,
                }
            }

            EntityPatch::Information { patch, .. } => {
                sqlx::query(
                    r#"
                    UPDATE information
                    SET
                        information = COALESCE(?, information),
                        parking = COALESCE(?, parking),
                        hours = COALESCE(?, hours),
                        location = COALESCE(?, location),
                        revision = ?
                    WHERE id = ?
                    "#,
                )
                .bind(patch.information.as_deref())
                .bind(patch.parking.as_deref())
                .bind(patch.hours.as_deref())
                .bind(patch.location.as_deref())
                .bind(revision)
                .bind(id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
            }
        };

        debug!(
            kind = %self.kind(),
            id,
            affected,
            revision,
            "db patch staged"
        );

        if affected == 0 {
            return Err(MuseionError::NotFound {
                kind: self.kind(),
                id,
            });
        }

        Ok(id)
    }
}
