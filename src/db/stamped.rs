//! Generic read path over every revisioned table.
//!
//! A content type joins the sync protocol by implementing [`Stamped`]; the
//! delta, catalog and lookup queries are written once against the trait.

use crate::error::MuseionError;
use museion_schema::{
    Entity, EntityKind, Event, Exhibit, ExhibitSection, Information, MediaResource,
    ViewController,
};
use sqlx::SqliteConnection;
use sqlx::sqlite::SqliteRow;
use tracing::debug;

pub trait Stamped: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    const KIND: EntityKind;
    const TABLE: &'static str;
    /// Column list matching the struct's fields, used verbatim in `SELECT`.
    const COLUMNS: &'static str;

    fn into_entity(self) -> Entity;
}

impl Stamped for ExhibitSection {
    const KIND: EntityKind = EntityKind::ExhibitSection;
    const TABLE: &'static str = "exhibit_sections";
    const COLUMNS: &'static str = "id, name, revision";

    fn into_entity(self) -> Entity {
        Entity::ExhibitSection(self)
    }
}

impl Stamped for Exhibit {
    const KIND: EntityKind = EntityKind::Exhibit;
    const TABLE: &'static str = "exhibits";
    const COLUMNS: &'static str =
        "id, name, text, exhibit_section_id, view_controller_id, resource_id, revision";

    fn into_entity(self) -> Entity {
        Entity::Exhibit(self)
    }
}

impl Stamped for ViewController {
    const KIND: EntityKind = EntityKind::ViewController;
    const TABLE: &'static str = "view_controllers";
    const COLUMNS: &'static str = "id, name, segue_id, revision";

    fn into_entity(self) -> Entity {
        Entity::ViewController(self)
    }
}

impl Stamped for MediaResource {
    const KIND: EntityKind = EntityKind::MediaResource;
    const TABLE: &'static str = "media_resources";
    const COLUMNS: &'static str = "id, url, revision";

    fn into_entity(self) -> Entity {
        Entity::MediaResource(self)
    }
}

impl Stamped for Event {
    const KIND: EntityKind = EntityKind::Event;
    const TABLE: &'static str = "events";
    const COLUMNS: &'static str =
        "id, name, description, resource_id, start_time, end_time, revision";

    fn into_entity(self) -> Entity {
        Entity::Event(self)
    }
}

impl Stamped for Information {
    const KIND: EntityKind = EntityKind::Information;
    const TABLE: &'static str = "information";
    const COLUMNS: &'static str = "id, information, parking, hours, location, revision";

    fn into_entity(self) -> Entity {
        Entity::Information(self)
    }
}

/// All rows of `T` stamped strictly after `since`, ordered by id.
pub async fn fetch_since<T: Stamped>(
    conn: &mut SqliteConnection,
    since: i64,
) -> Result<Vec<T>, MuseionError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE revision > ? ORDER BY id",
        T::COLUMNS,
        T::TABLE
    );
    let rows = sqlx::query_as::<_, T>(&sql)
        .bind(since)
        .fetch_all(&mut *conn)
        .await?;
    debug!(kind = %T::KIND, since, rows = rows.len(), "stamped rows fetched");
    Ok(rows)
}

/// Every row of `T`, regardless of stamp.
pub async fn fetch_all<T: Stamped>(conn: &mut SqliteConnection) -> Result<Vec<T>, MuseionError> {
    let sql = format!("SELECT {} FROM {} ORDER BY id", T::COLUMNS, T::TABLE);
    let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&mut *conn).await?;
    Ok(rows)
}

pub async fn fetch_by_id<T: Stamped>(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<T>, MuseionError> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", T::COLUMNS, T::TABLE);
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

/// Looks up a single record of any kind. A missing id is `Ok(None)`.
pub async fn fetch_entity(
    conn: &mut SqliteConnection,
    kind: EntityKind,
    id: i64,
) -> Result<Option<Entity>, MuseionError> {
    async fn one<T: Stamped>(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> Result<Option<Entity>, MuseionError> {
        Ok(fetch_by_id::<T>(conn, id).await?.map(Stamped::into_entity))
    }

    match kind {
        EntityKind::ExhibitSection => one::<ExhibitSection>(conn, id).await,
        EntityKind::Exhibit => one::<Exhibit>(conn, id).await,
        EntityKind::ViewController => one::<ViewController>(conn, id).await,
        EntityKind::MediaResource => one::<MediaResource>(conn, id).await,
        EntityKind::Event => one::<Event>(conn, id).await,
        EntityKind::Information => one::<Information>(conn, id).await,
    }
}

/// Whether a row with `id` exists in `T`'s table.
pub async fn exists<T: Stamped>(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<bool, MuseionError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", T::TABLE);
    let found: bool = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(found)
}
