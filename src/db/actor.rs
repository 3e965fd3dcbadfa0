use crate::config::TemplateSeed;
use crate::db::patch::{EntityCreate, EntityPatch};
use crate::db::schema::SQLITE_INIT;
use crate::db::{bootstrap, gateway, revision, stamped, sync};
use crate::error::MuseionError;
use museion_schema::{
    CatalogResponse, Entity, EntityKind, ImportReceipt, MutationReceipt, SyncResponse,
};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Read the revision counter without advancing it.
    CurrentRevision(RpcReplyPort<Result<i64, MuseionError>>),

    /// Create one record under a fresh revision.
    Create(EntityCreate, RpcReplyPort<Result<MutationReceipt, MuseionError>>),

    /// Patch one record by id under a fresh revision.
    Patch(EntityPatch, RpcReplyPort<Result<MutationReceipt, MuseionError>>),

    /// Write a dependency-ordered batch under one shared revision.
    Import(
        Vec<EntityCreate>,
        RpcReplyPort<Result<ImportReceipt, MuseionError>>,
    ),

    /// Everything stamped after the given client revision.
    Delta(i64, RpcReplyPort<Result<SyncResponse, MuseionError>>),

    /// View-controller templates, optionally only those stamped after a revision.
    Catalog(
        Option<i64>,
        RpcReplyPort<Result<CatalogResponse, MuseionError>>,
    ),

    /// Look up a single record by kind and id.
    Get(
        EntityKind,
        i64,
        RpcReplyPort<Result<Option<Entity>, MuseionError>>,
    ),

    /// Ensure placeholder rows and catalog templates exist.
    Seed(
        Vec<TemplateSeed>,
        RpcReplyPort<Result<Option<i64>, MuseionError>>,
    ),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn current_revision(&self) -> Result<i64, MuseionError> {
        ractor::call!(self.actor, DbActorMessage::CurrentRevision).map_err(|e| {
            MuseionError::RactorError(format!("DbActor CurrentRevision RPC failed: {e}"))
        })?
    }

    pub async fn create(&self, create: EntityCreate) -> Result<MutationReceipt, MuseionError> {
        ractor::call!(self.actor, DbActorMessage::Create, create)
            .map_err(|e| MuseionError::RactorError(format!("DbActor Create RPC failed: {e}")))?
    }

    pub async fn patch(&self, patch: EntityPatch) -> Result<MutationReceipt, MuseionError> {
        ractor::call!(self.actor, DbActorMessage::Patch, patch)
            .map_err(|e| MuseionError::RactorError(format!("DbActor Patch RPC failed: {e}")))?
    }

    /// Writes `batch` in the given order under a single revision.
    ///
    /// Callers are expected to have ordered the batch by reference dependency
    /// (see [`crate::import::ImportPlan`]).
    pub async fn import(&self, batch: Vec<EntityCreate>) -> Result<ImportReceipt, MuseionError> {
        ractor::call!(self.actor, DbActorMessage::Import, batch)
            .map_err(|e| MuseionError::RactorError(format!("DbActor Import RPC failed: {e}")))?
    }

    pub async fn delta(&self, since: i64) -> Result<SyncResponse, MuseionError> {
        ractor::call!(self.actor, DbActorMessage::Delta, since)
            .map_err(|e| MuseionError::RactorError(format!("DbActor Delta RPC failed: {e}")))?
    }

    pub async fn catalog(&self, since: Option<i64>) -> Result<CatalogResponse, MuseionError> {
        ractor::call!(self.actor, DbActorMessage::Catalog, since)
            .map_err(|e| MuseionError::RactorError(format!("DbActor Catalog RPC failed: {e}")))?
    }

    pub async fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Entity>, MuseionError> {
        ractor::call!(self.actor, DbActorMessage::Get, kind, id)
            .map_err(|e| MuseionError::RactorError(format!("DbActor Get RPC failed: {e}")))?
    }

    pub async fn seed(&self, templates: Vec<TemplateSeed>) -> Result<Option<i64>, MuseionError> {
        ractor::call!(self.actor, DbActorMessage::Seed, templates)
            .map_err(|e| MuseionError::RactorError(format!("DbActor Seed RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::CurrentRevision(reply) => {
                let res = self.current_revision(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Create(create, reply) => {
                let res = self.create(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Patch(patch, reply) => {
                let res = self.patch(&state.pool, patch).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Import(batch, reply) => {
                let res = self.import(&state.pool, batch).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Delta(since, reply) => {
                let res = sync::delta(&state.pool, since).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Catalog(since, reply) => {
                let res = sync::catalog(&state.pool, since).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Get(kind, id, reply) => {
                let res = self.get(&state.pool, kind, id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Seed(templates, reply) => {
                let res = bootstrap::seed(&state.pool, &templates).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn current_revision(&self, pool: &SqlitePool) -> Result<i64, MuseionError> {
        let mut conn = pool.acquire().await?;
        revision::current(&mut conn).await
    }

    async fn create(
        &self,
        pool: &SqlitePool,
        create: EntityCreate,
    ) -> Result<MutationReceipt, MuseionError> {
        let kind = create.kind();
        let (revision, ids) = gateway::commit_stamped(pool, std::slice::from_ref(&create)).await?;
        let id = single_id(&ids)?;
        info!(kind = %kind, id, revision, "entity created");
        Ok(MutationReceipt { kind, id, revision })
    }

    async fn patch(
        &self,
        pool: &SqlitePool,
        patch: EntityPatch,
    ) -> Result<MutationReceipt, MuseionError> {
        let kind = patch.kind();
        let (revision, ids) = gateway::commit_stamped(pool, std::slice::from_ref(&patch)).await?;
        let id = single_id(&ids)?;
        info!(kind = %kind, id, revision, "entity updated");
        Ok(MutationReceipt { kind, id, revision })
    }

    async fn import(
        &self,
        pool: &SqlitePool,
        batch: Vec<EntityCreate>,
    ) -> Result<ImportReceipt, MuseionError> {
        let (revision, ids) = gateway::commit_stamped(pool, &batch).await?;
        info!(count = ids.len(), revision, "import batch committed");
        Ok(ImportReceipt {
            revision,
            count: ids.len(),
        })
    }

    async fn get(
        &self,
        pool: &SqlitePool,
        kind: EntityKind,
        id: i64,
    ) -> Result<Option<Entity>, MuseionError> {
        let mut conn = pool.acquire().await?;
        stamped::fetch_entity(&mut conn, kind, id).await
    }
}

fn single_id(ids: &[i64]) -> Result<i64, MuseionError> {
    match ids {
        [id] => Ok(*id),
        _ => Err(MuseionError::UnexpectedError(format!(
            "expected exactly one written row, got {}",
            ids.len()
        ))),
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> DbActorHandle {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .expect("failed to spawn DbActor");

    DbActorHandle { actor }
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), MuseionError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
