//! Database module: the revision counter, the stamped entity store and the
//! actor that serializes every access to them.
//!
//! Layout:
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `revision.rs`: the global counter (`current` / `advance`)
//! - `stamped.rs`: generic per-table reads keyed by revision
//! - `patch.rs` / `patch_impl.rs`: create/patch payloads and their SQL
//! - `gateway.rs`: advance + stamped write in one transaction
//! - `sync.rs`: delta and catalog queries
//! - `bootstrap.rs`: placeholder rows and catalog templates
//! - `actor.rs`: the `DbActor` owning the pool

pub mod actor;
pub mod bootstrap;
pub mod gateway;
pub mod patch;
pub mod revision;
pub mod schema;
pub mod stamped;
pub mod sync;

mod patch_impl;

pub use patch::{
    EntityCreate, EntityPatch, EventCreate, EventPatch, ExhibitCreate, ExhibitPatch,
    ExhibitSectionCreate, ExhibitSectionPatch, InformationCreate, InformationPatch,
    MediaResourceCreate, MediaResourcePatch, PLACEHOLDER_ID, StampedWrite, ViewControllerCreate,
    ViewControllerPatch,
};
pub use schema::SQLITE_INIT;
pub use stamped::Stamped;

pub use actor::{DbActorHandle, spawn};
