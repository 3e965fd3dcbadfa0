pub mod entity;
pub mod sync;

pub use entity::{
    Entity, EntityKind, Event, Exhibit, ExhibitSection, Information, MediaResource,
    UnknownEntityKind, ViewController,
};
pub use sync::{
    CatalogResponse, ImportReceipt, ImportRecord, MutationReceipt, RevisionResponse, SyncResponse,
};
