pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod server;

pub use error::MuseionError;
pub use museion_schema as schema;
