mod museion;

pub use museion::{ApiErrorBody, ApiErrorObject, MuseionError};
