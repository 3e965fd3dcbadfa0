pub mod admin;
pub mod sync;
