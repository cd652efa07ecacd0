//! Campus console domain core.
//!
//! Pure state and validation logic shared by the console and its tests.
//! Nothing in this crate performs I/O; async collaborators are described as
//! traits in [`collaborators`] and implemented by the embedding application.

pub mod collaborators;
pub mod error;
pub mod pagination;
pub mod record;
pub mod roster;
pub mod student;
pub mod table;
pub mod types;
