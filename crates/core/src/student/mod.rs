//! Student creation: draft values, the validation schema and its result types.
//!
//! The schema is a pure function from raw form input to either a typed
//! [`Student`] or an [`ErrorMap`] that lists every invalid field at once.

pub mod draft;
pub mod errors;
pub mod schema;

pub use draft::{GuardianDraft, Role, StudentDraft, FIELD_PATHS};
pub use errors::ErrorMap;
pub use schema::{validate, validate_draft, Guardian, Student};
