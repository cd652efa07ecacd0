//! Record table state: loaded records, selection, pagination and inline edits.
//!
//! [`TableStore`] is a synchronous state machine. Async commit of inline
//! edits is split into [`TableStore::begin_cell_edit`] (optimistic apply) and
//! [`TableStore::settle_cell_edit`] (confirm or revert) so the caller decides
//! how the commit future is driven.

pub mod edits;
pub mod selection;
pub mod store;

pub use edits::{CellEdit, EditOutcome};
pub use selection::{PageSelection, SelectionSet};
pub use store::{PageView, RowView, TableConfig, TableStore};
