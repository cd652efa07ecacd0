use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::pagination::{PageSizeOptions, PageWindow, PaginationState, DEFAULT_PAGE_SIZE};
use crate::record::{EditableField, Record};
use crate::roster::ReviewerOptions;
use crate::types::RecordId;

use super::edits::{CellEdit, EditLedger, EditOutcome};
use super::selection::{PageSelection, SelectionSet};

/// Construction-time settings of one table mount.
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub page_size_options: PageSizeOptions,
    pub page_size: usize,
    pub reviewers: ReviewerOptions,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size_options: PageSizeOptions::default(),
            page_size: DEFAULT_PAGE_SIZE,
            reviewers: ReviewerOptions::default(),
        }
    }
}

/// One visible row with its derived display state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    #[serde(flatten)]
    pub record: Record,
    pub selected: bool,
    pub status_done: bool,
    pub reviewer_assigned: bool,
}

/// Snapshot of everything the table renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub rows: Vec<RowView>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub total_count: usize,
    pub selected_count: usize,
    pub header_selection: PageSelection,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    /// `"{n} of {total} row(s) selected."`
    pub summary: String,
    /// `"Page {p} of {t}"`
    pub page_label: String,
}

/// Owner of the loaded records, the selection set and the pagination state.
///
/// Invariants:
/// - every selected id belongs to a loaded record;
/// - the current page is within `1..=total_pages`;
/// - selection survives page changes until explicitly cleared.
#[derive(Debug)]
pub struct TableStore {
    records: Vec<Record>,
    selection: SelectionSet,
    pagination: PaginationState,
    reviewers: ReviewerOptions,
    edits: EditLedger,
    /// Selection replaced by the last "select all on page"; restored by an
    /// immediately following toggle.
    replaced_selection: Option<SelectionSet>,
}

impl TableStore {
    /// Mount a table over `records`. Ids must be unique.
    pub fn new(records: Vec<Record>, config: TableConfig) -> Result<Self, CoreError> {
        ensure_unique_ids(&records)?;
        let pagination = PaginationState::new(config.page_size_options, config.page_size)?;
        Ok(Self {
            records,
            selection: SelectionSet::default(),
            pagination,
            reviewers: config.reviewers,
            edits: EditLedger::default(),
            replaced_selection: None,
        })
    }

    // -- Records --------------------------------------------------------------

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.record(id).is_some()
    }

    /// Swap in a freshly loaded record collection. Selection is pruned to
    /// the new ids, the page is clamped, and open edits are forgotten.
    pub fn replace_records(&mut self, records: Vec<Record>) -> Result<(), CoreError> {
        ensure_unique_ids(&records)?;
        let ids: HashSet<RecordId> = records.iter().map(|r| r.id).collect();
        self.records = records;
        self.selection.retain(|id| ids.contains(&id));
        self.pagination.clamp(self.records.len());
        self.edits.reset();
        self.replaced_selection = None;
        Ok(())
    }

    // -- Pagination -----------------------------------------------------------

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn window(&self) -> PageWindow {
        self.pagination.window(self.records.len())
    }

    /// Records on the current page.
    pub fn visible(&self) -> &[Record] {
        &self.records[self.window().range()]
    }

    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.visible().iter().map(|r| r.id).collect()
    }

    pub fn go_to_page(&mut self, page: i64) -> usize {
        self.replaced_selection = None;
        self.pagination.go_to(page, self.records.len())
    }

    pub fn first_page(&mut self) -> usize {
        self.replaced_selection = None;
        self.pagination.first()
    }

    pub fn previous_page(&mut self) -> usize {
        self.replaced_selection = None;
        self.pagination.previous(self.records.len())
    }

    pub fn next_page(&mut self) -> usize {
        self.replaced_selection = None;
        self.pagination.next(self.records.len())
    }

    pub fn last_page(&mut self) -> usize {
        self.replaced_selection = None;
        self.pagination.last(self.records.len())
    }

    /// Change rows per page; always returns to page 1.
    pub fn set_page_size(&mut self, size: usize) -> Result<(), CoreError> {
        self.pagination.set_page_size(size)?;
        self.replaced_selection = None;
        Ok(())
    }

    // -- Selection ------------------------------------------------------------

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.contains(id)
    }

    /// Add `id` to the selection. Unknown ids are ignored. Returns whether
    /// the selection changed.
    pub fn select_row(&mut self, id: RecordId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let changed = self.selection.insert(id);
        if changed {
            self.replaced_selection = None;
        }
        changed
    }

    pub fn deselect_row(&mut self, id: RecordId) -> bool {
        let changed = self.selection.remove(id);
        if changed {
            self.replaced_selection = None;
        }
        changed
    }

    /// Flip the row checkbox. Unknown ids are ignored.
    pub fn toggle_row(&mut self, id: RecordId) -> bool {
        if self.selection.contains(id) {
            self.deselect_row(id)
        } else {
            self.select_row(id)
        }
    }

    /// Header checkbox state for the current page.
    pub fn visible_selection(&self) -> PageSelection {
        self.selection.page_state(&self.visible_ids())
    }

    /// "Select all on current page".
    ///
    /// When every visible row is already selected the selection is cleared,
    /// or put back to what it was before an immediately preceding select-all.
    /// Otherwise the selection becomes exactly the visible page's ids.
    pub fn select_all_visible(&mut self) -> PageSelection {
        let visible = self.visible_ids();
        if visible.is_empty() {
            return PageSelection::None;
        }

        if self.selection.page_state(&visible) == PageSelection::All {
            self.selection = self.replaced_selection.take().unwrap_or_default();
        } else {
            let previous = std::mem::replace(&mut self.selection, visible.iter().copied().collect());
            self.replaced_selection = Some(previous);
        }
        self.visible_selection()
    }

    pub fn selected_records(&self) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| self.selection.contains(r.id))
            .collect()
    }

    // -- Inline edits ---------------------------------------------------------

    /// Optimistically write `value` into a cell and open a pending edit.
    ///
    /// Returns `None` (and changes nothing) if the row is not loaded.
    pub fn begin_cell_edit(
        &mut self,
        row_id: RecordId,
        field: EditableField,
        value: impl Into<String>,
    ) -> Option<CellEdit> {
        let value = value.into();
        let record = self.records.iter_mut().find(|r| r.id == row_id)?;
        let seq = self.edits.open(row_id, field, record.cell(field), &value);
        record.set_cell(field, value.clone());
        Some(CellEdit {
            row_id,
            field,
            value,
            header: record.header.clone(),
            seq,
        })
    }

    /// Close an edit opened by [`begin_cell_edit`](Self::begin_cell_edit).
    pub fn settle_cell_edit(&mut self, edit: &CellEdit, succeeded: bool) -> EditOutcome {
        let (outcome, restore) = self.edits.settle(edit, succeeded);
        if let Some(value) = restore {
            match self.records.iter_mut().find(|r| r.id == edit.row_id) {
                Some(record) => record.set_cell(edit.field, value),
                None => return EditOutcome::Orphaned,
            }
        }
        outcome
    }

    pub fn edits_in_flight(&self) -> usize {
        self.edits.in_flight()
    }

    // -- Reviewer -------------------------------------------------------------

    pub fn reviewers(&self) -> &ReviewerOptions {
        &self.reviewers
    }

    /// Assign one of the configured reviewers to a row.
    pub fn assign_reviewer(&mut self, row_id: RecordId, name: &str) -> Result<(), CoreError> {
        if !self.reviewers.contains(name) {
            return Err(CoreError::Validation(format!(
                "Unknown reviewer '{name}'. Must be one of: {}",
                self.reviewers.names().join(", ")
            )));
        }
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == row_id)
            .ok_or(CoreError::NotFound {
                entity: "Record",
                id: row_id,
            })?;
        record.reviewer = name.to_string();
        Ok(())
    }

    // -- View -----------------------------------------------------------------

    pub fn page_view(&self) -> PageView {
        let window = self.window();
        let total = self.records.len();
        let rows = self.records[window.range()]
            .iter()
            .map(|record| RowView {
                selected: self.selection.contains(record.id),
                status_done: record.status.is_done(),
                reviewer_assigned: matches!(
                    record.reviewer_cell(),
                    crate::record::ReviewerCell::Assigned(_)
                ),
                record: record.clone(),
            })
            .collect();

        PageView {
            rows,
            page: window.effective_page,
            total_pages: window.total_pages,
            page_size: self.pagination.page_size().get(),
            page_size_options: self.pagination.options().values(),
            total_count: total,
            selected_count: self.selection.len(),
            header_selection: self.visible_selection(),
            can_go_previous: self.pagination.can_go_previous(),
            can_go_next: self.pagination.can_go_next(total),
            summary: format!("{} of {} row(s) selected.", self.selection.len(), total),
            page_label: format!("Page {} of {}", window.effective_page, window.total_pages),
        }
    }
}

fn ensure_unique_ids(records: &[Record]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(CoreError::Conflict(format!(
                "Duplicate record id {}",
                record.id
            )));
        }
    }
    Ok(())
}
