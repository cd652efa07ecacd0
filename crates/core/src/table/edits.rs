//! Optimistic inline-edit bookkeeping.
//!
//! Every dispatched edit gets a sequence number. Per cell the ledger keeps
//! the last confirmed value and the edits still in flight. A failed edit
//! only changes what the cell shows if it was the newest live edit of that
//! cell; the cell then falls back to the newest remaining in-flight value or,
//! failing that, the confirmed one.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::EditableField;
use crate::types::RecordId;

/// One inline edit handed to the commit collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellEdit {
    pub row_id: RecordId,
    pub field: EditableField,
    pub value: String,
    /// Header of the edited row, used in lifecycle messages.
    pub header: String,
    /// Submission order across the whole table.
    pub seq: u64,
}

/// What settling an edit did to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EditOutcome {
    /// The commit succeeded; the value is now the confirmed one.
    Confirmed,
    /// The commit failed and the cell now shows `restored`.
    Reverted { restored: String },
    /// The commit failed but a newer edit of the same cell is on screen.
    Superseded,
    /// The row or its ledger disappeared (records were reloaded).
    Orphaned,
}

#[derive(Debug)]
struct CellLedger {
    confirmed: String,
    confirmed_seq: u64,
    in_flight: Vec<(u64, String)>,
}

#[derive(Debug, Default)]
pub(crate) struct EditLedger {
    next_seq: u64,
    cells: HashMap<(RecordId, EditableField), CellLedger>,
}

impl EditLedger {
    /// Register an edit of a cell currently showing `current`. Returns its
    /// sequence number.
    pub(crate) fn open(
        &mut self,
        row_id: RecordId,
        field: EditableField,
        current: &str,
        value: &str,
    ) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let cell = self
            .cells
            .entry((row_id, field))
            .or_insert_with(|| CellLedger {
                confirmed: current.to_string(),
                confirmed_seq: 0,
                in_flight: Vec::new(),
            });
        cell.in_flight.push((seq, value.to_string()));
        seq
    }

    /// Close `edit`. Returns the value the cell must show afterwards, if it
    /// changes, together with the outcome.
    pub(crate) fn settle(&mut self, edit: &CellEdit, succeeded: bool) -> (EditOutcome, Option<String>) {
        let key = (edit.row_id, edit.field);
        let Some(cell) = self.cells.get_mut(&key) else {
            return (EditOutcome::Orphaned, None);
        };
        let Some(pos) = cell.in_flight.iter().position(|(seq, _)| *seq == edit.seq) else {
            return (EditOutcome::Orphaned, None);
        };

        let was_newest = pos + 1 == cell.in_flight.len() && edit.seq > cell.confirmed_seq;
        let (seq, value) = cell.in_flight.remove(pos);

        let result = if succeeded {
            if seq > cell.confirmed_seq {
                cell.confirmed = value;
                cell.confirmed_seq = seq;
            }
            (EditOutcome::Confirmed, None)
        } else if was_newest {
            let restored = match cell.in_flight.last() {
                Some((live_seq, live)) if *live_seq > cell.confirmed_seq => live.clone(),
                _ => cell.confirmed.clone(),
            };
            (
                EditOutcome::Reverted {
                    restored: restored.clone(),
                },
                Some(restored),
            )
        } else {
            (EditOutcome::Superseded, None)
        };

        if cell.in_flight.is_empty() {
            self.cells.remove(&key);
        }
        result
    }

    /// Forget every open cell; later settles report [`EditOutcome::Orphaned`].
    pub(crate) fn reset(&mut self) {
        self.cells.clear();
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.cells.values().map(|c| c.in_flight.len()).sum()
    }
}
