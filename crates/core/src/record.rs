//! Table rows and their display projections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::RecordId;

/// Reviewer value of a row nobody has been assigned to yet.
pub const UNASSIGNED_REVIEWER: &str = "Assign reviewer";

/// One row of the record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub header: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: RecordStatus,
    pub target: String,
    pub limit: String,
    pub reviewer: String,
}

impl Record {
    /// Current text of an inline-editable cell.
    pub fn cell(&self, field: EditableField) -> &str {
        match field {
            EditableField::Target => &self.target,
            EditableField::Limit => &self.limit,
        }
    }

    pub(crate) fn set_cell(&mut self, field: EditableField, value: String) {
        match field {
            EditableField::Target => self.target = value,
            EditableField::Limit => self.limit = value,
        }
    }

    /// How the reviewer column renders for this row.
    pub fn reviewer_cell(&self) -> ReviewerCell<'_> {
        if self.reviewer == UNASSIGNED_REVIEWER {
            ReviewerCell::Unassigned
        } else {
            ReviewerCell::Assigned(&self.reviewer)
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Workflow status of a row. Unknown strings from the record source are kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    Done,
    InProcess,
    NotStarted,
    Other(String),
}

impl RecordStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Done => "Done",
            Self::InProcess => "In Process",
            Self::NotStarted => "Not Started",
            Self::Other(s) => s,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Glyph shown in the status badge.
    pub fn glyph(&self) -> char {
        if self.is_done() {
            '✓'
        } else {
            '↻'
        }
    }
}

impl From<String> for RecordStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Done" => Self::Done,
            "In Process" => Self::InProcess,
            "Not Started" => Self::NotStarted,
            _ => Self::Other(s),
        }
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// Columns that accept inline edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditableField {
    Target,
    Limit,
}

impl EditableField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Limit => "limit",
        }
    }
}

impl FromStr for EditableField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "target" => Ok(Self::Target),
            "limit" => Ok(Self::Limit),
            _ => Err(CoreError::Validation(format!(
                "Invalid editable field '{s}'. Must be one of: target, limit"
            ))),
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reviewer column projection: plain text once assigned, an assignment
/// control otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerCell<'a> {
    Assigned(&'a str),
    Unassigned,
}
