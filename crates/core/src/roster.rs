//! People offered by the console's selection controls.
//!
//! Both lists are injected at construction so the table and the form can be
//! exercised with arbitrary fixtures.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One entry of the assigned-teacher selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
}

impl Teacher {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Ordered list of teachers a student may be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherRoster(Vec<Teacher>);

impl TeacherRoster {
    /// Build a roster. Ids must be non-empty and unique.
    pub fn new(teachers: Vec<Teacher>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for teacher in &teachers {
            if teacher.id.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Teacher id must not be empty".to_string(),
                ));
            }
            if !seen.insert(teacher.id.as_str()) {
                return Err(CoreError::Conflict(format!(
                    "Duplicate teacher id '{}'",
                    teacher.id
                )));
            }
        }
        Ok(Self(teachers))
    }

    pub fn get(&self, id: &str) -> Option<&Teacher> {
        self.0.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.0
    }
}

impl Default for TeacherRoster {
    fn default() -> Self {
        Self(vec![
            Teacher::new("t1", "Mr. Smith"),
            Teacher::new("t2", "Ms. Johnson"),
            Teacher::new("t3", "Dr. Brown"),
        ])
    }
}

/// Names the reviewer assignment control offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerOptions(Vec<String>);

impl ReviewerOptions {
    pub fn new(names: Vec<String>) -> Result<Self, CoreError> {
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(CoreError::Validation(
                "Reviewer names must not be empty".to_string(),
            ));
        }
        Ok(Self(names))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl Default for ReviewerOptions {
    fn default() -> Self {
        Self(vec!["Eddie Lake".to_string(), "Jamik Tashpulatov".to_string()])
    }
}
