//! Working values of the student creation form.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::error::CoreError;

use super::errors::ErrorMap;

/// Every path the form binds an input to, in display order.
pub const FIELD_PATHS: &[&str] = &[
    "name",
    "email",
    "password",
    "phone",
    "rollNumber",
    "className",
    "section",
    "guardian.name",
    "guardian.phone",
    "guardian.relation",
    "dateOfBirth",
    "address",
    "assignedTeacher",
    "role",
];

/// Account role of a person in the school product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: admin, teacher, student"
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// Guardian sub-form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GuardianDraft {
    #[validate(length(min = 1, message = "Guardian name is required"))]
    pub name: String,
    #[validate(length(min = 5, message = "Guardian phone is too short"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Relation is required"))]
    pub relation: String,
}

/// Unvalidated student form values. Every text input is kept as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentDraft {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        email(message = "Invalid email format"),
        custom(function = "check_email_domain")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = "check_phone"))]
    pub phone: String,
    #[validate(custom(function = "check_role"))]
    pub role: String,
    #[validate(length(min = 1, message = "Roll number is required"))]
    pub roll_number: String,
    #[validate(length(min = 1, message = "Class name is required"))]
    pub class_name: String,
    #[validate(length(min = 1, message = "Section is required"))]
    pub section: String,
    #[validate(nested)]
    pub guardian: GuardianDraft,
    #[validate(custom(function = "check_date_of_birth"))]
    pub date_of_birth: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub assigned_teacher: Option<String>,
}

impl Default for StudentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            phone: String::new(),
            role: Role::Student.as_str().to_string(),
            roll_number: String::new(),
            class_name: String::new(),
            section: String::new(),
            guardian: GuardianDraft::default(),
            date_of_birth: String::new(),
            address: String::new(),
            assigned_teacher: None,
        }
    }
}

impl StudentDraft {
    /// Read a draft out of a raw key/value map.
    ///
    /// Missing keys keep their default. Present values that are not strings
    /// are reported in the returned map instead of aborting, so the caller
    /// can merge them with the schema errors.
    pub fn from_raw(input: &Map<String, Value>) -> (Self, ErrorMap) {
        let mut draft = Self::default();
        let mut errors = ErrorMap::new();

        for path in FIELD_PATHS.iter().filter(|p| !p.starts_with("guardian.")) {
            if let Some(text) = take_text(input.get(*path), path, &mut errors) {
                // FIELD_PATHS entries are always accepted by `assign`.
                let _ = draft.assign(path, text);
            }
        }

        match input.get("guardian") {
            None | Some(Value::Null) => {}
            Some(Value::Object(guardian)) => {
                for key in ["name", "phone", "relation"] {
                    let path = format!("guardian.{key}");
                    if let Some(text) = take_text(guardian.get(key), &path, &mut errors) {
                        let _ = draft.assign(&path, text);
                    }
                }
            }
            Some(_) => errors.insert("guardian", "Expected an object"),
        }

        (draft, errors)
    }

    /// Current value bound to `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        let value = match path {
            "name" => &self.name,
            "email" => &self.email,
            "password" => &self.password,
            "phone" => &self.phone,
            "role" => &self.role,
            "rollNumber" => &self.roll_number,
            "className" => &self.class_name,
            "section" => &self.section,
            "guardian.name" => &self.guardian.name,
            "guardian.phone" => &self.guardian.phone,
            "guardian.relation" => &self.guardian.relation,
            "dateOfBirth" => &self.date_of_birth,
            "address" => &self.address,
            "assignedTeacher" => return self.assigned_teacher.as_deref(),
            _ => return None,
        };
        Some(value)
    }

    /// Overwrite the value bound to `path`. An empty `assignedTeacher` clears
    /// the selection.
    pub fn assign(&mut self, path: &str, value: String) -> Result<(), CoreError> {
        let slot = match path {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "password" => &mut self.password,
            "phone" => &mut self.phone,
            "role" => &mut self.role,
            "rollNumber" => &mut self.roll_number,
            "className" => &mut self.class_name,
            "section" => &mut self.section,
            "guardian.name" => &mut self.guardian.name,
            "guardian.phone" => &mut self.guardian.phone,
            "guardian.relation" => &mut self.guardian.relation,
            "dateOfBirth" => &mut self.date_of_birth,
            "address" => &mut self.address,
            "assignedTeacher" => {
                self.assigned_teacher = Some(value).filter(|v| !v.is_empty());
                return Ok(());
            }
            _ => {
                return Err(CoreError::Validation(format!(
                    "Unknown form field '{path}'"
                )))
            }
        };
        *slot = value;
        Ok(())
    }
}

fn take_text(value: Option<&Value>, path: &str, errors: &mut ErrorMap) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.insert(path, "Expected text");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Custom rules
// ---------------------------------------------------------------------------

const PHONE_MIN: usize = 5;
const PHONE_MAX: usize = 20;

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn check_phone(phone: &str) -> Result<(), ValidationError> {
    let len = phone.chars().count();
    if len < PHONE_MIN {
        Err(rule_error("length", "Phone number is too short"))
    } else if len > PHONE_MAX {
        Err(rule_error("length", "Phone number is too long"))
    } else {
        Ok(())
    }
}

/// The address domain must be dotted and end in an alphabetic TLD of at
/// least two letters.
fn check_email_domain(email: &str) -> Result<(), ValidationError> {
    let dotted = email
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(host, tld)| {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        });
    if dotted {
        Ok(())
    } else {
        Err(rule_error("email", "Invalid email format"))
    }
}

fn check_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>()
        .map(|_| ())
        .map_err(|_| rule_error("role", "Role must be one of: admin, teacher, student"))
}

fn check_date_of_birth(value: &str) -> Result<(), ValidationError> {
    parse_calendar_date(value)
        .map(|_| ())
        .ok_or_else(|| rule_error("date", "Invalid date format"))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (keeping its date).
pub(crate) fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
