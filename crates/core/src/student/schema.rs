//! Student validation schema.
//!
//! Field rules are declared on [`StudentDraft`] with `validator` attributes;
//! this module runs them, flattens the nested error tree into an
//! [`ErrorMap`] keyed by form path and converts a clean draft into a typed
//! [`Student`].

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::draft::{parse_calendar_date, Role, StudentDraft};
use super::errors::ErrorMap;

/// Guardian of a validated student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guardian {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

/// A student that passed every schema rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: Role,
    pub roll_number: String,
    pub class_name: String,
    pub section: String,
    pub guardian: Guardian,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub assigned_teacher: Option<String>,
}

/// Validate a raw key/value map as submitted by the form.
///
/// Never fails fast: every invalid path is reported.
pub fn validate(input: &Map<String, Value>) -> Result<Student, ErrorMap> {
    let (draft, mut errors) = StudentDraft::from_raw(input);
    match validate_draft(&draft) {
        Ok(student) if errors.is_empty() => Ok(student),
        Ok(_) => Err(errors),
        Err(rule_errors) => {
            errors.extend(rule_errors);
            Err(errors)
        }
    }
}

/// Validate an in-memory draft.
pub fn validate_draft(draft: &StudentDraft) -> Result<Student, ErrorMap> {
    if let Err(errors) = draft.validate() {
        let mut map = ErrorMap::new();
        flatten(None, &errors, &mut map);
        return Err(map);
    }

    // Both conversions are guaranteed by the rules that just passed; the
    // fallbacks only keep this function total.
    let mut map = ErrorMap::new();
    let role = draft.role.parse::<Role>().ok();
    if role.is_none() {
        map.insert("role", "Role must be one of: admin, teacher, student");
    }
    let date_of_birth = parse_calendar_date(&draft.date_of_birth);
    if date_of_birth.is_none() {
        map.insert("dateOfBirth", "Invalid date format");
    }
    let (Some(role), Some(date_of_birth)) = (role, date_of_birth) else {
        return Err(map);
    };

    Ok(Student {
        name: draft.name.clone(),
        email: draft.email.clone(),
        password: draft.password.clone(),
        phone: draft.phone.clone(),
        role,
        roll_number: draft.roll_number.clone(),
        class_name: draft.class_name.clone(),
        section: draft.section.clone(),
        guardian: Guardian {
            name: draft.guardian.name.clone(),
            phone: draft.guardian.phone.clone(),
            relation: draft.guardian.relation.clone(),
        },
        date_of_birth,
        address: draft.address.clone(),
        assigned_teacher: draft.assigned_teacher.clone(),
    })
}

fn flatten(prefix: Option<&str>, errors: &ValidationErrors, out: &mut ErrorMap) {
    for (field, kind) in errors.errors() {
        let name = camel_case(&field.to_string());
        let path = match prefix {
            Some(p) => format!("{p}.{name}"),
            None => name,
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| first.code.to_string());
                    out.insert(path, message);
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(Some(&path), inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(Some(&format!("{path}[{index}]")), inner, out);
                }
            }
        }
    }
}

/// `date_of_birth` -> `dateOfBirth`; already camel-cased names pass through.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
