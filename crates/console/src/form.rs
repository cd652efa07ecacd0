//! Student creation form: working values, per-field errors and the single
//! in-flight submission.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use campus_core::collaborators::StudentCreator;
use campus_core::error::CoreError;
use campus_core::roster::{Teacher, TeacherRoster};
use campus_core::student::{validate_draft, ErrorMap, StudentDraft};
use campus_events::{LifecycleMessages, NotificationBus};
use serde::Serialize;

const SUBMIT_LABEL: &str = "Save Student";
const SUBMITTING_LABEL: &str = "Saving...";

pub fn student_create_messages() -> LifecycleMessages {
    LifecycleMessages::new("Saving student...", "Student created", "Failed to save student")
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The collaborator accepted the student; the draft was reset.
    Created,
    /// Validation failed; nothing was sent.
    Invalid(ErrorMap),
    /// The collaborator failed; the draft is kept as entered.
    Failed(CoreError),
    /// Another submission is still in flight.
    Rejected,
}

/// Snapshot of the form for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub draft: StudentDraft,
    pub errors: ErrorMap,
    pub submitting: bool,
    pub submit_label: &'static str,
}

#[derive(Debug, Default)]
struct FormInner {
    draft: StudentDraft,
    errors: ErrorMap,
    submitting: bool,
}

#[derive(Clone)]
pub struct FormController {
    inner: Arc<Mutex<FormInner>>,
    roster: Arc<TeacherRoster>,
    creator: Arc<dyn StudentCreator>,
    bus: Arc<NotificationBus>,
}

/// Clears the submitting flag when the submission ends, including when the
/// `submit` future is dropped mid-flight.
struct SubmittingGuard<'a> {
    inner: &'a Mutex<FormInner>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .submitting = false;
    }
}

impl FormController {
    pub fn new(
        roster: TeacherRoster,
        creator: Arc<dyn StudentCreator>,
        bus: Arc<NotificationBus>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormInner::default())),
            roster: Arc::new(roster),
            creator,
            bus,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> FormView {
        let inner = self.lock();
        FormView {
            draft: inner.draft.clone(),
            errors: inner.errors.clone(),
            submitting: inner.submitting,
            submit_label: if inner.submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
        }
    }

    pub fn teachers(&self) -> &[Teacher] {
        self.roster.teachers()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    /// Edit one draft value by form path and clear that path's error.
    pub fn set_field(&self, path: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let value = value.into();
        match path {
            "role" => {
                return Err(CoreError::Validation(
                    "The role of a new student cannot be changed".to_string(),
                ))
            }
            "assignedTeacher" if !value.is_empty() && !self.roster.contains(&value) => {
                return Err(CoreError::Validation(format!("Unknown teacher '{value}'")));
            }
            _ => {}
        }

        let mut inner = self.lock();
        inner.draft.assign(path, value)?;
        inner.errors.remove(path);
        Ok(())
    }

    /// Discard every value and error.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.draft = StudentDraft::default();
        inner.errors.clear();
    }

    /// Validate the draft and, if clean, hand the student to the creator.
    pub async fn submit(&self) -> SubmitOutcome {
        let student = {
            let mut inner = self.lock();
            if inner.submitting {
                tracing::debug!("Submit ignored, another submission is in flight");
                return SubmitOutcome::Rejected;
            }
            match validate_draft(&inner.draft) {
                Ok(student) => {
                    inner.errors.clear();
                    inner.submitting = true;
                    student
                }
                Err(errors) => {
                    tracing::info!(fields = errors.len(), "Student form has validation errors");
                    inner.errors = errors.clone();
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        let _guard = SubmittingGuard { inner: &self.inner };
        let result = self
            .bus
            .track(student_create_messages(), self.creator.create(&student))
            .await;

        match result {
            Ok(()) => {
                tracing::info!(roll_number = %student.roll_number, "Student created");
                self.reset();
                SubmitOutcome::Created
            }
            Err(e) => {
                tracing::warn!(error = %e, "Student create failed");
                SubmitOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use campus_core::student::Student;
    use campus_events::NotificationKind;

    use super::*;

    struct Outcome(Result<(), CoreError>);

    #[async_trait]
    impl StudentCreator for Outcome {
        async fn create(&self, _student: &Student) -> Result<(), CoreError> {
            self.0.clone()
        }
    }

    fn controller(result: Result<(), CoreError>) -> (FormController, Arc<NotificationBus>) {
        let bus = Arc::new(NotificationBus::default());
        let form = FormController::new(
            TeacherRoster::default(),
            Arc::new(Outcome(result)),
            bus.clone(),
        );
        (form, bus)
    }

    fn fill(form: &FormController) {
        for (path, value) in [
            ("name", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("password", "secret1"),
            ("phone", "5551234"),
            ("rollNumber", "17"),
            ("className", "10"),
            ("section", "B"),
            ("guardian.name", "Anne"),
            ("guardian.phone", "5559876"),
            ("guardian.relation", "Mother"),
            ("dateOfBirth", "2010-05-01"),
            ("address", "12 St James's Square"),
            ("assignedTeacher", "t2"),
        ] {
            form.set_field(path, value).unwrap();
        }
    }

    #[test]
    fn role_is_fixed() {
        let (form, _) = controller(Ok(()));
        assert_matches!(form.set_field("role", "admin"), Err(CoreError::Validation(_)));
        assert_eq!(form.view().draft.role, "student");
    }

    #[test]
    fn teacher_must_be_on_the_roster() {
        let (form, _) = controller(Ok(()));
        assert!(form.set_field("assignedTeacher", "t9").is_err());
        form.set_field("assignedTeacher", "t1").unwrap();
        form.set_field("assignedTeacher", "").unwrap();
        assert_eq!(form.view().draft.assigned_teacher, None);
    }

    #[tokio::test]
    async fn invalid_submit_stores_errors_and_notifies_nothing() {
        let (form, bus) = controller(Ok(()));
        let mut rx = bus.subscribe();
        form.set_field("email", "bad").unwrap();

        let errors = assert_matches!(form.submit().await, SubmitOutcome::Invalid(e) => e);
        assert_eq!(errors.get("email"), Some("Invalid email format"));
        assert_eq!(form.view().errors, errors);
        assert!(rx.try_recv().is_err());

        form.set_field("email", "ada@example.com").unwrap();
        assert!(!form.view().errors.contains("email"));
    }

    #[tokio::test]
    async fn successful_submit_resets_the_draft() {
        let (form, bus) = controller(Ok(()));
        let mut rx = bus.subscribe();
        fill(&form);

        assert_matches!(form.submit().await, SubmitOutcome::Created);
        let view = form.view();
        assert_eq!(view.draft, StudentDraft::default());
        assert!(!view.submitting);
        assert_eq!(view.submit_label, "Save Student");

        assert_eq!(rx.try_recv().unwrap().kind, NotificationKind::Pending);
        let done = rx.try_recv().unwrap();
        assert_eq!(done.kind, NotificationKind::Success);
        assert_eq!(done.message, "Student created");
    }

    #[tokio::test]
    async fn failed_submit_keeps_values() {
        let (form, bus) = controller(Err(CoreError::Internal("offline".into())));
        let mut rx = bus.subscribe();
        fill(&form);
        let before = form.view().draft;

        assert_matches!(form.submit().await, SubmitOutcome::Failed(CoreError::Internal(_)));
        assert_eq!(form.view().draft, before);
        assert!(!form.is_submitting());

        let _pending = rx.try_recv().unwrap();
        let failed = rx.try_recv().unwrap();
        assert_eq!(failed.kind, NotificationKind::Failure);
        assert_eq!(failed.message, "Failed to save student");
    }
}
