//! The backend side of a form submission: one operation per mode, plus the
//! sign-up existence check. Runs on a spawned task; the form state itself
//! (validation, the submitting guard) stays with the app.

use chrono::Utc;
use serde_json::json;
use thiserror::Error;

use crate::backend::{AuthError, Backend, Document, StoreError};
use crate::model::USERS_COLLECTION;
use crate::state::AuthMode;

/// Everything a submission needs, detached from the live form so the task
/// owns its inputs.
#[derive(Debug, Clone)]
pub struct SubmitJob {
    pub mode: AuthMode,
    pub email: String,
    pub pseudo: String,
    pub password: String,
    pub generation: u64,
}

/// Displays as the exact text shown to the user.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("User already exists!")]
    ProfileExists,
    #[error("Error: {0}")]
    Backend(String),
}

impl From<AuthError> for SubmitError {
    fn from(e: AuthError) -> Self {
        SubmitError::Backend(e.to_string())
    }
}

impl From<StoreError> for SubmitError {
    fn from(e: StoreError) -> Self {
        SubmitError::Backend(e.to_string())
    }
}

/// Dispatches exactly one backend operation for the job's mode (plus the
/// read-check and document write for sign-up). Returns the success
/// notification text.
pub async fn run_submit(backend: &Backend, job: &SubmitJob) -> Result<&'static str, SubmitError> {
    match job.mode {
        AuthMode::ResetPassword => {
            backend.auth.send_password_reset(&job.email).await?;
            Ok("Password reset email sent!")
        }
        AuthMode::SignIn => {
            backend.auth.sign_in(&job.email, &job.password).await?;
            Ok("Signed in successfully!")
        }
        AuthMode::SignUp => {
            let identity = backend.auth.sign_up(&job.email, &job.password).await?;
            let existing = backend
                .docs
                .get_document(USERS_COLLECTION, &identity.uid)
                .await?;
            if existing.is_some() {
                // The credential was already created and cannot be deleted
                // through this interface. Don't leave it signed in on an
                // account whose profile belongs to someone else.
                tracing::warn!(
                    uid = %identity.uid,
                    "profile document already exists; signing orphaned credential out"
                );
                if let Err(e) = backend.auth.sign_out().await {
                    tracing::warn!(error = %e, "sign-out of orphaned credential failed");
                }
                return Err(SubmitError::ProfileExists);
            }
            backend
                .docs
                .set_document(
                    USERS_COLLECTION,
                    &identity.uid,
                    new_profile_fields(&job.pseudo, &job.email),
                )
                .await?;
            Ok("Account created successfully!")
        }
    }
}

fn new_profile_fields(pseudo: &str, email: &str) -> Document {
    let mut fields = Document::new();
    fields.insert("pseudo".to_string(), json!(pseudo));
    fields.insert("email".to_string(), json!(email));
    fields.insert("createdAt".to_string(), json!(Utc::now()));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::backend::recording::{Call, RecordingBackend};
    use std::sync::Arc;

    fn recorded(memory: MemoryBackend) -> (Backend, Arc<RecordingBackend>) {
        RecordingBackend::wrap(Backend::from_single(Arc::new(memory)))
    }

    fn sign_up_job() -> SubmitJob {
        SubmitJob {
            mode: AuthMode::SignUp,
            email: "a@x.com".to_string(),
            pseudo: "Al".to_string(),
            password: "abcd".to_string(),
            generation: 0,
        }
    }

    #[tokio::test]
    async fn sign_up_creates_credential_then_profile_document() {
        let (backend, recorder) = recorded(MemoryBackend::new().with_next_uid("u1"));

        let message = run_submit(&backend, &sign_up_job()).await.unwrap();
        assert_eq!(message, "Account created successfully!");

        let calls = recorder.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::SignUp { email: "a@x.com".to_string() });
        assert_eq!(
            calls[1],
            Call::GetDocument {
                collection: "users".to_string(),
                key: "u1".to_string(),
            }
        );
        match &calls[2] {
            Call::SetDocument { collection, key, fields } => {
                assert_eq!(collection, "users");
                assert_eq!(key, "u1");
                assert_eq!(fields["pseudo"], "Al");
                assert_eq!(fields["email"], "a@x.com");
                assert!(fields.contains_key("createdAt"));
            }
            other => panic!("expected SetDocument, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sign_up_conflict_leaves_existing_profile_untouched() {
        let existing = serde_json::json!({ "pseudo": "Old", "email": "old@x.com" })
            .as_object()
            .cloned()
            .unwrap();
        let (backend, recorder) = recorded(
            MemoryBackend::new()
                .with_next_uid("u1")
                .with_document("users", "u1", existing.clone()),
        );

        let err = run_submit(&backend, &sign_up_job()).await.unwrap_err();
        assert_eq!(err.to_string(), "User already exists!");

        let calls = recorder.calls();
        assert!(matches!(calls[0], Call::SignUp { .. }));
        assert!(matches!(calls[1], Call::GetDocument { .. }));
        // Orphaned credential is signed out, nothing is written.
        assert_eq!(calls[2], Call::SignOut);
        assert_eq!(calls.len(), 3);
        assert!(backend.auth.current_identity().is_none());

        let stored = backend.docs.get_document("users", "u1").await.unwrap();
        assert_eq!(stored.unwrap(), existing);
    }

    #[tokio::test]
    async fn reset_password_sends_exactly_one_request() {
        let (backend, recorder) =
            recorded(MemoryBackend::new().with_account("b@y.com", "abcd", "u2"));

        let job = SubmitJob {
            mode: AuthMode::ResetPassword,
            email: "b@y.com".to_string(),
            pseudo: String::new(),
            password: String::new(),
            generation: 0,
        };
        let message = run_submit(&backend, &job).await.unwrap();
        assert_eq!(message, "Password reset email sent!");
        assert_eq!(
            recorder.calls(),
            vec![Call::SendPasswordReset { email: "b@y.com".to_string() }]
        );
    }

    #[tokio::test]
    async fn sign_in_success_and_failure() {
        let (backend, _) = recorded(MemoryBackend::new().with_account("a@x.com", "abcd", "u1"));

        let mut job = SubmitJob {
            mode: AuthMode::SignIn,
            email: "a@x.com".to_string(),
            pseudo: String::new(),
            password: "abcd".to_string(),
            generation: 0,
        };
        assert_eq!(
            run_submit(&backend, &job).await.unwrap(),
            "Signed in successfully!"
        );

        job.password = "wrong".to_string();
        let err = run_submit(&backend, &job).await.unwrap_err();
        assert_eq!(err.to_string(), "Error: invalid credentials");
    }
}
