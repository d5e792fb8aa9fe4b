// client/src/app.rs

use std::path::PathBuf;

use crossterm::event::Event as CEvent;
use tokio::sync::mpsc;

use crate::backend::{AuthError, Backend, Identity, StoreError};
use crate::config::Config;
use crate::model::UserProfile;
use crate::services::auth::{run_submit, SubmitError, SubmitJob};
use crate::services::profile::{fetch_profile, read_avatar_file, upload_photo, UploadError};
use crate::services::validation;
use crate::state::{
    AppMode, AuthMode, FormState, NotificationKind, NotificationState, ProfileState, UiState,
};

/// Tick interval of the event loop, in milliseconds.
pub const TICK_MS: u64 = 50;

/// Completion of an async backend operation, delivered back into the
/// single-threaded event loop. Spawned tasks never touch app state.
pub enum BackendEvent {
    SubmitFinished {
        generation: u64,
        result: Result<&'static str, SubmitError>,
    },
    IdentityChanged(Option<Identity>),
    ProfileFetched {
        generation: u64,
        result: Result<Option<UserProfile>, StoreError>,
    },
    PhotoUploaded {
        generation: u64,
        result: Result<String, UploadError>,
    },
    SignOutFinished(Result<(), AuthError>),
}

/// Application events.
pub enum AppEvent {
    Terminal(CEvent),
    Backend(BackendEvent),
    Tick,
}

pub struct App {
    pub config: Config,
    pub ui: UiState,
    pub form: FormState,
    pub profile: ProfileState,
    pub notifications: NotificationState,
    pub backend: Backend,
    pub identity: Option<Identity>,
    events: mpsc::UnboundedSender<AppEvent>,
    /// Bumped whenever a form instance opens or closes, so completions for
    /// dead instances can be told apart.
    form_generation: u64,
}

impl App {
    pub fn new(config: Config, backend: Backend, events: mpsc::UnboundedSender<AppEvent>) -> App {
        let identity = backend.auth.current_identity();
        App {
            config,
            ui: UiState::default(),
            form: FormState::new(AuthMode::SignIn, 0),
            profile: ProfileState::default(),
            notifications: NotificationState::default(),
            backend,
            identity,
            events,
            form_generation: 0,
        }
    }

    /// Kicks off the initial profile fetch when an identity is already
    /// present at startup.
    pub fn bootstrap(&mut self) {
        if let Some(identity) = self.identity.clone() {
            self.start_profile_fetch(identity.uid);
        }
    }

    pub fn logged_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn notify_success(&mut self, message: impl Into<String>) {
        let close = self.ui.tick_count + self.config.notification_timeout_ms / TICK_MS;
        self.notifications
            .set(NotificationKind::Success, message, Some(close));
    }

    pub fn notify_failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "surfacing failure");
        let close = self.ui.tick_count + self.config.notification_timeout_ms / TICK_MS;
        self.notifications
            .set(NotificationKind::Failure, message, Some(close));
    }

    pub fn on_tick(&mut self) {
        self.ui.tick();
        if self.notifications.should_close(self.ui.tick_count) {
            self.notifications.clear();
        }
    }

    // --- Auth form ---

    pub fn open_form(&mut self, mode: AuthMode) {
        self.form_generation += 1;
        self.form = FormState::new(mode, self.form_generation);
        self.ui.set_mode(AppMode::AuthForm);
    }

    pub fn close_form(&mut self) {
        self.form_generation += 1;
        self.ui.set_mode(AppMode::Home);
        self.ui.menu_state.select(Some(0));
    }

    /// One submission per explicit user action. A no-op while a prior
    /// submission for this form instance is still in flight, and when
    /// validation fails (in which case no backend call is made).
    pub fn submit_form(&mut self) {
        if self.form.submitting {
            return;
        }
        let errors = validation::validate(&self.form, self.form.mode);
        if !errors.is_empty() {
            self.form.errors = errors;
            return;
        }
        self.form.errors.clear();
        self.form.submitting = true;

        let job = SubmitJob {
            mode: self.form.mode,
            email: self.form.email.clone(),
            pseudo: self.form.pseudo.clone(),
            password: self.form.password.clone(),
            generation: self.form.generation,
        };
        tracing::info!(mode = ?job.mode, "submitting auth form");
        let backend = self.backend.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = run_submit(&backend, &job).await;
            let _ = events.send(AppEvent::Backend(BackendEvent::SubmitFinished {
                generation: job.generation,
                result,
            }));
        });
    }

    // --- Profile ---

    fn start_profile_fetch(&mut self, uid: String) {
        self.profile.generation += 1;
        self.profile.loading = true;
        self.profile.profile = None;
        let generation = self.profile.generation;
        let backend = self.backend.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = fetch_profile(&backend, &uid).await;
            let _ = events.send(AppEvent::Backend(BackendEvent::ProfileFetched {
                generation,
                result,
            }));
        });
    }

    /// Uploads the file at `path` as the avatar. A no-op while a prior
    /// upload is still in flight or when nobody is signed in.
    pub fn start_photo_upload(&mut self, path: PathBuf) {
        if self.profile.uploading {
            return;
        }
        let Some(identity) = self.identity.clone() else {
            return;
        };
        self.profile.uploading = true;
        let generation = self.profile.generation;
        let backend = self.backend.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = match read_avatar_file(&path).await {
                Ok(bytes) => upload_photo(&backend, &identity.uid, bytes).await,
                Err(e) => Err(e),
            };
            let _ = events.send(AppEvent::Backend(BackendEvent::PhotoUploaded {
                generation,
                result,
            }));
        });
    }

    pub fn sign_out(&mut self) {
        let backend = self.backend.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = backend.auth.sign_out().await;
            let _ = events.send(AppEvent::Backend(BackendEvent::SignOutFinished(result)));
        });
    }

    // --- Backend completions ---

    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::SubmitFinished { generation, result } => {
                // The form may have been closed (or reopened) while the
                // submission was in flight; late results must not touch it.
                if generation != self.form.generation || self.ui.mode != AppMode::AuthForm {
                    tracing::debug!("dropping submission result for a closed form");
                    return;
                }
                self.form.submitting = false;
                match result {
                    Ok(message) => {
                        self.notify_success(message);
                        self.close_form();
                    }
                    Err(e) => self.notify_failure(e.to_string()),
                }
            }
            BackendEvent::IdentityChanged(identity) => {
                self.identity = identity.clone();
                match identity {
                    Some(identity) => {
                        tracing::info!(uid = %identity.uid, "signed in");
                        self.start_profile_fetch(identity.uid);
                    }
                    None => {
                        tracing::info!("signed out");
                        self.profile.generation += 1;
                        self.profile.clear();
                        if self.ui.mode == AppMode::Profile {
                            self.ui.set_mode(AppMode::Home);
                        }
                        self.ui.menu_state.select(Some(0));
                    }
                }
            }
            BackendEvent::ProfileFetched { generation, result } => {
                if generation != self.profile.generation {
                    tracing::debug!("dropping profile fetch for a stale identity");
                    return;
                }
                self.profile.loading = false;
                match result {
                    Ok(profile) => self.profile.profile = profile,
                    Err(e) => self.notify_failure(format!("Error: {}", e)),
                }
            }
            BackendEvent::PhotoUploaded { generation, result } => {
                if generation != self.profile.generation {
                    tracing::debug!("dropping upload result for a stale identity");
                    return;
                }
                self.profile.uploading = false;
                match result {
                    Ok(url) => {
                        self.profile.set_photo_url(url);
                        self.notify_success("Profile photo updated!");
                    }
                    Err(e) => self.notify_failure(e.to_string()),
                }
            }
            BackendEvent::SignOutFinished(result) => {
                if let Err(e) = result {
                    self.notify_failure(format!("Error: {}", e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::backend::recording::{Call, RecordingBackend};
    use crate::state::FormField;
    use std::sync::Arc;

    fn test_app(
        memory: MemoryBackend,
    ) -> (
        App,
        mpsc::UnboundedReceiver<AppEvent>,
        Arc<RecordingBackend>,
    ) {
        let (backend, recorder) = RecordingBackend::wrap(Backend::from_single(Arc::new(memory)));
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(Config::default(), backend, tx);
        (app, rx, recorder)
    }

    async fn next_backend_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> BackendEvent {
        match rx.recv().await {
            Some(AppEvent::Backend(event)) => event,
            _ => panic!("expected a backend event"),
        }
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_without_backend_calls() {
        let (mut app, mut rx, recorder) = test_app(MemoryBackend::new());
        app.open_form(AuthMode::SignIn);
        app.form.email = "a@x.com".to_string();
        // password left empty -> length error

        app.submit_form();

        assert!(!app.form.submitting);
        assert!(app.form.errors.contains_key(&FormField::Password));
        assert!(recorder.calls().is_empty());
        assert!(rx.try_recv().is_err());
        // Local validation errors never reach the notification sink.
        assert!(app.notifications.current.is_none());
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_a_no_op() {
        let (mut app, mut rx, recorder) =
            test_app(MemoryBackend::new().with_account("a@x.com", "abcd", "u1"));
        app.open_form(AuthMode::SignIn);
        app.form.email = "a@x.com".to_string();
        app.form.password = "abcd".to_string();

        app.submit_form();
        assert!(app.form.submitting);
        app.submit_form();

        let event = next_backend_event(&mut rx).await;
        app.handle_backend_event(event);

        assert_eq!(
            recorder
                .calls()
                .iter()
                .filter(|c| matches!(c, Call::SignIn { .. }))
                .count(),
            1
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn successful_sign_in_notifies_and_closes_the_form() {
        let (mut app, mut rx, _) =
            test_app(MemoryBackend::new().with_account("a@x.com", "abcd", "u1"));
        app.open_form(AuthMode::SignIn);
        app.form.email = "a@x.com".to_string();
        app.form.password = "abcd".to_string();

        app.submit_form();
        let event = next_backend_event(&mut rx).await;
        app.handle_backend_event(event);

        assert_eq!(app.ui.mode, AppMode::Home);
        let notification = app.notifications.current.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(notification.message, "Signed in successfully!");
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_the_form_open_and_intact() {
        let (mut app, mut rx, _) =
            test_app(MemoryBackend::new().with_account("a@x.com", "abcd", "u1"));
        app.open_form(AuthMode::SignIn);
        app.form.email = "a@x.com".to_string();
        app.form.password = "nope".to_string();

        app.submit_form();
        let event = next_backend_event(&mut rx).await;
        app.handle_backend_event(event);

        assert_eq!(app.ui.mode, AppMode::AuthForm);
        assert!(!app.form.submitting);
        assert_eq!(app.form.email, "a@x.com");
        assert_eq!(app.form.password, "nope");
        let notification = app.notifications.current.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Failure);
        assert_eq!(notification.message, "Error: invalid credentials");
    }

    #[tokio::test]
    async fn result_arriving_after_the_form_closed_is_dropped() {
        let (mut app, mut rx, _) =
            test_app(MemoryBackend::new().with_account("a@x.com", "abcd", "u1"));
        app.open_form(AuthMode::SignIn);
        app.form.email = "a@x.com".to_string();
        app.form.password = "abcd".to_string();

        app.submit_form();
        // User closes the form before the backend answers.
        app.close_form();

        let event = next_backend_event(&mut rx).await;
        app.handle_backend_event(event);

        assert!(app.notifications.current.is_none());
        assert_eq!(app.ui.mode, AppMode::Home);
    }

    #[tokio::test]
    async fn identity_change_triggers_exactly_one_profile_fetch() {
        let (mut app, mut rx, recorder) = test_app(MemoryBackend::new().with_document(
            "users",
            "u1",
            serde_json::json!({ "pseudo": "Al", "email": "a@x.com" })
                .as_object()
                .cloned()
                .unwrap(),
        ));

        app.handle_backend_event(BackendEvent::IdentityChanged(Some(Identity {
            uid: "u1".to_string(),
            email: "a@x.com".to_string(),
        })));
        assert!(app.profile.loading);

        let event = next_backend_event(&mut rx).await;
        app.handle_backend_event(event);

        assert!(!app.profile.loading);
        assert_eq!(app.profile.profile.as_ref().unwrap().pseudo, "Al");
        assert_eq!(
            recorder
                .calls()
                .iter()
                .filter(|c| matches!(c, Call::GetDocument { .. }))
                .count(),
            1
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn fetch_for_missing_document_leaves_placeholder_state() {
        let (mut app, mut rx, _) = test_app(MemoryBackend::new());

        app.handle_backend_event(BackendEvent::IdentityChanged(Some(Identity {
            uid: "u1".to_string(),
            email: "a@x.com".to_string(),
        })));
        let event = next_backend_event(&mut rx).await;
        app.handle_backend_event(event);

        assert!(!app.profile.loading);
        assert!(app.profile.profile.is_none());
        assert!(app.notifications.current.is_none());
    }

    #[tokio::test]
    async fn signing_out_clears_the_profile_view() {
        let (mut app, _rx, _) = test_app(MemoryBackend::new());
        app.identity = Some(Identity {
            uid: "u1".to_string(),
            email: "a@x.com".to_string(),
        });
        app.ui.set_mode(AppMode::Profile);
        app.profile.profile = Some(UserProfile {
            uid: "u1".to_string(),
            ..UserProfile::default()
        });

        app.handle_backend_event(BackendEvent::IdentityChanged(None));

        assert!(app.identity.is_none());
        assert!(app.profile.profile.is_none());
        assert_eq!(app.ui.mode, AppMode::Home);
    }

    #[tokio::test]
    async fn upload_while_one_is_in_flight_is_a_no_op() {
        let (mut app, mut rx, recorder) = test_app(MemoryBackend::new());
        app.identity = Some(Identity {
            uid: "u1".to_string(),
            email: "a@x.com".to_string(),
        });
        app.profile.uploading = true;

        app.start_photo_upload(PathBuf::from("/tmp/avatar.png"));

        assert!(recorder.calls().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn upload_failure_surfaces_a_notification_and_keeps_old_photo() {
        let (mut app, mut rx, _) = test_app(MemoryBackend::new());
        app.identity = Some(Identity {
            uid: "u1".to_string(),
            email: "a@x.com".to_string(),
        });
        app.profile.profile = Some(UserProfile {
            uid: "u1".to_string(),
            profile_photo_url: Some("old".to_string()),
            ..UserProfile::default()
        });

        app.start_photo_upload(PathBuf::from("/nonexistent/avatar.png"));
        let event = next_backend_event(&mut rx).await;
        app.handle_backend_event(event);

        assert!(!app.profile.uploading);
        let notification = app.notifications.current.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Failure);
        assert_eq!(
            app.profile.profile.as_ref().unwrap().profile_photo_url.as_deref(),
            Some("old")
        );
    }

    #[tokio::test]
    async fn notifications_auto_close_after_the_timeout() {
        let (mut app, _rx, _) = test_app(MemoryBackend::new());
        app.notify_success("done");
        let ticks = app.config.notification_timeout_ms / TICK_MS;
        for _ in 0..ticks {
            app.on_tick();
        }
        assert!(app.notifications.current.is_none());
    }
}
