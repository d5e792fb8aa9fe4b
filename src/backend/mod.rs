// client/src/backend/mod.rs
// Capability interfaces for the hosted SiteW backend.
//
// The application never talks to the hosted service directly; everything
// goes through these three traits, bundled into a `Backend` handle that is
// constructed once at startup and passed into the app by injection.

pub mod memory;
pub mod remote;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// The authenticated principal returned by sign-in/sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// A document is a flat JSON object as the document store sees it.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The service rejected the request (bad credentials, unknown email,
    /// duplicate account, ...). Carries the service's message verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(String),
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The currently signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Reactive view of `current_identity`. Receivers are notified on every
    /// sign-in, sign-up, and sign-out.
    fn watch_identity(&self) -> watch::Receiver<Option<Identity>>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `Ok(None)` when no document exists at `key`.
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Creates or fully replaces the document at `key`.
    async fn set_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), StoreError>;

    /// Merges `fields` into the existing document at `key`.
    async fn update_fields(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait BinaryStore: Send + Sync {
    /// Stores `bytes` at `key`, overwriting any prior object.
    ///
    /// Not transactional with any document write that records the resulting
    /// download address: a crash between this call and that write leaves an
    /// orphaned object behind.
    async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Resolvable address for the object at `key`.
    async fn get_download_address(&self, key: &str) -> Result<String, StoreError>;
}

/// The three capability handles, cloned freely into spawned tasks.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthService>,
    pub docs: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BinaryStore>,
}

impl Backend {
    /// Bundles a single object implementing all three capabilities.
    pub fn from_single<T>(inner: Arc<T>) -> Self
    where
        T: AuthService + DocumentStore + BinaryStore + 'static,
    {
        Backend {
            auth: inner.clone(),
            docs: inner.clone(),
            blobs: inner,
        }
    }
}

#[cfg(test)]
pub mod recording {
    //! Test double that records every backend call while delegating to a
    //! real implementation, so tests can assert exact call sequences.

    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        SignIn { email: String },
        SignUp { email: String },
        SendPasswordReset { email: String },
        SignOut,
        GetDocument { collection: String, key: String },
        SetDocument { collection: String, key: String, fields: Document },
        UpdateFields { collection: String, key: String, fields: Document },
        PutObject { key: String, len: usize },
        GetDownloadAddress { key: String },
    }

    pub struct RecordingBackend {
        inner: Backend,
        pub calls: Mutex<Vec<Call>>,
    }

    impl RecordingBackend {
        /// Wraps `inner`; the returned `Backend` routes every capability
        /// through the recorder.
        pub fn wrap(inner: Backend) -> (Backend, Arc<RecordingBackend>) {
            let recorder = Arc::new(RecordingBackend {
                inner,
                calls: Mutex::new(Vec::new()),
            });
            (Backend::from_single(recorder.clone()), recorder)
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().push(call);
        }
    }

    #[async_trait]
    impl AuthService for RecordingBackend {
        async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
            self.record(Call::SignIn { email: email.to_string() });
            self.inner.auth.sign_in(email, password).await
        }

        async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
            self.record(Call::SignUp { email: email.to_string() });
            self.inner.auth.sign_up(email, password).await
        }

        async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
            self.record(Call::SendPasswordReset { email: email.to_string() });
            self.inner.auth.send_password_reset(email).await
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            self.record(Call::SignOut);
            self.inner.auth.sign_out().await
        }

        fn current_identity(&self) -> Option<Identity> {
            self.inner.auth.current_identity()
        }

        fn watch_identity(&self) -> watch::Receiver<Option<Identity>> {
            self.inner.auth.watch_identity()
        }
    }

    #[async_trait]
    impl DocumentStore for RecordingBackend {
        async fn get_document(
            &self,
            collection: &str,
            key: &str,
        ) -> Result<Option<Document>, StoreError> {
            self.record(Call::GetDocument {
                collection: collection.to_string(),
                key: key.to_string(),
            });
            self.inner.docs.get_document(collection, key).await
        }

        async fn set_document(
            &self,
            collection: &str,
            key: &str,
            fields: Document,
        ) -> Result<(), StoreError> {
            self.record(Call::SetDocument {
                collection: collection.to_string(),
                key: key.to_string(),
                fields: fields.clone(),
            });
            self.inner.docs.set_document(collection, key, fields).await
        }

        async fn update_fields(
            &self,
            collection: &str,
            key: &str,
            fields: Document,
        ) -> Result<(), StoreError> {
            self.record(Call::UpdateFields {
                collection: collection.to_string(),
                key: key.to_string(),
                fields: fields.clone(),
            });
            self.inner.docs.update_fields(collection, key, fields).await
        }
    }

    #[async_trait]
    impl BinaryStore for RecordingBackend {
        async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
            self.record(Call::PutObject {
                key: key.to_string(),
                len: bytes.len(),
            });
            self.inner.blobs.put_object(key, bytes).await
        }

        async fn get_download_address(&self, key: &str) -> Result<String, StoreError> {
            self.record(Call::GetDownloadAddress { key: key.to_string() });
            self.inner.blobs.get_download_address(key).await
        }
    }
}
