// client/src/backend/memory.rs
// In-memory backend for dev mode and tests. All data is lost on exit.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::engine::Engine as _;
use parking_lot::RwLock;
use tokio::sync::watch;
use uuid::Uuid;

use super::{AuthError, AuthService, BinaryStore, Document, DocumentStore, Identity, StoreError};

struct Account {
    uid: String,
    password: String,
}

/// Backend fake with the same observable semantics as the hosted service:
/// duplicate sign-ups are rejected, object puts overwrite, field updates
/// merge, and identity changes are published on a watch channel.
pub struct MemoryBackend {
    accounts: RwLock<HashMap<String, Account>>,
    documents: RwLock<HashMap<(String, String), Document>>,
    objects: RwLock<HashMap<String, Vec<u8>>>,
    next_uid: RwLock<Option<String>>,
    identity_tx: watch::Sender<Option<Identity>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (identity_tx, _) = watch::channel(None);
        MemoryBackend {
            accounts: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
            objects: RwLock::new(HashMap::new()),
            next_uid: RwLock::new(None),
            identity_tx,
        }
    }

    /// Pre-registers a credential without signing it in.
    pub fn with_account(self, email: &str, password: &str, uid: &str) -> Self {
        self.accounts.write().insert(
            email.to_string(),
            Account {
                uid: uid.to_string(),
                password: password.to_string(),
            },
        );
        self
    }

    /// Fixes the uid the next sign-up will be assigned.
    pub fn with_next_uid(self, uid: &str) -> Self {
        *self.next_uid.write() = Some(uid.to_string());
        self
    }

    /// Pre-seeds a document.
    pub fn with_document(self, collection: &str, key: &str, fields: Document) -> Self {
        self.documents
            .write()
            .insert((collection.to_string(), key.to_string()), fields);
        self
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthService for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = {
            let accounts = self.accounts.read();
            let account = accounts
                .get(email)
                .filter(|a| a.password == password)
                .ok_or_else(|| AuthError::Rejected("invalid credentials".to_string()))?;
            Identity {
                uid: account.uid.clone(),
                email: email.to_string(),
            }
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = {
            let mut accounts = self.accounts.write();
            if accounts.contains_key(email) {
                return Err(AuthError::Rejected("email already in use".to_string()));
            }
            let uid = self
                .next_uid
                .write()
                .take()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            accounts.insert(
                email.to_string(),
                Account {
                    uid: uid.clone(),
                    password: password.to_string(),
                },
            );
            Identity {
                uid,
                email: email.to_string(),
            }
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if self.accounts.read().contains_key(email) {
            Ok(())
        } else {
            Err(AuthError::Rejected("unknown email".to_string()))
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.identity_tx.send_replace(None);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.identity_tx.borrow().clone()
    }

    fn watch_identity(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .documents
            .read()
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }

    async fn set_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        self.documents
            .write()
            .insert((collection.to_string(), key.to_string()), fields);
        Ok(())
    }

    async fn update_fields(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write();
        let doc = documents
            .get_mut(&(collection.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, key)))?;
        for (k, v) in fields {
            doc.insert(k, v);
        }
        Ok(())
    }
}

#[async_trait]
impl BinaryStore for MemoryBackend {
    async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.objects.write().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get_download_address(&self, key: &str) -> Result<String, StoreError> {
        let objects = self.objects.read();
        let bytes = objects
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(format!("data:application/octet-stream;base64,{}", b64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let backend = MemoryBackend::new();
        backend.sign_up("a@x.com", "abcd").await.unwrap();
        let err = backend.sign_up("a@x.com", "efgh").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
    }

    #[tokio::test]
    async fn sign_in_publishes_identity_change() {
        let backend = MemoryBackend::new().with_account("a@x.com", "abcd", "u1");
        let mut rx = backend.watch_identity();
        assert!(rx.borrow().is_none());

        backend.sign_in("a@x.com", "abcd").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().uid, "u1");
        assert_eq!(backend.current_identity().unwrap().email, "a@x.com");

        backend.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn sign_in_rejects_bad_password() {
        let backend = MemoryBackend::new().with_account("a@x.com", "abcd", "u1");
        let err = backend.sign_in("a@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
        assert!(backend.current_identity().is_none());
    }

    #[tokio::test]
    async fn update_fields_merges_into_existing_document() {
        let backend = MemoryBackend::new().with_document(
            "users",
            "u1",
            doc(json!({"pseudo": "Al", "email": "a@x.com"})),
        );
        backend
            .update_fields("users", "u1", doc(json!({"profilePhoto": "http://p"})))
            .await
            .unwrap();

        let stored = backend.get_document("users", "u1").await.unwrap().unwrap();
        assert_eq!(stored["pseudo"], "Al");
        assert_eq!(stored["profilePhoto"], "http://p");
    }

    #[tokio::test]
    async fn update_fields_on_missing_document_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .update_fields("users", "nope", doc(json!({"x": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn put_object_overwrites_and_address_reflects_latest() {
        let backend = MemoryBackend::new();
        backend.put_object("u1", vec![1, 2, 3]).await.unwrap();
        let first = backend.get_download_address("u1").await.unwrap();
        backend.put_object("u1", vec![9]).await.unwrap();
        let second = backend.get_download_address("u1").await.unwrap();
        assert_ne!(first, second);
        assert!(second.starts_with("data:"));
    }
}
