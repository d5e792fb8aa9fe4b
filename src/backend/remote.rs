// client/src/backend/remote.rs
// HTTP/JSON client for the hosted identity, document, and object service.
//
// Holds the signed-in session (uid + bearer token) and publishes identity
// changes on a watch channel. One instance serves all three capability
// traits and is constructed once in `main`.

use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;

use super::{
    AuthError, AuthService, BinaryStore, Document, DocumentStore, Identity, StoreError,
};
use async_trait::async_trait;

struct Session {
    id_token: String,
    identity: Identity,
}

pub struct RemoteBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<Session>>,
    identity_tx: watch::Sender<Option<Identity>>,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(rename = "idToken")]
    id_token: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Deserialize)]
struct AddressResponse {
    url: String,
}

/// Pulls the service's error message out of a failed response, falling
/// back to the HTTP status.
async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.json::<ErrorBody>().await {
        Ok(ErrorBody { error: Some(detail) }) => detail.message,
        _ => format!("request failed with status {}", status),
    }
}

impl RemoteBackend {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let (identity_tx, _) = watch::channel(None);
        RemoteBackend {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            session: RwLock::new(None),
            identity_tx,
        }
    }

    fn bearer(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.id_token.clone())
    }

    fn begin_session(&self, resp: AuthResponse, fallback_email: &str) -> Identity {
        let identity = Identity {
            uid: resp.local_id,
            email: resp.email.unwrap_or_else(|| fallback_email.to_string()),
        };
        *self.session.write() = Some(Session {
            id_token: resp.id_token,
            identity: identity.clone(),
        });
        self.identity_tx.send_replace(Some(identity.clone()));
        identity
    }

    async fn account_request(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, AuthError> {
        let url = format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url, action, self.api_key
        );
        tracing::debug!(action, "auth request");
        self.http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))
    }

    fn document_url(&self, collection: &str, key: &str) -> String {
        format!("{}/v1/documents/{}/{}", self.base_url, collection, key)
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/v1/objects/{}", self.base_url, key)
    }

    fn store_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl AuthService for RemoteBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let resp = self
            .account_request(
                "signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::Rejected(error_message(resp).await));
        }
        let parsed: AuthResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        Ok(self.begin_session(parsed, email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let resp = self
            .account_request(
                "signUp",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::Rejected(error_message(resp).await));
        }
        let parsed: AuthResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        Ok(self.begin_session(parsed, email))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let resp = self
            .account_request(
                "sendOobCode",
                json!({ "requestType": "PASSWORD_RESET", "email": email }),
            )
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::Rejected(error_message(resp).await));
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write() = None;
        self.identity_tx.send_replace(None);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.session.read().as_ref().map(|s| s.identity.clone())
    }

    fn watch_identity(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }
}

#[async_trait]
impl DocumentStore for RemoteBackend {
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, StoreError> {
        let resp = self
            .store_request(self.http.get(self.document_url(collection, key)))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(StoreError::Rejected(error_message(resp).await));
        }
        let fields: Document = resp
            .json()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Some(fields))
    }

    async fn set_document(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let resp = self
            .store_request(self.http.put(self.document_url(collection, key)))
            .json(&fields)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(StoreError::Rejected(error_message(resp).await));
        }
        Ok(())
    }

    async fn update_fields(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let resp = self
            .store_request(self.http.patch(self.document_url(collection, key)))
            .json(&fields)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{}/{}", collection, key)));
        }
        if !resp.status().is_success() {
            return Err(StoreError::Rejected(error_message(resp).await));
        }
        Ok(())
    }
}

#[async_trait]
impl BinaryStore for RemoteBackend {
    async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let resp = self
            .store_request(self.http.put(self.object_url(key)))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(StoreError::Rejected(error_message(resp).await));
        }
        Ok(())
    }

    async fn get_download_address(&self, key: &str) -> Result<String, StoreError> {
        let url = format!("{}/address", self.object_url(key));
        let resp = self
            .store_request(self.http.get(url))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(key.to_string()));
        }
        if !resp.status().is_success() {
            return Err(StoreError::Rejected(error_message(resp).await));
        }
        let parsed: AddressResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(parsed.url)
    }
}
