use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::BackendConfig;
use crate::error::{PulseError, Result};
use crate::preferences::PreferenceDocument;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const SESSION_HEADER: &str = "X-Appwrite-Session";
const UNIQUE_ID: &str = "unique()";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub secret: String,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    total: u64,
    documents: Vec<PreferenceDocument>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(default)]
    message: String,
}

/// REST client for the account and document backend. Clones share the
/// session credential.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
    session: Arc<RwLock<Option<Session>>>,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("NewsPulse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: BackendConfig) -> Self {
        Self {
            client,
            config,
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Reuse a credential obtained elsewhere.
    pub async fn restore_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    /// Creates the account, then logs in with the same credentials.
    pub async fn create_account(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        let body = json!({
            "userId": UNIQUE_ID,
            "email": email,
            "password": password,
            "name": name,
        });
        let user: User = self
            .send(self.request(Method::POST, "account").await.json(&body))
            .await
            .inspect_err(|e| warn!(error = %e, "createAccount failed"))?;
        info!(user = %user.id, "account created");
        self.login(email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = json!({ "email": email, "password": password });
        let result: Result<Session> = self
            .send(
                self.request(Method::POST, "account/sessions/email")
                    .await
                    .json(&body),
            )
            .await;
        let session = match result {
            Ok(session) => session,
            Err(PulseError::Unauthorized(_)) => {
                warn!("login rejected");
                return Err(PulseError::Unauthorized(
                    "Incorrect email or password".into(),
                ));
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                return Err(e);
            }
        };
        info!(user = %session.user_id, "session created");
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// `Ok(None)` when there is no valid session.
    pub async fn get_current_user(&self) -> Result<Option<User>> {
        match self
            .send::<User>(self.request(Method::GET, "account").await)
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(PulseError::Unauthorized(_)) => {
                debug!("no active session");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "getCurrentUser failed");
                Err(e)
            }
        }
    }

    pub async fn update_user_name(&self, name: &str) -> Result<User> {
        self.send(
            self.request(Method::PATCH, "account/name")
                .await
                .json(&json!({ "name": name })),
        )
        .await
        .inspect_err(|e| warn!(error = %e, "updateUserName failed"))
    }

    /// The backend requires the current password to change the email.
    pub async fn update_user_email(&self, email: &str, password: &str) -> Result<User> {
        self.send(
            self.request(Method::PATCH, "account/email")
                .await
                .json(&json!({ "email": email, "password": password })),
        )
        .await
        .inspect_err(|e| warn!(error = %e, "updateUserEmail failed"))
    }

    pub async fn reset_user_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<User> {
        self.send(
            self.request(Method::PATCH, "account/password")
                .await
                .json(&json!({ "password": new_password, "oldPassword": old_password })),
        )
        .await
        .inspect_err(|e| warn!(error = %e, "resetUserPassword failed"))
    }

    /// Deletes the current session. The local credential is dropped even
    /// when the remote call fails.
    pub async fn logout(&self) -> Result<()> {
        let request = self
            .request(Method::DELETE, "account/sessions/current")
            .await;
        let outcome = self.send_empty(request).await;
        self.session.write().await.take();
        match outcome {
            Ok(()) => {
                info!("session deleted");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "logout failed");
                Err(e)
            }
        }
    }

    /// One document per user, readable and writable only by that user.
    pub async fn create_preferences(
        &self,
        user_id: &str,
        categories: &[String],
    ) -> Result<PreferenceDocument> {
        let owner = format!("user:{user_id}");
        let body = json!({
            "documentId": UNIQUE_ID,
            "data": {
                "userid": user_id,
                "interested_categories": categories,
            },
            "permissions": [
                format!("read(\"{owner}\")"),
                format!("write(\"{owner}\")"),
            ],
        });
        let document: PreferenceDocument = self
            .send(
                self.request(Method::POST, &self.documents_path())
                    .await
                    .json(&body),
            )
            .await
            .inspect_err(|e| warn!(error = %e, "createPreferences failed"))?;
        debug!(document = %document.id, "preferences created");
        Ok(document)
    }

    /// Overwrites the category list of an existing document.
    pub async fn save_preferences(
        &self,
        document_id: &str,
        user_id: &str,
        categories: &[String],
    ) -> Result<PreferenceDocument> {
        let body = json!({
            "data": {
                "userid": user_id,
                "interested_categories": categories,
            },
        });
        let path = format!("{}/{}", self.documents_path(), document_id);
        let document: PreferenceDocument = self
            .send(self.request(Method::PATCH, &path).await.json(&body))
            .await
            .inspect_err(|e| warn!(error = %e, document = %document_id, "savePreferences failed"))?;
        debug!(document = %document.id, "preferences saved");
        Ok(document)
    }

    /// First document owned by `user_id`, or `NotFound`.
    pub async fn get_preferences(&self, user_id: &str) -> Result<PreferenceDocument> {
        let query = json!({
            "method": "equal",
            "attribute": "userid",
            "values": [user_id],
        })
        .to_string();
        let list: DocumentList = self
            .send(
                self.request(Method::GET, &self.documents_path())
                    .await
                    .query(&[("queries[]", query)]),
            )
            .await
            .inspect_err(|e| warn!(error = %e, "getPreferences failed"))?;
        debug!(user = %user_id, total = list.total, "preferences queried");
        list.documents
            .into_iter()
            .next()
            .ok_or(PulseError::NotFound {
                what: "saved preferences",
            })
    }

    fn documents_path(&self) -> String {
        format!(
            "databases/{}/collections/{}/documents",
            self.config.database_id, self.config.preferences_collection_id
        )
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path);
        let mut builder = self
            .client
            .request(method, url)
            .header(PROJECT_HEADER, &self.config.project_id);
        if let Some(session) = self.session.read().await.as_ref() {
            if !session.secret.is_empty() {
                builder = builder.header(SESSION_HEADER, &session.secret);
            }
        }
        builder
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        check_status(request.send().await?).await.map(|_| ())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|b| serde_json::from_slice::<RemoteError>(&b).ok())
        .map(|e| e.message)
        .unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PulseError::Unauthorized(message),
        _ => PulseError::Http { status, message },
    })
}
