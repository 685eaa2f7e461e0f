use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use api_types::{
    error::ErrorResponse,
    firestore::{Document, RunQueryRequest, RunQueryResponse, StructuredQuery, Value},
    identity::{AuthResponse, PasswordRequest},
    token::{RefreshRequest, RefreshResponse},
};
use async_trait::async_trait;
use ledger::{
    AuthService, AuthState, DocumentStore, ExpenseRecord, NewExpense, Principal, ServiceError,
};
use reqwest::{RequestBuilder, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio::sync::{Mutex, watch};

use crate::{
    ClientError,
    documents::{FIELD_OWNER, to_document, to_record},
    session_file::PersistedSession,
};

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1/";
pub const DEFAULT_SECURETOKEN_URL: &str = "https://securetoken.googleapis.com/v1/";
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1/";

/// Id tokens are refreshed this long before they actually expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME: u64 = 3600;

#[derive(Debug, Clone)]
pub struct FirebaseSettings {
    pub api_key: String,
    pub project_id: String,
    pub identity_url: String,
    pub securetoken_url: String,
    pub firestore_url: String,
    /// Where the signed-in session is persisted. `None` keeps it in memory.
    pub session_path: Option<PathBuf>,
}

impl FirebaseSettings {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            securetoken_url: DEFAULT_SECURETOKEN_URL.to_string(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_string(),
            session_path: None,
        }
    }
}

#[derive(Debug)]
struct Credentials {
    principal: Principal,
    id_token: String,
    refresh_token: String,
    expires_at: Instant,
}

impl Credentials {
    fn new(principal: Principal, id_token: String, refresh_token: String, expires_in: &str) -> Self {
        let lifetime = expires_in.parse().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        Self {
            principal,
            id_token,
            refresh_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        }
    }

    fn is_stale(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN >= self.expires_at
    }

    fn persisted(&self) -> PersistedSession {
        PersistedSession {
            uid: self.principal.uid.clone(),
            email: self.principal.email.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// REST client for Firebase Authentication and Cloud Firestore.
///
/// One client serves as both the auth service and the document store: the
/// store calls are authorized with the id token of the signed-in account.
#[derive(Debug)]
pub struct FirebaseClient {
    http: reqwest::Client,
    api_key: String,
    project_id: String,
    identity_url: Url,
    securetoken_url: Url,
    firestore_url: Url,
    session_path: Option<PathBuf>,
    credentials: Mutex<Option<Credentials>>,
    state: watch::Sender<AuthState>,
}

impl FirebaseClient {
    pub fn new(settings: FirebaseSettings) -> Result<Self, ClientError> {
        let (state, _) = watch::channel(AuthState::Restoring);
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            api_key: settings.api_key,
            project_id: settings.project_id,
            identity_url: base_url(&settings.identity_url)?,
            securetoken_url: base_url(&settings.securetoken_url)?,
            firestore_url: base_url(&settings.firestore_url)?,
            session_path: settings.session_path,
            credentials: Mutex::new(None),
            state,
        })
    }

    /// Resolve the initial auth state from the persisted session.
    ///
    /// Publishes `SignedIn` when the stored refresh token is still accepted,
    /// `SignedOut` otherwise. The session file is only removed when the
    /// backend rejects the token; a transport failure leaves it for the next
    /// start.
    pub async fn restore(&self) -> Option<Principal> {
        let persisted = match self.session_path.as_deref().map(PersistedSession::load) {
            Some(Ok(persisted)) => persisted,
            Some(Err(err)) => {
                tracing::warn!("failed to read persisted session: {err}");
                None
            }
            None => None,
        };

        let Some(persisted) = persisted else {
            tracing::info!("no persisted session");
            self.state.send_replace(AuthState::SignedOut);
            return None;
        };

        match self.refresh(&persisted.refresh_token).await {
            Ok(res) => {
                let principal = Principal {
                    uid: res.user_id,
                    email: persisted.email,
                };
                let credentials = Credentials::new(
                    principal.clone(),
                    res.id_token,
                    res.refresh_token,
                    &res.expires_in,
                );
                self.persist(&credentials);
                *self.credentials.lock().await = Some(credentials);
                tracing::info!(uid = %principal.uid, "session restored");
                self.state.send_replace(AuthState::SignedIn(principal.clone()));
                Some(principal)
            }
            Err(err @ ServiceError::Rejected { .. }) => {
                tracing::warn!("persisted session rejected: {err}");
                self.forget();
                self.state.send_replace(AuthState::SignedOut);
                None
            }
            Err(err) => {
                tracing::warn!("failed to restore session, keeping it: {err}");
                self.state.send_replace(AuthState::SignedOut);
                None
            }
        }
    }

    async fn password_auth(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<Principal, ServiceError> {
        let endpoint = self.identity_endpoint(&format!("accounts:{action}"))?;
        let payload = PasswordRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };

        let res: AuthResponse = send(self.http.post(endpoint).json(&payload)).await?;

        let principal = Principal {
            uid: res.local_id,
            email: res.email.or_else(|| Some(email.to_string())),
        };
        let credentials = Credentials::new(
            principal.clone(),
            res.id_token,
            res.refresh_token,
            &res.expires_in,
        );
        self.persist(&credentials);
        *self.credentials.lock().await = Some(credentials);
        self.state.send_replace(AuthState::SignedIn(principal.clone()));
        Ok(principal)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ServiceError> {
        let mut endpoint = join(&self.securetoken_url, "token")?;
        endpoint.query_pairs_mut().append_pair("key", &self.api_key);
        send(
            self.http
                .post(endpoint)
                .form(&RefreshRequest::new(refresh_token)),
        )
        .await
    }

    /// Id token of the signed-in account, refreshed when about to expire.
    ///
    /// A rejected refresh signs the account out.
    async fn id_token(&self) -> Result<String, ServiceError> {
        let mut guard = self.credentials.lock().await;
        let credentials = guard.as_mut().ok_or(ServiceError::Unauthenticated)?;
        if !credentials.is_stale() {
            return Ok(credentials.id_token.clone());
        }

        tracing::debug!(uid = %credentials.principal.uid, "refreshing id token");
        match self.refresh(&credentials.refresh_token).await {
            Ok(res) => {
                *credentials = Credentials::new(
                    credentials.principal.clone(),
                    res.id_token,
                    res.refresh_token,
                    &res.expires_in,
                );
                self.persist(credentials);
                Ok(credentials.id_token.clone())
            }
            Err(err @ ServiceError::Rejected { .. }) => {
                tracing::warn!("id token refresh rejected, signing out: {err}");
                *guard = None;
                drop(guard);
                self.forget();
                self.state.send_replace(AuthState::SignedOut);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn persist(&self, credentials: &Credentials) {
        let Some(path) = self.session_path.as_deref() else {
            return;
        };
        if let Err(err) = credentials.persisted().save(path) {
            tracing::warn!("failed to persist session: {err}");
        }
    }

    fn forget(&self) {
        let Some(path) = self.session_path.as_deref() else {
            return;
        };
        if let Err(err) = PersistedSession::clear(path) {
            tracing::warn!("failed to remove persisted session: {err}");
        }
    }

    fn identity_endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        let mut endpoint = join(&self.identity_url, path)?;
        endpoint.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(endpoint)
    }

    /// `projects/{project}/databases/(default)/documents` followed by
    /// `suffix` (e.g. `:runQuery`).
    fn documents_endpoint(&self, suffix: &str) -> Result<Url, ServiceError> {
        join(
            &self.firestore_url,
            &format!(
                "projects/{}/databases/(default)/documents{suffix}",
                self.project_id
            ),
        )
    }

    /// `.../documents/{segments...}` with each segment percent-encoded.
    fn document_endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut endpoint = self.documents_endpoint("")?;
        endpoint
            .path_segments_mut()
            .map_err(|()| ServiceError::Transport("invalid firestore url".to_string()))?
            .extend(segments);
        Ok(endpoint)
    }
}

#[async_trait]
impl AuthService for FirebaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, ServiceError> {
        let principal = self
            .password_auth("signInWithPassword", email, password)
            .await?;
        tracing::info!(uid = %principal.uid, "signed in");
        Ok(principal)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Principal, ServiceError> {
        let principal = self.password_auth("signUp", email, password).await?;
        tracing::info!(uid = %principal.uid, "account created");
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        *self.credentials.lock().await = None;
        self.forget();
        self.state.send_replace(AuthState::SignedOut);
        tracing::info!("signed out");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

#[async_trait]
impl DocumentStore for FirebaseClient {
    async fn query_by_owner(
        &self,
        collection: &str,
        owner: &str,
    ) -> Result<Vec<ExpenseRecord>, ServiceError> {
        let token = self.id_token().await?;
        let endpoint = self.documents_endpoint(":runQuery")?;
        let payload = RunQueryRequest {
            structured_query: StructuredQuery::field_equals(
                collection,
                FIELD_OWNER,
                Value::StringValue(owner.to_string()),
            ),
        };

        let entries: Vec<RunQueryResponse> = send(
            self.http
                .post(endpoint)
                .bearer_auth(token)
                .json(&payload),
        )
        .await?;

        Ok(entries
            .iter()
            .filter_map(|entry| entry.document.as_ref())
            .filter_map(|document| {
                let record = to_record(document);
                if record.is_none() {
                    tracing::warn!(name = ?document.name, "skipping malformed expense document");
                }
                record
            })
            .collect())
    }

    async fn insert(&self, collection: &str, expense: &NewExpense) -> Result<String, ServiceError> {
        let token = self.id_token().await?;
        let endpoint = self.document_endpoint(&[collection])?;

        let created: Document = send(
            self.http
                .post(endpoint)
                .bearer_auth(token)
                .json(&to_document(expense)),
        )
        .await?;

        created
            .id()
            .map(ToString::to_string)
            .ok_or_else(|| ServiceError::Transport("created document has no name".to_string()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ServiceError> {
        let token = self.id_token().await?;
        let endpoint = self.document_endpoint(&[collection, id])?;

        send::<IgnoredAny>(self.http.delete(endpoint).bearer_auth(token)).await?;
        Ok(())
    }
}

fn base_url(raw: &str) -> Result<Url, ClientError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|err| ClientError::InvalidUrl(format!("{raw}: {err}")))
}

/// Join a relative path onto a base ending in `/`. The `./` prefix keeps
/// segments such as `accounts:signUp` from parsing as a URL scheme.
fn join(base: &Url, path: &str) -> Result<Url, ServiceError> {
    base.join(&format!("./{path}"))
        .map_err(|err| ServiceError::Transport(format!("invalid url: {err}")))
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ServiceError> {
    let res = request
        .send()
        .await
        .map_err(|err| ServiceError::Transport(err.to_string()))?;

    let status = res.status();
    if status.is_success() {
        return res
            .json::<T>()
            .await
            .map_err(|err| ServiceError::Transport(err.to_string()));
    }

    let message = res
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error.message)
        .unwrap_or_else(|_| format!("unexpected status {status}"));
    tracing::debug!(%status, %message, "request rejected");
    Err(ServiceError::rejected(message))
}
