//! Session manager: token lifecycle against `/api/auth/*`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps a [`SessionStore`] with the network operations that change it: login,
//! logout, and refresh. The dispatcher calls [`SessionManager::refresh_token`]
//! when a request comes back unauthorized.
//!
//! ERROR HANDLING
//! ==============
//! Logout cannot fail: the server notification is attempted and its outcome
//! discarded, then the session is cleared and the navigator sent to login.
//! Refresh failures of any kind end in that same logout and yield `None`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;
use std::sync::Arc;

use futures::lock::Mutex;

use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, RefreshResponse};
use crate::navigation::Navigator;
use crate::session::{Role, SessionStore, UserProfile};
use crate::transport::{ApiRequest, Headers, HttpTransport, Method};

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const LOGOUT_ENDPOINT: &str = "/api/auth/logout";
pub const REFRESH_ENDPOINT: &str = "/api/auth/refresh";
pub const ME_ENDPOINT: &str = "/api/auth/me";

pub(crate) const AUTHORIZATION: &str = "Authorization";
pub(crate) const CONTENT_TYPE: &str = "Content-Type";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// `Bearer <token>`, or an empty value when there is no token.
pub(crate) fn bearer(token: Option<&str>) -> String {
    token.map(|t| format!("Bearer {t}")).unwrap_or_default()
}

#[derive(Clone)]
pub struct SessionManager {
    store: SessionStore,
    transport: Arc<dyn HttpTransport>,
    navigator: Arc<dyn Navigator>,
    base_url: String,
    /// Shared by every clone, so dispatchers over one session refresh once.
    refresh_gate: Arc<Mutex<()>>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// `base_url` is prefixed to every API path; pass `""` for same-origin
    /// browser requests.
    pub fn new(
        store: SessionStore,
        transport: Arc<dyn HttpTransport>,
        navigator: Arc<dyn Navigator>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { store, transport, navigator, base_url, refresh_gate: Arc::new(Mutex::new(())) }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub(crate) fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    pub(crate) fn refresh_gate(&self) -> &Mutex<()> {
        &self.refresh_gate
    }

    /// Resolve an API path against the base URL. Absolute URLs pass through.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    // =========================================================================
    // LOCAL QUERIES
    // =========================================================================

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.store.access_token()
    }

    #[must_use]
    pub fn stored_refresh_token(&self) -> Option<String> {
        self.store.refresh_token()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.store.user()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.store.has_role(role)
    }

    /// Fail fast before work that needs a stored session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] when no access token is stored.
    pub fn ensure_authenticated(&self) -> Result<(), ApiError> {
        if self.store.is_authenticated() { Ok(()) } else { Err(ApiError::NotAuthenticated) }
    }

    /// Home page for the stored user's role. Unknown roles have none.
    #[must_use]
    pub fn landing_path(&self) -> Option<&'static str> {
        self.store.user()?.role().map(Role::landing_path)
    }

    /// Name for the page header, if someone is signed in.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.store.user().map(|u| u.full_name)
    }

    /// Page guard: send the browser to login unless the stored user holds
    /// exactly `role`. Returns whether the page may render.
    pub fn require_role(&self, role: Role) -> bool {
        if self.store.has_role(role) {
            return true;
        }
        tracing::debug!(required = %role, "role guard redirecting to login");
        self.navigator.go_to_login();
        false
    }

    // =========================================================================
    // NETWORK OPERATIONS
    // =========================================================================

    /// Exchange credentials for a session and store it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the server rejects the credentials,
    /// [`ApiError::Decode`] for an unexpected body, and
    /// [`ApiError::Transport`] when the request never completes.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let body = serde_json::to_string(&LoginRequest { email, password })
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let mut headers = Headers::new();
        headers.set(CONTENT_TYPE, JSON_CONTENT_TYPE);
        let request = ApiRequest { method: Method::Post, url: self.url(LOGIN_ENDPOINT), headers, body: Some(body) };

        let login: LoginResponse = self.transport.send(request).await?.into_json()?;
        self.store
            .save_login(&login.access_token, &login.refresh_token, &login.user);
        tracing::info!(user_id = login.user.id, role = %login.user.role, "logged in");
        Ok(login.user)
    }

    /// Tell the server (best-effort), clear every slot, go to login.
    pub async fn logout(&self) {
        let mut headers = Headers::new();
        if let Some(token) = self.store.access_token() {
            headers.set(AUTHORIZATION, bearer(Some(&token)));
        }
        let request = ApiRequest { method: Method::Post, url: self.url(LOGOUT_ENDPOINT), headers, body: None };

        match self.transport.send(request).await {
            Ok(response) => tracing::debug!(status = response.status, "logout notified"),
            Err(e) => tracing::warn!(error = %e, "logout notification failed; clearing session anyway"),
        }

        self.store.clear();
        self.navigator.go_to_login();
        tracing::info!("session cleared");
    }

    /// One attempt to trade the refresh token for a new access token.
    ///
    /// Any failure, including a missing refresh token, performs a full
    /// [`logout`](Self::logout) and yields `None`.
    pub async fn refresh_token(&self) -> Option<String> {
        let Some(refresh) = self.store.refresh_token() else {
            tracing::debug!("no refresh token stored");
            self.logout().await;
            return None;
        };

        let mut headers = Headers::new();
        headers.set(AUTHORIZATION, bearer(Some(&refresh)));
        let request = ApiRequest { method: Method::Post, url: self.url(REFRESH_ENDPOINT), headers, body: None };

        let outcome = match self.transport.send(request).await {
            Ok(response) if response.ok() => response
                .json::<RefreshResponse>()
                .map(|body| body.access_token)
                .map_err(|e| e.to_string()),
            Ok(response) => Err(format!("refresh rejected with status {}", response.status)),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(token) if !token.is_empty() => {
                self.store.set_access_token(&token);
                tracing::info!("access token refreshed");
                Some(token)
            }
            Ok(_) => {
                tracing::warn!("refresh returned an empty access token");
                self.logout().await;
                None
            }
            Err(reason) => {
                tracing::warn!(%reason, "token refresh failed");
                self.logout().await;
                None
            }
        }
    }
}
