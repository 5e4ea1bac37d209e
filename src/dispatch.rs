//! Authenticated request dispatcher with one-shot refresh-on-401.
//!
//! DESIGN
//! ======
//! Per call: send once; on 401 obtain a fresh access token and resend once,
//! returning whatever the second attempt produces. Any other status, and any
//! 401 after a failed refresh, goes straight back to the caller. No state
//! survives a call except what the session store holds.
//!
//! CONCURRENCY
//! ===========
//! Calls that hit 401 together share one refresh. The refresh step runs behind
//! an async mutex held by the [`SessionManager`], so dispatchers built over
//! clones of one session serialize on the same lock. A caller that gets the lock and finds a stored access token
//! different from the one it sent adopts that token instead of refreshing
//! again. One that finds the session cleared returns its 401 untouched.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use serde::de::DeserializeOwned;

use crate::auth::{AUTHORIZATION, CONTENT_TYPE, JSON_CONTENT_TYPE, ME_ENDPOINT, SessionManager, bearer};
use crate::error::{ApiError, TransportError};
use crate::models::MeResponse;
use crate::session::UserProfile;
use crate::transport::{ApiRequest, ApiResponse, Headers, RequestOptions};

#[derive(Debug, Clone)]
pub struct Dispatcher {
    session: SessionManager,
}

impl Dispatcher {
    #[must_use]
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Send `options` to `url` with the current credentials attached.
    ///
    /// Default headers are `Content-Type: application/json` and
    /// `Authorization: Bearer <token>` (empty without a token); caller headers
    /// override them.
    ///
    /// # Errors
    ///
    /// Transport failures on either attempt propagate. HTTP error statuses do
    /// not: they come back as the response.
    pub async fn api_call(&self, url: &str, options: RequestOptions) -> Result<ApiResponse, TransportError> {
        let sent_token = self.session.access_token();
        let request = self.build_request(url, options, sent_token.as_deref());
        tracing::debug!(method = %request.method, url = %request.url, "api call");

        let response = self.session.transport().send(request.clone()).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        tracing::debug!(url = %request.url, "unauthorized; attempting token refresh");
        let Some(token) = self.fresh_token(sent_token.as_deref()).await else {
            return Ok(response);
        };

        let mut retry = request;
        retry.headers.set(AUTHORIZATION, bearer(Some(&token)));
        self.session.transport().send(retry).await
    }

    /// `GET path` and decode a success body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] for network failures,
    /// [`ApiError::Status`] for non-success statuses, and
    /// [`ApiError::Decode`] for malformed bodies.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.api_call(path, RequestOptions::get())
            .await?
            .into_json()
    }

    /// Fetch `/api/auth/me` and replace the stored profile with the result.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json); the stored profile is untouched
    /// on error.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let me: MeResponse = self.get_json(ME_ENDPOINT).await?;
        self.session.store().set_user(&me.user);
        Ok(me.user)
    }

    fn build_request(&self, url: &str, options: RequestOptions, token: Option<&str>) -> ApiRequest {
        let mut headers = Headers::new();
        headers.set(CONTENT_TYPE, JSON_CONTENT_TYPE);
        headers.set(AUTHORIZATION, bearer(token));
        headers.merge(&options.headers);
        ApiRequest { method: options.method, url: self.session.url(url), headers, body: options.body }
    }

    async fn fresh_token(&self, sent: Option<&str>) -> Option<String> {
        let _gate = self.session.refresh_gate().lock().await;
        match self.session.access_token() {
            Some(current) if sent != Some(current.as_str()) => {
                tracing::debug!("adopting token refreshed by a concurrent call");
                Some(current)
            }
            // Cleared while we waited: the failed refresh already logged out.
            None if sent.is_some() => None,
            _ => self.session.refresh_token().await,
        }
    }
}
