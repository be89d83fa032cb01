//! GoTrue (`/auth/v1`) calls.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{SupabaseClient, StoredSession, check};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{AuthGateway, AuthUser, SignUpRequest};

/// Body of a successful token grant.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: AuthUser,
}

impl From<TokenResponse> for StoredSession {
    fn from(tokens: TokenResponse) -> Self {
        StoredSession::new(
            tokens.access_token,
            tokens.refresh_token,
            tokens.expires_in,
            tokens.user,
        )
    }
}

/// Auth failures carry a message meant for the user; keep it verbatim.
fn as_auth_error(err: GatewayError) -> GatewayError {
    match err {
        GatewayError::Api { status, message } if (400..500).contains(&status) => {
            GatewayError::Auth(message)
        }
        other => other,
    }
}

impl SupabaseClient {
    /// The stored session, refreshed first if it has expired. A refresh the
    /// service rejects ends the session.
    pub(super) async fn valid_session(&self) -> GatewayResult<Option<StoredSession>> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };

        if !session.is_expired() {
            return Ok(Some(session));
        }

        tracing::debug!(user = %session.user.id, "Refreshing expired session");

        let mut url = self.endpoint(&["auth", "v1", "token"])?;
        url.query_pairs_mut().append_pair("grant_type", "refresh_token");

        let response = self
            .http
            .post(url)
            .header("apikey", &self.settings.anon_key)
            .json(&serde_json::json!({ "refresh_token": session.refresh_token }))
            .send()
            .await?;

        match check(response).await {
            Ok(response) => {
                let tokens: TokenResponse = response.json().await?;
                let refreshed = StoredSession::from(tokens);
                self.set_session(Some(refreshed.clone()))?;
                Ok(Some(refreshed))
            }
            Err(GatewayError::Api { status, message }) if (400..500).contains(&status) => {
                tracing::warn!(status, %message, "Session refresh rejected, signing out");
                self.set_session(None)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl AuthGateway for SupabaseClient {
    async fn sign_up(&self, request: &SignUpRequest) -> GatewayResult<Option<AuthUser>> {
        let url = self.endpoint(&["auth", "v1", "signup"])?;

        let response = self
            .http
            .post(url)
            .header("apikey", &self.settings.anon_key)
            .json(&serde_json::json!({
                "email": request.email,
                "password": request.password,
                "data": { "name": request.display_name },
            }))
            .send()
            .await?;

        let body: serde_json::Value = check(response).await.map_err(as_auth_error)?.json().await?;

        // With e-mail confirmation enabled the service returns the bare
        // user and no session.
        if body.get("access_token").is_some() {
            let tokens: TokenResponse = serde_json::from_value(body)
                .map_err(|e| GatewayError::Decode(e.to_string()))?;
            let session = StoredSession::from(tokens);
            let user = session.user.clone();
            self.set_session(Some(session))?;
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> GatewayResult<AuthUser> {
        let mut url = self.endpoint(&["auth", "v1", "token"])?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .http
            .post(url)
            .header("apikey", &self.settings.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let tokens: TokenResponse = check(response).await.map_err(as_auth_error)?.json().await?;
        let session = StoredSession::from(tokens);
        let user = session.user.clone();
        self.set_session(Some(session))?;

        Ok(user)
    }

    async fn current_user(&self) -> GatewayResult<Option<AuthUser>> {
        let Some(session) = self.valid_session().await? else {
            return Ok(None);
        };

        let url = self.endpoint(&["auth", "v1", "user"])?;
        let response = self
            .http
            .get(url)
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::info!("Stored session is no longer valid");
            self.set_session(None)?;
            return Ok(None);
        }

        let user: AuthUser = check(response).await?.json().await?;
        Ok(Some(user))
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        if let Some(session) = self.stored_session() {
            let url = self.endpoint(&["auth", "v1", "logout"])?;
            let result = self
                .http
                .post(url)
                .header("apikey", &self.settings.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;

            // The local session goes away even if the server call fails.
            if let Err(e) = result {
                tracing::warn!(error = %e, "Logout request failed");
            }
        }

        self.set_session(None)
    }
}
