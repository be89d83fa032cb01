//! Gateway implementation on top of the Supabase HTTP APIs.
//!
//! Records go through PostgREST (`/rest/v1`), accounts through GoTrue
//! (`/auth/v1`) and images through Storage (`/storage/v1`). The signed-in
//! session is kept in memory and, when a session file is configured,
//! mirrored to disk so it survives between CLI runs.

mod auth;
mod records;
mod storage;
mod stored_session;

use std::path::PathBuf;
use std::sync::Mutex;

use reqwest::{RequestBuilder, Response};
use url::Url;

use crate::config::GatewaySettings;
use crate::error::{GatewayError, GatewayResult, SpotLiveError};

pub use stored_session::StoredSession;

/// HTTP client for one Supabase project.
pub struct SupabaseClient {
    http: reqwest::Client,
    settings: GatewaySettings,
    session: Mutex<Option<StoredSession>>,
    session_path: Option<PathBuf>,
}

impl SupabaseClient {
    /// Client with an in-memory session only.
    pub fn new(settings: GatewaySettings) -> Self {
        SupabaseClient {
            http: reqwest::Client::new(),
            settings,
            session: Mutex::new(None),
            session_path: None,
        }
    }

    /// Client whose session is persisted at `path`. An existing session
    /// file is picked up immediately.
    pub fn with_session_file(settings: GatewaySettings, path: PathBuf) -> GatewayResult<Self> {
        let stored = StoredSession::load(&path)?;
        let client = SupabaseClient {
            session: Mutex::new(stored),
            session_path: Some(path),
            ..Self::new(settings)
        };
        Ok(client)
    }

    /// Default location of the session file (~/.config/spotlive/session.toml).
    pub fn default_session_path() -> GatewayResult<PathBuf> {
        Ok(crate::config::SpotLiveConfig::config_dir()?.join("session.toml"))
    }

    fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = Url::parse(&self.settings.url).map_err(|e| {
            SpotLiveError::Config(format!("Invalid supabase_url '{}': {e}", self.settings.url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                SpotLiveError::Config(format!(
                    "supabase_url '{}' cannot be a base URL",
                    self.settings.url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn stored_session(&self) -> Option<StoredSession> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_session(&self, session: Option<StoredSession>) -> GatewayResult<()> {
        if let Some(path) = &self.session_path {
            match &session {
                Some(s) => s.save(path)?,
                None => StoredSession::remove(path)?,
            }
        }

        *self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;

        Ok(())
    }

    /// Attach the API key and the bearer token. Without a session the anon
    /// key doubles as the bearer, which is what the backend expects for
    /// anonymous reads.
    async fn authorized(&self, request: RequestBuilder) -> GatewayResult<RequestBuilder> {
        let token = match self.valid_session().await? {
            Some(session) => session.access_token,
            None => self.settings.anon_key.clone(),
        };

        Ok(request
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(token))
    }
}

/// Pass 2xx responses through, turn anything else into `GatewayError::Api`.
async fn check(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Api {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason()),
    })
}

/// Extract the human-readable part of a Supabase error body.
///
/// GoTrue uses `msg` or `error_description`, PostgREST and Storage use
/// `message`; `error` is the last resort.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        reason.unwrap_or("Request failed").to_string()
    } else {
        body.to_string()
    }
}
