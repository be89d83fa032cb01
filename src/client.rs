//! Wiring between the terminal front-end and the Supabase backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use spotlive_core::app::App;
use spotlive_core::config::SpotLiveConfig;
use spotlive_core::gateway::SupabaseClient;
use spotlive_core::session::Session;

use crate::utils::tui;

pub type SpotLive = App<SupabaseClient>;

/// Build a client from the config file and environment, reusing the saved
/// session if there is one.
pub fn connect() -> Result<Arc<SupabaseClient>> {
    let config = SpotLiveConfig::load()?;
    let settings = config.gateway_settings().with_context(|| {
        format!(
            "Set SPOTLIVE_SUPABASE_URL and SPOTLIVE_SUPABASE_ANON_KEY, or edit {}",
            SpotLiveConfig::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "config.toml".to_string())
        )
    })?;

    tracing::debug!(url = %settings.url, bucket = %settings.image_bucket, "Using Supabase project");

    let session_path = SupabaseClient::default_session_path()?;
    let client = SupabaseClient::with_session_file(settings, session_path)?;
    Ok(Arc::new(client))
}

/// Connect, resolve the session and load events behind a spinner.
pub async fn start() -> Result<SpotLive> {
    let gateway = connect()?;

    let spinner = tui::create_spinner("Loading events".to_string());
    let app = App::start(gateway).await;
    spinner.finish_and_clear();

    Ok(app)
}

/// Connect and resolve the session without loading any events.
pub async fn open() -> Result<SpotLive> {
    let gateway = connect()?;
    let session = Session::resolve(gateway.as_ref()).await;
    Ok(App::new(gateway, session))
}
