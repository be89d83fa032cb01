//! The signed-in Supabase session, persisted between runs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SpotLiveError, SpotLiveResult};
use crate::gateway::AuthUser;

/// Refresh this long before the access token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    // Kept last: toml needs plain values before tables.
    pub user: AuthUser,
}

impl StoredSession {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: AuthUser,
    ) -> Self {
        StoredSession {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
            user,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }

    /// Read a session file. A missing file means "not signed in".
    pub fn load(path: &Path) -> SpotLiveResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            SpotLiveError::Session(format!("Failed to read {}: {e}", path.display()))
        })?;

        let session = toml::from_str(&contents).map_err(|e| {
            SpotLiveError::Session(format!("Failed to parse {}: {e}", path.display()))
        })?;

        Ok(Some(session))
    }

    pub fn save(&self, path: &Path) -> SpotLiveResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SpotLiveError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SpotLiveError::Session(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let write_err = |e: std::io::Error| {
            SpotLiveError::Session(format!("Failed to write {}: {e}", path.display()))
        };

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        // Owner-only (0600): the file holds bearer tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(write_err)?;

        // `mode` only applies on creation; tighten a file left by an older run
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }

        file.write_all(contents.as_bytes()).map_err(write_err)?;
        Ok(())
    }

    pub fn remove(path: &Path) -> SpotLiveResult<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::UserId;

    fn sample(expires_in: i64) -> StoredSession {
        StoredSession::new(
            "access".into(),
            "refresh".into(),
            expires_in,
            AuthUser {
                id: UserId::new("u-1"),
                email: Some("fan@example.com".into()),
            },
        )
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spotlive").join("session.toml");

        let session = sample(3600);
        session.save(&path).unwrap();

        let loaded = StoredSession::load(&path).unwrap().unwrap();
        assert_eq!(loaded.user, session.user);
        assert_eq!(loaded.refresh_token, "refresh");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[cfg(unix)]
    #[test]
    fn save_tightens_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "stale = true\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        sample(3600).save(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(StoredSession::load(&path).unwrap().unwrap().access_token, "access");
    }

    #[test]
    fn missing_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        assert!(StoredSession::load(&path).unwrap().is_none());
        StoredSession::remove(&path).unwrap();
    }

    #[test]
    fn expiry_includes_margin() {
        assert!(!sample(3600).is_expired());
        assert!(sample(10).is_expired());
        assert!(sample(-1).is_expired());
    }
}
