use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Delegation lifetime requested at login: 7 days in nanoseconds
pub const DEFAULT_MAX_TIME_TO_LIVE_NS: u64 = 7 * 24 * 60 * 60 * 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub principal: String,
    pub identity_provider: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(principal: String, identity_provider: String, max_time_to_live_ns: u64) -> Self {
        let created_at = Utc::now();
        let ttl = Duration::nanoseconds(i64::try_from(max_time_to_live_ns).unwrap_or(i64::MAX));
        let expires_at = created_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            principal,
            identity_provider,
            created_at,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at - Utc::now()
    }

    /// Get hours remaining until expiry (for display)
    pub fn hours_until_expiry(&self) -> i64 {
        self.time_until_expiry().num_hours().max(0)
    }
}

pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load session from disk. Expired sessions are ignored.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            let data: SessionData = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        self.data = None;
        Ok(false)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    pub fn principal(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.principal.as_str())
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.update(SessionData::new(
            "2vxsx-fae".to_string(),
            "https://identity.ic0.app".to_string(),
            DEFAULT_MAX_TIME_TO_LIVE_NS,
        ));
        session.save().unwrap();

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.principal(), Some("2vxsx-fae"));
        assert!(reloaded.is_valid());

        reloaded.clear().unwrap();
        assert!(!reloaded.is_valid());
        assert!(!Session::new(dir.path().to_path_buf()).load().unwrap());
    }

    #[test]
    fn test_expired_session_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = SessionData::new("2vxsx-fae".to_string(), String::new(), 0);
        data.expires_at = Utc::now() - Duration::minutes(1);
        let mut session = Session::new(dir.path().to_path_buf());
        session.update(data);
        session.save().unwrap();

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(!reloaded.load().unwrap());
        assert!(reloaded.data.is_none());
        assert_eq!(reloaded.principal(), None);
    }

    #[test]
    fn test_hours_until_expiry_never_negative() {
        let mut data = SessionData::new(String::new(), String::new(), 0);
        data.expires_at = Utc::now() - Duration::hours(3);
        assert_eq!(data.hours_until_expiry(), 0);
    }

    #[test]
    fn test_default_ttl_is_seven_days() {
        let data = SessionData::new(String::new(), String::new(), DEFAULT_MAX_TIME_TO_LIVE_NS);
        assert!(data.hours_until_expiry() >= 7 * 24 - 1);
        assert!(!data.is_expired());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let data = SessionData::new(String::new(), String::new(), u64::MAX);
        assert!(!data.is_expired());
    }
}
