use anyhow::{Context, Result};
use forms_client::TokenPair;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Tokens plus the idle clock, persisted between invocations so consecutive
/// commands stay signed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub tokens: TokenPair,
    pub last_activity_unix: u64,
}

impl StoredSession {
    pub fn new(tokens: TokenPair) -> Self {
        Self {
            tokens,
            last_activity_unix: now_unix(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity_unix = now_unix();
    }

    pub fn idle_expired(&self, idle_timeout_secs: u64) -> bool {
        self.idle_expired_at(now_unix(), idle_timeout_secs)
    }

    fn idle_expired_at(&self, now: u64, idle_timeout_secs: u64) -> bool {
        now.saturating_sub(self.last_activity_unix) >= idle_timeout_secs
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

pub fn default_path() -> Result<PathBuf> {
    Ok(crate::config::config_dir()?.join("session.json"))
}

pub fn load(path: &Path) -> Result<Option<StoredSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let stored = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(stored))
}

pub fn save(path: &Path, stored: &StoredSession) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(stored)?;
    std::fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
}

pub fn delete(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
    }
    Ok(())
}
