use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Shared bearer-token slot. Cloned handles see the same tokens, so a refresh
/// performed by one in-flight request is visible to every queued one.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<TokenPair>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pair: TokenPair) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = Some(pair);
        }
    }

    pub fn get(&self) -> Option<TokenPair> {
        self.inner.read().ok().and_then(|slot| slot.clone())
    }

    pub fn access(&self) -> Option<String> {
        self.get().map(|pair| pair.access)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get().map(|pair| pair.refresh)
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = None;
        }
    }
}
