use crate::tokens::TokenStore;
use forms_protocol::UserProfile;
use std::time::{Duration, Instant};

/// Session lifecycle. There is no ambient singleton: the session is built
/// once at startup and passed to whatever needs identity or role.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated(UserProfile),
    Expired,
}

/// Explicit session object owning the idle clock. Any recorded activity
/// resets the clock; once the idle period elapses all local credentials are
/// cleared and the state flips to `Expired`.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    idle_timeout: Duration,
    last_activity: Instant,
}

impl Session {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            state: SessionState::Anonymous,
            idle_timeout,
            last_activity: Instant::now(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.state {
            SessionState::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.state, SessionState::Expired)
    }

    pub fn begin_login(&mut self) {
        self.state = SessionState::Authenticating;
        self.touch();
    }

    pub fn complete_login(&mut self, profile: UserProfile) {
        self.state = SessionState::Authenticated(profile);
        self.touch();
    }

    pub fn fail_login(&mut self) {
        self.state = SessionState::Anonymous;
    }

    /// Record user activity, resetting the idle clock.
    pub fn touch(&mut self) {
        self.touch_at(Instant::now());
    }

    pub fn touch_at(&mut self, now: Instant) {
        self.last_activity = now;
    }

    /// Expire the session if the idle period has elapsed, clearing tokens.
    /// Returns true when the session expired on this call.
    pub fn expire_if_idle(&mut self, tokens: &TokenStore) -> bool {
        self.expire_if_idle_at(Instant::now(), tokens)
    }

    pub fn expire_if_idle_at(&mut self, now: Instant, tokens: &TokenStore) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        if now.duration_since(self.last_activity) < self.idle_timeout {
            return false;
        }
        self.expire(tokens);
        true
    }

    /// Forced logout: drop credentials and mark the session expired.
    pub fn expire(&mut self, tokens: &TokenStore) {
        tokens.clear();
        self.state = SessionState::Expired;
    }

    pub fn logout(&mut self, tokens: &TokenStore) {
        tokens.clear();
        self.state = SessionState::Anonymous;
    }
}
