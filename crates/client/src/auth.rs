use crate::error::Result;
use crate::http::ApiClient;
use crate::tokens::TokenPair;
use forms_protocol::{UserProfile, UserWire};
use serde::Deserialize;

#[derive(Deserialize)]
struct TokenResponse {
    access: String,
    refresh: String,
}

impl ApiClient {
    /// Exchange credentials for a token pair and load the profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let granted: TokenResponse = self
            .post_json(
                "/auth/token/",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await?;
        self.tokens().set(TokenPair {
            access: granted.access,
            refresh: granted.refresh,
        });
        self.me().await
    }

    pub async fn me(&self) -> Result<UserProfile> {
        let wire: UserWire = self.get_json("/users/me/", &[]).await?;
        Ok(UserProfile::from(wire))
    }

    pub fn logout(&self) {
        self.tokens().clear();
    }
}
