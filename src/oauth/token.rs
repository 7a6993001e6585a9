use serde::{Deserialize, Serialize};

/// Access/refresh token pair as persisted by the caller.
///
/// `expires_at` is absolute; the provider reports relative `expires_in`
/// seconds and the conversion happens once at receipt.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub token_type: String,
}

impl TokenPair {
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now() >= self.expires_at
    }

    /// Seconds until expiry; negative once expired.
    pub fn remaining_secs(&self) -> i64 {
        (self.expires_at - chrono::Utc::now()).num_seconds()
    }

    /// True when remaining lifetime has crossed the proactive-refresh
    /// threshold. Expired tokens always need a refresh.
    pub fn needs_refresh(&self, threshold: std::time::Duration) -> bool {
        self.remaining_secs() <= threshold.as_secs() as i64
    }
}

/// Raw response from the token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
    token_type: String,
}

impl TokenResponse {
    /// Convert to a [`TokenPair`]. A refresh response may omit
    /// `refresh_token` when the provider does not rotate it; in that case the
    /// token that produced this response is carried forward.
    pub(crate) fn into_token_pair(self, carried_refresh: Option<String>) -> TokenPair {
        TokenPair {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(carried_refresh),
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(self.expires_in),
            token_type: self.token_type,
        }
    }
}
