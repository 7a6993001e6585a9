pub mod account;
pub mod config;
pub mod error;
pub mod oauth;

pub use account::{AccountId, Endpoints};
pub use config::OAuthConfig;
pub use error::SuiteAuthError;
pub use oauth::{TokenManager, TokenPair};

/// One-shot convenience function: return a usable access token for an
/// account using environment credentials, refreshing proactively if needed.
pub async fn access_token(account: &str) -> Result<String, SuiteAuthError> {
    let config = OAuthConfig::from_env()?;
    let manager = TokenManager::new(config, AccountId::new(account));
    let tokens = oauth::get_valid_token(&manager, oauth::REFRESH_THRESHOLD).await?;
    Ok(tokens.access_token)
}
