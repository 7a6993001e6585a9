use reqwest::header::AUTHORIZATION;
use tokio::sync::Mutex;

use crate::account::{AccountId, Endpoints};
use crate::config::OAuthConfig;
use crate::error::SuiteAuthError;
use crate::oauth::authorize::{build_auth_request, AuthRequest};
use crate::oauth::token::{TokenPair, TokenResponse};

/// Per-account OAuth client: authorization URL minting, code exchange,
/// refresh, and revocation against the account's NetSuite hosts.
///
/// One instance per account. The instance owns the single-flight refresh
/// guard, so concurrent refresh calls for the same account coalesce instead
/// of racing the provider's refresh-token rotation.
pub struct TokenManager {
    config: OAuthConfig,
    account: AccountId,
    endpoints: Endpoints,
    http: reqwest::Client,
    refresh_flight: Mutex<Option<CompletedRefresh>>,
}

/// Last refresh that went out on the wire, keyed by the token it consumed.
struct CompletedRefresh {
    consumed: String,
    result: TokenPair,
}

impl TokenManager {
    pub fn new(config: OAuthConfig, account: AccountId) -> Self {
        let endpoints = Endpoints::for_account(&account);
        Self::with_endpoints(config, account, endpoints)
    }

    /// Construct against explicit endpoints. Tests point this at a mock host.
    pub fn with_endpoints(config: OAuthConfig, account: AccountId, endpoints: Endpoints) -> Self {
        Self {
            config,
            account,
            endpoints,
            http: reqwest::Client::new(),
            refresh_flight: Mutex::new(None),
        }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Mint a fresh authorization request for this account. The caller must
    /// hold the returned verifier and state until the callback arrives.
    pub fn authorize_url(&self) -> AuthRequest {
        build_auth_request(&self.config, &self.endpoints)
    }

    /// Exchange an authorization code for a token pair.
    ///
    /// Non-2xx is fatal for this code: authorization codes are single-use and
    /// the provider consumes them regardless of outcome, so there is no retry
    /// here and none should be added by callers.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenPair, SuiteAuthError> {
        tracing::debug!(account = %self.account, "exchanging authorization code");
        let resp = self
            .http
            .post(&self.endpoints.token)
            .header(AUTHORIZATION, self.config.basic_authorization())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code_verifier", code_verifier),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SuiteAuthError::ExchangeFailed { status, body });
        }

        let raw: TokenResponse = resp.json().await?;
        Ok(raw.into_token_pair(None))
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// Single-flight per manager: the call is serialized behind a lock, and
    /// the last completed refresh is memoized keyed by the refresh token that
    /// produced it. A concurrent caller arriving with the same token receives
    /// the memoized pair instead of issuing a second call that would trip
    /// over the provider's rotation of the first.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SuiteAuthError> {
        let mut flight = self.refresh_flight.lock().await;
        if let Some(done) = flight.as_ref() {
            if done.consumed == refresh_token && !done.result.is_expired() {
                tracing::debug!(account = %self.account, "coalescing with completed refresh");
                return Ok(done.result.clone());
            }
        }

        let result = self.refresh_on_wire(refresh_token).await?;
        *flight = Some(CompletedRefresh {
            consumed: refresh_token.to_owned(),
            result: result.clone(),
        });
        Ok(result)
    }

    async fn refresh_on_wire(&self, refresh_token: &str) -> Result<TokenPair, SuiteAuthError> {
        tracing::debug!(account = %self.account, "refreshing access token");
        let resp = self
            .http
            .post(&self.endpoints.token)
            .header(AUTHORIZATION, self.config.basic_authorization())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SuiteAuthError::RefreshFailed { status, body });
        }

        let raw: TokenResponse = resp.json().await?;
        Ok(raw.into_token_pair(Some(refresh_token.to_owned())))
    }

    /// Ask the provider to invalidate a token. Best-effort from the caller's
    /// perspective: local state should be cleared whether or not this
    /// succeeds, but a failure means the token stays valid remotely until
    /// natural expiry, so it is worth logging.
    pub async fn revoke(&self, token: &str) -> Result<(), SuiteAuthError> {
        tracing::debug!(account = %self.account, "revoking token");
        let resp = self
            .http
            .post(&self.endpoints.revoke)
            .header(AUTHORIZATION, self.config.basic_authorization())
            .form(&[("token", token)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SuiteAuthError::RevokeFailed { status, body });
        }
        Ok(())
    }
}
