use std::time::Duration;

use crate::error::SuiteAuthError;
use crate::oauth::cache::{clear_tokens, load_tokens, save_tokens};
use crate::oauth::callback::CallbackListener;
use crate::oauth::manager::TokenManager;
use crate::oauth::token::TokenPair;

/// Refresh once remaining access-token lifetime drops below this.
pub const REFRESH_THRESHOLD: Duration = Duration::from_secs(300);

/// Run the full browser connect flow: mint an authorization request, send
/// the user agent to it, wait for the redirect, validate state, exchange the
/// code, and cache the resulting pair.
pub async fn run_connect_flow(
    manager: &TokenManager,
    timeout: Duration,
) -> Result<TokenPair, SuiteAuthError> {
    let auth = manager.authorize_url();

    // Bind before opening the browser so the redirect cannot beat the listener.
    let port = callback_port(manager.redirect_uri())?;
    let listener = CallbackListener::bind(port).await?;

    if webbrowser::open(&auth.url).is_err() {
        tracing::warn!("Could not open browser automatically. Please visit:\n{}", auth.url);
    }

    let params = listener.accept(timeout).await?;

    // State is set once at redirect and compared exactly once here.
    if params.state.as_deref() != Some(auth.state.as_str()) {
        tracing::warn!(account = %manager.account(), "state mismatch on OAuth callback");
        return Err(SuiteAuthError::StateMismatch(
            manager.account().to_string(),
        ));
    }

    let tokens = manager.exchange_code(&params.code, &auth.code_verifier).await?;
    save_tokens(manager.account(), &tokens)?;
    tracing::info!(account = %manager.account(), "account connected");
    Ok(tokens)
}

/// Return a usable token pair for the account, refreshing proactively when
/// the cached access token is within `threshold` of expiry.
///
/// A failed refresh is terminal for the session: it is reported as
/// `ReauthorizationRequired` and never retried here, since retrying a
/// rejected refresh token cannot succeed.
pub async fn get_valid_token(
    manager: &TokenManager,
    threshold: Duration,
) -> Result<TokenPair, SuiteAuthError> {
    let Some(tokens) = load_tokens(manager.account()) else {
        return Err(SuiteAuthError::ReauthorizationRequired(
            manager.account().to_string(),
        ));
    };

    if !tokens.needs_refresh(threshold) {
        return Ok(tokens);
    }

    let Some(refresh_token) = tokens.refresh_token.clone() else {
        return Err(SuiteAuthError::ReauthorizationRequired(
            manager.account().to_string(),
        ));
    };

    match manager.refresh(&refresh_token).await {
        Ok(new_tokens) => {
            save_tokens(manager.account(), &new_tokens)?;
            Ok(new_tokens)
        }
        Err(e) => {
            tracing::warn!(
                account = %manager.account(),
                code = e.code(),
                error = %e,
                "token refresh failed; re-authorization required"
            );
            Err(SuiteAuthError::ReauthorizationRequired(
                manager.account().to_string(),
            ))
        }
    }
}

/// Disconnect the account: revoke the refresh token (or the access token if
/// no refresh token exists) and clear the local cache.
///
/// Local state always wins over remote confirmation: the cache is cleared
/// even when the revoke call fails. Returns whether the remote revoke
/// succeeded so callers can report a token left valid at the provider.
pub async fn run_disconnect(manager: &TokenManager) -> Result<bool, SuiteAuthError> {
    let Some(tokens) = load_tokens(manager.account()) else {
        return Ok(true);
    };

    let target = tokens
        .refresh_token
        .as_deref()
        .unwrap_or(tokens.access_token.as_str());

    let revoked = match manager.revoke(target).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                account = %manager.account(),
                code = e.code(),
                error = %e,
                "revoke failed; token remains valid at provider until expiry"
            );
            false
        }
    };

    clear_tokens(manager.account())?;
    tracing::info!(account = %manager.account(), revoked, "account disconnected");
    Ok(revoked)
}

fn callback_port(redirect_uri: &str) -> Result<u16, SuiteAuthError> {
    let rest = redirect_uri
        .strip_prefix("http://")
        .or_else(|| redirect_uri.strip_prefix("https://"))
        .ok_or_else(|| bad_redirect(redirect_uri))?;
    let authority = rest.split('/').next().unwrap_or_default();
    let port_str = authority
        .rsplit_once(':')
        .map(|(_, p)| p)
        .ok_or_else(|| bad_redirect(redirect_uri))?;
    port_str.parse().map_err(|_| bad_redirect(redirect_uri))
}

fn bad_redirect(redirect_uri: &str) -> SuiteAuthError {
    SuiteAuthError::CallbackError(format!(
        "Redirect URI '{redirect_uri}' must be a loopback URL with an explicit port"
    ))
}
