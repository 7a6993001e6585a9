#[derive(Debug, thiserror::Error)]
pub enum SuiteAuthError {
    #[error("Missing configuration value '{0}'. Set it in the environment before connecting.")]
    MissingConfig(&'static str),

    #[error("State returned by the provider does not match the value sent. Restart the connect flow for '{0}'.")]
    StateMismatch(String),

    #[error("Authorization was denied by the provider: {0}")]
    AuthorizationDenied(String),

    #[error("Token exchange failed with status {status}: {body}")]
    ExchangeFailed { status: u16, body: String },

    #[error("Token refresh failed with status {status}: {body}")]
    RefreshFailed { status: u16, body: String },

    #[error("Token revocation failed with status {status}: {body}")]
    RevokeFailed { status: u16, body: String },

    #[error("Account '{0}' has no usable tokens. Run: suiteauth connect {0}")]
    ReauthorizationRequired(String),

    #[error("Timed out waiting for the OAuth callback after {0}s")]
    CallbackTimeout(u64),

    #[error("OAuth callback error: {0}")]
    CallbackError(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token cache error: {0}")]
    Cache(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SuiteAuthError {
    /// Error code string for structured output and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            SuiteAuthError::MissingConfig(_) => "missing_config",
            SuiteAuthError::StateMismatch(_) => "state_mismatch",
            SuiteAuthError::AuthorizationDenied(_) => "authorization_denied",
            SuiteAuthError::ExchangeFailed { .. } => "exchange_failed",
            SuiteAuthError::RefreshFailed { .. } => "refresh_failed",
            SuiteAuthError::RevokeFailed { .. } => "revoke_failed",
            SuiteAuthError::ReauthorizationRequired(_) => "reauthorization_required",
            SuiteAuthError::CallbackTimeout(_) => "callback_timeout",
            SuiteAuthError::CallbackError(_) => "callback_error",
            SuiteAuthError::Http(_) => "http_error",
            SuiteAuthError::Cache(_) => "cache_error",
            SuiteAuthError::Io(_) => "io_error",
        }
    }

    /// True when the only way forward is a fresh connect flow.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            SuiteAuthError::StateMismatch(_)
                | SuiteAuthError::ExchangeFailed { .. }
                | SuiteAuthError::RefreshFailed { .. }
                | SuiteAuthError::ReauthorizationRequired(_)
        )
    }
}
