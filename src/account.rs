use std::fmt;

/// Normalized NetSuite account identifier.
///
/// NetSuite account ids as shown in the UI use underscores and uppercase
/// (`ACME_SANDBOX_1`), but the account-specific hostnames use hyphens and
/// lowercase (`acme-sandbox-1`). Normalization happens once here so every
/// derived endpoint resolves the same host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().replace('_', "-").to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved OAuth endpoint URLs for one account.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorize: String,
    pub token: String,
    pub revoke: String,
}

const AUTHORIZE_PATH: &str = "/app/login/oauth2/authorize.nl";
const TOKEN_PATH: &str = "/services/rest/auth/oauth2/v1/token";
const REVOKE_PATH: &str = "/services/rest/auth/oauth2/v1/revoke";

impl Endpoints {
    /// Production NetSuite hosts for the account.
    pub fn for_account(account: &AccountId) -> Self {
        let app = format!("https://{}.app.netsuite.com", account.as_str());
        let api = format!("https://{}.suitetalk.api.netsuite.com", account.as_str());
        Self {
            authorize: format!("{app}{AUTHORIZE_PATH}"),
            token: format!("{api}{TOKEN_PATH}"),
            revoke: format!("{api}{REVOKE_PATH}"),
        }
    }

    /// All three endpoints on a single base URL. Used against mock servers.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorize: format!("{base}{AUTHORIZE_PATH}"),
            token: format!("{base}{TOKEN_PATH}"),
            revoke: format!("{base}{REVOKE_PATH}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_underscores_and_case() {
        let account = AccountId::new("ACME_SANDBOX_1");
        assert_eq!(account.as_str(), "acme-sandbox-1");
    }

    #[test]
    fn already_normalized_id_unchanged() {
        let account = AccountId::new("1234567");
        assert_eq!(account.as_str(), "1234567");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let account = AccountId::new("  TSTDRV123 ");
        assert_eq!(account.as_str(), "tstdrv123");
    }

    #[test]
    fn production_endpoints_embed_normalized_account() {
        let endpoints = Endpoints::for_account(&AccountId::new("ACME_SANDBOX_1"));
        assert_eq!(
            endpoints.authorize,
            "https://acme-sandbox-1.app.netsuite.com/app/login/oauth2/authorize.nl"
        );
        assert_eq!(
            endpoints.token,
            "https://acme-sandbox-1.suitetalk.api.netsuite.com/services/rest/auth/oauth2/v1/token"
        );
        assert_eq!(
            endpoints.revoke,
            "https://acme-sandbox-1.suitetalk.api.netsuite.com/services/rest/auth/oauth2/v1/revoke"
        );
    }

    #[test]
    fn with_base_strips_trailing_slash() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:9999/");
        assert_eq!(
            endpoints.token,
            "http://127.0.0.1:9999/services/rest/auth/oauth2/v1/token"
        );
        assert_eq!(
            endpoints.revoke,
            "http://127.0.0.1:9999/services/rest/auth/oauth2/v1/revoke"
        );
    }
}
