use crate::account::Endpoints;
use crate::config::OAuthConfig;
use crate::oauth::pkce::{generate_code_challenge, generate_code_verifier, generate_state};

/// One authorization attempt: the URL to send the user agent to, plus the
/// secrets the caller must hold on to until the callback arrives.
pub struct AuthRequest {
    pub url: String,
    pub code_verifier: String,
    pub state: String,
}

/// Mint a fresh verifier/challenge/state triple and build the authorize URL.
///
/// NetSuite validates the query string as a canonical sequence; the parameter
/// order below is the one the provider documents and must not be reshuffled.
pub fn build_auth_request(config: &OAuthConfig, endpoints: &Endpoints) -> AuthRequest {
    let code_verifier = generate_code_verifier();
    let code_challenge = generate_code_challenge(&code_verifier);
    let state = generate_state();

    let url = format!(
        "{}?scope={}&redirect_uri={}&response_type=code&client_id={}&state={}&code_challenge={}&code_challenge_method=S256&prompt=login",
        endpoints.authorize,
        urlencoded(&config.scope),
        urlencoded(&config.redirect_uri),
        urlencoded(&config.client_id),
        state,
        code_challenge,
    );

    AuthRequest {
        url,
        code_verifier,
        state,
    }
}

pub(crate) fn urlencoded(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char);
            }
            _ => {
                result.push('%');
                result.push_str(&format!("{b:02X}"));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;

    fn test_config() -> OAuthConfig {
        OAuthConfig::new(
            "client-123",
            "secret-456",
            "http://localhost:3000/netsuite/callback",
        )
        .unwrap()
    }

    #[test]
    fn auth_url_targets_normalized_account_host() {
        let endpoints = Endpoints::for_account(&AccountId::new("ACME_SANDBOX_1"));
        let auth = build_auth_request(&test_config(), &endpoints);
        assert!(auth.url.starts_with(
            "https://acme-sandbox-1.app.netsuite.com/app/login/oauth2/authorize.nl?"
        ));
    }

    #[test]
    fn query_parameters_in_documented_order() {
        let endpoints = Endpoints::for_account(&AccountId::new("acme"));
        let auth = build_auth_request(&test_config(), &endpoints);
        let query = auth.url.split_once('?').unwrap().1;
        let keys: Vec<&str> = query
            .split('&')
            .map(|p| p.split_once('=').unwrap().0)
            .collect();
        assert_eq!(
            keys,
            vec![
                "scope",
                "redirect_uri",
                "response_type",
                "client_id",
                "state",
                "code_challenge",
                "code_challenge_method",
                "prompt",
            ]
        );
    }

    #[test]
    fn auth_url_fixed_values() {
        let endpoints = Endpoints::for_account(&AccountId::new("acme"));
        let auth = build_auth_request(&test_config(), &endpoints);
        assert!(auth.url.contains("response_type=code"));
        assert!(auth.url.contains("code_challenge_method=S256"));
        assert!(auth.url.ends_with("&prompt=login"));
        assert!(auth.url.contains("scope=rest_webservices"));
    }

    #[test]
    fn auth_url_embeds_challenge_not_verifier() {
        let endpoints = Endpoints::for_account(&AccountId::new("acme"));
        let auth = build_auth_request(&test_config(), &endpoints);
        let challenge = crate::oauth::pkce::generate_code_challenge(&auth.code_verifier);
        assert!(auth.url.contains(&format!("code_challenge={challenge}")));
        assert!(!auth.url.contains(&auth.code_verifier));
    }

    #[test]
    fn auth_url_never_contains_client_secret() {
        let endpoints = Endpoints::for_account(&AccountId::new("acme"));
        let auth = build_auth_request(&test_config(), &endpoints);
        assert!(!auth.url.contains("secret-456"));
    }

    #[test]
    fn redirect_uri_is_percent_encoded() {
        let endpoints = Endpoints::for_account(&AccountId::new("acme"));
        let auth = build_auth_request(&test_config(), &endpoints);
        assert!(auth
            .url
            .contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fnetsuite%2Fcallback"));
    }

    #[test]
    fn each_request_mints_fresh_state() {
        let endpoints = Endpoints::for_account(&AccountId::new("acme"));
        let a = build_auth_request(&test_config(), &endpoints);
        let b = build_auth_request(&test_config(), &endpoints);
        assert_ne!(a.state, b.state);
        assert_ne!(a.code_verifier, b.code_verifier);
    }

    #[test]
    fn urlencoded_passes_unreserved() {
        assert_eq!(urlencoded("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
        assert_eq!(urlencoded("a b"), "a%20b");
        assert_eq!(urlencoded("a/b:c"), "a%2Fb%3Ac");
    }
}
