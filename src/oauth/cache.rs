use std::path::PathBuf;

use crate::account::AccountId;
use crate::error::SuiteAuthError;
use crate::oauth::token::TokenPair;

fn cache_root() -> PathBuf {
    if let Ok(dir) = std::env::var("SUITEAUTH_HOME") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".suiteauth")
}

pub fn cache_path(account: &AccountId) -> PathBuf {
    cache_root().join(account.as_str()).join("tokens.json")
}

/// Load the cached pair for an account. Missing or unreadable cache files
/// are treated as no tokens.
pub fn load_tokens(account: &AccountId) -> Option<TokenPair> {
    let path = cache_path(account);
    let data = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn save_tokens(account: &AccountId, tokens: &TokenPair) -> Result<(), SuiteAuthError> {
    let path = cache_path(account);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(tokens)
        .map_err(|e| SuiteAuthError::Cache(format!("Failed to serialize tokens: {e}")))?;
    std::fs::write(&path, data)?;
    Ok(())
}

/// Remove the cached pair. Already-absent cache is not an error.
pub fn clear_tokens(account: &AccountId) -> Result<(), SuiteAuthError> {
    let path = cache_path(account);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_path_structure() {
        let path = cache_path(&AccountId::new("ACME_1"));
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("acme-1"));
        assert!(path_str.ends_with("tokens.json"));
    }

    #[test]
    fn cache_path_differs_per_account() {
        assert_ne!(
            cache_path(&AccountId::new("acme-1")),
            cache_path(&AccountId::new("acme-2"))
        );
    }

    #[test]
    fn load_nonexistent_returns_none() {
        assert!(load_tokens(&AccountId::new("no-such-account-zz9")).is_none());
    }
}
