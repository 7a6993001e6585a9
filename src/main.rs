use clap::{Parser, Subcommand};
use colored::Colorize;

use suiteauth::{AccountId, OAuthConfig, TokenManager};

#[derive(Parser)]
#[command(name = "suiteauth", version, about = "OAuth 2.0 PKCE token lifecycle manager for NetSuite accounts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the browser OAuth flow and cache tokens for an account
    Connect {
        /// NetSuite account id (e.g. 1234567 or ACME_SANDBOX_1)
        account: String,

        /// Callback timeout in milliseconds
        #[arg(long, env = "SUITEAUTH_OAUTH_TIMEOUT_MS")]
        oauth_timeout: Option<u64>,
    },

    /// Show cached token status for an account
    Status {
        /// NetSuite account id
        account: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Refresh the cached access token if it is near expiry
    Refresh {
        /// NetSuite account id
        account: String,

        /// Refresh even if the token is not near expiry
        #[arg(long)]
        force: bool,
    },

    /// Revoke tokens at NetSuite and clear the local cache
    Disconnect {
        /// NetSuite account id
        account: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SUITEAUTH_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error ({}): {e}", e.code());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), suiteauth::SuiteAuthError> {
    match cli.command {
        Commands::Connect {
            account,
            oauth_timeout,
        } => {
            let timeout = std::time::Duration::from_millis(oauth_timeout.unwrap_or(120_000));
            let manager = manager_for(&account)?;
            println!("Opening NetSuite login for '{}'...", manager.account());
            let tokens = suiteauth::oauth::run_connect_flow(&manager, timeout).await?;
            println!(
                "{} Account '{}' connected.",
                "OK".green().bold(),
                manager.account()
            );
            println!("Access token expires in {}s", tokens.remaining_secs());
            Ok(())
        }
        Commands::Status { account, json } => {
            let account = AccountId::new(&account);
            let Some(tokens) = suiteauth::oauth::load_tokens(&account) else {
                return Err(suiteauth::SuiteAuthError::ReauthorizationRequired(
                    account.to_string(),
                ));
            };
            if json {
                let status = serde_json::json!({
                    "account": account.as_str(),
                    "tokenType": tokens.token_type,
                    "expiresAt": tokens.expires_at,
                    "remainingSecs": tokens.remaining_secs(),
                    "expired": tokens.is_expired(),
                    "hasRefreshToken": tokens.refresh_token.is_some(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&status).unwrap_or_default()
                );
            } else if tokens.is_expired() {
                println!(
                    "Account '{}': access token {}",
                    account,
                    "expired".red().bold()
                );
            } else {
                println!(
                    "Account '{}': access token {} ({}s remaining)",
                    account,
                    "valid".green().bold(),
                    tokens.remaining_secs()
                );
            }
            Ok(())
        }
        Commands::Refresh { account, force } => {
            let manager = manager_for(&account)?;
            let threshold = if force {
                // A very large threshold makes any cached token eligible.
                std::time::Duration::from_secs(u32::MAX as u64)
            } else {
                suiteauth::oauth::REFRESH_THRESHOLD
            };
            let tokens = suiteauth::oauth::get_valid_token(&manager, threshold).await?;
            println!(
                "{} Access token for '{}' valid for {}s",
                "OK".green().bold(),
                manager.account(),
                tokens.remaining_secs()
            );
            Ok(())
        }
        Commands::Disconnect { account } => {
            let manager = manager_for(&account)?;
            let revoked = suiteauth::oauth::run_disconnect(&manager).await?;
            if revoked {
                println!(
                    "{} Account '{}' disconnected.",
                    "OK".green().bold(),
                    manager.account()
                );
            } else {
                println!(
                    "{} Local tokens for '{}' cleared, but remote revocation failed; the token stays valid at NetSuite until it expires.",
                    "Warning".yellow().bold(),
                    manager.account()
                );
            }
            Ok(())
        }
    }
}

fn manager_for(account: &str) -> Result<TokenManager, suiteauth::SuiteAuthError> {
    let config = OAuthConfig::from_env()?;
    Ok(TokenManager::new(config, AccountId::new(account)))
}
