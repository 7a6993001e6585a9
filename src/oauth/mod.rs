pub mod authorize;
pub mod cache;
pub mod callback;
pub mod flow;
pub mod manager;
pub mod pkce;
pub mod token;

pub use authorize::{build_auth_request, AuthRequest};
pub use cache::{cache_path, clear_tokens, load_tokens, save_tokens};
pub use callback::{CallbackListener, CallbackParams};
pub use flow::{get_valid_token, run_connect_flow, run_disconnect, REFRESH_THRESHOLD};
pub use manager::TokenManager;
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state};
pub use token::TokenPair;
