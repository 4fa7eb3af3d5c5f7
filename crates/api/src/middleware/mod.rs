pub mod session_token;

pub use session_token::session_token_middleware;
