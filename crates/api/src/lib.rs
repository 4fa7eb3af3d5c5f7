pub mod app;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod gql;
pub mod middleware;
pub mod state;
pub mod storage;

pub use state::AppState;
