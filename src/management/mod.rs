mod auth;
mod credentials;

pub use auth::TokenManager;
pub use credentials::CredentialsManager;
