//! Verification of user access tokens before a vote is accepted.

mod facebook;

pub use error::AuthError;
pub use facebook::{
    AppAccessToken, DebugToken, DebugTokenResponse, FACEBOOK_APP_INFO_VAR, FacebookAppInfo,
    FacebookVerifier,
};

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum AuthError {
        #[error("HTTP error: {0}")]
        Http(#[from] reqwest::Error),
        #[error("Malformed JSON: {0}")]
        Json(#[from] serde_json::Error),
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("App credentials not found in `{0}`")]
        MissingAppInfo(&'static str),
    }
}

/// Checks that an access token was issued to the given user.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, user_id: &str, access_token: &str) -> Result<bool, AuthError>;
}
