use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::{debug, instrument, warn};

use super::{AuthError, TokenVerifier};
use crate::config::TravoteConfig;

/// Environment variable holding the app credentials as a JSON document.
pub const FACEBOOK_APP_INFO_VAR: &str = "TRAVOTE_FACEBOOK_APP_INFO";

/// App credentials, stored as `{"travote_fb_app_id": .., "travote_fb_app_secret": ..}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookAppInfo {
    #[serde(rename = "travote_fb_app_id")]
    pub app_id: String,
    #[serde(rename = "travote_fb_app_secret")]
    pub app_secret: String,
}

impl FacebookAppInfo {
    pub fn from_secret_str(secret: &str) -> Result<Self, AuthError> {
        Ok(serde_json::from_str(secret)?)
    }

    pub fn from_env() -> Result<Self, AuthError> {
        let secret = std::env::var(FACEBOOK_APP_INFO_VAR)
            .map_err(|_| AuthError::MissingAppInfo(FACEBOOK_APP_INFO_VAR))?;
        Self::from_secret_str(&secret)
    }
}

impl fmt::Debug for FacebookAppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacebookAppInfo")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// Response of `GET /oauth/access_token` with `grant_type=client_credentials`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppAccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// Response of `GET /debug_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct DebugTokenResponse {
    pub data: DebugToken,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DebugToken {
    pub is_valid: bool,
    /// Absent for tokens Facebook does not recognise.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl DebugToken {
    pub fn is_valid_for(&self, user_id: &str) -> bool {
        self.is_valid && self.user_id.as_deref() == Some(user_id)
    }
}

/// Verifies user tokens against the Graph API.
///
/// Owns one HTTP client and one Tokio runtime for its whole lifetime; `verify`
/// blocks on the runtime, so it must not be called from inside async code.
pub struct FacebookVerifier {
    client: Client,
    runtime: Runtime,
    graph_api_url: String,
    app: FacebookAppInfo,
}

impl FacebookVerifier {
    pub fn new(app: FacebookAppInfo, config: &TravoteConfig) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        let runtime = Runtime::new()?;
        Ok(Self {
            client,
            runtime,
            graph_api_url: config.graph_api_url.clone(),
            app,
        })
    }

    pub fn from_env(config: &TravoteConfig) -> Result<Self, AuthError> {
        Self::new(FacebookAppInfo::from_env()?, config)
    }

    async fn app_access_token(&self) -> Result<AppAccessToken, AuthError> {
        let url = format!("{}/oauth/access_token", self.graph_api_url);
        let token = self
            .client
            .get(url)
            .query(&[
                ("client_id", self.app.app_id.as_str()),
                ("client_secret", self.app.app_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<AppAccessToken>()
            .await?;
        Ok(token)
    }

    async fn debug_token(
        &self,
        input_token: &str,
        app_token: &AppAccessToken,
    ) -> Result<DebugToken, AuthError> {
        let url = format!("{}/debug_token", self.graph_api_url);
        let response = self
            .client
            .get(url)
            .query(&[
                ("input_token", input_token),
                ("access_token", app_token.access_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<DebugTokenResponse>()
            .await?;
        Ok(response.data)
    }
}

impl TokenVerifier for FacebookVerifier {
    #[instrument(name = "Verify Facebook token", level = "info", skip(self, access_token))]
    fn verify(&self, user_id: &str, access_token: &str) -> Result<bool, AuthError> {
        self.runtime.block_on(async {
            let app_token = self.app_access_token().await?;
            let token = self.debug_token(access_token, &app_token).await?;
            let valid = token.is_valid_for(user_id);
            if valid {
                debug!("Token belongs to user");
            } else {
                warn!(is_valid = token.is_valid, "Token rejected");
            }
            Ok(valid)
        })
    }
}
