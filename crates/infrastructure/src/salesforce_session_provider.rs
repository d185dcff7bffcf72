use std::sync::Arc;

use async_trait::async_trait;
use permscope_application::{CrmSession, CrmSessionProvider};
use permscope_core::{AppError, AppResult, CrmIdentity};
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::salesforce_http::{read_json, transport_error};
use crate::salesforce_session::SalesforceSession;

/// Integration credentials for the Salesforce username-password OAuth flow.
#[derive(Debug, Clone)]
pub struct SalesforceConfig {
    /// Login host, e.g. `https://login.salesforce.com`.
    pub login_url: Url,
    /// Integration user login name.
    pub username: String,
    /// Integration user password.
    pub password: String,
    /// Security token appended to the password; may be empty.
    pub security_token: String,
    /// Connected-app consumer key.
    pub client_id: String,
    /// Connected-app consumer secret.
    pub client_secret: String,
    /// REST API version without the `v` prefix, e.g. `59.0`.
    pub api_version: String,
}

impl SalesforceConfig {
    fn password_with_token(&self) -> String {
        format!("{}{}", self.password, self.security_token)
    }

    fn token_url(&self) -> AppResult<Url> {
        self.login_url
            .join("/services/oauth2/token")
            .map_err(|error| AppError::Internal(format!("invalid SALESFORCE_LOGIN_URL: {error}")))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    instance_url: String,
    id: String,
}

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    user_id: String,
    username: String,
}

/// Session provider signing in to Salesforce over the REST OAuth endpoint.
pub struct SalesforceSessionProvider {
    http_client: reqwest::Client,
    config: SalesforceConfig,
}

impl SalesforceSessionProvider {
    /// Creates a new provider.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: SalesforceConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    async fn request_token(&self) -> AppResult<TokenResponse> {
        let password = self.config.password_with_token();
        let form = [
            ("grant_type", "password"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("username", self.config.username.as_str()),
            ("password", password.as_str()),
        ];

        let response = self
            .http_client
            .post(self.config.token_url()?)
            .form(&form)
            .send()
            .await
            .map_err(|error| transport_error("login", error))?;

        read_json(response, "login").await
    }

    async fn fetch_identity(&self, token: &TokenResponse) -> AppResult<CrmIdentity> {
        let response = self
            .http_client
            .get(token.id.as_str())
            .bearer_auth(token.access_token.as_str())
            .send()
            .await
            .map_err(|error| transport_error("identity lookup", error))?;

        let identity: IdentityResponse = read_json(response, "identity lookup").await?;
        Ok(CrmIdentity::new(identity.user_id, identity.username))
    }
}

#[async_trait]
impl CrmSessionProvider for SalesforceSessionProvider {
    async fn authenticate(&self) -> AppResult<Arc<dyn CrmSession>> {
        let token = match self.request_token().await {
            Ok(token) => token,
            Err(error) => {
                warn!(username = %self.config.username, error = %error, "salesforce login failed");
                return Err(error);
            }
        };

        let identity = self.fetch_identity(&token).await?;
        let instance_url = Url::parse(token.instance_url.as_str()).map_err(|error| {
            AppError::Upstream(format!(
                "salesforce returned an invalid instance url '{}': {error}",
                token.instance_url
            ))
        })?;

        info!(
            user_id = %identity.user_id(),
            instance_url = %instance_url,
            "authenticated with salesforce"
        );

        Ok(Arc::new(SalesforceSession::new(
            self.http_client.clone(),
            instance_url,
            self.config.api_version.clone(),
            token.access_token,
            identity,
        )))
    }
}
