use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use permscope_application::EmptyPermissionPolicy;
use permscope_core::AppError;
use permscope_infrastructure::SalesforceConfig;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub salesforce: SalesforceConfig,
    pub crm_http_timeout: Duration,
    pub empty_permission_policy: EmptyPermissionPolicy,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_owned());
        let api_port = parsed_env("PORT", 3000_u16)?;

        let login_url = env::var("SALESFORCE_LOGIN_URL")
            .unwrap_or_else(|_| "https://login.salesforce.com".to_owned());
        let login_url = Url::parse(login_url.as_str()).map_err(|error| {
            AppError::Validation(format!("invalid SALESFORCE_LOGIN_URL: {error}"))
        })?;

        let salesforce = SalesforceConfig {
            login_url,
            username: required_non_empty_env("SALESFORCE_USERNAME")?,
            password: required_env("SALESFORCE_PASSWORD")?,
            security_token: env::var("SALESFORCE_TOKEN").unwrap_or_default(),
            client_id: required_non_empty_env("SALESFORCE_CLIENT_ID")?,
            client_secret: required_non_empty_env("SALESFORCE_CLIENT_SECRET")?,
            api_version: env::var("SALESFORCE_API_VERSION")
                .unwrap_or_else(|_| "59.0".to_owned()),
        };

        let crm_http_timeout = Duration::from_secs(parsed_env("CRM_HTTP_TIMEOUT_SECS", 30_u64)?);
        let empty_permission_policy =
            EmptyPermissionPolicy::from_drop_flag(parsed_env("PERMISSIONS_DROP_EMPTY", false)?);

        Ok(Self {
            api_host,
            api_port,
            salesforce,
            crm_http_timeout,
            empty_permission_policy,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parsed_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        _ => Ok(default),
    }
}
