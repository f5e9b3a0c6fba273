use crate::{
    auth::Region,
    utils::from_env::{EnvItemInfo, FromEnv, FromEnvErr, FromEnvVar},
};
use core::num;
use std::time::Duration;
use url::Url;

// Environment variable names for configuration
const LOCALE: &str = "BNET_LOCALE";
const OAUTH_TOKEN_URL: &str = "BNET_OAUTH_TOKEN_URL";
const REALM_INDEX_URL: &str = "BNET_REALM_INDEX_URL";
const REQUEST_TIMEOUT: &str = "BNET_REQUEST_TIMEOUT";

/// The locale requested when none is configured.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Token endpoint template. `{region}` is replaced with the region code.
pub const DEFAULT_OAUTH_TOKEN_URL: &str = "https://{region}.battle.net/oauth/token";

/// Realm index template. `{region}` is replaced with the region code.
pub const DEFAULT_REALM_INDEX_URL: &str =
    "https://{region}.api.blizzard.com/data/wow/realm/index";

const REGION_PLACEHOLDER: &str = "{region}";

static INVENTORY: [EnvItemInfo; 4] = [
    EnvItemInfo {
        var: LOCALE,
        description: "Locale sent with data API requests. Defaults to en_US",
        optional: true,
    },
    EnvItemInfo {
        var: OAUTH_TOKEN_URL,
        description: "OAuth token endpoint template, {region} is substituted",
        optional: true,
    },
    EnvItemInfo {
        var: REALM_INDEX_URL,
        description: "Realm index endpoint template, {region} is substituted",
        optional: true,
    },
    EnvItemInfo {
        var: REQUEST_TIMEOUT,
        description: "Per-request timeout in milliseconds",
        optional: true,
    },
];

/// Possible errors when loading the provider configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfigError {
    /// Error reading the request timeout.
    #[error("error reading request timeout: {0}")]
    RequestTimeout(num::ParseIntError),
}

/// A templated endpoint that did not produce a valid URL.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid endpoint {url:?}: {source}")]
pub struct EndpointError {
    /// The URL after region substitution.
    pub url: String,
    /// The parse failure.
    pub source: url::ParseError,
}

/// Endpoint templates for the OAuth and data APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    oauth_token: String,
    realm_index: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            oauth_token: DEFAULT_OAUTH_TOKEN_URL.to_owned(),
            realm_index: DEFAULT_REALM_INDEX_URL.to_owned(),
        }
    }
}

impl Endpoints {
    /// Create endpoints from templates. A template without a `{region}`
    /// placeholder resolves to the same URL for every region.
    pub fn new(oauth_token: impl Into<String>, realm_index: impl Into<String>) -> Self {
        Self {
            oauth_token: oauth_token.into(),
            realm_index: realm_index.into(),
        }
    }

    /// The token endpoint for a region.
    pub fn oauth_token_url(&self, region: Region) -> Result<Url, EndpointError> {
        resolve(&self.oauth_token, region)
    }

    /// The realm index endpoint for a region.
    pub fn realm_index_url(&self, region: Region) -> Result<Url, EndpointError> {
        resolve(&self.realm_index, region)
    }
}

fn resolve(template: &str, region: Region) -> Result<Url, EndpointError> {
    let url = template.replace(REGION_PLACEHOLDER, region.as_str());
    Url::parse(&url).map_err(|source| EndpointError { url, source })
}

/// Configuration for the [`TokenProvider`].
///
/// Credentials are not part of this struct. They are read from the
/// [`ConfigStore`] on every call, so edits take effect immediately.
///
/// [`TokenProvider`]: crate::auth::TokenProvider
/// [`ConfigStore`]: crate::sheet::ConfigStore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Sent as the `Locale` header on data API calls.
    pub locale: String,
    /// Endpoint templates.
    pub endpoints: Endpoints,
    /// Per-request timeout. `None` uses the HTTP client's default.
    pub request_timeout: Option<Duration>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_owned(),
            endpoints: Endpoints::default(),
            request_timeout: None,
        }
    }
}

impl ProviderConfig {
    /// Replace the endpoint templates.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

impl FromEnv for ProviderConfig {
    type Error = ProviderConfigError;

    fn inventory() -> Vec<&'static EnvItemInfo> {
        INVENTORY.iter().collect()
    }

    fn from_env() -> Result<Self, FromEnvErr<Self::Error>> {
        let defaults = Self::default();

        let locale = Option::<String>::from_env_var(LOCALE)
            .map_err(FromEnvErr::infallible_into::<Self::Error>)?
            .unwrap_or(defaults.locale);
        let oauth_token = Option::<String>::from_env_var(OAUTH_TOKEN_URL)
            .map_err(FromEnvErr::infallible_into::<Self::Error>)?
            .unwrap_or(defaults.endpoints.oauth_token);
        let realm_index = Option::<String>::from_env_var(REALM_INDEX_URL)
            .map_err(FromEnvErr::infallible_into::<Self::Error>)?
            .unwrap_or(defaults.endpoints.realm_index);
        let request_timeout = Option::<Duration>::from_env_var(REQUEST_TIMEOUT)
            .map_err(|e| e.map(ProviderConfigError::RequestTimeout))?;

        Ok(Self {
            locale,
            endpoints: Endpoints::new(oauth_token, realm_index),
            request_timeout,
        })
    }
}
