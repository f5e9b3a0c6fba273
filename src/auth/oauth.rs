//! Credential-gated token acquisition. The provider exchanges the configured
//! client ID and secret for a bearer token using the OAuth client-credentials
//! grant, and keeps the result in the injected [`TokenCache`].
use crate::{
    auth::{region::is_valid_region, EndpointError, InvalidRegion, ProviderConfig, Region},
    sheet::{ConfigStore, Field, Notifier, TokenCache, TOKEN_CACHE_KEY},
};
use core::{error::Error, fmt};
use metrics::counter;
use oauth2::{AccessToken, ClientId, ClientSecret};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

const CLIENT_CREDENTIALS_GRANT: [(&str, &str); 1] = [("grant_type", "client_credentials")];

const CLIENT_DATA_VALID: &str = "Client data is valid.";

/// Errors from a single token exchange.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// A credential is blank in the configuration store.
    #[error("{0} is not set")]
    MissingCredential(Field),
    /// The token endpoint template did not resolve.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    /// The request could not be completed.
    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The endpoint answered with something other than 200.
    #[error("token request rejected with status {0}")]
    Rejected(StatusCode),
    /// The endpoint answered 200 without a usable `access_token`.
    #[error("malformed token response: {0}")]
    MalformedBody(#[source] reqwest::Error),
}

/// Reasons the configured client data is not usable.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The client ID or secret is blank.
    #[error("Battle.net {0} is not set!")]
    MissingCredential(Field),
    /// The region is not one of the supported codes.
    #[error(transparent)]
    InvalidRegion(#[from] InvalidRegion),
    /// The credentials could not be exchanged for a token.
    #[error("Invalid Client ID or Client Secret.")]
    AuthExchangeFailed(#[source] TokenError),
}

/// A client ID and secret read from the configuration store.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The API client ID.
    pub client_id: ClientId,
    /// The API client secret.
    pub client_secret: ClientSecret,
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
}

/// Walk an error's source chain. The reqwest errors we wrap nest the
/// interesting part a few levels down.
pub(crate) fn source_chain(err: &dyn Error) -> String {
    let mut chain = Vec::new();
    let mut current = err;
    while let Some(source) = current.source() {
        chain.push(source.to_string());
        current = source;
    }
    chain.join("\n\n Caused by: \n")
}

/// Gates remote calls behind a credential and region check, and hands out
/// bearer tokens.
///
/// Every collaborator is injected at construction. The provider holds no
/// state of its own beyond its configuration and HTTP client: tokens live in
/// the [`TokenCache`], credentials in the [`ConfigStore`].
///
/// Concurrent callers are not coordinated. Two simultaneous uncached
/// [`TokenProvider::get_token`] calls perform two exchanges, and the last one
/// to finish owns the cache entry.
pub struct TokenProvider {
    config: ProviderConfig,
    store: Arc<dyn ConfigStore>,
    cache: Arc<dyn TokenCache>,
    notifier: Arc<dyn Notifier>,
    client: reqwest::Client,
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    /// Create a provider with its own HTTP client.
    ///
    /// The client does not follow redirects, so credentials are never
    /// forwarded to a host other than the configured token endpoint.
    pub fn new(
        config: ProviderConfig,
        store: Arc<dyn ConfigStore>,
        cache: Arc<dyn TokenCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(
            config,
            store,
            cache,
            notifier,
            builder.build()?,
        ))
    }

    /// Create a provider around an existing HTTP client.
    pub fn with_client(
        config: ProviderConfig,
        store: Arc<dyn ConfigStore>,
        cache: Arc<dyn TokenCache>,
        notifier: Arc<dyn Notifier>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            store,
            cache,
            notifier,
            client,
        }
    }

    /// Get a reference to the provider configuration.
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Get a reference to the configuration store.
    pub fn store(&self) -> &dyn ConfigStore {
        self.store.as_ref()
    }

    /// Get a reference to the HTTP client.
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Returns true if both the client ID and secret are non-blank. The
    /// values themselves are not checked.
    pub fn has_credentials(&self) -> bool {
        !self.store.is_blank(Field::ClientId) && !self.store.is_blank(Field::ClientSecret)
    }

    /// Read the credentials, or the first blank credential field.
    pub fn credentials(&self) -> Result<Credentials, Field> {
        let read = |field| {
            if self.store.is_blank(field) {
                return Err(field);
            }
            self.store.value(field).ok_or(field)
        };

        Ok(Credentials {
            client_id: ClientId::new(read(Field::ClientId)?),
            client_secret: ClientSecret::new(read(Field::ClientSecret)?),
        })
    }

    /// Returns true if `region` is one of the supported region codes.
    pub fn is_valid_region(region: &str) -> bool {
        is_valid_region(region)
    }

    /// Read the cached token, if the cache still holds one.
    pub fn cached_token(&self) -> Option<AccessToken> {
        let token = self
            .cache
            .get(TOKEN_CACHE_KEY)
            .filter(|token| !token.is_empty())?;

        counter!("bnet_data.token.cache_hit").increment(1);
        debug!("using cached oauth token");
        Some(AccessToken::new(token))
    }

    /// Get a bearer token for `region`.
    ///
    /// With `allow_cached`, a cached token is returned as-is and no request
    /// is made. Otherwise, or on a cache miss, the credentials are exchanged
    /// for a new token. Any failure yields `None`, is logged, and leaves the
    /// cache untouched. Failed exchanges are not retried.
    #[instrument(skip(self))]
    pub async fn get_token(&self, region: &str, allow_cached: bool) -> Option<AccessToken> {
        if allow_cached {
            if let Some(token) = self.cached_token() {
                return Some(token);
            }
        }

        let region = match region.parse::<Region>() {
            Ok(region) => region,
            Err(err) => {
                warn!(%err, "not requesting oauth token");
                return None;
            }
        };

        self.fetch_token(region)
            .await
            .inspect_err(|err| {
                let source_chain = source_chain(err);
                warn!(%err, %source_chain, "failed to fetch oauth token");
            })
            .ok()
    }

    /// Exchange the stored credentials for a new token, and cache it.
    ///
    /// The cache is written only when the endpoint answers 200 with an
    /// `access_token`. The entry's lifetime is up to the cache.
    #[instrument(skip_all, fields(region = %region))]
    pub async fn fetch_token(&self, region: Region) -> Result<AccessToken, TokenError> {
        let credentials = self.credentials().map_err(TokenError::MissingCredential)?;
        let url = self.config.endpoints.oauth_token_url(region)?;

        debug!(%url, "requesting oauth token");
        let result = self.exchange(url, &credentials).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(TokenError::Rejected(_)) => "rejected",
            Err(_) => "error",
        };
        counter!("bnet_data.token.exchange", "outcome" => outcome).increment(1);

        let token = result?;
        self.cache.put(TOKEN_CACHE_KEY, token.secret());
        debug!("cached new oauth token");

        Ok(token)
    }

    async fn exchange(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> Result<AccessToken, TokenError> {
        let response = self
            .client
            .post(url)
            .basic_auth(
                credentials.client_id.as_str(),
                Some(credentials.client_secret.secret()),
            )
            .form(&CLIENT_CREDENTIALS_GRANT)
            .send()
            .await
            .map_err(TokenError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TokenError::Rejected(status));
        }

        let body: TokenBody = response.json().await.map_err(TokenError::MalformedBody)?;
        Ok(AccessToken::new(body.access_token))
    }

    /// Check the client data: both credentials present, a supported region,
    /// and a successful fresh token exchange. Checks run in that order and
    /// stop at the first failure, so nothing goes over the network until the
    /// local checks pass.
    pub async fn check(&self, region: &str) -> Result<Region, ValidationError> {
        self.credentials().map_err(ValidationError::MissingCredential)?;
        let region = region.parse::<Region>()?;
        self.fetch_token(region)
            .await
            .map_err(ValidationError::AuthExchangeFailed)?;

        Ok(region)
    }

    /// Boolean form of [`TokenProvider::check`]. With `verbose`, the outcome
    /// is also sent to the notifier, one message per call.
    #[instrument(skip(self))]
    pub async fn validate(&self, region: &str, verbose: bool) -> bool {
        match self.check(region).await {
            Ok(_) => {
                if verbose {
                    self.notifier.alert(CLIENT_DATA_VALID);
                }
                true
            }
            Err(err) => {
                let source_chain = source_chain(&err);
                warn!(%err, %source_chain, "client data validation failed");
                if verbose {
                    self.notifier.alert(&err.to_string());
                }
                false
            }
        }
    }
}
