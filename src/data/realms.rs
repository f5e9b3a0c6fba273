use crate::auth::{oauth::source_chain, EndpointError, InvalidRegion, Region, TokenProvider};
use metrics::counter;
use oauth2::AccessToken;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

const NAMESPACE_HEADER: &str = "Battlenet-Namespace";
const LOCALE_HEADER: &str = "Locale";

/// A realm, as listed by the realm index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RealmRecord {
    /// Numeric realm ID.
    pub id: u64,
    /// Display name, in the requested locale.
    pub name: String,
    /// URL-safe realm identifier.
    pub slug: String,
}

#[derive(Deserialize)]
struct RealmIndex {
    realms: Vec<RealmRecord>,
}

/// Errors listing realms.
#[derive(Debug, thiserror::Error)]
pub enum RealmError {
    /// The region is not one of the supported codes.
    #[error(transparent)]
    InvalidRegion(#[from] InvalidRegion),
    /// No token could be obtained.
    #[error("no oauth token available")]
    Unauthenticated,
    /// The realm index template did not resolve.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    /// The request could not be completed.
    #[error("realm index request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The endpoint answered with something other than 200.
    #[error("realm index request rejected with status {0}")]
    Rejected(StatusCode),
    /// The endpoint answered 200 without a `realms` list.
    #[error("malformed realm index: {0}")]
    MalformedBody(#[source] reqwest::Error),
}

impl TokenProvider {
    /// List the realms of a region, in the order the API returns them.
    ///
    /// Uses the cached token when there is one, so a token that the API has
    /// already revoked shows up here as [`RealmError::Rejected`].
    ///
    /// Every call is counted, including those that fail before a request is
    /// sent.
    #[instrument(skip(self))]
    pub async fn list_realms(&self, region: &str) -> Result<Vec<RealmRecord>, RealmError> {
        let result = self.request_realms(region).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!("bnet_data.realms.fetch", "outcome" => outcome).increment(1);

        result.inspect_err(|err| {
            let source_chain = source_chain(err);
            warn!(%err, %source_chain, "failed to list realms");
        })
    }

    async fn request_realms(&self, region: &str) -> Result<Vec<RealmRecord>, RealmError> {
        let region = region.parse::<Region>()?;
        let url = self.config().endpoints.realm_index_url(region)?;
        let token = self
            .get_token(region.as_str(), true)
            .await
            .ok_or(RealmError::Unauthenticated)?;

        self.fetch_realm_index(url, region, &token).await
    }

    async fn fetch_realm_index(
        &self,
        url: Url,
        region: Region,
        token: &AccessToken,
    ) -> Result<Vec<RealmRecord>, RealmError> {
        debug!(%url, "requesting realm index");

        let response = self
            .client()
            .get(url)
            .bearer_auth(token.secret())
            .header(NAMESPACE_HEADER, region.dynamic_namespace())
            .header(LOCALE_HEADER, &self.config().locale)
            .send()
            .await
            .map_err(RealmError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RealmError::Rejected(status));
        }

        let index: RealmIndex = response.json().await.map_err(RealmError::MalformedBody)?;
        debug!(count = index.realms.len(), "received realm index");

        Ok(index.realms)
    }
}
