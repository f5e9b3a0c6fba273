pub(crate) mod config;
pub use config::{
    EndpointError, Endpoints, ProviderConfig, ProviderConfigError, DEFAULT_LOCALE,
    DEFAULT_OAUTH_TOKEN_URL, DEFAULT_REALM_INDEX_URL,
};

pub(crate) mod oauth;
pub use oauth::{Credentials, TokenError, TokenProvider, ValidationError};

pub(crate) mod region;
pub use region::{allowed_regions, is_valid_region, InvalidRegion, Region};
