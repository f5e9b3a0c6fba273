//! Credential-gated access to the Battle.net game data API.
//!
//! The crate centers on the [`TokenProvider`], which checks that client
//! credentials are present and the region is supported before exchanging
//! the credentials for a bearer token via the OAuth client-credentials
//! grant. Tokens are kept in an injected [`TokenCache`] under a fixed key and
//! reused until the cache expires them.
//!
//! Everything the provider touches outside of the network is injected:
//!
//! - [`ConfigStore`] - where the client ID, secret and region live.
//! - [`TokenCache`] - owns token expiry.
//! - [`Notifier`] - receives human-readable validation messages.
//! - [`DropdownSink`] - receives the region and realm value lists.
//!
//! The [`Connection`] type ties these together into the "validate, then
//! populate the dropdowns" flow.
//!
//! [`TokenProvider`]: auth::TokenProvider
//! [`TokenCache`]: sheet::TokenCache
//! [`ConfigStore`]: sheet::ConfigStore
//! [`Notifier`]: sheet::Notifier
//! [`DropdownSink`]: sheet::DropdownSink
//! [`Connection`]: data::Connection
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

/// Token acquisition, region whitelist and provider configuration.
pub mod auth;

/// Realm listing and dropdown population.
pub mod data;

/// Interfaces to the spreadsheet-side collaborators, with in-memory
/// implementations.
pub mod sheet;

/// Utilities for loading configuration and initializing tracing.
pub mod utils;

/// Re-exports of common dependencies.
pub mod deps {
    pub use metrics;
    pub use oauth2;
    pub use reqwest;
    pub use tracing;
    pub use tracing_subscriber;
    pub use url;
}
