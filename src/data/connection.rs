use crate::{
    auth::{Region, TokenProvider},
    data::{RealmError, RealmRecord},
    sheet::{DropdownSink, Field, ListRule},
};
use core::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// What a population call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Population {
    /// The dropdown already had a rule and was left alone.
    AlreadyConfigured,
    /// The client data did not validate, nothing was changed.
    NotValidated,
    /// The region dropdown was populated.
    Regions,
    /// The realm dropdown was populated with these realms.
    Realms(Vec<RealmRecord>),
}

/// The connection settings: a [`TokenProvider`] plus the dropdowns that the
/// region and realm lists go to.
///
/// Population is idempotent. A dropdown that already has a rule is never
/// touched again, whatever its rule says.
pub struct Connection {
    provider: TokenProvider,
    dropdowns: Arc<dyn DropdownSink>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Create a new `Connection`.
    pub fn new(provider: TokenProvider, dropdowns: Arc<dyn DropdownSink>) -> Self {
        Self {
            provider,
            dropdowns,
        }
    }

    /// Get a reference to the token provider.
    pub const fn provider(&self) -> &TokenProvider {
        &self.provider
    }

    fn region(&self) -> String {
        self.provider
            .store()
            .value(Field::Region)
            .unwrap_or_default()
    }

    /// Offer the supported regions in the region dropdown.
    pub fn populate_region_dropdown(&self) -> Population {
        if self.dropdowns.is_configured(Field::Region) {
            return Population::AlreadyConfigured;
        }

        self.dropdowns
            .configure(Field::Region, ListRule::strict(Region::ALL.map(|r| r.as_str())));
        debug!("populated region dropdown");
        Population::Regions
    }

    /// Offer the stored region's realms in the realm dropdown.
    ///
    /// Validates the client data quietly first. A failed listing leaves the
    /// dropdown unconfigured, so the next call tries again.
    #[instrument(skip(self))]
    pub async fn populate_realm_dropdown(&self) -> Result<Population, RealmError> {
        if self.dropdowns.is_configured(Field::Realm) {
            return Ok(Population::AlreadyConfigured);
        }

        let region = self.region();
        if !self.provider.validate(&region, false).await {
            return Ok(Population::NotValidated);
        }

        self.populate_realms(&region).await
    }

    /// Validate the client data, reporting the outcome through the notifier,
    /// then populate the realm dropdown. Performs a single token exchange.
    #[instrument(skip(self))]
    pub async fn validate_and_populate(&self) -> Result<Population, RealmError> {
        let region = self.region();
        let valid = self.provider.validate(&region, true).await;

        if self.dropdowns.is_configured(Field::Realm) {
            return Ok(Population::AlreadyConfigured);
        }
        if !valid {
            return Ok(Population::NotValidated);
        }

        self.populate_realms(&region).await
    }

    /// Handle an edit to a configuration field. Once both credentials are
    /// filled in, the region dropdown is populated. Edits to other fields are
    /// ignored.
    pub fn on_edit(&self, field: Field) -> Option<Population> {
        if !field.is_credential() || !self.provider.has_credentials() {
            return None;
        }
        Some(self.populate_region_dropdown())
    }

    async fn populate_realms(&self, region: &str) -> Result<Population, RealmError> {
        let realms = self.provider.list_realms(region).await?;

        self.dropdowns.configure(
            Field::Realm,
            ListRule::strict(realms.iter().map(|realm| realm.name.clone())),
        );
        info!(count = realms.len(), region, "populated realm dropdown");

        Ok(Population::Realms(realms))
    }
}
