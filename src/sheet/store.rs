use crate::utils::from_env::{EnvItemInfo, FromEnv, FromEnvErr, FromEnvVar};
use core::fmt;
use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{PoisonError, RwLock},
};

const CLIENT_ID: &str = "BNET_CLIENT_ID";
const CLIENT_SECRET: &str = "BNET_CLIENT_SECRET";
const REGION: &str = "BNET_REGION";
const REALM: &str = "BNET_REALM";

static INVENTORY: [EnvItemInfo; 4] = [
    EnvItemInfo {
        var: CLIENT_ID,
        description: "Battle.net API client ID",
        optional: true,
    },
    EnvItemInfo {
        var: CLIENT_SECRET,
        description: "Battle.net API client secret",
        optional: true,
    },
    EnvItemInfo {
        var: REGION,
        description: "Battle.net region code, one of us, eu, kr, tw, cn",
        optional: true,
    },
    EnvItemInfo {
        var: REALM,
        description: "Selected realm name",
        optional: true,
    },
];

/// A named cell of the connection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The API client ID.
    ClientId,
    /// The API client secret.
    ClientSecret,
    /// The region code.
    Region,
    /// The selected realm.
    Realm,
}

impl Field {
    /// Human-readable label, as shown next to the cell.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ClientId => "Client ID",
            Self::ClientSecret => "Client Secret",
            Self::Region => "Region",
            Self::Realm => "Realm",
        }
    }

    /// Returns true for the two credential fields.
    pub const fn is_credential(&self) -> bool {
        matches!(self, Self::ClientId | Self::ClientSecret)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read access to the externally edited connection configuration.
///
/// Values are owned by whoever edits the configuration. The token provider
/// only ever reads them.
pub trait ConfigStore: Send + Sync {
    /// Get the current value of a field, if any.
    fn value(&self, field: Field) -> Option<String>;

    /// Returns true if the field is missing, empty, or only whitespace.
    fn is_blank(&self, field: Field) -> bool {
        self.value(field).is_none_or(|v| v.trim().is_empty())
    }
}

/// An in-memory [`ConfigStore`]. Edits made through [`MemoryStore::set`] are
/// visible to every holder of the store.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<Field, String>>,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // values include the client secret
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn set(&self, field: Field, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field, value.into());
    }

    /// Remove a field.
    pub fn clear(&self, field: Field) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&field);
    }

    /// Builder-style [`MemoryStore::set`].
    pub fn with(self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

impl ConfigStore for MemoryStore {
    fn value(&self, field: Field) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&field)
            .cloned()
    }
}

impl FromEnv for MemoryStore {
    type Error = Infallible;

    fn inventory() -> Vec<&'static EnvItemInfo> {
        INVENTORY.iter().collect()
    }

    fn from_env() -> Result<Self, FromEnvErr<Self::Error>> {
        let store = Self::new();
        for (field, var) in [
            (Field::ClientId, CLIENT_ID),
            (Field::ClientSecret, CLIENT_SECRET),
            (Field::Region, REGION),
            (Field::Realm, REALM),
        ] {
            if let Some(value) = Option::<String>::from_env_var(var)? {
                store.set(field, value);
            }
        }
        Ok(store)
    }
}
