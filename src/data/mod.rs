pub(crate) mod connection;
pub use connection::{Connection, Population};

pub(crate) mod realms;
pub use realms::{RealmError, RealmRecord};
