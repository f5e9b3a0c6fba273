//! Validate the client data in the environment and list the realms of the
//! configured region.
//!
//! ```sh
//! BNET_CLIENT_ID=... BNET_CLIENT_SECRET=... BNET_REGION=eu \
//!     RUST_LOG=bnet_data=debug cargo run --example realms
//! ```
use bnet_data::{
    auth::{ProviderConfig, TokenProvider},
    data::{Connection, Population},
    sheet::{Field, MemoryCache, MemoryDropdowns, MemoryStore, TracingNotifier},
    utils::{from_env::FromEnv, init_tracing},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();

    let store = Arc::new(MemoryStore::from_env()?);
    let provider = TokenProvider::new(
        ProviderConfig::from_env()?,
        store,
        Arc::new(MemoryCache::from_env()?),
        Arc::new(TracingNotifier),
    )?;

    let dropdowns = Arc::new(MemoryDropdowns::new());
    let connection = Connection::new(provider, dropdowns.clone());

    if !connection.provider().has_credentials() {
        eyre::bail!("set BNET_CLIENT_ID and BNET_CLIENT_SECRET");
    }

    connection.on_edit(Field::ClientId);
    dbg!(dropdowns.rule(Field::Region));

    match connection.validate_and_populate().await? {
        Population::Realms(realms) => {
            for realm in realms {
                println!("{:>5}  {:<32} {}", realm.id, realm.name, realm.slug);
            }
        }
        other => println!("realm dropdown not populated: {other:?}"),
    }

    Ok(())
}
