#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine};
use bnet_data::{
    auth::{Endpoints, ProviderConfig, TokenProvider},
    data::Connection,
    sheet::{Field, MemoryCache, MemoryDropdowns, MemoryStore, Notifier},
};
use mockito::{Matcher, Mock, ServerGuard};
use std::sync::{Arc, Mutex};

pub const CLIENT_ID: &str = "my-client";
pub const CLIENT_SECRET: &str = "my-secret";

pub const REALMS_BODY: &str = r#"{
    "_links": { "self": { "href": "https://us.api.blizzard.com/data/wow/realm/?namespace=dynamic-us" } },
    "realms": [
        { "key": { "href": "https://us.api.blizzard.com/data/wow/realm/1" }, "name": "Lightbringer", "id": 1, "slug": "lightbringer" },
        { "key": { "href": "https://us.api.blizzard.com/data/wow/realm/5" }, "name": "Proudmoore", "id": 5, "slug": "proudmoore" },
        { "key": { "href": "https://us.api.blizzard.com/data/wow/realm/3" }, "name": "Area 52", "id": 3, "slug": "area-52" }
    ]
}"#;

/// Collects every alert in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier(Mutex<Vec<String>>);

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_owned());
    }
}

/// A provider wired to a mock server, with `us` credentials filled in.
pub struct Harness {
    pub server: ServerGuard,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub notifier: Arc<RecordingNotifier>,
    pub provider: TokenProvider,
}

impl Harness {
    pub async fn new() -> Self {
        let server = mockito::Server::new_async().await;

        let store = Arc::new(
            MemoryStore::new()
                .with(Field::ClientId, CLIENT_ID)
                .with(Field::ClientSecret, CLIENT_SECRET)
                .with(Field::Region, "us"),
        );
        let cache = Arc::new(MemoryCache::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let endpoints = Endpoints::new(
            format!("{}/{{region}}/oauth/token", server.url()),
            format!("{}/{{region}}/data/wow/realm/index", server.url()),
        );
        let provider = TokenProvider::new(
            ProviderConfig::default().with_endpoints(endpoints),
            store.clone(),
            cache.clone(),
            notifier.clone(),
        )
        .unwrap();

        Self {
            server,
            store,
            cache,
            notifier,
            provider,
        }
    }

    /// Hand the provider to a [`Connection`] with empty dropdowns.
    pub fn connect(self) -> Connected {
        let dropdowns = Arc::new(MemoryDropdowns::new());
        Connected {
            server: self.server,
            store: self.store,
            notifier: self.notifier,
            connection: Connection::new(self.provider, dropdowns.clone()),
            dropdowns,
        }
    }

    pub async fn mock_token(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        mock_token(&mut self.server, status, body, hits).await
    }

    pub async fn mock_realms(&mut self, token: &str, status: usize, hits: usize) -> Mock {
        mock_realms(&mut self.server, token, status, hits).await
    }

    pub async fn mock_any_token(&mut self) -> Mock {
        mock_any_token(&mut self.server).await
    }
}

/// A [`Harness`] whose provider now lives in a [`Connection`].
pub struct Connected {
    pub server: ServerGuard,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub connection: Connection,
    pub dropdowns: Arc<MemoryDropdowns>,
}

/// Mock the `us` token endpoint, matching the basic auth header and the
/// client-credentials form body.
pub async fn mock_token(
    server: &mut ServerGuard,
    status: usize,
    body: &str,
    hits: usize,
) -> Mock {
    server
        .mock("POST", "/us/oauth/token")
        .match_header("authorization", basic_auth().as_str())
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "client_credentials".into(),
        ))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

/// Mock the `us` realm index, matching the bearer token and the namespace
/// and locale headers.
pub async fn mock_realms(
    server: &mut ServerGuard,
    token: &str,
    status: usize,
    hits: usize,
) -> Mock {
    server
        .mock("GET", "/us/data/wow/realm/index")
        .match_header("authorization", format!("Bearer {token}").as_str())
        .match_header("battlenet-namespace", "dynamic-us")
        .match_header("locale", "en_US")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(REALMS_BODY)
        .expect(hits)
        .create_async()
        .await
}

/// Any POST at all. Used to assert that no token request was sent.
pub async fn mock_any_token(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await
}

pub fn basic_auth() -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}"))
    )
}
