mod common;

use bnet_data::{
    data::{Population, RealmError},
    sheet::{DropdownSink, Field, ListRule},
};
use common::{mock_any_token, mock_realms, mock_token, Connected, Harness};

async fn connected() -> Connected {
    Harness::new().await.connect()
}

fn realm_names() -> ListRule {
    ListRule::strict(["Lightbringer", "Proudmoore", "Area 52"])
}

#[tokio::test]
async fn region_dropdown_is_populated_once() {
    let c = connected().await;

    assert_eq!(c.connection.populate_region_dropdown(), Population::Regions);
    assert_eq!(
        c.dropdowns.rule(Field::Region),
        Some(ListRule {
            values: ["us", "eu", "kr", "tw", "cn"].map(String::from).to_vec(),
            allow_invalid: false,
        })
    );

    assert_eq!(
        c.connection.populate_region_dropdown(),
        Population::AlreadyConfigured
    );
}

#[tokio::test]
async fn reset_region_dropdown_is_populated_again() {
    let c = connected().await;
    assert_eq!(c.connection.populate_region_dropdown(), Population::Regions);

    c.dropdowns.reset(Field::Region);
    assert!(!c.dropdowns.is_configured(Field::Region));

    assert_eq!(c.connection.populate_region_dropdown(), Population::Regions);
    assert!(c.dropdowns.is_configured(Field::Region));
}

#[tokio::test]
async fn existing_region_rule_is_kept() {
    let c = connected().await;
    let custom = ListRule::strict(["eu"]);
    c.dropdowns.configure(Field::Region, custom.clone());

    assert_eq!(
        c.connection.populate_region_dropdown(),
        Population::AlreadyConfigured
    );
    assert_eq!(c.dropdowns.rule(Field::Region), Some(custom));
}

#[tokio::test]
async fn credential_edits_populate_regions() {
    let c = connected().await;

    assert_eq!(c.connection.on_edit(Field::Region), None);
    assert_eq!(c.connection.on_edit(Field::Realm), None);
    assert!(!c.dropdowns.is_configured(Field::Region));

    c.store.clear(Field::ClientSecret);
    assert_eq!(c.connection.on_edit(Field::ClientId), None);
    assert!(!c.dropdowns.is_configured(Field::Region));

    c.store.set(Field::ClientSecret, "filled in");
    c.store.clear(Field::ClientId);
    assert!(!c.connection.provider().has_credentials());
    assert_eq!(c.connection.on_edit(Field::ClientSecret), None);
    c.store.set(Field::ClientId, "  ");
    assert_eq!(c.connection.on_edit(Field::ClientId), None);
    assert!(!c.dropdowns.is_configured(Field::Region));

    c.store.set(Field::ClientId, "filled in too");
    assert_eq!(
        c.connection.on_edit(Field::ClientSecret),
        Some(Population::Regions)
    );
    assert_eq!(
        c.connection.on_edit(Field::ClientId),
        Some(Population::AlreadyConfigured)
    );
}

#[tokio::test]
async fn realm_dropdown_is_populated_once() {
    let mut c = connected().await;
    let token = mock_token(&mut c.server, 200, r#"{"access_token":"abc123"}"#, 1).await;
    let realms = mock_realms(&mut c.server, "abc123", 200, 1).await;

    let population = c.connection.populate_realm_dropdown().await.unwrap();
    let Population::Realms(records) = &population else {
        panic!("expected realms, got {population:?}");
    };
    assert_eq!(records.len(), 3);
    assert_eq!(c.dropdowns.rule(Field::Realm), Some(realm_names()));

    assert_eq!(
        c.connection.populate_realm_dropdown().await.unwrap(),
        Population::AlreadyConfigured
    );

    token.assert_async().await;
    realms.assert_async().await;
    // quiet validation
    assert!(c.notifier.messages().is_empty());
}

#[tokio::test]
async fn realm_dropdown_needs_valid_client_data() {
    let mut c = connected().await;
    let token = mock_token(&mut c.server, 401, "", 1).await;
    let realms = mock_realms(&mut c.server, "abc123", 200, 0).await;

    assert_eq!(
        c.connection.populate_realm_dropdown().await.unwrap(),
        Population::NotValidated
    );

    c.store.set(Field::Region, "zz");
    assert_eq!(
        c.connection.populate_realm_dropdown().await.unwrap(),
        Population::NotValidated
    );

    token.assert_async().await;
    realms.assert_async().await;
    assert!(!c.dropdowns.is_configured(Field::Realm));
}

#[tokio::test]
async fn failed_listing_leaves_dropdown_unset() {
    let mut c = connected().await;
    let token = mock_token(&mut c.server, 200, r#"{"access_token":"abc123"}"#, 1).await;
    let realms = mock_realms(&mut c.server, "abc123", 503, 1).await;

    let err = c.connection.populate_realm_dropdown().await.unwrap_err();

    token.assert_async().await;
    realms.assert_async().await;
    assert!(matches!(err, RealmError::Rejected(status) if status.as_u16() == 503));
    assert!(!c.dropdowns.is_configured(Field::Realm));
}

#[tokio::test]
async fn validate_and_populate_reports_once() {
    let mut c = connected().await;
    let token = mock_token(&mut c.server, 200, r#"{"access_token":"abc123"}"#, 1).await;
    let realms = mock_realms(&mut c.server, "abc123", 200, 1).await;

    let population = c.connection.validate_and_populate().await.unwrap();

    token.assert_async().await;
    realms.assert_async().await;
    assert!(matches!(population, Population::Realms(ref records) if records.len() == 3));
    assert_eq!(c.dropdowns.rule(Field::Realm), Some(realm_names()));
    assert_eq!(
        c.notifier.messages(),
        vec!["Client data is valid.".to_owned()]
    );
}

#[tokio::test]
async fn validate_and_populate_with_bad_region() {
    let mut c = connected().await;
    let token = mock_any_token(&mut c.server).await;
    c.store.set(Field::Region, "moon");

    assert_eq!(
        c.connection.validate_and_populate().await.unwrap(),
        Population::NotValidated
    );

    token.assert_async().await;
    assert!(!c.dropdowns.is_configured(Field::Realm));
    let messages = c.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("us, eu, kr, tw, cn"));
}

#[tokio::test]
async fn validate_and_populate_keeps_existing_realms() {
    let mut c = connected().await;
    let token = mock_token(&mut c.server, 200, r#"{"access_token":"abc123"}"#, 1).await;
    let realms = mock_realms(&mut c.server, "abc123", 200, 0).await;
    c.dropdowns
        .configure(Field::Realm, ListRule::strict(["Somewhere"]));

    assert_eq!(
        c.connection.validate_and_populate().await.unwrap(),
        Population::AlreadyConfigured
    );

    token.assert_async().await;
    realms.assert_async().await;
    assert_eq!(
        c.notifier.messages(),
        vec!["Client data is valid.".to_owned()]
    );
}
