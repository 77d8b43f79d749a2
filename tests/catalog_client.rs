//! HTTP behavior of the catalog client against a mock PokeAPI.

use dextui::config::{Config, FanOut};
use dextui::error::CatalogError;
use dextui::fetch::{Catalog, CatalogClient};
use dextui::listing::ListView;
use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::json;

fn client_for(server: &ServerGuard, fan_out: FanOut) -> CatalogClient {
    let config = Config {
        base_url: server.url(),
        fan_out,
        max_concurrency: 2,
        ..Config::default()
    };
    CatalogClient::new(&config).unwrap()
}

fn detail_body(id: u32, name: &str) -> String {
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "base_experience": 64,
        "sprites": {
            "front_default": format!("https://img/{}.png", id),
            "other": { "official-artwork": { "front_default": format!("https://art/{}.png", id) } }
        },
        "types": [{ "slot": 1, "type": { "name": "grass", "url": "" } }],
        "abilities": [],
        "stats": [],
        "species": { "name": name, "url": "" }
    })
    .to_string()
}

async fn mock_list(server: &mut ServerGuard, offset: &str, limit: &str, names: &[&str]) {
    let base = server.url();
    let results: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, n)| json!({ "name": n, "url": format!("{}/pokemon/{}/", base, i + 1) }))
        .collect();
    server
        .mock("GET", "/pokemon")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), offset.into()),
            Matcher::UrlEncoded("limit".into(), limit.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "count": 1302, "next": null, "previous": null, "results": results })
                .to_string(),
        )
        .create_async()
        .await;
}

async fn mock_detail(server: &mut ServerGuard, path: &str, id: u32, name: &str) {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(detail_body(id, name))
        .create_async()
        .await;
}

#[tokio::test]
async fn page_is_enriched_in_list_order() {
    let mut server = Server::new_async().await;
    mock_list(&mut server, "0", "3", &["bulbasaur", "ivysaur", "venusaur"]).await;
    mock_detail(&mut server, "/pokemon/1/", 1, "bulbasaur").await;
    mock_detail(&mut server, "/pokemon/2/", 2, "ivysaur").await;
    mock_detail(&mut server, "/pokemon/3/", 3, "venusaur").await;

    let client = client_for(&server, FanOut::Strict);
    let page = client.fetch_page(0, 3).await.unwrap();

    let names: Vec<&str> = page.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["bulbasaur", "ivysaur", "venusaur"]);
    assert_eq!(page.listed, 3);
    assert_eq!(page.items[1].id, 2);
    assert_eq!(page.items[1].url, format!("{}/pokemon/2", server.url()));
    assert_eq!(page.items[1].image.as_deref(), Some("https://art/2.png"));
}

#[tokio::test]
async fn strict_fan_out_fails_the_page() {
    let mut server = Server::new_async().await;
    mock_list(&mut server, "0", "2", &["bulbasaur", "ivysaur"]).await;
    mock_detail(&mut server, "/pokemon/1/", 1, "bulbasaur").await;
    server
        .mock("GET", "/pokemon/2/")
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server, FanOut::Strict);
    let err = client.fetch_page(0, 2).await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status, .. } if status.as_u16() == 500));
}

#[tokio::test]
async fn lenient_fan_out_skips_failed_entries() {
    let mut server = Server::new_async().await;
    mock_list(&mut server, "0", "3", &["bulbasaur", "ivysaur", "venusaur"]).await;
    mock_detail(&mut server, "/pokemon/1/", 1, "bulbasaur").await;
    server
        .mock("GET", "/pokemon/2/")
        .with_status(404)
        .create_async()
        .await;
    mock_detail(&mut server, "/pokemon/3/", 3, "venusaur").await;

    let client = client_for(&server, FanOut::Lenient);
    let page = client.fetch_page(0, 3).await.unwrap();
    let ids: Vec<u32> = page.items.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(page.listed, 3);
}

#[tokio::test]
async fn skipped_entry_keeps_the_listing_open() {
    let mut server = Server::new_async().await;
    mock_list(&mut server, "0", "3", &["bulbasaur", "ivysaur", "venusaur"]).await;
    mock_detail(&mut server, "/pokemon/1/", 1, "bulbasaur").await;
    server
        .mock("GET", "/pokemon/2/")
        .with_status(500)
        .create_async()
        .await;
    mock_detail(&mut server, "/pokemon/3/", 3, "venusaur").await;

    let client = client_for(&server, FanOut::Lenient);
    let mut list = ListView::new(3);
    assert!(list.load_next(&client).await);

    assert_eq!(list.items().len(), 2);
    assert_eq!(list.cursor(), 3);
    assert!(list.can_load_more());
}

#[tokio::test]
async fn lookup_by_name_is_case_folded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/pokemon/pikachu")
        .with_status(200)
        .with_body(detail_body(25, "pikachu"))
        .create_async()
        .await;

    let client = client_for(&server, FanOut::Strict);
    let detail = client.fetch_by_name(" PiKaChu ").await.unwrap();
    assert_eq!(detail.id, 25);
    mock.assert_async().await;
}

#[tokio::test]
async fn lookup_by_id_reports_malformed_json() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/pokemon/7")
        .with_status(200)
        .with_body("<html>")
        .create_async()
        .await;

    let client = client_for(&server, FanOut::Strict);
    let err = client.fetch_by_id(7).await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode { .. }));
}

#[tokio::test]
async fn sprite_falls_back_when_missing() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/missing.png")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/fallback.png")
        .with_status(200)
        .with_body(b"fallback-bytes".to_vec())
        .create_async()
        .await;

    let client = client_for(&server, FanOut::Strict)
        .with_fallback_sprite(format!("{}/fallback.png", server.url()));
    let bytes = client
        .fetch_sprite(&format!("{}/missing.png", server.url()))
        .await
        .unwrap();
    assert_eq!(bytes, b"fallback-bytes".to_vec());
}
