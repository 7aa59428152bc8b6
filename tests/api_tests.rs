use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use cinedex::config::{AdminConfig, Config, TelegramConfig, TmdbConfig};
use cinedex::models::content::ContentKind;
use cinedex::services::ContentPayload;
use cinedex::state::AppState;

/// base64("admin:secret")
const ADMIN_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

async fn spawn_app() -> (Arc<AppState>, Router) {
    let mut config = Config {
        database_url: "sqlite::memory:".to_string(),
        admin: AdminConfig {
            username: "admin".to_string(),
            password: "secret".to_string(),
        },
        tmdb: TmdbConfig {
            api_key: "test-key".to_string(),
            // Unroutable on purpose; metadata lookups must fail fast.
            base_url: "http://127.0.0.1:1".to_string(),
        },
        telegram: TelegramConfig::default(),
        ..Config::default()
    };
    // A single connection keeps every query on the same in-memory database.
    config.server.max_db_connections = 1;
    config.server.min_db_connections = 1;

    let state = AppState::new(config)
        .await
        .expect("failed to create app state");
    let router = cinedex::api::router(state.clone());
    (state, router)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn admin_request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, ADMIN_AUTH);

    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, json: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

fn movie_payload(title: &str) -> ContentPayload {
    ContentPayload {
        title: title.to_string(),
        kind: ContentKind::Movie,
        ..ContentPayload::default()
    }
}

#[tokio::test]
async fn test_admin_routes_require_basic_auth() {
    let (_state, app) = spawn_app().await;

    let response = get(&app, "/admin/dashboard").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("Basic"))
    );

    // base64("admin:wrong")
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/dashboard")
                .header(header::AUTHORIZATION, "Basic YWRtaW46d3Jvbmc=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = admin_request(&app, "GET", "/admin/dashboard", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["stats"]["total_content"], 0);
}

#[tokio::test]
async fn test_create_content_and_view_counting() {
    let (_state, app) = spawn_app().await;

    let response = admin_request(
        &app,
        "POST",
        "/admin/content",
        Some(serde_json::json!({
            "title": "Iron Man",
            "kind": "movie",
            "overview": "A billionaire builds a suit.",
            "links": [
                { "quality": "720p", "watch_url": "https://example.com/watch" }
            ]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["links"]["kind"], "movie");

    // Each detail view bumps the counter exactly once.
    for expected in 1..=3 {
        let response = get(&app, &format!("/movie/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["content"]["view_count"], expected);
        assert_eq!(json["data"]["content"]["title"], "Iron Man");
    }
}

#[tokio::test]
async fn test_detail_rejects_unknown_and_malformed_ids() {
    let (_state, app) = spawn_app().await;

    let response = get(&app, "/movie/99999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/movie/not-a-number").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_title_rejected() {
    let (_state, app) = spawn_app().await;

    let response = admin_request(
        &app,
        "POST",
        "/admin/content",
        Some(serde_json::json!({ "title": "   ", "kind": "movie" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_pagination_boundaries() {
    let (state, app) = spawn_app().await;

    for i in 0..45 {
        state
            .admin
            .create(&movie_payload(&format!("Movie {i:02}")))
            .await
            .unwrap();
    }

    let response = get(&app, "/movies").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 20);
    assert_eq!(json["data"]["pagination"]["total_count"], 45);
    assert_eq!(json["data"]["pagination"]["total_pages"], 3);

    let response = get(&app, "/movies?page=3").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(json["data"]["pagination"]["page"], 3);

    // Past the end is an empty page, not an error.
    let response = get(&app, "/movies?page=4").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn test_huge_page_number_is_an_empty_page() {
    let (state, app) = spawn_app().await;

    for i in 0..3 {
        state
            .admin
            .create(&movie_payload(&format!("Movie {i}")))
            .await
            .unwrap();
    }

    // The largest possible page must neither overflow the offset math nor
    // wrap around to the first page.
    let response = get(&app, "/movies?page=18446744073709551615").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["pagination"]["total_count"], 3);
    assert_eq!(json["data"]["pagination"]["total_pages"], 1);

    let response = get(&app, "/movies?page=9223372036854775809").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_search_matches_substring_case_insensitively() {
    let (state, app) = spawn_app().await;

    for title in ["Iron Man", "IRONY", "Batman"] {
        state.admin.create(&movie_payload(title)).await.unwrap();
    }

    let response = get(&app, "/?q=iron").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();

    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Iron Man"));
    assert!(titles.contains(&"IRONY"));
}

#[tokio::test]
async fn test_home_feed_orders_sections_and_skips_empty_ones() {
    let (state, app) = spawn_app().await;

    state
        .admin
        .create(&ContentPayload {
            categories: vec!["Trending".to_string()],
            ..movie_payload("Hot Movie")
        })
        .await
        .unwrap();
    state
        .admin
        .create(&ContentPayload {
            categories: vec!["Action".to_string()],
            ..movie_payload("Punchy Movie")
        })
        .await
        .unwrap();

    let response = get(&app, "/").await;
    let json = body_json(response).await;

    assert!(!json["data"]["recent"].as_array().unwrap().is_empty());

    let sections = json["data"]["sections"].as_array().unwrap();
    let names: Vec<&str> = sections
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();

    // Trending leads; seeded-but-empty categories never appear.
    assert_eq!(names, vec!["Trending", "Action"]);
}

#[tokio::test]
async fn test_kind_switch_replaces_link_shape() {
    let (_state, app) = spawn_app().await;

    let response = admin_request(
        &app,
        "POST",
        "/admin/content",
        Some(serde_json::json!({
            "title": "Dark",
            "kind": "movie",
            "links": [{ "quality": "1080p", "download_url": "https://example.com/d" }]
        })),
    )
    .await;
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["links"]["links"].as_array().unwrap().len(), 1);

    let response = admin_request(
        &app,
        "PUT",
        &format!("/admin/content/{id}"),
        Some(serde_json::json!({
            "title": "Dark",
            "kind": "series",
            "episodes": [
                { "season": 1, "episode_number": 1, "watch_link": "https://example.com/e1" }
            ]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["links"]["kind"], "series");
    assert_eq!(
        json["data"]["links"]["episodes"].as_array().unwrap().len(),
        1
    );
    // The movie shape is gone, not merely emptied.
    assert!(json["data"]["links"].get("links").is_none());

    let response = get(&app, &format!("/movie/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"]["links"]["kind"], "series");
}

#[tokio::test]
async fn test_category_references_survive_category_deletion() {
    let (state, app) = spawn_app().await;

    let response = admin_request(
        &app,
        "POST",
        "/admin/categories",
        Some(serde_json::json!({ "name": "Featured" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    state
        .admin
        .create(&ContentPayload {
            categories: vec!["Featured".to_string()],
            ..movie_payload("Spotlight")
        })
        .await
        .unwrap();

    let response = get(&app, "/category?name=Featured").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);

    let response = admin_request(&app, "GET", "/admin/dashboard", None).await;
    let json = body_json(response).await;
    let category_id = json["data"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Featured")
        .and_then(|c| c["id"].as_i64())
        .unwrap();

    let response = admin_request(
        &app,
        "DELETE",
        &format!("/admin/categories/{category_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The record keeps its reference and still matches the name filter.
    let response = get(&app, "/category?name=Featured").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reserved_category_names_filter_by_kind() {
    let (state, app) = spawn_app().await;

    state.admin.create(&movie_payload("Solo Movie")).await.unwrap();
    state
        .admin
        .create(&ContentPayload {
            kind: ContentKind::Series,
            ..movie_payload("Solo Series")
        })
        .await
        .unwrap();

    let response = get(&app, "/category?name=Latest%20Movies").await;
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Solo Movie");

    let response = get(&app, "/category?name=Latest%20Series").await;
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Solo Series");

    let response = get(&app, "/category").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_malformed_ids_are_not_found() {
    let (_state, app) = spawn_app().await;

    let response = admin_request(&app, "DELETE", "/admin/content/not-a-number", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = admin_request(&app, "DELETE", "/admin/categories/xyz", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = admin_request(
        &app,
        "PUT",
        "/admin/requests/xyz/status",
        Some(serde_json::json!({ "status": "Fulfilled" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = admin_request(&app, "DELETE", "/admin/requests/xyz", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_lifecycle() {
    let (_state, app) = spawn_app().await;

    let response = post_json(&app, "/request", serde_json::json!({ "name": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/request",
        serde_json::json!({ "name": "Tenet", "info": "2020, English" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let id = json["data"].as_i64().unwrap();

    let response = admin_request(&app, "GET", "/admin/dashboard", None).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["stats"]["pending_requests"], 1);
    assert_eq!(json["data"]["requests"][0]["status"], "Pending");

    let response = admin_request(
        &app,
        "PUT",
        &format!("/admin/requests/{id}/status"),
        Some(serde_json::json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = admin_request(
        &app,
        "PUT",
        &format!("/admin/requests/{id}/status"),
        Some(serde_json::json!({ "status": "Fulfilled" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = admin_request(&app, "DELETE", &format!("/admin/requests/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = admin_request(&app, "DELETE", &format!("/admin/requests/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wait_resolves_target_url() {
    let (_state, app) = spawn_app().await;

    let response = get(&app, "/wait?target=https%3A%2F%2Fexample.com%2Ffile").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["target_url"], "https://example.com/file");

    let response = get(&app, "/wait").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quick_search_caps_results() {
    let (state, app) = spawn_app().await;

    for i in 0..12 {
        state
            .admin
            .create(&movie_payload(&format!("Show {i:02}")))
            .await
            .unwrap();
    }

    let response = get(&app, "/api/search?q=Show").await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert!(items[0].get("id").is_some());
    assert!(items[0].get("poster").is_some());

    // A blank query is an empty result, not an error.
    let response = get(&app, "/api/search").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_survives_metadata_outage() {
    let (_state, app) = spawn_app().await;

    // The TMDB base URL is unroutable; enrichment must degrade silently.
    let response = admin_request(
        &app,
        "POST",
        "/admin/content",
        Some(serde_json::json!({
            "title": "Offline Movie",
            "kind": "movie",
            "tmdb_id": "1726"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Offline Movie");
    assert_eq!(json["data"]["tmdb_id"], "1726");
    assert!(json["data"]["release_date"].is_null());
}

#[tokio::test]
async fn test_bulk_delete_reports_removed_count() {
    let (state, app) = spawn_app().await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let created = state
            .admin
            .create(&movie_payload(&format!("Doomed {i}")))
            .await
            .unwrap();
        ids.push(created.id);
    }

    let response = admin_request(
        &app,
        "POST",
        "/admin/content/bulk-delete",
        Some(serde_json::json!({ "ids": [ids[0], ids[1], 99999] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], 2);

    let response = admin_request(&app, "GET", "/admin/dashboard", None).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["stats"]["total_content"], 1);
}

#[tokio::test]
async fn test_ad_settings_round_trip() {
    let (_state, app) = spawn_app().await;

    let response = admin_request(
        &app,
        "PUT",
        "/admin/ads",
        Some(serde_json::json!({
            "ad_header": "<script>header()</script>",
            "ad_detail_page": "<div>detail</div>"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = admin_request(&app, "GET", "/admin/dashboard", None).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["ads"]["ad_header"], "<script>header()</script>");
    assert_eq!(json["data"]["ads"]["ad_detail_page"], "<div>detail</div>");
    assert!(json["data"]["ads"]["ad_footer"].is_null());
}
