use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

const ADMIN_KEY: &str = "pwd";

async fn app(tag: &str) -> (Router, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "museion-routes-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let db = museion::db::spawn(&database_url).await;

    // Keep test behavior stable regardless of the repo's runtime `config.toml`.
    let mut cfg = museion::config::Config::default();
    cfg.basic.admin_key = ADMIN_KEY.to_string();
    db.seed(cfg.catalog.templates.clone())
        .await
        .expect("bootstrap seed succeeds");

    let admin_key: Arc<str> = Arc::from(cfg.basic.admin_key.clone());
    let state = museion::server::router::MuseionState::new(db, admin_key);
    (museion::server::router::museion_router(state), temp_path)
}

fn cleanup(db_path: &Path) {
    for suffix in ["-wal", "-shm", ""] {
        let _ = std::fs::remove_file(format!("{}{suffix}", db_path.display()));
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

fn admin(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-museion-key", ADMIN_KEY)
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

#[tokio::test]
async fn update_route_serves_deltas_and_rejects_bad_revisions() {
    let (app, db_path) = app("update").await;

    // Never-synced client: no revision parameter.
    let (status, body) = send(&app, get("/update")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "exhibits": [],
            "exhibit_sections": [],
            "resources": [],
            "events": [],
            "information": [],
            "revision": 0
        })
    );

    for bad in ["/update?revision=-1", "/update?revision=abc", "/update?revision=1.5"] {
        let (status, body) = send(&app, get(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    let (status, body) = send(
        &app,
        admin(
            "POST",
            "/admin/entities",
            &json!({ "type": "exhibit", "data": { "name": "Mammoth", "text": "Ice age giant" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "exhibit");
    assert_eq!(body["revision"], 1);

    let (status, body) = send(&app, get("/update?revision=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revision"], 1);
    let exhibits = body["exhibits"].as_array().expect("exhibits array");
    assert_eq!(exhibits.len(), 1);
    assert_eq!(exhibits[0]["name"], "Mammoth");
    assert_eq!(exhibits[0]["exhibitSectionID"], 1);
    assert_eq!(exhibits[0]["revision"], 1);

    let (status, body) = send(&app, get("/update?revision=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exhibits"], json!([]));
    assert_eq!(body["revision"], 1);

    let (status, body) = send(&app, get("/revision")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "revision": 1 }));

    cleanup(&db_path);
}

#[tokio::test]
async fn viewcontrollers_route_lists_templates() {
    let (app, db_path) = app("catalog").await;

    let (status, body) = send(&app, get("/viewcontrollers")).await;
    assert_eq!(status, StatusCode::OK);
    let vcs = body["view_controllers"].as_array().expect("array");
    assert_eq!(vcs.len(), 1);
    assert_eq!(vcs[0]["name"], "ExhibitTextViewController");
    assert_eq!(vcs[0]["segueID"], "toExhibitTextViewController");
    assert_eq!(vcs[0]["revision"], 0);

    let (status, body) = send(&app, get("/viewcontrollers?revision=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view_controllers"], json!([]));

    let (status, _) = send(&app, get("/viewcontrollers?revision=-3")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/no-such-route")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup(&db_path);
}

#[tokio::test]
async fn admin_routes_require_the_key() {
    let (app, db_path) = app("auth").await;
    let body = json!({ "type": "media_resource", "data": { "url": "a.jpg" } });

    let unkeyed = Request::builder()
        .method("POST")
        .uri("/admin/entities")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request");
    let (status, _) = send(&app, unkeyed).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = Request::builder()
        .method("POST")
        .uri("/admin/entities")
        .header("content-type", "application/json")
        .header("authorization", "Bearer nope")
        .body(Body::from(body.to_string()))
        .expect("failed to build request");
    let (status, _) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing was written by the rejected calls.
    let (_, revision) = send(&app, get("/revision")).await;
    assert_eq!(revision["revision"], 0);

    let bearer = Request::builder()
        .method("POST")
        .uri("/admin/entities")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {ADMIN_KEY}"))
        .body(Body::from(body.to_string()))
        .expect("failed to build request");
    let (status, _) = send(&app, bearer).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        get(&format!("/admin/entities/media_resource/2?key={ADMIN_KEY}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "media_resource");
    assert_eq!(body["data"]["url"], "a.jpg");

    cleanup(&db_path);
}

#[tokio::test]
async fn admin_writes_map_failures_to_status_codes() {
    let (app, db_path) = app("admin-errors").await;

    // Dangling reference => 409, counter untouched.
    let (status, body) = send(
        &app,
        admin(
            "POST",
            "/admin/entities",
            &json!({ "type": "exhibit", "data": { "name": "Ghost", "exhibitSectionID": 99 } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONSTRAINT_VIOLATION");
    assert_eq!(body["error"]["details"]["constraint"], "foreign_key");

    // Blank required text => 400 before the store is touched.
    let (status, _) = send(
        &app,
        admin(
            "POST",
            "/admin/entities",
            &json!({ "type": "media_resource", "data": { "url": "  " } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        admin("POST", "/admin/entities", &json!({ "type": "gallery", "data": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Patching a missing row => 404.
    let (status, body) = send(
        &app,
        admin(
            "PATCH",
            "/admin/entities",
            &json!({ "type": "exhibit", "data": { "id": 4242, "patch": { "name": "Nobody" } } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, revision) = send(&app, get("/revision")).await;
    assert_eq!(revision["revision"], 0);

    // Lookups: unknown kind => 400, missing id => null.
    let (status, body) = send(&app, admin("GET", "/admin/entities/gallery/1", &Value::Null)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "UNKNOWN_KIND");

    let (status, body) = send(&app, admin("GET", "/admin/entities/exhibit/77", &Value::Null)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    cleanup(&db_path);
}

#[tokio::test]
async fn import_route_commits_one_revision() {
    let (app, db_path) = app("import").await;

    let records = json!([
        { "kind": "Exhibit", "fields": ["", "Mammoth", "", "10", "1", "30"] },
        { "kind": "ExhibitSection", "fields": ["10", "Ice Age"] },
        { "kind": "MediaResource", "fields": ["30", "mammoth.jpg"] }
    ]);
    let (status, body) = send(&app, admin("POST", "/admin/import", &records)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "revision": 1, "count": 3 }));

    let (_, delta) = send(&app, get("/update?revision=0")).await;
    assert_eq!(delta["revision"], 1);
    assert_eq!(delta["exhibits"].as_array().map(Vec::len), Some(1));
    assert_eq!(delta["exhibit_sections"].as_array().map(Vec::len), Some(1));
    assert_eq!(delta["resources"].as_array().map(Vec::len), Some(1));

    // Malformed batches are rejected before anything is written.
    let (status, _) = send(
        &app,
        admin("POST", "/admin/import", &json!({ "kind": "exhibit" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(
        &app,
        admin("POST", "/admin/import", &json!([{ "kind": "media_resource", "fields": ["x"] }])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Same URL again => unique violation, batch rolled back.
    let (status, _) = send(
        &app,
        admin(
            "POST",
            "/admin/import",
            &json!([{ "kind": "media_resource", "fields": ["", "mammoth.jpg"] }]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, revision) = send(&app, get("/revision")).await;
    assert_eq!(revision["revision"], 1);

    cleanup(&db_path);
}
