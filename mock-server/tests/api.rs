use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with, failing_app, Item, MockData, Stylist, TokenBody};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn authed(method: &str, uri: &str, authorization: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, authorization)
        .body(String::new())
        .unwrap()
}

async fn demo_token(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"demo@codicue.app","password":"password"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let token: TokenBody = body_json(resp).await;
    token.access_token
}

// --- stylists ---

#[tokio::test]
async fn list_stylists_empty() {
    let resp = app()
        .oneshot(Request::builder().uri("/stylists").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let stylists: Vec<Stylist> = body_json(resp).await;
    assert!(stylists.is_empty());
}

#[tokio::test]
async fn list_stylists_needs_no_auth() {
    let resp = app_with(MockData::demo())
        .oneshot(Request::builder().uri("/stylists").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let stylists: Vec<Stylist> = body_json(resp).await;
    assert_eq!(stylists.len(), 2);
    assert_eq!(stylists[0].career.len(), 2);
}

#[tokio::test]
async fn failing_app_answers_every_route_with_its_status() {
    let app = failing_app(500);
    for uri in ["/stylists", "/user/items", "/anything"] {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
    }
}

// --- auth ---

#[tokio::test]
async fn login_returns_access_token() {
    let app = app_with(MockData::demo());
    let token = demo_token(&app).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn login_wrong_password_returns_401() {
    let resp = app_with(MockData::demo())
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"demo@codicue.app","password":"nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn user_cannot_use_stylist_login() {
    let resp = app_with(MockData::demo())
        .oneshot(json_request(
            "POST",
            "/auth/stylist/login",
            r#"{"email":"demo@codicue.app","password":"password"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stylist_login_succeeds_for_stylist_account() {
    let resp = app_with(MockData::demo())
        .oneshot(json_request(
            "POST",
            "/auth/stylist/login",
            r#"{"email":"stylist@codicue.app","password":"password"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/auth/login", r#"{"username":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- register ---

#[tokio::test]
async fn register_returns_201_and_token() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/user",
            r#"{"email":"new@codicue.app","password":"pw","name":"Kim","height":"172","weight":"65","preferredStyle":["캐주얼"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let token: TokenBody = body_json(resp).await;
    assert!(!token.access_token.is_empty());
}

#[tokio::test]
async fn register_duplicate_email_returns_409() {
    let resp = app_with(MockData::demo())
        .oneshot(json_request(
            "POST",
            "/user",
            r#"{"email":"demo@codicue.app","password":"pw","name":"Dup"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn registered_user_can_log_in() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/user",
            r#"{"email":"fresh@codicue.app","password":"pw","name":"Lee"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"fresh@codicue.app","password":"pw"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- items ---

#[tokio::test]
async fn list_items_without_token_returns_401() {
    let resp = app_with(MockData::demo())
        .oneshot(Request::builder().uri("/user/items").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_items_with_empty_bearer_returns_401() {
    let resp = app_with(MockData::demo())
        .oneshot(authed("GET", "/user/items", "Bearer "))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_items_returns_callers_items() {
    let app = app_with(MockData::demo());
    let token = demo_token(&app).await;

    let resp = app
        .oneshot(authed("GET", "/user/items", &format!("Bearer {token}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.user_id == 1));
}

#[tokio::test]
async fn list_items_accepts_raw_basic_token() {
    let app = app_with(MockData::demo());
    let token = demo_token(&app).await;

    let resp = app
        .oneshot(authed("GET", "/user/items", &format!("Basic {token}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_item_then_not_found() {
    let app = app_with(MockData::demo());
    let token = demo_token(&app).await;
    let auth = format!("Bearer {token}");

    let resp = app
        .clone()
        .oneshot(authed("DELETE", "/user/items/1", &auth))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app
        .clone()
        .oneshot(authed("DELETE", "/user/items/1", &auth))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(authed("GET", "/user/items", &auth))
        .await
        .unwrap();
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn delete_item_bad_id_returns_400() {
    let app = app_with(MockData::demo());
    let token = demo_token(&app).await;

    let resp = app
        .oneshot(authed("DELETE", "/user/items/not-a-number", &format!("Bearer {token}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
