use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use serde_json::{Value, json};
use todo_backend::service::TodoService;
use todo_backend::store::MemoryStore;
use todo_backend::{Router, middleware, transport};

type App = Router<std::sync::Arc<dyn todo_backend::service::Service>>;

fn app() -> App {
    let svc = TodoService::new(MemoryStore::new(), "http://host").shared();
    transport::make_router(middleware::logging()(svc))
}

async fn call(app: &App, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = http::Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_owned())))
        .unwrap();
    let res = app.handle(req).await;
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

// --- list ---

#[tokio::test]
async fn list_on_empty_store_is_an_empty_array() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/todos", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_is_sorted_by_order() {
    let app = app();
    for order in [3, 1, 2] {
        call(&app, Method::POST, "/todos", &json!({ "order": order }).to_string()).await;
    }
    let (_, body) = call(&app, Method::GET, "/todos", "").await;
    let orders: Vec<i64> = body.as_array().unwrap().iter().map(|t| t["order"].as_i64().unwrap()).collect();
    assert_eq!(orders, [1, 2, 3]);
}

#[tokio::test]
async fn list_json_content_type() {
    let app = app();
    let req = http::Request::builder().uri("/todos").body(Full::<Bytes>::default()).unwrap();
    let res = app.handle(req).await;
    assert_eq!(res.headers()[CONTENT_TYPE], "application/json; charset=utf-8");
}

// --- create ---

#[tokio::test]
async fn create_applies_defaults() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/todos", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": 1, "title": "", "completed": false, "order": 0, "url": "http://host/1" })
    );
}

#[tokio::test]
async fn create_ignores_client_id_and_url() {
    let app = app();
    let (_, body) = call(&app, Method::POST, "/todos", r#"{"id":99,"url":"x","title":"a"}"#).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["url"], "http://host/1");
}

#[tokio::test]
async fn create_with_malformed_json_is_500() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/todos", "{nope").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("malformed request body"));
}

#[tokio::test]
async fn array_bodies_are_rejected() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/todos", "[]").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("malformed request body"));

    let (status, _) = call(&app, Method::POST, "/todos", r#"[5,"x",true,7]"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    call(&app, Method::POST, "/todos", r#"{"title":"a"}"#).await;
    let (status, _) = call(&app, Method::PATCH, "/todos/1", r#"[null,"x"]"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = call(&app, Method::GET, "/todos", "").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "a");
}

// --- get ---

#[tokio::test]
async fn get_after_create_has_url() {
    let app = app();
    call(&app, Method::POST, "/todos", r#"{"title":"a"}"#).await;
    let (status, body) = call(&app, Method::GET, "/todos/1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "http://host/1");
}

#[tokio::test]
async fn get_missing_is_404() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/todos/42", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not found" }));
}

#[tokio::test]
async fn non_integer_id_is_500() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/todos/abc", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

// --- update ---

#[tokio::test]
async fn patch_keeps_unset_fields() {
    let app = app();
    call(&app, Method::POST, "/todos", r#"{"title":"a","completed":true,"order":5}"#).await;
    let (status, body) = call(&app, Method::PATCH, "/todos/1", r#"{"title":"x"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": 1, "title": "x", "completed": true, "order": 5, "url": "http://host/1" })
    );
}

#[tokio::test]
async fn patch_with_mismatched_body_id_is_400() {
    let app = app();
    call(&app, Method::POST, "/todos", "{}").await;
    let (status, body) = call(&app, Method::PATCH, "/todos/1", r#"{"id":2}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "inconsistent IDs" }));
}

#[tokio::test]
async fn patch_missing_is_404() {
    let app = app();
    let (status, _) = call(&app, Method::PATCH, "/todos/1", r#"{"title":"x"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_missing_is_404() {
    let app = app();
    let (status, _) = call(&app, Method::DELETE, "/todos/1", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_all_then_list_is_empty() {
    let app = app();
    call(&app, Method::POST, "/todos", "{}").await;
    call(&app, Method::POST, "/todos", "{}").await;
    let (status, body) = call(&app, Method::DELETE, "/todos", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    let (_, body) = call(&app, Method::GET, "/todos", "").await;
    assert_eq!(body, json!([]));
}

// --- routing ---

#[tokio::test]
async fn unsupported_method_is_405() {
    let app = app();
    let (status, _) = call(&app, Method::PUT, "/todos/1", "{}").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_probes_answer() {
    let app = app();
    let req = http::Request::builder().uri("/readyz").body(Full::<Bytes>::default()).unwrap();
    let res = app.handle(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(&res.into_body().collect().await.unwrap().to_bytes()[..], b"ready");
}

// --- scenario ---

#[tokio::test]
async fn create_complete_delete_scenario() {
    let app = app();

    let (status, body) = call(&app, Method::POST, "/todos", r#"{"title":"buy milk"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": 1, "title": "buy milk", "completed": false, "order": 0, "url": "http://host/1" })
    );

    let (status, body) = call(&app, Method::PATCH, "/todos/1", r#"{"completed":true}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": 1, "title": "buy milk", "completed": true, "order": 0, "url": "http://host/1" })
    );

    let (status, _) = call(&app, Method::DELETE, "/todos/1", "").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, "/todos/1", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not found" }));
}
