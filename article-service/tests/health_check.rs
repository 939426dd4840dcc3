mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "article-service");

    app.cleanup().await;
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/ready").await;

    assert!(response.status().is_success());

    app.cleanup().await;
}

#[tokio::test]
async fn welcome_route_greets() {
    let app = TestApp::spawn().await;

    let response = app.get("/").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, "Bienvenido a la API del Supermercado");

    app.cleanup().await;
}

#[tokio::test]
async fn unknown_route_returns_fallback_message() {
    let app = TestApp::spawn().await;

    for path in ["/productos", "/articulos/5", "/articulo/1/extra"] {
        let response = app.get(path).await;
        assert_eq!(response.status().as_u16(), 404, "{path}");

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["error"], "Lo sentimos, la página que buscas no existe.");
    }

    app.cleanup().await;
}

#[tokio::test]
async fn responses_are_json_with_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/articulos", app.address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    assert_eq!(response.headers()["x-request-id"], "req-42");

    app.cleanup().await;
}

#[tokio::test]
async fn unhealthy_store_hides_failure_details() {
    let app = TestApp::spawn_unreachable_mongo().await;

    let response = app.get("/health").await;
    assert_eq!(response.status().as_u16(), 503);

    let text = response.text().await.expect("Failed to read body");
    assert!(!text.contains("127.0.0.1"), "{text}");
    assert!(!text.contains("Topology"), "{text}");

    let body: serde_json::Value = serde_json::from_str(&text).expect("Failed to parse JSON");
    assert_eq!(
        body,
        serde_json::json!({ "status": "unhealthy", "service": "article-service" })
    );

    app.cleanup().await;
}

#[tokio::test]
async fn wrong_method_on_known_route_returns_json_405() {
    let app = TestApp::spawn().await;

    let response = app
        .put_json("/articulo/1", &serde_json::json!({ "precio": 1 }))
        .await;
    assert_eq!(response.status().as_u16(), 405);
    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Método no permitido para esta ruta.");

    let response = app.delete("/articulos").await;
    assert_eq!(response.status().as_u16(), 405);

    app.cleanup().await;
}
