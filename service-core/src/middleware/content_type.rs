use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Stamps `application/json; charset=utf-8` on every response.
pub async fn json_content_type_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_UTF8),
    );
    response
}
