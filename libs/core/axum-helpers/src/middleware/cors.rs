use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Answers every `OPTIONS` request with an empty 200, whatever the path.
pub async fn options_preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

/// Wraps `router` so that every response, including preflights, 404s and
/// errors, carries the permissive CORS headers.
///
/// Call after all routes and the fallback have been added.
pub fn apply_cors<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(middleware::from_fn(options_preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::handlers::not_found;
    use axum::{
        body::{Body, to_bytes},
        routing::get,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        apply_cors(
            Router::new()
                .route("/things", get(|| async { "things" }))
                .fallback(not_found),
        )
    }

    fn assert_cors_headers(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOW_ORIGIN);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
    }

    async fn send(method: Method, uri: &str) -> Response {
        app()
            .oneshot(
                axum::http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_carries_cors_headers() {
        let response = send(Method::GET, "/things").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
    }

    #[tokio::test]
    async fn test_options_short_circuits_with_empty_body() {
        let response = send(Method::OPTIONS, "/things").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_options_on_unknown_path() {
        let response = send(Method::OPTIONS, "/nowhere").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
    }

    #[tokio::test]
    async fn test_fallback_carries_cors_headers() {
        let response = send(Method::GET, "/nowhere").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors_headers(&response);
    }
}
