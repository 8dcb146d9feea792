use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        version = "0.1.0",
        description = "CRUD service for user records"
    ),
    nest(
        (path = "/api/users", api = domain_users::ApiDoc)
    ),
    components(schemas(axum_helpers::ErrorResponse))
)]
pub struct ApiDoc;

/// Serves the generated document at `/api-docs/openapi.json`.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
