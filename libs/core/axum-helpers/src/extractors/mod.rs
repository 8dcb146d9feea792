//! Request extractors that reject with [`AppError`](crate::errors::AppError)
//! bodies instead of axum's plain-text rejections.

mod validated_json;

pub use validated_json::ValidatedJson;
