use axum::{
    async_trait,
    body::{Bytes, HttpBody},
    extract::FromRequest,
    http::{Request, StatusCode},
    BoxError,
};
use serde::de::DeserializeOwned;

/// JSON request body that is parsed regardless of the `Content-Type` header.
///
/// Competitive Companion and the browser UI do not always label their bodies
/// as JSON, so unlike `axum::Json` this only looks at the bytes.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for JsonBody<T>
where
    T: DeserializeOwned,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::error!("failed to read request body: {}", rejection.body_text());
                (rejection.status(), rejection.body_text())
            })?;

        let value: T = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Parsing error: {}", e);
            (
                StatusCode::BAD_REQUEST,
                format!("invalid JSON body: [{}]", e),
            )
        })?;

        Ok(JsonBody(value))
    }
}
