use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body extractor that decodes the raw body regardless of `Content-Type`.
///
/// `axum::Json` rejects requests without `application/json`; clients of this
/// service routinely omit it. An empty body is a decode error
/// ("EOF while parsing a value ...").
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayload<T>(pub T);

/// Rejection carrying the decoder's message.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct JsonPayloadRejection {
    pub message: String,
}

impl From<JsonPayloadRejection> for ApiError {
    fn from(r: JsonPayloadRejection) -> Self {
        ApiError::BadRequest(r.message)
    }
}

impl IntoResponse for JsonPayloadRejection {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl<T, S> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonPayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonPayloadRejection {
                message: e.body_text(),
            })?;

        serde_json::from_slice::<T>(&bytes)
            .map(JsonPayload)
            .map_err(|e| JsonPayloadRejection {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        name: String,
    }

    async fn extract(body: &'static str) -> Result<JsonPayload<Probe>, JsonPayloadRejection> {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();
        JsonPayload::<Probe>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn decodes_without_content_type() {
        let JsonPayload(p) = extract(r#"{"name":"x"}"#).await.unwrap();
        assert_eq!(p, Probe { name: "x".into() });
    }

    #[tokio::test]
    async fn empty_body_is_rejected_with_decoder_message() {
        let err = extract("").await.unwrap_err();
        assert!(err.message.contains("EOF"), "got: {}", err.message);
    }

    #[tokio::test]
    async fn type_mismatch_is_rejected() {
        let err = extract(r#"{"name":5}"#).await.unwrap_err();
        assert!(err.message.contains("invalid type"), "got: {}", err.message);
    }
}
