use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Json;
use hashgate_types::{ObjectKey, WriteStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

pub const LIVENESS_MESSAGE: &str = "The service is running.";

/// JSON field holding the payload. Stored verbatim, not base64-decoded.
pub const PAYLOAD_FIELD: &str = "data_base64";
pub const EXTENSION_FIELD: &str = "ext";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetObjectResponse {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostObjectResponse {
    pub status: WriteStatus,
    pub data: ObjectKey,
}

/// Liveness check; not gated.
pub async fn home() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn get_object(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> ServerResult<Json<GetObjectResponse>> {
    tracing::info!(%file_id, "received get-object request");
    let key = ObjectKey::parse(file_id)
        .map_err(|_| ServerError::Validation("Parameter 'file_id' is required".into()))?;
    let content = state.content.fetch(&key).await?;
    Ok(Json(GetObjectResponse { content }))
}

/// `/get-object` without a key.
pub async fn get_object_without_id() -> ServerError {
    ServerError::Validation("Parameter 'file_id' is required".into())
}

pub async fn post_object(
    State(state): State<AppState>,
    body: Bytes,
) -> ServerResult<Json<PostObjectResponse>> {
    tracing::info!("received post-object request");
    let request = PostObjectRequest::parse(&body)?;
    tracing::info!(extension = %request.extension, "post-object extension");
    tracing::debug!(payload_len = request.payload.len(), "post-object payload");

    let outcome = state
        .content
        .store(request.payload.into_bytes(), &request.extension)
        .await?;
    tracing::info!(key = %outcome.key, status = %outcome.status, "post-object finished");
    Ok(Json(PostObjectResponse {
        status: outcome.status,
        data: outcome.key,
    }))
}

/// Validated post-object body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostObjectRequest {
    pub payload: String,
    pub extension: String,
}

impl PostObjectRequest {
    /// An unparseable body, a non-object, or an empty object is "no JSON";
    /// a missing, empty, or non-string field is "missing required fields".
    pub fn parse(body: &[u8]) -> ServerResult<Self> {
        let no_json = || ServerError::Validation("No JSON data provided".into());
        let value: Value = serde_json::from_slice(body).map_err(|_| no_json())?;
        let fields = match value {
            Value::Object(fields) if !fields.is_empty() => fields,
            _ => {
                tracing::info!("post-object body carried no JSON object");
                return Err(no_json());
            }
        };

        let field = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        match (field(PAYLOAD_FIELD), field(EXTENSION_FIELD)) {
            (Some(payload), Some(extension)) => Ok(Self { payload, extension }),
            _ => {
                tracing::info!("post-object body is missing '{PAYLOAD_FIELD}' or '{EXTENSION_FIELD}'");
                Err(ServerError::Validation("Missing required fields".into()))
            }
        }
    }
}
