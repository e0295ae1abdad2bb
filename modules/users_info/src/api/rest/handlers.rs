use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension,
};
use chrono::Utc;
use modkit::api::{ApiError, ApiResult, JsonPayload, JsonPayloadRejection};
use tracing::{debug, info};

use crate::api::rest::dto::{CreateUserReq, EchoUserReq, UpdateUserReq, UserDto};
use crate::domain::service::Service;

/// `{id}` path segment restricted to ASCII digits.
///
/// Anything else is answered like an unknown route (`404`, empty body);
/// a digit string that overflows `i64` is a `400`.
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub i64);

impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StatusCode::NOT_FOUND.into_response());
        }

        raw.parse::<i64>()
            .map(UserIdPath)
            .map_err(|e| ApiError::bad_request(e.to_string()).into_response())
    }
}

fn bad_request(e: JsonPayloadRejection) -> ApiError {
    ApiError::bad_request(format!("Bad Request : {e}"))
}

/// List all users
pub async fn list_users(Extension(svc): Extension<Arc<Service>>) -> ApiResult<Json<Vec<UserDto>>> {
    let users = svc.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Get a specific user by ID
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    UserIdPath(id): UserIdPath,
) -> ApiResult<Json<UserDto>> {
    debug!(user_id = id, "getting user");
    let user = svc.get_user(id).await?;
    Ok(Json(UserDto::from(user)))
}

/// Create a new user; the decoder message is returned as-is on bad input
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    JsonPayload(req): JsonPayload<CreateUserReq>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    if req.id.is_some() || req.created_at.is_some() {
        debug!("ignoring client-supplied id/created_at");
    }
    let user = svc.create_user(req.into()).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// Merge-update an existing user identified by the body's `id`
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<JsonPayload<UpdateUserReq>, JsonPayloadRejection>,
) -> ApiResult<Json<UserDto>> {
    let JsonPayload(req) = payload.map_err(bad_request)?;
    let id = req.user_id();
    info!(user_id = id, "updating user");

    let user = svc.update_user(id, req.into()).await?;
    Ok(Json(UserDto::from(user)))
}

/// Delete a user by ID
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    UserIdPath(id): UserIdPath,
) -> ApiResult<String> {
    svc.delete_user(id).await?;
    Ok(format!("Deleted User Id:{id}"))
}

/// Other methods on `/user/{id}`: a non-digit segment stays an unknown route.
pub async fn user_id_other_method(UserIdPath(_): UserIdPath) -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

/// Echo a user-shaped payload with a fresh `created_at`
pub async fn echo_user(
    payload: Result<JsonPayload<EchoUserReq>, JsonPayloadRejection>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let JsonPayload(req) = payload.map_err(bad_request)?;
    Ok((StatusCode::CREATED, Json(req.stamped(Utc::now()))))
}
