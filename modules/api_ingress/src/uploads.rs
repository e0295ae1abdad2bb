use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart,
    },
    Extension,
};
use modkit::api::{ApiError, ApiResult};
use tokio::io::AsyncWriteExt;

/// Form field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "upload_file";

/// Destination directory for uploads, shared with the handler.
#[derive(Clone, Debug)]
pub struct UploadDir(pub Arc<PathBuf>);

/// Keep only the last path component of a client-supplied file name.
fn sanitize_file_name(raw: &str) -> Option<&str> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    match name {
        "" | "." | ".." => None,
        n => Some(n),
    }
}

/// Streams the `upload_file` part into the uploads directory.
/// Responds with the stored path `{dir}/{file_name}`.
pub async fn upload_file(
    Extension(UploadDir(dir)): Extension<UploadDir>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<String> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .and_then(sanitize_file_name)
            .map(str::to_owned)
            .ok_or_else(|| ApiError::bad_request("missing file name"))?;

        tokio::fs::create_dir_all(dir.as_path())
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?;

        let target = dir.join(&file_name);
        let mut file = tokio::fs::File::create(&target)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?;

        let written = match copy_field(&mut field, &mut file).await {
            Ok(n) => n,
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(&target).await {
                    tracing::warn!(file = %target.display(), error = %rm, "failed to remove partial upload");
                }
                return Err(e);
            }
        };

        tracing::info!(file = %target.display(), bytes = written, "stored upload");
        return Ok(stored_path(&dir, &file_name));
    }

    Err(ApiError::bad_request(format!(
        "missing form field `{UPLOAD_FIELD}`"
    )))
}

async fn copy_field(field: &mut Field<'_>, file: &mut tokio::fs::File) -> ApiResult<usize> {
    let mut written = 0usize;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?;
        written += chunk.len();
    }
    file.flush()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(written)
}

fn stored_path(dir: &Path, file_name: &str) -> String {
    format!("{}/{}", dir.display(), file_name)
}
