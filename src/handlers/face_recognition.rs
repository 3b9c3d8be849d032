use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::UploadedFile;
use crate::error::AppError;
use crate::use_cases::CompareFacesInput;
use crate::AppState;

pub const FILE1_FIELD: &str = "file1";
pub const FILE2_FIELD: &str = "file2";

#[derive(Debug, Serialize, Deserialize)]
pub struct FaceRecognitionResponse {
    pub message: String,
    pub matched: bool,
}

/// Compares the faces in `file1` and `file2`, then stores both images and the transaction.
pub async fn face_recognition(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let parts = match multipart {
        Ok(multipart) => read_file_parts(multipart).await?,
        Err(rejection) => {
            // A body that is not multipart carries no file parts at all.
            tracing::debug!(error = %rejection, "Request is not multipart");
            FileParts::default()
        }
    };

    let file1 = parts.file1.ok_or(AppError::MissingFile(FILE1_FIELD))?;
    let file2 = parts.file2.ok_or(AppError::MissingFile(FILE2_FIELD))?;

    tracing::info!(
        file1 = %file1.filename,
        file1_size = file1.len(),
        file2 = %file2.filename,
        file2_size = file2.len(),
        "Received face comparison request"
    );

    let output = state
        .compare_faces
        .execute(CompareFacesInput { file1, file2 })
        .await?;

    Ok((
        StatusCode::OK,
        Json(FaceRecognitionResponse {
            message: "Transaction recorded and saved images".to_string(),
            matched: output.matched,
        }),
    ))
}

#[derive(Debug, Default)]
struct FileParts {
    file1: Option<UploadedFile>,
    file2: Option<UploadedFile>,
}

/// Buffers the first `file1` and `file2` file parts; everything else is skipped.
async fn read_file_parts(mut multipart: Multipart) -> Result<FileParts, AppError> {
    let mut parts = FileParts::default();

    while let Some(field) = multipart.next_field().await? {
        let slot = match field.name() {
            Some(FILE1_FIELD) => &mut parts.file1,
            Some(FILE2_FIELD) => &mut parts.file2,
            _ => continue,
        };
        if slot.is_some() {
            continue;
        }

        let (name, filename) = match (field.name(), field.file_name()) {
            (Some(name), Some(filename)) if !filename.is_empty() => {
                (name.to_string(), filename.to_string())
            }
            // Plain form values are not files.
            _ => continue,
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        *slot = Some(UploadedFile::new(name, &filename, content_type, data));
    }

    Ok(parts)
}
