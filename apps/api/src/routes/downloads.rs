use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::render::templates::{
    job_description_template, resume_template, JOB_DESCRIPTION_TEMPLATE_FILE,
    RESUME_TEMPLATE_FILE,
};
use crate::render::OutputFormat;
use crate::state::AppState;

/// Binary response the browser saves as `file_name`.
pub fn attachment(file_name: &str, content_type: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// Only plain names inside the downloads directory: `[A-Za-z0-9._-]`, no `..`.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("pdf") => OutputFormat::Pdf.content_type(),
        Some("docx") => OutputFormat::Docx.content_type(),
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// GET /api/v1/downloads/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if !is_safe_file_name(&filename) {
        return Err(AppError::Validation(format!("Invalid file name '{filename}'")));
    }

    let path = state.config.downloads_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File {filename} not found")))
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    Ok(attachment(&filename, content_type_for(&filename), bytes))
}

/// GET /templates/resume
pub async fn handle_resume_template() -> Result<Response, AppError> {
    let bytes = resume_template().map_err(|e| AppError::Render(format!("{e:#}")))?;
    Ok(attachment(
        RESUME_TEMPLATE_FILE,
        OutputFormat::Docx.content_type(),
        bytes,
    ))
}

/// GET /templates/job-description
pub async fn handle_job_description_template() -> Result<Response, AppError> {
    let bytes = job_description_template().map_err(|e| AppError::Render(format!("{e:#}")))?;
    Ok(attachment(
        JOB_DESCRIPTION_TEMPLATE_FILE,
        OutputFormat::Docx.content_type(),
        bytes,
    ))
}
