use anyhow::anyhow;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::models::template::ResumeTemplate;
use crate::pdf::render_resume;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfQuery {
    pub template_id: Option<i32>,
}

/// POST /SaveResume
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Json(mut resume): Json<Resume>,
) -> Result<Json<Resume>, AppError> {
    if resume.user_id.trim().is_empty() {
        return Err(AppError::Validation("UserId is required.".to_string()));
    }
    if resume.id.trim().is_empty() {
        resume.id = Uuid::new_v4().to_string();
    }

    let now = Utc::now();
    resume.created_at = match state.resumes.get(&resume.user_id, &resume.id).await? {
        Some(existing) => existing.created_at,
        None => now,
    };
    resume.updated_at = now;

    state.resumes.upsert(&resume).await?;
    info!(user_id = %resume.user_id, resume_id = %resume.id, "Resume saved");
    Ok(Json(resume))
}

/// GET /resumes/:user_id
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.resumes.list(&user_id).await?))
}

/// GET /resumes/:user_id/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(load_resume(&state, &user_id, &id).await?))
}

/// DELETE /resumes/:user_id/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    if !state.resumes.delete(&user_id, &id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    info!(user_id = %user_id, resume_id = %id, "Resume deleted");
    Ok(StatusCode::OK)
}

/// GET /resumes/:user_id/:id/pdf
pub async fn handle_resume_pdf(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(String, String)>,
    Query(params): Query<PdfQuery>,
) -> Result<Response, AppError> {
    let resume = load_resume(&state, &user_id, &id).await?;
    render(&state, resume, params.template_id).await
}

/// POST /pdf
/// Renders an unsaved resume body, used by the editor preview.
pub async fn handle_preview_pdf(
    State(state): State<AppState>,
    Query(params): Query<PdfQuery>,
    Json(resume): Json<Resume>,
) -> Result<Response, AppError> {
    render(&state, resume, params.template_id).await
}

/// GET /templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Json<&'static [ResumeTemplate]> {
    Json(state.templates.all())
}

/// GET /templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<&'static ResumeTemplate>, AppError> {
    state
        .templates
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}

async fn load_resume(state: &AppState, user_id: &str, id: &str) -> Result<Resume, AppError> {
    state
        .resumes
        .get(user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// Fetches the photo (if the preset has a slot for one), then lays out and
/// writes the PDF on the blocking pool.
async fn render(
    state: &AppState,
    resume: Resume,
    template_id: Option<i32>,
) -> Result<Response, AppError> {
    let template = state
        .templates
        .resolve(template_id.unwrap_or(resume.template_id));

    let photo = match resume.profile_image_url.as_deref() {
        Some(url) if template.shows_photo() && !url.trim().is_empty() => {
            state.images.fetch(url).await
        }
        _ => None,
    };

    let filename = pdf_filename(&resume);
    let resume_id = resume.id.clone();
    let bytes = tokio::task::spawn_blocking(move || render_resume(&resume, template, photo))
        .await
        .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in PDF render: {e}")))??;

    info!(
        resume_id = %resume_id,
        template_id = template.id,
        bytes = bytes.len(),
        "Rendered resume PDF"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `Ada_Lovelace_Resume.pdf`; falls back to the resume title, then to `Resume.pdf`.
fn pdf_filename(resume: &Resume) -> String {
    if let Some(stem) = filename_stem(&resume.full_name) {
        return format!("{stem}_Resume.pdf");
    }
    match filename_stem(&resume.title) {
        Some(stem) => format!("{stem}.pdf"),
        None => "Resume.pdf".to_string(),
    }
}

fn filename_stem(source: &str) -> Option<String> {
    let words: Vec<String> = source
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();
    (!words.is_empty()).then(|| words.join("_"))
}
