//! Axum route handlers for the session API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::ExportedDocument;
use crate::extract::DocumentKind;
use crate::generation::profile::UserProfile;
use crate::session::workflow::Upload;
use crate::session::{AnalyzeStage, ChatEntryView, SessionSnapshot};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    /// Absent when the review contains no `N/100` rating.
    pub match_score: Option<u8>,
    pub document_kind: DocumentKind,
    pub resume_chars: usize,
    pub stage: AnalyzeStage,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    /// Most recent first.
    pub chat_history: Vec<ChatEntryView>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub job_role: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub resume: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/analyze
///
/// Multipart form: `file` (PDF or DOCX, chosen by file extension) and
/// `job_description` (text). Replaces any previous analysis and clears chat.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let (upload, job_description) = read_analyze_form(multipart).await?;

    let mut session = handle.lock().await;
    let outcome = state
        .assistant
        .analyze(&mut session, upload, &job_description)
        .await?;

    Ok(Json(AnalyzeResponse {
        analysis: outcome.analysis,
        match_score: outcome.match_score,
        document_kind: outcome.document_kind,
        resume_chars: outcome.resume_chars,
        stage: session.analyze_stage(),
    }))
}

/// POST /api/v1/sessions/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let answer = state.assistant.chat(&mut session, &request.question).await?;

    Ok(Json(ChatResponse {
        answer,
        chat_history: session.snapshot().chat_history,
    }))
}

/// GET /api/v1/sessions/:id/analysis.pdf
pub async fn handle_analysis_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    let document = state.assistant.export_analysis(&session).await?;
    Ok(pdf_download(document))
}

/// POST /api/v1/sessions/:id/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;

    let resume = state
        .assistant
        .generate_resume(&mut session, &request.profile, &request.job_role)
        .await?;

    Ok(Json(GenerateResponse { resume }))
}

/// GET /api/v1/sessions/:id/generated.pdf
pub async fn handle_generated_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    let document = state.assistant.export_generated(&session).await?;
    Ok(pdf_download(document))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_analyze_form(mut multipart: Multipart) -> Result<(Option<Upload>, String), AppError> {
    let mut upload = None;
    let mut job_description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                upload = Some(Upload { file_name, bytes });
            }
            Some("job_description") => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read job_description: {e}")))?;
            }
            _ => {}
        }
    }

    Ok((upload, job_description))
}

fn pdf_download(document: ExportedDocument) -> Response {
    (
        [
            (header::CONTENT_TYPE, document.mime().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.file_name),
            ),
        ],
        document.bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::extract::fixtures::docx_with_paragraphs;
    use crate::llm_client::GenerationSettings;
    use crate::routes::build_router;
    use crate::session::store::SessionStore;
    use crate::session::workflow::testing::ScriptedGenerator;
    use crate::session::workflow::Assistant;
    use crate::state::AppState;

    const BOUNDARY: &str = "resume-api-test-boundary";

    fn app(generator: ScriptedGenerator) -> Router {
        app_with_store(generator, SessionStore::default())
    }

    fn app_with_store(generator: ScriptedGenerator, sessions: SessionStore) -> Router {
        let config = Config {
            groq_api_key: "gsk_test".to_string(),
            groq_api_url: "http://127.0.0.1:9/unused".to_string(),
            groq_model: "llama3-70b-8192".to_string(),
            temperature: 0.7,
            port: 0,
            max_upload_bytes: 1024 * 1024,
            session_ttl_secs: 3600,
            rust_log: "info".to_string(),
        };
        let settings = GenerationSettings {
            model: config.groq_model.clone(),
            temperature: config.temperature,
        };
        build_router(AppState {
            sessions,
            assistant: Arc::new(Assistant::new(Arc::new(generator), settings)),
            config,
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send_json(
            app,
            Request::post("/api/v1/sessions").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    fn multipart_body(file_name: Option<&str>, file: &[u8], job_description: Option<&str>) -> Body {
        let mut body = Vec::new();
        if let Some(name) = file_name {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(file);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(jd) = job_description {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_description\"\r\n\r\n{jd}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Body::from(body)
    }

    fn analyze_request(session_id: &str, body: Body) -> Request<Body> {
        Request::post(format!("/api/v1/sessions/{session_id}/analyze"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .unwrap()
    }

    fn json_request(uri: String, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_chat_and_download_flow() {
        let app = app(
            ScriptedGenerator::new()
                .reply("Good fit. Match rating: 87/100. Missing: Kubernetes.")
                .reply("Add a Kubernetes project.")
                .reply("Lead with impact."),
        );
        let id = create_session(&app).await;
        let docx = docx_with_paragraphs(&["Jane Doe", "Go, Rust"]);

        let (status, body) = send_json(
            &app,
            analyze_request(
                &id,
                multipart_body(Some("resume.docx"), &docx, Some("Backend Engineer")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_score"], 87);
        assert_eq!(body["document_kind"], "docx");
        assert_eq!(body["stage"], "analyzed");

        for question in ["How do I add Kubernetes?", "What goes first?"] {
            let (status, _) = send_json(
                &app,
                json_request(
                    format!("/api/v1/sessions/{id}/chat"),
                    json!({ "question": question }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, snapshot) = send_json(
            &app,
            Request::get(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["stage"], "chat_active");
        assert_eq!(snapshot["chat_history"][0]["label"], "Q1");
        assert_eq!(snapshot["chat_history"][0]["question"], "What goes first?");
        assert_eq!(snapshot["chat_history"][1]["answer"], "Add a Kubernetes project.");

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}/analysis.pdf"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume_feedback.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_unsupported_extension() {
        let app = app(ScriptedGenerator::new());
        let id = create_session(&app).await;

        let (status, body) = send_json(
            &app,
            analyze_request(
                &id,
                multipart_body(Some("resume.txt"), b"plain text", Some("SRE")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_analyze_requires_job_description() {
        let app = app(ScriptedGenerator::new());
        let id = create_session(&app).await;
        let docx = docx_with_paragraphs(&["Jane"]);

        let (status, body) = send_json(
            &app,
            analyze_request(&id, multipart_body(Some("resume.docx"), &docx, None)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generation_failure_is_bad_gateway_with_message() {
        let app = app(ScriptedGenerator::new().fail(401, "Invalid API Key"));
        let id = create_session(&app).await;
        let docx = docx_with_paragraphs(&["Jane"]);

        let (status, body) = send_json(
            &app,
            analyze_request(&id, multipart_body(Some("resume.docx"), &docx, Some("SRE"))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Invalid API Key"));

        let (_, snapshot) = send_json(
            &app,
            Request::get(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(snapshot["stage"], "idle");
        assert!(snapshot["analysis"].is_null());
    }

    #[tokio::test]
    async fn test_chat_before_analysis_is_not_found() {
        let app = app(ScriptedGenerator::new());
        let id = create_session(&app).await;

        let (status, _) = send_json(
            &app,
            json_request(
                format!("/api/v1/sessions/{id}/chat"),
                json!({ "question": "Hi?" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_and_download() {
        let app = app(ScriptedGenerator::new().reply(
            "Jane Doe\nSummary\nBackend engineer\nSkills\nGo, Rust\nExperience\n-\nEducation\n-",
        ));
        let id = create_session(&app).await;

        let (status, body) = send_json(
            &app,
            json_request(
                format!("/api/v1/sessions/{id}/generate"),
                json!({
                    "name": "Jane Doe",
                    "skills": "Go, Rust",
                    "job_role": "Backend Engineer"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let resume = body["resume"].as_str().unwrap();
        for section in ["Summary", "Skills", "Experience", "Education"] {
            assert!(resume.contains(section));
        }

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}/generated.pdf"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"generated_resume.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_sessions() {
        let app = app(ScriptedGenerator::new());
        let (status, _) = send_json(
            &app,
            Request::get(format!("/api/v1/sessions/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let id = create_session(&app).await;
        let (status, _) = send(
            &app,
            Request::delete(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(
            &app,
            Request::get(format!("/api/v1/sessions/{id}/analysis.pdf"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_idle_session_expires_to_not_found() {
        let store = SessionStore::new(chrono::Duration::minutes(30));
        let app = app_with_store(ScriptedGenerator::new(), store.clone());
        let id = create_session(&app).await;

        let handle = store.get(id.parse().unwrap()).await.unwrap();
        handle.lock().await.updated_at = chrono::Utc::now() - chrono::Duration::hours(2);

        let (status, body) = send_json(
            &app,
            Request::get(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(store.len().await, 0);
    }
}
