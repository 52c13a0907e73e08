//! Assistant — runs each user action's full pipeline against one session.
//!
//! Every action computes its result first and commits to the session last, so a
//! failure at any step (extraction, generation, export) leaves prior state intact.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use crate::analysis::prompts::{build_analysis_prompt, build_chat_prompt};
use crate::analysis::score::parse_match_score;
use crate::errors::AppError;
use crate::export::{export, ExportedDocument, ANALYSIS_FILE_NAME, GENERATED_FILE_NAME};
use crate::extract::{extract, DocumentKind};
use crate::generation::profile::UserProfile;
use crate::generation::prompts::build_generation_prompt;
use crate::llm_client::{GenerationSettings, TextGenerator};
use crate::session::{AnalysisContext, Session};

/// An uploaded resume file as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Result of a successful Analyze action.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis: String,
    pub match_score: Option<u8>,
    pub document_kind: DocumentKind,
    pub resume_chars: usize,
}

pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
    settings: GenerationSettings,
}

impl Assistant {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: GenerationSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Idle/any → Extracted → Analyzed.
    ///
    /// Extracts the resume, asks for a review against the job description, and on
    /// success replaces the session's analysis and clears its chat history.
    pub async fn analyze(
        &self,
        session: &mut Session,
        upload: Option<Upload>,
        job_description: &str,
    ) -> Result<AnalysisOutcome, AppError> {
        let upload = upload.filter(|u| !u.bytes.is_empty()).ok_or_else(|| {
            AppError::Validation("A resume file (PDF or DOCX) is required".to_string())
        })?;
        if job_description.trim().is_empty() {
            return Err(AppError::Validation("job_description cannot be empty".to_string()));
        }

        let kind = DocumentKind::from_file_name(&upload.file_name)?;
        info!(
            "Session {}: extracting {} ({} bytes)",
            session.id,
            kind,
            upload.bytes.len()
        );
        let resume_text = extract_blocking(upload.bytes, kind).await?;
        if resume_text.trim().is_empty() {
            return Err(AppError::Extraction(format!(
                "no extractable text found in {}",
                upload.file_name
            )));
        }

        let prompt = build_analysis_prompt(&resume_text, job_description);
        let analysis = self.generate(&prompt).await?;
        let match_score = parse_match_score(&analysis);

        let outcome = AnalysisOutcome {
            analysis: analysis.clone(),
            match_score,
            document_kind: kind,
            resume_chars: resume_text.chars().count(),
        };

        session.commit_analysis(AnalysisContext {
            resume_text,
            job_description: job_description.to_string(),
            analysis,
            match_score,
        });
        info!(
            "Session {}: analysis stored (score: {:?})",
            session.id, match_score
        );

        Ok(outcome)
    }

    /// Analyzed/ChatActive → ChatActive. Answers a follow-up grounded in the
    /// current resume, job description, and review.
    pub async fn chat(&self, session: &mut Session, question: &str) -> Result<String, AppError> {
        if question.trim().is_empty() {
            return Err(AppError::Validation("question cannot be empty".to_string()));
        }
        let context = session.analysis().ok_or_else(|| {
            AppError::NotFound("No analysis in this session; analyze a resume first".to_string())
        })?;

        let prompt = build_chat_prompt(
            &context.resume_text,
            &context.job_description,
            &context.analysis,
            question,
        );
        let answer = self.generate(&prompt).await?;

        session.push_chat_turn(question.to_string(), answer.clone());
        info!(
            "Session {}: chat turn {} stored",
            session.id,
            session.chat_history().len()
        );
        Ok(answer)
    }

    /// Idle → Generated. Writes a resume from the profile for the target role.
    pub async fn generate_resume(
        &self,
        session: &mut Session,
        profile: &UserProfile,
        job_role: &str,
    ) -> Result<String, AppError> {
        let prompt = build_generation_prompt(profile, job_role);
        let resume = self.generate(&prompt).await?;

        session.set_generated_resume(resume.clone());
        info!("Session {}: generated resume stored", session.id);
        Ok(resume)
    }

    /// Renders the current analysis as `resume_feedback.pdf`. Does not change state.
    pub async fn export_analysis(&self, session: &Session) -> Result<ExportedDocument, AppError> {
        let text = session
            .analysis()
            .map(|a| a.analysis.clone())
            .ok_or_else(|| AppError::NotFound("No analysis to export".to_string()))?;
        export_blocking(text, ANALYSIS_FILE_NAME).await
    }

    /// Renders the generated resume as `generated_resume.pdf`. Does not change state.
    pub async fn export_generated(&self, session: &Session) -> Result<ExportedDocument, AppError> {
        let text = session
            .generated_resume()
            .map(str::to_string)
            .ok_or_else(|| AppError::NotFound("No generated resume to export".to_string()))?;
        export_blocking(text, GENERATED_FILE_NAME).await
    }

    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let request = self.settings.request(prompt);
        info!(
            "Calling model {} ({} prompt chars)",
            request.model,
            prompt.len()
        );
        let text = self.generator.generate(&request).await?;
        info!("Model returned {} chars", text.len());
        Ok(text)
    }
}

async fn extract_blocking(bytes: Bytes, kind: DocumentKind) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extract(&bytes, kind))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::Extraction(format!("the {kind} parser crashed on this file"))
            } else {
                AppError::Internal(anyhow::anyhow!("extraction task failed: {e}"))
            }
        })?
        .map_err(AppError::from)
}

async fn export_blocking(
    text: String,
    file_name: &'static str,
) -> Result<ExportedDocument, AppError> {
    let bytes = tokio::task::spawn_blocking(move || export(&text))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("export task failed: {e}")))??;
    info!("Exported {file_name} ({} bytes)", bytes.len());
    Ok(ExportedDocument { file_name, bytes })
}
