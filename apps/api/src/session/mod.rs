//! Session Workflow — per-user conversation state and the flows that mutate it.
//!
//! Analyze flow:  Idle → (Extracted) → Analyzed → ChatActive ⟲
//! Generate flow: Idle → Generated
//! The flows share the `Session` container but not their transitions.

pub mod handlers;
pub mod store;
pub mod workflow;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Where a session stands in the Analyze flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzeStage {
    Idle,
    Analyzed,
    ChatActive,
}

/// One follow-up question and the model's answer.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

/// The resume and job description an analysis was produced from.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub resume_text: String,
    pub job_description: String,
    pub analysis: String,
    pub match_score: Option<u8>,
}

/// Mutable state for one user's interaction context.
///
/// Invariant: `analysis` is only ever set together with the resume text and job
/// description it was produced from, and setting it clears `chat_history`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    analysis: Option<AnalysisContext>,
    chat_history: Vec<ChatTurn>,
    generated_resume: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            analysis: None,
            chat_history: Vec::new(),
            generated_resume: None,
        }
    }

    pub fn analyze_stage(&self) -> AnalyzeStage {
        match (&self.analysis, self.chat_history.is_empty()) {
            (None, _) => AnalyzeStage::Idle,
            (Some(_), true) => AnalyzeStage::Analyzed,
            (Some(_), false) => AnalyzeStage::ChatActive,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisContext> {
        self.analysis.as_ref()
    }

    /// Chat turns in the order they were asked.
    pub fn chat_history(&self) -> &[ChatTurn] {
        &self.chat_history
    }

    pub fn generated_resume(&self) -> Option<&str> {
        self.generated_resume.as_deref()
    }

    /// Replaces the current analysis and discards the chat that belonged to it.
    pub fn commit_analysis(&mut self, context: AnalysisContext) {
        self.analysis = Some(context);
        self.chat_history.clear();
        self.touch();
    }

    pub fn push_chat_turn(&mut self, question: String, answer: String) {
        self.chat_history.push(ChatTurn {
            question,
            answer,
            asked_at: Utc::now(),
        });
        self.touch();
    }

    pub fn set_generated_resume(&mut self, resume: String) {
        self.generated_resume = Some(resume);
        self.touch();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let chat_history = self
            .chat_history
            .iter()
            .rev()
            .enumerate()
            .map(|(i, turn)| ChatEntryView {
                label: format!("Q{}", i + 1),
                question: turn.question.clone(),
                answer: turn.answer.clone(),
                asked_at: turn.asked_at,
            })
            .collect();

        SessionSnapshot {
            session_id: self.id,
            stage: self.analyze_stage(),
            analysis: self.analysis.as_ref().map(|a| a.analysis.clone()),
            match_score: self.analysis.as_ref().and_then(|a| a.match_score),
            chat_history,
            generated_resume: self.generated_resume.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a session for display. Chat is most-recent-first.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub stage: AnalyzeStage,
    pub analysis: Option<String>,
    pub match_score: Option<u8>,
    pub chat_history: Vec<ChatEntryView>,
    pub generated_resume: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatEntryView {
    pub label: String,
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}
