// All LLM prompt templates for the Analyze flow and its chat follow-ups.

use crate::llm_client::prompts::render_template;

/// Resume review template. Slots: `{resume_text}`, `{job_description}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"
You are a professional resume reviewer. Analyze the resume below and:
1. Suggest specific improvements (format, content, clarity).
2. Provide a match rating (0-100) based on the job description.
3. Highlight missing skills or qualifications.

Resume:
{resume_text}

Job Description:
{job_description}
"#;

/// Follow-up question template.
/// Slots: `{resume_text}`, `{job_description}`, `{analysis}`, `{question}`.
pub const CHAT_PROMPT_TEMPLATE: &str = r#"
You are a resume expert AI. The user has uploaded the following resume and job description:

Resume:
{resume_text}

Job Description:
{job_description}

Resume Review:
{analysis}

User Question:
{question}

Respond with specific and helpful feedback.
"#;

pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    render_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("job_description", job_description),
        ],
    )
}

pub fn build_chat_prompt(
    resume_text: &str,
    job_description: &str,
    analysis: &str,
    question: &str,
) -> String {
    render_template(
        CHAT_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("job_description", job_description),
            ("analysis", analysis),
            ("question", question),
        ],
    )
}
