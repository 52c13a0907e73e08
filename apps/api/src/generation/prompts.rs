// All LLM prompt templates for the Generate flow.

use crate::generation::profile::UserProfile;
use crate::llm_client::prompts::render_template;

/// Resume generation template. Slots: `{job_role}`, `{user_info}`.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"
Create a professional resume based on the following profile, tailored to the job role of {job_role}.
Use a clean format with sections: Summary, Skills, Experience, and Education.

User Profile:
{user_info}
"#;

pub fn build_generation_prompt(profile: &UserProfile, job_role: &str) -> String {
    let user_info = profile.render();
    render_template(
        GENERATION_PROMPT_TEMPLATE,
        &[("job_role", job_role), ("user_info", &user_info)],
    )
}
