// Analyze flow: resume review prompts, follow-up chat prompts, and match-score parsing.
// Orchestration lives in session::workflow; this module is pure text handling.

pub mod prompts;
pub mod score;
