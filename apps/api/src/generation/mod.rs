// Generate flow: user profile and the resume-writing prompt.
// Orchestration lives in session::workflow; this module is pure text handling.

pub mod profile;
pub mod prompts;
