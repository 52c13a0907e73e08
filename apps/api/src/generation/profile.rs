use serde::{Deserialize, Serialize};

/// The free-text profile a user fills in to have a resume written for them.
/// Every field is optional; blanks are passed to the model as empty values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Comma-separated.
    pub skills: String,
    pub experience: String,
    pub education: String,
}

impl UserProfile {
    /// Renders the profile as the labelled block embedded in the generation prompt.
    pub fn render(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nPhone: {}\nSkills: {}\nExperience: {}\nEducation: {}\n",
            self.name, self.email, self.phone, self.skills, self.experience, self.education
        )
    }
}
