use serde::{Deserialize, Serialize};

/// One row of the job corpus. Produced by the corpus loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    /// Always present; a missing description in the source becomes an empty string.
    pub description: String,
}

impl JobPosting {
    #[allow(dead_code)]
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            description: description.into(),
        }
    }
}
