use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A developer who can belong to one or more teams.
///
/// Identity is the `username`: two members with the same username are equal
/// even if their display names or external ids differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// GitLab user id.
    #[serde(rename = "gitlab_id")]
    pub external_id: i64,
    /// Full name shown to people.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Login, case-sensitive.
    pub username: String,
}

impl Member {
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        external_id: i64,
    ) -> Self {
        Self {
            external_id,
            display_name: display_name.into(),
            username: username.into(),
        }
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.username.hash(state);
    }
}
