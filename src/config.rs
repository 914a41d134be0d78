//! Runtime configuration loaded from environment variables.
//!
//! - `CODEOWNERS_FILE` - record file path (default: `codeowners.json`)
//! - `CI_SERVER_URL` - GitLab base URL (default: `https://gitlab.com`)
//! - `GITLAB_TOKEN` or `PRIVATE_TOKEN` - GitLab API token
//! - `CODEOWNERS_OVERRIDE_TEAM` - team whose approvals satisfy any change
//! - `CODEOWNERS_MIN_APPROVALS` - approvals required per change (default: 2)
//! - `CODEOWNERS_MIN_REVIEWERS` - reviewers a plan should reach (default: 3)
//! - `CODEOWNERS_TEAM_EXCLUDE` - comma-separated teams never picked as extra reviewers

use std::path::PathBuf;

use crate::gitlab::{GitLabClient, DEFAULT_URL};
use crate::review::ReviewPolicy;

/// Default record file, relative to the working directory.
pub const DEFAULT_FILE: &str = "codeowners.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub file: PathBuf,
    pub gitlab_url: String,
    pub gitlab_token: Option<String>,
    pub policy: ReviewPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_FILE),
            gitlab_url: DEFAULT_URL.to_string(),
            gitlab_token: None,
            policy: ReviewPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unparseable numbers
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let file = lookup("CODEOWNERS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.file);
        let gitlab_url = lookup("CI_SERVER_URL").unwrap_or(defaults.gitlab_url);
        let gitlab_token = lookup("GITLAB_TOKEN").or_else(|| lookup("PRIVATE_TOKEN"));

        let min_approvals = lookup("CODEOWNERS_MIN_APPROVALS")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.policy.min_approvals);
        let min_reviewers = lookup("CODEOWNERS_MIN_REVIEWERS")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.policy.min_reviewers);
        let override_team = lookup("CODEOWNERS_OVERRIDE_TEAM").filter(|s| !s.trim().is_empty());
        let excluded_teams = lookup("CODEOWNERS_TEAM_EXCLUDE")
            .map(|s| {
                s.split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            file,
            gitlab_url,
            gitlab_token,
            policy: ReviewPolicy {
                min_approvals,
                min_reviewers,
                override_team,
                excluded_teams,
            },
        }
    }

    pub fn gitlab_client(&self) -> GitLabClient {
        GitLabClient::new(self.gitlab_url.clone(), self.gitlab_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.file, PathBuf::from("codeowners.json"));
        assert_eq!(config.gitlab_url, "https://gitlab.com");
        assert!(config.gitlab_token.is_none());
        assert_eq!(config.policy, ReviewPolicy::default());
    }

    #[test]
    fn test_reads_variables() {
        let config = config(&[
            ("CODEOWNERS_FILE", "ci/owners.json"),
            ("PRIVATE_TOKEN", "secret"),
            ("CODEOWNERS_OVERRIDE_TEAM", "Platform"),
            ("CODEOWNERS_MIN_APPROVALS", "3"),
            ("CODEOWNERS_MIN_REVIEWERS", "many"),
            ("CODEOWNERS_TEAM_EXCLUDE", "Design, QA,,"),
        ]);
        assert_eq!(config.file, PathBuf::from("ci/owners.json"));
        assert_eq!(config.gitlab_token.as_deref(), Some("secret"));
        assert_eq!(config.policy.override_team.as_deref(), Some("Platform"));
        assert_eq!(config.policy.min_approvals, 3);
        assert_eq!(config.policy.min_reviewers, 3);
        assert_eq!(config.policy.excluded_teams, ["Design", "QA"]);
    }

    #[test]
    fn test_gitlab_token_prefers_gitlab_token() {
        let config = config(&[("GITLAB_TOKEN", "a"), ("PRIVATE_TOKEN", "b")]);
        assert_eq!(config.gitlab_token.as_deref(), Some("a"));
    }
}
