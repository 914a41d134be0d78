//! GitLab as the member directory.
//!
//! Members are looked up through the users API. See [`crate::config::Config`]
//! for the environment variables that point the client at an instance.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Member;
use crate::service::MemberDirectory;

/// Default GitLab instance.
pub const DEFAULT_URL: &str = "https://gitlab.com";

/// GitLab client errors.
#[derive(Debug, Error)]
pub enum GitLabError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthorized: GitLab token required or invalid")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),
}

/// The subset of a GitLab user object we read.
#[derive(Debug, Deserialize)]
struct GitLabUser {
    id: i64,
    username: String,
    name: String,
}

impl From<GitLabUser> for Member {
    fn from(user: GitLabUser) -> Self {
        Member::new(user.username, user.name, user.id)
    }
}

#[derive(Debug, Clone)]
pub struct GitLabClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GitLabClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }

    /// Build a request against the v4 API with the token header when configured.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/api/v4{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(ref token) = self.token {
            req = req.header("Private-Token", token);
        }
        req
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, GitLabError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GitLabError::Unauthorized),
                _ => Err(GitLabError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    /// Find a user by exact username.
    pub async fn find_user(&self, username: &str) -> Result<Option<Member>, GitLabError> {
        tracing::debug!("Looking up GitLab user {}", username);
        let response = self
            .request(reqwest::Method::GET, "/users")
            .query(&[("username", username)])
            .send()
            .await?;
        let users: Vec<GitLabUser> = self.handle_response(response).await?;

        Ok(users
            .into_iter()
            .find(|user| user.username == username)
            .map(Member::from))
    }
}

impl MemberDirectory for GitLabClient {
    type Error = GitLabError;

    async fn fetch_by_username(&self, username: &str) -> Result<Option<Member>, GitLabError> {
        self.find_user(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_payload_maps_to_member() {
        let payload = r#"[{"id": 7, "username": "alice", "name": "Alice A.", "state": "active"}]"#;
        let users: Vec<GitLabUser> = serde_json::from_str(payload).unwrap();
        let member = users.into_iter().map(Member::from).next().unwrap();
        assert_eq!(member.username, "alice");
        assert_eq!(member.display_name, "Alice A.");
        assert_eq!(member.external_id, 7);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = GitLabClient::new("https://gitlab.example.com/", None);
        assert_eq!(client.base_url, "https://gitlab.example.com");
    }
}
