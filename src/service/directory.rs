//! Lookup of team members in an external user directory.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;

use crate::models::Member;

/// An external source of member records, e.g. GitLab.
///
/// An unknown username is `Ok(None)`, not an error.
pub trait MemberDirectory: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send;
}

/// A fixed set of members held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    members: HashMap<String, Member>,
}

impl StaticDirectory {
    pub fn new(members: impl IntoIterator<Item = Member>) -> Self {
        Self {
            members: members
                .into_iter()
                .map(|m| (m.username.clone(), m))
                .collect(),
        }
    }
}

impl MemberDirectory for StaticDirectory {
    type Error = Infallible;

    async fn fetch_by_username(&self, username: &str) -> Result<Option<Member>, Infallible> {
        Ok(self.members.get(username).cloned())
    }
}
