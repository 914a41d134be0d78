use uuid::Uuid;

use super::Member;

/// A team responsible for a set of repository paths.
///
/// Teams are denormalized in memory: each one embeds its full [`Member`]
/// records and its owned paths. The record file stores them normalized, see
/// [`crate::codec`].
///
/// # Identity
/// `id` is generated when the team is constructed (or decoded) and is never
/// written to disk, so a reloaded team gets a fresh one. Use `name` to find
/// the same team again after a reload.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub members: Vec<Member>,
    owned_paths: Vec<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            members: Vec::new(),
            owned_paths: Vec::new(),
        }
    }

    /// Rebuild a team from already-resolved parts. Paths are taken as-is.
    pub(crate) fn from_parts(
        name: String,
        description: String,
        members: Vec<Member>,
        owned_paths: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            members,
            owned_paths,
        }
    }

    /// Paths owned by this team, each starting with `/`.
    pub fn owned_paths(&self) -> &[String] {
        &self.owned_paths
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Remove every occurrence of `path` (exact match).
    pub fn remove_path(&mut self, path: &str) {
        self.owned_paths.retain(|owned| owned != path);
    }

    /// Add `path` unless it is blank or already owned.
    ///
    /// A missing leading `/` is prepended before the duplicate check, so
    /// `Foo/Bar` and `/Foo/Bar` are the same path. Returns `true` when the path
    /// was appended.
    pub fn add_path_if_needed(&mut self, path: &str) -> bool {
        if path.trim().is_empty() {
            return false;
        }
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        if self.owned_paths.contains(&path) {
            return false;
        }
        self.owned_paths.push(path);
        true
    }

    pub fn has_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m.username == username)
    }

    /// Append `member` unless someone with the same username is already on the team.
    pub fn add_member(&mut self, member: Member) -> bool {
        if self.has_member(&member.username) {
            return false;
        }
        self.members.push(member);
        true
    }

    pub fn remove_member(&mut self, username: &str) -> Option<Member> {
        let index = self.members.iter().position(|m| m.username == username)?;
        Some(self.members.remove(index))
    }

    /// Whether `viewer` may edit this team. Admins can edit any team; everyone
    /// else only the teams they belong to.
    pub fn is_editable_by(&self, viewer: &str, admin_mode: bool) -> bool {
        admin_mode || self.has_member(viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_path_prepends_separator() {
        let mut team = Team::new("Platform", "");
        assert!(team.add_path_if_needed("Foo/Bar"));
        assert!(!team.add_path_if_needed("Foo/Bar"));
        assert!(!team.add_path_if_needed("/Foo/Bar"));
        assert_eq!(team.owned_paths(), ["/Foo/Bar"]);
    }

    #[test]
    fn test_add_path_rejects_blank_input() {
        let mut team = Team::new("Platform", "");
        assert!(!team.add_path_if_needed(""));
        assert!(!team.add_path_if_needed("   "));
        assert!(team.owned_paths().is_empty());
    }

    #[test]
    fn test_add_path_is_case_sensitive() {
        let mut team = Team::new("Platform", "");
        team.add_path_if_needed("/Modules/Foo");
        team.add_path_if_needed("/modules/foo");
        assert_eq!(team.owned_paths().len(), 2);
    }

    #[test]
    fn test_remove_path() {
        let mut team = Team::from_parts(
            "Platform".into(),
            String::new(),
            vec![],
            vec!["/A".into(), "/B".into(), "/A".into()],
        );
        team.remove_path("/A");
        assert_eq!(team.owned_paths(), ["/B"]);
        team.remove_path("/Missing");
        assert_eq!(team.owned_paths(), ["/B"]);
    }

    #[test]
    fn test_members() {
        let mut team = Team::new("Platform", "");
        assert!(team.add_member(Member::new("alice", "Alice", 1)));
        assert!(!team.add_member(Member::new("alice", "Alice Again", 7)));
        assert!(team.add_member(Member::new("bob", "Bob", 2)));
        assert_eq!(team.members.len(), 2);

        let removed = team.remove_member("alice").expect("alice is a member");
        assert_eq!(removed.display_name, "Alice");
        assert!(team.remove_member("alice").is_none());
        assert!(!team.has_member("alice"));
    }

    #[test]
    fn test_is_editable_by() {
        let mut team = Team::new("Platform", "");
        team.add_member(Member::new("alice", "Alice", 1));
        assert!(team.is_editable_by("alice", false));
        assert!(!team.is_editable_by("bob", false));
        assert!(team.is_editable_by("bob", true));
    }

    #[test]
    fn test_new_teams_get_distinct_ids() {
        assert_ne!(Team::new("A", "").id, Team::new("A", "").id);
    }
}
