//! Conversion between the normalized record file and in-memory teams.
//!
//! On disk, members live once in a top-level `users` list and path ownership
//! lives in a top-level `paths` map. In memory, every [`Team`] embeds its own
//! members and paths. [`decode`] and [`encode`] are pure and inverse up to
//! ordering: encoding is fully deterministic, so saving an unchanged team
//! list twice yields identical bytes.

mod record;

pub use record::*;

use std::collections::{BTreeMap, HashSet};

use crate::models::{Member, Team};

/// Everything a [`TeamRecord`] refers to by name.
///
/// Built once per decode from the top-level `users` and `paths` of the file.
#[derive(Debug, Clone, Default)]
pub struct DecodeContext {
    pub users: Vec<Member>,
    pub paths: BTreeMap<String, Vec<String>>,
}

impl DecodeContext {
    /// Materialize a team from its record.
    ///
    /// Members come out in `users` order, not in the order of the record's
    /// username list. Usernames missing from `users` are skipped, and so are
    /// paths owned by team names that have no record.
    pub fn team(&self, record: TeamRecord) -> Team {
        let members = self
            .users
            .iter()
            .filter(|user| record.usernames.contains(&user.username))
            .cloned()
            .collect();

        let owned_paths = self
            .paths
            .iter()
            .filter(|(_, owners)| owners.contains(&record.name))
            .map(|(path, _)| path.clone())
            .collect();

        Team::from_parts(record.name, record.description, members, owned_paths)
    }
}

/// Parse a record file into teams, in the order the file lists them.
pub fn decode(bytes: &[u8]) -> Result<Vec<Team>, serde_json::Error> {
    let file: RecordFile = serde_json::from_slice(bytes)?;
    let context = DecodeContext {
        users: file.users,
        paths: file.paths,
    };
    Ok(file
        .teams
        .into_iter()
        .map(|record| context.team(record))
        .collect())
}

/// Normalize teams into the on-disk structure.
pub fn normalize(teams: &[Team]) -> RecordFile {
    let mut paths: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for team in teams {
        for path in team.owned_paths() {
            let owners = paths.entry(path.clone()).or_default();
            if !owners.contains(&team.name) {
                owners.push(team.name.clone());
            }
        }
    }

    // First record seen for a username wins.
    let mut seen = HashSet::new();
    let mut users = Vec::new();
    for member in teams.iter().flat_map(|team| &team.members) {
        if seen.insert(member.username.as_str()) {
            users.push(member.clone());
        }
    }
    users.sort_by(|a, b| a.username.cmp(&b.username));

    let teams = teams
        .iter()
        .map(|team| TeamRecord {
            description: team.description.clone(),
            name: team.name.clone(),
            usernames: canonical_usernames(team),
        })
        .collect();

    RecordFile {
        paths,
        teams,
        users,
    }
}

/// Member usernames of `team` in `users` order, which is the order decode
/// rebuilds them in.
fn canonical_usernames(team: &Team) -> Vec<String> {
    let mut usernames: Vec<String> = team.members.iter().map(|m| m.username.clone()).collect();
    usernames.sort();
    usernames
}

/// Serialize teams as pretty-printed JSON with sorted keys.
pub fn encode(teams: &[Team]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(&normalize(teams))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "paths": {
            "/Modules/Bar": ["TeamA", "TeamB"],
            "/Modules/Foo": ["TeamA"],
            "/Orphan": ["Ghosts"]
        },
        "teams": [
            { "name": "TeamB", "description": "second", "team": ["carol"] },
            { "name": "TeamA", "description": "first", "team": ["bob", "alice", "nobody"] }
        ],
        "users": [
            { "username": "alice", "name": "Alice A.", "gitlab_id": 1 },
            { "username": "bob", "name": "Bob B.", "gitlab_id": 2 },
            { "username": "carol", "name": "Carol C.", "gitlab_id": 3 }
        ]
    }"#;

    #[test]
    fn test_decode_keeps_file_order() {
        let teams = decode(SAMPLE.as_bytes()).unwrap();
        let names: Vec<_> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["TeamB", "TeamA"]);
    }

    #[test]
    fn test_decode_orders_members_by_directory() {
        let teams = decode(SAMPLE.as_bytes()).unwrap();
        let usernames: Vec<_> = teams[1].members.iter().map(|m| m.username.as_str()).collect();
        assert_eq!(usernames, ["alice", "bob"]);
    }

    #[test]
    fn test_decode_collects_owned_paths() {
        let teams = decode(SAMPLE.as_bytes()).unwrap();
        assert_eq!(teams[0].owned_paths(), ["/Modules/Bar"]);
        assert_eq!(teams[1].owned_paths(), ["/Modules/Bar", "/Modules/Foo"]);
    }

    #[test]
    fn test_decode_rejects_missing_sections() {
        assert!(decode(br#"{"teams": []}"#).is_err());
        assert!(decode(b"not json").is_err());
    }

    #[test]
    fn test_normalize_inverts_paths_in_team_order() {
        let mut a = Team::new("A", "");
        a.add_path_if_needed("/Shared");
        a.add_path_if_needed("/Zeta");
        let mut b = Team::new("B", "");
        b.add_path_if_needed("/Shared");
        b.add_path_if_needed("/Alpha");

        let file = normalize(&[b, a]);
        let keys: Vec<_> = file.paths.keys().map(String::as_str).collect();
        assert_eq!(keys, ["/Alpha", "/Shared", "/Zeta"]);
        assert_eq!(file.paths["/Shared"], ["B", "A"]);
    }

    #[test]
    fn test_normalize_deduplicates_users() {
        let mut a = Team::new("A", "");
        a.add_member(Member::new("zed", "Zed", 9));
        a.add_member(Member::new("amy", "Amy", 1));
        let mut b = Team::new("B", "");
        b.add_member(Member::new("amy", "Amy (renamed)", 1));

        let file = normalize(&[a, b]);
        let users: Vec<_> = file.users.iter().map(|m| m.username.as_str()).collect();
        assert_eq!(users, ["amy", "zed"]);
        assert_eq!(file.users[0].display_name, "Amy");
        assert_eq!(file.teams[0].usernames, ["amy", "zed"]);
        assert_eq!(file.teams[1].usernames, ["amy"]);
    }

    #[test]
    fn test_encode_is_stable_for_members_added_out_of_order() {
        let mut team = Team::new("TeamA", "");
        team.add_member(Member::new("bob", "Bob B.", 2));
        team.add_member(Member::new("alice", "Alice A.", 1));

        let first = encode(&[team]).unwrap();
        let file: RecordFile = serde_json::from_slice(&first).unwrap();
        assert_eq!(file.teams[0].usernames, ["alice", "bob"]);

        let second = encode(&decode(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_layout() {
        let mut team = Team::new("TeamA", "Owners of Foo");
        team.add_member(Member::new("alice", "Alice A.", 123));
        team.add_path_if_needed("Modules/Foo");

        let json = String::from_utf8(encode(&[team]).unwrap()).unwrap();
        let expected = r#"{
  "paths": {
    "/Modules/Foo": [
      "TeamA"
    ]
  },
  "teams": [
    {
      "description": "Owners of Foo",
      "name": "TeamA",
      "team": [
        "alice"
      ]
    }
  ],
  "users": [
    {
      "gitlab_id": 123,
      "name": "Alice A.",
      "username": "alice"
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_encode_empty() {
        let json = String::from_utf8(encode(&[]).unwrap()).unwrap();
        assert_eq!(json, "{\n  \"paths\": {},\n  \"teams\": [],\n  \"users\": []\n}");
    }
}
