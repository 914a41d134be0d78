use uuid::Uuid;

/// A team that owns at least one path matching a resolution query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerMatch {
    /// Runtime id of the team. Not stable across reloads; key by `team_name`.
    pub team_id: Uuid,
    pub team_name: String,
    pub team_description: String,
    /// Owned paths of the team that matched the query, in the team's order.
    pub matched_paths: Vec<String>,
}
