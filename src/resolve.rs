//! Path to owner resolution.
//!
//! Paths are compared segment by segment rather than as strings, so a team
//! owning `/Modules/Foo` owns `/Modules/Foo/Helpers.swift` but not
//! `/Modules/Foobar`. The comparison runs up to the shorter of the two paths,
//! which makes the match symmetric: a query for a directory also reports teams
//! owning files below it.

use crate::models::{OwnerMatch, Team};

/// Non-empty `/`-separated segments of `path`.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Whether `owned` and `query` agree on every segment they both have.
pub fn paths_overlap(owned: &str, query: &str) -> bool {
    segments(owned)
        .zip(segments(query))
        .all(|(owned, query)| owned == query)
}

/// Teams owning a path that overlaps `query`, in the order given.
pub fn resolve_owners(query: &str, teams: &[Team]) -> Vec<OwnerMatch> {
    teams
        .iter()
        .filter_map(|team| {
            let matched_paths: Vec<String> = team
                .owned_paths()
                .iter()
                .filter(|owned| paths_overlap(owned, query))
                .cloned()
                .collect();

            if matched_paths.is_empty() {
                return None;
            }
            Some(OwnerMatch {
                team_id: team.id,
                team_name: team.name.clone(),
                team_description: team.description.clone(),
                matched_paths,
            })
        })
        .collect()
}
