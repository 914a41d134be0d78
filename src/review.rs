//! Review rules for a merge request's change set.
//!
//! Owning teams are found by resolving every changed file against the
//! registry. Each owning team must approve the change through at least one of
//! its members, and the author never counts as a reviewer or approver for
//! their own change. The total approval threshold only applies to changes no
//! reviewable team owns.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::Team;
use crate::resolve::resolve_owners;

/// Thresholds applied to a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPolicy {
    /// Approvals required in total.
    pub min_approvals: usize,
    /// Reviewers a plan should reach, filling up from other teams if needed.
    pub min_reviewers: usize,
    /// Team whose members can approve any change on their own once they
    /// provide `min_approvals` approvals.
    pub override_team: Option<String>,
    /// Teams never drawn from when filling up reviewers.
    pub excluded_teams: Vec<String>,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            min_approvals: 2,
            min_reviewers: 3,
            override_team: None,
            excluded_teams: Vec::new(),
        }
    }
}

/// Who owns a change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeOwnership {
    /// Names of every team owning at least one changed file.
    pub teams: BTreeSet<String>,
    /// Changed files no team owns, in input order.
    pub unowned: Vec<String>,
}

pub fn change_ownership(changed_paths: &[impl AsRef<str>], teams: &[Team]) -> ChangeOwnership {
    let mut ownership = ChangeOwnership::default();
    for path in changed_paths {
        let path = path.as_ref();
        let owners = resolve_owners(path, teams);
        if owners.is_empty() {
            ownership.unowned.push(path.to_string());
        }
        ownership
            .teams
            .extend(owners.into_iter().map(|owner| owner.team_name));
    }
    ownership
}

/// Members of the named teams who can review, without `author`.
///
/// Teams left with nobody after removing the author are dropped.
pub fn team_reviewers(
    teams: &[Team],
    names: &BTreeSet<String>,
    author: &str,
) -> BTreeMap<String, BTreeSet<String>> {
    teams
        .iter()
        .filter(|team| names.contains(&team.name))
        .filter_map(|team| {
            let reviewers: BTreeSet<String> = team
                .members
                .iter()
                .map(|m| m.username.clone())
                .filter(|username| username != author)
                .collect();
            (!reviewers.is_empty()).then(|| (team.name.clone(), reviewers))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalVerdict {
    Approved,
    InsufficientApprovals { required: usize, given: usize },
    /// Owning teams with no approval from any of their members.
    MissingTeams { teams: Vec<String> },
}

impl ApprovalVerdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Decide whether `approvers` are enough to merge a change to `changed_paths`.
pub fn check_approvals(
    policy: &ReviewPolicy,
    teams: &[Team],
    changed_paths: &[impl AsRef<str>],
    approvers: &[impl AsRef<str>],
    author: &str,
) -> ApprovalVerdict {
    let approvers: BTreeSet<&str> = approvers
        .iter()
        .map(|a| a.as_ref())
        .filter(|username| *username != author)
        .collect();

    if let Some(override_team) = policy
        .override_team
        .as_deref()
        .and_then(|name| teams.iter().find(|t| t.name == name))
    {
        let count = approvers
            .iter()
            .filter(|username| override_team.has_member(username))
            .count();
        if count >= policy.min_approvals {
            tracing::debug!("Approved by {} members of {}", count, override_team.name);
            return ApprovalVerdict::Approved;
        }
    }

    let ownership = change_ownership(changed_paths, teams);
    let responsible = team_reviewers(teams, &ownership.teams, author);

    if responsible.is_empty() {
        if approvers.len() < policy.min_approvals {
            return ApprovalVerdict::InsufficientApprovals {
                required: policy.min_approvals,
                given: approvers.len(),
            };
        }
        return ApprovalVerdict::Approved;
    }

    let missing: Vec<String> = responsible
        .iter()
        .filter(|(_, members)| !members.iter().any(|m| approvers.contains(m.as_str())))
        .map(|(name, _)| name.clone())
        .collect();
    if !missing.is_empty() {
        return ApprovalVerdict::MissingTeams { teams: missing };
    }
    ApprovalVerdict::Approved
}

/// Reviewers to request for a change set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewPlan {
    /// Owning team -> members who must be asked.
    pub team_reviewers: BTreeMap<String, BTreeSet<String>>,
    /// Changed files without an owner.
    pub unowned: Vec<String>,
    /// Already requested reviewers plus every team reviewer.
    pub reviewers: BTreeSet<String>,
    /// How many more reviewers are needed to reach the policy minimum.
    pub extra_needed: usize,
    /// Who the extra reviewers can be picked from.
    pub candidates: BTreeSet<String>,
}

pub fn plan_reviewers(
    policy: &ReviewPolicy,
    teams: &[Team],
    changed_paths: &[impl AsRef<str>],
    author: &str,
    existing: &[impl AsRef<str>],
) -> ReviewPlan {
    let ownership = change_ownership(changed_paths, teams);
    let team_reviewers = team_reviewers(teams, &ownership.teams, author);

    let mut reviewers: BTreeSet<String> = existing
        .iter()
        .map(|r| r.as_ref().to_string())
        .collect();
    reviewers.extend(team_reviewers.values().flatten().cloned());

    let extra_needed = policy.min_reviewers.saturating_sub(reviewers.len());
    let candidates = if extra_needed == 0 {
        BTreeSet::new()
    } else {
        teams
            .iter()
            .filter(|t| !policy.excluded_teams.contains(&t.name))
            .flat_map(|t| &t.members)
            .map(|m| m.username.clone())
            .filter(|username| username != author && !reviewers.contains(username))
            .collect()
    };

    ReviewPlan {
        team_reviewers,
        unowned: ownership.unowned,
        reviewers,
        extra_needed,
        candidates,
    }
}
