//! An opened set of teams being edited.
//!
//! Edits made through a [`Registry`] only mark it dirty; nothing reaches the
//! record file until [`Registry::flush`] is called. Teams are addressed by
//! name because their runtime ids change on every reload.

use thiserror::Error;

use crate::models::{Member, OwnerMatch, Team};
use crate::resolve;
use crate::service::{
    duplicate_team_names, FetchError, MemberDirectory, OwnershipService, RecordStorage, SaveError,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A team named {0} already exists")]
    DuplicateTeamName(String),

    #[error("Team not found: {0}")]
    TeamNotFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    teams: Vec<Team>,
    dirty: bool,
}

impl Registry {
    pub fn new(teams: Vec<Team>) -> Self {
        Self {
            teams,
            dirty: false,
        }
    }

    /// Load every team from the service's record file, sorted by name.
    pub fn load<D, S>(service: &OwnershipService<D, S>) -> Result<Self, FetchError>
    where
        D: MemberDirectory,
        S: RecordStorage,
    {
        let mut teams = service.fetch_teams()?;
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self::new(teams))
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Mutable access to a team. Marks the registry dirty when the team exists.
    pub fn team_mut(&mut self, name: &str) -> Option<&mut Team> {
        let team = self.teams.iter_mut().find(|t| t.name == name)?;
        self.dirty = true;
        Some(team)
    }

    pub fn add_team(&mut self, team: Team) -> Result<(), RegistryError> {
        if self.team(&team.name).is_some() {
            return Err(RegistryError::DuplicateTeamName(team.name));
        }
        self.teams.push(team);
        self.dirty = true;
        Ok(())
    }

    pub fn remove_team(&mut self, name: &str) -> Option<Team> {
        let index = self.teams.iter().position(|t| t.name == name)?;
        self.dirty = true;
        Some(self.teams.remove(index))
    }

    pub fn rename_team(&mut self, name: &str, new_name: &str) -> Result<(), RegistryError> {
        if name != new_name && self.team(new_name).is_some() {
            return Err(RegistryError::DuplicateTeamName(new_name.to_string()));
        }
        let team = self
            .team_mut(name)
            .ok_or_else(|| RegistryError::TeamNotFound(name.to_string()))?;
        team.rename(new_name);
        Ok(())
    }

    /// Give the team called `name` ownership of `path`.
    ///
    /// Returns `false` and leaves the registry clean when the path is blank or
    /// already owned.
    pub fn add_path(&mut self, name: &str, path: &str) -> Result<bool, RegistryError> {
        let team = self.find_mut(name)?;
        let added = team.add_path_if_needed(path);
        self.dirty |= added;
        Ok(added)
    }

    /// Take `path` away from the team called `name`. Returns `false` when the
    /// team did not own it.
    pub fn remove_path(&mut self, name: &str, path: &str) -> Result<bool, RegistryError> {
        let team = self.find_mut(name)?;
        let before = team.owned_paths().len();
        team.remove_path(path);
        let removed = team.owned_paths().len() != before;
        self.dirty |= removed;
        Ok(removed)
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut Team, RegistryError> {
        self.teams
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| RegistryError::TeamNotFound(name.to_string()))
    }

    /// Whether two teams share a name. Possible after direct edits through
    /// [`Registry::team_mut`]; saving is refused in that state.
    pub fn has_duplicate_team_names(&self) -> bool {
        !duplicate_team_names(&self.teams).is_empty()
    }

    /// The first member record with `username` across all teams.
    pub fn member(&self, username: &str) -> Option<&Member> {
        self.teams
            .iter()
            .flat_map(|t| &t.members)
            .find(|m| m.username == username)
    }

    /// Teams `username` belongs to.
    pub fn teams_of<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a Team> + 'a {
        self.teams.iter().filter(move |t| t.has_member(username))
    }

    /// Whether `viewer` may edit the team called `name`. Unknown teams are not editable.
    pub fn can_edit(&self, name: &str, viewer: &str, admin_mode: bool) -> bool {
        self.team(name)
            .is_some_and(|t| t.is_editable_by(viewer, admin_mode))
    }

    pub fn owners(&self, query: &str) -> Vec<OwnerMatch> {
        resolve::resolve_owners(query, &self.teams)
    }

    /// External ids of the given usernames, for members known to any team.
    pub fn external_ids<'a>(&self, usernames: impl IntoIterator<Item = &'a str>) -> Vec<i64> {
        let mut ids: Vec<i64> = usernames
            .into_iter()
            .filter_map(|username| self.member(username))
            .map(|m| m.external_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the registry dirty after edits made outside [`Registry::team_mut`].
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Save pending edits. Returns `false` when there was nothing to save.
    ///
    /// The dirty flag is kept when saving fails so the edits can be retried.
    pub fn flush<D, S>(&mut self, service: &OwnershipService<D, S>) -> Result<bool, SaveError>
    where
        D: MemberDirectory,
        S: RecordStorage,
    {
        if !self.dirty {
            return Ok(false);
        }
        service.save(&self.teams)?;
        self.dirty = false;
        tracing::info!("Saved {} teams", self.teams.len());
        Ok(true)
    }

    pub fn into_teams(self) -> Vec<Team> {
        self.teams
    }
}
