//! Loading and saving the code owners record file.
//!
//! [`OwnershipService`] is the only component that touches the record file.
//! Calls are expected one at a time per opened file: nothing here locks the
//! file, so the last writer wins if another process edits it concurrently.

mod directory;
mod storage;

pub use directory::*;
pub use storage::*;

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec;
use crate::models::{Member, Team};

/// Errors while reading the record file.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to load data from code owners file: {0}")]
    Read(String),

    #[error("Failed to decode data from code owners file: {0}")]
    Decode(String),
}

/// Errors while writing the record file.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Duplicate team names found: {}", names.join(", "))]
    DuplicateTeamNames { names: Vec<String> },

    #[error("Failed to encode data for code owners file: {0}")]
    Encode(String),

    #[error("Failed to write code owners file: {0}")]
    Write(String),
}

/// Result of adding a member looked up by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrollment {
    Added(Member),
    AlreadyMember,
    NotFound,
}

/// Names that appear on more than one team, sorted.
pub fn duplicate_team_names(teams: &[Team]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for team in teams {
        if !seen.insert(team.name.as_str()) {
            duplicates.push(team.name.clone());
        }
    }
    duplicates.sort();
    duplicates.dedup();
    duplicates
}

pub struct OwnershipService<D, S = FileStorage> {
    storage: S,
    directory: D,
}

impl<D: MemberDirectory> OwnershipService<D, FileStorage> {
    /// Service for the record file at `path`.
    pub fn open(path: impl Into<PathBuf>, directory: D) -> Self {
        Self::new(FileStorage::new(path), directory)
    }
}

impl<D: MemberDirectory, S: RecordStorage> OwnershipService<D, S> {
    pub fn new(storage: S, directory: D) -> Self {
        Self { storage, directory }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the record file exists. Does not parse it.
    pub fn has_record_file(&self) -> bool {
        self.storage.exists()
    }

    /// Read and decode every team from the record file.
    pub fn fetch_teams(&self) -> Result<Vec<Team>, FetchError> {
        tracing::debug!(
            "Loading code owners file from {}",
            self.storage.location()
        );

        let bytes = self
            .storage
            .read()
            .map_err(|e| FetchError::Read(e.to_string()))?;
        let teams = codec::decode(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

        tracing::debug!("Loaded {} teams from code owners file", teams.len());
        Ok(teams)
    }

    /// Replace the record file with `teams`.
    ///
    /// Team names are checked for uniqueness first; nothing is written when
    /// the check fails.
    pub fn save(&self, teams: &[Team]) -> Result<(), SaveError> {
        let names = duplicate_team_names(teams);
        if !names.is_empty() {
            tracing::warn!("Refusing to save duplicate team names: {:?}", names);
            return Err(SaveError::DuplicateTeamNames { names });
        }

        tracing::debug!(
            "Saving {} teams to code owners file {}",
            teams.len(),
            self.storage.location()
        );

        let bytes = codec::encode(teams).map_err(|e| SaveError::Encode(e.to_string()))?;
        self.storage
            .write(&bytes)
            .map_err(|e| SaveError::Write(e.to_string()))?;

        tracing::debug!("Code owners file written");
        Ok(())
    }

    /// Look a member up in the external directory.
    pub async fn fetch_member(&self, username: &str) -> Result<Option<Member>, D::Error> {
        self.directory.fetch_by_username(username).await
    }

    /// Look `username` up and add the result to `team`.
    pub async fn add_member_by_username(
        &self,
        team: &mut Team,
        username: &str,
    ) -> Result<Enrollment, D::Error> {
        let Some(member) = self.fetch_member(username).await? else {
            return Ok(Enrollment::NotFound);
        };
        if team.add_member(member.clone()) {
            tracing::info!("Added {} to team {}", member.username, team.name);
            Ok(Enrollment::Added(member))
        } else {
            Ok(Enrollment::AlreadyMember)
        }
    }
}
