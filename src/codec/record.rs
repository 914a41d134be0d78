//! Normalized shape of the record file.
//!
//! Field order matches the sorted key order of the file, so serializing these
//! structs produces sorted objects without a custom serializer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Member;

/// The whole record file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFile {
    /// Owned path -> names of the teams owning it.
    pub paths: BTreeMap<String, Vec<String>>,
    pub teams: Vec<TeamRecord>,
    /// Canonical member directory, sorted by username.
    pub users: Vec<Member>,
}

/// A team as stored on disk: members are referenced by username only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub description: String,
    pub name: String,
    #[serde(rename = "team")]
    pub usernames: Vec<String>,
}
