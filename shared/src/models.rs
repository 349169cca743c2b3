use serde::{Serialize, Deserialize};
use crate::vote_date::VoteDate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoterHistory {
    pub poll_id: u64,
    pub vote_id: u64,
    pub vote_date: VoteDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub voter_id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub vote_history: Vec<VoterHistory>,
}

/// Body of `POST /voters/<id>` and `PUT /voters/<id>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoterRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVoterHistoryRequest {
    pub vote_id: u64,
}

/// Absent fields leave the stored entry untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVoterHistoryRequest {
    #[serde(default)]
    pub vote_id: Option<u64>,
    #[serde(default)]
    pub vote_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    pub status: String,
    pub uptime: String,
    pub num_api_calls: u64,
    pub num_api_errors: u64,
}

impl VoterHistory {
    pub fn new(poll_id: u64, vote_id: u64, vote_date: VoteDate) -> Self {
        Self { poll_id, vote_id, vote_date }
    }
}

impl Voter {
    pub fn new(voter_id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            voter_id,
            name: name.into(),
            email: email.into(),
            vote_history: Vec::new(),
        }
    }

    /// Index of the entry for `poll_id`. Callers mutate through the index so
    /// the edit lands in the list that gets stored.
    pub fn history_index(&self, poll_id: u64) -> Option<usize> {
        self.vote_history.iter().position(|h| h.poll_id == poll_id)
    }

    pub fn has_voted_in(&self, poll_id: u64) -> bool {
        self.history_index(poll_id).is_some()
    }

    /// Removes the entry for `poll_id`, keeping the others in order.
    pub fn remove_history(&mut self, poll_id: u64) {
        self.vote_history.retain(|h| h.poll_id != poll_id);
    }
}
