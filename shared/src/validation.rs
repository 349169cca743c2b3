use crate::models::{UpdateVoterHistoryRequest, VoterRequest};
use crate::vote_date::{VoteDate, VOTE_DATE_LAYOUT};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name and email are required")]
    MissingNameOrEmail,
    #[error("Invalid date. Expected format: {VOTE_DATE_LAYOUT}")]
    InvalidVoteDate(String),
}

pub fn validate_new_voter(request: &VoterRequest) -> Result<(), ValidationError> {
    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(ValidationError::MissingNameOrEmail);
    }
    Ok(())
}

/// Parses the optional `voteDate` of a history update.
pub fn parse_history_update(request: &UpdateVoterHistoryRequest) -> Result<Option<VoteDate>, ValidationError> {
    request
        .vote_date
        .as_deref()
        .map(|text| {
            VoteDate::parse(text).map_err(|_| ValidationError::InvalidVoteDate(text.to_string()))
        })
        .transpose()
}
