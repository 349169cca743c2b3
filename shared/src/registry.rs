use tracing::{debug, info};
use crate::{
    error::{Error, ErrorCode, Result},
    models::{Voter, VoterHistory},
    store::VoterStore,
    vote_date::VoteDate,
};

/// Business rules for voters and their vote history.
///
/// Every mutation loads the voter, edits it in memory and stores the whole
/// record back. Values handed out are always independent copies.
#[derive(Debug)]
pub struct VoterRegistry<S> {
    store: S,
}

impl<S: VoterStore> VoterRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get_voters(&mut self) -> Result<Vec<Voter>> {
        self.store.list_all()
    }

    pub fn delete_voters(&mut self) -> Result<usize> {
        let deleted = self.store.delete_all()?;
        info!(deleted, "Deleted all voters");
        Ok(deleted)
    }

    pub fn add_voter(&mut self, voter: Voter) -> Result<Voter> {
        if self.store.exists(voter.voter_id)? {
            return Err(Error::new(
                ErrorCode::AlreadyExists,
                format!("voter {} already exists", voter.voter_id),
            ));
        }

        self.store.store(voter.voter_id, &voter)?;
        debug!(voter_id = voter.voter_id, "Added voter");
        Ok(voter)
    }

    pub fn get_voter(&mut self, voter_id: u64) -> Result<Voter> {
        self.store.load(voter_id)
    }

    /// Empty `name` or `email` leaves that field as it is.
    pub fn update_voter(&mut self, voter_id: u64, name: &str, email: &str) -> Result<Voter> {
        let mut voter = self.store.load(voter_id)?;

        if !name.is_empty() {
            voter.name = name.to_string();
        }
        if !email.is_empty() {
            voter.email = email.to_string();
        }

        self.store.store(voter_id, &voter)?;
        Ok(voter)
    }

    pub fn delete_voter(&mut self, voter_id: u64) -> Result<Voter> {
        let voter = self.store.load(voter_id)?;
        self.store.delete(voter_id)?;
        debug!(voter_id, "Deleted voter");
        Ok(voter)
    }

    pub fn get_voter_histories(&mut self, voter_id: u64) -> Result<Vec<VoterHistory>> {
        let voter = self.store.load(voter_id)?;
        if voter.vote_history.is_empty() {
            return Err(Error::new(
                ErrorCode::NoHistory,
                format!("voter {voter_id} has no vote history"),
            ));
        }
        Ok(voter.vote_history)
    }

    pub fn add_voter_history(&mut self, voter_id: u64, poll_id: u64, vote_id: u64) -> Result<VoterHistory> {
        let mut voter = self.store.load(voter_id)?;

        if voter.has_voted_in(poll_id) {
            return Err(Error::new(
                ErrorCode::DuplicatePoll,
                format!("voter {voter_id} has already voted in poll {poll_id}"),
            ));
        }

        let entry = VoterHistory::new(poll_id, vote_id, VoteDate::now());
        voter.vote_history.push(entry.clone());
        self.store.store(voter_id, &voter)?;

        debug!(voter_id, poll_id, vote_id, "Recorded vote");
        Ok(entry)
    }

    pub fn get_voter_history(&mut self, voter_id: u64, poll_id: u64) -> Result<VoterHistory> {
        let voter = self.store.load(voter_id)?;
        let index = history_index(&voter, poll_id)?;
        Ok(voter.vote_history[index].clone())
    }

    pub fn update_voter_history(
        &mut self,
        voter_id: u64,
        poll_id: u64,
        vote_id: Option<u64>,
        vote_date: Option<VoteDate>,
    ) -> Result<VoterHistory> {
        let mut voter = self.store.load(voter_id)?;
        let index = history_index(&voter, poll_id)?;

        let entry = &mut voter.vote_history[index];
        if let Some(vote_id) = vote_id {
            entry.vote_id = vote_id;
        }
        if let Some(vote_date) = vote_date {
            entry.vote_date = vote_date;
        }
        let updated = entry.clone();

        self.store.store(voter_id, &voter)?;
        Ok(updated)
    }

    pub fn delete_voter_history(&mut self, voter_id: u64, poll_id: u64) -> Result<VoterHistory> {
        let mut voter = self.store.load(voter_id)?;
        let index = history_index(&voter, poll_id)?;
        let removed = voter.vote_history[index].clone();

        voter.remove_history(poll_id);
        self.store.store(voter_id, &voter)?;

        debug!(voter_id, poll_id, "Deleted vote history entry");
        Ok(removed)
    }
}

fn history_index(voter: &Voter, poll_id: u64) -> Result<usize> {
    voter.history_index(poll_id).ok_or_else(|| {
        Error::new(
            ErrorCode::HistoryNotFound,
            format!("voter {} has no vote history for poll {poll_id}", voter.voter_id),
        )
    })
}
