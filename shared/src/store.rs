//! Storage contract for voter records.
//!
//! Both backends overwrite whole documents: a voter and its history are
//! always read and written together.

use std::collections::HashMap;
use crate::{error::{Error, Result}, models::Voter};

/// Get/set/delete voter records by id.
///
/// Methods take `&mut self`; a store does no locking of its own, so share it
/// behind a `Mutex` when more than one thread needs it.
pub trait VoterStore {
    fn exists(&mut self, voter_id: u64) -> Result<bool>;

    /// Fails with [`ErrorCode::NotFound`](crate::ErrorCode::NotFound) when
    /// there is no record for `voter_id`.
    fn load(&mut self, voter_id: u64) -> Result<Voter>;

    /// Replaces the entire record.
    fn store(&mut self, voter_id: u64, voter: &Voter) -> Result<()>;

    fn delete(&mut self, voter_id: u64) -> Result<()>;

    /// Returns how many records were removed.
    fn delete_all(&mut self) -> Result<usize>;

    /// Every record, in no particular order.
    fn list_all(&mut self) -> Result<Vec<Voter>>;
}

impl<S: VoterStore + ?Sized> VoterStore for Box<S> {
    fn exists(&mut self, voter_id: u64) -> Result<bool> {
        (**self).exists(voter_id)
    }

    fn load(&mut self, voter_id: u64) -> Result<Voter> {
        (**self).load(voter_id)
    }

    fn store(&mut self, voter_id: u64, voter: &Voter) -> Result<()> {
        (**self).store(voter_id, voter)
    }

    fn delete(&mut self, voter_id: u64) -> Result<()> {
        (**self).delete(voter_id)
    }

    fn delete_all(&mut self) -> Result<usize> {
        (**self).delete_all()
    }

    fn list_all(&mut self) -> Result<Vec<Voter>> {
        (**self).list_all()
    }
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    voters: HashMap<u64, Voter>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }
}

impl VoterStore for MemoryStore {
    fn exists(&mut self, voter_id: u64) -> Result<bool> {
        Ok(self.voters.contains_key(&voter_id))
    }

    fn load(&mut self, voter_id: u64) -> Result<Voter> {
        self.voters
            .get(&voter_id)
            .cloned()
            .ok_or_else(|| Error::voter_not_found(voter_id))
    }

    fn store(&mut self, voter_id: u64, voter: &Voter) -> Result<()> {
        self.voters.insert(voter_id, voter.clone());
        Ok(())
    }

    fn delete(&mut self, voter_id: u64) -> Result<()> {
        self.voters
            .remove(&voter_id)
            .map(|_| ())
            .ok_or_else(|| Error::voter_not_found(voter_id))
    }

    fn delete_all(&mut self) -> Result<usize> {
        let count = self.voters.len();
        self.voters.clear();
        Ok(count)
    }

    fn list_all(&mut self) -> Result<Vec<Voter>> {
        Ok(self.voters.values().cloned().collect())
    }
}
