pub mod error;
pub mod models;
pub mod registry;
pub mod store;
pub mod validation;
pub mod vote_date;

pub use error::{Error, ErrorCode, Result};
pub use models::*;
pub use registry::VoterRegistry;
pub use store::{MemoryStore, VoterStore};
pub use validation::*;
pub use vote_date::{VoteDate, VoteDateError};
