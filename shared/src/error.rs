use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Voter not found")]
    NotFound,
    #[error("Voter already exists")]
    AlreadyExists,
    #[error("Poll already voted")]
    DuplicatePoll,
    #[error("No vote history")]
    NoHistory,
    #[error("Vote history not found")]
    HistoryNotFound,
    #[error("Storage backend error")]
    Backend,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn voter_not_found(voter_id: u64) -> Self {
        Self::new(ErrorCode::NotFound, format!("voter {voter_id} not found"))
    }

    pub fn backend(message: impl Into<String>, details: impl fmt::Display) -> Self {
        Self::with_details(ErrorCode::Backend, message, details.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::backend("malformed voter document", err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
