//! The decision port: who says whether a duplicate gets moved.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Answer to a [`DecisionRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Move the candidate into the destination folder
    Move,
    /// Leave the candidate where it is
    Keep,
}

/// Asked once per detected duplicate pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// The file the candidate resembles
    pub reference: PathBuf,
    /// The file that would be moved
    pub candidate: PathBuf,
    /// Position of the candidate in the working list
    pub candidate_index: usize,
    /// Files listed when the scan started
    pub total_files: usize,
    /// Where the candidate would go
    pub destination: PathBuf,
}

/// Supplies keep/move decisions; the scan waits for each answer.
pub trait DecisionPort {
    fn request(&mut self, request: &DecisionRequest) -> Decision;
}

impl<F> DecisionPort for F
where
    F: FnMut(&DecisionRequest) -> Decision,
{
    fn request(&mut self, request: &DecisionRequest) -> Decision {
        self(request)
    }
}

/// Moves every duplicate without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysMove;

impl DecisionPort for AlwaysMove {
    fn request(&mut self, _request: &DecisionRequest) -> Decision {
        Decision::Move
    }
}

/// Keeps every duplicate; useful for dry runs
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysKeep;

impl DecisionPort for AlwaysKeep {
    fn request(&mut self, _request: &DecisionRequest) -> Decision {
        Decision::Keep
    }
}
