//! Integration tests for the transcript endpoint, run against stub
//! collaborators.

pub mod e2e;
pub mod fixtures;
