#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Snapshot persistence and ledger commitments.

pub mod merkle;
pub mod persistent_state;
