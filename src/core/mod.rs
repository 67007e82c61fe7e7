#![forbid(unsafe_code)]

//! Core ledger: types, clock boundary, staking, governance, access control, state.

pub mod access;
pub mod clock;
pub mod economics;
pub mod governance;
pub mod runtime;
pub mod state;
pub mod types;
