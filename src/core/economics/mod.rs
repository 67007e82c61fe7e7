#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Stake ledger and reward accrual.

pub mod rewards;
pub mod staking;
