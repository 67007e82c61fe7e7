// Copyright (c) 2026 Crozz Coin
// Licensed under the Apache License, Version 2.0

//! Reward accrual: time-proportional yield on staked principal.
//!
//! The chain truncates at every step (annual -> daily -> hourly -> elapsed hours),
//! so results are reproduced with the same order of integer divisions.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::types::{TimestampMs, MS_PER_HOUR};

/// Basis point denominator.
pub const BPS_DENOMINATOR: u64 = 10_000;
const DAYS_PER_YEAR: u64 = 365;
const HOURS_PER_DAY: u64 = 24;

/// Reward arithmetic errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RewardError {
    #[error("reward arithmetic overflow")]
    Overflow,
}

/// Reward for `principal` at `rate_bps` APY over `elapsed_ms`, paid per whole hour.
///
/// Intermediate steps run in u128; only a result that does not fit u64 is an overflow.
pub fn compute_reward(principal: u64, rate_bps: u64, elapsed_ms: u64) -> Result<u64, RewardError> {
    let annual = u128::from(principal) * u128::from(rate_bps) / u128::from(BPS_DENOMINATOR);
    let daily = annual / u128::from(DAYS_PER_YEAR);
    let hourly = daily / u128::from(HOURS_PER_DAY);
    let hours = u128::from(elapsed_ms / MS_PER_HOUR);
    let reward = hourly.checked_mul(hours).ok_or(RewardError::Overflow)?;
    u64::try_from(reward).map_err(|_| RewardError::Overflow)
}

/// Reward accrued between two timestamps; a `to` earlier than `from` counts as no time.
pub fn accrued_between(
    principal: u64,
    rate_bps: u64,
    from: TimestampMs,
    to: TimestampMs,
) -> Result<u64, RewardError> {
    compute_reward(principal, rate_bps, to.saturating_sub(from))
}
