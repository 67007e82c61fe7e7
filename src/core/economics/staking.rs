#![allow(missing_docs)]
// Copyright (c) 2026 Crozz Coin
// Licensed under the Apache License, Version 2.0

//! Deterministic stake ledger: stake records, pool aggregates, reward payouts.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::economics::rewards::{accrued_between, RewardError};
use crate::core::types::{Address, StakeRecordId, TimestampMs, MS_PER_HOUR};

/// Floor for `min_stake_amount`, in base units.
pub const MIN_STAKE_FLOOR: u64 = 1_000_000;
/// Default APY in basis points.
pub const DEFAULT_REWARD_RATE_BPS: u64 = 500;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("invalid amount: {amount} is below the minimum stake {min}")]
    InvalidAmount { amount: u64, min: u64 },
    #[error("caller does not own stake record {0}")]
    NotOwner(StakeRecordId),
    #[error("stake record {0} not found")]
    StakeNotFound(StakeRecordId),
    #[error("reward pool exhausted: need {needed}, have {available}")]
    RewardPoolExhausted { needed: u64, available: u64 },
    #[error("arithmetic overflow")]
    Overflow,
}

impl From<RewardError> for StakingError {
    fn from(_: RewardError) -> Self {
        StakingError::Overflow
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    pub id: StakeRecordId,
    pub owner: Address,
    pub amount: u64,
    pub staking_timestamp: TimestampMs,
    pub last_reward_claim_timestamp: TimestampMs,
    /// Accrued, unclaimed rewards.
    pub pending_rewards: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPool {
    /// Sum of `amount` over all live stake records.
    pub total_staked: u64,
    pub total_reward_pool_balance: u64,
    pub reward_rate_bps: u64,
    pub min_stake_amount: u64,
    pub last_reward_timestamp: TimestampMs,
    pub total_rewards_paid: u64,
    /// Rewards paid beyond the funded balance (only when the pool is not enforced).
    pub total_rewards_unfunded: u64,
    pub enforce_reward_pool: bool,
}

impl Default for StakingPool {
    fn default() -> Self {
        Self {
            total_staked: 0,
            total_reward_pool_balance: 0,
            reward_rate_bps: DEFAULT_REWARD_RATE_BPS,
            min_stake_amount: MIN_STAKE_FLOOR,
            last_reward_timestamp: 0,
            total_rewards_paid: 0,
            total_rewards_unfunded: 0,
            enforce_reward_pool: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeLedger {
    pub pool: StakingPool,
    /// Live records keyed by id.
    records: BTreeMap<StakeRecordId, StakeRecord>,
    /// Aggregate live stake per owner (voting power).
    by_owner: BTreeMap<Address, u64>,
    next_id: u64,
}

impl StakeLedger {
    pub fn new(pool: StakingPool) -> Self {
        Self {
            pool,
            records: BTreeMap::new(),
            by_owner: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Lock `amount` for `owner` in a new record.
    pub fn stake(
        &mut self,
        owner: Address,
        amount: u64,
        now: TimestampMs,
    ) -> Result<StakeRecordId, StakingError> {
        if amount < self.pool.min_stake_amount {
            return Err(StakingError::InvalidAmount {
                amount,
                min: self.pool.min_stake_amount,
            });
        }
        let total = self
            .pool
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let owner_total = self
            .voting_power(&owner)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;

        let id = StakeRecordId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.records.insert(
            id,
            StakeRecord {
                id,
                owner,
                amount,
                staking_timestamp: now,
                last_reward_claim_timestamp: now,
                pending_rewards: 0,
            },
        );
        self.by_owner.insert(owner, owner_total);
        self.pool.total_staked = total;
        self.pool.last_reward_timestamp = now;
        Ok(id)
    }

    /// Consume the record and return `(amount, total_rewards)`.
    pub fn unstake(
        &mut self,
        id: StakeRecordId,
        caller: &Address,
        now: TimestampMs,
    ) -> Result<(u64, u64), StakingError> {
        let rec = self.owned(id, caller)?;
        let amount = rec.amount;
        let rewards = self.owed(rec, now)?;
        self.check_payout(rewards)?;

        self.records.remove(&id);
        let left = self.voting_power(caller).saturating_sub(amount);
        if left == 0 {
            self.by_owner.remove(caller);
        } else {
            self.by_owner.insert(*caller, left);
        }
        self.pool.total_staked = self.pool.total_staked.saturating_sub(amount);
        self.pool.last_reward_timestamp = now;
        self.pay_out(rewards);
        Ok((amount, rewards))
    }

    /// Pay out everything accrued since the last claim.
    pub fn claim_rewards(
        &mut self,
        id: StakeRecordId,
        caller: &Address,
        now: TimestampMs,
    ) -> Result<u64, StakingError> {
        let rec = self.owned(id, caller)?;
        let rewards = self.owed(rec, now)?;
        self.check_payout(rewards)?;

        if let Some(rec) = self.records.get_mut(&id) {
            rec.pending_rewards = 0;
            rec.last_reward_claim_timestamp = now.max(rec.last_reward_claim_timestamp);
        }
        self.pool.last_reward_timestamp = now;
        self.pay_out(rewards);
        Ok(rewards)
    }

    /// Move accrued rewards of every record into `pending_rewards`.
    ///
    /// Only whole elapsed hours are checkpointed, so no accrual is lost to truncation.
    /// Run before changing the reward rate so past time is paid at the old rate.
    pub fn checkpoint_all(&mut self, now: TimestampMs) -> Result<(), StakingError> {
        let rate = self.pool.reward_rate_bps;
        let mut updates = Vec::with_capacity(self.records.len());
        for rec in self.records.values() {
            let hours = now.saturating_sub(rec.last_reward_claim_timestamp) / MS_PER_HOUR;
            if hours == 0 {
                continue;
            }
            let until = rec.last_reward_claim_timestamp + hours * MS_PER_HOUR;
            let accrued = accrued_between(rec.amount, rate, rec.last_reward_claim_timestamp, until)?;
            let pending = rec
                .pending_rewards
                .checked_add(accrued)
                .ok_or(StakingError::Overflow)?;
            updates.push((rec.id, pending, until));
        }
        for (id, pending, until) in updates {
            if let Some(rec) = self.records.get_mut(&id) {
                rec.pending_rewards = pending;
                rec.last_reward_claim_timestamp = until;
            }
        }
        Ok(())
    }

    /// Add funds to the reward pool.
    pub fn fund_reward_pool(&mut self, amount: u64) -> Result<u64, StakingError> {
        if amount == 0 {
            return Err(StakingError::InvalidAmount { amount, min: 1 });
        }
        self.pool.total_reward_pool_balance = self
            .pool
            .total_reward_pool_balance
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        Ok(self.pool.total_reward_pool_balance)
    }

    pub fn total_staked(&self) -> u64 {
        self.pool.total_staked
    }

    pub fn get_stake_amount(&self, id: StakeRecordId) -> Result<u64, StakingError> {
        self.get(id).map(|r| r.amount)
    }

    pub fn get(&self, id: StakeRecordId) -> Result<&StakeRecord, StakingError> {
        self.records.get(&id).ok_or(StakingError::StakeNotFound(id))
    }

    /// Rewards a claim at `now` would pay, without mutating anything.
    pub fn pending_rewards(&self, id: StakeRecordId, now: TimestampMs) -> Result<u64, StakingError> {
        let rec = self.get(id)?;
        self.owed(rec, now)
    }

    /// Live records of `owner`, ordered by id.
    pub fn stakes_of(&self, owner: &Address) -> Vec<&StakeRecord> {
        self.records.values().filter(|r| &r.owner == owner).collect()
    }

    /// Aggregate live stake of `owner`.
    pub fn voting_power(&self, owner: &Address) -> u64 {
        self.by_owner.get(owner).copied().unwrap_or(0)
    }

    pub fn records(&self) -> impl Iterator<Item = &StakeRecord> {
        self.records.values()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    fn owned(&self, id: StakeRecordId, caller: &Address) -> Result<&StakeRecord, StakingError> {
        let rec = self.get(id)?;
        if &rec.owner != caller {
            return Err(StakingError::NotOwner(id));
        }
        Ok(rec)
    }

    fn owed(&self, rec: &StakeRecord, now: TimestampMs) -> Result<u64, StakingError> {
        let accrued = accrued_between(
            rec.amount,
            self.pool.reward_rate_bps,
            rec.last_reward_claim_timestamp,
            now,
        )?;
        rec.pending_rewards
            .checked_add(accrued)
            .ok_or(StakingError::Overflow)
    }

    fn check_payout(&self, amount: u64) -> Result<(), StakingError> {
        if self.pool.enforce_reward_pool && amount > self.pool.total_reward_pool_balance {
            return Err(StakingError::RewardPoolExhausted {
                needed: amount,
                available: self.pool.total_reward_pool_balance,
            });
        }
        Ok(())
    }

    fn pay_out(&mut self, amount: u64) {
        let balance = self.pool.total_reward_pool_balance;
        if amount > balance {
            self.pool.total_rewards_unfunded =
                self.pool.total_rewards_unfunded.saturating_add(amount - balance);
        }
        self.pool.total_reward_pool_balance = balance.saturating_sub(amount);
        self.pool.total_rewards_paid = self.pool.total_rewards_paid.saturating_add(amount);
    }
}
