// Copyright (c) 2026 Crozz Coin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Command/query facade over the stake ledger, governance and admin registry.
//!
//! All state lives in one [`LedgerState`] behind a `RwLock`: commands hold the
//! write lock for their whole duration, queries share the read lock. Every
//! command validates before it mutates, so a rejected command leaves the state
//! exactly as it was.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::access::roles::{AccessError, AdminRegistry, AdminUser, Permission, Role};
use crate::core::clock::Clock;
use crate::core::economics::staking::{StakeLedger, StakeRecord, StakingError, StakingPool};
use crate::core::governance::params::{GovernanceParams, ParamError, ParamType};
use crate::core::governance::proposals::{
    ExecutionOutcome, Governance, GovernanceError, Proposal, ProposalStatus, ProposalType,
    VoteRecord,
};
use crate::core::types::{
    Address, LedgerConfig, ProposalId, StakeRecordId, TimestampMs, VoteRecordId,
};

/// Audit events kept in memory.
pub const EVENT_LOG_CAPACITY: usize = 1024;

/// Facade errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Staking(#[from] StakingError),
    #[error(transparent)]
    Governance(#[from] GovernanceError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("ledger lock poisoned")]
    Poisoned,
}

impl From<ParamError> for LedgerError {
    fn from(e: ParamError) -> Self {
        LedgerError::Access(AccessError::Param(e))
    }
}

impl LedgerError {
    /// Stable error kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Staking(e) => match e {
                StakingError::InvalidAmount { .. } => "InvalidAmount",
                StakingError::NotOwner(_) => "NotOwner",
                StakingError::StakeNotFound(_) => "StakeNotFound",
                StakingError::RewardPoolExhausted { .. } => "RewardPoolExhausted",
                StakingError::Overflow => "Overflow",
            },
            LedgerError::Governance(e) => match e {
                GovernanceError::ProposalNotFound(_) => "ProposalNotFound",
                GovernanceError::InsufficientStake { .. } => "InsufficientStake",
                GovernanceError::ProposalNotActive(_) => "ProposalNotActive",
                GovernanceError::ProposalExpired(_) => "ProposalExpired",
                GovernanceError::InvalidVotingPower => "InvalidVotingPower",
                GovernanceError::AlreadyVoted { .. } => "AlreadyVoted",
                GovernanceError::NotReady { .. } => "NotReady",
                GovernanceError::ProposalNotPassed(_) => "ProposalNotPassed",
                GovernanceError::InvalidProposal(_) => "InvalidProposal",
                GovernanceError::Overflow => "Overflow",
            },
            LedgerError::Access(e) => match e {
                AccessError::NotAdmin(_) => "NotAdmin",
                AccessError::PermissionDenied(_) => "PermissionDenied",
                AccessError::InvalidRole(_) => "InvalidRole",
                AccessError::AdminNotFound(_) => "AdminNotFound",
                AccessError::LastSuperAdmin => "LastSuperAdmin",
                AccessError::Param(ParamError::InvalidParamType(_)) => "InvalidParamType",
                AccessError::Param(ParamError::InvalidUpdateValue { .. }) => "InvalidUpdateValue",
            },
            LedgerError::Poisoned => "Poisoned",
        }
    }
}

/// What happened.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Staked { record: StakeRecordId, amount: u64 },
    Unstaked { record: StakeRecordId, amount: u64, rewards: u64 },
    RewardsClaimed { record: StakeRecordId, rewards: u64 },
    RewardPoolFunded { amount: u64, balance: u64 },
    ProposalCreated { proposal: ProposalId, proposal_type: ProposalType },
    VoteCast { proposal: ProposalId, support: bool, voting_power: u64 },
    ProposalFinalized { proposal: ProposalId, status: ProposalStatus },
    ProposalExecuted { proposal: ProposalId, outcome: ExecutionOutcome },
    AdminAdded { target: Address, role: Role },
    AdminRemoved { target: Address },
    AdminRoleUpdated { target: Address, old: Role, new: Role },
    PermissionChanged { target: Address, permission: Permission, granted: bool },
    ParameterUpdated { param: ParamType, old: u64, new: u64, direct: bool },
}

/// Audit log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Monotonic sequence number.
    pub seq: u64,
    /// Clock time.
    pub at: TimestampMs,
    /// Principal that issued the command.
    pub actor: Address,
    /// Payload.
    pub kind: EventKind,
}

/// Everything the ledger owns. Serializable as a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Stake records and pool.
    pub stakes: StakeLedger,
    /// Proposals and votes.
    pub governance: Governance,
    /// Governance parameters.
    pub params: GovernanceParams,
    /// Admin set.
    pub admins: AdminRegistry,
    events: VecDeque<LedgerEvent>,
    event_seq: u64,
}

impl LedgerState {
    /// Fresh state at initialization.
    pub fn genesis(cfg: &LedgerConfig, params: GovernanceParams, now: TimestampMs) -> Self {
        let pool = StakingPool {
            reward_rate_bps: params.reward_rate_bps,
            min_stake_amount: params.min_stake_amount,
            last_reward_timestamp: now,
            enforce_reward_pool: cfg.enforce_reward_pool,
            ..StakingPool::default()
        };
        Self {
            stakes: StakeLedger::new(pool),
            governance: Governance::new(cfg.quorum),
            params,
            admins: AdminRegistry::new(
                cfg.bootstrap_super_admin,
                cfg.allow_direct_param_updates,
                now,
            ),
            events: VecDeque::new(),
            event_seq: 0,
        }
    }

    /// `[ledger]` keys whose configured value differs from what this state was built with.
    pub fn config_drift(&self, cfg: &LedgerConfig) -> Vec<&'static str> {
        let mut drift = Vec::new();
        if self.admins.bootstrap_admin() != cfg.bootstrap_super_admin {
            drift.push("bootstrap_super_admin");
        }
        if self.governance.quorum_policy() != cfg.quorum {
            drift.push("quorum");
        }
        if self.stakes.pool.enforce_reward_pool != cfg.enforce_reward_pool {
            drift.push("enforce_reward_pool");
        }
        if self.admins.direct_param_updates_enabled() != cfg.allow_direct_param_updates {
            drift.push("allow_direct_param_updates");
        }
        drift
    }

    /// Retained audit events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter()
    }

    fn record(&mut self, at: TimestampMs, actor: Address, kind: EventKind) {
        self.event_seq += 1;
        info!(seq = self.event_seq, actor = %actor, event = ?kind, "ledger event");
        if self.events.len() >= EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(LedgerEvent {
            seq: self.event_seq,
            at,
            actor,
            kind,
        });
    }

    /// Apply a parameter change and keep the pool in step with it.
    fn apply_param(
        &mut self,
        param: ParamType,
        value: u64,
        now: TimestampMs,
    ) -> Result<u64, LedgerError> {
        param.validate(value)?;
        if param == ParamType::RewardRateBps {
            // settle accrual at the old rate first
            self.stakes.checkpoint_all(now)?;
        }
        let old = self.params.set(param, value)?;
        self.sync_pool();
        Ok(old)
    }

    fn sync_pool(&mut self) {
        self.stakes.pool.reward_rate_bps = self.params.reward_rate_bps;
        self.stakes.pool.min_stake_amount = self.params.min_stake_amount;
    }
}

/// Aggregate counters for dashboards and metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Pool total.
    pub total_staked: u64,
    /// Live stake records.
    pub stake_records: u64,
    /// Funded reward balance.
    pub reward_pool_balance: u64,
    /// Rewards paid out.
    pub rewards_paid: u64,
    /// All proposals.
    pub proposals_total: u64,
    /// Proposals accepting votes.
    pub proposals_active: u64,
    /// Admins (all roles).
    pub admins: u64,
}

/// Command/query facade.
pub struct Ledger<C: Clock> {
    state: RwLock<LedgerState>,
    clock: C,
}

impl<C: Clock> Ledger<C> {
    /// Fresh ledger.
    pub fn new(cfg: &LedgerConfig, params: GovernanceParams, clock: C) -> Self {
        let now = clock.now_ms();
        Self::from_state(LedgerState::genesis(cfg, params, now), clock)
    }

    /// Resume from a snapshot.
    pub fn from_state(state: LedgerState, clock: C) -> Self {
        Self {
            state: RwLock::new(state),
            clock,
        }
    }

    /// Clock reading used by the next command.
    pub fn now(&self) -> TimestampMs {
        self.clock.now_ms()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.state.read().map_err(|_| LedgerError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.state.write().map_err(|_| LedgerError::Poisoned)
    }

    /// Run a command under the write lock with a single clock reading.
    fn command<T>(
        &self,
        op: &'static str,
        caller: &Address,
        f: impl FnOnce(&mut LedgerState, TimestampMs) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut st = self.write()?;
        let now = self.clock.now_ms();
        let res = f(&mut *st, now);
        if let Err(e) = &res {
            debug!(op, caller = %caller, kind = e.kind(), error = %e, "command rejected");
        }
        res
    }

    // ---- stake ledger ----

    /// Lock `amount` in a new stake record owned by `caller`.
    pub fn stake(&self, caller: &Address, amount: u64) -> Result<StakeRecordId, LedgerError> {
        self.command("stake", caller, |st, now| {
            let id = st.stakes.stake(*caller, amount, now)?;
            st.record(now, *caller, EventKind::Staked { record: id, amount });
            Ok(id)
        })
    }

    /// Consume a record; returns `(amount, rewards)`.
    pub fn unstake(&self, caller: &Address, id: StakeRecordId) -> Result<(u64, u64), LedgerError> {
        self.command("unstake", caller, |st, now| {
            let (amount, rewards) = st.stakes.unstake(id, caller, now)?;
            st.record(
                now,
                *caller,
                EventKind::Unstaked {
                    record: id,
                    amount,
                    rewards,
                },
            );
            Ok((amount, rewards))
        })
    }

    /// Pay out accrued rewards on a record.
    pub fn claim_rewards(&self, caller: &Address, id: StakeRecordId) -> Result<u64, LedgerError> {
        self.command("claim_rewards", caller, |st, now| {
            let rewards = st.stakes.claim_rewards(id, caller, now)?;
            st.record(now, *caller, EventKind::RewardsClaimed { record: id, rewards });
            Ok(rewards)
        })
    }

    /// Top up the reward pool. Requires `execute_functions`.
    pub fn fund_reward_pool(&self, caller: &Address, amount: u64) -> Result<u64, LedgerError> {
        self.command("fund_reward_pool", caller, |st, now| {
            st.admins.authorize(caller, Permission::ExecuteFunctions)?;
            let balance = st.stakes.fund_reward_pool(amount)?;
            st.admins.touch(caller, now);
            st.record(now, *caller, EventKind::RewardPoolFunded { amount, balance });
            Ok(balance)
        })
    }

    // ---- governance ----

    /// Open a proposal. The caller's aggregate stake must reach `min_stake_amount`.
    pub fn create_proposal(
        &self,
        caller: &Address,
        title: String,
        description: String,
        proposal_type: ProposalType,
    ) -> Result<ProposalId, LedgerError> {
        self.command("create_proposal", caller, |st, now| {
            let id = st.governance.create_proposal(
                *caller,
                title,
                description,
                proposal_type.clone(),
                &st.stakes,
                &st.params,
                now,
            )?;
            st.record(
                now,
                *caller,
                EventKind::ProposalCreated {
                    proposal: id,
                    proposal_type,
                },
            );
            Ok(id)
        })
    }

    /// Vote with the caller's aggregate stake.
    pub fn vote_on_proposal(
        &self,
        caller: &Address,
        id: ProposalId,
        support: bool,
    ) -> Result<VoteRecordId, LedgerError> {
        self.command("vote_on_proposal", caller, |st, now| {
            let vote = st
                .governance
                .vote_on_proposal(id, *caller, support, &st.stakes, now)?;
            let voting_power = st
                .governance
                .get_vote(id, caller)
                .map(|v| v.voting_power)
                .unwrap_or(0);
            st.record(
                now,
                *caller,
                EventKind::VoteCast {
                    proposal: id,
                    support,
                    voting_power,
                },
            );
            Ok(vote)
        })
    }

    /// Settle an expired proposal. Anyone may call.
    pub fn finalize_proposal(
        &self,
        caller: &Address,
        id: ProposalId,
    ) -> Result<ProposalStatus, LedgerError> {
        self.command("finalize_proposal", caller, |st, now| {
            let status = st.governance.finalize_proposal(id, &st.params, now)?;
            st.record(now, *caller, EventKind::ProposalFinalized { proposal: id, status });
            Ok(status)
        })
    }

    /// Execute a passed proposal after its delay. Requires `execute_functions`.
    ///
    /// A parameter change that violates the bound table still marks the proposal
    /// Executed, with an `ExecutionFailed` outcome.
    pub fn execute_proposal(
        &self,
        caller: &Address,
        id: ProposalId,
    ) -> Result<ExecutionOutcome, LedgerError> {
        self.command("execute_proposal", caller, |st, now| {
            st.admins.authorize(caller, Permission::ExecuteFunctions)?;
            let proposal_type = st.governance.check_executable(id, now)?.clone();
            let outcome = match proposal_type {
                ProposalType::Technical | ProposalType::Emergency => ExecutionOutcome::NoAction,
                ProposalType::Parameter { param, value } => {
                    match st.apply_param(param, value, now) {
                        Ok(old) => ExecutionOutcome::Applied {
                            param,
                            old,
                            new: value,
                        },
                        Err(e) => {
                            warn!(proposal = %id, error = %e, "proposal execution failed");
                            ExecutionOutcome::ExecutionFailed {
                                reason: e.to_string(),
                            }
                        }
                    }
                }
            };
            st.governance.mark_executed(id, now, outcome.clone())?;
            st.admins.touch(caller, now);
            if let ExecutionOutcome::Applied { param, old, new } = outcome {
                st.record(
                    now,
                    *caller,
                    EventKind::ParameterUpdated {
                        param,
                        old,
                        new,
                        direct: false,
                    },
                );
            }
            st.record(
                now,
                *caller,
                EventKind::ProposalExecuted {
                    proposal: id,
                    outcome: outcome.clone(),
                },
            );
            Ok(outcome)
        })
    }

    // ---- admin registry ----

    /// Add an admin. SuperAdmin only.
    pub fn add_admin(&self, caller: &Address, target: Address, role: Role) -> Result<(), LedgerError> {
        self.command("add_admin", caller, |st, now| {
            st.admins.add_admin(caller, target, role, now)?;
            st.record(now, *caller, EventKind::AdminAdded { target, role });
            Ok(())
        })
    }

    /// Remove an admin. SuperAdmin only; the last SuperAdmin cannot be removed.
    pub fn remove_admin(&self, caller: &Address, target: &Address) -> Result<(), LedgerError> {
        self.command("remove_admin", caller, |st, now| {
            st.admins.remove_admin(caller, target, now)?;
            st.record(now, *caller, EventKind::AdminRemoved { target: *target });
            Ok(())
        })
    }

    /// Change an admin's role. SuperAdmin only.
    pub fn update_admin_role(
        &self,
        caller: &Address,
        target: &Address,
        new_role: Role,
    ) -> Result<(), LedgerError> {
        self.command("update_admin_role", caller, |st, now| {
            let old = st.admins.update_admin_role(caller, target, new_role, now)?;
            st.record(
                now,
                *caller,
                EventKind::AdminRoleUpdated {
                    target: *target,
                    old,
                    new: new_role,
                },
            );
            Ok(())
        })
    }

    /// Grant or revoke an explicit permission. SuperAdmin only.
    pub fn set_permission(
        &self,
        caller: &Address,
        target: &Address,
        permission: Permission,
        granted: bool,
    ) -> Result<(), LedgerError> {
        self.command("set_permission", caller, |st, now| {
            st.admins
                .set_permission(caller, target, permission, granted, now)?;
            st.record(
                now,
                *caller,
                EventKind::PermissionChanged {
                    target: *target,
                    permission,
                    granted,
                },
            );
            Ok(())
        })
    }

    /// Bypass governance and set a parameter. Requires `manage_params`; audited.
    pub fn update_governance_parameter(
        &self,
        caller: &Address,
        param: ParamType,
        value: u64,
    ) -> Result<u64, LedgerError> {
        self.command("update_governance_parameter", caller, |st, now| {
            st.admins.check_param_update(caller, param, value)?;
            let old = st.apply_param(param, value, now)?;
            st.admins.touch(caller, now);
            warn!(caller = %caller, %param, old, new = value, "direct governance parameter update");
            st.record(
                now,
                *caller,
                EventKind::ParameterUpdated {
                    param,
                    old,
                    new: value,
                    direct: true,
                },
            );
            Ok(old)
        })
    }

    // ---- queries ----

    /// Pool total.
    pub fn total_staked(&self) -> Result<u64, LedgerError> {
        Ok(self.read()?.stakes.total_staked())
    }

    /// Amount locked in a record.
    pub fn get_stake_amount(&self, id: StakeRecordId) -> Result<u64, LedgerError> {
        Ok(self.read()?.stakes.get_stake_amount(id)?)
    }

    /// Full record.
    pub fn get_stake_record(&self, id: StakeRecordId) -> Result<StakeRecord, LedgerError> {
        Ok(self.read()?.stakes.get(id)?.clone())
    }

    /// What a claim would pay right now.
    pub fn pending_rewards(&self, id: StakeRecordId) -> Result<u64, LedgerError> {
        let st = self.read()?;
        Ok(st.stakes.pending_rewards(id, self.clock.now_ms())?)
    }

    /// Records owned by `owner`.
    pub fn stakes_of(&self, owner: &Address) -> Result<Vec<StakeRecord>, LedgerError> {
        Ok(self.read()?.stakes.stakes_of(owner).into_iter().cloned().collect())
    }

    /// Aggregate live stake of `owner`.
    pub fn voting_power(&self, owner: &Address) -> Result<u64, LedgerError> {
        Ok(self.read()?.stakes.voting_power(owner))
    }

    /// Pool aggregates.
    pub fn pool(&self) -> Result<StakingPool, LedgerError> {
        Ok(self.read()?.stakes.pool.clone())
    }

    /// Full proposal.
    pub fn get_proposal(&self, id: ProposalId) -> Result<Proposal, LedgerError> {
        Ok(self.read()?.governance.get(id)?.clone())
    }

    /// `(votes_for, votes_against)`.
    pub fn get_proposal_votes(&self, id: ProposalId) -> Result<(u64, u64), LedgerError> {
        Ok(self.read()?.governance.get_proposal_votes(id)?)
    }

    /// Status.
    pub fn get_proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, LedgerError> {
        Ok(self.read()?.governance.get_proposal_status(id)?)
    }

    /// Vote by `voter` on `id`.
    pub fn get_vote(&self, id: ProposalId, voter: &Address) -> Result<Option<VoteRecord>, LedgerError> {
        let st = self.read()?;
        st.governance.get(id)?;
        Ok(st.governance.get_vote(id, voter).cloned())
    }

    /// All votes on `id`.
    pub fn votes_on(&self, id: ProposalId) -> Result<Vec<VoteRecord>, LedgerError> {
        let st = self.read()?;
        st.governance.get(id)?;
        Ok(st.governance.votes_on(id).into_iter().cloned().collect())
    }

    /// Record and what a claim would pay now, read together.
    pub fn stake_view(&self, id: StakeRecordId) -> Result<(StakeRecord, u64), LedgerError> {
        let st = self.read()?;
        let record = st.stakes.get(id)?.clone();
        let claimable = st.stakes.pending_rewards(id, self.clock.now_ms())?;
        Ok((record, claimable))
    }

    /// `(voting_power, stakes, role)` of `owner` from a single read.
    pub fn account(&self, owner: &Address) -> Result<(u64, Vec<StakeRecord>, Role), LedgerError> {
        let st = self.read()?;
        Ok((
            st.stakes.voting_power(owner),
            st.stakes.stakes_of(owner).into_iter().cloned().collect(),
            st.admins.role_of(owner),
        ))
    }

    /// Tally and individual votes on `id` from a single read.
    pub fn proposal_votes(
        &self,
        id: ProposalId,
    ) -> Result<(u64, u64, Vec<VoteRecord>), LedgerError> {
        let st = self.read()?;
        let (votes_for, votes_against) = st.governance.get_proposal_votes(id)?;
        let votes = st.governance.votes_on(id).into_iter().cloned().collect();
        Ok((votes_for, votes_against, votes))
    }

    /// All proposals.
    pub fn list_proposals(&self) -> Result<Vec<Proposal>, LedgerError> {
        Ok(self.read()?.governance.list_proposals().cloned().collect())
    }

    /// Role of `addr` (`User` for non-admins).
    pub fn get_admin_role(&self, addr: &Address) -> Result<Role, LedgerError> {
        Ok(self.read()?.admins.role_of(addr))
    }

    /// Admin check.
    pub fn is_admin(&self, addr: &Address) -> Result<bool, LedgerError> {
        Ok(self.read()?.admins.is_admin(addr))
    }

    /// SuperAdmin check.
    pub fn is_super_admin(&self, addr: &Address) -> Result<bool, LedgerError> {
        Ok(self.read()?.admins.is_super_admin(addr))
    }

    /// Permission check.
    pub fn has_permission(&self, addr: &Address, perm: Permission) -> Result<bool, LedgerError> {
        Ok(self.read()?.admins.has_permission(addr, perm))
    }

    /// Admin record.
    pub fn get_admin(&self, addr: &Address) -> Result<AdminUser, LedgerError> {
        self.read()?
            .admins
            .get(addr)
            .cloned()
            .ok_or(LedgerError::Access(AccessError::AdminNotFound(*addr)))
    }

    /// Admin listing. Requires `view_dashboard`.
    pub fn list_admins(&self, caller: &Address) -> Result<Vec<AdminUser>, LedgerError> {
        let st = self.read()?;
        st.admins.authorize(caller, Permission::ViewDashboard)?;
        Ok(st.admins.list().cloned().collect())
    }

    /// One parameter.
    pub fn get_parameter_value(&self, param: ParamType) -> Result<u64, LedgerError> {
        Ok(self.read()?.params.get(param))
    }

    /// All parameters.
    pub fn params(&self) -> Result<GovernanceParams, LedgerError> {
        Ok(self.read()?.params.clone())
    }

    /// Audit events with `seq > since`, at most `limit`.
    pub fn events_since(&self, since: u64, limit: usize) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(self
            .read()?
            .events()
            .filter(|e| e.seq > since)
            .take(limit)
            .cloned()
            .collect())
    }

    /// Dashboard counters.
    pub fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let st = self.read()?;
        Ok(LedgerStats {
            total_staked: st.stakes.total_staked(),
            stake_records: st.stakes.record_count() as u64,
            reward_pool_balance: st.stakes.pool.total_reward_pool_balance,
            rewards_paid: st.stakes.pool.total_rewards_paid,
            proposals_total: st.governance.list_proposals().count() as u64,
            proposals_active: st.governance.active_count() as u64,
            admins: st.admins.list().count() as u64,
        })
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> Result<LedgerState, LedgerError> {
        Ok(self.read()?.clone())
    }

    /// Replace the whole state.
    pub fn restore(&self, state: LedgerState) -> Result<(), LedgerError> {
        *self.write()? = state;
        Ok(())
    }
}
