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
#![deny(missing_docs)]

//! Proposal lifecycle: `Active -> {Passed, Rejected}`, `Passed -> Executed`.
//!
//! Voting power is the voter's aggregate live stake at vote time (1 unit = 1 vote).
//! Each principal votes at most once per proposal; a second vote is rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::economics::staking::StakeLedger;
use crate::core::governance::params::{GovernanceParams, ParamType};
use crate::core::types::{
    Address, ProposalId, QuorumPolicy, TimestampMs, VoteRecordId, MS_PER_DAY,
};

/// Emergency voting window (days).
pub const EMERGENCY_VOTING_PERIOD_DAYS: u64 = 3;
/// Emergency execution delay (days).
pub const EMERGENCY_EXECUTION_DELAY_DAYS: u64 = 1;
/// Max title length in bytes.
pub const MAX_TITLE_LEN: usize = 256;
/// Max description length in bytes.
pub const MAX_DESCRIPTION_LEN: usize = 8_192;

/// Governance errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    /// Unknown proposal.
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),
    /// Proposer stake below the proposal threshold.
    #[error("insufficient stake: have {have}, need {need}")]
    InsufficientStake {
        /// Aggregate stake of the proposer.
        have: u64,
        /// Required minimum.
        need: u64,
    },
    /// Phase mismatch: not Active, or (on finalize) voting window still open.
    #[error("proposal {0} is not active")]
    ProposalNotActive(ProposalId),
    /// Vote arrived after `voting_end_timestamp`.
    #[error("proposal {0} voting period has expired")]
    ProposalExpired(ProposalId),
    /// Voter holds no stake.
    #[error("invalid voting power")]
    InvalidVotingPower,
    /// Voter already voted on this proposal.
    #[error("{voter} already voted on proposal {proposal}")]
    AlreadyVoted {
        /// Proposal.
        proposal: ProposalId,
        /// Voter.
        voter: Address,
    },
    /// Execution attempted before `execution_timestamp`.
    #[error("proposal {proposal} not executable before {ready_at}")]
    NotReady {
        /// Proposal.
        proposal: ProposalId,
        /// Earliest execution time.
        ready_at: TimestampMs,
    },
    /// Execution attempted on a proposal that did not pass.
    #[error("proposal {0} has not passed")]
    ProposalNotPassed(ProposalId),
    /// Malformed title or description.
    #[error("invalid proposal: {0}")]
    InvalidProposal(&'static str),
    /// Timestamp arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Kind of proposal. A parameter change carries its encoded update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalType {
    /// Off-ledger technical change; executes with no state effect.
    Technical,
    /// Governance parameter update.
    Parameter {
        /// Target parameter.
        param: ParamType,
        /// New value, bound-checked at execution.
        value: u64,
    },
    /// Fast-track proposal with shortened windows.
    Emergency,
}

impl ProposalType {
    fn voting_period_days(&self, params: &GovernanceParams) -> u64 {
        match self {
            ProposalType::Emergency => EMERGENCY_VOTING_PERIOD_DAYS,
            ProposalType::Technical | ProposalType::Parameter { .. } => params.voting_period_days,
        }
    }

    fn execution_delay_days(&self, params: &GovernanceParams) -> u64 {
        match self {
            ProposalType::Emergency => EMERGENCY_EXECUTION_DELAY_DAYS,
            ProposalType::Technical | ProposalType::Parameter { .. } => {
                params.execution_delay_days
            }
        }
    }
}

/// Proposal status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Not yet open for voting (unused: proposals open on creation).
    Pending,
    /// Accepting votes.
    Active,
    /// Waiting for the execution delay.
    Passed,
    /// Terminal: quorum missed or majority against.
    Rejected,
    /// Terminal: executed.
    Executed,
}

impl ProposalStatus {
    /// Whether `self -> next` is a legal forward transition.
    pub fn can_transition(self, next: ProposalStatus) -> bool {
        use ProposalStatus::*;
        match (self, next) {
            (Pending, Active) => true,
            (Active, Passed) | (Active, Rejected) => true,
            (Passed, Executed) => true,
            (Pending, _) | (Active, _) | (Passed, _) | (Rejected, _) | (Executed, _) => false,
        }
    }
}

/// Result of applying a passed proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Parameter updated.
    Applied {
        /// Parameter.
        param: ParamType,
        /// Value before.
        old: u64,
        /// Value after.
        new: u64,
    },
    /// Nothing to apply on-ledger.
    NoAction,
    /// The encoded change was rejected; the proposal is still marked Executed.
    ExecutionFailed {
        /// Why.
        reason: String,
    },
}

/// Governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Id.
    pub id: ProposalId,
    /// Proposer principal.
    pub proposer: Address,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Kind and payload.
    pub proposal_type: ProposalType,
    /// Status.
    pub status: ProposalStatus,
    /// Voting power in favour.
    pub votes_for: u64,
    /// Voting power against.
    pub votes_against: u64,
    /// Created at.
    pub created_timestamp: TimestampMs,
    /// Last instant votes are accepted.
    pub voting_end_timestamp: TimestampMs,
    /// Earliest execution time, set when the proposal passes.
    pub execution_timestamp: Option<TimestampMs>,
    /// Quorum floor (votes_for + votes_against).
    pub min_voting_power_required: u64,
    /// Set on execution.
    pub execution_status: Option<ExecutionOutcome>,
}

impl Proposal {
    /// `(votes_for, votes_against)`.
    pub fn tally(&self) -> (u64, u64) {
        (self.votes_for, self.votes_against)
    }

    fn quorum_reached(&self) -> bool {
        self.votes_for.saturating_add(self.votes_against) >= self.min_voting_power_required
    }

    fn advance(&mut self, next: ProposalStatus) -> Result<(), GovernanceError> {
        if !self.status.can_transition(next) {
            return Err(match next {
                ProposalStatus::Executed => GovernanceError::ProposalNotPassed(self.id),
                _ => GovernanceError::ProposalNotActive(self.id),
            });
        }
        self.status = next;
        Ok(())
    }
}

/// One vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Id.
    pub id: VoteRecordId,
    /// Voter.
    pub voter: Address,
    /// Proposal.
    pub proposal_id: ProposalId,
    /// true = for.
    pub vote: bool,
    /// Stake snapshot at vote time.
    pub voting_power: u64,
    /// When.
    pub timestamp: TimestampMs,
}

/// Proposal and vote store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Governance {
    quorum: QuorumPolicy,
    proposals: BTreeMap<ProposalId, Proposal>,
    votes: BTreeMap<(ProposalId, Address), VoteRecord>,
    next_proposal_id: u64,
    next_vote_id: u64,
}

impl Governance {
    /// Empty store using `quorum` for new proposals.
    pub fn new(quorum: QuorumPolicy) -> Self {
        Self {
            quorum,
            proposals: BTreeMap::new(),
            votes: BTreeMap::new(),
            next_proposal_id: 1,
            next_vote_id: 1,
        }
    }

    /// Quorum policy for new proposals.
    pub fn quorum_policy(&self) -> QuorumPolicy {
        self.quorum
    }

    fn quorum_floor(&self, total_staked: u64) -> u64 {
        match self.quorum {
            QuorumPolicy::Flat { min_voting_power } => min_voting_power,
            QuorumPolicy::PercentOfStake { bps } => {
                let q = (total_staked as u128).saturating_mul(bps as u128) / 10_000u128;
                u64::try_from(q).unwrap_or(u64::MAX).max(1)
            }
        }
    }

    /// Open a proposal for voting.
    #[allow(clippy::too_many_arguments)]
    pub fn create_proposal(
        &mut self,
        proposer: Address,
        title: String,
        description: String,
        proposal_type: ProposalType,
        stakes: &StakeLedger,
        params: &GovernanceParams,
        now: TimestampMs,
    ) -> Result<ProposalId, GovernanceError> {
        if title.trim().is_empty() {
            return Err(GovernanceError::InvalidProposal("empty title"));
        }
        if title.len() > MAX_TITLE_LEN {
            return Err(GovernanceError::InvalidProposal("title too long"));
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(GovernanceError::InvalidProposal("description too long"));
        }
        let have = stakes.voting_power(&proposer);
        let need = params.min_stake_amount;
        if have < need {
            return Err(GovernanceError::InsufficientStake { have, need });
        }
        let voting_ms = proposal_type
            .voting_period_days(params)
            .checked_mul(MS_PER_DAY)
            .ok_or(GovernanceError::Overflow)?;
        let voting_end = now.checked_add(voting_ms).ok_or(GovernanceError::Overflow)?;

        let id = ProposalId(self.next_proposal_id.max(1));
        self.next_proposal_id = id.0 + 1;
        let mut p = Proposal {
            id,
            proposer,
            title,
            description,
            proposal_type,
            status: ProposalStatus::Pending,
            votes_for: 0,
            votes_against: 0,
            created_timestamp: now,
            voting_end_timestamp: voting_end,
            execution_timestamp: None,
            min_voting_power_required: self.quorum_floor(stakes.total_staked()),
            execution_status: None,
        };
        p.advance(ProposalStatus::Active)?;
        self.proposals.insert(id, p);
        Ok(id)
    }

    /// Record a vote weighted by the voter's live stake.
    pub fn vote_on_proposal(
        &mut self,
        id: ProposalId,
        voter: Address,
        support: bool,
        stakes: &StakeLedger,
        now: TimestampMs,
    ) -> Result<VoteRecordId, GovernanceError> {
        let p = self.get(id)?;
        if p.status != ProposalStatus::Active {
            return Err(GovernanceError::ProposalNotActive(id));
        }
        if now > p.voting_end_timestamp {
            return Err(GovernanceError::ProposalExpired(id));
        }
        if self.votes.contains_key(&(id, voter)) {
            return Err(GovernanceError::AlreadyVoted { proposal: id, voter });
        }
        let power = stakes.voting_power(&voter);
        if power == 0 {
            return Err(GovernanceError::InvalidVotingPower);
        }
        let (votes_for, votes_against) = if support {
            (p.votes_for.checked_add(power).ok_or(GovernanceError::Overflow)?, p.votes_against)
        } else {
            (p.votes_for, p.votes_against.checked_add(power).ok_or(GovernanceError::Overflow)?)
        };

        let vote_id = VoteRecordId(self.next_vote_id.max(1));
        self.next_vote_id = vote_id.0 + 1;
        if let Some(p) = self.proposals.get_mut(&id) {
            p.votes_for = votes_for;
            p.votes_against = votes_against;
        }
        self.votes.insert(
            (id, voter),
            VoteRecord {
                id: vote_id,
                voter,
                proposal_id: id,
                vote: support,
                voting_power: power,
                timestamp: now,
            },
        );
        Ok(vote_id)
    }

    /// Close voting once the window has elapsed and settle Passed/Rejected.
    pub fn finalize_proposal(
        &mut self,
        id: ProposalId,
        params: &GovernanceParams,
        now: TimestampMs,
    ) -> Result<ProposalStatus, GovernanceError> {
        let p = self.get(id)?;
        if p.status != ProposalStatus::Active || now <= p.voting_end_timestamp {
            return Err(GovernanceError::ProposalNotActive(id));
        }
        let passed = p.quorum_reached() && p.votes_for > p.votes_against;
        let execution_at = if passed {
            let delay = p
                .proposal_type
                .execution_delay_days(params)
                .checked_mul(MS_PER_DAY)
                .ok_or(GovernanceError::Overflow)?;
            Some(now.checked_add(delay).ok_or(GovernanceError::Overflow)?)
        } else {
            None
        };

        let p = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        if passed {
            p.advance(ProposalStatus::Passed)?;
            p.execution_timestamp = execution_at;
        } else {
            p.advance(ProposalStatus::Rejected)?;
        }
        Ok(p.status)
    }

    /// Check that `id` may execute at `now`; returns its payload.
    pub fn check_executable(
        &self,
        id: ProposalId,
        now: TimestampMs,
    ) -> Result<&ProposalType, GovernanceError> {
        let p = self.get(id)?;
        if p.status != ProposalStatus::Passed {
            return Err(GovernanceError::ProposalNotPassed(id));
        }
        let ready_at = p.execution_timestamp.unwrap_or(p.voting_end_timestamp);
        if now < ready_at {
            return Err(GovernanceError::NotReady {
                proposal: id,
                ready_at,
            });
        }
        Ok(&p.proposal_type)
    }

    /// Mark a proposal executed with `outcome`. Call after `check_executable`.
    pub fn mark_executed(
        &mut self,
        id: ProposalId,
        now: TimestampMs,
        outcome: ExecutionOutcome,
    ) -> Result<(), GovernanceError> {
        self.check_executable(id, now)?;
        let p = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))?;
        p.advance(ProposalStatus::Executed)?;
        p.execution_status = Some(outcome);
        Ok(())
    }

    /// Execute a passed proposal; `apply` performs its on-ledger effect.
    pub fn execute_proposal<F>(
        &mut self,
        id: ProposalId,
        now: TimestampMs,
        apply: F,
    ) -> Result<ExecutionOutcome, GovernanceError>
    where
        F: FnOnce(&ProposalType) -> ExecutionOutcome,
    {
        let outcome = apply(self.check_executable(id, now)?);
        self.mark_executed(id, now, outcome.clone())?;
        Ok(outcome)
    }

    /// Proposal by id.
    pub fn get(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    /// `(votes_for, votes_against)`.
    pub fn get_proposal_votes(&self, id: ProposalId) -> Result<(u64, u64), GovernanceError> {
        self.get(id).map(Proposal::tally)
    }

    /// Status.
    pub fn get_proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, GovernanceError> {
        self.get(id).map(|p| p.status)
    }

    /// Vote cast by `voter`, if any.
    pub fn get_vote(&self, id: ProposalId, voter: &Address) -> Option<&VoteRecord> {
        self.votes.get(&(id, *voter))
    }

    /// Every vote on `id`, ordered by voter.
    pub fn votes_on(&self, id: ProposalId) -> Vec<&VoteRecord> {
        self.votes
            .range((id, Address::from_bytes([0u8; 32]))..=(id, Address::from_bytes([0xff; 32])))
            .map(|(_, v)| v)
            .collect()
    }

    /// Every vote, ordered by (proposal, voter).
    pub fn all_votes(&self) -> impl Iterator<Item = &VoteRecord> {
        self.votes.values()
    }

    /// All proposals, ordered by id.
    pub fn list_proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    /// Number of proposals currently accepting votes.
    pub fn active_count(&self) -> usize {
        self.proposals
            .values()
            .filter(|p| p.status == ProposalStatus::Active)
            .count()
    }
}
