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

use std::sync::Arc;

use crozz_ledger::core::clock::ManualClock;
use crozz_ledger::core::economics::rewards::compute_reward;
use crozz_ledger::core::governance::params::{GovernanceParams, ParamType};
use crozz_ledger::core::governance::proposals::{ExecutionOutcome, ProposalStatus, ProposalType};
use crozz_ledger::core::runtime::executor::Ledger;
use crozz_ledger::core::types::{
    Address, LedgerConfig, ProposalId, QuorumPolicy, MS_PER_DAY, MS_PER_HOUR,
};
use proptest::prelude::*;

const SUPER: Address = Address::from_bytes([1u8; 32]);
const MIN: u64 = 1_000_000;

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 32])
}

fn ledger_with(quorum: QuorumPolicy) -> (Ledger<Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let cfg = LedgerConfig {
        bootstrap_super_admin: SUPER,
        quorum,
        ..LedgerConfig::default()
    };
    (Ledger::new(&cfg, GovernanceParams::default(), clock.clone()), clock)
}

fn ledger() -> (Ledger<Arc<ManualClock>>, Arc<ManualClock>) {
    ledger_with(QuorumPolicy::default())
}

fn propose(l: &Ledger<Arc<ManualClock>>, who: Address, t: ProposalType) -> ProposalId {
    l.create_proposal(&who, "raise rate".into(), "bump staking yield".into(), t)
        .unwrap()
}

#[test]
fn scenario_a_day_of_rewards_truncates_hourly() {
    // 100 base units: 5/year -> 0/day, nothing accrues.
    assert_eq!(compute_reward(100, 500, MS_PER_DAY), Ok(0));

    let (l, clock) = ledger();
    let id = l.stake(&addr(2), MIN).unwrap();
    clock.set(MS_PER_DAY);
    // 1_000_000 * 500 / 10_000 = 50_000/yr, /365 = 136/day, /24 = 5/h, *24h
    assert_eq!(l.claim_rewards(&addr(2), id).unwrap(), 120);
    assert_eq!(l.pending_rewards(id).unwrap(), 0);
    assert_eq!(l.pool().unwrap().total_rewards_paid, 120);
}

#[test]
fn near_limit_stakes_stay_withdrawable_across_rate_changes() {
    let (l, clock) = ledger();
    let big = 40_000_000_000_000_000;
    let a = l.stake(&addr(2), big).unwrap();
    let b = l.stake(&addr(3), big).unwrap();
    l.stake(&addr(4), MIN).unwrap();

    assert_eq!(l.unstake(&addr(2), a).unwrap(), (big, 0));

    let hourly_500 = 228_310_502_283;
    clock.set(MS_PER_DAY);
    assert_eq!(l.claim_rewards(&addr(3), b).unwrap(), hourly_500 * 24);

    clock.set(2 * MS_PER_DAY);
    assert_eq!(
        l.update_governance_parameter(&SUPER, ParamType::RewardRateBps, 400).unwrap(),
        500
    );
    assert_eq!(l.pending_rewards(b).unwrap(), hourly_500 * 24);

    clock.set(3 * MS_PER_DAY);
    let hourly_400 = 182_648_401_826;
    let (amount, rewards) = l.unstake(&addr(3), b).unwrap();
    assert_eq!(amount, big);
    assert_eq!(rewards, hourly_500 * 24 + hourly_400 * 24);
    assert_eq!(l.total_staked().unwrap(), MIN);
}

#[test]
fn scenario_b_parameter_proposal_passes_waits_and_executes() {
    let (l, clock) = ledger();
    let proposer = addr(2);
    l.stake(&proposer, MIN).unwrap();
    for v in 3..=5 {
        l.stake(&addr(v), MIN).unwrap();
    }

    let id = propose(
        &l,
        proposer,
        ProposalType::Parameter {
            param: ParamType::RewardRateBps,
            value: 700,
        },
    );
    let p = l.get_proposal(id).unwrap();
    assert_eq!(p.status, ProposalStatus::Active);
    assert_eq!(p.voting_end_timestamp, 7 * MS_PER_DAY);

    clock.set(MS_PER_HOUR);
    for v in 3..=5 {
        l.vote_on_proposal(&addr(v), id, true).unwrap();
    }
    assert_eq!(l.get_proposal_votes(id).unwrap(), (3 * MIN, 0));

    clock.set(p.voting_end_timestamp);
    assert_eq!(l.finalize_proposal(&addr(9), id).unwrap_err().kind(), "ProposalNotActive");

    clock.set(p.voting_end_timestamp + 1);
    assert_eq!(l.finalize_proposal(&addr(9), id).unwrap(), ProposalStatus::Passed);
    let ready_at = l.get_proposal(id).unwrap().execution_timestamp.unwrap();
    assert_eq!(ready_at, p.voting_end_timestamp + 1 + 2 * MS_PER_DAY);

    clock.set(ready_at - 1);
    assert_eq!(l.execute_proposal(&SUPER, id).unwrap_err().kind(), "NotReady");
    assert_eq!(l.get_proposal_status(id).unwrap(), ProposalStatus::Passed);

    clock.set(ready_at);
    assert_eq!(l.execute_proposal(&addr(3), id).unwrap_err().kind(), "NotAdmin");
    assert_eq!(
        l.execute_proposal(&SUPER, id).unwrap(),
        ExecutionOutcome::Applied {
            param: ParamType::RewardRateBps,
            old: 500,
            new: 700
        }
    );
    assert_eq!(l.get_proposal_status(id).unwrap(), ProposalStatus::Executed);
    assert_eq!(l.get_parameter_value(ParamType::RewardRateBps).unwrap(), 700);
    assert_eq!(l.pool().unwrap().reward_rate_bps, 700);
    assert_eq!(l.execute_proposal(&SUPER, id).unwrap_err().kind(), "ProposalNotPassed");
}

#[test]
fn scenario_c_zero_stake_voter_is_rejected() {
    let (l, _) = ledger();
    l.stake(&addr(2), MIN).unwrap();
    let id = propose(&l, addr(2), ProposalType::Technical);

    assert_eq!(
        l.vote_on_proposal(&addr(7), id, true).unwrap_err().kind(),
        "InvalidVotingPower"
    );
    assert!(l.votes_on(id).unwrap().is_empty());
    assert!(l.get_vote(id, &addr(7)).unwrap().is_none());
    assert_eq!(l.get_proposal_votes(id).unwrap(), (0, 0));
}

#[test]
fn scenario_d_sole_super_admin_cannot_remove_self() {
    let (l, _) = ledger();
    let before = l.list_admins(&SUPER).unwrap();
    assert_eq!(l.remove_admin(&SUPER, &SUPER).unwrap_err().kind(), "LastSuperAdmin");
    assert_eq!(l.list_admins(&SUPER).unwrap(), before);
    assert!(l.is_super_admin(&SUPER).unwrap());
}

#[test]
fn scenario_e_records_from_one_principal_are_independent() {
    let (l, clock) = ledger();
    let owner = addr(2);
    let first = l.stake(&owner, MIN).unwrap();
    clock.set(3 * MS_PER_HOUR);
    let second = l.stake(&owner, 2 * MIN).unwrap();
    assert_ne!(first, second);
    assert_eq!(l.voting_power(&owner).unwrap(), 3 * MIN);

    clock.set(10 * MS_PER_HOUR);
    let second_before = l.get_stake_record(second).unwrap();
    let pending_before = l.pending_rewards(second).unwrap();

    let (amount, _) = l.unstake(&owner, first).unwrap();
    assert_eq!(amount, MIN);
    assert_eq!(l.get_stake_record(second).unwrap(), second_before);
    assert_eq!(l.pending_rewards(second).unwrap(), pending_before);
    assert_eq!(l.get_stake_amount(first).unwrap_err().kind(), "StakeNotFound");
    assert_eq!(l.voting_power(&owner).unwrap(), 2 * MIN);
    assert_eq!(l.total_staked().unwrap(), 2 * MIN);
}

#[test]
fn finalize_twice_does_not_retally() {
    let (l, clock) = ledger();
    l.stake(&addr(2), MIN).unwrap();
    let id = propose(&l, addr(2), ProposalType::Technical);
    l.vote_on_proposal(&addr(2), id, true).unwrap();

    clock.set(7 * MS_PER_DAY + 1);
    assert_eq!(l.finalize_proposal(&addr(2), id).unwrap(), ProposalStatus::Passed);
    let after_first = l.get_proposal(id).unwrap();
    assert_eq!(l.finalize_proposal(&addr(2), id).unwrap_err().kind(), "ProposalNotActive");
    assert_eq!(l.get_proposal(id).unwrap(), after_first);
}

#[test]
fn second_vote_from_same_principal_is_rejected() {
    let (l, _) = ledger();
    l.stake(&addr(2), MIN).unwrap();
    l.stake(&addr(3), 5 * MIN).unwrap();
    let id = propose(&l, addr(2), ProposalType::Technical);

    l.vote_on_proposal(&addr(3), id, false).unwrap();
    assert_eq!(l.vote_on_proposal(&addr(3), id, true).unwrap_err().kind(), "AlreadyVoted");
    assert_eq!(l.get_proposal_votes(id).unwrap(), (0, 5 * MIN));
    assert!(!l.get_vote(id, &addr(3)).unwrap().unwrap().vote);
}

#[test]
fn votes_close_at_voting_end() {
    let (l, clock) = ledger();
    l.stake(&addr(2), MIN).unwrap();
    l.stake(&addr(3), MIN).unwrap();
    let id = propose(&l, addr(2), ProposalType::Technical);

    clock.set(7 * MS_PER_DAY);
    l.vote_on_proposal(&addr(2), id, true).unwrap();
    clock.set(7 * MS_PER_DAY + 1);
    assert_eq!(l.vote_on_proposal(&addr(3), id, true).unwrap_err().kind(), "ProposalExpired");
}

#[test]
fn proposer_needs_minimum_stake() {
    let (l, _) = ledger();
    assert_eq!(
        l.create_proposal(&addr(2), "t".into(), "d".into(), ProposalType::Technical)
            .unwrap_err()
            .kind(),
        "InsufficientStake"
    );
    assert!(l.list_proposals().unwrap().is_empty());
}

#[test]
fn emergency_proposals_use_short_windows() {
    let (l, clock) = ledger();
    l.stake(&addr(2), MIN).unwrap();
    let id = propose(&l, addr(2), ProposalType::Emergency);
    assert_eq!(l.get_proposal(id).unwrap().voting_end_timestamp, 3 * MS_PER_DAY);

    l.vote_on_proposal(&addr(2), id, true).unwrap();
    clock.set(3 * MS_PER_DAY + 1);
    l.finalize_proposal(&addr(2), id).unwrap();
    assert_eq!(
        l.get_proposal(id).unwrap().execution_timestamp,
        Some(4 * MS_PER_DAY + 1)
    );
    clock.set(4 * MS_PER_DAY + 1);
    assert_eq!(l.execute_proposal(&SUPER, id).unwrap(), ExecutionOutcome::NoAction);
}

#[test]
fn out_of_bounds_parameter_proposal_fails_at_execution() {
    let (l, clock) = ledger();
    l.stake(&addr(2), MIN).unwrap();
    let id = propose(
        &l,
        addr(2),
        ProposalType::Parameter {
            param: ParamType::TakerFeeBps,
            value: 5_000,
        },
    );
    l.vote_on_proposal(&addr(2), id, true).unwrap();
    clock.set(7 * MS_PER_DAY + 1);
    l.finalize_proposal(&addr(2), id).unwrap();
    clock.set(9 * MS_PER_DAY + 1);

    let outcome = l.execute_proposal(&SUPER, id).unwrap();
    assert!(matches!(outcome, ExecutionOutcome::ExecutionFailed { .. }));
    assert_eq!(l.get_proposal_status(id).unwrap(), ProposalStatus::Executed);
    assert_eq!(l.get_parameter_value(ParamType::TakerFeeBps).unwrap(), 30);
}

#[test]
fn quorum_miss_rejects_even_unanimous_support() {
    let (l, clock) = ledger_with(QuorumPolicy::Flat {
        min_voting_power: 10 * MIN,
    });
    l.stake(&addr(2), MIN).unwrap();
    let id = propose(&l, addr(2), ProposalType::Technical);
    l.vote_on_proposal(&addr(2), id, true).unwrap();
    clock.set(7 * MS_PER_DAY + 1);
    assert_eq!(l.finalize_proposal(&addr(2), id).unwrap(), ProposalStatus::Rejected);
    assert_eq!(l.get_proposal(id).unwrap().execution_timestamp, None);
    assert_eq!(l.execute_proposal(&SUPER, id).unwrap_err().kind(), "ProposalNotPassed");
}

#[test]
fn percent_quorum_is_fixed_at_creation() {
    let (l, _) = ledger_with(QuorumPolicy::PercentOfStake { bps: 1_000 });
    l.stake(&addr(2), 10 * MIN).unwrap();
    let id = propose(&l, addr(2), ProposalType::Technical);
    assert_eq!(l.get_proposal(id).unwrap().min_voting_power_required, MIN);

    l.stake(&addr(3), 90 * MIN).unwrap();
    assert_eq!(l.get_proposal(id).unwrap().min_voting_power_required, MIN);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_passed_iff_quorum_and_majority(
        voters in prop::collection::vec((1u64..1_000u64, any::<bool>()), 0..8),
        quorum in 1u64..5_000u64,
    ) {
        let (l, clock) = ledger_with(QuorumPolicy::Flat { min_voting_power: quorum * MIN });
        l.stake(&addr(200), MIN).unwrap();
        let id = propose(&l, addr(200), ProposalType::Technical);

        let (mut yes, mut no) = (0u64, 0u64);
        for (i, (units, support)) in voters.iter().enumerate() {
            let who = addr(10 + i as u8);
            l.stake(&who, units * MIN).unwrap();
            l.vote_on_proposal(&who, id, *support).unwrap();
            if *support { yes += units * MIN } else { no += units * MIN }
        }

        clock.set(7 * MS_PER_DAY + 1);
        let status = l.finalize_proposal(&addr(200), id).unwrap();
        let expect_pass = yes + no >= quorum * MIN && yes > no;
        prop_assert_eq!(status == ProposalStatus::Passed, expect_pass);
        prop_assert_eq!(status == ProposalStatus::Rejected, !expect_pass);
    }
}
