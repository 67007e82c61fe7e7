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
use std::thread;

use crozz_ledger::core::clock::ManualClock;
use crozz_ledger::core::governance::params::GovernanceParams;
use crozz_ledger::core::governance::proposals::ProposalType;
use crozz_ledger::core::runtime::executor::Ledger;
use crozz_ledger::core::types::{Address, LedgerConfig, MS_PER_HOUR};

const THREADS: u8 = 8;
const STAKES_PER_THREAD: u64 = 50;
const AMOUNT: u64 = 1_000_000;

#[test]
fn parallel_stakes_are_all_counted() {
    let clock = Arc::new(ManualClock::new(0));
    let cfg = LedgerConfig {
        bootstrap_super_admin: Address::from_bytes([0xaa; 32]),
        ..LedgerConfig::default()
    };
    let ledger = Arc::new(Ledger::new(&cfg, GovernanceParams::default(), clock.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let ledger = ledger.clone();
            let clock = clock.clone();
            thread::spawn(move || {
                let me = Address::from_bytes([t + 1; 32]);
                let mut ids = Vec::new();
                for _ in 0..STAKES_PER_THREAD {
                    ids.push(ledger.stake(&me, AMOUNT).unwrap());
                    clock.advance(MS_PER_HOUR);
                }
                // give back half
                for id in ids.iter().step_by(2) {
                    ledger.unstake(&me, *id).unwrap();
                }
                ids
            })
        })
        .collect();

    let mut all_ids = Vec::new();
    for h in handles {
        all_ids.extend(h.join().unwrap());
    }
    all_ids.sort();
    all_ids.dedup();
    assert_eq!(all_ids.len() as u64, u64::from(THREADS) * STAKES_PER_THREAD);

    let live_per_thread = STAKES_PER_THREAD / 2;
    assert_eq!(
        ledger.total_staked().unwrap(),
        u64::from(THREADS) * live_per_thread * AMOUNT
    );
    for t in 0..THREADS {
        let me = Address::from_bytes([t + 1; 32]);
        assert_eq!(ledger.voting_power(&me).unwrap(), live_per_thread * AMOUNT);
    }
}

#[test]
fn concurrent_votes_tally_exactly_once() {
    let clock = Arc::new(ManualClock::new(0));
    let cfg = LedgerConfig {
        bootstrap_super_admin: Address::from_bytes([0xaa; 32]),
        ..LedgerConfig::default()
    };
    let ledger = Arc::new(Ledger::new(&cfg, GovernanceParams::default(), clock));
    for t in 0..THREADS {
        ledger.stake(&Address::from_bytes([t + 1; 32]), AMOUNT).unwrap();
    }
    let proposer = Address::from_bytes([1; 32]);
    let id = ledger
        .create_proposal(&proposer, "t".into(), "d".into(), ProposalType::Technical)
        .unwrap();

    // every thread tries to vote for every principal; only the first vote each counts
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let ledger = ledger.clone();
            thread::spawn(move || {
                (0..THREADS)
                    .filter(|v| {
                        ledger
                            .vote_on_proposal(&Address::from_bytes([v + 1; 32]), id, true)
                            .is_ok()
                    })
                    .count()
            })
        })
        .collect();
    let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(accepted, usize::from(THREADS));
    assert_eq!(
        ledger.get_proposal_votes(id).unwrap(),
        (u64::from(THREADS) * AMOUNT, 0)
    );
    assert_eq!(ledger.votes_on(id).unwrap().len(), usize::from(THREADS));
}

#[test]
fn account_reads_see_one_consistent_state() {
    let clock = Arc::new(ManualClock::new(0));
    let cfg = LedgerConfig {
        bootstrap_super_admin: Address::from_bytes([0xaa; 32]),
        ..LedgerConfig::default()
    };
    let ledger = Arc::new(Ledger::new(&cfg, GovernanceParams::default(), clock));
    let me = Address::from_bytes([7; 32]);

    let writer = {
        let ledger = ledger.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                let id = ledger.stake(&me, AMOUNT).unwrap();
                ledger.stake(&me, 2 * AMOUNT).unwrap();
                ledger.unstake(&me, id).unwrap();
            }
        })
    };
    let reader = {
        let ledger = ledger.clone();
        thread::spawn(move || {
            for _ in 0..500 {
                let (power, stakes, _) = ledger.account(&me).unwrap();
                assert_eq!(power, stakes.iter().map(|r| r.amount).sum::<u64>());
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();

    let (power, stakes, _) = ledger.account(&me).unwrap();
    assert_eq!(power, 400 * AMOUNT);
    assert_eq!(stakes.len(), 200);
}
