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

use std::collections::BTreeMap;
use std::sync::Arc;

use crozz_ledger::core::clock::ManualClock;
use crozz_ledger::core::governance::params::GovernanceParams;
use crozz_ledger::core::runtime::executor::Ledger;
use crozz_ledger::core::types::{Address, LedgerConfig, MS_PER_HOUR};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Stake { owner: u8, amount: u64 },
    Unstake { pick: usize },
    Claim { pick: usize },
    Advance { hours: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, 0u64..5_000_000_000).prop_map(|(owner, amount)| Op::Stake { owner, amount }),
        any::<usize>().prop_map(|pick| Op::Unstake { pick }),
        any::<usize>().prop_map(|pick| Op::Claim { pick }),
        (0u64..500).prop_map(|hours| Op::Advance { hours }),
    ]
}

proptest! {
    #[test]
    fn prop_total_staked_equals_live_records(ops in prop::collection::vec(op(), 1..80)) {
        let clock = Arc::new(ManualClock::new(0));
        let cfg = LedgerConfig {
            bootstrap_super_admin: Address::from_bytes([0xaa; 32]),
            ..LedgerConfig::default()
        };
        let l = Ledger::new(&cfg, GovernanceParams::default(), clock.clone());
        let owners: Vec<Address> = (0u8..4).map(|b| Address::from_bytes([b; 32])).collect();

        for op in ops {
            match op {
                Op::Stake { owner, amount } => {
                    // amounts under the minimum are rejected; that is part of the run
                    let _ = l.stake(&owners[owner as usize], amount);
                }
                Op::Unstake { pick } | Op::Claim { pick } => {
                    let st = l.snapshot().unwrap();
                    let n = st.stakes.record_count();
                    if n > 0 {
                        let rec = st.stakes.records().nth(pick % n).unwrap();
                        if matches!(op, Op::Unstake { .. }) {
                            l.unstake(&rec.owner, rec.id).unwrap();
                        } else {
                            l.claim_rewards(&rec.owner, rec.id).unwrap();
                        }
                    }
                }
                Op::Advance { hours } => clock.advance(hours * MS_PER_HOUR),
            }

            let st = l.snapshot().unwrap();
            let mut per_owner: BTreeMap<Address, u64> = BTreeMap::new();
            let mut sum = 0u64;
            for rec in st.stakes.records() {
                sum += rec.amount;
                *per_owner.entry(rec.owner).or_default() += rec.amount;
            }
            prop_assert_eq!(l.total_staked().unwrap(), sum);
            for o in &owners {
                prop_assert_eq!(l.voting_power(o).unwrap(), per_owner.get(o).copied().unwrap_or(0));
                let listed: u64 = l.stakes_of(o).unwrap().iter().map(|r| r.amount).sum();
                prop_assert_eq!(listed, per_owner.get(o).copied().unwrap_or(0));
            }
        }
    }
}
