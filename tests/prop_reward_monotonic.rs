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
use crozz_ledger::core::governance::params::GovernanceParams;
use crozz_ledger::core::runtime::executor::Ledger;
use crozz_ledger::core::types::{Address, LedgerConfig, MS_PER_DAY};
use proptest::prelude::*;

const TEN_YEARS_MS: u64 = 3_650 * MS_PER_DAY;

proptest! {
    #[test]
    fn prop_reward_non_decreasing_in_time(
        principal in 0u64..=1_000_000_000_000_000_000,
        rate in 0u64..=1_000,
        a in 0u64..TEN_YEARS_MS,
        b in 0u64..TEN_YEARS_MS,
    ) {
        let (t1, t2) = if a <= b { (a, b) } else { (b, a) };
        let r1 = compute_reward(principal, rate, t1).unwrap();
        let r2 = compute_reward(principal, rate, t2).unwrap();
        prop_assert!(r1 <= r2);
    }

    #[test]
    fn prop_reward_non_decreasing_in_principal(
        p1 in 0u64..=1_000_000_000_000_000_000,
        extra in 0u64..1_000_000_000_000,
        rate in 0u64..=1_000,
        elapsed in 0u64..TEN_YEARS_MS,
    ) {
        let low = compute_reward(p1, rate, elapsed).unwrap();
        let high = compute_reward(p1 + extra, rate, elapsed).unwrap();
        prop_assert!(low <= high);
    }

    #[test]
    fn prop_pending_rewards_grow_until_claimed(
        amount in 1_000_000u64..=1_000_000_000_000_000_000,
        steps in prop::collection::vec(0u64..(30 * MS_PER_DAY), 1..20),
    ) {
        let clock = Arc::new(ManualClock::new(0));
        let cfg = LedgerConfig {
            bootstrap_super_admin: Address::from_bytes([0xaa; 32]),
            ..LedgerConfig::default()
        };
        let l = Ledger::new(&cfg, GovernanceParams::default(), clock.clone());
        let owner = Address::from_bytes([2; 32]);
        let id = l.stake(&owner, amount).unwrap();

        let mut last = 0u64;
        for step in steps {
            clock.advance(step);
            let now = l.pending_rewards(id).unwrap();
            prop_assert!(now >= last);
            last = now;
        }
        prop_assert_eq!(l.claim_rewards(&owner, id).unwrap(), last);
        prop_assert_eq!(l.pending_rewards(id).unwrap(), 0);
    }
}
