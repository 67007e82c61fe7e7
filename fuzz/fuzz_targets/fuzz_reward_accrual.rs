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

#![no_main]
#![forbid(unsafe_code)]

use arbitrary::Arbitrary;
use crozz_ledger::core::economics::rewards::{accrued_between, compute_reward};
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    principal: u64,
    rate_bps: u16,
    from: u64,
    to: u64,
}

fuzz_target!(|inp: Input| {
    let rate = u64::from(inp.rate_bps);
    let elapsed = inp.to.saturating_sub(inp.from);
    let direct = compute_reward(inp.principal, rate, elapsed);
    let between = accrued_between(inp.principal, rate, inp.from, inp.to);
    assert_eq!(direct, between);
});
