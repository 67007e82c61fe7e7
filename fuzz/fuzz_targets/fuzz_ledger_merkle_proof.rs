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
use crozz_ledger::core::state::merkle::{ledger_root, prove_entry, verify_entry};
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    pairs: Vec<(Vec<u8>, Vec<u8>)>,
    index: u16,
}

fuzz_target!(|inp: Input| {
    let mut pairs = inp.pairs;
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs.dedup_by(|a, b| a.0 == b.0);

    let root = ledger_root(&pairs);
    if pairs.is_empty() {
        return;
    }
    let idx = usize::from(inp.index) % pairs.len();
    if let Some(proof) = prove_entry(&pairs, idx) {
        assert!(verify_entry(&root, &proof));
    }
});
