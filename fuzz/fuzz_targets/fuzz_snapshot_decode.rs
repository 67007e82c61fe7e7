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

use crozz_ledger::core::runtime::executor::LedgerState;
use crozz_ledger::core::state::persistent_state::MAX_SNAPSHOT_BYTES;
use crozz_ledger::core::types::{decode_canonical_limited, encode_canonical};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic. Maps dedup on decode, so bytes need not round-trip,
    // but a decoded state must be stable from the first re-encode on.
    if let Ok(state) = decode_canonical_limited::<LedgerState>(data, MAX_SNAPSHOT_BYTES) {
        if let Ok(once) = encode_canonical(&state) {
            let back: LedgerState = match decode_canonical_limited(&once, MAX_SNAPSHOT_BYTES) {
                Ok(s) => s,
                Err(e) => panic!("re-encoded snapshot failed to decode: {e}"),
            };
            assert_eq!(back, state);
        }
    }
});
