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

//! Print random principal addresses, e.g. for `bootstrap_super_admin`.

use anyhow::{anyhow, Result};
use crozz_ledger::core::types::Address;
use ring::rand::SecureRandom;

fn main() -> Result<()> {
    let count: usize = match std::env::args().nth(1) {
        Some(n) => n.parse()?,
        None => 1,
    };

    let rng = ring::rand::SystemRandom::new();
    for _ in 0..count {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes).map_err(|_| anyhow!("system rng unavailable"))?;
        println!("{}", Address::from_bytes(bytes));
    }
    Ok(())
}
