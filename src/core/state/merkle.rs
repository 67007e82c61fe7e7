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

//! Ledger commitment: SHA-256 binary Merkle tree over key-sorted ledger entries.
//!
//! leaf = H( "Crozz-Ledger-Entry-v1" || len(key) || key || H(value) )
//! node = H( "Crozz-Ledger-Node-v1" || left || right )
//!
//! An odd node at the end of a level is paired with itself. The empty ledger
//! commits to the zero hash.

use ring::digest::{Context, SHA256};
use serde::{Deserialize, Serialize};

/// 32-byte digest.
pub type Hash32 = [u8; 32];

const ENTRY_DOMAIN: &[u8] = b"Crozz-Ledger-Entry-v1";
const NODE_DOMAIN: &[u8] = b"Crozz-Ledger-Node-v1";

/// Where the sibling sits relative to the running hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Sibling is the left child.
    Left,
    /// Sibling is the right child.
    Right,
}

/// One step from leaf to root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling position.
    pub side: Side,
    /// Sibling hash.
    pub sibling: Hash32,
}

/// Inclusion proof for one ledger entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryProof {
    /// Entry key.
    pub key: Vec<u8>,
    /// Entry value.
    pub value: Vec<u8>,
    /// Steps from the leaf up.
    pub path: Vec<ProofStep>,
}

fn sha256(parts: &[&[u8]]) -> Hash32 {
    let mut ctx = Context::new(&SHA256);
    for p in parts {
        ctx.update(p);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

/// Leaf hash of one entry. The key is length-prefixed so `(ab, c)` and `(a, bc)` differ.
pub fn entry_hash(key: &[u8], value: &[u8]) -> Hash32 {
    let key_len = (key.len() as u64).to_be_bytes();
    sha256(&[ENTRY_DOMAIN, &key_len, key, &sha256(&[value])])
}

fn node_hash(left: &Hash32, right: &Hash32) -> Hash32 {
    sha256(&[NODE_DOMAIN, left, right])
}

fn parent_level(level: &[Hash32]) -> Vec<Hash32> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [l, r] => node_hash(l, r),
            [only] => node_hash(only, only),
            _ => unreachable!("chunks(2) yields one or two items"),
        })
        .collect()
}

/// Root over entries already sorted by key.
pub fn ledger_root(entries: &[(Vec<u8>, Vec<u8>)]) -> Hash32 {
    let mut level: Vec<Hash32> = entries.iter().map(|(k, v)| entry_hash(k, v)).collect();
    if level.is_empty() {
        return [0u8; 32];
    }
    while level.len() > 1 {
        level = parent_level(&level);
    }
    level[0]
}

/// Inclusion proof for `entries[index]` (entries sorted by key).
pub fn prove_entry(entries: &[(Vec<u8>, Vec<u8>)], index: usize) -> Option<EntryProof> {
    let (key, value) = entries.get(index)?;
    let mut level: Vec<Hash32> = entries.iter().map(|(k, v)| entry_hash(k, v)).collect();
    let mut idx = index;
    let mut path = Vec::new();
    while level.len() > 1 {
        let (side, sib) = if idx % 2 == 1 {
            (Side::Left, idx - 1)
        } else {
            (Side::Right, (idx + 1).min(level.len() - 1))
        };
        path.push(ProofStep {
            side,
            sibling: level[sib],
        });
        level = parent_level(&level);
        idx /= 2;
    }
    Some(EntryProof {
        key: key.clone(),
        value: value.clone(),
        path,
    })
}

/// Check that `proof` commits its entry under `root`.
pub fn verify_entry(root: &Hash32, proof: &EntryProof) -> bool {
    let leaf = entry_hash(&proof.key, &proof.value);
    let computed = proof.path.iter().fold(leaf, |cur, step| match step.side {
        Side::Left => node_hash(&step.sibling, &cur),
        Side::Right => node_hash(&cur, &step.sibling),
    });
    &computed == root
}
