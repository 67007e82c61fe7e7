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

//! Ledger snapshots in sled, with a per-entity Merkle commitment.
//!
//! Layout:
//! - `snapshot`                      canonical bincode of the whole `LedgerState`
//! - `e/admin/<addr32>`              AdminUser
//! - `e/param/<tag>`                 u64
//! - `e/pool`                        StakingPool
//! - `e/proposal/<id be64>`          Proposal
//! - `e/stake/<id be64>`             StakeRecord
//! - `e/vote/<proposal be64><addr32>` VoteRecord
//!
//! Entity keys are rewritten on every save and stale ones removed in the same
//! transaction, so the Merkle root always matches the stored snapshot.

use sled::transaction::{ConflictableTransactionError, TransactionError};
use thiserror::Error;
use tracing::debug;

use crate::core::governance::params::ParamType;
use crate::core::runtime::executor::LedgerState;
use crate::core::state::merkle::{ledger_root, prove_entry, EntryProof, Hash32};
use crate::core::types::{
    decode_canonical_limited, encode_canonical, Address, CodecError, ProposalId, StakeRecordId,
};

/// Snapshot size cap.
pub const MAX_SNAPSHOT_BYTES: usize = 256 * 1024 * 1024;

const SNAPSHOT_KEY: &[u8] = b"snapshot";
const ENTITY_PREFIX: &[u8] = b"e/";

/// State errors.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("db open")]
    DbOpen,
    #[error("db io")]
    DbIo,
    #[error("codec: {0}")]
    Codec(#[from] CodecError),
}

/// State operation.
#[derive(Clone, Debug)]
pub enum KvOp {
    /// Put key/value.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete key.
    Del { key: Vec<u8> },
}

fn entity_key(kind: &str, id: &[u8]) -> Vec<u8> {
    let mut k = Vec::with_capacity(ENTITY_PREFIX.len() + kind.len() + 1 + id.len());
    k.extend_from_slice(ENTITY_PREFIX);
    k.extend_from_slice(kind.as_bytes());
    if !id.is_empty() {
        k.push(b'/');
        k.extend_from_slice(id);
    }
    k
}

/// Key of a stake record.
pub fn stake_key(id: StakeRecordId) -> Vec<u8> {
    entity_key("stake", &id.0.to_be_bytes())
}

/// Key of a proposal.
pub fn proposal_key(id: ProposalId) -> Vec<u8> {
    entity_key("proposal", &id.0.to_be_bytes())
}

/// Key of an admin.
pub fn admin_key(addr: &Address) -> Vec<u8> {
    entity_key("admin", addr.as_bytes())
}

/// Key of a vote.
pub fn vote_key(proposal: ProposalId, voter: &Address) -> Vec<u8> {
    let mut id = proposal.0.to_be_bytes().to_vec();
    id.extend_from_slice(voter.as_bytes());
    entity_key("vote", &id)
}

/// Key of a governance parameter.
pub fn param_key(param: ParamType) -> Vec<u8> {
    entity_key("param", param.tag().as_bytes())
}

/// Flatten `state` into key-sorted entity entries.
pub fn ledger_entries(state: &LedgerState) -> Result<Vec<(Vec<u8>, Vec<u8>)>, CodecError> {
    let mut out = Vec::new();
    out.push((entity_key("pool", &[]), encode_canonical(&state.stakes.pool)?));
    for rec in state.stakes.records() {
        out.push((stake_key(rec.id), encode_canonical(rec)?));
    }
    for p in state.governance.list_proposals() {
        out.push((proposal_key(p.id), encode_canonical(p)?));
    }
    for v in state.governance.all_votes() {
        out.push((vote_key(v.proposal_id, &v.voter), encode_canonical(v)?));
    }
    for a in state.admins.list() {
        out.push((admin_key(&a.address), encode_canonical(a)?));
    }
    for p in ParamType::ALL {
        out.push((param_key(p), encode_canonical(&state.params.get(p))?));
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

/// Merkle commitment of an in-memory state.
pub fn ledger_commitment(state: &LedgerState) -> Result<Hash32, CodecError> {
    Ok(ledger_root(&ledger_entries(state)?))
}

/// sled-backed snapshot store.
#[derive(Clone)]
pub struct PersistentState {
    db: sled::Db,
}

impl PersistentState {
    /// Open sled DB at path (directory).
    pub fn open(path: &str) -> Result<Self, StateError> {
        let db = sled::open(path).map_err(|_| StateError::DbOpen)?;
        Ok(Self { db })
    }

    /// Get value.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let v = self.db.get(key).map_err(|_| StateError::DbIo)?;
        Ok(v.map(|iv| iv.to_vec()))
    }

    /// Apply all ops or none.
    pub fn commit_atomic(&self, ops: &[KvOp]) -> Result<(), StateError> {
        let res = self.db.transaction(|t| {
            for op in ops {
                match op {
                    KvOp::Put { key, value } => {
                        t.insert(key.as_slice(), value.as_slice())?;
                    }
                    KvOp::Del { key } => {
                        t.remove(key.as_slice())?;
                    }
                }
            }
            Ok::<(), ConflictableTransactionError<StateError>>(())
        });
        match res {
            Ok(()) => {}
            Err(TransactionError::Abort(e)) => return Err(e),
            Err(TransactionError::Storage(_)) => return Err(StateError::DbIo),
        }
        self.db.flush().map_err(|_| StateError::DbIo)?;
        Ok(())
    }

    /// Persist `state`; returns the new commitment root.
    pub fn save_snapshot(&self, state: &LedgerState) -> Result<Hash32, StateError> {
        let entries = ledger_entries(state)?;
        let root = ledger_root(&entries);

        let mut ops = Vec::with_capacity(entries.len() + 1);
        for item in self.db.scan_prefix(ENTITY_PREFIX) {
            let (k, _) = item.map_err(|_| StateError::DbIo)?;
            if entries.binary_search_by(|(ek, _)| ek.as_slice().cmp(&k[..])).is_err() {
                ops.push(KvOp::Del { key: k.to_vec() });
            }
        }
        ops.push(KvOp::Put {
            key: SNAPSHOT_KEY.to_vec(),
            value: encode_canonical(state)?,
        });
        ops.extend(entries.into_iter().map(|(key, value)| KvOp::Put { key, value }));
        self.commit_atomic(&ops)?;
        debug!(root = %hex::encode(root), ops = ops.len(), "ledger snapshot saved");
        Ok(root)
    }

    /// Last saved snapshot, if any.
    pub fn load_snapshot(&self) -> Result<Option<LedgerState>, StateError> {
        let Some(raw) = self.get(SNAPSHOT_KEY)? else {
            return Ok(None);
        };
        Ok(Some(decode_canonical_limited(&raw, MAX_SNAPSHOT_BYTES)?))
    }

    fn stored_entries(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StateError> {
        // sled iterates in key order, which is the order the tree is built in
        self.db
            .scan_prefix(ENTITY_PREFIX)
            .map(|item| {
                item.map(|(k, v)| (k.to_vec(), v.to_vec()))
                    .map_err(|_| StateError::DbIo)
            })
            .collect()
    }

    /// Merkle root over the stored entities.
    pub fn state_root(&self) -> Result<Hash32, StateError> {
        Ok(ledger_root(&self.stored_entries()?))
    }

    /// Root and inclusion proof for a stored entity key.
    pub fn prove_key(&self, key: &[u8]) -> Result<Option<(Hash32, EntryProof)>, StateError> {
        let entries = self.stored_entries()?;
        let Ok(idx) = entries.binary_search_by(|(k, _)| k.as_slice().cmp(key)) else {
            return Ok(None);
        };
        let root = ledger_root(&entries);
        Ok(prove_entry(&entries, idx).map(|p| (root, p)))
    }
}
