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

//! Deterministic core types, node configuration and canonical encoding helpers.

use bincode::Options;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::governance::params::GovernanceParams;

/// Canonical serialization error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization")]
    Serialize,
    #[error("deserialization")]
    Deserialize,
    #[error("size limit exceeded")]
    TooLarge,
}

/// Canonical bincode options (deterministic).
fn bincode_opts() -> impl Options {
    // Fixint encoding provides a stable integer representation.
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode with deterministic rules. Requires deterministic container ordering (use BTreeMap/BTreeSet).
pub fn encode_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, CodecError> {
    bincode_opts()
        .serialize(v)
        .map_err(|_| CodecError::Serialize)
}

/// Decode with a hard size cap.
pub fn decode_canonical_limited<T: DeserializeOwned>(
    bytes: &[u8],
    max: usize,
) -> Result<T, CodecError> {
    if bytes.len() > max {
        return Err(CodecError::TooLarge);
    }
    // The deserializer limit stops hostile container lengths before allocation.
    bincode_opts()
        .with_limit(max as u64)
        .deserialize(bytes)
        .map_err(|_| CodecError::Deserialize)
}

/// Address parse error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must be 32 bytes of hex")]
    Length,
    #[error("address is not valid hex")]
    Hex,
}

/// Authenticated principal identity (32 bytes, shown as `0x`-prefixed hex).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 32]);

impl Address {
    /// Construct from raw bytes.
    pub const fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    /// Return bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return Err(AddressError::Length);
        }
        let raw = hex::decode(s).map_err(|_| AddressError::Hex)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&raw);
        Ok(Self(out))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.to_string()
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a stake record. Allocated from 1, never reused.
    StakeRecordId
);
id_type!(
    /// Identifier of a governance proposal. Allocated from 1, never reused.
    ProposalId
);
id_type!(
    /// Identifier of a vote record. Allocated from 1, never reused.
    VoteRecordId
);

/// Epoch milliseconds.
pub type TimestampMs = u64;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = 3_600_000;
/// Milliseconds per day.
pub const MS_PER_DAY: u64 = 86_400_000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Read(String),
    #[error("parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Quorum policy for new proposals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumPolicy {
    /// Fixed minimum of combined voting power.
    Flat {
        /// Minimum votes_for + votes_against.
        min_voting_power: u64,
    },
    /// Share of total stake at proposal creation, in basis points.
    PercentOfStake {
        /// Basis points of `total_staked` (1000 = 10%).
        bps: u64,
    },
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        QuorumPolicy::Flat {
            min_voting_power: 1_000_000,
        }
    }
}

/// Node configuration root.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node settings.
    #[serde(default)]
    pub node: NodeSettings,
    /// HTTP endpoints.
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging.
    #[serde(default)]
    pub log: LogConfig,
    /// Ledger policy.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Initial governance parameters (used only when no snapshot exists).
    #[serde(default)]
    pub params: GovernanceParams,
}

impl NodeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: NodeConfig = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a file path.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        Self::from_toml_str(&raw)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params
            .validate_all()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        match self.ledger.quorum {
            QuorumPolicy::Flat { min_voting_power } if min_voting_power == 0 => {
                return Err(ConfigError::Invalid("quorum must be non-zero".into()));
            }
            QuorumPolicy::PercentOfStake { bps } if bps == 0 || bps > 10_000 => {
                return Err(ConfigError::Invalid("quorum bps must be in 1..=10000".into()));
            }
            _ => {}
        }
        if self.ledger.snapshot_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "snapshot_interval_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Node settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Human-readable name.
    pub name: String,
    /// Data directory (sled snapshot store).
    pub data_dir: String,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            name: "crozz-ledger".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

/// HTTP config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address, e.g. 0.0.0.0:9090.
    pub listen_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Logging config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of compact text.
    #[serde(default)]
    pub json: bool,
    /// Default filter directive (overridden by `RUST_LOG`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: default_log_level(),
        }
    }
}

/// Ledger policy knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Bootstrap SuperAdmin created at initialization.
    pub bootstrap_super_admin: Address,
    /// Quorum policy for new proposals.
    #[serde(default)]
    pub quorum: QuorumPolicy,
    /// Fail reward payouts that exceed the funded reward pool.
    #[serde(default)]
    pub enforce_reward_pool: bool,
    /// Allow admins holding `manage_params` to bypass governance.
    #[serde(default = "default_true")]
    pub allow_direct_param_updates: bool,
    /// Seconds between background snapshots.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_snapshot_interval() -> u64 {
    30
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            bootstrap_super_admin: Address::from_bytes([0u8; 32]),
            quorum: QuorumPolicy::default(),
            enforce_reward_pool: false,
            allow_direct_param_updates: true,
            snapshot_interval_secs: default_snapshot_interval(),
        }
    }
}
