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
#![deny(missing_docs)]

//! Governance parameters and their bound table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parameter errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// Unknown parameter tag.
    #[error("invalid param type: {0}")]
    InvalidParamType(String),
    /// Value outside the inclusive bound for the parameter.
    #[error("invalid update value {value} for {param}: allowed {min}..={max}")]
    InvalidUpdateValue {
        /// Parameter.
        param: ParamType,
        /// Rejected value.
        value: u64,
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },
}

/// Governable parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// Taker fee in basis points.
    TakerFeeBps,
    /// Maker fee in basis points.
    MakerFeeBps,
    /// Minimum amount per stake record, base units.
    MinStakeAmount,
    /// Staking APY in basis points.
    RewardRateBps,
    /// Standard voting window in days.
    VotingPeriodDays,
    /// Standard execution delay in days.
    ExecutionDelayDays,
}

impl ParamType {
    /// Every parameter, in table order.
    pub const ALL: [ParamType; 6] = [
        ParamType::TakerFeeBps,
        ParamType::MakerFeeBps,
        ParamType::MinStakeAmount,
        ParamType::RewardRateBps,
        ParamType::VotingPeriodDays,
        ParamType::ExecutionDelayDays,
    ];

    /// Wire tag.
    pub fn tag(self) -> &'static str {
        match self {
            ParamType::TakerFeeBps => "taker_fee_bps",
            ParamType::MakerFeeBps => "maker_fee_bps",
            ParamType::MinStakeAmount => "min_stake_amount",
            ParamType::RewardRateBps => "reward_rate_bps",
            ParamType::VotingPeriodDays => "voting_period_days",
            ParamType::ExecutionDelayDays => "execution_delay_days",
        }
    }

    /// Inclusive `(min, max)` accepted for this parameter.
    pub fn bounds(self) -> (u64, u64) {
        match self {
            ParamType::TakerFeeBps | ParamType::MakerFeeBps => (0, 1_000),
            ParamType::MinStakeAmount => (1_000_000, 1_000_000_000_000_000_000),
            ParamType::RewardRateBps => (0, 1_000),
            ParamType::VotingPeriodDays => (3, 30),
            ParamType::ExecutionDelayDays => (1, 14),
        }
    }

    /// Check `value` against the bound table.
    pub fn validate(self, value: u64) -> Result<(), ParamError> {
        let (min, max) = self.bounds();
        if value < min || value > max {
            return Err(ParamError::InvalidUpdateValue {
                param: self,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ParamType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamType::ALL
            .into_iter()
            .find(|p| p.tag() == s)
            .ok_or_else(|| ParamError::InvalidParamType(s.to_string()))
    }
}

/// Singleton parameter set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceParams {
    /// Taker fee (bps).
    pub taker_fee_bps: u64,
    /// Maker fee (bps).
    pub maker_fee_bps: u64,
    /// Minimum stake per record.
    pub min_stake_amount: u64,
    /// Staking APY (bps).
    pub reward_rate_bps: u64,
    /// Standard voting window (days).
    pub voting_period_days: u64,
    /// Standard execution delay (days).
    pub execution_delay_days: u64,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            taker_fee_bps: 30,
            maker_fee_bps: 10,
            min_stake_amount: 1_000_000,
            reward_rate_bps: 500,
            voting_period_days: 7,
            execution_delay_days: 2,
        }
    }
}

impl GovernanceParams {
    /// Current value.
    pub fn get(&self, param: ParamType) -> u64 {
        match param {
            ParamType::TakerFeeBps => self.taker_fee_bps,
            ParamType::MakerFeeBps => self.maker_fee_bps,
            ParamType::MinStakeAmount => self.min_stake_amount,
            ParamType::RewardRateBps => self.reward_rate_bps,
            ParamType::VotingPeriodDays => self.voting_period_days,
            ParamType::ExecutionDelayDays => self.execution_delay_days,
        }
    }

    /// Bounded update; leaves the set untouched on error.
    pub fn set(&mut self, param: ParamType, value: u64) -> Result<u64, ParamError> {
        param.validate(value)?;
        let slot = match param {
            ParamType::TakerFeeBps => &mut self.taker_fee_bps,
            ParamType::MakerFeeBps => &mut self.maker_fee_bps,
            ParamType::MinStakeAmount => &mut self.min_stake_amount,
            ParamType::RewardRateBps => &mut self.reward_rate_bps,
            ParamType::VotingPeriodDays => &mut self.voting_period_days,
            ParamType::ExecutionDelayDays => &mut self.execution_delay_days,
        };
        Ok(std::mem::replace(slot, value))
    }

    /// Validate every field (used for configured initial values).
    pub fn validate_all(&self) -> Result<(), ParamError> {
        for p in ParamType::ALL {
            p.validate(self.get(p))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back() {
        for p in ParamType::ALL {
            assert_eq!(p.tag().parse::<ParamType>(), Ok(p));
        }
        assert!(matches!(
            "quorum".parse::<ParamType>(),
            Err(ParamError::InvalidParamType(_))
        ));
    }

    #[test]
    fn set_enforces_bounds() {
        let mut p = GovernanceParams::default();
        assert!(p.set(ParamType::RewardRateBps, 1_001).is_err());
        assert!(p.set(ParamType::VotingPeriodDays, 2).is_err());
        assert!(p.set(ParamType::VotingPeriodDays, 31).is_err());
        assert_eq!(p, GovernanceParams::default());

        assert_eq!(p.set(ParamType::RewardRateBps, 1_000), Ok(500));
        assert_eq!(p.get(ParamType::RewardRateBps), 1_000);
        assert_eq!(p.set(ParamType::VotingPeriodDays, 3), Ok(7));
    }

    #[test]
    fn defaults_are_in_bounds() {
        assert!(GovernanceParams::default().validate_all().is_ok());
    }
}
