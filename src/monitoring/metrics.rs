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

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;

use crate::core::runtime::executor::LedgerStats;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Pool total staked.
    pub total_staked: IntGauge,
    /// Live stake records.
    pub stake_records: IntGauge,
    /// Funded reward balance.
    pub reward_pool_balance: IntGauge,
    /// Rewards paid out.
    pub rewards_paid: IntGauge,
    /// Proposals accepting votes.
    pub proposals_active: IntGauge,
    /// All proposals.
    pub proposals_total: IntGauge,
    /// Admin principals.
    pub admins: IntGauge,

    /// Commands accepted, by op.
    pub commands_total: IntCounterVec,
    /// Commands rejected, by op and error kind.
    pub commands_rejected_total: IntCounterVec,
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge, MetricsError> {
    let g = IntGauge::new(name, help).map_err(|_| MetricsError::Prom)?;
    registry
        .register(Box::new(g.clone()))
        .map_err(|_| MetricsError::Prom)?;
    Ok(g)
}

fn counter_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<IntCounterVec, MetricsError> {
    let c = IntCounterVec::new(Opts::new(name, help), labels).map_err(|_| MetricsError::Prom)?;
    registry
        .register(Box::new(c.clone()))
        .map_err(|_| MetricsError::Prom)?;
    Ok(c)
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let total_staked = gauge(&registry, "crozz_total_staked", "Pool total staked")?;
        let stake_records = gauge(&registry, "crozz_stake_records", "Live stake records")?;
        let reward_pool_balance = gauge(
            &registry,
            "crozz_reward_pool_balance",
            "Funded reward pool balance",
        )?;
        let rewards_paid = gauge(&registry, "crozz_rewards_paid", "Rewards paid out")?;
        let proposals_active = gauge(
            &registry,
            "crozz_proposals_active",
            "Proposals accepting votes",
        )?;
        let proposals_total = gauge(&registry, "crozz_proposals_total", "All proposals")?;
        let admins = gauge(&registry, "crozz_admins", "Admin principals")?;

        let commands_total = counter_vec(
            &registry,
            "crozz_commands_total",
            "Accepted ledger commands",
            &["op"],
        )?;
        let commands_rejected_total = counter_vec(
            &registry,
            "crozz_commands_rejected_total",
            "Rejected ledger commands",
            &["op", "kind"],
        )?;

        Ok(Self {
            registry,
            total_staked,
            stake_records,
            reward_pool_balance,
            rewards_paid,
            proposals_active,
            proposals_total,
            admins,
            commands_total,
            commands_rejected_total,
        })
    }

    /// Copy ledger aggregates into gauges.
    pub fn observe(&self, s: &LedgerStats) {
        // IntGauge is i64; clamp instead of wrapping.
        let g = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);
        self.total_staked.set(g(s.total_staked));
        self.stake_records.set(g(s.stake_records));
        self.reward_pool_balance.set(g(s.reward_pool_balance));
        self.rewards_paid.set(g(s.rewards_paid));
        self.proposals_active.set(g(s.proposals_active));
        self.proposals_total.set(g(s.proposals_total));
        self.admins.set(g(s.admins));
    }

    /// Count one command result.
    pub fn command(&self, op: &str, rejected: Option<&str>) {
        match rejected {
            None => self.commands_total.with_label_values(&[op]).inc(),
            Some(kind) => self
                .commands_rejected_total
                .with_label_values(&[op, kind])
                .inc(),
        }
    }

    /// Prometheus text exposition.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|_| MetricsError::Prom)?;
        String::from_utf8(buf).map_err(|_| MetricsError::Prom)
    }
}
