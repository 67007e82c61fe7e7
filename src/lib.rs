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

//! Crozz Coin ledger - staking, reward accrual, stake-weighted governance and
//! admin access control.
//!
//! This repository provides:
//! - Deterministic types, canonical encoding and an injectable clock
//! - Overflow-checked hourly reward accrual and a stake ledger
//! - A proposal state machine with quorum and execution delay
//! - A role/permission registry guarding privileged operations
//! - sled snapshots with a Merkle commitment over every ledger entity
//! - An axum JSON API, Prometheus metrics and structured logging

/// Ledger primitives (types, clock, economics, governance, access, state).
pub mod core;
/// Observability (metrics).
pub mod monitoring;
/// HTTP API.
pub mod api;
