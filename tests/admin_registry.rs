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

use std::sync::Arc;

use crozz_ledger::core::access::roles::{Permission, Role};
use crozz_ledger::core::clock::ManualClock;
use crozz_ledger::core::governance::params::{GovernanceParams, ParamType};
use crozz_ledger::core::runtime::executor::{EventKind, Ledger};
use crozz_ledger::core::types::{Address, LedgerConfig};
use proptest::prelude::*;

const SUPER: Address = Address::from_bytes([1u8; 32]);

fn addr(b: u8) -> Address {
    Address::from_bytes([b; 32])
}

fn ledger_with(allow_direct: bool) -> Ledger<Arc<ManualClock>> {
    let cfg = LedgerConfig {
        bootstrap_super_admin: SUPER,
        allow_direct_param_updates: allow_direct,
        ..LedgerConfig::default()
    };
    Ledger::new(&cfg, GovernanceParams::default(), Arc::new(ManualClock::new(0)))
}

#[test]
fn admin_role_gets_default_permissions() {
    let l = ledger_with(true);
    l.add_admin(&SUPER, addr(2), Role::Admin).unwrap();
    assert!(l.is_admin(&addr(2)).unwrap());
    assert!(!l.is_super_admin(&addr(2)).unwrap());
    assert_eq!(l.get_admin_role(&addr(2)).unwrap(), Role::Admin);
    assert!(l.has_permission(&addr(2), Permission::ExecuteFunctions).unwrap());
    assert!(!l.has_permission(&addr(2), Permission::ManageParams).unwrap());
    assert_eq!(l.get_admin_role(&addr(3)).unwrap(), Role::User);
}

#[test]
fn plain_admin_cannot_manage_admins() {
    let l = ledger_with(true);
    l.add_admin(&SUPER, addr(2), Role::Admin).unwrap();
    assert_eq!(l.add_admin(&addr(2), addr(3), Role::Admin).unwrap_err().kind(), "NotAdmin");
    assert_eq!(l.add_admin(&addr(9), addr(3), Role::Admin).unwrap_err().kind(), "NotAdmin");
    assert_eq!(l.remove_admin(&addr(2), &SUPER).unwrap_err().kind(), "NotAdmin");
    assert_eq!(
        l.update_admin_role(&addr(2), &addr(2), Role::SuperAdmin).unwrap_err().kind(),
        "NotAdmin"
    );
    assert_eq!(l.add_admin(&SUPER, addr(2), Role::Admin).unwrap_err().kind(), "PermissionDenied");
    assert_eq!(l.add_admin(&SUPER, addr(3), Role::User).unwrap_err().kind(), "InvalidRole");
    assert_eq!(l.remove_admin(&SUPER, &addr(7)).unwrap_err().kind(), "AdminNotFound");
}

#[test]
fn direct_parameter_update_is_gated_and_audited() {
    let l = ledger_with(true);
    l.add_admin(&SUPER, addr(2), Role::Admin).unwrap();
    assert_eq!(
        l.update_governance_parameter(&addr(2), ParamType::MakerFeeBps, 5)
            .unwrap_err()
            .kind(),
        "PermissionDenied"
    );

    l.set_permission(&SUPER, &addr(2), Permission::ManageParams, true).unwrap();
    assert_eq!(
        l.update_governance_parameter(&addr(2), ParamType::MakerFeeBps, 1_001)
            .unwrap_err()
            .kind(),
        "InvalidUpdateValue"
    );
    assert_eq!(l.update_governance_parameter(&addr(2), ParamType::MakerFeeBps, 5).unwrap(), 10);
    assert_eq!(l.get_parameter_value(ParamType::MakerFeeBps).unwrap(), 5);

    let last = l.events_since(0, 100).unwrap().pop().unwrap();
    assert_eq!(last.actor, addr(2));
    assert_eq!(
        last.kind,
        EventKind::ParameterUpdated {
            param: ParamType::MakerFeeBps,
            old: 10,
            new: 5,
            direct: true
        }
    );
}

#[test]
fn direct_updates_disabled_by_config() {
    let l = ledger_with(false);
    assert_eq!(
        l.update_governance_parameter(&SUPER, ParamType::TakerFeeBps, 20)
            .unwrap_err()
            .kind(),
        "PermissionDenied"
    );
    assert_eq!(l.params().unwrap(), GovernanceParams::default());
}

#[test]
fn reward_pool_funding_needs_execute_functions() {
    let l = ledger_with(true);
    assert_eq!(l.fund_reward_pool(&addr(5), 10).unwrap_err().kind(), "NotAdmin");
    l.add_admin(&SUPER, addr(2), Role::Admin).unwrap();
    assert_eq!(l.fund_reward_pool(&addr(2), 10).unwrap(), 10);
    l.set_permission(&SUPER, &addr(2), Permission::ExecuteFunctions, false).unwrap();
    assert_eq!(l.fund_reward_pool(&addr(2), 10).unwrap_err().kind(), "PermissionDenied");
    assert_eq!(l.pool().unwrap().total_reward_pool_balance, 10);
}

#[derive(Clone, Debug)]
enum AdminOp {
    Add { caller: u8, target: u8, sup: bool },
    Remove { caller: u8, target: u8 },
    SetRole { caller: u8, target: u8, sup: bool },
}

fn admin_op() -> impl Strategy<Value = AdminOp> {
    let who = 1u8..6;
    prop_oneof![
        (who.clone(), who.clone(), any::<bool>())
            .prop_map(|(caller, target, sup)| AdminOp::Add { caller, target, sup }),
        (who.clone(), who.clone()).prop_map(|(caller, target)| AdminOp::Remove { caller, target }),
        (who.clone(), who, any::<bool>())
            .prop_map(|(caller, target, sup)| AdminOp::SetRole { caller, target, sup }),
    ]
}

fn role(sup: bool) -> Role {
    if sup {
        Role::SuperAdmin
    } else {
        Role::Admin
    }
}

proptest! {
    #[test]
    fn prop_super_admin_count_never_reaches_zero(ops in prop::collection::vec(admin_op(), 1..60)) {
        let l = ledger_with(true);
        for op in ops {
            let _ = match op {
                AdminOp::Add { caller, target, sup } => l.add_admin(&addr(caller), addr(target), role(sup)),
                AdminOp::Remove { caller, target } => l.remove_admin(&addr(caller), &addr(target)),
                AdminOp::SetRole { caller, target, sup } => {
                    l.update_admin_role(&addr(caller), &addr(target), role(sup))
                }
            };
            let supers = l.snapshot().unwrap().admins.super_admin_count();
            prop_assert!(supers >= 1);
        }
    }
}
