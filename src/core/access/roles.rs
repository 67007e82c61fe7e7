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

//! Role/permission registry for admin principals.
//!
//! SuperAdmins hold every permission implicitly. The registry never lets the
//! SuperAdmin count drop to zero.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::governance::params::{GovernanceParams, ParamError, ParamType};
use crate::core::types::{Address, TimestampMs};

/// Authorization errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Caller lacks the required role.
    #[error("caller {0} is not an admin with the required role")]
    NotAdmin(Address),
    /// Caller is an admin but lacks a permission, or the operation is disabled.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Role not acceptable for the operation.
    #[error("invalid role: {0}")]
    InvalidRole(String),
    /// Target principal is not an admin.
    #[error("admin {0} not found")]
    AdminNotFound(Address),
    /// Operation would leave no SuperAdmin.
    #[error("cannot remove or demote the last super admin")]
    LastSuperAdmin,
    /// Parameter tag or value rejected.
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Admin role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No elevated rights.
    User,
    /// Subset of permissions.
    Admin,
    /// Every permission, including admin management.
    SuperAdmin,
}

impl Role {
    /// Permission set assigned when a principal takes this role.
    pub fn default_permissions(self) -> BTreeSet<Permission> {
        match self {
            Role::User => BTreeSet::new(),
            Role::Admin => [
                Permission::ViewDashboard,
                Permission::ManageUsers,
                Permission::ExecuteFunctions,
            ]
            .into_iter()
            .collect(),
            Role::SuperAdmin => Permission::ALL.into_iter().collect(),
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(AccessError::InvalidRole(other.to_string())),
        }
    }
}

/// Permission tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Read admin listings and dashboards.
    ViewDashboard,
    /// Manage end users.
    ManageUsers,
    /// Run privileged functions (proposal execution, pool funding).
    ExecuteFunctions,
    /// Update governance parameters directly.
    ManageParams,
    /// Manage admins.
    ManageAdmins,
}

impl Permission {
    /// Every permission.
    pub const ALL: [Permission; 5] = [
        Permission::ViewDashboard,
        Permission::ManageUsers,
        Permission::ExecuteFunctions,
        Permission::ManageParams,
        Permission::ManageAdmins,
    ];

    /// Wire tag.
    pub fn tag(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ManageUsers => "manage_users",
            Permission::ExecuteFunctions => "execute_functions",
            Permission::ManageParams => "manage_params",
            Permission::ManageAdmins => "manage_admins",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Permission {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.tag() == s)
            .ok_or_else(|| AccessError::PermissionDenied(format!("unknown permission {s}")))
    }
}

/// Admin principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Principal.
    pub address: Address,
    /// Role.
    pub role: Role,
    /// Explicit permissions.
    pub permissions: BTreeSet<Permission>,
    /// Added at.
    pub created_at: TimestampMs,
    /// Last gated action.
    pub last_activity: TimestampMs,
}

/// Admin set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRegistry {
    admins: BTreeMap<Address, AdminUser>,
    bootstrap: Address,
    allow_direct_param_updates: bool,
}

impl AdminRegistry {
    /// Registry with `bootstrap` as the only SuperAdmin.
    pub fn new(bootstrap: Address, allow_direct_param_updates: bool, now: TimestampMs) -> Self {
        let mut admins = BTreeMap::new();
        admins.insert(
            bootstrap,
            AdminUser {
                address: bootstrap,
                role: Role::SuperAdmin,
                permissions: Role::SuperAdmin.default_permissions(),
                created_at: now,
                last_activity: now,
            },
        );
        Self {
            admins,
            bootstrap,
            allow_direct_param_updates,
        }
    }

    /// The SuperAdmin created at initialization.
    pub fn bootstrap_admin(&self) -> Address {
        self.bootstrap
    }

    /// Admin or SuperAdmin.
    pub fn is_admin(&self, addr: &Address) -> bool {
        self.admins.contains_key(addr)
    }

    /// SuperAdmin.
    pub fn is_super_admin(&self, addr: &Address) -> bool {
        self.role_of(addr) == Role::SuperAdmin
    }

    /// SuperAdmins pass for every permission.
    pub fn has_permission(&self, addr: &Address, perm: Permission) -> bool {
        match self.admins.get(addr) {
            Some(a) if a.role == Role::SuperAdmin => true,
            Some(a) => a.permissions.contains(&perm),
            None => false,
        }
    }

    /// `User` for non-admins.
    pub fn role_of(&self, addr: &Address) -> Role {
        self.admins.get(addr).map(|a| a.role).unwrap_or(Role::User)
    }

    /// Admin record.
    pub fn get(&self, addr: &Address) -> Option<&AdminUser> {
        self.admins.get(addr)
    }

    /// All admins ordered by address.
    pub fn list(&self) -> impl Iterator<Item = &AdminUser> {
        self.admins.values()
    }

    /// Number of SuperAdmins.
    pub fn super_admin_count(&self) -> usize {
        self.admins
            .values()
            .filter(|a| a.role == Role::SuperAdmin)
            .count()
    }

    /// Whether direct parameter updates are enabled.
    pub fn direct_param_updates_enabled(&self) -> bool {
        self.allow_direct_param_updates
    }

    /// Gate: caller must be an admin holding `perm`.
    pub fn authorize(&self, caller: &Address, perm: Permission) -> Result<(), AccessError> {
        if !self.is_admin(caller) {
            return Err(AccessError::NotAdmin(*caller));
        }
        if !self.has_permission(caller, perm) {
            return Err(AccessError::PermissionDenied(format!("{caller} lacks {perm}")));
        }
        Ok(())
    }

    /// Gate: caller must be a SuperAdmin; a plain Admin is `NotAdmin` here too.
    pub fn authorize_super_admin(&self, caller: &Address) -> Result<(), AccessError> {
        if !self.is_super_admin(caller) {
            return Err(AccessError::NotAdmin(*caller));
        }
        Ok(())
    }

    /// Refresh `last_activity` after a gated action succeeded.
    pub fn touch(&mut self, caller: &Address, now: TimestampMs) {
        if let Some(a) = self.admins.get_mut(caller) {
            a.last_activity = a.last_activity.max(now);
        }
    }

    /// Add `new_addr` with `role`'s default permissions.
    pub fn add_admin(
        &mut self,
        caller: &Address,
        new_addr: Address,
        role: Role,
        now: TimestampMs,
    ) -> Result<(), AccessError> {
        self.authorize_super_admin(caller)?;
        if self.is_admin(&new_addr) {
            return Err(AccessError::PermissionDenied(format!("{new_addr} is already an admin")));
        }
        if role == Role::User {
            return Err(AccessError::InvalidRole(role.to_string()));
        }
        self.admins.insert(
            new_addr,
            AdminUser {
                address: new_addr,
                role,
                permissions: role.default_permissions(),
                created_at: now,
                last_activity: now,
            },
        );
        self.touch(caller, now);
        Ok(())
    }

    /// Remove `target`, refusing to remove the last SuperAdmin.
    pub fn remove_admin(
        &mut self,
        caller: &Address,
        target: &Address,
        now: TimestampMs,
    ) -> Result<AdminUser, AccessError> {
        self.authorize_super_admin(caller)?;
        let role = self
            .admins
            .get(target)
            .map(|a| a.role)
            .ok_or(AccessError::AdminNotFound(*target))?;
        if role == Role::SuperAdmin && self.super_admin_count() <= 1 {
            return Err(AccessError::LastSuperAdmin);
        }
        let removed = self
            .admins
            .remove(target)
            .ok_or(AccessError::AdminNotFound(*target))?;
        self.touch(caller, now);
        Ok(removed)
    }

    /// Change `target`'s role; permissions are reset to the new role's defaults.
    pub fn update_admin_role(
        &mut self,
        caller: &Address,
        target: &Address,
        new_role: Role,
        now: TimestampMs,
    ) -> Result<Role, AccessError> {
        self.authorize_super_admin(caller)?;
        if new_role == Role::User {
            return Err(AccessError::InvalidRole(new_role.to_string()));
        }
        let old = self
            .admins
            .get(target)
            .map(|a| a.role)
            .ok_or(AccessError::AdminNotFound(*target))?;
        if old == Role::SuperAdmin && new_role != Role::SuperAdmin && self.super_admin_count() <= 1
        {
            return Err(AccessError::LastSuperAdmin);
        }
        if let Some(a) = self.admins.get_mut(target) {
            a.role = new_role;
            a.permissions = new_role.default_permissions();
        }
        self.touch(caller, now);
        Ok(old)
    }

    /// Grant or revoke one explicit permission on an Admin.
    pub fn set_permission(
        &mut self,
        caller: &Address,
        target: &Address,
        perm: Permission,
        granted: bool,
        now: TimestampMs,
    ) -> Result<(), AccessError> {
        self.authorize_super_admin(caller)?;
        let admin = self
            .admins
            .get_mut(target)
            .ok_or(AccessError::AdminNotFound(*target))?;
        if admin.role == Role::SuperAdmin {
            return Err(AccessError::InvalidRole(format!(
                "{} permissions are implicit",
                Role::SuperAdmin
            )));
        }
        if granted {
            admin.permissions.insert(perm);
        } else {
            admin.permissions.remove(&perm);
        }
        self.touch(caller, now);
        Ok(())
    }

    /// Validate a direct parameter update without applying it.
    pub fn check_param_update(
        &self,
        caller: &Address,
        param: ParamType,
        value: u64,
    ) -> Result<(), AccessError> {
        self.authorize(caller, Permission::ManageParams)?;
        if !self.allow_direct_param_updates {
            return Err(AccessError::PermissionDenied(
                "direct parameter updates are disabled; use a proposal".to_string(),
            ));
        }
        param.validate(value)?;
        Ok(())
    }

    /// Direct bounded update of a governance parameter. Returns the old value.
    pub fn update_governance_parameter(
        &mut self,
        caller: &Address,
        params: &mut GovernanceParams,
        param: ParamType,
        value: u64,
        now: TimestampMs,
    ) -> Result<u64, AccessError> {
        self.check_param_update(caller, param, value)?;
        let old = params.set(param, value)?;
        self.touch(caller, now);
        Ok(old)
    }
}
