//! Caller roles and the typed permission set.
//!
//! Staff permissions arrive as comma-joined strings, one string per assigned
//! role. They are parsed once into a [`PermissionSet`] bitmask when the caller's
//! context is built, and every later check is a bit test.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The kind of account making a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Staff,
    Voter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Staff => "STAFF",
            Self::Voter => "VOTER",
        }
    }

    /// Whether a caller with this role and permission set may use `capability`.
    ///
    /// Super-admins bypass every check. Voters may only reach voter-scoped
    /// operations. Staff need the named permission; they never pass a
    /// voter-scoped or super-admin-only check.
    pub fn allows(&self, permissions: PermissionSet, capability: Capability) -> bool {
        match (self, capability) {
            (Self::SuperAdmin, _) => true,
            (Self::Voter, Capability::Voter) => true,
            (Self::Voter, _) => false,
            (Self::Staff, Capability::Permission(p)) => permissions.contains(p),
            (Self::Staff, _) => false,
        }
    }
}

impl FromStr for Role {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "STAFF" | "ADMIN" => Ok(Self::Staff),
            "VOTER" => Ok(Self::Voter),
            _ => Err(TypesError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named staff permission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    RegisterVoter,
    ViewResults,
    ManageAdmins,
    ManageElections,
    ManageCandidates,
    ViewAuditLogs,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Self::RegisterVoter,
        Self::ViewResults,
        Self::ManageAdmins,
        Self::ManageElections,
        Self::ManageCandidates,
        Self::ViewAuditLogs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegisterVoter => "register_voter",
            Self::ViewResults => "view_results",
            Self::ManageAdmins => "manage_admins",
            Self::ManageElections => "manage_elections",
            Self::ManageCandidates => "manage_candidates",
            Self::ViewAuditLogs => "view_audit_logs",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|p| p.as_str().eq_ignore_ascii_case(name))
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`Permission`]s stored as a bitmask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet(u32);

impl PermissionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Permission::ALL
            .into_iter()
            .fold(Self::empty(), |set, p| set.with(p))
    }

    pub fn with(mut self, permission: Permission) -> Self {
        self.insert(permission);
        self
    }

    pub fn insert(&mut self, permission: Permission) {
        self.0 |= permission.bit();
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(|p| self.contains(*p))
    }

    /// Parse one comma-joined permission string. `all` grants everything.
    ///
    /// Returns the parsed set and the names that were not recognised.
    pub fn parse_list(list: &str) -> (Self, Vec<String>) {
        let mut set = Self::empty();
        let mut unknown = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name.eq_ignore_ascii_case("all") {
                set = set.union(Self::all());
            } else if let Some(p) = Permission::parse(name) {
                set.insert(p);
            } else {
                unknown.push(name.to_string());
            }
        }
        (set, unknown)
    }

    /// Union of the permissions granted by each role's list.
    pub fn from_role_lists<'a>(lists: impl IntoIterator<Item = &'a str>) -> (Self, Vec<String>) {
        lists
            .into_iter()
            .map(Self::parse_list)
            .fold((Self::empty(), Vec::new()), |(set, mut unknown), (s, u)| {
                unknown.extend(u);
                (set.union(s), unknown)
            })
    }
}

/// What an operation demands of its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Voter-scoped operations (list own elections, cast a vote).
    Voter,
    /// Staff operations guarded by a named permission.
    Permission(Permission),
    /// Reserved for super-admins.
    SuperAdmin,
}
