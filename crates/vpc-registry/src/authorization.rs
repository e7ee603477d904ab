//! # Authorization Gate
//!
//! Holds the administrative principal and the three role sets, and answers
//! "may this caller perform this action". The gate never mutates on a
//! check; grants and ownership transfers are separate calls that the suite
//! makes only after an `Admin` check passes.
//!
//! ```text
//! Action    allowed callers
//! ───────   ─────────────────────────────────
//! Admin     owner
//! Issue     authorized issuers (owner NOT implicit)
//! Revoke    authorized revokers, or owner
//! Provide   authorized providers
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vpc_core::Principal;

/// A permission category granted by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May issue credentials.
    Issuer,
    /// May revoke credentials.
    Revoker,
    /// May add continuing-education credits.
    Provider,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Issuer => "issuer",
            Self::Revoker => "revoker",
            Self::Provider => "provider",
        };
        f.write_str(s)
    }
}

/// An action category checked by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Ownership transfer and role grants.
    Admin,
    /// Credential issuance.
    Issue,
    /// Credential revocation.
    Revoke,
    /// Adding education credits.
    Provide,
}

/// The owner registry plus the issuer/revoker/provider registries.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    owner: Principal,
    issuers: BTreeSet<Principal>,
    revokers: BTreeSet<Principal>,
    providers: BTreeSet<Principal>,
}

impl AuthorizationGate {
    /// A gate with `owner` as the administrative principal and empty role sets.
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            issuers: BTreeSet::new(),
            revokers: BTreeSet::new(),
            providers: BTreeSet::new(),
        }
    }

    /// The current administrative principal.
    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    /// Whether `caller` is the administrative principal.
    pub fn is_owner(&self, caller: &Principal) -> bool {
        &self.owner == caller
    }

    /// Whether `principal` holds `role`.
    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.set(role).contains(principal)
    }

    /// Whether `caller` may perform `action`.
    pub fn is_allowed(&self, caller: &Principal, action: Action) -> bool {
        match action {
            Action::Admin => self.is_owner(caller),
            Action::Issue => self.has_role(Role::Issuer, caller),
            Action::Revoke => self.has_role(Role::Revoker, caller) || self.is_owner(caller),
            Action::Provide => self.has_role(Role::Provider, caller),
        }
    }

    /// Members of `role` in sorted order.
    pub fn members(&self, role: Role) -> impl Iterator<Item = &Principal> {
        self.set(role).iter()
    }

    /// Replace the owner. Callers must have passed an `Admin` check.
    pub(crate) fn transfer_ownership(&mut self, new_owner: Principal) {
        self.owner = new_owner;
    }

    /// Add `principal` to `role`. Returns `false` if it was already a member.
    /// Callers must have passed an `Admin` check.
    pub(crate) fn grant(&mut self, role: Role, principal: Principal) -> bool {
        self.set_mut(role).insert(principal)
    }

    fn set(&self, role: Role) -> &BTreeSet<Principal> {
        match role {
            Role::Issuer => &self.issuers,
            Role::Revoker => &self.revokers,
            Role::Provider => &self.providers,
        }
    }

    fn set_mut(&mut self, role: Role) -> &mut BTreeSet<Principal> {
        match role {
            Role::Issuer => &mut self.issuers,
            Role::Revoker => &mut self.revokers,
            Role::Provider => &mut self.providers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn gate() -> AuthorizationGate {
        AuthorizationGate::new(p("OWNER"))
    }

    #[test]
    fn owner_is_admin() {
        let g = gate();
        assert!(g.is_allowed(&p("OWNER"), Action::Admin));
        assert!(!g.is_allowed(&p("OTHER"), Action::Admin));
    }

    #[test]
    fn owner_is_implicit_revoker_only() {
        let g = gate();
        let owner = p("OWNER");
        assert!(g.is_allowed(&owner, Action::Revoke));
        assert!(!g.is_allowed(&owner, Action::Issue));
        assert!(!g.is_allowed(&owner, Action::Provide));
    }

    #[test]
    fn roles_are_independent() {
        let mut g = gate();
        assert!(g.grant(Role::Issuer, p("ISSUER")));
        assert!(g.is_allowed(&p("ISSUER"), Action::Issue));
        assert!(!g.is_allowed(&p("ISSUER"), Action::Revoke));
        assert!(!g.is_allowed(&p("ISSUER"), Action::Provide));
        assert!(!g.is_allowed(&p("ISSUER"), Action::Admin));
    }

    #[test]
    fn grant_is_idempotent() {
        let mut g = gate();
        assert!(g.grant(Role::Provider, p("PROV")));
        assert!(!g.grant(Role::Provider, p("PROV")));
        assert_eq!(g.members(Role::Provider).count(), 1);
    }

    #[test]
    fn transfer_moves_admin_and_implicit_revoke() {
        let mut g = gate();
        g.transfer_ownership(p("NEW"));
        assert!(g.is_owner(&p("NEW")));
        assert!(!g.is_allowed(&p("OWNER"), Action::Admin));
        assert!(!g.is_allowed(&p("OWNER"), Action::Revoke));
        assert!(g.is_allowed(&p("NEW"), Action::Revoke));
    }

    #[test]
    fn members_are_sorted() {
        let mut g = gate();
        g.grant(Role::Revoker, p("B"));
        g.grant(Role::Revoker, p("A"));
        let names: Vec<&str> = g.members(Role::Revoker).map(Principal::as_str).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn role_display() {
        assert_eq!(Role::Issuer.to_string(), "issuer");
        assert_eq!(Role::Revoker.to_string(), "revoker");
        assert_eq!(Role::Provider.to_string(), "provider");
    }
}
