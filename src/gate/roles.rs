use std::collections::BTreeSet;
use std::fmt;

/// A set of role names, as assigned to a principal or as expanded by
/// [`expand`]. Ordered so that logs and plans are stable.
pub type RoleSet = BTreeSet<String>;

/// Sentinel role name meaning "no authentication required".
pub const ALL: &str = "all";

/// The fixed privilege hierarchy, lowest rank first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Subscriber,
    Contributor,
    Author,
    Editor,
    Administrator,
    SuperAdmin,
}

impl Role {
    /// Every hierarchy role, ordered by rank (index == rank).
    pub const HIERARCHY: [Role; 6] = [
        Role::Subscriber,
        Role::Contributor,
        Role::Author,
        Role::Editor,
        Role::Administrator,
        Role::SuperAdmin,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Subscriber => "subscriber",
            Role::Contributor => "contributor",
            Role::Author => "author",
            Role::Editor => "editor",
            Role::Administrator => "administrator",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Case-insensitive lookup of a hierarchy role by name.
    pub fn lookup(name: &str) -> Option<Self> {
        let normalized = name.to_lowercase();
        Self::HIERARCHY
            .into_iter()
            .find(|role| role.as_str() == normalized)
    }

    /// This role and every role beneath it.
    pub fn implied(self) -> impl Iterator<Item = Role> {
        Self::HIERARCHY.into_iter().take(self.rank() as usize + 1)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role an action requires, resolved from a raw role name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequiredRole {
    /// Anyone, authenticated or not.
    All,
    /// A role from the fixed hierarchy.
    Standard(Role),
    /// A role outside the hierarchy, matched by literal membership only.
    Custom(String),
}

impl RequiredRole {
    /// Resolve a raw role name. Never fails: unknown names become `Custom`.
    pub fn parse(name: &str) -> Self {
        let normalized = name.to_lowercase();
        if normalized == ALL {
            return RequiredRole::All;
        }
        match Role::lookup(&normalized) {
            Some(role) => RequiredRole::Standard(role),
            None => RequiredRole::Custom(normalized),
        }
    }

    /// Normalized role name, as used for membership tests.
    pub fn name(&self) -> &str {
        match self {
            RequiredRole::All => ALL,
            RequiredRole::Standard(role) => role.as_str(),
            RequiredRole::Custom(name) => name,
        }
    }

    pub fn rank(&self) -> Option<u8> {
        match self {
            RequiredRole::Standard(role) => Some(role.rank()),
            _ => None,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, RequiredRole::All)
    }

    /// Whether a principal holding `roles` (already expanded and filtered)
    /// may use an action requiring this role.
    pub fn is_satisfied_by(&self, roles: &RoleSet) -> bool {
        match self {
            RequiredRole::All => true,
            other => roles.contains(other.name()),
        }
    }
}

impl fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Highest hierarchy role present in `roles`, if any.
pub fn highest_role(roles: &RoleSet) -> Option<Role> {
    Role::HIERARCHY
        .into_iter()
        .rev()
        .find(|role| roles.contains(role.as_str()))
}

/// Expand assigned roles into every hierarchy role they satisfy.
///
/// Only the highest held hierarchy role matters. Names outside the hierarchy
/// are ignored here; an empty or custom-only input expands to nothing.
pub fn expand(assigned: &RoleSet) -> RoleSet {
    match highest_role(assigned) {
        Some(top) => top.implied().map(|r| r.as_str().to_string()).collect(),
        None => RoleSet::new(),
    }
}
