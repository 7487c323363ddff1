//! Permission overwrite sets.
//!
//! An [`OverwriteSet`] maps each principal to one [`AccessRule`]. Inserting
//! a principal that is already present replaces its rule (last write wins).

use std::collections::BTreeMap;

use crate::domain::entities::PermissionOverwrite;
use crate::domain::value_objects::{AccessRule, Principal};

/// Ordered mapping of principal to access rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverwriteSet {
    rules: BTreeMap<Principal, AccessRule>,
}

impl OverwriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of an existing category's or channel's overwrites.
    pub fn from_overwrites(overwrites: &[PermissionOverwrite]) -> Self {
        let mut set = Self::new();
        for overwrite in overwrites {
            set.insert(
                Principal::from(overwrite),
                AccessRule::from_bits(overwrite.allow, overwrite.deny),
            );
        }
        set
    }

    /// Set a principal's rule, replacing any earlier one.
    pub fn insert(&mut self, principal: Principal, rule: AccessRule) -> Option<AccessRule> {
        self.rules.insert(principal, rule)
    }

    pub fn get(&self, principal: &Principal) -> Option<&AccessRule> {
        self.rules.get(principal)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Overwrite records ready to hand to the session.
    pub fn to_overwrites(&self) -> Vec<PermissionOverwrite> {
        self.rules
            .iter()
            .map(|(principal, rule)| rule.to_overwrite(*principal))
            .collect()
    }
}

/// Builder for the common "private to these principals" shape.
///
/// ```rust,ignore
/// let set = OverwriteBuilder::new(guild_id)
///     .deny_default()
///     .allow(Principal::Member(student_id))
///     .allow(Principal::Role(admins_id))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct OverwriteBuilder {
    everyone_role_id: i64,
    default_rule: Option<AccessRule>,
    explicit: Vec<(Principal, AccessRule)>,
}

impl OverwriteBuilder {
    /// Start a set for a server; the default role shares the server's ID.
    pub fn new(everyone_role_id: i64) -> Self {
        Self {
            everyone_role_id,
            default_rule: None,
            explicit: Vec::new(),
        }
    }

    /// Deny view/read to the default role.
    pub fn deny_default(mut self) -> Self {
        self.default_rule = Some(AccessRule::deny_view());
        self
    }

    /// Allow view, read and send.
    pub fn allow(self, principal: Principal) -> Self {
        self.allow_with(principal, AccessRule::participant())
    }

    /// Grant a caller-supplied rule.
    pub fn allow_with(mut self, principal: Principal, rule: AccessRule) -> Self {
        self.explicit.push((principal, rule));
        self
    }

    /// Grant to an optional principal; `None` is skipped.
    pub fn allow_if(self, principal: Option<Principal>) -> Self {
        match principal {
            Some(principal) => self.allow(principal),
            None => self,
        }
    }

    /// Build the set. The default role's rule goes in first so an explicit
    /// rule for the same principal overrides it.
    pub fn build(self) -> OverwriteSet {
        let mut set = OverwriteSet::new();
        if let Some(rule) = self.default_rule {
            set.insert(Principal::Role(self.everyone_role_id), rule);
        }
        for (principal, rule) in self.explicit {
            set.insert(principal, rule);
        }
        set
    }
}
