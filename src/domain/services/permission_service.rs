//! Effective permission calculation.

use crate::domain::entities::{Channel, GuildSnapshot, Member, OverwriteType, PermissionOverwrite, Role};
use crate::domain::value_objects::Permissions;

/// Domain service for calculating effective permissions.
pub struct PermissionService;

impl PermissionService {
    /// Calculate a member's base permissions in a server.
    ///
    /// This combines permissions from the everyone role and every role the
    /// member holds.
    pub fn calculate_base_permissions(
        member: &Member,
        roles: &[Role],
        owner_id: i64,
    ) -> i64 {
        // Owner has all permissions
        if member.user_id == owner_id {
            return Permissions::ALL;
        }

        let permissions = roles
            .iter()
            .filter(|role| role.id == member.server_id || member.has_role(role.id))
            .fold(0i64, |acc, role| acc | role.permissions);

        // Administrator overrides all
        if permissions & Permissions::ADMINISTRATOR != 0 {
            return Permissions::ALL;
        }

        permissions
    }

    /// Calculate a member's permissions on a category or channel.
    ///
    /// Overwrites are applied in three layers: the everyone role, the union
    /// of the member's role overwrites, then the member-specific overwrite.
    pub fn calculate_channel_permissions(
        member: &Member,
        overwrites: &[PermissionOverwrite],
        roles: &[Role],
        owner_id: i64,
    ) -> i64 {
        let mut permissions = Self::calculate_base_permissions(member, roles, owner_id);

        // Administrator bypasses overwrites
        if permissions & Permissions::ADMINISTRATOR != 0 {
            return Permissions::ALL;
        }

        if let Some(everyone) = overwrites
            .iter()
            .find(|o| o.target_type == OverwriteType::Role && o.target_id == member.server_id)
        {
            permissions = Permissions::apply_overwrites(permissions, everyone.allow, everyone.deny);
        }

        let (allow, deny) = overwrites
            .iter()
            .filter(|o| o.target_type == OverwriteType::Role && member.has_role(o.target_id))
            .fold((0i64, 0i64), |(allow, deny), o| (allow | o.allow, deny | o.deny));
        permissions = Permissions::apply_overwrites(permissions, allow, deny);

        if let Some(own) = overwrites
            .iter()
            .find(|o| o.target_type == OverwriteType::Member && o.target_id == member.user_id)
        {
            permissions = Permissions::apply_overwrites(permissions, own.allow, own.deny);
        }

        permissions
    }

    /// Check whether a member can currently see a category or channel.
    pub fn can_view(snapshot: &GuildSnapshot, member: &Member, channel: &Channel) -> bool {
        let permissions = Self::calculate_channel_permissions(
            member,
            &channel.overwrites,
            &snapshot.roles,
            snapshot.server.owner_id,
        );
        Permissions::new(permissions).has(Permissions::VIEW_CHANNEL)
    }
}
