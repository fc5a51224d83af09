//! Reconciling the current-game role with voice channel occupancy.

use std::collections::HashSet;

use serenity::model::id::UserId;

use crate::common::{CommandResult, GuildSnapshot, MemberInfo, RoleInfo};
use crate::guild::GuildContext;

/// Role grants and revocations needed to make the role holders match the players.
#[derive(Debug, Clone)]
pub struct RoleSyncPlan<'a> {
    pub role: &'a RoleInfo,
    /// Holders of the role who are no longer in a game channel.
    pub to_remove: Vec<&'a MemberInfo>,
    /// Members in a game channel who do not hold the role yet.
    pub to_add: Vec<&'a MemberInfo>,
}

impl<'a> RoleSyncPlan<'a> {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    /// Status line for the revocations, or `None` if there are none.
    pub fn removed_message(&self) -> Option<String> {
        if self.to_remove.is_empty() {
            return None;
        }
        Some(format!(
            "Removed {} role from: {}",
            self.role.name,
            join_names(&self.to_remove)
        ))
    }

    /// Status line for the grants, or `None` if there are none.
    pub fn added_message(&self) -> Option<String> {
        if self.to_add.is_empty() {
            return None;
        }
        Some(format!(
            "Added {} role to: {}",
            self.role.name,
            join_names(&self.to_add)
        ))
    }
}

/// Diff current-game role holders against everyone in a day or night voice channel.
pub fn plan_role_sync<'a>(
    snapshot: &'a GuildSnapshot,
    ctx: &GuildContext<'a>,
) -> CommandResult<RoleSyncPlan<'a>> {
    let role = ctx.current_game_role()?;

    let previous: HashSet<UserId> = snapshot
        .members_with_role(role.id)
        .iter()
        .map(|m| m.id)
        .collect();

    let mut current: HashSet<UserId> = HashSet::new();
    for channel in ctx.day_channels()?.iter().chain(ctx.night_channels()?) {
        current.extend(snapshot.members_in(channel.id).iter().map(|m| m.id));
    }

    let to_remove = snapshot
        .members
        .iter()
        .filter(|m| previous.contains(&m.id) && !current.contains(&m.id))
        .collect();
    let to_add = snapshot
        .members
        .iter()
        .filter(|m| current.contains(&m.id) && !previous.contains(&m.id))
        .collect();

    Ok(RoleSyncPlan {
        role,
        to_remove,
        to_add,
    })
}

fn join_names(members: &[&MemberInfo]) -> String {
    members
        .iter()
        .map(|m| m.display_name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::guild::fixtures::GuildFixture;

    type F = GuildFixture;

    fn names(members: &[&MemberInfo]) -> Vec<String> {
        members.iter().map(|m| m.display_name.clone()).collect()
    }

    #[test]
    fn test_adds_players_in_day_and_night_channels() {
        let mut fixture = F::standard();
        fixture
            .member(1, "Alice", Some(F::TOWN_SQUARE))
            .member(2, "Bob", Some(F::COTTAGES[1]))
            .member(3, "Carol", Some(F::TAVERN))
            .member(4, "Dave", None);
        let layout = LayoutConfig::default();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        let plan = plan_role_sync(&fixture.snapshot, &ctx).unwrap();
        assert_eq!(names(&plan.to_add), vec!["Alice", "Bob", "Carol"]);
        assert!(plan.to_remove.is_empty());
        assert_eq!(
            plan.added_message().unwrap(),
            "Added BotC Current Game role to: Alice Bob Carol"
        );
        assert!(plan.removed_message().is_none());
    }

    #[test]
    fn test_removes_players_who_left() {
        let mut fixture = F::standard();
        fixture
            .member(1, "Alice", Some(F::TOWN_SQUARE))
            .member(2, "Bob", None)
            .with_role(1, F::CURRENT_GAME_ROLE)
            .with_role(2, F::CURRENT_GAME_ROLE);
        let layout = LayoutConfig::default();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        let plan = plan_role_sync(&fixture.snapshot, &ctx).unwrap();
        assert!(plan.to_add.is_empty());
        assert_eq!(names(&plan.to_remove), vec!["Bob"]);
        assert_eq!(
            plan.removed_message().unwrap(),
            "Removed BotC Current Game role from: Bob"
        );
    }

    #[test]
    fn test_in_sync_guild_produces_empty_plan() {
        let mut fixture = F::standard();
        fixture
            .member(1, "Alice", Some(F::TOWN_SQUARE))
            .member(2, "Bob", Some(F::COTTAGES[0]))
            .with_role(1, F::CURRENT_GAME_ROLE)
            .with_role(2, F::CURRENT_GAME_ROLE);
        let layout = LayoutConfig::default();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        let plan = plan_role_sync(&fixture.snapshot, &ctx).unwrap();
        assert!(plan.is_empty());
        assert!(plan.added_message().is_none());
        assert!(plan.removed_message().is_none());
    }

    #[test]
    fn test_other_voice_channels_do_not_count() {
        let mut fixture = F::standard();
        fixture
            .channel(700, "General", crate::common::ChannelKind::Voice, None, 5)
            .member(1, "Alice", Some(700));
        let layout = LayoutConfig::default();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        let plan = plan_role_sync(&fixture.snapshot, &ctx).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_missing_role_fails() {
        let mut fixture = F::standard();
        fixture.snapshot.roles.clear();
        let layout = LayoutConfig::default();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        assert!(plan_role_sync(&fixture.snapshot, &ctx).is_err());
    }
}
