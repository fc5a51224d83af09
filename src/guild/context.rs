//! Guild context resolution.
//!
//! Finds the day/night categories, Town Square, the day and night voice channels and
//! the two game roles by name. Lookups that fail are kept as absent values; the typed
//! `MissingEntity` error is only raised when a command actually needs the value.

use crate::common::{ChannelInfo, ChannelKind, CommandError, CommandResult, GuildSnapshot, RoleInfo};
use crate::config::LayoutConfig;

/// Named entities of the game layout, resolved against one snapshot.
#[derive(Debug, Clone)]
pub struct GuildContext<'a> {
    layout: &'a LayoutConfig,
    town_square: Option<&'a ChannelInfo>,
    day_channels: Option<Vec<&'a ChannelInfo>>,
    night_channels: Option<Vec<&'a ChannelInfo>>,
    storyteller_role: Option<&'a RoleInfo>,
    current_game_role: Option<&'a RoleInfo>,
}

impl<'a> GuildContext<'a> {
    /// Resolve the layout against a snapshot. Never fails.
    pub fn resolve(snapshot: &'a GuildSnapshot, layout: &'a LayoutConfig) -> Self {
        let day_category = find_channel(snapshot, ChannelKind::Category, &layout.day_category);
        let night_category = find_channel(snapshot, ChannelKind::Category, &layout.night_category);

        Self {
            layout,
            town_square: find_channel(snapshot, ChannelKind::Voice, &layout.town_square),
            day_channels: day_category.map(|c| voice_channels_in(snapshot, c)),
            night_channels: night_category.map(|c| voice_channels_in(snapshot, c)),
            storyteller_role: find_role(snapshot, &layout.storyteller_role),
            current_game_role: find_role(snapshot, &layout.current_game_role),
        }
    }

    pub fn town_square(&self) -> CommandResult<&'a ChannelInfo> {
        self.town_square
            .ok_or_else(|| CommandError::missing("voice channel", &self.layout.town_square))
    }

    /// Voice channels in the day category, in guild channel order.
    pub fn day_channels(&self) -> CommandResult<&[&'a ChannelInfo]> {
        self.day_channels
            .as_deref()
            .ok_or_else(|| CommandError::missing("category", &self.layout.day_category))
    }

    /// Voice channels in the night category, in guild channel order.
    pub fn night_channels(&self) -> CommandResult<&[&'a ChannelInfo]> {
        self.night_channels
            .as_deref()
            .ok_or_else(|| CommandError::missing("category", &self.layout.night_category))
    }

    pub fn storyteller_role(&self) -> CommandResult<&'a RoleInfo> {
        self.storyteller_role
            .ok_or_else(|| CommandError::missing("role", &self.layout.storyteller_role))
    }

    pub fn current_game_role(&self) -> CommandResult<&'a RoleInfo> {
        self.current_game_role
            .ok_or_else(|| CommandError::missing("role", &self.layout.current_game_role))
    }

    /// Every configured entity that could not be found.
    pub fn missing_entities(&self) -> Vec<CommandError> {
        [
            self.town_square().err(),
            self.day_channels().err(),
            self.night_channels().err(),
            self.storyteller_role().err(),
            self.current_game_role().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn find_channel<'a>(snapshot: &'a GuildSnapshot, kind: ChannelKind, name: &str) -> Option<&'a ChannelInfo> {
    snapshot
        .channels
        .iter()
        .find(|c| c.kind == kind && c.name == name)
}

fn find_role<'a>(snapshot: &'a GuildSnapshot, name: &str) -> Option<&'a RoleInfo> {
    snapshot.roles.iter().find(|r| r.name == name)
}

fn voice_channels_in<'a>(snapshot: &'a GuildSnapshot, category: &ChannelInfo) -> Vec<&'a ChannelInfo> {
    snapshot
        .channels
        .iter()
        .filter(|c| c.kind == ChannelKind::Voice && c.parent_id == Some(category.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guild::fixtures::GuildFixture;

    #[test]
    fn test_resolves_standard_layout() {
        let fixture = GuildFixture::standard();
        let layout = LayoutConfig::default();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        assert!(ctx.missing_entities().is_empty());
        assert_eq!(ctx.town_square().unwrap().name, "Town Square");
        assert_eq!(ctx.storyteller_role().unwrap().name, "BotC Current Storyteller");
        assert_eq!(ctx.current_game_role().unwrap().name, "BotC Current Game");

        let day: Vec<&str> = ctx.day_channels().unwrap().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(day, vec!["Town Square", "Library", "Tavern"]);

        let night: Vec<&str> = ctx.night_channels().unwrap().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(night, vec!["Cottage 1", "Cottage 2", "Cottage 3"]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let fixture = GuildFixture::standard();
        let mut layout = LayoutConfig::default();
        layout.town_square = "town square".to_string();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        let err = ctx.town_square().unwrap_err();
        assert!(matches!(err, CommandError::MissingEntity { kind: "voice channel", .. }));
    }

    #[test]
    fn test_text_channel_does_not_count_as_voice() {
        let mut fixture = GuildFixture::standard();
        fixture.text_channel(900, "Cottage 4", Some(GuildFixture::NIGHT_CATEGORY));
        let layout = LayoutConfig::default();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        assert_eq!(ctx.night_channels().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_entities_fail_only_on_use() {
        let mut fixture = GuildFixture::standard();
        fixture.snapshot.roles.clear();
        fixture
            .snapshot
            .channels
            .retain(|c| c.name != "BotC - Nighttime");
        let layout = LayoutConfig::default();
        let ctx = GuildContext::resolve(&fixture.snapshot, &layout);

        // Things that do exist still resolve.
        assert!(ctx.town_square().is_ok());
        assert!(ctx.day_channels().is_ok());
        assert_eq!(ctx.missing_entities().len(), 3);

        let err = ctx.night_channels().unwrap_err();
        assert_eq!(err.to_string(), "Missing category 'BotC - Nighttime' in this server.");
        assert!(ctx.storyteller_role().is_err());
        assert!(ctx.current_game_role().is_err());
    }
}
