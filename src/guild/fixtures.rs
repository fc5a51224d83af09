//! Test guild snapshots.

use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};

use crate::common::{ChannelInfo, ChannelKind, GuildSnapshot, MemberInfo, RoleInfo};

/// Builder for a guild laid out the way the bot expects.
pub struct GuildFixture {
    pub snapshot: GuildSnapshot,
}

impl GuildFixture {
    pub const DAY_CATEGORY: u64 = 100;
    pub const TOWN_SQUARE: u64 = 101;
    pub const LIBRARY: u64 = 102;
    pub const TAVERN: u64 = 103;
    pub const NIGHT_CATEGORY: u64 = 200;
    pub const COTTAGES: [u64; 3] = [201, 202, 203];
    pub const CONTROL_CHANNEL: u64 = 300;
    pub const STORYTELLER_ROLE: u64 = 500;
    pub const CURRENT_GAME_ROLE: u64 = 501;

    /// Day category with Town Square, Library and Tavern, night category with three
    /// cottages, the control channel and both game roles. No members.
    pub fn standard() -> Self {
        let mut fixture = Self {
            snapshot: GuildSnapshot {
                guild_id: GuildId::new(1),
                channels: Vec::new(),
                roles: vec![
                    RoleInfo {
                        id: RoleId::new(Self::STORYTELLER_ROLE),
                        name: "BotC Current Storyteller".to_string(),
                    },
                    RoleInfo {
                        id: RoleId::new(Self::CURRENT_GAME_ROLE),
                        name: "BotC Current Game".to_string(),
                    },
                ],
                members: Vec::new(),
            },
        };

        fixture
            .channel(Self::DAY_CATEGORY, "BotC - Daytime", ChannelKind::Category, None, 0)
            .channel(Self::NIGHT_CATEGORY, "BotC - Nighttime", ChannelKind::Category, None, 1)
            .channel(Self::TOWN_SQUARE, "Town Square", ChannelKind::Voice, Some(Self::DAY_CATEGORY), 0)
            .channel(Self::LIBRARY, "Library", ChannelKind::Voice, Some(Self::DAY_CATEGORY), 1)
            .channel(Self::TAVERN, "Tavern", ChannelKind::Voice, Some(Self::DAY_CATEGORY), 2)
            .channel(Self::CONTROL_CHANNEL, "botc_mover", ChannelKind::Text, None, 0);
        for (i, id) in Self::COTTAGES.iter().enumerate() {
            fixture.channel(
                *id,
                &format!("Cottage {}", i + 1),
                ChannelKind::Voice,
                Some(Self::NIGHT_CATEGORY),
                i as u16,
            );
        }
        fixture
    }

    /// Add a channel, keeping the snapshot in (position, id) order.
    pub fn channel(
        &mut self,
        id: u64,
        name: &str,
        kind: ChannelKind,
        parent: Option<u64>,
        position: u16,
    ) -> &mut Self {
        self.snapshot.channels.push(ChannelInfo {
            id: ChannelId::new(id),
            name: name.to_string(),
            kind,
            parent_id: parent.map(ChannelId::new),
            position,
        });
        self.snapshot.channels.sort_by_key(|c| (c.position, c.id));
        self
    }

    pub fn text_channel(&mut self, id: u64, name: &str, parent: Option<u64>) -> &mut Self {
        self.channel(id, name, ChannelKind::Text, parent, 10)
    }

    /// Add a member. The username is the display name lowercased without spaces.
    pub fn member(&mut self, id: u64, display_name: &str, voice: Option<u64>) -> &mut Self {
        self.snapshot.members.push(MemberInfo {
            id: UserId::new(id),
            username: display_name.to_lowercase().replace(' ', ""),
            display_name: display_name.to_string(),
            roles: Vec::new(),
            voice_channel: voice.map(ChannelId::new),
        });
        self.snapshot.members.sort_by_key(|m| m.id);
        self
    }

    pub fn with_role(&mut self, member: u64, role: u64) -> &mut Self {
        if let Some(m) = self.snapshot.members.iter_mut().find(|m| m.id.get() == member) {
            m.roles.push(RoleId::new(role));
        }
        self
    }
}
