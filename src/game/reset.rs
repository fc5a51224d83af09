//! Gathering players back into Town Square.

use crate::common::{CommandResult, GuildSnapshot, MemberInfo};
use crate::guild::GuildContext;

/// Everyone in a night channel, channel by channel.
pub fn night_occupants<'a>(
    snapshot: &'a GuildSnapshot,
    ctx: &GuildContext<'a>,
) -> CommandResult<Vec<&'a MemberInfo>> {
    Ok(ctx
        .night_channels()?
        .iter()
        .flat_map(|channel| snapshot.members_in(channel.id))
        .collect())
}

/// Everyone in a day channel other than Town Square, channel by channel.
pub fn outlying_day_occupants<'a>(
    snapshot: &'a GuildSnapshot,
    ctx: &GuildContext<'a>,
) -> CommandResult<Vec<&'a MemberInfo>> {
    let town_square = ctx.town_square()?;

    Ok(ctx
        .day_channels()?
        .iter()
        .filter(|channel| channel.id != town_square.id)
        .flat_map(|channel| snapshot.members_in(channel.id))
        .collect())
}
