//! Seating Town Square players into night cottages.

use tracing::warn;

use crate::common::{ChannelInfo, MemberInfo};

/// One player and the cottage they are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat<'a> {
    pub member: &'a MemberInfo,
    pub cottage: &'a ChannelInfo,
}

/// Pair Town Square members with cottages and order the resulting moves.
///
/// Cottages are taken in channel position order and paired with the roster
/// positionally; pairing stops at the shorter of the two lists. The returned seats are
/// sorted by username, which is the order the moves are issued in.
pub fn assign_cottages<'a>(roster: &[&'a MemberInfo], cottages: &[&'a ChannelInfo]) -> Vec<Seat<'a>> {
    let mut cottages = cottages.to_vec();
    cottages.sort_by_key(|c| c.position);

    if roster.len() != cottages.len() {
        warn!(
            "Seating {} players into {} cottages; {} left over",
            roster.len(),
            cottages.len(),
            if roster.len() > cottages.len() { "players" } else { "cottages" }
        );
    }

    let mut seats: Vec<Seat<'a>> = roster
        .iter()
        .zip(cottages)
        .map(|(member, cottage)| Seat { member: *member, cottage })
        .collect();
    seats.sort_by(|a, b| a.member.username.cmp(&b.member.username));
    seats
}
