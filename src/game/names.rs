//! Picking a member out of a roster from a typed name fragment.

use crate::common::MemberInfo;

/// Find the roster member best matching `token`, ignoring case.
///
/// Each member, in roster order, is tested against three tiers: exact display name,
/// exact first word of the display name, then first word starting with the token. The
/// first member satisfying any tier wins, so an earlier member's prefix match shadows a
/// later member's exact match.
pub fn find_closest_member<'a>(roster: &[&'a MemberInfo], token: &str) -> Option<&'a MemberInfo> {
    let token = token.to_lowercase();

    roster
        .iter()
        .find(|member| name_matches(&member.display_name, &token))
        .copied()
}

/// Tiered match for one name. `token` must already be lowercase.
fn name_matches(display_name: &str, token: &str) -> bool {
    let name = display_name.to_lowercase();
    if name == token {
        return true;
    }

    // Words are separated by single spaces; a leading space makes the first word empty.
    let first_word = name.split(' ').next().unwrap_or("");
    first_word == token || first_word.starts_with(token)
}
