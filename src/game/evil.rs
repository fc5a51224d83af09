//! Evil team information for `!evil` and `!lunatic`.
//!
//! Command text is split with shell quoting so multi-word names can be quoted, e.g.
//! `!evil "Mary Jane" pete "Ann Marie"`.

use crate::common::{CommandError, CommandResult, MemberInfo};
use crate::game::names::find_closest_member;

/// Name fragments given to an evil-info command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvilArgs {
    pub demon: String,
    pub minions: Vec<String>,
}

impl EvilArgs {
    /// Parse the full message text. The first word is the command itself.
    pub fn parse(content: &str) -> CommandResult<Self> {
        let mut words = shlex::split(&escape_comment_chars(content))
            .ok_or(CommandError::UnbalancedQuotes)?
            .into_iter()
            .skip(1);

        let demon = words.next().ok_or_else(|| CommandError::Usage {
            message: "Missing the demon's name.".to_string(),
        })?;

        Ok(Self {
            demon,
            minions: words.collect(),
        })
    }
}

/// Backslash-escape every unquoted `#` so the splitter keeps it as a literal
/// character instead of starting a comment.
fn escape_comment_chars(content: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum Quote {
        None,
        Single,
        Double,
    }

    let mut escaped = String::with_capacity(content.len());
    let mut quote = Quote::None;
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Quote::None, '#') => escaped.push('\\'),
            (Quote::None, '\'') => quote = Quote::Single,
            (Quote::None, '"') => quote = Quote::Double,
            (Quote::Single, '\'') | (Quote::Double, '"') => quote = Quote::None,
            (Quote::None | Quote::Double, '\\') => {
                escaped.push(c);
                if let Some(next) = chars.next() {
                    escaped.push(next);
                }
                continue;
            }
            _ => {}
        }
        escaped.push(c);
    }
    escaped
}

/// Demon and minions resolved to members.
#[derive(Debug, Clone)]
pub struct EvilTeam<'a> {
    pub demon: &'a MemberInfo,
    /// In argument order.
    pub minions: Vec<&'a MemberInfo>,
}

impl<'a> EvilTeam<'a> {
    /// Resolve every name against the roster. Fails on the first name that matches
    /// nobody, demon first, then minions in order.
    pub fn resolve(roster: &[&'a MemberInfo], args: &EvilArgs) -> CommandResult<Self> {
        let lookup = |token: &str| {
            find_closest_member(roster, token).ok_or_else(|| CommandError::UnknownUser {
                token: token.to_string(),
            })
        };

        let demon = lookup(args.demon.as_str())?;
        let minions = args
            .minions
            .iter()
            .map(|token| lookup(token.as_str()))
            .collect::<CommandResult<Vec<_>>>()?;

        Ok(Self { demon, minions })
    }

    /// Direct message for the demon (or the lunatic who believes they are one).
    pub fn demon_message(&self) -> String {
        format!(
            "{}: You are the **demon**. Your minions are: {}",
            self.demon.display_name,
            self.minion_names().join(", ")
        )
    }

    /// Direct message for each minion, in minion order.
    pub fn minion_messages(&self) -> Vec<(&'a MemberInfo, String)> {
        self.minions
            .iter()
            .map(|minion| {
                let mut others = self.minion_names();
                if let Some(pos) = others.iter().position(|n| *n == minion.display_name) {
                    others.remove(pos);
                }
                let message = format!(
                    "{}: You are a **minion**. Your demon is: {}. Your fellow minions are: {}.",
                    minion.display_name,
                    self.demon.display_name,
                    others.join(", ")
                );
                (*minion, message)
            })
            .collect()
    }

    fn minion_names(&self) -> Vec<&'a str> {
        self.minions.iter().map(|m| m.display_name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::id::UserId;

    fn members(names: &[&str]) -> Vec<MemberInfo> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| MemberInfo {
                id: UserId::new(i as u64 + 1),
                username: name.to_lowercase(),
                display_name: name.to_string(),
                roles: Vec::new(),
                voice_channel: None,
            })
            .collect()
    }

    #[test]
    fn test_parse_plain_words() {
        let args = EvilArgs::parse("!evil alice bob carol").unwrap();
        assert_eq!(args.demon, "alice");
        assert_eq!(args.minions, vec!["bob", "carol"]);
    }

    #[test]
    fn test_parse_quoted_names() {
        let args = EvilArgs::parse(r#"!evil "Mary Jane" 'Peter Parker' ned"#).unwrap();
        assert_eq!(args.demon, "Mary Jane");
        assert_eq!(args.minions, vec!["Peter Parker", "ned"]);
    }

    #[test]
    fn test_parse_names_starting_with_hash() {
        let args = EvilArgs::parse("!evil alice #2fast bob").unwrap();
        assert_eq!(args.demon, "alice");
        assert_eq!(args.minions, vec!["#2fast", "bob"]);

        let args = EvilArgs::parse("!evil #1 \"#2 two\" '#3' b\\#4").unwrap();
        assert_eq!(args.demon, "#1");
        assert_eq!(args.minions, vec!["#2 two", "#3", "b#4"]);
    }

    #[test]
    fn test_parse_unbalanced_quotes_after_hash() {
        let err = EvilArgs::parse("!evil alice #bob \"carol").unwrap_err();
        assert!(matches!(err, CommandError::UnbalancedQuotes));
    }

    #[test]
    fn test_parse_demon_only() {
        let args = EvilArgs::parse("!lunatic alice").unwrap();
        assert_eq!(args.demon, "alice");
        assert!(args.minions.is_empty());
    }

    #[test]
    fn test_parse_missing_demon() {
        let err = EvilArgs::parse("!evil").unwrap_err();
        assert!(matches!(err, CommandError::Usage { .. }));
    }

    #[test]
    fn test_parse_unbalanced_quotes() {
        let err = EvilArgs::parse(r#"!evil "Mary Jane bob"#).unwrap_err();
        assert!(matches!(err, CommandError::UnbalancedQuotes));
    }

    #[test]
    fn test_resolve_team() {
        let roster = members(&["Alice", "Bob Smith", "Carol", "Dave"]);
        let refs: Vec<&MemberInfo> = roster.iter().collect();
        let args = EvilArgs::parse("!evil al bob car").unwrap();

        let team = EvilTeam::resolve(&refs, &args).unwrap();
        assert_eq!(team.demon.display_name, "Alice");
        let minions: Vec<&str> = team.minions.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(minions, vec!["Bob Smith", "Carol"]);
    }

    #[test]
    fn test_resolve_reports_first_unknown_token() {
        let roster = members(&["Alice", "Bob"]);
        let refs: Vec<&MemberInfo> = roster.iter().collect();

        let args = EvilArgs::parse("!evil zed bob yan").unwrap();
        let err = EvilTeam::resolve(&refs, &args).unwrap_err();
        assert_eq!(err.to_string(), "Unknown user 'zed'.");

        let args = EvilArgs::parse("!evil alice bob yan xi").unwrap();
        let err = EvilTeam::resolve(&refs, &args).unwrap_err();
        assert_eq!(err.to_string(), "Unknown user 'yan'.");
    }

    #[test]
    fn test_messages() {
        let roster = members(&["Alice", "Bob", "Carol", "Dave"]);
        let refs: Vec<&MemberInfo> = roster.iter().collect();
        let args = EvilArgs::parse("!evil alice bob carol dave").unwrap();
        let team = EvilTeam::resolve(&refs, &args).unwrap();

        assert_eq!(
            team.demon_message(),
            "Alice: You are the **demon**. Your minions are: Bob, Carol, Dave"
        );

        let messages = team.minion_messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].0.display_name, "Bob");
        assert_eq!(
            messages[0].1,
            "Bob: You are a **minion**. Your demon is: Alice. Your fellow minions are: Carol, Dave."
        );
        assert_eq!(
            messages[2].1,
            "Dave: You are a **minion**. Your demon is: Alice. Your fellow minions are: Bob, Carol."
        );
    }

    #[test]
    fn test_single_minion_has_no_fellows() {
        let roster = members(&["Alice", "Bob"]);
        let refs: Vec<&MemberInfo> = roster.iter().collect();
        let args = EvilArgs::parse("!evil alice bob").unwrap();
        let team = EvilTeam::resolve(&refs, &args).unwrap();

        let messages = team.minion_messages();
        assert_eq!(
            messages[0].1,
            "Bob: You are a **minion**. Your demon is: Alice. Your fellow minions are: ."
        );
    }

    #[test]
    fn test_same_minion_twice_drops_one_entry() {
        let roster = members(&["Alice", "Bob"]);
        let refs: Vec<&MemberInfo> = roster.iter().collect();
        let args = EvilArgs::parse("!evil alice bob bob").unwrap();
        let team = EvilTeam::resolve(&refs, &args).unwrap();

        let messages = team.minion_messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].1.ends_with("Your fellow minions are: Bob."));
    }
}
