//! Moderator-only registry edits: `!addcom` and `!delcom`.

use super::grammar;
use super::registry::{CommandRegistry, Upsert};
use super::CommandContext;
use slirc_chat::Tags;
use tracing::{debug, info};

/// Badge names that grant access to registry edits.
const ADMIN_BADGES: [&str; 2] = ["broadcaster", "moderator"];

/// True if any badge mentions `broadcaster` or `moderator`.
///
/// Badges look like `moderator/1`, so matching is by substring. A scalar
/// `badges` value counts as a single badge.
pub fn is_admin(tags: &Tags) -> bool {
    tags.values("badges")
        .any(|badge| ADMIN_BADGES.iter().any(|name| badge.contains(name)))
}

/// `!<word> <keyword> <free-text>`: bind `keyword` to a text command.
pub(super) fn add_command(registry: &mut CommandRegistry, ctx: &CommandContext<'_>) -> Vec<String> {
    if !is_admin(ctx.tags) {
        debug!(user = ctx.user, "Ignoring add from non-moderator");
        return Vec::new();
    }
    let Some((keyword, text)) = grammar::parse_add(ctx.text) else {
        return Vec::new();
    };

    let reply = match registry.upsert_text(keyword, text) {
        Upsert::Added => {
            info!(keyword, user = ctx.user, "Added command");
            format!("Added command \"{keyword}\"")
        }
        Upsert::Replaced => {
            info!(keyword, user = ctx.user, "Replaced command");
            format!("Replaced command \"{keyword}\"")
        }
        Upsert::NotText => {
            format!("Cannot replace command \"{keyword}\"; This is not a text command!")
        }
    };
    vec![reply]
}

/// `!<word> <keyword>`: remove the text command bound to `keyword`.
pub(super) fn delete_command(
    registry: &mut CommandRegistry,
    ctx: &CommandContext<'_>,
) -> Vec<String> {
    if !is_admin(ctx.tags) {
        debug!(user = ctx.user, "Ignoring delete from non-moderator");
        return Vec::new();
    }
    let Some(keyword) = grammar::parse_delete(ctx.text) else {
        return Vec::new();
    };

    let reply = match registry.get(keyword).map(|command| command.is_text()) {
        None => format!("Command \"{keyword}\" does not exist."),
        Some(false) => {
            format!("Cannot delete command \"{keyword}\"; This is not a text command!")
        }
        Some(true) => {
            registry.remove(keyword);
            info!(keyword, user = ctx.user, "Deleted command");
            format!("Deleted command \"{keyword}\"")
        }
    };
    vec![reply]
}

#[cfg(test)]
mod tests {
    use super::super::{Command, CommandKind, DEFAULT_COOLDOWN};
    use super::*;
    use std::time::{Duration, Instant};

    fn moderator() -> Tags {
        Tags::parse("badges=moderator/1,subscriber/12;color=#FF0000")
    }

    fn run(registry: &mut CommandRegistry, text: &str, tags: &Tags) -> Vec<String> {
        let keyword = grammar::invocation_keyword(text).unwrap();
        let ctx = CommandContext {
            user: "mod",
            text,
            tags,
        };
        registry.execute(keyword, &ctx, Instant::now())
    }

    #[test]
    fn test_is_admin() {
        assert!(is_admin(&moderator()));
        assert!(is_admin(&Tags::parse("badges=broadcaster/1")));
        assert!(!is_admin(&Tags::parse("badges=subscriber/12,premium/1")));
        assert!(!is_admin(&Tags::parse("color=#FF0000")));
        assert!(!is_admin(&Tags::default()));
    }

    #[test]
    fn test_add_new_command() {
        let mut registry = CommandRegistry::with_builtins(DEFAULT_COOLDOWN);
        let replies = run(&mut registry, "!addcom discord Join us!", &moderator());

        assert_eq!(replies, vec!["Added command \"discord\""]);
        let command = registry.get("discord").unwrap();
        assert_eq!(command.response(), Some("Join us!"));
        assert_eq!(command.cooldown().duration(), DEFAULT_COOLDOWN);
        assert_eq!(command.cooldown().last_fired(), None);
    }

    #[test]
    fn test_add_uses_registry_default_cooldown() {
        let mut registry = CommandRegistry::with_builtins(Duration::from_secs(5));
        run(&mut registry, "!addcom hi Hello!", &moderator());
        assert_eq!(
            registry.get("hi").unwrap().cooldown().duration(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_add_replaces_text_command_and_resets_cooldown() {
        let mut registry = CommandRegistry::with_builtins(DEFAULT_COOLDOWN);
        registry.insert("hi", Command::text("Hello!", Duration::from_secs(60)));
        let tags = Tags::default();
        let ctx = CommandContext {
            user: "viewer",
            text: "!hi",
            tags: &tags,
        };
        registry.execute("hi", &ctx, Instant::now());
        assert!(registry.get("hi").unwrap().cooldown().last_fired().is_some());

        let replies = run(&mut registry, "!addcom hi Howdy!", &moderator());
        assert_eq!(replies, vec!["Replaced command \"hi\""]);
        let command = registry.get("hi").unwrap();
        assert_eq!(command.response(), Some("Howdy!"));
        assert_eq!(command.cooldown().last_fired(), None);
        assert_eq!(command.cooldown().duration(), DEFAULT_COOLDOWN);
    }

    #[test]
    fn test_add_refuses_builtin() {
        let mut registry = CommandRegistry::with_builtins(DEFAULT_COOLDOWN);
        let replies = run(&mut registry, "!addcom delcom nope", &moderator());

        assert_eq!(
            replies,
            vec!["Cannot replace command \"delcom\"; This is not a text command!"]
        );
        assert_eq!(registry.get("delcom").map(Command::kind), Some(&CommandKind::Delete));
    }

    #[test]
    fn test_add_ignores_non_admin_and_bad_grammar() {
        let mut registry = CommandRegistry::with_builtins(DEFAULT_COOLDOWN);
        let viewer = Tags::parse("badges=subscriber/12");

        assert!(run(&mut registry, "!addcom foo bar", &viewer).is_empty());
        assert!(run(&mut registry, "!addcom foo", &moderator()).is_empty());
        assert!(run(&mut registry, "!addcom f-o bar", &moderator()).is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_add_is_not_cooldown_gated() {
        let mut registry = CommandRegistry::with_builtins(DEFAULT_COOLDOWN);
        assert_eq!(run(&mut registry, "!addcom a A", &moderator()).len(), 1);
        assert_eq!(run(&mut registry, "!addcom b B", &moderator()).len(), 1);
        assert!(registry.contains("a"));
        assert!(registry.contains("b"));
    }

    #[test]
    fn test_delete_text_command() {
        let mut registry = CommandRegistry::with_builtins(DEFAULT_COOLDOWN);
        registry.insert("discord", Command::text("Join us!", DEFAULT_COOLDOWN));

        let replies = run(&mut registry, "!delcom discord", &moderator());
        assert_eq!(replies, vec!["Deleted command \"discord\""]);
        assert!(!registry.contains("discord"));
    }

    #[test]
    fn test_delete_missing_and_builtin() {
        let mut registry = CommandRegistry::with_builtins(DEFAULT_COOLDOWN);

        assert_eq!(
            run(&mut registry, "!delcom ghost", &moderator()),
            vec!["Command \"ghost\" does not exist."]
        );
        assert_eq!(
            run(&mut registry, "!delcom addcom", &moderator()),
            vec!["Cannot delete command \"addcom\"; This is not a text command!"]
        );
        assert!(registry.contains("addcom"));
    }

    #[test]
    fn test_delete_ignores_non_admin() {
        let mut registry = CommandRegistry::with_builtins(DEFAULT_COOLDOWN);
        registry.insert("discord", Command::text("Join us!", DEFAULT_COOLDOWN));

        assert!(run(&mut registry, "!delcom discord", &Tags::default()).is_empty());
        assert!(registry.contains("discord"));
    }
}
