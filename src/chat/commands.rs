//! Quick-action command catalog
//!
//! Commands are opaque text to the widget: the backend interprets them. The
//! catalog only lists the predefined shortcuts offered to the user so they can
//! be routed through `send_command` instead of `send_message`.

/// Leading character marking a directive-style command
pub const COMMAND_SENTINEL: char = '!';

/// A predefined command shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    /// Button label
    pub label: &'static str,
    /// Text forwarded to the host
    pub command: &'static str,
}

/// A titled group of quick actions
#[derive(Debug, Clone, Copy)]
pub struct QuickActionGroup {
    /// Section heading
    pub title: &'static str,
    /// Actions in display order
    pub actions: &'static [QuickAction],
}

const fn action(command: &'static str) -> QuickAction {
    QuickAction {
        label: command,
        command,
    }
}

const fn labelled(label: &'static str, command: &'static str) -> QuickAction {
    QuickAction { label, command }
}

/// All quick-action sections, in display order
pub const QUICK_ACTIONS: &[QuickActionGroup] = &[
    QuickActionGroup {
        title: "Message Mastery",
        actions: &[
            action("!scripts"),
            action("!trust"),
            action("!tonality"),
            action("!firstimpression"),
        ],
    },
    QuickActionGroup {
        title: "Closer Moves",
        actions: &[action("!pvf")],
    },
    QuickActionGroup {
        title: "Objection Handling",
        actions: &[
            action("!objection price"),
            action("!objection paymenttoohigh"),
            action("!objection tradevalue"),
            action("!objection thinkaboutit"),
            action("!objection shoparound"),
            action("!objection spouse"),
        ],
    },
    QuickActionGroup {
        title: "Role-Play Scenarios",
        actions: &[
            action("!roleplay price"),
            action("!roleplay trade"),
            action("!roleplay think"),
            action("!roleplay shop"),
            action("!roleplay spouse"),
        ],
    },
    QuickActionGroup {
        title: "Money Momentum",
        actions: &[action("!dailylog"), action("!earn")],
    },
    QuickActionGroup {
        title: "Five Emotional Checkpoints",
        actions: &[action("!checkpoints")],
    },
    QuickActionGroup {
        title: "Coaching Resources",
        actions: &[
            action("!coaching"),
            action("!coaching-tips"),
            action("!coaching-roleplay"),
        ],
    },
    QuickActionGroup {
        title: "Help & Commands",
        actions: &[labelled("!help / !commands", "!help")],
    },
    QuickActionGroup {
        title: "Quick Actions",
        actions: &[
            labelled("Continue", "continue"),
            labelled("Restart", "restart"),
            labelled("End", "end"),
        ],
    },
];

/// True when `text` starts with the command sentinel
pub fn is_directive(text: &str) -> bool {
    text.starts_with(COMMAND_SENTINEL)
}

/// Look up a catalog entry by its command text or label
///
/// Matching ignores surrounding whitespace and ASCII case.
pub fn find_quick_action(text: &str) -> Option<&'static QuickAction> {
    let needle = text.trim();
    if needle.is_empty() {
        return None;
    }
    QUICK_ACTIONS
        .iter()
        .flat_map(|group| group.actions.iter())
        .find(|a| a.command.eq_ignore_ascii_case(needle) || a.label.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directive() {
        assert!(is_directive("!pvf"));
        assert!(!is_directive("pvf"));
        assert!(!is_directive(" !pvf"));
    }

    #[test]
    fn test_find_quick_action_by_command() {
        let found = find_quick_action("  !Objection Price ").unwrap();
        assert_eq!(found.command, "!objection price");
    }

    #[test]
    fn test_find_quick_action_by_label() {
        assert_eq!(find_quick_action("Restart").unwrap().command, "restart");
        assert_eq!(find_quick_action("!help / !commands").unwrap().command, "!help");
        assert!(find_quick_action("how do I close?").is_none());
        assert!(find_quick_action("   ").is_none());
    }

    #[test]
    fn test_catalog_commands_are_unique() {
        let mut commands: Vec<&str> = QUICK_ACTIONS
            .iter()
            .flat_map(|g| g.actions.iter().map(|a| a.command))
            .collect();
        let total = commands.len();
        commands.sort_unstable();
        commands.dedup();
        assert_eq!(commands.len(), total);
    }
}
