//! Verb handlers and the registry `help` is generated from.

mod comms;
mod items;
mod look;
mod meta;
mod movement;
mod settings;
mod wear;

use tracing::{debug, error};

use crate::error::CommandError;
use crate::request::{Request, Target};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Nothing matched and nothing was said; the front end may try
    /// something else.
    Ignored,
    Quit,
}

pub type Handler = fn(&mut Session<'_>, &Request) -> Result<Outcome, CommandError>;

pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub syntax: &'static str,
    pub about: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish()
    }
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "look",
        aliases: &["l"],
        syntax: "look [[at] <item>|<player>|<mob>|<room>|<exit>]",
        about: "Examine something more closely. \"look at me\" looks at yourself, \"look around\" at the room.",
        handler: look::look,
    },
    CommandSpec {
        name: "info",
        aliases: &[],
        syntax: "info [<item>|<player>|<mob>|<room>|<exit>]",
        about: "Show details about something, or about yourself.",
        handler: look::info,
    },
    CommandSpec {
        name: "get",
        aliases: &["pick"],
        syntax: "get [<n>] <item>|all",
        about: "Pick something up from the room.",
        handler: items::get,
    },
    CommandSpec {
        name: "drop",
        aliases: &[],
        syntax: "drop [<n>] <item>|all",
        about: "Drop something from your inventory.",
        handler: items::drop,
    },
    CommandSpec {
        name: "put",
        aliases: &[],
        syntax: "put <item>|all in <container>",
        about: "Put something inside a container.",
        handler: items::put,
    },
    CommandSpec {
        name: "take",
        aliases: &[],
        syntax: "take [<n>] <item>|all [from <container>]",
        about: "Take something out of a container. Without a container, same as get.",
        handler: items::take,
    },
    CommandSpec {
        name: "use",
        aliases: &[],
        syntax: "use <item> [on <object>]",
        about: "Use an item, on something else if given.",
        handler: items::use_item,
    },
    CommandSpec {
        name: "inventory",
        aliases: &["inv", "i"],
        syntax: "inventory",
        about: "List what you are holding. Worn items are marked with *.",
        handler: look::inventory,
    },
    CommandSpec {
        name: "wear",
        aliases: &[],
        syntax: "wear <item>",
        about: "Put on something wearable from your inventory.",
        handler: wear::wear,
    },
    CommandSpec {
        name: "remove",
        aliases: &[],
        syntax: "remove <item> OR remove <item> from <container>",
        about: "Take off something you are wearing, or take something out of a container.",
        handler: wear::remove,
    },
    CommandSpec {
        name: "go",
        aliases: &["enter"],
        syntax: "go [to] [<exit>|<room>]",
        about: "Go through an exit or to a neighbouring room. With only one way out, no name is needed.",
        handler: movement::go,
    },
    CommandSpec {
        name: "exits",
        aliases: &[],
        syntax: "exits",
        about: "List the visible ways out of this room.",
        handler: look::exits,
    },
    CommandSpec {
        name: "lock",
        aliases: &[],
        syntax: "lock <door> [with <key>]",
        about: "Lock a door. Without a key named, every key you hold is tried.",
        handler: movement::lock,
    },
    CommandSpec {
        name: "unlock",
        aliases: &[],
        syntax: "unlock <door> [with <key>]",
        about: "Unlock a door. Without a key named, every key you hold is tried.",
        handler: movement::unlock,
    },
    CommandSpec {
        name: "follow",
        aliases: &[],
        syntax: "follow [<player>|<mob>|none]",
        about: "Follow someone from room to room. \"follow none\" stops.",
        handler: movement::follow,
    },
    CommandSpec {
        name: "say",
        aliases: &["\""],
        syntax: "say <text>",
        about: "Say something to everyone in the room.",
        handler: comms::say,
    },
    CommandSpec {
        name: "shout",
        aliases: &["yell"],
        syntax: "shout <text>",
        about: "Shout to the room and to the rooms around it.",
        handler: comms::shout,
    },
    CommandSpec {
        name: "emote",
        aliases: &[":", "pose"],
        syntax: "emote <text>",
        about: "Strike a pose. \"emote grins\" shows as \"lee grins\".",
        handler: comms::emote,
    },
    CommandSpec {
        name: "think",
        aliases: &[],
        syntax: "think <text>",
        about: "Show a thought bubble to the room.",
        handler: comms::think,
    },
    CommandSpec {
        name: "listen",
        aliases: &[],
        syntax: "listen [to] <object>",
        about: "Put your ear to something.",
        handler: comms::listen,
    },
    CommandSpec {
        name: "set",
        aliases: &[],
        syntax: "set [<var> [= <value>]]",
        about: "Set a preference to a value, or to true. With no variable, list your settings.",
        handler: settings::set,
    },
    CommandSpec {
        name: "unset",
        aliases: &[],
        syntax: "unset <var>",
        about: "Remove a preference. If it was never set, it is set to false.",
        handler: settings::unset,
    },
    CommandSpec {
        name: "recap",
        aliases: &[],
        syntax: "recap <name>",
        about: "Choose how your name is capitalised. It still has to be your name.",
        handler: settings::recap,
    },
    CommandSpec {
        name: "who",
        aliases: &[],
        syntax: "who",
        about: "List the players connected now.",
        handler: meta::who,
    },
    CommandSpec {
        name: "stats",
        aliases: &["score"],
        syntax: "stats",
        about: "Show the values of all your character statistics.",
        handler: meta::stats,
    },
    CommandSpec {
        name: "map",
        aliases: &[],
        syntax: "map",
        about: "Show the map of this world.",
        handler: meta::map,
    },
    CommandSpec {
        name: "help",
        aliases: &["?"],
        syntax: "help [<command>]",
        about: "List commands, or explain one.",
        handler: meta::help,
    },
    CommandSpec {
        name: "time",
        aliases: &[],
        syntax: "time",
        about: "Show the server's clock.",
        handler: meta::time,
    },
    CommandSpec {
        name: "quit",
        aliases: &[],
        syntax: "quit",
        about: "Leave the game.",
        handler: meta::quit,
    },
    CommandSpec {
        name: "cls",
        aliases: &[],
        syntax: "cls",
        about: "Clear your screen.",
        handler: meta::cls,
    },
    CommandSpec {
        name: "xyzzy",
        aliases: &[],
        syntax: "xyzzy",
        about: "Try it and see.",
        handler: meta::xyzzy,
    },
];

pub fn find(verb: &str) -> Option<&'static CommandSpec> {
    let v = verb.trim().to_ascii_lowercase();
    COMMANDS
        .iter()
        .find(|c| c.name == v || c.aliases.contains(&v.as_str()))
}

/// Runs one command to completion. Rejections are shown to the actor and
/// leave the world untouched; internal faults are logged and the actor
/// only hears that something went wrong.
pub fn dispatch(s: &mut Session<'_>, verb: &str, req: &Request) -> Outcome {
    let Some(cmd) = find(verb) else {
        debug!(actor = %s.actor, verb, "unknown verb");
        return Outcome::Ignored;
    };
    debug!(actor = %s.actor, verb = cmd.name, implied = req.implied, "dispatch");
    match (cmd.handler)(s, req) {
        Ok(outcome) => outcome,
        Err(e @ CommandError::Internal(_)) => {
            error!(actor = %s.actor, verb = cmd.name, err = %e, "command failed");
            s.message(e.user_message());
            Outcome::Done
        }
        Err(e) => {
            debug!(actor = %s.actor, verb = cmd.name, kind = e.as_str(), "command rejected");
            s.message(e.user_message());
            Outcome::Done
        }
    }
}

fn required(target: Option<Target>, usage: &str) -> Result<Target, CommandError> {
    target.ok_or_else(|| CommandError::missing(usage))
}

fn required_text<'r>(req: &'r Request, usage: &str) -> Result<&'r str, CommandError> {
    req.message
        .as_deref()
        .ok_or_else(|| CommandError::missing(usage))
}

fn not_here() -> CommandError {
    CommandError::not_found("You do not see that here.")
}
