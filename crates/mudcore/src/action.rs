//! Room-local events and how each observer sees them.

use crate::entity::Tzid;
use crate::session::Sink;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SayVerb {
    Say,
    Ask,
    Exclaim,
}

impl SayVerb {
    /// Picked from the trailing punctuation of what was said.
    pub fn for_words(words: &str) -> Self {
        let w = words.trim_end();
        if w.ends_with('?') {
            SayVerb::Ask
        } else if w.ends_with('!') {
            SayVerb::Exclaim
        } else {
            SayVerb::Say
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SayVerb::Say => "say",
            SayVerb::Ask => "ask",
            SayVerb::Exclaim => "exclaim",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Look { actor: Tzid, actee: Tzid },
    Get { actor: Tzid, item: Tzid },
    Drop { actor: Tzid, item: Tzid },
    Put { actor: Tzid, item: Tzid, container: Tzid },
    Take { actor: Tzid, item: Tzid, container: Tzid },
    Use { actor: Tzid, item: Tzid, target: Option<Tzid>, detail: Option<String> },
    Wear { actor: Tzid, item: Tzid },
    Remove { actor: Tzid, item: Tzid },
    Say { actor: Tzid, verb: SayVerb, raw: String },
    Shout { actor: Tzid, raw: String, spread: u32 },
    Emote { actor: Tzid, raw: String },
    Think { actor: Tzid, raw: String },
    Listen { actor: Tzid, obj: Tzid },
    Lock { actor: Tzid, door: Tzid, key: Tzid },
    Unlock { actor: Tzid, door: Tzid, key: Tzid },
    /// `key` is `None` when every held key was tried.
    LockFail { actor: Tzid, door: Tzid, key: Option<Tzid> },
    Follow { actor: Tzid, following: Tzid },
    Leave { actor: Tzid, exit: Tzid },
    Arrive { actor: Tzid, leader: Option<Tzid> },
}

impl Action {
    pub fn act(&self) -> &'static str {
        match self {
            Action::Look { .. } => "look",
            Action::Get { .. } => "get",
            Action::Drop { .. } => "drop",
            Action::Put { .. } => "put",
            Action::Take { .. } => "take",
            Action::Use { .. } => "use",
            Action::Wear { .. } => "wear",
            Action::Remove { .. } => "remove",
            Action::Say { .. } => "say",
            Action::Shout { .. } => "shout",
            Action::Emote { .. } => "emote",
            Action::Think { .. } => "think",
            Action::Listen { .. } => "listen",
            Action::Lock { .. } => "lock",
            Action::Unlock { .. } => "unlock",
            Action::LockFail { .. } => "lockfail",
            Action::Follow { .. } => "follow",
            Action::Leave { .. } => "leave",
            Action::Arrive { .. } => "arrive",
        }
    }

    pub fn actor(&self) -> Tzid {
        match self {
            Action::Look { actor, .. }
            | Action::Get { actor, .. }
            | Action::Drop { actor, .. }
            | Action::Put { actor, .. }
            | Action::Take { actor, .. }
            | Action::Use { actor, .. }
            | Action::Wear { actor, .. }
            | Action::Remove { actor, .. }
            | Action::Say { actor, .. }
            | Action::Shout { actor, .. }
            | Action::Emote { actor, .. }
            | Action::Think { actor, .. }
            | Action::Listen { actor, .. }
            | Action::Lock { actor, .. }
            | Action::Unlock { actor, .. }
            | Action::LockFail { actor, .. }
            | Action::Follow { actor, .. }
            | Action::Leave { actor, .. }
            | Action::Arrive { actor, .. } => *actor,
        }
    }

    /// Entities an observer has to perceive to be told about this.
    pub fn subjects(&self) -> Vec<Tzid> {
        let actor = self.actor();
        match self {
            Action::Look { actee, .. } => vec![actor, *actee],
            Action::Get { item, .. }
            | Action::Drop { item, .. }
            | Action::Put { item, .. }
            | Action::Take { item, .. }
            | Action::Use { item, .. }
            | Action::Wear { item, .. }
            | Action::Remove { item, .. } => vec![actor, *item],
            Action::Listen { obj, .. } => vec![actor, *obj],
            Action::Lock { door, .. }
            | Action::Unlock { door, .. }
            | Action::LockFail { door, .. } => vec![actor, *door],
            Action::Say { .. }
            | Action::Shout { .. }
            | Action::Emote { .. }
            | Action::Think { .. }
            | Action::Follow { .. }
            | Action::Leave { .. }
            | Action::Arrive { .. } => vec![actor],
        }
    }

    /// The line `observer` reads.
    pub fn render(&self, world: &World, observer: Tzid) -> String {
        let name = |id: Tzid| world.label(id);
        let whom = |id: Tzid| {
            if id == observer {
                "you".to_string()
            } else {
                name(id)
            }
        };
        let a = name(self.actor());
        match self {
            Action::Look { actor, actee } => {
                if world.get(*actee).is_some_and(|e| e.is_room()) {
                    format!("{a} looks around.")
                } else if actee == actor {
                    format!("{a} looks at themself.")
                } else if world.get(*actee).is_some_and(|e| e.actor().is_some()) {
                    format!("{a} looks at {}.", whom(*actee))
                } else {
                    format!("{a} looks at the {}.", name(*actee))
                }
            }
            Action::Get { item, .. } => format!("{a} gets the {}.", name(*item)),
            Action::Drop { item, .. } => format!("{a} drops the {}.", name(*item)),
            Action::Put {
                item, container, ..
            } => format!("{a} puts the {} in the {}.", name(*item), name(*container)),
            Action::Take {
                item, container, ..
            } => format!("{a} takes the {} from the {}.", name(*item), name(*container)),
            Action::Use {
                item,
                target,
                detail,
                ..
            } => {
                let mut line = match target {
                    Some(t) if world.get(*t).is_some_and(|e| e.actor().is_some()) => {
                        format!("{a} uses the {} on {}.", name(*item), whom(*t))
                    }
                    Some(t) => format!("{a} uses the {} on the {}.", name(*item), name(*t)),
                    None => format!("{a} uses the {}.", name(*item)),
                };
                if let Some(d) = detail {
                    line.push(' ');
                    line.push_str(d);
                }
                line
            }
            Action::Wear { item, .. } => format!("{a} wears the {}.", name(*item)),
            Action::Remove { item, .. } => format!("{a} removes the {}.", name(*item)),
            Action::Say { verb, raw, .. } => format!("{a} {}s, \"{raw}\"", verb.as_str()),
            Action::Shout { raw, .. } => format!("{a} shouts, \"{raw}\""),
            Action::Emote { raw, .. } => format!("{a} {raw}"),
            Action::Think { raw, .. } => format!("{a} thinks . o O ( {raw} )"),
            Action::Listen { obj, .. } => format!("{a} listens to the {}.", name(*obj)),
            Action::Lock { door, key, .. } => {
                format!("{a} locks the {} with the {}.", name(*door), name(*key))
            }
            Action::Unlock { door, key, .. } => {
                format!("{a} unlocks the {} with the {}.", name(*door), name(*key))
            }
            Action::LockFail { door, key, .. } => match key {
                Some(k) => format!(
                    "{a} tries the {} in the {}, but it does not fit.",
                    name(*k),
                    name(*door)
                ),
                None => format!("{a} fumbles with some keys at the {}.", name(*door)),
            },
            Action::Follow { following, .. } => {
                format!("{a} starts following {}.", whom(*following))
            }
            Action::Leave { exit, .. } => format!("{a} leaves through the {}.", name(*exit)),
            Action::Arrive { leader, .. } => match leader {
                Some(l) => format!("{a} arrives, following {}.", whom(*l)),
                None => format!("{a} arrives."),
            },
        }
    }
}

/// Shout as heard from `hops` rooms away.
fn heard_from_afar(raw: &str, hops: u32) -> String {
    if hops <= 1 {
        format!("You hear someone nearby shout, \"{raw}\"")
    } else {
        format!("You hear someone shout in the distance, \"{raw}\"")
    }
}

impl World {
    /// Delivers `action` to everyone in `room` except its actor, skipping
    /// observers who cannot see all of its subjects. Shouts also carry to
    /// nearby rooms. Returns the number of deliveries.
    pub fn action(&self, room: Tzid, action: &Action, sink: &mut dyn Sink) -> usize {
        let originator = action.actor();
        let subjects = action.subjects();
        let mut sent = 0;
        for observer in self.actors(room) {
            if observer == originator {
                continue;
            }
            if !subjects.iter().all(|s| self.can_see(observer, *s)) {
                continue;
            }
            sink.deliver(observer, &action.render(self, observer));
            sent += 1;
        }

        if let Action::Shout { raw, spread, .. } = action {
            for (near, hops) in self.neighborhood(room, *spread) {
                let line = heard_from_afar(raw, hops);
                for listener in self.actors(near) {
                    sink.deliver(listener, &line);
                    sent += 1;
                }
            }
        }

        tracing::debug!(room = %room, act = action.act(), sent, "action");
        sent
    }
}
