use super::{Outcome, not_here};
use crate::action::Action;
use crate::entity::{Entity, Kind, Tzid};
use crate::error::CommandError;
use crate::request::Request;
use crate::resolve::{Lookup, Scope};
use crate::session::Session;

pub(super) fn look(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let room = s.room()?;
    let Some(t) = r.primary() else {
        describe(s, room)?;
        return Ok(Outcome::Done);
    };

    let obj = match s
        .resolver()
        .one(&t, &[Scope::anything(room), Scope::items(s.actor)])
    {
        Lookup::Found(id) => id,
        _ if t.is_any_of(&["self", "myself", "me"]) => s.actor,
        _ if t.is_any_of(&["around", "about", "the room", "room"]) || t.tzid == Some(room) => {
            room
        }
        _ => return Err(not_here()),
    };

    if obj == s.actor {
        s.message("You look at yourself.");
    } else if s.world.get(obj).is_some_and(|e| e.actor().is_some()) {
        s.message(format!("You look at {}.", s.label(obj)));
    } else {
        s.message(format!("You look at the {}.", s.label(obj)));
    }
    describe(s, obj)?;
    s.broadcast(&Action::Look {
        actor: s.actor,
        actee: obj,
    })?;
    Ok(Outcome::Done)
}

fn visible_names(s: &Session<'_>, ids: Vec<Tzid>) -> Vec<String> {
    ids.into_iter()
        .filter(|id| s.can_see(*id))
        .map(|id| s.label(id))
        .collect()
}

fn describe(s: &mut Session<'_>, obj: Tzid) -> Result<(), CommandError> {
    let e = s.world.entity(obj)?;
    let description = e.description.clone();
    let is_room = e.is_room();
    let is_actor = e.actor().is_some();
    let is_container = e.item().is_some_and(|i| i.container);

    if is_room {
        s.message(s.label(obj));
    }
    if description.trim().is_empty() {
        if !is_room {
            s.message("Nothing special.");
        }
    } else {
        s.block(&description);
    }

    if is_room {
        let exits = visible_names(s, s.world.exits(obj));
        if !exits.is_empty() {
            s.message(format!("Exits: {}", exits.join(", ")));
        }
        let items = visible_names(s, s.world.items(obj));
        if !items.is_empty() {
            s.message(format!("You see: {}", items.join(", ")));
        }
        let others = s
            .world
            .actors(obj)
            .into_iter()
            .filter(|id| *id != s.actor)
            .collect::<Vec<_>>();
        for name in visible_names(s, others) {
            s.message(format!("{name} is here."));
        }
    } else if is_actor {
        let worn = s
            .world
            .get(obj)
            .and_then(Entity::actor)
            .map(|a| a.worn.clone())
            .unwrap_or_default();
        let worn = visible_names(s, worn);
        if !worn.is_empty() {
            s.message(format!("Wearing: {}", worn.join(", ")));
        }
    } else if is_container {
        let inside = visible_names(s, s.world.items(obj));
        if inside.is_empty() {
            s.message("It is empty.");
        } else {
            s.message(format!("It holds: {}", inside.join(", ")));
        }
    }
    Ok(())
}

pub(super) fn info(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let room = s.room()?;
    let found = match r.primary() {
        None => vec![s.actor],
        Some(t) => {
            let resolver = s.resolver();
            let mut xs = resolver.every(&t, &[Scope::anything(room)]);
            for id in resolver.every(&t, &[Scope::items(s.actor)]) {
                if !xs.contains(&id) {
                    xs.push(id);
                }
            }
            xs
        }
    };
    if found.is_empty() {
        return Err(not_here());
    }
    for id in found {
        let text = info_block(s.world.entity(id)?);
        s.block(&text);
    }
    Ok(Outcome::Done)
}

fn info_block(e: &Entity) -> String {
    let mut out = format!("{} {}\n  kind: {}\n", e.tzid, e.name, e.kind.as_str());
    if !e.aka.is_empty() {
        out.push_str(&format!("  aka: {}\n", e.aka.join(", ")));
    }
    let caps = e.capabilities();
    if !caps.is_empty() {
        let caps = caps.iter().map(|c| c.as_str()).collect::<Vec<_>>();
        out.push_str(&format!("  capabilities: {}\n", caps.join(", ")));
    }
    if let Some(q) = e.quantity() {
        out.push_str(&format!("  quantity: {q}\n"));
    }
    match &e.kind {
        Kind::Item(i) => {
            if let Some(slot) = i.wear_slot {
                out.push_str(&format!("  slot: {}\n", slot.as_str()));
            }
        }
        Kind::Exit(x) => {
            if let Some(d) = x.destination {
                out.push_str(&format!("  leads to: {d}\n"));
            }
            if x.locked {
                out.push_str("  locked\n");
            }
        }
        Kind::Actor(a) => {
            out.push_str(&format!("  carrying: {}\n", e.contents().len()));
            if !a.worn.is_empty() {
                out.push_str(&format!("  wearing: {}\n", a.worn.len()));
            }
        }
        Kind::Room => {}
    }
    out
}

pub(super) fn inventory(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    let held = s.world.items(s.actor);
    if held.is_empty() {
        s.message("You have nothing.");
        return Ok(Outcome::Done);
    }
    s.message("You are holding:");
    for id in held {
        let mark = if s.world.is_wearing(s.actor, id) { "*" } else { "" };
        s.indented(format!("{}{mark}", s.label(id)));
    }
    Ok(Outcome::Done)
}

pub(super) fn exits(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    let room = s.room()?;
    let names = visible_names(s, s.world.exits(room));
    if names.is_empty() {
        s.message("You see no obvious exits.");
    } else {
        s.message("Exits:");
        s.indented(names.join(", "));
    }
    Ok(Outcome::Done)
}
