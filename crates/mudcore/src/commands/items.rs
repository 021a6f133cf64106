use std::num::NonZeroU32;

use super::{Outcome, not_here, required};
use crate::action::Action;
use crate::entity::{Capability, Entity, Hook, Tzid};
use crate::error::CommandError;
use crate::request::Request;
use crate::resolve::{Resolved, Scope};
use crate::session::Session;

/// The part of a matched item a command acts on: all of it, or `n` split
/// off a stack.
fn portion(s: &mut Session<'_>, item: Tzid, n: Option<NonZeroU32>) -> Result<Tzid, CommandError> {
    match n {
        None => Ok(item),
        Some(n) => Ok(s.world.split(item, n)?),
    }
}

fn put_hook(s: &Session<'_>, item: Tzid) -> Option<Hook> {
    s.world
        .get(item)
        .and_then(Entity::item)
        .and_then(|i| i.on_put.clone())
}

fn take_hook(s: &Session<'_>, item: Tzid) -> Option<Hook> {
    s.world
        .get(item)
        .and_then(Entity::item)
        .and_then(|i| i.on_take.clone())
}

fn run_hook(s: &mut Session<'_>, item: Tzid, hook: Option<Hook>) -> Result<(), CommandError> {
    match hook {
        None => {}
        Some(Hook::Vanish { message }) => {
            s.message(message);
            s.world.destroy(item)?;
        }
    }
    Ok(())
}

/// Reports a per-item rejection during `all` and carries on.
fn each(s: &mut Session<'_>, res: Result<(), CommandError>) -> Result<(), CommandError> {
    match res {
        Err(e @ CommandError::Internal(_)) => Err(e),
        Err(e) => {
            s.message(e.user_message());
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

pub(super) fn get(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let room = s.room()?;
    let t = required(r.primary(), "Try: get <item>")?;

    match s.resolver().resolve(&t, &[Scope::items(room)], true) {
        Resolved::Many(here) => {
            if here.is_empty() {
                s.message("There is nothing here to get.");
            }
            for item in here {
                let res = get_one(s, item, None);
                each(s, res)?;
            }
        }
        Resolved::One(item) => get_one(s, item, r.number)?,
        Resolved::None => {
            let have = s.resolver().one(&t, &[Scope::items(s.actor)]).found();
            return Err(match have {
                Some(_) => CommandError::not_found("You already have that."),
                None => not_here(),
            });
        }
    }
    Ok(Outcome::Done)
}

fn get_one(s: &mut Session<'_>, item: Tzid, n: Option<NonZeroU32>) -> Result<(), CommandError> {
    if !s.world.has(item, Capability::Gettable) {
        return Err(CommandError::capability(format!(
            "You cannot get the {}.",
            s.label(item)
        )));
    }
    let unit = portion(s, item, n)?;
    s.world.relocate(unit, s.actor)?;
    s.message(format!("You get the {}.", s.label(unit)));
    s.broadcast(&Action::Get {
        actor: s.actor,
        item: unit,
    })?;
    Ok(())
}

pub(super) fn drop(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let t = required(r.primary(), "Try: drop <item>")?;

    match s.resolver().resolve(&t, &[Scope::items(s.actor)], true) {
        Resolved::Many(held) => {
            if held.is_empty() {
                s.message("You have nothing.");
            }
            for item in held {
                let res = drop_one(s, item, None);
                each(s, res)?;
            }
        }
        Resolved::One(item) => drop_one(s, item, r.number)?,
        Resolved::None => return Err(CommandError::not_found("You do not have that.")),
    }
    Ok(Outcome::Done)
}

fn drop_one(s: &mut Session<'_>, item: Tzid, n: Option<NonZeroU32>) -> Result<(), CommandError> {
    let room = s.room()?;
    let unit = portion(s, item, n)?;
    s.world.relocate(unit, room)?;
    s.message(format!("You drop the {}.", s.label(unit)));
    s.broadcast(&Action::Drop {
        actor: s.actor,
        item: unit,
    })?;
    Ok(())
}

pub(super) fn put(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let usage = "Try: put <item> in <container>";
    let room = s.room()?;
    let t = required(r.primary(), usage)?;
    let ct = required(r.secondary(), usage)?;

    let container = s
        .resolver()
        .one(&ct, &[Scope::items(s.actor), Scope::items(room)])
        .found()
        .ok_or_else(|| {
            CommandError::not_found(format!(
                "You do not have a container called {}.",
                ct.describe()
            ))
        })?;
    if !s.world.has(container, Capability::Container) {
        return Err(CommandError::capability("You can't put anything in there."));
    }

    match s
        .resolver()
        .resolve(&t, &[Scope::items(s.actor), Scope::items(room)], true)
    {
        Resolved::Many(held) => {
            for item in held.into_iter().filter(|i| *i != container) {
                let res = put_one(s, item, container);
                each(s, res)?;
            }
        }
        Resolved::One(item) => put_one(s, item, container)?,
        Resolved::None => return Err(CommandError::not_found("You do not have that.")),
    }
    Ok(Outcome::Done)
}

fn put_one(s: &mut Session<'_>, item: Tzid, container: Tzid) -> Result<(), CommandError> {
    if s.world.is_within(container, item) {
        return Err(CommandError::blocked(format!(
            "You can't put the {} inside itself.",
            s.label(item)
        )));
    }
    let held = s.world.parent_of(item) == Some(s.actor);
    if !held && !s.world.has(item, Capability::Gettable) {
        return Err(CommandError::capability(format!(
            "You cannot get the {}.",
            s.label(item)
        )));
    }

    s.world.remove(item)?;
    s.message(format!(
        "You put the {} in the {}.",
        s.label(item),
        s.label(container)
    ));
    s.broadcast(&Action::Put {
        actor: s.actor,
        item,
        container,
    })?;
    let hook = put_hook(s, item);
    run_hook(s, item, hook)?;
    if s.world.exists(item) {
        s.world.add(container, item)?;
    }
    Ok(())
}

pub(super) fn take(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let Some(ct) = r.secondary() else {
        return get(s, r);
    };
    let room = s.room()?;
    let t = required(r.primary(), "Try: take <item> from <container>")?;

    let container = s
        .resolver()
        .one(&ct, &[Scope::items(s.actor), Scope::items(room)])
        .found()
        .ok_or_else(|| CommandError::not_found(format!("You do not see {} here.", ct.describe())))?;
    if !s.world.has(container, Capability::Container) {
        return Err(CommandError::capability("That is not a container."));
    }

    match s.resolver().resolve(&t, &[Scope::items(container)], true) {
        Resolved::Many(inside) => {
            if inside.is_empty() {
                s.message(format!("The {} is empty.", s.label(container)));
            }
            for item in inside {
                let res = take_one(s, item, container, None);
                each(s, res)?;
            }
        }
        Resolved::One(item) => take_one(s, item, container, r.number)?,
        Resolved::None => {
            return Err(CommandError::not_found(format!(
                "There is no {} in the {}.",
                t.describe(),
                s.label(container)
            )));
        }
    }
    Ok(Outcome::Done)
}

fn take_one(
    s: &mut Session<'_>,
    item: Tzid,
    container: Tzid,
    n: Option<NonZeroU32>,
) -> Result<(), CommandError> {
    let unit = portion(s, item, n)?;
    s.world.remove(unit)?;
    s.message(format!(
        "You take the {} from the {}.",
        s.label(unit),
        s.label(container)
    ));
    s.broadcast(&Action::Take {
        actor: s.actor,
        item: unit,
        container,
    })?;
    let hook = take_hook(s, unit);
    run_hook(s, unit, hook)?;
    if s.world.exists(unit) {
        s.world.add(s.actor, unit)?;
    }
    Ok(())
}

pub(super) fn use_item(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let room = s.room()?;
    let t = required(r.primary(), "Try: use <item>")?;
    let item = s
        .resolver()
        .one(&t, &[Scope::items(s.actor)])
        .found()
        .ok_or_else(|| CommandError::not_found("You do not have that."))?;
    if !s.world.has(item, Capability::Usable) {
        return Err(CommandError::capability("You cannot use that."));
    }
    let target = match r.secondary() {
        None => None,
        Some(t2) => Some(
            s.resolver()
                .one(&t2, &[Scope::anything(room), Scope::items(s.actor)])
                .found()
                .ok_or_else(|| CommandError::not_found("You cannot use it on that. It's not here."))?,
        ),
    };

    let used = s.world.use_item(item)?;
    match target {
        Some(on) if s.world.get(on).is_some_and(|e| e.actor().is_some()) => {
            s.message(format!("You use the {} on {}.", s.label(item), s.label(on)))
        }
        Some(on) => s.message(format!("You use the {} on the {}.", s.label(item), s.label(on))),
        None => s.message(format!("You use the {}.", s.label(item))),
    }
    if let Some(text) = used.actor_text {
        s.message(text);
    }
    s.broadcast(&Action::Use {
        actor: s.actor,
        item,
        target,
        detail: used.room_text,
    })?;
    if used.consumed {
        s.world.destroy(item)?;
    }
    Ok(Outcome::Done)
}
