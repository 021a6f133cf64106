use super::{Outcome, items, required};
use crate::action::Action;
use crate::entity::Capability;
use crate::error::CommandError;
use crate::request::Request;
use crate::resolve::Scope;
use crate::session::Session;

pub(super) fn wear(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let t = required(r.primary(), "Try: wear <item>")?;
    let matches = s.resolver().every(&t, &[Scope::items(s.actor)]);
    let item = matches
        .iter()
        .copied()
        .find(|i| !s.world.is_wearing(s.actor, *i))
        .or_else(|| matches.first().copied())
        .ok_or_else(|| CommandError::not_found("You do not have that."))?;

    if s.world.is_wearing(s.actor, item) {
        return Err(CommandError::blocked("You are already wearing that."));
    }
    if !s.world.has(item, Capability::Wearable) {
        return Err(CommandError::capability("You can't wear that."));
    }
    if !s.world.wear(s.actor, item) {
        return Err(CommandError::blocked(format!(
            "You try to wear the {} but can't.",
            s.label(item)
        )));
    }
    s.message(format!("You wear the {}.", s.label(item)));
    s.broadcast(&Action::Wear {
        actor: s.actor,
        item,
    })?;
    Ok(Outcome::Done)
}

pub(super) fn remove(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    if r.secondary().is_some() {
        return items::take(s, r);
    }
    let t = required(r.primary(), "Try: remove <item>")?;
    let item = s
        .resolver()
        .every(&t, &[Scope::items(s.actor)])
        .into_iter()
        .find(|i| s.world.is_wearing(s.actor, *i))
        .ok_or_else(|| CommandError::not_found("You are not wearing that."))?;

    if !s.world.unwear(s.actor, item) {
        return Err(CommandError::blocked(format!(
            "You try to remove the {} but can't.",
            s.label(item)
        )));
    }
    s.message(format!("You remove the {}.", s.label(item)));
    s.broadcast(&Action::Remove {
        actor: s.actor,
        item,
    })?;
    Ok(Outcome::Done)
}
