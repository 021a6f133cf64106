use super::{Outcome, required_text};
use crate::entity::Setting;
use crate::error::CommandError;
use crate::request::Request;
use crate::session::Session;

fn settings_mut<'s>(
    s: &'s mut Session<'_>,
) -> Result<&'s mut std::collections::BTreeMap<String, Setting>, CommandError> {
    let actor = s.actor;
    s.world
        .entity_mut(actor)?
        .actor_mut()
        .map(|a| &mut a.settings)
        .ok_or_else(|| CommandError::Internal(format!("{actor} has no settings")))
}

/// `set var` stores true, `set var = true|false` a flag, anything else
/// text. An empty value, like `unset`, removes an existing setting and
/// otherwise records false.
fn parse_value(val: Option<&str>) -> Option<Setting> {
    match val {
        None => Some(Setting::Flag(true)),
        Some(v) if v.eq_ignore_ascii_case("true") => Some(Setting::Flag(true)),
        Some(v) if v.eq_ignore_ascii_case("false") => Some(Setting::Flag(false)),
        Some("") => None,
        Some(v) => Some(Setting::Text(v.to_string())),
    }
}

fn clear(s: &mut Session<'_>, var: &str) -> Result<(), CommandError> {
    let settings = settings_mut(s)?;
    if settings.remove(var).is_some() {
        s.message(format!("{var} unset."));
    } else {
        settings.insert(var.to_string(), Setting::Flag(false));
        s.message(format!("{var} = false"));
    }
    Ok(())
}

pub(super) fn set(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let Some(var) = r.var.as_deref() else {
        let listing = settings_mut(s)?
            .iter()
            .map(|(k, v)| format!("{k} = {v}"))
            .collect::<Vec<_>>();
        if listing.is_empty() {
            s.message("You have not set anything yet.");
        } else {
            s.message("Settings:");
            for line in listing {
                s.indented(line);
            }
        }
        return Ok(Outcome::Done);
    };

    match parse_value(r.val.as_deref()) {
        Some(value) => {
            let line = format!("{var} = {value}");
            settings_mut(s)?.insert(var.to_string(), value);
            s.message(line);
        }
        None => clear(s, var)?,
    }
    Ok(Outcome::Done)
}

pub(super) fn unset(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let var = r
        .var
        .as_deref()
        .ok_or_else(|| CommandError::missing("Try: unset <var>"))?;
    clear(s, var)?;
    Ok(Outcome::Done)
}

pub(super) fn recap(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let recapped = required_text(r, "Try: recap <name>")?;
    let name = s.world.entity(s.actor)?.name.clone();
    if !name.eq_ignore_ascii_case(recapped) {
        return Err(CommandError::blocked(
            "The recapped name still has to match your proper name.",
        ));
    }
    settings_mut(s)?.insert("recap".to_string(), Setting::Text(recapped.to_string()));
    s.message(format!("Your name will now be seen by everyone as {recapped}"));
    Ok(Outcome::Done)
}
