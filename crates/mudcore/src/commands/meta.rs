use super::{COMMANDS, Outcome, find};
use crate::error::CommandError;
use crate::request::Request;
use crate::session::Session;

const CLS_LINES: usize = 60;

pub(super) fn help(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let topic = r.topic.as_deref().or(r.objname.as_deref());
    let Some(topic) = topic else {
        s.message("Commands:");
        let names = COMMANDS.iter().map(|c| c.name).collect::<Vec<_>>();
        for row in names.chunks(8) {
            s.indented(row.join(" "));
        }
        s.message("Try: help <command>");
        return Ok(Outcome::Done);
    };

    let cmd = find(topic)
        .ok_or_else(|| CommandError::not_found(format!("There is no help for {topic}.")))?;
    s.message(cmd.syntax);
    s.indented(cmd.about);
    if !cmd.aliases.is_empty() {
        s.indented(format!("Alternates: {}", cmd.aliases.join(" ")));
    }
    Ok(Outcome::Done)
}

pub(super) fn who(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    s.message("Players connected:");
    for name in s.who() {
        s.indented(name);
    }
    Ok(Outcome::Done)
}

pub(super) fn stats(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    let actor = s.actor;
    let stats = s
        .world
        .entity(actor)?
        .actor()
        .map(|a| a.stats.clone())
        .ok_or_else(|| CommandError::Internal(format!("{actor} has no stats")))?;
    if stats.is_empty() {
        s.message("You have no stats.");
        return Ok(Outcome::Done);
    }
    let width = stats.keys().map(|k| k.len()).max().unwrap_or(0);
    s.message("Character stats...");
    for (k, v) in &stats {
        s.indented(format!("{k:<width$} :{v:4}"));
    }
    Ok(Outcome::Done)
}

pub(super) fn map(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    let Some(text) = s.world.map.clone() else {
        return Err(CommandError::not_found("There is no map of this place."));
    };
    for line in text.trim_end().lines() {
        s.message(line.trim_end());
    }
    Ok(Outcome::Done)
}

pub(super) fn time(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    let now = chrono::Local::now();
    s.message(now.format("%a %b %e %H:%M:%S %Y").to_string());
    Ok(Outcome::Done)
}

pub(super) fn quit(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    s.message("Goodbye.");
    Ok(Outcome::Quit)
}

pub(super) fn cls(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    for _ in 0..CLS_LINES {
        s.message("");
    }
    Ok(Outcome::Done)
}

pub(super) fn xyzzy(s: &mut Session<'_>, _r: &Request) -> Result<Outcome, CommandError> {
    s.message("Nothing happens.");
    Ok(Outcome::Done)
}
