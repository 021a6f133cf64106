use super::{Outcome, required, required_text};
use crate::action::{Action, SayVerb};
use crate::error::CommandError;
use crate::request::Request;
use crate::resolve::Scope;
use crate::session::Session;

pub(super) fn say(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let words = required_text(r, "Say what?")?;
    let verb = SayVerb::for_words(words);
    s.message(format!("You {}, \"{words}\"", verb.as_str()));
    s.broadcast(&Action::Say {
        actor: s.actor,
        verb,
        raw: words.to_string(),
    })?;
    Ok(Outcome::Done)
}

pub(super) fn shout(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let words = required_text(r, "Shout what?")?;
    s.message(format!("You shout, \"{words}\""));
    s.broadcast(&Action::Shout {
        actor: s.actor,
        raw: words.to_string(),
        spread: s.world.shout_spread,
    })?;
    Ok(Outcome::Done)
}

pub(super) fn emote(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let words = required_text(r, "Try: emote <text>")?;
    s.message(format!("({} {words})", s.label(s.actor)));
    s.broadcast(&Action::Emote {
        actor: s.actor,
        raw: words.to_string(),
    })?;
    Ok(Outcome::Done)
}

pub(super) fn think(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let words = required_text(r, "Think what?")?;
    s.message(format!("{} thinks . o O ( {words} )", s.label(s.actor)));
    s.broadcast(&Action::Think {
        actor: s.actor,
        raw: words.to_string(),
    })?;
    Ok(Outcome::Done)
}

pub(super) fn listen(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let room = s.room()?;
    let t = required(r.primary(), "Try: listen to <object>")?;
    let obj = s
        .resolver()
        .one(
            &t,
            &[
                Scope::items(s.actor),
                Scope::items(room),
                Scope::exits(room),
            ],
        )
        .found()
        .ok_or_else(|| CommandError::not_found("That is not here."))?;

    let sound = s.world.entity(obj)?.sound.clone();
    s.message(format!("You listen to the {}.", s.label(obj)));
    s.message(sound.as_deref().unwrap_or("You hear nothing special."));
    s.broadcast(&Action::Listen {
        actor: s.actor,
        obj,
    })?;
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use crate::commands::dispatch;
    use crate::fixtures;
    use crate::request::Request;
    use crate::session::{Session, Transcript};

    #[test]
    fn say_picks_its_verb_from_punctuation() {
        let mut f = fixtures::hall();
        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        dispatch(&mut s, "say", &Request::new().with_message("anyone home?"));
        dispatch(&mut s, "\"", &Request::new().with_message("hello"));
        dispatch(&mut s, "say", &Request::new());
        assert_eq!(
            t.to(f.me),
            vec!["You ask, \"anyone home?\"", "You say, \"hello\"", "Say what?"]
        );
        assert_eq!(
            t.to(f.bob),
            vec!["lee asks, \"anyone home?\"", "lee says, \"hello\""]
        );
    }

    #[test]
    fn shout_uses_the_world_spread() {
        let mut f = fixtures::hall();
        let (yard, field) = fixtures::two_rooms_east(&mut f.world, f.room);
        let ann = fixtures::mob(&mut f.world, yard, "ann");
        let cy = fixtures::mob(&mut f.world, field, "cy");
        f.world.shout_spread = 1;

        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        dispatch(&mut s, "shout", &Request::new().with_message("help!"));
        assert_eq!(t.to(f.me), vec!["You shout, \"help!\""]);
        assert_eq!(t.to(f.bob), vec!["lee shouts, \"help!\""]);
        assert_eq!(t.to(ann), vec!["You hear someone nearby shout, \"help!\""]);
        assert!(t.to(cy).is_empty());
    }

    #[test]
    fn emote_and_think_echo_back() {
        let mut f = fixtures::hall();
        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        dispatch(&mut s, ":", &Request::new().with_message("grins"));
        dispatch(&mut s, "think", &Request::new().with_message("therefore I am"));
        assert_eq!(
            t.to(f.me),
            vec!["(lee grins)", "lee thinks . o O ( therefore I am )"]
        );
        assert_eq!(
            t.to(f.bob),
            vec!["lee grins", "lee thinks . o O ( therefore I am )"]
        );
    }

    #[test]
    fn listen_to_exits_and_items() {
        let mut f = fixtures::hall();
        fixtures::two_rooms_east(&mut f.world, f.room);
        let east = f.world.exits(f.room)[0];
        f.world.get_mut(east).unwrap().sound = Some("Wind whistles through.".to_string());
        fixtures::thing(&mut f.world, f.me, "shell");

        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        dispatch(&mut s, "listen", &Request::object("east"));
        dispatch(&mut s, "listen", &Request::object("shell"));
        dispatch(&mut s, "listen", &Request::object("harp"));
        assert_eq!(
            t.to(f.me),
            vec![
                "You listen to the east.",
                "Wind whistles through.",
                "You listen to the shell.",
                "You hear nothing special.",
                "That is not here.",
            ]
        );
        assert_eq!(
            t.to(f.bob),
            vec!["lee listens to the east.", "lee listens to the shell."]
        );
    }
}
