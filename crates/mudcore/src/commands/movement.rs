use tracing::debug;

use super::{Outcome, required};
use crate::action::Action;
use crate::entity::{Capability, Tzid};
use crate::error::CommandError;
use crate::request::{Request, Target};
use crate::resolve::{Lookup, Scope};
use crate::session::Session;

enum Way {
    Exit(Tzid),
    Nowhere,
}

/// Exit by name, id, alias or direction, then by the name of the room it
/// leads to. A bare `go` (or `out`) works when there is only one way out.
fn find_way(s: &Session<'_>, room: Tzid, t: Option<&Target>) -> Result<Way, CommandError> {
    let resolver = s.resolver();
    if let Some(t) = t {
        if let Lookup::Found(x) = resolver.one(t, &[Scope::exits(room)]) {
            return Ok(Way::Exit(x));
        }
    }
    let visible = resolver.visible_in(Scope::exits(room));

    if let Some(name) = t.and_then(|t| t.name.as_deref()) {
        let by_dest = visible.iter().copied().find(|x| {
            s.world
                .destination(*x)
                .and_then(|d| s.world.get(d))
                .is_some_and(|d| d.name.eq_ignore_ascii_case(name) || d.has_alias(name))
        });
        if let Some(x) = by_dest {
            return Ok(Way::Exit(x));
        }
    }

    let bare = t.is_none_or(|t| t.is_any_of(&["out", "exit", "leave"]));
    if !bare {
        return Ok(Way::Nowhere);
    }
    match visible.as_slice() {
        [only] => Ok(Way::Exit(*only)),
        _ => {
            let word = t.and_then(|t| t.name.clone()).unwrap_or_else(|| "go".to_string());
            Err(CommandError::not_found(format!("{word} through which exit?")))
        }
    }
}

pub(super) fn go(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let origin = s.room()?;
    let t = r.primary();
    let exit = match find_way(s, origin, t.as_ref())? {
        Way::Exit(x) => x,
        Way::Nowhere if r.implied => return Ok(Outcome::Ignored),
        Way::Nowhere => return Err(CommandError::not_found("You can't go that way.")),
    };

    let mover = s.actor;
    step(s, exit, None)?;

    let followers = s
        .world
        .actors(origin)
        .into_iter()
        .filter(|a| s.world.following(*a) == Some(mover))
        .collect::<Vec<_>>();
    for f in followers {
        let mut fs = s.as_actor(f);
        fs.message(format!("You follow {}.", fs.label(mover)));
        if let Err(e) = step(&mut fs, exit, Some(mover)) {
            debug!(actor = %f, leader = %mover, kind = e.as_str(), "follower held back");
            fs.message(e.user_message());
        }
    }
    Ok(Outcome::Done)
}

/// Moves the session's actor through `exit` and shows them where they are.
fn step(s: &mut Session<'_>, exit: Tzid, leader: Option<Tzid>) -> Result<(), CommandError> {
    let origin = s.room()?;
    let (moved, why) = s.world.go(s.actor, exit)?;
    if !moved {
        return Err(CommandError::blocked(why));
    }
    s.broadcast_in(
        origin,
        &Action::Leave {
            actor: s.actor,
            exit,
        },
    );
    s.broadcast(&Action::Arrive {
        actor: s.actor,
        leader,
    })?;
    arrival(s)
}

fn arrival(s: &mut Session<'_>) -> Result<(), CommandError> {
    let room = s.room()?;
    s.message(s.label(room));

    let me = s.actor;
    let players = s.world.players(room);
    let mobs = s.world.mobs(room);
    for other in players.into_iter().chain(mobs) {
        if other == me || !s.can_see(other) {
            continue;
        }
        s.message(format!("{} is here.", s.label(other)));
        if s.world.following(other) == Some(me) {
            s.message(format!("{} is following you.", s.label(other)));
        }
        if s.world.following(me) == Some(other) {
            s.message(format!("You are following {}.", s.label(other)));
        }
    }
    Ok(())
}

pub(super) fn lock(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    turn_key(s, r, true)
}

pub(super) fn unlock(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    turn_key(s, r, false)
}

fn turn_key(s: &mut Session<'_>, r: &Request, locking: bool) -> Result<Outcome, CommandError> {
    let (verb, verb_lc) = if locking {
        ("Lock", "lock")
    } else {
        ("Unlock", "unlock")
    };
    let room = s.room()?;
    let t = required(r.primary(), &format!("{verb} which door?"))?;
    let door = s
        .resolver()
        .one(&t, &[Scope::exits(room)])
        .found()
        .ok_or_else(|| CommandError::not_found("No such exit."))?;

    let key = match r.secondary() {
        Some(kt) => {
            let key = s
                .resolver()
                .one(&kt, &[Scope::items(s.actor)])
                .found()
                .ok_or_else(|| CommandError::not_found("You do not have such a key."))?;
            if !s.world.has(key, Capability::Key) {
                return Err(CommandError::capability(format!(
                    "The {} is not a key.",
                    s.label(key)
                )));
            }
            if !s.world.locks(key, door) {
                s.message("That key does not fit.");
                s.broadcast(&Action::LockFail {
                    actor: s.actor,
                    door,
                    key: Some(key),
                })?;
                return Ok(Outcome::Done);
            }
            key
        }
        None => {
            let keys = s
                .world
                .items(s.actor)
                .into_iter()
                .filter(|i| s.world.has(*i, Capability::Key))
                .collect::<Vec<_>>();
            if keys.is_empty() {
                return Err(CommandError::missing(&format!("{verb} it with what?")));
            }
            match keys.into_iter().find(|k| s.world.locks(*k, door)) {
                Some(k) => k,
                None => {
                    s.message("None of your keys fit.");
                    s.broadcast(&Action::LockFail {
                        actor: s.actor,
                        door,
                        key: None,
                    })?;
                    return Ok(Outcome::Done);
                }
            }
        }
    };

    if locking {
        s.world.lock(door)?;
    } else {
        s.world.unlock(door)?;
    }
    s.message(format!(
        "You {verb_lc} the {} with the {}.",
        s.label(door),
        s.label(key)
    ));
    let actor = s.actor;
    s.broadcast(&if locking {
        Action::Lock { actor, door, key }
    } else {
        Action::Unlock { actor, door, key }
    })?;
    Ok(Outcome::Done)
}

pub(super) fn follow(s: &mut Session<'_>, r: &Request) -> Result<Outcome, CommandError> {
    let room = s.room()?;
    let Some(t) = r.primary() else {
        match s.world.following(s.actor) {
            Some(leader) => s.message(format!("You are following {}.", s.label(leader))),
            None => s.message("Not following anyone."),
        }
        return Ok(Outcome::Done);
    };

    let found = s
        .resolver()
        .one(&t, &[Scope::characters(room)])
        .found();
    match found {
        Some(c) if c == s.actor => {
            s.world.set_following(s.actor, None)?;
            s.message("You stop following.");
        }
        Some(c) => {
            s.world.set_following(s.actor, Some(c))?;
            s.message(format!("You start following {}.", s.label(c)));
            s.broadcast(&Action::Follow {
                actor: s.actor,
                following: c,
            })?;
        }
        None if t.is_any_of(&["none", "nobody", "no one"]) => {
            s.world.set_following(s.actor, None)?;
            s.message("You stop following.");
        }
        None => {
            return Err(CommandError::not_found(format!("{} is not here.", t.describe())));
        }
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use crate::commands::{Outcome, dispatch};
    use crate::entity::{Exit, Kind};
    use crate::fixtures;
    use crate::request::Request;
    use crate::session::{Session, Transcript};

    #[test]
    fn unlock_with_the_right_key_and_the_wrong_one() {
        let mut f = fixtures::hall();
        fixtures::two_rooms_east(&mut f.world, f.room);
        let door = f.world.exits(f.room)[0];
        f.world.lock(door).unwrap();
        let k = fixtures::key(&mut f.world, f.me, "brass key");
        fixtures::key(&mut f.world, f.me, "iron key");
        f.world.get_mut(door).unwrap().exit_mut().unwrap().keys.push(k);

        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        dispatch(
            &mut s,
            "unlock",
            &Request::object("east").with_object2("iron key"),
        );
        assert!(s.world.is_locked(door));
        dispatch(
            &mut s,
            "unlock",
            &Request::object("east").with_object2(&k.to_string()),
        );
        assert!(!f.world.is_locked(door));
        assert_eq!(
            t.to(f.me),
            vec!["That key does not fit.", "You unlock the east with the brass key."]
        );
        assert_eq!(
            t.to(f.bob),
            vec![
                "lee tries the iron key in the east, but it does not fit.",
                "lee unlocks the east with the brass key.",
            ]
        );
    }

    #[test]
    fn lock_tries_every_key_held() {
        let mut f = fixtures::hall();
        fixtures::two_rooms_east(&mut f.world, f.room);
        let door = f.world.exits(f.room)[0];

        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        dispatch(&mut s, "lock", &Request::object("e"));
        fixtures::key(s.world, f.me, "iron key");
        dispatch(&mut s, "lock", &Request::object("e"));
        assert!(!s.world.is_locked(door));
        let k = fixtures::key(s.world, f.me, "brass key");
        s.world.get_mut(door).unwrap().exit_mut().unwrap().keys.push(k);
        dispatch(&mut s, "lock", &Request::object("e"));
        assert!(f.world.is_locked(door));
        assert_eq!(
            t.to(f.me),
            vec![
                "Lock it with what?",
                "None of your keys fit.",
                "You lock the east with the brass key.",
            ]
        );
        assert_eq!(
            t.to(f.bob),
            vec![
                "lee fumbles with some keys at the east.",
                "lee locks the east with the brass key.",
            ]
        );
    }

    #[test]
    fn go_moves_announces_and_pulls_followers_along() {
        let mut f = fixtures::hall();
        let (yard, _) = fixtures::two_rooms_east(&mut f.world, f.room);
        let ann = fixtures::mob(&mut f.world, yard, "ann");
        f.world.set_following(f.bob, Some(f.me)).unwrap();

        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        assert_eq!(dispatch(&mut s, "go", &Request::object("east")), Outcome::Done);

        assert_eq!(f.world.room_of(f.me), Some(yard));
        assert_eq!(f.world.room_of(f.bob), Some(yard));
        assert_eq!(f.world.room_of(f.cat), Some(f.room));
        assert_eq!(t.to(f.me), vec!["yard", "ann is here.", "bob arrives, following you."]);
        assert_eq!(
            t.to(f.bob),
            vec![
                "lee leaves through the east.",
                "You follow lee.",
                "yard",
                "lee is here.",
                "You are following lee.",
                "ann is here.",
            ]
        );
        assert_eq!(t.to(f.cat), vec!["lee leaves through the east.", "bob leaves through the east."]);
        assert_eq!(t.to(ann), vec!["lee arrives.", "bob arrives, following lee."]);
    }

    #[test]
    fn go_by_destination_name_and_bare_go() {
        let mut f = fixtures::hall();
        let (yard, field) = fixtures::two_rooms_east(&mut f.world, f.room);

        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        dispatch(&mut s, "go", &Request::object("yard"));
        assert_eq!(s.world.room_of(f.me), Some(yard));
        dispatch(&mut s, "go", &Request::new());
        assert_eq!(s.world.room_of(f.me), Some(yard));
        dispatch(&mut s, "go", &Request::object("field"));
        assert_eq!(s.world.room_of(f.me), Some(field));
        dispatch(&mut s, "go", &Request::object("out"));
        assert_eq!(f.world.room_of(f.me), Some(yard));
        assert!(t.to(f.me).contains(&"go through which exit?"));
    }

    #[test]
    fn ambiguous_bare_go_is_not_a_missing_argument() {
        let mut f = fixtures::hall();
        let (yard, _) = fixtures::two_rooms_east(&mut f.world, f.room);
        f.world.relocate(f.me, yard).unwrap();

        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        let err = super::go(&mut s, &Request::object("out")).unwrap_err();
        assert_eq!(err.as_str(), "not_found");
        assert_eq!(err.user_message(), "out through which exit?");
        assert_eq!(f.world.room_of(f.me), Some(yard));
    }

    #[test]
    fn go_is_tri_state() {
        let mut f = fixtures::hall();
        let vault = f.world.spawn("vault", Kind::Room);
        f.world
            .spawn_in(
                f.room,
                "gate",
                Kind::Exit(Exit {
                    destination: Some(vault),
                    sealed: Some("The gate is rusted shut.".to_string()),
                    ..Exit::default()
                }),
            )
            .unwrap();

        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        assert_eq!(dispatch(&mut s, "go", &Request::object("gate")), Outcome::Done);
        assert_eq!(
            dispatch(&mut s, "go", &Request::object("banana").implied()),
            Outcome::Ignored
        );
        assert_eq!(dispatch(&mut s, "go", &Request::object("banana")), Outcome::Done);
        assert_eq!(f.world.room_of(f.me), Some(f.room));
        assert_eq!(
            t.to(f.me),
            vec!["The gate is rusted shut.", "You can't go that way."]
        );
        assert!(t.to(f.bob).is_empty());
    }

    #[test]
    fn follow_none_and_self_clear_the_relation() {
        for stop in ["none", "nobody", "no one", "lee"] {
            let mut f = fixtures::hall();
            let mut t = Transcript::new();
            let mut s = Session::new(&mut f.world, f.me, &mut t);
            dispatch(&mut s, "follow", &Request::object("bob"));
            assert_eq!(s.world.following(f.me), Some(f.bob));
            dispatch(&mut s, "follow", &Request::object(stop));
            assert_eq!(s.world.following(f.me), None, "{stop}");
            dispatch(&mut s, "follow", &Request::new());
            assert_eq!(
                t.to(f.me),
                vec!["You start following bob.", "You stop following.", "Not following anyone."]
            );
            assert_eq!(t.to(f.bob), vec!["lee starts following you."]);
        }
    }

    #[test]
    fn follow_reports_absent_characters() {
        let mut f = fixtures::hall();
        let mut t = Transcript::new();
        let mut s = Session::new(&mut f.world, f.me, &mut t);
        dispatch(&mut s, "follow", &Request::object("zed"));
        assert_eq!(t.to(f.me), vec!["zed is not here."]);
    }
}
