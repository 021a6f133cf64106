//! Reference resolution: turning "the sword", "#42" or "all" into entities.
//!
//! Scopes are searched in the order the caller gives them and the first
//! scope with a visible match wins. Inside a scope an exact id beats an exact
//! name, which beats an alias; ties go to container order. Visibility is a
//! post-filter, so a match the viewer cannot see is reported as
//! [`Lookup::Hidden`] rather than silently skipped.

use crate::entity::{Entity, Tzid};
use crate::request::Target;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Among {
    Items,
    Exits,
    Players,
    Mobs,
    Characters,
    Anything,
}

impl Among {
    fn admits(self, e: &Entity) -> bool {
        match self {
            Among::Items => e.item().is_some(),
            Among::Exits => e.exit().is_some(),
            Among::Players => e.is_player(),
            Among::Mobs => e.is_mob(),
            Among::Characters => e.actor().is_some(),
            Among::Anything => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub container: Tzid,
    pub among: Among,
}

impl Scope {
    pub fn items(container: Tzid) -> Self {
        Self {
            container,
            among: Among::Items,
        }
    }

    pub fn exits(room: Tzid) -> Self {
        Self {
            container: room,
            among: Among::Exits,
        }
    }

    pub fn players(room: Tzid) -> Self {
        Self {
            container: room,
            among: Among::Players,
        }
    }

    pub fn mobs(room: Tzid) -> Self {
        Self {
            container: room,
            among: Among::Mobs,
        }
    }

    pub fn characters(room: Tzid) -> Self {
        Self {
            container: room,
            among: Among::Characters,
        }
    }

    pub fn anything(container: Tzid) -> Self {
        Self {
            container,
            among: Among::Anything,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(Tzid),
    /// Something matched, but the viewer cannot perceive it.
    Hidden(Tzid),
    Missing,
}

impl Lookup {
    pub fn found(self) -> Option<Tzid> {
        match self {
            Lookup::Found(id) => Some(id),
            Lookup::Hidden(_) | Lookup::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    None,
    One(Tzid),
    Many(Vec<Tzid>),
}

pub struct Resolver<'w> {
    world: &'w World,
    viewer: Tzid,
}

impl<'w> Resolver<'w> {
    pub fn new(world: &'w World, viewer: Tzid) -> Self {
        Self { world, viewer }
    }

    fn candidates(&self, scope: Scope) -> impl Iterator<Item = &'w Entity> + 'w {
        let world = self.world;
        world
            .contents(scope.container)
            .iter()
            .filter_map(move |id| world.get(*id))
            .filter(move |e| scope.among.admits(e))
    }

    /// Every match in one scope, best first.
    fn matches_in(&self, target: &Target, scope: Scope) -> Vec<Tzid> {
        let mut out = Vec::new();
        if let Some(id) = target.tzid {
            out.extend(self.candidates(scope).filter(|e| e.tzid == id).map(|e| e.tzid));
        }
        let Some(name) = target.name.as_deref() else {
            return out;
        };

        let by_name: Vec<Tzid> = self
            .candidates(scope)
            .filter(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| e.tzid)
            .collect();
        extend_unique(&mut out, by_name);
        let by_alias: Vec<Tzid> = self
            .candidates(scope)
            .filter(|e| e.has_alias(name))
            .map(|e| e.tzid)
            .collect();
        extend_unique(&mut out, by_alias);

        if out.is_empty() {
            if let Some((full, short)) = direction_forms(name) {
                let by_dir: Vec<Tzid> = self
                    .candidates(scope)
                    .filter(|e| e.exit().is_some())
                    .filter(|e| {
                        [full, short]
                            .iter()
                            .any(|d| e.name.eq_ignore_ascii_case(d) || e.has_alias(d))
                    })
                    .map(|e| e.tzid)
                    .collect();
                extend_unique(&mut out, by_dir);
            }
        }
        out
    }

    /// Single-target lookup: first visible match in scope order.
    pub fn one(&self, target: &Target, scopes: &[Scope]) -> Lookup {
        let mut hidden = None;
        for scope in scopes {
            for id in self.matches_in(target, *scope) {
                if self.world.can_see(self.viewer, id) {
                    return Lookup::Found(id);
                }
                hidden.get_or_insert(id);
            }
        }
        match hidden {
            Some(id) => Lookup::Hidden(id),
            None => Lookup::Missing,
        }
    }

    /// All visible matches from the first scope that has any.
    pub fn every(&self, target: &Target, scopes: &[Scope]) -> Vec<Tzid> {
        for scope in scopes {
            let xs = self
                .matches_in(target, *scope)
                .into_iter()
                .filter(|id| self.world.can_see(self.viewer, *id))
                .collect::<Vec<_>>();
            if !xs.is_empty() {
                return xs;
            }
        }
        Vec::new()
    }

    /// Visible candidates of a scope, in container order.
    pub fn visible_in(&self, scope: Scope) -> Vec<Tzid> {
        self.candidates(scope)
            .map(|e| e.tzid)
            .filter(|id| self.world.can_see(self.viewer, *id))
            .collect()
    }

    /// `allow_all` lets the literal name "all" expand to the first scope's
    /// visible candidates.
    pub fn resolve(&self, target: &Target, scopes: &[Scope], allow_all: bool) -> Resolved {
        if allow_all && target.is_all() {
            return Resolved::Many(
                scopes
                    .first()
                    .map(|s| self.visible_in(*s))
                    .unwrap_or_default(),
            );
        }
        match self.one(target, scopes) {
            Lookup::Found(id) => Resolved::One(id),
            Lookup::Hidden(_) | Lookup::Missing => Resolved::None,
        }
    }
}

fn extend_unique(out: &mut Vec<Tzid>, xs: Vec<Tzid>) {
    for x in xs {
        if !out.contains(&x) {
            out.push(x);
        }
    }
}

/// Long and short spellings of a compass direction.
fn direction_forms(token: &str) -> Option<(&'static str, &'static str)> {
    match token.trim().to_ascii_lowercase().as_str() {
        "north" | "n" => Some(("north", "n")),
        "south" | "s" => Some(("south", "s")),
        "east" | "e" => Some(("east", "e")),
        "west" | "w" => Some(("west", "w")),
        "up" | "u" => Some(("up", "u")),
        "down" | "d" => Some(("down", "d")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Actor, Exit, Item, Kind};

    struct Fixture {
        w: World,
        room: Tzid,
        me: Tzid,
    }

    fn fixture() -> Fixture {
        let mut w = World::new();
        let room = w.spawn("hall", Kind::Room);
        let me = w
            .spawn_in(room, "lee", Kind::Actor(Actor::default()))
            .unwrap();
        Fixture { w, room, me }
    }

    fn item(w: &mut World, at: Tzid, name: &str, aka: &[&str]) -> Tzid {
        let id = w
            .spawn_in(
                at,
                name,
                Kind::Item(Item {
                    gettable: true,
                    ..Item::default()
                }),
            )
            .unwrap();
        w.get_mut(id).unwrap().aka = aka.iter().map(|s| s.to_string()).collect();
        id
    }

    #[test]
    fn earlier_scopes_win() {
        let mut f = fixture();
        let floor = item(&mut f.w, f.room, "sword", &[]);
        let held = item(&mut f.w, f.me, "sword", &[]);
        let r = Resolver::new(&f.w, f.me);

        let t = Target::named("sword");
        assert_eq!(
            r.one(&t, &[Scope::items(f.me), Scope::items(f.room)]),
            Lookup::Found(held)
        );
        assert_eq!(
            r.one(&t, &[Scope::items(f.room), Scope::items(f.me)]),
            Lookup::Found(floor)
        );
    }

    #[test]
    fn id_then_name_then_alias() {
        let mut f = fixture();
        let blade = item(&mut f.w, f.room, "blade", &["sword"]);
        let sword = item(&mut f.w, f.room, "Sword", &[]);
        let r = Resolver::new(&f.w, f.me);
        let scopes = [Scope::items(f.room)];

        assert_eq!(r.one(&Target::named("sword"), &scopes), Lookup::Found(sword));
        assert_eq!(r.one(&Target::id(blade), &scopes), Lookup::Found(blade));
        assert_eq!(r.every(&Target::named("SWORD"), &scopes), vec![sword, blade]);
    }

    #[test]
    fn aliases_resolve_in_container_order() {
        let mut f = fixture();
        let first = item(&mut f.w, f.room, "brass key", &["key"]);
        let _second = item(&mut f.w, f.room, "iron key", &["key"]);
        let r = Resolver::new(&f.w, f.me);
        assert_eq!(
            r.one(&Target::named("key"), &[Scope::items(f.room)]),
            Lookup::Found(first)
        );
    }

    #[test]
    fn invisible_matches_are_hidden_not_found() {
        let mut f = fixture();
        let ghost = item(&mut f.w, f.room, "ring", &[]);
        f.w.get_mut(ghost).unwrap().visible = false;
        let r = Resolver::new(&f.w, f.me);
        let t = Target::named("ring");
        assert_eq!(r.one(&t, &[Scope::items(f.room)]), Lookup::Hidden(ghost));
        assert_eq!(r.one(&Target::named("crown"), &[Scope::items(f.room)]), Lookup::Missing);

        let shown = item(&mut f.w, f.me, "ring", &[]);
        let r = Resolver::new(&f.w, f.me);
        assert_eq!(
            r.one(&t, &[Scope::items(f.room), Scope::items(f.me)]),
            Lookup::Found(shown)
        );
    }

    #[test]
    fn all_expands_only_when_allowed() {
        let mut f = fixture();
        let a = item(&mut f.w, f.room, "apple", &[]);
        let b = item(&mut f.w, f.room, "bread", &[]);
        let c = item(&mut f.w, f.room, "cheese", &[]);
        f.w.get_mut(b).unwrap().visible = false;
        let r = Resolver::new(&f.w, f.me);
        let all = Target::named("all");

        assert_eq!(
            r.resolve(&all, &[Scope::items(f.room)], true),
            Resolved::Many(vec![a, c])
        );
        assert_eq!(r.resolve(&all, &[Scope::items(f.room)], false), Resolved::None);
        assert_eq!(
            r.resolve(&all, &[Scope::items(f.me)], true),
            Resolved::Many(vec![])
        );
    }

    #[test]
    fn exits_accept_direction_abbreviations() {
        let mut f = fixture();
        let other = f.w.spawn("yard", Kind::Room);
        let north = f
            .w
            .spawn_in(
                f.room,
                "north",
                Kind::Exit(Exit {
                    destination: Some(other),
                    ..Exit::default()
                }),
            )
            .unwrap();
        let r = Resolver::new(&f.w, f.me);
        assert_eq!(
            r.one(&Target::named("n"), &[Scope::exits(f.room)]),
            Lookup::Found(north)
        );
        assert_eq!(
            r.one(&Target::named("s"), &[Scope::exits(f.room)]),
            Lookup::Missing
        );
    }

    #[test]
    fn kind_filters_keep_scopes_apart() {
        let mut f = fixture();
        let bob = f
            .w
            .spawn_in(f.room, "bob", Kind::Actor(Actor::default()))
            .unwrap();
        let r = Resolver::new(&f.w, f.me);
        let t = Target::named("bob");
        assert_eq!(r.one(&t, &[Scope::items(f.room)]), Lookup::Missing);
        assert_eq!(r.one(&t, &[Scope::mobs(f.room)]), Lookup::Found(bob));
        assert_eq!(r.one(&t, &[Scope::players(f.room)]), Lookup::Missing);
    }
}
