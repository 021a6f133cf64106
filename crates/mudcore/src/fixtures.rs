//! Small worlds shared by the unit tests.

use crate::entity::{Actor, Exit, Item, Kind, Tzid};
use crate::world::World;

pub struct Hall {
    pub world: World,
    pub room: Tzid,
    /// The player issuing commands.
    pub me: Tzid,
    pub bob: Tzid,
    pub cat: Tzid,
}

pub fn player(w: &mut World, at: Tzid, name: &str) -> Tzid {
    w.spawn_in(
        at,
        name,
        Kind::Actor(Actor {
            player: true,
            connected: true,
            ..Actor::default()
        }),
    )
    .unwrap()
}

pub fn mob(w: &mut World, at: Tzid, name: &str) -> Tzid {
    w.spawn_in(at, name, Kind::Actor(Actor::default())).unwrap()
}

/// `hall` holding lee and bob (players) and a cat.
pub fn hall() -> Hall {
    let mut world = World::new();
    let room = world.spawn("hall", Kind::Room);
    let me = player(&mut world, room, "lee");
    let bob = player(&mut world, room, "bob");
    let cat = mob(&mut world, room, "cat");
    Hall {
        world,
        room,
        me,
        bob,
        cat,
    }
}

pub fn item(w: &mut World, at: Tzid, name: &str, item: Item) -> Tzid {
    w.spawn_in(at, name, Kind::Item(item)).unwrap()
}

pub fn thing(w: &mut World, at: Tzid, name: &str) -> Tzid {
    item(
        w,
        at,
        name,
        Item {
            gettable: true,
            ..Item::default()
        },
    )
}

pub fn chest(w: &mut World, at: Tzid, name: &str) -> Tzid {
    item(
        w,
        at,
        name,
        Item {
            container: true,
            ..Item::default()
        },
    )
}

pub fn stack(w: &mut World, at: Tzid, name: &str, quantity: u32) -> Tzid {
    item(
        w,
        at,
        name,
        Item {
            gettable: true,
            quantity: Some(quantity),
            ..Item::default()
        },
    )
}

pub fn key(w: &mut World, at: Tzid, name: &str) -> Tzid {
    let id = thing(w, at, name);
    w.get_mut(id).unwrap().aka.push("key".to_string());
    id
}

pub fn exit(w: &mut World, from: Tzid, name: &str, to: Tzid) -> Tzid {
    w.spawn_in(
        from,
        name,
        Kind::Exit(Exit {
            destination: Some(to),
            ..Exit::default()
        }),
    )
    .unwrap()
}

/// Adds `yard` east of `room` and `field` east of the yard, with the way
/// back west from each.
pub fn two_rooms_east(w: &mut World, room: Tzid) -> (Tzid, Tzid) {
    let yard = w.spawn("yard", Kind::Room);
    let field = w.spawn("field", Kind::Room);
    exit(w, room, "east", yard);
    exit(w, yard, "west", room);
    exit(w, yard, "east", field);
    exit(w, field, "west", yard);
    (yard, field)
}
