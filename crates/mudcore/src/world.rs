use std::collections::{HashMap, HashSet, VecDeque};

use crate::entity::{Capability, Entity, Kind, Tzid, UseEffect};
use crate::error::WorldError;

pub const DEFAULT_SHOUT_SPREAD: u32 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Used {
    pub actor_text: Option<String>,
    pub room_text: Option<String>,
    pub consumed: bool,
}

/// Every entity in the world, keyed by id. Containment is stored on both
/// ends: the child's `parent` and the container's ordered `contents`.
#[derive(Debug, Clone)]
pub struct World {
    entities: HashMap<Tzid, Entity>,
    next_id: u64,
    pub shout_spread: u32,
    /// Shown by `map`, line for line.
    pub map: Option<String>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
            shout_spread: DEFAULT_SHOUT_SPREAD,
            map: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Creates a detached entity with a fresh id.
    pub fn spawn(&mut self, name: impl Into<String>, kind: Kind) -> Tzid {
        let id = Tzid(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entities.insert(id, Entity::new(id, name, kind));
        id
    }

    pub fn spawn_in(
        &mut self,
        parent: Tzid,
        name: impl Into<String>,
        kind: Kind,
    ) -> Result<Tzid, WorldError> {
        if !self.can_hold(parent) {
            return Err(WorldError::NotAContainer(parent));
        }
        let id = self.spawn(name, kind);
        self.add(parent, id)?;
        Ok(id)
    }

    pub fn get(&self, id: Tzid) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: Tzid) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn entity(&self, id: Tzid) -> Result<&Entity, WorldError> {
        self.entities.get(&id).ok_or(WorldError::NoSuchEntity(id))
    }

    pub fn entity_mut(&mut self, id: Tzid) -> Result<&mut Entity, WorldError> {
        self.entities.get_mut(&id).ok_or(WorldError::NoSuchEntity(id))
    }

    pub fn exists(&self, id: Tzid) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn label(&self, id: Tzid) -> String {
        self.get(id)
            .map(Entity::label)
            .unwrap_or_else(|| "something".to_string())
    }

    pub fn has(&self, id: Tzid, cap: Capability) -> bool {
        self.get(id).is_some_and(|e| e.has(cap))
    }

    pub fn parent_of(&self, id: Tzid) -> Option<Tzid> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn contents(&self, id: Tzid) -> &[Tzid] {
        self.get(id).map(|e| e.contents.as_slice()).unwrap_or(&[])
    }

    fn contents_where(&self, id: Tzid, pred: impl Fn(&Entity) -> bool) -> Vec<Tzid> {
        self.contents(id)
            .iter()
            .copied()
            .filter(|c| self.get(*c).is_some_and(&pred))
            .collect()
    }

    pub fn items(&self, container: Tzid) -> Vec<Tzid> {
        self.contents_where(container, |e| e.item().is_some())
    }

    pub fn exits(&self, room: Tzid) -> Vec<Tzid> {
        self.contents_where(room, |e| e.exit().is_some())
    }

    pub fn players(&self, room: Tzid) -> Vec<Tzid> {
        self.contents_where(room, Entity::is_player)
    }

    pub fn mobs(&self, room: Tzid) -> Vec<Tzid> {
        self.contents_where(room, Entity::is_mob)
    }

    pub fn actors(&self, room: Tzid) -> Vec<Tzid> {
        self.contents_where(room, |e| e.actor().is_some())
    }

    pub fn connected_players(&self) -> Vec<Tzid> {
        let mut xs = self
            .entities
            .values()
            .filter(|e| e.actor().is_some_and(|a| a.player && a.connected))
            .map(|e| e.tzid)
            .collect::<Vec<_>>();
        xs.sort();
        xs
    }

    /// The room an entity is ultimately in, walking up through holders.
    pub fn room_of(&self, id: Tzid) -> Option<Tzid> {
        let mut cur = id;
        let mut guard = 0usize;
        loop {
            let e = self.get(cur)?;
            if e.is_room() {
                return Some(cur);
            }
            cur = e.parent?;
            guard += 1;
            if guard > self.entities.len() {
                return None;
            }
        }
    }

    /// True when `inner` is `outer` or sits somewhere inside it.
    pub fn is_within(&self, inner: Tzid, outer: Tzid) -> bool {
        let mut cur = Some(inner);
        let mut guard = 0usize;
        while let Some(id) = cur {
            if id == outer {
                return true;
            }
            cur = self.parent_of(id);
            guard += 1;
            if guard > self.entities.len() {
                break;
            }
        }
        false
    }

    fn can_hold(&self, id: Tzid) -> bool {
        self.get(id).is_some_and(|e| match &e.kind {
            Kind::Room | Kind::Actor(_) => true,
            Kind::Item(i) => i.container,
            Kind::Exit(_) => false,
        })
    }

    fn check_attach(&self, container: Tzid, child: Tzid) -> Result<(), WorldError> {
        self.entity(child)?;
        self.entity(container)?;
        if !self.can_hold(container) {
            return Err(WorldError::NotAContainer(container));
        }
        if self.is_within(container, child) {
            return Err(WorldError::Cycle { child, container });
        }
        Ok(())
    }

    /// Attaches a detached entity to the end of `container`'s contents.
    pub fn add(&mut self, container: Tzid, child: Tzid) -> Result<(), WorldError> {
        self.check_attach(container, child)?;
        if let Some(parent) = self.parent_of(child) {
            return Err(WorldError::AlreadyHeld { child, parent });
        }
        self.entity_mut(child)?.parent = Some(container);
        self.entity_mut(container)?.contents.push(child);
        Ok(())
    }

    /// Detaches an entity from its holder. A detached item is never worn.
    pub fn remove(&mut self, child: Tzid) -> Result<Option<Tzid>, WorldError> {
        let Some(parent) = self.entity_mut(child)?.parent.take() else {
            return Ok(None);
        };
        if let Some(p) = self.get_mut(parent) {
            p.contents.retain(|c| *c != child);
            if let Some(a) = p.actor_mut() {
                a.worn.retain(|w| *w != child);
            }
        }
        Ok(Some(parent))
    }

    /// Detach then attach. Validated up front so a refused move changes nothing.
    pub fn relocate(&mut self, child: Tzid, dest: Tzid) -> Result<(), WorldError> {
        self.check_attach(dest, child)?;
        self.remove(child)?;
        self.add(dest, child)
    }

    /// Removes an entity and everything inside it from the world.
    pub fn destroy(&mut self, id: Tzid) -> Result<(), WorldError> {
        self.remove(id)?;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(e) = self.entities.remove(&cur) {
                stack.extend(e.contents);
            }
        }
        Ok(())
    }

    pub fn can_see(&self, viewer: Tzid, target: Tzid) -> bool {
        if viewer == target {
            return self.exists(target);
        }
        let Some(t) = self.get(target) else {
            return false;
        };
        if t.visible {
            return true;
        }
        self.get(viewer)
            .and_then(Entity::actor)
            .is_some_and(|a| a.sees_hidden)
    }

    pub fn is_wearing(&self, actor: Tzid, item: Tzid) -> bool {
        self.get(actor)
            .and_then(Entity::actor)
            .is_some_and(|a| a.worn.contains(&item))
    }

    /// Worn item occupying `item`'s slot, other than `item` itself.
    pub fn worn_in_slot_of(&self, actor: Tzid, item: Tzid) -> Option<Tzid> {
        let slot = self.get(item)?.item()?.wear_slot?;
        let a = self.get(actor)?.actor()?;
        a.worn.iter().copied().find(|w| {
            *w != item
                && self
                    .get(*w)
                    .and_then(Entity::item)
                    .is_some_and(|i| i.wear_slot == Some(slot))
        })
    }

    /// Declines (false) unless the actor holds the item, it is wearable,
    /// not worn yet, and its slot is free.
    pub fn wear(&mut self, actor: Tzid, item: Tzid) -> bool {
        if self.parent_of(item) != Some(actor) {
            return false;
        }
        if !self.has(item, Capability::Wearable) || self.is_wearing(actor, item) {
            return false;
        }
        if self.worn_in_slot_of(actor, item).is_some() {
            return false;
        }
        match self.get_mut(actor).and_then(Entity::actor_mut) {
            Some(a) => {
                a.worn.push(item);
                true
            }
            None => false,
        }
    }

    /// Declines (false) for items not worn and for cursed ones.
    pub fn unwear(&mut self, actor: Tzid, item: Tzid) -> bool {
        if !self.is_wearing(actor, item) {
            return false;
        }
        if self.get(item).and_then(Entity::item).is_some_and(|i| i.cursed) {
            return false;
        }
        match self.get_mut(actor).and_then(Entity::actor_mut) {
            Some(a) => {
                a.worn.retain(|w| *w != item);
                true
            }
            None => false,
        }
    }

    pub fn locks(&self, key: Tzid, exit: Tzid) -> bool {
        if !self.has(key, Capability::Key) {
            return false;
        }
        self.get(exit)
            .and_then(Entity::exit)
            .is_some_and(|x| x.keys.contains(&key))
    }

    pub fn is_locked(&self, exit: Tzid) -> bool {
        self.get(exit).and_then(Entity::exit).is_some_and(|x| x.locked)
    }

    pub fn lock(&mut self, exit: Tzid) -> Result<(), WorldError> {
        self.set_locked(exit, true)
    }

    pub fn unlock(&mut self, exit: Tzid) -> Result<(), WorldError> {
        self.set_locked(exit, false)
    }

    fn set_locked(&mut self, exit: Tzid, locked: bool) -> Result<(), WorldError> {
        let x = self
            .entity_mut(exit)?
            .exit_mut()
            .ok_or(WorldError::NoSuchEntity(exit))?;
        x.locked = locked;
        Ok(())
    }

    /// First item in `container` called `name`, by name then alias.
    pub fn item_named(&self, container: Tzid, name: &str) -> Option<Tzid> {
        let items = self.items(container);
        let by_name = items.iter().copied().find(|id| {
            self.get(*id)
                .is_some_and(|e| e.name.eq_ignore_ascii_case(name))
        });
        by_name.or_else(|| {
            items
                .iter()
                .copied()
                .find(|id| self.get(*id).is_some_and(|e| e.has_alias(name)))
        })
    }

    /// Works out what using `item` does. Nothing is destroyed here: a
    /// consumed item is removed by the caller once the room has been told.
    pub fn use_item(&self, item: Tzid) -> Result<Used, WorldError> {
        let effect = self
            .entity(item)?
            .item()
            .and_then(|i| i.use_effect.clone());
        Ok(match effect {
            None => Used::default(),
            Some(UseEffect::Message { actor, room }) => Used {
                actor_text: Some(actor),
                room_text: Some(room),
                consumed: false,
            },
            Some(UseEffect::Consume { actor }) => Used {
                actor_text: Some(actor),
                room_text: None,
                consumed: true,
            },
        })
    }

    pub fn destination(&self, exit: Tzid) -> Option<Tzid> {
        self.get(exit)
            .and_then(Entity::exit)
            .and_then(|x| x.destination)
            .filter(|d| self.get(*d).is_some_and(Entity::is_room))
    }

    /// Moves `actor` through `exit`. On refusal returns the reason and leaves
    /// the actor where it was.
    pub fn go(&mut self, actor: Tzid, exit: Tzid) -> Result<(bool, String), WorldError> {
        let x = self.entity(exit)?;
        let name = x.name.clone();
        let Some(data) = x.exit() else {
            return Ok((false, "That is not a way out.".to_string()));
        };
        if x.parent != self.room_of(actor) {
            return Ok((false, "You can't go that way from here.".to_string()));
        }
        if let Some(reason) = data.sealed.as_deref() {
            return Ok((false, reason.to_string()));
        }
        if data.locked {
            return Ok((false, format!("The {name} is locked.")));
        }
        let Some(dest) = self.destination(exit) else {
            return Ok((false, "That way leads nowhere.".to_string()));
        };
        self.relocate(actor, dest)?;
        Ok((true, String::new()))
    }

    /// The actor being followed, if the relation still points at something
    /// that exists, is not the actor, and can be seen.
    pub fn following(&self, actor: Tzid) -> Option<Tzid> {
        let target = self.get(actor)?.actor()?.following?;
        if target == actor || !self.exists(target) || !self.can_see(actor, target) {
            return None;
        }
        Some(target)
    }

    /// `None` or the actor itself both mean "not following".
    pub fn set_following(&mut self, actor: Tzid, target: Option<Tzid>) -> Result<(), WorldError> {
        let target = target.filter(|t| *t != actor);
        let a = self
            .entity_mut(actor)?
            .actor_mut()
            .ok_or(WorldError::NoSuchEntity(actor))?;
        a.following = target;
        Ok(())
    }

    /// Rooms reachable within `hops` exit traversals, excluding `room`,
    /// paired with their distance.
    pub fn neighborhood(&self, room: Tzid, hops: u32) -> Vec<(Tzid, u32)> {
        let mut seen = HashSet::from([room]);
        let mut out = Vec::new();
        let mut q = VecDeque::from([(room, 0u32)]);
        while let Some((cur, d)) = q.pop_front() {
            if d >= hops {
                continue;
            }
            for x in self.exits(cur) {
                let Some(next) = self.destination(x) else {
                    continue;
                };
                if seen.insert(next) {
                    out.push((next, d + 1));
                    q.push_back((next, d + 1));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Actor, Exit, Item, WearSlot};

    fn bag() -> Kind {
        Kind::Item(Item {
            gettable: true,
            container: true,
            ..Item::default()
        })
    }

    fn thing() -> Kind {
        Kind::Item(Item {
            gettable: true,
            ..Item::default()
        })
    }

    #[test]
    fn moving_a_child_out_and_back_round_trips() {
        let mut w = World::new();
        let room = w.spawn("hall", Kind::Room);
        let chest = w.spawn_in(room, "chest", bag()).unwrap();
        let a = w.spawn_in(chest, "apple", thing()).unwrap();
        let b = w.spawn_in(chest, "bread", thing()).unwrap();

        let before = w.contents(chest).iter().copied().collect::<HashSet<_>>();
        w.relocate(a, room).unwrap();
        assert_eq!(w.contents(chest), &[b]);
        assert_eq!(w.parent_of(a), Some(room));
        w.relocate(a, chest).unwrap();
        let after = w.contents(chest).iter().copied().collect::<HashSet<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn containment_cycles_are_refused_without_moving_anything() {
        let mut w = World::new();
        let room = w.spawn("hall", Kind::Room);
        let outer = w.spawn_in(room, "crate", bag()).unwrap();
        let inner = w.spawn_in(outer, "box", bag()).unwrap();

        let err = w.relocate(outer, inner).unwrap_err();
        assert_eq!(
            err,
            WorldError::Cycle {
                child: outer,
                container: inner
            }
        );
        assert_eq!(w.parent_of(outer), Some(room));
        assert!(matches!(w.relocate(outer, outer), Err(WorldError::Cycle { .. })));
    }

    #[test]
    fn plain_items_cannot_hold_things() {
        let mut w = World::new();
        let room = w.spawn("hall", Kind::Room);
        let rock = w.spawn_in(room, "rock", thing()).unwrap();
        let pebble = w.spawn_in(room, "pebble", thing()).unwrap();
        assert_eq!(w.relocate(pebble, rock), Err(WorldError::NotAContainer(rock)));
        assert_eq!(w.parent_of(pebble), Some(room));
    }

    #[test]
    fn detaching_clears_the_worn_mark() {
        let mut w = World::new();
        let room = w.spawn("hall", Kind::Room);
        let me = w.spawn_in(room, "lee", Kind::Actor(Actor::default())).unwrap();
        let hat = w
            .spawn_in(
                me,
                "hat",
                Kind::Item(Item {
                    gettable: true,
                    wear_slot: Some(WearSlot::Head),
                    cursed: true,
                    ..Item::default()
                }),
            )
            .unwrap();

        assert!(w.wear(me, hat));
        assert!(!w.unwear(me, hat), "cursed items refuse unwear");
        w.relocate(hat, room).unwrap();
        assert!(!w.is_wearing(me, hat));
    }

    #[test]
    fn wear_declines_an_occupied_slot() {
        let mut w = World::new();
        let room = w.spawn("hall", Kind::Room);
        let me = w.spawn_in(room, "lee", Kind::Actor(Actor::default())).unwrap();
        let helm = Kind::Item(Item {
            wear_slot: Some(WearSlot::Head),
            ..Item::default()
        });
        let cap = w.spawn_in(me, "cap", helm.clone()).unwrap();
        let hood = w.spawn_in(me, "hood", helm).unwrap();
        assert!(w.wear(me, cap));
        assert!(!w.wear(me, hood));
        assert!(w.unwear(me, cap));
        assert!(w.wear(me, hood));
    }

    #[test]
    fn destroy_removes_contents_and_leaves_holder_consistent() {
        let mut w = World::new();
        let room = w.spawn("hall", Kind::Room);
        let chest = w.spawn_in(room, "chest", bag()).unwrap();
        let coin = w.spawn_in(chest, "coin", thing()).unwrap();
        w.destroy(chest).unwrap();
        assert!(!w.exists(chest));
        assert!(!w.exists(coin));
        assert!(w.contents(room).is_empty());
    }

    #[test]
    fn go_respects_locks_and_seals() {
        let mut w = World::new();
        let a = w.spawn("yard", Kind::Room);
        let b = w.spawn("house", Kind::Room);
        let me = w.spawn_in(a, "lee", Kind::Actor(Actor::default())).unwrap();
        let door = w
            .spawn_in(
                a,
                "door",
                Kind::Exit(Exit {
                    destination: Some(b),
                    locked: true,
                    ..Exit::default()
                }),
            )
            .unwrap();

        let (ok, msg) = w.go(me, door).unwrap();
        assert!(!ok);
        assert_eq!(msg, "The door is locked.");
        assert_eq!(w.room_of(me), Some(a));

        w.unlock(door).unwrap();
        let (ok, _) = w.go(me, door).unwrap();
        assert!(ok);
        assert_eq!(w.room_of(me), Some(b));
    }

    #[test]
    fn neighborhood_counts_hops() {
        let mut w = World::new();
        let r1 = w.spawn("one", Kind::Room);
        let r2 = w.spawn("two", Kind::Room);
        let r3 = w.spawn("three", Kind::Room);
        let r4 = w.spawn("four", Kind::Room);
        for (from, to) in [(r1, r2), (r2, r1), (r2, r3), (r3, r4)] {
            w.spawn_in(
                from,
                "path",
                Kind::Exit(Exit {
                    destination: Some(to),
                    ..Exit::default()
                }),
            )
            .unwrap();
        }
        assert_eq!(w.neighborhood(r1, 2), vec![(r2, 1), (r3, 2)]);
        assert!(w.neighborhood(r1, 0).is_empty());
    }

    #[test]
    fn following_resolves_lazily() {
        let mut w = World::new();
        let room = w.spawn("hall", Kind::Room);
        let me = w.spawn_in(room, "lee", Kind::Actor(Actor::default())).unwrap();
        let bob = w.spawn_in(room, "bob", Kind::Actor(Actor::default())).unwrap();

        w.set_following(me, Some(bob)).unwrap();
        assert_eq!(w.following(me), Some(bob));

        w.get_mut(bob).unwrap().visible = false;
        assert_eq!(w.following(me), None);

        w.get_mut(bob).unwrap().visible = true;
        w.destroy(bob).unwrap();
        assert_eq!(w.following(me), None);

        w.set_following(me, Some(me)).unwrap();
        assert_eq!(w.get(me).unwrap().actor().unwrap().following, None);
    }
}
