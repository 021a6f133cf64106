//! YAML world definitions.
//!
//! A file describes rooms, what lies in them, and the players that can be
//! controlled. Item ids in the file are only used to wire keys to exits;
//! everything gets a fresh `Tzid` when loaded.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::entity::{Actor, Exit, Hook, Item, Kind, Tzid, UseEffect, WearSlot};
use crate::world::{DEFAULT_SHOUT_SPREAD, World};

#[derive(Debug)]
pub struct Loaded {
    pub world: World,
    pub zone_name: String,
    pub start_room: Tzid,
    /// Players in file order.
    pub players: Vec<(String, Tzid)>,
}

impl Loaded {
    pub fn player(&self, name: &str) -> Option<Tzid> {
        self.players
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|(_, id)| *id)
    }
}

#[derive(Debug, Deserialize)]
struct WorldFile {
    #[allow(dead_code)]
    version: u32,
    zone_id: String,
    zone_name: Option<String>,
    start_room: Option<String>,
    shout_spread: Option<u32>,
    map: Option<String>,
    rooms: Vec<FileRoom>,
    #[serde(default)]
    players: Vec<FilePlayer>,
}

#[derive(Debug, Deserialize)]
struct FileRoom {
    id: String,
    name: String,
    desc: Option<String>,
    sound: Option<String>,
    #[serde(default)]
    exits: Vec<FileExit>,
    #[serde(default)]
    items: Vec<FileItem>,
    #[serde(default)]
    mobs: Vec<FileMob>,
}

#[derive(Debug, Deserialize)]
struct FileExit {
    dir: String,
    to: String,
    #[serde(default)]
    aka: Vec<String>,
    desc: Option<String>,
    sound: Option<String>,
    /// `locked` or `sealed`.
    state: Option<String>,
    sealed_reason: Option<String>,
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Deserialize)]
struct FileItem {
    id: Option<String>,
    name: String,
    #[serde(default)]
    aka: Vec<String>,
    desc: Option<String>,
    sound: Option<String>,
    #[serde(default)]
    gettable: bool,
    /// Slot name: `head`, `helm`, `boots`, ...
    wear: Option<String>,
    quantity: Option<u32>,
    #[serde(default)]
    container: bool,
    #[serde(default)]
    contents: Vec<FileItem>,
    #[serde(rename = "use")]
    use_effect: Option<UseEffect>,
    on_put: Option<Hook>,
    on_take: Option<Hook>,
    #[serde(default)]
    cursed: bool,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Deserialize)]
struct FileMob {
    name: String,
    #[serde(default)]
    aka: Vec<String>,
    desc: Option<String>,
    #[serde(default)]
    items: Vec<FileItem>,
    #[serde(default)]
    stats: BTreeMap<String, i64>,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Deserialize)]
struct FilePlayer {
    name: String,
    room: Option<String>,
    desc: Option<String>,
    #[serde(default = "yes")]
    connected: bool,
    #[serde(default)]
    sees_hidden: bool,
    #[serde(default)]
    stats: BTreeMap<String, i64>,
    #[serde(default)]
    items: Vec<FileItem>,
}

fn yes() -> bool {
    true
}

struct Builder {
    world: World,
    item_ids: HashMap<String, Tzid>,
}

impl Builder {
    fn describe(&mut self, id: Tzid, desc: Option<String>, sound: Option<String>, aka: Vec<String>) {
        if let Some(e) = self.world.get_mut(id) {
            e.description = desc.unwrap_or_default().trim().to_string();
            e.sound = sound;
            e.aka = aka;
        }
    }

    fn hide(&mut self, id: Tzid, hidden: bool) {
        if let Some(e) = self.world.get_mut(id) {
            e.visible = !hidden;
        }
    }

    fn item(&mut self, at: Tzid, it: FileItem) -> anyhow::Result<Tzid> {
        if it.quantity == Some(0) {
            bail!("item {} has quantity 0", it.name);
        }
        if !it.contents.is_empty() && !it.container {
            bail!("item {} has contents but is not a container", it.name);
        }
        let wear_slot = match it.wear.as_deref() {
            None => None,
            Some(w) => Some(
                WearSlot::parse(w)
                    .with_context(|| format!("item {}: unknown wear slot {w}", it.name))?,
            ),
        };
        let kind = Kind::Item(Item {
            gettable: it.gettable,
            wear_slot,
            quantity: it.quantity,
            container: it.container,
            use_effect: it.use_effect,
            on_put: it.on_put,
            on_take: it.on_take,
            cursed: it.cursed,
        });
        let id = self
            .world
            .spawn_in(at, it.name.as_str(), kind)
            .with_context(|| format!("place item {}", it.name))?;
        self.describe(id, it.desc, it.sound, it.aka);
        self.hide(id, it.hidden);
        if let Some(key) = it.id {
            if self.item_ids.insert(key.clone(), id).is_some() {
                bail!("duplicate item id {key}");
            }
        }
        for inner in it.contents {
            self.item(id, inner)?;
        }
        Ok(id)
    }
}

pub fn load_path(path: &Path) -> anyhow::Result<Loaded> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("read world file {}", path.display()))?;
    load_str(&src).with_context(|| format!("load world file {}", path.display()))
}

pub fn load_str(src: &str) -> anyhow::Result<Loaded> {
    let file = serde_yaml::from_str::<WorldFile>(src).context("parse world yaml")?;
    if file.rooms.is_empty() {
        bail!("zone {} has no rooms", file.zone_id);
    }
    let first_room = file.rooms[0].id.clone();

    let mut b = Builder {
        world: World::new(),
        item_ids: HashMap::new(),
    };
    b.world.shout_spread = file.shout_spread.unwrap_or(DEFAULT_SHOUT_SPREAD);
    b.world.map = file.map.filter(|m| !m.trim().is_empty());

    let mut rooms = HashMap::new();
    let mut room_order = Vec::new();
    for r in &file.rooms {
        let id = b.world.spawn(r.name.as_str(), Kind::Room);
        if rooms.insert(r.id.clone(), id).is_some() {
            bail!("duplicate room id {}", r.id);
        }
        room_order.push(id);
    }
    let room = |key: &str| -> anyhow::Result<Tzid> {
        rooms
            .get(key.trim())
            .copied()
            .with_context(|| format!("unknown room {key}"))
    };

    let mut exits = Vec::new();
    for (r, rid) in file.rooms.into_iter().zip(room_order) {
        b.describe(rid, r.desc, r.sound, Vec::new());
        for it in r.items {
            b.item(rid, it)
                .with_context(|| format!("room {}", r.id))?;
        }
        for m in r.mobs {
            let id = b
                .world
                .spawn_in(
                    rid,
                    m.name.as_str(),
                    Kind::Actor(Actor {
                        stats: m.stats,
                        ..Actor::default()
                    }),
                )?;
            b.describe(id, m.desc, None, m.aka);
            b.hide(id, m.hidden);
            for it in m.items {
                b.item(id, it)
                    .with_context(|| format!("mob {}", m.name))?;
            }
        }
        for x in r.exits {
            exits.push((rid, r.id.clone(), x));
        }
    }

    for (rid, room_key, x) in exits {
        let dest = room(&x.to).with_context(|| format!("exit {} of room {room_key}", x.dir))?;
        let (locked, sealed) = match x.state.as_deref().map(str::trim) {
            None | Some("") | Some("open") => (false, None),
            Some("locked") => (true, None),
            Some("sealed") => (
                false,
                Some(
                    x.sealed_reason
                        .clone()
                        .unwrap_or_else(|| format!("The way {} is sealed.", x.dir)),
                ),
            ),
            Some(other) => bail!("exit {} of room {room_key}: unknown state {other}", x.dir),
        };
        let mut keys = Vec::new();
        for k in &x.keys {
            let id = b
                .item_ids
                .get(k)
                .copied()
                .with_context(|| format!("exit {} of room {room_key}: unknown key {k}", x.dir))?;
            keys.push(id);
        }
        let id = b.world.spawn_in(
            rid,
            x.dir.trim(),
            Kind::Exit(Exit {
                destination: Some(dest),
                locked,
                keys,
                sealed,
            }),
        )?;
        b.describe(id, x.desc, x.sound, x.aka);
        b.hide(id, x.hidden);
    }

    let start_room = match file.start_room.as_deref() {
        Some(key) => room(key)?,
        None => room(&first_room)?,
    };

    let mut players = Vec::new();
    for p in file.players {
        let at = match p.room.as_deref() {
            Some(key) => room(key).with_context(|| format!("player {}", p.name))?,
            None => start_room,
        };
        let id = b.world.spawn_in(
            at,
            p.name.as_str(),
            Kind::Actor(Actor {
                player: true,
                connected: p.connected,
                sees_hidden: p.sees_hidden,
                stats: p.stats,
                ..Actor::default()
            }),
        )?;
        b.describe(id, p.desc, None, Vec::new());
        for it in p.items {
            b.item(id, it)
                .with_context(|| format!("player {}", p.name))?;
        }
        players.push((p.name, id));
    }

    let zone_name = file.zone_name.unwrap_or(file.zone_id);
    tracing::info!(
        zone = %zone_name,
        entities = b.world.len(),
        players = players.len(),
        "world loaded"
    );
    Ok(Loaded {
        world: b.world,
        zone_name,
        start_room,
        players,
    })
}
