use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Stable world identifier. Rendered as `#n`, which is also how players type it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tzid(pub u64);

impl Tzid {
    /// Parses `#42` or `42`.
    pub fn parse(token: &str) -> Option<Self> {
        let t = token.trim();
        let t = t.strip_prefix('#').unwrap_or(t);
        t.parse::<u64>().ok().map(Tzid)
    }
}

impl fmt::Display for Tzid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WearSlot {
    Head,
    Body,
    Arms,
    Hands,
    Legs,
    Feet,
    Wield,
    Shield,
}

impl WearSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            WearSlot::Head => "head",
            WearSlot::Body => "body",
            WearSlot::Arms => "arms",
            WearSlot::Hands => "hands",
            WearSlot::Legs => "legs",
            WearSlot::Feet => "feet",
            WearSlot::Wield => "wield",
            WearSlot::Shield => "shield",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "head" | "helm" | "hat" => Some(WearSlot::Head),
            "body" | "torso" | "chest" => Some(WearSlot::Body),
            "arms" | "sleeves" => Some(WearSlot::Arms),
            "hands" | "gloves" => Some(WearSlot::Hands),
            "legs" | "trousers" => Some(WearSlot::Legs),
            "feet" | "boots" | "shoes" => Some(WearSlot::Feet),
            "wield" | "weapon" | "mainhand" => Some(WearSlot::Wield),
            "shield" | "offhand" => Some(WearSlot::Shield),
            _ => None,
        }
    }
}

/// Behaviours an entity may or may not support. Handlers ask for these
/// instead of looking at the entity's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Gettable,
    Wearable,
    Stackable,
    Container,
    Usable,
    Key,
}

impl Capability {
    pub const ALL: &'static [Capability] = &[
        Capability::Gettable,
        Capability::Wearable,
        Capability::Stackable,
        Capability::Container,
        Capability::Usable,
        Capability::Key,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Gettable => "gettable",
            Capability::Wearable => "wearable",
            Capability::Stackable => "stackable",
            Capability::Container => "container",
            Capability::Usable => "usable",
            Capability::Key => "key",
        }
    }
}

/// What happens when an item is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum UseEffect {
    Message { actor: String, room: String },
    /// The item is used up.
    Consume { actor: String },
}

/// Runs after an item has been detached by `put` or `take`, before it is
/// attached to its destination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "hook", rename_all = "snake_case")]
pub enum Hook {
    Vanish { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Flag(bool),
    Text(String),
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Flag(b) => write!(f, "{b}"),
            Setting::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Item {
    pub gettable: bool,
    pub wear_slot: Option<WearSlot>,
    /// `Some` marks a stackable item.
    pub quantity: Option<u32>,
    pub container: bool,
    pub use_effect: Option<UseEffect>,
    pub on_put: Option<Hook>,
    pub on_take: Option<Hook>,
    pub cursed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Actor {
    pub player: bool,
    pub connected: bool,
    pub sees_hidden: bool,
    pub worn: Vec<Tzid>,
    /// Weak: an id, resolved at read time by `World::following`.
    pub following: Option<Tzid>,
    pub settings: BTreeMap<String, Setting>,
    pub stats: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default)]
pub struct Exit {
    pub destination: Option<Tzid>,
    pub locked: bool,
    /// Items that fit this exit's lock.
    pub keys: Vec<Tzid>,
    /// Refuses passage with this reason, keys or not.
    pub sealed: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Kind {
    Room,
    Exit(Exit),
    Item(Item),
    Actor(Actor),
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Room => "room",
            Kind::Exit(_) => "exit",
            Kind::Item(_) => "item",
            Kind::Actor(a) if a.player => "player",
            Kind::Actor(_) => "mob",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub tzid: Tzid,
    pub name: String,
    pub aka: Vec<String>,
    pub description: String,
    pub sound: Option<String>,
    pub visible: bool,
    pub(crate) parent: Option<Tzid>,
    pub(crate) contents: Vec<Tzid>,
    pub kind: Kind,
}

impl Entity {
    pub fn new(tzid: Tzid, name: impl Into<String>, kind: Kind) -> Self {
        Self {
            tzid,
            name: name.into(),
            aka: Vec::new(),
            description: String::new(),
            sound: None,
            visible: true,
            parent: None,
            contents: Vec::new(),
            kind,
        }
    }

    pub fn parent(&self) -> Option<Tzid> {
        self.parent
    }

    pub fn contents(&self) -> &[Tzid] {
        &self.contents
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aka.iter().any(|a| a.eq_ignore_ascii_case(alias))
    }

    pub fn item(&self) -> Option<&Item> {
        match &self.kind {
            Kind::Item(i) => Some(i),
            _ => None,
        }
    }

    pub fn item_mut(&mut self) -> Option<&mut Item> {
        match &mut self.kind {
            Kind::Item(i) => Some(i),
            _ => None,
        }
    }

    pub fn actor(&self) -> Option<&Actor> {
        match &self.kind {
            Kind::Actor(a) => Some(a),
            _ => None,
        }
    }

    pub fn actor_mut(&mut self) -> Option<&mut Actor> {
        match &mut self.kind {
            Kind::Actor(a) => Some(a),
            _ => None,
        }
    }

    pub fn exit(&self) -> Option<&Exit> {
        match &self.kind {
            Kind::Exit(x) => Some(x),
            _ => None,
        }
    }

    pub fn exit_mut(&mut self) -> Option<&mut Exit> {
        match &mut self.kind {
            Kind::Exit(x) => Some(x),
            _ => None,
        }
    }

    pub fn is_room(&self) -> bool {
        matches!(self.kind, Kind::Room)
    }

    pub fn is_player(&self) -> bool {
        self.actor().is_some_and(|a| a.player)
    }

    pub fn is_mob(&self) -> bool {
        self.actor().is_some_and(|a| !a.player)
    }

    pub fn has(&self, cap: Capability) -> bool {
        let Some(item) = self.item() else {
            return false;
        };
        match cap {
            Capability::Gettable => item.gettable,
            Capability::Wearable => item.wear_slot.is_some(),
            Capability::Stackable => item.quantity.is_some(),
            Capability::Container => item.container,
            Capability::Usable => item.use_effect.is_some(),
            Capability::Key => self.has_alias("key"),
        }
    }

    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .iter()
            .copied()
            .filter(|c| self.has(*c))
            .collect()
    }

    pub fn quantity(&self) -> Option<u32> {
        self.item().and_then(|i| i.quantity)
    }

    /// Name as shown in messages; stacks carry their count and actors may
    /// have picked their own capitalisation with `recap`.
    pub fn label(&self) -> String {
        if let Some(Setting::Text(recap)) = self.actor().and_then(|a| a.settings.get("recap")) {
            return recap.clone();
        }
        match self.quantity() {
            Some(n) if n != 1 => format!("{} x{}", self.name, n),
            _ => self.name.clone(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tzid_parses_with_and_without_hash() {
        assert_eq!(Tzid::parse("#42"), Some(Tzid(42)));
        assert_eq!(Tzid::parse(" 7 "), Some(Tzid(7)));
        assert_eq!(Tzid::parse("sword"), None);
        assert_eq!(Tzid(3).to_string(), "#3");
    }

    #[test]
    fn capabilities_come_from_item_data() {
        let mut e = Entity::new(
            Tzid(1),
            "ring key",
            Kind::Item(Item {
                gettable: true,
                quantity: Some(3),
                ..Item::default()
            }),
        );
        e.aka.push("Key".to_string());
        assert_eq!(
            e.capabilities(),
            vec![Capability::Gettable, Capability::Stackable, Capability::Key]
        );
        assert_eq!(e.label(), "ring key x3");

        let room = Entity::new(Tzid(2), "hall", Kind::Room);
        assert!(room.capabilities().is_empty());
    }

    #[test]
    fn wear_slot_parse_accepts_common_words() {
        assert_eq!(WearSlot::parse("Helm"), Some(WearSlot::Head));
        assert_eq!(WearSlot::parse("boots"), Some(WearSlot::Feet));
        assert_eq!(WearSlot::parse("tail"), None);
        for s in [WearSlot::Body, WearSlot::Wield, WearSlot::Shield] {
            assert_eq!(WearSlot::parse(s.as_str()), Some(s));
        }
    }
}
