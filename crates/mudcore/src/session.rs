use crate::action::Action;
use crate::entity::Tzid;
use crate::error::CommandError;
use crate::resolve::Resolver;
use crate::world::World;

/// Outbound text, addressed by actor. The driver maps actors to whatever
/// connection they have; actors without one simply drop their lines.
pub trait Sink {
    fn deliver(&mut self, to: Tzid, text: &str);
}

/// Collects deliveries in order.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    pub lines: Vec<(Tzid, String)>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(&self, who: Tzid) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(to, _)| *to == who)
            .map(|(_, s)| s.as_str())
            .collect()
    }

    pub fn drain(&mut self) -> Vec<(Tzid, String)> {
        std::mem::take(&mut self.lines)
    }
}

impl Sink for Transcript {
    fn deliver(&mut self, to: Tzid, text: &str) {
        self.lines.push((to, text.to_string()));
    }
}

/// What a handler sees: the world, who is acting, and where output goes.
pub struct Session<'a> {
    pub world: &'a mut World,
    pub actor: Tzid,
    sink: &'a mut dyn Sink,
}

impl<'a> Session<'a> {
    pub fn new(world: &'a mut World, actor: Tzid, sink: &'a mut dyn Sink) -> Self {
        Self { world, actor, sink }
    }

    pub fn room(&self) -> Result<Tzid, CommandError> {
        self.world
            .room_of(self.actor)
            .ok_or_else(|| CommandError::Internal(format!("actor {} is nowhere", self.actor)))
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.world, self.actor)
    }

    pub fn can_see(&self, target: Tzid) -> bool {
        self.world.can_see(self.actor, target)
    }

    pub fn label(&self, id: Tzid) -> String {
        self.world.label(id)
    }

    pub fn message(&mut self, text: impl AsRef<str>) {
        self.sink.deliver(self.actor, text.as_ref());
    }

    pub fn indented(&mut self, text: impl AsRef<str>) {
        let line = format!("    {}", text.as_ref());
        self.sink.deliver(self.actor, &line);
    }

    /// Multi-line text, one delivery per line.
    pub fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.sink.deliver(self.actor, line);
        }
    }

    /// Names of connected players.
    pub fn who(&self) -> Vec<String> {
        let mut names = self
            .world
            .connected_players()
            .into_iter()
            .map(|id| self.world.label(id))
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Tells the actor's room what happened.
    pub fn broadcast(&mut self, action: &Action) -> Result<usize, CommandError> {
        let room = self.room()?;
        Ok(self.broadcast_in(room, action))
    }

    pub fn broadcast_in(&mut self, room: Tzid, action: &Action) -> usize {
        self.world.action(room, action, &mut *self.sink)
    }

    /// The same world and sink, acting as someone else.
    pub fn as_actor(&mut self, actor: Tzid) -> Session<'_> {
        Session {
            world: &mut *self.world,
            actor,
            sink: &mut *self.sink,
        }
    }
}
