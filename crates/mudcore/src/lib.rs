//! `mudcore`: the command layer of the mud.
//!
//! - `world`: entities, containment, wearing, locks, movement
//! - `resolve`: turning names, aliases and `#ids` into entities
//! - `split`: taking part of a stack
//! - `commands`: one handler per verb, plus the registry `help` reads
//! - `action`: what everyone else in the room gets told
//!
//! Everything runs synchronously against a single `&mut World`.

pub mod action;
pub mod commands;
pub mod entity;
pub mod error;
pub mod request;
pub mod resolve;
pub mod session;
pub mod split;
pub mod world;
pub mod world_file;

#[cfg(test)]
mod fixtures;

pub use action::Action;
pub use commands::{CommandSpec, Outcome, dispatch};
pub use entity::{Capability, Entity, Kind, Tzid};
pub use error::{CommandError, WorldError};
pub use request::{Request, Target};
pub use session::{Session, Sink, Transcript};
pub use world::World;
