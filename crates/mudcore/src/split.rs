use std::num::NonZeroU32;

use crate::entity::{Entity, Tzid};
use crate::error::WorldError;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    NotSplittable,
    InsufficientQuantity { have: u32, want: u32 },
    World(WorldError),
}

impl std::fmt::Display for SplitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitError::NotSplittable => write!(f, "item is not stackable"),
            SplitError::InsufficientQuantity { have, want } => {
                write!(f, "wanted {want}, only {have} available")
            }
            SplitError::World(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SplitError {}

impl From<WorldError> for SplitError {
    fn from(e: WorldError) -> Self {
        SplitError::World(e)
    }
}

impl World {
    /// Splits `n` off `item`.
    ///
    /// A stack always yields a fresh, detached entity holding `n`; the source
    /// keeps the rest and is destroyed when nothing is left. A plain item
    /// can only be "split" into one, which hands back the item itself.
    /// Nothing changes on failure.
    pub fn split(&mut self, item: Tzid, n: NonZeroU32) -> Result<Tzid, SplitError> {
        let src = self.entity(item)?;
        let want = n.get();
        let Some(have) = src.quantity() else {
            if want == 1 && src.item().is_some() {
                return Ok(item);
            }
            return Err(SplitError::NotSplittable);
        };
        if want > have {
            return Err(SplitError::InsufficientQuantity { have, want });
        }

        let mut unit = src.clone();
        let id = self.spawn(unit.name.clone(), unit.kind.clone());
        unit.tzid = id;
        unit.parent = None;
        unit.contents = Vec::new();
        if let Some(i) = unit.item_mut() {
            i.quantity = Some(want);
        }
        *self.entity_mut(id)? = unit;

        let left = have - want;
        if left == 0 {
            self.destroy(item)?;
        } else if let Some(i) = self.entity_mut(item)?.item_mut() {
            i.quantity = Some(left);
        }
        Ok(id)
    }

    /// Count held by a matched entity, 1 for anything that is not a stack.
    pub fn amount(&self, item: Tzid) -> u32 {
        self.get(item).and_then(Entity::quantity).unwrap_or(1)
    }
}
