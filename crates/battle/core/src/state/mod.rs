//! Battle data model: actors, abilities, stances and phases.
//!
//! Everything here is owned by a single [`crate::BattleSession`]; other
//! components only ever see clones through snapshots.

mod ability;
mod actor;
mod common;
mod phase;
mod stance;

pub use ability::{Ability, AbilityId, EffectType, Element};
pub use actor::{Actor, ActorKind, StatusCounters};
pub use common::{ActorId, ResourceMeter};
pub use phase::Phase;
pub use stance::Stance;
