//! Deterministic battle rules.
//!
//! `battle-core` owns the data model, the turn queue, ability planning, batch
//! resolution, the reaction minigame and the [`engine::BattleSession`] state
//! machine that ties them together. Nothing here performs I/O or reads a
//! clock; the runtime drives sessions by passing time and commands in.
pub mod catalog;
pub mod combat;
pub mod config;
pub mod engine;
pub mod planner;
pub mod ramp;
pub mod reaction;
pub mod rng;
pub mod state;
pub mod turn;
pub use catalog::{AbilityCatalog, AbilityDefinition, Loadout, LoadoutSlot};
pub use combat::{
    ActionOutcome, BatchOutcome, DamageModifiers, EffectOutcome, ResolveContext, ResolveError,
    apply_strike, calculate_damage, calculate_heal, chain_multiplier, resolve_batch,
};
pub use config::{BattleConfig, VictoryPolicy};
pub use engine::{
    BattleLog, BattleMode, BattleSession, BattleSnapshot, EnemyInfo, FlashSignals, SessionError,
    SessionEvent, SessionSetup, Stage,
};
pub use planner::{AbilityPlanner, PlanError, PlannedAction, SelectOutcome, Selection};
pub use ramp::ChargeRamp;
pub use reaction::{
    Checkpoint, ParryInput, ParryPattern, ParryVisual, ReactionMinigame, ReactionMode, Sigil,
    Verdict,
};
pub use rng::{BattleRng, PcgRng};
pub use state::{
    Ability, AbilityId, Actor, ActorId, ActorKind, EffectType, Element, Phase, ResourceMeter,
    Stance, StatusCounters,
};
pub use turn::{TurnQueue, TurnTag};
